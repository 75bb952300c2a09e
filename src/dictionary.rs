/// Data dictionary reconstruction.
///
/// The STN data dictionaries are two-column CSVs (`Field,Definition`) with
/// two provider quirks this module repairs:
///
/// - A long definition spills into subsequent rows whose field cell is
///   empty; those rows continue the previous entry rather than starting a
///   new one.
/// - Definitions contain literal CRLF sequences inside quoted cells; each
///   becomes two spaces.
///
/// Some dictionary files ship without the header row, so the parser detects
/// and relabels rather than assuming one.

use crate::model::{DictionaryRow, FloodDataError};

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parses a raw dictionary CSV body into reassembled `(field, definition)`
/// entries.
pub fn parse_data_dictionary(csv_text: &str) -> Result<Vec<DictionaryRow>, FloodDataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let mut rows: Vec<(String, String)> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| FloodDataError::Parse(e.to_string()))?;
        let field = record.get(0).unwrap_or("").to_string();
        let definition = record.get(1).unwrap_or("").to_string();
        rows.push((field, definition));
    }

    // Header detection: some dictionary endpoints omit the Field,Definition
    // header row entirely, in which case the first row is already data.
    if rows.first().is_some_and(|(field, _)| field == "Field") {
        rows.remove(0);
    }

    reconstruct_rows(rows)
}

// ---------------------------------------------------------------------------
// Reassembly
// ---------------------------------------------------------------------------

/// Folds continuation rows (empty field cell) into the preceding entry's
/// definition, space-joined, preserving entry order.
///
/// CRLF sequences inside each raw definition are normalized to two spaces
/// before any continuation handling. A continuation row with no preceding
/// entry is malformed: known provider data never produces one, but dropping
/// the orphaned text silently would hide it, so it is an error.
pub fn reconstruct_rows(
    rows: impl IntoIterator<Item = (String, String)>,
) -> Result<Vec<DictionaryRow>, FloodDataError> {
    let mut entries: Vec<DictionaryRow> = Vec::new();

    for (field, raw_definition) in rows {
        let definition = raw_definition.replace("\r\n", "  ");

        if field.is_empty() {
            if definition.is_empty() {
                continue; // fully blank row, nothing to carry
            }
            match entries.last_mut() {
                Some(previous) => {
                    previous.definition.push(' ');
                    previous.definition.push_str(&definition);
                }
                None => return Err(FloodDataError::MalformedDictionary),
            }
        } else {
            entries.push(DictionaryRow { field, definition });
        }
    }

    Ok(entries)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

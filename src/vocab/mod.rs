//! Local vocabulary resolver for drug names.
//!
//! Parses a DrugBank vocabulary export (CSV with `DrugBank ID`,
//! `Accession Numbers` and `Common name` columns) into the same
//! identifier → name mapping the annotation client produces, so the
//! pipeline can run without network access.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::VocabResult;
use crate::models::NameMap;

/// One row of the vocabulary export. Extra columns (CAS, UNII, synonyms)
/// are ignored.
#[derive(Debug, Deserialize)]
struct VocabRow {
    #[serde(rename = "DrugBank ID")]
    drugbank_id: String,
    /// Pipe-separated secondary identifiers, possibly empty.
    #[serde(rename = "Accession Numbers")]
    accession_numbers: String,
    #[serde(rename = "Common name")]
    common_name: String,
}

/// Load a vocabulary file into an id → name mapping.
pub fn load_vocabulary<P: AsRef<Path>>(path: P) -> VocabResult<NameMap> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let map = parse_vocabulary(&content)?;
    debug!(entries = map.len(), "loaded vocabulary");
    Ok(map)
}

/// Parse vocabulary CSV text into an id → name mapping.
///
/// Each row maps its primary `DrugBank ID` to the common name; every
/// secondary accession number maps to the same name. Rows with an empty
/// common name map to `None`. The first mapping for an identifier wins.
pub fn parse_vocabulary(content: &str) -> VocabResult<NameMap> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let mut map = NameMap::new();

    for row in reader.deserialize() {
        let row: VocabRow = row?;
        let name = if row.common_name.is_empty() {
            None
        } else {
            Some(row.common_name)
        };

        map.entry(row.drugbank_id).or_insert_with(|| name.clone());

        for alias in row
            .accession_numbers
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            map.entry(alias.to_string()).or_insert_with(|| name.clone());
        }
    }

    Ok(map)
}

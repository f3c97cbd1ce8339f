//! repoDB CSV parsing with encoding auto-detection.
//!
//! Reads the flat repoDB export (`full.csv`) into typed records. The file
//! has a fixed column set (`drug_name`, `drugbank_id`, `ind_name`,
//! `ind_id`, `NCT`, `status`, `phase`, `DetailedStatus`) and uses the
//! literal token `"NA"` for missing values, which is kept as-is.

use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::RepodbRecord;

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// Parsed repoDB records, in file order
    pub records: Vec<RepodbRecord>,
    /// Detected encoding
    pub encoding: String,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Bytes that are not valid UTF-8 under a utf-8 label are an
/// [`CsvError::EncodingError`]; unknown labels fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let content = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec())
            .map_err(|e| CsvError::EncodingError(e.to_string()))?,
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.to_string()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        _ => {
            // Fallback: UTF-8 with lossy conversion
            String::from_utf8_lossy(bytes).to_string()
        }
    };

    Ok(content)
}

/// Parse decoded CSV text into repoDB records.
///
/// Quoted fields may span lines (some `DetailedStatus` values embed line
/// breaks); the reader handles those. `"NA"` values pass through untouched.
pub fn parse_records(content: &str) -> CsvResult<Vec<RepodbRecord>> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let records = reader
        .deserialize()
        .collect::<Result<Vec<RepodbRecord>, _>>()?;

    Ok(records)
}

/// Parse CSV bytes with encoding auto-detection.
pub fn parse_csv_bytes(bytes: &[u8]) -> CsvResult<ParseOutcome> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let records = parse_records(&content)?;

    Ok(ParseOutcome { records, encoding })
}

/// Parse a CSV file with encoding auto-detection.
///
/// # Example
/// ```ignore
/// let outcome = parse_csv_file(Path::new("full.csv"))?;
/// println!("Encoding: {}, records: {}", outcome.encoding, outcome.records.len());
/// ```
pub fn parse_csv_file<P: AsRef<Path>>(path: P) -> CsvResult<ParseOutcome> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_csv_bytes(&bytes)
}

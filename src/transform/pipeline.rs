//! High-level pipeline API for repoDB CSV transformation.
//!
//! This module provides easy-to-use functions that combine all steps:
//! parsing, name resolution, revision, and grouping.
//!
//! # Example
//!
//! ```rust,ignore
//! use repoload::transform::{transform_csv, TransformOptions};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = transform_csv(
//!         Path::new("full.csv"),
//!         TransformOptions::default(),
//!     ).await?;
//!
//!     println!("Transformed {} drugs", report.docs.len());
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{CsvError, PipelineResult};
use crate::models::{NameMap, RepodbDoc};
use crate::mychem::{MyChemClient, MAX_BATCH_SIZE};
use crate::parser::{parse_csv_bytes, ParseOutcome};
use crate::vocab::load_vocabulary;

use super::grouper::group_records;
use super::revise::{revise_drug_names, unique_drugbank_ids};

/// Options for the transformation pipeline
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Resolve names from a local vocabulary CSV instead of the annotation service
    pub vocab_path: Option<PathBuf>,

    /// Override the annotation service base URL
    pub base_url: Option<String>,

    /// Maximum number of ids per batch request
    pub batch_size: usize,

    /// Skip the name revision step entirely
    pub skip_revision: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            vocab_path: None,
            base_url: None,
            batch_size: MAX_BATCH_SIZE,
            skip_revision: false,
        }
    }
}

/// Result of a complete transformation run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Grouped documents, one per drug, ascending by identifier
    pub docs: Vec<RepodbDoc>,

    /// Number of unique identifiers sent for resolution
    pub looked_up: usize,

    /// Number of identifiers that came back with a name
    pub resolved: usize,

    /// CSV parsing metadata
    pub csv_info: CsvInfo,
}

/// CSV file information
#[derive(Debug, Clone)]
pub struct CsvInfo {
    pub encoding: String,
    pub row_count: usize,
}

/// Transform a repoDB CSV file into grouped drug documents.
///
/// This is the main entry point for the pipeline. It:
/// 1. Parses the CSV with encoding detection
/// 2. Resolves a current name for every unique DrugBank identifier
/// 3. Revises drug names and checks the name/identifier correspondence
/// 4. Groups rows into one document per drug
///
/// # Arguments
/// * `path` - Path to the repoDB CSV file
/// * `options` - Transformation options
///
/// # Returns
/// A `PipelineReport` containing the grouped documents and run metadata
pub async fn transform_csv(
    path: &Path,
    options: TransformOptions,
) -> PipelineResult<PipelineReport> {
    let bytes = tokio::fs::read(path).await.map_err(CsvError::from)?;
    transform_bytes(&bytes, options).await
}

/// Transform repoDB CSV bytes into grouped drug documents.
///
/// Same as [`transform_csv`] but accepts raw bytes instead of a file path.
pub async fn transform_bytes(
    bytes: &[u8],
    options: TransformOptions,
) -> PipelineResult<PipelineReport> {
    let outcome = parse_csv_bytes(bytes)?;
    transform_parsed(outcome, &options).await
}

/// Internal: transform parsed CSV data
async fn transform_parsed(
    outcome: ParseOutcome,
    options: &TransformOptions,
) -> PipelineResult<PipelineReport> {
    let csv_info = CsvInfo {
        encoding: outcome.encoding.clone(),
        row_count: outcome.records.len(),
    };
    debug!(rows = csv_info.row_count, encoding = %csv_info.encoding, "parsed repoDB CSV");

    let mut records = outcome.records;

    // Step 1: Revise drug names
    let (looked_up, resolved) = if options.skip_revision {
        debug!("name revision skipped");
        (0, 0)
    } else {
        let ids = unique_drugbank_ids(&records);
        let names = resolve_names(&ids, options).await?;
        let resolved = ids
            .iter()
            .filter(|id| matches!(names.get(id.as_str()), Some(Some(_))))
            .count();

        if resolved < ids.len() {
            warn!(
                unresolved = ids.len() - resolved,
                "identifiers without a resolved name keep their original one"
            );
        }

        revise_drug_names(&mut records, &names)?;
        info!(looked_up = ids.len(), resolved, "drug names revised");
        (ids.len(), resolved)
    };

    // Step 2: Group into documents
    let docs: Vec<RepodbDoc> = group_records(records).collect();
    info!(documents = docs.len(), "rows grouped into per-drug documents");

    Ok(PipelineReport {
        docs,
        looked_up,
        resolved,
        csv_info,
    })
}

/// Internal: resolve names from the vocabulary file or the annotation service
async fn resolve_names(ids: &[String], options: &TransformOptions) -> PipelineResult<NameMap> {
    // Nothing to resolve; the annotation service rejects an empty id list.
    if ids.is_empty() {
        return Ok(NameMap::new());
    }

    if let Some(ref vocab_path) = options.vocab_path {
        debug!(path = %vocab_path.display(), "resolving names from local vocabulary");
        return Ok(load_vocabulary(vocab_path)?);
    }

    let mut client = MyChemClient::from_env().with_batch_size(options.batch_size);
    if let Some(ref base_url) = options.base_url {
        client = client.with_base_url(base_url);
    }
    debug!(ids = ids.len(), "resolving names via the annotation service");
    Ok(client.query_drugbank_names(ids).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use std::io::Write;

    const HEADER: &str = "drug_name,drugbank_id,ind_name,ind_id,NCT,status,phase,DetailedStatus";
    const VOCAB_HEADER: &str =
        "DrugBank ID,Accession Numbers,Common name,CAS,UNII,Synonyms,Standard InChI Key";

    fn sample_csv() -> String {
        format!(
            "{HEADER}\n\
             cetuximab,DB00002,Malignant tumor of colon,C0007102,NA,Approved,NA,NA\n\
             NA,DB00002,Squamous cell carcinoma,C0007137,NCT00003809,Terminated,Phase 3,NA\n\
             enalapril,DB00584,Hypertensive disease,C0020538,NA,Approved,NA,NA\n"
        )
    }

    fn sample_vocab() -> String {
        format!(
            "{VOCAB_HEADER}\n\
             DB00002,BIOD00071 | BTD00071,Cetuximab,205923-56-4,PQX0D8J21J,,\n\
             DB00584,APRD00510,Enalapril,75847-73-3,69PN84IO1A,,\n"
        )
    }

    #[test]
    fn test_default_options() {
        let opts = TransformOptions::default();
        assert_eq!(opts.batch_size, 1000);
        assert!(opts.vocab_path.is_none());
        assert!(opts.base_url.is_none());
        assert!(!opts.skip_revision);
    }

    #[tokio::test]
    async fn test_transform_csv_with_vocabulary() {
        let mut csv_file = tempfile::NamedTempFile::new().unwrap();
        csv_file.write_all(sample_csv().as_bytes()).unwrap();
        let mut vocab_file = tempfile::NamedTempFile::new().unwrap();
        vocab_file.write_all(sample_vocab().as_bytes()).unwrap();

        let options = TransformOptions {
            vocab_path: Some(vocab_file.path().to_path_buf()),
            ..TransformOptions::default()
        };

        let report = transform_csv(csv_file.path(), options).await.unwrap();

        assert_eq!(report.csv_info.row_count, 3);
        assert_eq!(report.looked_up, 2);
        assert_eq!(report.resolved, 2);

        // Both DB00002 rows merge into one document once the names agree.
        assert_eq!(report.docs.len(), 2);
        assert_eq!(report.docs[0].id, "DB00002");
        assert_eq!(report.docs[0].repodb.name, "Cetuximab");
        assert_eq!(report.docs[0].repodb.indications.len(), 2);
        assert_eq!(report.docs[1].repodb.name, "Enalapril");
    }

    #[tokio::test]
    async fn test_transform_bytes_skip_revision() {
        let options = TransformOptions {
            skip_revision: true,
            ..TransformOptions::default()
        };

        let report = transform_bytes(sample_csv().as_bytes(), options).await.unwrap();

        assert_eq!(report.looked_up, 0);
        assert_eq!(report.resolved, 0);
        // Without revision the inconsistent DB00002 names stay split.
        assert_eq!(report.docs.len(), 3);
    }

    #[tokio::test]
    async fn test_indication_count_preserved() {
        let options = TransformOptions {
            skip_revision: true,
            ..TransformOptions::default()
        };

        let report = transform_bytes(sample_csv().as_bytes(), options).await.unwrap();

        let total: usize = report.docs.iter().map(|d| d.repodb.indications.len()).sum();
        assert_eq!(total, report.csv_info.row_count);
    }

    #[tokio::test]
    async fn test_unresolved_conflict_is_fatal() {
        // DB00002 is missing from the vocabulary, so its two spellings survive revision.
        let vocab = format!(
            "{VOCAB_HEADER}\nDB00584,APRD00510,Enalapril,75847-73-3,69PN84IO1A,,\n"
        );
        let mut vocab_file = tempfile::NamedTempFile::new().unwrap();
        vocab_file.write_all(vocab.as_bytes()).unwrap();

        let options = TransformOptions {
            vocab_path: Some(vocab_file.path().to_path_buf()),
            ..TransformOptions::default()
        };

        let result = transform_bytes(sample_csv().as_bytes(), options).await;

        assert!(matches!(result, Err(PipelineError::Transform(_))));
    }

    #[tokio::test]
    async fn test_headers_only_input_skips_the_lookup() {
        // The unroutable base URL turns any attempted request into an error.
        let options = TransformOptions {
            base_url: Some("http://127.0.0.1:9".to_string()),
            ..TransformOptions::default()
        };

        let report = transform_bytes(HEADER.as_bytes(), options).await.unwrap();

        assert_eq!(report.csv_info.row_count, 0);
        assert_eq!(report.looked_up, 0);
        assert_eq!(report.resolved, 0);
        assert!(report.docs.is_empty());
    }
}

//! # Repoload - repoDB drug indication transformation
//!
//! Repoload transforms the repoDB drug repurposing dataset (`full.csv`) into
//! per-drug JSON documents, revising drug names against DrugBank on the way.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │   full.csv  │────▶│   Parser    │────▶│   Revision   │────▶│  Documents  │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │  (API/vocab) │     │  (per drug) │
//! └─────────────┘     └─────────────┘     └──────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use repoload::{transform_csv, TransformOptions};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() {
//!     let report = transform_csv(Path::new("full.csv"), TransformOptions::default())
//!         .await
//!         .unwrap();
//!     println!("Transformed {} drugs", report.docs.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (RepodbRecord, RepodbDoc, NameMap)
//! - [`parser`] - repoDB CSV parsing with encoding detection
//! - [`mychem`] - mychem.info annotation client
//! - [`vocab`] - Local DrugBank vocabulary files
//! - [`transform`] - Name revision, grouping, and pipeline

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Name resolution
pub mod mychem;
pub mod vocab;

// Transformation
pub mod transform;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, LookupError, PipelineError, TransformError, VocabError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{DrugEntry, IndicationEntry, NameMap, RepodbDoc, RepodbPayload, RepodbRecord};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_encoding,
    parse_csv_bytes,
    parse_csv_file,
    parse_records,
    ParseOutcome,
};

// =============================================================================
// Re-exports - Annotation Client
// =============================================================================

pub use mychem::{MyChemClient, DEFAULT_BASE_URL, MAX_BATCH_SIZE};

// =============================================================================
// Re-exports - Vocabulary
// =============================================================================

pub use vocab::{load_vocabulary, parse_vocabulary};

// =============================================================================
// Re-exports - Revision and Grouping
// =============================================================================

pub use transform::{
    group_records,
    is_one_to_one,
    revise_drug_names,
    to_ndjson,
    unique_drugbank_ids,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    transform_bytes,
    transform_csv,
    CsvInfo,
    PipelineReport,
    TransformOptions,
};

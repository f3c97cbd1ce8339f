//! Transformation module.
//!
//! This module handles CSV to grouped-document transformation:
//! - Revise: Drug name correction against a resolver
//! - Grouper: Flat rows to per-drug documents
//! - Pipeline: Main transformation pipeline

pub mod grouper;
pub mod pipeline;
pub mod revise;

pub use grouper::{group_records, to_ndjson};
pub use pipeline::*;
pub use revise::{is_one_to_one, revise_drug_names, unique_drugbank_ids};

//! Domain models for the repoload transformation pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`RepodbRecord`] - One flat row of the repoDB CSV
//! - [`IndicationEntry`] - One indication in output shape
//! - [`DrugEntry`] - The (id, name) identity of a drug
//! - [`RepodbDoc`] - Grouped per-drug output document
//! - [`NameMap`] - Identifier to resolved-name mapping

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier → resolved-name mapping shared by both resolvers.
///
/// A value of `None` records an identifier the source explicitly reported
/// as unresolvable (a `notfound` batch entry, or an annotation without a
/// drugbank section). Such identifiers keep their original name downstream.
pub type NameMap = HashMap<String, Option<String>>;

// =============================================================================
// repoDB CSV Row
// =============================================================================

/// One flat row of the repoDB CSV (`full.csv`).
///
/// Every field stays a plain string: the literal token `"NA"` is data in
/// this dataset, not a missing value, and must survive untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepodbRecord {
    /// Drug name as shipped in the CSV (revised during the pipeline).
    pub drug_name: String,
    /// Primary DrugBank identifier, e.g. `"DB00002"`.
    pub drugbank_id: String,
    /// Indication name.
    pub ind_name: String,
    /// UMLS concept identifier of the indication.
    pub ind_id: String,
    /// ClinicalTrials.gov identifier, or `"NA"`.
    #[serde(rename = "NCT")]
    pub nct: String,
    /// Approval status (`"Approved"`, `"Terminated"`, ...).
    pub status: String,
    /// Trial phase, or `"NA"`.
    pub phase: String,
    /// Free-text status detail, or `"NA"`.
    #[serde(rename = "DetailedStatus")]
    pub detailed_status: String,
}

// =============================================================================
// Indication Entry
// =============================================================================

/// One indication of a drug, in output document shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicationEntry {
    /// Indication name.
    pub name: String,
    /// UMLS concept identifier.
    pub umls: String,
    /// ClinicalTrials.gov identifier, or `"NA"`.
    #[serde(rename = "NCT")]
    pub nct: String,
    /// Approval status.
    pub status: String,
    /// Trial phase, or `"NA"`.
    pub phase: String,
    /// Cleaned status detail.
    pub detailed_status: String,
}

impl IndicationEntry {
    /// Build an indication entry from a repoDB row.
    ///
    /// Some `DetailedStatus` values contain a line break followed by four
    /// spaces; each such sequence is replaced with a single space.
    pub fn from_record(record: &RepodbRecord) -> Self {
        Self {
            name: record.ind_name.clone(),
            umls: record.ind_id.clone(),
            nct: record.nct.clone(),
            status: record.status.clone(),
            phase: record.phase.clone(),
            detailed_status: record.detailed_status.replace("\n    ", " "),
        }
    }
}

// =============================================================================
// Drug Entry
// =============================================================================

/// The identity of a drug: DrugBank identifier plus its (revised) name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugEntry {
    /// DrugBank identifier.
    pub id: String,
    /// Drug name.
    pub name: String,
}

impl DrugEntry {
    /// Create a drug entry.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// =============================================================================
// Grouped Document (repoDB format)
// =============================================================================

/// The nested payload under the `repodb` key of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepodbPayload {
    /// DrugBank identifier, equal to the document `_id`.
    pub drugbank: String,
    /// Drug name.
    pub name: String,
    /// All indications of this drug, in source row order.
    pub indications: Vec<IndicationEntry>,
}

/// One output document per unique drug.
///
/// This is the final output format:
///
/// ```json
/// {
///     "_id": "DB00584",
///     "repodb": {
///         "drugbank": "DB00584",
///         "name": "enalapril",
///         "indications": [
///             {
///                 "name": "Hypertensive disease",
///                 "umls": "C0020538",
///                 "NCT": "NA",
///                 "status": "Approved",
///                 "phase": "NA",
///                 "detailed_status": "NA"
///             }
///         ]
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepodbDoc {
    /// Document primary key, the DrugBank identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Nested drug payload.
    pub repodb: RepodbPayload,
}

impl RepodbDoc {
    /// Assemble a document from a drug entry and its indications.
    pub fn new(drug: DrugEntry, indications: Vec<IndicationEntry>) -> Self {
        Self {
            id: drug.id.clone(),
            repodb: RepodbPayload {
                drugbank: drug.id,
                name: drug.name,
                indications,
            },
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

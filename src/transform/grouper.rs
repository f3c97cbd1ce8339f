//! Group flat repoDB rows into per-drug documents.
//!
//! One drug may have many indications; each drug's rows collapse into a
//! single document holding the indication list.
//!
//! # Architecture
//!
//! ```text
//! CSV input (flat rows)               →  Grouped output (documents)
//! ┌───────────────────────────────┐      ┌───────────────────────────┐
//! │ DB00584  enalapril  C3698411  │      │ _id: DB00584              │
//! │ DB00584  enalapril  C0020538  │  →   │ indications: [2 entries]  │
//! │ DB00002  cetuximab  C0007102  │      ├───────────────────────────┤
//! └───────────────────────────────┘      │ _id: DB00002              │
//!                                        │ indications: [1 entry]    │
//!                                        └───────────────────────────┘
//! ```

use std::collections::BTreeMap;

use crate::error::TransformResult;
use crate::models::{DrugEntry, IndicationEntry, RepodbDoc, RepodbRecord};

/// Group rows by `(drugbank_id, drug_name)` into per-drug documents.
///
/// Groups come out in ascending key order; within a group the indications
/// keep their source row order. The returned sequence is finite and
/// consumed in a single pass.
///
/// Rows with the same identifier but different names end up in different
/// documents, which is why names are revised before grouping.
pub fn group_records(records: Vec<RepodbRecord>) -> impl Iterator<Item = RepodbDoc> {
    let mut groups: BTreeMap<(String, String), Vec<IndicationEntry>> = BTreeMap::new();

    for record in &records {
        let key = (record.drugbank_id.clone(), record.drug_name.clone());
        groups
            .entry(key)
            .or_default()
            .push(IndicationEntry::from_record(record));
    }

    groups
        .into_iter()
        .map(|((id, name), indications)| RepodbDoc::new(DrugEntry::new(id, name), indications))
}

/// Serialize documents as NDJSON, one JSON document per line.
pub fn to_ndjson(docs: &[RepodbDoc]) -> TransformResult<String> {
    let lines: Vec<String> = docs
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<_, _>>()?;
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(drug_name: &str, drugbank_id: &str, ind_name: &str, ind_id: &str) -> RepodbRecord {
        RepodbRecord {
            drug_name: drug_name.into(),
            drugbank_id: drugbank_id.into(),
            ind_name: ind_name.into(),
            ind_id: ind_id.into(),
            nct: "NA".into(),
            status: "Approved".into(),
            phase: "NA".into(),
            detailed_status: "NA".into(),
        }
    }

    #[test]
    fn test_single_drug_multiple_indications() {
        let records = vec![
            record(
                "enalapril",
                "DB00584",
                "Asymptomatic left ventricular systolic dysfunction",
                "C3698411",
            ),
            record("enalapril", "DB00584", "Hypertensive disease", "C0020538"),
        ];

        let docs: Vec<RepodbDoc> = group_records(records).collect();

        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.id, "DB00584");
        assert_eq!(doc.repodb.name, "enalapril");
        assert_eq!(doc.repodb.indications.len(), 2);
        assert_eq!(doc.repodb.indications[1].umls, "C0020538");
    }

    #[test]
    fn test_groups_sorted_by_identifier() {
        let records = vec![
            record("enalapril", "DB00584", "Hypertensive disease", "C0020538"),
            record("cetuximab", "DB00002", "Malignant tumor of colon", "C0007102"),
        ];

        let docs: Vec<RepodbDoc> = group_records(records).collect();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "DB00002");
        assert_eq!(docs[1].id, "DB00584");
    }

    #[test]
    fn test_indications_keep_row_order() {
        let records = vec![
            record("enalapril", "DB00584", "z-indication", "C9"),
            record("enalapril", "DB00584", "a-indication", "C1"),
        ];

        let docs: Vec<RepodbDoc> = group_records(records).collect();

        assert_eq!(docs[0].repodb.indications[0].name, "z-indication");
        assert_eq!(docs[0].repodb.indications[1].name, "a-indication");
    }

    #[test]
    fn test_doc_id_equals_contained_drugbank() {
        let records = vec![
            record("cetuximab", "DB00002", "Malignant tumor of colon", "C0007102"),
            record("enalapril", "DB00584", "Hypertensive disease", "C0020538"),
        ];

        for doc in group_records(records) {
            assert_eq!(doc.id, doc.repodb.drugbank);
        }
    }

    #[test]
    fn test_inconsistent_names_split_the_drug() {
        // Without revision, DB00002 falls apart into two documents.
        let records = vec![
            record("cetuximab", "DB00002", "Malignant tumor of colon", "C0007102"),
            record("NA", "DB00002", "Squamous cell carcinoma", "C0007137"),
        ];

        let docs: Vec<RepodbDoc> = group_records(records).collect();

        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| d.id == "DB00002"));
    }

    #[test]
    fn test_indication_counts_match_input_rows() {
        let records = vec![
            record("cetuximab", "DB00002", "Malignant tumor of colon", "C0007102"),
            record("cetuximab", "DB00002", "Squamous cell carcinoma", "C0007137"),
            record("cetuximab", "DB00002", "Non-Small Cell Lung Carcinoma", "C0007131"),
            record("enalapril", "DB00584", "Hypertensive disease", "C0020538"),
        ];

        let mut rows_per_id: HashMap<String, usize> = HashMap::new();
        for r in &records {
            *rows_per_id.entry(r.drugbank_id.clone()).or_insert(0) += 1;
        }

        for doc in group_records(records) {
            assert_eq!(doc.repodb.indications.len(), rows_per_id[&doc.id]);
        }
    }

    #[test]
    fn test_no_rows_no_documents() {
        assert_eq!(group_records(Vec::new()).count(), 0);
    }

    #[test]
    fn test_ndjson_one_line_per_document() {
        let records = vec![
            record("cetuximab", "DB00002", "Malignant tumor of colon", "C0007102"),
            record("enalapril", "DB00584", "Hypertensive disease", "C0020538"),
        ];
        let docs: Vec<RepodbDoc> = group_records(records).collect();

        let ndjson = to_ndjson(&docs).unwrap();
        let lines: Vec<&str> = ndjson.lines().collect();

        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["_id"], "DB00002");
        assert_eq!(first["repodb"]["indications"][0]["umls"], "C0007102");
    }
}

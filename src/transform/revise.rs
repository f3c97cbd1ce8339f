//! Drug name revision against a resolved name mapping.
//!
//! The shipped repoDB file has rows where one DrugBank ID carries several
//! different `drug_name` strings (DB00002 appears as "cetuximab", "NA" and
//! "dexamethasone phosphate"). Revision overwrites each row's name with
//! the resolved canonical one, keeps the original where resolution found
//! nothing, and then requires `drug_name` ↔ `drugbank_id` to be
//! one-to-one.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::error::{TransformError, TransformResult};
use crate::models::{NameMap, RepodbRecord};

/// Unique DrugBank identifiers, in first-seen row order.
pub fn unique_drugbank_ids(records: &[RepodbRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for record in records {
        if seen.insert(record.drugbank_id.as_str()) {
            ids.push(record.drugbank_id.clone());
        }
    }

    ids
}

/// Overwrite `drug_name` wherever the mapping resolved a name.
///
/// Identifiers missing from the map, or mapped to `None`, keep their
/// original name.
pub fn apply_name_map(records: &mut [RepodbRecord], names: &NameMap) {
    for record in records.iter_mut() {
        if let Some(Some(new_name)) = names.get(&record.drugbank_id) {
            record.drug_name = new_name.clone();
        }
    }
}

/// Check that two record fields are in one-to-one correspondence.
///
/// Works on the deduplicated pair set: every `a` value must pair with
/// exactly one `b` value and vice versa. An empty record set passes.
pub fn is_one_to_one<'a, A, B>(records: &'a [RepodbRecord], field_a: A, field_b: B) -> bool
where
    A: Fn(&'a RepodbRecord) -> &'a str,
    B: Fn(&'a RepodbRecord) -> &'a str,
{
    let mut pairs = HashSet::new();
    for record in records {
        pairs.insert((field_a(record), field_b(record)));
    }

    let mut a_counts: HashMap<&str, usize> = HashMap::new();
    let mut b_counts: HashMap<&str, usize> = HashMap::new();
    for &(a, b) in &pairs {
        *a_counts.entry(a).or_insert(0) += 1;
        *b_counts.entry(b).or_insert(0) += 1;
    }

    a_counts.values().all(|&n| n == 1) && b_counts.values().all(|&n| n == 1)
}

/// Revise drug names in place and enforce the one-to-one invariant.
///
/// A conflict left after revision is fatal: the grouped output would
/// split or merge drugs, so the caller must not proceed.
pub fn revise_drug_names(records: &mut [RepodbRecord], names: &NameMap) -> TransformResult<()> {
    apply_name_map(records, names);

    if !is_one_to_one(records, |r| &r.drug_name, |r| &r.drugbank_id) {
        return Err(TransformError::NameConflict(describe_conflict(records)));
    }

    Ok(())
}

/// Name the first offending pair for the error message.
fn describe_conflict(records: &[RepodbRecord]) -> String {
    let mut names_per_id: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut ids_per_name: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for record in records {
        names_per_id
            .entry(&record.drugbank_id)
            .or_default()
            .insert(&record.drug_name);
        ids_per_name
            .entry(&record.drug_name)
            .or_default()
            .insert(&record.drugbank_id);
    }

    if let Some((id, names)) = names_per_id.iter().find(|(_, names)| names.len() > 1) {
        let sample: Vec<&str> = names.iter().take(3).copied().collect();
        return format!("{} maps to {} names ({})", id, names.len(), sample.join(", "));
    }
    if let Some((name, ids)) = ids_per_name.iter().find(|(_, ids)| ids.len() > 1) {
        let sample: Vec<&str> = ids.iter().take(3).copied().collect();
        return format!("'{}' maps to {} ids ({})", name, ids.len(), sample.join(", "));
    }

    "no conflicting pair found".to_string()
}

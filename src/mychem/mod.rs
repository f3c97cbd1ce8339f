//! Client for the mychem.info chemical annotation service.
//!
//! Resolves DrugBank identifiers to canonical drug names:
//!
//! - `GET  {base}/chem/{id}` - single annotation
//! - `POST {base}/chem`      - batch annotation, at most 1000 ids per request
//!
//! See <https://docs.mychem.info/en/latest/doc/chem_annotation_service.html>
//! for the service specification.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use repoload::mychem::MyChemClient;
//!
//! let client = MyChemClient::from_env();
//! let names = client.query_drugbank_names(&ids).await?;
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;

use crate::error::{LookupError, LookupResult};
use crate::models::NameMap;

/// Public annotation service base URL.
pub const DEFAULT_BASE_URL: &str = "http://mychem.info/v1";

/// The service rejects POST payloads with more than 1000 ids.
pub const MAX_BATCH_SIZE: usize = 1000;

/// Only the drugbank name is requested back.
const ANNOTATION_FIELDS: &str = "drugbank.name";

// =============================================================================
// Response shapes
// =============================================================================

/// Annotation returned by `GET /chem/{id}`.
///
/// A hit looks like `{"_id": "DB00002", "_version": 1, "drugbank":
/// {"_license": "...", "name": "Cetuximab"}}`; an annotation without a
/// drugbank source simply lacks the `drugbank` key.
#[derive(Debug, Deserialize)]
struct ChemAnnotation {
    drugbank: Option<DrugbankField>,
}

/// The drugbank sub-document, filtered down to the name.
#[derive(Debug, Deserialize)]
struct DrugbankField {
    name: String,
}

/// One element of the `POST /chem` response array.
///
/// Unknown identifiers come back as `{"query": "DB12430", "notfound": true}`
/// with no drugbank section.
#[derive(Debug, Deserialize)]
struct BatchEntry {
    query: String,
    drugbank: Option<DrugbankField>,
}

/// `POST /chem` request body.
#[derive(Debug, Serialize)]
struct BatchRequest {
    /// Comma-joined identifiers, e.g. `"DB00002,DB12430"`.
    ids: String,
    fields: String,
}

// =============================================================================
// Client
// =============================================================================

/// mychem.info annotation client.
#[derive(Debug, Clone)]
pub struct MyChemClient {
    http: reqwest::Client,
    base_url: String,
    batch_size: usize,
}

impl Default for MyChemClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MyChemClient {
    /// Create a client against the public mychem.info service.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            batch_size: MAX_BATCH_SIZE,
        }
    }

    /// Create a client honoring the `MYCHEM_BASE_URL` environment variable.
    pub fn from_env() -> Self {
        // Try loading .env file
        let _ = dotenvy::dotenv();

        match env::var("MYCHEM_BASE_URL") {
            Ok(url) if !url.is_empty() => Self::new().with_base_url(&url),
            _ => Self::new(),
        }
    }

    /// Set the service base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the POST batch size, clamped to `1..=1000`.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    /// Find the drugbank name of a single identifier.
    ///
    /// Returns `None` when the annotation carries no drugbank section.
    /// An unknown identifier is a 404 from the service and surfaces as
    /// [`LookupError::HttpError`].
    pub async fn query_drugbank_name(&self, drugbank_id: &str) -> LookupResult<Option<String>> {
        let url = format!("{}/chem/{}", self.base_url, drugbank_id);
        debug!(id = drugbank_id, "requesting chem annotation");

        let response = self
            .http
            .get(&url)
            .query(&[("fields", ANNOTATION_FIELDS)])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let annotation: ChemAnnotation = serde_json::from_str(&body)
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

        Ok(annotation.drugbank.map(|d| d.name))
    }

    /// Find the drugbank names of many identifiers.
    ///
    /// Lists longer than the batch size are split into consecutive chunks
    /// and queried one request at a time; the per-request maps are merged
    /// by key union. Identifiers never repeat across chunks, so merge
    /// order does not matter.
    pub async fn query_drugbank_names(&self, drugbank_ids: &[String]) -> LookupResult<NameMap> {
        if drugbank_ids.len() <= self.batch_size {
            return self.query_batch(drugbank_ids).await;
        }

        let mut id_name_map = NameMap::new();
        for batch in drugbank_ids.chunks(self.batch_size) {
            let page = self.query_batch(batch).await?;
            id_name_map.extend(page);
        }

        Ok(id_name_map)
    }

    /// One POST query, ignoring the payload cap.
    async fn query_batch(&self, drugbank_ids: &[String]) -> LookupResult<NameMap> {
        let url = format!("{}/chem", self.base_url);
        debug!(ids = drugbank_ids.len(), "requesting chem annotation batch");

        let request_body = BatchRequest {
            ids: drugbank_ids.join(","),
            fields: ANNOTATION_FIELDS.to_string(),
        };

        let response = self
            .http
            .post(&url)
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let entries: Vec<BatchEntry> = serde_json::from_str(&body)
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

        Ok(collect_name_map(entries))
    }
}

/// Collapse response entries into the id → name mapping.
///
/// Entries without a drugbank section (notfound, or no drugbank source)
/// map to `None`.
fn collect_name_map(entries: Vec<BatchEntry>) -> NameMap {
    entries
        .into_iter()
        .map(|entry| (entry.query, entry.drugbank.map(|d| d.name)))
        .collect()
}

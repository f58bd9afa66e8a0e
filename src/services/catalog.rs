use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use super::{LandingPageService, ServiceError, SitemapService};
use crate::types::{JurisdictionCount, JurisdictionSummary};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("frontend base URL cannot carry paths: {0}")]
    BaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub id: String,
    pub jurisdiction: String,
}

/// Point-in-time copy of the dataset identifiers the API exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSnapshot {
    /// ISO 3166-1 alpha-3 codes
    pub jurisdictions: Vec<String>,
    pub answers: Vec<AnswerRecord>,
    pub questions: Vec<String>,
    pub literature: Vec<String>,
    pub regional_instruments: Vec<String>,
    pub international_instruments: Vec<String>,
    pub court_decisions: Vec<String>,
    pub domestic_instruments: Vec<String>,
}

/// Frontend route prefix for each entity kind, in sitemap order.
const ENTITY_ROUTES: [&str; 6] = [
    "question",
    "literature",
    "regional-instrument",
    "international-instrument",
    "court-decision",
    "domestic-instrument",
];

impl CatalogSnapshot {
    fn entity_ids(&self) -> [&[String]; 6] {
        [
            &self.questions,
            &self.literature,
            &self.regional_instruments,
            &self.international_instruments,
            &self.court_decisions,
            &self.domestic_instruments,
        ]
    }

    /// Answer counts for every listed jurisdiction, ordered by code.
    /// Answers pointing at unlisted jurisdictions are ignored.
    pub fn jurisdiction_counts(&self) -> Vec<JurisdictionCount> {
        let mut counts: BTreeMap<String, u64> = self
            .jurisdictions
            .iter()
            .map(|code| (normalize_alpha3(code), 0))
            .collect();

        for answer in &self.answers {
            match counts.get_mut(&normalize_alpha3(&answer.jurisdiction)) {
                Some(n) => *n += 1,
                None => debug!(
                    "Answer '{}' references unknown jurisdiction '{}'",
                    answer.id, answer.jurisdiction
                ),
            }
        }

        counts
            .into_iter()
            .map(|(jurisdiction, n)| JurisdictionCount { jurisdiction, n })
            .collect()
    }
}

fn normalize_alpha3(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Dataset-backed landing page and sitemap collaborator.
#[derive(Debug, Clone)]
pub struct CatalogService {
    snapshot: CatalogSnapshot,
    base_url: Url,
}

impl CatalogService {
    pub fn new(snapshot: CatalogSnapshot, base_url: Url) -> Result<Self, CatalogError> {
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::BaseUrl(base_url.to_string()));
        }
        Ok(Self { snapshot, base_url })
    }

    pub fn empty(base_url: Url) -> Result<Self, CatalogError> {
        Self::new(CatalogSnapshot::default(), base_url)
    }

    /// Load a snapshot from disk. `.yaml`/`.yml` files are read as YAML,
    /// anything else as JSON.
    pub fn load(path: impl AsRef<Path>, base_url: Url) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let snapshot: CatalogSnapshot = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)?,
            _ => serde_json::from_str(&raw)?,
        };

        info!(
            "Loaded catalog from {}: {} jurisdictions, {} answers",
            path.display(),
            snapshot.jurisdictions.len(),
            snapshot.answers.len()
        );
        Self::new(snapshot, base_url)
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    fn entity_url(&self, route: &str, id: &str) -> Result<String, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::Data("frontend base URL cannot carry paths".into()))?
            .pop_if_empty()
            .push(route)
            .push(id);
        Ok(url.into())
    }
}

#[async_trait]
impl LandingPageService for CatalogService {
    async fn get_jurisdictions(&self) -> Result<Vec<JurisdictionSummary>, ServiceError> {
        Ok(self
            .snapshot
            .jurisdiction_counts()
            .iter()
            .map(JurisdictionSummary::from)
            .collect())
    }
}

#[async_trait]
impl SitemapService for CatalogService {
    async fn get_all_frontend_urls(&self) -> Result<Vec<String>, ServiceError> {
        let mut urls = Vec::new();
        for (route, ids) in ENTITY_ROUTES.iter().zip(self.snapshot.entity_ids()) {
            let mut seen = std::collections::HashSet::new();
            for id in ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
                if seen.insert(id) {
                    urls.push(self.entity_url(route, id)?);
                }
            }
        }
        Ok(urls)
    }
}

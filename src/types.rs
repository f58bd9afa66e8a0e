//! Request and response schemas shared by handlers and collaborators

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /classify_query`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyQueryRequest {
    pub query: String,
}

/// Number of answers recorded for one jurisdiction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionCount {
    pub jurisdiction: String,
    pub n: u64,
}

/// Landing-page listing item. `has_data` is 0 or 1 on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionSummary {
    pub alpha3: String,
    pub has_data: u8,
}

impl JurisdictionSummary {
    pub fn new(alpha3: impl Into<String>, has_data: bool) -> Self {
        Self {
            alpha3: alpha3.into(),
            has_data: u8::from(has_data),
        }
    }
}

impl From<&JurisdictionCount> for JurisdictionSummary {
    fn from(count: &JurisdictionCount) -> Self {
        Self::new(count.jurisdiction.clone(), count.n > 0)
    }
}

/// Search filters as sent by the frontend: an object, a list or a bare string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Filters {
    Map(Map<String, Value>),
    List(Vec<Value>),
    Text(String),
}

/// Telemetry record describing one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryLog {
    pub search_string: String,
    #[serde(default)]
    pub filters: Option<Filters>,
    pub results_count: i64,
    pub route: String,
    #[serde(default = "unknown_hostname")]
    pub hostname: String,
}

fn unknown_hostname() -> String {
    "Unknown".to_string()
}

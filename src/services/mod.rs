//! Collaborators behind the HTTP handlers.
//!
//! Handlers only see the traits below; `AppState` holds them as trait objects
//! so tests can swap in fixed implementations.

pub mod catalog;
pub mod classifier;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::types::JurisdictionSummary;

pub use catalog::{CatalogError, CatalogService, CatalogSnapshot};
pub use classifier::{HttpQueryClassifier, UnconfiguredClassifier};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("data error: {0}")]
    Data(String),
}

#[async_trait]
pub trait LandingPageService: Send + Sync {
    /// Every known jurisdiction with a flag telling whether answers exist for it.
    async fn get_jurisdictions(&self) -> Result<Vec<JurisdictionSummary>, ServiceError>;
}

#[async_trait]
pub trait SitemapService: Send + Sync {
    /// Absolute frontend URLs for every entity the dataset knows about.
    async fn get_all_frontend_urls(&self) -> Result<Vec<String>, ServiceError>;
}

#[async_trait]
pub trait QueryClassifier: Send + Sync {
    async fn classify_user_query(&self, query: &str) -> Result<Value, ServiceError>;
}

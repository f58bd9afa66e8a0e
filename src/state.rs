use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::auth::{JwtError, JwtVerifier};
use crate::config::AppConfig;
use crate::middleware::ApiKeyVerifier;
use crate::services::{
    CatalogError, CatalogService, HttpQueryClassifier, LandingPageService, QueryClassifier,
    ServiceError, SitemapService, UnconfiguredClassifier,
};

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Jwt(#[from] JwtError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Everything handlers and guards need, shared read-only across requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtVerifier>,
    pub api_key: Arc<ApiKeyVerifier>,
    pub landing_page: Arc<dyn LandingPageService>,
    pub sitemap: Arc<dyn SitemapService>,
    pub classifier: Arc<dyn QueryClassifier>,
}

impl AppState {
    /// Wire explicit collaborators; verifiers are derived from `config`.
    pub fn new(
        config: AppConfig,
        landing_page: Arc<dyn LandingPageService>,
        sitemap: Arc<dyn SitemapService>,
        classifier: Arc<dyn QueryClassifier>,
    ) -> Result<Self, StateError> {
        let jwt = JwtVerifier::new(config.security.jwt_secret.expose())?;
        let api_key = ApiKeyVerifier::new(config.security.api_key.as_ref());

        Ok(Self {
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            api_key: Arc::new(api_key),
            landing_page,
            sitemap,
            classifier,
        })
    }

    /// Build the production collaborators described by `config`.
    pub fn from_config(config: AppConfig) -> Result<Self, StateError> {
        let services = &config.services;

        let catalog = match &services.catalog_path {
            Some(path) => CatalogService::load(path, services.frontend_base_url.clone())?,
            None => {
                warn!("COLD_CATALOG_PATH not set; serving an empty catalog");
                CatalogService::empty(services.frontend_base_url.clone())?
            }
        };
        let catalog = Arc::new(catalog);

        let classifier: Arc<dyn QueryClassifier> = match &services.classifier_url {
            Some(url) => {
                info!("Query classifier endpoint: {}", url);
                Arc::new(HttpQueryClassifier::new(
                    url.clone(),
                    services.mixedbread_api_key.clone(),
                )?)
            }
            None => {
                warn!("COLD_CLASSIFIER_URL not set; /classify_query will return 503");
                Arc::new(UnconfiguredClassifier)
            }
        };

        if config.security.api_key.is_none() {
            warn!("API_KEY not set; API-key protected routes will refuse every request");
        }

        Self::new(config, catalog.clone(), catalog, classifier)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("jwt", &self.jwt)
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

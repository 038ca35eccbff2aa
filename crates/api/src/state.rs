use std::sync::Arc;

use devshare_core::{RepositoryFactory, ServiceFactory};

use crate::config::AppConfig;

/// Shared by every handler. Cheap to clone.
#[derive(Debug)]
pub struct AppState<F> {
    pub services: ServiceFactory<F>,
    pub config: Arc<AppConfig>,
}

impl<F: RepositoryFactory> AppState<F> {
    pub fn new(repos: F, config: AppConfig) -> Self {
        Self {
            services: ServiceFactory::new(repos),
            config: Arc::new(config),
        }
    }
}

impl<F: Clone> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            services: self.services.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

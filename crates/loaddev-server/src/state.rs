//! Shared handler state.

use std::sync::Arc;

use loaddev_db::service::LoadDevService;

#[derive(Clone)]
pub struct AppState {
    service: Arc<LoadDevService>,
}

impl AppState {
    #[must_use]
    pub fn new(service: LoadDevService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    #[must_use]
    pub fn service(&self) -> &LoadDevService {
        &self.service
    }
}

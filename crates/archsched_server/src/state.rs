//! Shared application state handed to every handler.

use crate::settings::ShareSettings;
use archsched_core::{Clock, InMemoryShareStore, ShareService};
use std::sync::Arc;

pub struct AppState {
    pub shares: ShareService<InMemoryShareStore>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(settings: &ShareSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            shares: ShareService::new(
                InMemoryShareStore::new(),
                clock,
                settings.public_base_url.trim(),
            ),
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}

// Application state module
// Shared configuration, store handle and cached flags

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::types::Config;
use crate::store::EntryStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn EntryStore>,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(config: &Config, store: Arc<dyn EntryStore>) -> Self {
        Self {
            config: config.clone(),
            store,
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
        }
    }
}

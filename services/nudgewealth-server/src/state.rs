//! Shared application state

use std::sync::Arc;

use chrono::{DateTime, Utc};
use nudgewealth_engine::TransactionEngine;
use nudgewealth_store::RecordStore;

/// Engine over whichever store backend was configured
pub type Engine = TransactionEngine<dyn RecordStore>;

/// Application state shared by every handler
pub struct AppState {
    pub engine: Engine,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(engine: Engine) -> Arc<Self> {
        Arc::new(Self {
            engine,
            started_at: Utc::now(),
        })
    }
}

// Application state module
// Shared, read-only state handed to every connection

use super::types::Config;
use crate::prediction::RevenueModel;

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Artifacts loaded at startup, immutable afterwards
    pub model: RevenueModel,
}

impl AppState {
    pub const fn new(config: Config, model: RevenueModel) -> Self {
        Self { config, model }
    }

    /// Whether access lines are written for each request
    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}

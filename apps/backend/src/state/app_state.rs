use std::sync::Arc;

use super::security_config::SecurityConfig;
use crate::domain::DeckCatalog;
use crate::services::{GameFlowService, RoomRegistry};
use crate::ws::hub::SessionHub;

/// Shared application state handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub flow: GameFlowService,
    pub hub: Arc<SessionHub>,
    pub security: SecurityConfig,
}

impl AppState {
    pub fn new(decks: DeckCatalog, security: SecurityConfig) -> Self {
        let hub = Arc::new(SessionHub::new());
        let registry = Arc::new(RoomRegistry::new(Arc::new(decks)));
        Self {
            flow: GameFlowService::new(registry, hub.clone()),
            hub,
            security,
        }
    }

    /// State with only the embedded standard deck.
    pub fn for_tests(security: SecurityConfig) -> Self {
        let decks = DeckCatalog::with_standard().unwrap_or_default();
        Self::new(decks, security)
    }
}

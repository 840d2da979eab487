//! Service container for dependency injection
//!
//! Wires up the game service with its dependencies.

use std::sync::Arc;

use crate::application::services::GameService;
use crate::config::Settings;
use crate::infrastructure::traits::{Console, StdConsole};

/// Container holding shared dependencies for application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Terminal abstraction
    pub console: Arc<dyn Console>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(StdConsole))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, console: Arc<dyn Console>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, console }
    }

    /// A game service over a fresh default tree.
    pub fn game_service(&self) -> GameService {
        GameService::new(Arc::clone(&self.console), Arc::clone(&self.settings))
    }
}

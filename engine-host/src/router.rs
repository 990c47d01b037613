//! Hash-route resolution
//!
//! Routes look like `#breakout`. Anything that does not name a registered
//! game resolves to the default game.

use engine_core::registry;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    default_game: String,
}

/// The game id a route names, without checking the registry
pub fn route_id(route: &str) -> &str {
    route.trim().trim_start_matches('#').trim()
}

impl Router {
    pub fn new(default_game: impl Into<String>) -> Self {
        Self {
            default_game: default_game.into(),
        }
    }

    pub fn default_game(&self) -> &str {
        &self.default_game
    }

    pub fn resolve(&self, route: &str) -> String {
        let id = route_id(route);
        if registry::is_registered(id) {
            return id.to_string();
        }
        if !id.is_empty() {
            warn!(route, fallback = %self.default_game, "Unknown route");
        }
        self.default_game.clone()
    }
}

//! Static game registry
//!
//! Games are registered under their route id at start-up and instantiated
//! by id whenever the host switches games.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use tracing::warn;

use crate::erased::ErasedGame;

/// Factory function type for creating game instances
pub type GameFactory = fn() -> Box<dyn ErasedGame>;

/// Thread-safe registry mapping game id to factory function
static REGISTRY: Lazy<Mutex<HashMap<String, GameFactory>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn registry() -> MutexGuard<'static, HashMap<String, GameFactory>> {
    // Factories are plain fn pointers, so a poisoned map is still consistent
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Register a game with the global registry
///
/// Usually called through the `register_game!` macro from the host's
/// start-up code.
///
/// # Arguments
///
/// * `game_id` - Unique route identifier (e.g., "breakout")
/// * `factory` - Function that creates new, uninitialised instances
pub fn register_game(game_id: String, factory: GameFactory) {
    let mut registry = registry();
    if registry.contains_key(&game_id) {
        warn!("Overriding existing game registration for '{}'", game_id);
    }
    registry.insert(game_id, factory);
}

/// Create a new game instance by id
///
/// Returns `None` if nothing is registered under `game_id`.
pub fn create_game(game_id: &str) -> Option<Box<dyn ErasedGame>> {
    let factory = registry().get(game_id).copied();
    factory.map(|factory| factory())
}

/// All registered game ids, sorted
pub fn list_registered_games() -> Vec<String> {
    let mut ids: Vec<String> = registry().keys().cloned().collect();
    ids.sort();
    ids
}

/// Check if a game is registered
pub fn is_registered(game_id: &str) -> bool {
    registry().contains_key(game_id)
}

/// Clear all registered games (mainly for testing)
pub fn clear_registry() {
    registry().clear();
}

/// Convenience macro for registering games
///
/// Creates the factory function wrapping `<$game_type>::default()` in a
/// `GameAdapter` and registers it.
///
/// # Example
///
/// ```ignore
/// register_game!(Breakout, "breakout");
/// ```
#[macro_export]
macro_rules! register_game {
    ($game_type:ty, $game_id:expr) => {{
        fn factory() -> Box<dyn $crate::erased::ErasedGame> {
            Box::new($crate::adapter::GameAdapter::new(<$game_type>::default()))
        }
        $crate::registry::register_game($game_id.to_string(), factory);
    }};
}

//! Erased Game interface for runtime polymorphism
//!
//! The engine only ever holds a `Box<dyn ErasedGame>`. Every typed game is
//! converted to this interface via the adapter layer, which also enforces
//! the per-instance lifecycle.

use crate::input::InputEvent;
use crate::render::Canvas;
use crate::surface::Surface;
use crate::typed::{Capabilities, GameId};

/// Lifecycle phase of one game instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Running,
    Destroyed,
}

/// Lifecycle misuse reported by an erased game
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Game '{0}' is already initialized")]
    AlreadyInitialized(String),
    #[error("Game '{game}' is not running (phase: {phase:?})")]
    NotRunning { game: String, phase: Phase },
    #[error("Game '{0}' was already destroyed")]
    AlreadyDestroyed(String),
}

/// Erased game trait driven by the engine
///
/// Calls outside the `Running` phase are rejected with a `LifecycleError`
/// rather than reaching the game.
pub trait ErasedGame: 'static {
    /// Get game identification information
    fn game_id(&self) -> GameId;

    /// Get game capabilities and surface requirements
    fn capabilities(&self) -> Capabilities;

    /// Current lifecycle phase
    fn phase(&self) -> Phase;

    /// Initialise against `surface`
    ///
    /// # Arguments
    ///
    /// * `surface` - Surface to resize, register listeners on, and open audio from
    /// * `seed` - Seed for the instance's random number generator
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInitialized` or `AlreadyDestroyed` on a second call
    fn init(&mut self, surface: &mut Surface, seed: u64) -> Result<(), LifecycleError>;

    /// Advance the simulation by `dt` seconds
    fn update(&mut self, dt: f64) -> Result<(), LifecycleError>;

    /// Deliver an input event
    fn handle_input(&mut self, event: &InputEvent) -> Result<(), LifecycleError>;

    /// Append this frame's draw commands
    fn render(&self, canvas: &mut Canvas) -> Result<(), LifecycleError>;

    /// Release listeners and audio and enter the `Destroyed` phase
    ///
    /// Destroying a game that was never initialised is allowed and simply
    /// marks it destroyed.
    fn destroy(&mut self) -> Result<(), LifecycleError>;
}

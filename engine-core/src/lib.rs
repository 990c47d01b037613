//! Core traits and types for the arcade engine shell
//!
//! This crate provides the abstractions shared by the host and every game:
//! - `Game`: Typed lifecycle trait implemented by each game crate
//! - `ErasedGame`: Object-safe interface the engine drives
//! - `GameAdapter`: Conversion from typed to erased, owner of scoped resources
//! - `Engine`: The frame-loop driver
//! - `Registry`: Static registration system for games

pub mod adapter;
pub mod audio;
pub mod engine;
pub mod erased;
pub mod geom;
pub mod input;
pub mod registry;
pub mod render;
pub mod surface;
pub mod timing;
pub mod typed;

// Re-export main types for convenience
pub use adapter::GameAdapter;
pub use engine::{Engine, FrameScheduler, StopHandle};
pub use erased::{ErasedGame, LifecycleError, Phase};
pub use registry::{create_game, register_game, GameFactory};
pub use typed::Game;

//! Game registry initialization
//!
//! Registers every mini-game under its route id.

use engine_core::register_game;
use engine_core::registry::list_registered_games;
use tracing::{debug, info};

use games_boat::Boat;
use games_breakout::Breakout;
use games_pacman::PacMan;
use games_placeholder::Placeholder;
use games_run::Run;
use games_solitaire::Solitaire;
use games_tarot::Tarot;

/// Route ids of every bundled game, in menu order
pub const GAME_IDS: [&str; 7] = ["placeholder", "boat", "breakout", "pacman", "solitaire", "tarot", "run"];

/// Register all bundled games with the global registry
///
/// Safe to call more than once; later calls re-register the same factories.
pub fn initialize_registry() {
    register_game!(Placeholder, "placeholder");
    register_game!(Boat, "boat");
    register_game!(Breakout, "breakout");
    register_game!(PacMan, "pacman");
    register_game!(Solitaire, "solitaire");
    register_game!(Tarot, "tarot");
    register_game!(Run, "run");

    let ids = list_registered_games();
    info!("Initialized game registry with {} games", ids.len());
    for id in &ids {
        debug!("  - {}", id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::registry::{create_game, is_registered};
    use engine_core::render::Canvas;
    use engine_core::surface::Surface;
    use engine_core::timing::MAX_FRAME_DELTA;
    use engine_core::{ErasedGame, Phase};

    fn running(id: &str) -> (Box<dyn ErasedGame>, Surface) {
        let mut game = create_game(id).expect("factory");
        let caps = game.capabilities();
        let mut surface = Surface::new(caps.width, caps.height);
        game.init(&mut surface, 21).expect("init");
        (game, surface)
    }

    #[test]
    fn test_every_game_registered_under_its_own_id() {
        initialize_registry();
        for id in GAME_IDS {
            assert!(is_registered(id), "{id} missing");
            let game = create_game(id).expect("factory");
            assert_eq!(game.game_id().game_id, id);
            assert_eq!(game.phase(), Phase::Uninitialized);
        }
    }

    #[test]
    fn test_clamping_games_ignore_long_frames() {
        initialize_registry();
        for id in GAME_IDS {
            let (mut stalled, _a) = running(id);
            let (mut normal, _b) = running(id);
            if !stalled.capabilities().clamps_delta {
                continue;
            }
            for _ in 0..3 {
                stalled.update(5.0).expect("update");
                normal.update(MAX_FRAME_DELTA).expect("update");
            }

            let caps = stalled.capabilities();
            let mut left = Canvas::new(caps.width, caps.height);
            let mut right = Canvas::new(caps.width, caps.height);
            stalled.render(&mut left).expect("render");
            normal.render(&mut right).expect("render");
            assert_eq!(left.commands(), right.commands(), "{id} did not clamp its delta");
        }
    }
}

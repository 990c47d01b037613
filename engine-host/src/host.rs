//! The host shell: route → game, fixed-tick frame loop, game rotation

use std::future::Future;
use std::time::Duration;

use engine_core::audio::{NullAudio, TraceAudio};
use engine_core::engine::{Clock, MonotonicClock};
use engine_core::registry::create_game;
use engine_core::surface::Surface;
use engine_core::Engine;
use thiserror::Error;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::autopilot::Autopilot;
use crate::config::Config;
use crate::router::Router;

/// Surface size before the first game resizes it
const INITIAL_WIDTH: u32 = 1200;
const INITIAL_HEIGHT: u32 = 800;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("No game registered under '{0}'")]
    UnknownGame(String),
}

pub struct Host {
    engine: Engine,
    router: Router,
    rotation: Vec<String>,
    next_in_rotation: usize,
    frames_per_game: u64,
    frames_in_game: u64,
    tick: Duration,
    autopilot: Option<Autopilot>,
    current: Option<String>,
}

impl Host {
    /// Build the engine from `config` and load the game its route names
    pub fn new(config: &Config) -> Result<Self, HostError> {
        Self::with_clock(config, MonotonicClock::new())
    }

    pub fn with_clock(config: &Config, clock: impl Clock + 'static) -> Result<Self, HostError> {
        let surface = Surface::new(INITIAL_WIDTH, INITIAL_HEIGHT);
        let surface = if config.audio {
            surface.with_audio(TraceAudio)
        } else {
            surface.with_audio(NullAudio)
        };
        let mut engine = Engine::with_clock(surface, clock);
        if let Some(seed) = config.seed {
            engine = engine.with_seed(seed);
        }

        let autopilot = config.autopilot.then(|| match config.seed {
            Some(seed) => Autopilot::with_seed(seed),
            None => Autopilot::new(),
        });

        let mut host = Self {
            engine,
            router: Router::new(config.default_game.clone()),
            rotation: config.games.clone(),
            next_in_rotation: 0,
            frames_per_game: config.frames_per_game,
            frames_in_game: 0,
            tick: config.tick_interval(),
            autopilot,
            current: None,
        };
        host.switch(&config.route)?;
        Ok(host)
    }

    /// Stop the loop, replace the active game and start again
    ///
    /// Returns the id of the game actually loaded after route fallback.
    pub fn switch(&mut self, route: &str) -> Result<String, HostError> {
        let id = self.router.resolve(route);
        let game = create_game(&id).ok_or_else(|| HostError::UnknownGame(id.clone()))?;

        if let Some(release) = self.autopilot.as_mut().and_then(Autopilot::release) {
            self.engine.dispatch(&release);
        }

        let caps = game.capabilities();
        self.engine.stop();
        self.engine.load_game(game);
        self.engine.start();
        self.frames_in_game = 0;

        info!(
            game = %id,
            title = %caps.title,
            width = caps.width,
            height = caps.height,
            "Switched game"
        );
        self.current = Some(id.clone());
        Ok(id)
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Run one frame, then rotate if this game's frames are used up
    ///
    /// Returns whether another frame should be scheduled.
    pub fn step(&mut self) -> bool {
        if let Some(pilot) = self.autopilot.as_mut() {
            let surface = self.engine.surface();
            let (w, h) = (f64::from(surface.width()), f64::from(surface.height()));
            for event in pilot.next_events(w, h) {
                self.engine.dispatch(&event);
            }
        }

        if !self.engine.tick() {
            return false;
        }
        self.frames_in_game += 1;

        if self.frames_per_game == 0 || self.frames_in_game < self.frames_per_game {
            return true;
        }
        match self.rotation.get(self.next_in_rotation).cloned() {
            Some(route) => {
                self.next_in_rotation += 1;
                match self.switch(&route) {
                    Ok(_) => true,
                    Err(e) => {
                        error!(route = %route, error = %e, "Rotation failed");
                        self.engine.stop();
                        false
                    }
                }
            }
            None => {
                info!("Rotation finished");
                self.engine.stop();
                false
            }
        }
    }

    /// Drive frames on a fixed tick until the engine stops or `shutdown`
    /// resolves, then unload the active game
    ///
    /// Returns the number of frames executed.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) -> u64 {
        let before = self.engine.frame_count();
        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping engine");
                    self.engine.stop();
                    break;
                }
                _ = ticker.tick() => {
                    if !self.step() {
                        break;
                    }
                }
            }
        }

        self.engine.unload();
        self.current = None;
        let frames = self.engine.frame_count() - before;
        debug!(frames, "Frame loop exited");
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry_init::initialize_registry;
    use clap::Parser;
    use engine_core::engine::ManualClock;
    use engine_core::geom::Vec2;
    use engine_core::input::{InputEvent, Key};
    use engine_core::Phase;

    fn config(args: &[&str]) -> Config {
        initialize_registry();
        Config::try_parse_from(std::iter::once("arcade").chain(args.iter().copied())).expect("valid args")
    }

    fn host(args: &[&str]) -> (Host, ManualClock) {
        let clock = ManualClock::new(0.0);
        let host = Host::with_clock(&config(args), clock.clone()).expect("host");
        (host, clock)
    }

    #[test]
    fn test_route_selects_game() {
        let (host, _) = host(&["--route", "#breakout", "--seed", "1"]);
        assert_eq!(host.current(), Some("breakout"));
        let game = host.engine().current_game().expect("loaded");
        assert_eq!(game.phase(), Phase::Running);
        assert!(host.engine().is_running());
        assert!(host.engine().surface().listener_count() > 0);
    }

    #[test]
    fn test_unknown_route_falls_back() {
        let (host, _) = host(&["--route", "#pinball"]);
        assert_eq!(host.current(), Some("placeholder"));
    }

    #[test]
    fn test_missing_default_is_an_error() {
        let config = config(&["--route", "#pinball", "--default-game", "pinball"]);
        let err = Host::with_clock(&config, ManualClock::new(0.0)).err();
        assert_eq!(err, Some(HostError::UnknownGame("pinball".to_string())));
    }

    #[test]
    fn test_switch_releases_previous_listeners() {
        let (mut host, clock) = host(&["--route", "#solitaire", "--seed", "3"]);
        clock.advance(16.0);
        assert!(host.step());

        host.switch("#tarot").expect("switch");
        assert_eq!(host.current(), Some("tarot"));
        assert_eq!(host.engine().surface().width(), 1200);
        // Tarot has no key listeners; solitaire's are gone
        assert!(!host.engine_mut().dispatch(&InputEvent::KeyDown(Key::Char('r'))));
        assert!(host.engine_mut().dispatch(&InputEvent::Click(Vec2::new(600.0, 590.0))));
    }

    #[test]
    fn test_rotation_then_stop() {
        let (mut host, clock) = host(&["--route", "#boat", "--games", "run,#pacman", "--frames-per-game", "2"]);
        let mut seen = vec![host.current().map(str::to_string)];
        let mut frames = 0;
        loop {
            clock.advance(16.0);
            let more = host.step();
            frames += 1;
            if !more {
                break;
            }
            let current = host.current().map(str::to_string);
            if seen.last() != Some(&current) {
                seen.push(current);
            }
        }
        let seen: Vec<String> = seen.into_iter().flatten().collect();
        assert_eq!(seen, vec!["boat", "run", "pacman"]);
        assert_eq!(frames, 6);
        assert!(!host.engine().is_running());
        assert_eq!(host.engine().surface().width(), 560);
    }

    #[test]
    fn test_failed_rotation_stops_the_loop() {
        let (mut host, clock) = host(&["--route", "#boat", "--games", "run", "--frames-per-game", "1"]);
        host.router = Router::new("pinball");
        host.rotation = vec!["#pinball".to_string()];
        clock.advance(16.0);
        assert!(!host.step());
        assert!(!host.engine().is_running());
        assert_eq!(host.current(), Some("boat"));
        assert_eq!(host.next_in_rotation, 1);
    }

    #[test]
    fn test_unlimited_frames_never_rotates() {
        let (mut host, clock) = host(&["--route", "#run", "--games", "boat"]);
        for _ in 0..50 {
            clock.advance(16.0);
            assert!(host.step());
        }
        assert_eq!(host.current(), Some("run"));
    }

    #[test]
    fn test_autopilot_plays_without_panicking() {
        for id in crate::registry_init::GAME_IDS {
            let route = format!("#{id}");
            let (mut host, clock) = host(&["--route", route.as_str(), "--autopilot", "--seed", "9"]);
            for _ in 0..240 {
                clock.advance(16.0);
                host.step();
            }
            assert!(host.engine().frame_count() > 0, "{id} ran no frames");
        }
    }

    #[tokio::test]
    async fn test_run_until_rotation_ends() {
        let config = config(&["--route", "#breakout", "--fps", "1000", "--frames-per-game", "3"]);
        let mut host = Host::new(&config).expect("host");
        let frames = host.run(std::future::pending()).await;
        assert_eq!(frames, 3);
        assert!(host.engine().current_game().is_none());
        assert_eq!(host.engine().surface().listener_count(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_stops_before_next_frame() {
        let config = config(&["--route", "#tarot"]);
        let mut host = Host::new(&config).expect("host");
        let frames = host.run(std::future::ready(())).await;
        assert_eq!(frames, 0);
        assert!(!host.engine().is_running());
        assert_eq!(host.current(), None);
    }
}

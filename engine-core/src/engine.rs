//! Frame-loop driver
//!
//! The engine holds the surface and at most one active game. Each frame it
//! computes the delta since the previous frame and calls `update` then
//! `render` on the active game, for as long as the run flag is set.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, error, info, warn};

use crate::erased::ErasedGame;
use crate::input::InputEvent;
use crate::render::Canvas;
use crate::surface::Surface;

/// Millisecond time source for frame deltas
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall-clock milliseconds since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Source of frame timestamps in milliseconds
///
/// Any `Iterator<Item = f64>` is a scheduler.
pub trait FrameScheduler {
    fn next_frame(&mut self) -> Option<f64>;
}

impl<I: Iterator<Item = f64>> FrameScheduler for I {
    fn next_frame(&mut self) -> Option<f64> {
        self.next()
    }
}

/// `count` timestamps spaced `interval_ms` apart, starting after `start_ms`
#[derive(Debug, Clone)]
pub struct FixedTicks {
    next: f64,
    interval: f64,
    remaining: u64,
}

impl FixedTicks {
    pub fn new(start_ms: f64, interval_ms: f64, count: u64) -> Self {
        Self {
            next: start_ms + interval_ms,
            interval: interval_ms,
            remaining: count,
        }
    }
}

impl Iterator for FixedTicks {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let t = self.next;
        self.next += self.interval;
        Some(t)
    }
}

/// Cloneable handle to the engine's run flag
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    /// Request that no further frames run; the current frame completes
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn set_running(&self) {
        self.running.store(true, Ordering::SeqCst);
    }
}

/// The frame-loop engine
pub struct Engine {
    surface: Surface,
    current: Option<Box<dyn ErasedGame>>,
    running: StopHandle,
    last_time_ms: f64,
    frames: u64,
    canvas: Canvas,
    clock: Box<dyn Clock>,
    seeds: ChaCha20Rng,
}

impl Engine {
    pub fn new(surface: Surface) -> Self {
        Self::with_clock(surface, MonotonicClock::new())
    }

    pub fn with_clock(surface: Surface, clock: impl Clock + 'static) -> Self {
        let canvas = Canvas::new(surface.width(), surface.height());
        Self {
            surface,
            current: None,
            running: StopHandle::default(),
            last_time_ms: 0.0,
            frames: 0,
            canvas,
            clock: Box::new(clock),
            seeds: ChaCha20Rng::from_entropy(),
        }
    }

    /// Derive every game's seed from `seed` instead of entropy
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seeds = ChaCha20Rng::seed_from_u64(seed);
        self
    }

    /// Replace the active game
    ///
    /// The previous game, if any, is destroyed before the new one is
    /// initialised against the surface.
    pub fn load_game(&mut self, mut game: Box<dyn ErasedGame>) {
        self.unload();

        let seed = self.seeds.next_u64();
        if let Err(e) = game.init(&mut self.surface, seed) {
            warn!("Loaded game failed to initialize: {}", e);
        }
        info!(game = %game.game_id().game_id, "Game loaded");
        self.current = Some(game);
    }

    /// Destroy and drop the active game
    pub fn unload(&mut self) {
        if let Some(mut old) = self.current.take() {
            let id = old.game_id().game_id;
            if let Err(e) = old.destroy() {
                warn!("Failed to destroy '{}': {}", id, e);
            }
            debug!(game = %id, "Game unloaded");
        }
    }

    /// Begin running frames; a no-op when no game is loaded
    pub fn start(&mut self) {
        if self.current.is_none() {
            error!("No game loaded");
            return;
        }
        self.last_time_ms = self.clock.now_ms();
        self.running.set_running();
        debug!("Engine started");
    }

    pub fn stop(&self) {
        self.running.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.running.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }

    /// Run one frame at `now_ms`
    ///
    /// Returns whether the next frame should be scheduled.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if !self.running.is_running() {
            return false;
        }
        let Some(game) = self.current.as_mut() else {
            self.running.stop();
            return false;
        };

        let delta = (now_ms - self.last_time_ms) / 1000.0;
        self.last_time_ms = now_ms;

        if let Err(e) = game.update(delta) {
            warn!("Update rejected: {}", e);
        }
        self.canvas.begin_frame(self.surface.width(), self.surface.height());
        if let Err(e) = game.render(&mut self.canvas) {
            warn!("Render rejected: {}", e);
        }
        self.frames += 1;

        self.running.is_running()
    }

    /// Run frames at the clock's current time
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.frame(now)
    }

    /// Drive `frame` until the scheduler runs dry or the engine stops
    ///
    /// Returns the number of frames executed.
    pub fn run(&mut self, scheduler: &mut impl FrameScheduler) -> u64 {
        let before = self.frames;
        while self.is_running() {
            let Some(now) = scheduler.next_frame() else {
                break;
            };
            if !self.frame(now) {
                break;
            }
        }
        self.frames - before
    }

    /// Deliver an input event to the active game
    ///
    /// Only events the game holds a live listener for are delivered.
    pub fn dispatch(&mut self, event: &InputEvent) -> bool {
        let Some(game) = self.current.as_mut() else {
            return false;
        };
        if !self.surface.accepts(event) {
            return false;
        }
        match game.handle_input(event) {
            Ok(()) => true,
            Err(e) => {
                warn!("Input rejected: {}", e);
                false
            }
        }
    }

    pub fn current_game(&self) -> Option<&dyn ErasedGame> {
        self.current.as_deref()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Display list written by the most recent frame
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::erased::{LifecycleError, Phase};
    use crate::geom::Vec2;
    use crate::input::{EventKind, EventTarget, Key};
    use crate::surface::ListenerGuard;
    use crate::typed::{Capabilities, GameId};
    use proptest::prelude::*;
    use std::cell::RefCell;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records every lifecycle call into a shared log
    struct ProbeGame {
        name: String,
        log: Log,
        phase: Phase,
        listener: Option<ListenerGuard>,
        stop_on_update: Option<StopHandle>,
    }

    impl ProbeGame {
        fn boxed(name: &str, log: &Log) -> Box<dyn ErasedGame> {
            Box::new(Self {
                name: name.to_string(),
                log: Rc::clone(log),
                phase: Phase::Uninitialized,
                listener: None,
                stop_on_update: None,
            })
        }

        fn record(&self, call: &str) {
            self.log.borrow_mut().push(format!("{}:{}", call, self.name));
        }
    }

    impl ErasedGame for ProbeGame {
        fn game_id(&self) -> GameId {
            GameId {
                game_id: self.name.clone(),
                build_id: "test".to_string(),
            }
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities {
                id: self.game_id(),
                title: self.name.clone(),
                width: 200,
                height: 100,
                audio: false,
                clamps_delta: false,
            }
        }

        fn phase(&self) -> Phase {
            self.phase
        }

        fn init(&mut self, surface: &mut Surface, _seed: u64) -> Result<(), LifecycleError> {
            self.record("init");
            self.listener = Some(surface.listen(EventTarget::Window, EventKind::KeyDown));
            self.phase = Phase::Running;
            Ok(())
        }

        fn update(&mut self, dt: f64) -> Result<(), LifecycleError> {
            self.record(&format!("update({:.3})", dt));
            if let Some(handle) = &self.stop_on_update {
                handle.stop();
            }
            Ok(())
        }

        fn handle_input(&mut self, _event: &InputEvent) -> Result<(), LifecycleError> {
            self.record("input");
            Ok(())
        }

        fn render(&self, canvas: &mut Canvas) -> Result<(), LifecycleError> {
            self.record("render");
            canvas.fill_circle(Vec2::ZERO, 1.0, crate::render::Color::WHITE);
            Ok(())
        }

        fn destroy(&mut self) -> Result<(), LifecycleError> {
            self.record("destroy");
            self.listener = None;
            self.phase = Phase::Destroyed;
            Ok(())
        }
    }

    fn engine() -> (Engine, ManualClock) {
        let clock = ManualClock::new(1000.0);
        let engine = Engine::with_clock(Surface::new(640, 480), clock.clone()).with_seed(7);
        (engine, clock)
    }

    #[test]
    fn test_start_without_game_is_noop() {
        let (mut engine, _clock) = engine();
        engine.start();
        assert!(!engine.is_running());
        assert!(!engine.frame(2000.0));
        assert_eq!(engine.frame_count(), 0);
    }

    #[test]
    fn test_frame_computes_delta_and_orders_calls() {
        let log = Log::default();
        let (mut engine, _clock) = engine();
        engine.load_game(ProbeGame::boxed("a", &log));
        engine.start();

        assert!(engine.frame(1016.0));
        assert!(engine.frame(1050.0));

        assert_eq!(
            *log.borrow(),
            vec!["init:a", "update(0.016):a", "render:a", "update(0.034):a", "render:a"]
        );
        assert_eq!(engine.frame_count(), 2);
        assert_eq!(engine.canvas().len(), 1);
        assert_eq!(engine.surface().width(), 640);
    }

    #[test]
    fn test_stop_prevents_further_frames() {
        let log = Log::default();
        let (mut engine, _clock) = engine();
        engine.load_game(ProbeGame::boxed("a", &log));
        engine.start();
        engine.frame(1016.0);

        engine.stop();
        let before = log.borrow().len();
        assert!(!engine.frame(1032.0));
        assert!(!engine.frame(1048.0));
        assert_eq!(log.borrow().len(), before);
    }

    #[test]
    fn test_stop_handle_mid_frame_finishes_frame() {
        let log = Log::default();
        let (mut engine, _clock) = engine();
        let handle = engine.stop_handle();
        let game = ProbeGame {
            name: "a".to_string(),
            log: Rc::clone(&log),
            phase: Phase::Uninitialized,
            listener: None,
            stop_on_update: Some(handle),
        };
        engine.load_game(Box::new(game));
        engine.start();

        assert!(!engine.frame(1016.0));
        // The frame in flight still rendered
        assert_eq!(log.borrow().last().map(String::as_str), Some("render:a"));
        assert_eq!(engine.run(&mut FixedTicks::new(1016.0, 16.0, 10)), 0);
    }

    #[test]
    fn test_run_until_scheduler_exhausted() {
        let log = Log::default();
        let (mut engine, _clock) = engine();
        engine.load_game(ProbeGame::boxed("a", &log));
        engine.start();

        let frames = engine.run(&mut FixedTicks::new(1000.0, 20.0, 5));
        assert_eq!(frames, 5);
        assert!(log.borrow().iter().any(|c| c == "update(0.020):a"));
        assert!(engine.is_running());
    }

    #[test]
    fn test_start_uses_clock_baseline() {
        let log = Log::default();
        let (mut engine, clock) = engine();
        engine.load_game(ProbeGame::boxed("a", &log));
        clock.advance(500.0);
        engine.start();
        clock.advance(25.0);
        engine.tick();
        assert!(log.borrow().iter().any(|c| c == "update(0.025):a"));
    }

    #[test]
    fn test_dispatch_requires_listener() {
        let log = Log::default();
        let (mut engine, _clock) = engine();
        assert!(!engine.dispatch(&InputEvent::KeyDown(Key::Space)));

        engine.load_game(ProbeGame::boxed("a", &log));
        assert!(engine.dispatch(&InputEvent::KeyDown(Key::Space)));
        assert!(!engine.dispatch(&InputEvent::KeyUp(Key::Space)));
        assert!(!engine.dispatch(&InputEvent::Click(Vec2::new(1.0, 1.0))));

        engine.unload();
        assert!(!engine.dispatch(&InputEvent::KeyDown(Key::Space)));
        assert_eq!(engine.surface().listener_count(), 0);
    }

    #[test]
    fn test_stopped_swap_loads_without_frames() {
        let log = Log::default();
        let (mut engine, _clock) = engine();
        engine.load_game(ProbeGame::boxed("a", &log));
        engine.start();
        engine.stop();
        engine.load_game(ProbeGame::boxed("b", &log));
        assert!(!engine.frame(2000.0));
        engine.start();
        assert!(engine.frame(2016.0));
        assert_eq!(engine.current_game().map(|g| g.game_id().game_id), Some("b".to_string()));
    }

    proptest! {
        #[test]
        fn destroy_precedes_every_init(names in proptest::collection::vec("[a-c]", 1..12)) {
            let log = Log::default();
            let (mut engine, _clock) = engine();
            for (i, name) in names.iter().enumerate() {
                engine.load_game(ProbeGame::boxed(&format!("{}{}", name, i), &log));
            }

            let calls = log.borrow();
            let inits: Vec<usize> = calls.iter().enumerate()
                .filter(|(_, c)| c.starts_with("init:")).map(|(i, _)| i).collect();
            prop_assert_eq!(inits.len(), names.len());

            for (k, name) in names.iter().enumerate().skip(1) {
                let prev = format!("destroy:{}{}", names[k - 1], k - 1);
                let destroys: Vec<usize> = calls.iter().enumerate()
                    .filter(|(_, c)| **c == prev).map(|(i, _)| i).collect();
                prop_assert_eq!(destroys.len(), 1);
                prop_assert!(destroys[0] < inits[k], "{} destroyed after {} init", prev, name);
            }
            // Only the last game's listener survives
            prop_assert_eq!(engine.surface().listener_count(), 1);
        }
    }
}

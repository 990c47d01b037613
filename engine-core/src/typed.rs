//! Typed Game trait providing the lifecycle contract for game developers
//!
//! Games implement this trait with plain state structs and their own sound
//! cue type. The adapter layer turns any implementation into the
//! engine-facing `ErasedGame` interface and owns everything the game
//! acquires during `init`.

use std::fmt;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::audio::Tone;
use crate::input::{EventKind, EventTarget, InputEvent};
use crate::render::Canvas;
use crate::surface::{ListenerGuard, Surface};

/// Game identification information
#[derive(Debug, Clone, PartialEq)]
pub struct GameId {
    pub game_id: String,
    pub build_id: String,
}

/// Static description of a game
#[derive(Debug, Clone, PartialEq)]
pub struct Capabilities {
    pub id: GameId,
    pub title: String,
    /// Internal resolution the surface is resized to on init
    pub width: u32,
    pub height: u32,
    /// Whether the game opens an audio channel
    pub audio: bool,
    /// Whether `update` clamps its delta to `timing::MAX_FRAME_DELTA`
    pub clamps_delta: bool,
}

/// Everything a game may acquire while initialising
///
/// Listener registrations made here are held by the adapter and released
/// when the game is destroyed.
pub struct InitContext<'a> {
    surface: &'a mut Surface,
    listeners: Vec<ListenerGuard>,
    seed: u64,
}

impl<'a> InitContext<'a> {
    pub fn new(surface: &'a mut Surface, seed: u64) -> Self {
        Self {
            surface,
            listeners: Vec::new(),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fresh generator seeded from this instance's seed
    pub fn rng(&self) -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(self.seed)
    }

    pub fn width(&self) -> f64 {
        f64::from(self.surface.width())
    }

    pub fn height(&self) -> f64 {
        f64::from(self.surface.height())
    }

    pub fn listen(&mut self, target: EventTarget, kind: EventKind) {
        let guard = self.surface.listen(target, kind);
        self.listeners.push(guard);
    }

    pub fn listen_window(&mut self, kinds: &[EventKind]) {
        for &kind in kinds {
            self.listen(EventTarget::Window, kind);
        }
    }

    pub fn listen_surface(&mut self, kinds: &[EventKind]) {
        for &kind in kinds {
            self.listen(EventTarget::Surface, kind);
        }
    }

    pub(crate) fn into_listeners(self) -> Vec<ListenerGuard> {
        self.listeners
    }
}

/// Sound cues queued by a game during one call
#[derive(Debug)]
pub struct Cues<C> {
    queued: Vec<C>,
    resume: bool,
}

impl<C> Cues<C> {
    pub fn new() -> Self {
        Self {
            queued: Vec::new(),
            resume: false,
        }
    }

    pub fn play(&mut self, cue: C) {
        self.queued.push(cue);
    }

    /// Ask for the audio channel to be resumed (first launching gesture)
    pub fn resume_audio(&mut self) {
        self.resume = true;
    }

    pub fn resume_requested(&self) -> bool {
        self.resume
    }

    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.queued.iter()
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    pub fn clear(&mut self) {
        self.queued.clear();
        self.resume = false;
    }

    pub(crate) fn take_resume(&mut self) -> bool {
        std::mem::take(&mut self.resume)
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, C> {
        self.queued.drain(..)
    }
}

impl<C> Default for Cues<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Main trait for game implementations
///
/// # Lifecycle
///
/// The adapter guarantees `init` runs once before any `update`, `render` or
/// `handle_input`, and that `destroy` runs at most once, after which nothing
/// else is called.
///
/// # Example
///
/// ```ignore
/// #[derive(Default)]
/// struct Blink { on: bool, t: f64 }
///
/// impl Game for Blink {
///     type Cue = ();
///
///     fn game_id(&self) -> GameId { /* ... */ }
///     fn capabilities(&self) -> Capabilities { /* ... */ }
///     fn init(&mut self, ctx: &mut InitContext<'_>) {
///         ctx.listen_window(&[EventKind::KeyDown]);
///     }
///     fn update(&mut self, dt: f64, _cues: &mut Cues<()>) {
///         self.t += clamp_delta(dt);
///         self.on = self.t % 1.0 < 0.5;
///     }
///     fn render(&self, canvas: &mut Canvas) {
///         canvas.clear(if self.on { Color::WHITE } else { Color::BLACK });
///     }
///     fn encode_cue(_cue: &(), _out: &mut Vec<Tone>) {}
/// }
/// ```
pub trait Game: 'static {
    /// Sound cue type, encoded into tones by `encode_cue`
    type Cue: Copy + fmt::Debug + 'static;

    /// Get game identification information
    fn game_id(&self) -> GameId;

    /// Get game capabilities and surface requirements
    fn capabilities(&self) -> Capabilities;

    /// Allocate state, register listeners, generate boards
    ///
    /// The surface has already been resized to `capabilities()` dimensions.
    fn init(&mut self, ctx: &mut InitContext<'_>);

    /// Advance the simulation by `dt` seconds
    fn update(&mut self, dt: f64, cues: &mut Cues<Self::Cue>);

    /// React to an input event the game registered for
    fn handle_input(&mut self, _event: &InputEvent, _cues: &mut Cues<Self::Cue>) {}

    /// Append this frame's draw commands
    fn render(&self, canvas: &mut Canvas);

    /// Game-specific teardown; listeners and audio are released by the adapter
    fn destroy(&mut self) {}

    /// Encode one cue into the tones it plays
    fn encode_cue(cue: &Self::Cue, out: &mut Vec<Tone>);
}

//! Adapter layer converting typed games to erased interface
//!
//! `GameAdapter` wraps any typed `Game` and provides the `ErasedGame`
//! interface. It tracks the lifecycle phase, owns the listener guards and
//! audio channel acquired during `init`, and turns queued sound cues into
//! tones on the way out of every call.

use tracing::{debug, info};

use crate::audio::{AudioSink, Tone};
use crate::erased::{ErasedGame, LifecycleError, Phase};
use crate::input::InputEvent;
use crate::render::Canvas;
use crate::surface::{ListenerGuard, Surface};
use crate::typed::{Capabilities, Cues, Game, GameId, InitContext};

/// Adapter that converts typed games to erased interface
///
/// Resources acquired in `init` are released in `destroy`, and also when
/// the adapter is dropped while still running.
///
/// # Example
///
/// ```ignore
/// let mut game: Box<dyn ErasedGame> = Box::new(GameAdapter::new(Breakout::default()));
/// let mut surface = Surface::new(800, 600);
/// game.init(&mut surface, 42)?;
/// assert_eq!(surface.width(), 1200);
/// game.update(0.016)?;
/// game.destroy()?;
/// assert_eq!(surface.listener_count(), 0);
/// ```
pub struct GameAdapter<T: Game> {
    game: T,
    phase: Phase,
    listeners: Vec<ListenerGuard>,
    audio: Option<Box<dyn AudioSink>>,
    cues: Cues<T::Cue>,
    tones: Vec<Tone>,
}

impl<T: Game> GameAdapter<T> {
    /// Create a new adapter wrapping the given game
    pub fn new(game: T) -> Self {
        Self {
            game,
            phase: Phase::Uninitialized,
            listeners: Vec::new(),
            audio: None,
            cues: Cues::new(),
            tones: Vec::new(),
        }
    }

    /// Get a reference to the underlying game
    pub fn game(&self) -> &T {
        &self.game
    }

    /// Get a mutable reference to the underlying game
    pub fn game_mut(&mut self) -> &mut T {
        &mut self.game
    }

    fn name(&self) -> String {
        self.game.game_id().game_id
    }

    fn require_running(&self) -> Result<(), LifecycleError> {
        match self.phase {
            Phase::Running => Ok(()),
            phase => Err(LifecycleError::NotRunning {
                game: self.name(),
                phase,
            }),
        }
    }

    /// Encode queued cues and hand the tones to the audio channel
    fn flush_cues(&mut self) {
        let resume = self.cues.take_resume();
        for cue in self.cues.drain() {
            T::encode_cue(&cue, &mut self.tones);
        }
        let Some(audio) = self.audio.as_mut() else {
            self.tones.clear();
            return;
        };
        if resume {
            if let Err(e) = audio.resume() {
                debug!("Audio resume failed: {}", e);
            }
        }
        for tone in self.tones.drain(..) {
            if let Err(e) = audio.play(&tone) {
                debug!("Dropped tone {:?}: {}", tone.waveform, e);
            }
        }
    }

    fn release(&mut self) {
        self.listeners.clear();
        if let Some(mut audio) = self.audio.take() {
            audio.close();
        }
        self.cues.clear();
        self.tones.clear();
    }
}

impl<T: Game> ErasedGame for GameAdapter<T> {
    fn game_id(&self) -> GameId {
        self.game.game_id()
    }

    fn capabilities(&self) -> Capabilities {
        self.game.capabilities()
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn init(&mut self, surface: &mut Surface, seed: u64) -> Result<(), LifecycleError> {
        match self.phase {
            Phase::Uninitialized => {}
            Phase::Running => return Err(LifecycleError::AlreadyInitialized(self.name())),
            Phase::Destroyed => return Err(LifecycleError::AlreadyDestroyed(self.name())),
        }

        let caps = self.game.capabilities();
        surface.resize(caps.width, caps.height);

        let mut ctx = InitContext::new(surface, seed);
        self.game.init(&mut ctx);
        self.listeners = ctx.into_listeners();
        if caps.audio {
            self.audio = Some(surface.open_audio());
        }
        self.phase = Phase::Running;

        info!(
            game = %caps.id.game_id,
            width = caps.width,
            height = caps.height,
            listeners = self.listeners.len(),
            "Game initialized"
        );
        Ok(())
    }

    fn update(&mut self, dt: f64) -> Result<(), LifecycleError> {
        self.require_running()?;
        self.game.update(dt, &mut self.cues);
        self.flush_cues();
        Ok(())
    }

    fn handle_input(&mut self, event: &InputEvent) -> Result<(), LifecycleError> {
        self.require_running()?;
        self.game.handle_input(event, &mut self.cues);
        self.flush_cues();
        Ok(())
    }

    fn render(&self, canvas: &mut Canvas) -> Result<(), LifecycleError> {
        self.require_running()?;
        self.game.render(canvas);
        Ok(())
    }

    fn destroy(&mut self) -> Result<(), LifecycleError> {
        match self.phase {
            Phase::Destroyed => return Err(LifecycleError::AlreadyDestroyed(self.name())),
            Phase::Uninitialized => {}
            Phase::Running => {
                self.game.destroy();
                self.release();
                info!(game = %self.name(), "Game destroyed");
            }
        }
        self.phase = Phase::Destroyed;
        Ok(())
    }
}

impl<T: Game> Drop for GameAdapter<T> {
    fn drop(&mut self) {
        if self.phase == Phase::Running {
            self.game.destroy();
            self.release();
            debug!(game = %self.name(), "Game released on drop");
        }
    }
}

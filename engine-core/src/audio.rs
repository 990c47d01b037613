//! Synthesised sound effects
//!
//! Games never talk to an audio device directly. They emit typed cues, the
//! adapter encodes each cue into `Tone`s and hands them to the `AudioSink`
//! opened for that game instance.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

/// Oscillator shape of a tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
    Noise,
}

/// One synthesised beep: an oscillator gliding from `freq` to `end_freq`
/// with an exponential gain decay over `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub freq: f64,
    pub end_freq: Option<f64>,
    pub duration: f64,
    pub gain: f64,
    pub delay: f64,
}

impl Tone {
    pub const fn new(waveform: Waveform, freq: f64, duration: f64, gain: f64) -> Self {
        Self {
            waveform,
            freq,
            end_freq: None,
            duration,
            gain,
            delay: 0.0,
        }
    }

    /// Glide the pitch to `end_freq` over the tone's duration
    pub const fn glide(mut self, end_freq: f64) -> Self {
        self.end_freq = Some(end_freq);
        self
    }

    /// Start the tone `delay` seconds after it is played
    pub const fn delayed(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }
}

/// Push one tone per note, each starting `spacing` seconds after the previous
pub fn arpeggio(
    waveform: Waveform,
    notes: &[f64],
    spacing: f64,
    duration: f64,
    gain: f64,
    out: &mut Vec<Tone>,
) {
    for (i, &note) in notes.iter().enumerate() {
        out.push(Tone::new(waveform, note, duration, gain).delayed(i as f64 * spacing));
    }
}

/// Errors reported by an audio sink
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AudioError {
    #[error("Audio context is suspended until a user gesture")]
    Suspended,
    #[error("Audio context is closed")]
    Closed,
    #[error("Audio backend error: {0}")]
    Backend(String),
}

/// Output channel owned by one game instance
pub trait AudioSink {
    /// Resume a suspended context; called on the first launching gesture
    fn resume(&mut self) -> Result<(), AudioError>;

    /// Schedule a tone for playback
    fn play(&mut self, tone: &Tone) -> Result<(), AudioError>;

    /// Release the channel. Further calls to `play` fail with `Closed`.
    fn close(&mut self);
}

/// Source of audio sinks, provided by the host through the surface
pub trait AudioBackend {
    fn open(&self) -> Box<dyn AudioSink>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkState {
    Suspended,
    Running,
    Closed,
}

impl SinkState {
    fn resume(&mut self) -> Result<(), AudioError> {
        match self {
            SinkState::Closed => Err(AudioError::Closed),
            _ => {
                *self = SinkState::Running;
                Ok(())
            }
        }
    }

    fn check_playable(&self) -> Result<(), AudioError> {
        match self {
            SinkState::Suspended => Err(AudioError::Suspended),
            SinkState::Closed => Err(AudioError::Closed),
            SinkState::Running => Ok(()),
        }
    }
}

/// Backend whose sinks accept and discard everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn open(&self) -> Box<dyn AudioSink> {
        Box::new(NullAudio)
    }
}

impl AudioSink for NullAudio {
    fn resume(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn play(&mut self, _tone: &Tone) -> Result<(), AudioError> {
        Ok(())
    }

    fn close(&mut self) {}
}

/// Backend that logs every scheduled tone at trace level
///
/// Sinks start suspended, like a browser audio context before the first
/// user gesture.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceAudio;

struct TraceSink {
    state: SinkState,
}

impl AudioBackend for TraceAudio {
    fn open(&self) -> Box<dyn AudioSink> {
        Box::new(TraceSink {
            state: SinkState::Suspended,
        })
    }
}

impl AudioSink for TraceSink {
    fn resume(&mut self) -> Result<(), AudioError> {
        self.state.resume()
    }

    fn play(&mut self, tone: &Tone) -> Result<(), AudioError> {
        self.state.check_playable()?;
        trace!(
            waveform = ?tone.waveform,
            freq = tone.freq,
            end_freq = ?tone.end_freq,
            duration = tone.duration,
            gain = tone.gain,
            delay = tone.delay,
            "tone"
        );
        Ok(())
    }

    fn close(&mut self) {
        self.state = SinkState::Closed;
    }
}

/// What a `RecordingAudio` backend has observed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioLog {
    pub opened: usize,
    pub closed: usize,
    pub resumed: usize,
    pub played: Vec<Tone>,
    pub rejected: usize,
}

impl AudioLog {
    /// Sinks opened and not yet closed
    pub fn open_sinks(&self) -> usize {
        self.opened - self.closed
    }
}

/// Backend that records sink activity into a shared log
#[derive(Debug, Clone)]
pub struct RecordingAudio {
    log: Rc<RefCell<AudioLog>>,
    autoplay: bool,
}

impl RecordingAudio {
    /// Sinks start suspended and reject tones until resumed
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(AudioLog::default())),
            autoplay: false,
        }
    }

    /// Sinks start running
    pub fn autoplay() -> Self {
        Self {
            autoplay: true,
            ..Self::new()
        }
    }

    pub fn log(&self) -> AudioLog {
        self.log.borrow().clone()
    }
}

impl Default for RecordingAudio {
    fn default() -> Self {
        Self::new()
    }
}

struct RecordingSink {
    log: Rc<RefCell<AudioLog>>,
    state: SinkState,
}

impl AudioBackend for RecordingAudio {
    fn open(&self) -> Box<dyn AudioSink> {
        self.log.borrow_mut().opened += 1;
        let state = if self.autoplay {
            SinkState::Running
        } else {
            SinkState::Suspended
        };
        Box::new(RecordingSink {
            log: Rc::clone(&self.log),
            state,
        })
    }
}

impl AudioSink for RecordingSink {
    fn resume(&mut self) -> Result<(), AudioError> {
        self.state.resume()?;
        self.log.borrow_mut().resumed += 1;
        Ok(())
    }

    fn play(&mut self, tone: &Tone) -> Result<(), AudioError> {
        let mut log = self.log.borrow_mut();
        match self.state.check_playable() {
            Ok(()) => {
                log.played.push(*tone);
                Ok(())
            }
            Err(e) => {
                log.rejected += 1;
                Err(e)
            }
        }
    }

    fn close(&mut self) {
        if self.state != SinkState::Closed {
            self.state = SinkState::Closed;
            self.log.borrow_mut().closed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arpeggio_spacing() {
        let mut out = Vec::new();
        arpeggio(Waveform::Sine, &[523.25, 659.25, 783.99], 0.06, 0.18, 0.06, &mut out);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].delay, 0.0);
        assert!((out[2].delay - 0.12).abs() < 1e-12);
        assert_eq!(out[1].freq, 659.25);
    }

    #[test]
    fn test_recording_sink_suspended_until_resume() {
        let backend = RecordingAudio::new();
        let mut sink = backend.open();
        let tone = Tone::new(Waveform::Square, 220.0, 0.05, 0.05).glide(180.0);

        assert_eq!(sink.play(&tone), Err(AudioError::Suspended));
        sink.resume().unwrap();
        sink.play(&tone).unwrap();
        sink.close();
        assert_eq!(sink.play(&tone), Err(AudioError::Closed));
        assert_eq!(sink.resume(), Err(AudioError::Closed));

        let log = backend.log();
        assert_eq!(log.opened, 1);
        assert_eq!(log.closed, 1);
        assert_eq!(log.played, vec![tone]);
        assert_eq!(log.rejected, 2);
        assert_eq!(log.open_sinks(), 0);
    }

    #[test]
    fn test_close_counts_once() {
        let backend = RecordingAudio::autoplay();
        let mut sink = backend.open();
        sink.close();
        sink.close();
        assert_eq!(backend.log().closed, 1);
    }
}

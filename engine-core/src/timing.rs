//! Frame timing helpers
//!
//! Every game clamps the delta it receives before applying motion so that a
//! stalled tab or a debugger pause does not teleport entities.

/// Largest delta, in seconds, a game applies in a single update
pub const MAX_FRAME_DELTA: f64 = 0.033;

/// Clamp a raw frame delta into `[0, MAX_FRAME_DELTA]`
///
/// Negative and non-finite deltas (clock going backwards, first frame
/// without a baseline) become 0.
pub fn clamp_delta(delta: f64) -> f64 {
    if !delta.is_finite() || delta <= 0.0 {
        0.0
    } else {
        delta.min(MAX_FRAME_DELTA)
    }
}

/// Frame-rate independent exponential smoothing factor
///
/// Moving `alpha` of the remaining distance each frame closes 99.99% of
/// the gap per second regardless of frame rate.
pub fn smoothing_alpha(delta: f64) -> f64 {
    1.0 - 0.0001_f64.powf(delta)
}

/// Per-tick motion expressed at 60 Hz, scaled to the given delta
pub fn ticks(delta: f64) -> f64 {
    delta * 60.0
}

use rand::prelude::*;
use rand_chacha::ChaCha20Rng;

use engine_core::geom::Vec2;
use engine_core::input::{InputEvent, Key};

/// Keys any of the games react to
const KEYS: [Key; 10] = [
    Key::ArrowLeft,
    Key::ArrowRight,
    Key::ArrowUp,
    Key::ArrowDown,
    Key::Space,
    Key::Enter,
    Key::Char('w'),
    Key::Char('a'),
    Key::Char('s'),
    Key::Char('d'),
];

/// Frames between autopilot actions
const ACTION_EVERY: u64 = 12;

/// Random input source for unattended runs
///
/// Every few frames it releases whatever it was holding and performs one
/// new action: hold a key, click somewhere, or drag a short distance.
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: ChaCha20Rng,
    held: Option<Key>,
    frame: u64,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::with_rng(ChaCha20Rng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha20Rng::seed_from_u64(seed))
    }

    fn with_rng(rng: ChaCha20Rng) -> Self {
        Self {
            rng,
            held: None,
            frame: 0,
        }
    }

    /// Events to dispatch before the next frame on a `width` × `height` surface
    pub fn next_events(&mut self, width: f64, height: f64) -> Vec<InputEvent> {
        self.frame += 1;
        if self.frame % ACTION_EVERY != 0 {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(4);
        if let Some(key) = self.held.take() {
            events.push(InputEvent::KeyUp(key));
        }

        let at = Vec2::new(self.rng.gen_range(0.0..width), self.rng.gen_range(0.0..height));
        match self.rng.gen_range(0..3) {
            0 => {
                let key = KEYS[self.rng.gen_range(0..KEYS.len())];
                events.push(InputEvent::KeyDown(key));
                self.held = Some(key);
            }
            1 => {
                events.push(InputEvent::MouseMove(at));
                events.push(InputEvent::MouseDown(at));
                events.push(InputEvent::MouseUp(at));
                events.push(InputEvent::Click(at));
            }
            _ => {
                let to = at + Vec2::new(self.rng.gen_range(-80.0..80.0), self.rng.gen_range(-80.0..80.0));
                events.push(InputEvent::PointerDown(at));
                events.push(InputEvent::PointerMove(to));
                events.push(InputEvent::PointerUp(to));
            }
        }
        events
    }

    /// Release anything still held, e.g. before switching games
    pub fn release(&mut self) -> Option<InputEvent> {
        self.held.take().map(InputEvent::KeyUp)
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acts_on_schedule() {
        let mut pilot = Autopilot::with_seed(3);
        for _ in 0..ACTION_EVERY - 1 {
            assert!(pilot.next_events(1200.0, 800.0).is_empty());
        }
        let events = pilot.next_events(1200.0, 800.0);
        assert!(!events.is_empty());
        for event in &events {
            if let Some(p) = event.position() {
                assert!(p.x >= -80.0 && p.x < 1280.0);
                assert!(p.y >= -80.0 && p.y < 880.0);
            }
        }
    }

    #[test]
    fn test_held_key_is_released() {
        let mut pilot = Autopilot::with_seed(11);
        let mut down = 0;
        let mut up = 0;
        for _ in 0..ACTION_EVERY * 50 {
            for event in pilot.next_events(1200.0, 800.0) {
                match event {
                    InputEvent::KeyDown(_) => down += 1,
                    InputEvent::KeyUp(_) => up += 1,
                    _ => {}
                }
            }
        }
        up += usize::from(pilot.release().is_some());
        assert!(down > 0);
        assert_eq!(down, up);
    }

    #[test]
    fn test_same_seed_same_events() {
        let mut a = Autopilot::with_seed(5);
        let mut b = Autopilot::with_seed(5);
        for _ in 0..ACTION_EVERY * 4 {
            assert_eq!(a.next_events(560.0, 660.0), b.next_events(560.0, 660.0));
        }
    }
}

//! Bouncing-ball placeholder game
//!
//! The smallest complete game: a ball drifting around the surface and
//! bouncing off its edges, nudged by the arrow keys.

use std::collections::HashSet;

use engine_core::audio::Tone;
use engine_core::geom::Vec2;
use engine_core::input::{EventKind, InputEvent, Key};
use engine_core::render::{Canvas, Color, TextAlign};
use engine_core::timing::clamp_delta;
use engine_core::typed::{Capabilities, Cues, Game, GameId, InitContext};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const NUDGE_SPEED: f64 = 200.0;

/// Bouncing-ball state
#[derive(Debug, Clone)]
pub struct Placeholder {
    pos: Vec2,
    radius: f64,
    velocity: Vec2,
    keys: HashSet<Key>,
    width: f64,
    height: f64,
}

impl Placeholder {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(400.0, 300.0),
            radius: 30.0,
            velocity: Vec2::new(150.0, 100.0),
            keys: HashSet::new(),
            width: f64::from(WIDTH),
            height: f64::from(HEIGHT),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn held(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }
}

impl Default for Placeholder {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Placeholder {
    type Cue = ();

    fn game_id(&self) -> GameId {
        GameId {
            game_id: "placeholder".to_string(),
            build_id: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            id: self.game_id(),
            title: "Placeholder".to_string(),
            width: WIDTH,
            height: HEIGHT,
            audio: false,
            clamps_delta: true,
        }
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) {
        self.width = ctx.width();
        self.height = ctx.height();
        ctx.listen_window(&[EventKind::KeyDown, EventKind::KeyUp]);
    }

    fn update(&mut self, dt: f64, _cues: &mut Cues<()>) {
        let dt = clamp_delta(dt);

        let step = NUDGE_SPEED * dt;
        if self.held(Key::ArrowLeft) {
            self.pos.x -= step;
        }
        if self.held(Key::ArrowRight) {
            self.pos.x += step;
        }
        if self.held(Key::ArrowUp) {
            self.pos.y -= step;
        }
        if self.held(Key::ArrowDown) {
            self.pos.y += step;
        }

        self.pos += self.velocity * dt;

        let r = self.radius;
        if self.pos.x - r < 0.0 || self.pos.x + r > self.width {
            self.velocity.x = -self.velocity.x;
            self.pos.x = self.pos.x.clamp(r, self.width - r);
        }
        if self.pos.y - r < 0.0 || self.pos.y + r > self.height {
            self.velocity.y = -self.velocity.y;
            self.pos.y = self.pos.y.clamp(r, self.height - r);
        }
    }

    fn handle_input(&mut self, event: &InputEvent, _cues: &mut Cues<()>) {
        match event {
            InputEvent::KeyDown(key) => {
                self.keys.insert(*key);
            }
            InputEvent::KeyUp(key) => {
                self.keys.remove(key);
            }
            _ => {}
        }
    }

    fn render(&self, canvas: &mut Canvas) {
        canvas.clear(Color::BLACK);
        canvas.fill_circle(self.pos, self.radius, Color::hex(0x646cff));
        canvas.text(
            Vec2::new(self.width / 2.0, 30.0),
            "Use arrow keys to move",
            20.0,
            Color::WHITE,
            TextAlign::Center,
        );
    }

    fn destroy(&mut self) {
        self.keys.clear();
    }

    fn encode_cue(_cue: &(), _out: &mut Vec<Tone>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_drifts_with_velocity() {
        let mut game = Placeholder::new();
        game.update(0.01, &mut Cues::new());
        assert!((game.position().x - 401.5).abs() < 1e-9);
        assert!((game.position().y - 301.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounces_off_right_edge() {
        let mut game = Placeholder::new();
        game.pos = Vec2::new(769.0, 300.0);
        game.update(0.02, &mut Cues::new());
        assert_eq!(game.position().x, 770.0);
        assert_eq!(game.velocity().x, -150.0);
    }

    #[test]
    fn test_arrow_keys_nudge() {
        let mut game = Placeholder::new();
        game.velocity = Vec2::ZERO;
        let mut cues = Cues::new();
        game.handle_input(&InputEvent::KeyDown(Key::ArrowLeft), &mut cues);
        game.update(0.02, &mut cues);
        assert!((game.position().x - 396.0).abs() < 1e-9);

        game.handle_input(&InputEvent::KeyUp(Key::ArrowLeft), &mut cues);
        game.update(0.02, &mut cues);
        assert!((game.position().x - 396.0).abs() < 1e-9);
    }

    #[test]
    fn test_render_draws_ball_and_hint() {
        let game = Placeholder::new();
        let mut canvas = Canvas::new(WIDTH, HEIGHT);
        game.render(&mut canvas);
        assert_eq!(canvas.len(), 3);
        assert_eq!(canvas.texts().next(), Some("Use arrow keys to move"));
    }

    proptest! {
        #[test]
        fn large_delta_matches_clamped(dt in 0.033f64..10.0) {
            let mut a = Placeholder::new();
            let mut b = a.clone();
            a.update(dt, &mut Cues::new());
            b.update(0.033, &mut Cues::new());
            prop_assert_eq!(a.position(), b.position());
        }
    }
}

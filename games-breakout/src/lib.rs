//! Breakout
//!
//! Rainbow brick wall, a paddle with "english" on the rebound, three lives.
//! The paddle follows the mouse (smoothed) or the arrow keys; click, space
//! or enter launches the ball.

pub mod bricks;

use std::f64::consts::{FRAC_PI_2, PI};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use engine_core::audio::{arpeggio, Tone, Waveform};
use engine_core::geom::{Rect, Vec2};
use engine_core::input::{EventKind, InputEvent, Key};
use engine_core::render::{Canvas, Color, TextAlign};
use engine_core::timing::{clamp_delta, smoothing_alpha};
use engine_core::typed::{Capabilities, Cues, Game, GameId, InitContext};

use bricks::BrickWall;

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 800;
const W: f64 = WIDTH as f64;
const H: f64 = HEIGHT as f64;

/// Play field walls
const WALL_LEFT: f64 = 30.0;
const WALL_RIGHT: f64 = W - 30.0;
const WALL_TOP: f64 = 80.0;

const PADDLE_W: f64 = 170.0;
const PADDLE_H: f64 = 16.0;
const PADDLE_Y: f64 = H - 90.0;
const PADDLE_SPEED: f64 = 880.0;

const BALL_RADIUS: f64 = 9.0;
const LAUNCH_SPEED: f64 = 560.0;
const MAX_BALL_SPEED: f64 = 840.0;
const MAX_ENGLISH: f64 = PI * 0.35;

const LIVES: u32 = 3;

/// Sound cues
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    Launch,
    Wall,
    /// Paddle hit, strength in [0, 1] from center to edge
    Paddle(f64),
    /// Brick hit on the given row
    Brick(usize),
    LifeLost,
    Win,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub stuck: bool,
}

/// Breakout game state
#[derive(Debug, Clone)]
pub struct Breakout {
    score: u32,
    lives: u32,
    started: bool,
    game_over: bool,
    won: bool,
    paddle_x: f64,
    ball: Ball,
    wall: BrickWall,
    left: bool,
    right: bool,
    mouse_x: Option<f64>,
    rng: ChaCha20Rng,
}

impl Breakout {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            score: 0,
            lives: LIVES,
            started: false,
            game_over: false,
            won: false,
            paddle_x: (W - PADDLE_W) / 2.0,
            ball: Ball {
                pos: Vec2::new(W / 2.0, PADDLE_Y - 18.0),
                vel: Vec2::ZERO,
                stuck: true,
            },
            wall: BrickWall::new(),
            left: false,
            right: false,
            mouse_x: None,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn ball(&self) -> Ball {
        self.ball
    }

    pub fn paddle(&self) -> Rect {
        Rect::new(self.paddle_x, PADDLE_Y, PADDLE_W, PADDLE_H)
    }

    pub fn bricks(&self) -> &BrickWall {
        &self.wall
    }

    /// New wall, full lives, ball back on the paddle
    pub fn restart(&mut self) {
        self.score = 0;
        self.lives = LIVES;
        self.started = false;
        self.game_over = false;
        self.won = false;
        self.paddle_x = (W - PADDLE_W) / 2.0;
        self.ball = Ball {
            pos: Vec2::new(W / 2.0, PADDLE_Y - 18.0),
            vel: Vec2::ZERO,
            stuck: true,
        };
        self.wall = BrickWall::new();
    }

    fn launch(&mut self, cues: &mut Cues<Cue>) {
        if self.game_over || self.won || !self.ball.stuck {
            return;
        }
        cues.resume_audio();
        self.started = true;
        self.ball.stuck = false;
        let angle = -FRAC_PI_2 + self.rng.gen_range(-0.3..0.3);
        self.ball.vel = Vec2::from_angle(angle) * LAUNCH_SPEED;
        cues.play(Cue::Launch);
    }

    fn move_paddle(&mut self, dt: f64) {
        match self.mouse_x {
            Some(mx) => {
                let target = mx - PADDLE_W / 2.0;
                self.paddle_x += (target - self.paddle_x) * smoothing_alpha(dt);
            }
            None => {
                let dir = f64::from(i8::from(self.right) - i8::from(self.left));
                self.paddle_x += dir * PADDLE_SPEED * dt;
            }
        }
        self.paddle_x = self.paddle_x.clamp(WALL_LEFT, WALL_RIGHT - PADDLE_W);
    }

    fn bounce_walls(&mut self, cues: &mut Cues<Cue>) {
        let b = &mut self.ball;
        if b.pos.x - BALL_RADIUS < WALL_LEFT {
            b.pos.x = WALL_LEFT + BALL_RADIUS;
            b.vel.x = -b.vel.x;
            cues.play(Cue::Wall);
        }
        if b.pos.x + BALL_RADIUS > WALL_RIGHT {
            b.pos.x = WALL_RIGHT - BALL_RADIUS;
            b.vel.x = -b.vel.x;
            cues.play(Cue::Wall);
        }
        if b.pos.y - BALL_RADIUS < WALL_TOP {
            b.pos.y = WALL_TOP + BALL_RADIUS;
            b.vel.y = -b.vel.y;
            cues.play(Cue::Wall);
        }
    }

    fn bounce_paddle(&mut self, cues: &mut Cues<Cue>) {
        let paddle = self.paddle();
        let b = &mut self.ball;
        let bottom = b.pos.y + BALL_RADIUS;
        let hits = bottom >= paddle.y
            && bottom <= paddle.bottom() + 8.0
            && b.pos.x >= paddle.x
            && b.pos.x <= paddle.right()
            && b.vel.y > 0.0;
        if !hits {
            return;
        }

        b.pos.y = paddle.y - BALL_RADIUS - 0.5;
        let hit = (b.pos.x - paddle.center().x) / (PADDLE_W / 2.0);
        let angle = -FRAC_PI_2 + hit * MAX_ENGLISH;
        let speed = (b.vel.length() * 1.01).min(MAX_BALL_SPEED);
        b.vel = Vec2::from_angle(angle) * speed;
        cues.play(Cue::Paddle(hit.abs().min(1.0)));
    }

    fn break_bricks(&mut self, cues: &mut Cues<Cue>) {
        let Some(brick) = self.wall.hit(self.ball.pos, BALL_RADIUS) else {
            return;
        };
        self.score += 10;
        cues.play(Cue::Brick(brick.row));

        // Reflect on the axis the ball is furthest out along
        let c = brick.rect.center();
        let dx = (self.ball.pos.x - c.x) / (brick.rect.w / 2.0);
        let dy = (self.ball.pos.y - c.y) / (brick.rect.h / 2.0);
        if dx.abs() > dy.abs() {
            self.ball.vel.x = -self.ball.vel.x;
        } else {
            self.ball.vel.y = -self.ball.vel.y;
        }

        if self.wall.remaining() == 0 {
            self.won = true;
            debug!(score = self.score, "Breakout cleared");
            cues.play(Cue::Win);
        }
    }

    fn check_bottom(&mut self, cues: &mut Cues<Cue>) {
        if self.ball.pos.y - BALL_RADIUS <= H + 40.0 {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.game_over = true;
            debug!(score = self.score, "Breakout game over");
            cues.play(Cue::GameOver);
        } else {
            self.ball.stuck = true;
            self.ball.vel = Vec2::ZERO;
            cues.play(Cue::LifeLost);
        }
    }
}

impl Default for Breakout {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Game for Breakout {
    type Cue = Cue;

    fn game_id(&self) -> GameId {
        GameId {
            game_id: "breakout".to_string(),
            build_id: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            id: self.game_id(),
            title: "Breakout".to_string(),
            width: WIDTH,
            height: HEIGHT,
            audio: true,
            clamps_delta: true,
        }
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) {
        *self = Self::with_seed(ctx.seed());
        ctx.listen_window(&[EventKind::KeyDown, EventKind::KeyUp]);
        ctx.listen_surface(&[EventKind::MouseMove, EventKind::Click]);
    }

    fn update(&mut self, dt: f64, cues: &mut Cues<Cue>) {
        let dt = clamp_delta(dt);
        self.move_paddle(dt);

        if self.ball.stuck {
            self.ball.pos = Vec2::new(self.paddle_x + PADDLE_W / 2.0, PADDLE_Y - BALL_RADIUS - 6.0);
            return;
        }
        if self.game_over || self.won {
            return;
        }

        self.ball.pos += self.ball.vel * dt;
        self.bounce_walls(cues);
        self.bounce_paddle(cues);
        self.break_bricks(cues);
        self.check_bottom(cues);
    }

    fn handle_input(&mut self, event: &InputEvent, cues: &mut Cues<Cue>) {
        match event {
            InputEvent::KeyDown(Key::ArrowLeft) => self.left = true,
            InputEvent::KeyDown(Key::ArrowRight) => self.right = true,
            InputEvent::KeyDown(Key::Space | Key::Enter) => self.launch(cues),
            InputEvent::KeyDown(k) if k.is_letter('a') => self.left = true,
            InputEvent::KeyDown(k) if k.is_letter('d') => self.right = true,
            InputEvent::KeyDown(k) if k.is_letter('r') => self.restart(),
            InputEvent::KeyUp(Key::ArrowLeft) => self.left = false,
            InputEvent::KeyUp(Key::ArrowRight) => self.right = false,
            InputEvent::KeyUp(k) if k.is_letter('a') => self.left = false,
            InputEvent::KeyUp(k) if k.is_letter('d') => self.right = false,
            InputEvent::MouseMove(p) => self.mouse_x = Some(p.x),
            InputEvent::Click(_) => self.launch(cues),
            _ => {}
        }
    }

    fn render(&self, canvas: &mut Canvas) {
        let field = Rect::new(WALL_LEFT, WALL_TOP, W - 60.0, H - 140.0);
        canvas.clear(Color::hex(0x1a1a1a));
        canvas.fill_rect(field, Color::hex(0x0b0b0e));

        for brick in self.wall.alive() {
            canvas.fill_rect(brick.rect, brick.color);
        }

        let accent = Color::hex(0xff6b6b);
        canvas.fill_rect(self.paddle(), accent);
        canvas.fill_circle(self.ball.pos, BALL_RADIUS, accent);

        let hud = Color::hex(0xe6e6e6);
        canvas.text(Vec2::new(60.0, 60.0), format!("{:03}", self.score), 44.0, hud, TextAlign::Left);
        canvas.text(Vec2::new(W - 60.0, 60.0), self.lives.to_string(), 44.0, hud, TextAlign::Right);

        if !self.started {
            canvas.text(
                Vec2::new(W / 2.0, H - 40.0),
                "Click / Space to launch \u{2022} Move with Mouse or \u{2190} \u{2192}",
                20.0,
                hud.alpha(0.9),
                TextAlign::Center,
            );
        }

        if self.game_over || self.won {
            canvas.fill_rect(field, Color::BLACK.alpha(0.55));
            let banner = if self.won { "YOU WIN" } else { "GAME OVER" };
            canvas.text(Vec2::new(W / 2.0, H / 2.0 - 10.0), banner, 56.0, Color::WHITE, TextAlign::Center);
            canvas.text(
                Vec2::new(W / 2.0, H / 2.0 + 40.0),
                "Press R to restart",
                22.0,
                Color::WHITE,
                TextAlign::Center,
            );
        }
    }

    fn destroy(&mut self) {
        self.left = false;
        self.right = false;
        self.mouse_x = None;
    }

    fn encode_cue(cue: &Cue, out: &mut Vec<Tone>) {
        match *cue {
            Cue::Launch => out.push(Tone::new(Waveform::Triangle, 660.0, 0.09, 0.09).glide(990.0)),
            Cue::Wall => out.push(Tone::new(Waveform::Square, 220.0, 0.05, 0.05).glide(180.0)),
            Cue::Paddle(strength) => {
                let f = 260.0 + 220.0 * strength.clamp(0.0, 1.0);
                out.push(Tone::new(Waveform::Sine, f, 0.07, 0.07).glide(f * 0.75));
            }
            Cue::Brick(row) => {
                const ROW_PITCH: [f64; 6] = [988.0, 880.0, 784.0, 659.0, 523.0, 392.0];
                let base = ROW_PITCH[row % ROW_PITCH.len()];
                out.push(Tone::new(Waveform::Sine, base, 0.06, 0.07).glide(base * 0.9));
            }
            Cue::LifeLost => out.push(Tone::new(Waveform::Sawtooth, 220.0, 0.22, 0.08).glide(110.0)),
            Cue::Win => arpeggio(Waveform::Sine, &[523.25, 659.25, 783.99, 1046.5], 0.06, 0.18, 0.06, out),
            Cue::GameOver => out.push(Tone::new(Waveform::Sawtooth, 196.0, 0.35, 0.09).glide(82.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn in_play(pos: Vec2, vel: Vec2) -> Breakout {
        let mut game = Breakout::with_seed(1);
        game.started = true;
        game.ball = Ball { pos, vel, stuck: false };
        game
    }

    #[test]
    fn test_ball_follows_paddle_until_launch() {
        let mut game = Breakout::with_seed(1);
        let mut cues = Cues::new();
        game.handle_input(&InputEvent::KeyDown(Key::ArrowRight), &mut cues);
        game.update(0.016, &mut cues);
        let ball = game.ball();
        assert!(ball.stuck);
        assert_eq!(ball.pos.x, game.paddle().center().x);
        assert_eq!(ball.pos.y, PADDLE_Y - BALL_RADIUS - 6.0);
        assert!(cues.is_empty());
    }

    #[test]
    fn test_launch_goes_mostly_up() {
        let mut game = Breakout::with_seed(5);
        let mut cues = Cues::new();
        game.handle_input(&InputEvent::Click(Vec2::new(600.0, 400.0)), &mut cues);
        let ball = game.ball();
        assert!(!ball.stuck);
        assert!(ball.vel.y < 0.0);
        assert!((ball.vel.length() - LAUNCH_SPEED).abs() < 1e-6);
        assert!(ball.vel.x.abs() <= LAUNCH_SPEED * 0.3f64.sin() + 1e-9);
        assert!(cues.resume_requested());
        assert_eq!(cues.iter().copied().collect::<Vec<_>>(), vec![Cue::Launch]);

        // A second launch while in flight is ignored
        game.handle_input(&InputEvent::KeyDown(Key::Space), &mut cues);
        assert_eq!(cues.len(), 1);
    }

    #[test]
    fn test_top_wall_flips_and_clamps() {
        let mut game = in_play(Vec2::new(600.0, 92.0), Vec2::new(0.0, -560.0));
        let mut cues = Cues::new();
        game.update(0.016, &mut cues);
        let ball = game.ball();
        assert_eq!(ball.pos.y, WALL_TOP + BALL_RADIUS);
        assert_eq!(ball.vel.y, 560.0);
        assert_eq!(cues.iter().copied().collect::<Vec<_>>(), vec![Cue::Wall]);
    }

    #[test]
    fn test_side_walls_flip() {
        let mut game = in_play(Vec2::new(40.0, 500.0), Vec2::new(-300.0, 0.0));
        game.update(0.033, &mut Cues::new());
        assert_eq!(game.ball().pos.x, WALL_LEFT + BALL_RADIUS);
        assert_eq!(game.ball().vel.x, 300.0);
    }

    #[test]
    fn test_paddle_english() {
        let center = (W - PADDLE_W) / 2.0 + PADDLE_W / 2.0;
        // Dead center goes straight up
        let mut game = in_play(Vec2::new(center, PADDLE_Y - 10.0), Vec2::new(0.0, 400.0));
        game.update(0.016, &mut Cues::new());
        let ball = game.ball();
        assert!(ball.vel.x.abs() < 1e-9);
        assert!((ball.vel.length() - 404.0).abs() < 1e-9);
        assert_eq!(ball.pos.y, PADDLE_Y - BALL_RADIUS - 0.5);

        // Right edge kicks right
        let mut game = in_play(Vec2::new(center + 80.0, PADDLE_Y - 10.0), Vec2::new(0.0, 400.0));
        game.update(0.016, &mut Cues::new());
        assert!(game.ball().vel.x > 0.0);
        assert!(game.ball().vel.y < 0.0);
    }

    #[test]
    fn test_paddle_speed_cap() {
        let center = (W - PADDLE_W) / 2.0 + PADDLE_W / 2.0;
        let mut game = in_play(Vec2::new(center, PADDLE_Y - 5.0), Vec2::new(0.0, 839.0));
        game.update(0.001, &mut Cues::new());
        assert!((game.ball().vel.length() - MAX_BALL_SPEED).abs() < 1e-9);
    }

    #[test]
    fn test_brick_hit_scores_and_reflects() {
        let first = game_brick_rect(0);
        let mut game = in_play(
            Vec2::new(first.center().x, first.bottom() + 12.0),
            Vec2::new(0.0, -300.0),
        );
        let before = game.bricks().remaining();
        let mut cues = Cues::new();
        game.update(0.016, &mut cues);
        assert_eq!(game.score(), 10);
        assert_eq!(game.bricks().remaining(), before - 1);
        assert!(game.ball().vel.y > 0.0);
        assert!(cues.iter().any(|c| matches!(c, Cue::Brick(5))));
    }

    fn game_brick_rect(col: usize) -> Rect {
        // Bottom row (5), given column
        BrickWall::new()
            .alive()
            .find(|b| b.row == 5 && b.col == col)
            .map(|b| b.rect)
            .expect("brick present")
    }

    #[test]
    fn test_losing_all_lives() {
        let mut game = in_play(Vec2::new(600.0, H + 60.0), Vec2::new(0.0, 300.0));
        let mut cues = Cues::new();
        game.update(0.016, &mut cues);
        assert_eq!(game.lives(), 2);
        assert!(game.ball().stuck);

        for _ in 0..2 {
            game.ball = Ball {
                pos: Vec2::new(600.0, H + 60.0),
                vel: Vec2::new(0.0, 300.0),
                stuck: false,
            };
            game.update(0.016, &mut cues);
        }
        assert_eq!(game.lives(), 0);
        assert!(game.is_game_over());
        assert_eq!(cues.iter().filter(|c| **c == Cue::LifeLost).count(), 2);
        assert_eq!(cues.iter().last(), Some(&Cue::GameOver));

        // Frozen until restart
        game.update(0.016, &mut cues);
        assert_eq!(game.lives(), 0);
        game.handle_input(&InputEvent::KeyDown(Key::Char('r')), &mut cues);
        assert_eq!(game.lives(), LIVES);
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_last_brick_wins() {
        let mut game = Breakout::with_seed(1);
        let target = game_brick_rect(0);
        game.wall.clear_except(target);
        game.started = true;
        game.ball = Ball {
            pos: Vec2::new(target.center().x, target.bottom() + 12.0),
            vel: Vec2::new(0.0, -300.0),
            stuck: false,
        };
        let mut cues = Cues::new();
        game.update(0.016, &mut cues);
        assert!(game.is_won());
        assert!(cues.iter().any(|c| *c == Cue::Win));

        let mut canvas = Canvas::new(WIDTH, HEIGHT);
        game.render(&mut canvas);
        assert!(canvas.texts().any(|t| t == "YOU WIN"));
    }

    #[test]
    fn test_win_tones() {
        let mut tones = Vec::new();
        Breakout::encode_cue(&Cue::Win, &mut tones);
        assert_eq!(tones.len(), 4);
        assert!((tones[3].delay - 0.18).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn large_delta_matches_clamped(dt in 0.033f64..10.0, vx in -400.0f64..400.0) {
            let mut a = in_play(Vec2::new(600.0, 500.0), Vec2::new(vx, -400.0));
            let mut b = a.clone();
            a.update(dt, &mut Cues::new());
            b.update(0.033, &mut Cues::new());
            prop_assert_eq!(a.ball(), b.ball());
        }
    }
}

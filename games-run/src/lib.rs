//! Run
//!
//! Endless tunnel runner in space. The runner moves forward on its own and
//! slides left and right across the current platform; jumping flips onto
//! the next wall of the tunnel and the camera rolls to follow. Falling
//! through a hole or onto a missing wall ends the run.

pub mod tunnel;

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use engine_core::audio::Tone;
use engine_core::geom::{Rect, Vec2};
use engine_core::input::{EventKind, InputEvent, Key};
use engine_core::render::{Canvas, Color, TextAlign};
use engine_core::timing::clamp_delta;
use engine_core::typed::{Capabilities, Cues, Game, GameId, InitContext};

use tunnel::{Footing, Platform, Tunnel, Wall, SEGMENT_LENGTH};

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 800;
const W: f64 = WIDTH as f64;
const H: f64 = HEIGHT as f64;

const START_Z: f64 = 100.0;
const START_SPEED: f64 = 300.0;
const MAX_SPEED: f64 = 600.0;
const ACCELERATION: f64 = 10.0;
/// Lateral speed in platform widths per second
const STRAFE_SPEED: f64 = 3.0;
const STRAFE_FRICTION: f64 = 0.8;
const JUMP_COOLDOWN: f64 = 0.3;
const CAMERA_FOLLOW: f64 = 8.0;

const TUNNEL_WIDTH: f64 = 300.0;
/// Perspective focal length for tunnel geometry
const FOCAL: f64 = 400.0;
const STAR_FOCAL: f64 = 600.0;
const STAR_COUNT: usize = 200;

const SPACE: Color = Color::hex(0x050510);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Runner {
    /// Lateral position on the current wall, -1 to 1
    pub x: f64,
    pub z: f64,
    pub wall: Wall,
    pub vx: f64,
    pub speed: f64,
    pub jump_cooldown: f64,
}

impl Runner {
    fn new() -> Self {
        Self {
            x: 0.0,
            z: START_Z,
            wall: Wall::Floor,
            vx: 0.0,
            speed: START_SPEED,
            jump_cooldown: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Particle {
    pos: DVec3,
    vel: DVec3,
    life: f64,
    size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Star {
    pos: DVec3,
    size: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Controls {
    jump: bool,
    left: bool,
    right: bool,
}

fn perspective(focal: f64, depth: f64) -> f64 {
    focal / (depth + focal)
}

#[derive(Debug, Clone)]
pub struct Run {
    runner: Runner,
    tunnel: Tunnel,
    particles: Vec<Particle>,
    stars: Vec<Star>,
    /// Camera roll in degrees, easing toward `target_rotation`
    rotation: f64,
    target_rotation: f64,
    score: u64,
    game_over: bool,
    controls: Controls,
    rng: ChaCha20Rng,
}

impl Run {
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: DVec3::new(
                    (rng.gen::<f64>() - 0.5) * 3000.0,
                    (rng.gen::<f64>() - 0.5) * 3000.0,
                    rng.gen::<f64>() * 5000.0,
                ),
                size: 0.5 + rng.gen::<f64>() * 1.5,
            })
            .collect();
        let tunnel = Tunnel::new(&mut rng);
        Self {
            runner: Runner::new(),
            tunnel,
            particles: Vec::new(),
            stars,
            rotation: 0.0,
            target_rotation: 0.0,
            score: 0,
            game_over: false,
            controls: Controls::default(),
            rng,
        }
    }

    pub fn runner(&self) -> Runner {
        self.runner
    }

    pub fn tunnel(&self) -> &Tunnel {
        &self.tunnel
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Fresh runner and tunnel; the star field is kept
    pub fn reset(&mut self) {
        self.runner = Runner::new();
        self.rotation = 0.0;
        self.target_rotation = 0.0;
        self.tunnel = Tunnel::new(&mut self.rng);
        self.score = 0;
        self.game_over = false;
        self.particles.clear();
    }

    fn strafe(&mut self, dt: f64) {
        let runner = &mut self.runner;
        runner.vx = match (self.controls.left, self.controls.right) {
            (true, _) => -STRAFE_SPEED * dt,
            (false, true) => STRAFE_SPEED * dt,
            (false, false) => runner.vx * STRAFE_FRICTION,
        };
        runner.x = (runner.x + runner.vx).clamp(-1.0, 1.0);
    }

    fn jump(&mut self) {
        if !self.controls.jump || self.runner.jump_cooldown > 0.0 {
            return;
        }
        self.runner.jump_cooldown = JUMP_COOLDOWN;
        self.runner.wall = self.runner.wall.next();
        // Keep rolling the same way rather than unwinding after a full turn
        self.target_rotation -= 90.0;
        let origin = DVec3::new(self.runner.x * 200.0, 0.0, self.runner.z);
        self.burst(origin, 20);
    }

    fn burst(&mut self, origin: DVec3, count: usize) {
        for _ in 0..count {
            let angle = self.rng.gen_range(0.0..std::f64::consts::TAU);
            let speed = self.rng.gen_range(50.0..150.0) * 0.5;
            self.particles.push(Particle {
                pos: origin,
                vel: DVec3::new(
                    angle.cos() * speed,
                    angle.sin() * speed,
                    (self.rng.gen::<f64>() - 0.5) * 100.0,
                ),
                life: 1.0,
                size: self.rng.gen_range(2.0..5.0),
            });
        }
    }

    fn check_footing(&mut self) {
        let r = self.runner;
        match self.tunnel.footing(r.z, r.wall, r.x) {
            Footing::Hole | Footing::Open => {
                self.game_over = true;
                debug!(score = self.score, wall = ?r.wall, "Run over");
            }
            Footing::Solid | Footing::Unknown => {}
        }
    }

    fn update_particles(&mut self, dt: f64) {
        for p in &mut self.particles {
            p.pos += p.vel * dt;
            p.life -= dt * 2.0;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    fn render_stars(&self, canvas: &mut Canvas) {
        for star in &self.stars {
            let depth = star.pos.z - self.runner.z;
            if depth <= -500.0 || depth >= 3000.0 {
                continue;
            }
            let scale = perspective(STAR_FOCAL, depth);
            let size = star.size * scale;
            let alpha = (scale * 2.0).min(1.0) * 0.8;
            canvas.fill_rect(
                Rect::new(
                    W / 2.0 + star.pos.x * scale - size / 2.0,
                    H / 2.0 + star.pos.y * scale - size / 2.0,
                    size,
                    size,
                ),
                Color::WHITE.alpha(alpha),
            );
        }
    }

    fn render_tunnel(&self, canvas: &mut Canvas) {
        for segment in self.tunnel.segments() {
            let near = segment.z - self.runner.z;
            if near < -200.0 || near > 1500.0 {
                continue;
            }
            let w = TUNNEL_WIDTH * perspective(FOCAL, near);
            let far_w = TUNNEL_WIDTH * perspective(FOCAL, near + SEGMENT_LENGTH);
            for wall in Wall::ALL {
                if let Some(platform) = segment.platform(wall) {
                    Self::render_platform(canvas, wall, w, far_w, platform);
                }
            }
        }
    }

    /// Edge of a wall at the given tunnel width, from its -1 side to its +1 side
    fn wall_edge(wall: Wall, w: f64) -> (Vec2, Vec2) {
        let h = w / 2.0;
        match wall {
            Wall::Floor => (Vec2::new(-h, h), Vec2::new(h, h)),
            Wall::Right => (Vec2::new(h, h), Vec2::new(h, -h)),
            Wall::Ceiling => (Vec2::new(h, -h), Vec2::new(-h, -h)),
            Wall::Left => (Vec2::new(-h, -h), Vec2::new(-h, h)),
        }
    }

    fn render_platform(canvas: &mut Canvas, wall: Wall, w: f64, far_w: f64, platform: &Platform) {
        let (a, b) = Self::wall_edge(wall, w);
        let (fa, fb) = Self::wall_edge(wall, far_w);
        let across = |x: f64| (x + 1.0) / 2.0;

        canvas.polygon(vec![a, b, fb, fa], Color::hex(0x1a1a2e), true);
        canvas.polygon(vec![a, b, fb, fa], Color::hex(0x444444), false);

        for hole in &platform.holes {
            let (l, r) = (across(hole.left()), across(hole.right()));
            let quad = vec![a.lerp(b, l), a.lerp(b, r), fa.lerp(fb, r), fa.lerp(fb, l)];
            canvas.polygon(quad.clone(), SPACE, true);
            canvas.polygon(quad, Color::rgb(100, 50, 150).alpha(0.5), false);
        }

        let grid = Color::WHITE.alpha(0.1);
        for i in 0..=4 {
            let t = f64::from(i) / 4.0;
            canvas.line(a.lerp(b, t), fa.lerp(fb, t), grid, 1.0);
        }
    }

    fn render_runner(&self, canvas: &mut Canvas) {
        let body = Color::hex(0x9ca3af);
        let at = Vec2::new(self.runner.x * 150.0, 150.0);
        canvas.fill_ellipse(at, Vec2::new(12.0, 16.0), 0.0, body);
        canvas.line(at + Vec2::new(-8.0, 2.0), at + Vec2::new(-14.0, -2.0), body, 4.0);
        canvas.line(at + Vec2::new(8.0, 2.0), at + Vec2::new(14.0, -2.0), body, 4.0);
        let eye = Color::hex(0xfbbf24);
        canvas.fill_circle(at + Vec2::new(-4.0, -4.0), 3.0, eye);
        canvas.fill_circle(at + Vec2::new(4.0, -4.0), 3.0, eye);
    }

    fn render_particles(&self, canvas: &mut Canvas) {
        for p in &self.particles {
            let depth = p.pos.z - self.runner.z;
            if depth <= -200.0 || depth >= 1000.0 {
                continue;
            }
            let scale = perspective(FOCAL, depth);
            let size = p.size * scale;
            canvas.fill_rect(
                Rect::new(p.pos.x * scale - size / 2.0, p.pos.y * scale - size / 2.0, size, size),
                Color::WHITE.alpha((p.life * scale).clamp(0.0, 1.0)),
            );
        }
    }

    fn render_hud(&self, canvas: &mut Canvas) {
        if self.game_over {
            canvas.fill_rect(Rect::new(0.0, 0.0, W, H), Color::BLACK.alpha(0.7));
            canvas.text(Vec2::new(W / 2.0, H / 2.0 - 40.0), "GAME OVER", 48.0, Color::WHITE, TextAlign::Center);
            canvas.text(
                Vec2::new(W / 2.0, H / 2.0 + 20.0),
                format!("Score: {}", self.score),
                24.0,
                Color::WHITE,
                TextAlign::Center,
            );
            canvas.text(
                Vec2::new(W / 2.0, H / 2.0 + 60.0),
                "Press R to restart",
                18.0,
                Color::WHITE.alpha(0.7),
                TextAlign::Center,
            );
            return;
        }
        canvas.fill_rect(Rect::new(20.0, 18.0, 380.0, 54.0), Color::BLACK.alpha(0.6));
        canvas.text(
            Vec2::new(36.0, 48.0),
            format!("Run \u{2022} {}", self.score),
            20.0,
            Color::WHITE.alpha(0.95),
            TextAlign::Left,
        );
        canvas.text(
            Vec2::new(36.0, 68.0),
            "SPACE to flip \u{2022} Arrow keys to move \u{2022} R to reset",
            14.0,
            Color::WHITE.alpha(0.85),
            TextAlign::Left,
        );
    }

    fn set_key(&mut self, key: Key, down: bool) {
        match key {
            Key::Space | Key::ArrowUp => self.controls.jump = down,
            Key::ArrowLeft => self.controls.left = down,
            Key::ArrowRight => self.controls.right = down,
            k if k.is_letter('w') => self.controls.jump = down,
            k if k.is_letter('a') => self.controls.left = down,
            k if k.is_letter('d') => self.controls.right = down,
            _ => {}
        }
    }
}

impl Default for Run {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Game for Run {
    type Cue = ();

    fn game_id(&self) -> GameId {
        GameId {
            game_id: "run".to_string(),
            build_id: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            id: self.game_id(),
            title: "Run".to_string(),
            width: WIDTH,
            height: HEIGHT,
            audio: false,
            clamps_delta: true,
        }
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) {
        *self = Self::with_seed(ctx.seed());
        ctx.listen_window(&[EventKind::KeyDown, EventKind::KeyUp, EventKind::PointerUp]);
        ctx.listen_surface(&[EventKind::PointerDown]);
    }

    fn update(&mut self, dt: f64, _cues: &mut Cues<()>) {
        if self.game_over {
            return;
        }
        let dt = clamp_delta(dt);

        let runner = &mut self.runner;
        runner.z += runner.speed * dt;
        runner.speed = (runner.speed + dt * ACCELERATION).min(MAX_SPEED);
        self.score = (runner.z / 10.0) as u64;

        self.strafe(dt);
        self.jump();
        if self.runner.jump_cooldown > 0.0 {
            self.runner.jump_cooldown -= dt;
        }
        self.rotation += (self.target_rotation - self.rotation) * dt * CAMERA_FOLLOW;

        self.check_footing();
        self.tunnel.advance(self.runner.z, &mut self.rng);
        self.update_particles(dt);
    }

    fn handle_input(&mut self, event: &InputEvent, _cues: &mut Cues<()>) {
        match event {
            InputEvent::KeyDown(k) if k.is_letter('r') => self.reset(),
            InputEvent::KeyDown(k) => self.set_key(*k, true),
            InputEvent::KeyUp(k) => self.set_key(*k, false),
            InputEvent::PointerDown(_) => self.controls.jump = true,
            InputEvent::PointerUp(_) => self.controls.jump = false,
            _ => {}
        }
    }

    fn render(&self, canvas: &mut Canvas) {
        canvas.clear(SPACE);
        self.render_stars(canvas);

        canvas.push_transform(Vec2::new(W / 2.0, H / 2.0), self.rotation.to_radians());
        self.render_tunnel(canvas);
        self.render_runner(canvas);
        self.render_particles(canvas);
        canvas.pop_transform();

        self.render_hud(canvas);
    }

    fn destroy(&mut self) {
        self.controls = Controls::default();
    }

    fn encode_cue(_cue: &(), _out: &mut Vec<Tone>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tunnel::Hole;

    fn press(game: &mut Run, key: Key) {
        game.handle_input(&InputEvent::KeyDown(key), &mut Cues::new());
    }

    fn release(game: &mut Run, key: Key) {
        game.handle_input(&InputEvent::KeyUp(key), &mut Cues::new());
    }

    #[test]
    fn test_runs_forward_and_speeds_up() {
        let mut game = Run::with_seed(3);
        for _ in 0..30 {
            game.update(0.02, &mut Cues::new());
        }
        let runner = game.runner();
        assert!(!game.is_game_over());
        assert!(runner.z > START_Z + 300.0 * 0.6 - 1e-6);
        assert!((runner.speed - (START_SPEED + 6.0)).abs() < 1e-9);
        assert_eq!(game.score(), (runner.z / 10.0) as u64);
        assert!(game.tunnel().end() >= runner.z + tunnel::LOOKAHEAD);
    }

    #[test]
    fn test_speed_caps() {
        let mut game = Run::with_seed(3);
        game.runner.speed = MAX_SPEED - 0.1;
        game.update(0.03, &mut Cues::new());
        assert_eq!(game.runner().speed, MAX_SPEED);
    }

    #[test]
    fn test_strafe_clamps_and_glides() {
        let mut game = Run::with_seed(2);
        press(&mut game, Key::Char('d'));
        for _ in 0..20 {
            game.update(0.03, &mut Cues::new());
        }
        assert_eq!(game.runner().x, 1.0);
        release(&mut game, Key::Char('d'));
        press(&mut game, Key::ArrowLeft);
        game.update(0.03, &mut Cues::new());
        assert!((game.runner().vx + 0.09).abs() < 1e-12);
        release(&mut game, Key::ArrowLeft);
        game.update(0.03, &mut Cues::new());
        assert!((game.runner().vx + 0.072).abs() < 1e-12);
    }

    #[test]
    fn test_jump_rotates_to_next_wall_with_cooldown() {
        let mut game = Run::with_seed(6);
        // Solid ground on every wall near the start
        for segment in [100.0, 200.0] {
            if let Some(s) = game.tunnel.segment_at_mut(segment) {
                s.walls = std::array::from_fn(|_| Some(Platform::default()));
            }
        }
        press(&mut game, Key::Space);
        game.update(0.01, &mut Cues::new());
        assert_eq!(game.runner().wall, Wall::Right);
        assert_eq!(game.particles.len(), 20);
        assert!(game.rotation() < 0.0);

        // Held jump waits out the cooldown
        game.update(0.01, &mut Cues::new());
        assert_eq!(game.runner().wall, Wall::Right);
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_missing_wall_ends_run() {
        let mut game = Run::with_seed(6);
        press(&mut game, Key::Char('w'));
        game.update(0.01, &mut Cues::new());
        // The opening walls are bare, so the flip lands in open space
        assert_eq!(game.runner().wall, Wall::Right);
        assert!(game.is_game_over());
    }

    #[test]
    fn test_hole_ends_run_and_freezes() {
        let mut game = Run::with_seed(8);
        let ahead = game.runner().z + 5.0;
        let segment = game.tunnel.segment_at_mut(ahead).expect("segment");
        segment.walls[Wall::Floor.index()] = Some(Platform {
            holes: vec![Hole {
                center: 0.0,
                width: 0.3,
            }],
        });
        game.update(0.01, &mut Cues::new());
        assert!(game.is_game_over());

        let frozen = game.runner();
        game.update(0.03, &mut Cues::new());
        assert_eq!(game.runner(), frozen);

        let mut canvas = Canvas::new(WIDTH, HEIGHT);
        game.render(&mut canvas);
        assert!(canvas.texts().any(|t| t == "GAME OVER"));
    }

    #[test]
    fn test_reset() {
        let mut game = Run::with_seed(8);
        game.game_over = true;
        game.runner.z = 4000.0;
        game.score = 400;
        press(&mut game, Key::Char('R'));
        assert!(!game.is_game_over());
        assert_eq!(game.runner(), Runner::new());
        assert_eq!(game.score(), 0);
        assert_eq!(game.tunnel().segments().next().map(|s| s.z), Some(0.0));
    }

    #[test]
    fn test_pointer_jumps() {
        let mut game = Run::with_seed(1);
        game.handle_input(&InputEvent::PointerDown(Vec2::new(600.0, 400.0)), &mut Cues::new());
        assert!(game.controls.jump);
        game.handle_input(&InputEvent::PointerUp(Vec2::new(600.0, 400.0)), &mut Cues::new());
        assert!(!game.controls.jump);
    }

    #[test]
    fn test_particles_fade() {
        let mut game = Run::with_seed(1);
        game.burst(DVec3::new(0.0, 0.0, 200.0), 5);
        let first = game.particles[0];
        game.update_particles(0.03);
        let moved = game.particles[0];
        assert!((moved.pos - (first.pos + first.vel * 0.03)).length() < 1e-9);
        assert!((moved.life - 0.94).abs() < 1e-9);
        for _ in 0..19 {
            game.update_particles(0.03);
        }
        assert!(game.particles.is_empty());
    }

    proptest! {
        #[test]
        fn large_delta_matches_clamped(dt in 0.033f64..10.0) {
            let mut a = Run::with_seed(4);
            let mut b = a.clone();
            a.update(dt, &mut Cues::new());
            b.update(0.033, &mut Cues::new());
            prop_assert_eq!(a.runner(), b.runner());
            prop_assert_eq!(a.score(), b.score());
        }
    }
}

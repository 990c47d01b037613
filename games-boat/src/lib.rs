//! Top-down boat steering game
//!
//! Sail a small boat around an island archipelago and collect buoys. The
//! keyboard steers and throttles; holding the pointer steers toward it,
//! with throttle growing with its distance from the screen anchor.

pub mod world;

use std::f64::consts::{FRAC_PI_2, PI};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use engine_core::audio::Tone;
use engine_core::geom::{angle_diff, Rect, Vec2};
use engine_core::input::{EventKind, InputEvent, Key};
use engine_core::render::{Canvas, Color, TextAlign};
use engine_core::timing::{clamp_delta, smoothing_alpha, ticks};
use engine_core::typed::{Capabilities, Cues, Game, GameId, InitContext};

use world::{Island, WORLD_H, WORLD_W};

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 800;

const ISLAND_COUNT: usize = 14;
const BUOY_COUNT: usize = 16;
const BUOY_PICKUP_RADIUS: f64 = 48.0;
const EDGE_MARGIN: f64 = 70.0;

/// Seed of the default archipelago
pub const DEFAULT_SEED: u64 = 0x626f6174;

/// Boat handling constants
const MAX_SPEED: f64 = 520.0;
const MIN_SPEED: f64 = -160.0;
const ACCEL: f64 = 520.0;
const TURN_RATE: f64 = 2.8;
const DRAG: f64 = 0.985;
const BOAT_RADIUS: f64 = 22.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hull {
    pub pos: Vec2,
    pub angle: f64,
    pub speed: f64,
}

impl Hull {
    fn at_spawn() -> Self {
        Self {
            pos: spawn_point(),
            angle: -FRAC_PI_2,
            speed: 0.0,
        }
    }
}

fn spawn_point() -> Vec2 {
    Vec2::new(WORLD_W * 0.5, WORLD_H * 0.6)
}

#[derive(Debug, Clone, Copy, Default)]
struct Controls {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    pointer: Option<Vec2>,
}

/// Boat game state
#[derive(Debug, Clone)]
pub struct Boat {
    boat: Hull,
    camera: Vec2,
    score: u32,
    islands: Vec<Island>,
    buoys: Vec<Vec2>,
    controls: Controls,
    time: f64,
    view: Vec2,
    rng: ChaCha20Rng,
}

impl Boat {
    /// A fresh game with the world generated from `seed`
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let islands = world::generate_islands(&mut rng, ISLAND_COUNT, spawn_point());
        let buoys = world::generate_buoys(&mut rng, BUOY_COUNT, &islands);
        Self {
            boat: Hull::at_spawn(),
            camera: Vec2::ZERO,
            score: 0,
            islands,
            buoys,
            controls: Controls::default(),
            time: 0.0,
            view: Vec2::new(f64::from(WIDTH), f64::from(HEIGHT)),
            rng,
        }
    }

    pub fn hull(&self) -> Hull {
        self.boat
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    pub fn buoys(&self) -> &[Vec2] {
        &self.buoys
    }

    /// Put the boat back at spawn, zero the score, re-scatter the buoys
    pub fn reset(&mut self) {
        self.boat = Hull::at_spawn();
        self.score = 0;
        self.buoys = world::generate_buoys(&mut self.rng, BUOY_COUNT, &self.islands);
    }

    fn set_key(&mut self, key: Key, down: bool) {
        match key {
            Key::ArrowLeft => self.controls.left = down,
            Key::ArrowRight => self.controls.right = down,
            Key::ArrowUp => self.controls.up = down,
            Key::ArrowDown => self.controls.down = down,
            k if k.is_letter('a') => self.controls.left = down,
            k if k.is_letter('d') => self.controls.right = down,
            k if k.is_letter('w') => self.controls.up = down,
            k if k.is_letter('s') => self.controls.down = down,
            _ => {}
        }
    }

    /// Steering in [-1, 1] and throttle in [0, 1] from the controls
    fn steering(&mut self, dt: f64) -> (f64, Option<f64>) {
        let mut steer = 0.0;
        if self.controls.left {
            steer -= 1.0;
        }
        if self.controls.right {
            steer += 1.0;
        }
        if self.controls.up {
            self.boat.speed += ACCEL * dt;
        }
        if self.controls.down {
            self.boat.speed -= ACCEL * 0.7 * dt;
        }

        let Some(pointer) = self.controls.pointer else {
            return (steer, None);
        };
        let anchor = Vec2::new(self.view.x * 0.5, self.view.y * 0.55);
        let d = pointer - anchor;
        steer = (angle_diff(self.boat.angle, d.to_angle()) / 0.9).clamp(-1.0, 1.0);
        let throttle = ((d.length() - 25.0) / 260.0).clamp(0.0, 1.0);
        self.boat.speed += ACCEL * throttle * dt;
        (steer, Some(throttle))
    }

    fn collide(&mut self) {
        let world_max = Vec2::new(WORLD_W - EDGE_MARGIN, WORLD_H - EDGE_MARGIN);
        let b = &mut self.boat;
        if b.pos.x < EDGE_MARGIN {
            b.pos.x = EDGE_MARGIN;
            b.speed *= -0.25;
        }
        if b.pos.y < EDGE_MARGIN {
            b.pos.y = EDGE_MARGIN;
            b.speed *= -0.25;
        }
        if b.pos.x > world_max.x {
            b.pos.x = world_max.x;
            b.speed *= -0.25;
        }
        if b.pos.y > world_max.y {
            b.pos.y = world_max.y;
            b.speed *= -0.25;
        }

        for isle in &self.islands {
            let d = b.pos - isle.pos;
            let dist = d.length();
            let min_dist = isle.radius + BOAT_RADIUS;
            if dist < min_dist {
                let n = if dist > 0.0 { d * (1.0 / dist) } else { Vec2::new(1.0, 0.0) };
                b.pos = isle.pos + n * min_dist;
                b.speed *= 0.55;
            }
        }
    }

    fn collect_buoys(&mut self) {
        let mut i = self.buoys.len();
        while i > 0 {
            i -= 1;
            if self.buoys[i].distance(self.boat.pos) < BUOY_PICKUP_RADIUS {
                self.buoys.swap_remove(i);
                self.score += 1;
                let fresh = world::spawn_buoy(&mut self.rng, &self.islands);
                self.buoys.push(fresh);
                debug!(score = self.score, "Buoy collected");
            }
        }
    }

    fn follow_camera(&mut self, dt: f64) {
        let target = self.boat.pos - self.view * 0.5;
        self.camera = self.camera.lerp(target, smoothing_alpha(dt));
        self.camera.x = self.camera.x.clamp(0.0, WORLD_W - self.view.x);
        self.camera.y = self.camera.y.clamp(0.0, WORLD_H - self.view.y);
    }

    fn render_water(&self, canvas: &mut Canvas) {
        canvas.clear(Color::hex(0x071b2d));
        let wave = Color::rgb(120, 190, 255).alpha(0.10);
        let spacing = 24.0;
        let oy = -((self.camera.y * 0.35 + self.time * 16.0) % spacing);
        let ox = -((self.camera.x * 0.35 + self.time * 22.0) % 240.0);
        let mut y = oy;
        while y < self.view.y + spacing {
            let mut points = Vec::new();
            let mut x = ox - 10.0;
            while x <= self.view.x + 10.0 {
                points.push(Vec2::new(x, y + ((x + y) * 0.08).sin() * 4.0));
                x += 18.0;
            }
            for pair in points.windows(2) {
                canvas.line(pair[0], pair[1], wave, 2.0);
            }
            y += spacing;
        }
    }

    fn render_boat(&self, canvas: &mut Canvas, at: Vec2) {
        canvas.push_transform(at, self.boat.angle);
        canvas.fill_ellipse(Vec2::new(-18.0, 0.0), Vec2::new(10.0, 22.0), 0.0, Color::rgb(150, 220, 255).alpha(0.10));
        let hull = vec![
            Vec2::new(26.0, 0.0),
            Vec2::new(8.0, 16.0),
            Vec2::new(-22.0, 14.0),
            Vec2::new(-26.0, 0.0),
            Vec2::new(-22.0, -14.0),
            Vec2::new(8.0, -16.0),
        ];
        canvas.polygon(hull.clone(), Color::hex(0xe24a3b), true);
        canvas.polygon(hull, Color::BLACK.alpha(0.35), false);
        canvas.fill_rect(Rect::new(-6.0, -10.0, 18.0, 20.0), Color::hex(0xf8fafc));
        canvas.fill_ellipse(Vec2::new(2.0, -2.0), Vec2::new(5.0, 7.0), 0.2, Color::rgb(59, 130, 246).alpha(0.55));
        canvas.pop_transform();
    }
}

impl Default for Boat {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl Game for Boat {
    type Cue = ();

    fn game_id(&self) -> GameId {
        GameId {
            game_id: "boat".to_string(),
            build_id: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            id: self.game_id(),
            title: "Boat".to_string(),
            width: WIDTH,
            height: HEIGHT,
            audio: false,
            clamps_delta: true,
        }
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) {
        *self = Self::with_seed(ctx.seed());
        self.view = Vec2::new(ctx.width(), ctx.height());
        ctx.listen_surface(&[EventKind::PointerDown, EventKind::PointerMove]);
        ctx.listen_window(&[EventKind::PointerUp, EventKind::KeyDown, EventKind::KeyUp]);
    }

    fn update(&mut self, dt: f64, _cues: &mut Cues<()>) {
        let dt = clamp_delta(dt);
        self.time += dt;

        let (steer, throttle) = self.steering(dt);
        self.boat.speed = self.boat.speed.clamp(MIN_SPEED, MAX_SPEED);

        let turn_factor = 0.35 + 0.65 * (self.boat.speed.abs() / 220.0).min(1.0);
        self.boat.angle += steer * TURN_RATE * turn_factor * dt;

        // Short pointer drags brake harder than far ones
        let drag = match throttle {
            Some(t) => 0.94 + 0.045 * t,
            None => DRAG,
        };
        self.boat.speed *= drag.powf(ticks(dt));

        self.boat.pos += Vec2::from_angle(self.boat.angle) * (self.boat.speed * dt);

        self.collide();
        self.collect_buoys();
        self.follow_camera(dt);
    }

    fn handle_input(&mut self, event: &InputEvent, _cues: &mut Cues<()>) {
        match event {
            InputEvent::PointerDown(p) => self.controls.pointer = Some(*p),
            InputEvent::PointerMove(p) => {
                if self.controls.pointer.is_some() {
                    self.controls.pointer = Some(*p);
                }
            }
            InputEvent::PointerUp(_) => self.controls.pointer = None,
            InputEvent::KeyDown(k) if k.is_letter('r') => self.reset(),
            InputEvent::KeyDown(k) => self.set_key(*k, true),
            InputEvent::KeyUp(k) => self.set_key(*k, false),
            _ => {}
        }
    }

    fn render(&self, canvas: &mut Canvas) {
        let (w, h) = (self.view.x, self.view.y);
        self.render_water(canvas);

        for isle in &self.islands {
            let s = isle.pos - self.camera;
            if s.x < -300.0 || s.y < -300.0 || s.x > w + 300.0 || s.y > h + 300.0 {
                continue;
            }
            canvas.fill_circle(s, isle.radius, Color::hex(0xeab676));
            canvas.fill_circle(s, isle.radius * 0.78, Color::hex(0x2ecc71));
        }

        for buoy in &self.buoys {
            let s = *buoy - self.camera;
            if s.x < -50.0 || s.y < -50.0 || s.x > w + 50.0 || s.y > h + 50.0 {
                continue;
            }
            canvas.fill_circle(s, 9.0, Color::hex(0xfbbf24));
            canvas.stroke_circle(s, 9.0, Color::BLACK.alpha(0.35));
        }

        self.render_boat(canvas, self.boat.pos - self.camera);

        canvas.fill_rect(Rect::new(20.0, 18.0, 420.0, 54.0), Color::BLACK.alpha(0.35));
        canvas.text(
            Vec2::new(36.0, 48.0),
            format!("Boat \u{2022} score {}", self.score),
            20.0,
            Color::WHITE.alpha(0.9),
            TextAlign::Left,
        );
        canvas.text(
            Vec2::new(36.0, 68.0),
            "WASD/Arrows \u{2022} Drag to steer & go faster \u{2022} R to reset",
            14.0,
            Color::WHITE.alpha(0.7),
            TextAlign::Left,
        );

        // Compass
        canvas.push_transform(Vec2::new(w - 62.0, 54.0), 0.0);
        canvas.fill_circle(Vec2::ZERO, 26.0, Color::BLACK.alpha(0.35));
        canvas.push_transform(Vec2::ZERO, self.boat.angle + PI / 2.0);
        canvas.polygon(
            vec![
                Vec2::new(0.0, -18.0),
                Vec2::new(6.0, 10.0),
                Vec2::new(0.0, 6.0),
                Vec2::new(-6.0, 10.0),
            ],
            Color::WHITE,
            true,
        );
        canvas.pop_transform();
        canvas.pop_transform();
    }

    fn destroy(&mut self) {
        self.controls = Controls::default();
    }

    fn encode_cue(_cue: &(), _out: &mut Vec<Tone>) {}
}

//! Pac-Man
//!
//! Classic 28×31 maze with four ghosts on a scatter/chase schedule. Arrow
//! keys or touch swipes steer; the round starts after a short countdown or
//! on the first steering input.

pub mod ghost;
pub mod maze;

use std::f64::consts::{PI, TAU};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use engine_core::audio::{arpeggio, Tone, Waveform};
use engine_core::geom::Vec2;
use engine_core::input::{EventKind, InputEvent, Key};
use engine_core::render::{Canvas, Color, TextAlign};
use engine_core::timing::{clamp_delta, ticks};
use engine_core::typed::{Capabilities, Cues, Game, GameId, InitContext};

use ghost::{choose_dir, Ghost, Mode, ModeClock, Personality, Quarry};
use maze::{step, Dir, Maze, Mover, Tile, TilePos, COLS, ROWS};

const TILE: f64 = 20.0;
const WIDTH: u32 = COLS as u32 * 20;
const HEIGHT: u32 = ROWS as u32 * 20 + 40;

const PAC_START: TilePos = (14, 23);

/// Tiles per 1/60 s tick
const PAC_SPEED: f64 = 0.15;
const GHOST_SPEED: f64 = 0.12;

const LIVES: u32 = 3;
const READY_SECS: f64 = 3.0;
const RESPAWN_READY_SECS: f64 = 2.0;
const CATCH_DISTANCE: f64 = 0.6;
const SWIPE_MIN: f64 = 20.0;

const WALL_BLUE: Color = Color::hex(0x2563eb);
const PELLET: Color = Color::hex(0xffb897);
const PAC_YELLOW: Color = Color::hex(0xffed4e);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Ready,
    Playing,
    Won,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Wakka,
    Siren,
    PowerUp,
    EatGhost,
    Death,
    Win,
}

#[derive(Debug, Clone)]
pub struct PacMan {
    maze: Maze,
    state: State,
    ready_timer: f64,
    score: u32,
    lives: u32,
    pac: Mover,
    facing: Dir,
    next_dir: Option<Dir>,
    mouth: f64,
    mouth_opening: bool,
    ghosts: Vec<Ghost>,
    modes: ModeClock,
    touch_start: Option<Vec2>,
    touch_current: Option<Vec2>,
    /// Seconds since init, drives blinking
    clock: f64,
    rng: ChaCha20Rng,
}

impl PacMan {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            maze: Maze::new(),
            state: State::Ready,
            ready_timer: READY_SECS,
            score: 0,
            lives: LIVES,
            pac: Mover::at(PAC_START, None),
            facing: Dir::Right,
            next_dir: None,
            mouth: 0.2,
            mouth_opening: true,
            ghosts: Personality::ALL.iter().map(|p| Ghost::new(*p)).collect(),
            modes: ModeClock::new(),
            touch_start: None,
            touch_current: None,
            clock: 0.0,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn pac_position(&self) -> Vec2 {
        self.pac.pos()
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    fn start(&mut self, cues: &mut Cues<Cue>) {
        self.state = State::Playing;
        cues.resume_audio();
        cues.play(Cue::Siren);
    }

    fn steer(&mut self, dir: Dir, cues: &mut Cues<Cue>) {
        if self.state == State::Ready {
            self.start(cues);
        }
        if self.state == State::Playing {
            self.next_dir = Some(dir);
        }
    }

    fn swipe(&mut self, cues: &mut Cues<Cue>) {
        let (Some(from), Some(to)) = (self.touch_start.take(), self.touch_current.take()) else {
            return;
        };
        let delta = to - from;
        if delta.length() <= SWIPE_MIN {
            return;
        }
        let a = delta.to_angle();
        let dir = if a.abs() < PI / 4.0 {
            Dir::Right
        } else if a.abs() > 3.0 * PI / 4.0 {
            Dir::Left
        } else if a > 0.0 {
            Dir::Down
        } else {
            Dir::Up
        };
        self.steer(dir, cues);
    }

    fn reset_positions(&mut self) {
        self.pac = Mover::at(PAC_START, None);
        self.facing = Dir::Right;
        self.next_dir = None;
        self.ghosts = Personality::ALL.iter().map(|p| Ghost::new(*p)).collect();
    }

    fn move_pac(&mut self, dt: f64, cues: &mut Cues<Cue>) {
        if let (Some(next), Some(cur)) = (self.next_dir, self.pac.dir) {
            if next == cur.opposite() && !self.pac.at_center() {
                self.pac.reverse(&self.maze);
            }
        }

        let maze = &self.maze;
        let next = self.next_dir;
        let mut entered = Vec::new();
        self.pac.advance(
            maze,
            PAC_SPEED * ticks(dt),
            |tile, cur| match next {
                Some(n) if !maze.is_wall(step(tile, n)) => Some(n),
                _ => cur,
            },
            |tile| entered.push(tile),
        );
        if let Some(d) = self.pac.dir {
            self.facing = d;
        }

        for tile in entered {
            self.eat(tile, cues);
        }

        if self.mouth_opening {
            self.mouth += dt * 2.0;
            self.mouth_opening = self.mouth <= 0.7;
        } else {
            self.mouth -= dt * 2.0;
            self.mouth_opening = self.mouth < 0.05;
        }
    }

    fn eat(&mut self, tile: TilePos, cues: &mut Cues<Cue>) {
        match self.maze.eat(tile) {
            Some(Tile::Power) => {
                self.score += 50;
                cues.play(Cue::PowerUp);
                self.modes.frighten();
                for g in self.ghosts.iter_mut().filter(|g| g.eaten.is_none()) {
                    g.frightened = true;
                    g.mover.reverse(&self.maze);
                }
            }
            Some(_) => {
                self.score += 10;
                cues.play(Cue::Wakka);
            }
            None => {}
        }
    }

    fn move_ghosts(&mut self, dt: f64) {
        let step_len = GHOST_SPEED * ticks(dt);
        let quarry = Quarry {
            tile: self.pac.tile,
            facing: self.facing,
            blinky: self.ghosts[0].mover.tile,
        };
        let mode = self.modes.mode();
        for ghost in &mut self.ghosts {
            if ghost.eaten.is_some() {
                ghost.return_home(step_len * 2.0);
                continue;
            }
            let target = ghost.target(mode, &quarry, &mut self.rng);
            let maze = &self.maze;
            ghost
                .mover
                .advance(maze, step_len, |tile, cur| choose_dir(maze, tile, cur, target), |_| {});
        }
    }

    fn check_collisions(&mut self, cues: &mut Cues<Cue>) {
        let pac = self.pac.pos();
        for i in 0..self.ghosts.len() {
            let ghost = &mut self.ghosts[i];
            if ghost.eaten.is_some() || pac.distance(ghost.pos()) >= CATCH_DISTANCE {
                continue;
            }
            if ghost.frightened {
                ghost.eaten = Some(ghost.pos());
                self.score += 200;
                cues.play(Cue::EatGhost);
            } else {
                self.lose_life(cues);
                return;
            }
        }
    }

    fn lose_life(&mut self, cues: &mut Cues<Cue>) {
        cues.play(Cue::Death);
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.state = State::GameOver;
            debug!(score = self.score, "Pac-Man game over");
        } else {
            self.reset_positions();
            self.state = State::Ready;
            self.ready_timer = RESPAWN_READY_SECS;
        }
    }

    fn draw_walls(&self, canvas: &mut Canvas) {
        let half = TILE / 2.0;
        for ((x, y), tile) in self.maze.tiles() {
            if tile != Tile::Wall {
                continue;
            }
            let c = tile_center(Vec2::new(f64::from(x), f64::from(y)));
            let (l, r, t, b) = (c.x - half, c.x + half, c.y - half, c.y + half);
            let walled = |pos: TilePos| {
                (0..COLS).contains(&pos.0) && (0..ROWS).contains(&pos.1) && self.maze.is_wall(pos)
            };
            if !walled((x, y - 1)) {
                canvas.line(Vec2::new(l, t), Vec2::new(r, t), WALL_BLUE, 2.0);
            }
            if !walled((x, y + 1)) {
                canvas.line(Vec2::new(l, b), Vec2::new(r, b), WALL_BLUE, 2.0);
            }
            if !walled((x - 1, y)) {
                canvas.line(Vec2::new(l, t), Vec2::new(l, b), WALL_BLUE, 2.0);
            }
            if !walled((x + 1, y)) {
                canvas.line(Vec2::new(r, t), Vec2::new(r, b), WALL_BLUE, 2.0);
            }
        }
    }

    fn draw_ghost(&self, canvas: &mut Canvas, ghost: &Ghost) {
        let c = tile_center(ghost.pos());
        let r = TILE * 0.4;
        let color = if ghost.eaten.is_some() {
            Color::WHITE.alpha(0.3)
        } else if ghost.frightened {
            let flash = self.modes.frightened_left() < 2.0 && (self.clock / 0.2) as u64 % 2 == 1;
            if flash {
                Color::WHITE
            } else {
                WALL_BLUE
            }
        } else {
            ghost.personality.color()
        };

        let head = Vec2::new(c.x, c.y - r * 0.3);
        let mut body: Vec<Vec2> = (0..=8)
            .map(|i| head + Vec2::from_angle(PI + PI * f64::from(i) / 8.0) * r)
            .collect();
        body.push(Vec2::new(c.x + r, c.y + r));
        for i in 0..3 {
            let wave_x = c.x + r - f64::from(i) * 2.0 * r / 3.0;
            let wave_y = c.y + r - if i % 2 == 0 { r * 0.3 } else { 0.0 };
            body.push(Vec2::new(wave_x, wave_y));
        }
        body.push(Vec2::new(c.x - r, c.y + r));
        canvas.polygon(body, color, true);

        if ghost.eaten.is_some() {
            return;
        }
        let eyes = [Vec2::new(c.x - r * 0.3, c.y - r * 0.2), Vec2::new(c.x + r * 0.3, c.y - r * 0.2)];
        for eye in eyes {
            canvas.fill_circle(eye, r * 0.25, Color::WHITE);
        }
        if !ghost.frightened {
            let (dx, dy) = ghost.mover.dir.map_or((0, 0), Dir::delta);
            let look = Vec2::new(f64::from(dx), f64::from(dy)) * (r * 0.15);
            for eye in eyes {
                canvas.fill_circle(eye + look, r * 0.12, Color::BLACK);
            }
        }
    }

    fn draw_hud(&self, canvas: &mut Canvas) {
        let w = f64::from(WIDTH);
        let y = f64::from(ROWS) * TILE + 10.0;
        canvas.text(Vec2::new(10.0, y), format!("SCORE: {}", self.score), 16.0, Color::WHITE, TextAlign::Left);
        canvas.text(Vec2::new(w - 150.0, y), "LIVES:", 16.0, Color::WHITE, TextAlign::Left);
        for i in 0..self.lives {
            let c = Vec2::new(w - 90.0 + f64::from(i) * 25.0, y - 5.0);
            canvas.sector(c, 8.0, 0.2, TAU - 0.2, PAC_YELLOW);
        }
    }
}

fn tile_center(pos: Vec2) -> Vec2 {
    pos * TILE + Vec2::new(TILE / 2.0, TILE / 2.0)
}

impl Default for PacMan {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Game for PacMan {
    type Cue = Cue;

    fn game_id(&self) -> GameId {
        GameId {
            game_id: "pacman".to_string(),
            build_id: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            id: self.game_id(),
            title: "Pac-Man".to_string(),
            width: WIDTH,
            height: HEIGHT,
            audio: true,
            clamps_delta: true,
        }
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) {
        *self = Self::with_seed(ctx.seed());
        ctx.listen_window(&[EventKind::KeyDown]);
        ctx.listen_surface(&[EventKind::TouchStart, EventKind::TouchMove, EventKind::TouchEnd]);
    }

    fn update(&mut self, dt: f64, cues: &mut Cues<Cue>) {
        let dt = clamp_delta(dt);
        self.clock += dt;

        match self.state {
            State::Ready => {
                self.ready_timer -= dt;
                if self.ready_timer <= 0.0 {
                    self.start(cues);
                }
                return;
            }
            State::Won | State::GameOver => return,
            State::Playing => {}
        }

        self.move_pac(dt, cues);
        if self.modes.tick(dt) {
            for g in &mut self.ghosts {
                g.frightened = false;
            }
            cues.play(Cue::Siren);
        }
        self.move_ghosts(dt);
        self.check_collisions(cues);

        if self.state == State::Playing && self.maze.pellets_left() == 0 {
            self.state = State::Won;
            debug!(score = self.score, "Pac-Man level complete");
            cues.play(Cue::Win);
        }
    }

    fn handle_input(&mut self, event: &InputEvent, cues: &mut Cues<Cue>) {
        match event {
            InputEvent::KeyDown(Key::ArrowUp) => self.steer(Dir::Up, cues),
            InputEvent::KeyDown(Key::ArrowDown) => self.steer(Dir::Down, cues),
            InputEvent::KeyDown(Key::ArrowLeft) => self.steer(Dir::Left, cues),
            InputEvent::KeyDown(Key::ArrowRight) => self.steer(Dir::Right, cues),
            InputEvent::TouchStart(p) => {
                self.touch_start = Some(*p);
                self.touch_current = Some(*p);
                if self.state == State::Ready {
                    self.start(cues);
                }
            }
            InputEvent::TouchMove(p) => {
                if self.touch_start.is_some() {
                    self.touch_current = Some(*p);
                }
            }
            InputEvent::TouchEnd(_) => self.swipe(cues),
            _ => {}
        }
    }

    fn render(&self, canvas: &mut Canvas) {
        canvas.clear(Color::BLACK);
        self.draw_walls(canvas);

        let blink = (self.clock / 0.3) as u64 % 2 == 1;
        for ((x, y), tile) in self.maze.tiles() {
            let c = tile_center(Vec2::new(f64::from(x), f64::from(y)));
            match tile {
                Tile::Pellet => canvas.fill_circle(c, 2.0, PELLET),
                Tile::Power if blink => canvas.fill_circle(c, 6.0, PELLET),
                _ => {}
            }
        }

        canvas.push_transform(tile_center(self.pac.pos()), self.facing.angle());
        canvas.sector(Vec2::ZERO, TILE * 0.4, self.mouth, TAU - self.mouth, PAC_YELLOW);
        canvas.pop_transform();

        for ghost in &self.ghosts {
            self.draw_ghost(canvas, ghost);
        }
        self.draw_hud(canvas);

        let banner = match self.state {
            State::Ready => Some("READY!"),
            State::Won => Some("LEVEL COMPLETE!"),
            State::GameOver => Some("GAME OVER"),
            State::Playing => None,
        };
        if let Some(text) = banner {
            let pos = Vec2::new(f64::from(WIDTH) / 2.0, f64::from(ROWS) * TILE / 2.0);
            canvas.text(pos, text, 32.0, PAC_YELLOW, TextAlign::Center);
        }
    }

    fn destroy(&mut self) {
        self.touch_start = None;
        self.touch_current = None;
        self.next_dir = None;
    }

    fn encode_cue(cue: &Cue, out: &mut Vec<Tone>) {
        match cue {
            Cue::Wakka => out.push(Tone::new(Waveform::Square, 400.0, 0.1, 0.15).glide(200.0)),
            Cue::Siren => out.push(Tone::new(Waveform::Sine, 300.0, 0.4, 0.08).glide(400.0)),
            Cue::PowerUp => out.push(Tone::new(Waveform::Square, 200.0, 0.3, 0.2).glide(800.0)),
            Cue::EatGhost => out.push(Tone::new(Waveform::Sawtooth, 600.0, 0.15, 0.2).glide(1200.0)),
            Cue::Death => out.push(Tone::new(Waveform::Sawtooth, 800.0, 0.8, 0.25).glide(100.0)),
            Cue::Win => arpeggio(Waveform::Square, &[523.25, 659.25, 783.99, 1046.5], 0.15, 0.3, 0.2, out),
        }
    }
}

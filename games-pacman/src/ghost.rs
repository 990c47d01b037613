//! Ghost personalities, targeting and the scatter/chase schedule

use rand::Rng;
use rand_chacha::ChaCha20Rng;

use engine_core::geom::Vec2;
use engine_core::render::Color;

use crate::maze::{step, tile_distance, Dir, Maze, Mover, TilePos};

pub const HOUSE: TilePos = (14, 14);

/// (scatter, chase) seconds per phase; the last chase never ends
pub const SCHEDULE: [(f64, f64); 4] = [(7.0, 20.0), (7.0, 20.0), (5.0, 20.0), (5.0, f64::INFINITY)];

pub const FRIGHTENED_SECS: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Personality {
    /// Heads straight for pac-man
    Blinky,
    /// Aims four tiles ahead
    Pinky,
    /// Doubles the vector from blinky to two tiles ahead
    Inky,
    /// Chases until within eight tiles, then retreats
    Clyde,
}

impl Personality {
    pub const ALL: [Personality; 4] = [
        Personality::Blinky,
        Personality::Pinky,
        Personality::Inky,
        Personality::Clyde,
    ];

    pub fn start(self) -> TilePos {
        match self {
            Personality::Blinky => (14, 11),
            Personality::Pinky => (14, 14),
            Personality::Inky => (12, 14),
            Personality::Clyde => (16, 14),
        }
    }

    pub fn scatter_target(self) -> TilePos {
        match self {
            Personality::Blinky => (25, 0),
            Personality::Pinky => (2, 0),
            Personality::Inky => (27, 29),
            Personality::Clyde => (0, 29),
        }
    }

    pub fn color(self) -> Color {
        match self {
            Personality::Blinky => Color::hex(0xff0000),
            Personality::Pinky => Color::hex(0xffb8ff),
            Personality::Inky => Color::hex(0x00ffff),
            Personality::Clyde => Color::hex(0xffb851),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Scatter,
    Chase,
    Frightened,
}

/// Global ghost mode with its phase timer
#[derive(Debug, Clone, PartialEq)]
pub struct ModeClock {
    mode: Mode,
    phase: usize,
    timer: f64,
    frightened_left: f64,
}

impl ModeClock {
    pub fn new() -> Self {
        Self {
            mode: Mode::Scatter,
            phase: 0,
            timer: 0.0,
            frightened_left: 0.0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn frightened_left(&self) -> f64 {
        self.frightened_left
    }

    pub fn frighten(&mut self) {
        self.mode = Mode::Frightened;
        self.frightened_left = FRIGHTENED_SECS;
    }

    /// Advance timers. Returns true when frightened mode just ran out.
    pub fn tick(&mut self, dt: f64) -> bool {
        if self.mode == Mode::Frightened {
            self.frightened_left -= dt;
            if self.frightened_left <= 0.0 {
                self.frightened_left = 0.0;
                self.mode = Mode::Chase;
                return true;
            }
            return false;
        }

        self.timer += dt;
        let (scatter, chase) = SCHEDULE[self.phase];
        match self.mode {
            Mode::Scatter if self.timer >= scatter => {
                self.mode = Mode::Chase;
                self.timer = 0.0;
            }
            Mode::Chase if self.timer >= chase => {
                self.mode = Mode::Scatter;
                self.timer = 0.0;
                self.phase = (self.phase + 1).min(SCHEDULE.len() - 1);
            }
            _ => {}
        }
        false
    }
}

impl Default for ModeClock {
    fn default() -> Self {
        Self::new()
    }
}

/// What the chase targets look at
#[derive(Debug, Clone, Copy)]
pub struct Quarry {
    pub tile: TilePos,
    pub facing: Dir,
    pub blinky: TilePos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ghost {
    pub personality: Personality,
    pub mover: Mover,
    pub frightened: bool,
    /// Free-flight position while heading home after being eaten
    pub eaten: Option<Vec2>,
}

impl Ghost {
    pub fn new(personality: Personality) -> Self {
        Self {
            personality,
            mover: Mover::at(personality.start(), Some(Dir::Up)),
            frightened: false,
            eaten: None,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.eaten.unwrap_or_else(|| self.mover.pos())
    }

    pub fn target(&self, mode: Mode, quarry: &Quarry, rng: &mut ChaCha20Rng) -> TilePos {
        if self.frightened {
            return (rng.gen_range(0..28), rng.gen_range(0..31));
        }
        if mode == Mode::Scatter {
            return self.personality.scatter_target();
        }
        let ahead = |n: i32| {
            let (dx, dy) = quarry.facing.delta();
            (quarry.tile.0 + dx * n, quarry.tile.1 + dy * n)
        };
        match self.personality {
            Personality::Blinky => quarry.tile,
            Personality::Pinky => ahead(4),
            Personality::Inky => {
                let pivot = ahead(2);
                (
                    pivot.0 + (pivot.0 - quarry.blinky.0),
                    pivot.1 + (pivot.1 - quarry.blinky.1),
                )
            }
            Personality::Clyde => {
                if tile_distance(self.mover.tile, quarry.tile) > 8.0 {
                    quarry.tile
                } else {
                    self.personality.scatter_target()
                }
            }
        }
    }

    /// Fly straight home; back on the grid once close enough
    pub fn return_home(&mut self, distance: f64) {
        let Some(pos) = self.eaten else {
            return;
        };
        let home = Vec2::new(f64::from(HOUSE.0), f64::from(HOUSE.1));
        let to_home = home - pos;
        let len = to_home.length();
        if len < 0.5 {
            self.eaten = None;
            self.frightened = false;
            self.mover = Mover::at(HOUSE, None);
            return;
        }
        self.eaten = Some(pos + to_home * (distance.min(len) / len));
    }
}

/// Greedy step toward `target` that never doubles back, unless stuck
pub fn choose_dir(maze: &Maze, tile: TilePos, current: Option<Dir>, target: TilePos) -> Option<Dir> {
    let mut best: Option<(Dir, f64)> = None;
    for dir in Dir::ALL {
        if Some(dir.opposite()) == current {
            continue;
        }
        let next = step(tile, dir);
        if maze.is_wall(next) {
            continue;
        }
        let d = tile_distance(next, target);
        if best.map_or(true, |(_, b)| d < b) {
            best = Some((dir, d));
        }
    }
    match best {
        Some((dir, _)) => Some(dir),
        None => current
            .map(Dir::opposite)
            .filter(|back| !maze.is_wall(step(tile, *back))),
    }
}

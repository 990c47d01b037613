//! Maze grid, pellets and grid movement

use engine_core::geom::Vec2;

pub const COLS: i32 = 28;
pub const ROWS: i32 = 31;

/// `#` wall, `.` pellet, `o` power pellet, `=` ghost house, space empty
const LAYOUT: [&str; ROWS as usize] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ###==### ##.######",
    "######.## #======# ##.######",
    "      .   #======#   .      ",
    "######.## #======# ##.######",
    "######.## ######## ##.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall,
    Pellet,
    Power,
    House,
}

impl Tile {
    fn from_char(c: char) -> Self {
        match c {
            '#' => Tile::Wall,
            '.' => Tile::Pellet,
            'o' => Tile::Power,
            '=' => Tile::House,
            _ => Tile::Empty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    /// Tie-break order for ghost decisions
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    pub fn angle(self) -> f64 {
        Vec2::new(f64::from(self.delta().0), f64::from(self.delta().1)).to_angle()
    }
}

pub type TilePos = (i32, i32);

pub fn step(tile: TilePos, dir: Dir) -> TilePos {
    let (dx, dy) = dir.delta();
    (tile.0 + dx, tile.1 + dy)
}

pub fn tile_distance(a: TilePos, b: TilePos) -> f64 {
    let dx = f64::from(a.0 - b.0);
    let dy = f64::from(a.1 - b.1);
    (dx * dx + dy * dy).sqrt()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    tiles: Vec<Tile>,
}

impl Maze {
    pub fn new() -> Self {
        let tiles = LAYOUT
            .iter()
            .flat_map(|row| row.chars().map(Tile::from_char))
            .collect();
        Self { tiles }
    }

    /// Tiles outside the grid read as empty so the tunnel stays open
    pub fn tile(&self, (x, y): TilePos) -> Tile {
        if !(0..COLS).contains(&x) || !(0..ROWS).contains(&y) {
            return Tile::Empty;
        }
        self.tiles[(y * COLS + x) as usize]
    }

    pub fn is_wall(&self, pos: TilePos) -> bool {
        self.tile(pos) == Tile::Wall
    }

    /// Remove a pellet or power pellet from `pos`, if one is there
    pub fn eat(&mut self, pos: TilePos) -> Option<Tile> {
        let tile = self.tile(pos);
        if !matches!(tile, Tile::Pellet | Tile::Power) {
            return None;
        }
        self.tiles[(pos.1 * COLS + pos.0) as usize] = Tile::Empty;
        Some(tile)
    }

    pub fn pellets_left(&self) -> usize {
        self.tiles
            .iter()
            .filter(|t| matches!(t, Tile::Pellet | Tile::Power))
            .count()
    }

    pub fn tiles(&self) -> impl Iterator<Item = (TilePos, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, t)| ((i as i32 % COLS, i as i32 / COLS), *t))
    }

    /// Wrap a column that left the grid through the tunnel
    pub fn wrap(&self, (x, y): TilePos) -> TilePos {
        (x.rem_euclid(COLS), y)
    }

    #[cfg(test)]
    pub(crate) fn clear_pellets_except(&mut self, keep: TilePos) {
        for (i, t) in self.tiles.iter_mut().enumerate() {
            let pos = (i as i32 % COLS, i as i32 / COLS);
            if pos != keep && matches!(t, Tile::Pellet | Tile::Power) {
                *t = Tile::Empty;
            }
        }
    }
}

impl Default for Maze {
    fn default() -> Self {
        Self::new()
    }
}

/// An actor travelling tile to tile
///
/// `progress` is the fraction of the way from `tile` to the neighbour in
/// `dir`. Decisions are only taken at tile centres (`progress == 0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mover {
    pub tile: TilePos,
    pub dir: Option<Dir>,
    pub progress: f64,
}

impl Mover {
    pub fn at(tile: TilePos, dir: Option<Dir>) -> Self {
        Self {
            tile,
            dir,
            progress: 0.0,
        }
    }

    /// Position in tile units
    pub fn pos(&self) -> Vec2 {
        let base = Vec2::new(f64::from(self.tile.0), f64::from(self.tile.1));
        match self.dir {
            Some(d) => {
                let (dx, dy) = d.delta();
                base + Vec2::new(f64::from(dx), f64::from(dy)) * self.progress
            }
            None => base,
        }
    }

    pub fn at_center(&self) -> bool {
        self.progress == 0.0
    }

    /// Turn around on the spot, mid-tile included
    pub fn reverse(&mut self, maze: &Maze) {
        let Some(d) = self.dir else {
            return;
        };
        if self.progress > 0.0 {
            self.tile = maze.wrap(step(self.tile, d));
            self.progress = 1.0 - self.progress;
        }
        self.dir = Some(d.opposite());
    }

    /// Travel `distance` tiles. `choose` picks a heading at every centre
    /// and `arrive` sees every tile entered. Stops in front of walls.
    pub fn advance<C, A>(&mut self, maze: &Maze, mut distance: f64, mut choose: C, mut arrive: A)
    where
        C: FnMut(TilePos, Option<Dir>) -> Option<Dir>,
        A: FnMut(TilePos),
    {
        while distance > 0.0 {
            if self.at_center() {
                self.dir = choose(self.tile, self.dir).filter(|d| !maze.is_wall(step(self.tile, *d)));
            }
            let Some(dir) = self.dir else {
                return;
            };
            let room = 1.0 - self.progress;
            if distance < room {
                self.progress += distance;
                return;
            }
            distance -= room;
            self.tile = maze.wrap(step(self.tile, dir));
            self.progress = 0.0;
            arrive(self.tile);
        }
    }
}

//! Procedural four-walled tunnel
//!
//! The tunnel is a queue of fixed-length segments. Each segment has up to four
//! platforms (floor, right wall, ceiling, left wall), each possibly punched
//! with holes. Lateral positions on a platform run from -1 to 1.

use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::ChaCha20Rng;

pub const SEGMENT_LENGTH: f64 = 100.0;
/// Distance ahead of the runner that is always generated
pub const LOOKAHEAD: f64 = 2000.0;
/// Segments starting further than this behind the runner are dropped
pub const KEEP_BEHIND: f64 = 500.0;
const INITIAL_SEGMENTS: usize = 30;
/// Depth over which difficulty ramps from 0 to 1
const RAMP_DEPTH: f64 = 2000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wall {
    Floor,
    Right,
    Ceiling,
    Left,
}

impl Wall {
    pub const ALL: [Wall; 4] = [Wall::Floor, Wall::Right, Wall::Ceiling, Wall::Left];

    pub fn index(self) -> usize {
        match self {
            Wall::Floor => 0,
            Wall::Right => 1,
            Wall::Ceiling => 2,
            Wall::Left => 3,
        }
    }

    /// The wall a jump lands on
    pub fn next(self) -> Wall {
        Wall::ALL[(self.index() + 1) % 4]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hole {
    pub center: f64,
    pub width: f64,
}

impl Hole {
    pub fn left(&self) -> f64 {
        self.center - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.center + self.width / 2.0
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.left() && x <= self.right()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Platform {
    pub holes: Vec<Hole>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub z: f64,
    /// Indexed by `Wall::index`; `None` is open space
    pub walls: [Option<Platform>; 4],
}

impl Segment {
    pub fn covers(&self, z: f64) -> bool {
        z >= self.z && z < self.z + SEGMENT_LENGTH
    }

    pub fn platform(&self, wall: Wall) -> Option<&Platform> {
        self.walls[wall.index()].as_ref()
    }
}

/// What is under the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Footing {
    Solid,
    Hole,
    /// No platform on this wall
    Open,
    /// Outside every generated segment
    Unknown,
}

fn generate_platform(wall: Wall, progress: f64, rng: &mut ChaCha20Rng) -> Option<Platform> {
    let chance = match wall {
        Wall::Floor => 1.0,
        _ => (progress - 0.3).max(0.0) * 0.8,
    };
    if rng.gen::<f64>() >= chance {
        return None;
    }

    let holes = match wall {
        Wall::Floor if progress > 0.3 => (rng.gen::<f64>() * ((progress - 0.3) * 5.0).min(3.0)) as usize,
        Wall::Floor => 0,
        _ => (rng.gen::<f64>() * (1.0 + progress * 2.0)) as usize,
    };
    let holes = (0..holes)
        .map(|_| Hole {
            center: (rng.gen::<f64>() - 0.5) * 1.6,
            width: 0.2 + rng.gen::<f64>() * 0.3,
        })
        .collect();
    Some(Platform { holes })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tunnel {
    segments: VecDeque<Segment>,
    next_z: f64,
}

impl Tunnel {
    pub fn new(rng: &mut ChaCha20Rng) -> Self {
        let mut tunnel = Tunnel {
            segments: VecDeque::with_capacity(INITIAL_SEGMENTS),
            next_z: 0.0,
        };
        for _ in 0..INITIAL_SEGMENTS {
            tunnel.push_segment(rng);
        }
        tunnel
    }

    fn push_segment(&mut self, rng: &mut ChaCha20Rng) {
        let z = self.next_z;
        let progress = z / RAMP_DEPTH;
        let walls = Wall::ALL.map(|wall| generate_platform(wall, progress, rng));
        self.segments.push_back(Segment { z, walls });
        self.next_z += SEGMENT_LENGTH;
    }

    /// Generate ahead of `z` and drop what is far behind it
    pub fn advance(&mut self, z: f64, rng: &mut ChaCha20Rng) {
        while self.next_z < z + LOOKAHEAD {
            self.push_segment(rng);
        }
        while self.segments.front().is_some_and(|s| s.z <= z - KEEP_BEHIND) {
            self.segments.pop_front();
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn segment_at(&self, z: f64) -> Option<&Segment> {
        self.segments.iter().find(|s| s.covers(z))
    }

    /// End of the generated tunnel
    pub fn end(&self) -> f64 {
        self.next_z
    }

    pub fn footing(&self, z: f64, wall: Wall, x: f64) -> Footing {
        let Some(segment) = self.segment_at(z) else {
            return Footing::Unknown;
        };
        match segment.platform(wall) {
            None => Footing::Open,
            Some(p) if p.holes.iter().any(|h| h.contains(x)) => Footing::Hole,
            Some(_) => Footing::Solid,
        }
    }

    #[cfg(test)]
    pub(crate) fn segment_at_mut(&mut self, z: f64) -> Option<&mut Segment> {
        self.segments.iter_mut().find(|s| s.covers(z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_opening_stretch_is_safe_floor() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let tunnel = Tunnel::new(&mut rng);
        assert_eq!(tunnel.segments().count(), 30);
        assert_eq!(tunnel.end(), 3000.0);
        for segment in tunnel.segments().filter(|s| s.z / RAMP_DEPTH <= 0.3) {
            assert_eq!(segment.platform(Wall::Floor), Some(&Platform::default()));
            for wall in [Wall::Right, Wall::Ceiling, Wall::Left] {
                assert!(segment.platform(wall).is_none());
            }
        }
    }

    #[test]
    fn test_segments_are_contiguous() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let mut tunnel = Tunnel::new(&mut rng);
        tunnel.advance(5000.0, &mut rng);
        assert!(tunnel.end() >= 7000.0);
        let starts: Vec<f64> = tunnel.segments().map(|s| s.z).collect();
        assert!(starts[0] > 5000.0 - KEEP_BEHIND);
        assert!(starts.windows(2).all(|w| w[1] - w[0] == SEGMENT_LENGTH));
    }

    #[test]
    fn test_holes_stay_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(17);
        let mut tunnel = Tunnel::new(&mut rng);
        tunnel.advance(20_000.0, &mut rng);
        let holes: Vec<&Hole> = tunnel
            .segments()
            .flat_map(|s| s.walls.iter().flatten())
            .flat_map(|p| &p.holes)
            .collect();
        assert!(!holes.is_empty());
        for hole in holes {
            assert!(hole.center.abs() <= 0.8);
            assert!((0.2..0.5).contains(&hole.width));
        }
    }

    #[test]
    fn test_footing() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut tunnel = Tunnel::new(&mut rng);
        let segment = tunnel.segment_at_mut(150.0).expect("segment");
        segment.walls[Wall::Floor.index()] = Some(Platform {
            holes: vec![Hole {
                center: 0.0,
                width: 0.4,
            }],
        });
        assert_eq!(tunnel.footing(150.0, Wall::Floor, 0.1), Footing::Hole);
        assert_eq!(tunnel.footing(150.0, Wall::Floor, 0.5), Footing::Solid);
        assert_eq!(tunnel.footing(150.0, Wall::Right, 0.5), Footing::Open);
        assert_eq!(tunnel.footing(-10.0, Wall::Floor, 0.0), Footing::Unknown);
    }

    #[test]
    fn test_wall_cycle() {
        let mut wall = Wall::Floor;
        let order: Vec<Wall> = (0..4)
            .map(|_| {
                wall = wall.next();
                wall
            })
            .collect();
        assert_eq!(order, vec![Wall::Right, Wall::Ceiling, Wall::Left, Wall::Floor]);
    }
}

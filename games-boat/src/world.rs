//! Island and buoy placement

use rand::Rng;
use rand_chacha::ChaCha20Rng;

use engine_core::geom::Vec2;

pub const WORLD_W: f64 = 4200.0;
pub const WORLD_H: f64 = 3000.0;

const ISLAND_TRIES: usize = 250;
const BUOY_TRIES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Island {
    pub pos: Vec2,
    pub radius: f64,
}

/// Scatter `count` islands away from `spawn` and from each other
///
/// An island that finds no free spot after a bounded number of tries is
/// placed anywhere inside the margins.
pub fn generate_islands(rng: &mut ChaCha20Rng, count: usize, spawn: Vec2) -> Vec<Island> {
    let mut islands: Vec<Island> = Vec::with_capacity(count);
    for _ in 0..count {
        let radius = rng.gen_range(70.0..150.0);
        let pick = |rng: &mut ChaCha20Rng| {
            Vec2::new(
                rng.gen_range(radius + 140.0..WORLD_W - radius - 140.0),
                rng.gen_range(radius + 140.0..WORLD_H - radius - 140.0),
            )
        };

        let spot = (0..ISLAND_TRIES)
            .map(|_| pick(rng))
            .find(|&p| {
                p.distance(spawn) > 560.0
                    && islands
                        .iter()
                        .all(|o| p.distance(o.pos) > o.radius + radius + 180.0)
            });
        let pos = match spot {
            Some(p) => p,
            None => pick(rng),
        };
        islands.push(Island { pos, radius });
    }
    islands
}

/// A buoy position clear of every island
pub fn spawn_buoy(rng: &mut ChaCha20Rng, islands: &[Island]) -> Vec2 {
    let pick = |rng: &mut ChaCha20Rng| {
        Vec2::new(
            rng.gen_range(120.0..WORLD_W - 120.0),
            rng.gen_range(120.0..WORLD_H - 120.0),
        )
    };
    for _ in 0..BUOY_TRIES {
        let p = pick(rng);
        if islands.iter().all(|isle| p.distance(isle.pos) > isle.radius + 90.0) {
            return p;
        }
    }
    pick(rng)
}

pub fn generate_buoys(rng: &mut ChaCha20Rng, count: usize, islands: &[Island]) -> Vec<Vec2> {
    (0..count).map(|_| spawn_buoy(rng, islands)).collect()
}

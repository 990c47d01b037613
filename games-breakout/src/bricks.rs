//! Brick wall layout and hit testing

use engine_core::geom::{Rect, Vec2};
use engine_core::render::Color;

const ROWS: usize = 6;
const COLS: usize = 14;
const BRICK_H: f64 = 22.0;
const GAP: f64 = 8.0;
const TOP: f64 = 110.0;
const SIDE_PAD: f64 = 80.0;
const FIELD_W: f64 = 1200.0;

const RAINBOW: [u32; 6] = [0xff3b30, 0xff9500, 0xffd60a, 0x34c759, 0x0a84ff, 0x5e5ce6];

/// Fixed gaps punched into the lower rows
fn is_hole(row: usize, col: usize) -> bool {
    match row {
        3 => matches!(col, 3 | 4 | 9 | 10),
        4 => matches!(col, 5 | 8),
        5 => matches!(col, 1 | 12),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brick {
    pub rect: Rect,
    pub row: usize,
    pub col: usize,
    pub color: Color,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrickWall {
    bricks: Vec<Brick>,
}

impl BrickWall {
    pub fn new() -> Self {
        let w = (FIELD_W - SIDE_PAD * 2.0 - GAP * (COLS as f64 - 1.0)) / COLS as f64;
        let mut bricks = Vec::with_capacity(ROWS * COLS);
        for row in 0..ROWS {
            for col in 0..COLS {
                bricks.push(Brick {
                    rect: Rect::new(
                        SIDE_PAD + col as f64 * (w + GAP),
                        TOP + row as f64 * (BRICK_H + GAP),
                        w,
                        BRICK_H,
                    ),
                    row,
                    col,
                    color: Color::hex(RAINBOW[row % RAINBOW.len()]),
                    alive: !is_hole(row, col),
                });
            }
        }
        Self { bricks }
    }

    pub fn alive(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter().filter(|b| b.alive)
    }

    pub fn remaining(&self) -> usize {
        self.alive().count()
    }

    /// Knock out the first live brick the ball touches and return it
    pub fn hit(&mut self, center: Vec2, radius: f64) -> Option<Brick> {
        let brick = self.bricks.iter_mut().find(|b| {
            let d = center - b.rect.closest_point(center);
            b.alive && d.x * d.x + d.y * d.y <= radius * radius
        })?;
        brick.alive = false;
        Some(*brick)
    }

    #[cfg(test)]
    pub(crate) fn clear_except(&mut self, keep: Rect) {
        for b in &mut self.bricks {
            b.alive = b.alive && b.rect == keep;
        }
    }
}

impl Default for BrickWall {
    fn default() -> Self {
        Self::new()
    }
}

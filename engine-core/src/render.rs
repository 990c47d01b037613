//! Display list rendering
//!
//! `render` never rasterises; it appends `DrawCommand`s to a `Canvas`. The
//! host (or a test) inspects the resulting display list.

use crate::geom::{Rect, Vec2};

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from a `0xRRGGBB` literal
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Same color with opacity `alpha` in `[0, 1]`
    pub fn alpha(self, alpha: f64) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
}

/// Horizontal anchor of a text command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// A single drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface
    Clear { color: Color },
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color, width: f64 },
    Circle { center: Vec2, radius: f64, color: Color, filled: bool },
    Ellipse { center: Vec2, radii: Vec2, rotation: f64, color: Color },
    /// Filled pie slice from `start` to `end` radians
    Sector { center: Vec2, radius: f64, start: f64, end: f64, color: Color },
    Line { from: Vec2, to: Vec2, color: Color, width: f64 },
    Polygon { points: Vec<Vec2>, color: Color, filled: bool },
    Text { pos: Vec2, text: String, size: f64, color: Color, align: TextAlign },
    /// Translate then rotate every following command until the matching pop
    PushTransform { translate: Vec2, rotate: f64 },
    PopTransform,
}

/// Display list for one frame
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Drop the previous frame's commands, keeping the allocation
    pub fn begin_frame(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    pub fn width(&self) -> f64 {
        f64::from(self.width)
    }

    pub fn height(&self) -> f64 {
        f64::from(self.height)
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All text strings drawn this frame, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn clear(&mut self, color: Color) {
        self.push(DrawCommand::Clear { color });
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.push(DrawCommand::FillRect { rect, color });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.push(DrawCommand::StrokeRect { rect, color, width });
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f64, color: Color) {
        self.push(DrawCommand::Circle {
            center,
            radius,
            color,
            filled: true,
        });
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f64, color: Color) {
        self.push(DrawCommand::Circle {
            center,
            radius,
            color,
            filled: false,
        });
    }

    pub fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f64, color: Color) {
        self.push(DrawCommand::Ellipse {
            center,
            radii,
            rotation,
            color,
        });
    }

    pub fn sector(&mut self, center: Vec2, radius: f64, start: f64, end: f64, color: Color) {
        self.push(DrawCommand::Sector {
            center,
            radius,
            start,
            end,
            color,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f64) {
        self.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    pub fn polygon(&mut self, points: Vec<Vec2>, color: Color, filled: bool) {
        self.push(DrawCommand::Polygon {
            points,
            color,
            filled,
        });
    }

    pub fn text(&mut self, pos: Vec2, text: impl Into<String>, size: f64, color: Color, align: TextAlign) {
        self.push(DrawCommand::Text {
            pos,
            text: text.into(),
            size,
            color,
            align,
        });
    }

    pub fn push_transform(&mut self, translate: Vec2, rotate: f64) {
        self.push(DrawCommand::PushTransform { translate, rotate });
    }

    pub fn pop_transform(&mut self) {
        self.push(DrawCommand::PopTransform);
    }
}

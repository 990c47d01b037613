//! Tarot reading
//!
//! A fortune teller's table seen from the client's chair. "Draw Your Cards"
//! deals past, present and future from a shuffled 78-card deck; each card is
//! revealed by clicking it, and the full reading appears once all three are
//! face up.

pub mod deck;

use std::f64::consts::{PI, TAU};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use engine_core::audio::{arpeggio, Tone, Waveform};
use engine_core::geom::{Rect, Vec2};
use engine_core::input::{EventKind, InputEvent};
use engine_core::render::{Canvas, Color, TextAlign};
use engine_core::timing::clamp_delta;
use engine_core::typed::{Capabilities, Cues, Game, GameId, InitContext};

use deck::{draw, shuffled, DrawnCard};

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 800;
const W: f64 = WIDTH as f64;
const H: f64 = HEIGHT as f64;

const SPREAD: usize = 3;
const POSITIONS: [&str; SPREAD] = ["PAST", "PRESENT", "FUTURE"];

const CARD_W: f64 = 130.0;
const CARD_H: f64 = 200.0;
const CARD_SPACING: f64 = 50.0;
const CARD_Y: f64 = H * 0.52;
const HOVER_LIFT: f64 = 10.0;

const TABLE_Y: f64 = H * 0.4;

const GOLD: Color = Color::hex(0xfbbf24);
const VIOLET: Color = Color::hex(0x8b5cf6);
const LAVENDER: Color = Color::hex(0xa78bfa);
const PALE: Color = Color::hex(0xe9d5ff);
const UPRIGHT_GREEN: Color = Color::hex(0x86efac);
const REVERSED_RED: Color = Color::hex(0xfca5a5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Ambient,
    Shuffle,
    Reveal,
    Hover,
    Click,
    Complete,
}

fn start_button() -> Rect {
    Rect::new(W / 2.0 - 120.0, H * 0.7, 240.0, 60.0)
}

fn new_reading_button() -> Rect {
    Rect::new(W / 2.0 - 140.0, H - 90.0, 280.0, 55.0)
}

fn card_rect(index: usize) -> Rect {
    let start = W / 2.0 - (CARD_W * 3.0 + CARD_SPACING * 2.0) / 2.0;
    Rect::new(start + (CARD_W + CARD_SPACING) * index as f64, CARD_Y, CARD_W, CARD_H)
}

/// Sky gradient (top, bottom) for the hour of day
pub fn sky_colors(hour: u32) -> (Color, Color) {
    let (top, bottom) = match hour {
        5..=6 => (0x1a1a3e, 0xff6b35),
        7..=11 => (0x4a90e2, 0x87ceeb),
        12..=16 => (0x2b6cb0, 0x93c5fd),
        17..=18 => (0x1e3a8a, 0xfb923c),
        19..=20 => (0x1a1a3e, 0x4c1d95),
        _ => (0x0a0a1e, 0x1e1e3f),
    };
    (Color::hex(top), Color::hex(bottom))
}

fn is_night(hour: u32) -> bool {
    hour < 6 || hour >= 20
}

fn current_hour() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_secs() / 3600 % 24) as u32)
        .unwrap_or(0)
}

/// Greedy word wrap with an approximate glyph width
fn wrap_words(text: &str, max_width: f64, size: f64) -> Vec<String> {
    let max_chars = ((max_width / (size * 0.55)) as usize).max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub phase: f64,
    pub intensity: f64,
}

#[derive(Debug, Clone)]
pub struct Tarot {
    order: Vec<usize>,
    drawn: Vec<DrawnCard>,
    hovered: Option<usize>,
    candles: [Candle; 2],
    hour: u32,
    /// Window stars and room dust, fixed per instance
    stars: Vec<(Vec2, f64)>,
    specks: Vec<(Vec2, f64)>,
    clock: f64,
    rng: ChaCha20Rng,
}

impl Tarot {
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let window = Self::window();
        let stars = (0..30)
            .map(|_| {
                let p = Vec2::new(
                    window.x + rng.gen_range(0.0..window.w),
                    window.y + rng.gen_range(0.0..window.h),
                );
                (p, rng.gen_range(0.0..2.0))
            })
            .collect();
        let specks = (0..50)
            .map(|_| {
                let p = Vec2::new(rng.gen_range(0.0..W), rng.gen_range(0.0..H * 0.6));
                (p, rng.gen_range(0.0..3.0))
            })
            .collect();
        Self {
            order: shuffled(&mut rng),
            drawn: Vec::with_capacity(SPREAD),
            hovered: None,
            candles: [
                Candle {
                    phase: 0.0,
                    intensity: 1.0,
                },
                Candle {
                    phase: PI,
                    intensity: 1.0,
                },
            ],
            hour: current_hour(),
            stars,
            specks,
            clock: 0.0,
            rng,
        }
    }

    fn window() -> Rect {
        Rect::new(W - 420.0, 60.0, 350.0, 300.0)
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn drawn(&self) -> &[DrawnCard] {
        &self.drawn
    }

    pub fn candles(&self) -> [Candle; 2] {
        self.candles
    }

    pub fn is_complete(&self) -> bool {
        self.drawn.len() == SPREAD && self.drawn.iter().all(|c| c.revealed)
    }

    /// Deal the top three cards face down
    pub fn start_reading(&mut self, cues: &mut Cues<Cue>) {
        if !self.drawn.is_empty() {
            return;
        }
        cues.resume_audio();
        cues.play(Cue::Click);
        cues.play(Cue::Shuffle);
        cues.play(Cue::Ambient);
        let mut drawn = Vec::with_capacity(SPREAD);
        for &index in self.order.iter().take(SPREAD) {
            if let Some(card) = draw(index, &mut self.rng) {
                drawn.push(card);
            }
        }
        self.drawn = drawn;
        debug!(cards = ?self.drawn.iter().map(|c| c.card.name).collect::<Vec<_>>(), "Tarot reading dealt");
    }

    /// Turn one dealt card face up. Returns false if it was already showing.
    pub fn reveal(&mut self, index: usize, cues: &mut Cues<Cue>) -> bool {
        let Some(card) = self.drawn.get_mut(index) else {
            return false;
        };
        if card.revealed {
            return false;
        }
        card.revealed = true;
        cues.play(Cue::Reveal);
        if self.is_complete() {
            cues.play(Cue::Complete);
        }
        true
    }

    /// Fresh shuffle of the whole deck, nothing dealt
    pub fn reset_reading(&mut self, cues: &mut Cues<Cue>) {
        self.order = shuffled(&mut self.rng);
        self.drawn.clear();
        self.hovered = None;
        cues.play(Cue::Click);
        cues.play(Cue::Shuffle);
    }

    fn card_bounds(&self, index: usize) -> Rect {
        let r = card_rect(index);
        if self.hovered == Some(index) {
            Rect::new(r.x, r.y - HOVER_LIFT, r.w, r.h)
        } else {
            r
        }
    }

    fn click(&mut self, p: Vec2, cues: &mut Cues<Cue>) {
        if self.drawn.is_empty() {
            if start_button().contains(p) {
                self.start_reading(cues);
            }
            return;
        }
        if let Some(index) = (0..self.drawn.len()).find(|&i| self.card_bounds(i).contains(p)) {
            self.reveal(index, cues);
        }
        if self.is_complete() && new_reading_button().contains(p) {
            self.reset_reading(cues);
        }
    }

    fn hover(&mut self, p: Vec2, cues: &mut Cues<Cue>) {
        let hovered = (0..self.drawn.len()).find(|&i| {
            let r = card_rect(i);
            Rect::new(r.x, r.y - HOVER_LIFT, r.w, r.h + HOVER_LIFT).contains(p)
        });
        if hovered != self.hovered {
            if let Some(i) = hovered {
                if !self.drawn[i].revealed {
                    cues.play(Cue::Hover);
                }
            }
            self.hovered = hovered;
        }
    }

    fn draw_room(&self, canvas: &mut Canvas) {
        canvas.clear(Color::hex(0x1a0f0f));
        canvas.fill_circle(Vec2::new(W / 2.0, H / 2.0), W * 0.5, Color::hex(0x2d1b1b).alpha(0.6));
        for (p, size) in &self.specks {
            canvas.fill_rect(Rect::new(p.x, p.y, *size, *size), Color::BLACK.alpha(0.3));
        }
    }

    fn draw_window(&self, canvas: &mut Canvas) {
        let win = Self::window();
        let (top, bottom) = sky_colors(self.hour);
        canvas.fill_rect(win, bottom);
        canvas.fill_rect(Rect::new(win.x, win.y, win.w, win.h / 2.0), top);
        if is_night(self.hour) {
            for (p, size) in &self.stars {
                canvas.fill_rect(Rect::new(p.x, p.y, *size, *size), Color::WHITE.alpha(0.8));
            }
        }
        let frame = Color::hex(0x3e2723);
        canvas.stroke_rect(win, frame, 15.0);
        let c = win.center();
        canvas.line(Vec2::new(c.x, win.y), Vec2::new(c.x, win.bottom()), frame, 15.0);
        canvas.line(Vec2::new(win.x, c.y), Vec2::new(win.right(), c.y), frame, 15.0);
    }

    fn draw_table(canvas: &mut Canvas) {
        let cloth = Rect::new(0.0, TABLE_Y, W, H - TABLE_Y);
        canvas.fill_rect(cloth, Color::hex(0x4a2c2a));
        canvas.fill_rect(cloth, Color::rgb(88, 28, 135).alpha(0.3));

        let sigil = Color::rgb(139, 92, 246).alpha(0.2);
        let center = Vec2::new(W / 2.0, TABLE_Y + 200.0);
        canvas.stroke_circle(center, 150.0, sigil);
        for i in 0..5 {
            let angle = f64::from(i) * TAU / 5.0 - PI / 2.0;
            let star = star_points(center + Vec2::from_angle(angle) * 180.0, 5, 8.0, 4.0);
            canvas.polygon(star, sigil, false);
        }
    }

    fn draw_candle(canvas: &mut Canvas, x: f64, y: f64, intensity: f64) {
        canvas.fill_rect(Rect::new(x - 10.0, y, 20.0, 60.0), Color::hex(0xf5f5dc));
        canvas.polygon(
            vec![Vec2::new(x - 10.0, y), Vec2::new(x - 12.0, y + 10.0), Vec2::new(x - 10.0, y + 15.0)],
            Color::hex(0xececd0),
            true,
        );
        let flame = Vec2::new(x, y - 10.0);
        canvas.fill_circle(flame, 40.0 * intensity, Color::rgb(255, 140, 50).alpha(0.4 * intensity));
        canvas.fill_circle(flame, 20.0 * intensity, Color::rgb(255, 200, 50).alpha(0.8 * intensity));
        let tip = Vec2::new(x, y - 15.0);
        canvas.fill_ellipse(tip, Vec2::new(5.0, 10.0 * intensity), 0.0, Color::hex(0xffaa00));
        canvas.fill_ellipse(tip, Vec2::new(3.0, 7.0 * intensity), 0.0, Color::hex(0xff6600));
    }

    fn draw_fortune_teller(canvas: &mut Canvas) {
        let (x, y) = (W / 2.0, 150.0);
        let skin = Color::hex(0xd4a574);
        let ink = Color::hex(0x3e2723);

        canvas.fill_ellipse(Vec2::new(x, y), Vec2::new(40.0, 50.0), 0.0, Color::hex(0x8b4513));
        canvas.fill_ellipse(Vec2::new(x, y + 5.0), Vec2::new(30.0, 35.0), 0.0, skin);
        canvas.fill_circle(Vec2::new(x - 10.0, y), 3.0, ink);
        canvas.fill_circle(Vec2::new(x + 10.0, y), 3.0, ink);

        let smile: Vec<Vec2> = (0..=8)
            .map(|i| {
                let a = 0.2 + (PI - 0.4) * f64::from(i) / 8.0;
                Vec2::new(x, y + 10.0) + Vec2::from_angle(a) * 12.0
            })
            .collect();
        for pair in smile.windows(2) {
            canvas.line(pair[0], pair[1], ink, 2.0);
        }

        let scarf: Vec<Vec2> = (0..=12)
            .map(|i| {
                let a = PI + PI * f64::from(i) / 12.0;
                Vec2::new(x + a.cos() * 45.0, y - 20.0 + a.sin() * 30.0)
            })
            .collect();
        canvas.polygon(scarf, Color::hex(0x6b21a8), true);

        canvas.polygon(
            vec![
                Vec2::new(x - 45.0, y + 40.0),
                Vec2::new(x + 45.0, y + 40.0),
                Vec2::new(x + 60.0, y + 120.0),
                Vec2::new(x - 60.0, y + 120.0),
            ],
            Color::hex(0x7c3aed),
            true,
        );

        canvas.fill_ellipse(Vec2::new(x - 150.0, H * 0.42), Vec2::new(20.0, 25.0), -0.3, skin);
        canvas.fill_ellipse(Vec2::new(x + 150.0, H * 0.42), Vec2::new(20.0, 25.0), 0.3, skin);
    }

    fn draw_start_button(canvas: &mut Canvas) {
        let b = start_button();
        canvas.fill_rect(
            Rect::new(b.x - 60.0, b.y - 30.0, b.w + 120.0, b.h + 60.0),
            Color::rgb(139, 92, 246).alpha(0.15),
        );
        canvas.fill_rect(b, Color::rgb(88, 28, 135).alpha(0.8));
        canvas.stroke_rect(b, LAVENDER, 2.0);
        canvas.text(b.center(), "Draw Your Cards", 24.0, PALE, TextAlign::Center);
    }

    fn draw_cards(&self, canvas: &mut Canvas) {
        for (index, card) in self.drawn.iter().enumerate() {
            let r = self.card_bounds(index);
            canvas.text(
                Vec2::new(r.center().x, CARD_Y - 20.0),
                POSITIONS[index],
                14.0,
                VIOLET.alpha(0.6),
                TextAlign::Center,
            );
            canvas.fill_rect(Rect::new(r.x, r.y + 8.0, r.w, r.h), Color::BLACK.alpha(0.6));
            if card.revealed {
                Self::draw_face(canvas, r, card);
            } else {
                self.draw_back(canvas, r);
            }
        }
    }

    fn draw_face(canvas: &mut Canvas, r: Rect, card: &DrawnCard) {
        canvas.fill_rect(r, Color::hex(0x2d1b69));
        canvas.stroke_rect(Rect::new(r.x + 2.0, r.y + 2.0, r.w - 4.0, r.h - 4.0), GOLD, 4.0);
        canvas.stroke_rect(Rect::new(r.x + 6.0, r.y + 6.0, r.w - 12.0, r.h - 12.0), VIOLET, 2.0);
        for (corner, sx, sy) in [
            (Vec2::new(r.x + 10.0, r.y + 10.0), 1.0, 1.0),
            (Vec2::new(r.right() - 10.0, r.y + 10.0), -1.0, 1.0),
            (Vec2::new(r.x + 10.0, r.bottom() - 10.0), 1.0, -1.0),
            (Vec2::new(r.right() - 10.0, r.bottom() - 10.0), -1.0, -1.0),
        ] {
            canvas.line(corner, corner + Vec2::new(12.0 * sx, 0.0), GOLD, 2.0);
            canvas.line(corner, corner + Vec2::new(0.0, 12.0 * sy), GOLD, 2.0);
        }

        // Reversed cards are drawn upside down around the card centre
        let c = r.center();
        canvas.push_transform(c, if card.reversed { PI } else { 0.0 });
        let local = |x: f64, y: f64| Vec2::new(x - c.x, y - c.y);

        canvas.fill_rect(
            Rect::new(r.x + 10.0 - c.x, r.y + 15.0 - c.y, r.w - 20.0, 45.0),
            VIOLET.alpha(0.3),
        );
        for (i, line) in wrap_words(card.card.name, r.w - 30.0, 13.0).iter().enumerate() {
            canvas.text(local(c.x, r.y + 22.0 + i as f64 * 16.0), line.as_str(), 13.0, GOLD, TextAlign::Center);
        }
        canvas.fill_circle(Vec2::ZERO, 30.0, VIOLET.alpha(0.3));
        canvas.text(local(c.x, c.y - 5.0), "\u{1f52e}", 50.0, PALE, TextAlign::Center);

        let badge_color = if card.reversed { REVERSED_RED } else { UPRIGHT_GREEN };
        let badge = Rect::new(-35.0, r.bottom() - 30.0 - c.y, 70.0, 20.0);
        canvas.fill_rect(badge, badge_color.alpha(0.2));
        canvas.stroke_rect(badge, badge_color, 1.0);
        canvas.text(
            Vec2::new(0.0, badge.y + 13.0),
            card.orientation().to_uppercase(),
            9.0,
            badge_color,
            TextAlign::Center,
        );
        canvas.pop_transform();
    }

    fn draw_back(&self, canvas: &mut Canvas, r: Rect) {
        canvas.fill_rect(r, Color::hex(0x6b21a8));
        canvas.stroke_rect(Rect::new(r.x + 3.0, r.y + 3.0, r.w - 6.0, r.h - 6.0), LAVENDER, 3.0);
        let c = r.center();
        canvas.stroke_circle(c, 35.0, Color::hex(0xc4b5fd));
        canvas.stroke_circle(c, 25.0, LAVENDER);
        canvas.stroke_circle(c, 15.0, VIOLET);
        for i in 0..8 {
            let angle = f64::from(i) * TAU / 8.0 + self.clock;
            let s = c + Vec2::from_angle(angle) * 40.0;
            canvas.fill_circle(s, 8.0, GOLD.alpha(0.25));
            canvas.polygon(star_points(s, 5, 4.0, 4.0), GOLD, true);
        }
        canvas.fill_rect(Rect::new(r.x + 15.0, r.bottom() + 10.0, r.w - 30.0, 25.0), VIOLET.alpha(0.4));
        canvas.text(
            Vec2::new(c.x, r.bottom() + 25.0),
            "\u{2728} CLICK TO REVEAL \u{2728}",
            11.0,
            PALE,
            TextAlign::Center,
        );
    }

    fn draw_readings(&self, canvas: &mut Canvas) {
        canvas.fill_rect(Rect::new(0.0, 0.0, W, H), Color::rgb(20, 12, 48).alpha(0.96));
        canvas.fill_rect(Rect::new(W * 0.25, 0.0, W * 0.5, 3.0), VIOLET.alpha(0.6));
        canvas.text(
            Vec2::new(W / 2.0, 60.0),
            "\u{2728} Your Three-Card Reading \u{2728}",
            36.0,
            GOLD,
            TextAlign::Center,
        );
        canvas.text(
            Vec2::new(W / 2.0, 90.0),
            "The cards have spoken...",
            16.0,
            PALE.alpha(0.7),
            TextAlign::Center,
        );

        const TITLES: [&str; SPREAD] = ["\u{1f305} The Past", "\u{2b50} The Present", "\u{1f319} The Future"];
        const ACCENTS: [Color; SPREAD] = [Color::hex(0xfb923c), GOLD, VIOLET];
        let spacing = H / 4.5;
        for (index, card) in self.drawn.iter().enumerate() {
            let y = 130.0 + index as f64 * spacing;
            let accent = ACCENTS[index];
            canvas.fill_rect(Rect::new(40.0, y - 10.0, W - 80.0, spacing - 10.0), VIOLET.alpha(0.08));
            canvas.fill_rect(Rect::new(40.0, y - 10.0, 4.0, spacing - 10.0), accent);
            canvas.text(Vec2::new(60.0, y + 10.0), TITLES[index], 22.0, accent, TextAlign::Left);
            canvas.text(Vec2::new(60.0, y + 40.0), card.card.name, 20.0, PALE, TextAlign::Left);

            let badge_color = if card.reversed { REVERSED_RED } else { UPRIGHT_GREEN };
            let badge_x = 60.0 + card.card.name.len() as f64 * 20.0 * 0.55 + 15.0;
            let badge = Rect::new(badge_x, y + 25.0, 80.0, 22.0);
            canvas.fill_rect(badge, badge_color.alpha(0.2));
            canvas.stroke_rect(badge, badge_color, 1.0);
            canvas.text(
                Vec2::new(badge.center().x, y + 40.0),
                card.orientation().to_uppercase(),
                11.0,
                badge_color,
                TextAlign::Center,
            );

            for (i, line) in wrap_words(card.meaning(), W - 120.0, 15.0).into_iter().enumerate() {
                let pos = Vec2::new(60.0, y + 70.0 + i as f64 * 22.0);
                canvas.text(pos, line, 15.0, Color::hex(0xcbd5e1), TextAlign::Left);
            }
        }

        let b = new_reading_button();
        canvas.fill_rect(
            Rect::new(b.x - 50.0, b.y - 25.0, b.w + 100.0, b.h + 50.0),
            VIOLET.alpha(0.12),
        );
        canvas.fill_rect(b, Color::hex(0x7c3aed));
        canvas.stroke_rect(b, LAVENDER, 2.0);
        canvas.text(
            Vec2::new(W / 2.0, b.y + 35.0),
            "\u{2728} New Reading \u{2728}",
            20.0,
            Color::WHITE,
            TextAlign::Center,
        );
    }
}

/// Closed outline of a star with `points` tips
fn star_points(center: Vec2, points: u32, outer: f64, inner: f64) -> Vec<Vec2> {
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = -PI / 2.0 + f64::from(i) * PI / f64::from(points);
            center + Vec2::from_angle(a) * r
        })
        .collect()
}

impl Default for Tarot {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Game for Tarot {
    type Cue = Cue;

    fn game_id(&self) -> GameId {
        GameId {
            game_id: "tarot".to_string(),
            build_id: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            id: self.game_id(),
            title: "Tarot Reading".to_string(),
            width: WIDTH,
            height: HEIGHT,
            audio: true,
            clamps_delta: true,
        }
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) {
        *self = Self::with_seed(ctx.seed());
        ctx.listen_surface(&[EventKind::Click, EventKind::MouseMove]);
    }

    fn update(&mut self, dt: f64, _cues: &mut Cues<Cue>) {
        let dt = clamp_delta(dt);
        self.clock += dt;
        let [left, right] = &mut self.candles;
        left.phase += dt * 3.0;
        right.phase += dt * 4.0;
        left.intensity = 0.8 + left.phase.sin() * 0.2;
        right.intensity = 0.85 + right.phase.sin() * 0.15;
    }

    fn handle_input(&mut self, event: &InputEvent, cues: &mut Cues<Cue>) {
        match event {
            InputEvent::Click(p) => self.click(*p, cues),
            InputEvent::MouseMove(p) => self.hover(*p, cues),
            _ => {}
        }
    }

    fn render(&self, canvas: &mut Canvas) {
        self.draw_room(canvas);
        self.draw_window(canvas);
        Self::draw_table(canvas);
        let [left, right] = self.candles;
        Self::draw_candle(canvas, 100.0, H * 0.5, left.intensity);
        Self::draw_candle(canvas, W - 100.0, H * 0.5, right.intensity);
        Self::draw_fortune_teller(canvas);

        if self.drawn.is_empty() {
            Self::draw_start_button(canvas);
        } else {
            self.draw_cards(canvas);
        }
        if self.is_complete() {
            self.draw_readings(canvas);
        }
    }

    fn destroy(&mut self) {
        self.hovered = None;
    }

    fn encode_cue(cue: &Cue, out: &mut Vec<Tone>) {
        match cue {
            Cue::Ambient => out.push(Tone::new(Waveform::Sine, 220.0, 2.0, 0.1).glide(110.0)),
            Cue::Shuffle => out.push(Tone::new(Waveform::Noise, 800.0, 0.3, 0.15)),
            Cue::Reveal => {
                out.push(Tone::new(Waveform::Sine, 523.25, 0.4, 0.15).glide(1046.5));
                out.push(Tone::new(Waveform::Sine, 659.25, 0.4, 0.15).glide(1318.5));
            }
            Cue::Hover => out.push(Tone::new(Waveform::Sine, 880.0, 0.1, 0.05)),
            Cue::Click => out.push(Tone::new(Waveform::Sine, 1000.0, 0.1, 0.2).glide(500.0)),
            Cue::Complete => arpeggio(Waveform::Sine, &[523.25, 659.25, 783.99, 1046.5], 0.15, 1.0, 0.12, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck::DECK_SIZE;
    use proptest::prelude::*;

    fn cue_list(cues: &Cues<Cue>) -> Vec<Cue> {
        cues.iter().copied().collect()
    }

    fn sorted(order: &[usize]) -> Vec<usize> {
        let mut v = order.to_vec();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_button_deals_top_three() {
        let mut game = Tarot::with_seed(21);
        let mut cues = Cues::new();
        let top: Vec<usize> = game.order()[..3].to_vec();

        game.handle_input(&InputEvent::Click(start_button().center()), &mut cues);
        assert_eq!(game.drawn().len(), 3);
        let dealt: Vec<usize> = game.drawn().iter().map(|c| usize::from(c.card.id)).collect();
        assert_eq!(dealt, top);
        assert!(game.drawn().iter().all(|c| !c.revealed));
        assert!(cues.resume_requested());
        assert!(cue_list(&cues).contains(&Cue::Shuffle));
    }

    #[test]
    fn test_click_outside_button_does_nothing() {
        let mut game = Tarot::with_seed(2);
        let mut cues = Cues::new();
        game.handle_input(&InputEvent::Click(Vec2::new(10.0, 10.0)), &mut cues);
        assert!(game.drawn().is_empty());
        assert!(cues.is_empty());
    }

    #[test]
    fn test_reveal_each_card_once() {
        let mut game = Tarot::with_seed(3);
        let mut cues = Cues::new();
        game.start_reading(&mut cues);
        cues.clear();

        game.handle_input(&InputEvent::Click(card_rect(1).center()), &mut cues);
        assert!(game.drawn()[1].revealed);
        assert!(!game.reveal(1, &mut cues));
        assert!(game.reveal(0, &mut cues));
        assert!(!game.is_complete());
        assert!(game.reveal(2, &mut cues));
        assert!(game.is_complete());
        assert_eq!(cue_list(&cues), vec![Cue::Reveal, Cue::Reveal, Cue::Reveal, Cue::Complete]);

        let mut canvas = Canvas::new(WIDTH, HEIGHT);
        game.render(&mut canvas);
        assert!(canvas.texts().any(|t| t == game.drawn()[0].card.name));
        assert!(canvas.texts().any(|t| t.contains("New Reading")));
    }

    #[test]
    fn test_reset_reshuffles_same_deck() {
        let mut game = Tarot::with_seed(8);
        let mut cues = Cues::new();
        let before = game.order().to_vec();
        game.start_reading(&mut cues);
        for i in 0..3 {
            game.reveal(i, &mut cues);
        }

        game.handle_input(&InputEvent::Click(new_reading_button().center()), &mut cues);
        assert!(game.drawn().is_empty());
        assert!(!game.is_complete());
        assert_ne!(game.order(), &before[..]);
        assert_eq!(sorted(game.order()), (0..DECK_SIZE).collect::<Vec<_>>());
        assert_eq!(sorted(game.order()), sorted(&before));

        // Back to the start button
        let mut canvas = Canvas::new(WIDTH, HEIGHT);
        game.render(&mut canvas);
        assert!(canvas.texts().any(|t| t == "Draw Your Cards"));
    }

    #[test]
    fn test_new_reading_ignored_until_complete() {
        let mut game = Tarot::with_seed(8);
        let mut cues = Cues::new();
        game.start_reading(&mut cues);
        game.reveal(0, &mut cues);
        game.handle_input(&InputEvent::Click(new_reading_button().center()), &mut cues);
        assert_eq!(game.drawn().len(), 3);
    }

    #[test]
    fn test_hover_lifts_and_chimes_once() {
        let mut game = Tarot::with_seed(5);
        let mut cues = Cues::new();
        game.start_reading(&mut cues);
        cues.clear();

        let over = card_rect(2).center();
        game.handle_input(&InputEvent::MouseMove(over), &mut cues);
        game.handle_input(&InputEvent::MouseMove(over + Vec2::new(3.0, 0.0)), &mut cues);
        assert_eq!(cue_list(&cues), vec![Cue::Hover]);
        assert_eq!(game.card_bounds(2).y, CARD_Y - HOVER_LIFT);

        game.handle_input(&InputEvent::MouseMove(Vec2::new(5.0, 5.0)), &mut cues);
        assert_eq!(game.card_bounds(2).y, CARD_Y);
    }

    #[test]
    fn test_sky_by_hour() {
        assert_eq!(sky_colors(6).1, Color::hex(0xff6b35));
        assert_eq!(sky_colors(13).0, Color::hex(0x2b6cb0));
        assert_eq!(sky_colors(23), sky_colors(2));
        assert!(is_night(21) && is_night(5) && !is_night(12));
    }

    #[test]
    fn test_wrap_words() {
        let lines = wrap_words("one two three four five six", 60.0, 10.0);
        assert!(lines.iter().all(|l| l.len() <= 10));
        assert_eq!(lines.join(" "), "one two three four five six");
        assert!(wrap_words("", 100.0, 10.0).is_empty());
    }

    proptest! {
        #[test]
        fn candle_phase_is_clamped(dt in 0.033f64..30.0) {
            let mut a = Tarot::with_seed(1);
            let mut b = a.clone();
            a.update(dt, &mut Cues::new());
            b.update(0.033, &mut Cues::new());
            prop_assert_eq!(a.candles(), b.candles());
        }
    }
}

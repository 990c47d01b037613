//! Klondike solitaire
//!
//! Draw one, unlimited passes through the stock. Cards are dragged with the
//! mouse; a double-click sends a top card to its foundation and `R` deals a
//! fresh game.

pub mod cards;
pub mod table;

use std::f64::consts::PI;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use engine_core::audio::{arpeggio, Tone, Waveform};
use engine_core::geom::{Rect, Vec2};
use engine_core::input::{EventKind, InputEvent};
use engine_core::render::{Canvas, Color, TextAlign};
use engine_core::timing::clamp_delta;
use engine_core::typed::{Capabilities, Cues, Game, GameId, InitContext};

use cards::{Card, Suit};
use table::{Origin, StockDraw, Table, TABLEAU_PILES};

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 800;
const W: f64 = WIDTH as f64;
const H: f64 = HEIGHT as f64;

const CARD_W: f64 = 90.0;
const CARD_H: f64 = 128.0;
const TOP_PAD: f64 = 85.0;
const LEFT_PAD: f64 = 60.0;
const GAP: f64 = 22.0;
const TABLEAU_Y: f64 = 240.0;
const TABLEAU_DY: f64 = 30.0;

const DOUBLE_CLICK_SECS: f64 = 0.28;
const DOUBLE_CLICK_SLOP: f64 = 10.0;

const HELP: &str = "Click stock to draw \u{2022} Drag cards \u{2022} Double-click to send to foundation";
const WIN_MESSAGE: &str = "You win! Press R for a new game";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Draw,
    Flip,
    Place,
    Error,
    Recycle,
    Win,
}

/// What lies under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hit {
    Stock,
    Waste,
    Foundation(Suit),
    Tableau { pile: usize, index: usize },
}

#[derive(Debug, Clone, PartialEq)]
struct Drag {
    cards: Vec<Card>,
    from: Origin,
    offset: Vec2,
    pos: Vec2,
}

fn stock_slot() -> Rect {
    Rect::new(LEFT_PAD, TOP_PAD, CARD_W, CARD_H)
}

fn waste_slot() -> Rect {
    Rect::new(LEFT_PAD + CARD_W + GAP, TOP_PAD, CARD_W, CARD_H)
}

fn foundation_slot(suit: Suit) -> Rect {
    let x0 = W - LEFT_PAD - (CARD_W * 4.0 + GAP * 3.0);
    Rect::new(x0 + suit.index() as f64 * (CARD_W + GAP), TOP_PAD, CARD_W, CARD_H)
}

fn tableau_slot(pile: usize) -> Rect {
    Rect::new(LEFT_PAD + pile as f64 * (CARD_W + GAP), TABLEAU_Y, CARD_W, CARD_H)
}

fn tableau_card_pos(pile: usize, index: usize) -> Vec2 {
    let slot = tableau_slot(pile);
    Vec2::new(slot.x, slot.y + index as f64 * TABLEAU_DY)
}

#[derive(Debug, Clone)]
pub struct Solitaire {
    table: Table,
    drag: Option<Drag>,
    last_click: Option<(f64, Vec2)>,
    elapsed: f64,
    won: bool,
    message: &'static str,
    rng: ChaCha20Rng,
}

impl Solitaire {
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Self {
            table: Table::deal(&mut rng),
            drag: None,
            last_click: None,
            elapsed: 0.0,
            won: false,
            message: HELP,
            rng,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn new_game(&mut self) {
        self.table = Table::deal(&mut self.rng);
        self.drag = None;
        self.won = false;
        self.message = HELP;
    }

    /// Move a card or run onto a tableau pile, with the exposed card flip
    /// and win check that follow a legal move
    pub fn try_move_to_tableau(&mut self, from: Origin, dest: usize, cues: &mut Cues<Cue>) -> bool {
        let moved = self.table.try_move_to_tableau(from, dest);
        if moved {
            self.after_move(from, cues);
        }
        moved
    }

    pub fn try_move_to_foundation(&mut self, from: Origin, suit: Suit, cues: &mut Cues<Cue>) -> bool {
        let moved = self.table.try_move_to_foundation(from, suit);
        if moved {
            self.after_move(from, cues);
        }
        moved
    }

    fn after_move(&mut self, from: Origin, cues: &mut Cues<Cue>) {
        cues.play(Cue::Place);
        if let Origin::Tableau { pile, .. } = from {
            if self.table.flip_exposed(pile) {
                cues.play(Cue::Flip);
            }
        }
        if self.table.is_won() && !self.won {
            self.won = true;
            self.message = WIN_MESSAGE;
            debug!("Solitaire won");
            cues.play(Cue::Win);
        }
    }

    fn auto_to_foundation(&mut self, from: Origin, cues: &mut Cues<Cue>) -> bool {
        let Some(&[card]) = self.table.moving(from) else {
            return false;
        };
        self.try_move_to_foundation(from, card.suit, cues)
    }

    fn hit_test(&self, p: Vec2) -> Option<Hit> {
        if stock_slot().contains(p) {
            return Some(Hit::Stock);
        }
        if waste_slot().contains(p) {
            return Some(Hit::Waste);
        }
        if let Some(suit) = Suit::ALL.into_iter().find(|s| foundation_slot(*s).contains(p)) {
            return Some(Hit::Foundation(suit));
        }
        for pile in (0..TABLEAU_PILES).rev() {
            let len = self.table.tableau[pile].len();
            for index in (0..len).rev() {
                let top = tableau_card_pos(pile, index);
                let h = if index + 1 == len { CARD_H } else { TABLEAU_DY + 6.0 };
                if Rect::new(top.x, top.y, CARD_W, h).contains(p) {
                    return Some(Hit::Tableau { pile, index });
                }
            }
        }
        None
    }

    /// Drop target column; anywhere down the column counts
    fn tableau_column_at(&self, p: Vec2) -> Option<usize> {
        (0..TABLEAU_PILES).find(|&pile| {
            let slot = tableau_slot(pile);
            p.x >= slot.x && p.x <= slot.right() && p.y >= slot.y && p.y <= (H - 40.0).max(slot.bottom())
        })
    }

    fn start_drag(&mut self, from: Origin, p: Vec2) {
        let Some(cards) = self.table.moving(from) else {
            return;
        };
        let origin = match from {
            Origin::Waste => {
                let slot = waste_slot();
                Vec2::new(slot.x, slot.y)
            }
            Origin::Tableau { pile, index } => tableau_card_pos(pile, index),
        };
        self.drag = Some(Drag {
            cards: cards.to_vec(),
            from,
            offset: p - origin,
            pos: origin,
        });
    }

    fn mouse_down(&mut self, p: Vec2, cues: &mut Cues<Cue>) {
        cues.resume_audio();
        let double = self
            .last_click
            .map_or(false, |(t, q)| self.elapsed - t < DOUBLE_CLICK_SECS && p.distance(q) < DOUBLE_CLICK_SLOP);
        self.last_click = Some((self.elapsed, p));

        match self.hit_test(p) {
            Some(Hit::Stock) => {
                if self.won {
                    return;
                }
                match self.table.draw_from_stock() {
                    StockDraw::Drew(_) => cues.play(Cue::Draw),
                    StockDraw::Recycled => cues.play(Cue::Recycle),
                    StockDraw::Empty => cues.play(Cue::Error),
                }
            }
            Some(Hit::Waste) => {
                if double && self.auto_to_foundation(Origin::Waste, cues) {
                    return;
                }
                self.start_drag(Origin::Waste, p);
            }
            Some(Hit::Tableau { pile, index }) => {
                let from = Origin::Tableau { pile, index };
                let is_top = index + 1 == self.table.tableau[pile].len();
                if double && is_top && self.auto_to_foundation(from, cues) {
                    return;
                }
                self.start_drag(from, p);
            }
            Some(Hit::Foundation(_)) | None => {}
        }
    }

    fn mouse_up(&mut self, p: Vec2, cues: &mut Cues<Cue>) {
        let Some(drag) = self.drag.take() else {
            return;
        };

        let mut targeted = false;
        let mut moved = false;
        if drag.cards.len() == 1 {
            if let Some(suit) = Suit::ALL.into_iter().find(|s| foundation_slot(*s).contains(p)) {
                targeted = true;
                moved = self.try_move_to_foundation(drag.from, suit, cues);
            }
        }
        if !moved {
            if let Some(dest) = self.tableau_column_at(p) {
                let home = matches!(drag.from, Origin::Tableau { pile, .. } if pile == dest);
                targeted |= !home;
                moved = self.try_move_to_tableau(drag.from, dest, cues);
            }
        }
        // Illegal drops leave the cards where they were
        if targeted && !moved {
            cues.play(Cue::Error);
        }
    }

    fn draw_slot(canvas: &mut Canvas, slot: Rect) {
        canvas.stroke_rect(slot, Color::WHITE.alpha(0.18), 2.0);
    }

    fn draw_back(canvas: &mut Canvas, at: Vec2) {
        let card = Rect::new(at.x, at.y, CARD_W, CARD_H);
        canvas.fill_rect(Rect::new(at.x, at.y + 6.0, CARD_W, CARD_H), Color::BLACK.alpha(0.35));
        canvas.fill_rect(card, Color::hex(0x5e5ce6));
        canvas.stroke_rect(
            Rect::new(at.x + 4.0, at.y + 4.0, CARD_W - 8.0, CARD_H - 8.0),
            Color::WHITE.alpha(0.45),
            2.0,
        );
        for i in 0..6 {
            canvas.stroke_circle(card.center(), 10.0 + f64::from(i) * 10.0, Color::WHITE.alpha(0.22));
        }
    }

    fn draw_face(canvas: &mut Canvas, at: Vec2, card: &Card, lifting: bool) {
        let rect = Rect::new(at.x, at.y, CARD_W, CARD_H);
        let (shadow, drop) = if lifting { (0.45, 10.0) } else { (0.3, 6.0) };
        canvas.fill_rect(Rect::new(at.x, at.y + drop, CARD_W, CARD_H), Color::BLACK.alpha(shadow));
        canvas.fill_rect(rect, Color::hex(0xf8fafc));
        canvas.stroke_rect(rect, Color::hex(0x0f172a).alpha(0.18), 2.0);

        let ink = if card.is_red() {
            Color::hex(0xef4444)
        } else {
            Color::hex(0x0f172a)
        };
        let symbol = card.suit.symbol();
        canvas.text(
            Vec2::new(rect.center().x, rect.center().y + 22.0),
            symbol,
            64.0,
            ink.alpha(0.12),
            TextAlign::Center,
        );
        canvas.text(Vec2::new(at.x + 10.0, at.y + 24.0), card.label(), 18.0, ink, TextAlign::Left);
        canvas.text(Vec2::new(at.x + 10.0, at.y + 44.0), symbol, 18.0, ink, TextAlign::Left);

        canvas.push_transform(Vec2::new(rect.right() - 10.0, rect.bottom() - 10.0), PI);
        canvas.text(Vec2::ZERO, card.label(), 18.0, ink, TextAlign::Right);
        canvas.text(Vec2::new(0.0, 20.0), symbol, 18.0, ink, TextAlign::Right);
        canvas.pop_transform();
    }
}

impl Default for Solitaire {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Game for Solitaire {
    type Cue = Cue;

    fn game_id(&self) -> GameId {
        GameId {
            game_id: "solitaire".to_string(),
            build_id: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            id: self.game_id(),
            title: "Solitaire".to_string(),
            width: WIDTH,
            height: HEIGHT,
            audio: true,
            clamps_delta: true,
        }
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) {
        *self = Self::with_seed(ctx.seed());
        ctx.listen_surface(&[EventKind::MouseMove, EventKind::MouseDown]);
        ctx.listen_window(&[EventKind::MouseUp, EventKind::KeyDown]);
    }

    fn update(&mut self, dt: f64, _cues: &mut Cues<Cue>) {
        // Only the double-click window depends on time
        self.elapsed += clamp_delta(dt);
    }

    fn handle_input(&mut self, event: &InputEvent, cues: &mut Cues<Cue>) {
        match event {
            InputEvent::MouseMove(p) => {
                if let Some(drag) = &mut self.drag {
                    drag.pos = *p - drag.offset;
                }
            }
            InputEvent::MouseDown(p) => self.mouse_down(*p, cues),
            InputEvent::MouseUp(p) => self.mouse_up(*p, cues),
            InputEvent::KeyDown(k) if k.is_letter('r') => self.new_game(),
            _ => {}
        }
    }

    fn render(&self, canvas: &mut Canvas) {
        canvas.clear(Color::hex(0x06261e));
        canvas.fill_rect(Rect::new(0.0, 0.0, W, H / 2.0), Color::hex(0x0b3b2e));

        let header = Color::WHITE.alpha(0.75);
        let title = if self.won { "Solitaire - You win!" } else { "Solitaire" };
        canvas.text(Vec2::new(60.0, 45.0), title, 18.0, header, TextAlign::Left);
        canvas.text(Vec2::new(W - 60.0, 45.0), "Press R for new deal", 18.0, header, TextAlign::Right);
        canvas.text(Vec2::new(W / 2.0, H - 30.0), self.message, 16.0, Color::WHITE.alpha(0.55), TextAlign::Center);

        Self::draw_slot(canvas, stock_slot());
        Self::draw_slot(canvas, waste_slot());
        for suit in Suit::ALL {
            let slot = foundation_slot(suit);
            Self::draw_slot(canvas, slot);
            let hint = Vec2::new(slot.center().x, slot.center().y + 10.0);
            canvas.text(hint, suit.symbol(), 28.0, Color::WHITE.alpha(0.12), TextAlign::Center);
        }
        for pile in 0..TABLEAU_PILES {
            Self::draw_slot(canvas, tableau_slot(pile));
        }

        if !self.table.stock.is_empty() {
            let slot = stock_slot();
            Self::draw_back(canvas, Vec2::new(slot.x, slot.y));
            canvas.text(
                Vec2::new(slot.center().x, slot.bottom() + 18.0),
                self.table.stock.len().to_string(),
                14.0,
                Color::WHITE.alpha(0.55),
                TextAlign::Center,
            );
        }

        let dragging_waste = matches!(&self.drag, Some(d) if d.from == Origin::Waste);
        let waste = &self.table.waste;
        let shown = if dragging_waste { waste.len().checked_sub(2) } else { waste.len().checked_sub(1) };
        if let Some(card) = shown.and_then(|i| waste.get(i)) {
            let slot = waste_slot();
            Self::draw_face(canvas, Vec2::new(slot.x, slot.y), card, false);
        }

        for suit in Suit::ALL {
            if let Some(top) = self.table.foundation(suit).last() {
                let slot = foundation_slot(suit);
                Self::draw_face(canvas, Vec2::new(slot.x, slot.y), top, false);
            }
        }

        for (pile, cards) in self.table.tableau.iter().enumerate() {
            for (index, card) in cards.iter().enumerate() {
                let lifted = match &self.drag {
                    Some(Drag {
                        from: Origin::Tableau { pile: p, index: i },
                        ..
                    }) => *p == pile && index >= *i,
                    _ => false,
                };
                if lifted {
                    continue;
                }
                let at = tableau_card_pos(pile, index);
                if card.face_up {
                    Self::draw_face(canvas, at, card, false);
                } else {
                    Self::draw_back(canvas, at);
                }
            }
        }

        if let Some(drag) = &self.drag {
            for (i, card) in drag.cards.iter().enumerate() {
                let at = Vec2::new(drag.pos.x, drag.pos.y + i as f64 * TABLEAU_DY);
                Self::draw_face(canvas, at, card, true);
            }
        }
    }

    fn destroy(&mut self) {
        self.drag = None;
        self.last_click = None;
    }

    fn encode_cue(cue: &Cue, out: &mut Vec<Tone>) {
        match cue {
            Cue::Draw => out.push(Tone::new(Waveform::Triangle, 520.0, 0.07, 0.06).glide(740.0)),
            Cue::Flip => out.push(Tone::new(Waveform::Square, 240.0, 0.05, 0.04).glide(180.0)),
            Cue::Place => out.push(Tone::new(Waveform::Sine, 660.0, 0.06, 0.05).glide(520.0)),
            Cue::Error => out.push(Tone::new(Waveform::Sawtooth, 160.0, 0.18, 0.05).glide(90.0)),
            Cue::Recycle => out.push(Tone::new(Waveform::Triangle, 300.0, 0.10, 0.04).glide(420.0)),
            Cue::Win => arpeggio(Waveform::Sine, &[523.25, 659.25, 783.99, 1046.5], 0.07, 0.18, 0.05, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cards::{ACE, KING};
    use engine_core::input::Key;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn up(id: u8, suit: Suit, rank: u8) -> Card {
        Card {
            face_up: true,
            ..Card::new(id, suit, rank)
        }
    }

    fn empty_game() -> Solitaire {
        let mut game = Solitaire::with_seed(3);
        game.table = Table::default();
        game
    }

    fn card_center(pile: usize, index: usize) -> Vec2 {
        tableau_card_pos(pile, index) + Vec2::new(CARD_W / 2.0, 10.0)
    }

    #[test]
    fn test_seven_on_same_colour_eight_rejected() {
        let mut game = empty_game();
        game.table.tableau[0] = vec![up(0, Suit::Hearts, 8)];
        game.table.tableau[1] = vec![up(1, Suit::Diamonds, 7)];
        let before = game.table.clone();
        let mut cues = Cues::new();
        assert!(!game.try_move_to_tableau(Origin::Tableau { pile: 1, index: 0 }, 0, &mut cues));
        assert_eq!(game.table, before);
        assert!(cues.is_empty());
    }

    #[test]
    fn test_drag_and_drop_with_flip() {
        let mut game = empty_game();
        game.table.tableau[0] = vec![up(0, Suit::Clubs, 9)];
        game.table.tableau[1] = vec![Card::new(1, Suit::Spades, 4), up(2, Suit::Hearts, 8)];
        let mut cues = Cues::new();

        game.handle_input(&InputEvent::MouseDown(card_center(1, 1)), &mut cues);
        assert!(game.is_dragging());
        let target = card_center(0, 0) + Vec2::new(0.0, 40.0);
        game.handle_input(&InputEvent::MouseMove(target), &mut cues);
        game.handle_input(&InputEvent::MouseUp(target), &mut cues);

        assert!(!game.is_dragging());
        assert_eq!(game.table().tableau[0].len(), 2);
        assert!(game.table().tableau[1][0].face_up);
        assert_eq!(cues.iter().copied().collect::<Vec<_>>(), vec![Cue::Place, Cue::Flip]);
        assert!(cues.resume_requested());
    }

    #[test]
    fn test_illegal_drop_returns_cards() {
        let mut game = empty_game();
        game.table.tableau[0] = vec![up(0, Suit::Clubs, 9)];
        game.table.tableau[1] = vec![up(2, Suit::Spades, 8)];
        let before = game.table.clone();
        let mut cues = Cues::new();

        game.handle_input(&InputEvent::MouseDown(card_center(1, 0)), &mut cues);
        game.handle_input(&InputEvent::MouseUp(card_center(0, 0)), &mut cues);
        assert_eq!(game.table, before);
        assert_eq!(cues.iter().copied().collect::<Vec<_>>(), vec![Cue::Error]);

        // Drop with no drag in progress is ignored
        game.handle_input(&InputEvent::MouseUp(card_center(0, 0)), &mut cues);
        assert_eq!(cues.len(), 1);
    }

    #[test]
    fn test_double_click_sends_to_foundation() {
        let mut game = empty_game();
        game.table.waste = vec![up(0, Suit::Hearts, ACE)];
        let at = waste_slot().center();
        let mut cues = Cues::new();

        game.handle_input(&InputEvent::MouseDown(at), &mut cues);
        game.handle_input(&InputEvent::MouseUp(at), &mut cues);
        assert_eq!(game.table().waste.len(), 1);

        game.update(0.1, &mut cues);
        game.handle_input(&InputEvent::MouseDown(at), &mut cues);
        assert!(game.table().waste.is_empty());
        assert_eq!(game.table().foundation(Suit::Hearts).len(), 1);
        assert!(!game.is_dragging());
    }

    #[test]
    fn test_slow_second_click_is_not_double() {
        let mut game = empty_game();
        game.table.waste = vec![up(0, Suit::Hearts, ACE)];
        let at = waste_slot().center();
        let mut cues = Cues::new();
        game.handle_input(&InputEvent::MouseDown(at), &mut cues);
        game.handle_input(&InputEvent::MouseUp(at), &mut cues);
        for _ in 0..10 {
            game.update(0.033, &mut cues);
        }
        game.handle_input(&InputEvent::MouseDown(at), &mut cues);
        assert_eq!(game.table().waste.len(), 1);
    }

    #[test]
    fn test_stock_click_draws_and_recycles() {
        let mut game = empty_game();
        game.table.stock = vec![Card::new(0, Suit::Clubs, 5)];
        let at = stock_slot().center();
        let mut cues = Cues::new();
        game.handle_input(&InputEvent::MouseDown(at), &mut cues);
        assert_eq!(game.table().waste.len(), 1);
        game.update(1.0, &mut cues);
        game.handle_input(&InputEvent::MouseDown(at), &mut cues);
        assert_eq!(game.table().stock.len(), 1);
        assert_eq!(cues.iter().copied().collect::<Vec<_>>(), vec![Cue::Draw, Cue::Recycle]);
    }

    #[test]
    fn test_win_on_last_card() {
        let mut game = empty_game();
        for suit in Suit::ALL {
            let top = if suit == Suit::Diamonds { KING - 1 } else { KING };
            game.table.foundations[suit.index()] = (ACE..=top).map(|r| up(0, suit, r)).collect();
        }
        game.table.waste = vec![up(51, Suit::Diamonds, KING)];
        let mut cues = Cues::new();
        assert!(game.try_move_to_foundation(Origin::Waste, Suit::Diamonds, &mut cues));
        assert!(game.is_won());
        assert_eq!(cues.iter().last(), Some(&Cue::Win));

        let mut canvas = Canvas::new(WIDTH, HEIGHT);
        game.render(&mut canvas);
        assert!(canvas.texts().any(|t| t == WIN_MESSAGE));

        game.handle_input(&InputEvent::KeyDown(Key::Char('R')), &mut cues);
        assert!(!game.is_won());
        assert_eq!(game.table().card_count(), 52);
    }

    #[test]
    fn test_win_tones() {
        let mut tones = Vec::new();
        Solitaire::encode_cue(&Cue::Win, &mut tones);
        assert_eq!(tones.len(), 4);
        assert!((tones[3].delay - 0.21).abs() < 1e-12);
    }

    fn arb_event() -> impl Strategy<Value = InputEvent> {
        let point = (0.0f64..1200.0, 0.0f64..800.0).prop_map(|(x, y)| Vec2::new(x, y));
        prop_oneof![
            4 => point.clone().prop_map(InputEvent::MouseDown),
            3 => point.clone().prop_map(InputEvent::MouseMove),
            4 => point.prop_map(InputEvent::MouseUp),
            1 => Just(InputEvent::KeyDown(Key::Char('r'))),
        ]
    }

    proptest! {
        #[test]
        fn cards_are_conserved(seed in any::<u64>(), events in prop::collection::vec(arb_event(), 1..200)) {
            let mut game = Solitaire::with_seed(seed);
            let mut cues = Cues::new();
            for event in &events {
                game.handle_input(event, &mut cues);
                game.update(0.016, &mut cues);
                prop_assert_eq!(game.table().card_count(), 52);
            }
            let ids: HashSet<_> = game.table().cards().map(|c| c.id).collect();
            prop_assert_eq!(ids.len(), 52);
        }

        #[test]
        fn direct_moves_conserve_cards(
            seed in any::<u64>(),
            moves in prop::collection::vec((0usize..8, 0usize..20, 0usize..7, any::<bool>()), 1..100),
        ) {
            let mut game = Solitaire::with_seed(seed);
            let mut cues = Cues::new();
            for (pile, index, dest, to_foundation) in moves {
                let from = if pile == 7 { Origin::Waste } else { Origin::Tableau { pile, index } };
                if to_foundation {
                    game.try_move_to_foundation(from, Suit::ALL[dest % 4], &mut cues);
                } else {
                    game.try_move_to_tableau(from, dest, &mut cues);
                }
                if index % 5 == 0 {
                    game.table.draw_from_stock();
                }
            }
            prop_assert_eq!(game.table().card_count(), 52);
        }
    }
}

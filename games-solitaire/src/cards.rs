//! Playing cards and stacking rules

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
}

impl Suit {
    /// Foundation order, left to right
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Clubs, Suit::Diamonds];

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "\u{2660}",
            Suit::Hearts => "\u{2665}",
            Suit::Clubs => "\u{2663}",
            Suit::Diamonds => "\u{2666}",
        }
    }

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }

    pub fn index(self) -> usize {
        match self {
            Suit::Spades => 0,
            Suit::Hearts => 1,
            Suit::Clubs => 2,
            Suit::Diamonds => 3,
        }
    }
}

pub const ACE: u8 = 1;
pub const KING: u8 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub id: u8,
    pub suit: Suit,
    pub rank: u8,
    pub face_up: bool,
}

impl Card {
    pub fn new(id: u8, suit: Suit, rank: u8) -> Self {
        Self {
            id,
            suit,
            rank,
            face_up: false,
        }
    }

    pub fn is_red(&self) -> bool {
        self.suit.is_red()
    }

    pub fn label(&self) -> String {
        match self.rank {
            ACE => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            KING => "K".to_string(),
            n => n.to_string(),
        }
    }

    /// Tableau rule: one lower and the other colour
    pub fn stacks_on(&self, below: &Card) -> bool {
        below.face_up && below.is_red() != self.is_red() && below.rank == self.rank + 1
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.label(), self.suit.symbol())
    }
}

/// Ace to king in every suit, ids 0..52
pub fn full_deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|suit| (ACE..=KING).map(move |rank| (*suit, rank)))
        .enumerate()
        .map(|(id, (suit, rank))| Card::new(id as u8, suit, rank))
        .collect()
}

/// Face up, descending by one, alternating colour
pub fn is_valid_run(cards: &[Card]) -> bool {
    cards.iter().all(|c| c.face_up) && cards.windows(2).all(|w| w[1].stacks_on(&w[0]))
}

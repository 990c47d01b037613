//! Klondike piles and legal moves

use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, is_valid_run, Card, Suit, ACE, KING};

pub const TABLEAU_PILES: usize = 7;

/// Where a moved card (or run) comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Waste,
    Tableau { pile: usize, index: usize },
}

/// Result of clicking the stock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDraw {
    Drew(Card),
    Recycled,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub stock: Vec<Card>,
    pub waste: Vec<Card>,
    /// Indexed by `Suit::index`
    pub foundations: [Vec<Card>; 4],
    pub tableau: [Vec<Card>; TABLEAU_PILES],
}

impl Table {
    /// Shuffle and deal 1..=7 cards per tableau pile, the rest to stock
    pub fn deal(rng: &mut ChaCha20Rng) -> Self {
        let mut deck = full_deck();
        deck.shuffle(rng);

        let mut table = Table::default();
        for (i, pile) in table.tableau.iter_mut().enumerate() {
            for _ in 0..=i {
                if let Some(card) = deck.pop() {
                    pile.push(card);
                }
            }
            if let Some(top) = pile.last_mut() {
                top.face_up = true;
            }
        }
        table.stock = deck;
        table
    }

    pub fn card_count(&self) -> usize {
        self.stock.len()
            + self.waste.len()
            + self.foundations.iter().map(Vec::len).sum::<usize>()
            + self.tableau.iter().map(Vec::len).sum::<usize>()
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.stock
            .iter()
            .chain(&self.waste)
            .chain(self.foundations.iter().flatten())
            .chain(self.tableau.iter().flatten())
    }

    pub fn foundation(&self, suit: Suit) -> &[Card] {
        &self.foundations[suit.index()]
    }

    pub fn is_won(&self) -> bool {
        self.foundations.iter().all(|f| f.len() == usize::from(KING))
    }

    /// Turn the next stock card onto the waste, or recycle the waste when
    /// the stock is empty
    pub fn draw_from_stock(&mut self) -> StockDraw {
        if let Some(mut card) = self.stock.pop() {
            card.face_up = true;
            self.waste.push(card);
            return StockDraw::Drew(card);
        }
        if self.waste.is_empty() {
            return StockDraw::Empty;
        }
        while let Some(mut card) = self.waste.pop() {
            card.face_up = false;
            self.stock.push(card);
        }
        StockDraw::Recycled
    }

    /// The cards a move from `from` would carry, if that origin is live
    pub fn moving(&self, from: Origin) -> Option<&[Card]> {
        match from {
            Origin::Waste => {
                let n = self.waste.len();
                (n > 0).then(|| &self.waste[n - 1..])
            }
            Origin::Tableau { pile, index } => {
                let cards = self.tableau.get(pile)?.get(index..)?;
                (!cards.is_empty() && is_valid_run(cards)).then_some(cards)
            }
        }
    }

    pub fn try_move_to_tableau(&mut self, from: Origin, dest: usize) -> bool {
        if dest >= TABLEAU_PILES || matches!(from, Origin::Tableau { pile, .. } if pile == dest) {
            return false;
        }
        let Some(cards) = self.moving(from) else {
            return false;
        };
        let lead = cards[0];
        let fits = match self.tableau[dest].last() {
            None => lead.rank == KING,
            Some(top) => lead.stacks_on(top),
        };
        if !fits {
            return false;
        }

        let moved = self.take(from);
        self.tableau[dest].extend(moved);
        true
    }

    pub fn try_move_to_foundation(&mut self, from: Origin, suit: Suit) -> bool {
        let Some(cards) = self.moving(from) else {
            return false;
        };
        let [card] = cards else {
            return false;
        };
        let pile = &self.foundations[suit.index()];
        let need = pile.last().map_or(ACE, |top| top.rank + 1);
        if card.suit != suit || card.rank != need {
            return false;
        }

        let moved = self.take(from);
        self.foundations[suit.index()].extend(moved);
        true
    }

    /// Flip the newly exposed top card of a tableau pile. Returns true when
    /// a card turned over.
    pub fn flip_exposed(&mut self, pile: usize) -> bool {
        match self.tableau.get_mut(pile).and_then(|p| p.last_mut()) {
            Some(top) if !top.face_up => {
                top.face_up = true;
                true
            }
            _ => false,
        }
    }

    fn take(&mut self, from: Origin) -> Vec<Card> {
        match from {
            Origin::Waste => self.waste.pop().into_iter().collect(),
            Origin::Tableau { pile, index } => self.tableau[pile].split_off(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn up(id: u8, suit: Suit, rank: u8) -> Card {
        Card {
            face_up: true,
            ..Card::new(id, suit, rank)
        }
    }

    #[test]
    fn test_deal() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let table = Table::deal(&mut rng);
        assert_eq!(table.card_count(), 52);
        assert_eq!(table.stock.len(), 24);
        for (i, pile) in table.tableau.iter().enumerate() {
            assert_eq!(pile.len(), i + 1);
            assert!(pile.last().map_or(false, |c| c.face_up));
            assert!(pile[..i].iter().all(|c| !c.face_up));
        }
        let ids: HashSet<_> = table.cards().map(|c| c.id).collect();
        assert_eq!(ids.len(), 52);
    }

    #[test]
    fn test_same_colour_rejected() {
        let mut table = Table::default();
        table.tableau[0] = vec![up(0, Suit::Spades, 8)];
        table.tableau[1] = vec![up(1, Suit::Clubs, 7)];
        table.waste = vec![up(2, Suit::Spades, 7)];
        let before = table.clone();

        assert!(!table.try_move_to_tableau(Origin::Tableau { pile: 1, index: 0 }, 0));
        assert!(!table.try_move_to_tableau(Origin::Waste, 0));
        assert_eq!(table, before);
    }

    #[test]
    fn test_run_moves_onto_other_colour() {
        let mut table = Table::default();
        table.tableau[0] = vec![up(0, Suit::Hearts, 9)];
        table.tableau[1] = vec![
            Card::new(9, Suit::Spades, 2),
            up(1, Suit::Clubs, 8),
            up(2, Suit::Diamonds, 7),
        ];
        assert!(table.try_move_to_tableau(Origin::Tableau { pile: 1, index: 1 }, 0));
        assert_eq!(table.tableau[0].len(), 3);
        assert_eq!(table.tableau[1].len(), 1);
        assert!(table.flip_exposed(1));
        assert!(!table.flip_exposed(1));
    }

    #[test]
    fn test_only_kings_on_empty() {
        let mut table = Table::default();
        table.waste = vec![up(0, Suit::Hearts, 12)];
        assert!(!table.try_move_to_tableau(Origin::Waste, 3));
        table.waste = vec![up(0, Suit::Hearts, KING)];
        assert!(table.try_move_to_tableau(Origin::Waste, 3));
        assert!(table.waste.is_empty());
    }

    #[test]
    fn test_foundation_order() {
        let mut table = Table::default();
        table.tableau[0] = vec![up(0, Suit::Hearts, 2), up(1, Suit::Spades, ACE)];
        assert!(!table.try_move_to_foundation(Origin::Tableau { pile: 0, index: 1 }, Suit::Hearts));
        assert!(table.try_move_to_foundation(Origin::Tableau { pile: 0, index: 1 }, Suit::Spades));
        // Two without the ace is refused
        assert!(!table.try_move_to_foundation(Origin::Tableau { pile: 0, index: 0 }, Suit::Hearts));
        assert_eq!(table.foundation(Suit::Spades).len(), 1);
    }

    #[test]
    fn test_foundation_takes_single_top_only() {
        let mut table = Table::default();
        table.tableau[0] = vec![up(0, Suit::Spades, 2), up(1, Suit::Hearts, ACE)];
        assert!(!table.try_move_to_foundation(Origin::Tableau { pile: 0, index: 0 }, Suit::Spades));
    }

    #[test]
    fn test_stale_origin_is_noop() {
        let mut table = Table::default();
        table.tableau[2] = vec![up(0, Suit::Hearts, KING)];
        let before = table.clone();
        assert!(!table.try_move_to_tableau(Origin::Tableau { pile: 2, index: 4 }, 0));
        assert!(!table.try_move_to_tableau(Origin::Tableau { pile: 9, index: 0 }, 0));
        assert!(!table.try_move_to_tableau(Origin::Waste, 0));
        assert!(!table.try_move_to_tableau(Origin::Tableau { pile: 2, index: 0 }, 2));
        assert_eq!(table, before);
    }

    #[test]
    fn test_stock_cycle() {
        let mut table = Table::default();
        table.stock = vec![Card::new(0, Suit::Clubs, 3), Card::new(1, Suit::Clubs, 4)];
        assert!(matches!(table.draw_from_stock(), StockDraw::Drew(c) if c.rank == 4 && c.face_up));
        assert!(matches!(table.draw_from_stock(), StockDraw::Drew(_)));
        assert_eq!(table.draw_from_stock(), StockDraw::Recycled);
        assert_eq!(table.stock.iter().map(|c| c.rank).collect::<Vec<_>>(), vec![3, 4]);
        assert!(table.stock.iter().all(|c| !c.face_up));
        table.stock.clear();
        assert_eq!(table.draw_from_stock(), StockDraw::Empty);
    }
}

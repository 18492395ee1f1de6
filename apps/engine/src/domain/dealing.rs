//! The 48-card hwatu deck and deterministic shuffling.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::cards_types::{Card, CardIdAllocator, Category, Month};

pub const DECK_SIZE: usize = 48;
pub const HAND_SIZE: usize = 10;
pub const TABLE_SIZE: usize = 8;

use Category::{Animal, Bright, DoubleJunk, Junk, Ribbon};

/// Fixed month -> category composition, indexed by `month - 1`.
/// Position within the row is the card's `image_index`.
const COMPOSITION: [[Category; 4]; 12] = [
    [Bright, Ribbon, Junk, Junk],
    [Animal, Ribbon, Junk, Junk],
    [Bright, Ribbon, Junk, Junk],
    [Animal, Ribbon, Junk, Junk],
    [Animal, Ribbon, Junk, Junk],
    [Animal, Ribbon, Junk, Junk],
    [Animal, Ribbon, Junk, Junk],
    [Bright, Animal, Junk, Junk],
    [Animal, Ribbon, Junk, Junk],
    [Animal, Ribbon, Junk, Junk],
    [Bright, DoubleJunk, Junk, Junk],
    [Bright, Animal, Ribbon, DoubleJunk],
];

/// Build the standard deck in month order with fresh identities.
pub fn standard_deck(ids: &mut CardIdAllocator) -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for (row, categories) in COMPOSITION.iter().enumerate() {
        let month = (row + 1) as Month;
        for (image_index, category) in categories.iter().enumerate() {
            deck.push(Card::new(ids.next_id(), month, *category, image_index as u8));
        }
    }
    deck
}

/// Draw pile. The top of the deck is the end of the vector.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Shuffle `cards` with a ChaCha8 stream seeded from `seed`.
    pub fn shuffled(mut cards: Vec<Card>, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        cards.shuffle(&mut rng);
        Self { cards }
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Up to `n` cards from the top; fewer once the deck runs out.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        let keep = self.cards.len().saturating_sub(n);
        let mut drawn = self.cards.split_off(keep);
        drawn.reverse();
        drawn
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Bottom-to-top order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub(crate) fn take_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }
}

/// Result of dealing a fresh round.
#[derive(Debug, Clone)]
pub struct Deal {
    pub hands: [Vec<Card>; 2],
    pub table: Vec<Card>,
    pub deck: Deck,
}

/// Shuffle a fresh deck and deal 10/10 hands plus 8 table cards.
///
/// Hands are sorted by month for display.
pub fn deal_round(ids: &mut CardIdAllocator, seed: u64) -> Deal {
    let mut deck = Deck::shuffled(standard_deck(ids), seed);
    let mut first = deck.draw_n(HAND_SIZE);
    let mut second = deck.draw_n(HAND_SIZE);
    let table = deck.draw_n(TABLE_SIZE);
    first.sort_by_key(Card::display_key);
    second.sort_by_key(Card::display_key);
    Deal {
        hands: [first, second],
        table,
        deck,
    }
}

use std::collections::BTreeSet;

use crate::domain::cards_types::{Card, CardId, Month};

/// Seat index, `0` or `1`.
pub type Seat = usize;

pub fn opponent_of(seat: Seat) -> Seat {
    1 - seat
}

/// Per-round player record, owned by the game manager.
#[derive(Debug, Clone)]
pub struct Player {
    pub seat: Seat,
    pub name: String,
    pub hand: Vec<Card>,
    pub captured: Vec<Card>,
    pub score: u32,
    pub money: i64,
    pub go_count: u32,
    pub last_go_score: u32,
    pub shake_count: u32,
    pub shaken_months: BTreeSet<Month>,
    /// Months whose shake prompt was answered this round, yes or no.
    pub shake_answered_months: BTreeSet<Month>,
    pub bomb_count: u32,
    pub sweep_count: u32,
    pub ttadak_count: u32,
    pub jjok_count: u32,
    pub seolsa_count: u32,
    pub ppeok_count: u32,
    pub is_pi_mungbak: bool,
    pub mungdda_count: u32,
    pub bomb_mungdda_count: u32,
    pub is_computer: bool,
    pub dummy_card_count: u32,
}

impl Player {
    pub fn new(seat: Seat, name: impl Into<String>, is_computer: bool, money: i64) -> Self {
        Self {
            seat,
            name: name.into(),
            hand: Vec::new(),
            captured: Vec::new(),
            score: 0,
            money,
            go_count: 0,
            last_go_score: 0,
            shake_count: 0,
            shaken_months: BTreeSet::new(),
            shake_answered_months: BTreeSet::new(),
            bomb_count: 0,
            sweep_count: 0,
            ttadak_count: 0,
            jjok_count: 0,
            seolsa_count: 0,
            ppeok_count: 0,
            is_pi_mungbak: false,
            mungdda_count: 0,
            bomb_mungdda_count: 0,
            is_computer,
            dummy_card_count: 0,
        }
    }

    /// Fresh round state; name, money and seat control survive.
    pub fn reset_for_round(&mut self, hand: Vec<Card>) {
        *self = Self {
            hand,
            ..Self::new(self.seat, std::mem::take(&mut self.name), self.is_computer, self.money)
        };
    }

    pub fn hand_index(&self, id: CardId) -> Option<usize> {
        self.hand.iter().position(|c| c.id == id)
    }

    pub fn hand_month_count(&self, month: Month) -> usize {
        self.hand.iter().filter(|c| c.is_month(month)).count()
    }

    pub fn take_from_hand(&mut self, id: CardId) -> Option<Card> {
        let idx = self.hand_index(id)?;
        let card = self.hand.remove(idx);
        if card.is_dummy() {
            self.dummy_card_count = self.dummy_card_count.saturating_sub(1);
        }
        Some(card)
    }

    /// Remove every hand card of `month`.
    pub fn take_month_from_hand(&mut self, month: Month) -> Vec<Card> {
        let (taken, kept) = std::mem::take(&mut self.hand)
            .into_iter()
            .partition(|c| c.is_month(month));
        self.hand = kept;
        taken
    }

    pub fn take_captured(&mut self, id: CardId) -> Option<Card> {
        let idx = self.captured.iter().position(|c| c.id == id)?;
        Some(self.captured.remove(idx))
    }

    pub fn give_dummies(&mut self, dummies: Vec<Card>) {
        self.dummy_card_count += dummies.len() as u32;
        self.hand.extend(dummies);
    }

    /// A month with all four real cards in hand.
    pub fn chongtong_month(&self) -> Option<Month> {
        (1..=12).find(|&m| self.hand_month_count(m) == 4)
    }
}

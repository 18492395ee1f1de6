//! Shared table cards and the capture rule applied to a played or drawn card.

use crate::domain::cards_types::{Card, CardId, Month};

#[derive(Debug, Clone, Default)]
pub struct Table {
    cards: Vec<Card>,
}

impl Table {
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.cards.iter().any(|c| c.id == id)
    }

    pub fn matching(&self, month: Month) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.is_month(month)).collect()
    }

    pub fn month_count(&self, month: Month) -> usize {
        self.cards.iter().filter(|c| c.is_month(month)).count()
    }

    pub fn place(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn take(&mut self, id: CardId) -> Option<Card> {
        let idx = self.cards.iter().position(|c| c.id == id)?;
        Some(self.cards.remove(idx))
    }

    pub fn take_month(&mut self, month: Month) -> Vec<Card> {
        let (taken, kept) = std::mem::take(&mut self.cards)
            .into_iter()
            .partition(|c| c.is_month(month));
        self.cards = kept;
        taken
    }

    pub(crate) fn take_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }

    /// A month with all four cards on the table.
    pub fn four_of_a_kind(&self) -> Option<Month> {
        (1..=12).find(|&m| self.month_count(m) == 4)
    }

    /// Months holding exactly three cards.
    pub fn stacked_months(&self) -> Vec<Month> {
        (1..=12).filter(|&m| self.month_count(m) == 3).collect()
    }
}

/// What happened when a card met the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// No match; the card now lies on the table.
    Placed,
    /// The card plus every table card it took, card first.
    Captured(Vec<Card>),
    /// Two table cards match; the card waits on the table until one is chosen.
    NeedsChoice(Vec<CardId>),
}

/// Apply the capture rule for `card` against the table.
///
/// 0 matches places the card, 1 takes the pair, 3 take the whole month and
/// 2 are ambiguous unless `chosen` names one of them.
pub fn perform_table_capture(table: &mut Table, card: Card, chosen: Option<CardId>) -> CaptureOutcome {
    let Some(month) = card.month else {
        return CaptureOutcome::Placed;
    };
    let matches: Vec<CardId> = table.matching(month).iter().map(|c| c.id).collect();
    match matches.len() {
        0 => {
            table.place(card);
            CaptureOutcome::Placed
        }
        2 => match chosen.filter(|id| matches.contains(id)) {
            Some(id) => {
                let mut taken = vec![card];
                taken.extend(table.take(id));
                CaptureOutcome::Captured(taken)
            }
            None => {
                table.place(card);
                CaptureOutcome::NeedsChoice(matches)
            }
        },
        _ => {
            let mut taken = vec![card];
            taken.extend(table.take_month(month));
            CaptureOutcome::Captured(taken)
        }
    }
}

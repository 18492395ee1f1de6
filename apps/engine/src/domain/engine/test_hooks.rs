//! State injection for scripted scenarios.
//!
//! Compiled only for tests or with the `test-hooks` feature. Nothing in the
//! production turn flow calls into this module.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::warn;

use super::{GameManager, StackOrigin};
use crate::domain::cards_types::{Card, Category, FlexRole, Month};
use crate::domain::dealing::Deck;
use crate::domain::player::{opponent_of, Player, Seat};
use crate::domain::state::{ChongtongTiming, EndReason, GameState, GameStateKind};
use crate::domain::table::Table;
use crate::errors::domain::{DomainError, ValidationKind};

/// A card to fabricate, by month and category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSpec {
    #[serde(default)]
    pub month: Option<Month>,
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(default)]
    pub image_index: Option<u8>,
    #[serde(default)]
    pub selected_role: Option<FlexRole>,
}

impl CardSpec {
    pub fn new(month: Month, category: Category) -> Self {
        Self {
            month: Some(month),
            category,
            image_index: None,
            selected_role: None,
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        match (self.category, self.month) {
            (Category::Dummy, _) => Ok(()),
            (_, Some(m)) if (1..=12).contains(&m) => Ok(()),
            _ => Err(DomainError::validation(
                ValidationKind::Other("bad card spec".into()),
                format!("{self:?} needs a month in 1..=12"),
            )),
        }
    }
}

/// Per-seat overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPatch {
    pub name: Option<String>,
    pub is_computer: Option<bool>,
    #[serde(alias = "mock_hand")]
    pub hand: Option<Vec<CardSpec>>,
    #[serde(alias = "captured_cards")]
    pub captured_cards: Option<Vec<CardSpec>>,
    pub score: Option<u32>,
    pub money: Option<i64>,
    pub go_count: Option<u32>,
    pub last_go_score: Option<u32>,
    pub shake_count: Option<u32>,
    pub bomb_count: Option<u32>,
    pub is_pi_mungbak: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MockScenario {
    /// Settle the round now, higher score wins.
    GameOver,
}

/// Payload of `set_condition`. Seat 0 is the human seat for the
/// unqualified `mock_*` keys.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Condition {
    #[serde(rename = "currentTurnIndex")]
    pub current_turn_index: Option<Seat>,
    #[serde(rename = "mock_hand")]
    pub hand: Option<Vec<CardSpec>>,
    #[serde(rename = "mock_table", alias = "tableCards")]
    pub table: Option<Vec<CardSpec>>,
    /// Listed bottom to top: the last entry is drawn first.
    #[serde(rename = "mock_deck", alias = "deckCards")]
    pub deck: Option<Vec<CardSpec>>,
    #[serde(rename = "mock_captured_cards")]
    pub captured: Option<Vec<CardSpec>>,
    #[serde(rename = "mock_opponent_captured_cards")]
    pub opponent_captured: Option<Vec<CardSpec>>,
    #[serde(rename = "mock_gameState", alias = "gameState")]
    pub game_state: Option<GameStateKind>,
    #[serde(rename = "mock_scenario")]
    pub scenario: Option<MockScenario>,
    #[serde(rename = "player0_data")]
    pub player0: Option<PlayerPatch>,
    #[serde(rename = "player1_data")]
    pub player1: Option<PlayerPatch>,
    #[serde(rename = "monthOwners")]
    pub month_owners: Option<BTreeMap<Month, Seat>>,
}

impl Condition {
    fn specs(&self) -> impl Iterator<Item = &CardSpec> {
        let patches = [&self.player0, &self.player1];
        [
            &self.hand,
            &self.table,
            &self.deck,
            &self.captured,
            &self.opponent_captured,
        ]
        .into_iter()
        .chain(patches.into_iter().flat_map(|p| {
            p.iter()
                .flat_map(|p| [&p.hand, &p.captured_cards])
                .collect::<Vec<_>>()
        }))
        .flatten()
        .flatten()
    }

    fn validate(&self) -> Result<(), DomainError> {
        for spec in self.specs() {
            spec.validate()?;
        }
        if self.current_turn_index.is_some_and(|i| i > 1) {
            return Err(DomainError::validation(
                ValidationKind::Other("bad seat".into()),
                "currentTurnIndex must be 0 or 1",
            ));
        }
        if self.month_owners.as_ref().is_some_and(|m| m.values().any(|s| *s > 1)) {
            return Err(DomainError::validation(
                ValidationKind::Other("bad seat".into()),
                "monthOwners seats must be 0 or 1",
            ));
        }
        match self.game_state {
            None
            | Some(GameStateKind::Ready)
            | Some(GameStateKind::Playing)
            | Some(GameStateKind::AskingGoStop)
            | Some(GameStateKind::Ended) => Ok(()),
            Some(other) => Err(DomainError::validation(
                ValidationKind::Other("bad state".into()),
                format!("{other:?} carries a pending decision and cannot be injected"),
            )),
        }
    }
}

impl GameManager {
    /// Fabricate a card with a fresh identity.
    pub fn mock_card(&mut self, spec: CardSpec) -> Card {
        let id = self.ids.next_id();
        let mut card = match spec.month {
            Some(month) if spec.category != Category::Dummy => {
                Card::new(id, month, spec.category, spec.image_index.unwrap_or(0))
            }
            _ => Card::dummy(id),
        };
        card.selected_role = spec.selected_role;
        card
    }

    pub fn mock_cards(&mut self, specs: &[CardSpec]) -> Vec<Card> {
        specs.iter().map(|s| self.mock_card(*s)).collect()
    }

    pub fn player_mut(&mut self, seat: Seat) -> &mut Player {
        &mut self.players[seat]
    }

    pub fn set_hand(&mut self, seat: Seat, specs: &[CardSpec]) {
        let hand = self.mock_cards(specs);
        let player = &mut self.players[seat];
        player.dummy_card_count = hand.iter().filter(|c| c.is_dummy()).count() as u32;
        player.hand = hand;
    }

    pub fn set_captured(&mut self, seat: Seat, specs: &[CardSpec]) {
        let captured = self.mock_cards(specs);
        self.players[seat].captured = captured;
        self.recompute_scores();
    }

    /// Replace the table. Three-card months count as dealt stacks.
    pub fn set_table(&mut self, specs: &[CardSpec]) {
        let cards = self.mock_cards(specs);
        self.table = Table::from_cards(cards);
        self.month_owners.clear();
        self.stacks = self
            .table
            .stacked_months()
            .into_iter()
            .map(|m| (m, StackOrigin::Dealt))
            .collect();
    }

    /// Replace the deck; the last spec is the top card.
    pub fn set_deck(&mut self, specs: &[CardSpec]) {
        let cards = self.mock_cards(specs);
        self.deck = Deck::from_cards(cards);
    }

    pub fn set_current(&mut self, seat: Seat) {
        self.current = seat;
    }

    pub fn set_month_owner(&mut self, month: Month, seat: Seat) {
        self.month_owners.insert(month, seat);
    }

    pub fn set_stack_origin(&mut self, month: Month, origin: StackOrigin) {
        self.stacks.insert(month, origin);
    }

    /// Force a state that carries no pending payload.
    pub fn set_state(&mut self, kind: GameStateKind) -> Result<(), DomainError> {
        self.turn = None;
        self.state = match kind {
            GameStateKind::Ready => GameState::Ready,
            GameStateKind::Playing => GameState::Playing,
            GameStateKind::AskingGoStop => GameState::AskingGoStop,
            GameStateKind::Ended => GameState::Ended,
            other => {
                return Err(DomainError::validation(
                    ValidationKind::Other("bad state".into()),
                    format!("{other:?} cannot be injected"),
                ))
            }
        };
        Ok(())
    }

    /// Settle the round immediately; the higher score wins, seat 0 on ties.
    pub fn mock_game_over(&mut self) -> Result<(), DomainError> {
        self.recompute_scores();
        let winner = if self.players[1].score > self.players[0].score { 1 } else { 0 };
        self.execute_stop(winner, EndReason::Stop)
    }

    pub fn force_chongtong_check(&mut self, timing: ChongtongTiming) -> Result<bool, DomainError> {
        self.check_chongtong(timing)
    }

    /// Apply a whole `set_condition` payload. Validated before anything
    /// changes.
    pub fn apply_condition(&mut self, cond: &Condition) -> Result<(), DomainError> {
        cond.validate()?;
        warn!("injecting test state");

        if let Some(seat) = cond.current_turn_index {
            self.current = seat;
        }
        if let Some(specs) = &cond.hand {
            self.set_hand(0, specs);
        }
        if let Some(specs) = &cond.table {
            self.set_table(specs);
        }
        if let Some(specs) = &cond.deck {
            self.set_deck(specs);
        }
        if let Some(specs) = &cond.captured {
            self.set_captured(0, specs);
        }
        if let Some(specs) = &cond.opponent_captured {
            self.set_captured(opponent_of(0), specs);
        }
        for (seat, patch) in [(0, &cond.player0), (1, &cond.player1)] {
            if let Some(patch) = patch {
                self.apply_patch(seat, patch);
            }
        }
        if let Some(owners) = &cond.month_owners {
            self.month_owners = owners.clone();
        }
        self.recompute_scores();
        for (seat, patch) in [(0, &cond.player0), (1, &cond.player1)] {
            if let Some(score) = patch.as_ref().and_then(|p| p.score) {
                self.players[seat].score = score;
            }
        }
        if let Some(kind) = cond.game_state {
            self.set_state(kind)?;
        }
        if cond.scenario == Some(MockScenario::GameOver) {
            self.mock_game_over()?;
        }
        Ok(())
    }

    fn apply_patch(&mut self, seat: Seat, patch: &PlayerPatch) {
        if let Some(specs) = &patch.hand {
            self.set_hand(seat, specs);
        }
        if let Some(specs) = &patch.captured_cards {
            self.set_captured(seat, specs);
        }
        let p = &mut self.players[seat];
        if let Some(name) = &patch.name {
            p.name = name.clone();
        }
        if let Some(v) = patch.is_computer {
            p.is_computer = v;
        }
        if let Some(v) = patch.money {
            p.money = v;
        }
        if let Some(v) = patch.go_count {
            p.go_count = v;
        }
        if let Some(v) = patch.last_go_score {
            p.last_go_score = v;
        }
        if let Some(v) = patch.shake_count {
            p.shake_count = v;
        }
        // Each bomb also counts as a shake, as in live play.
        if let Some(v) = patch.bomb_count {
            p.bomb_count = v;
            p.shake_count += v;
        }
        if let Some(v) = patch.is_pi_mungbak {
            p.is_pi_mungbak = v;
        }
    }
}

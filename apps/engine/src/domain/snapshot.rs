//! Public snapshot of engine state for adapters and tests.
//!
//! A pure projection: building one never mutates the engine.

use serde::{Deserialize, Serialize};

use crate::domain::cards_types::{Card, CardId, Month};
use crate::domain::engine::GameManager;
use crate::domain::penalty::PenaltyResult;
use crate::domain::player::{Player, Seat};
use crate::domain::rules::RuleConfig;
use crate::domain::scoring::{score_detail, ScoreItem};
use crate::domain::state::{ChongtongTiming, EndReason, GameState, GameStateKind, TurnEvent};

/// Everything known about one seat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub seat: Seat,
    pub name: String,
    pub is_computer: bool,
    pub hand: Vec<Card>,
    pub captured_cards: Vec<Card>,
    pub score: u32,
    pub score_items: Vec<ScoreItem>,
    pub money: i64,
    pub go_count: u32,
    pub last_go_score: u32,
    pub shake_count: u32,
    pub shaken_months: Vec<Month>,
    pub bomb_count: u32,
    pub sweep_count: u32,
    pub ttadak_count: u32,
    pub jjok_count: u32,
    pub seolsa_count: u32,
    pub ppeok_count: u32,
    pub is_pi_mungbak: bool,
    pub mungdda_count: u32,
    pub bomb_mungdda_count: u32,
    pub dummy_card_count: u32,
}

impl PlayerSnapshot {
    fn from_player(p: &Player, rules: &RuleConfig) -> Self {
        Self {
            seat: p.seat,
            name: p.name.clone(),
            is_computer: p.is_computer,
            hand: p.hand.clone(),
            captured_cards: p.captured.clone(),
            score: p.score,
            score_items: score_detail(&p.captured, rules),
            money: p.money,
            go_count: p.go_count,
            last_go_score: p.last_go_score,
            shake_count: p.shake_count,
            shaken_months: p.shaken_months.iter().copied().collect(),
            bomb_count: p.bomb_count,
            sweep_count: p.sweep_count,
            ttadak_count: p.ttadak_count,
            jjok_count: p.jjok_count,
            seolsa_count: p.seolsa_count,
            ppeok_count: p.ppeok_count,
            is_pi_mungbak: p.is_pi_mungbak,
            mungdda_count: p.mungdda_count,
            bomb_mungdda_count: p.bomb_mungdda_count,
            dummy_card_count: p.dummy_card_count,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub game_state: GameStateKind,
    pub round_no: u32,
    pub current_turn_index: Seat,
    pub deck_count: usize,
    /// Bottom to top.
    pub deck_cards: Vec<Card>,
    pub table_cards: Vec<Card>,
    pub out_of_play_cards: Vec<Card>,
    pub players: Vec<PlayerSnapshot>,
    pub pending_shake_months: Vec<Month>,
    pub pending_capture_options: Vec<Card>,
    pub pending_chrysanthemum_card: Option<Card>,
    pub last_turn_events: Vec<TurnEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_end_reason: Option<EndReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_index: Option<Seat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub money_transfer: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chongtong_month: Option<Month>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chongtong_timing: Option<ChongtongTiming>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty_result: Option<PenaltyResult>,
}

/// Produce a snapshot of the current game state.
pub fn snapshot(gm: &GameManager) -> GameSnapshot {
    let rules = gm.rules();
    let current = gm.current_seat();

    let pending_shake_months = match gm.state() {
        GameState::AskingShake { month, .. } => vec![*month],
        _ => Vec::new(),
    };
    let pending_capture_options = match gm.state() {
        GameState::ChoosingCapture { options, .. } => gm
            .table()
            .cards()
            .iter()
            .filter(|c| options.contains(&c.id))
            .cloned()
            .collect(),
        _ => Vec::new(),
    };
    let pending_chrysanthemum_card = match gm.state() {
        GameState::ChoosingChrysanthemumRole { card } => find_captured(gm.player(current), *card),
        _ => None,
    };

    let outcome = gm.outcome();
    GameSnapshot {
        game_state: gm.state_kind(),
        round_no: gm.round_no(),
        current_turn_index: current,
        deck_count: gm.deck().len(),
        deck_cards: gm.deck().cards().to_vec(),
        table_cards: gm.table().cards().to_vec(),
        out_of_play_cards: gm.out_of_play().to_vec(),
        players: gm
            .players()
            .iter()
            .map(|p| PlayerSnapshot::from_player(p, rules))
            .collect(),
        pending_shake_months,
        pending_capture_options,
        pending_chrysanthemum_card,
        last_turn_events: gm.last_events().to_vec(),
        game_end_reason: outcome.map(|o| o.reason),
        winner_index: outcome.and_then(|o| o.winner),
        final_score: outcome.map(|o| o.final_score),
        money_transfer: outcome.map(|o| o.money_transfer),
        chongtong_month: outcome.and_then(|o| o.chongtong).map(|c| c.month),
        chongtong_timing: outcome.and_then(|o| o.chongtong).map(|c| c.timing),
        penalty_result: outcome.and_then(|o| o.penalty.clone()),
    }
}

fn find_captured(p: &Player, id: CardId) -> Option<Card> {
    p.captured.iter().find(|c| c.id == id).cloned()
}

//! Game state machine values and round outcome records.

use serde::{Deserialize, Serialize};

use crate::domain::cards_types::{CardId, Month};
use crate::domain::penalty::PenaltyResult;
use crate::domain::player::Seat;
use crate::errors::domain::{DomainError, ValidationKind};

/// Which capture step is waiting on a two-way choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaptureStage {
    Play,
    Draw,
}

/// Engine state. Suspension states carry the decision they wait for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameState {
    Ready,
    Playing,
    AskingShake { card: CardId, month: Month },
    ChoosingCapture {
        stage: CaptureStage,
        card: CardId,
        options: Vec<CardId>,
    },
    ChoosingChrysanthemumRole { card: CardId },
    AskingGoStop,
    Ended,
}

/// Wire name of a [`GameState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStateKind {
    Ready,
    Playing,
    AskingShake,
    ChoosingCapture,
    ChoosingChrysanthemumRole,
    AskingGoStop,
    Ended,
}

impl GameState {
    pub fn kind(&self) -> GameStateKind {
        match self {
            GameState::Ready => GameStateKind::Ready,
            GameState::Playing => GameStateKind::Playing,
            GameState::AskingShake { .. } => GameStateKind::AskingShake,
            GameState::ChoosingCapture { .. } => GameStateKind::ChoosingCapture,
            GameState::ChoosingChrysanthemumRole { .. } => GameStateKind::ChoosingChrysanthemumRole,
            GameState::AskingGoStop => GameStateKind::AskingGoStop,
            GameState::Ended => GameStateKind::Ended,
        }
    }
}

/// Guard: fail with `PhaseMismatch` unless `state` has the expected kind.
pub fn require_state(state: &GameState, expected: GameStateKind) -> Result<(), DomainError> {
    if state.kind() == expected {
        Ok(())
    } else {
        Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("expected {expected:?}, game is {:?}", state.kind()),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EndReason {
    Stop,
    Nagari,
    Chongtong,
    MaxScore,
    MaxGo,
    InstantBak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChongtongTiming {
    Initial,
    Midgame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChongtongInfo {
    pub month: Month,
    pub timing: ChongtongTiming,
}

/// How a round ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub reason: EndReason,
    pub winner: Option<Seat>,
    pub final_score: u64,
    pub money_transfer: i64,
    pub penalty: Option<PenaltyResult>,
    pub chongtong: Option<ChongtongInfo>,
}

impl RoundOutcome {
    pub fn nagari() -> Self {
        Self {
            reason: EndReason::Nagari,
            winner: None,
            final_score: 0,
            money_transfer: 0,
            penalty: None,
            chongtong: None,
        }
    }
}

/// Notable things that happened during a turn, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum TurnEvent {
    Shake { month: Month },
    Bomb { month: Month },
    DummyPlayed,
    Ttadak,
    Jjok,
    Seolsa { month: Month },
    PpeokCreated { month: Month },
    PpeokEaten { month: Month },
    Sweep,
    Mungdda,
    BombMungdda,
    PiTransferred { from: Seat, to: Seat, count: u32 },
    Go { count: u32 },
}

//! Computer actor trait definition.

use thiserror::Error;

use crate::domain::cards_types::{Card, CardId, FlexRole, Month};
use crate::domain::rules::RuleConfig;

#[derive(Debug, Error)]
pub enum ActorError {
    /// The actor was asked to move with nothing to choose from.
    #[error("actor has no legal option: {0}")]
    NoOption(String),
    #[error("actor internal error: {0}")]
    Internal(String),
}

/// What a seat can see when deciding.
#[derive(Debug, Clone, Copy)]
pub struct ActorView<'a> {
    pub hand: &'a [Card],
    pub table: &'a [Card],
    pub captured: &'a [Card],
    pub rules: &'a RuleConfig,
}

/// Decisions a computer seat makes.
///
/// The engine suspends for these exactly as it does for a human and feeds
/// the answer back through the same response operations.
pub trait ComputerActor: Send + Sync {
    fn choose_play(&self, view: &ActorView<'_>) -> Result<CardId, ActorError>;

    /// Pick one of the two matching table cards.
    fn choose_capture(&self, view: &ActorView<'_>, options: &[&Card]) -> Result<CardId, ActorError>;

    fn choose_shake(&self, view: &ActorView<'_>, month: Month) -> Result<bool, ActorError>;

    fn choose_chrysanthemum_role(&self, view: &ActorView<'_>) -> Result<FlexRole, ActorError>;

    /// `true` for Go.
    fn choose_go(&self, view: &ActorView<'_>) -> Result<bool, ActorError>;
}

//! Domain layer: cards, rules, scoring and the turn engine.

pub mod cards_types;
pub mod dealing;
pub mod engine;
pub mod penalty;
pub mod player;
pub mod rules;
pub mod scoring;
pub mod seed_derivation;
pub mod snapshot;
pub mod state;
pub mod table;

#[cfg(test)]
mod tests_engine_endgame;
#[cfg(test)]
mod tests_engine_turns;
#[cfg(test)]
mod tests_props_invariants;
#[cfg(test)]
mod tests_snapshot;

// Re-exports for ergonomics
pub use cards_types::{Card, CardId, Category, FlexRole, Month};
pub use dealing::{deal_round, standard_deck, Deck};
pub use engine::{GameManager, TurnSummary};
pub use penalty::{calculate_penalties, PenaltyResult};
pub use player::{Player, Seat};
pub use rules::RuleConfig;
pub use scoring::{score_detail, total_score, ScoreItem};
pub use seed_derivation::derive_dealing_seed;
pub use snapshot::{snapshot, GameSnapshot, PlayerSnapshot};
pub use state::{EndReason, GameState, GameStateKind, TurnEvent};

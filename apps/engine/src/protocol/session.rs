//! Request dispatch for one game.

use tracing::{debug, error, warn};

use super::messages::{Action, CardRef, ProtocolError, Request, Response};
use crate::domain::cards_types::CardId;
use crate::domain::engine::GameManager;
use crate::domain::rules::RuleConfig;
use crate::domain::snapshot::snapshot;
use crate::domain::state::GameState;
use crate::errors::domain::{DomainError, ValidationKind};

/// Serialized when a response itself cannot be serialized.
const INTERNAL_ERROR_LINE: &str =
    r#"{"status":"error","code":"INTERNAL","message":"response serialization failed"}"#;

pub struct Session {
    game: GameManager,
}

impl Session {
    /// `seed` fixes every deal of the session; `None` seeds from entropy.
    pub fn new(rules: RuleConfig, seed: Option<u64>) -> Self {
        let game = match seed {
            Some(seed) => GameManager::with_seed(rules, seed),
            None => GameManager::new(rules),
        };
        Self { game }
    }

    pub fn game(&self) -> &GameManager {
        &self.game
    }

    /// Handle one request line and produce one response line.
    pub fn handle_line(&mut self, line: &str) -> String {
        let response = match serde_json::from_str::<Request>(line) {
            Ok(req) => self.handle(&req),
            Err(e) => {
                let err = ProtocolError::BadRequest(e.to_string());
                warn!(error = %err, "rejected request line");
                Response::error(None, err.code(), err.to_string())
            }
        };
        serde_json::to_string(&response).unwrap_or_else(|e| {
            error!(error = %e, "failed to serialize response");
            INTERNAL_ERROR_LINE.to_string()
        })
    }

    pub fn handle(&mut self, req: &Request) -> Response {
        let action = match Action::parse(req) {
            Ok(action) => action,
            Err(err) => {
                warn!(action = %req.action, error = %err, "rejected request");
                return Response::error(Some(req.action.clone()), err.code(), err.to_string());
            }
        };
        debug!(action = %req.action, "dispatch");
        match self.apply(action) {
            Ok(()) => Response::Ok {
                action: req.action.clone(),
                state: snapshot(&self.game),
            },
            Err(err) => {
                if matches!(err, DomainError::Invariant(_)) {
                    error!(action = %req.action, error = %err, "engine invariant violated");
                } else {
                    warn!(action = %req.action, error = %err, "action refused");
                }
                Response::error(Some(req.action.clone()), err.code(), err.to_string())
            }
        }
    }

    fn apply(&mut self, action: Action) -> Result<(), DomainError> {
        match action {
            Action::GetState => {}
            Action::StartGame => {
                self.game.setup_game();
                self.game.start_game()?;
            }
            Action::PlayCard(card) => {
                let id = self.game.find_hand_card(card.month, card.category).ok_or_else(|| {
                    DomainError::validation(
                        ValidationKind::CardNotInHand,
                        format!("no {:?} of month {:?} in hand", card.category, card.month),
                    )
                })?;
                self.game.play_turn(id)?;
            }
            Action::RespondGoStop { is_go } => {
                self.game.respond_go_stop(is_go)?;
            }
            Action::RespondToShake { month, did_shake } => {
                self.game.respond_to_shake(month, did_shake)?;
            }
            Action::RespondToCapture { card_id } => {
                self.game.respond_to_capture(card_id)?;
            }
            Action::ChooseCapture(card) => {
                let id = self.capture_option(card)?;
                self.game.respond_to_capture(id)?;
            }
            Action::RespondToChrysanthemumChoice { role } => {
                self.game.respond_to_chrysanthemum_choice(role)?;
            }
            Action::ClickRestartButton => self.game.setup_game(),
            #[cfg(any(test, feature = "test-hooks"))]
            Action::SetCondition(cond) => self.game.apply_condition(&cond)?,
            #[cfg(any(test, feature = "test-hooks"))]
            Action::ForceChongtongCheck { timing } => {
                self.game.force_chongtong_check(timing)?;
            }
        }
        Ok(())
    }

    /// Resolve a month/type pick against the pending capture options.
    fn capture_option(&self, card: CardRef) -> Result<CardId, DomainError> {
        let GameState::ChoosingCapture { options, .. } = self.game.state() else {
            return Err(DomainError::validation(
                ValidationKind::NoPendingDecision,
                format!("no capture decision pending, game is {:?}", self.game.state_kind()),
            ));
        };
        self.game
            .table()
            .cards()
            .iter()
            .find(|c| options.contains(&c.id) && c.month == card.month && c.category == card.category)
            .map(|c| c.id)
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::InvalidChoice,
                    format!("no {:?} of month {:?} among the options", card.category, card.month),
                )
            })
    }
}

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::cards_types::{CardId, Category, FlexRole, Month};
use crate::domain::snapshot::GameSnapshot;
#[cfg(any(test, feature = "test-hooks"))]
use crate::domain::engine::test_hooks::Condition;
#[cfg(any(test, feature = "test-hooks"))]
use crate::domain::state::ChongtongTiming;
use crate::errors::ErrorCode;

/// Raw request envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub action: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Rejections that happen before the engine is called.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("malformed payload for {action}: {detail}")]
    MalformedPayload { action: String, detail: String },
}

impl ProtocolError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ProtocolError::BadRequest(_) => ErrorCode::BadRequest,
            ProtocolError::UnknownAction(_) => ErrorCode::UnknownAction,
            ProtocolError::MalformedPayload { .. } => ErrorCode::MalformedPayload,
        }
    }
}

/// Card named by month and category, as the UI knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CardRef {
    #[serde(default)]
    pub month: Option<Month>,
    #[serde(rename = "type")]
    pub category: Category,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoStopPayload {
    is_go: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShakePayload {
    month: Month,
    did_shake: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CapturePayload {
    card_id: CardId,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RolePayload {
    role: FlexRole,
}

#[cfg(any(test, feature = "test-hooks"))]
#[derive(Debug, Clone, Copy, Deserialize)]
struct ChongtongPayload {
    timing: ChongtongTiming,
}

/// A validated request.
#[derive(Debug, Clone)]
pub enum Action {
    GetState,
    StartGame,
    PlayCard(CardRef),
    RespondGoStop { is_go: bool },
    RespondToShake { month: Month, did_shake: bool },
    RespondToCapture { card_id: CardId },
    ChooseCapture(CardRef),
    RespondToChrysanthemumChoice { role: FlexRole },
    ClickRestartButton,
    #[cfg(any(test, feature = "test-hooks"))]
    SetCondition(Box<Condition>),
    #[cfg(any(test, feature = "test-hooks"))]
    ForceChongtongCheck { timing: ChongtongTiming },
}

impl Action {
    pub fn parse(req: &Request) -> Result<Self, ProtocolError> {
        let action = match req.action.as_str() {
            "get_state" => Action::GetState,
            "start_game" => Action::StartGame,
            "play_card" => Action::PlayCard(payload(req)?),
            "respond_go_stop" => {
                let p: GoStopPayload = payload(req)?;
                Action::RespondGoStop { is_go: p.is_go }
            }
            "respond_to_shake" => {
                let p: ShakePayload = payload(req)?;
                Action::RespondToShake {
                    month: p.month,
                    did_shake: p.did_shake,
                }
            }
            "respond_to_capture" => {
                let p: CapturePayload = payload(req)?;
                Action::RespondToCapture { card_id: p.card_id }
            }
            "choose_capture" => Action::ChooseCapture(payload(req)?),
            "respond_to_chrysanthemum_choice" => {
                let p: RolePayload = payload(req)?;
                Action::RespondToChrysanthemumChoice { role: p.role }
            }
            "click_restart_button" => Action::ClickRestartButton,
            #[cfg(any(test, feature = "test-hooks"))]
            "set_condition" => Action::SetCondition(Box::new(payload(req)?)),
            #[cfg(any(test, feature = "test-hooks"))]
            "force_chongtong_check" => {
                let p: ChongtongPayload = payload(req)?;
                Action::ForceChongtongCheck { timing: p.timing }
            }
            other => return Err(ProtocolError::UnknownAction(other.to_string())),
        };
        Ok(action)
    }
}

fn payload<T: DeserializeOwned>(req: &Request) -> Result<T, ProtocolError> {
    let malformed = |detail: String| ProtocolError::MalformedPayload {
        action: req.action.clone(),
        detail,
    };
    let data = req
        .data
        .clone()
        .ok_or_else(|| malformed("missing data".to_string()))?;
    serde_json::from_value(data).map_err(|e| malformed(e.to_string()))
}

/// Response line. `ok` carries the full state snapshot inline.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok {
        action: String,
        #[serde(flatten)]
        state: GameSnapshot,
    },
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        action: Option<String>,
        code: &'static str,
        message: String,
    },
}

impl Response {
    pub fn error(action: Option<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Response::Error {
            action,
            code: code.as_str(),
            message: message.into(),
        }
    }
}

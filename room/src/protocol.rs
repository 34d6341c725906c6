//! The websocket message envelope: a `ClientAction`/`ServerEvent` tagged
//! pair over `serde_json`, the same shape as the teacher's
//! `poker-ws/src/main.rs`, trimmed to the actions this spec needs
//! (join, leave, ready, start, action, buyin, chat — no timer/countdown/
//! rebuy machinery, per SPEC_FULL.md §9).

use serde::{Deserialize, Serialize};
use texas_engine::{PrivateState, Seat};

use crate::snapshot::RoomPublicState;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientAction {
    Join { room_id: String, sid: String, name: String, buyin: u64 },
    Leave { room_id: String, sid: String },
    Ready { room_id: String, sid: String, ready: bool },
    Start { room_id: String, sid: String },
    Action { room_id: String, sid: String, action: String, amount: Option<u64> },
    Buyin { room_id: String, sid: String, amount: u64 },
    Chat { room_id: String, sid: String, text: String },
}

impl ClientAction {
    pub fn room_id(&self) -> &str {
        match self {
            ClientAction::Join { room_id, .. }
            | ClientAction::Leave { room_id, .. }
            | ClientAction::Ready { room_id, .. }
            | ClientAction::Start { room_id, .. }
            | ClientAction::Action { room_id, .. }
            | ClientAction::Buyin { room_id, .. }
            | ClientAction::Chat { room_id, .. } => room_id,
        }
    }

    pub fn sid(&self) -> &str {
        match self {
            ClientAction::Join { sid, .. }
            | ClientAction::Leave { sid, .. }
            | ClientAction::Ready { sid, .. }
            | ClientAction::Start { sid, .. }
            | ClientAction::Action { sid, .. }
            | ClientAction::Buyin { sid, .. }
            | ClientAction::Chat { sid, .. } => sid,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Welcome { room_id: String },
    Joined { seat: Seat },
    Snapshot { public: RoomPublicState },
    Private { private: PrivateState },
    Chat { sid: String, name: String, text: String },
    Error { message: String },
}

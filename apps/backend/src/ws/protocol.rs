use serde::{Deserialize, Serialize};

use crate::domain::{CardId, RoomKey, RoomSnapshot, UserId};
use crate::errors::ErrorCode;

/// Frames sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMsg {
    GetRoom,
    Join { key: RoomKey },
    Start,
    PlayCard { card_id: CardId },
    FlipCard { card_id: CardId },
    VoteCard { card_id: CardId },
    Leave,
    Delete,
}

impl ClientMsg {
    pub fn action(&self) -> &'static str {
        match self {
            ClientMsg::GetRoom => "get-room",
            ClientMsg::Join { .. } => "join",
            ClientMsg::Start => "start",
            ClientMsg::PlayCard { .. } => "play-card",
            ClientMsg::FlipCard { .. } => "flip-card",
            ClientMsg::VoteCard { .. } => "vote-card",
            ClientMsg::Leave => "leave",
            ClientMsg::Delete => "delete",
        }
    }
}

/// Frames sent by the server.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMsg {
    Connected { user_id: UserId },
    Update { room: RoomSnapshot },
    Left { key: RoomKey },
    RoomClosed { key: RoomKey },
    Disconnected { user_id: UserId },
    Error { code: String, message: String },
}

impl ServerMsg {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMsg::Error {
            code: code.as_str().to_string(),
            message: message.into(),
        }
    }
}

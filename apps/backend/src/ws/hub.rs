use actix::prelude::*;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{RoomKey, UserId};

/// Notifications fanned out to websocket sessions. Sessions fetch and project
/// the room themselves, so events carry no room state.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
#[rtype(result = "()")]
pub enum RoomEvent {
    /// The room committed a new version.
    Changed { key: RoomKey, version: u64 },
    /// The recipient's user is no longer seated in `key`.
    Left { key: RoomKey },
    /// The host closed the room.
    Closed { key: RoomKey },
    /// Another participant's last connection dropped.
    Disconnected { key: RoomKey, user_id: UserId },
}

/// Live websocket sessions by user. A user may hold several connections.
#[derive(Default)]
pub struct SessionHub {
    sessions: DashMap<UserId, DashMap<Uuid, Recipient<RoomEvent>>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, user_id: UserId, conn_id: Uuid, recipient: Recipient<RoomEvent>) {
        self.sessions
            .entry(user_id)
            .or_default()
            .insert(conn_id, recipient);
    }

    /// Returns true when this was the user's last connection.
    pub fn unregister(&self, user_id: UserId, conn_id: Uuid) -> bool {
        let Some(conns) = self.sessions.get(&user_id) else {
            return true;
        };
        conns.remove(&conn_id);
        let empty = conns.is_empty();
        drop(conns);
        if empty {
            self.sessions.remove_if(&user_id, |_, conns| conns.is_empty());
        }
        empty
    }

    pub fn is_connected(&self, user_id: UserId) -> bool {
        self.sessions
            .get(&user_id)
            .is_some_and(|conns| !conns.is_empty())
    }

    pub fn connection_count(&self) -> usize {
        self.sessions.iter().map(|conns| conns.len()).sum()
    }

    pub fn send_to_user(&self, user_id: UserId, event: RoomEvent) {
        if let Some(conns) = self.sessions.get(&user_id) {
            for recipient in conns.iter() {
                recipient.value().do_send(event.clone());
            }
        }
    }

    pub fn send_to_users<'a>(&self, users: impl IntoIterator<Item = &'a UserId>, event: &RoomEvent) {
        for &user_id in users {
            self.send_to_user(user_id, event.clone());
        }
    }
}

//! Inbound action dispatch: resolve the caller's room, run the action under
//! the room's single-writer lock, then log transitions and notify sessions.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{
    project, CardId, RoomKey, RoomOptions, RoomSnapshot, RoomSummary, RoomTransition, UserId,
};
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::services::room_registry::{Committed, RoomRegistry};
use crate::ws::hub::{RoomEvent, SessionHub};
use crate::AppError;

/// Identity resolved by the auth layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub username: String,
}

#[derive(Clone)]
pub struct GameFlowService {
    registry: Arc<RoomRegistry>,
    hub: Arc<SessionHub>,
}

impl GameFlowService {
    pub fn new(registry: Arc<RoomRegistry>, hub: Arc<SessionHub>) -> Self {
        Self { registry, hub }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub fn create_room(
        &self,
        caller: &Caller,
        options: RoomOptions,
    ) -> Result<RoomSnapshot, AppError> {
        let key = self
            .registry
            .create(options, caller.id, &caller.username)?;
        info!(room_key = %key, user_id = caller.id, "room created");
        self.snapshot(key, caller.id)
    }

    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        self.registry.public_lobbies()
    }

    /// The caller's view of the room they are seated in.
    pub fn current_room(&self, user_id: UserId) -> Result<RoomSnapshot, AppError> {
        let key = self
            .registry
            .room_of(user_id)
            .ok_or_else(|| AppError::from(not_seated()))?;
        self.snapshot(key, user_id)
    }

    pub fn snapshot(&self, key: RoomKey, user_id: UserId) -> Result<RoomSnapshot, AppError> {
        Ok(self.registry.view(key, |room| project(room, user_id))?)
    }

    pub fn join_room(&self, caller: &Caller, key: RoomKey) -> Result<RoomSnapshot, AppError> {
        let committed = self.registry.join(key, caller.id, &caller.username)?;
        self.publish("join", caller.id, &committed);
        self.snapshot(key, caller.id)
    }

    pub fn start_game(&self, user_id: UserId) -> Result<(), AppError> {
        let committed = self.registry.act(user_id, |room| room.start_game(user_id))?;
        self.publish("start", user_id, &committed);
        Ok(())
    }

    pub fn play_card(&self, user_id: UserId, card_id: CardId) -> Result<(), AppError> {
        let committed = self
            .registry
            .act(user_id, |room| room.play_card(user_id, card_id))?;
        self.publish("play-card", user_id, &committed);
        Ok(())
    }

    pub fn flip_card(&self, user_id: UserId, card_id: CardId) -> Result<(), AppError> {
        let committed = self
            .registry
            .act(user_id, |room| room.flip_card(user_id, card_id))?;
        self.publish("flip-card", user_id, &committed);
        Ok(())
    }

    pub fn vote_card(&self, user_id: UserId, card_id: CardId) -> Result<(), AppError> {
        let committed = self
            .registry
            .act(user_id, |room| room.vote_card(user_id, card_id))?;
        self.publish("vote-card", user_id, &committed);
        Ok(())
    }

    pub fn leave_room(&self, user_id: UserId) -> Result<RoomKey, AppError> {
        let committed = self.registry.leave(user_id)?;
        if committed.value.round_abandoned {
            info!(room_key = %committed.key, user_id, "judge left, round abandoned");
        }
        if committed.destroyed {
            info!(room_key = %committed.key, "last participant left, room destroyed");
        }
        self.publish("leave", user_id, &committed);
        Ok(committed.key)
    }

    pub fn delete_room(&self, user_id: UserId) -> Result<RoomKey, AppError> {
        let closed = self.registry.close(user_id)?;
        info!(room_key = %closed.key, user_id, members = closed.members.len(), "room closed by host");
        self.hub
            .send_to_users(&closed.members, &RoomEvent::Closed { key: closed.key });
        Ok(closed.key)
    }

    /// A user's last connection dropped. Seat and hand are kept; the rest of
    /// the room is told.
    pub fn disconnected(&self, user_id: UserId) {
        let Some(key) = self.registry.room_of(user_id) else {
            return;
        };
        let Ok(others) = self.registry.view(key, |room| {
            room.roster
                .iter()
                .map(|p| p.user_id)
                .filter(|&id| id != user_id)
                .collect::<Vec<_>>()
        }) else {
            return;
        };
        debug!(room_key = %key, user_id, "participant disconnected");
        self.hub
            .send_to_users(&others, &RoomEvent::Disconnected { key, user_id });
    }

    fn publish<T>(&self, action: &'static str, user_id: UserId, committed: &Committed<T>) {
        let key = committed.key;
        let version = committed.version();
        debug!(room_key = %key, user_id, action, version, "room mutated");

        for transition in committed.transitions() {
            match transition {
                RoomTransition::GameStarted => info!(room_key = %key, "game started"),
                RoomTransition::RoundOpened { round_no, judge } => {
                    info!(room_key = %key, round_no, judge, "round opened")
                }
                RoomTransition::GameEnded => info!(room_key = %key, "game over"),
                RoomTransition::HostChanged { user_id } => {
                    info!(room_key = %key, user_id, "host changed")
                }
                RoomTransition::ParticipantJoined { user_id } => {
                    debug!(room_key = %key, user_id, "participant joined")
                }
                RoomTransition::ParticipantLeft { user_id } => {
                    debug!(room_key = %key, user_id, "participant left");
                    self.hub.send_to_user(user_id, RoomEvent::Left { key });
                }
            }
        }

        if !committed.destroyed {
            self.hub
                .send_to_users(&committed.after.members, &RoomEvent::Changed { key, version });
        }
    }
}

fn not_seated() -> DomainError {
    DomainError::not_found(NotFoundKind::Room, "you are not in a room")
}

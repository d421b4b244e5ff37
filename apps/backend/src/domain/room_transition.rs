//! Edge-triggered room lifecycle transitions, derived by comparing the room
//! before and after a committed mutation.

use crate::domain::ids::UserId;
use crate::domain::room::{Room, RoomStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLifecycleView {
    pub version: u64,
    pub status: RoomStatus,
    pub round_no: Option<u32>,
    pub judge: Option<UserId>,
    pub host: Option<UserId>,
    pub members: Vec<UserId>,
}

impl RoomLifecycleView {
    pub fn of(room: &Room) -> Self {
        Self {
            version: room.version,
            status: room.status,
            round_no: room.round.as_ref().map(|r| r.round_no()),
            judge: room.judge(),
            host: room.host().map(|p| p.user_id),
            members: room.roster.iter().map(|p| p.user_id).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomTransition {
    /// Lobby -> Playing
    GameStarted,

    /// A new round opened with a (possibly new) judge.
    RoundOpened { round_no: u32, judge: UserId },

    /// Playing -> GameOver
    GameEnded,

    ParticipantJoined { user_id: UserId },

    ParticipantLeft { user_id: UserId },

    HostChanged { user_id: UserId },
}

pub fn derive_room_transitions(
    before: &RoomLifecycleView,
    after: &RoomLifecycleView,
) -> Vec<RoomTransition> {
    let mut transitions = Vec::new();

    for &user_id in &after.members {
        if !before.members.contains(&user_id) {
            transitions.push(RoomTransition::ParticipantJoined { user_id });
        }
    }
    for &user_id in &before.members {
        if !after.members.contains(&user_id) {
            transitions.push(RoomTransition::ParticipantLeft { user_id });
        }
    }

    if let Some(user_id) = after.host {
        if before.host != Some(user_id) {
            transitions.push(RoomTransition::HostChanged { user_id });
        }
    }

    if before.status == RoomStatus::Lobby && after.status == RoomStatus::Playing {
        transitions.push(RoomTransition::GameStarted);
    }

    if let (Some(round_no), Some(judge)) = (after.round_no, after.judge) {
        if before.round_no != Some(round_no) {
            transitions.push(RoomTransition::RoundOpened { round_no, judge });
        }
    }

    if before.status != RoomStatus::GameOver && after.status == RoomStatus::GameOver {
        transitions.push(RoomTransition::GameEnded);
    }

    transitions
}

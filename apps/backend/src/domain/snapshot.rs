//! View projector: the redacted, client-safe picture of a room for one viewer.
//!
//! Projection is a pure function of the room and the viewer, so equal rooms
//! project to equal snapshots and the broadcast layer can compare snapshots
//! to skip redundant pushes.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{CardRef, CardState};
use crate::domain::ids::{CardId, RoomKey, UserId};
use crate::domain::roster::Participant;
use crate::domain::room::{Room, RoomOptions, RoomStatus, RoundRecord};
use crate::domain::round::{Round, RoundPhase};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub key: RoomKey,
    pub options: RoomOptions,
    pub started: bool,
    pub status: RoomStatus,
    pub round_no: Option<u32>,
    pub round: Option<RoundPublic>,
    pub participants: Vec<ParticipantView>,
    pub history: Vec<RoundRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundPublic {
    pub round_no: u32,
    pub phase: RoundPhase,
    pub judge_id: UserId,
    pub prompt: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantView {
    pub id: UserId,
    pub username: String,
    pub score: u32,
    pub is_judge: bool,
    pub has_played: bool,
    pub is_host: bool,
    pub hand_size: usize,
    /// The viewer's own cards with text; for everyone else only submitted
    /// cards, with text once face up.
    pub cards: Vec<CardView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: CardId,
    pub state: CardState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Lobby-listing entry for a joinable public room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub key: RoomKey,
    pub host: Option<String>,
    pub deck: String,
    pub players: usize,
    pub player_limit: u32,
    pub rounds: u32,
}

pub fn project(room: &Room, viewer: UserId) -> RoomSnapshot {
    let judge = room.judge();
    RoomSnapshot {
        key: room.key,
        options: room.options.clone(),
        started: room.started(),
        status: room.status,
        round_no: room.current_round_no(),
        round: room.round.as_ref().map(round_public),
        participants: room
            .roster
            .iter()
            .map(|p| participant_view(p, viewer, judge))
            .collect(),
        history: room.history.clone(),
    }
}

pub fn summarize(room: &Room) -> RoomSummary {
    RoomSummary {
        key: room.key,
        host: room.host().map(|p| p.display_name.clone()),
        deck: room.options.deck.clone(),
        players: room.roster.len(),
        player_limit: room.options.player_limit,
        rounds: room.options.rounds,
    }
}

fn round_public(round: &Round) -> RoundPublic {
    RoundPublic {
        round_no: round.round_no(),
        phase: round.phase(),
        judge_id: round.judge(),
        prompt: round.prompt().text.clone(),
    }
}

fn participant_view(p: &Participant, viewer: UserId, judge: Option<UserId>) -> ParticipantView {
    let own = p.user_id == viewer;
    let cards = p
        .cards
        .iter()
        .filter(|c| own || c.state().is_submitted())
        .map(|c| card_view(c, own))
        .collect();
    ParticipantView {
        id: p.user_id,
        username: p.display_name.clone(),
        score: p.score,
        is_judge: judge == Some(p.user_id),
        has_played: p.has_submitted,
        is_host: p.is_host,
        hand_size: p.hand_len(),
        cards,
    }
}

fn card_view(card: &CardRef, own: bool) -> CardView {
    let visible = own || card.state() == CardState::SubmittedRevealed;
    CardView {
        id: card.id(),
        state: card.state(),
        text: visible.then(|| card.text().to_string()),
    }
}

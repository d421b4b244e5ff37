//! Room aggregate: options, status, roster, card pool, current round and the
//! permanent round ledger. Round flow lives in `orchestrator`.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::domain::card_pool::CardPool;
use crate::domain::ids::{RoomKey, UserId};
use crate::domain::roster::{Participant, Roster};
use crate::domain::round::Round;
use crate::errors::domain::{DomainError, ValidationKind};

pub const CARD_LIMIT_RANGE: RangeInclusive<u32> = 1..=12;
pub const ROUNDS_RANGE: RangeInclusive<u32> = 1..=50;
pub const PLAYER_LIMIT_RANGE: RangeInclusive<u32> = 2..=16;

/// Host-chosen settings, fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOptions {
    /// Response cards per hand.
    pub card_limit: u32,
    pub rounds: u32,
    pub deck: String,
    #[serde(default)]
    pub private_lobby: bool,
    pub player_limit: u32,
}

impl Default for RoomOptions {
    fn default() -> Self {
        Self {
            card_limit: 7,
            rounds: 10,
            deck: crate::domain::deck::STANDARD_DECK_ID.to_string(),
            private_lobby: false,
            player_limit: 8,
        }
    }
}

impl RoomOptions {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_range("cardLimit", self.card_limit, &CARD_LIMIT_RANGE)?;
        check_range("rounds", self.rounds, &ROUNDS_RANGE)?;
        check_range("playerLimit", self.player_limit, &PLAYER_LIMIT_RANGE)?;
        if self.deck.trim().is_empty() {
            return Err(DomainError::validation(
                ValidationKind::InvalidOptions,
                "deck must not be empty",
            ));
        }
        Ok(())
    }
}

fn check_range(
    field: &str,
    value: u32,
    range: &RangeInclusive<u32>,
) -> Result<(), DomainError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(DomainError::validation(
            ValidationKind::InvalidOptions,
            format!(
                "{field} must be between {} and {}, got {value}",
                range.start(),
                range.end()
            ),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Lobby,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RoundOutcome {
    Won { winner: UserId, card: String },
    /// The judge left or the table fell apart before a vote.
    Abandoned,
}

/// Permanent ledger entry for a finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub round_no: u32,
    pub judge: UserId,
    pub prompt: String,
    pub outcome: RoundOutcome,
}

#[derive(Debug, Clone)]
pub struct Room {
    pub key: RoomKey,
    pub options: RoomOptions,
    pub status: RoomStatus,
    pub roster: Roster,
    pub pool: CardPool,
    /// The round in progress. `None` in the lobby and after game over.
    pub round: Option<Round>,
    pub history: Vec<RoundRecord>,
    /// Bumped once per committed mutation.
    pub version: u64,
    pub(crate) next_card_id: u64,
}

impl Room {
    /// A new lobby with the creator seated as host.
    pub fn new(
        key: RoomKey,
        options: RoomOptions,
        pool: CardPool,
        host_id: UserId,
        host_name: impl Into<String>,
    ) -> Self {
        let mut roster = Roster::new();
        roster.add(host_id, host_name);
        Self {
            key,
            options,
            status: RoomStatus::Lobby,
            roster,
            pool,
            round: None,
            history: Vec::new(),
            version: 1,
            next_card_id: 1,
        }
    }

    pub fn started(&self) -> bool {
        self.status != RoomStatus::Lobby
    }

    pub fn host(&self) -> Option<&Participant> {
        self.roster.host()
    }

    pub fn is_host(&self, user_id: UserId) -> bool {
        self.host().is_some_and(|p| p.user_id == user_id)
    }

    /// Number of the round in progress, or of the last finished one.
    pub fn current_round_no(&self) -> Option<u32> {
        self.round
            .as_ref()
            .map(Round::round_no)
            .or_else(|| self.history.last().map(|r| r.round_no))
    }

    pub fn judge(&self) -> Option<UserId> {
        self.round.as_ref().map(Round::judge)
    }

    pub fn is_full(&self) -> bool {
        self.roster.len() >= self.options.player_limit as usize
    }

    pub fn score_of(&self, user_id: UserId) -> Option<u32> {
        self.roster.get(user_id).map(|p| p.score)
    }
}

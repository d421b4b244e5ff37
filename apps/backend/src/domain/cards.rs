//! Card types: immutable deck cards and the mutable in-play card reference.

use serde::{Deserialize, Serialize};

use crate::domain::ids::{CardId, RoomKey, UserId};
use crate::errors::domain::{DomainError, ValidationKind};

/// Immutable response text drawn from a deck.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponseCard {
    /// Position within the owning deck.
    pub id: u32,
    pub text: String,
}

/// Immutable prompt text drawn from a deck.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromptCard {
    pub id: u32,
    pub text: String,
}

/// Lifecycle of a card reference. Only ever advances one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardState {
    InHand,
    SubmittedHidden,
    SubmittedRevealed,
}

impl CardState {
    pub fn is_submitted(self) -> bool {
        !matches!(self, CardState::InHand)
    }
}

/// A response card in play: dealt to one participant of one room.
///
/// The owner is fixed at creation and the state only moves forward, so the
/// fields are private and mutated through [`CardRef::submit`] and
/// [`CardRef::reveal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRef {
    id: CardId,
    owner: UserId,
    room_key: RoomKey,
    card: ResponseCard,
    state: CardState,
}

impl CardRef {
    pub fn new(id: CardId, owner: UserId, room_key: RoomKey, card: ResponseCard) -> Self {
        Self {
            id,
            owner,
            room_key,
            card,
            state: CardState::InHand,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn room_key(&self) -> RoomKey {
        self.room_key
    }

    pub fn text(&self) -> &str {
        &self.card.text
    }

    pub fn card(&self) -> &ResponseCard {
        &self.card
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    /// IN_HAND -> SUBMITTED_HIDDEN
    pub fn submit(&mut self) -> Result<(), DomainError> {
        match self.state {
            CardState::InHand => {
                self.state = CardState::SubmittedHidden;
                Ok(())
            }
            _ => Err(DomainError::validation(
                ValidationKind::AlreadyPlayed,
                format!("{} has already been played", self.id),
            )),
        }
    }

    /// SUBMITTED_HIDDEN -> SUBMITTED_REVEALED
    pub fn reveal(&mut self) -> Result<(), DomainError> {
        match self.state {
            CardState::SubmittedHidden => {
                self.state = CardState::SubmittedRevealed;
                Ok(())
            }
            CardState::SubmittedRevealed => Err(DomainError::validation(
                ValidationKind::AlreadyRevealed,
                format!("{} is already face up", self.id),
            )),
            CardState::InHand => Err(DomainError::phase_mismatch(format!(
                "{} has not been played",
                self.id
            ))),
        }
    }
}

//! Room roster: who is seated, in join order, and their per-round flags.

use crate::domain::cards::{CardRef, CardState};
use crate::domain::ids::{CardId, Seat, UserId};
use crate::errors::domain::{DomainError, NotFoundKind};

/// A user's membership in a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub user_id: UserId,
    pub display_name: String,
    /// Join-order seat, unique and never reused within the room.
    pub seat: Seat,
    /// Every card reference this participant owns, in deal order, including
    /// the one submitted this round.
    pub cards: Vec<CardRef>,
    pub has_submitted: bool,
    pub score: u32,
    pub is_host: bool,
}

impl Participant {
    /// Cards still in hand.
    pub fn hand(&self) -> impl Iterator<Item = &CardRef> {
        self.cards.iter().filter(|c| c.state() == CardState::InHand)
    }

    pub fn hand_len(&self) -> usize {
        self.hand().count()
    }

    pub fn card(&self, card_id: CardId) -> Option<&CardRef> {
        self.cards.iter().find(|c| c.id() == card_id)
    }

    pub fn card_mut(&mut self, card_id: CardId) -> Option<&mut CardRef> {
        self.cards.iter_mut().find(|c| c.id() == card_id)
    }

    /// Drop submitted cards and clear the per-round flag.
    pub fn reset_for_round(&mut self) {
        self.cards.retain(|c| !c.state().is_submitted());
        self.has_submitted = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Ordered, insertion-stable set of participants, unique by user id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    participants: Vec<Participant>,
    next_seat: Seat,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat a user. Re-adding a seated user is a no-op so reconnecting
    /// clients keep their hand and score. The first participant becomes host.
    pub fn add(&mut self, user_id: UserId, display_name: impl Into<String>) -> AddOutcome {
        if self.contains(user_id) {
            return AddOutcome::AlreadyPresent;
        }
        let seat = self.next_seat;
        self.next_seat += 1;
        let is_host = self.participants.is_empty();
        self.participants.push(Participant {
            user_id,
            display_name: display_name.into(),
            seat,
            cards: Vec::new(),
            has_submitted: false,
            score: 0,
            is_host,
        });
        AddOutcome::Added
    }

    /// Evict a user along with their hand and flags.
    pub fn remove(&mut self, user_id: UserId) -> Result<Participant, DomainError> {
        let idx = self
            .participants
            .iter()
            .position(|p| p.user_id == user_id)
            .ok_or_else(|| not_seated(user_id))?;
        Ok(self.participants.remove(idx))
    }

    /// Promote the earliest-joined participant if nobody holds the host flag.
    pub fn promote_host(&mut self) -> Option<UserId> {
        if self.participants.iter().any(|p| p.is_host) {
            return None;
        }
        let first = self.participants.first_mut()?;
        first.is_host = true;
        Some(first.user_id)
    }

    pub fn host(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is_host)
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }

    pub fn get(&self, user_id: UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    pub fn get_mut(&mut self, user_id: UserId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.user_id == user_id)
    }

    pub fn require(&self, user_id: UserId) -> Result<&Participant, DomainError> {
        self.get(user_id).ok_or_else(|| not_seated(user_id))
    }

    pub fn require_mut(&mut self, user_id: UserId) -> Result<&mut Participant, DomainError> {
        self.get_mut(user_id).ok_or_else(|| not_seated(user_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Participant> {
        self.participants.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Everyone except the judge.
    pub fn eligible(&self, judge: UserId) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(move |p| p.user_id != judge)
    }

    /// True once there is at least one eligible player and all of them have
    /// submitted.
    pub fn all_submitted(&self, judge: UserId) -> bool {
        let mut eligible = self.eligible(judge).peekable();
        eligible.peek().is_some() && eligible.all(|p| p.has_submitted)
    }

    pub fn first(&self) -> Option<&Participant> {
        self.participants.first()
    }

    /// The participant seated after `anchor`, wrapping to the lowest seat.
    /// `anchor` need not belong to a current participant.
    pub fn next_after_seat(&self, anchor: Seat) -> Option<&Participant> {
        self.participants
            .iter()
            .filter(|p| p.seat > anchor)
            .min_by_key(|p| p.seat)
            .or_else(|| self.participants.iter().min_by_key(|p| p.seat))
    }

    /// Locate a card reference across all hands.
    pub fn find_card(&self, card_id: CardId) -> Option<&CardRef> {
        self.participants.iter().find_map(|p| p.card(card_id))
    }

    pub fn find_card_mut(&mut self, card_id: CardId) -> Option<&mut CardRef> {
        self.participants.iter_mut().find_map(|p| p.card_mut(card_id))
    }
}

fn not_seated(user_id: UserId) -> DomainError {
    DomainError::not_found(NotFoundKind::User, format!("user {user_id} is not in this room"))
}

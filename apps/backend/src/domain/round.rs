//! Per-round state machine: DEALING -> SUBMITTING -> REVEALING -> VOTING -> SCORED.
//!
//! Card states live on the participants' card references; the round keeps
//! back-references to the submitted cards so the winner's owner is never
//! lost. Every action re-validates actor, phase and card rather than trusting
//! the phase alone, so late or reordered client messages are rejected.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{CardState, PromptCard};
use crate::domain::ids::{CardId, Seat, UserId};
use crate::domain::roster::Roster;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundPhase {
    Dealing,
    Submitting,
    Revealing,
    Voting,
    Scored,
}

/// Back-reference from a round to a submitted card and its original owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub card_id: CardId,
    pub owner: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    round_no: u32,
    judge: UserId,
    judge_seat: Seat,
    phase: RoundPhase,
    prompt: PromptCard,
    submissions: Vec<Submission>,
    winner: Option<Submission>,
}

impl Round {
    /// A fresh round in `Dealing`. Call [`Round::finish_dealing`] once hands
    /// have been topped up.
    pub fn new(round_no: u32, judge: UserId, judge_seat: Seat, prompt: PromptCard) -> Self {
        Self {
            round_no,
            judge,
            judge_seat,
            phase: RoundPhase::Dealing,
            prompt,
            submissions: Vec::new(),
            winner: None,
        }
    }

    pub fn round_no(&self) -> u32 {
        self.round_no
    }

    pub fn judge(&self) -> UserId {
        self.judge
    }

    /// Seat the judge held when the round opened; anchors rotation even after
    /// the judge leaves.
    pub fn judge_seat(&self) -> Seat {
        self.judge_seat
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn prompt(&self) -> &PromptCard {
        &self.prompt
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn winner(&self) -> Option<Submission> {
        self.winner
    }

    pub fn is_judge(&self, user_id: UserId) -> bool {
        self.judge == user_id
    }

    fn submission(&self, card_id: CardId) -> Option<Submission> {
        self.submissions.iter().copied().find(|s| s.card_id == card_id)
    }

    /// DEALING -> SUBMITTING
    pub fn finish_dealing(&mut self) -> Result<(), DomainError> {
        self.expect_phase(RoundPhase::Dealing, "finish dealing")?;
        self.phase = RoundPhase::Submitting;
        Ok(())
    }

    pub fn submit_card(
        &mut self,
        roster: &mut Roster,
        actor: UserId,
        card_id: CardId,
    ) -> Result<(), DomainError> {
        let judge = self.judge;
        let participant = roster.require_mut(actor)?;
        if actor == judge {
            return Err(DomainError::validation(
                ValidationKind::NotEligible,
                "the judge does not play a card",
            ));
        }
        if participant.has_submitted {
            return Err(DomainError::validation(
                ValidationKind::AlreadyPlayed,
                "you have already played a card this round",
            ));
        }
        self.expect_phase(RoundPhase::Submitting, "play a card")?;

        let card = participant
            .card_mut(card_id)
            .ok_or_else(|| card_not_found(card_id))?;
        card.submit()?;
        participant.has_submitted = true;
        self.submissions.push(Submission {
            card_id,
            owner: actor,
        });

        self.refresh_phase(roster);
        Ok(())
    }

    /// Reveal a submitted card. Any participant may flip, in any order, but
    /// each card only once.
    pub fn reveal_card(
        &mut self,
        roster: &mut Roster,
        actor: UserId,
        card_id: CardId,
    ) -> Result<(), DomainError> {
        roster.require(actor)?;
        match self.phase {
            RoundPhase::Revealing => {}
            RoundPhase::Voting | RoundPhase::Scored if self.submission(card_id).is_some() => {
                return Err(already_revealed(card_id));
            }
            other => {
                return Err(DomainError::phase_mismatch(format!(
                    "cannot flip a card while the round is {other:?}"
                )))
            }
        }
        if !roster.all_submitted(self.judge) {
            return Err(DomainError::phase_mismatch(
                "cannot flip cards until every player has played",
            ));
        }

        let submission = self
            .submission(card_id)
            .ok_or_else(|| card_not_found(card_id))?;
        roster
            .require_mut(submission.owner)?
            .card_mut(card_id)
            .ok_or_else(|| card_not_found(card_id))?
            .reveal()?;

        self.refresh_phase(roster);
        Ok(())
    }

    /// Record the judge's pick and move to SCORED. Scoring the owner is the
    /// orchestrator's job.
    pub fn cast_vote(
        &mut self,
        roster: &Roster,
        actor: UserId,
        card_id: CardId,
    ) -> Result<Submission, DomainError> {
        roster.require(actor)?;
        if actor != self.judge {
            return Err(DomainError::validation(
                ValidationKind::NotJudge,
                "only the judge may vote",
            ));
        }
        self.expect_phase(RoundPhase::Voting, "vote")?;

        let submission = self
            .submission(card_id)
            .ok_or_else(|| card_not_found(card_id))?;
        let revealed = roster
            .find_card(card_id)
            .is_some_and(|c| c.state() == CardState::SubmittedRevealed);
        if !revealed {
            return Err(DomainError::phase_mismatch(format!(
                "{card_id} has not been flipped"
            )));
        }

        self.winner = Some(submission);
        self.phase = RoundPhase::Scored;
        Ok(submission)
    }

    /// Drop a departed participant's submission and re-derive the phase over
    /// the reduced eligible set.
    pub fn withdraw(&mut self, roster: &Roster, user_id: UserId) {
        self.submissions.retain(|s| s.owner != user_id);
        self.refresh_phase(roster);
    }

    /// Apply the automatic transitions.
    pub fn refresh_phase(&mut self, roster: &Roster) {
        if self.phase == RoundPhase::Submitting && roster.all_submitted(self.judge) {
            self.phase = RoundPhase::Revealing;
        }
        if self.phase == RoundPhase::Revealing && self.all_revealed(roster) {
            self.phase = RoundPhase::Voting;
        }
    }

    fn all_revealed(&self, roster: &Roster) -> bool {
        !self.submissions.is_empty()
            && self.submissions.iter().all(|s| {
                roster
                    .find_card(s.card_id)
                    .is_some_and(|c| c.state() == CardState::SubmittedRevealed)
            })
    }

    fn expect_phase(&self, expected: RoundPhase, action: &str) -> Result<(), DomainError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(DomainError::phase_mismatch(format!(
                "cannot {action} while the round is {:?}",
                self.phase
            )))
        }
    }
}

fn card_not_found(card_id: CardId) -> DomainError {
    DomainError::not_found(NotFoundKind::Card, format!("{card_id} is not available"))
}

fn already_revealed(card_id: CardId) -> DomainError {
    DomainError::validation(
        ValidationKind::AlreadyRevealed,
        format!("{card_id} is already face up"),
    )
}

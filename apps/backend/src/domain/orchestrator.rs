//! Round orchestration: start, per-action dispatch into the current round,
//! scoring, judge rotation, dealing and departures.
//!
//! Every method here mutates the room in place and may leave it half-updated
//! on error; callers run them against a working copy and only commit on
//! success (see `services::room_registry`).

use crate::domain::cards::CardRef;
use crate::domain::ids::{CardId, UserId};
use crate::domain::roster::AddOutcome;
use crate::domain::room::{Room, RoomStatus, RoundOutcome, RoundRecord};
use crate::domain::round::Round;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

/// What a departure did to the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    /// The judge left and the round in progress was abandoned.
    pub round_abandoned: bool,
    pub new_host: Option<UserId>,
    /// Nobody is left; the room should be destroyed.
    pub room_empty: bool,
}

impl Room {
    /// Seat a user. Already-seated users are let back in at any time and keep
    /// their hand and score; newcomers are only admitted to the lobby.
    pub fn join(
        &mut self,
        user_id: UserId,
        display_name: impl Into<String>,
    ) -> Result<AddOutcome, DomainError> {
        if self.roster.contains(user_id) {
            return Ok(AddOutcome::AlreadyPresent);
        }
        if self.status != RoomStatus::Lobby {
            return Err(DomainError::phase_mismatch(
                "this game has already started",
            ));
        }
        if self.is_full() {
            return Err(DomainError::conflict(
                ConflictKind::RoomFull,
                format!("room is full ({} players)", self.options.player_limit),
            ));
        }
        Ok(self.roster.add(user_id, display_name))
    }

    /// Lobby -> Playing. The first participant in roster order judges round 1.
    pub fn start_game(&mut self, actor: UserId) -> Result<(), DomainError> {
        self.roster.require(actor)?;
        if self.status != RoomStatus::Lobby {
            return Err(DomainError::phase_mismatch("game has already started"));
        }
        if !self.is_host(actor) {
            return Err(DomainError::validation(
                ValidationKind::NotHost,
                "only the host can start the game",
            ));
        }
        if self.roster.len() < 2 {
            return Err(DomainError::validation(
                ValidationKind::NotEnoughPlayers,
                "at least two players are needed to start",
            ));
        }

        let judge = self
            .roster
            .first()
            .map(|p| p.user_id)
            .ok_or_else(|| DomainError::validation(ValidationKind::NotEnoughPlayers, "empty room"))?;
        self.open_round(1, judge)?;
        self.status = RoomStatus::Playing;
        Ok(())
    }

    pub fn play_card(&mut self, actor: UserId, card_id: CardId) -> Result<(), DomainError> {
        let round = round_in_play(self.status, &mut self.round)?;
        round.submit_card(&mut self.roster, actor, card_id)
    }

    pub fn flip_card(&mut self, actor: UserId, card_id: CardId) -> Result<(), DomainError> {
        let round = round_in_play(self.status, &mut self.round)?;
        round.reveal_card(&mut self.roster, actor, card_id)
    }

    /// Judge's pick: score the owner, record the round and move on.
    pub fn vote_card(&mut self, actor: UserId, card_id: CardId) -> Result<(), DomainError> {
        let round = round_in_play(self.status, &mut self.round)?;
        let winner = round.cast_vote(&self.roster, actor, card_id)?;

        let card = self
            .roster
            .find_card(card_id)
            .map(|c| c.text().to_string())
            .unwrap_or_default();
        self.roster.require_mut(winner.owner)?.score += 1;

        self.advance_round(RoundOutcome::Won {
            winner: winner.owner,
            card,
        })
    }

    /// Close the current round into the ledger and either open the next one
    /// or end the game.
    ///
    /// The next judge is the participant seated after the closing round's
    /// judge seat, which stays valid even if that judge has left.
    pub fn advance_round(&mut self, outcome: RoundOutcome) -> Result<(), DomainError> {
        let Some(round) = self.round.take() else {
            return Err(DomainError::phase_mismatch("no round in progress"));
        };
        self.history.push(RoundRecord {
            round_no: round.round_no(),
            judge: round.judge(),
            prompt: round.prompt().text.clone(),
            outcome,
        });
        for p in self.roster.iter_mut() {
            p.reset_for_round();
        }

        if round.round_no() >= self.options.rounds || self.roster.len() < 2 {
            self.status = RoomStatus::GameOver;
            return Ok(());
        }

        let Some(next_judge) = self
            .roster
            .next_after_seat(round.judge_seat())
            .map(|p| p.user_id)
        else {
            self.status = RoomStatus::GameOver;
            return Ok(());
        };

        match self.open_round(round.round_no() + 1, next_judge) {
            Err(DomainError::Conflict(ConflictKind::DeckExhausted, _)) => {
                self.status = RoomStatus::GameOver;
                Ok(())
            }
            other => other,
        }
    }

    /// Remove a participant, promoting a new host and repairing the round.
    pub fn remove_participant(&mut self, user_id: UserId) -> Result<Departure, DomainError> {
        self.roster.remove(user_id)?;
        let new_host = self.roster.promote_host();

        let mut round_abandoned = false;
        if self.status == RoomStatus::Playing {
            if let Some(round) = self.round.as_mut() {
                if round.is_judge(user_id) || self.roster.len() < 2 {
                    round_abandoned = true;
                } else {
                    round.withdraw(&self.roster, user_id);
                }
            }
            if round_abandoned {
                self.advance_round(RoundOutcome::Abandoned)?;
            }
        }

        Ok(Departure {
            round_abandoned,
            new_host,
            room_empty: self.roster.is_empty(),
        })
    }

    /// Host-only check before the room is destroyed.
    pub fn authorize_delete(&self, actor: UserId) -> Result<(), DomainError> {
        self.roster.require(actor)?;
        if self.is_host(actor) {
            Ok(())
        } else {
            Err(DomainError::validation(
                ValidationKind::NotHost,
                "only the host can close the room",
            ))
        }
    }

    /// Top up every eligible hand, assign a prompt, then move to SUBMITTING.
    /// Checks the pool first so an exhausted deck draws nothing.
    fn open_round(&mut self, round_no: u32, judge: UserId) -> Result<(), DomainError> {
        let judge_seat = self.roster.require(judge)?.seat;
        let card_limit = self.options.card_limit as usize;

        let needed: usize = self
            .roster
            .eligible(judge)
            .map(|p| card_limit.saturating_sub(p.hand_len()))
            .sum();
        if needed > self.pool.remaining_responses() || self.pool.remaining_prompts() == 0 {
            return Err(DomainError::conflict(
                ConflictKind::DeckExhausted,
                format!(
                    "deck {} cannot deal round {round_no}",
                    self.pool.deck_id()
                ),
            ));
        }

        let key = self.key;
        for p in self.roster.iter_mut() {
            if p.user_id == judge {
                continue;
            }
            let missing = card_limit.saturating_sub(p.hand_len());
            for card in self.pool.draw_response_cards(missing)? {
                let id = CardId(self.next_card_id);
                self.next_card_id += 1;
                p.cards.push(CardRef::new(id, p.user_id, key, card));
            }
        }
        let prompt = self.pool.draw_prompt_card()?;

        let mut round = Round::new(round_no, judge, judge_seat, prompt);
        round.finish_dealing()?;
        self.round = Some(round);
        Ok(())
    }
}

fn round_in_play(status: RoomStatus, round: &mut Option<Round>) -> Result<&mut Round, DomainError> {
    if status != RoomStatus::Playing {
        return Err(DomainError::phase_mismatch("game is not in progress"));
    }
    round
        .as_mut()
        .ok_or_else(|| DomainError::phase_mismatch("no round in progress"))
}

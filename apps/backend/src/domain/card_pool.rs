//! Per-room card pool.
//!
//! Each room shuffles its deck once from a seed and then deals from the top
//! of that order, so a card can only leave the pool once per room. Rooms
//! sharing a deck hold separate pools and never starve each other. Draws are
//! serialized by the room's single-writer lock.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::cards::{PromptCard, ResponseCard};
use crate::domain::deck::Deck;
use crate::errors::domain::{ConflictKind, DomainError};

#[derive(Debug, Clone)]
pub struct CardPool {
    deck: Arc<Deck>,
    seed: u64,
    /// Undrawn prompt indices; the next draw pops from the end.
    prompts: Vec<usize>,
    /// Undrawn response indices; the next draw pops from the end.
    responses: Vec<usize>,
}

impl CardPool {
    pub fn new(deck: Arc<Deck>, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut prompts: Vec<usize> = (0..deck.prompts().len()).collect();
        prompts.shuffle(&mut rng);

        let mut responses: Vec<usize> = (0..deck.responses().len()).collect();
        responses.shuffle(&mut rng);

        Self {
            deck,
            seed,
            prompts,
            responses,
        }
    }

    pub fn deck_id(&self) -> &str {
        self.deck.id()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn remaining_prompts(&self) -> usize {
        self.prompts.len()
    }

    pub fn remaining_responses(&self) -> usize {
        self.responses.len()
    }

    /// Draw exactly `count` unused response cards. Draws nothing on failure.
    pub fn draw_response_cards(&mut self, count: usize) -> Result<Vec<ResponseCard>, DomainError> {
        if count > self.responses.len() {
            return Err(DomainError::conflict(
                ConflictKind::DeckExhausted,
                format!(
                    "deck {} has {} response cards left, {count} requested",
                    self.deck.id(),
                    self.responses.len()
                ),
            ));
        }

        let split = self.responses.len() - count;
        let drawn = self.responses.split_off(split);
        Ok(drawn
            .into_iter()
            .rev()
            .map(|idx| self.deck.responses()[idx].clone())
            .collect())
    }

    /// Draw one unused prompt card.
    pub fn draw_prompt_card(&mut self) -> Result<PromptCard, DomainError> {
        let idx = self.prompts.pop().ok_or_else(|| {
            DomainError::conflict(
                ConflictKind::DeckExhausted,
                format!("deck {} has no prompt cards left", self.deck.id()),
            )
        })?;
        Ok(self.deck.prompts()[idx].clone())
    }
}

//! Decks of prompt and response cards, and the catalog rooms draw from.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::cards::{PromptCard, ResponseCard};
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};

/// Id of the deck embedded in the binary.
pub const STANDARD_DECK_ID: &str = "standard";

const STANDARD_DECK_JSON: &str = include_str!("../../res/decks/standard.json");

/// On-disk deck format.
#[derive(Debug, Deserialize)]
struct DeckFile {
    id: String,
    name: String,
    prompts: Vec<String>,
    responses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    id: String,
    name: String,
    prompts: Vec<PromptCard>,
    responses: Vec<ResponseCard>,
}

impl Deck {
    /// Build a deck, rejecting blank ids and duplicate card text.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        prompts: Vec<String>,
        responses: Vec<String>,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(corrupt("deck id must not be blank"));
        }
        ensure_unique(&id, "prompt", &prompts)?;
        ensure_unique(&id, "response", &responses)?;

        Ok(Self {
            id,
            name: name.into(),
            prompts: prompts
                .into_iter()
                .enumerate()
                .map(|(i, text)| PromptCard { id: i as u32, text })
                .collect(),
            responses: responses
                .into_iter()
                .enumerate()
                .map(|(i, text)| ResponseCard { id: i as u32, text })
                .collect(),
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        let file: DeckFile = serde_json::from_str(raw)
            .map_err(|e| corrupt(format!("malformed deck json: {e}")))?;
        Self::new(file.id, file.name, file.prompts, file.responses)
    }

    pub fn standard() -> Result<Self, DomainError> {
        Self::from_json(STANDARD_DECK_JSON)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prompts(&self) -> &[PromptCard] {
        &self.prompts
    }

    pub fn responses(&self) -> &[ResponseCard] {
        &self.responses
    }
}

fn ensure_unique(deck_id: &str, what: &str, texts: &[String]) -> Result<(), DomainError> {
    let mut seen = HashSet::with_capacity(texts.len());
    for text in texts {
        if text.trim().is_empty() {
            return Err(corrupt(format!("deck {deck_id} has a blank {what} card")));
        }
        if !seen.insert(text.as_str()) {
            return Err(corrupt(format!(
                "deck {deck_id} repeats {what} card {text:?}"
            )));
        }
    }
    Ok(())
}

fn corrupt(detail: impl Into<String>) -> DomainError {
    DomainError::infra(InfraErrorKind::DataCorruption, detail)
}

/// Decks available to new rooms, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct DeckCatalog {
    decks: BTreeMap<String, Arc<Deck>>,
}

impl DeckCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding only the embedded standard deck.
    pub fn with_standard() -> Result<Self, DomainError> {
        let mut catalog = Self::new();
        catalog.insert(Deck::standard()?);
        Ok(catalog)
    }

    /// Add or replace a deck.
    pub fn insert(&mut self, deck: Deck) {
        self.decks.insert(deck.id.clone(), Arc::new(deck));
    }

    pub fn get(&self, id: &str) -> Result<Arc<Deck>, DomainError> {
        self.decks
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Deck, format!("no deck {id:?}")))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.decks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }
}

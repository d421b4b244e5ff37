//! Deck catalog assembly: the embedded standard deck plus any JSON decks in
//! a configured directory.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::domain::{Deck, DeckCatalog};
use crate::AppError;

pub fn load_deck_catalog(dir: Option<&Path>) -> Result<DeckCatalog, AppError> {
    let mut catalog = DeckCatalog::with_standard()?;
    let Some(dir) = dir else {
        return Ok(catalog);
    };

    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::config(format!("cannot read decks dir {}: {e}", dir.display())))?;
    let mut paths: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    for path in paths {
        let raw = fs::read_to_string(&path)
            .map_err(|e| AppError::config(format!("cannot read deck {}: {e}", path.display())))?;
        let deck = Deck::from_json(&raw)
            .map_err(|e| AppError::config(format!("invalid deck {}: {e}", path.display())))?;
        info!(
            deck_id = deck.id(),
            prompts = deck.prompts().len(),
            responses = deck.responses().len(),
            "loaded deck"
        );
        catalog.insert(deck);
    }
    Ok(catalog)
}

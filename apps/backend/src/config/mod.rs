pub mod decks;
pub mod server;

pub use decks::load_deck_catalog;
pub use server::ServerConfig;

//! Domain layer: pure game logic with no transport or storage concerns.

pub mod card_pool;
pub mod cards;
pub mod deck;
pub mod ids;
pub mod orchestrator;
pub mod room;
pub mod room_transition;
pub mod roster;
pub mod round;
pub mod snapshot;

#[cfg(test)]
mod test_state_helpers;
#[cfg(test)]
mod tests_round_flow;

// Re-exports for ergonomics
pub use card_pool::CardPool;
pub use cards::{CardRef, CardState, PromptCard, ResponseCard};
pub use deck::{Deck, DeckCatalog, STANDARD_DECK_ID};
pub use ids::{CardId, RoomKey, Seat, UserId};
pub use orchestrator::Departure;
pub use room::{Room, RoomOptions, RoomStatus, RoundOutcome, RoundRecord};
pub use room_transition::{derive_room_transitions, RoomLifecycleView, RoomTransition};
pub use roster::{AddOutcome, Participant, Roster};
pub use round::{Round, RoundPhase, Submission};
pub use snapshot::{project, summarize, RoomSnapshot, RoomSummary};

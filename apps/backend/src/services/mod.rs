pub mod game_flow;
pub mod room_registry;

pub use game_flow::{Caller, GameFlowService};
pub use room_registry::{Committed, RoomRegistry};

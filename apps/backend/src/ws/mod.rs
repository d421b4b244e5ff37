pub mod hub;
pub mod protocol;
pub mod session;

pub use hub::{RoomEvent, SessionHub};
pub use session::upgrade;

//! Error codes for the wizz backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP problem responses and websocket `error` frames.

use core::fmt;

use serde::{Serialize, Serializer};

/// Centralized error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,

    // Game rule rejections
    NotEligible,
    NotJudge,
    NotHost,
    AlreadyPlayed,
    AlreadyRevealed,
    PhaseMismatch,
    NotEnoughPlayers,
    InvalidOptions,
    /// General validation error
    ValidationError,
    /// Malformed request or frame
    BadRequest,

    // Resource Not Found
    RoomNotFound,
    UserNotFound,
    CardNotFound,
    DeckNotFound,

    // Conflicts
    RoomFull,
    AlreadyInRoom,
    DeckExhausted,

    // System Errors
    /// Internal server error
    InternalError,
    /// Configuration error
    ConfigError,
    /// Data corruption detected
    DataCorruption,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::NotEligible => "NOT_ELIGIBLE",
            Self::NotJudge => "NOT_JUDGE",
            Self::NotHost => "NOT_HOST",
            Self::AlreadyPlayed => "ALREADY_PLAYED",
            Self::AlreadyRevealed => "ALREADY_REVEALED",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::NotEnoughPlayers => "NOT_ENOUGH_PLAYERS",
            Self::InvalidOptions => "INVALID_OPTIONS",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::CardNotFound => "CARD_NOT_FOUND",
            Self::DeckNotFound => "DECK_NOT_FOUND",
            Self::RoomFull => "ROOM_FULL",
            Self::AlreadyInRoom => "ALREADY_IN_ROOM",
            Self::DeckExhausted => "DECK_EXHAUSTED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

//! Error types.
//!
//! The simulation itself never fails: collisions are state transitions and
//! rejected input is dropped. Errors only come from configuration, the local
//! record, and account handling.

use thiserror::Error;

/// Inconsistent [`crate::rules::Rules`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("grid of {grid_count} cells per side cannot hold a snake of length {initial_length}")]
    GridTooSmall { grid_count: i32, initial_length: usize },

    #[error("grid of {grid_count} cells per side exceeds the maximum of {max}")]
    GridTooLarge { grid_count: i32, max: i32 },

    #[error("food reward {reward} exceeds the maximum of {max}")]
    RewardTooLarge { reward: u32, max: u32 },

    #[error("speed floor {floor_ms} ms is above base speed {base_ms} ms")]
    FloorAboveBase { floor_ms: u32, base_ms: u32 },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("invalid rules document: {0}")]
    Parse(String),
}

/// Failures writing the local record.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to encode local record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Registration and login failures, surfaced to the user as messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("username and password are required")]
    MissingCredentials,

    #[error("username must be at least {0} characters")]
    UsernameTooShort(usize),

    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("username '{0}' is already registered")]
    UsernameTaken(String),

    #[error("wrong username or password")]
    InvalidCredentials,
}

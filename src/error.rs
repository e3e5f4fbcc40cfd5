//! Error types.
//!
//! Three kinds of failure exist in the engine:
//!
//! - **Validation** ([`RejectReason`]): a malformed or out-of-turn submission.
//!   Rejected locally, surfaced only to the submitting client, no state change.
//! - **Precondition**: advancing a phase before its deadline or after the game
//!   finished. These are not errors at all; see [`crate::rules::Advance::Ignored`].
//! - **Consistency** ([`EngineError::Corrupt`]): a game record missing expected
//!   structure. The transaction is abandoned and prior state is left untouched.

use thiserror::Error;

use crate::core::{GameId, PlayerId};

/// Message shown to players whenever a submission fails, whatever the cause.
pub const USER_FACING_FAILURE: &str = "this action could not be recorded";

/// Why a player's submission was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("{0} is not part of this game")]
    UnknownPlayer(PlayerId),

    #[error("{0} is not alive")]
    NotAlive(PlayerId),

    #[error("{0} is alive and cannot sit on the jury")]
    NotDead(PlayerId),

    #[error("this submission is not valid during the current phase")]
    WrongPhase,

    #[error("this role has no such ability")]
    NotYourAbility,

    #[error("invalid target {0}")]
    InvalidTarget(PlayerId),

    #[error("expected {expected} target(s), got {got}")]
    WrongTargetCount { expected: usize, got: usize },

    #[error("this ability can no longer be used")]
    AbilityExhausted,

    #[error("silenced players cannot vote today")]
    Silenced,

    #[error("the game has already started")]
    AlreadyStarted,

    #[error("the game is full")]
    GameFull,

    #[error("the name {0:?} is already taken")]
    NameTaken(String),

    #[error("need at least {need} players, have {have}")]
    NotEnoughPlayers { need: usize, have: usize },
}

/// Errors surfaced by the engine facade.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Validation failure, shown to the submitting client only.
    #[error("rejected: {0}")]
    Rejected(#[from] RejectReason),

    #[error("game {0} not found")]
    NotFound(GameId),

    /// The stored record is structurally broken. Operator logs only.
    #[error("inconsistent game record: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// The only message a player ever sees for a failed submission.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        USER_FACING_FAILURE
    }

    /// Whether this failure should be shown to the submitting client.
    #[must_use]
    pub fn is_client_visible(&self) -> bool {
        matches!(self, EngineError::Rejected(_))
    }
}

/// Persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another phase-advance committed first; the caller may retry.
    #[error("write conflict: expected version {expected}, found {found}")]
    Conflict { expected: u64, found: u64 },

    #[error("game {0} already exists")]
    Exists(GameId),

    #[error("game {0} not found")]
    Missing(GameId),

    #[error("record codec failure: {0}")]
    Codec(#[from] bincode::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Settings parsing and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid settings document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },
}

//! Game event log entries.
//!
//! Events are the only channel through which the presentation layer learns
//! what happened. They are immutable once appended. An event without a
//! recipient is globally visible; an event with a recipient is private.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::{DeathCause, PlayerId};
use crate::roles::RoleId;
use crate::rules::WinnerCode;

/// Kind of event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A new phase began.
    PhaseChange,
    /// Summary of a night's resolution.
    NightResult,
    /// A player died.
    Death,
    /// A player died because of a bond with another player.
    ChainDeath,
    /// Outcome of a day, tiebreak or jury vote.
    VoteResult,
    /// A role was revealed without a death.
    Reveal,
    /// Role-specific information (scry results, pairings, ...).
    Special,
    GameOver,
}

/// Structured event data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    /// Players involved, most relevant first.
    pub players: SmallVec<[PlayerId; 2]>,
    pub role: Option<RoleId>,
    pub cause: Option<DeathCause>,
    pub winner: Option<WinnerCode>,
}

/// An immutable log entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub round: u32,
    pub kind: EventKind,
    pub message: String,
    pub payload: EventPayload,
    /// `None` = visible to everyone.
    pub recipient: Option<PlayerId>,
}

impl GameEvent {
    /// Create a public event.
    pub fn new(round: u32, kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            round,
            kind,
            message: message.into(),
            payload: EventPayload::default(),
            recipient: None,
        }
    }

    /// Address the event to a single player (builder pattern).
    #[must_use]
    pub fn to(mut self, recipient: PlayerId) -> Self {
        self.recipient = Some(recipient);
        self
    }

    /// Add an involved player (builder pattern).
    #[must_use]
    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.payload.players.push(player);
        self
    }

    /// Attach a revealed role (builder pattern).
    #[must_use]
    pub fn with_role(mut self, role: RoleId) -> Self {
        self.payload.role = Some(role);
        self
    }

    /// Attach a death cause (builder pattern).
    #[must_use]
    pub fn with_cause(mut self, cause: DeathCause) -> Self {
        self.payload.cause = Some(cause);
        self
    }

    /// Attach a winner code (builder pattern).
    #[must_use]
    pub fn with_winner(mut self, winner: WinnerCode) -> Self {
        self.payload.winner = Some(winner);
        self
    }

    /// Whether `viewer` may see this event. `None` is an anonymous viewer.
    #[must_use]
    pub fn is_visible_to(&self, viewer: Option<PlayerId>) -> bool {
        match self.recipient {
            None => true,
            Some(recipient) => viewer == Some(recipient),
        }
    }

    #[must_use]
    pub fn is_private(&self) -> bool {
        self.recipient.is_some()
    }
}

//! Narration callbacks for computer-controlled players.

use thiserror::Error;

use crate::core::{GameEvent, PlayerPerspective};

/// Failure reported by a narrator. Logged by the engine, never retried.
#[derive(Debug, Error)]
#[error("narration failed: {0}")]
pub struct NarrationError(pub String);

/// Receives every committed event a bot is allowed to see.
///
/// Called after the write that produced the event has committed. The
/// perspective is the bot's sanitized view at that point; hidden roles are
/// never included.
pub trait Narrator: Send + Sync {
    fn narrate(&self, event: &GameEvent, perspective: &PlayerPerspective) -> Result<(), NarrationError>;
}

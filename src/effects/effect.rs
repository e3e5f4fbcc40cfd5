//! Effect definitions.
//!
//! Effects are the values role hooks return instead of mutating the game.
//! The night pipeline folds them into a
//! [`ResolutionContext`](super::ResolutionContext); the death resolver applies
//! the ones produced by death hooks directly.

use serde::{Deserialize, Serialize};

use crate::core::{DeathCause, GameEvent, PlayerId, PlayerUpdate, Protection, RoundFlag};
use crate::roles::RoleId;

/// An atomic game effect.
///
/// ## Night Effects
///
/// - `Protect`: Grant a protection to a target for this night
/// - `MarkDeath`: Mark a target to die, unless protected or later saved
/// - `Unmark`: Remove an existing stoppable mark (antidote)
/// - `Block`: Prevent a player's own action from resolving this night
///
/// ## State Effects
///
/// - `Update`: Change a player's private counters
/// - `Transform`: Change a player's role and team in place
/// - `Revive`: Bring a dead player back
/// - `Flag`: Set a game-level round effect
///
/// ## Output
///
/// - `HunterPending`: Queue a hunter's last shot
/// - `Event`: Append to the game log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    // === Night ===
    Protect { target: PlayerId, kind: Protection },

    MarkDeath { target: PlayerId, cause: DeathCause },

    Unmark { target: PlayerId },

    Block { target: PlayerId },

    // === State ===
    Update { target: PlayerId, update: PlayerUpdate },

    Transform { target: PlayerId, role: RoleId },

    Revive { target: PlayerId },

    Flag(RoundFlag),

    // === Output ===
    HunterPending { hunter: PlayerId },

    Event(GameEvent),
}

impl Effect {
    /// Create a death mark.
    pub fn kill(target: PlayerId, cause: DeathCause) -> Self {
        Self::MarkDeath { target, cause }
    }

    /// Create a protection grant.
    pub fn protect(target: PlayerId, kind: Protection) -> Self {
        Self::Protect { target, kind }
    }

    /// Create a private-state update.
    pub fn update(target: PlayerId, update: PlayerUpdate) -> Self {
        Self::Update { target, update }
    }

    /// The player this effect acts on, if any.
    #[must_use]
    pub fn target(&self) -> Option<PlayerId> {
        match self {
            Effect::Protect { target, .. }
            | Effect::MarkDeath { target, .. }
            | Effect::Unmark { target }
            | Effect::Block { target }
            | Effect::Update { target, .. }
            | Effect::Transform { target, .. }
            | Effect::Revive { target } => Some(*target),
            Effect::HunterPending { hunter } => Some(*hunter),
            Effect::Flag(_) | Effect::Event(_) => None,
        }
    }
}

impl From<GameEvent> for Effect {
    fn from(event: GameEvent) -> Self {
        Effect::Event(event)
    }
}

/// An ordered batch of effects returned by a single hook.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectBatch {
    effects: Vec<Effect>,
}

impl EffectBatch {
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self { effects: Vec::new() }
    }

    /// Add an effect.
    pub fn add(&mut self, effect: impl Into<Effect>) {
        self.effects.push(effect.into());
    }

    /// Add an effect (builder pattern).
    #[must_use]
    pub fn with(mut self, effect: impl Into<Effect>) -> Self {
        self.add(effect);
        self
    }

    /// Iterate over effects.
    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Get number of effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }
}

impl From<Effect> for EffectBatch {
    fn from(effect: Effect) -> Self {
        Self { effects: vec![effect] }
    }
}

impl From<GameEvent> for EffectBatch {
    fn from(event: GameEvent) -> Self {
        Effect::Event(event).into()
    }
}

impl FromIterator<Effect> for EffectBatch {
    fn from_iter<I: IntoIterator<Item = Effect>>(iter: I) -> Self {
        Self {
            effects: iter.into_iter().collect(),
        }
    }
}

impl Extend<Effect> for EffectBatch {
    fn extend<I: IntoIterator<Item = Effect>>(&mut self, iter: I) {
        self.effects.extend(iter);
    }
}

impl IntoIterator for EffectBatch {
    type Item = Effect;
    type IntoIter = std::vec::IntoIter<Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.effects.into_iter()
    }
}

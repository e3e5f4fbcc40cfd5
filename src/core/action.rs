//! Action representation: kind + typed target list.
//!
//! Actions are compositional: an [`ActionKind`] (the "verb") plus player
//! targets (the "nouns"). For example:
//! - "Guard X" = `Guard` + 1 target
//! - "Pair X with Y" = `Pair` + 2 targets
//! - "Wolves kill X (and Y on a double-kill night)" = `WolfKill` + 1..=2 targets
//!
//! Night actions resolve in the order given by [`ActionKind::priority`],
//! never in submission order.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::PlayerId;

/// Target list for an action.
///
/// SmallVec avoids a heap allocation for the common 1-2 target case.
pub type Targets = SmallVec<[PlayerId; 2]>;

/// Every night ability in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionKind {
    // === Bonds / setup ===
    Pair,
    Link,

    // === Control ===
    Exile,
    Silence,

    // === Protection ===
    Bless,
    Guard,
    Heal,

    // === Information ===
    Scry,
    Investigate,
    Search,

    // === Recruitment ===
    Recruit,

    // === Lethal ===
    WolfKill,
    Poison,
    Bite,
    FaeKill,

    // === Saves ===
    Antidote,

    // === Resurrection ===
    Resurrect,

    // === Prediction ===
    Predict,
}

impl ActionKind {
    /// Resolution priority (lower resolves first).
    ///
    /// Protections must be in place before lethal actions, and saves must run
    /// after marks exist but before they are committed.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            ActionKind::Pair | ActionKind::Link => 0,
            ActionKind::Exile | ActionKind::Silence => 1,
            ActionKind::Bless | ActionKind::Guard | ActionKind::Heal => 2,
            ActionKind::Scry | ActionKind::Investigate | ActionKind::Search => 3,
            ActionKind::Recruit => 4,
            ActionKind::WolfKill | ActionKind::Poison | ActionKind::Bite | ActionKind::FaeKill => 5,
            ActionKind::Antidote => 6,
            ActionKind::Resurrect => 7,
            ActionKind::Predict => 8,
        }
    }

    /// Inclusive range of accepted target counts.
    #[must_use]
    pub const fn target_range(self) -> (usize, usize) {
        match self {
            ActionKind::Pair | ActionKind::Investigate => (2, 2),
            ActionKind::WolfKill => (1, 2),
            _ => (1, 1),
        }
    }

    /// Whether targets must be dead rather than alive.
    #[must_use]
    pub const fn targets_dead(self) -> bool {
        matches!(self, ActionKind::Resurrect)
    }

    /// Whether the acting player may name themself.
    #[must_use]
    pub const fn allows_self_target(self) -> bool {
        matches!(
            self,
            ActionKind::Pair | ActionKind::Bless | ActionKind::Heal | ActionKind::Antidote
        )
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ActionKind::Pair => "pair",
            ActionKind::Link => "link",
            ActionKind::Exile => "exile",
            ActionKind::Silence => "silence",
            ActionKind::Bless => "bless",
            ActionKind::Guard => "guard",
            ActionKind::Heal => "heal",
            ActionKind::Scry => "scry",
            ActionKind::Investigate => "investigate",
            ActionKind::Search => "search",
            ActionKind::Recruit => "recruit",
            ActionKind::WolfKill => "wolf_kill",
            ActionKind::Poison => "poison",
            ActionKind::Bite => "bite",
            ActionKind::FaeKill => "fae_kill",
            ActionKind::Antidote => "antidote",
            ActionKind::Resurrect => "resurrect",
            ActionKind::Predict => "predict",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A submitted night action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightAction {
    /// Round the action was submitted for.
    pub round: u32,

    /// The acting player.
    pub actor: PlayerId,

    pub kind: ActionKind,

    pub targets: Targets,

    /// Submission time in milliseconds. Kept for audit; never used for ordering.
    pub submitted_at: u64,
}

impl NightAction {
    /// Create an action.
    #[must_use]
    pub fn new(round: u32, actor: PlayerId, kind: ActionKind, targets: &[PlayerId]) -> Self {
        Self {
            round,
            actor,
            kind,
            targets: SmallVec::from_slice(targets),
            submitted_at: 0,
        }
    }

    /// Set the submission timestamp (builder pattern).
    #[must_use]
    pub fn at(mut self, submitted_at: u64) -> Self {
        self.submitted_at = submitted_at;
        self
    }

    /// The first target, if any.
    #[must_use]
    pub fn target(&self) -> Option<PlayerId> {
        self.targets.first().copied()
    }

    /// Ordering key: priority table first, then join order. Submission time
    /// never participates.
    #[must_use]
    pub fn resolution_key(&self) -> (u8, PlayerId) {
        (self.kind.priority(), self.actor)
    }
}

/// Anything a player can submit through the engine's single action entry point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// A night ability.
    Night { kind: ActionKind, targets: Targets },
    /// A day, tiebreak or jury vote.
    Vote { target: PlayerId },
    /// The hunter's last shot.
    Shoot { target: PlayerId },
}

impl Command {
    /// Convenience constructor for night abilities.
    #[must_use]
    pub fn night(kind: ActionKind, targets: &[PlayerId]) -> Self {
        Command::Night {
            kind,
            targets: SmallVec::from_slice(targets),
        }
    }
}

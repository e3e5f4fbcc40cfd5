//! # nightfall
//!
//! An authoritative rules engine for werewolf-style social-deduction games.
//!
//! ## Design Principles
//!
//! 1. **Resolve Exactly Once**: Actions arrive asynchronously but a round's
//!    night is folded as one ordered batch at the phase transition.
//!
//! 2. **Effects, Not Mutation**: Role hooks return [`EffectBatch`] values.
//!    Only the resolution pipeline writes to the game.
//!
//! 3. **Closed Dispatch**: Every role is a variant of [`RoleId`]. Unknown or
//!    unassigned roles resolve to the plain villager behavior.
//!
//! ## Architecture
//!
//! - **Priority Ordering**: Night actions resolve by a fixed priority table,
//!   never by submission time.
//!
//! - **Kill Queue**: Deaths are committed through a worklist that follows
//!   lover, twin and soul links and visits each player at most once.
//!
//! - **Staged Transactions**: The engine mutates a clone of the game (cheap
//!   thanks to `im-rs` persistent logs) and writes it back conditionally.
//!
//! ## Modules
//!
//! - `core`: Players, game state, actions, events, views, RNG, settings
//! - `roles`: Role identifiers and behaviors
//! - `effects`: Effect values and the night resolution context
//! - `resolution`: Night pipeline and death resolver
//! - `rules`: Victory, votes, phase machine, submissions, setup, admin
//! - `objectives`: Secret per-player bonus goals
//! - `engine`: Transactional facade over a store and a narrator

pub mod core;
pub mod roles;
pub mod effects;
pub mod resolution;
pub mod rules;
pub mod objectives;
pub mod engine;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    ActionKind, Command, DeathCause, EventKind, Game, GameEvent, GameId, GameRng, GameSettings,
    NightAction, Phase, Player, PlayerId, PlayerPerspective, PublicPlayerView,
};

pub use crate::roles::{behavior, RoleBehavior, RoleId, Team};

pub use crate::effects::{Effect, EffectBatch};

pub use crate::resolution::{resolve_night, DeathReport, DeathResolver, NightReport};

pub use crate::rules::{
    Advance, AdvanceTrigger, GameBuilder, Submission, Tally, Victory, WinEvaluator, WinnerCode,
};

pub use crate::objectives::{ObjectiveId, ObjectiveResult, SecretObjective};

pub use crate::engine::{Engine, GameStore, MemoryStore, NarrationError, Narrator, Versioned};

pub use crate::error::{ConfigError, EngineError, RejectReason, StoreError};

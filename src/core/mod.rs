//! Core engine types: players, state, actions, events, RNG, configuration.
//!
//! These are the building blocks every other module works on. Role-specific
//! behavior never lives here; roles configure it through `roles` instead.

pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod event;
pub mod state;
pub mod view;

pub use player::{DeathCause, DeathRecord, Player, PlayerId, PlayerState, PlayerUpdate, Protection};
pub use rng::GameRng;
pub use config::{GameSettings, PhaseDurations};
pub use action::{ActionKind, Command, NightAction, Targets};
pub use event::{EventKind, EventPayload, GameEvent};
pub use state::{Game, GameId, HunterInterrupt, Phase, ResumeMode, RoundEffects, RoundFlag};
pub use view::{PlayerPerspective, PublicPlayerView};

//! Effect system for role abilities.
//!
//! Role hooks describe what should happen; they never touch the game:
//! - `Effect`: Enumeration of everything a hook can ask for
//! - `EffectBatch`: Ordered effects returned by one hook
//! - `ResolutionContext`: Where the night pipeline folds them
//! - `NightView`: Read-only game + context view given to behaviors
//!
//! ## Design Philosophy
//!
//! Because hooks are pure, the only thing that decides a night's outcome is
//! the order actions are folded in. That order is fixed by
//! [`ActionKind::priority`](crate::core::ActionKind::priority).

mod effect;
mod context;

pub use effect::{Effect, EffectBatch};
pub use context::{FoldResult, NightView, ResolutionContext};

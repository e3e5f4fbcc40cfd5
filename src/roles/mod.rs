//! Roles: identifiers, teams and behaviors.
//!
//! - `RoleId`: Closed set of every role the engine knows
//! - `RoleBehavior`: Hooks a role can override (night action, death, win)
//! - `behavior`: Static registry from role to behavior
//!
//! Roles without a special ability share the [`Plain`] behavior, which is
//! also what an unassigned or unrecognized role resolves to.

pub mod role;
pub mod behavior;
pub mod registry;
pub mod wolves;
pub mod village;
pub mod solo;

pub use role::{RoleId, Team};
pub use behavior::{Plain, RoleBehavior};
pub use registry::{behavior, behavior_of};
pub use solo::BITE_THRESHOLD;

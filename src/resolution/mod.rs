//! Resolution systems.
//!
//! - `night`: Priority-ordered fold of a round's night actions
//! - `deaths`: Kill queue with cascades and the reveal exception
//!
//! Both write only to the game they are handed. The engine hands them a
//! staged copy and discards it if anything fails.

pub mod night;
pub mod deaths;

pub use night::{resolve_night, NightReport};
pub use deaths::{DeathReport, DeathResolver};

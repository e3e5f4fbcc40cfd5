//! Game rules layered over the resolution pipeline.
//!
//! - `setup`: Dealing roles and objectives, fixed-table builder
//! - `submit`: Validating and recording player commands
//! - `votes`: Voter eligibility and tallies
//! - `phase`: The phase state machine, the only writer of phase and round
//! - `victory`: Win conditions, checked after every death-producing step
//! - `admin`: Host overrides

pub mod setup;
pub mod submit;
pub mod votes;
pub mod phase;
pub mod victory;
pub mod admin;

pub use setup::{assign_roles, GameBuilder};
pub use submit::{can_act, check_night_action, submit, Submission};
pub use votes::Tally;
pub use phase::{advance, everyone_acted, start, Advance, AdvanceTrigger};
pub use victory::{Victory, WinEvaluator, WinnerCode};
pub use admin::{force_death, reveal_role};

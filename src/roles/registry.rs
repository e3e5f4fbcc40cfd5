//! Role behavior registry.
//!
//! A static table indexed by [`RoleId`] discriminant. Lookups never fail: an
//! unassigned role resolves to the plain villager behavior.

use crate::core::Player;

use super::behavior::{Plain, RoleBehavior};
use super::role::RoleId;
use super::{solo, village, wolves};

/// Behaviors in [`RoleId::ALL`] order.
static REGISTRY: [&dyn RoleBehavior; 25] = [
    &Plain(RoleId::Villager),
    &wolves::Werewolf,
    &wolves::WolfCub,
    &Plain(RoleId::Cursed),
    &village::Seer,
    &village::ApprenticeSeer,
    &village::Doctor,
    &village::Bodyguard,
    &village::Priest,
    &village::Witch,
    &village::Hunter,
    &village::Cupid,
    &Plain(RoleId::Twin),
    &village::Prince,
    &village::Leper,
    &village::Detective,
    &village::Exiler,
    &village::Silencer,
    &village::Medium,
    &village::Prophet,
    &solo::Fool,
    &solo::Vampire,
    &solo::CultLeader,
    &solo::Fairy,
    &solo::Soulbinder,
];

/// Look up the behavior of a role.
///
/// ```
/// use nightfall::roles::{behavior, RoleId};
///
/// assert!(behavior(Some(RoleId::Fool)).wins_when_lynched());
/// assert_eq!(behavior(None).role(), RoleId::Villager);
/// ```
#[must_use]
pub fn behavior(role: Option<RoleId>) -> &'static dyn RoleBehavior {
    REGISTRY[role.unwrap_or(RoleId::Villager) as usize]
}

/// Look up the behavior of a player's current role.
#[must_use]
pub fn behavior_of(player: &Player) -> &'static dyn RoleBehavior {
    behavior(player.role())
}

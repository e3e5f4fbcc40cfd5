//! The role behavior contract.
//!
//! Every role implements [`RoleBehavior`]. All hooks default to no-ops, so a
//! role only overrides what it actually does. Hooks return effects and never
//! mutate the game.

use crate::core::{ActionKind, DeathCause, Game, NightAction, Player, PlayerId};
use crate::effects::{EffectBatch, NightView};
use crate::error::RejectReason;
use crate::rules::Victory;

use super::RoleId;

/// Behavior attached to a role.
///
/// ## Implementation Notes
///
/// - `allowed_actions`: Night abilities the role may submit
/// - `check_ability`: Role-specific validation on top of the generic target
///   checks (spent potions, first-night-only abilities, ...)
/// - `night_action`: Must be a pure function of the view and the action
/// - `on_death`: Runs once, when the player is committed dead
pub trait RoleBehavior: Sync {
    fn role(&self) -> RoleId;

    /// Night abilities this role may submit.
    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[]
    }

    /// Role-specific submission checks. Runs after the generic checks pass.
    fn check_ability(
        &self,
        _game: &Game,
        _actor: &Player,
        _kind: ActionKind,
        _targets: &[PlayerId],
    ) -> Result<(), RejectReason> {
        Ok(())
    }

    /// Resolve one submitted action against the current night.
    fn night_action(&self, _view: &NightView<'_>, _action: &NightAction) -> EffectBatch {
        EffectBatch::new()
    }

    /// Effects triggered by this player's death.
    fn on_death(&self, _game: &Game, _player: &Player, _cause: DeathCause) -> EffectBatch {
        EffectBatch::new()
    }

    /// Whether the player survives `cause` by revealing their role instead.
    fn reveals_instead_of_death(&self, _player: &Player, _cause: DeathCause) -> bool {
        false
    }

    /// Whether being lynched wins the game for this player.
    fn wins_when_lynched(&self) -> bool {
        false
    }

    /// Individual win condition, checked before the team rule.
    fn check_win(&self, _game: &Game, _player: &Player) -> Option<Victory> {
        None
    }
}

/// Behavior of roles with no special ability.
#[derive(Clone, Copy, Debug)]
pub struct Plain(pub RoleId);

impl RoleBehavior for Plain {
    fn role(&self) -> RoleId {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::GameBuilder;

    #[test]
    fn test_plain_behavior_is_inert() {
        let game = GameBuilder::new()
            .player("Wolf", RoleId::Werewolf)
            .player("Vera", RoleId::Villager)
            .player("Vic", RoleId::Villager)
            .build();
        let vera = game.player(PlayerId::new(1)).unwrap();
        let plain = Plain(RoleId::Villager);

        assert!(plain.allowed_actions().is_empty());
        assert!(plain.on_death(&game, vera, DeathCause::WolfKill).is_empty());
        assert!(!plain.reveals_instead_of_death(vera, DeathCause::Lynch));
        assert!(!plain.wins_when_lynched());
        assert!(plain.check_win(&game, vera).is_none());
    }
}

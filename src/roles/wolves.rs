//! The threat team: werewolves and the wolf cub.
//!
//! Wolves act as a pack. The night pipeline merges every wolf's submission
//! into one action before dispatching it here, so `night_action` always sees
//! the pack's final target list.

use crate::core::{ActionKind, DeathCause, EventKind, Game, GameEvent, NightAction, Player, PlayerId, RoundFlag};
use crate::effects::{Effect, EffectBatch, NightView};
use crate::error::RejectReason;

use super::behavior::RoleBehavior;
use super::role::RoleId;

const PACK_ACTIONS: &[ActionKind] = &[ActionKind::WolfKill];

#[derive(Clone, Copy, Debug)]
pub struct Werewolf;

#[derive(Clone, Copy, Debug)]
pub struct WolfCub;

/// Wolves may not target the pack, and may only name a second victim when
/// the pack is owed a double kill.
fn check_pack_targets(game: &Game, targets: &[PlayerId]) -> Result<(), RejectReason> {
    if let Some(&wolf) = targets
        .iter()
        .find(|&&t| game.player(t).is_some_and(Player::is_threat))
    {
        return Err(RejectReason::InvalidTarget(wolf));
    }

    let allowed = game.round_effects().pack_quota(game.round()).max(1);
    if targets.len() > allowed {
        return Err(RejectReason::WrongTargetCount {
            expected: allowed,
            got: targets.len(),
        });
    }
    Ok(())
}

/// Resolve the merged pack action.
///
/// An unshielded cursed target joins the pack instead of dying.
fn pack_kill(view: &NightView<'_>, action: &NightAction) -> EffectBatch {
    let mut effects = EffectBatch::new();
    for &target in &action.targets {
        if view.team_of(target).is_threat() {
            continue;
        }
        if view.role_of(target) == RoleId::Cursed && !view.is_shielded(target) {
            effects.add(Effect::Transform {
                target,
                role: RoleId::Werewolf,
            });
            effects.add(
                GameEvent::new(
                    view.round(),
                    EventKind::Special,
                    "The wolves came for you, but the curse answered. You are a Werewolf now.",
                )
                .to(target)
                .with_role(RoleId::Werewolf),
            );
        } else {
            effects.add(Effect::kill(target, DeathCause::WolfKill));
        }
    }
    effects
}

impl RoleBehavior for Werewolf {
    fn role(&self) -> RoleId {
        RoleId::Werewolf
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        PACK_ACTIONS
    }

    fn check_ability(
        &self,
        game: &Game,
        _actor: &Player,
        _kind: ActionKind,
        targets: &[PlayerId],
    ) -> Result<(), RejectReason> {
        check_pack_targets(game, targets)
    }

    fn night_action(&self, view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        pack_kill(view, action)
    }
}

impl RoleBehavior for WolfCub {
    fn role(&self) -> RoleId {
        RoleId::WolfCub
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        PACK_ACTIONS
    }

    fn check_ability(
        &self,
        game: &Game,
        _actor: &Player,
        _kind: ActionKind,
        targets: &[PlayerId],
    ) -> Result<(), RejectReason> {
        check_pack_targets(game, targets)
    }

    fn night_action(&self, view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        pack_kill(view, action)
    }

    /// The pack takes two victims on the night after the cub dies.
    fn on_death(&self, game: &Game, _player: &Player, _cause: DeathCause) -> EffectBatch {
        Effect::Flag(RoundFlag::DoubleKill {
            round: game.round() + 1,
        })
        .into()
    }
}

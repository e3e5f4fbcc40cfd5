//! Roles with their own win conditions, and the soulbinder.

use crate::core::{
    ActionKind, DeathCause, EventKind, Game, GameEvent, NightAction, Player, PlayerId, PlayerUpdate,
    RoundFlag,
};
use crate::effects::{Effect, EffectBatch, NightView};
use crate::error::RejectReason;
use crate::rules::{Victory, WinnerCode};

use super::behavior::RoleBehavior;
use super::role::RoleId;

/// Bites a victim must receive before dying.
pub const BITE_THRESHOLD: u8 = 3;

/// Wins by being lynched.
#[derive(Clone, Copy, Debug)]
pub struct Fool;

impl RoleBehavior for Fool {
    fn role(&self) -> RoleId {
        RoleId::Fool
    }

    fn wins_when_lynched(&self) -> bool {
        true
    }
}

// =============================================================================
// Vampire
// =============================================================================

/// Bites one player a night. The third bite on the same player kills them
/// and ignores every protection.
#[derive(Clone, Copy, Debug)]
pub struct Vampire;

impl Vampire {
    /// Players this vampire has killed by biting.
    fn kills(game: &Game, vampire: PlayerId) -> usize {
        game.dead()
            .filter(|p| {
                p.death()
                    .is_some_and(|d| d.cause == DeathCause::Bite { by: vampire })
            })
            .count()
    }
}

impl RoleBehavior for Vampire {
    fn role(&self) -> RoleId {
        RoleId::Vampire
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[ActionKind::Bite]
    }

    fn night_action(&self, view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        let Some(target) = action.target() else {
            return EffectBatch::new();
        };
        let mut effects = EffectBatch::new().with(Effect::update(target, PlayerUpdate::IncrementBite));
        if view.bite_count(target).saturating_add(1) >= BITE_THRESHOLD {
            effects.add(Effect::kill(target, DeathCause::Bite { by: action.actor }));
        }
        effects
    }

    fn check_win(&self, game: &Game, player: &Player) -> Option<Victory> {
        let quota = game.settings().vampire_kill_quota as usize;
        if !player.is_alive() || Self::kills(game, player.id) < quota {
            return None;
        }
        Some(Victory::new(
            WinnerCode::Vampire,
            format!("{} has drained enough victims. The Vampire wins!", player.name),
            vec![player.id],
        ))
    }
}

// =============================================================================
// Cult leader
// =============================================================================

/// Converts one player a night; wins once every other survivor is converted.
#[derive(Clone, Copy, Debug)]
pub struct CultLeader;

impl RoleBehavior for CultLeader {
    fn role(&self) -> RoleId {
        RoleId::CultLeader
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[ActionKind::Recruit]
    }

    fn check_ability(
        &self,
        game: &Game,
        _actor: &Player,
        _kind: ActionKind,
        targets: &[PlayerId],
    ) -> Result<(), RejectReason> {
        for &target in targets {
            let ineligible = game
                .player(target)
                .map_or(true, |p| p.is_threat() || p.state().converted);
            if ineligible {
                return Err(RejectReason::InvalidTarget(target));
            }
        }
        Ok(())
    }

    fn night_action(&self, view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        let Some(target) = action.target() else {
            return EffectBatch::new();
        };
        if view.team_of(target).is_threat() {
            return EffectBatch::new();
        }
        EffectBatch::new()
            .with(Effect::update(target, PlayerUpdate::Convert))
            .with(
                GameEvent::new(view.round(), EventKind::Special, "You have been recruited into the cult.")
                    .to(target),
            )
    }

    fn check_win(&self, game: &Game, player: &Player) -> Option<Victory> {
        if !player.is_alive() || game.living_count() < 2 {
            return None;
        }
        let all_converted = game
            .alive()
            .filter(|p| p.id != player.id)
            .all(|p| p.state().converted);
        if !all_converted {
            return None;
        }
        let winners = game
            .players()
            .iter()
            .filter(|p| p.id == player.id || p.state().converted)
            .map(|p| p.id)
            .collect();
        Some(Victory::new(
            WinnerCode::Cult,
            format!("Every survivor follows {}. The cult wins!", player.name),
            winners,
        ))
    }
}

// =============================================================================
// Fairy
// =============================================================================

/// Fairies are dealt in pairs. They search for each other; once found they
/// share one kill a night and win together as the last two alive.
#[derive(Clone, Copy, Debug)]
pub struct Fairy;

impl RoleBehavior for Fairy {
    fn role(&self) -> RoleId {
        RoleId::Fairy
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[ActionKind::Search, ActionKind::FaeKill]
    }

    fn check_ability(
        &self,
        game: &Game,
        _actor: &Player,
        kind: ActionKind,
        targets: &[PlayerId],
    ) -> Result<(), RejectReason> {
        let found = game.round_effects().fairy_pair_found;
        match kind {
            ActionKind::Search if found => Err(RejectReason::AbilityExhausted),
            ActionKind::FaeKill if !found => Err(RejectReason::NotYourAbility),
            ActionKind::FaeKill => match targets
                .iter()
                .find(|&&t| game.player(t).and_then(Player::role) == Some(RoleId::Fairy))
            {
                Some(&fairy) => Err(RejectReason::InvalidTarget(fairy)),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }

    fn night_action(&self, view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        let Some(target) = action.target() else {
            return EffectBatch::new();
        };
        match action.kind {
            ActionKind::Search => {
                let round = view.round();
                if view.role_of(target) != RoleId::Fairy {
                    return GameEvent::new(
                        round,
                        EventKind::Special,
                        format!("{} is not the other fairy.", view.name(target)),
                    )
                    .to(action.actor)
                    .into();
                }
                let mut effects = EffectBatch::new().with(Effect::Flag(RoundFlag::FairyPairFound));
                for (fairy, other) in [(action.actor, target), (target, action.actor)] {
                    effects.add(
                        GameEvent::new(
                            round,
                            EventKind::Special,
                            format!("You found the other fairy: {}.", view.name(other)),
                        )
                        .to(fairy)
                        .with_player(other)
                        .with_role(RoleId::Fairy),
                    );
                }
                effects
            }
            ActionKind::FaeKill if !view.fae_kill_used() => Effect::kill(target, DeathCause::FaeKill).into(),
            _ => EffectBatch::new(),
        }
    }
}

// =============================================================================
// Soulbinder
// =============================================================================

/// Links their soul to one player on the first night. When the soulbinder
/// dies, the linked player dies too; the link does not run the other way.
#[derive(Clone, Copy, Debug)]
pub struct Soulbinder;

impl RoleBehavior for Soulbinder {
    fn role(&self) -> RoleId {
        RoleId::Soulbinder
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[ActionKind::Link]
    }

    fn check_ability(
        &self,
        game: &Game,
        actor: &Player,
        _kind: ActionKind,
        _targets: &[PlayerId],
    ) -> Result<(), RejectReason> {
        if game.round() != 1 || actor.state().soul_link.is_some() {
            Err(RejectReason::AbilityExhausted)
        } else {
            Ok(())
        }
    }

    fn night_action(&self, view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        let Some(target) = action.target() else {
            return EffectBatch::new();
        };
        EffectBatch::new()
            .with(Effect::update(action.actor, PlayerUpdate::SetSoulLink(target)))
            .with(
                GameEvent::new(
                    view.round(),
                    EventKind::Special,
                    format!("Your soul is now bound to {}.", view.name(target)),
                )
                .to(action.actor)
                .with_player(target),
            )
    }
}

//! Village roles with night abilities or death hooks.

use crate::core::{
    ActionKind, DeathCause, EventKind, Game, GameEvent, NightAction, Player, PlayerId, PlayerUpdate,
    Protection, RoundFlag,
};
use crate::effects::{Effect, EffectBatch, NightView};
use crate::error::RejectReason;

use super::behavior::RoleBehavior;
use super::role::RoleId;

fn private(view: &NightView<'_>, to: PlayerId, message: String) -> GameEvent {
    GameEvent::new(view.round(), EventKind::Special, message).to(to)
}

/// Shared by the seer and the apprentice.
fn scry(view: &NightView<'_>, action: &NightAction) -> EffectBatch {
    let Some(target) = action.target() else {
        return EffectBatch::new();
    };
    let name = view.name(target);
    if view.team_of(target).is_threat() {
        EffectBatch::new()
            .with(Effect::update(action.actor, PlayerUpdate::FoundWolf))
            .with(private(view, action.actor, format!("{name} is a Werewolf.")).with_player(target))
    } else {
        private(view, action.actor, format!("{name} is not a Werewolf."))
            .with_player(target)
            .into()
    }
}

// =============================================================================
// Information
// =============================================================================

#[derive(Clone, Copy, Debug)]
pub struct Seer;

impl RoleBehavior for Seer {
    fn role(&self) -> RoleId {
        RoleId::Seer
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[ActionKind::Scry]
    }

    fn night_action(&self, view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        scry(view, action)
    }

    fn on_death(&self, _game: &Game, _player: &Player, _cause: DeathCause) -> EffectBatch {
        Effect::Flag(RoundFlag::SeerDied).into()
    }
}

/// Inherits the scry once the seer is dead.
#[derive(Clone, Copy, Debug)]
pub struct ApprenticeSeer;

impl RoleBehavior for ApprenticeSeer {
    fn role(&self) -> RoleId {
        RoleId::ApprenticeSeer
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[ActionKind::Scry]
    }

    fn check_ability(
        &self,
        game: &Game,
        _actor: &Player,
        _kind: ActionKind,
        _targets: &[PlayerId],
    ) -> Result<(), RejectReason> {
        if game.round_effects().seer_died {
            Ok(())
        } else {
            Err(RejectReason::NotYourAbility)
        }
    }

    fn night_action(&self, view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        scry(view, action)
    }
}

/// Learns whether two players are on the same side.
#[derive(Clone, Copy, Debug)]
pub struct Detective;

impl RoleBehavior for Detective {
    fn role(&self) -> RoleId {
        RoleId::Detective
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[ActionKind::Investigate]
    }

    fn check_ability(
        &self,
        _game: &Game,
        _actor: &Player,
        _kind: ActionKind,
        targets: &[PlayerId],
    ) -> Result<(), RejectReason> {
        match targets {
            [a, b] if a == b => Err(RejectReason::InvalidTarget(*b)),
            _ => Ok(()),
        }
    }

    fn night_action(&self, view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        let [a, b] = action.targets.as_slice() else {
            return EffectBatch::new();
        };
        let verdict = if view.team_of(*a) == view.team_of(*b) {
            "are on the same side"
        } else {
            "are on different sides"
        };
        let message = format!("{} and {} {verdict}.", view.name(*a), view.name(*b));
        private(view, action.actor, message)
            .with_player(*a)
            .with_player(*b)
            .into()
    }
}

// =============================================================================
// Protection
// =============================================================================

/// Heals one player a night, never the same player two nights running.
#[derive(Clone, Copy, Debug)]
pub struct Doctor;

impl RoleBehavior for Doctor {
    fn role(&self) -> RoleId {
        RoleId::Doctor
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[ActionKind::Heal]
    }

    fn check_ability(
        &self,
        game: &Game,
        actor: &Player,
        _kind: ActionKind,
        targets: &[PlayerId],
    ) -> Result<(), RejectReason> {
        match (actor.state().last_heal, targets.first()) {
            (Some((round, last)), Some(&target)) if round + 1 == game.round() && last == target => {
                Err(RejectReason::InvalidTarget(target))
            }
            _ => Ok(()),
        }
    }

    fn night_action(&self, view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        let Some(target) = action.target() else {
            return EffectBatch::new();
        };
        EffectBatch::new()
            .with(Effect::protect(target, Protection::Heal))
            .with(Effect::update(
                action.actor,
                PlayerUpdate::RecordHeal {
                    round: view.round(),
                    target,
                },
            ))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Bodyguard;

impl RoleBehavior for Bodyguard {
    fn role(&self) -> RoleId {
        RoleId::Bodyguard
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[ActionKind::Guard]
    }

    fn night_action(&self, _view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        action
            .target()
            .map(|target| Effect::protect(target, Protection::Guard).into())
            .unwrap_or_default()
    }
}

/// One blessing per game; a bless also stops poison.
#[derive(Clone, Copy, Debug)]
pub struct Priest;

impl RoleBehavior for Priest {
    fn role(&self) -> RoleId {
        RoleId::Priest
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[ActionKind::Bless]
    }

    fn check_ability(
        &self,
        _game: &Game,
        actor: &Player,
        _kind: ActionKind,
        _targets: &[PlayerId],
    ) -> Result<(), RejectReason> {
        if actor.state().blessing_used {
            Err(RejectReason::AbilityExhausted)
        } else {
            Ok(())
        }
    }

    fn night_action(&self, _view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        let Some(target) = action.target() else {
            return EffectBatch::new();
        };
        EffectBatch::new()
            .with(Effect::protect(target, Protection::Bless))
            .with(Effect::update(action.actor, PlayerUpdate::UseBlessing))
    }
}

/// One poison and one antidote per game.
///
/// The antidote resolves after every lethal action and removes a stoppable
/// mark. It is only spent if there was a mark to remove.
#[derive(Clone, Copy, Debug)]
pub struct Witch;

impl RoleBehavior for Witch {
    fn role(&self) -> RoleId {
        RoleId::Witch
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[ActionKind::Poison, ActionKind::Antidote]
    }

    fn check_ability(
        &self,
        _game: &Game,
        actor: &Player,
        kind: ActionKind,
        _targets: &[PlayerId],
    ) -> Result<(), RejectReason> {
        let spent = match kind {
            ActionKind::Poison => actor.state().poison_potion_used,
            ActionKind::Antidote => actor.state().heal_potion_used,
            _ => false,
        };
        if spent {
            Err(RejectReason::AbilityExhausted)
        } else {
            Ok(())
        }
    }

    fn night_action(&self, view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        let Some(target) = action.target() else {
            return EffectBatch::new();
        };
        match action.kind {
            ActionKind::Poison => EffectBatch::new()
                .with(Effect::kill(target, DeathCause::Poison))
                .with(Effect::update(action.actor, PlayerUpdate::UsePoisonPotion)),
            ActionKind::Antidote => match view.mark_cause(target) {
                Some(cause) if cause.is_stoppable() => EffectBatch::new()
                    .with(Effect::Unmark { target })
                    .with(Effect::update(action.actor, PlayerUpdate::UseHealPotion))
                    .with(private(
                        view,
                        action.actor,
                        format!("Your antidote saved {}.", view.name(target)),
                    )),
                _ => EffectBatch::new(),
            },
            _ => EffectBatch::new(),
        }
    }
}

// =============================================================================
// Death hooks
// =============================================================================

/// Takes someone down with them.
#[derive(Clone, Copy, Debug)]
pub struct Hunter;

impl RoleBehavior for Hunter {
    fn role(&self) -> RoleId {
        RoleId::Hunter
    }

    fn on_death(&self, _game: &Game, player: &Player, _cause: DeathCause) -> EffectBatch {
        Effect::HunterPending { hunter: player.id }.into()
    }
}

/// Survives the first lynch by revealing their role.
#[derive(Clone, Copy, Debug)]
pub struct Prince;

impl RoleBehavior for Prince {
    fn role(&self) -> RoleId {
        RoleId::Prince
    }

    fn reveals_instead_of_death(&self, player: &Player, cause: DeathCause) -> bool {
        matches!(cause, DeathCause::Lynch) && !player.state().reveal_used
    }
}

/// Wolves who eat the leper skip their next attack.
#[derive(Clone, Copy, Debug)]
pub struct Leper;

impl RoleBehavior for Leper {
    fn role(&self) -> RoleId {
        RoleId::Leper
    }

    fn on_death(&self, game: &Game, _player: &Player, cause: DeathCause) -> EffectBatch {
        if matches!(cause, DeathCause::WolfKill) {
            Effect::Flag(RoundFlag::LeperBlock {
                round: game.round() + 1,
            })
            .into()
        } else {
            EffectBatch::new()
        }
    }
}

// =============================================================================
// Bonds and control
// =============================================================================

/// Binds two lovers on the first night.
#[derive(Clone, Copy, Debug)]
pub struct Cupid;

impl RoleBehavior for Cupid {
    fn role(&self) -> RoleId {
        RoleId::Cupid
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[ActionKind::Pair]
    }

    fn check_ability(
        &self,
        game: &Game,
        _actor: &Player,
        _kind: ActionKind,
        targets: &[PlayerId],
    ) -> Result<(), RejectReason> {
        if game.round() != 1 {
            return Err(RejectReason::AbilityExhausted);
        }
        match targets {
            [a, b] if a == b => Err(RejectReason::InvalidTarget(*b)),
            _ => Ok(()),
        }
    }

    fn night_action(&self, view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        let [a, b] = action.targets.as_slice() else {
            return EffectBatch::new();
        };
        let (a, b) = (*a, *b);
        let mut effects = EffectBatch::new()
            .with(Effect::update(a, PlayerUpdate::SetLover(b)))
            .with(Effect::update(b, PlayerUpdate::SetLover(a)));
        for (lover, partner) in [(a, b), (b, a)] {
            effects.add(
                private(
                    view,
                    lover,
                    format!("Cupid's arrow struck. You are in love with {}.", view.name(partner)),
                )
                .with_player(partner),
            );
        }
        effects
    }
}

/// Blocks one player's action for the night.
#[derive(Clone, Copy, Debug)]
pub struct Exiler;

impl RoleBehavior for Exiler {
    fn role(&self) -> RoleId {
        RoleId::Exiler
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[ActionKind::Exile]
    }

    fn night_action(&self, view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        let Some(target) = action.target() else {
            return EffectBatch::new();
        };
        EffectBatch::new()
            .with(Effect::Block { target })
            .with(private(view, target, "You were exiled for the night.".to_string()))
    }
}

/// Takes away one player's vote for the coming day.
#[derive(Clone, Copy, Debug)]
pub struct Silencer;

impl RoleBehavior for Silencer {
    fn role(&self) -> RoleId {
        RoleId::Silencer
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[ActionKind::Silence]
    }

    fn night_action(&self, view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        let Some(target) = action.target() else {
            return EffectBatch::new();
        };
        EffectBatch::new()
            .with(Effect::update(target, PlayerUpdate::Silence { round: view.round() }))
            .with(private(view, target, "You have been silenced and cannot vote today.".to_string()))
    }
}

// =============================================================================
// Resurrection and prophecy
// =============================================================================

/// Brings one dead player back, once per game.
#[derive(Clone, Copy, Debug)]
pub struct Medium;

impl RoleBehavior for Medium {
    fn role(&self) -> RoleId {
        RoleId::Medium
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[ActionKind::Resurrect]
    }

    fn check_ability(
        &self,
        _game: &Game,
        actor: &Player,
        _kind: ActionKind,
        _targets: &[PlayerId],
    ) -> Result<(), RejectReason> {
        if actor.state().resurrection_used {
            Err(RejectReason::AbilityExhausted)
        } else {
            Ok(())
        }
    }

    fn night_action(&self, view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        let Some(target) = action.target() else {
            return EffectBatch::new();
        };
        if view.player(target).map_or(true, Player::is_alive) {
            return EffectBatch::new();
        }
        EffectBatch::new()
            .with(Effect::Revive { target })
            .with(Effect::update(action.actor, PlayerUpdate::UseResurrection))
            .with(
                GameEvent::new(
                    view.round(),
                    EventKind::Special,
                    format!("{} has returned from the dead.", view.name(target)),
                )
                .with_player(target),
            )
    }
}

/// Predicts who the village will lynch the next day.
#[derive(Clone, Copy, Debug)]
pub struct Prophet;

impl RoleBehavior for Prophet {
    fn role(&self) -> RoleId {
        RoleId::Prophet
    }

    fn allowed_actions(&self) -> &'static [ActionKind] {
        &[ActionKind::Predict]
    }

    fn night_action(&self, view: &NightView<'_>, action: &NightAction) -> EffectBatch {
        action
            .target()
            .map(|target| {
                Effect::update(
                    action.actor,
                    PlayerUpdate::LockProphecy {
                        round: view.round(),
                        target,
                    },
                )
                .into()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::ResolutionContext;
    use crate::rules::GameBuilder;

    fn p(id: u8) -> PlayerId {
        PlayerId::new(id)
    }

    fn game() -> Game {
        GameBuilder::new()
            .player("Wolf", RoleId::Werewolf)
            .player("Sera", RoleId::Seer)
            .player("Doc", RoleId::Doctor)
            .player("Wanda", RoleId::Witch)
            .player("Ada", RoleId::Villager)
            .build()
    }

    fn run(game: &Game, ctx: &ResolutionContext, behavior: &dyn RoleBehavior, action: NightAction) -> Vec<Effect> {
        behavior
            .night_action(&NightView::new(game, ctx), &action)
            .into_iter()
            .collect()
    }

    #[test]
    fn test_scry_finds_wolf() {
        let game = game();
        let effects = run(
            &game,
            &ResolutionContext::new(),
            &Seer,
            NightAction::new(1, p(1), ActionKind::Scry, &[p(0)]),
        );

        assert_eq!(effects[0], Effect::update(p(1), PlayerUpdate::FoundWolf));
        match &effects[1] {
            Effect::Event(event) => {
                assert_eq!(event.recipient, Some(p(1)));
                assert_eq!(event.message, "Wolf is a Werewolf.");
            }
            other => panic!("Expected Event, got {other:?}"),
        }
    }

    #[test]
    fn test_scry_sees_staged_transformation() {
        let game = game();
        let mut ctx = ResolutionContext::new();
        ctx.fold(Effect::Transform {
            target: p(4),
            role: RoleId::Werewolf,
        });

        let effects = run(&game, &ctx, &Seer, NightAction::new(1, p(1), ActionKind::Scry, &[p(4)]));
        assert_eq!(effects[0], Effect::update(p(1), PlayerUpdate::FoundWolf));
    }

    #[test]
    fn test_apprentice_waits_for_seer() {
        let mut game = game();
        let actor = game.player(p(4)).unwrap().clone();

        assert_eq!(
            ApprenticeSeer.check_ability(&game, &actor, ActionKind::Scry, &[p(0)]),
            Err(RejectReason::NotYourAbility)
        );
        game.round_effects.apply(RoundFlag::SeerDied);
        assert!(ApprenticeSeer.check_ability(&game, &actor, ActionKind::Scry, &[p(0)]).is_ok());
    }

    #[test]
    fn test_doctor_cannot_repeat_target() {
        let mut game = game();
        game.round = 2;
        game.player_mut(p(2))
            .unwrap()
            .apply(PlayerUpdate::RecordHeal { round: 1, target: p(4) });
        let doc = game.player(p(2)).unwrap();

        assert_eq!(
            Doctor.check_ability(&game, doc, ActionKind::Heal, &[p(4)]),
            Err(RejectReason::InvalidTarget(p(4)))
        );
        assert!(Doctor.check_ability(&game, doc, ActionKind::Heal, &[p(2)]).is_ok());
    }

    #[test]
    fn test_antidote_only_removes_stoppable_marks() {
        let game = game();
        let mut ctx = ResolutionContext::new();
        ctx.fold(Effect::kill(p(4), DeathCause::WolfKill));
        ctx.fold(Effect::kill(p(2), DeathCause::Bite { by: p(0) }));

        let saved = run(&game, &ctx, &Witch, NightAction::new(1, p(3), ActionKind::Antidote, &[p(4)]));
        assert_eq!(saved[0], Effect::Unmark { target: p(4) });
        assert_eq!(saved[1], Effect::update(p(3), PlayerUpdate::UseHealPotion));

        let bitten = run(&game, &ctx, &Witch, NightAction::new(1, p(3), ActionKind::Antidote, &[p(2)]));
        assert!(bitten.is_empty());
    }

    #[test]
    fn test_witch_potions_are_single_use() {
        let mut game = game();
        game.player_mut(p(3)).unwrap().apply(PlayerUpdate::UsePoisonPotion);
        let witch = game.player(p(3)).unwrap();

        assert_eq!(
            Witch.check_ability(&game, witch, ActionKind::Poison, &[p(0)]),
            Err(RejectReason::AbilityExhausted)
        );
        assert!(Witch.check_ability(&game, witch, ActionKind::Antidote, &[p(0)]).is_ok());
    }

    #[test]
    fn test_prince_reveals_once() {
        let mut prince = Player::new(p(0), "Hal", false);
        prince.assign(RoleId::Prince);

        assert!(Prince.reveals_instead_of_death(&prince, DeathCause::Lynch));
        assert!(!Prince.reveals_instead_of_death(&prince, DeathCause::WolfKill));

        prince.apply(PlayerUpdate::ConsumeReveal);
        assert!(!Prince.reveals_instead_of_death(&prince, DeathCause::Lynch));
    }

    #[test]
    fn test_leper_only_punishes_wolves() {
        let game = game();
        let leper = game.player(p(4)).unwrap();

        assert_eq!(
            Leper.on_death(&game, leper, DeathCause::WolfKill).into_iter().collect::<Vec<_>>(),
            vec![Effect::Flag(RoundFlag::LeperBlock { round: 2 })]
        );
        assert!(Leper.on_death(&game, leper, DeathCause::Lynch).is_empty());
    }

    #[test]
    fn test_cupid_first_night_only() {
        let mut game = game();
        let cupid = game.player(p(4)).unwrap().clone();

        assert!(Cupid.check_ability(&game, &cupid, ActionKind::Pair, &[p(1), p(2)]).is_ok());
        assert_eq!(
            Cupid.check_ability(&game, &cupid, ActionKind::Pair, &[p(1), p(1)]),
            Err(RejectReason::InvalidTarget(p(1)))
        );

        game.round = 2;
        assert_eq!(
            Cupid.check_ability(&game, &cupid, ActionKind::Pair, &[p(1), p(2)]),
            Err(RejectReason::AbilityExhausted)
        );
    }

    #[test]
    fn test_detective_compares_teams() {
        let game = game();
        let effects = run(
            &game,
            &ResolutionContext::new(),
            &Detective,
            NightAction::new(1, p(4), ActionKind::Investigate, &[p(1), p(0)]),
        );

        match &effects[0] {
            Effect::Event(event) => assert_eq!(event.message, "Sera and Wolf are on different sides."),
            other => panic!("Expected Event, got {other:?}"),
        }
    }

    #[test]
    fn test_medium_ignores_living_target() {
        let game = game();
        let effects = run(
            &game,
            &ResolutionContext::new(),
            &Medium,
            NightAction::new(1, p(4), ActionKind::Resurrect, &[p(1)]),
        );
        assert!(effects.is_empty());
    }
}

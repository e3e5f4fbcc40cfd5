//! Player submissions: night abilities, votes and the hunter's shot.
//!
//! Every submission is validated against the current phase and the actor's
//! role before anything is written. Rejections never change state.
//!
//! - A second night action from the same actor in the same round is a no-op
//!   reported as [`Submission::Duplicate`]
//! - Votes are last-write-wins; re-casting the same vote is a duplicate

use serde::{Deserialize, Serialize};

use crate::core::{ActionKind, Command, Game, NightAction, Phase, Player, PlayerId};
use crate::error::RejectReason;
use crate::roles::behavior_of;

use super::votes;

/// What a valid submission did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Submission {
    Recorded,
    /// Nothing changed.
    Duplicate,
}

/// Validate and record a command from `actor` at time `now`.
pub fn submit(game: &mut Game, actor: PlayerId, command: Command, now: u64) -> Result<Submission, RejectReason> {
    if game.player(actor).is_none() {
        return Err(RejectReason::UnknownPlayer(actor));
    }
    match command {
        Command::Night { kind, targets } => submit_night(game, actor, kind, &targets, now),
        Command::Vote { target } => submit_vote(game, actor, target),
        Command::Shoot { target } => submit_shot(game, actor, target),
    }
}

fn submit_night(
    game: &mut Game,
    actor: PlayerId,
    kind: ActionKind,
    targets: &[PlayerId],
    now: u64,
) -> Result<Submission, RejectReason> {
    if game.phase() != Phase::Night {
        return Err(RejectReason::WrongPhase);
    }
    let player = game.player(actor).ok_or(RejectReason::UnknownPlayer(actor))?;
    if !player.is_alive() {
        return Err(RejectReason::NotAlive(actor));
    }
    if game.has_acted(actor, game.round()) {
        return Ok(Submission::Duplicate);
    }

    check_night_action(game, player, kind, targets)?;
    game.record_action(NightAction::new(game.round(), actor, kind, targets).at(now));
    Ok(Submission::Recorded)
}

/// Generic target checks followed by the role's own checks.
pub fn check_night_action(
    game: &Game,
    actor: &Player,
    kind: ActionKind,
    targets: &[PlayerId],
) -> Result<(), RejectReason> {
    let behavior = behavior_of(actor);
    if !behavior.allowed_actions().contains(&kind) {
        return Err(RejectReason::NotYourAbility);
    }

    let (min, max) = kind.target_range();
    if targets.len() < min || targets.len() > max {
        return Err(RejectReason::WrongTargetCount {
            expected: if targets.len() < min { min } else { max },
            got: targets.len(),
        });
    }

    for &target in targets {
        let Some(player) = game.player(target) else {
            return Err(RejectReason::InvalidTarget(target));
        };
        if player.is_alive() == kind.targets_dead() {
            return Err(RejectReason::InvalidTarget(target));
        }
        if target == actor.id && !kind.allows_self_target() {
            return Err(RejectReason::InvalidTarget(target));
        }
    }

    behavior.check_ability(game, actor, kind, targets)
}

/// Whether a living player still has a night ability they could use.
#[must_use]
pub fn can_act(game: &Game, player: &Player) -> bool {
    let behavior = behavior_of(player);
    player.is_alive()
        && behavior
            .allowed_actions()
            .iter()
            .any(|&kind| behavior.check_ability(game, player, kind, &[]).is_ok())
}

fn submit_vote(game: &mut Game, voter: PlayerId, target: PlayerId) -> Result<Submission, RejectReason> {
    votes::check_vote(game, voter, target)?;
    let player = game.player_mut(voter).ok_or(RejectReason::UnknownPlayer(voter))?;
    if player.vote == Some(target) {
        return Ok(Submission::Duplicate);
    }
    player.vote = Some(target);
    Ok(Submission::Recorded)
}

fn submit_shot(game: &mut Game, hunter: PlayerId, target: PlayerId) -> Result<Submission, RejectReason> {
    if game.phase() != Phase::HunterShot {
        return Err(RejectReason::WrongPhase);
    }
    let alive = game.player(target).is_some_and(Player::is_alive);
    let interrupt = game.hunter.as_mut().ok_or(RejectReason::WrongPhase)?;
    if interrupt.hunter != hunter {
        return Err(RejectReason::NotYourAbility);
    }
    if interrupt.shot.is_some() {
        return Ok(Submission::Duplicate);
    }
    if target == hunter || !alive {
        return Err(RejectReason::InvalidTarget(target));
    }
    interrupt.shot = Some(target);
    Ok(Submission::Recorded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DeathCause, HunterInterrupt, PlayerUpdate, ResumeMode};
    use crate::roles::RoleId;
    use crate::rules::GameBuilder;

    fn p(id: u8) -> PlayerId {
        PlayerId::new(id)
    }

    fn game() -> Game {
        GameBuilder::new()
            .player("Wolf", RoleId::Werewolf)
            .player("Sera", RoleId::Seer)
            .player("Gus", RoleId::Bodyguard)
            .player("Ada", RoleId::Villager)
            .build()
    }

    #[test]
    fn test_night_action_recorded_once() {
        let mut game = game();
        let scry = Command::night(ActionKind::Scry, &[p(0)]);

        assert_eq!(submit(&mut game, p(1), scry.clone(), 5), Ok(Submission::Recorded));
        assert_eq!(submit(&mut game, p(1), Command::night(ActionKind::Scry, &[p(3)]), 9), Ok(Submission::Duplicate));

        let actions: Vec<_> = game.actions_for_round(1).collect();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].targets.as_slice(), &[p(0)]);
        assert_eq!(actions[0].submitted_at, 5);
    }

    #[test]
    fn test_rejections() {
        let mut game = game();

        assert_eq!(
            submit(&mut game, p(3), Command::night(ActionKind::Scry, &[p(0)]), 0),
            Err(RejectReason::NotYourAbility)
        );
        assert_eq!(
            submit(&mut game, p(2), Command::night(ActionKind::Guard, &[p(2)]), 0),
            Err(RejectReason::InvalidTarget(p(2)))
        );
        assert_eq!(
            submit(&mut game, p(1), Command::night(ActionKind::Scry, &[]), 0),
            Err(RejectReason::WrongTargetCount { expected: 1, got: 0 })
        );
        assert_eq!(
            submit(&mut game, p(9), Command::night(ActionKind::Scry, &[p(0)]), 0),
            Err(RejectReason::UnknownPlayer(p(9)))
        );
        assert_eq!(
            submit(&mut game, p(1), Command::Vote { target: p(0) }, 0),
            Err(RejectReason::WrongPhase)
        );
        assert!(game.night_actions().is_empty());
    }

    #[test]
    fn test_dead_cannot_act() {
        let mut game = game();
        game.player_mut(p(1)).unwrap().kill(1, DeathCause::WolfKill);

        assert_eq!(
            submit(&mut game, p(1), Command::night(ActionKind::Scry, &[p(0)]), 0),
            Err(RejectReason::NotAlive(p(1)))
        );
    }

    #[test]
    fn test_vote_last_write_wins() {
        let mut game = game();
        game.phase = Phase::Day;

        assert_eq!(submit(&mut game, p(1), Command::Vote { target: p(0) }, 0), Ok(Submission::Recorded));
        assert_eq!(submit(&mut game, p(1), Command::Vote { target: p(0) }, 0), Ok(Submission::Duplicate));
        assert_eq!(submit(&mut game, p(1), Command::Vote { target: p(2) }, 0), Ok(Submission::Recorded));
        assert_eq!(game.player(p(1)).unwrap().vote(), Some(p(2)));
    }

    #[test]
    fn test_shot_only_by_pending_hunter() {
        let mut game = game();
        game.phase = Phase::HunterShot;
        game.hunter = Some(HunterInterrupt {
            hunter: p(2),
            resume: Phase::Day,
            mode: ResumeMode::Enter,
            shot: None,
            lynched: None,
        });

        assert_eq!(
            submit(&mut game, p(1), Command::Shoot { target: p(0) }, 0),
            Err(RejectReason::NotYourAbility)
        );
        assert_eq!(submit(&mut game, p(2), Command::Shoot { target: p(0) }, 0), Ok(Submission::Recorded));
        assert_eq!(submit(&mut game, p(2), Command::Shoot { target: p(3) }, 0), Ok(Submission::Duplicate));
        assert_eq!(game.hunter().and_then(|h| h.shot), Some(p(0)));
    }

    #[test]
    fn test_can_act() {
        let mut game = GameBuilder::new()
            .player("Wolf", RoleId::Werewolf)
            .player("Wanda", RoleId::Witch)
            .player("Ada", RoleId::Villager)
            .build();
        assert!(can_act(&game, game.player(p(1)).unwrap()));
        assert!(!can_act(&game, game.player(p(2)).unwrap()));

        let witch = game.player_mut(p(1)).unwrap();
        witch.apply(PlayerUpdate::UsePoisonPotion);
        witch.apply(PlayerUpdate::UseHealPotion);
        assert!(!can_act(&game, game.player(p(1)).unwrap()));
    }
}

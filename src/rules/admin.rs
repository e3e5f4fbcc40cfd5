//! Host overrides.

use tracing::info;

use crate::core::{DeathCause, EventKind, Game, GameEvent, Phase, PlayerId, PlayerUpdate};
use crate::error::{EngineError, RejectReason};
use crate::resolution::{DeathReport, DeathResolver};

use super::phase;

/// Kill a living player outside the normal flow.
///
/// Bonds, death hooks, pending hunters and the win check all run as for any
/// other death. The current phase and deadline are kept unless the death
/// ends the game. A hunter's shot suspends the phase, which is restored with
/// its remaining time afterwards.
pub fn force_death(game: &mut Game, target: PlayerId, now: u64) -> Result<DeathReport, EngineError> {
    if matches!(game.phase(), Phase::Waiting | Phase::Finished) {
        return Err(RejectReason::WrongPhase.into());
    }
    let player = game.player(target).ok_or(RejectReason::UnknownPlayer(target))?;
    if !player.is_alive() {
        return Err(RejectReason::NotAlive(target).into());
    }

    info!(player = %target, "forced death");
    let report = DeathResolver::resolve(game, [(target, DeathCause::Override)])?;
    phase::settle(game, now);
    Ok(report)
}

/// Publicly reveal a player's role.
pub fn reveal_role(game: &mut Game, target: PlayerId) -> Result<(), EngineError> {
    if matches!(game.phase(), Phase::Waiting | Phase::Finished) {
        return Err(RejectReason::WrongPhase.into());
    }
    let round = game.round();
    let player = game.player_mut(target).ok_or(RejectReason::UnknownPlayer(target))?;
    player.apply(PlayerUpdate::PublicReveal);
    let role = player.role_or_default();
    let message = format!("{} is revealed to be the {role}.", player.name);

    game.push_event(
        GameEvent::new(round, EventKind::Reveal, message)
            .with_player(target)
            .with_role(role),
    );
    Ok(())
}

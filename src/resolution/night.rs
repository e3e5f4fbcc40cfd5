//! Night resolution pipeline.
//!
//! ## Algorithm
//!
//! 1. Take the current round's actions from living actors and sort them by
//!    [`NightAction::resolution_key`] (priority table, then join order)
//! 2. Merge every wolf's submission into one pack action the first time a
//!    wolf kill is reached
//! 3. Dispatch each action to its actor's behavior and fold the returned
//!    effects into a [`ResolutionContext`]; blocked actors are skipped
//! 4. Commit: field updates, then the kill queue, then events

use smallvec::SmallVec;
use tracing::{debug, info};

use crate::core::{ActionKind, EventKind, Game, GameEvent, NightAction, Player, PlayerId, Targets};
use crate::effects::{NightView, ResolutionContext};
use crate::error::EngineError;
use crate::roles::behavior_of;

use super::deaths::{DeathReport, DeathResolver};

/// Outcome of one night.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NightReport {
    pub round: u32,
    /// Actions dispatched to a behavior (the merged pack action counts once).
    pub resolved: usize,
    /// Players whose death marks were blocked or removed.
    pub saved: Vec<PlayerId>,
    pub deaths: DeathReport,
}

/// Resolve the current round's night actions and commit the result.
pub fn resolve_night(game: &mut Game) -> Result<NightReport, EngineError> {
    let round = game.round();
    let mut actions: Vec<NightAction> = game
        .actions_for_round(round)
        .filter(|a| game.player(a.actor).is_some_and(Player::is_alive))
        .cloned()
        .collect();
    actions.sort_by_key(NightAction::resolution_key);

    let mut ctx = ResolutionContext::new();
    let mut pack_resolved = false;
    let mut resolved = 0;

    for action in &actions {
        if ctx.is_blocked(action.actor) {
            debug!(actor = %action.actor, kind = %action.kind, "action blocked");
            continue;
        }

        let action = if action.kind == ActionKind::WolfKill {
            if pack_resolved {
                continue;
            }
            pack_resolved = true;
            match merge_pack(game, &mut ctx, &actions) {
                Some(pack) => pack,
                None => continue,
            }
        } else {
            action.clone()
        };

        let actor = game.expect_player(action.actor)?;
        let behavior = behavior_of(actor);
        if !behavior.allowed_actions().contains(&action.kind) {
            debug!(actor = %action.actor, kind = %action.kind, "role no longer has this ability");
            continue;
        }

        let effects = behavior.night_action(&NightView::new(game, &ctx), &action);
        debug!(
            actor = %action.actor,
            kind = %action.kind,
            effects = effects.len(),
            "folding night action"
        );
        ctx.fold_batch(effects);
        resolved += 1;
    }

    commit(game, ctx, round, resolved)
}

/// Build the pack action from every unblocked wolf submission.
///
/// Targets keep resolution order, are deduplicated and truncated to the
/// pack's quota for the round. Returns `None` when the pack may not hunt.
fn merge_pack(game: &Game, ctx: &mut ResolutionContext, actions: &[NightAction]) -> Option<NightAction> {
    let round = game.round();
    let pack: Vec<&NightAction> = actions
        .iter()
        .filter(|a| a.kind == ActionKind::WolfKill && !ctx.is_blocked(a.actor))
        .collect();
    let leader = pack.first()?;

    let quota = game.round_effects().pack_quota(round);
    if quota == 0 {
        debug!(round, "pack hunt blocked");
        for wolf in &pack {
            ctx.fold(
                GameEvent::new(
                    round,
                    EventKind::Special,
                    "The leper's sickness keeps the pack from hunting tonight.",
                )
                .to(wolf.actor)
                .into(),
            );
        }
        return None;
    }

    let mut targets: Targets = SmallVec::new();
    for target in pack.iter().flat_map(|a| a.targets.iter().copied()) {
        if !targets.contains(&target) {
            targets.push(target);
        }
    }
    targets.truncate(quota);

    Some(NightAction {
        round,
        actor: leader.actor,
        kind: ActionKind::WolfKill,
        targets,
        submitted_at: leader.submitted_at,
    })
}

/// Apply a folded context to the game.
fn commit(game: &mut Game, ctx: ResolutionContext, round: u32, resolved: usize) -> Result<NightReport, EngineError> {
    // === Field updates ===
    for &(target, update) in &ctx.updates {
        game.expect_player_mut(target)?.apply(update);
    }
    for &(target, role) in &ctx.transforms {
        game.expect_player_mut(target)?.transform(role);
        info!(player = %target, %role, "player transformed");
    }
    for &target in &ctx.revives {
        let player = game.expect_player_mut(target)?;
        if !player.is_alive() {
            player.revive();
            info!(player = %target, "player revived");
        }
    }
    for &flag in &ctx.flags {
        game.round_effects.apply(flag);
    }
    for &hunter in &ctx.hunters {
        if !game.pending_hunters.contains(&hunter) {
            game.pending_hunters.push_back(hunter);
        }
    }

    // === Kill queue ===
    let deaths = DeathResolver::resolve(game, ctx.marks().iter().copied())?;

    // === Events ===
    let saved: Vec<PlayerId> = ctx.saved().iter().copied().filter(|&id| !ctx.is_marked(id)).collect();
    for event in ctx.events {
        game.push_event(event);
    }
    game.push_event(summary(game, round, &deaths));

    info!(round, deaths = deaths.died.len(), saved = saved.len(), "night resolved");
    Ok(NightReport {
        round,
        resolved,
        saved,
        deaths,
    })
}

fn summary(game: &Game, round: u32, deaths: &DeathReport) -> GameEvent {
    let message = match deaths.died.as_slice() {
        [] => "The sun rises. Nobody died during the night.".to_string(),
        [one] => format!("The sun rises. {} did not survive the night.", game.name_of(*one)),
        many => {
            let names: Vec<String> = many.iter().map(|&id| game.name_of(id)).collect();
            format!("The sun rises. {} did not survive the night.", names.join(", "))
        }
    };
    let mut event = GameEvent::new(round, EventKind::NightResult, message);
    for &id in &deaths.died {
        event = event.with_player(id);
    }
    event
}

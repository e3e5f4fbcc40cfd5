//! Phase / vote state machine.
//!
//! ```text
//! waiting → role_reveal → night ⇄ day → (tiebreak → jury_voting) → finished
//!                              ↘   hunter_shot   ↙
//! ```
//!
//! This is the only module that changes a game's phase or round. Every
//! transition that can kill someone runs the death resolver, then either
//! hands control to a pending hunter or runs the win evaluator, before the
//! next phase is entered. The hunter's shot returns to whatever phase the
//! triggering death would have led to; a hunter killed mid-phase by a host
//! override returns to the interrupted phase without re-entering it.
//!
//! Transitions are deadline-driven. An advance before the deadline is
//! ignored unless every eligible actor has already acted.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{DeathCause, EventKind, Game, GameEvent, HunterInterrupt, Phase, PlayerId, PlayerUpdate, ResumeMode};
use crate::error::{EngineError, RejectReason};
use crate::resolution::{resolve_night, DeathResolver};
use crate::roles::RoleId;

use super::setup::assign_roles;
use super::submit::can_act;
use super::victory::{Victory, WinEvaluator};
use super::votes::{self, Tally};

/// What asked for the advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvanceTrigger {
    /// A phase timer fired.
    Deadline,
    /// Every eligible actor has submitted.
    AllActed,
}

/// Outcome of an advance request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advance {
    /// Early, stale or against a finished game. Nothing changed.
    Ignored,
    Advanced { from: Phase, to: Phase },
}

impl Advance {
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Advance::Ignored)
    }
}

/// Leave the lobby: deal roles and enter the role reveal.
pub fn start(game: &mut Game, now: u64) -> Result<(), EngineError> {
    if game.phase() != Phase::Waiting {
        return Err(RejectReason::AlreadyStarted.into());
    }
    assign_roles(game)?;

    for player in &game.players {
        let role = player.role_or_default();
        let message = format!("You are the {role}.");
        let event = GameEvent::new(0, EventKind::Special, message)
            .to(player.id)
            .with_role(role);
        game.events.push_back(event);
    }
    info!(game = %game.id(), players = game.player_count(), "game started");
    enter(game, Phase::RoleReveal, now);
    Ok(())
}

/// Advance the current phase at time `now`.
pub fn advance(game: &mut Game, now: u64, trigger: AdvanceTrigger) -> Result<Advance, EngineError> {
    let from = game.phase();
    if matches!(from, Phase::Waiting | Phase::Finished) {
        debug!(phase = %from, "advance ignored");
        return Ok(Advance::Ignored);
    }

    let due = game.deadline().map_or(true, |deadline| now >= deadline);
    let early = trigger == AdvanceTrigger::AllActed && everyone_acted(game);
    if !due && !early {
        debug!(phase = %from, now, deadline = ?game.deadline(), "advance before deadline ignored");
        return Ok(Advance::Ignored);
    }

    match from {
        Phase::RoleReveal => enter(game, Phase::Night, now),
        Phase::Night => {
            resolve_night(game)?;
            after_deaths(game, now, Phase::Day, None);
        }
        Phase::Day => resolve_day(game, now)?,
        Phase::Tiebreak => resolve_tiebreak(game, now)?,
        Phase::JuryVoting => resolve_jury(game, now)?,
        Phase::HunterShot => resolve_hunter(game, now)?,
        Phase::Waiting | Phase::Finished => {}
    }

    Ok(Advance::Advanced {
        from,
        to: game.phase(),
    })
}

/// Whether every eligible actor of the current phase has acted.
#[must_use]
pub fn everyone_acted(game: &Game) -> bool {
    match game.phase() {
        Phase::RoleReveal => true,
        Phase::Night => game
            .alive()
            .filter(|p| can_act(game, p))
            .all(|p| game.has_acted(p.id, game.round())),
        Phase::Day | Phase::Tiebreak | Phase::JuryVoting => votes::all_voted(game),
        Phase::HunterShot => game.hunter().is_some_and(|h| h.shot.is_some()),
        Phase::Waiting | Phase::Finished => false,
    }
}

/// Settle deaths that happened outside a transition (admin overrides).
///
/// A pending hunter suspends the current phase, which is restored with its
/// remaining time once the shot resolves; otherwise the win evaluator runs.
/// The phase is left alone when nothing is decided.
pub(crate) fn settle(game: &mut Game, now: u64) {
    if matches!(game.phase(), Phase::HunterShot | Phase::Finished | Phase::Waiting) {
        return;
    }
    let resume = game.phase();
    let mode = ResumeMode::Restore {
        remaining_ms: game.deadline().map(|deadline| deadline.saturating_sub(now)),
    };
    if let Some(hunter) = game.pending_hunters.pop_front() {
        interrupt(game, hunter, resume, mode, None, now);
    } else if let Some(victory) = WinEvaluator::evaluate(game, None) {
        finish(game, victory);
    }
}

// =============================================================================
// Transitions
// =============================================================================

/// Run after every death-producing step.
fn after_deaths(game: &mut Game, now: u64, next: Phase, lynched: Option<PlayerId>) {
    proceed(game, now, next, ResumeMode::Enter, lynched);
}

fn proceed(game: &mut Game, now: u64, next: Phase, mode: ResumeMode, lynched: Option<PlayerId>) {
    if let Some(hunter) = game.pending_hunters.pop_front() {
        interrupt(game, hunter, next, mode, lynched, now);
        return;
    }
    match (WinEvaluator::evaluate(game, lynched), mode) {
        (Some(victory), _) => finish(game, victory),
        (None, ResumeMode::Enter) => enter(game, next, now),
        (None, ResumeMode::Restore { remaining_ms }) => restore(game, next, remaining_ms, now),
    }
}

fn interrupt(
    game: &mut Game,
    hunter: PlayerId,
    resume: Phase,
    mode: ResumeMode,
    lynched: Option<PlayerId>,
    now: u64,
) {
    game.hunter = Some(HunterInterrupt {
        hunter,
        resume,
        mode,
        shot: None,
        lynched,
    });
    enter(game, Phase::HunterShot, now);
}

fn resolve_day(game: &mut Game, now: u64) -> Result<(), EngineError> {
    match votes::tally(game) {
        Tally::Lynch(target) => lynch(game, now, target),
        Tally::Tie(tied) => {
            let names = names(game, &tied);
            let mut event = GameEvent::new(
                game.round(),
                EventKind::VoteResult,
                format!("The vote is tied between {names}. Vote again among them."),
            );
            for &id in &tied {
                event = event.with_player(id);
            }
            game.push_event(event);
            game.tied = tied;
            enter(game, Phase::Tiebreak, now);
            Ok(())
        }
        Tally::NoVotes => {
            game.push_event(GameEvent::new(
                game.round(),
                EventKind::VoteResult,
                "Nobody voted. No one was lynched today.",
            ));
            after_deaths(game, now, Phase::Night, None);
            Ok(())
        }
    }
}

fn resolve_tiebreak(game: &mut Game, now: u64) -> Result<(), EngineError> {
    match votes::tally(game) {
        Tally::Lynch(target) => lynch(game, now, target),
        tally => {
            if let Tally::Tie(tied) = tally {
                game.tied = tied;
            }
            if game.settings().jury_enabled && game.dead().next().is_some() {
                game.push_event(GameEvent::new(
                    game.round(),
                    EventKind::VoteResult,
                    "The village is still divided. The dead will decide.",
                ));
                enter(game, Phase::JuryVoting, now);
            } else {
                forgive(game, now);
            }
            Ok(())
        }
    }
}

fn resolve_jury(game: &mut Game, now: u64) -> Result<(), EngineError> {
    match votes::tally(game) {
        Tally::Lynch(target) => lynch(game, now, target),
        Tally::Tie(_) | Tally::NoVotes => {
            forgive(game, now);
            Ok(())
        }
    }
}

fn forgive(game: &mut Game, now: u64) {
    game.push_event(GameEvent::new(
        game.round(),
        EventKind::VoteResult,
        "The village could not agree. No one was lynched today.",
    ));
    game.tied.clear();
    after_deaths(game, now, Phase::Night, None);
}

fn lynch(game: &mut Game, now: u64, target: PlayerId) -> Result<(), EngineError> {
    let round = game.round();
    game.push_event(
        GameEvent::new(
            round,
            EventKind::VoteResult,
            format!("The votes are in: {}.", game.name_of(target)),
        )
        .with_player(target),
    );

    let report = DeathResolver::resolve(game, [(target, DeathCause::Lynch)])?;
    fulfil_prophecies(game, target)?;
    game.tied.clear();

    let lynched = report.died.contains(&target).then_some(target);
    after_deaths(game, now, Phase::Night, lynched);
    Ok(())
}

/// Credit prophets who predicted today's lynch target.
fn fulfil_prophecies(game: &mut Game, target: PlayerId) -> Result<(), EngineError> {
    let round = game.round();
    let prophets: Vec<PlayerId> = game
        .players()
        .iter()
        .filter(|p| p.role() == Some(RoleId::Prophet) && p.state().prophecy == Some((round, target)))
        .map(|p| p.id)
        .collect();

    for prophet in prophets {
        game.expect_player_mut(prophet)?.apply(PlayerUpdate::FulfilProphecy);
        let message = format!("Your prophecy came true: {} faced the village.", game.name_of(target));
        game.push_event(
            GameEvent::new(round, EventKind::Special, message)
                .to(prophet)
                .with_player(target),
        );
    }
    Ok(())
}

fn resolve_hunter(game: &mut Game, now: u64) -> Result<(), EngineError> {
    let interrupt = game
        .hunter
        .take()
        .ok_or_else(|| EngineError::Corrupt(format!("game {} is in hunter_shot without a hunter", game.id())))?;

    match interrupt.shot {
        Some(target) if game.player(target).is_some_and(|p| p.is_alive()) => {
            DeathResolver::resolve(game, [(target, DeathCause::HunterShot { by: interrupt.hunter })])?;
        }
        _ => {
            let message = format!("{} lowered their weapon without firing.", game.name_of(interrupt.hunter));
            game.push_event(
                GameEvent::new(game.round(), EventKind::Special, message).with_player(interrupt.hunter),
            );
        }
    }

    proceed(game, now, interrupt.resume, interrupt.mode, interrupt.lynched);
    Ok(())
}

/// Return to a suspended phase. Round, votes, tie set and submitted actions
/// are untouched.
fn restore(game: &mut Game, phase: Phase, remaining_ms: Option<u64>, now: u64) {
    let from = game.phase;
    game.phase = phase;
    game.phase_deadline = remaining_ms.map(|ms| now.saturating_add(ms));

    let round = game.round;
    let message = match phase {
        Phase::Night => format!("Night {round} continues."),
        Phase::Day => format!("Day {round} continues."),
        _ => "Play continues.".to_string(),
    };
    game.push_event(GameEvent::new(round, EventKind::PhaseChange, message));
    info!(%from, to = %phase, round, "phase restored");
}

/// Enter `phase`, resetting per-phase bookkeeping and the deadline.
fn enter(game: &mut Game, phase: Phase, now: u64) {
    let from = game.phase;
    if phase == Phase::Night {
        game.round += 1;
    }
    if phase != Phase::HunterShot {
        for player in &mut game.players {
            player.vote = None;
        }
    }
    if matches!(phase, Phase::Night | Phase::Day) {
        game.tied.clear();
    }

    let durations = game.settings.durations;
    let duration = match phase {
        Phase::RoleReveal => Some(durations.role_reveal_ms),
        Phase::Night => Some(durations.night_ms),
        Phase::Day => Some(durations.day_ms),
        Phase::Tiebreak => Some(durations.tiebreak_ms),
        Phase::JuryVoting => Some(durations.jury_ms),
        Phase::HunterShot => Some(durations.hunter_ms),
        Phase::Waiting | Phase::Finished => None,
    };
    game.phase = phase;
    game.phase_deadline = duration.map(|ms| now.saturating_add(ms));

    let round = game.round;
    let message = match phase {
        Phase::RoleReveal => "Roles have been dealt. Check your card.".to_string(),
        Phase::Night => format!("Night {round} falls. Everyone close your eyes."),
        Phase::Day => format!("Day {round} begins. Discuss and vote."),
        Phase::Tiebreak => "Tiebreak: vote again among the tied players.".to_string(),
        Phase::JuryVoting => "The jury of the dead convenes.".to_string(),
        Phase::HunterShot => match game.hunter {
            Some(h) => format!("{} draws a last breath and takes aim.", game.name_of(h.hunter)),
            None => "The hunter takes aim.".to_string(),
        },
        Phase::Waiting | Phase::Finished => phase.name().to_string(),
    };
    game.push_event(GameEvent::new(round, EventKind::PhaseChange, message));
    info!(%from, to = %phase, round, "phase transition");
}

fn finish(game: &mut Game, victory: Victory) {
    let round = game.round;
    let mut event = GameEvent::new(round, EventKind::GameOver, victory.message.clone()).with_winner(victory.winner);
    for &id in &victory.winners {
        event = event.with_player(id);
    }
    game.push_event(event);

    info!(winner = victory.winner.name(), winners = victory.winners.len(), round, "game over");
    game.phase = Phase::Finished;
    game.phase_deadline = None;
    game.hunter = None;
    game.pending_hunters.clear();
    game.outcome = Some(victory);
}

fn names(game: &Game, ids: &[PlayerId]) -> String {
    let names: Vec<String> = ids.iter().map(|&id| game.name_of(id)).collect();
    match names.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

//! Death and chain-death resolution.
//!
//! ## Kill Queue
//!
//! Confirmed death marks seed a worklist. For each entry:
//! 1. Skip if the target is dead or already processed this pass
//! 2. A stoppable cause against a role with a reveal exception consumes the
//!    reveal instead of killing
//! 3. Otherwise the player dies, a death event is logged and the role's
//!    `on_death` hook runs
//! 4. Living bond partners (lover, twin, soul link) are enqueued
//!
//! A player is enqueued at most once per pass, so cyclic bonds terminate.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::core::{DeathCause, EventKind, Game, GameEvent, Player, PlayerId, PlayerUpdate};
use crate::effects::Effect;
use crate::error::EngineError;
use crate::roles::{behavior_of, RoleId};

/// Outcome of one kill-queue pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeathReport {
    /// Players who died, in the order they died.
    pub died: Vec<PlayerId>,
    /// Players who revealed their role instead of dying.
    pub revealed: Vec<PlayerId>,
}

impl DeathReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.died.is_empty() && self.revealed.is_empty()
    }
}

/// Kill-queue worklist over a game.
pub struct DeathResolver<'g> {
    game: &'g mut Game,
    queue: VecDeque<(PlayerId, DeathCause)>,
    queued: FxHashSet<PlayerId>,
    processed: FxHashSet<PlayerId>,
    report: DeathReport,
}

impl<'g> DeathResolver<'g> {
    /// Run a full pass seeded with `marks`.
    pub fn resolve(
        game: &'g mut Game,
        marks: impl IntoIterator<Item = (PlayerId, DeathCause)>,
    ) -> Result<DeathReport, EngineError> {
        let mut resolver = Self {
            game,
            queue: VecDeque::new(),
            queued: FxHashSet::default(),
            processed: FxHashSet::default(),
            report: DeathReport::default(),
        };
        for (target, cause) in marks {
            resolver.enqueue(target, cause);
        }
        resolver.run()?;
        Ok(resolver.report)
    }

    fn enqueue(&mut self, target: PlayerId, cause: DeathCause) {
        if !self.processed.contains(&target) && self.queued.insert(target) {
            self.queue.push_back((target, cause));
        }
    }

    fn run(&mut self) -> Result<(), EngineError> {
        while let Some((target, cause)) = self.queue.pop_front() {
            if !self.processed.insert(target) {
                continue;
            }
            let player = self.game.expect_player(target)?;
            if !player.is_alive() {
                debug!(%target, "skipping dead player in kill queue");
                continue;
            }

            let behavior = behavior_of(player);
            if cause.is_stoppable() && behavior.reveals_instead_of_death(player, cause) {
                self.reveal(target)?;
                continue;
            }

            self.kill(target, cause)?;

            let player = self.game.expect_player(target)?;
            let effects = behavior.on_death(self.game, player, cause);
            let bonds: SmallVec<[(PlayerId, DeathCause); 3]> = player.bonds().collect();

            for effect in effects {
                self.apply(effect)?;
            }
            for (partner, bond) in bonds {
                if self.game.player(partner).is_some_and(Player::is_alive) {
                    self.enqueue(partner, bond);
                }
            }
        }
        Ok(())
    }

    fn reveal(&mut self, target: PlayerId) -> Result<(), EngineError> {
        let round = self.game.round();
        let player = self.game.expect_player_mut(target)?;
        player.apply(PlayerUpdate::ConsumeReveal);
        player.apply(PlayerUpdate::PublicReveal);
        let role = player.role_or_default();
        let message = format!(
            "{} revealed themselves as the {role} and was spared.",
            player.name
        );

        info!(player = %target, %role, "role revealed instead of death");
        self.game.push_event(
            GameEvent::new(round, EventKind::Reveal, message)
                .with_player(target)
                .with_role(role),
        );
        self.report.revealed.push(target);
        Ok(())
    }

    fn kill(&mut self, target: PlayerId, cause: DeathCause) -> Result<(), EngineError> {
        let round = self.game.round();
        let role = self.game.expect_player(target)?.role_or_default();
        let message = death_message(self.game, target, role, cause);

        self.game.expect_player_mut(target)?.kill(round, cause);
        info!(player = %target, ?cause, %role, "player died");

        let event = match cause.cascade_partner() {
            Some(partner) => GameEvent::new(round, EventKind::ChainDeath, message)
                .with_player(target)
                .with_player(partner),
            None => GameEvent::new(round, EventKind::Death, message).with_player(target),
        };
        self.game.push_event(event.with_role(role).with_cause(cause));
        self.report.died.push(target);
        Ok(())
    }

    /// Apply one effect produced by a death hook.
    fn apply(&mut self, effect: Effect) -> Result<(), EngineError> {
        match effect {
            Effect::MarkDeath { target, cause } => self.enqueue(target, cause),
            Effect::Flag(flag) => self.game.round_effects.apply(flag),
            Effect::HunterPending { hunter } => {
                if !self.game.pending_hunters.contains(&hunter) {
                    self.game.pending_hunters.push_back(hunter);
                }
            }
            Effect::Event(event) => self.game.push_event(event),
            Effect::Update { target, update } => self.game.expect_player_mut(target)?.apply(update),
            Effect::Transform { target, role } => self.game.expect_player_mut(target)?.transform(role),
            Effect::Revive { target } => self.game.expect_player_mut(target)?.revive(),
            Effect::Protect { .. } | Effect::Unmark { .. } | Effect::Block { .. } => {
                debug!(?effect, "night-only effect ignored during death resolution");
            }
        }
        Ok(())
    }
}

/// Narrative for a death. Every death names the role.
fn death_message(game: &Game, target: PlayerId, role: RoleId, cause: DeathCause) -> String {
    let name = game.name_of(target);
    let how = match cause {
        DeathCause::Grief { partner } => {
            format!("{name} died of grief after losing {}.", game.name_of(partner))
        }
        DeathCause::TwinBond { partner } => {
            format!("{name} could not go on without their twin {}.", game.name_of(partner))
        }
        DeathCause::SoulLink { partner } => {
            format!("{name}'s soul was bound to {} and departed with them.", game.name_of(partner))
        }
        DeathCause::HunterShot { by } => {
            format!("{} fired a last shot and killed {name}.", game.name_of(by))
        }
        DeathCause::Lynch => format!("The village lynched {name}."),
        DeathCause::Override => format!("{name} was struck down by the game master."),
        DeathCause::Bite { .. } => format!("{name} was found drained of blood."),
        DeathCause::WolfKill | DeathCause::Poison | DeathCause::FaeKill => {
            format!("{name} was found dead.")
        }
    };
    format!("{how} They were a {role}.")
}

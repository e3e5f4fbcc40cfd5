//! Transactional engine facade.
//!
//! Every entry point runs the same transaction:
//!
//! 1. Load the record and its version from the [`GameStore`]
//! 2. Mutate a clone of the game (persistent logs make this cheap)
//! 3. Skip the write when nothing changed
//! 4. Commit conditionally on the version read in step 1
//! 5. Narrate the newly committed events to bot players
//!
//! A failure in step 2 drops the clone, so a transaction is all-or-nothing.
//! Narration failures are logged and never roll back the commit.

pub mod store;
pub mod narrator;

pub use narrator::{NarrationError, Narrator};
pub use store::{GameStore, MemoryStore, Versioned};

use tracing::{debug, error, info, warn};

use crate::core::{Command, Game, GameId, GameSettings, PlayerId};
use crate::error::{EngineError, RejectReason, StoreError};
use crate::objectives::{self, ObjectiveResult};
use crate::resolution::DeathReport;
use crate::rules::{self, Advance, AdvanceTrigger, Submission};

/// Results that can report "nothing changed".
trait Outcome {
    fn is_noop(&self) -> bool {
        false
    }
}

impl Outcome for () {}
impl Outcome for PlayerId {}
impl Outcome for DeathReport {}

impl Outcome for Submission {
    fn is_noop(&self) -> bool {
        *self == Submission::Duplicate
    }
}

impl Outcome for Advance {
    fn is_noop(&self) -> bool {
        self.is_ignored()
    }
}

/// The engine over a store and an optional narrator.
pub struct Engine<S: GameStore> {
    store: S,
    narrator: Option<Box<dyn Narrator>>,
}

impl<S: GameStore> Engine<S> {
    pub fn new(store: S) -> Self {
        Self { store, narrator: None }
    }

    #[must_use]
    pub fn with_narrator(mut self, narrator: impl Narrator + 'static) -> Self {
        self.narrator = Some(Box::new(narrator));
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // === Lobby ===

    /// Validate the settings and store a new lobby.
    pub fn create_game(&self, id: GameId, settings: GameSettings, seed: u64) -> Result<(), EngineError> {
        settings.validate()?;
        let game = Game::new(id, settings, seed);
        self.store.insert(&game)?;
        info!(game = %game.id(), seed, "game created");
        Ok(())
    }

    pub fn join(&self, id: &GameId, name: &str, is_bot: bool) -> Result<PlayerId, EngineError> {
        self.transact(id, |game| Ok(game.add_player(name, is_bot)?))
    }

    pub fn start(&self, id: &GameId, now: u64) -> Result<(), EngineError> {
        self.transact(id, |game| rules::start(game, now))
    }

    // === Submissions ===

    /// Submit a night action, vote or hunter shot.
    pub fn submit_action(
        &self,
        id: &GameId,
        actor: PlayerId,
        command: Command,
        now: u64,
    ) -> Result<Submission, EngineError> {
        self.transact(id, |game| {
            rules::submit(game, actor, command, now).map_err(|reason| {
                warn!(game = %id, %actor, %reason, "submission rejected");
                EngineError::from(reason)
            })
        })
    }

    pub fn submit_vote(&self, id: &GameId, voter: PlayerId, target: PlayerId, now: u64) -> Result<Submission, EngineError> {
        self.submit_action(id, voter, Command::Vote { target }, now)
    }

    // === Progression ===

    /// Advance the game's phase.
    ///
    /// Early, stale and losing concurrent advances all report
    /// [`Advance::Ignored`].
    pub fn advance_phase(&self, id: &GameId, now: u64, trigger: AdvanceTrigger) -> Result<Advance, EngineError> {
        match self.transact(id, |game| rules::advance(game, now, trigger)) {
            Err(EngineError::Store(StoreError::Conflict { expected, found })) => {
                debug!(game = %id, expected, found, "concurrent advance lost the race");
                Ok(Advance::Ignored)
            }
            result => result,
        }
    }

    // === Admin ===

    pub fn force_death(&self, id: &GameId, target: PlayerId, now: u64) -> Result<DeathReport, EngineError> {
        self.transact(id, |game| rules::force_death(game, target, now))
    }

    pub fn reveal_role(&self, id: &GameId, target: PlayerId) -> Result<(), EngineError> {
        self.transact(id, |game| rules::reveal_role(game, target))
    }

    // === Reads ===

    /// Latest committed snapshot.
    pub fn load(&self, id: &GameId) -> Result<Game, EngineError> {
        Ok(self.read(id)?.value)
    }

    /// Score every dealt secret objective against the final record.
    ///
    /// Rejected with [`RejectReason::WrongPhase`] until the game is over.
    pub fn objectives(&self, id: &GameId) -> Result<Vec<ObjectiveResult>, EngineError> {
        let game = self.load(id)?;
        if !game.is_finished() {
            return Err(RejectReason::WrongPhase.into());
        }
        Ok(objectives::evaluate(&game))
    }

    // =========================================================================
    // Transaction
    // =========================================================================

    fn read(&self, id: &GameId) -> Result<Versioned<Game>, EngineError> {
        self.store.load(id).map_err(|err| match err {
            StoreError::Missing(id) => EngineError::NotFound(id),
            err => err.into(),
        })
    }

    fn transact<T: Outcome>(
        &self,
        id: &GameId,
        f: impl FnOnce(&mut Game) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let Versioned { version, value: game } = self.read(id)?;
        let mut staged = game.clone();

        let outcome = f(&mut staged).inspect_err(|err| {
            if let EngineError::Corrupt(detail) = err {
                error!(game = %id, %detail, "corrupt game record, transaction abandoned");
            }
        })?;
        if outcome.is_noop() {
            return Ok(outcome);
        }

        let version = self.store.commit(id, version, &staged)?;
        debug!(game = %id, version, "committed");
        self.narrate(&staged, game.events().len());
        Ok(outcome)
    }

    /// Hand events from `from` onward to each bot that may see them.
    fn narrate(&self, game: &Game, from: usize) {
        let Some(narrator) = &self.narrator else {
            return;
        };
        for bot in game.players().iter().filter(|p| p.is_bot) {
            let Some(perspective) = game.perspective(bot.id) else {
                continue;
            };
            for event in game.events().iter().skip(from).filter(|e| e.is_visible_to(Some(bot.id))) {
                if let Err(err) = narrator.narrate(event, &perspective) {
                    warn!(game = %game.id(), bot = %bot.id, %err, "narration failed");
                }
            }
        }
    }
}

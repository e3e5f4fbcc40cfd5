//! Game state.
//!
//! ## Game
//!
//! The authoritative record of one game:
//! - Phase, round, deadline (changed only by `rules::phase`)
//! - Players in join order
//! - Append-only event log and action history
//! - Round effects: game-level flags produced and consumed by specific roles
//!
//! Logs use `im` persistent vectors so an engine transaction can stage a full
//! copy of the game in O(1) and discard it on failure.

use std::collections::VecDeque;

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::NightAction;
use super::config::GameSettings;
use super::event::GameEvent;
use super::player::{Player, PlayerId};
use crate::error::{EngineError, RejectReason};
use crate::rules::Victory;

/// Stable game identifier assigned by the host.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(pub String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Segment of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Lobby: players join.
    Waiting,
    /// Roles dealt; players read their cards.
    RoleReveal,
    Night,
    /// Day vote.
    Day,
    /// Re-vote restricted to the tied candidates.
    Tiebreak,
    /// Dead players break a repeated tie.
    JuryVoting,
    /// A dying hunter picks a last target.
    HunterShot,
    Finished,
}

impl Phase {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Waiting => "waiting",
            Phase::RoleReveal => "role_reveal",
            Phase::Night => "night",
            Phase::Day => "day",
            Phase::Tiebreak => "tiebreak",
            Phase::JuryVoting => "jury_voting",
            Phase::HunterShot => "hunter_shot",
            Phase::Finished => "finished",
        }
    }

    /// Phases during which votes are collected.
    #[must_use]
    pub const fn is_vote(self) -> bool {
        matches!(self, Phase::Day | Phase::Tiebreak | Phase::JuryVoting)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A game-level flag change produced by a role hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundFlag {
    DoubleKill { round: u32 },
    LeperBlock { round: u32 },
    FairyPairFound,
    SeerDied,
}

/// Game-level effects that outlive a single resolution pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEffects {
    /// Producer: wolf cub death. Consumer: the wolf pack action of this round,
    /// which may take two victims.
    pub double_kill_round: Option<u32>,

    /// Producer: leper killed by wolves. Consumer: the wolf pack action of this
    /// round, which is skipped.
    pub leper_block_round: Option<u32>,

    /// Producer: a fairy searching the other fairy. Consumers: fae kill and
    /// the fairy pair win.
    pub fairy_pair_found: bool,

    /// Producer: seer death. Consumer: apprentice seer scry.
    pub seer_died: bool,
}

impl RoundEffects {
    pub(crate) fn apply(&mut self, flag: RoundFlag) {
        match flag {
            RoundFlag::DoubleKill { round } => self.double_kill_round = Some(round),
            RoundFlag::LeperBlock { round } => self.leper_block_round = Some(round),
            RoundFlag::FairyPairFound => self.fairy_pair_found = true,
            RoundFlag::SeerDied => self.seer_died = true,
        }
    }

    /// Number of victims the wolf pack may take in `round`.
    #[must_use]
    pub fn pack_quota(&self, round: u32) -> usize {
        if self.leper_block_round == Some(round) {
            0
        } else if self.double_kill_round == Some(round) {
            2
        } else {
            1
        }
    }
}

/// How play continues once a hunter's shot resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumeMode {
    /// The triggering death ended a phase; enter the next one fresh.
    Enter,
    /// The triggering death interrupted a phase in progress. Return to it with
    /// its round, votes and submitted actions intact and `remaining_ms` left
    /// on the clock.
    Restore { remaining_ms: Option<u64> },
}

/// State of a pending hunter's last shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HunterInterrupt {
    pub hunter: PlayerId,
    /// Phase that follows the shot.
    pub resume: Phase,
    pub mode: ResumeMode,
    pub shot: Option<PlayerId>,
    /// Player lynched by the transition that triggered the interrupt, kept
    /// for win evaluation once the shot resolves.
    pub lynched: Option<PlayerId>,
}

/// The authoritative game record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    id: GameId,
    seed: u64,
    pub(crate) settings: GameSettings,

    // === Progression (rules::phase only) ===
    pub(crate) phase: Phase,
    pub(crate) round: u32,
    pub(crate) phase_deadline: Option<u64>,

    pub(crate) players: Vec<Player>,

    // === Logs ===
    pub(crate) events: Vector<GameEvent>,
    pub(crate) night_actions: Vector<NightAction>,

    pub(crate) round_effects: RoundEffects,

    // === Vote / interrupt bookkeeping ===
    pub(crate) tied: Vec<PlayerId>,
    pub(crate) pending_hunters: VecDeque<PlayerId>,
    pub(crate) hunter: Option<HunterInterrupt>,

    pub(crate) outcome: Option<Victory>,
}

impl Game {
    /// Create a game in the lobby.
    #[must_use]
    pub fn new(id: GameId, settings: GameSettings, seed: u64) -> Self {
        Self {
            id,
            seed,
            settings,
            phase: Phase::Waiting,
            round: 0,
            phase_deadline: None,
            players: Vec::new(),
            events: Vector::new(),
            night_actions: Vector::new(),
            round_effects: RoundEffects::default(),
            tied: Vec::new(),
            pending_hunters: VecDeque::new(),
            hunter: None,
            outcome: None,
        }
    }

    // === Read access ===

    #[must_use]
    pub fn id(&self) -> &GameId {
        &self.id
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Deadline of the current phase in milliseconds, if it has one.
    #[must_use]
    pub fn deadline(&self) -> Option<u64> {
        self.phase_deadline
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Living players in join order.
    pub fn alive(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive())
    }

    /// Dead players in join order.
    pub fn dead(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_alive())
    }

    #[must_use]
    pub fn living_count(&self) -> usize {
        self.alive().count()
    }

    #[must_use]
    pub fn events(&self) -> &Vector<GameEvent> {
        &self.events
    }

    /// Every action ever submitted, oldest first.
    #[must_use]
    pub fn night_actions(&self) -> &Vector<NightAction> {
        &self.night_actions
    }

    /// Actions submitted for `round`.
    pub fn actions_for_round(&self, round: u32) -> impl Iterator<Item = &NightAction> {
        self.night_actions.iter().filter(move |a| a.round == round)
    }

    #[must_use]
    pub fn has_acted(&self, actor: PlayerId, round: u32) -> bool {
        self.actions_for_round(round).any(|a| a.actor == actor)
    }

    #[must_use]
    pub fn round_effects(&self) -> &RoundEffects {
        &self.round_effects
    }

    /// Candidates of the current tiebreak or jury vote.
    #[must_use]
    pub fn tied(&self) -> &[PlayerId] {
        &self.tied
    }

    #[must_use]
    pub fn hunter(&self) -> Option<&HunterInterrupt> {
        self.hunter.as_ref()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&Victory> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    // === Mutation (crate only) ===

    /// Append a player in the lobby.
    pub(crate) fn add_player(&mut self, name: &str, is_bot: bool) -> Result<PlayerId, RejectReason> {
        if self.phase != Phase::Waiting {
            return Err(RejectReason::AlreadyStarted);
        }
        if self.players.len() >= self.settings.max_players {
            return Err(RejectReason::GameFull);
        }
        if self.players.iter().any(|p| p.name.eq_ignore_ascii_case(name)) {
            return Err(RejectReason::NameTaken(name.to_string()));
        }

        let id = PlayerId::new(self.players.len() as u8);
        self.players.push(Player::new(id, name, is_bot));
        Ok(id)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.index())
    }

    /// Mutable access for resolution code, where a missing player means the
    /// record is corrupt.
    pub(crate) fn expect_player_mut(&mut self, id: PlayerId) -> Result<&mut Player, EngineError> {
        let game_id = self.id.clone();
        self.players
            .get_mut(id.index())
            .ok_or_else(|| EngineError::Corrupt(format!("game {game_id} has no {id}")))
    }

    pub(crate) fn expect_player(&self, id: PlayerId) -> Result<&Player, EngineError> {
        self.player(id)
            .ok_or_else(|| EngineError::Corrupt(format!("game {} has no {id}", self.id)))
    }

    /// Display name for messages; falls back to the id.
    pub(crate) fn name_of(&self, id: PlayerId) -> String {
        self.player(id)
            .map_or_else(|| id.to_string(), |p| p.name.clone())
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    pub(crate) fn record_action(&mut self, action: NightAction) {
        self.night_actions.push_back(action);
    }
}

//! Player identification and per-player records.
//!
//! ## PlayerId
//!
//! Type-safe player identifier supporting up to 255 players. The id is the
//! player's join index, so iteration order over `Game::players` is join order.
//!
//! ## Player
//!
//! A player record splits into public fields (name, alive flag, vote) and
//! private fields (role, team, per-role counters). The resolution engine works
//! on the full record; presentation only ever receives a
//! [`PublicPlayerView`](super::view::PublicPlayerView).

use serde::{Deserialize, Serialize};

use crate::objectives::ObjectiveId;
use crate::roles::{RoleId, Team};

/// Player identifier supporting 1-255 players.
///
/// Player indices are 0-based: the first player to join is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use nightfall::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[3], PlayerId::new(3));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Kind of protection granted during the night.
///
/// Kill causes differ in which protections stop them; see
/// [`DeathCause::blocked_by`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protection {
    Bless,
    Guard,
    Heal,
}

/// Why a player died (or was marked to die).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    WolfKill,
    Poison,
    FaeKill,
    /// The bite that reached the threshold.
    Bite { by: PlayerId },
    Lynch,
    HunterShot { by: PlayerId },
    /// Lost a lover.
    Grief { partner: PlayerId },
    /// Lost a twin.
    TwinBond { partner: PlayerId },
    /// The soulbinder holding a link to this player died.
    SoulLink { partner: PlayerId },
    /// Administrative adjudication.
    Override,
}

impl DeathCause {
    /// Stoppable kills are subject to protections and to the
    /// reveal-instead-of-death exception. Everything else is unstoppable.
    #[must_use]
    pub const fn is_stoppable(&self) -> bool {
        matches!(
            self,
            DeathCause::WolfKill | DeathCause::Poison | DeathCause::FaeKill | DeathCause::Lynch
        )
    }

    /// Whether a protection of `kind` prevents this kill.
    ///
    /// A bless stops every night kill; guards and heals do not stop poison.
    #[must_use]
    pub const fn blocked_by(&self, kind: Protection) -> bool {
        match self {
            DeathCause::WolfKill | DeathCause::FaeKill => true,
            DeathCause::Poison => matches!(kind, Protection::Bless),
            _ => false,
        }
    }

    /// The bond partner responsible for a cascade death, if any.
    #[must_use]
    pub const fn cascade_partner(&self) -> Option<PlayerId> {
        match self {
            DeathCause::Grief { partner }
            | DeathCause::TwinBond { partner }
            | DeathCause::SoulLink { partner } => Some(*partner),
            _ => None,
        }
    }
}

/// When and how a player died.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathRecord {
    pub round: u32,
    pub cause: DeathCause,
}

/// Per-role counters and flags.
///
/// Every field has a single producer role; see [`PlayerUpdate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Witch: antidote spent.
    pub heal_potion_used: bool,
    /// Witch: poison spent.
    pub poison_potion_used: bool,
    /// Doctor: round and target of the last heal.
    pub last_heal: Option<(u32, PlayerId)>,
    /// Priest: the single blessing has been spent.
    pub blessing_used: bool,
    /// Medium: the single resurrection has been spent.
    pub resurrection_used: bool,
    /// Prince: the lynch reveal has been consumed.
    pub reveal_used: bool,
    /// Role shown to everyone by an admin reveal.
    pub publicly_revealed: bool,
    /// Bites received from vampires.
    pub bite_count: u8,
    pub lover: Option<PlayerId>,
    pub twin: Option<PlayerId>,
    /// Soulbinder: one-directional fatal link.
    pub soul_link: Option<PlayerId>,
    /// Recruited by a cult leader.
    pub converted: bool,
    /// Seer and apprentice: werewolves identified.
    pub wolves_found: u32,
    /// Prophet: the prediction locked for a round.
    pub prophecy: Option<(u32, PlayerId)>,
    pub prophecies_fulfilled: u32,
    /// Cannot vote during the day of this round.
    pub silenced_round: Option<u32>,
}

/// A pending change to a player's private state, produced by role behaviors
/// and applied at commit time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerUpdate {
    UseHealPotion,
    UsePoisonPotion,
    RecordHeal { round: u32, target: PlayerId },
    UseBlessing,
    UseResurrection,
    ConsumeReveal,
    PublicReveal,
    IncrementBite,
    SetLover(PlayerId),
    SetTwin(PlayerId),
    SetSoulLink(PlayerId),
    Convert,
    FoundWolf,
    LockProphecy { round: u32, target: PlayerId },
    FulfilProphecy,
    Silence { round: u32 },
}

/// A player record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Computer-controlled; receives narration callbacks.
    pub is_bot: bool,
    pub(crate) role: Option<RoleId>,
    pub(crate) is_alive: bool,
    pub(crate) team: Team,
    pub(crate) vote: Option<PlayerId>,
    pub(crate) objective: Option<ObjectiveId>,
    pub(crate) death: Option<DeathRecord>,
    pub(crate) state: PlayerState,
}

impl Player {
    /// Create a living, unassigned player.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, is_bot: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_bot,
            role: None,
            is_alive: true,
            team: Team::Village,
            vote: None,
            objective: None,
            death: None,
            state: PlayerState::default(),
        }
    }

    #[must_use]
    pub fn role(&self) -> Option<RoleId> {
        self.role
    }

    /// The role, treating an unassigned role as a plain villager.
    #[must_use]
    pub fn role_or_default(&self) -> RoleId {
        self.role.unwrap_or(RoleId::Villager)
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.is_alive
    }

    #[must_use]
    pub fn team(&self) -> Team {
        self.team
    }

    #[must_use]
    pub fn vote(&self) -> Option<PlayerId> {
        self.vote
    }

    #[must_use]
    pub fn objective(&self) -> Option<ObjectiveId> {
        self.objective
    }

    #[must_use]
    pub fn death(&self) -> Option<DeathRecord> {
        self.death
    }

    #[must_use]
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Whether this player belongs to the threat team.
    #[must_use]
    pub fn is_threat(&self) -> bool {
        self.team.is_threat()
    }

    /// Bind a role at game start.
    pub(crate) fn assign(&mut self, role: RoleId) {
        self.role = Some(role);
        self.team = role.default_team();
    }

    /// In-round transformation (e.g. cursed becoming a werewolf).
    pub(crate) fn transform(&mut self, role: RoleId) {
        self.role = Some(role);
        self.team = role.default_team();
    }

    pub(crate) fn kill(&mut self, round: u32, cause: DeathCause) {
        self.is_alive = false;
        self.vote = None;
        self.death = Some(DeathRecord { round, cause });
    }

    pub(crate) fn revive(&mut self) {
        self.is_alive = true;
        self.death = None;
        self.state.bite_count = 0;
    }

    /// Apply a single private-state update.
    pub(crate) fn apply(&mut self, update: PlayerUpdate) {
        let state = &mut self.state;
        match update {
            PlayerUpdate::UseHealPotion => state.heal_potion_used = true,
            PlayerUpdate::UsePoisonPotion => state.poison_potion_used = true,
            PlayerUpdate::RecordHeal { round, target } => state.last_heal = Some((round, target)),
            PlayerUpdate::UseBlessing => state.blessing_used = true,
            PlayerUpdate::UseResurrection => state.resurrection_used = true,
            PlayerUpdate::ConsumeReveal => state.reveal_used = true,
            PlayerUpdate::PublicReveal => state.publicly_revealed = true,
            PlayerUpdate::IncrementBite => state.bite_count = state.bite_count.saturating_add(1),
            PlayerUpdate::SetLover(partner) => state.lover = Some(partner),
            PlayerUpdate::SetTwin(partner) => state.twin = Some(partner),
            PlayerUpdate::SetSoulLink(target) => state.soul_link = Some(target),
            PlayerUpdate::Convert => state.converted = true,
            PlayerUpdate::FoundWolf => state.wolves_found += 1,
            PlayerUpdate::LockProphecy { round, target } => state.prophecy = Some((round, target)),
            PlayerUpdate::FulfilProphecy => state.prophecies_fulfilled += 1,
            PlayerUpdate::Silence { round } => state.silenced_round = Some(round),
        }
    }

    /// Bond partners whose death follows this player's, with the cause they die of.
    pub(crate) fn bonds(&self) -> impl Iterator<Item = (PlayerId, DeathCause)> + '_ {
        let me = self.id;
        let lover = self.state.lover.map(|p| (p, DeathCause::Grief { partner: me }));
        let twin = self.state.twin.map(|p| (p, DeathCause::TwinBond { partner: me }));
        let link = self.state.soul_link.map(|p| (p, DeathCause::SoulLink { partner: me }));
        lover.into_iter().chain(twin).chain(link)
    }
}

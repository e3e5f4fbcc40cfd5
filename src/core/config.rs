//! Game settings.
//!
//! Hosts configure a game at creation by providing:
//! - Player limits and the werewolf count
//! - Boolean toggles for each special role
//! - Numeric limits (vampire kill quota, phase durations)
//!
//! Settings are fixed once the game leaves the lobby.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::roles::RoleId;

/// Phase lengths in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseDurations {
    pub role_reveal_ms: u64,
    pub night_ms: u64,
    pub day_ms: u64,
    pub tiebreak_ms: u64,
    pub jury_ms: u64,
    pub hunter_ms: u64,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            role_reveal_ms: 15_000,
            night_ms: 60_000,
            day_ms: 180_000,
            tiebreak_ms: 60_000,
            jury_ms: 45_000,
            hunter_ms: 30_000,
        }
    }
}

/// Complete game settings.
///
/// ## Example
///
/// ```
/// use nightfall::core::GameSettings;
/// use nightfall::roles::RoleId;
///
/// let settings = GameSettings::new()
///     .with_werewolves(2)
///     .with_role(RoleId::Seer)
///     .with_role(RoleId::Witch)
///     .with_jury(true);
///
/// assert!(settings.is_enabled(RoleId::Seer));
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub min_players: usize,
    pub max_players: usize,

    /// Plain werewolves dealt at start.
    pub werewolf_count: usize,

    /// Special roles dealt at start. Twins and fairies are dealt as pairs.
    pub roles: BTreeSet<RoleId>,

    /// Break a repeated tie with a vote among the dead.
    pub jury_enabled: bool,

    /// Deal a secret objective to every player.
    pub secret_objectives: bool,

    /// The threat team wins when its headcount equals the rest.
    /// When false it must strictly exceed it.
    pub threat_wins_at_parity: bool,

    /// Bite kills a vampire needs to win.
    pub vampire_kill_quota: u32,

    pub durations: PhaseDurations,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            min_players: 3,
            max_players: 24,
            werewolf_count: 1,
            roles: BTreeSet::new(),
            jury_enabled: false,
            secret_objectives: false,
            threat_wins_at_parity: true,
            vampire_kill_quota: 2,
            durations: PhaseDurations::default(),
        }
    }
}

impl GameSettings {
    /// Default settings: one werewolf, no special roles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a JSON document and validate them.
    ///
    /// Missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Set the werewolf count.
    #[must_use]
    pub fn with_werewolves(mut self, count: usize) -> Self {
        self.werewolf_count = count;
        self
    }

    /// Enable a special role.
    #[must_use]
    pub fn with_role(mut self, role: RoleId) -> Self {
        self.roles.insert(role);
        self
    }

    /// Enable or disable jury voting.
    #[must_use]
    pub fn with_jury(mut self, enabled: bool) -> Self {
        self.jury_enabled = enabled;
        self
    }

    /// Enable or disable secret objectives.
    #[must_use]
    pub fn with_secret_objectives(mut self, enabled: bool) -> Self {
        self.secret_objectives = enabled;
        self
    }

    /// Choose the parity rule for the threat team.
    #[must_use]
    pub fn with_threat_parity(mut self, wins_at_parity: bool) -> Self {
        self.threat_wins_at_parity = wins_at_parity;
        self
    }

    /// Set player limits.
    #[must_use]
    pub fn with_player_limits(mut self, min: usize, max: usize) -> Self {
        self.min_players = min;
        self.max_players = max;
        self
    }

    /// Set phase durations.
    #[must_use]
    pub fn with_durations(mut self, durations: PhaseDurations) -> Self {
        self.durations = durations;
        self
    }

    /// Whether a special role is toggled on.
    #[must_use]
    pub fn is_enabled(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }

    /// Number of role cards the settings deal before villagers fill the rest.
    #[must_use]
    pub fn dealt_roles(&self) -> usize {
        self.werewolf_count
            + self
                .roles
                .iter()
                .map(|role| if role.is_paired() { 2 } else { 1 })
                .sum::<usize>()
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_players < 3 {
            return Err(ConfigError::InvalidValue {
                field: "min_players",
                message: format!("must be at least 3, got {}", self.min_players),
            });
        }
        if self.max_players < self.min_players || self.max_players > usize::from(u8::MAX) {
            return Err(ConfigError::InvalidValue {
                field: "max_players",
                message: format!("must be within {}..=255, got {}", self.min_players, self.max_players),
            });
        }
        if self.werewolf_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "werewolf_count",
                message: "at least one werewolf is required".to_string(),
            });
        }
        if self.dealt_roles() > self.max_players {
            return Err(ConfigError::InvalidValue {
                field: "roles",
                message: format!(
                    "{} role cards cannot fit {} seats",
                    self.dealt_roles(),
                    self.max_players
                ),
            });
        }
        if let Some(role) = self.roles.iter().find(|r| matches!(r, RoleId::Villager | RoleId::Werewolf)) {
            return Err(ConfigError::InvalidValue {
                field: "roles",
                message: format!("{} is not a special role", role.name()),
            });
        }
        if self.vampire_kill_quota == 0 {
            return Err(ConfigError::InvalidValue {
                field: "vampire_kill_quota",
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

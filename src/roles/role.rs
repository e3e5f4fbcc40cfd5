//! Role identifiers and teams.
//!
//! The role set is closed: every role the engine knows is a variant of
//! [`RoleId`]. Role names coming from hosts or stored records are parsed
//! leniently; anything unknown becomes a plain villager.

use serde::{Deserialize, Serialize};

/// Identifier of a role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleId {
    Villager,

    // === Threat team ===
    Werewolf,
    WolfCub,

    // === Village ===
    Cursed,
    Seer,
    ApprenticeSeer,
    Doctor,
    Bodyguard,
    Priest,
    Witch,
    Hunter,
    Cupid,
    Twin,
    Prince,
    Leper,
    Detective,
    Exiler,
    Silencer,
    Medium,
    Prophet,

    // === Solo ===
    Fool,
    Vampire,
    CultLeader,
    Fairy,
    Soulbinder,
}

impl RoleId {
    /// Every role, villager first.
    pub const ALL: [RoleId; 25] = [
        RoleId::Villager,
        RoleId::Werewolf,
        RoleId::WolfCub,
        RoleId::Cursed,
        RoleId::Seer,
        RoleId::ApprenticeSeer,
        RoleId::Doctor,
        RoleId::Bodyguard,
        RoleId::Priest,
        RoleId::Witch,
        RoleId::Hunter,
        RoleId::Cupid,
        RoleId::Twin,
        RoleId::Prince,
        RoleId::Leper,
        RoleId::Detective,
        RoleId::Exiler,
        RoleId::Silencer,
        RoleId::Medium,
        RoleId::Prophet,
        RoleId::Fool,
        RoleId::Vampire,
        RoleId::CultLeader,
        RoleId::Fairy,
        RoleId::Soulbinder,
    ];

    /// Parse a role name. Unknown names resolve to [`RoleId::Villager`].
    ///
    /// ```
    /// use nightfall::roles::RoleId;
    ///
    /// assert_eq!(RoleId::parse("wolf_cub"), RoleId::WolfCub);
    /// assert_eq!(RoleId::parse("Seer"), RoleId::Seer);
    /// assert_eq!(RoleId::parse("dragon"), RoleId::Villager);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let normalized = name.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|role| role.name() == normalized)
            .unwrap_or(RoleId::Villager)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            RoleId::Villager => "villager",
            RoleId::Werewolf => "werewolf",
            RoleId::WolfCub => "wolf_cub",
            RoleId::Cursed => "cursed",
            RoleId::Seer => "seer",
            RoleId::ApprenticeSeer => "apprentice_seer",
            RoleId::Doctor => "doctor",
            RoleId::Bodyguard => "bodyguard",
            RoleId::Priest => "priest",
            RoleId::Witch => "witch",
            RoleId::Hunter => "hunter",
            RoleId::Cupid => "cupid",
            RoleId::Twin => "twin",
            RoleId::Prince => "prince",
            RoleId::Leper => "leper",
            RoleId::Detective => "detective",
            RoleId::Exiler => "exiler",
            RoleId::Silencer => "silencer",
            RoleId::Medium => "medium",
            RoleId::Prophet => "prophet",
            RoleId::Fool => "fool",
            RoleId::Vampire => "vampire",
            RoleId::CultLeader => "cult_leader",
            RoleId::Fairy => "fairy",
            RoleId::Soulbinder => "soulbinder",
        }
    }

    /// Display name used in narrative messages.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            RoleId::Villager => "Villager",
            RoleId::Werewolf => "Werewolf",
            RoleId::WolfCub => "Wolf Cub",
            RoleId::Cursed => "Cursed",
            RoleId::Seer => "Seer",
            RoleId::ApprenticeSeer => "Apprentice Seer",
            RoleId::Doctor => "Doctor",
            RoleId::Bodyguard => "Bodyguard",
            RoleId::Priest => "Priest",
            RoleId::Witch => "Witch",
            RoleId::Hunter => "Hunter",
            RoleId::Cupid => "Cupid",
            RoleId::Twin => "Twin",
            RoleId::Prince => "Prince",
            RoleId::Leper => "Leper",
            RoleId::Detective => "Detective",
            RoleId::Exiler => "Exiler",
            RoleId::Silencer => "Silencer",
            RoleId::Medium => "Medium",
            RoleId::Prophet => "Prophet",
            RoleId::Fool => "Fool",
            RoleId::Vampire => "Vampire",
            RoleId::CultLeader => "Cult Leader",
            RoleId::Fairy => "Fairy",
            RoleId::Soulbinder => "Soulbinder",
        }
    }

    /// Team a player of this role starts on.
    #[must_use]
    pub const fn default_team(self) -> Team {
        match self {
            RoleId::Werewolf | RoleId::WolfCub => Team::Werewolves,
            RoleId::Fool | RoleId::Vampire | RoleId::CultLeader | RoleId::Fairy => Team::Solo,
            _ => Team::Village,
        }
    }

    /// Roles dealt as a pair of cards.
    #[must_use]
    pub const fn is_paired(self) -> bool {
        matches!(self, RoleId::Twin | RoleId::Fairy)
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Alliance a player currently belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Village,
    /// The threat team.
    Werewolves,
    /// Plays for an individual or pair win condition.
    Solo,
}

impl Team {
    /// Whether members count towards the threat headcount.
    #[must_use]
    pub const fn is_threat(self) -> bool {
        matches!(self, Team::Werewolves)
    }
}

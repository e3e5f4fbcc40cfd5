//! Secret objectives.
//!
//! Optional bonus goals dealt privately at game start. They never affect the
//! winner; they are scored against the game record when asked.
//!
//! | Objective       | Dealt to             | Completed when                          |
//! |-----------------|----------------------|-----------------------------------------|
//! | Survivor        | anyone               | alive                                   |
//! | Matchmaker      | cupid                | both lovers alive                       |
//! | Big Game Hunter | hunter               | their last shot killed a werewolf       |
//! | Truth Seeker    | seer, apprentice     | found two werewolves                    |
//! | Prophet of Doom | prophet              | two prophecies fulfilled                |
//! | Lone Wolf       | werewolf, wolf cub   | the only wolf alive at a pack victory   |

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{DeathCause, Game, GameRng, Player, PlayerId};
use crate::roles::{RoleId, Team};
use crate::rules::WinnerCode;

/// Objective identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveId {
    Survivor,
    Matchmaker,
    BigGameHunter,
    TruthSeeker,
    ProphetOfDoom,
    LoneWolf,
}

/// Static objective definition.
#[derive(Clone, Copy)]
pub struct SecretObjective {
    pub id: ObjectiveId,
    pub name: &'static str,
    pub description: &'static str,
    /// Roles this objective may be dealt to.
    pub eligible: fn(RoleId) -> bool,
    pub complete: fn(&Game, &Player) -> bool,
}

impl std::fmt::Debug for SecretObjective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretObjective").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Scored objective for one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveResult {
    pub player: PlayerId,
    pub objective: ObjectiveId,
    pub completed: bool,
}

static OBJECTIVES: [SecretObjective; 6] = [
    SecretObjective {
        id: ObjectiveId::Survivor,
        name: "Survivor",
        description: "Be alive when the game ends.",
        eligible: |_| true,
        complete: |_, player| player.is_alive(),
    },
    SecretObjective {
        id: ObjectiveId::Matchmaker,
        name: "Matchmaker",
        description: "Keep both of your lovers alive.",
        eligible: |role| role == RoleId::Cupid,
        complete: |game, _| {
            let lovers: Vec<&Player> = game.players().iter().filter(|p| p.state().lover.is_some()).collect();
            !lovers.is_empty() && lovers.iter().all(|p| p.is_alive())
        },
    },
    SecretObjective {
        id: ObjectiveId::BigGameHunter,
        name: "Big Game Hunter",
        description: "Take a werewolf down with your last shot.",
        eligible: |role| role == RoleId::Hunter,
        complete: |game, player| {
            game.dead().any(|victim| {
                victim.team() == Team::Werewolves
                    && victim.death().map(|d| d.cause) == Some(DeathCause::HunterShot { by: player.id })
            })
        },
    },
    SecretObjective {
        id: ObjectiveId::TruthSeeker,
        name: "Truth Seeker",
        description: "Uncover two werewolves.",
        eligible: |role| matches!(role, RoleId::Seer | RoleId::ApprenticeSeer),
        complete: |_, player| player.state().wolves_found >= 2,
    },
    SecretObjective {
        id: ObjectiveId::ProphetOfDoom,
        name: "Prophet of Doom",
        description: "Correctly predict two lynchings.",
        eligible: |role| role == RoleId::Prophet,
        complete: |_, player| player.state().prophecies_fulfilled >= 2,
    },
    SecretObjective {
        id: ObjectiveId::LoneWolf,
        name: "Lone Wolf",
        description: "Be the last wolf standing when the pack wins.",
        eligible: |role| matches!(role, RoleId::Werewolf | RoleId::WolfCub),
        complete: |game, player| {
            let pack_won = game.outcome().is_some_and(|v| v.winner == WinnerCode::Werewolves);
            pack_won
                && player.is_alive()
                && game.alive().filter(|p| p.team() == Team::Werewolves).count() == 1
        },
    },
];

/// Look up an objective definition.
#[must_use]
pub fn objective(id: ObjectiveId) -> &'static SecretObjective {
    let index = match id {
        ObjectiveId::Survivor => 0,
        ObjectiveId::Matchmaker => 1,
        ObjectiveId::BigGameHunter => 2,
        ObjectiveId::TruthSeeker => 3,
        ObjectiveId::ProphetOfDoom => 4,
        ObjectiveId::LoneWolf => 5,
    };
    &OBJECTIVES[index]
}

/// Objectives that may be dealt to `role`.
pub fn eligible_for(role: RoleId) -> impl Iterator<Item = &'static SecretObjective> {
    OBJECTIVES.iter().filter(move |o| (o.eligible)(role))
}

/// Deal one eligible objective to every player.
pub(crate) fn deal(game: &mut Game, rng: &mut GameRng) {
    for player in &mut game.players {
        let options: Vec<ObjectiveId> = eligible_for(player.role_or_default()).map(|o| o.id).collect();
        player.objective = rng.choose(&options).copied();
        debug!(player = %player.id, objective = ?player.objective, "objective dealt");
    }
}

/// Score every dealt objective against the record. Only meaningful once the
/// game is over.
#[must_use]
pub fn evaluate(game: &Game) -> Vec<ObjectiveResult> {
    game.players()
        .iter()
        .filter_map(|player| {
            let id = player.objective()?;
            Some(ObjectiveResult {
                player: player.id,
                objective: id,
                completed: (objective(id).complete)(game, player),
            })
        })
        .collect()
}

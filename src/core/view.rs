//! Player-facing views of a game.
//!
//! The presentation layer only ever receives these types. A player's role is
//! visible to a viewer when the viewer is that player, when the player is
//! dead or has been publicly revealed, when both are werewolves, or once the
//! game is over.

use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use super::player::{Player, PlayerId};
use super::state::{Game, Phase};
use crate::roles::RoleId;

/// Public projection of a player record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayerView {
    pub id: PlayerId,
    pub name: String,
    pub is_alive: bool,
    pub is_bot: bool,
    pub vote: Option<PlayerId>,
    pub role: Option<RoleId>,
}

/// Sanitized snapshot for one player, handed to narration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPerspective {
    pub viewer: PlayerId,
    pub role: Option<RoleId>,
    pub is_alive: bool,
    pub phase: Phase,
    pub round: u32,
    pub players: Vec<PublicPlayerView>,
}

impl Game {
    /// Whether `viewer` may see `subject`'s role.
    #[must_use]
    pub fn role_visible_to(&self, subject: &Player, viewer: Option<PlayerId>) -> bool {
        if self.is_finished() || !subject.is_alive() || subject.state().publicly_revealed {
            return true;
        }
        let Some(viewer) = viewer.and_then(|v| self.player(v)) else {
            return false;
        };
        viewer.id == subject.id || (viewer.is_threat() && subject.is_threat())
    }

    /// Public view of every player, as seen by `viewer`.
    #[must_use]
    pub fn public_players(&self, viewer: Option<PlayerId>) -> Vec<PublicPlayerView> {
        self.players()
            .iter()
            .map(|p| PublicPlayerView {
                id: p.id,
                name: p.name.clone(),
                is_alive: p.is_alive(),
                is_bot: p.is_bot,
                vote: p.vote(),
                role: if self.role_visible_to(p, viewer) { p.role() } else { None },
            })
            .collect()
    }

    /// Events globally visible or addressed to `viewer`, oldest first.
    pub fn visible_events(&self, viewer: Option<PlayerId>) -> impl Iterator<Item = &GameEvent> {
        self.events().iter().filter(move |e| e.is_visible_to(viewer))
    }

    /// Narration snapshot for one player.
    #[must_use]
    pub fn perspective(&self, viewer: PlayerId) -> Option<PlayerPerspective> {
        let me = self.player(viewer)?;
        Some(PlayerPerspective {
            viewer,
            role: me.role(),
            is_alive: me.is_alive(),
            phase: self.phase(),
            round: self.round(),
            players: self.public_players(Some(viewer)),
        })
    }
}

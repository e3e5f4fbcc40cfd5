//! Win condition evaluation.
//!
//! One evaluator serves every death-producing path: night resolution, day and
//! jury lynches, the hunter's shot and admin overrides. Checks run in a fixed
//! order and the first match wins:
//!
//! 1. Lynch-specific individual wins (the fool)
//! 2. Pair wins (lovers, a found fairy pair) when they are the last two alive
//! 3. Role-declared wins ([`RoleBehavior::check_win`](crate::roles::RoleBehavior::check_win))
//! 4. Team wins: no threat alive, or the threat at (or over) parity
//! 5. Draw when nobody is alive

use serde::{Deserialize, Serialize};

use crate::core::{Game, Player, PlayerId};
use crate::roles::{behavior_of, RoleId, Team};

/// Who won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinnerCode {
    Village,
    Werewolves,
    Lovers,
    Fairies,
    Fool,
    Vampire,
    Cult,
    Draw,
}

impl WinnerCode {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            WinnerCode::Village => "village",
            WinnerCode::Werewolves => "werewolves",
            WinnerCode::Lovers => "lovers",
            WinnerCode::Fairies => "fairies",
            WinnerCode::Fool => "fool",
            WinnerCode::Vampire => "vampire",
            WinnerCode::Cult => "cult",
            WinnerCode::Draw => "draw",
        }
    }
}

/// A finished game's outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Victory {
    pub winner: WinnerCode,
    pub message: String,
    /// Winning players in join order. Empty for a draw.
    pub winners: Vec<PlayerId>,
}

impl Victory {
    pub fn new(winner: WinnerCode, message: impl Into<String>, winners: Vec<PlayerId>) -> Self {
        Self {
            winner,
            message: message.into(),
            winners,
        }
    }

    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winners.contains(&player)
    }
}

/// The ordered win evaluator. Pure and idempotent.
pub struct WinEvaluator;

impl WinEvaluator {
    /// Evaluate the game. `lynched` is the player a vote just killed, if any.
    #[must_use]
    pub fn evaluate(game: &Game, lynched: Option<PlayerId>) -> Option<Victory> {
        Self::lynch_win(game, lynched)
            .or_else(|| Self::pair_win(game))
            .or_else(|| Self::role_win(game))
            .or_else(|| Self::team_win(game))
            .or_else(|| Self::draw(game))
    }

    fn lynch_win(game: &Game, lynched: Option<PlayerId>) -> Option<Victory> {
        let player = game.player(lynched?)?;
        if player.is_alive() || !behavior_of(player).wins_when_lynched() {
            return None;
        }
        Some(Victory::new(
            WinnerCode::Fool,
            format!("{} wanted to be lynched all along. The Fool wins!", player.name),
            vec![player.id],
        ))
    }

    fn pair_win(game: &Game) -> Option<Victory> {
        let living: Vec<&Player> = game.alive().collect();
        let [a, b] = living.as_slice() else {
            return None;
        };

        if a.state().lover == Some(b.id) && b.state().lover == Some(a.id) {
            return Some(Victory::new(
                WinnerCode::Lovers,
                format!("{} and {} are the last ones standing. Love wins!", a.name, b.name),
                vec![a.id, b.id],
            ));
        }

        let fairies = a.role() == Some(RoleId::Fairy) && b.role() == Some(RoleId::Fairy);
        if fairies && game.round_effects().fairy_pair_found {
            return Some(Victory::new(
                WinnerCode::Fairies,
                format!("{} and {} found each other. The fairies win!", a.name, b.name),
                vec![a.id, b.id],
            ));
        }

        None
    }

    fn role_win(game: &Game) -> Option<Victory> {
        game.players()
            .iter()
            .find_map(|player| behavior_of(player).check_win(game, player))
    }

    fn team_win(game: &Game) -> Option<Victory> {
        let living = game.living_count();
        let threat = game.alive().filter(|p| p.is_threat()).count();
        let rest = living - threat;

        if threat == 0 && living > 0 {
            return Some(Victory::new(
                WinnerCode::Village,
                "Every werewolf is dead. The village wins!",
                Self::team_members(game, Team::Village),
            ));
        }

        let threat_wins = if game.settings().threat_wins_at_parity {
            threat >= rest
        } else {
            threat > rest
        };
        if threat > 0 && threat_wins {
            return Some(Victory::new(
                WinnerCode::Werewolves,
                "The werewolves have overrun the village. The werewolves win!",
                Self::team_members(game, Team::Werewolves),
            ));
        }

        None
    }

    fn draw(game: &Game) -> Option<Victory> {
        (game.living_count() == 0)
            .then(|| Victory::new(WinnerCode::Draw, "Nobody survived. It's a draw.", Vec::new()))
    }

    fn team_members(game: &Game, team: Team) -> Vec<PlayerId> {
        game.players()
            .iter()
            .filter(|p| p.team() == team)
            .map(|p| p.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DeathCause, GameSettings, PlayerUpdate};
    use crate::rules::GameBuilder;

    fn p(id: u8) -> PlayerId {
        PlayerId::new(id)
    }

    fn kill(game: &mut Game, id: u8, cause: DeathCause) {
        game.player_mut(p(id)).unwrap().kill(1, cause);
    }

    #[test]
    fn test_no_winner_mid_game() {
        let game = GameBuilder::new()
            .player("Wolf", RoleId::Werewolf)
            .player("Ada", RoleId::Villager)
            .player("Bo", RoleId::Villager)
            .player("Cy", RoleId::Villager)
            .build();

        assert!(WinEvaluator::evaluate(&game, None).is_none());
    }

    #[test]
    fn test_village_wins_without_threat() {
        let mut game = GameBuilder::new()
            .player("Wolf", RoleId::Werewolf)
            .player("Ada", RoleId::Villager)
            .player("Bo", RoleId::Seer)
            .build();
        kill(&mut game, 0, DeathCause::Lynch);

        let victory = WinEvaluator::evaluate(&game, Some(p(0))).unwrap();
        assert_eq!(victory.winner, WinnerCode::Village);
        assert_eq!(victory.winners, vec![p(1), p(2)]);
    }

    #[test]
    fn test_werewolves_win_at_parity() {
        let mut game = GameBuilder::new()
            .player("Wolf", RoleId::Werewolf)
            .player("Ada", RoleId::Villager)
            .player("Bo", RoleId::Villager)
            .build();
        kill(&mut game, 1, DeathCause::WolfKill);

        let victory = WinEvaluator::evaluate(&game, None).unwrap();
        assert_eq!(victory.winner, WinnerCode::Werewolves);
        assert!(victory.is_winner(p(0)));
    }

    #[test]
    fn test_strict_majority_rule() {
        let mut game = GameBuilder::new()
            .settings(GameSettings::new().with_threat_parity(false))
            .player("Wolf", RoleId::Werewolf)
            .player("Ada", RoleId::Villager)
            .player("Bo", RoleId::Villager)
            .build();
        kill(&mut game, 1, DeathCause::WolfKill);

        assert!(WinEvaluator::evaluate(&game, None).is_none());
    }

    #[test]
    fn test_lovers_win_before_team_rule() {
        let mut game = GameBuilder::new()
            .player("Wolf", RoleId::Werewolf)
            .player("Ada", RoleId::Villager)
            .player("Bo", RoleId::Villager)
            .build();
        game.player_mut(p(0)).unwrap().apply(PlayerUpdate::SetLover(p(1)));
        game.player_mut(p(1)).unwrap().apply(PlayerUpdate::SetLover(p(0)));
        kill(&mut game, 2, DeathCause::WolfKill);

        let victory = WinEvaluator::evaluate(&game, None).unwrap();
        assert_eq!(victory.winner, WinnerCode::Lovers);
        assert_eq!(victory.winners, vec![p(0), p(1)]);
    }

    #[test]
    fn test_fool_wins_when_lynched() {
        let mut game = GameBuilder::new()
            .player("Wolf", RoleId::Werewolf)
            .player("Fool", RoleId::Fool)
            .player("Ada", RoleId::Villager)
            .player("Bo", RoleId::Villager)
            .build();
        kill(&mut game, 1, DeathCause::Lynch);

        let victory = WinEvaluator::evaluate(&game, Some(p(1))).unwrap();
        assert_eq!(victory.winner, WinnerCode::Fool);
        assert_eq!(victory.winners, vec![p(1)]);

        // Without the lynch context, nothing is decided.
        assert!(WinEvaluator::evaluate(&game, None).is_none());
    }

    #[test]
    fn test_draw_when_nobody_alive() {
        let mut game = GameBuilder::new()
            .player("Wolf", RoleId::Werewolf)
            .player("Ada", RoleId::Villager)
            .player("Bo", RoleId::Villager)
            .build();
        for id in 0..3 {
            kill(&mut game, id, DeathCause::Override);
        }

        let victory = WinEvaluator::evaluate(&game, None).unwrap();
        assert_eq!(victory.winner, WinnerCode::Draw);
        assert!(victory.winners.is_empty());
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let mut game = GameBuilder::new()
            .player("Wolf", RoleId::Werewolf)
            .player("Ada", RoleId::Villager)
            .player("Bo", RoleId::Villager)
            .build();
        kill(&mut game, 0, DeathCause::Lynch);

        let first = WinEvaluator::evaluate(&game, Some(p(0)));
        let second = WinEvaluator::evaluate(&game, Some(p(0)));
        assert_eq!(first, second);
    }
}

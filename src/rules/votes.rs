//! Vote eligibility and tallying.
//!
//! | Phase       | Voters                  | Candidates               |
//! |-------------|-------------------------|--------------------------|
//! | Day         | living, not silenced    | any living player        |
//! | Tiebreak    | living, not silenced    | living tied candidates   |
//! | Jury voting | dead                    | living tied candidates   |
//!
//! Nobody may vote for themself. A strict plurality lynches; anything else
//! is a tie.

use std::collections::BTreeMap;

use crate::core::{Game, Phase, Player, PlayerId};
use crate::error::RejectReason;

/// Result of counting the current votes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tally {
    /// A strict plurality.
    Lynch(PlayerId),
    /// Two or more candidates share the highest count, in join order.
    Tie(Vec<PlayerId>),
    NoVotes,
}

/// Whether `player` may vote in the current phase.
#[must_use]
pub fn is_eligible_voter(game: &Game, player: &Player) -> bool {
    match game.phase() {
        Phase::Day | Phase::Tiebreak => {
            player.is_alive() && player.state().silenced_round != Some(game.round())
        }
        Phase::JuryVoting => !player.is_alive(),
        _ => false,
    }
}

/// Whether `target` may receive votes in the current phase.
#[must_use]
pub fn is_candidate(game: &Game, target: PlayerId) -> bool {
    let alive = game.player(target).is_some_and(Player::is_alive);
    match game.phase() {
        Phase::Day => alive,
        Phase::Tiebreak | Phase::JuryVoting => alive && game.tied().contains(&target),
        _ => false,
    }
}

/// Validate a vote.
pub fn check_vote(game: &Game, voter: PlayerId, target: PlayerId) -> Result<(), RejectReason> {
    if !game.phase().is_vote() {
        return Err(RejectReason::WrongPhase);
    }
    let player = game.player(voter).ok_or(RejectReason::UnknownPlayer(voter))?;
    if !is_eligible_voter(game, player) {
        return Err(match game.phase() {
            Phase::JuryVoting => RejectReason::NotDead(voter),
            _ if !player.is_alive() => RejectReason::NotAlive(voter),
            _ => RejectReason::Silenced,
        });
    }
    if voter == target || !is_candidate(game, target) {
        return Err(RejectReason::InvalidTarget(target));
    }
    Ok(())
}

/// Count the eligible votes cast for valid candidates.
#[must_use]
pub fn tally(game: &Game) -> Tally {
    let mut counts: BTreeMap<PlayerId, usize> = BTreeMap::new();
    for player in game.players() {
        if !is_eligible_voter(game, player) {
            continue;
        }
        if let Some(target) = player.vote().filter(|&t| is_candidate(game, t)) {
            *counts.entry(target).or_default() += 1;
        }
    }

    let Some(&top) = counts.values().max() else {
        return Tally::NoVotes;
    };
    let leaders: Vec<PlayerId> = counts
        .into_iter()
        .filter(|&(_, count)| count == top)
        .map(|(id, _)| id)
        .collect();
    match leaders.as_slice() {
        [one] => Tally::Lynch(*one),
        _ => Tally::Tie(leaders),
    }
}

/// Whether every eligible voter has voted.
#[must_use]
pub fn all_voted(game: &Game) -> bool {
    game.players()
        .iter()
        .filter(|p| is_eligible_voter(game, p))
        .all(|p| p.vote().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DeathCause, PlayerUpdate};
    use crate::roles::RoleId;
    use crate::rules::GameBuilder;

    fn p(id: u8) -> PlayerId {
        PlayerId::new(id)
    }

    fn day() -> Game {
        let mut game = GameBuilder::new()
            .player("Wolf", RoleId::Werewolf)
            .player("Ada", RoleId::Villager)
            .player("Bo", RoleId::Villager)
            .player("Cy", RoleId::Villager)
            .build();
        game.phase = Phase::Day;
        game
    }

    fn vote(game: &mut Game, voter: u8, target: u8) {
        game.player_mut(p(voter)).unwrap().vote = Some(p(target));
    }

    #[test]
    fn test_plurality_lynches() {
        let mut game = day();
        vote(&mut game, 0, 1);
        vote(&mut game, 2, 0);
        vote(&mut game, 3, 0);

        assert_eq!(tally(&game), Tally::Lynch(p(0)));
    }

    #[test]
    fn test_exact_tie() {
        let mut game = day();
        vote(&mut game, 0, 1);
        vote(&mut game, 1, 0);

        assert_eq!(tally(&game), Tally::Tie(vec![p(0), p(1)]));
    }

    #[test]
    fn test_no_votes() {
        assert_eq!(tally(&day()), Tally::NoVotes);
    }

    #[test]
    fn test_silenced_vote_does_not_count() {
        let mut game = day();
        game.player_mut(p(2)).unwrap().apply(PlayerUpdate::Silence { round: 1 });
        vote(&mut game, 2, 0);
        vote(&mut game, 0, 1);

        assert_eq!(tally(&game), Tally::Lynch(p(1)));
        assert_eq!(check_vote(&game, p(2), p(0)), Err(RejectReason::Silenced));
    }

    #[test]
    fn test_tiebreak_restricted_to_tied() {
        let mut game = day();
        game.phase = Phase::Tiebreak;
        game.tied = vec![p(0), p(1)];

        assert!(check_vote(&game, p(2), p(0)).is_ok());
        assert_eq!(check_vote(&game, p(2), p(3)), Err(RejectReason::InvalidTarget(p(3))));
        assert_eq!(check_vote(&game, p(0), p(0)), Err(RejectReason::InvalidTarget(p(0))));
    }

    #[test]
    fn test_jury_is_the_dead() {
        let mut game = day();
        game.player_mut(p(3)).unwrap().kill(1, DeathCause::WolfKill);
        game.phase = Phase::JuryVoting;
        game.tied = vec![p(0), p(1)];

        assert_eq!(check_vote(&game, p(2), p(0)), Err(RejectReason::NotDead(p(2))));
        assert!(check_vote(&game, p(3), p(1)).is_ok());

        vote(&mut game, 3, 1);
        assert_eq!(tally(&game), Tally::Lynch(p(1)));
        assert!(all_voted(&game));
    }

    #[test]
    fn test_votes_outside_vote_phase() {
        let mut game = day();
        game.phase = Phase::Night;
        assert_eq!(check_vote(&game, p(1), p(0)), Err(RejectReason::WrongPhase));
    }
}

//! Day, tiebreak and jury voting tests.

use nightfall::core::{ActionKind, Command, EventKind, Game, GameSettings, Phase, PlayerId};
use nightfall::roles::RoleId;
use nightfall::rules::{advance, everyone_acted, submit, Advance, AdvanceTrigger, GameBuilder, WinnerCode};

fn p(id: u8) -> PlayerId {
    PlayerId::new(id)
}

fn vote(game: &mut Game, voter: u8, target: u8) {
    submit(game, p(voter), Command::Vote { target: p(target) }, 0).unwrap();
}

fn next(game: &mut Game) -> Advance {
    advance(game, u64::MAX, AdvanceTrigger::Deadline).unwrap()
}

fn village(names: &[&str]) -> GameBuilder {
    names
        .iter()
        .fold(GameBuilder::new().player("Wolf", RoleId::Werewolf), |builder, name| {
            builder.player(*name, RoleId::Villager)
        })
}

/// Test the three-player tie: after the night kill the survivors split 1-1
/// and the day ends in an unresolved tie rather than a game over.
#[test]
fn test_three_player_tie() {
    let mut game = village(&["Ada", "Bo"])
        .settings(GameSettings::new().with_threat_parity(false))
        .build();
    submit(&mut game, p(0), Command::night(ActionKind::WolfKill, &[p(1)]), 0).unwrap();
    next(&mut game);
    assert_eq!(game.phase(), Phase::Day);

    vote(&mut game, 0, 2);
    vote(&mut game, 2, 0);
    let outcome = next(&mut game);

    assert_eq!(
        outcome,
        Advance::Advanced {
            from: Phase::Day,
            to: Phase::Tiebreak
        }
    );
    assert!(!game.is_finished());
    assert_eq!(game.tied(), &[p(0), p(2)]);
    let tie = game.events().iter().rev().find(|e| e.kind == EventKind::VoteResult).unwrap();
    assert!(tie.message.contains("tied"));
    assert!(game.events().iter().all(|e| e.kind != EventKind::GameOver));
}

/// Test that killing the last threat ends the game in the same transaction.
#[test]
fn test_immediate_village_victory() {
    let mut game = village(&["Ada", "Bo", "Cy"]).build();
    next(&mut game);
    for voter in [1, 2, 3] {
        vote(&mut game, voter, 0);
    }
    let outcome = next(&mut game);

    assert_eq!(
        outcome,
        Advance::Advanced {
            from: Phase::Day,
            to: Phase::Finished
        }
    );
    assert_eq!(game.round(), 1);
    let victory = game.outcome().unwrap();
    assert_eq!(victory.winner, WinnerCode::Village);
    assert_eq!(victory.winners, vec![p(1), p(2), p(3)]);
    let last = game.events().back().unwrap();
    assert_eq!(last.kind, EventKind::GameOver);
    assert_eq!(last.payload.winner, Some(WinnerCode::Village));
}

/// Test that a tiebreak among the tied players lynches.
#[test]
fn test_tiebreak_lynch() {
    let mut game = village(&["Ada", "Bo", "Cy", "Di"]).build();
    next(&mut game);
    vote(&mut game, 0, 1);
    vote(&mut game, 2, 1);
    vote(&mut game, 1, 2);
    vote(&mut game, 3, 2);
    next(&mut game);
    assert_eq!(game.phase(), Phase::Tiebreak);

    // Only tied players are candidates.
    assert!(submit(&mut game, p(4), Command::Vote { target: p(0) }, 0).is_err());
    vote(&mut game, 4, 2);
    vote(&mut game, 3, 2);
    next(&mut game);

    assert!(!game.player(p(2)).unwrap().is_alive());
    assert_eq!(game.phase(), Phase::Night);
    assert!(game.tied().is_empty());
}

/// Test that a second tie without a jury forgives everyone.
#[test]
fn test_second_tie_forgives() {
    let mut game = village(&["Ada", "Bo", "Cy"]).build();
    next(&mut game);
    vote(&mut game, 0, 1);
    vote(&mut game, 1, 2);
    next(&mut game);
    assert_eq!(game.phase(), Phase::Tiebreak);

    next(&mut game);

    assert_eq!(game.phase(), Phase::Night);
    assert_eq!(game.round(), 2);
    assert_eq!(game.living_count(), 4);
    let last_vote = game.events().iter().rev().find(|e| e.kind == EventKind::VoteResult).unwrap();
    assert!(last_vote.message.contains("No one was lynched"));
}

/// Test the jury of the dead breaking a second tie.
#[test]
fn test_jury_breaks_second_tie() {
    let mut game = village(&["Ada", "Bo", "Cy", "Di"])
        .settings(GameSettings::new().with_jury(true))
        .build();
    submit(&mut game, p(0), Command::night(ActionKind::WolfKill, &[p(4)]), 0).unwrap();
    next(&mut game);

    vote(&mut game, 0, 1);
    vote(&mut game, 1, 2);
    next(&mut game);
    assert_eq!(game.phase(), Phase::Tiebreak);

    vote(&mut game, 0, 1);
    vote(&mut game, 3, 2);
    next(&mut game);
    assert_eq!(game.phase(), Phase::JuryVoting);

    // The living cannot sit on the jury.
    assert!(submit(&mut game, p(3), Command::Vote { target: p(1) }, 0).is_err());
    vote(&mut game, 4, 1);
    assert!(everyone_acted(&game));
    next(&mut game);

    assert!(!game.player(p(1)).unwrap().is_alive());
    assert_eq!(game.phase(), Phase::Night);
}

/// Test that the fool wins by being lynched.
#[test]
fn test_fool_lynched() {
    let mut game = GameBuilder::new()
        .player("Wolf", RoleId::Werewolf)
        .player("Fool", RoleId::Fool)
        .player("Ada", RoleId::Villager)
        .player("Bo", RoleId::Villager)
        .build();
    next(&mut game);
    vote(&mut game, 0, 1);
    vote(&mut game, 2, 1);
    next(&mut game);

    let victory = game.outcome().unwrap();
    assert_eq!(victory.winner, WinnerCode::Fool);
    assert_eq!(victory.winners, vec![p(1)]);
}

/// Test that an empty day moves on to the next night.
#[test]
fn test_no_votes() {
    let mut game = village(&["Ada", "Bo"]).build();
    next(&mut game);
    next(&mut game);

    assert_eq!(game.phase(), Phase::Night);
    assert_eq!(game.round(), 2);
    assert_eq!(game.living_count(), 3);
}

/// Test early advance once every living voter has voted.
#[test]
fn test_all_voted_advances_early() {
    let mut game = village(&["Ada", "Bo", "Cy"]).build();
    next(&mut game);
    let deadline = game.deadline().unwrap();

    vote(&mut game, 0, 1);
    vote(&mut game, 1, 0);
    vote(&mut game, 2, 0);
    assert!(advance(&mut game, deadline - 1, AdvanceTrigger::Deadline).unwrap() == Advance::Ignored);

    vote(&mut game, 3, 0);
    let outcome = advance(&mut game, deadline - 1, AdvanceTrigger::AllActed).unwrap();
    assert_eq!(
        outcome,
        Advance::Advanced {
            from: Phase::Day,
            to: Phase::Finished
        }
    );
}

//! Death and chain-death tests.

use nightfall::core::{ActionKind, Command, DeathCause, EventKind, Game, Phase, PlayerId};
use nightfall::roles::RoleId;
use nightfall::rules::{advance, force_death, submit, AdvanceTrigger, GameBuilder};

fn p(id: u8) -> PlayerId {
    PlayerId::new(id)
}

fn night(game: &mut Game, actor: u8, kind: ActionKind, targets: &[u8]) {
    let targets: Vec<PlayerId> = targets.iter().copied().map(p).collect();
    submit(game, p(actor), Command::night(kind, &targets), 0).unwrap();
}

fn vote(game: &mut Game, voter: u8, target: u8) {
    submit(game, p(voter), Command::Vote { target: p(target) }, 0).unwrap();
}

fn next(game: &mut Game) {
    advance(game, u64::MAX, AdvanceTrigger::Deadline).unwrap();
}

/// Test the grief cascade: one lover killed by the wolves, the other follows
/// in the same round with a narrative naming the first.
#[test]
fn test_grief_cascade() {
    let mut game = GameBuilder::new()
        .player("Wolf", RoleId::Werewolf)
        .player("Cupid", RoleId::Cupid)
        .player("Romeo", RoleId::Villager)
        .player("Juliet", RoleId::Villager)
        .player("Ada", RoleId::Villager)
        .player("Bo", RoleId::Villager)
        .build();
    night(&mut game, 1, ActionKind::Pair, &[2, 3]);
    night(&mut game, 0, ActionKind::WolfKill, &[2]);
    next(&mut game);

    let deaths: Vec<_> = game
        .events()
        .iter()
        .filter(|e| matches!(e.kind, EventKind::Death | EventKind::ChainDeath))
        .collect();
    assert_eq!(deaths.len(), 2);
    assert!(deaths.iter().all(|e| e.round == 1));

    assert_eq!(deaths[0].kind, EventKind::Death);
    assert_eq!(deaths[0].payload.players.as_slice(), &[p(2)]);

    assert_eq!(deaths[1].kind, EventKind::ChainDeath);
    assert_eq!(deaths[1].payload.players.as_slice(), &[p(3), p(2)]);
    assert_eq!(deaths[1].payload.cause, Some(DeathCause::Grief { partner: p(2) }));
    assert!(deaths[1].message.starts_with("Juliet died of grief after losing Romeo."));

    assert_eq!(game.phase(), Phase::Day);
}

/// Test that protecting one lover protects both.
#[test]
fn test_guarded_lover_keeps_partner_alive() {
    let mut game = GameBuilder::new()
        .player("Wolf", RoleId::Werewolf)
        .player("Cupid", RoleId::Cupid)
        .player("Gus", RoleId::Bodyguard)
        .player("Romeo", RoleId::Villager)
        .player("Juliet", RoleId::Villager)
        .build();
    night(&mut game, 1, ActionKind::Pair, &[3, 4]);
    night(&mut game, 2, ActionKind::Guard, &[3]);
    night(&mut game, 0, ActionKind::WolfKill, &[3]);
    next(&mut game);

    assert_eq!(game.living_count(), 5);
}

/// Test the reveal exception: the first lynch reveals, the second kills.
#[test]
fn test_reveal_once() {
    let mut game = GameBuilder::new()
        .player("Wolf", RoleId::Werewolf)
        .player("Pip", RoleId::Prince)
        .player("Ada", RoleId::Villager)
        .player("Bo", RoleId::Villager)
        .player("Cy", RoleId::Villager)
        .build();
    next(&mut game);
    for voter in [0, 2, 3] {
        vote(&mut game, voter, 1);
    }
    next(&mut game);

    let prince = game.player(p(1)).unwrap();
    assert!(prince.is_alive());
    assert!(prince.state().reveal_used);
    assert!(prince.state().publicly_revealed);
    let reveal = game.events().iter().rev().find(|e| e.kind == EventKind::Reveal).unwrap();
    assert_eq!(reveal.payload.role, Some(RoleId::Prince));
    assert_eq!(game.phase(), Phase::Night);

    next(&mut game);
    for voter in [0, 2, 3] {
        vote(&mut game, voter, 1);
    }
    next(&mut game);

    let prince = game.player(p(1)).unwrap();
    assert!(!prince.is_alive());
    assert_eq!(prince.death().map(|d| d.cause), Some(DeathCause::Lynch));
}

/// Test that the reveal exception never applies to unstoppable deaths.
#[test]
fn test_reveal_does_not_stop_override() {
    let mut game = GameBuilder::new()
        .player("Wolf", RoleId::Werewolf)
        .player("Pip", RoleId::Prince)
        .player("Ada", RoleId::Villager)
        .player("Bo", RoleId::Villager)
        .build();

    let report = force_death(&mut game, p(1), 0).unwrap();

    assert_eq!(report.died, vec![p(1)]);
    assert!(!game.player(p(1)).unwrap().state().reveal_used);
}

/// Test twin bonds dealt at setup.
#[test]
fn test_twins_die_together() {
    let mut game = GameBuilder::new()
        .player("Wolf", RoleId::Werewolf)
        .player("Tia", RoleId::Twin)
        .player("Tom", RoleId::Twin)
        .player("Ada", RoleId::Villager)
        .player("Bo", RoleId::Villager)
        .player("Cy", RoleId::Villager)
        .build();
    night(&mut game, 0, ActionKind::WolfKill, &[2]);
    next(&mut game);

    let tia = game.player(p(1)).unwrap();
    assert!(!tia.is_alive());
    assert_eq!(tia.death().map(|d| d.cause), Some(DeathCause::TwinBond { partner: p(2) }));
}

/// Test a hunter's shot feeding a further cascade.
#[test]
fn test_hunter_shot_cascades() {
    let mut game = GameBuilder::new()
        .player("Wolf", RoleId::Werewolf)
        .player("Hank", RoleId::Hunter)
        .player("Cupid", RoleId::Cupid)
        .player("Romeo", RoleId::Villager)
        .player("Juliet", RoleId::Villager)
        .player("Ada", RoleId::Villager)
        .player("Bo", RoleId::Villager)
        .build();
    night(&mut game, 2, ActionKind::Pair, &[3, 4]);
    night(&mut game, 0, ActionKind::WolfKill, &[1]);
    next(&mut game);
    assert_eq!(game.phase(), Phase::HunterShot);

    submit(&mut game, p(1), Command::Shoot { target: p(3) }, 0).unwrap();
    next(&mut game);

    assert!(!game.player(p(3)).unwrap().is_alive());
    assert!(!game.player(p(4)).unwrap().is_alive());
    assert_eq!(game.living_count(), 4);
    assert_eq!(game.phase(), Phase::Day);
}

/// Test that a hunter who never fires just lowers the weapon.
#[test]
fn test_hunter_timeout() {
    let mut game = GameBuilder::new()
        .player("Wolf", RoleId::Werewolf)
        .player("Hank", RoleId::Hunter)
        .player("Ada", RoleId::Villager)
        .player("Bo", RoleId::Villager)
        .player("Cy", RoleId::Villager)
        .build();
    night(&mut game, 0, ActionKind::WolfKill, &[1]);
    next(&mut game);
    next(&mut game);

    assert_eq!(game.phase(), Phase::Day);
    assert_eq!(game.living_count(), 4);
    assert!(game.events().iter().any(|e| e.message == "Hank lowered their weapon without firing."));
}

/// Test that the last wolf falling to the hunter ends the game for the village.
#[test]
fn test_hunter_shot_ends_game() {
    let mut game = GameBuilder::new()
        .player("Wolf", RoleId::Werewolf)
        .player("Hank", RoleId::Hunter)
        .player("Ada", RoleId::Villager)
        .player("Bo", RoleId::Villager)
        .build();
    night(&mut game, 0, ActionKind::WolfKill, &[1]);
    next(&mut game);
    submit(&mut game, p(1), Command::Shoot { target: p(0) }, 0).unwrap();
    next(&mut game);

    assert!(game.is_finished());
    let victory = game.outcome().unwrap();
    assert_eq!(victory.winner, nightfall::WinnerCode::Village);
    assert!(victory.is_winner(p(1)));
}

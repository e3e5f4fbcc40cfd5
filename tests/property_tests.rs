//! Property tests for the resolution pipeline and win evaluator.

use nightfall::core::{ActionKind, Command, Game, PlayerId};
use nightfall::roles::RoleId;
use nightfall::rules::{advance, force_death, submit, AdvanceTrigger, GameBuilder, WinEvaluator};
use proptest::prelude::*;

fn p(id: u8) -> PlayerId {
    PlayerId::new(id)
}

/// Wolf, doctor, bodyguard, witch, seer and three villagers.
fn table() -> Game {
    GameBuilder::new()
        .player("Wolf", RoleId::Werewolf)
        .player("Doc", RoleId::Doctor)
        .player("Gus", RoleId::Bodyguard)
        .player("Wanda", RoleId::Witch)
        .player("Sera", RoleId::Seer)
        .player("Ada", RoleId::Villager)
        .player("Bo", RoleId::Villager)
        .player("Cy", RoleId::Villager)
        .build()
}

fn night_plan() -> impl Strategy<Value = Vec<(u8, ActionKind, u8)>> {
    (1_u8..8, 0_u8..8, 0_u8..8, any::<bool>(), 0_u8..8, 0_u8..8).prop_map(
        |(prey, healed, guarded, poison, witched, scried)| {
            let potion = if poison { ActionKind::Poison } else { ActionKind::Antidote };
            vec![
                (0, ActionKind::WolfKill, prey),
                (1, ActionKind::Heal, healed),
                (2, ActionKind::Guard, guarded),
                (3, potion, witched),
                (4, ActionKind::Scry, scried),
            ]
        },
    )
}

/// Submit in the given order with the given times, then resolve the night.
fn play(plan: &[(u8, ActionKind, u8)], times: &[u64]) -> Game {
    let mut game = table();
    for (&(actor, kind, target), &at) in plan.iter().zip(times) {
        // Invalid picks (self guard, wolf on wolf) are rejected the same way every time.
        let _ = submit(&mut game, p(actor), Command::night(kind, &[p(target)]), at);
    }
    advance(&mut game, u64::MAX, AdvanceTrigger::Deadline).unwrap();
    game
}

fn snapshot(game: &Game) -> (Vec<bool>, Vec<Option<RoleId>>, Vec<String>) {
    (
        game.players().iter().map(|p| p.is_alive()).collect(),
        game.players().iter().map(|p| p.role()).collect(),
        game.events().iter().map(|e| e.message.clone()).collect(),
    )
}

proptest! {
    /// Submission order and time never change a night's outcome.
    #[test]
    fn prop_night_ignores_submission_order(
        plan in night_plan(),
        times in prop::collection::vec(any::<u64>(), 5),
        order in Just((0..5_usize).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let forward = play(&plan, &times);

        let shuffled: Vec<(u8, ActionKind, u8)> = order.iter().map(|&i| plan[i]).collect();
        let reversed_times: Vec<u64> = times.iter().rev().copied().collect();
        let permuted = play(&shuffled, &reversed_times);

        prop_assert_eq!(snapshot(&forward), snapshot(&permuted));
    }

    /// Every linked chain terminates and nobody dies twice.
    #[test]
    fn prop_soul_links_terminate(links in prop::collection::vec(0_u8..6, 5), victim in 1_u8..6) {
        let mut builder = GameBuilder::new().player("Wolf", RoleId::Werewolf);
        for i in 1..6 {
            builder = builder.player(format!("S{i}"), RoleId::Soulbinder);
        }
        builder = builder.player("Ada", RoleId::Villager).player("Bo", RoleId::Villager);
        let mut game = builder.build();

        for (actor, &target) in (1_u8..6).zip(&links) {
            let _ = submit(&mut game, p(actor), Command::night(ActionKind::Link, &[p(target)]), 0);
        }
        advance(&mut game, u64::MAX, AdvanceTrigger::Deadline).unwrap();
        let living = game.living_count();

        if game.player(p(victim)).is_some_and(|v| v.is_alive()) && !game.is_finished() {
            let report = force_death(&mut game, p(victim), 0).unwrap();
            let mut died = report.died.clone();
            died.sort();
            died.dedup();

            prop_assert_eq!(died.len(), report.died.len());
            prop_assert_eq!(game.living_count(), living - report.died.len());
        }
    }

    /// Living plus dead always equals the table size.
    #[test]
    fn prop_living_count_conserved(plan in night_plan(), kills in prop::collection::vec(1_u8..8, 0..4)) {
        let mut game = play(&plan, &[0; 5]);
        let total = game.player_count();

        for target in kills {
            let before = game.living_count();
            if let Ok(report) = force_death(&mut game, p(target), 0) {
                prop_assert_eq!(game.living_count(), before - report.died.len());
            }
            let dead = game.players().iter().filter(|p| !p.is_alive()).count();
            prop_assert_eq!(game.living_count() + dead, total);
        }
    }

    /// Evaluating a terminal state twice gives the same result.
    #[test]
    fn prop_win_evaluation_idempotent(kills in prop::collection::vec(0_u8..8, 1..8)) {
        let mut game = table();
        for target in kills {
            let _ = force_death(&mut game, p(target), 0);
        }

        let first = WinEvaluator::evaluate(&game, None);
        let second = WinEvaluator::evaluate(&game, None);
        prop_assert_eq!(first, second);
    }
}

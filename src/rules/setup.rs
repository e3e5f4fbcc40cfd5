//! Game setup: dealing roles and objectives, and a builder for fixed tables.

use tracing::debug;

use crate::core::{EventKind, Game, GameEvent, GameId, GameRng, GameSettings, Phase, Player, PlayerId, PlayerUpdate};
use crate::error::RejectReason;
use crate::objectives;
use crate::roles::RoleId;

/// Deal roles to every seated player.
///
/// The deck holds the configured werewolves, each enabled special role (two
/// cards for paired roles) and villagers for the remaining seats. It is
/// shuffled with the game's seed, so the same seed and lobby deal the same
/// roles.
pub fn assign_roles(game: &mut Game) -> Result<(), RejectReason> {
    let settings = game.settings();
    let have = game.player_count();
    if have < settings.min_players {
        return Err(RejectReason::NotEnoughPlayers {
            need: settings.min_players,
            have,
        });
    }
    if have < settings.dealt_roles() {
        return Err(RejectReason::NotEnoughPlayers {
            need: settings.dealt_roles(),
            have,
        });
    }

    let mut deck = deck(settings, have);
    let root = GameRng::new(game.seed());
    root.for_context("roles").shuffle(&mut deck);

    for (player, role) in game.players.iter_mut().zip(deck) {
        player.assign(role);
        debug!(player = %player.id, %role, "role dealt");
    }
    bind_twins(game);

    if game.settings().secret_objectives {
        objectives::deal(game, &mut root.for_context("objectives"));
    }
    Ok(())
}

fn deck(settings: &GameSettings, seats: usize) -> Vec<RoleId> {
    let mut deck = vec![RoleId::Werewolf; settings.werewolf_count];
    for &role in &settings.roles {
        deck.push(role);
        if role.is_paired() {
            deck.push(role);
        }
    }
    deck.resize(seats, RoleId::Villager);
    deck
}

/// Twins know and follow each other.
fn bind_twins(game: &mut Game) {
    let twins: Vec<PlayerId> = game
        .players()
        .iter()
        .filter(|p| p.role() == Some(RoleId::Twin))
        .map(|p| p.id)
        .collect();
    if let [a, b] = twins[..] {
        for (me, other) in [(a, b), (b, a)] {
            if let Some(player) = game.player_mut(me) {
                player.apply(PlayerUpdate::SetTwin(other));
            }
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds a game with a fixed table, already in the first night.
///
/// Roles are bound in the given order and seats skip the lobby, so tests and
/// replays can set up an exact scenario without a shuffle.
///
/// ## Example
///
/// ```
/// use nightfall::core::Phase;
/// use nightfall::roles::RoleId;
/// use nightfall::rules::GameBuilder;
///
/// let game = GameBuilder::new()
///     .player("Wolf", RoleId::Werewolf)
///     .player("Ada", RoleId::Seer)
///     .player("Bo", RoleId::Villager)
///     .build();
///
/// assert_eq!(game.phase(), Phase::Night);
/// assert_eq!(game.round(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct GameBuilder {
    id: GameId,
    settings: GameSettings,
    seed: u64,
    seats: Vec<(String, RoleId, bool)>,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: GameId::new("test"),
            settings: GameSettings::new(),
            seed: 0,
            seats: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = GameId::new(id);
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: GameSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Seat a human player with a fixed role.
    #[must_use]
    pub fn player(mut self, name: impl Into<String>, role: RoleId) -> Self {
        self.seats.push((name.into(), role, false));
        self
    }

    /// Seat a bot with a fixed role.
    #[must_use]
    pub fn bot(mut self, name: impl Into<String>, role: RoleId) -> Self {
        self.seats.push((name.into(), role, true));
        self
    }

    #[must_use]
    pub fn build(self) -> Game {
        let mut game = Game::new(self.id, self.settings, self.seed);
        for (index, (name, role, is_bot)) in self.seats.into_iter().enumerate() {
            let mut player = Player::new(PlayerId::new(index as u8), name, is_bot);
            player.assign(role);
            game.players.push(player);
        }
        bind_twins(&mut game);
        if game.settings().secret_objectives {
            objectives::deal(&mut game, &mut GameRng::new(self.seed).for_context("objectives"));
        }

        game.phase = Phase::Night;
        game.round = 1;
        game.push_event(GameEvent::new(1, EventKind::PhaseChange, "Night 1 falls. Everyone close your eyes."));
        game
    }
}

//! Night resolution context.
//!
//! The context accumulates everything a night produces before any of it is
//! committed: protections per target, death marks, pending counters, blocked
//! actors and staged state changes. Role behaviors read it through a
//! [`NightView`] and never write to it; only [`ResolutionContext::fold`] does.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{DeathCause, Game, GameEvent, Player, PlayerId, PlayerUpdate, Protection, RoundFlag};
use crate::roles::{RoleId, Team};

use super::{Effect, EffectBatch};

/// Result of folding one effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FoldResult {
    /// The effect was recorded.
    Applied,
    /// A death mark was dropped because the target was protected.
    Saved,
    /// The effect had nothing to act on (duplicate mark, unmark of an unmarked
    /// player).
    Skipped,
}

/// Accumulated state of one night's resolution.
#[derive(Clone, Debug, Default)]
pub struct ResolutionContext {
    protections: FxHashMap<PlayerId, SmallVec<[Protection; 2]>>,
    /// Death marks in the order they were placed. One mark per target; an
    /// unstoppable cause replaces a stoppable one.
    marks: Vec<(PlayerId, DeathCause)>,
    saved: Vec<PlayerId>,
    pending_bites: FxHashMap<PlayerId, u8>,
    blocked: FxHashSet<PlayerId>,
    fae_kill_used: bool,

    // === Staged changes, committed in order ===
    pub(crate) updates: Vec<(PlayerId, PlayerUpdate)>,
    pub(crate) transforms: Vec<(PlayerId, RoleId)>,
    pub(crate) revives: Vec<PlayerId>,
    pub(crate) flags: Vec<RoundFlag>,
    pub(crate) hunters: Vec<PlayerId>,
    pub(crate) events: Vec<GameEvent>,
}

impl ResolutionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a batch of effects, in order.
    pub fn fold_batch(&mut self, batch: EffectBatch) {
        for effect in batch {
            self.fold(effect);
        }
    }

    /// Fold a single effect into the context.
    pub fn fold(&mut self, effect: Effect) -> FoldResult {
        match effect {
            Effect::Protect { target, kind } => {
                self.protections.entry(target).or_default().push(kind);
                FoldResult::Applied
            }

            Effect::MarkDeath { target, cause } => {
                if matches!(cause, DeathCause::FaeKill) {
                    self.fae_kill_used = true;
                }
                if let Some(existing) = self.marks.iter_mut().find(|(marked, _)| *marked == target) {
                    // An unconditional death overrides a stoppable one already placed.
                    if !cause.is_stoppable() && existing.1.is_stoppable() {
                        existing.1 = cause;
                        return FoldResult::Applied;
                    }
                    return FoldResult::Skipped;
                }
                if cause.is_stoppable() && self.is_protected_from(target, cause) {
                    debug!(%target, ?cause, "death mark blocked by protection");
                    self.saved.push(target);
                    return FoldResult::Saved;
                }
                self.marks.push((target, cause));
                FoldResult::Applied
            }

            Effect::Unmark { target } => {
                let before = self.marks.len();
                self.marks
                    .retain(|(marked, cause)| *marked != target || !cause.is_stoppable());
                if self.marks.len() == before {
                    FoldResult::Skipped
                } else {
                    self.saved.push(target);
                    FoldResult::Applied
                }
            }

            Effect::Block { target } => {
                self.blocked.insert(target);
                FoldResult::Applied
            }

            Effect::Update { target, update } => {
                if matches!(update, PlayerUpdate::IncrementBite) {
                    *self.pending_bites.entry(target).or_default() += 1;
                }
                self.updates.push((target, update));
                FoldResult::Applied
            }

            Effect::Transform { target, role } => {
                self.transforms.push((target, role));
                FoldResult::Applied
            }

            Effect::Revive { target } => {
                self.revives.push(target);
                FoldResult::Applied
            }

            Effect::Flag(flag) => {
                self.flags.push(flag);
                FoldResult::Applied
            }

            Effect::HunterPending { hunter } => {
                self.hunters.push(hunter);
                FoldResult::Applied
            }

            Effect::Event(event) => {
                self.events.push(event);
                FoldResult::Applied
            }
        }
    }

    // === Queries ===

    #[must_use]
    pub fn is_marked(&self, target: PlayerId) -> bool {
        self.marks.iter().any(|(marked, _)| *marked == target)
    }

    #[must_use]
    pub fn mark_cause(&self, target: PlayerId) -> Option<DeathCause> {
        self.marks
            .iter()
            .find(|(marked, _)| *marked == target)
            .map(|(_, cause)| *cause)
    }

    /// Surviving marks in placement order.
    #[must_use]
    pub fn marks(&self) -> &[(PlayerId, DeathCause)] {
        &self.marks
    }

    /// Players whose marks were blocked or removed.
    #[must_use]
    pub fn saved(&self) -> &[PlayerId] {
        &self.saved
    }

    #[must_use]
    pub fn is_shielded(&self, target: PlayerId) -> bool {
        self.protections.get(&target).is_some_and(|kinds| !kinds.is_empty())
    }

    #[must_use]
    pub fn is_protected_from(&self, target: PlayerId, cause: DeathCause) -> bool {
        self.protections
            .get(&target)
            .is_some_and(|kinds| kinds.iter().any(|kind| cause.blocked_by(*kind)))
    }

    #[must_use]
    pub fn is_blocked(&self, actor: PlayerId) -> bool {
        self.blocked.contains(&actor)
    }

    #[must_use]
    pub fn pending_bites(&self, target: PlayerId) -> u8 {
        self.pending_bites.get(&target).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn fae_kill_used(&self) -> bool {
        self.fae_kill_used
    }

    /// Role a player holds once staged transformations apply.
    #[must_use]
    pub fn transformed(&self, target: PlayerId) -> Option<RoleId> {
        self.transforms
            .iter()
            .rev()
            .find(|(player, _)| *player == target)
            .map(|(_, role)| *role)
    }

    /// Whether the context holds any staged change at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
            && self.saved.is_empty()
            && self.updates.is_empty()
            && self.transforms.is_empty()
            && self.revives.is_empty()
            && self.flags.is_empty()
            && self.hunters.is_empty()
            && self.events.is_empty()
    }
}

/// Read-only view handed to role behaviors during night resolution.
///
/// Answers questions against the committed game with the context's staged
/// changes layered on top.
#[derive(Clone, Copy)]
pub struct NightView<'a> {
    game: &'a Game,
    ctx: &'a ResolutionContext,
}

impl<'a> NightView<'a> {
    #[must_use]
    pub fn new(game: &'a Game, ctx: &'a ResolutionContext) -> Self {
        Self { game, ctx }
    }

    #[must_use]
    pub fn game(&self) -> &'a Game {
        self.game
    }

    #[must_use]
    pub fn context(&self) -> &'a ResolutionContext {
        self.ctx
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.game.round()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&'a Player> {
        self.game.player(id)
    }

    #[must_use]
    pub fn name(&self, id: PlayerId) -> String {
        self.game.name_of(id)
    }

    /// Current role, including transformations staged earlier this night.
    #[must_use]
    pub fn role_of(&self, id: PlayerId) -> RoleId {
        self.ctx
            .transformed(id)
            .or_else(|| self.player(id).and_then(Player::role))
            .unwrap_or(RoleId::Villager)
    }

    /// Current team, including transformations staged earlier this night.
    #[must_use]
    pub fn team_of(&self, id: PlayerId) -> Team {
        match self.ctx.transformed(id) {
            Some(role) => role.default_team(),
            None => self.player(id).map_or(Team::Village, Player::team),
        }
    }

    #[must_use]
    pub fn is_shielded(&self, id: PlayerId) -> bool {
        self.ctx.is_shielded(id)
    }

    #[must_use]
    pub fn is_marked(&self, id: PlayerId) -> bool {
        self.ctx.is_marked(id)
    }

    #[must_use]
    pub fn mark_cause(&self, id: PlayerId) -> Option<DeathCause> {
        self.ctx.mark_cause(id)
    }

    /// Committed bites plus bites staged this night.
    #[must_use]
    pub fn bite_count(&self, id: PlayerId) -> u8 {
        let committed = self.player(id).map_or(0, |p| p.state().bite_count);
        committed.saturating_add(self.ctx.pending_bites(id))
    }

    #[must_use]
    pub fn fae_kill_used(&self) -> bool {
        self.ctx.fae_kill_used()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: u8) -> PlayerId {
        PlayerId::new(id)
    }

    #[test]
    fn test_protection_blocks_mark() {
        let mut ctx = ResolutionContext::new();
        ctx.fold(Effect::protect(p(1), Protection::Guard));

        assert_eq!(ctx.fold(Effect::kill(p(1), DeathCause::WolfKill)), FoldResult::Saved);
        assert!(!ctx.is_marked(p(1)));
        assert_eq!(ctx.saved(), &[p(1)]);
    }

    #[test]
    fn test_guard_does_not_block_poison() {
        let mut ctx = ResolutionContext::new();
        ctx.fold(Effect::protect(p(1), Protection::Guard));
        ctx.fold(Effect::protect(p(1), Protection::Heal));

        assert_eq!(ctx.fold(Effect::kill(p(1), DeathCause::Poison)), FoldResult::Applied);
        assert_eq!(ctx.mark_cause(p(1)), Some(DeathCause::Poison));
    }

    #[test]
    fn test_bless_blocks_poison() {
        let mut ctx = ResolutionContext::new();
        ctx.fold(Effect::protect(p(1), Protection::Bless));

        assert_eq!(ctx.fold(Effect::kill(p(1), DeathCause::Poison)), FoldResult::Saved);
    }

    #[test]
    fn test_unstoppable_mark_ignores_protection() {
        let mut ctx = ResolutionContext::new();
        ctx.fold(Effect::protect(p(1), Protection::Bless));

        let cause = DeathCause::Bite { by: p(0) };
        assert_eq!(ctx.fold(Effect::kill(p(1), cause)), FoldResult::Applied);
    }

    #[test]
    fn test_first_mark_wins() {
        let mut ctx = ResolutionContext::new();
        ctx.fold(Effect::kill(p(2), DeathCause::WolfKill));

        assert_eq!(ctx.fold(Effect::kill(p(2), DeathCause::Poison)), FoldResult::Skipped);
        assert_eq!(ctx.marks(), &[(p(2), DeathCause::WolfKill)]);
    }

    #[test]
    fn test_unstoppable_mark_replaces_stoppable() {
        let mut ctx = ResolutionContext::new();
        let bite = DeathCause::Bite { by: p(1) };
        ctx.fold(Effect::kill(p(3), DeathCause::WolfKill));

        assert_eq!(ctx.fold(Effect::kill(p(3), bite)), FoldResult::Applied);
        assert_eq!(ctx.marks(), &[(p(3), bite)]);
        assert_eq!(ctx.fold(Effect::kill(p(3), DeathCause::Poison)), FoldResult::Skipped);
        assert_eq!(ctx.mark_cause(p(3)), Some(bite));
    }

    #[test]
    fn test_unmark_leaves_unstoppable_mark() {
        let mut ctx = ResolutionContext::new();
        ctx.fold(Effect::kill(p(3), DeathCause::Bite { by: p(1) }));

        assert_eq!(ctx.fold(Effect::Unmark { target: p(3) }), FoldResult::Skipped);
        assert!(ctx.is_marked(p(3)));
        assert!(ctx.saved().is_empty());
    }

    #[test]
    fn test_unmark() {
        let mut ctx = ResolutionContext::new();
        ctx.fold(Effect::kill(p(2), DeathCause::WolfKill));

        assert_eq!(ctx.fold(Effect::Unmark { target: p(2) }), FoldResult::Applied);
        assert!(ctx.marks().is_empty());
        assert_eq!(ctx.fold(Effect::Unmark { target: p(2) }), FoldResult::Skipped);
    }

    #[test]
    fn test_pending_bites_accumulate() {
        let mut ctx = ResolutionContext::new();
        ctx.fold(Effect::update(p(4), PlayerUpdate::IncrementBite));
        ctx.fold(Effect::update(p(4), PlayerUpdate::IncrementBite));

        assert_eq!(ctx.pending_bites(p(4)), 2);
        assert_eq!(ctx.pending_bites(p(5)), 0);
    }

    #[test]
    fn test_latest_transform_wins() {
        let mut ctx = ResolutionContext::new();
        assert!(ctx.is_empty());
        ctx.fold(Effect::Transform { target: p(1), role: RoleId::Werewolf });

        assert_eq!(ctx.transformed(p(1)), Some(RoleId::Werewolf));
        assert_eq!(ctx.transformed(p(2)), None);
        assert!(!ctx.is_empty());
    }
}

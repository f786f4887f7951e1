//! The executor boundary: everything that mutates the host world.
//!
//! The engine computes *what* should happen; an [`EffectExecutor`]
//! implementation owned by the host glue performs the actual spawning,
//! injuring, and messaging. Tests inject a recording double instead.

use serde::{Deserialize, Serialize};

use crate::actor::{ActorId, AnimalRef, CellRef, SkillKind, TargetRef, Tick};

/// Body-region preference for an injury. The host resolves a region kind to
/// a concrete body part, falling back outward (finger -> hand -> any).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Hand,
    Finger,
    Arm,
    Head,
    Ankle,
    Foot,
    Leg,
    Torso,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjuryKind {
    Burn,
    Cut,
    Bruise,
    Bite,
    Sprain,
    Choking,
    ChokingCritical,
}

/// Tone of a player-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Neutral,
    Negative,
    Positive,
}

/// Host-side effect sink. All world mutation the engine requests goes
/// through this trait; no call is allowed to fail visibly, so methods
/// return nothing. Hosts that cannot honor a request drop it.
pub trait EffectExecutor {
    fn spawn_fire(&mut self, map: TargetRef, cell: CellRef, size: f32);
    fn spawn_explosion(&mut self, map: TargetRef, cell: CellRef, radius: f32, damage: u16);
    fn apply_injury(&mut self, actor: ActorId, region: RegionKind, injury: InjuryKind, severity: f32);
    fn apply_animal_injury(&mut self, animal: AnimalRef, injury: InjuryKind, severity: f32);
    fn apply_missing_part(&mut self, actor: ActorId, region: RegionKind);
    /// End the actor's current job. `forced` interrupts are not resumable.
    fn interrupt_activity(&mut self, actor: ActorId, forced: bool);
    fn stagger(&mut self, actor: ActorId, ticks: Tick);
    /// Scatter the actor's carried stack into `piles` heaps around `cell`.
    fn drop_carried(&mut self, actor: ActorId, cell: CellRef, piles: u8);
    fn post_notification(&mut self, key: &str, kind: NotificationKind);
    /// Urgent letter-style alert demanding player attention.
    fn post_alert(&mut self, title_key: &str, body_key: &str, actor: ActorId);
    fn start_panic_state(&mut self, actor: ActorId);
    fn award_experience(&mut self, actor: ActorId, skill: SkillKind, xp: f32);
}

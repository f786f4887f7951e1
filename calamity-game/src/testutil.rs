//! Test support: a recording effect executor and snapshot builders.
//!
//! Used by unit tests and the integration suite; hosts may also find the
//! recording executor useful for dry-run tooling.

use crate::actor::{
    ActivityKind, ActorId, ActorState, AnimalRef, Capacities, CellRef, JobRef, JobSnapshot,
    RecentGrief, SkillRecord, Skills, TargetRef, Tick, TraitSet,
};
use crate::effects::{EffectExecutor, InjuryKind, NotificationKind, RegionKind};

/// An [`EffectExecutor`] that records every call instead of touching a world.
#[derive(Debug, Default, Clone)]
pub struct RecordingExecutor {
    pub fires: Vec<(TargetRef, CellRef, f32)>,
    pub explosions: Vec<(TargetRef, CellRef, f32, u16)>,
    pub injuries: Vec<(ActorId, RegionKind, InjuryKind, f32)>,
    pub animal_injuries: Vec<(AnimalRef, InjuryKind, f32)>,
    pub missing_parts: Vec<(ActorId, RegionKind)>,
    pub interrupts: Vec<(ActorId, bool)>,
    pub staggers: Vec<(ActorId, Tick)>,
    pub spills: Vec<(ActorId, CellRef, u8)>,
    pub notifications: Vec<(String, NotificationKind)>,
    pub alerts: Vec<(String, String, ActorId)>,
    pub panics: Vec<ActorId>,
    pub experience: Vec<(ActorId, crate::actor::SkillKind, f32)>,
}

impl RecordingExecutor {
    /// Total number of world-mutating effects recorded (notifications and
    /// experience awards excluded).
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.fires.len()
            + self.explosions.len()
            + self.injuries.len()
            + self.animal_injuries.len()
            + self.missing_parts.len()
            + self.spills.len()
            + self.panics.len()
    }
}

impl EffectExecutor for RecordingExecutor {
    fn spawn_fire(&mut self, map: TargetRef, cell: CellRef, size: f32) {
        self.fires.push((map, cell, size));
    }

    fn spawn_explosion(&mut self, map: TargetRef, cell: CellRef, radius: f32, damage: u16) {
        self.explosions.push((map, cell, radius, damage));
    }

    fn apply_injury(
        &mut self,
        actor: ActorId,
        region: RegionKind,
        injury: InjuryKind,
        severity: f32,
    ) {
        self.injuries.push((actor, region, injury, severity));
    }

    fn apply_animal_injury(&mut self, animal: AnimalRef, injury: InjuryKind, severity: f32) {
        self.animal_injuries.push((animal, injury, severity));
    }

    fn apply_missing_part(&mut self, actor: ActorId, region: RegionKind) {
        self.missing_parts.push((actor, region));
    }

    fn interrupt_activity(&mut self, actor: ActorId, forced: bool) {
        self.interrupts.push((actor, forced));
    }

    fn stagger(&mut self, actor: ActorId, ticks: Tick) {
        self.staggers.push((actor, ticks));
    }

    fn drop_carried(&mut self, actor: ActorId, cell: CellRef, piles: u8) {
        self.spills.push((actor, cell, piles));
    }

    fn post_notification(&mut self, key: &str, kind: NotificationKind) {
        self.notifications.push((key.to_string(), kind));
    }

    fn post_alert(&mut self, title_key: &str, body_key: &str, actor: ActorId) {
        self.alerts
            .push((title_key.to_string(), body_key.to_string(), actor));
    }

    fn start_panic_state(&mut self, actor: ActorId) {
        self.panics.push(actor);
    }

    fn award_experience(&mut self, actor: ActorId, skill: crate::actor::SkillKind, xp: f32) {
        self.experience.push((actor, skill, xp));
    }
}

/// Builder-style helper producing a healthy colonist snapshot.
#[must_use]
pub fn colonist(id: u32) -> ActorState {
    ActorState {
        id: ActorId(id),
        map: Some(TargetRef(1)),
        position: CellRef { x: 20, z: 20 },
        alive: true,
        downed: false,
        colonist: true,
        skills: Skills::default(),
        mood: Some(0.6),
        traits: TraitSet::new(),
        capacities: Capacities::default(),
        age_years: 30.0,
        pain: 0.0,
        grief: RecentGrief::default(),
        job: None,
        asleep: false,
        carried: None,
    }
}

/// A colonist currently engaged in the given activity.
#[must_use]
pub fn colonist_doing(id: u32, activity: ActivityKind, job: u64) -> ActorState {
    let mut actor = colonist(id);
    actor.job = Some(JobSnapshot {
        activity,
        job: JobRef(job),
    });
    if activity == ActivityKind::LayDown {
        actor.asleep = true;
    }
    actor
}

/// A colonist with a specific cooking skill level.
#[must_use]
pub fn cook_with_level(id: u32, level: u8) -> ActorState {
    let mut actor = colonist_doing(id, ActivityKind::BillWork, u64::from(id));
    actor.skills.cooking = SkillRecord {
        level,
        ..SkillRecord::default()
    };
    actor
}

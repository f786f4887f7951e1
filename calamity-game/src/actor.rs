//! Host-adapter snapshot model for actors and their activities.
//!
//! The host glue layer translates its own pawn/job objects into these
//! snapshots once per callback. The engine never reaches back into host
//! state; everything it needs to assess risk arrives here.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Absolute simulated world tick. The host's tick counter is authoritative;
/// all queue timestamps are expressed in this unit.
pub type Tick = i64;

/// Trait capacity stored inline without additional allocations.
pub type TraitSet = SmallVec<[TraitKind; 4]>;

/// Stable identity of an actor (colonist).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u32);

/// Opaque reference to the world region (map) an incident applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetRef(pub u64);

/// Opaque reference to an animal involved in a handling mishap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimalRef(pub u64);

/// Identity of a single job instance, used to detect job restarts. Two jobs
/// of the same kind started back to back carry distinct refs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobRef(pub u64);

/// A map cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct CellRef {
    pub x: i32,
    pub z: i32,
}

/// Explicit activity classification attached by the host-glue adapter,
/// replacing substring matching on host job names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Recipe work at a station (cooking and butchering both run through it).
    BillWork,
    Ingest,
    Travel,
    /// Mining, plant cutting, harvesting, sowing.
    FieldWork,
    LayDown,
    Milk,
    Shear,
    Train,
    Other,
}

/// Skills the risk model reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Cooking,
    Animals,
    Melee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Passion {
    #[default]
    None,
    Minor,
    Major,
}

/// Personality traits with a bearing on accident risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitKind {
    Careful,
    Neurotic,
    Pyromaniac,
    Brawler,
    Nimble,
    Wimp,
    Psychopath,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub level: u8,
    #[serde(default)]
    pub passion: Passion,
}

impl Default for SkillRecord {
    fn default() -> Self {
        Self {
            level: 5,
            passion: Passion::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Skills {
    pub cooking: SkillRecord,
    pub animals: SkillRecord,
    pub melee: SkillRecord,
}

impl Skills {
    #[must_use]
    pub const fn get(&self, kind: SkillKind) -> SkillRecord {
        match kind {
            SkillKind::Cooking => self.cooking,
            SkillKind::Animals => self.animals,
            SkillKind::Melee => self.melee,
        }
    }
}

/// Health capacity levels, 1.0 = nominal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capacities {
    pub manipulation: f32,
    pub consciousness: f32,
    pub moving: f32,
}

impl Default for Capacities {
    fn default() -> Self {
        Self {
            manipulation: 1.0,
            consciousness: 1.0,
            moving: 1.0,
        }
    }
}

/// Rolled-up recent grief relevant to night terrors: the summed magnitude of
/// recent negative mood memories and the count of witnessed-death style
/// trauma memories, both pre-aggregated by the host adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RecentGrief {
    pub negative_mood_sum: f32,
    pub trauma_hits: u32,
}

/// The actor's in-progress job, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub activity: ActivityKind,
    pub job: JobRef,
}

/// A stack the actor is hauling, spillable on a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarriedStack {
    pub stack_count: u32,
    pub explosive: bool,
}

/// Snapshot of one cell the actor is about to enter, for movement checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub cell: CellRef,
    /// Path cost of the obstacle occupying the cell; zero when the cell is
    /// open ground. Only pass-through obstacles worth climbing count.
    pub climb_cost: u16,
}

impl CellSnapshot {
    /// Whether the cell holds something worth tripping over.
    #[must_use]
    pub const fn has_climbable_obstacle(&self) -> bool {
        self.climb_cost > 10
    }
}

/// Per-callback snapshot of an actor, produced by the host adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorState {
    pub id: ActorId,
    pub map: Option<TargetRef>,
    #[serde(default)]
    pub position: CellRef,
    pub alive: bool,
    #[serde(default)]
    pub downed: bool,
    pub colonist: bool,
    #[serde(default)]
    pub skills: Skills,
    /// Current mood as a `[0, 1]` fraction; `None` when the actor has no
    /// mood need (mechanoids etc).
    #[serde(default)]
    pub mood: Option<f32>,
    #[serde(default)]
    pub traits: TraitSet,
    #[serde(default)]
    pub capacities: Capacities,
    #[serde(default)]
    pub age_years: f32,
    /// Total current pain as a `[0, 1]` fraction.
    #[serde(default)]
    pub pain: f32,
    #[serde(default)]
    pub grief: RecentGrief,
    #[serde(default)]
    pub job: Option<JobSnapshot>,
    #[serde(default)]
    pub asleep: bool,
    #[serde(default)]
    pub carried: Option<CarriedStack>,
}

impl ActorState {
    /// Standard monitor guard: living, not incapacitated, player-controlled,
    /// on a valid map. Returns the map when the actor qualifies.
    #[must_use]
    pub fn eligible(&self) -> Option<TargetRef> {
        if !self.alive || self.downed || !self.colonist {
            return None;
        }
        self.map
    }

    #[must_use]
    pub fn has_trait(&self, kind: TraitKind) -> bool {
        self.traits.contains(&kind)
    }
}

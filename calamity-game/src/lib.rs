//! Calamity Accident Engine
//!
//! Platform-agnostic accident-event logic for colony simulations. The host
//! engine drives per-tick callbacks; this crate decides when a mishap
//! happens and delegates all world mutation to an [`EffectExecutor`].
//!
//! The core pipeline: incidents are *foreshadowed* into a queue (by the
//! host's storyteller or an accident storm), gated on continuous job
//! progress, and executed once the dwell elapses; a reduced-probability
//! immediate path keeps some spontaneity.

pub mod actor;
pub mod animals;
pub mod butchering;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod cooking;
pub mod eating;
pub mod effects;
pub mod explosion;
pub mod gate;
pub mod movement;
pub mod numbers;
pub mod queue;
pub mod risk;
pub mod rng;
pub mod sleep;
pub mod storm;
pub mod testutil;
pub mod work;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use actor::{
    ActivityKind, ActorId, ActorState, AnimalRef, Capacities, CarriedStack, CellRef, CellSnapshot,
    JobRef, JobSnapshot, Passion, RecentGrief, SkillKind, SkillRecord, Skills, TargetRef, Tick,
    TraitKind, TraitSet,
};
pub use catalog::{EffectSpec, IncidentCatalog, IncidentContext, IncidentDef, IncidentId};
pub use config::{AccidentConfig, ConfigError, DwellTicks, FamilyKnobs};
pub use effects::{EffectExecutor, InjuryKind, NotificationKind, RegionKind};
pub use explosion::{DelayedExplosions, PendingExplosion};
pub use gate::{ActorProgress, ProgressGate};
pub use queue::{ForeshadowQueue, QueuedIncident};
pub use risk::{RiskAssessment, RiskInputs, RiskProfile, SkillBand};
pub use rng::{CountingRng, RngBundle};
pub use storm::StormState;

#[cfg(debug_assertions)]
use crate::constants::DEBUG_ENV_VAR;
use crate::constants::{LOG_OMEN_PASSED, LOG_STORM_BEGIN, LOG_STORM_END};

#[cfg(debug_assertions)]
fn debug_log_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
const fn debug_log_enabled() -> bool {
    false
}

pub(crate) fn debug_poll_error(context: IncidentContext, error: &AccidentError) {
    if debug_log_enabled() {
        println!("Accident poll error | {context:?}: {error}");
    }
}

/// Errors surfaced by the internal poll boundary. Every public entry point
/// catches these and treats the poll as a no-op; they never reach the host.
#[derive(Debug, Error, PartialEq)]
pub enum AccidentError {
    #[error("incident {0:?} is not in the catalog")]
    UnknownIncident(IncidentId),
    #[error("risk computation produced a non-finite probability for {context:?}")]
    InvalidProbability { context: IncidentContext },
}

/// Persisted engine state. Round-trips exactly through the host's generic
/// save mechanism with tick counters preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub seed: u64,
    pub queue: ForeshadowQueue,
    #[serde(default)]
    pub storm: StormState,
    #[serde(default)]
    pub explosions: DelayedExplosions,
}

/// Trait for abstracting save/load operations.
/// Platform-specific implementations should provide this.
pub trait StateStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist an engine snapshot under `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be saved.
    fn save(&self, slot: &str, snapshot: &EngineSnapshot) -> Result<(), Self::Error>;

    /// Load a previously saved snapshot, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be loaded.
    fn load(&self, slot: &str) -> Result<Option<EngineSnapshot>, Self::Error>;
}

/// The accident engine: owns the foreshadow queue, progress gate, storm
/// state, and RNG streams. One instance per game; explicitly constructed
/// and injected rather than global.
#[derive(Debug)]
pub struct AccidentEngine {
    config: AccidentConfig,
    catalog: IncidentCatalog,
    queue: ForeshadowQueue,
    gate: ProgressGate,
    storm: StormState,
    explosions: DelayedExplosions,
    rng: RngBundle,
    /// Cosmetic draws (notification pools, the storm's incident pick);
    /// rebuilt from the seed on restore.
    pick_rng: ChaCha20Rng,
    seed: u64,
}

impl AccidentEngine {
    /// Construct an engine with the built-in incident catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(seed: u64, config: AccidentConfig) -> Result<Self, ConfigError> {
        Self::with_catalog(seed, config, IncidentCatalog::builtin())
    }

    /// Construct an engine with a custom catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn with_catalog(
        seed: u64,
        config: AccidentConfig,
        catalog: IncidentCatalog,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            catalog,
            queue: ForeshadowQueue::default(),
            gate: ProgressGate::default(),
            storm: StormState::default(),
            explosions: DelayedExplosions::default(),
            rng: RngBundle::from_user_seed(seed),
            pick_rng: ChaCha20Rng::seed_from_u64(seed),
            seed,
        })
    }

    /// Rebuild an engine from persisted state. Progress gating is transient
    /// and restarts empty; the queue and storm state carry over verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn restore(snapshot: EngineSnapshot, config: AccidentConfig) -> Result<Self, ConfigError> {
        Self::restore_with_catalog(snapshot, config, IncidentCatalog::builtin())
    }

    /// Rebuild from persisted state with a custom catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn restore_with_catalog(
        snapshot: EngineSnapshot,
        config: AccidentConfig,
        catalog: IncidentCatalog,
    ) -> Result<Self, ConfigError> {
        let mut engine = Self::with_catalog(snapshot.seed, config, catalog)?;
        engine.queue = snapshot.queue;
        engine.storm = snapshot.storm;
        engine.explosions = snapshot.explosions;
        Ok(engine)
    }

    /// Snapshot the persistable state.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            seed: self.seed,
            queue: self.queue.clone(),
            storm: self.storm.clone(),
            explosions: self.explosions.clone(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &AccidentConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &IncidentCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn queue(&self) -> &ForeshadowQueue {
        &self.queue
    }

    #[must_use]
    pub const fn gate(&self) -> &ProgressGate {
        &self.gate
    }

    #[must_use]
    pub const fn storm(&self) -> &StormState {
        &self.storm
    }

    #[must_use]
    pub const fn pending_explosions(&self) -> &DelayedExplosions {
        &self.explosions
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Storyteller entry point: a selected incident is foreshadowed into the
    /// queue instead of executing outright. Returns false for unknown ids.
    pub fn on_storyteller_incident(
        &mut self,
        now: Tick,
        incident_id: IncidentId,
        map: TargetRef,
        fx: &mut dyn EffectExecutor,
    ) -> bool {
        if !self.catalog.contains(&incident_id) {
            return false;
        }
        self.enqueue_foreshadowed(now, incident_id, map, true, fx);
        true
    }

    /// General per-tick upkeep: fires due delayed explosions.
    pub fn on_world_tick(&mut self, now: Tick, fx: &mut dyn EffectExecutor) {
        self.explosions.tick(now, fx);
    }

    /// Begin an accident storm over `map`.
    pub fn begin_storm(&mut self, map: TargetRef, fx: &mut dyn EffectExecutor) {
        if self.storm.begin(map) {
            fx.post_notification(LOG_STORM_BEGIN, NotificationKind::Negative);
        }
    }

    /// End the accident storm over `map`.
    pub fn end_storm(&mut self, map: TargetRef, fx: &mut dyn EffectExecutor) {
        if self.storm.end(map) {
            fx.post_notification(LOG_STORM_END, NotificationKind::Neutral);
        }
    }

    /// Hourly storm upkeep: once per in-world hour per stormy map, a chance
    /// to seed the queue with a random incident.
    pub fn on_storm_tick(&mut self, now: Tick, map: TargetRef, fx: &mut dyn EffectExecutor) {
        if !self.storm.hourly_due(map, now) {
            return;
        }
        let queue_one = {
            let mut rng = self.rng.storm();
            risk::roll_chance(&mut *rng, self.config.storm_hourly_queue_chance)
        };
        if !queue_one {
            return;
        }
        let picked = self
            .catalog
            .pick_any(&mut self.pick_rng)
            .map(|def| def.id.clone());
        if let Some(incident_id) = picked {
            let foreshadow = self.config.storm_hourly_foreshadow;
            self.enqueue_foreshadowed(now, incident_id, map, foreshadow, fx);
        }
    }

    fn enqueue_foreshadowed(
        &mut self,
        now: Tick,
        incident_id: IncidentId,
        map: TargetRef,
        foreshadow: bool,
        fx: &mut dyn EffectExecutor,
    ) {
        self.queue
            .enqueue(incident_id, map, now, self.config.queue_ttl_ticks);
        if foreshadow {
            let key = queue::foreshadow_key(&mut self.pick_rng);
            fx.post_notification(key, NotificationKind::Neutral);
        }
    }

    /// First-priority step shared by every monitor: sweep, find the oldest
    /// context-matching entry, and fire it if the progress gate admits.
    pub(crate) fn try_fire_queued(
        &mut self,
        now: Tick,
        actor: &ActorState,
        context: IncidentContext,
        fx: &mut dyn EffectExecutor,
    ) -> Option<IncidentDef> {
        let expired = self.queue.sweep_expired(now, &self.catalog);
        if expired > 0 {
            fx.post_notification(LOG_OMEN_PASSED, NotificationKind::Neutral);
        }

        let index = self.queue.peek_for_context(context, &self.catalog)?;
        let dwell = self.config.dwell.for_context(context);
        if !self.gate.admit(actor, context, now, dwell) {
            // Not enough progress yet; the entry stays queued.
            return None;
        }
        self.gate.rearm(actor, now);

        let entry = self.queue.remove(index);
        let def = self.catalog.find(&entry.incident_id).cloned()?;
        let key = queue::resolution_key(&mut self.pick_rng);
        fx.post_notification(key, NotificationKind::Negative);
        Some(def)
    }

    /// Combined environment multiplier: family-specific factors times the
    /// storm multiplier for the actor's map.
    pub(crate) fn environment_mult(&self, map: TargetRef, family_mult: f32) -> f32 {
        family_mult * self.storm.chance_multiplier(map, &self.config)
    }

    pub(crate) fn risk_inputs<'a>(
        &'a self,
        context: IncidentContext,
        environment_mult: f32,
    ) -> RiskInputs<'a> {
        RiskInputs {
            knobs: self.config.family(context),
            global_chance_mult: self.config.global_chance_mult,
            global_severity_mult: self.config.global_severity_mult,
            environment_mult,
        }
    }

    /// Severity scale applied to bespoke (non-assessed) severity rolls.
    pub(crate) fn severity_scale(&self, context: IncidentContext) -> f32 {
        self.config.family(context).severity_mult * self.config.global_severity_mult
    }

    pub(crate) fn lookup(&self, id: &str) -> Result<IncidentDef, AccidentError> {
        let id = IncidentId::new(id);
        self.catalog
            .find(&id)
            .cloned()
            .ok_or(AccidentError::UnknownIncident(id))
    }
}

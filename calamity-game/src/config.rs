//! Tunable knobs for accident pacing and severity.
//!
//! The configuration layer is the only place values are validated or
//! clamped; the risk model assumes every knob it reads is already sane.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actor::Tick;
use crate::catalog::IncidentContext;
use crate::constants::{
    ANIMAL_BASE_CHANCE, BUTCHERING_BASE_CHANCE, COOKING_BASE_CHANCE, DWELL_ANIMAL_TICKS,
    DWELL_BUTCHERING_TICKS, DWELL_COOKING_TICKS, DWELL_EATING_TICKS, DWELL_MOVEMENT_TICKS,
    DWELL_SLEEP_TICKS, DWELL_WORK_TICKS, EATING_BASE_CHANCE, IMMEDIATE_ROLL_RATIO,
    MOVEMENT_BASE_CHANCE, QUEUE_TTL_TICKS, SLEEP_BASE_CHANCE, STORM_CHANCE_MULT,
    STORM_HOURLY_QUEUE_CHANCE, WORK_BASE_CHANCE,
};

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be non-negative (got {value:.6})")]
    NegativeKnob { field: &'static str, value: f32 },
    #[error("{field} is a probability and must lie in [0, 1] (got {value:.6})")]
    ChanceOutOfRange { field: &'static str, value: f32 },
    #[error("queue TTL must be positive (got {value})")]
    TtlNotPositive { value: Tick },
    #[error("dwell for {context:?} must be non-negative (got {value})")]
    NegativeDwell { context: IncidentContext, value: Tick },
}

/// One family's knob triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FamilyKnobs {
    /// Direct per-poll probability before multipliers; clamped to `[0, 1]`.
    pub base_chance: f32,
    pub chance_mult: f32,
    pub severity_mult: f32,
}

impl FamilyKnobs {
    const fn with_base(base_chance: f32) -> Self {
        Self {
            base_chance,
            chance_mult: 1.0,
            severity_mult: 1.0,
        }
    }

    fn clamped(self) -> Self {
        Self {
            base_chance: self.base_chance.clamp(0.0, 1.0),
            chance_mult: self.chance_mult.max(0.0),
            severity_mult: self.severity_mult.max(0.0),
        }
    }
}

/// Per-context dwell thresholds for the progress gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DwellTicks {
    pub cooking: Tick,
    pub butchering: Tick,
    pub eating: Tick,
    pub movement: Tick,
    pub work: Tick,
    pub sleep: Tick,
    pub animal_handling: Tick,
}

impl Default for DwellTicks {
    fn default() -> Self {
        Self {
            cooking: DWELL_COOKING_TICKS,
            butchering: DWELL_BUTCHERING_TICKS,
            eating: DWELL_EATING_TICKS,
            movement: DWELL_MOVEMENT_TICKS,
            work: DWELL_WORK_TICKS,
            sleep: DWELL_SLEEP_TICKS,
            animal_handling: DWELL_ANIMAL_TICKS,
        }
    }
}

impl DwellTicks {
    #[must_use]
    pub const fn for_context(&self, context: IncidentContext) -> Tick {
        match context {
            IncidentContext::Cooking => self.cooking,
            IncidentContext::Butchering => self.butchering,
            IncidentContext::Eating => self.eating,
            IncidentContext::Movement => self.movement,
            IncidentContext::Work => self.work,
            IncidentContext::Sleep => self.sleep,
            IncidentContext::AnimalHandling => self.animal_handling,
        }
    }
}

/// Complete accident configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccidentConfig {
    pub global_chance_mult: f32,
    pub global_severity_mult: f32,
    /// Fraction of the computed probability used for immediate
    /// (non-foreshadowed) rolls.
    pub immediate_roll_ratio: f32,
    pub cooking: FamilyKnobs,
    pub butchering: FamilyKnobs,
    pub eating: FamilyKnobs,
    pub movement: FamilyKnobs,
    pub work: FamilyKnobs,
    pub sleep: FamilyKnobs,
    pub animals: FamilyKnobs,
    pub storm_chance_mult: f32,
    pub storm_hourly_queue_chance: f32,
    /// Whether storm-queued incidents also emit a foreshadowing hint.
    pub storm_hourly_foreshadow: bool,
    pub queue_ttl_ticks: Tick,
    pub dwell: DwellTicks,
}

impl Default for AccidentConfig {
    fn default() -> Self {
        Self {
            global_chance_mult: 1.0,
            global_severity_mult: 1.0,
            immediate_roll_ratio: IMMEDIATE_ROLL_RATIO,
            cooking: FamilyKnobs::with_base(COOKING_BASE_CHANCE),
            butchering: FamilyKnobs::with_base(BUTCHERING_BASE_CHANCE),
            eating: FamilyKnobs::with_base(EATING_BASE_CHANCE),
            movement: FamilyKnobs::with_base(MOVEMENT_BASE_CHANCE),
            work: FamilyKnobs::with_base(WORK_BASE_CHANCE),
            sleep: FamilyKnobs::with_base(SLEEP_BASE_CHANCE),
            animals: FamilyKnobs::with_base(ANIMAL_BASE_CHANCE),
            storm_chance_mult: STORM_CHANCE_MULT,
            storm_hourly_queue_chance: STORM_HOURLY_QUEUE_CHANCE,
            storm_hourly_foreshadow: false,
            queue_ttl_ticks: QUEUE_TTL_TICKS,
            dwell: DwellTicks::default(),
        }
    }
}

impl AccidentConfig {
    /// Load configuration from a JSON string and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or a knob violates its
    /// range.
    pub fn from_json(json: &str) -> Result<Self, anyhow::Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub const fn family(&self, context: IncidentContext) -> &FamilyKnobs {
        match context {
            IncidentContext::Cooking => &self.cooking,
            IncidentContext::Butchering => &self.butchering,
            IncidentContext::Eating => &self.eating,
            IncidentContext::Movement => &self.movement,
            IncidentContext::Work => &self.work,
            IncidentContext::Sleep => &self.sleep,
            IncidentContext::AnimalHandling => &self.animals,
        }
    }

    /// Validate every knob, returning the first violation found.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("global_chance_mult", self.global_chance_mult),
            ("global_severity_mult", self.global_severity_mult),
            ("storm_chance_mult", self.storm_chance_mult),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeKnob { field, value });
            }
        }
        for (field, value) in [
            ("immediate_roll_ratio", self.immediate_roll_ratio),
            ("storm_hourly_queue_chance", self.storm_hourly_queue_chance),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ChanceOutOfRange { field, value });
            }
        }
        for (context, knobs) in self.family_entries() {
            let base_field = family_field_name(context);
            if !knobs.base_chance.is_finite() || !(0.0..=1.0).contains(&knobs.base_chance) {
                return Err(ConfigError::ChanceOutOfRange {
                    field: base_field,
                    value: knobs.base_chance,
                });
            }
            if !knobs.chance_mult.is_finite() || knobs.chance_mult < 0.0 {
                return Err(ConfigError::NegativeKnob {
                    field: base_field,
                    value: knobs.chance_mult,
                });
            }
            if !knobs.severity_mult.is_finite() || knobs.severity_mult < 0.0 {
                return Err(ConfigError::NegativeKnob {
                    field: base_field,
                    value: knobs.severity_mult,
                });
            }
        }
        if self.queue_ttl_ticks <= 0 {
            return Err(ConfigError::TtlNotPositive {
                value: self.queue_ttl_ticks,
            });
        }
        for context in IncidentContext::ALL {
            let dwell = self.dwell.for_context(context);
            if dwell < 0 {
                return Err(ConfigError::NegativeDwell {
                    context,
                    value: dwell,
                });
            }
        }
        Ok(())
    }

    /// Clamp every knob into its legal range instead of erroring, for hosts
    /// that prefer forgiving settings import.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let sanitize_mult = |v: f32| if v.is_finite() { v.max(0.0) } else { 1.0 };
        let sanitize_chance = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        self.global_chance_mult = sanitize_mult(self.global_chance_mult);
        self.global_severity_mult = sanitize_mult(self.global_severity_mult);
        self.storm_chance_mult = sanitize_mult(self.storm_chance_mult);
        self.immediate_roll_ratio = sanitize_chance(self.immediate_roll_ratio);
        self.storm_hourly_queue_chance = sanitize_chance(self.storm_hourly_queue_chance);
        self.cooking = self.cooking.clamped();
        self.butchering = self.butchering.clamped();
        self.eating = self.eating.clamped();
        self.movement = self.movement.clamped();
        self.work = self.work.clamped();
        self.sleep = self.sleep.clamped();
        self.animals = self.animals.clamped();
        self.queue_ttl_ticks = self.queue_ttl_ticks.max(1);
        self.dwell.cooking = self.dwell.cooking.max(0);
        self.dwell.butchering = self.dwell.butchering.max(0);
        self.dwell.eating = self.dwell.eating.max(0);
        self.dwell.movement = self.dwell.movement.max(0);
        self.dwell.work = self.dwell.work.max(0);
        self.dwell.sleep = self.dwell.sleep.max(0);
        self.dwell.animal_handling = self.dwell.animal_handling.max(0);
        self
    }

    fn family_entries(&self) -> [(IncidentContext, &FamilyKnobs); 7] {
        [
            (IncidentContext::Cooking, &self.cooking),
            (IncidentContext::Butchering, &self.butchering),
            (IncidentContext::Eating, &self.eating),
            (IncidentContext::Movement, &self.movement),
            (IncidentContext::Work, &self.work),
            (IncidentContext::Sleep, &self.sleep),
            (IncidentContext::AnimalHandling, &self.animals),
        ]
    }
}

const fn family_field_name(context: IncidentContext) -> &'static str {
    match context {
        IncidentContext::Cooking => "cooking",
        IncidentContext::Butchering => "butchering",
        IncidentContext::Eating => "eating",
        IncidentContext::Movement => "movement",
        IncidentContext::Work => "work",
        IncidentContext::Sleep => "sleep",
        IncidentContext::AnimalHandling => "animals",
    }
}

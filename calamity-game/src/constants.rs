//! Centralized balance and tuning constants for Calamity accident logic.
//!
//! These values define the deterministic math for the accident pipeline.
//! Keeping them together ensures that pacing can only be adjusted via code
//! changes reviewed in version control, rather than scattered magic numbers.

// Logging keys -------------------------------------------------------------
pub(crate) const DEBUG_ENV_VAR: &str = "CALAMITY_DEBUG_LOGS";
pub(crate) const LOG_OMEN_PASSED: &str = "log.queue.omen-passed";
pub(crate) const LOG_STORM_BEGIN: &str = "log.storm.begin";
pub(crate) const LOG_STORM_END: &str = "log.storm.end";
pub(crate) const LOG_COOKING_BURN: &str = "log.cooking.burn";
pub(crate) const LOG_COOKING_FIRE_SMALL: &str = "log.cooking.fire-small";
pub(crate) const LOG_COOKING_FIRE_LARGE: &str = "log.cooking.fire-large";
pub(crate) const LOG_COOKING_EXPLOSION: &str = "log.cooking.explosion";
pub(crate) const LOG_COOKING_EXPERT: &str = "log.cooking.expert-save";
pub(crate) const LOG_BUTCHERING_CUT: &str = "log.butchering.cut";
pub(crate) const LOG_BUTCHERING_AMPUTATION: &str = "log.butchering.amputation";
pub(crate) const LOG_EATING_CHOKING: &str = "log.eating.choking";
pub(crate) const LOG_EATING_CHOKING_CRITICAL_TITLE: &str = "alert.eating.choking-critical.title";
pub(crate) const LOG_EATING_CHOKING_CRITICAL_BODY: &str = "alert.eating.choking-critical.body";
pub(crate) const LOG_MOVEMENT_SPRAIN: &str = "log.movement.sprain";
pub(crate) const LOG_MOVEMENT_SPILL: &str = "log.movement.spill";
pub(crate) const LOG_WORK_ACCIDENT: &str = "log.work.accident";
pub(crate) const LOG_SLEEP_NIGHTMARE: &str = "log.sleep.nightmare";
pub(crate) const LOG_ANIMAL_MILK_KICK: &str = "log.animals.milk-kick";
pub(crate) const LOG_ANIMAL_SHEAR_CUT_SELF: &str = "log.animals.shear-cut-self";
pub(crate) const LOG_ANIMAL_SHEAR_CUT_ANIMAL: &str = "log.animals.shear-cut-animal";
pub(crate) const LOG_ANIMAL_TRAIN_BITE: &str = "log.animals.train-bite";

/// Foreshadowing hints shown when an incident is queued. Content is
/// cosmetic; keys are localized by the host.
pub(crate) const FORESHADOW_KEYS: [&str; 8] = [
    "log.omen.ominous-air",
    "log.omen.something-off",
    "log.omen.accident-prone",
    "log.omen.impending-misfortune",
    "log.omen.unsettling-atmosphere",
    "log.omen.unlucky-day",
    "log.omen.eerie-tension",
    "log.omen.not-quite-right",
];

/// Resolution hints shown when a queued incident finally fires.
pub(crate) const RESOLUTION_KEYS: [&str; 7] = [
    "log.omen.came-to-pass",
    "log.omen.justified",
    "log.omen.bad-luck-manifested",
    "log.omen.trouble-was-accurate",
    "log.omen.atmosphere-led-to-incident",
    "log.omen.tension-culminated",
    "log.omen.unlucky-proven-true",
];

// Tick units ---------------------------------------------------------------
pub const TICKS_PER_HOUR: i64 = 2_500;
pub const TICKS_PER_DAY: i64 = 60_000;

// Foreshadow queue tuning --------------------------------------------------
/// Queued incidents expire after three in-world days of no qualifying work.
pub(crate) const QUEUE_TTL_TICKS: i64 = 3 * TICKS_PER_DAY;
/// Minimum ticks a job must run before queued incidents can fire.
pub(crate) const DWELL_COOKING_TICKS: i64 = 300;
pub(crate) const DWELL_BUTCHERING_TICKS: i64 = 300;
pub(crate) const DWELL_EATING_TICKS: i64 = 300;
// Movement happens frequently; gating it would miss the window.
pub(crate) const DWELL_MOVEMENT_TICKS: i64 = 0;
pub(crate) const DWELL_WORK_TICKS: i64 = 300;
pub(crate) const DWELL_SLEEP_TICKS: i64 = 300;
pub(crate) const DWELL_ANIMAL_TICKS: i64 = 300;

// Immediate-roll pacing ----------------------------------------------------
/// Immediate (non-foreshadowed) rolls run at a fraction of the computed
/// probability, reserving most of the mass for the queue-driven path.
pub(crate) const IMMEDIATE_ROLL_RATIO: f32 = 0.3;

// Family base chances ------------------------------------------------------
pub(crate) const COOKING_BASE_CHANCE: f32 = 0.000_02;
pub(crate) const BUTCHERING_BASE_CHANCE: f32 = 0.000_05;
pub(crate) const EATING_BASE_CHANCE: f32 = 0.000_08;
pub(crate) const MOVEMENT_BASE_CHANCE: f32 = 0.000_05;
pub(crate) const WORK_BASE_CHANCE: f32 = 0.000_001;
pub(crate) const SLEEP_BASE_CHANCE: f32 = 0.000_02;
pub(crate) const ANIMAL_BASE_CHANCE: f32 = 0.000_06;

// Severity tier thresholds -------------------------------------------------
pub(crate) const KITCHEN_TIER_EXPLOSION: f32 = 0.95;
pub(crate) const KITCHEN_TIER_FIRE_LARGE: f32 = 0.80;
pub(crate) const KITCHEN_TIER_FIRE_SMALL: f32 = 0.50;
pub(crate) const BUTCHER_TIER_AMPUTATION: f32 = 0.75;
pub(crate) const WORK_TIER_MISSING_PART: f32 = 0.90;
pub(crate) const WORK_TIER_SEVERE: f32 = 0.80;
pub(crate) const CHOKING_CRITICAL_ROLL: f32 = 0.995;

// Kitchen effect shapes ----------------------------------------------------
pub(crate) const FIRE_SMALL_SIZE: (f32, f32) = (0.3, 0.6);
pub(crate) const FIRE_LARGE_SIZE: (f32, f32) = (0.6, 1.0);
pub(crate) const FIRE_LARGE_EXTRA_SPOTS: (u8, u8) = (2, 4);
pub(crate) const EXPLOSION_RADIUS: (f32, f32) = (1.5, 2.5);
pub(crate) const EXPLOSION_DAMAGE: (u16, u16) = (10, 25);
pub(crate) const EXPLOSION_FUSE_TICKS: (i64, i64) = (120, 300);
pub(crate) const BURN_SEVERITY_MIN: f32 = 0.05;
pub(crate) const BURN_SEVERITY_MAX_UNSKILLED: f32 = 0.4;
pub(crate) const BURN_SEVERITY_MAX_SKILLED: f32 = 0.15;

// Positive flavor branch ---------------------------------------------------
pub(crate) const EXPERT_COOK_LEVEL: u8 = 12;
pub(crate) const EXPERT_COOK_CHANCE: f32 = 0.000_1;
pub(crate) const EXPERT_COOK_XP: f32 = 25.0;

// Work accident tuning -----------------------------------------------------
pub(crate) const WORK_NEARBY_VICTIM_CHANCE: f32 = 0.7;
pub(crate) const WORK_INJURY_SEVERITY_MIN: f32 = 0.12;
pub(crate) const WORK_INJURY_SEVERITY_MAX: f32 = 0.45;
pub(crate) const WORK_INJURY_SEVERITY_MAX_SEVERE: f32 = 0.75;
pub(crate) const WORK_CUT_VS_BRUISE_CHANCE: f32 = 0.6;
pub(crate) const STAGGER_TICKS: (i64, i64) = (60, 120);

// Movement / tripping tuning -----------------------------------------------
pub(crate) const SPRAIN_SEVERITY_RANGE: (f32, f32) = (0.15, 0.4);
pub(crate) const SPRAIN_SEVERITY_CLAMP: (f32, f32) = (0.1, 0.6);
pub(crate) const SPILL_PILES: (u8, u8) = (2, 6);
pub(crate) const CLIMB_COST_DIVISOR: f32 = 20.0;

// Eating tuning ------------------------------------------------------------
pub(crate) const CHOKING_SEVERITY_RANGE: (f32, f32) = (0.15, 0.6);
pub(crate) const CHOKING_CRITICAL_SEVERITY: (f32, f32) = (0.3, 0.55);

// Animal handling tuning ---------------------------------------------------
pub(crate) const MILK_KICK_SEVERITY: (f32, f32) = (0.12, 0.40);
pub(crate) const SHEAR_CUT_SELF_SEVERITY: (f32, f32) = (0.10, 0.35);
pub(crate) const SHEAR_CUT_ANIMAL_SEVERITY: (f32, f32) = (0.08, 0.30);
pub(crate) const SHEAR_CUT_ANIMAL_CHANCE: f32 = 0.4;
pub(crate) const TRAIN_BITE_SEVERITY: (f32, f32) = (0.12, 0.42);
pub(crate) const ANIMAL_STAGGER_TICKS: (i64, i64) = (45, 120);

// Sleep / night terror tuning ----------------------------------------------
pub(crate) const TERROR_GRIEF_WEIGHT: f32 = 0.03;
pub(crate) const TERROR_GRIEF_CAP: f32 = 1.0;
pub(crate) const TERROR_TRAUMA_WEIGHT: f32 = 0.3;
pub(crate) const TERROR_TRAUMA_CAP: f32 = 1.5;
pub(crate) const TERROR_PAIN_THRESHOLD: f32 = 0.2;
pub(crate) const TERROR_PAIN_WEIGHT: f32 = 0.5;
pub(crate) const TERROR_LOW_MOOD: f32 = 0.35;
pub(crate) const TERROR_VERY_LOW_MOOD: f32 = 0.20;
pub(crate) const TERROR_MOOD_BUMP: f32 = 0.2;
pub(crate) const TERROR_WIMP_BUMP: f32 = 0.3;
pub(crate) const TERROR_PSYCHOPATH_FACTOR: f32 = 0.7;
pub(crate) const TERROR_MULT_CLAMP: (f32, f32) = (0.5, 5.0);

// Accident storm tuning ----------------------------------------------------
pub(crate) const STORM_CHANCE_MULT: f32 = 10.0;
pub(crate) const STORM_HOURLY_QUEUE_CHANCE: f32 = 0.5;

// Probability bounds -------------------------------------------------------
pub(crate) const PROBABILITY_FLOOR: f32 = 0.0;
pub(crate) const PROBABILITY_MAX: f32 = 1.0;

#[cfg(test)]
pub(crate) const FLOAT_EPSILON: f32 = 1e-6;

//! Risk assessment: actor attributes in, trigger probability and severity out.
//!
//! The probability is a product of table-driven multipliers over a family
//! base chance. Tables keep the shape (risk falls as skill rises, falls as
//! mood improves) while the constants stay data, not logic.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::actor::{ActorState, Passion, SkillKind, TraitKind};
use crate::catalog::IncidentContext;
use crate::config::FamilyKnobs;
use crate::constants::{
    TERROR_GRIEF_CAP, TERROR_GRIEF_WEIGHT, TERROR_LOW_MOOD, TERROR_MOOD_BUMP, TERROR_MULT_CLAMP,
    TERROR_PAIN_THRESHOLD, TERROR_PAIN_WEIGHT, TERROR_PSYCHOPATH_FACTOR, TERROR_TRAUMA_CAP,
    TERROR_TRAUMA_WEIGHT, TERROR_VERY_LOW_MOOD, TERROR_WIMP_BUMP,
};
use crate::numbers::{clamp01, lerp};

/// Probability and severity produced by one assessment. Ephemeral; callers
/// perform the actual bernoulli trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub trigger_probability: f32,
    pub severity: f32,
    /// The combined multiplier basis, exposed so effect executors can scale
    /// secondary magnitudes (burn ceilings, spill sizes) consistently.
    pub multiplier: f32,
}

/// One skill band: multiplier applied while `level <= max_level`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillBand {
    pub max_level: u8,
    pub mult: f32,
}

/// Table-driven multiplier policy for one accident family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub family: IncidentContext,
    /// Which skill drives the band lookup; `None` for families where skill
    /// is irrelevant (movement, sleep).
    pub skill: Option<SkillKind>,
    /// Ascending by `max_level`; multipliers non-increasing.
    pub skill_bands: Vec<SkillBand>,
    /// Multiplier for levels above the last band, tapering per extra level.
    pub open_band: (f32, f32),
    /// Passion multipliers (none, minor, major).
    pub passion_mults: [f32; 3],
    /// Mood interpolation bounds: multiplier at 0 mood, multiplier at 1 mood.
    pub mood_bounds: (f32, f32),
    pub trait_mults: Vec<(TraitKind, f32)>,
    pub trait_clamp: (f32, f32),
    pub severity_range: (f32, f32),
    pub severity_clamp: (f32, f32),
}

impl RiskProfile {
    #[must_use]
    pub fn cooking() -> Self {
        Self {
            family: IncidentContext::Cooking,
            skill: Some(SkillKind::Cooking),
            skill_bands: vec![
                SkillBand {
                    max_level: 2,
                    mult: 3.0,
                },
                SkillBand {
                    max_level: 5,
                    mult: 2.0,
                },
                SkillBand {
                    max_level: 9,
                    mult: 1.0,
                },
            ],
            open_band: (0.5, 0.03),
            passion_mults: [1.5, 1.0, 0.7],
            mood_bounds: (2.0, 0.8),
            trait_mults: vec![
                (TraitKind::Careful, 0.6),
                (TraitKind::Neurotic, 1.2),
                (TraitKind::Pyromaniac, 1.8),
            ],
            trait_clamp: (0.1, 4.0),
            severity_range: (0.1, 0.4),
            severity_clamp: (0.05, 0.8),
        }
    }

    #[must_use]
    pub fn butchering() -> Self {
        Self {
            family: IncidentContext::Butchering,
            skill: Some(SkillKind::Cooking),
            skill_bands: vec![
                SkillBand {
                    max_level: 4,
                    mult: 1.8,
                },
                SkillBand {
                    max_level: 9,
                    mult: 0.8,
                },
                SkillBand {
                    max_level: 14,
                    mult: 0.5,
                },
            ],
            open_band: (0.3, 0.0),
            passion_mults: [1.0, 1.0, 1.0],
            mood_bounds: (1.4, 0.9),
            trait_mults: vec![(TraitKind::Neurotic, 1.3), (TraitKind::Brawler, 0.9)],
            trait_clamp: (0.5, 2.0),
            severity_range: (0.1, 0.4),
            severity_clamp: (0.05, 0.8),
        }
    }

    #[must_use]
    pub fn eating() -> Self {
        Self {
            family: IncidentContext::Eating,
            skill: None,
            skill_bands: Vec::new(),
            open_band: (1.0, 0.0),
            passion_mults: [1.0, 1.0, 1.0],
            mood_bounds: (1.0, 1.0),
            trait_mults: Vec::new(),
            trait_clamp: (1.0, 1.0),
            severity_range: (0.15, 0.6),
            severity_clamp: (0.05, 1.0),
        }
    }

    #[must_use]
    pub fn movement() -> Self {
        Self {
            family: IncidentContext::Movement,
            skill: None,
            skill_bands: Vec::new(),
            open_band: (1.0, 0.0),
            passion_mults: [1.0, 1.0, 1.0],
            mood_bounds: (1.5, 0.8),
            trait_mults: vec![(TraitKind::Brawler, 0.9), (TraitKind::Nimble, 0.75)],
            trait_clamp: (0.5, 1.7),
            severity_range: (0.15, 0.4),
            severity_clamp: (0.1, 0.6),
        }
    }

    #[must_use]
    pub fn work() -> Self {
        Self {
            family: IncidentContext::Work,
            skill: None,
            skill_bands: Vec::new(),
            open_band: (1.0, 0.0),
            passion_mults: [1.0, 1.0, 1.0],
            mood_bounds: (1.0, 1.0),
            trait_mults: Vec::new(),
            trait_clamp: (1.0, 1.0),
            severity_range: (0.12, 0.45),
            severity_clamp: (0.05, 0.8),
        }
    }

    #[must_use]
    pub fn sleep() -> Self {
        Self {
            family: IncidentContext::Sleep,
            skill: None,
            skill_bands: Vec::new(),
            open_band: (1.0, 0.0),
            passion_mults: [1.0, 1.0, 1.0],
            // Mood already feeds the trauma multiplier; no extra lerp here.
            mood_bounds: (1.0, 1.0),
            trait_mults: Vec::new(),
            trait_clamp: (1.0, 1.0),
            severity_range: (0.2, 0.6),
            severity_clamp: (0.1, 1.0),
        }
    }

    #[must_use]
    pub fn animal_handling() -> Self {
        Self {
            family: IncidentContext::AnimalHandling,
            skill: Some(SkillKind::Animals),
            skill_bands: vec![
                SkillBand {
                    max_level: 4,
                    mult: 1.5,
                },
                SkillBand {
                    max_level: 9,
                    mult: 1.0,
                },
                SkillBand {
                    max_level: 14,
                    mult: 0.7,
                },
            ],
            open_band: (0.45, 0.0),
            passion_mults: [1.0, 1.0, 1.0],
            mood_bounds: (1.0, 1.0),
            trait_mults: Vec::new(),
            trait_clamp: (1.0, 1.0),
            severity_range: (0.1, 0.4),
            severity_clamp: (0.05, 0.6),
        }
    }

    /// Profile for a context.
    #[must_use]
    pub fn for_context(context: IncidentContext) -> Self {
        match context {
            IncidentContext::Cooking => Self::cooking(),
            IncidentContext::Butchering => Self::butchering(),
            IncidentContext::Eating => Self::eating(),
            IncidentContext::Movement => Self::movement(),
            IncidentContext::Work => Self::work(),
            IncidentContext::Sleep => Self::sleep(),
            IncidentContext::AnimalHandling => Self::animal_handling(),
        }
    }

    fn skill_multiplier(&self, actor: &ActorState) -> f32 {
        let Some(skill) = self.skill else {
            return 1.0;
        };
        let level = actor.skills.get(skill).level;
        for band in &self.skill_bands {
            if level <= band.max_level {
                return band.mult;
            }
        }
        let (base, taper) = self.open_band;
        let threshold = self.skill_bands.last().map_or(0, |band| band.max_level);
        let over = f32::from(level.saturating_sub(threshold + 1));
        (base - over * taper).max(0.05)
    }

    fn passion_multiplier(&self, actor: &ActorState) -> f32 {
        let Some(skill) = self.skill else {
            return 1.0;
        };
        match actor.skills.get(skill).passion {
            Passion::None => self.passion_mults[0],
            Passion::Minor => self.passion_mults[1],
            Passion::Major => self.passion_mults[2],
        }
    }

    fn mood_multiplier(&self, actor: &ActorState) -> f32 {
        actor
            .mood
            .map_or(1.0, |mood| lerp(self.mood_bounds.0, self.mood_bounds.1, mood))
    }

    fn trait_multiplier(&self, actor: &ActorState) -> f32 {
        let mut mult = 1.0;
        for (kind, factor) in &self.trait_mults {
            if actor.has_trait(*kind) {
                mult *= factor;
            }
        }
        mult.clamp(self.trait_clamp.0, self.trait_clamp.1)
    }
}

/// Inputs beyond the actor: environmental multiplier (terrain, carcass size,
/// storm) and the configuration knobs already validated upstream.
#[derive(Debug, Clone, Copy)]
pub struct RiskInputs<'a> {
    pub knobs: &'a FamilyKnobs,
    pub global_chance_mult: f32,
    pub global_severity_mult: f32,
    pub environment_mult: f32,
}

/// Assess risk for one poll. Pure except for severity sampling through the
/// caller's RNG stream.
pub fn assess<R>(
    profile: &RiskProfile,
    actor: &ActorState,
    inputs: &RiskInputs<'_>,
    rng: &mut R,
) -> RiskAssessment
where
    R: Rng + ?Sized,
{
    let multiplier = profile.skill_multiplier(actor)
        * profile.passion_multiplier(actor)
        * profile.mood_multiplier(actor)
        * profile.trait_multiplier(actor)
        * inputs.environment_mult;

    let trigger_probability = clamp01(
        inputs.knobs.base_chance * multiplier * inputs.knobs.chance_mult * inputs.global_chance_mult,
    );

    let (sev_min, sev_max) = profile.severity_range;
    let raw = if sev_max > sev_min {
        rng.gen_range(sev_min..sev_max)
    } else {
        sev_min
    };
    // Risk factors make outcomes worse, not just more likely.
    let scaled =
        raw * (1.0 + multiplier * 0.1) * inputs.knobs.severity_mult * inputs.global_severity_mult;
    let severity = scaled.clamp(profile.severity_clamp.0, profile.severity_clamp.1);

    RiskAssessment {
        trigger_probability,
        severity,
        multiplier,
    }
}

/// One bernoulli trial against a `[0, 1]` probability.
pub fn roll_chance<R>(rng: &mut R, probability: f32) -> bool
where
    R: Rng + ?Sized,
{
    if probability <= 0.0 {
        return false;
    }
    if probability >= 1.0 {
        return true;
    }
    rng.r#gen::<f32>() < probability
}

/// Manipulation/consciousness curve used by the butchering family.
#[must_use]
pub fn dexterity_multiplier(manipulation: f32, consciousness: f32) -> f32 {
    let mut mult = 1.0;
    if manipulation < 0.8 {
        mult *= lerp(2.0, 1.0, manipulation / 0.8);
    } else if manipulation > 1.0 {
        mult *= lerp(1.0, 0.8, ((manipulation - 1.0) / 0.5).clamp(0.0, 1.0));
    }
    if consciousness < 1.0 {
        mult *= lerp(1.8, 1.0, consciousness);
    }
    mult.clamp(0.5, 3.0)
}

/// Moving-capacity curve used by the movement family.
#[must_use]
pub fn moving_multiplier(moving: f32) -> f32 {
    if moving >= 1.0 {
        lerp(1.0, 0.9, (moving - 1.0).clamp(0.0, 1.0))
    } else {
        lerp(1.6, 1.0, moving.clamp(0.0, 1.0))
    }
}

/// Age curve for tripping: the young are reckless and the old are brittle.
#[must_use]
pub fn age_multiplier(age_years: f32) -> f32 {
    if age_years < 16.0 {
        1.3
    } else if age_years > 50.0 {
        1.0 + (age_years - 50.0) * 0.02
    } else {
        1.0
    }
}

/// Terrain difficulty multiplier from the climb cost of the entered cell.
#[must_use]
pub fn climb_multiplier(climb_cost: u16) -> f32 {
    1.0 + f32::from(climb_cost) / crate::constants::CLIMB_COST_DIVISOR
}

/// Carcass-size proxy multiplier for butchering, keyed on recipe work
/// amount since corpse size is not visible at this boundary.
#[must_use]
pub fn carcass_multiplier(work_amount: f32) -> f32 {
    if work_amount > 1_000.0 {
        1.3
    } else if work_amount > 500.0 {
        1.1
    } else {
        1.0
    }
}

/// Trauma-aware multiplier for night terrors: recent grief, pain, low mood,
/// and temperament all feed in.
#[must_use]
pub fn night_terror_multiplier(actor: &ActorState) -> f32 {
    let mut mult = 1.0;

    mult += (actor.grief.negative_mood_sum * TERROR_GRIEF_WEIGHT).clamp(0.0, TERROR_GRIEF_CAP);
    let trauma = actor.grief.trauma_hits as f32 * TERROR_TRAUMA_WEIGHT;
    mult += trauma.clamp(0.0, TERROR_TRAUMA_CAP);

    if actor.pain > TERROR_PAIN_THRESHOLD {
        mult += actor.pain.clamp(0.0, 1.0) * TERROR_PAIN_WEIGHT;
    }

    let mood = actor.mood.unwrap_or(0.5);
    if mood < TERROR_LOW_MOOD {
        mult += TERROR_MOOD_BUMP;
    }
    if mood < TERROR_VERY_LOW_MOOD {
        mult += TERROR_MOOD_BUMP;
    }

    if actor.has_trait(TraitKind::Wimp) {
        mult += TERROR_WIMP_BUMP;
    }
    if actor.has_trait(TraitKind::Psychopath) {
        mult *= TERROR_PSYCHOPATH_FACTOR;
    }

    mult.clamp(TERROR_MULT_CLAMP.0, TERROR_MULT_CLAMP.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccidentConfig;
    use crate::constants::FLOAT_EPSILON;
    use crate::testutil::cook_with_level;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn inputs(config: &AccidentConfig) -> RiskInputs<'_> {
        RiskInputs {
            knobs: config.family(IncidentContext::Cooking),
            global_chance_mult: config.global_chance_mult,
            global_severity_mult: config.global_severity_mult,
            environment_mult: 1.0,
        }
    }

    #[test]
    fn probability_non_increasing_with_skill() {
        let profile = RiskProfile::cooking();
        let config = AccidentConfig::default();
        let mut rng = SmallRng::seed_from_u64(11);

        let mut last = f32::MAX;
        for level in 0..=20 {
            let actor = cook_with_level(1, level);
            let assessment = assess(&profile, &actor, &inputs(&config), &mut rng);
            assert!(
                assessment.trigger_probability <= last + FLOAT_EPSILON,
                "risk rose from {last} at level {level}"
            );
            last = assessment.trigger_probability;
        }
    }

    #[test]
    fn open_band_tapers_past_last_threshold() {
        let profile = RiskProfile::cooking();
        let at_ten = cook_with_level(1, 10);
        let at_twenty = cook_with_level(1, 20);
        let ten = profile.skill_multiplier(&at_ten);
        let twenty = profile.skill_multiplier(&at_twenty);
        assert!((ten - 0.5).abs() < FLOAT_EPSILON);
        assert!((twenty - 0.2).abs() < FLOAT_EPSILON);
    }

    #[test]
    fn bad_mood_raises_risk() {
        let profile = RiskProfile::cooking();
        let config = AccidentConfig::default();
        let mut rng = SmallRng::seed_from_u64(5);

        let mut gloomy = cook_with_level(1, 8);
        gloomy.mood = Some(0.0);
        let mut cheerful = cook_with_level(2, 8);
        cheerful.mood = Some(1.0);

        let gloomy_risk = assess(&profile, &gloomy, &inputs(&config), &mut rng);
        let cheerful_risk = assess(&profile, &cheerful, &inputs(&config), &mut rng);
        assert!(gloomy_risk.trigger_probability > cheerful_risk.trigger_probability);
    }

    #[test]
    fn traits_shift_risk_within_clamp() {
        let profile = RiskProfile::cooking();
        let mut pyro = cook_with_level(1, 8);
        pyro.traits.push(TraitKind::Pyromaniac);
        let careful = {
            let mut actor = cook_with_level(2, 8);
            actor.traits.push(TraitKind::Careful);
            actor
        };
        assert!(profile.trait_multiplier(&pyro) > 1.0);
        assert!(profile.trait_multiplier(&careful) < 1.0);
    }

    #[test]
    fn severity_respects_clamp() {
        let profile = RiskProfile::cooking();
        let mut config = AccidentConfig::default();
        config.global_severity_mult = 100.0;
        let actor = cook_with_level(1, 0);
        let mut rng = SmallRng::seed_from_u64(9);
        let assessment = assess(&profile, &actor, &inputs(&config), &mut rng);
        assert!(assessment.severity <= profile.severity_clamp.1);
    }

    #[test]
    fn capacity_curves_follow_expected_shape() {
        assert!(dexterity_multiplier(0.4, 1.0) > dexterity_multiplier(1.0, 1.0));
        assert!(dexterity_multiplier(1.4, 1.0) < 1.0 + FLOAT_EPSILON);
        assert!(moving_multiplier(0.5) > moving_multiplier(1.0));
        assert!(moving_multiplier(2.0) < 1.0);
    }

    #[test]
    fn age_curve_penalizes_extremes() {
        assert!(age_multiplier(12.0) > 1.0);
        assert!((age_multiplier(30.0) - 1.0).abs() < FLOAT_EPSILON);
        assert!(age_multiplier(70.0) > 1.0);
    }

    #[test]
    fn night_terror_multiplier_stays_clamped() {
        let mut haunted = cook_with_level(1, 5);
        haunted.grief.negative_mood_sum = 100.0;
        haunted.grief.trauma_hits = 20;
        haunted.pain = 1.0;
        haunted.mood = Some(0.05);
        haunted.traits.push(TraitKind::Wimp);
        let mult = night_terror_multiplier(&haunted);
        assert!(mult <= TERROR_MULT_CLAMP.1 + FLOAT_EPSILON);

        let calm = cook_with_level(2, 5);
        assert!(night_terror_multiplier(&calm) >= TERROR_MULT_CLAMP.0);
    }
}

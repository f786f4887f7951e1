//! Cooking monitor: kitchen burns, fires, and stove explosions.

use rand::Rng;

use crate::actor::{ActorState, SkillKind, TargetRef, Tick};
use crate::catalog::{EffectSpec, IncidentContext, IncidentDef};
use crate::constants::{
    BURN_SEVERITY_MAX_SKILLED, BURN_SEVERITY_MAX_UNSKILLED, BURN_SEVERITY_MIN, EXPERT_COOK_CHANCE,
    EXPERT_COOK_LEVEL, EXPERT_COOK_XP, KITCHEN_TIER_EXPLOSION, KITCHEN_TIER_FIRE_LARGE,
    KITCHEN_TIER_FIRE_SMALL, LOG_COOKING_BURN, LOG_COOKING_EXPERT, LOG_COOKING_EXPLOSION,
    LOG_COOKING_FIRE_LARGE, LOG_COOKING_FIRE_SMALL,
};
use crate::effects::{EffectExecutor, NotificationKind};
use crate::numbers::{clamp01, lerp, skill_fraction};
use crate::risk::{self, RiskProfile};
use crate::{AccidentEngine, AccidentError, debug_poll_error};

impl AccidentEngine {
    /// Host callback: a cooking work cycle elapsed for `actor`.
    pub fn on_cooking_tick(&mut self, now: Tick, actor: &ActorState, fx: &mut dyn EffectExecutor) {
        if let Err(error) = self.cooking_poll(now, actor, fx) {
            debug_poll_error(IncidentContext::Cooking, &error);
        }
    }

    fn cooking_poll(
        &mut self,
        now: Tick,
        actor: &ActorState,
        fx: &mut dyn EffectExecutor,
    ) -> Result<(), AccidentError> {
        let Some(map) = actor.eligible() else {
            return Ok(());
        };

        if let Some(def) = self.try_fire_queued(now, actor, IncidentContext::Cooking, fx) {
            return self.execute_cooking_incident(now, actor, map, &def, fx);
        }

        let profile = RiskProfile::cooking();
        let environment = self.environment_mult(map, 1.0);
        let inputs = self.risk_inputs(IncidentContext::Cooking, environment);
        let assessment = {
            let mut rng = self.rng.cooking();
            risk::assess(&profile, actor, &inputs, &mut *rng)
        };

        let immediate = assessment.trigger_probability * self.config.immediate_roll_ratio;
        let fired = {
            let mut rng = self.rng.cooking();
            risk::roll_chance(&mut *rng, immediate)
        };
        if fired {
            let def = self.pick_kitchen_incident()?;
            return self.execute_cooking_incident(now, actor, map, &def, fx);
        }

        // Skilled cooks occasionally earn a save instead of a scare.
        if actor.skills.cooking.level >= EXPERT_COOK_LEVEL {
            let lucky = {
                let mut rng = self.rng.cooking();
                risk::roll_chance(&mut *rng, EXPERT_COOK_CHANCE)
            };
            if lucky {
                fx.post_notification(LOG_COOKING_EXPERT, NotificationKind::Positive);
                fx.award_experience(actor.id, SkillKind::Cooking, EXPERT_COOK_XP);
            }
        }
        Ok(())
    }

    /// Severity-tier selection for immediate kitchen incidents: burns are
    /// common, explosions rare.
    fn pick_kitchen_incident(&self) -> Result<IncidentDef, AccidentError> {
        let roll = {
            let mut rng = self.rng.cooking();
            rng.r#gen::<f32>()
        };
        let id = if roll >= KITCHEN_TIER_EXPLOSION {
            "kitchen_explosion"
        } else if roll >= KITCHEN_TIER_FIRE_LARGE {
            "kitchen_fire_large"
        } else if roll >= KITCHEN_TIER_FIRE_SMALL {
            "kitchen_fire_small"
        } else {
            "kitchen_burn"
        };
        self.lookup(id)
    }

    fn execute_cooking_incident(
        &mut self,
        now: Tick,
        actor: &ActorState,
        map: TargetRef,
        def: &IncidentDef,
        fx: &mut dyn EffectExecutor,
    ) -> Result<(), AccidentError> {
        match def.effect {
            EffectSpec::Injury {
                injury, region, ..
            } => {
                let severity = self.burn_severity(actor);
                fx.apply_injury(actor.id, region, injury, severity);
                fx.post_notification(LOG_COOKING_BURN, NotificationKind::Negative);
            }
            EffectSpec::Fire {
                min_size,
                max_size,
                extra_spots,
            } => {
                let (spots, sizes) = {
                    let mut rng = self.rng.cooking();
                    let extra = if extra_spots.1 > extra_spots.0 {
                        rng.gen_range(extra_spots.0..=extra_spots.1)
                    } else {
                        extra_spots.0
                    };
                    let total = 1 + usize::from(extra);
                    let sizes: Vec<f32> = (0..total)
                        .map(|_| rng.gen_range(min_size..max_size))
                        .collect();
                    (total, sizes)
                };
                for size in sizes {
                    fx.spawn_fire(map, actor.position, size);
                }
                let key = if spots > 1 {
                    LOG_COOKING_FIRE_LARGE
                } else {
                    LOG_COOKING_FIRE_SMALL
                };
                fx.post_notification(key, NotificationKind::Negative);
            }
            EffectSpec::Explosion {
                min_radius,
                max_radius,
                min_damage,
                max_damage,
                fuse_ticks,
            } => {
                let (radius, damage, fuse) = {
                    let mut rng = self.rng.cooking();
                    let radius = rng.gen_range(min_radius..max_radius);
                    let damage = rng.gen_range(min_damage..=max_damage);
                    let fuse = rng.gen_range(fuse_ticks.0..=fuse_ticks.1);
                    (radius, damage, fuse)
                };
                self.explosions
                    .schedule(map, actor.position, radius, damage, now + fuse);
                fx.post_notification(LOG_COOKING_EXPLOSION, NotificationKind::Negative);
            }
            _ => return Err(AccidentError::UnknownIncident(def.id.clone())),
        }
        Ok(())
    }

    /// Burn severity shaped by skill: better cooks pull back faster.
    fn burn_severity(&self, actor: &ActorState) -> f32 {
        let max_severity = lerp(
            BURN_SEVERITY_MAX_UNSKILLED,
            BURN_SEVERITY_MAX_SKILLED,
            skill_fraction(actor.skills.cooking.level),
        );
        let raw = {
            let mut rng = self.rng.cooking();
            rng.gen_range(BURN_SEVERITY_MIN..max_severity)
        };
        clamp01(raw * self.severity_scale(IncidentContext::Cooking))
    }
}

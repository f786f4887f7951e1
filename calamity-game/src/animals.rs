//! Animal-handling monitor: kicked while milking, nicked shears, and
//! training sessions that end in teeth.

use rand::Rng;

use crate::actor::{ActorState, AnimalRef, Tick};
use crate::catalog::{EffectSpec, IncidentContext, IncidentDef};
use crate::constants::{
    ANIMAL_STAGGER_TICKS, LOG_ANIMAL_MILK_KICK, LOG_ANIMAL_SHEAR_CUT_ANIMAL,
    LOG_ANIMAL_SHEAR_CUT_SELF, LOG_ANIMAL_TRAIN_BITE, SHEAR_CUT_ANIMAL_CHANCE,
    SHEAR_CUT_ANIMAL_SEVERITY, SHEAR_CUT_SELF_SEVERITY,
};
use crate::effects::{EffectExecutor, InjuryKind, NotificationKind, RegionKind};
use crate::numbers::clamp01;
use crate::risk::{self, RiskProfile};
use crate::{AccidentEngine, AccidentError, debug_poll_error};

/// Which handling chore the actor is doing; decides the mishap shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chore {
    Milking,
    Shearing,
    Training,
}

impl AccidentEngine {
    /// Host callback: a milking work cycle elapsed for `actor`.
    pub fn on_milking(
        &mut self,
        now: Tick,
        actor: &ActorState,
        animal: AnimalRef,
        fx: &mut dyn EffectExecutor,
    ) {
        if let Err(error) = self.animal_poll(now, actor, animal, Chore::Milking, fx) {
            debug_poll_error(IncidentContext::AnimalHandling, &error);
        }
    }

    /// Host callback: a shearing work cycle elapsed for `actor`.
    pub fn on_shearing(
        &mut self,
        now: Tick,
        actor: &ActorState,
        animal: AnimalRef,
        fx: &mut dyn EffectExecutor,
    ) {
        if let Err(error) = self.animal_poll(now, actor, animal, Chore::Shearing, fx) {
            debug_poll_error(IncidentContext::AnimalHandling, &error);
        }
    }

    /// Host callback: a training session tick elapsed for `actor`.
    pub fn on_training(
        &mut self,
        now: Tick,
        actor: &ActorState,
        animal: AnimalRef,
        fx: &mut dyn EffectExecutor,
    ) {
        if let Err(error) = self.animal_poll(now, actor, animal, Chore::Training, fx) {
            debug_poll_error(IncidentContext::AnimalHandling, &error);
        }
    }

    fn animal_poll(
        &mut self,
        now: Tick,
        actor: &ActorState,
        animal: AnimalRef,
        chore: Chore,
        fx: &mut dyn EffectExecutor,
    ) -> Result<(), AccidentError> {
        let Some(map) = actor.eligible() else {
            return Ok(());
        };

        if let Some(def) = self.try_fire_queued(now, actor, IncidentContext::AnimalHandling, fx) {
            self.execute_animal_incident(actor, animal, &def, fx);
            return Ok(());
        }

        let profile = RiskProfile::animal_handling();
        let environment = self.environment_mult(map, 1.0);
        let inputs = self.risk_inputs(IncidentContext::AnimalHandling, environment);
        let assessment = {
            let mut rng = self.rng.animals();
            risk::assess(&profile, actor, &inputs, &mut *rng)
        };

        let immediate = assessment.trigger_probability * self.config.immediate_roll_ratio;
        let fired = {
            let mut rng = self.rng.animals();
            risk::roll_chance(&mut *rng, immediate)
        };
        if fired {
            let def = match chore {
                Chore::Milking => self.lookup("milking_kick")?,
                Chore::Shearing => self.lookup("shearing_cut")?,
                Chore::Training => self.lookup("training_bite")?,
            };
            self.execute_animal_incident(actor, animal, &def, fx);
        }
        Ok(())
    }

    fn execute_animal_incident(
        &mut self,
        actor: &ActorState,
        animal: AnimalRef,
        def: &IncidentDef,
        fx: &mut dyn EffectExecutor,
    ) {
        match def.effect {
            EffectSpec::Injury {
                injury,
                region,
                min_severity,
                max_severity,
            } => {
                let severity = {
                    let mut rng = self.rng.animals();
                    rng.gen_range(min_severity..max_severity)
                };
                let severity =
                    clamp01(severity * self.severity_scale(IncidentContext::AnimalHandling));
                fx.apply_injury(actor.id, region, injury, severity);

                let (key, staggered) = match injury {
                    InjuryKind::Bruise => (LOG_ANIMAL_MILK_KICK, true),
                    InjuryKind::Bite => (LOG_ANIMAL_TRAIN_BITE, true),
                    _ => (LOG_ANIMAL_SHEAR_CUT_SELF, false),
                };
                if staggered {
                    let ticks = {
                        let mut rng = self.rng.animals();
                        rng.gen_range(ANIMAL_STAGGER_TICKS.0..=ANIMAL_STAGGER_TICKS.1)
                    };
                    fx.stagger(actor.id, ticks);
                }
                fx.interrupt_activity(actor.id, false);
                fx.post_notification(key, NotificationKind::Negative);
            }
            EffectSpec::ShearingCut => {
                let cut_animal = {
                    let mut rng = self.rng.animals();
                    risk::roll_chance(&mut *rng, SHEAR_CUT_ANIMAL_CHANCE)
                };
                if cut_animal {
                    let severity = {
                        let mut rng = self.rng.animals();
                        rng.gen_range(SHEAR_CUT_ANIMAL_SEVERITY.0..SHEAR_CUT_ANIMAL_SEVERITY.1)
                    };
                    fx.apply_animal_injury(animal, InjuryKind::Cut, clamp01(severity));
                    fx.interrupt_activity(actor.id, false);
                    fx.post_notification(LOG_ANIMAL_SHEAR_CUT_ANIMAL, NotificationKind::Negative);
                } else {
                    let severity = {
                        let mut rng = self.rng.animals();
                        rng.gen_range(SHEAR_CUT_SELF_SEVERITY.0..SHEAR_CUT_SELF_SEVERITY.1)
                    };
                    let severity =
                        clamp01(severity * self.severity_scale(IncidentContext::AnimalHandling));
                    fx.apply_injury(actor.id, RegionKind::Hand, InjuryKind::Cut, severity);
                    fx.interrupt_activity(actor.id, false);
                    fx.post_notification(LOG_ANIMAL_SHEAR_CUT_SELF, NotificationKind::Negative);
                }
            }
            _ => {}
        }
    }
}

//! Butchering monitor: knife cuts and the occasional lost finger.

use rand::Rng;

use crate::actor::{ActorState, Tick};
use crate::catalog::{EffectSpec, IncidentContext, IncidentDef};
use crate::constants::{BUTCHER_TIER_AMPUTATION, LOG_BUTCHERING_AMPUTATION, LOG_BUTCHERING_CUT};
use crate::effects::{EffectExecutor, NotificationKind, RegionKind};
use crate::numbers::clamp01;
use crate::risk::{self, RiskProfile, carcass_multiplier, dexterity_multiplier};
use crate::{AccidentEngine, AccidentError, debug_poll_error};

impl AccidentEngine {
    /// Host callback: a butchering work cycle elapsed for `actor`.
    /// `recipe_work_amount` proxies carcass size.
    pub fn on_butchering_tick(
        &mut self,
        now: Tick,
        actor: &ActorState,
        recipe_work_amount: f32,
        fx: &mut dyn EffectExecutor,
    ) {
        if let Err(error) = self.butchering_poll(now, actor, recipe_work_amount, fx) {
            debug_poll_error(IncidentContext::Butchering, &error);
        }
    }

    fn butchering_poll(
        &mut self,
        now: Tick,
        actor: &ActorState,
        recipe_work_amount: f32,
        fx: &mut dyn EffectExecutor,
    ) -> Result<(), AccidentError> {
        let Some(map) = actor.eligible() else {
            return Ok(());
        };

        if let Some(def) = self.try_fire_queued(now, actor, IncidentContext::Butchering, fx) {
            self.execute_butchering_incident(actor, &def, fx);
            return Ok(());
        }

        let profile = RiskProfile::butchering();
        let family_mult = dexterity_multiplier(
            actor.capacities.manipulation,
            actor.capacities.consciousness,
        ) * carcass_multiplier(recipe_work_amount);
        let environment = self.environment_mult(map, family_mult);
        let inputs = self.risk_inputs(IncidentContext::Butchering, environment);
        let assessment = {
            let mut rng = self.rng.butchering();
            risk::assess(&profile, actor, &inputs, &mut *rng)
        };

        let immediate = assessment.trigger_probability * self.config.immediate_roll_ratio;
        let fired = {
            let mut rng = self.rng.butchering();
            risk::roll_chance(&mut *rng, immediate)
        };
        if fired {
            let roll = {
                let mut rng = self.rng.butchering();
                rng.r#gen::<f32>()
            };
            let def = if roll >= BUTCHER_TIER_AMPUTATION {
                self.lookup("butchering_amputation")?
            } else {
                self.lookup("butchering_cut")?
            };
            self.execute_butchering_incident(actor, &def, fx);
        }
        Ok(())
    }

    fn execute_butchering_incident(
        &mut self,
        actor: &ActorState,
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
                    let mut rng = self.rng.butchering();
                    rng.gen_range(min_severity..max_severity)
                };
                let severity =
                    clamp01(severity * self.severity_scale(IncidentContext::Butchering));
                fx.apply_injury(actor.id, region, injury, severity);
                fx.post_notification(LOG_BUTCHERING_CUT, NotificationKind::Negative);
            }
            EffectSpec::MissingPart { .. } => {
                // Hand or finger, an even split.
                let hand = {
                    let mut rng = self.rng.butchering();
                    rng.r#gen::<bool>()
                };
                let region = if hand {
                    RegionKind::Hand
                } else {
                    RegionKind::Finger
                };
                fx.apply_missing_part(actor.id, region);
                fx.post_notification(LOG_BUTCHERING_AMPUTATION, NotificationKind::Negative);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::IncidentId;
    use crate::config::AccidentConfig;
    use crate::testutil::{RecordingExecutor, colonist_doing};
    use crate::{ActivityKind, InjuryKind, TargetRef};

    #[test]
    fn queued_amputation_fires_after_dwell() {
        let mut config = AccidentConfig::default();
        config.butchering.base_chance = 0.0;
        let mut engine = AccidentEngine::new(0xB0B, config).unwrap();
        let mut fx = RecordingExecutor::default();
        engine.on_storyteller_incident(
            0,
            IncidentId::new("butchering_amputation"),
            TargetRef(1),
            &mut fx,
        );

        let butcher = colonist_doing(1, ActivityKind::BillWork, 11);
        engine.on_butchering_tick(50, &butcher, 800.0, &mut fx);
        assert!(fx.missing_parts.is_empty());

        engine.on_butchering_tick(400, &butcher, 800.0, &mut fx);
        assert_eq!(fx.missing_parts.len(), 1);
        let region = fx.missing_parts[0].1;
        assert!(matches!(region, RegionKind::Hand | RegionKind::Finger));
    }

    #[test]
    fn immediate_cut_lands_on_fingers() {
        let mut config = AccidentConfig::default();
        config.butchering.base_chance = 1.0;
        config.immediate_roll_ratio = 1.0;
        let mut engine = AccidentEngine::new(0x5EED, config).unwrap();
        let mut fx = RecordingExecutor::default();

        let butcher = colonist_doing(1, ActivityKind::BillWork, 11);
        for tick in 0..8 {
            engine.on_butchering_tick(tick, &butcher, 300.0, &mut fx);
        }
        assert!(!fx.injuries.is_empty() || !fx.missing_parts.is_empty());
        for (_, _, injury, severity) in &fx.injuries {
            assert_eq!(*injury, InjuryKind::Cut);
            assert!(*severity > 0.0 && *severity <= 1.0);
        }
    }

    #[test]
    fn clumsy_hands_raise_risk() {
        let steady = dexterity_multiplier(1.0, 1.0);
        let shaky = dexterity_multiplier(0.4, 0.7);
        assert!(shaky > steady);

        assert!(carcass_multiplier(1_500.0) > carcass_multiplier(300.0));
    }
}

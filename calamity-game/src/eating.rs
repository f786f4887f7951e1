//! Eating monitor: choking on a bite, rarely badly enough to need help.

use rand::Rng;

use crate::actor::{ActorState, Tick};
use crate::catalog::{IncidentContext, IncidentDef};
use crate::constants::{
    CHOKING_CRITICAL_ROLL, CHOKING_CRITICAL_SEVERITY, CHOKING_SEVERITY_RANGE,
    LOG_EATING_CHOKING, LOG_EATING_CHOKING_CRITICAL_BODY, LOG_EATING_CHOKING_CRITICAL_TITLE,
};
use crate::effects::{EffectExecutor, InjuryKind, NotificationKind, RegionKind};
use crate::numbers::{clamp01, lerp};
use crate::risk::{self, RiskProfile};
use crate::{AccidentEngine, AccidentError, debug_poll_error};

impl AccidentEngine {
    /// Host callback: `actor` chewed a bite of something edible.
    pub fn on_chew_cycle(&mut self, now: Tick, actor: &ActorState, fx: &mut dyn EffectExecutor) {
        if let Err(error) = self.eating_poll(now, actor, fx) {
            debug_poll_error(IncidentContext::Eating, &error);
        }
    }

    fn eating_poll(
        &mut self,
        now: Tick,
        actor: &ActorState,
        fx: &mut dyn EffectExecutor,
    ) -> Result<(), AccidentError> {
        let Some(map) = actor.eligible() else {
            return Ok(());
        };

        if let Some(def) = self.try_fire_queued(now, actor, IncidentContext::Eating, fx) {
            self.execute_choking(actor, &def, fx);
            return Ok(());
        }

        let profile = RiskProfile::eating();
        let environment = self.environment_mult(map, 1.0);
        let inputs = self.risk_inputs(IncidentContext::Eating, environment);
        let assessment = {
            let mut rng = self.rng.eating();
            risk::assess(&profile, actor, &inputs, &mut *rng)
        };

        let immediate = assessment.trigger_probability * self.config.immediate_roll_ratio;
        let fired = {
            let mut rng = self.rng.eating();
            risk::roll_chance(&mut *rng, immediate)
        };
        if fired {
            let def = self.lookup("eating_choking")?;
            self.execute_choking(actor, &def, fx);
        }
        Ok(())
    }

    fn execute_choking(
        &mut self,
        actor: &ActorState,
        _def: &IncidentDef,
        fx: &mut dyn EffectExecutor,
    ) {
        let roll = {
            let mut rng = self.rng.eating();
            rng.r#gen::<f32>()
        };

        if roll >= CHOKING_CRITICAL_ROLL {
            let severity = {
                let mut rng = self.rng.eating();
                rng.gen_range(CHOKING_CRITICAL_SEVERITY.0..CHOKING_CRITICAL_SEVERITY.1)
            };
            fx.apply_injury(
                actor.id,
                RegionKind::Any,
                InjuryKind::ChokingCritical,
                clamp01(severity),
            );
            // Hard stop eating; the player must intervene.
            fx.interrupt_activity(actor.id, true);
            fx.post_alert(
                LOG_EATING_CHOKING_CRITICAL_TITLE,
                LOG_EATING_CHOKING_CRITICAL_BODY,
                actor.id,
            );
            return;
        }

        let severity = clamp01(
            lerp(CHOKING_SEVERITY_RANGE.0, CHOKING_SEVERITY_RANGE.1, roll)
                * self.severity_scale(IncidentContext::Eating),
        );
        fx.apply_injury(actor.id, RegionKind::Any, InjuryKind::Choking, severity);
        fx.interrupt_activity(actor.id, false);
        fx.post_notification(LOG_EATING_CHOKING, NotificationKind::Negative);
    }
}

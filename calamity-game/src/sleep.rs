//! Sleep monitor: night terrors fed by recent grief, pain, and temperament.

use crate::actor::{ActorState, Tick};
use crate::catalog::IncidentContext;
use crate::constants::LOG_SLEEP_NIGHTMARE;
use crate::effects::{EffectExecutor, NotificationKind};
use crate::risk::{self, RiskProfile, night_terror_multiplier};
use crate::{AccidentEngine, AccidentError};

impl AccidentEngine {
    pub(crate) fn sleep_poll(
        &mut self,
        now: Tick,
        actor: &ActorState,
        fx: &mut dyn EffectExecutor,
    ) -> Result<(), AccidentError> {
        let Some(map) = actor.eligible() else {
            return Ok(());
        };
        if !actor.asleep {
            return Ok(());
        }

        if self
            .try_fire_queued(now, actor, IncidentContext::Sleep, fx)
            .is_some()
        {
            self.execute_nightmare(actor, fx);
            return Ok(());
        }

        let profile = RiskProfile::sleep();
        let environment = self.environment_mult(map, night_terror_multiplier(actor));
        let inputs = self.risk_inputs(IncidentContext::Sleep, environment);
        let assessment = {
            let mut rng = self.rng.sleep();
            risk::assess(&profile, actor, &inputs, &mut *rng)
        };

        let immediate = assessment.trigger_probability * self.config.immediate_roll_ratio;
        let fired = {
            let mut rng = self.rng.sleep();
            risk::roll_chance(&mut *rng, immediate)
        };
        if fired {
            self.execute_nightmare(actor, fx);
        }
        Ok(())
    }

    fn execute_nightmare(&mut self, actor: &ActorState, fx: &mut dyn EffectExecutor) {
        // Force-wake, then the terror takes over.
        fx.interrupt_activity(actor.id, true);
        fx.start_panic_state(actor.id);
        fx.post_notification(LOG_SLEEP_NIGHTMARE, NotificationKind::Negative);
    }
}

//! Work monitor: field-work injuries that sometimes catch a nearby
//! co-worker instead of the actor who slipped.

use rand::Rng;

use crate::actor::{ActivityKind, ActorId, ActorState, Tick};
use crate::catalog::IncidentContext;
use crate::constants::{
    LOG_WORK_ACCIDENT, STAGGER_TICKS, WORK_CUT_VS_BRUISE_CHANCE, WORK_INJURY_SEVERITY_MAX,
    WORK_INJURY_SEVERITY_MAX_SEVERE, WORK_INJURY_SEVERITY_MIN, WORK_NEARBY_VICTIM_CHANCE,
    WORK_TIER_MISSING_PART, WORK_TIER_SEVERE,
};
use crate::effects::{EffectExecutor, InjuryKind, NotificationKind, RegionKind};
use crate::numbers::clamp01;
use crate::risk::{self, RiskProfile};
use crate::{AccidentEngine, AccidentError, debug_poll_error};

impl AccidentEngine {
    /// Host callback: a job tick elapsed for `actor`. Dispatches to the
    /// work or sleep family based on the current activity.
    /// `nearby_workers` are colonists working within accident range.
    pub fn on_job_tick(
        &mut self,
        now: Tick,
        actor: &ActorState,
        nearby_workers: &[ActorId],
        fx: &mut dyn EffectExecutor,
    ) {
        match actor.job.map(|job| job.activity) {
            Some(ActivityKind::FieldWork) => {
                if let Err(error) = self.work_poll(now, actor, nearby_workers, fx) {
                    debug_poll_error(IncidentContext::Work, &error);
                }
            }
            Some(ActivityKind::LayDown) => {
                if let Err(error) = self.sleep_poll(now, actor, fx) {
                    debug_poll_error(IncidentContext::Sleep, &error);
                }
            }
            _ => {}
        }
    }

    fn work_poll(
        &mut self,
        now: Tick,
        actor: &ActorState,
        nearby_workers: &[ActorId],
        fx: &mut dyn EffectExecutor,
    ) -> Result<(), AccidentError> {
        let Some(map) = actor.eligible() else {
            return Ok(());
        };

        if self
            .try_fire_queued(now, actor, IncidentContext::Work, fx)
            .is_some()
        {
            self.execute_work_accident(actor, nearby_workers, fx);
            return Ok(());
        }

        let profile = RiskProfile::work();
        let environment = self.environment_mult(map, 1.0);
        let inputs = self.risk_inputs(IncidentContext::Work, environment);
        let assessment = {
            let mut rng = self.rng.work();
            risk::assess(&profile, actor, &inputs, &mut *rng)
        };

        let immediate = assessment.trigger_probability * self.config.immediate_roll_ratio;
        let fired = {
            let mut rng = self.rng.work();
            risk::roll_chance(&mut *rng, immediate)
        };
        if fired {
            self.execute_work_accident(actor, nearby_workers, fx);
        }
        Ok(())
    }

    fn execute_work_accident(
        &mut self,
        actor: &ActorState,
        nearby_workers: &[ActorId],
        fx: &mut dyn EffectExecutor,
    ) {
        // A swung tool usually catches whoever is standing closest.
        let victim = {
            let mut rng = self.rng.work();
            if !nearby_workers.is_empty()
                && risk::roll_chance(&mut *rng, WORK_NEARBY_VICTIM_CHANCE)
            {
                nearby_workers[rng.gen_range(0..nearby_workers.len())]
            } else {
                actor.id
            }
        };

        let severity_roll = {
            let mut rng = self.rng.work();
            rng.r#gen::<f32>()
        };
        if severity_roll >= WORK_TIER_MISSING_PART {
            let region = {
                let mut rng = self.rng.work();
                match rng.gen_range(0..3) {
                    0 => RegionKind::Finger,
                    1 => RegionKind::Hand,
                    _ => RegionKind::Arm,
                }
            };
            fx.apply_missing_part(victim, region);
        } else {
            let (injury, severity) = {
                let mut rng = self.rng.work();
                let cut = risk::roll_chance(&mut *rng, WORK_CUT_VS_BRUISE_CHANCE);
                let max = if severity_roll >= WORK_TIER_SEVERE {
                    WORK_INJURY_SEVERITY_MAX_SEVERE
                } else {
                    WORK_INJURY_SEVERITY_MAX
                };
                let severity = rng.gen_range(WORK_INJURY_SEVERITY_MIN..max);
                (
                    if cut { InjuryKind::Cut } else { InjuryKind::Bruise },
                    severity,
                )
            };
            let severity = clamp01(severity * self.severity_scale(IncidentContext::Work));
            fx.apply_injury(victim, RegionKind::Any, injury, severity);
        }

        // Both parties drop what they were doing.
        let stagger = {
            let mut rng = self.rng.work();
            rng.gen_range(STAGGER_TICKS.0..=STAGGER_TICKS.1)
        };
        fx.interrupt_activity(actor.id, true);
        fx.stagger(actor.id, stagger);
        if victim != actor.id {
            fx.interrupt_activity(victim, true);
            fx.stagger(victim, stagger);
        }
        fx.post_notification(LOG_WORK_ACCIDENT, NotificationKind::Negative);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::IncidentId;
    use crate::config::AccidentConfig;
    use crate::testutil::{RecordingExecutor, colonist_doing};
    use crate::TargetRef;

    #[test]
    fn certain_work_accident_injures_someone() {
        let mut config = AccidentConfig::default();
        config.work.base_chance = 1.0;
        config.immediate_roll_ratio = 1.0;
        let mut engine = AccidentEngine::new(0x30B, config).unwrap();
        let mut fx = RecordingExecutor::default();

        let miner = colonist_doing(1, ActivityKind::FieldWork, 5);
        engine.on_job_tick(100, &miner, &[], &mut fx);

        assert_eq!(fx.injuries.len() + fx.missing_parts.len(), 1);
        assert!(!fx.interrupts.is_empty());
        assert_eq!(fx.notifications.len(), 1);
    }

    #[test]
    fn lone_worker_always_injures_self() {
        let mut config = AccidentConfig::default();
        config.work.base_chance = 1.0;
        config.immediate_roll_ratio = 1.0;
        let mut engine = AccidentEngine::new(0x31B, config).unwrap();
        let mut fx = RecordingExecutor::default();

        let miner = colonist_doing(9, ActivityKind::FieldWork, 5);
        for tick in 0..16 {
            engine.on_job_tick(tick, &miner, &[], &mut fx);
        }
        for (victim, _, _, _) in &fx.injuries {
            assert_eq!(*victim, miner.id);
        }
        for (victim, _) in &fx.missing_parts {
            assert_eq!(*victim, miner.id);
        }
    }

    #[test]
    fn nearby_workers_can_catch_the_injury() {
        let mut config = AccidentConfig::default();
        config.work.base_chance = 1.0;
        config.immediate_roll_ratio = 1.0;
        let mut engine = AccidentEngine::new(0x32B, config).unwrap();
        let mut fx = RecordingExecutor::default();

        let miner = colonist_doing(1, ActivityKind::FieldWork, 5);
        let buddies = [ActorId(2), ActorId(3)];
        for tick in 0..64 {
            engine.on_job_tick(tick, &miner, &buddies, &mut fx);
        }
        let hit_a_buddy = fx
            .injuries
            .iter()
            .map(|(victim, _, _, _)| *victim)
            .chain(fx.missing_parts.iter().map(|(victim, _)| *victim))
            .any(|victim| buddies.contains(&victim));
        assert!(hit_a_buddy, "70% nearby-victim split never hit a buddy");
    }

    #[test]
    fn queued_work_accident_respects_dwell() {
        let mut config = AccidentConfig::default();
        config.work.base_chance = 0.0;
        let mut engine = AccidentEngine::new(0x33B, config).unwrap();
        let mut fx = RecordingExecutor::default();
        engine.on_storyteller_incident(0, IncidentId::new("work_accident"), TargetRef(1), &mut fx);

        let miner = colonist_doing(1, ActivityKind::FieldWork, 5);
        engine.on_job_tick(10, &miner, &[], &mut fx);
        assert_eq!(fx.injuries.len() + fx.missing_parts.len(), 0);

        engine.on_job_tick(400, &miner, &[], &mut fx);
        assert_eq!(fx.injuries.len() + fx.missing_parts.len(), 1);
    }

    #[test]
    fn idle_actor_dispatches_nowhere() {
        let mut config = AccidentConfig::default();
        config.work.base_chance = 1.0;
        config.sleep.base_chance = 1.0;
        config.immediate_roll_ratio = 1.0;
        let mut engine = AccidentEngine::new(0x34B, config).unwrap();
        let mut fx = RecordingExecutor::default();

        let mut idle = colonist_doing(1, ActivityKind::FieldWork, 5);
        idle.job = None;
        engine.on_job_tick(100, &idle, &[], &mut fx);
        assert_eq!(fx.mutation_count(), 0);
    }
}

//! Movement monitor: tripping over obstacles, sprained ankles, and dropped
//! cargo scattered across the floor.

use rand::Rng;

use crate::actor::{ActorState, CellSnapshot, TargetRef, Tick};
use crate::catalog::IncidentContext;
use crate::constants::{
    LOG_MOVEMENT_SPILL, LOG_MOVEMENT_SPRAIN, SPILL_PILES, SPRAIN_SEVERITY_CLAMP,
    SPRAIN_SEVERITY_RANGE, STAGGER_TICKS,
};
use crate::effects::{EffectExecutor, InjuryKind, NotificationKind, RegionKind};
use crate::numbers::{lerp, round_f32_to_u8, skill_fraction};
use crate::risk::{self, RiskProfile, age_multiplier, climb_multiplier, moving_multiplier};
use crate::{AccidentEngine, AccidentError, debug_poll_error};

impl AccidentEngine {
    /// Host callback: `actor` is about to enter `cell`.
    pub fn on_entering_cell(
        &mut self,
        now: Tick,
        actor: &ActorState,
        cell: CellSnapshot,
        fx: &mut dyn EffectExecutor,
    ) {
        if let Err(error) = self.movement_poll(now, actor, cell, fx) {
            debug_poll_error(IncidentContext::Movement, &error);
        }
    }

    fn movement_poll(
        &mut self,
        now: Tick,
        actor: &ActorState,
        cell: CellSnapshot,
        fx: &mut dyn EffectExecutor,
    ) -> Result<(), AccidentError> {
        let Some(map) = actor.eligible() else {
            return Ok(());
        };
        if !cell.has_climbable_obstacle() {
            return Ok(());
        }

        if self
            .try_fire_queued(now, actor, IncidentContext::Movement, fx)
            .is_some()
        {
            self.execute_trip(actor, map, cell, fx);
            return Ok(());
        }

        let profile = RiskProfile::movement();
        let family_mult = climb_multiplier(cell.climb_cost)
            * moving_multiplier(actor.capacities.moving)
            * age_multiplier(actor.age_years);
        let environment = self.environment_mult(map, family_mult);
        let inputs = self.risk_inputs(IncidentContext::Movement, environment);
        let assessment = {
            let mut rng = self.rng.movement();
            risk::assess(&profile, actor, &inputs, &mut *rng)
        };

        let immediate = assessment.trigger_probability * self.config.immediate_roll_ratio;
        let fired = {
            let mut rng = self.rng.movement();
            risk::roll_chance(&mut *rng, immediate)
        };
        if fired {
            self.execute_trip(actor, map, cell, fx);
        }
        Ok(())
    }

    fn execute_trip(
        &mut self,
        actor: &ActorState,
        map: TargetRef,
        cell: CellSnapshot,
        fx: &mut dyn EffectExecutor,
    ) {
        let severity = self.sprain_severity(actor, cell);

        if let Some(carried) = actor.carried {
            let piles = {
                let desired = round_f32_to_u8(lerp(
                    f32::from(SPILL_PILES.0),
                    f32::from(SPILL_PILES.1),
                    severity,
                ));
                desired.clamp(SPILL_PILES.0, SPILL_PILES.1)
            };
            fx.drop_carried(actor.id, cell.cell, piles);
            // A dropped chemfuel canister can go off where it lands.
            if carried.explosive {
                let boom = {
                    let mut rng = self.rng.movement();
                    risk::roll_chance(&mut *rng, lerp(0.02, 0.25, severity))
                };
                if boom {
                    fx.spawn_explosion(map, cell.cell, 1.5, 10);
                }
            }
            fx.post_notification(LOG_MOVEMENT_SPILL, NotificationKind::Negative);
            // Interrupt so the actor does not immediately re-grab the pile.
            fx.interrupt_activity(actor.id, true);
        }

        let stagger = {
            let mut rng = self.rng.movement();
            rng.gen_range(STAGGER_TICKS.0..=STAGGER_TICKS.1)
        };
        fx.stagger(actor.id, stagger);

        fx.apply_injury(actor.id, RegionKind::Ankle, InjuryKind::Sprain, severity);
        fx.post_notification(LOG_MOVEMENT_SPRAIN, NotificationKind::Negative);
    }

    /// Sprain severity shaped by terrain, the actor's moving capacity,
    /// physical prowess, and age.
    fn sprain_severity(&self, actor: &ActorState, cell: CellSnapshot) -> f32 {
        let base = {
            let mut rng = self.rng.movement();
            rng.gen_range(SPRAIN_SEVERITY_RANGE.0..SPRAIN_SEVERITY_RANGE.1)
        };
        let terrain = climb_multiplier(cell.climb_cost);
        let mut severity = base * (1.0 + terrain * 0.1);

        let moving = actor.capacities.moving;
        severity *= if moving >= 1.0 {
            lerp(1.0, 0.9, (moving - 1.0).clamp(0.0, 1.0))
        } else {
            lerp(1.3, 1.0, moving.clamp(0.0, 1.0))
        };

        let prowess = lerp(1.1, 0.85, skill_fraction(actor.skills.melee.level));
        severity *= prowess;

        if actor.age_years > 50.0 {
            severity *= 1.0 + (actor.age_years - 50.0) * 0.01;
        }

        severity *= self.severity_scale(IncidentContext::Movement);
        severity.clamp(SPRAIN_SEVERITY_CLAMP.0, SPRAIN_SEVERITY_CLAMP.1)
    }
}

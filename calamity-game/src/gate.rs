//! Job-progress gating: a queued incident only fires once its actor has
//! been continuously engaged in the qualifying activity for a minimum dwell.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::actor::{ActivityKind, ActorId, ActorState, JobRef, Tick};
use crate::catalog::IncidentContext;

/// Tracked progress for one actor. Only one activity is tracked at a time;
/// switching activities (or job instances) resets the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorProgress {
    pub activity: ActivityKind,
    pub job: JobRef,
    pub started_at: Tick,
}

/// Per-actor dwell tracking. Entries are created lazily on first
/// observation and never removed; the map is bounded by colony size.
#[derive(Debug, Clone, Default)]
pub struct ProgressGate {
    progress: HashMap<ActorId, ActorProgress>,
}

impl ProgressGate {
    /// Whether the actor has dwelt in `context`'s qualifying activity long
    /// enough for a queued incident to fire.
    ///
    /// Contexts with no qualifying activity set (movement) are always
    /// admitted. A mismatched or absent job denies admission without
    /// touching tracked state, so brief interruptions observed through
    /// other contexts do not clear progress.
    pub fn admit(
        &mut self,
        actor: &ActorState,
        context: IncidentContext,
        now: Tick,
        required_dwell: Tick,
    ) -> bool {
        let qualifying = context.qualifying_activities();
        if qualifying.is_empty() {
            return true;
        }

        let Some(job) = actor.job else {
            return false;
        };
        if !qualifying.contains(&job.activity) {
            return false;
        }

        match self.progress.entry(actor.id) {
            Entry::Vacant(slot) => {
                slot.insert(ActorProgress {
                    activity: job.activity,
                    job: job.job,
                    started_at: now,
                });
                false
            }
            Entry::Occupied(mut slot) => {
                let tracked = slot.get_mut();
                // A new job instance resets even when the kind is unchanged.
                if tracked.job != job.job || tracked.activity != job.activity {
                    tracked.activity = job.activity;
                    tracked.job = job.job;
                    tracked.started_at = now;
                    return false;
                }
                now - tracked.started_at >= required_dwell
            }
        }
    }

    /// Reset the actor's dwell clock after a queued incident fires, so a
    /// second incident of the same context must wait out the dwell again.
    pub fn rearm(&mut self, actor: &ActorState, now: Tick) {
        if let Some(tracked) = self.progress.get_mut(&actor.id) {
            tracked.started_at = now;
            if let Some(job) = actor.job {
                tracked.activity = job.activity;
                tracked.job = job.job;
            }
        }
    }

    #[must_use]
    pub fn tracked(&self, actor: ActorId) -> Option<&ActorProgress> {
        self.progress.get(&actor)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.progress.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.progress.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::colonist_doing;

    const DWELL: Tick = 300;

    #[test]
    fn first_observation_starts_tracking_and_denies() {
        let mut gate = ProgressGate::default();
        let actor = colonist_doing(1, ActivityKind::BillWork, 100);
        assert!(!gate.admit(&actor, IncidentContext::Cooking, 1_000, DWELL));
        assert_eq!(gate.tracked(actor.id).unwrap().started_at, 1_000);
    }

    #[test]
    fn admission_requires_full_dwell() {
        let mut gate = ProgressGate::default();
        let actor = colonist_doing(1, ActivityKind::BillWork, 100);
        assert!(!gate.admit(&actor, IncidentContext::Cooking, 1_000, DWELL));
        assert!(!gate.admit(&actor, IncidentContext::Cooking, 1_299, DWELL));
        assert!(gate.admit(&actor, IncidentContext::Cooking, 1_300, DWELL));
    }

    #[test]
    fn job_instance_change_resets_progress() {
        let mut gate = ProgressGate::default();
        let first = colonist_doing(1, ActivityKind::BillWork, 100);
        assert!(!gate.admit(&first, IncidentContext::Cooking, 1_000, DWELL));

        // Same activity kind, different job instance.
        let second = colonist_doing(1, ActivityKind::BillWork, 101);
        assert!(!gate.admit(&second, IncidentContext::Cooking, 1_500, DWELL));
        assert_eq!(gate.tracked(second.id).unwrap().started_at, 1_500);

        assert!(!gate.admit(&second, IncidentContext::Cooking, 1_799, DWELL));
        assert!(gate.admit(&second, IncidentContext::Cooking, 1_800, DWELL));
    }

    #[test]
    fn activity_kind_change_resets_progress() {
        let mut gate = ProgressGate::default();
        let cooking = colonist_doing(1, ActivityKind::BillWork, 100);
        assert!(!gate.admit(&cooking, IncidentContext::Cooking, 1_000, DWELL));
        assert!(gate.admit(&cooking, IncidentContext::Cooking, 1_400, DWELL));

        let eating = colonist_doing(1, ActivityKind::Ingest, 200);
        assert!(!gate.admit(&eating, IncidentContext::Eating, 1_401, DWELL));
        assert_eq!(gate.tracked(eating.id).unwrap().started_at, 1_401);
    }

    #[test]
    fn mismatched_activity_denies_without_mutating() {
        let mut gate = ProgressGate::default();
        let cooking = colonist_doing(1, ActivityKind::BillWork, 100);
        assert!(!gate.admit(&cooking, IncidentContext::Cooking, 1_000, DWELL));

        // Eating context while the actor is still on the cooking job: denied,
        // and the cooking progress clock keeps running.
        assert!(!gate.admit(&cooking, IncidentContext::Eating, 1_200, DWELL));
        assert_eq!(gate.tracked(cooking.id).unwrap().started_at, 1_000);
        assert!(gate.admit(&cooking, IncidentContext::Cooking, 1_300, DWELL));
    }

    #[test]
    fn idle_actor_is_denied() {
        let mut gate = ProgressGate::default();
        let mut idle = colonist_doing(1, ActivityKind::BillWork, 100);
        idle.job = None;
        assert!(!gate.admit(&idle, IncidentContext::Cooking, 1_000, DWELL));
        assert!(gate.tracked(idle.id).is_none());
    }

    #[test]
    fn movement_context_is_always_admitted() {
        let mut gate = ProgressGate::default();
        let mut wanderer = colonist_doing(1, ActivityKind::Travel, 50);
        wanderer.job = None;
        assert!(gate.admit(&wanderer, IncidentContext::Movement, 1_000, 0));
    }

    #[test]
    fn rearm_requires_dwell_again() {
        let mut gate = ProgressGate::default();
        let actor = colonist_doing(1, ActivityKind::BillWork, 100);
        assert!(!gate.admit(&actor, IncidentContext::Cooking, 1_000, DWELL));
        assert!(gate.admit(&actor, IncidentContext::Cooking, 1_400, DWELL));

        gate.rearm(&actor, 1_400);
        assert!(!gate.admit(&actor, IncidentContext::Cooking, 1_500, DWELL));
        assert!(gate.admit(&actor, IncidentContext::Cooking, 1_700, DWELL));
    }

    #[test]
    fn animal_contexts_accept_any_handling_activity() {
        let mut gate = ProgressGate::default();
        let milking = colonist_doing(1, ActivityKind::Milk, 10);
        assert!(!gate.admit(&milking, IncidentContext::AnimalHandling, 0, DWELL));
        assert!(gate.admit(&milking, IncidentContext::AnimalHandling, DWELL, DWELL));

        // Switching to shearing is a different activity kind: reset.
        let shearing = colonist_doing(1, ActivityKind::Shear, 11);
        assert!(!gate.admit(&shearing, IncidentContext::AnimalHandling, DWELL + 1, DWELL));
    }
}

//! The foreshadow queue: incidents enqueued now for probabilistic future
//! execution, with TTL expiry and context-filtered FIFO service.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::actor::{TargetRef, Tick};
use crate::catalog::{IncidentCatalog, IncidentContext, IncidentId};
use crate::constants::{FORESHADOW_KEYS, RESOLUTION_KEYS};

/// One pending incident. Tick values are absolute world ticks so the queue
/// survives save/load without rebasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedIncident {
    pub incident_id: IncidentId,
    pub target: TargetRef,
    pub enqueued_at: Tick,
    pub expires_at: Tick,
}

impl QueuedIncident {
    #[must_use]
    pub const fn is_expired(&self, now: Tick) -> bool {
        now > self.expires_at
    }
}

/// Ordered queue of pending incidents. Insertion order is service order
/// within a context; other contexts' entries are skipped, not disturbed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ForeshadowQueue {
    entries: Vec<QueuedIncident>,
}

impl ForeshadowQueue {
    /// Append a pending incident expiring `ttl` ticks from `now`.
    pub fn enqueue(&mut self, incident_id: IncidentId, target: TargetRef, now: Tick, ttl: Tick) {
        self.entries.push(QueuedIncident {
            incident_id,
            target,
            enqueued_at: now,
            expires_at: now + ttl.max(1),
        });
    }

    /// Drop expired entries and entries whose id the catalog no longer
    /// recognizes (stale save data). Safe to call every tick.
    ///
    /// Returns the number of entries that expired. Stale ids are dropped
    /// silently and do not count; they never deserve an "omen passed" hint.
    pub fn sweep_expired(&mut self, now: Tick, catalog: &IncidentCatalog) -> usize {
        self.entries
            .retain(|entry| catalog.contains(&entry.incident_id));
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.is_expired(now));
        before - self.entries.len()
    }

    /// Index of the earliest entry allowed in `context`, if any. Callers
    /// sweep first; the entry stays queued until admission succeeds.
    #[must_use]
    pub fn peek_for_context(
        &self,
        context: IncidentContext,
        catalog: &IncidentCatalog,
    ) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| catalog.allowed_in(&entry.incident_id, context))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&QueuedIncident> {
        self.entries.get(index)
    }

    /// Remove a specific entry once it has been admitted and executed.
    pub fn remove(&mut self, index: usize) -> QueuedIncident {
        self.entries.remove(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[QueuedIncident] {
        &self.entries
    }
}

/// Pick a foreshadowing hint key at random. Content is cosmetic.
#[must_use]
pub fn foreshadow_key<R>(rng: &mut R) -> &'static str
where
    R: Rng + ?Sized,
{
    FORESHADOW_KEYS[rng.gen_range(0..FORESHADOW_KEYS.len())]
}

/// Pick a resolution hint key at random.
#[must_use]
pub fn resolution_key<R>(rng: &mut R) -> &'static str
where
    R: Rng + ?Sized,
{
    RESOLUTION_KEYS[rng.gen_range(0..RESOLUTION_KEYS.len())]
}

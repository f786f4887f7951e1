//! Delayed explosions: a kitchen mishap lights a fuse, the detonation lands
//! a few hundred ticks later through the executor.

use serde::{Deserialize, Serialize};

use crate::actor::{CellRef, TargetRef, Tick};
use crate::effects::EffectExecutor;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingExplosion {
    pub map: TargetRef,
    pub cell: CellRef,
    pub radius: f32,
    pub damage: u16,
    pub due_at: Tick,
}

/// Pending explosions ordered by insertion; swept each engine tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct DelayedExplosions {
    pending: Vec<PendingExplosion>,
}

impl DelayedExplosions {
    pub fn schedule(
        &mut self,
        map: TargetRef,
        cell: CellRef,
        radius: f32,
        damage: u16,
        due_at: Tick,
    ) {
        self.pending.push(PendingExplosion {
            map,
            cell,
            radius,
            damage,
            due_at,
        });
    }

    /// Fire every due explosion through the executor. Returns how many fired.
    pub fn tick(&mut self, now: Tick, fx: &mut dyn EffectExecutor) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        let mut fired = 0;
        let mut index = 0;
        while index < self.pending.len() {
            if now >= self.pending[index].due_at {
                let explosion = self.pending.remove(index);
                fx.spawn_explosion(
                    explosion.map,
                    explosion.cell,
                    explosion.radius,
                    explosion.damage,
                );
                fired += 1;
            } else {
                index += 1;
            }
        }
        fired
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::RecordingExecutor;

    const MAP: TargetRef = TargetRef(1);
    const CELL: CellRef = CellRef { x: 4, z: 9 };

    #[test]
    fn fires_only_once_due() {
        let mut pending = DelayedExplosions::default();
        let mut fx = RecordingExecutor::default();
        pending.schedule(MAP, CELL, 2.0, 15, 500);

        assert_eq!(pending.tick(499, &mut fx), 0);
        assert!(fx.explosions.is_empty());

        assert_eq!(pending.tick(500, &mut fx), 1);
        assert_eq!(fx.explosions.len(), 1);
        assert!(pending.is_empty());

        // Nothing left to fire.
        assert_eq!(pending.tick(10_000, &mut fx), 0);
    }

    #[test]
    fn multiple_due_explosions_fire_in_one_sweep() {
        let mut pending = DelayedExplosions::default();
        let mut fx = RecordingExecutor::default();
        pending.schedule(MAP, CELL, 2.0, 15, 100);
        pending.schedule(MAP, CellRef { x: 1, z: 1 }, 1.5, 10, 200);
        pending.schedule(MAP, CELL, 2.5, 20, 900);

        assert_eq!(pending.tick(250, &mut fx), 2);
        assert_eq!(pending.len(), 1);
        assert_eq!(fx.explosions.len(), 2);
    }

    #[test]
    fn pending_roundtrips_json() {
        let mut pending = DelayedExplosions::default();
        pending.schedule(MAP, CELL, 2.0, 15, 500);
        let json = serde_json::to_string(&pending).unwrap();
        let back: DelayedExplosions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pending);
    }
}

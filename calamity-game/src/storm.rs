//! Accident storms: a global condition that multiplies every family's
//! trigger chance and seeds the foreshadow queue on an hourly cadence.

use serde::{Deserialize, Serialize};

use crate::actor::{TargetRef, Tick};
use crate::config::AccidentConfig;
use crate::constants::TICKS_PER_HOUR;

/// Which maps are under an accident storm, and when each last received its
/// hourly queued incident. Vec-backed so the save layout stays a plain list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StormState {
    active: Vec<TargetRef>,
    last_queued_hour: Vec<(TargetRef, i64)>,
}

impl StormState {
    #[must_use]
    pub fn is_active(&self, map: TargetRef) -> bool {
        self.active.contains(&map)
    }

    /// Chance multiplier applied to every family while a storm covers `map`.
    #[must_use]
    pub fn chance_multiplier(&self, map: TargetRef, config: &AccidentConfig) -> f32 {
        if self.is_active(map) {
            config.storm_chance_mult
        } else {
            1.0
        }
    }

    /// Begin a storm over `map`. Returns false when one is already active.
    pub fn begin(&mut self, map: TargetRef) -> bool {
        if self.is_active(map) {
            return false;
        }
        self.active.push(map);
        true
    }

    /// End the storm over `map`. Returns false when none was active.
    pub fn end(&mut self, map: TargetRef) -> bool {
        let before = self.active.len();
        self.active.retain(|candidate| *candidate != map);
        self.last_queued_hour.retain(|(candidate, _)| *candidate != map);
        before != self.active.len()
    }

    /// Whether the hourly enqueue is due for `map` at `now`. Marks the hour
    /// consumed when it is, so each hour fires at most once per map.
    pub fn hourly_due(&mut self, map: TargetRef, now: Tick) -> bool {
        if !self.is_active(map) {
            return false;
        }
        let current_hour = now.div_euclid(TICKS_PER_HOUR);
        if let Some(index) = self
            .last_queued_hour
            .iter()
            .position(|(candidate, _)| *candidate == map)
        {
            let last_hour = &mut self.last_queued_hour[index].1;
            if current_hour > *last_hour {
                *last_hour = current_hour;
                true
            } else {
                false
            }
        } else {
            self.last_queued_hour.push((map, current_hour));
            true
        }
    }

    #[must_use]
    pub fn active_maps(&self) -> &[TargetRef] {
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: TargetRef = TargetRef(3);

    #[test]
    fn multiplier_tracks_active_state() {
        let config = AccidentConfig::default();
        let mut storm = StormState::default();
        assert!((storm.chance_multiplier(MAP, &config) - 1.0).abs() < f32::EPSILON);

        assert!(storm.begin(MAP));
        assert!(!storm.begin(MAP), "double begin is a no-op");
        assert!(
            (storm.chance_multiplier(MAP, &config) - config.storm_chance_mult).abs()
                < f32::EPSILON
        );

        assert!(storm.end(MAP));
        assert!(!storm.end(MAP));
        assert!((storm.chance_multiplier(MAP, &config) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn hourly_due_fires_once_per_hour_per_map() {
        let mut storm = StormState::default();
        storm.begin(MAP);

        assert!(storm.hourly_due(MAP, 0));
        assert!(!storm.hourly_due(MAP, 100));
        assert!(!storm.hourly_due(MAP, TICKS_PER_HOUR - 1));
        assert!(storm.hourly_due(MAP, TICKS_PER_HOUR));
        assert!(!storm.hourly_due(MAP, TICKS_PER_HOUR + 1));

        let other = TargetRef(9);
        assert!(!storm.hourly_due(other, 0), "inactive maps never fire");
        storm.begin(other);
        assert!(storm.hourly_due(other, TICKS_PER_HOUR + 2));
    }

    #[test]
    fn ending_a_storm_clears_its_hour_tracking() {
        let mut storm = StormState::default();
        storm.begin(MAP);
        assert!(storm.hourly_due(MAP, 0));
        storm.end(MAP);
        storm.begin(MAP);
        // Fresh storm fires again within the same hour.
        assert!(storm.hourly_due(MAP, 10));
    }

    #[test]
    fn storm_state_roundtrips_json() {
        let mut storm = StormState::default();
        storm.begin(MAP);
        storm.hourly_due(MAP, 5_000);
        let json = serde_json::to_string(&storm).unwrap();
        let back: StormState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, storm);
    }
}

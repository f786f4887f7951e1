//! Incident registry: which incidents exist, which activity context each one
//! belongs to, and the shape of the effect it produces when executed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::actor::{ActivityKind, Tick};
use crate::constants::{
    BURN_SEVERITY_MAX_UNSKILLED, BURN_SEVERITY_MIN, EXPLOSION_DAMAGE, EXPLOSION_FUSE_TICKS,
    EXPLOSION_RADIUS, FIRE_LARGE_EXTRA_SPOTS, FIRE_LARGE_SIZE, FIRE_SMALL_SIZE,
    MILK_KICK_SEVERITY, TRAIN_BITE_SEVERITY,
};
use crate::effects::{InjuryKind, RegionKind};

/// Identifier of an incident definition. Stored in saves, so stale ids from
/// older versions must be tolerated (dropped silently at sweep).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncidentId(pub String);

impl IncidentId {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Activity context an incident is restricted to fire within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentContext {
    Cooking,
    Butchering,
    Eating,
    Movement,
    Work,
    Sleep,
    AnimalHandling,
}

impl IncidentContext {
    pub const ALL: [Self; 7] = [
        Self::Cooking,
        Self::Butchering,
        Self::Eating,
        Self::Movement,
        Self::Work,
        Self::Sleep,
        Self::AnimalHandling,
    ];

    /// Activities that qualify as "engaged in this context" for progress
    /// gating. Empty means the context is not gated on a job (movement).
    #[must_use]
    pub const fn qualifying_activities(self) -> &'static [ActivityKind] {
        match self {
            Self::Cooking | Self::Butchering => &[ActivityKind::BillWork],
            Self::Eating => &[ActivityKind::Ingest],
            Self::Movement => &[],
            Self::Work => &[ActivityKind::FieldWork],
            Self::Sleep => &[ActivityKind::LayDown],
            Self::AnimalHandling => &[ActivityKind::Milk, ActivityKind::Shear, ActivityKind::Train],
        }
    }
}

/// Parameter shape of the effect an incident produces. Interpretation is
/// done by the family monitors; world mutation happens in the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectSpec {
    Fire {
        min_size: f32,
        max_size: f32,
        /// Additional fire spots beyond the primary cell.
        extra_spots: (u8, u8),
    },
    Explosion {
        min_radius: f32,
        max_radius: f32,
        min_damage: u16,
        max_damage: u16,
        /// Ticks between the mishap and detonation.
        fuse_ticks: (Tick, Tick),
    },
    Injury {
        injury: InjuryKind,
        region: RegionKind,
        min_severity: f32,
        max_severity: f32,
    },
    MissingPart {
        region: RegionKind,
    },
    Choking,
    Nightmare,
    WorkMishap,
    TripSpill,
    ShearingCut,
}

/// A single incident definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentDef {
    pub id: IncidentId,
    pub context: IncidentContext,
    pub effect: EffectSpec,
}

/// Registry of every incident the engine can queue or execute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IncidentCatalog {
    #[serde(default)]
    pub incidents: Vec<IncidentDef>,
}

impl IncidentCatalog {
    /// The default incident set.
    #[must_use]
    pub fn builtin() -> Self {
        let incidents = vec![
            IncidentDef {
                id: IncidentId::new("kitchen_burn"),
                context: IncidentContext::Cooking,
                effect: EffectSpec::Injury {
                    injury: InjuryKind::Burn,
                    region: RegionKind::Hand,
                    min_severity: BURN_SEVERITY_MIN,
                    max_severity: BURN_SEVERITY_MAX_UNSKILLED,
                },
            },
            IncidentDef {
                id: IncidentId::new("kitchen_fire_small"),
                context: IncidentContext::Cooking,
                effect: EffectSpec::Fire {
                    min_size: FIRE_SMALL_SIZE.0,
                    max_size: FIRE_SMALL_SIZE.1,
                    extra_spots: (0, 0),
                },
            },
            IncidentDef {
                id: IncidentId::new("kitchen_fire_large"),
                context: IncidentContext::Cooking,
                effect: EffectSpec::Fire {
                    min_size: FIRE_LARGE_SIZE.0,
                    max_size: FIRE_LARGE_SIZE.1,
                    extra_spots: FIRE_LARGE_EXTRA_SPOTS,
                },
            },
            IncidentDef {
                id: IncidentId::new("kitchen_explosion"),
                context: IncidentContext::Cooking,
                effect: EffectSpec::Explosion {
                    min_radius: EXPLOSION_RADIUS.0,
                    max_radius: EXPLOSION_RADIUS.1,
                    min_damage: EXPLOSION_DAMAGE.0,
                    max_damage: EXPLOSION_DAMAGE.1,
                    fuse_ticks: EXPLOSION_FUSE_TICKS,
                },
            },
            IncidentDef {
                id: IncidentId::new("butchering_cut"),
                context: IncidentContext::Butchering,
                effect: EffectSpec::Injury {
                    injury: InjuryKind::Cut,
                    region: RegionKind::Finger,
                    min_severity: 0.1,
                    max_severity: 0.4,
                },
            },
            IncidentDef {
                id: IncidentId::new("butchering_amputation"),
                context: IncidentContext::Butchering,
                effect: EffectSpec::MissingPart {
                    region: RegionKind::Finger,
                },
            },
            IncidentDef {
                id: IncidentId::new("tripping_accident"),
                context: IncidentContext::Movement,
                effect: EffectSpec::TripSpill,
            },
            IncidentDef {
                id: IncidentId::new("eating_choking"),
                context: IncidentContext::Eating,
                effect: EffectSpec::Choking,
            },
            IncidentDef {
                id: IncidentId::new("work_accident"),
                context: IncidentContext::Work,
                effect: EffectSpec::WorkMishap,
            },
            IncidentDef {
                id: IncidentId::new("sleep_nightmare"),
                context: IncidentContext::Sleep,
                effect: EffectSpec::Nightmare,
            },
            IncidentDef {
                id: IncidentId::new("milking_kick"),
                context: IncidentContext::AnimalHandling,
                effect: EffectSpec::Injury {
                    injury: InjuryKind::Bruise,
                    region: RegionKind::Leg,
                    min_severity: MILK_KICK_SEVERITY.0,
                    max_severity: MILK_KICK_SEVERITY.1,
                },
            },
            IncidentDef {
                id: IncidentId::new("shearing_cut"),
                context: IncidentContext::AnimalHandling,
                effect: EffectSpec::ShearingCut,
            },
            IncidentDef {
                id: IncidentId::new("training_bite"),
                context: IncidentContext::AnimalHandling,
                effect: EffectSpec::Injury {
                    injury: InjuryKind::Bite,
                    region: RegionKind::Hand,
                    min_severity: TRAIN_BITE_SEVERITY.0,
                    max_severity: TRAIN_BITE_SEVERITY.1,
                },
            },
        ];
        Self { incidents }
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn find(&self, id: &IncidentId) -> Option<&IncidentDef> {
        self.incidents.iter().find(|def| &def.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &IncidentId) -> bool {
        self.find(id).is_some()
    }

    /// Whether an incident id may fire in the given context. Unknown ids are
    /// never allowed anywhere.
    #[must_use]
    pub fn allowed_in(&self, id: &IncidentId, context: IncidentContext) -> bool {
        self.find(id).is_some_and(|def| def.context == context)
    }

    /// Pick a uniformly random incident from the whole catalog, used by the
    /// accident storm's hourly enqueue.
    #[must_use]
    pub fn pick_any<R>(&self, rng: &mut R) -> Option<&IncidentDef>
    where
        R: Rng + ?Sized,
    {
        if self.incidents.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.incidents.len());
        self.incidents.get(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn builtin_catalog_covers_every_context() {
        let catalog = IncidentCatalog::builtin();
        for context in IncidentContext::ALL {
            assert!(
                catalog.incidents.iter().any(|def| def.context == context),
                "missing incident for context {context:?}"
            );
        }
    }

    #[test]
    fn context_membership_gates_lookup() {
        let catalog = IncidentCatalog::builtin();
        let burn = IncidentId::new("kitchen_burn");
        assert!(catalog.allowed_in(&burn, IncidentContext::Cooking));
        assert!(!catalog.allowed_in(&burn, IncidentContext::Eating));

        let stale = IncidentId::new("removed_in_v2");
        assert!(!catalog.allowed_in(&stale, IncidentContext::Cooking));
    }

    #[test]
    fn pick_any_handles_empty_catalog() {
        let empty = IncidentCatalog::default();
        let mut rng = SmallRng::seed_from_u64(3);
        assert!(empty.pick_any(&mut rng).is_none());

        let catalog = IncidentCatalog::builtin();
        assert!(catalog.pick_any(&mut rng).is_some());
    }

    #[test]
    fn catalog_roundtrips_json() {
        let catalog = IncidentCatalog::builtin();
        let json = serde_json::to_string(&catalog).unwrap();
        let back = IncidentCatalog::from_json(&json).unwrap();
        assert_eq!(back, catalog);
    }
}

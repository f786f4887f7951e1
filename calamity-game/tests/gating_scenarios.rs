//! End-to-end scenarios for the foreshadow-queue / progress-gate pipeline,
//! driven entirely through the host-facing callbacks.

use calamity_game::testutil::{RecordingExecutor, colonist_doing};
use calamity_game::{
    AccidentConfig, AccidentEngine, ActivityKind, IncidentId, InjuryKind, TargetRef,
};

const MAP: TargetRef = TargetRef(1);

/// Config with every immediate roll disabled, so only the queued path can
/// produce effects.
fn queued_only_config() -> AccidentConfig {
    let mut config = AccidentConfig::default();
    config.cooking.base_chance = 0.0;
    config.butchering.base_chance = 0.0;
    config.eating.base_chance = 0.0;
    config.movement.base_chance = 0.0;
    config.work.base_chance = 0.0;
    config.sleep.base_chance = 0.0;
    config.animals.base_chance = 0.0;
    config
}

#[test]
fn queued_incident_waits_out_the_dwell_then_fires() {
    // Incident queued at tick 1000; the cook starts at 1050 with a 300-tick
    // dwell. At 1200 only 150 ticks have elapsed since tracking began; at
    // 1351 the dwell is satisfied and the entry has not expired.
    let mut engine = AccidentEngine::new(0x90, queued_only_config()).unwrap();
    let mut fx = RecordingExecutor::default();
    engine.on_storyteller_incident(1_000, IncidentId::new("kitchen_burn"), MAP, &mut fx);

    let cook = colonist_doing(1, ActivityKind::BillWork, 42);
    engine.on_cooking_tick(1_050, &cook, &mut fx);
    engine.on_cooking_tick(1_200, &cook, &mut fx);
    assert!(fx.injuries.is_empty(), "dwell not yet satisfied at 1200");
    assert_eq!(engine.queue().len(), 1);

    engine.on_cooking_tick(1_351, &cook, &mut fx);
    assert_eq!(fx.injuries.len(), 1, "admitted once dwell elapsed");
    assert_eq!(fx.injuries[0].2, InjuryKind::Burn);
    assert!(engine.queue().is_empty());
}

#[test]
fn short_ttl_expires_before_admission() {
    // Same shape, but TTL=100 while the dwell is 300: the entry must vanish
    // at tick 1101 and nothing ever fires.
    let mut config = queued_only_config();
    config.queue_ttl_ticks = 100;
    let mut engine = AccidentEngine::new(0x91, config).unwrap();
    let mut fx = RecordingExecutor::default();
    engine.on_storyteller_incident(1_000, IncidentId::new("kitchen_burn"), MAP, &mut fx);

    let cook = colonist_doing(1, ActivityKind::BillWork, 42);
    engine.on_cooking_tick(1_050, &cook, &mut fx);
    assert_eq!(engine.queue().len(), 1);

    engine.on_cooking_tick(1_101, &cook, &mut fx);
    assert!(engine.queue().is_empty(), "expired before admission");

    // Even with unlimited further polling, nothing fires.
    for tick in 1_102..1_500 {
        engine.on_cooking_tick(tick, &cook, &mut fx);
    }
    assert!(fx.injuries.is_empty());
    assert!(fx.mutation_count() == 0);
}

#[test]
fn polls_skip_entries_from_other_contexts() {
    // Two cooking incidents and one eating incident queued; an eating poll
    // must fire only the eating entry and leave both cooking entries.
    let mut engine = AccidentEngine::new(0x92, queued_only_config()).unwrap();
    let mut fx = RecordingExecutor::default();
    engine.on_storyteller_incident(100, IncidentId::new("kitchen_burn"), MAP, &mut fx);
    engine.on_storyteller_incident(200, IncidentId::new("kitchen_fire_small"), MAP, &mut fx);
    engine.on_storyteller_incident(300, IncidentId::new("eating_choking"), MAP, &mut fx);

    let diner = colonist_doing(2, ActivityKind::Ingest, 7);
    engine.on_chew_cycle(400, &diner, &mut fx);
    engine.on_chew_cycle(800, &diner, &mut fx);

    assert_eq!(fx.injuries.len(), 1);
    assert!(matches!(
        fx.injuries[0].2,
        InjuryKind::Choking | InjuryKind::ChokingCritical
    ));
    assert_eq!(engine.queue().len(), 2, "cooking entries untouched");
    assert_eq!(
        engine.queue().entries()[0].incident_id,
        IncidentId::new("kitchen_burn")
    );
    assert_eq!(
        engine.queue().entries()[1].incident_id,
        IncidentId::new("kitchen_fire_small")
    );
}

#[test]
fn earliest_queued_incident_of_a_context_fires_first() {
    let mut engine = AccidentEngine::new(0x93, queued_only_config()).unwrap();
    let mut fx = RecordingExecutor::default();
    engine.on_storyteller_incident(100, IncidentId::new("kitchen_burn"), MAP, &mut fx);
    engine.on_storyteller_incident(150, IncidentId::new("eating_choking"), MAP, &mut fx);
    engine.on_storyteller_incident(200, IncidentId::new("kitchen_explosion"), MAP, &mut fx);

    let cook = colonist_doing(1, ActivityKind::BillWork, 42);
    engine.on_cooking_tick(300, &cook, &mut fx);
    engine.on_cooking_tick(700, &cook, &mut fx);

    // The burn (queued first) fired; the explosion is still pending.
    assert_eq!(fx.injuries.len(), 1);
    assert_eq!(fx.injuries[0].2, InjuryKind::Burn);
    assert_eq!(engine.queue().len(), 2);
}

#[test]
fn firing_rearms_the_dwell_for_the_next_entry() {
    let mut engine = AccidentEngine::new(0x94, queued_only_config()).unwrap();
    let mut fx = RecordingExecutor::default();
    engine.on_storyteller_incident(0, IncidentId::new("kitchen_burn"), MAP, &mut fx);
    engine.on_storyteller_incident(0, IncidentId::new("kitchen_burn"), MAP, &mut fx);

    let cook = colonist_doing(1, ActivityKind::BillWork, 42);
    engine.on_cooking_tick(100, &cook, &mut fx);
    engine.on_cooking_tick(500, &cook, &mut fx);
    assert_eq!(fx.injuries.len(), 1, "first entry fired");

    // Immediately after, the second queued burn must wait a fresh dwell.
    engine.on_cooking_tick(501, &cook, &mut fx);
    assert_eq!(fx.injuries.len(), 1);
    engine.on_cooking_tick(900, &cook, &mut fx);
    assert_eq!(fx.injuries.len(), 2);
}

#[test]
fn switching_jobs_resets_accumulated_progress() {
    let mut engine = AccidentEngine::new(0x95, queued_only_config()).unwrap();
    let mut fx = RecordingExecutor::default();
    engine.on_storyteller_incident(0, IncidentId::new("kitchen_burn"), MAP, &mut fx);

    // 250 ticks of progress under the first job instance.
    let first_job = colonist_doing(1, ActivityKind::BillWork, 42);
    engine.on_cooking_tick(100, &first_job, &mut fx);
    engine.on_cooking_tick(350, &first_job, &mut fx);
    assert!(fx.injuries.is_empty());

    // New job instance of the same kind: the clock restarts.
    let second_job = colonist_doing(1, ActivityKind::BillWork, 43);
    engine.on_cooking_tick(400, &second_job, &mut fx);
    assert!(fx.injuries.is_empty());
    engine.on_cooking_tick(650, &second_job, &mut fx);
    assert!(fx.injuries.is_empty(), "only 250 ticks under the new job");
    engine.on_cooking_tick(701, &second_job, &mut fx);
    assert_eq!(fx.injuries.len(), 1);
}

#[test]
fn queue_survives_save_load_mid_dwell() {
    let mut engine = AccidentEngine::new(0x96, queued_only_config()).unwrap();
    let mut fx = RecordingExecutor::default();
    engine.on_storyteller_incident(1_000, IncidentId::new("kitchen_burn"), MAP, &mut fx);

    let cook = colonist_doing(1, ActivityKind::BillWork, 42);
    engine.on_cooking_tick(1_050, &cook, &mut fx);

    // Save and reload between polls. Absolute ticks carry over; the gate is
    // transient, so tracking restarts at the next poll.
    let snapshot = engine.snapshot();
    let mut restored = AccidentEngine::restore(snapshot, queued_only_config()).unwrap();

    restored.on_cooking_tick(2_000, &cook, &mut fx);
    assert!(fx.injuries.is_empty(), "tracking restarted after load");
    restored.on_cooking_tick(2_301, &cook, &mut fx);
    assert_eq!(fx.injuries.len(), 1);
}

#[test]
fn storm_multiplier_supercharges_immediate_rolls() {
    // With a base chance the x10 storm multiplier saturates to certainty,
    // the stormy map must fire on the first poll.
    let mut config = AccidentConfig::default();
    config.cooking.base_chance = 0.5;
    config.immediate_roll_ratio = 1.0;
    let mut engine = AccidentEngine::new(0x97, config).unwrap();
    let mut fx = RecordingExecutor::default();

    engine.begin_storm(MAP, &mut fx);
    let mut cook = colonist_doing(1, ActivityKind::BillWork, 42);
    cook.mood = Some(1.0);
    cook.skills.cooking.level = 20;

    // Probability: 0.5 x storm 10 saturates past 1.0 even for the best cook.
    engine.on_cooking_tick(100, &cook, &mut fx);
    assert!(
        fx.mutation_count() > 0 || !engine.pending_explosions().is_empty(),
        "storm-saturated roll must fire"
    );
}

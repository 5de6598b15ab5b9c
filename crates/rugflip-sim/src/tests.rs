//! Tests for the game engine: commands, timed rules, persistence, and invariants.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use rugflip_core::commands::PlayerCommand;
use rugflip_core::components::damage_for;
use rugflip_core::constants::*;
use rugflip_core::enums::*;
use rugflip_core::events::GameEvent;
use rugflip_core::types::ObstacleId;

use crate::clock::ManualClock;
use crate::engine::{EngineConfig, GameEngine};
use crate::persistence::{KeyValueStore, MemoryStore, SaveRecord, SavedUpgrade};

// ---- Helpers ----

fn new_engine() -> (GameEngine, ManualClock, MemoryStore) {
    engine_with_store(MemoryStore::new())
}

fn engine_with_store(store: MemoryStore) -> (GameEngine, ManualClock, MemoryStore) {
    let clock = ManualClock::new();
    let engine = GameEngine::create(EngineConfig::default(), clock.clone(), store.clone());
    (engine, clock, store)
}

fn started_engine() -> (GameEngine, ManualClock, MemoryStore) {
    let (mut engine, clock, store) = new_engine();
    engine.start();
    (engine, clock, store)
}

fn store_with_record(record: &SaveRecord) -> MemoryStore {
    MemoryStore::with_entry(STORAGE_KEY, &serde_json::to_string(record).unwrap())
}

fn saved_record(store: &MemoryStore) -> Option<SaveRecord> {
    store
        .get(STORAGE_KEY)
        .unwrap()
        .map(|raw| serde_json::from_str(&raw).unwrap())
}

fn advance(engine: &mut GameEngine, clock: &ManualClock, millis: u64) -> usize {
    clock.advance(millis);
    engine.update()
}

fn assert_invariants(engine: &GameEngine) {
    let state = engine.state();
    assert!(!(state.won && state.lost), "won and lost are exclusive");
    if state.market_cap >= TARGET_MARKET_CAP {
        assert!(state.won, "market cap at target without victory");
    }
    if state.lost {
        assert_eq!(state.market_cap, 0);
    }
    assert_eq!(
        engine.rules_active(),
        engine.phase().is_playing(),
        "rule timers must run exactly while playing"
    );

    let mut ids: Vec<ObstacleId> = state.obstacles.iter().map(|o| o.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), state.obstacles.len(), "obstacle ids must be unique");
}

// ---- Start / instructions ----

#[test]
fn test_fresh_engine_shows_briefing() {
    let (engine, _clock, store) = new_engine();
    assert_eq!(engine.phase(), GamePhase::NotStarted);
    assert!(engine.state().show_instructions);
    assert!(!engine.rules_active());
    assert!(store.is_empty());
}

#[test]
fn test_start_begins_play_and_persists() {
    let (engine, _clock, store) = started_engine();
    assert_eq!(engine.phase(), GamePhase::Playing);
    assert!(!engine.state().show_instructions);
    assert!(engine.rules_active());

    let record = saved_record(&store).expect("start should persist");
    assert!(record.started);
}

#[test]
fn test_start_is_noop_once_started() {
    let (mut engine, clock, _store) = started_engine();
    clock.advance(700);
    engine.toggle_instructions();
    let due = engine.next_rule_due();

    engine.start();

    assert!(engine.state().show_instructions, "second start must not touch state");
    assert_eq!(engine.next_rule_due(), due, "second start must not re-arm timers");
}

#[test]
fn test_toggle_instructions_in_any_phase() {
    let (mut engine, _clock, store) = new_engine();
    engine.toggle_instructions();
    assert!(!engine.state().show_instructions);
    assert_eq!(engine.phase(), GamePhase::NotStarted);
    assert!(store.is_empty(), "toggling is not persisted");

    engine.toggle_instructions();
    assert!(engine.state().show_instructions);
}

// ---- Clicking ----

#[test]
fn test_first_click_adds_base_value() {
    let (mut engine, _clock, store) = started_engine();
    engine.click_main();

    assert_eq!(engine.state().market_cap, 10_000);
    assert_eq!(engine.state().click_count, 1);
    assert!(!engine.state().won);

    let record = saved_record(&store).unwrap();
    assert_eq!(record.resource, 10_000);
    assert_eq!(record.click_count, 1);
}

#[test]
fn test_click_ignored_before_start() {
    let (mut engine, _clock, store) = new_engine();
    engine.click_main();
    assert_eq!(engine.state().market_cap, 0);
    assert_eq!(engine.state().click_count, 0);
    assert!(store.is_empty());
}

#[test]
fn test_click_reaching_target_wins_same_step() {
    let record = SaveRecord {
        resource: TARGET_MARKET_CAP - BASE_CLICK_VALUE,
        started: true,
        ..Default::default()
    };
    let (mut engine, _clock, store) = engine_with_store(store_with_record(&record));

    engine.click_main();

    assert_eq!(engine.state().market_cap, TARGET_MARKET_CAP);
    assert!(engine.state().won);
    assert_eq!(engine.phase(), GamePhase::Won);
    assert!(!engine.rules_active());
    assert!(saved_record(&store).unwrap().won);
    assert!(engine
        .drain_events()
        .contains(&GameEvent::Victory {
            market_cap: TARGET_MARKET_CAP
        }));

    engine.click_main();
    assert_eq!(engine.state().click_count, 1, "clicks stop after victory");
}

// ---- Upgrades ----

#[test]
fn test_buy_upgrade_charges_pre_purchase_cost() {
    let (mut engine, _clock, _store) = started_engine();
    engine.set_market_cap(200_000);

    engine.buy_upgrade("auto-flipper");
    assert_eq!(engine.state().market_cap, 150_000);
    assert_eq!(engine.state().upgrade("auto-flipper").unwrap().level, 1);

    engine.buy_upgrade("auto-flipper");
    assert_eq!(engine.state().market_cap, 75_000);
    assert_eq!(engine.state().upgrade("auto-flipper").unwrap().level, 2);

    // Next level costs 112,500.
    let before = engine.state().clone();
    engine.buy_upgrade("auto-flipper");
    assert_eq!(engine.state(), &before);
}

#[test]
fn test_buy_upgrade_costs_keep_rising() {
    let (mut engine, _clock, _store) = started_engine();
    engine.set_market_cap(1_000_000_000);

    let mut last_cost = 0;
    for expected_level in 1..=5 {
        let cost = engine.state().upgrade("whale-investor").unwrap().cost().unwrap();
        assert!(cost > last_cost);
        let before = engine.state().market_cap;

        engine.buy_upgrade("whale-investor");

        assert_eq!(engine.state().market_cap, before - cost);
        assert_eq!(
            engine.state().upgrade("whale-investor").unwrap().level,
            expected_level
        );
        last_cost = cost;
    }
}

#[test]
fn test_buy_upgrade_exact_balance_is_not_defeat() {
    let (mut engine, _clock, _store) = started_engine();
    engine.set_market_cap(50_000);
    engine.buy_upgrade("auto-flipper");
    assert_eq!(engine.state().market_cap, 0);
    assert!(!engine.state().lost);
    assert_eq!(engine.phase(), GamePhase::Playing);
}

#[test]
fn test_buy_upgrade_unknown_or_unaffordable_is_noop() {
    let (mut engine, _clock, store) = started_engine();
    engine.set_market_cap(49_999);
    let before = engine.state().clone();
    let saved_before = saved_record(&store);

    engine.buy_upgrade("auto-flipper");
    engine.buy_upgrade("moon-rocket");

    assert_eq!(engine.state(), &before);
    assert_eq!(saved_record(&store), saved_before);
    assert!(engine.drain_events().is_empty());
}

#[test]
fn test_buy_upgrade_ignored_before_start() {
    let record = SaveRecord {
        resource: 1_000_000,
        ..Default::default()
    };
    let (mut engine, _clock, _store) = engine_with_store(store_with_record(&record));
    engine.buy_upgrade("auto-flipper");
    assert_eq!(engine.state().market_cap, 1_000_000);
    assert_eq!(engine.state().upgrade("auto-flipper").unwrap().level, 0);
}

// ---- Obstacles: dismissal ----

#[test]
fn test_click_obstacle_removes_without_damage() {
    let (mut engine, _clock, _store) = started_engine();
    engine.set_market_cap(1_000_000);
    let keep = engine.spawn_test_obstacle(ObstacleKind::ScamBot);
    let target = engine.spawn_test_obstacle(ObstacleKind::PumpTrap);

    engine.click_obstacle(target);

    assert_eq!(engine.state().market_cap, 1_000_000);
    assert_eq!(engine.state().obstacles.len(), 1);
    assert_eq!(engine.state().obstacles[0].id, keep);
    assert_eq!(
        engine.drain_events(),
        vec![GameEvent::ObstacleDismissed {
            obstacle_id: target
        }]
    );

    // Stale id: nothing happens.
    engine.click_obstacle(target);
    assert_eq!(engine.state().obstacles.len(), 1);
    assert!(engine.drain_events().is_empty());
}

#[test]
fn test_dismissed_obstacle_never_damages() {
    let (mut engine, clock, _store) = started_engine();
    engine.set_market_cap(50_000);
    let id = engine.spawn_test_obstacle(ObstacleKind::PumpTrap);
    engine.click_obstacle(id);

    advance(&mut engine, &clock, 4_000);
    assert_eq!(engine.state().market_cap, 50_000);
}

// ---- Obstacles: expiry ----

#[test]
fn test_expiry_takes_fifteen_percent_of_one_hundred() {
    let (mut engine, clock, _store) = started_engine();
    engine.set_market_cap(100);
    engine.spawn_test_obstacle(ObstacleKind::PumpTrap);

    advance(&mut engine, &clock, 2_999);
    assert_eq!(engine.state().market_cap, 100, "not expired before its lifetime");
    assert_eq!(engine.state().obstacles.len(), 1);

    advance(&mut engine, &clock, 1);
    assert_eq!(engine.state().market_cap, 85);
    assert!(engine.state().obstacles.is_empty());
    assert!(!engine.state().lost);
}

#[test]
fn test_expiry_damage_is_floored() {
    let (mut engine, clock, _store) = started_engine();
    engine.set_market_cap(10);
    engine.spawn_test_obstacle(ObstacleKind::PumpTrap);

    advance(&mut engine, &clock, 3_000);
    assert_eq!(engine.state().market_cap, 9);
    assert!(!engine.state().lost);
}

#[test]
fn test_simultaneous_expiries_priced_off_pre_tick_value() {
    let (mut engine, clock, store) = started_engine();
    engine.set_market_cap(1_000);
    engine.spawn_test_obstacle(ObstacleKind::FakeRug);
    engine.spawn_test_obstacle(ObstacleKind::PumpTrap);
    engine.spawn_test_obstacle(ObstacleKind::ScamBot);

    advance(&mut engine, &clock, 3_000);

    // 100 + 150 + 50, not compounded 1000 -> 900 -> 765 -> 727.
    assert_eq!(engine.state().market_cap, 700);
    assert!(engine.state().obstacles.is_empty());
    assert_eq!(saved_record(&store).unwrap().resource, 700);

    let damages: Vec<u64> = engine
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::ObstacleExpired { damage, .. } => Some(damage),
            _ => None,
        })
        .collect();
    assert_eq!(damages, vec![100, 150, 50]);
}

#[test]
fn test_damage_wiping_market_cap_loses_same_step() {
    let (mut engine, clock, store) = started_engine();
    engine.set_market_cap(100);
    for _ in 0..7 {
        engine.spawn_test_obstacle(ObstacleKind::PumpTrap);
    }

    advance(&mut engine, &clock, 3_000);

    assert_eq!(engine.state().market_cap, 0);
    assert!(engine.state().lost);
    assert!(!engine.state().won);
    assert_eq!(engine.phase(), GamePhase::Lost);
    assert!(!engine.rules_active());
    assert!(saved_record(&store).unwrap().lost);
    assert!(engine.drain_events().contains(&GameEvent::Defeat));
}

#[test]
fn test_damage_at_zero_is_not_defeat() {
    let (mut engine, clock, _store) = started_engine();
    engine.spawn_test_obstacle(ObstacleKind::FakeRug);

    advance(&mut engine, &clock, 3_000);

    assert_eq!(engine.state().market_cap, 0);
    assert!(!engine.state().lost, "never accumulated, so nothing was lost");
    assert!(engine.state().obstacles.is_empty());
}

#[test]
fn test_expiry_without_obstacles_does_not_persist() {
    let (mut engine, clock, mut store) = started_engine();
    store.remove(STORAGE_KEY).unwrap();

    advance(&mut engine, &clock, 5_000);

    assert!(store.is_empty(), "idle ticks must not write");
}

// ---- Obstacles: spawning ----

#[test]
fn test_spawn_gated_by_minimum_market_cap() {
    let (mut engine, clock, _store) = started_engine();
    engine.set_market_cap(OBSTACLE_SPAWN_MIN_MARKET_CAP - 1);
    advance(&mut engine, &clock, 5_000);
    assert!(engine.state().obstacles.is_empty());

    engine.set_market_cap(OBSTACLE_SPAWN_MIN_MARKET_CAP);
    advance(&mut engine, &clock, 5_000);

    let obstacles = &engine.state().obstacles;
    assert_eq!(obstacles.len(), 1);
    let obstacle = &obstacles[0];
    assert_eq!(obstacle.created_at, 10_000);
    assert!((OBSTACLE_SPAWN_X_MIN..OBSTACLE_SPAWN_X_MAX).contains(&obstacle.position.x));
    assert!((OBSTACLE_SPAWN_Y_MIN..OBSTACLE_SPAWN_Y_MAX).contains(&obstacle.position.y));
}

#[test]
fn test_spawned_obstacle_expires_on_first_check_past_lifetime() {
    let (mut engine, clock, _store) = started_engine();
    engine.set_market_cap(1_000_000);

    advance(&mut engine, &clock, 5_000);
    let events = engine.drain_events();
    let Some(GameEvent::ObstacleSpawned { obstacle_id, kind }) = events.first().cloned() else {
        panic!("expected a spawn at 5s, got {events:?}");
    };

    advance(&mut engine, &clock, 2_999);
    assert!(engine.state().obstacle(obstacle_id).is_some());

    advance(&mut engine, &clock, 1);
    assert!(engine.state().obstacle(obstacle_id).is_none());
    assert_eq!(
        engine.state().market_cap,
        1_000_000 - damage_for(kind, 1_000_000)
    );
}

#[test]
fn test_spawns_are_deterministic_per_seed() {
    let run = |seed: u64| {
        let clock = ManualClock::new();
        let store = MemoryStore::with_entry(
            STORAGE_KEY,
            &serde_json::to_string(&SaveRecord {
                resource: 5_000_000_000,
                started: true,
                ..Default::default()
            })
            .unwrap(),
        );
        let config = EngineConfig {
            seed,
            ..Default::default()
        };
        let mut engine = GameEngine::create(config, clock.clone(), store);
        let mut snapshots = Vec::new();
        for _ in 0..30 {
            clock.advance(1_000);
            engine.update();
            snapshots.push(serde_json::to_string(&engine.snapshot()).unwrap());
        }
        snapshots
    };

    assert_eq!(run(7), run(7), "same seed must replay the same game");
    assert_ne!(run(7), run(8), "different seeds should diverge");
}

#[test]
fn test_obstacle_ids_never_reused_across_reset() {
    let (mut engine, _clock, _store) = started_engine();
    let first = engine.spawn_test_obstacle(ObstacleKind::ScamBot);
    engine.reset();
    engine.start();
    let second = engine.spawn_test_obstacle(ObstacleKind::ScamBot);
    assert_ne!(first, second);
}

// ---- Passive income ----

#[test]
fn test_passive_income_pays_each_second() {
    let (mut engine, clock, _store) = started_engine();
    engine.set_market_cap(550_000);
    engine.buy_upgrade("auto-flipper");
    engine.buy_upgrade("whale-investor");
    assert_eq!(engine.state().market_cap, 0);

    advance(&mut engine, &clock, 1_000);
    assert_eq!(engine.state().market_cap, 1_100);

    advance(&mut engine, &clock, 999);
    assert_eq!(engine.state().market_cap, 1_100);

    advance(&mut engine, &clock, 1);
    assert_eq!(engine.state().market_cap, 2_200);
}

#[test]
fn test_zero_income_leaves_state_untouched() {
    let (mut engine, clock, mut store) = started_engine();
    store.remove(STORAGE_KEY).unwrap();
    let before = engine.state().clone();

    advance(&mut engine, &clock, 3_000);

    assert_eq!(engine.state(), &before);
    assert!(store.is_empty());
}

#[test]
fn test_passive_income_reaching_target_wins_same_tick() {
    let record = SaveRecord {
        resource: TARGET_MARKET_CAP - 100,
        upgrades: vec![SavedUpgrade {
            id: "auto-flipper".into(),
            level: 1,
        }],
        started: true,
        ..Default::default()
    };
    let (mut engine, clock, store) = engine_with_store(store_with_record(&record));
    assert!(engine.rules_active());

    advance(&mut engine, &clock, 1_000);

    assert_eq!(engine.state().market_cap, 11_300_000_000);
    assert!(engine.state().won);
    assert!(!engine.rules_active());
    assert!(saved_record(&store).unwrap().won);
}

#[test]
fn test_late_poll_replays_every_firing() {
    let record = SaveRecord {
        upgrades: vec![SavedUpgrade {
            id: "auto-flipper".into(),
            level: 1,
        }],
        started: true,
        ..Default::default()
    };
    let (mut engine, clock, _store) = engine_with_store(store_with_record(&record));

    let fired = advance(&mut engine, &clock, 10_000);

    // 10 income + 2 spawn + 10 expiry firings.
    assert_eq!(fired, 22);
    assert_eq!(engine.state().market_cap, 1_000);
}

// ---- Game end ----

#[test]
fn test_rules_suspended_after_game_ends() {
    let record = SaveRecord {
        resource: TARGET_MARKET_CAP - 100,
        upgrades: vec![SavedUpgrade {
            id: "diamond-hands".into(),
            level: 3,
        }],
        started: true,
        ..Default::default()
    };
    let (mut engine, clock, _store) = engine_with_store(store_with_record(&record));
    engine.spawn_test_obstacle(ObstacleKind::PumpTrap);

    advance(&mut engine, &clock, 1_000);
    assert!(engine.state().won);
    assert!(engine.state().obstacles.is_empty());
    let frozen = engine.state().clone();

    let fired = advance(&mut engine, &clock, 60_000);
    assert_eq!(fired, 0);
    assert_eq!(engine.state(), &frozen, "no income, spawn, or damage after victory");
}

#[test]
fn test_victory_by_click_discards_obstacles() {
    let record = SaveRecord {
        resource: TARGET_MARKET_CAP - BASE_CLICK_VALUE,
        started: true,
        ..Default::default()
    };
    let (mut engine, clock, store) = engine_with_store(store_with_record(&record));
    let id = engine.spawn_test_obstacle(ObstacleKind::PumpTrap);

    engine.click_main();
    assert!(engine.state().won);
    assert!(engine.state().obstacles.is_empty());
    assert_eq!(engine.state().market_cap, TARGET_MARKET_CAP);

    advance(&mut engine, &clock, 60_000);
    let snapshot = engine.snapshot();
    assert!(snapshot.obstacles.is_empty());

    engine.drain_events();
    let before = saved_record(&store);
    engine.click_obstacle(id);
    assert!(engine.drain_events().is_empty(), "nothing left to dismiss");
    assert_eq!(saved_record(&store), before);
}

#[test]
fn test_defeat_discards_surviving_obstacles() {
    let (mut engine, clock, _store) = started_engine();
    engine.set_market_cap(100);
    for _ in 0..7 {
        engine.spawn_test_obstacle(ObstacleKind::PumpTrap);
    }
    clock.advance(1_500);
    engine.spawn_test_obstacle(ObstacleKind::FakeRug);

    advance(&mut engine, &clock, 1_500);

    assert!(engine.state().lost);
    assert!(engine.state().obstacles.is_empty());
    advance(&mut engine, &clock, 60_000);
    assert!(engine.snapshot().obstacles.is_empty());
}

#[test]
fn test_create_with_record_at_target_is_won() {
    let record = SaveRecord {
        resource: TARGET_MARKET_CAP,
        started: true,
        ..Default::default()
    };
    let (engine, _clock, _store) = engine_with_store(store_with_record(&record));

    assert!(engine.state().won);
    assert_eq!(engine.phase(), GamePhase::Won);
    assert!(!engine.rules_active());
    assert_invariants(&engine);
}

#[test]
fn test_rules_never_run_before_start() {
    let record = SaveRecord {
        resource: 5_000_000,
        upgrades: vec![SavedUpgrade {
            id: "marketing-bot".into(),
            level: 2,
        }],
        ..Default::default()
    };
    let (mut engine, clock, _store) = engine_with_store(store_with_record(&record));

    let fired = advance(&mut engine, &clock, 30_000);

    assert_eq!(fired, 0);
    assert_eq!(engine.state().market_cap, 5_000_000);
    assert!(engine.state().obstacles.is_empty());
}

// ---- Reset ----

#[test]
fn test_reset_restores_defaults_and_clears_save() {
    let (mut engine, clock, store) = started_engine();
    engine.set_market_cap(600_000);
    engine.buy_upgrade("whale-investor");
    engine.click_main();
    engine.spawn_test_obstacle(ObstacleKind::FakeRug);
    advance(&mut engine, &clock, 1_000);
    assert!(saved_record(&store).is_some());

    engine.reset();

    let state = engine.state();
    assert_eq!(state.market_cap, 0);
    assert_eq!(state.click_count, 0);
    assert_eq!(state.click_value, BASE_CLICK_VALUE);
    assert!(state.upgrades.iter().all(|u| u.level == 0));
    assert!(state.obstacles.is_empty());
    assert!(!state.started && !state.won && !state.lost);
    assert!(state.show_instructions);
    assert!(!engine.rules_active());
    assert!(store.is_empty(), "reset clears the save and writes nothing");

    advance(&mut engine, &clock, 10_000);
    engine.toggle_instructions();
    assert!(store.is_empty());

    engine.start();
    assert!(saved_record(&store).is_some());
}

#[test]
fn test_reset_after_defeat_allows_new_game() {
    let (mut engine, clock, _store) = started_engine();
    engine.set_market_cap(20);
    for _ in 0..7 {
        engine.spawn_test_obstacle(ObstacleKind::PumpTrap);
    }
    advance(&mut engine, &clock, 3_000);
    assert!(engine.state().lost);

    engine.reset();
    assert_eq!(engine.phase(), GamePhase::NotStarted);

    engine.start();
    engine.click_main();
    assert_eq!(engine.phase(), GamePhase::Playing);
    assert_eq!(engine.state().market_cap, BASE_CLICK_VALUE);
}

// ---- Loading ----

#[test]
fn test_create_resumes_saved_game_with_briefing() {
    let record = SaveRecord {
        resource: 2_000_000,
        click_count: 200,
        upgrades: vec![SavedUpgrade {
            id: "marketing-bot".into(),
            level: 1,
        }],
        started: true,
        ..Default::default()
    };
    let (engine, _clock, _store) = engine_with_store(store_with_record(&record));

    let state = engine.state();
    assert_eq!(state.market_cap, 2_000_000);
    assert_eq!(state.click_count, 200);
    assert_eq!(state.upgrade("marketing-bot").unwrap().level, 1);
    assert!(state.show_instructions);
    assert!(state.obstacles.is_empty());
    assert_eq!(engine.phase(), GamePhase::Playing);
    assert!(engine.rules_active());
}

#[test]
fn test_create_with_corrupt_save_starts_fresh() {
    let store = MemoryStore::with_entry(STORAGE_KEY, "\u{1F4A9} definitely not json");
    let (engine, _clock, _store) = engine_with_store(store);
    assert_eq!(engine.state(), &rugflip_core::components::GameState::new());
    assert_eq!(engine.phase(), GamePhase::NotStarted);
}

// ---- Driving & snapshots ----

#[test]
fn test_tick_processes_queued_commands() {
    let (mut engine, _clock, _store) = new_engine();
    engine.queue_commands([PlayerCommand::StartGame, PlayerCommand::ClickMain]);
    engine.queue_command(PlayerCommand::ClickMain);

    let snapshot = engine.tick();

    assert_eq!(snapshot.phase, GamePhase::Playing);
    assert_eq!(snapshot.market_cap, 2 * BASE_CLICK_VALUE);
    assert_eq!(snapshot.click_count, 2);
}

#[test]
fn test_apply_dispatches_every_command() {
    let (mut engine, _clock, _store) = new_engine();
    engine.apply(PlayerCommand::StartGame);
    for _ in 0..5 {
        engine.apply(PlayerCommand::ClickMain);
    }
    engine.apply(PlayerCommand::BuyUpgrade {
        upgrade_id: "auto-flipper".into(),
    });
    let id = engine.spawn_test_obstacle(ObstacleKind::ScamBot);
    engine.apply(PlayerCommand::ClickObstacle { obstacle_id: id });
    engine.apply(PlayerCommand::ToggleInstructions);

    let state = engine.state();
    assert_eq!(state.market_cap, 0);
    assert_eq!(state.upgrade("auto-flipper").unwrap().level, 1);
    assert!(state.obstacles.is_empty());
    assert!(state.show_instructions);

    engine.apply(PlayerCommand::ResetGame);
    assert_eq!(engine.phase(), GamePhase::NotStarted);
}

#[test]
fn test_snapshot_reports_derived_values() {
    let (mut engine, clock, _store) = started_engine();
    engine.set_market_cap(60_000);
    clock.advance(500);
    engine.spawn_test_obstacle(ObstacleKind::FakeRug);
    clock.advance(400);

    let snapshot = engine.snapshot();

    assert_eq!(snapshot.target_market_cap, TARGET_MARKET_CAP);
    assert_eq!(snapshot.upgrades.len(), 4);
    let flipper = &snapshot.upgrades[0];
    assert_eq!(flipper.id, "auto-flipper");
    assert_eq!(flipper.cost, Some(50_000));
    assert!(flipper.affordable);
    assert!(!snapshot.upgrades[1].affordable);

    let obstacle = &snapshot.obstacles[0];
    assert_eq!(obstacle.age_ms, 400);
    assert_eq!(obstacle.remaining_ms, OBSTACLE_LIFETIME_MS - 400);
    assert_eq!(obstacle.damage_percent, 10.0);
}

#[test]
fn test_dispose_stops_rules_and_returns_state() {
    let (mut engine, _clock, _store) = started_engine();
    engine.click_main();
    let state = engine.dispose();
    assert_eq!(state.market_cap, BASE_CLICK_VALUE);
}

// ---- Invariants ----

fn random_session(start: SaveRecord, seed: u64) {
    let (mut engine, clock, _store) = engine_with_store(store_with_record(&start));
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    assert_invariants(&engine);

    for _ in 0..3_000 {
        match rng.gen_range(0..10) {
            0..=3 => engine.click_main(),
            4 => {
                let def = UPGRADE_CATALOG[rng.gen_range(0..UPGRADE_CATALOG.len())];
                engine.buy_upgrade(def.id);
            }
            5 => {
                let live: Vec<ObstacleId> = engine.state().obstacles.iter().map(|o| o.id).collect();
                if !live.is_empty() && rng.gen_bool(0.5) {
                    engine.click_obstacle(live[rng.gen_range(0..live.len())]);
                } else {
                    engine.click_obstacle(ObstacleId(rng.gen_range(0..50)));
                }
            }
            6 => engine.toggle_instructions(),
            7 => engine.start(),
            _ => {
                advance(&mut engine, &clock, rng.gen_range(0..2_500));
            }
        }
        assert_invariants(&engine);
    }
}

#[test]
fn test_invariants_hold_from_fresh_game() {
    random_session(SaveRecord::default(), 1);
}

#[test]
fn test_invariants_hold_near_target() {
    random_session(
        SaveRecord {
            resource: TARGET_MARKET_CAP - 2_000_000,
            started: true,
            ..Default::default()
        },
        2,
    );
}

#[test]
fn test_invariants_hold_with_heavy_obstacle_pressure() {
    random_session(
        SaveRecord {
            resource: 150_000,
            started: true,
            ..Default::default()
        },
        3,
    );
}

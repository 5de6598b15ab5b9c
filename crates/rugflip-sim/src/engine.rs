//! Game engine: the core of the game.
//!
//! `GameEngine` owns the `GameState`, processes player commands, runs the
//! timed rules, persists progress, and produces `GameStateSnapshot`s. It is
//! completely headless: time comes from an injected [`Clock`] and storage
//! from an injected [`KeyValueStore`], enabling deterministic testing.
//!
//! Every command and every rule firing is a single `&mut self` step. Victory
//! and defeat are decided inside the step that moved the market cap.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rugflip_core::commands::PlayerCommand;
use rugflip_core::components::GameState;
use rugflip_core::constants::{
    OBSTACLE_EXPIRY_CHECK_INTERVAL_MS, OBSTACLE_LIFETIME_MS, OBSTACLE_SPAWN_INTERVAL_MS,
    PASSIVE_INCOME_INTERVAL_MS, STORAGE_KEY,
};
use rugflip_core::enums::GamePhase;
use rugflip_core::events::GameEvent;
use rugflip_core::state::GameStateSnapshot;
use rugflip_core::types::{Millis, ObstacleId};

use crate::clock::Clock;
use crate::persistence::{self, KeyValueStore, LoadOutcome};
use crate::schedule::{Rule, RuleTimers};
use crate::systems;

/// Periods of the timed rules, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleTimings {
    pub passive_income_ms: Millis,
    pub obstacle_spawn_ms: Millis,
    pub obstacle_expiry_check_ms: Millis,
    pub obstacle_lifetime_ms: Millis,
}

impl Default for RuleTimings {
    fn default() -> Self {
        Self {
            passive_income_ms: PASSIVE_INCOME_INTERVAL_MS,
            obstacle_spawn_ms: OBSTACLE_SPAWN_INTERVAL_MS,
            obstacle_expiry_check_ms: OBSTACLE_EXPIRY_CHECK_INTERVAL_MS,
            obstacle_lifetime_ms: OBSTACLE_LIFETIME_MS,
        }
    }
}

/// Configuration for creating an engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// RNG seed for obstacle spawning. Same seed = same obstacles.
    pub seed: u64,
    /// Key of the saved-game record in the store.
    pub storage_key: String,
    pub timings: RuleTimings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            storage_key: STORAGE_KEY.to_string(),
            timings: RuleTimings::default(),
        }
    }
}

/// The game engine. Owns the state, the rule timers, and the save store.
pub struct GameEngine {
    state: GameState,
    clock: Box<dyn Clock>,
    store: Box<dyn KeyValueStore>,
    storage_key: String,
    timings: RuleTimings,
    timers: RuleTimers,
    rng: ChaCha8Rng,
    next_obstacle_id: u64,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<GameEvent>,
}

impl GameEngine {
    /// Create an engine, resuming the saved game in `store` if there is a
    /// readable one. A game that was saved mid-play resumes its timers at once.
    pub fn create(
        config: EngineConfig,
        clock: impl Clock + 'static,
        store: impl KeyValueStore + 'static,
    ) -> Self {
        let outcome = persistence::load(&store, &config.storage_key);
        match &outcome {
            LoadOutcome::Loaded(record) => tracing::info!(
                market_cap = record.resource,
                started = record.started,
                "Restored saved game"
            ),
            LoadOutcome::Absent => tracing::debug!("No saved game"),
            LoadOutcome::Corrupt(err) => {
                tracing::warn!(error = %err, "Discarding unreadable saved game")
            }
        }
        let state = outcome.into_state();

        let timings = config.timings;
        let mut engine = Self {
            state,
            clock: Box::new(clock),
            store: Box::new(store),
            storage_key: config.storage_key,
            timings,
            timers: RuleTimers::new(
                timings.passive_income_ms,
                timings.obstacle_spawn_ms,
                timings.obstacle_expiry_check_ms,
            ),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_obstacle_id: 0,
            command_queue: VecDeque::new(),
            events: Vec::new(),
        };
        engine.sync_timers();
        engine
    }

    /// Stop all rule timers and hand back the final state.
    pub fn dispose(mut self) -> GameState {
        self.timers.cancel_all();
        tracing::debug!("Engine disposed");
        self.state
    }

    // --- Queries ---

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    /// Current time on the engine clock.
    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    /// Whether the timed rules are currently scheduled.
    pub fn rules_active(&self) -> bool {
        self.timers.is_armed()
    }

    /// When the next rule firing is due, if any rule is scheduled.
    pub fn next_rule_due(&self) -> Option<Millis> {
        self.timers.next_due()
    }

    pub fn snapshot(&self) -> GameStateSnapshot {
        systems::snapshot::build_snapshot(
            &self.state,
            self.clock.now(),
            self.timings.obstacle_lifetime_ms,
        )
    }

    /// Take the events recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Driving ---

    /// Queue a player command for processing at the next tick.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Run every rule firing that is due, process queued commands, and
    /// return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.update();
        while let Some(command) = self.command_queue.pop_front() {
            self.apply(command);
        }
        self.snapshot()
    }

    /// Run every rule firing due at or before the current clock time, in
    /// chronological order. Returns the number of firings run.
    pub fn update(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;
        while let Some((rule, at)) = self.timers.pop_due(now) {
            self.run_rule(rule, at);
            fired += 1;
        }
        fired
    }

    /// Apply a single player command immediately.
    pub fn apply(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartGame => self.start(),
            PlayerCommand::ResetGame => self.reset(),
            PlayerCommand::ToggleInstructions => self.toggle_instructions(),
            PlayerCommand::ClickMain => self.click_main(),
            PlayerCommand::ClickObstacle { obstacle_id } => self.click_obstacle(obstacle_id),
            PlayerCommand::BuyUpgrade { upgrade_id } => self.buy_upgrade(&upgrade_id),
        }
    }

    // --- Commands ---

    /// Leave the briefing and begin playing. Only valid before the game started.
    pub fn start(&mut self) {
        if self.phase() != GamePhase::NotStarted {
            tracing::trace!(phase = ?self.phase(), "Ignoring start");
            return;
        }

        self.state.started = true;
        self.state.show_instructions = false;
        self.persist();
        tracing::info!("Game started");
        self.sync_timers();
    }

    /// Tap the main button.
    pub fn click_main(&mut self) {
        if !self.phase().is_playing() {
            tracing::trace!(phase = ?self.phase(), "Ignoring click");
            return;
        }

        self.state.market_cap = self.state.market_cap.saturating_add(self.state.click_value);
        self.state.click_count += 1;
        if self.state.check_victory() {
            self.record_victory();
        }
        self.persist();
        self.sync_timers();
    }

    /// Buy exactly one level of `upgrade_id`, priced at its current level.
    pub fn buy_upgrade(&mut self, upgrade_id: &str) {
        if !self.phase().is_playing() {
            tracing::trace!(phase = ?self.phase(), upgrade_id, "Ignoring purchase");
            return;
        }

        let market_cap = self.state.market_cap;
        let Some(upgrade) = self.state.upgrade_mut(upgrade_id) else {
            tracing::trace!(upgrade_id, "Ignoring purchase of unknown upgrade");
            return;
        };
        let Some(cost) = upgrade.cost().filter(|&cost| market_cap >= cost) else {
            tracing::trace!(upgrade_id, market_cap, "Ignoring unaffordable purchase");
            return;
        };

        upgrade.level += 1;
        let new_level = upgrade.level;
        self.state.market_cap = market_cap - cost;

        tracing::debug!(upgrade_id, new_level, cost, "Upgrade purchased");
        self.events.push(GameEvent::UpgradePurchased {
            upgrade_id: upgrade_id.to_string(),
            new_level,
            cost,
        });
        self.persist();
    }

    /// Dismiss a live obstacle. Never costs anything.
    pub fn click_obstacle(&mut self, obstacle_id: ObstacleId) {
        let Some(index) = self.state.obstacles.iter().position(|o| o.id == obstacle_id) else {
            tracing::trace!(%obstacle_id, "Ignoring click on missing obstacle");
            return;
        };

        self.state.obstacles.swap_remove(index);
        self.events.push(GameEvent::ObstacleDismissed { obstacle_id });
        self.persist();
    }

    /// Wipe all progress and the saved game. The fresh state is not written
    /// until the next mutation.
    pub fn reset(&mut self) {
        if let Err(err) = persistence::clear(self.store.as_mut(), &self.storage_key) {
            tracing::warn!(error = %err, "Failed to clear saved game");
        }
        self.state = GameState::new();
        self.events.clear();
        tracing::info!("Game reset");
        self.sync_timers();
    }

    /// Show or hide the instructions overlay. Never touches gameplay.
    pub fn toggle_instructions(&mut self) {
        self.state.show_instructions = !self.state.show_instructions;
    }

    // --- Rules ---

    fn run_rule(&mut self, rule: Rule, at: Millis) {
        match rule {
            Rule::PassiveIncome => {
                let outcome = systems::passive_income::run(&mut self.state);
                if outcome.paid > 0 {
                    tracing::trace!(paid = outcome.paid, at, "Passive income paid");
                    if outcome.victory {
                        self.record_victory();
                    }
                    self.persist();
                }
            }
            Rule::ObstacleSpawn => {
                if let Some(obstacle) = systems::obstacle_spawner::run(
                    &mut self.state,
                    &mut self.rng,
                    &mut self.next_obstacle_id,
                    at,
                ) {
                    tracing::debug!(id = %obstacle.id, kind = ?obstacle.kind, at, "Obstacle spawned");
                    self.events.push(GameEvent::ObstacleSpawned {
                        obstacle_id: obstacle.id,
                        kind: obstacle.kind,
                    });
                }
            }
            Rule::ObstacleExpiry => {
                let outcome = systems::obstacle_expiry::run(
                    &mut self.state,
                    at,
                    self.timings.obstacle_lifetime_ms,
                );
                if !outcome.expired.is_empty() {
                    tracing::debug!(
                        expired = outcome.expired.len(),
                        damage = outcome.total_damage,
                        at,
                        "Obstacles expired"
                    );
                    for (obstacle, damage) in outcome.expired {
                        self.events.push(GameEvent::ObstacleExpired {
                            obstacle_id: obstacle.id,
                            kind: obstacle.kind,
                            damage,
                        });
                    }
                    if outcome.defeat {
                        tracing::info!("Game lost");
                        self.events.push(GameEvent::Defeat);
                    }
                    self.persist();
                }
            }
        }
        self.sync_timers();
    }

    fn record_victory(&mut self) {
        tracing::info!(market_cap = self.state.market_cap, "Game won");
        self.events.push(GameEvent::Victory {
            market_cap: self.state.market_cap,
        });
    }

    /// Arm the rule timers on entering play, cancel them on leaving it.
    fn sync_timers(&mut self) {
        let playing = self.phase().is_playing();
        if playing && !self.timers.is_armed() {
            self.timers.arm_all(self.clock.now());
        } else if !playing && self.timers.is_armed() {
            self.timers.cancel_all();
        }
    }

    fn persist(&mut self) {
        if let Err(err) = persistence::save(self.store.as_mut(), &self.storage_key, &self.state) {
            tracing::warn!(error = %err, "Failed to save game");
        }
    }

    /// Insert an obstacle created at the current time (for testing).
    #[cfg(test)]
    pub fn spawn_test_obstacle(&mut self, kind: rugflip_core::enums::ObstacleKind) -> ObstacleId {
        let id = ObstacleId(self.next_obstacle_id);
        self.next_obstacle_id += 1;
        self.state.obstacles.push(rugflip_core::components::Obstacle {
            id,
            kind,
            position: rugflip_core::types::Position::new(50.0, 50.0),
            created_at: self.clock.now(),
        });
        id
    }

    /// Overwrite the market cap directly (for testing).
    #[cfg(test)]
    pub fn set_market_cap(&mut self, market_cap: u64) {
        self.state.market_cap = market_cap;
    }
}

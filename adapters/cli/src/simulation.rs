//! Fixed-tick driver wiring input, systems, the world and persistence.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sky_dash_core::{Command, Event, GameConfig, LevelIndex, TICKS_PER_SECOND};
use sky_dash_rendering::{FrameInput, RenderingError, Scene};
use sky_dash_storage::{RecordStore, VolumeControl};
use sky_dash_system_collision::Collision;
use sky_dash_system_flow::{GameFlow, PlayerAction};
use sky_dash_system_hazards::HazardSpawning;
use sky_dash_system_obstacles::ObstacleGenerator;
use sky_dash_system_placement::PickupPlacement;
use sky_dash_world::{self as world, query, World};

/// Simulated time covered by one fixed tick.
pub(crate) const TICK_DURATION: Duration =
    Duration::from_nanos(1_000_000_000 / TICKS_PER_SECOND as u64);

/// Upper bound on fixed ticks run for a single rendered frame.
pub(crate) const MAX_CATCH_UP_TICKS: u32 = 5;

const VOLUME_STEP: f32 = 0.1;

/// Owns the world and every system, advancing them in fixed ticks.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    flow: GameFlow,
    obstacles: ObstacleGenerator,
    hazards: HazardSpawning,
    placement: PickupPlacement,
    collision: Collision,
    store: RecordStore,
    volume: VolumeControl,
    pending_actions: Vec<PlayerAction>,
    accumulator: Duration,
}

impl Simulation {
    /// Creates a simulation seeded with `seed`, restoring records from `store`.
    pub(crate) fn new(config: GameConfig, seed: u64, store: RecordStore) -> Self {
        let high_score = store.load_high_score();
        let volume = VolumeControl::load(store.clone());
        let mut seeds = ChaCha8Rng::seed_from_u64(seed);
        let screen_height = config.screen_height;

        Self {
            world: World::new(config).with_high_score(high_score),
            flow: GameFlow::new(),
            obstacles: ObstacleGenerator::new(sky_dash_system_obstacles::Config::new(seeds.gen())),
            hazards: HazardSpawning::new(sky_dash_system_hazards::Config::new(
                screen_height,
                seeds.gen(),
            )),
            placement: PickupPlacement::new(sky_dash_system_placement::Config::new(seeds.gen())),
            collision: Collision::new(),
            store,
            volume,
            pending_actions: Vec::new(),
            accumulator: Duration::ZERO,
        }
    }

    /// Queues a level choice for the next tick.
    pub(crate) fn select_level(&mut self, level: LevelIndex) {
        self.pending_actions.push(PlayerAction::SelectLevel(level));
    }

    /// Translates a frame's input into queued actions and applies audio changes.
    pub(crate) fn handle_input(&mut self, input: &FrameInput) {
        if let Some(level) = input.select_level {
            self.select_level(LevelIndex::new(level));
        }
        if input.confirm {
            self.pending_actions.push(PlayerAction::Confirm);
        }
        if input.boost {
            self.pending_actions.push(PlayerAction::Boost);
        }
        if input.shoot {
            self.pending_actions.push(PlayerAction::Shoot);
        }

        if input.toggle_mute {
            if let Err(error) = self.volume.toggle_mute() {
                tracing::warn!(error = %error, "failed to save audio settings");
            }
        }
        if input.volume_steps != 0 {
            let delta = VOLUME_STEP * input.volume_steps as f32;
            if let Err(error) = self.volume.adjust(delta) {
                tracing::warn!(error = %error, "failed to save audio settings");
            }
        }
    }

    /// Accumulates `frame_time` and runs the whole ticks it covers.
    ///
    /// Returns the number of ticks run. A backlog beyond
    /// [`MAX_CATCH_UP_TICKS`] is dropped.
    pub(crate) fn advance(&mut self, frame_time: Duration) -> u32 {
        self.accumulator += frame_time;
        let mut ticks = 0;
        while self.accumulator >= TICK_DURATION && ticks < MAX_CATCH_UP_TICKS {
            self.step();
            self.accumulator -= TICK_DURATION;
            ticks += 1;
        }

        if self.accumulator >= TICK_DURATION {
            tracing::debug!(
                backlog_ms = self.accumulator.as_secs_f64() * 1_000.0,
                "dropping simulation backlog"
            );
            self.accumulator = Duration::ZERO;
        }
        ticks
    }

    /// Runs one fixed tick.
    fn step(&mut self) {
        let mut events = Vec::new();
        let mut commands = Vec::new();

        let actions = std::mem::take(&mut self.pending_actions);
        self.flow
            .handle(&actions, query::flow_state(&self.world), &mut commands);
        commands.push(Command::Tick);
        self.apply(&mut commands, &mut events);

        if let Some(level) = query::active_level(&self.world) {
            let config = query::config(&self.world);
            let view = query::playfield(&self.world);
            self.obstacles
                .handle(&events, &view.obstacles, config, level, &mut commands);
            self.hazards.handle(&events, level, &mut commands);
        }
        self.apply(&mut commands, &mut events);

        // Pickups are planned against the obstacles and hazards spawned above.
        let view = query::playfield(&self.world);
        self.placement
            .handle(&events, &view, query::config(&self.world), &mut commands);
        self.apply(&mut commands, &mut events);

        let view = query::playfield(&self.world);
        self.collision.handle(&events, &view, &mut commands);
        self.apply(&mut commands, &mut events);

        self.record(&events);
    }

    fn apply(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }

    /// Logs flow milestones and persists beaten high scores.
    fn record(&self, events: &[Event]) {
        for event in events {
            match event {
                Event::LevelSelected { level } => {
                    tracing::info!(level = level.get(), "level selected");
                }
                Event::LevelSelectionRejected { level, reason } => {
                    tracing::debug!(level = level.get(), ?reason, "level selection rejected");
                }
                Event::TransitionRejected { trigger, reason } => {
                    tracing::debug!(?trigger, ?reason, "flow transition rejected");
                }
                Event::SessionStarted { level } => {
                    tracing::info!(level = level.get(), "session started");
                }
                Event::SessionEnded { cause, score } => {
                    tracing::info!(?cause, score, "session ended");
                }
                Event::HighScoreBeaten { score } => {
                    tracing::info!(score, "new high score");
                    if let Err(error) = self.store.save_high_score(*score) {
                        tracing::warn!(error = %error, "failed to save high score");
                    }
                }
                _ => {}
            }
        }
    }

    /// Builds the initial scene for the configured playfield.
    pub(crate) fn scene(&self) -> Result<Scene, RenderingError> {
        let config = query::config(&self.world);
        let mut scene = Scene::new(
            config.screen_width as f32,
            config.screen_height as f32,
            query::welcome_banner(&self.world),
        )?;
        scene.levels = config.levels.iter().map(|level| level.name.clone()).collect();
        self.populate_scene(&mut scene);
        Ok(scene)
    }

    /// Copies the current world state and audio settings into `scene`.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        scene.sync_playfield(&query::playfield(&self.world));
        scene.sync_session(&query::session(&self.world));
        let settings = self.volume.settings();
        scene.hud.volume = settings.volume();
        scene.hud.muted = settings.muted();
    }
}

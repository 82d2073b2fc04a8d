#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Sky Dash.

use sky_dash_core::{
    Command, Event, FlowState, FlowTrigger, GameConfig, HazardId, LevelConfig, LevelIndex,
    LevelSelectionError, Motion, ObstacleId, ObstaclePair, PickupId, PickupKind, Player, Position,
    ProjectileId, ShootError, TerminalCause, WELCOME_BANNER,
};

const OBSTACLE_PASS_REWARD: u32 = 1;
const COIN_REWARD: u32 = 5;
const HAZARD_REWARD: u32 = 10;

/// Represents the authoritative Sky Dash world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    level: LevelIndex,
    flow: FlowState,
    player: Option<Player>,
    obstacles: Vec<Obstacle>,
    hazards: Vec<Hazard>,
    pickups: Vec<Pickup>,
    projectiles: Vec<Projectile>,
    score: u32,
    coins: u32,
    ammo: u32,
    high_score: u32,
    tick_index: u64,
    ids: IdAllocator,
}

impl World {
    /// Creates a world on the start screen using the first configured level.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            banner: WELCOME_BANNER,
            config,
            level: LevelIndex::new(0),
            flow: FlowState::Start,
            player: None,
            obstacles: Vec::new(),
            hazards: Vec::new(),
            pickups: Vec::new(),
            projectiles: Vec::new(),
            score: 0,
            coins: 0,
            ammo: 0,
            high_score: 0,
            tick_index: 0,
            ids: IdAllocator::default(),
        }
    }

    /// Seeds the best score recorded by earlier runs.
    #[must_use]
    pub fn with_high_score(mut self, high_score: u32) -> Self {
        self.high_score = high_score;
        self
    }

    fn active_level(&self) -> Option<&LevelConfig> {
        self.config.level(self.level)
    }

    fn screen_width(&self) -> f32 {
        self.config.screen_width as f32
    }

    fn screen_height(&self) -> f32 {
        self.config.screen_height as f32
    }

    fn transition(&mut self, trigger: FlowTrigger, out_events: &mut Vec<Event>) -> bool {
        match self.flow.transition(trigger) {
            Ok(next) => {
                out_events.push(Event::FlowChanged {
                    from: self.flow,
                    to: next,
                });
                self.flow = next;
                true
            }
            Err(reason) => {
                out_events.push(Event::TransitionRejected { trigger, reason });
                false
            }
        }
    }

    fn begin_session(&mut self, trigger: FlowTrigger, out_events: &mut Vec<Event>) {
        if self.flow != FlowState::Playing && self.active_level().is_none() {
            out_events.push(Event::LevelSelectionRejected {
                level: self.level,
                reason: LevelSelectionError::UnknownLevel,
            });
            return;
        }

        if !self.transition(trigger, out_events) {
            return;
        }

        let spawn = Position::new(
            (self.screen_width() / 4.0).floor(),
            (self.screen_height() / 2.0).floor(),
        );
        self.player = Some(Player::new(spawn, self.config.player_size as f32));
        self.obstacles.clear();
        self.hazards.clear();
        self.pickups.clear();
        self.projectiles.clear();
        self.score = 0;
        self.coins = 0;
        self.ammo = 0;
        self.tick_index = 0;

        out_events.push(Event::SessionStarted { level: self.level });
    }

    fn end_session(&mut self, cause: TerminalCause, out_events: &mut Vec<Event>) {
        if !self.transition(FlowTrigger::Terminate, out_events) {
            return;
        }

        out_events.push(Event::SessionEnded {
            cause,
            score: self.score,
        });

        if self.score > self.high_score {
            self.high_score = self.score;
            out_events.push(Event::HighScoreBeaten { score: self.score });
        }
    }

    fn select_level(&mut self, level: LevelIndex, out_events: &mut Vec<Event>) {
        let rejection = if self.flow == FlowState::Playing {
            Some(LevelSelectionError::SessionActive)
        } else if self.config.level(level).is_none() {
            Some(LevelSelectionError::UnknownLevel)
        } else {
            None
        };

        match rejection {
            Some(reason) => out_events.push(Event::LevelSelectionRejected { level, reason }),
            None => {
                self.level = level;
                out_events.push(Event::LevelSelected { level });
            }
        }
    }

    fn shoot(&mut self, out_events: &mut Vec<Event>) {
        if self.flow != FlowState::Playing {
            out_events.push(Event::ShotRejected {
                reason: ShootError::NotPlaying,
            });
            return;
        }

        if self.ammo == 0 {
            out_events.push(Event::ShotRejected {
                reason: ShootError::OutOfAmmo,
            });
            return;
        }

        let Some(boost_strength) = self.active_level().map(|level| level.boost_strength) else {
            return;
        };
        let Some(player) = self.player.as_mut() else {
            return;
        };

        player.shoot_recoil(boost_strength);
        let origin = player.position();
        let offset = (player.size() / 2.0).floor();
        self.ammo -= 1;

        let id = self.ids.projectile();
        self.projectiles.push(Projectile {
            id,
            position: origin.translated(offset, 0.0),
            size: self.config.power_up_size as f32,
            motion: Motion::projectile(),
        });
        out_events.push(Event::ProjectileFired {
            projectile: id,
            ammo: self.ammo,
        });
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        let Some(level) = self.active_level() else {
            return;
        };
        let gravity = level.gravity;
        let scroll_speed = level.obstacle_speed;
        let screen_width = self.screen_width();

        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        if let Some(player) = self.player.as_mut() {
            player.step(gravity);
        }

        for obstacle in &mut self.obstacles {
            obstacle.pair.advance(scroll_speed);
        }
        self.obstacles.retain(|obstacle| {
            let keep = !obstacle.pair.is_offscreen();
            if !keep {
                out_events.push(Event::ObstacleDespawned {
                    obstacle: obstacle.id,
                });
            }
            keep
        });

        for hazard in &mut self.hazards {
            hazard.position = hazard.motion.step(hazard.position);
        }
        self.hazards.retain(|hazard| {
            let keep = hazard.position.x() + hazard.size >= 0.0;
            if !keep {
                out_events.push(Event::HazardDespawned { hazard: hazard.id });
            }
            keep
        });

        self.pickups.retain(|pickup| !pickup.collected);
        for pickup in &mut self.pickups {
            pickup.position = pickup.motion.step(pickup.position);
        }
        self.pickups.retain(|pickup| {
            let keep = pickup.position.x() + pickup.size >= 0.0;
            if !keep {
                out_events.push(Event::PickupDespawned { pickup: pickup.id });
            }
            keep
        });

        for projectile in &mut self.projectiles {
            projectile.position = projectile.motion.step(projectile.position);
        }
        self.projectiles.retain(|projectile| {
            let keep = projectile.position.x() - projectile.size <= screen_width;
            if !keep {
                out_events.push(Event::ProjectileDespawned {
                    projectile: projectile.id,
                });
            }
            keep
        });
    }

    fn spawn_hazard(&mut self, y: f32, out_events: &mut Vec<Event>) {
        let Some(speed) = self.active_level().map(|level| level.hazard_speed) else {
            return;
        };
        let id = self.ids.hazard();
        self.hazards.push(Hazard {
            id,
            position: Position::new(self.screen_width(), y),
            size: self.config.hazard_size as f32,
            motion: Motion::hazard(speed),
        });
        out_events.push(Event::HazardSpawned { hazard: id });
    }

    fn spawn_pickups(
        &mut self,
        kind: PickupKind,
        positions: Vec<Position>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(speed) = self.active_level().map(|level| level.obstacle_speed) else {
            return;
        };
        let size = match kind {
            PickupKind::Coin => self.config.coin_size,
            PickupKind::PowerUp => self.config.power_up_size,
        } as f32;

        for position in positions {
            let id = self.ids.pickup();
            self.pickups.push(Pickup {
                id,
                kind,
                position,
                size,
                motion: Motion::pickup(speed),
                collected: false,
            });
            out_events.push(Event::PickupSpawned { pickup: id, kind });
        }
    }

    fn pass_obstacle(&mut self, obstacle: ObstacleId, out_events: &mut Vec<Event>) {
        let Some(entry) = self.obstacles.iter_mut().find(|entry| entry.id == obstacle) else {
            return;
        };
        if entry.pair.mark_passed() {
            self.score = self.score.saturating_add(OBSTACLE_PASS_REWARD);
            out_events.push(Event::ObstaclePassed {
                obstacle,
                score: self.score,
            });
        }
    }

    fn collect_pickup(&mut self, pickup: PickupId, out_events: &mut Vec<Event>) {
        let Some(entry) = self
            .pickups
            .iter_mut()
            .find(|entry| entry.id == pickup && !entry.collected)
        else {
            return;
        };
        entry.collected = true;
        let kind = entry.kind;

        match kind {
            PickupKind::Coin => {
                self.score = self.score.saturating_add(COIN_REWARD);
                self.coins = self.coins.saturating_add(1);
            }
            PickupKind::PowerUp => {
                self.ammo = self.ammo.saturating_add(1);
            }
        }

        out_events.push(Event::PickupCollected {
            pickup,
            kind,
            score: self.score,
        });
    }

    fn destroy_hazard(
        &mut self,
        hazard: HazardId,
        projectile: ProjectileId,
        out_events: &mut Vec<Event>,
    ) {
        let hazard_index = self.hazards.iter().position(|entry| entry.id == hazard);
        let projectile_index = self
            .projectiles
            .iter()
            .position(|entry| entry.id == projectile);

        if let (Some(hazard_index), Some(projectile_index)) = (hazard_index, projectile_index) {
            let _ = self.hazards.remove(hazard_index);
            let _ = self.projectiles.remove(projectile_index);
            self.score = self.score.saturating_add(HAZARD_REWARD);
            out_events.push(Event::HazardDestroyed {
                hazard,
                projectile,
                score: self.score,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Gameplay commands are ignored unless a session is running; flow and level
/// requests that cannot be honoured produce rejection events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SelectLevel { level } => world.select_level(level, out_events),
        Command::StartSession => world.begin_session(FlowTrigger::Start, out_events),
        Command::RestartSession => world.begin_session(FlowTrigger::Restart, out_events),
        Command::EndSession { cause } => world.end_session(cause, out_events),
        Command::Shoot => world.shoot(out_events),
        _ if world.flow != FlowState::Playing => {}
        Command::Boost => {
            let Some(strength) = world.active_level().map(|level| level.boost_strength) else {
                return;
            };
            if let Some(player) = world.player.as_mut() {
                player.boost(strength);
                out_events.push(Event::PlayerBoosted);
            }
        }
        Command::Tick => world.tick(out_events),
        Command::SpawnObstacle { obstacle } => {
            let id = world.ids.obstacle();
            world.obstacles.push(Obstacle { id, pair: obstacle });
            out_events.push(Event::ObstacleSpawned { obstacle: id });
        }
        Command::SpawnHazard { y } => world.spawn_hazard(y, out_events),
        Command::SpawnPickups { kind, positions } => world.spawn_pickups(kind, positions, out_events),
        Command::PassObstacle { obstacle } => world.pass_obstacle(obstacle, out_events),
        Command::CollectPickup { pickup } => world.collect_pickup(pickup, out_events),
        Command::DestroyHazard { hazard, projectile } => {
            world.destroy_hazard(hazard, projectile, out_events)
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use sky_dash_core::{
        FlowState, GameConfig, HazardSnapshot, LevelConfig, ObstacleSnapshot, PickupSnapshot,
        PlayerSnapshot, PlayfieldView, ProjectileSnapshot, SessionSnapshot,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the configuration the world runs with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Level used by the running or next session.
    #[must_use]
    pub fn active_level(world: &World) -> Option<&LevelConfig> {
        world.active_level()
    }

    /// Current state of the game flow.
    #[must_use]
    pub fn flow_state(world: &World) -> FlowState {
        world.flow
    }

    /// Captures the counters describing the current session.
    #[must_use]
    pub fn session(world: &World) -> SessionSnapshot {
        SessionSnapshot {
            flow: world.flow,
            level: world.level,
            score: world.score,
            coins: world.coins,
            ammo: world.ammo,
            high_score: world.high_score,
            tick: world.tick_index,
        }
    }

    /// Captures the player, if a session has been started.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot> {
        world.player.map(|player| PlayerSnapshot {
            position: player.position(),
            size: player.size(),
            velocity_y: player.velocity_y(),
            motion_enabled: player.motion_enabled(),
        })
    }

    /// Captures every entity in the playfield in spawn order.
    #[must_use]
    pub fn playfield(world: &World) -> PlayfieldView {
        PlayfieldView {
            player: player(world),
            obstacles: world
                .obstacles
                .iter()
                .map(|obstacle| ObstacleSnapshot {
                    id: obstacle.id,
                    pair: obstacle.pair,
                })
                .collect(),
            hazards: world
                .hazards
                .iter()
                .map(|hazard| HazardSnapshot {
                    id: hazard.id,
                    position: hazard.position,
                    size: hazard.size,
                })
                .collect(),
            pickups: world
                .pickups
                .iter()
                .map(|pickup| PickupSnapshot {
                    id: pickup.id,
                    kind: pickup.kind,
                    position: pickup.position,
                    size: pickup.size,
                    collected: pickup.collected,
                })
                .collect(),
            projectiles: world
                .projectiles
                .iter()
                .map(|projectile| ProjectileSnapshot {
                    id: projectile.id,
                    position: projectile.position,
                    size: projectile.size,
                })
                .collect(),
            screen_width: world.screen_width(),
            screen_height: world.screen_height(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Obstacle {
    id: ObstacleId,
    pair: ObstaclePair,
}

#[derive(Clone, Copy, Debug)]
struct Hazard {
    id: HazardId,
    position: Position,
    size: f32,
    motion: Motion,
}

#[derive(Clone, Copy, Debug)]
struct Pickup {
    id: PickupId,
    kind: PickupKind,
    position: Position,
    size: f32,
    motion: Motion,
    collected: bool,
}

#[derive(Clone, Copy, Debug)]
struct Projectile {
    id: ProjectileId,
    position: Position,
    size: f32,
    motion: Motion,
}

#[derive(Debug, Default)]
struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    fn bump(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }

    fn obstacle(&mut self) -> ObstacleId {
        ObstacleId::new(self.bump())
    }

    fn hazard(&mut self) -> HazardId {
        HazardId::new(self.bump())
    }

    fn pickup(&mut self) -> PickupId {
        PickupId::new(self.bump())
    }

    fn projectile(&mut self) -> ProjectileId {
        ProjectileId::new(self.bump())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_dash_core::TransitionError;

    fn playing_world() -> World {
        let mut world = World::new(GameConfig::default());
        let mut events = Vec::new();
        apply(&mut world, Command::StartSession, &mut events);
        assert_eq!(query::flow_state(&world), FlowState::Playing);
        world
    }

    #[test]
    fn start_session_places_player_at_spawn_point() {
        let world = playing_world();
        let player = query::player(&world).expect("player exists while playing");

        assert_eq!(player.position, Position::new(200.0, 300.0));
        assert!(!player.motion_enabled);
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn start_session_emits_flow_change_then_session_started() {
        let mut world = World::new(GameConfig::default());
        let mut events = Vec::new();
        apply(&mut world, Command::StartSession, &mut events);

        assert_eq!(
            events,
            vec![
                Event::FlowChanged {
                    from: FlowState::Start,
                    to: FlowState::Playing,
                },
                Event::SessionStarted {
                    level: LevelIndex::new(0),
                },
            ]
        );
    }

    #[test]
    fn restart_is_rejected_from_start_screen() {
        let mut world = World::new(GameConfig::default());
        let mut events = Vec::new();
        apply(&mut world, Command::RestartSession, &mut events);

        assert_eq!(
            events,
            vec![Event::TransitionRejected {
                trigger: FlowTrigger::Restart,
                reason: TransitionError::NothingToRestart,
            }]
        );
        assert_eq!(query::flow_state(&world), FlowState::Start);
    }

    #[test]
    fn tick_is_ignored_outside_a_session() {
        let mut world = World::new(GameConfig::default());
        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);

        assert!(events.is_empty());
        assert_eq!(query::session(&world).tick, 0);
    }

    #[test]
    fn level_cannot_change_mid_session() {
        let mut world = playing_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SelectLevel {
                level: LevelIndex::new(2),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::LevelSelectionRejected {
                level: LevelIndex::new(2),
                reason: LevelSelectionError::SessionActive,
            }]
        );
        assert_eq!(query::session(&world).level, LevelIndex::new(0));
    }

    #[test]
    fn unknown_level_is_rejected() {
        let mut world = World::new(GameConfig::default());
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SelectLevel {
                level: LevelIndex::new(9),
            },
            &mut events,
        );

        assert!(matches!(
            events.as_slice(),
            [Event::LevelSelectionRejected {
                reason: LevelSelectionError::UnknownLevel,
                ..
            }]
        ));
    }

    #[test]
    fn shoot_without_ammo_is_rejected() {
        let mut world = playing_world();
        let mut events = Vec::new();
        apply(&mut world, Command::Shoot, &mut events);

        assert_eq!(
            events,
            vec![Event::ShotRejected {
                reason: ShootError::OutOfAmmo,
            }]
        );
        assert!(query::playfield(&world).projectiles.is_empty());
    }

    #[test]
    fn power_up_grants_a_shot() {
        let mut world = playing_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnPickups {
                kind: PickupKind::PowerUp,
                positions: vec![Position::new(400.0, 300.0)],
            },
            &mut events,
        );
        let pickup = query::playfield(&world).pickups[0].id;
        apply(&mut world, Command::CollectPickup { pickup }, &mut events);
        assert_eq!(query::session(&world).ammo, 1);

        events.clear();
        apply(&mut world, Command::Shoot, &mut events);

        let view = query::playfield(&world);
        assert_eq!(view.projectiles.len(), 1);
        assert_eq!(view.projectiles[0].position, Position::new(220.0, 300.0));
        assert_eq!(query::session(&world).ammo, 0);
        assert!(view.player.expect("player").motion_enabled);
        assert!(matches!(
            events.as_slice(),
            [Event::ProjectileFired { ammo: 0, .. }]
        ));
    }

    #[test]
    fn collected_pickup_is_removed_on_next_tick() {
        let mut world = playing_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnPickups {
                kind: PickupKind::Coin,
                positions: vec![Position::new(400.0, 300.0)],
            },
            &mut events,
        );
        let pickup = query::playfield(&world).pickups[0].id;
        apply(&mut world, Command::CollectPickup { pickup }, &mut events);
        apply(&mut world, Command::CollectPickup { pickup }, &mut events);

        let session = query::session(&world);
        assert_eq!(session.score, 5);
        assert_eq!(session.coins, 1);
        assert!(query::playfield(&world).pickups[0].collected);

        apply(&mut world, Command::Tick, &mut events);
        assert!(query::playfield(&world).pickups.is_empty());
    }

    #[test]
    fn obstacle_pass_scores_once() {
        let mut world = playing_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnObstacle {
                obstacle: ObstaclePair::new(50.0, 80.0, 200.0, 400.0, 600.0),
            },
            &mut events,
        );
        let obstacle = query::playfield(&world).obstacles[0].id;

        apply(&mut world, Command::PassObstacle { obstacle }, &mut events);
        apply(&mut world, Command::PassObstacle { obstacle }, &mut events);

        assert_eq!(query::session(&world).score, 1);
        assert!(query::playfield(&world).obstacles[0].pair.passed());
    }

    #[test]
    fn destroying_a_hazard_removes_both_entities() {
        let mut world = playing_world();
        let mut events = Vec::new();
        apply(&mut world, Command::SpawnHazard { y: 300.0 }, &mut events);
        world.ammo = 1;
        apply(&mut world, Command::Shoot, &mut events);

        let view = query::playfield(&world);
        let hazard = view.hazards[0].id;
        let projectile = view.projectiles[0].id;
        apply(
            &mut world,
            Command::DestroyHazard { hazard, projectile },
            &mut events,
        );

        let view = query::playfield(&world);
        assert!(view.hazards.is_empty());
        assert!(view.projectiles.is_empty());
        assert_eq!(query::session(&world).score, 10);
    }

    #[test]
    fn tick_despawns_entities_that_leave_the_screen() {
        let mut world = playing_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnObstacle {
                obstacle: ObstaclePair::new(-78.0, 80.0, 200.0, 400.0, 600.0),
            },
            &mut events,
        );
        let obstacle = query::playfield(&world).obstacles[0].id;

        events.clear();
        apply(&mut world, Command::Tick, &mut events);

        assert_eq!(events[0], Event::TimeAdvanced { tick: 1 });
        assert!(events.contains(&Event::ObstacleDespawned { obstacle }));
        assert!(query::playfield(&world).obstacles.is_empty());
    }

    #[test]
    fn ending_a_session_records_a_strictly_higher_score() {
        let mut world = playing_world().with_high_score(5);
        world.score = 5;
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::EndSession {
                cause: TerminalCause::Obstacle,
            },
            &mut events,
        );
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::HighScoreBeaten { .. })));

        apply(&mut world, Command::RestartSession, &mut events);
        world.score = 6;
        events.clear();
        apply(
            &mut world,
            Command::EndSession {
                cause: TerminalCause::Hazard,
            },
            &mut events,
        );
        assert!(events.contains(&Event::HighScoreBeaten { score: 6 }));
        assert_eq!(query::session(&world).high_score, 6);
    }

    #[test]
    fn restart_resets_session_counters_and_entities() {
        let mut world = playing_world();
        let mut events = Vec::new();
        apply(&mut world, Command::SpawnHazard { y: 200.0 }, &mut events);
        apply(
            &mut world,
            Command::SpawnObstacle {
                obstacle: ObstaclePair::new(600.0, 80.0, 200.0, 400.0, 600.0),
            },
            &mut events,
        );
        world.score = 12;
        world.coins = 2;
        world.ammo = 3;
        apply(
            &mut world,
            Command::EndSession {
                cause: TerminalCause::OutOfBounds,
            },
            &mut events,
        );
        apply(&mut world, Command::RestartSession, &mut events);

        let session = query::session(&world);
        assert_eq!(session.score, 0);
        assert_eq!(session.coins, 0);
        assert_eq!(session.ammo, 0);
        assert_eq!(session.high_score, 12);
        let view = query::playfield(&world);
        assert!(view.obstacles.is_empty());
        assert!(view.hazards.is_empty());
        assert!(!view.player.expect("player").motion_enabled);
    }
}

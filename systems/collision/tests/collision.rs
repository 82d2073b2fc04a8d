use sky_dash_core::{
    Command, Event, FlowState, GameConfig, HazardId, HazardSnapshot, ObstacleId, ObstaclePair,
    ObstacleSnapshot, PickupKind, PlayerSnapshot, PlayfieldView, Position, ProjectileId,
    ProjectileSnapshot, TerminalCause,
};
use sky_dash_system_collision::{detect, Collision};
use sky_dash_world::{self as world, query, World};

fn player_at(x: f32, y: f32) -> PlayerSnapshot {
    PlayerSnapshot {
        position: Position::new(x, y),
        size: 40.0,
        velocity_y: 0.0,
        motion_enabled: true,
    }
}

fn view(player: PlayerSnapshot) -> PlayfieldView {
    PlayfieldView {
        player: Some(player),
        screen_width: 800.0,
        screen_height: 600.0,
        ..PlayfieldView::default()
    }
}

fn hazard(id: u32, x: f32, y: f32) -> HazardSnapshot {
    HazardSnapshot {
        id: HazardId::new(id),
        position: Position::new(x, y),
        size: 40.0,
    }
}

fn projectile(id: u32, x: f32, y: f32) -> ProjectileSnapshot {
    ProjectileSnapshot {
        id: ProjectileId::new(id),
        position: Position::new(x, y),
        size: 40.0,
    }
}

#[test]
fn leaving_the_screen_ends_the_session_before_other_checks() {
    let mut playfield = view(player_at(200.0, -1.0));
    playfield.hazards.push(hazard(0, 200.0, 0.0));
    let mut commands = Vec::new();

    detect(&playfield, &mut commands);

    assert_eq!(
        commands,
        vec![Command::EndSession {
            cause: TerminalCause::OutOfBounds,
        }]
    );
}

#[test]
fn touching_a_segment_ends_the_session() {
    let mut playfield = view(player_at(200.0, 150.0));
    playfield.obstacles.push(ObstacleSnapshot {
        id: ObstacleId::new(0),
        pair: ObstaclePair::new(190.0, 80.0, 160.0, 400.0, 600.0),
    });
    let mut commands = Vec::new();

    detect(&playfield, &mut commands);

    assert_eq!(
        commands,
        vec![Command::EndSession {
            cause: TerminalCause::Obstacle,
        }]
    );
}

#[test]
fn passed_obstacles_are_credited_before_hazard_hits() {
    let mut playfield = view(player_at(200.0, 300.0));
    playfield.obstacles.push(ObstacleSnapshot {
        id: ObstacleId::new(4),
        pair: ObstaclePair::new(100.0, 80.0, 200.0, 400.0, 600.0),
    });
    playfield.hazards.push(hazard(1, 210.0, 300.0));
    let mut commands = Vec::new();

    detect(&playfield, &mut commands);

    assert_eq!(
        commands,
        vec![
            Command::PassObstacle {
                obstacle: ObstacleId::new(4),
            },
            Command::EndSession {
                cause: TerminalCause::Hazard,
            },
        ]
    );
}

#[test]
fn each_hazard_is_claimed_by_one_projectile() {
    let mut playfield = view(player_at(200.0, 300.0));
    playfield.hazards.push(hazard(1, 600.0, 100.0));
    playfield.projectiles.push(projectile(2, 590.0, 100.0));
    playfield.projectiles.push(projectile(3, 610.0, 100.0));
    let mut commands = Vec::new();

    detect(&playfield, &mut commands);

    assert_eq!(
        commands,
        vec![Command::DestroyHazard {
            hazard: HazardId::new(1),
            projectile: ProjectileId::new(2),
        }]
    );
}

#[test]
fn falling_out_of_bounds_ends_the_session_on_the_same_tick() {
    let mut world = World::new(GameConfig::default());
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartSession, &mut events);
    world::apply(&mut world, Command::Boost, &mut events);
    let mut collision = Collision::new();

    let mut ended_on = None;
    for _ in 0..600 {
        events.clear();
        world::apply(&mut world, Command::Tick, &mut events);
        let tick = query::session(&world).tick;

        let mut commands = Vec::new();
        collision.handle(&events, &query::playfield(&world), &mut commands);
        let out_of_bounds = commands.contains(&Command::EndSession {
            cause: TerminalCause::OutOfBounds,
        });
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }

        if out_of_bounds {
            let player = query::player(&world).expect("player");
            assert!(player.position.y() > 600.0);
            ended_on = Some(tick);
            break;
        }
    }

    assert!(ended_on.is_some(), "player should fall out of the screen");
    assert_eq!(query::flow_state(&world), FlowState::GameOver);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::SessionEnded {
            cause: TerminalCause::OutOfBounds,
            ..
        }
    )));
}

#[test]
fn obstacle_pass_is_scored_exactly_once() {
    let mut world = World::new(GameConfig::default());
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartSession, &mut events);
    world::apply(
        &mut world,
        Command::SpawnObstacle {
            obstacle: ObstaclePair::new(110.0, 80.0, 200.0, 420.0, 600.0),
        },
        &mut events,
    );
    let mut collision = Collision::new();

    for _ in 0..20 {
        events.clear();
        world::apply(&mut world, Command::Tick, &mut events);
        let mut commands = Vec::new();
        collision.handle(&events, &query::playfield(&world), &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
    }

    assert_eq!(query::session(&world).score, 1);
    assert_eq!(query::flow_state(&world), FlowState::Playing);
}

#[test]
fn touching_a_coin_collects_it_once() {
    let mut world = World::new(GameConfig::default());
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartSession, &mut events);
    world::apply(
        &mut world,
        Command::SpawnPickups {
            kind: PickupKind::Coin,
            positions: vec![Position::new(225.0, 300.0)],
        },
        &mut events,
    );
    let mut collision = Collision::new();

    for _ in 0..5 {
        events.clear();
        world::apply(&mut world, Command::Tick, &mut events);
        let mut commands = Vec::new();
        collision.handle(&events, &query::playfield(&world), &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
    }

    let session = query::session(&world);
    assert_eq!(session.score, 5);
    assert_eq!(session.coins, 1);
    assert!(query::playfield(&world).pickups.is_empty());
}

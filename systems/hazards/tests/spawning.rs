use sky_dash_core::{Command, Event, GameConfig, LevelIndex};
use sky_dash_system_hazards::{Config, HazardSpawning, SPAWN_EDGE_MARGIN};
use sky_dash_world::{self as world, query, World};

fn ticks(count: u64) -> Vec<Event> {
    (1..=count).map(|tick| Event::TimeAdvanced { tick }).collect()
}

#[test]
fn spawns_once_per_interval() {
    let config = GameConfig::default();
    let level = config.level(LevelIndex::new(0)).expect("level").clone();
    let mut spawning = HazardSpawning::new(Config::new(config.screen_height, 0x1234_5678));
    let mut commands = Vec::new();

    let interval = u64::from(level.hazard_spawn_interval);
    spawning.handle(&ticks(interval * 3), &level, &mut commands);

    assert_eq!(commands.len(), 3, "expected one spawn per interval");
    for command in &commands {
        match command {
            Command::SpawnHazard { y } => {
                assert!(*y >= SPAWN_EDGE_MARGIN as f32);
                assert!(*y <= (config.screen_height - SPAWN_EDGE_MARGIN) as f32);
            }
            other => panic!("unexpected command emitted: {other:?}"),
        }
    }
}

#[test]
fn session_start_resets_the_timer() {
    let config = GameConfig::default();
    let level = config.level(LevelIndex::new(2)).expect("level").clone();
    let mut spawning = HazardSpawning::new(Config::new(config.screen_height, 7));
    let interval = u64::from(level.hazard_spawn_interval);
    let mut commands = Vec::new();

    spawning.handle(&ticks(interval - 1), &level, &mut commands);
    assert!(commands.is_empty(), "no spawn before full interval");

    spawning.handle(
        &[Event::SessionStarted {
            level: LevelIndex::new(2),
        }],
        &level,
        &mut commands,
    );
    spawning.handle(&ticks(1), &level, &mut commands);
    assert!(commands.is_empty(), "timer restarted with the session");

    spawning.handle(&ticks(interval - 1), &level, &mut commands);
    assert_eq!(commands.len(), 1);
}

#[test]
fn spawned_hazards_enter_at_the_right_edge() {
    let mut world = World::new(GameConfig::default());
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartSession, &mut events);
    let level = query::active_level(&world).expect("level").clone();
    let mut spawning = HazardSpawning::new(Config::new(600, 11));

    let mut spawned = false;
    for _ in 0..level.hazard_spawn_interval {
        events.clear();
        world::apply(&mut world, Command::Tick, &mut events);
        let mut commands = Vec::new();
        spawning.handle(&events, &level, &mut commands);
        for command in commands {
            spawned = true;
            world::apply(&mut world, command, &mut events);
        }
    }

    assert!(spawned);
    let view = query::playfield(&world);
    assert_eq!(view.hazards.len(), 1);
    assert_eq!(view.hazards[0].position.x(), 800.0);
    assert_eq!(view.hazards[0].size, 40.0);
}

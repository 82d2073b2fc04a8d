use sky_dash_core::{
    Command, Event, FlowState, FlowTrigger, GameConfig, LevelIndex, LevelSelectionError,
    TerminalCause, TransitionError,
};
use sky_dash_system_flow::{GameFlow, PlayerAction};
use sky_dash_world::{self as world, query, World};

fn drive(world: &mut World, flow: &mut GameFlow, actions: &[PlayerAction]) -> Vec<Event> {
    let mut commands = Vec::new();
    flow.handle(actions, query::flow_state(world), &mut commands);
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn full_cycle_start_play_game_over_restart() {
    let mut world = World::new(GameConfig::default());
    let mut flow = GameFlow::new();

    let events = drive(&mut world, &mut flow, &[PlayerAction::Boost]);
    assert!(events.contains(&Event::SessionStarted {
        level: LevelIndex::new(0),
    }));
    assert_eq!(query::flow_state(&world), FlowState::Playing);

    let events = drive(&mut world, &mut flow, &[PlayerAction::Boost]);
    assert_eq!(events, vec![Event::PlayerBoosted]);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::EndSession {
            cause: TerminalCause::Obstacle,
        },
        &mut events,
    );
    assert_eq!(query::flow_state(&world), FlowState::GameOver);

    let events = drive(&mut world, &mut flow, &[PlayerAction::Confirm]);
    assert!(events.contains(&Event::FlowChanged {
        from: FlowState::GameOver,
        to: FlowState::Playing,
    }));
    assert_eq!(query::flow_state(&world), FlowState::Playing);
}

#[test]
fn explicit_start_from_game_over_is_rejected_with_reason() {
    let mut world = World::new(GameConfig::default());
    let mut flow = GameFlow::new();
    let _ = drive(&mut world, &mut flow, &[PlayerAction::Start]);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::EndSession {
            cause: TerminalCause::Hazard,
        },
        &mut events,
    );

    let events = drive(&mut world, &mut flow, &[PlayerAction::Start]);

    assert_eq!(
        events,
        vec![Event::TransitionRejected {
            trigger: FlowTrigger::Start,
            reason: TransitionError::AwaitingRestart,
        }]
    );
}

#[test]
fn level_selection_only_applies_outside_a_session() {
    let mut world = World::new(GameConfig::default());
    let mut flow = GameFlow::new();

    let events = drive(
        &mut world,
        &mut flow,
        &[PlayerAction::SelectLevel(LevelIndex::new(1))],
    );
    assert_eq!(
        events,
        vec![Event::LevelSelected {
            level: LevelIndex::new(1),
        }]
    );

    let _ = drive(&mut world, &mut flow, &[PlayerAction::Boost]);
    let events = drive(
        &mut world,
        &mut flow,
        &[PlayerAction::SelectLevel(LevelIndex::new(2))],
    );
    assert_eq!(
        events,
        vec![Event::LevelSelectionRejected {
            level: LevelIndex::new(2),
            reason: LevelSelectionError::SessionActive,
        }]
    );
    assert_eq!(query::session(&world).level, LevelIndex::new(1));
}

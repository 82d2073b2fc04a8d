#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Translates player actions into flow and gameplay commands.

use sky_dash_core::{Command, FlowState, FlowTrigger, LevelIndex};

/// Discrete actions produced by input adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    /// Primary action: starts, boosts or restarts depending on the flow state.
    Boost,
    /// Fires a projectile while playing.
    Shoot,
    /// Starts from the title screen or restarts from the game-over screen.
    Confirm,
    /// Explicit request to leave the title screen.
    Start,
    /// Explicit request to leave the game-over screen.
    Restart,
    /// Chooses the level for the next session.
    SelectLevel(LevelIndex),
}

/// Pure system mapping player actions onto commands for the current flow state.
#[derive(Debug, Default)]
pub struct GameFlow;

impl GameFlow {
    /// Creates a new flow system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits one command per meaningful action.
    ///
    /// Explicit start, restart and level requests are forwarded unchanged so
    /// the world can reject them with a reason.
    pub fn handle(&mut self, actions: &[PlayerAction], flow: FlowState, out: &mut Vec<Command>) {
        let mut flow = flow;
        for action in actions {
            let command = match (*action, flow) {
                (PlayerAction::Boost | PlayerAction::Confirm, FlowState::Start) => {
                    Some(Command::StartSession)
                }
                (PlayerAction::Boost | PlayerAction::Confirm, FlowState::GameOver) => {
                    Some(Command::RestartSession)
                }
                (PlayerAction::Boost, FlowState::Playing) => Some(Command::Boost),
                (PlayerAction::Confirm, FlowState::Playing) => None,
                (PlayerAction::Shoot, FlowState::Playing) => Some(Command::Shoot),
                (PlayerAction::Shoot, _) => None,
                (PlayerAction::Start, _) => Some(Command::StartSession),
                (PlayerAction::Restart, _) => Some(Command::RestartSession),
                (PlayerAction::SelectLevel(level), _) => Some(Command::SelectLevel { level }),
            };

            if let Some(command) = command {
                flow = predicted(flow, &command);
                out.push(command);
            }
        }
    }
}

fn predicted(flow: FlowState, command: &Command) -> FlowState {
    let trigger = match command {
        Command::StartSession => FlowTrigger::Start,
        Command::RestartSession => FlowTrigger::Restart,
        _ => return flow,
    };
    flow.transition(trigger).unwrap_or(flow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boost_follows_the_flow_state() {
        let mut flow = GameFlow::new();
        let mut commands = Vec::new();

        flow.handle(&[PlayerAction::Boost], FlowState::Start, &mut commands);
        flow.handle(&[PlayerAction::Boost], FlowState::Playing, &mut commands);
        flow.handle(&[PlayerAction::Boost], FlowState::GameOver, &mut commands);

        assert_eq!(
            commands,
            vec![
                Command::StartSession,
                Command::Boost,
                Command::RestartSession
            ]
        );
    }

    #[test]
    fn second_boost_in_the_same_frame_boosts_the_new_session() {
        let mut flow = GameFlow::new();
        let mut commands = Vec::new();

        flow.handle(
            &[PlayerAction::Boost, PlayerAction::Boost],
            FlowState::Start,
            &mut commands,
        );

        assert_eq!(commands, vec![Command::StartSession, Command::Boost]);
    }

    #[test]
    fn shooting_outside_a_session_is_dropped() {
        let mut flow = GameFlow::new();
        let mut commands = Vec::new();
        flow.handle(&[PlayerAction::Shoot], FlowState::GameOver, &mut commands);
        assert!(commands.is_empty());
    }
}

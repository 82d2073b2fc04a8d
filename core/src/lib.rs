#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Sky Dash engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

mod config;
mod entity;
mod geometry;

pub use config::{GameConfig, LevelConfig, LevelIndex};
pub use entity::{
    Bob, GapInterval, Motion, ObstaclePair, Player, HAZARD_BOB_AMPLITUDE, HAZARD_BOB_STEP,
    PICKUP_BOB_AMPLITUDE, PICKUP_BOB_STEP, PROJECTILE_SPEED, SHOOT_BOOST_DAMPING,
    SHOOT_BOOST_FACTOR,
};
pub use geometry::{Position, Rect};

use serde::{Deserialize, Serialize};

/// Canonical banner shown on the start screen.
pub const WELCOME_BANNER: &str = "Sky Dash";

/// Fixed simulation rate.
pub const TICKS_PER_SECOND: u32 = 60;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Selects the difficulty level used by the next session.
    SelectLevel {
        /// Index into the configured level list.
        level: LevelIndex,
    },
    /// Leaves the start screen and begins a session.
    StartSession,
    /// Begins a fresh session from the game-over screen.
    RestartSession,
    /// Gives the player an upward boost and enables gravity.
    Boost,
    /// Fires a projectile, consuming one unit of ammo.
    Shoot,
    /// Advances every entity by one fixed tick.
    Tick,
    /// Adds an obstacle pair produced by the obstacle generator.
    SpawnObstacle {
        /// Geometry of the new pair.
        obstacle: ObstaclePair,
    },
    /// Adds a hazard entering at the right edge of the playfield.
    SpawnHazard {
        /// Vertical centre of the new hazard.
        y: f32,
    },
    /// Adds pickups chosen by the placement planner.
    SpawnPickups {
        /// Kind shared by every spawned pickup.
        kind: PickupKind,
        /// Centre of each pickup.
        positions: Vec<Position>,
    },
    /// Credits the player for clearing an obstacle pair.
    PassObstacle {
        /// Obstacle whose trailing edge crossed the player.
        obstacle: ObstacleId,
    },
    /// Collects a pickup touched by the player.
    CollectPickup {
        /// Pickup that was touched.
        pickup: PickupId,
    },
    /// Removes a hazard struck by a projectile along with the projectile.
    DestroyHazard {
        /// Hazard that was struck.
        hazard: HazardId,
        /// Projectile that struck it.
        projectile: ProjectileId,
    },
    /// Ends the running session.
    EndSession {
        /// Reason the session ended.
        cause: TerminalCause,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms the level used by the next session.
    LevelSelected {
        /// Level that became active.
        level: LevelIndex,
    },
    /// Reports that a level selection was refused.
    LevelSelectionRejected {
        /// Level that was requested.
        level: LevelIndex,
        /// Specific reason the request failed.
        reason: LevelSelectionError,
    },
    /// Announces that the flow moved to a new state.
    FlowChanged {
        /// State that was left.
        from: FlowState,
        /// State that became active.
        to: FlowState,
    },
    /// Reports that a flow transition was refused.
    TransitionRejected {
        /// Trigger that was requested.
        trigger: FlowTrigger,
        /// Specific reason the request failed.
        reason: TransitionError,
    },
    /// Confirms that a fresh session began with all counters reset.
    SessionStarted {
        /// Level the session runs with.
        level: LevelIndex,
    },
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// Number of ticks elapsed in the session, including this one.
        tick: u64,
    },
    /// Confirms that the player boosted.
    PlayerBoosted,
    /// Confirms that a projectile was fired.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Ammo left after firing.
        ammo: u32,
    },
    /// Reports that a shot request was refused.
    ShotRejected {
        /// Specific reason the shot failed.
        reason: ShootError,
    },
    /// Confirms that an obstacle pair entered the playfield.
    ObstacleSpawned {
        /// Identifier assigned to the pair.
        obstacle: ObstacleId,
    },
    /// Confirms that an obstacle pair left the playfield.
    ObstacleDespawned {
        /// Identifier of the removed pair.
        obstacle: ObstacleId,
    },
    /// Confirms that a hazard entered the playfield.
    HazardSpawned {
        /// Identifier assigned to the hazard.
        hazard: HazardId,
    },
    /// Confirms that a hazard left the playfield without being destroyed.
    HazardDespawned {
        /// Identifier of the removed hazard.
        hazard: HazardId,
    },
    /// Confirms that a pickup entered the playfield.
    PickupSpawned {
        /// Identifier assigned to the pickup.
        pickup: PickupId,
        /// Kind of pickup.
        kind: PickupKind,
    },
    /// Confirms that a pickup left the playfield uncollected.
    PickupDespawned {
        /// Identifier of the removed pickup.
        pickup: PickupId,
    },
    /// Confirms that a projectile left the playfield without hitting anything.
    ProjectileDespawned {
        /// Identifier of the removed projectile.
        projectile: ProjectileId,
    },
    /// Confirms that the player cleared an obstacle pair.
    ObstaclePassed {
        /// Obstacle that was cleared.
        obstacle: ObstacleId,
        /// Session score after crediting the pass.
        score: u32,
    },
    /// Confirms that the player collected a pickup.
    PickupCollected {
        /// Pickup that was collected.
        pickup: PickupId,
        /// Kind of pickup.
        kind: PickupKind,
        /// Session score after collection.
        score: u32,
    },
    /// Confirms that a projectile destroyed a hazard.
    HazardDestroyed {
        /// Hazard that was destroyed.
        hazard: HazardId,
        /// Projectile that destroyed it.
        projectile: ProjectileId,
        /// Session score after the bonus.
        score: u32,
    },
    /// Announces that the running session ended.
    SessionEnded {
        /// Reason the session ended.
        cause: TerminalCause,
        /// Final session score.
        score: u32,
    },
    /// Announces that the session score strictly exceeded the stored high score.
    HighScoreBeaten {
        /// New high score.
        score: u32,
    },
}

/// States of the game flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowState {
    /// Title screen awaiting a start action.
    #[default]
    Start,
    /// A session is running.
    Playing,
    /// The last session ended; awaiting a restart action.
    GameOver,
}

impl FlowState {
    /// Resolves the state reached by applying `trigger`.
    ///
    /// `Start -> Playing` on start, `Playing -> GameOver` on termination and
    /// `GameOver -> Playing` on restart. Every other pairing is refused.
    pub const fn transition(self, trigger: FlowTrigger) -> Result<FlowState, TransitionError> {
        match (self, trigger) {
            (Self::Start, FlowTrigger::Start) => Ok(Self::Playing),
            (Self::GameOver, FlowTrigger::Restart) => Ok(Self::Playing),
            (Self::Playing, FlowTrigger::Terminate) => Ok(Self::GameOver),
            (Self::Playing, FlowTrigger::Start | FlowTrigger::Restart) => {
                Err(TransitionError::AlreadyPlaying)
            }
            (Self::Start | Self::GameOver, FlowTrigger::Terminate) => {
                Err(TransitionError::NotPlaying)
            }
            (Self::Start, FlowTrigger::Restart) => Err(TransitionError::NothingToRestart),
            (Self::GameOver, FlowTrigger::Start) => Err(TransitionError::AwaitingRestart),
        }
    }
}

/// Requests that move the game flow between states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowTrigger {
    /// Leave the start screen.
    Start,
    /// Leave the game-over screen.
    Restart,
    /// End the running session.
    Terminate,
}

/// Reasons a flow transition may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionError {
    /// A session is already running.
    AlreadyPlaying,
    /// No session is running.
    NotPlaying,
    /// Restart was requested before any session was played.
    NothingToRestart,
    /// Start was requested from the game-over screen, which expects a restart.
    AwaitingRestart,
}

/// Reasons a shot request may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShootError {
    /// No session is running.
    NotPlaying,
    /// The player holds no ammo.
    OutOfAmmo,
}

/// Reasons a level selection may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelSelectionError {
    /// Levels cannot change while a session is running.
    SessionActive,
    /// No level is configured at the requested index.
    UnknownLevel,
}

/// Events that end a running session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalCause {
    /// The player left the playfield vertically.
    OutOfBounds,
    /// The player touched an obstacle segment.
    Obstacle,
    /// The player touched a hazard.
    Hazard,
}

/// Kinds of collectable pickups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Adds to the score and the collected-coin tally.
    Coin,
    /// Grants one unit of projectile ammo.
    PowerUp,
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }
        }
    };
}

entity_id!(
    /// Unique identifier assigned to an obstacle pair.
    ObstacleId
);
entity_id!(
    /// Unique identifier assigned to a hazard.
    HazardId
);
entity_id!(
    /// Unique identifier assigned to a pickup.
    PickupId
);
entity_id!(
    /// Unique identifier assigned to a projectile.
    ProjectileId
);

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Centre of the player.
    pub position: Position,
    /// Edge length of the player's hitbox.
    pub size: f32,
    /// Current vertical velocity.
    pub velocity_y: f32,
    /// Whether gravity is active.
    pub motion_enabled: bool,
}

impl PlayerSnapshot {
    /// Hitbox centred on the player.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, self.size, self.size)
    }
}

/// Immutable representation of an obstacle pair used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleSnapshot {
    /// Identifier allocated to the pair by the world.
    pub id: ObstacleId,
    /// Geometry and pass state of the pair.
    pub pair: ObstaclePair,
}

/// Immutable representation of a hazard used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HazardSnapshot {
    /// Identifier allocated to the hazard by the world.
    pub id: HazardId,
    /// Centre of the hazard.
    pub position: Position,
    /// Edge length of the hazard's hitbox.
    pub size: f32,
}

impl HazardSnapshot {
    /// Hitbox centred on the hazard.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, self.size, self.size)
    }
}

/// Immutable representation of a pickup used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSnapshot {
    /// Identifier allocated to the pickup by the world.
    pub id: PickupId,
    /// Kind of pickup.
    pub kind: PickupKind,
    /// Centre of the pickup.
    pub position: Position,
    /// Edge length of the pickup.
    pub size: f32,
    /// Whether the pickup has been collected this tick.
    pub collected: bool,
}

impl PickupSnapshot {
    /// Bounds centred on the pickup.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, self.size, self.size)
    }
}

/// Immutable representation of a projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile by the world.
    pub id: ProjectileId,
    /// Centre of the projectile.
    pub position: Position,
    /// Edge length of the projectile.
    pub size: f32,
}

impl ProjectileSnapshot {
    /// Bounds centred on the projectile.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, self.size, self.size)
    }
}

/// Counters describing the current session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Active flow state.
    pub flow: FlowState,
    /// Level used by the running or next session.
    pub level: LevelIndex,
    /// Session score.
    pub score: u32,
    /// Coins collected this session.
    pub coins: u32,
    /// Projectile ammo held by the player.
    pub ammo: u32,
    /// Best score recorded so far.
    pub high_score: u32,
    /// Ticks elapsed in the session.
    pub tick: u64,
}

/// Read-only view of every entity in the playfield, in spawn order.
#[derive(Clone, Debug, Default)]
pub struct PlayfieldView {
    /// Player state, absent outside a session.
    pub player: Option<PlayerSnapshot>,
    /// Live obstacle pairs.
    pub obstacles: Vec<ObstacleSnapshot>,
    /// Live hazards.
    pub hazards: Vec<HazardSnapshot>,
    /// Live pickups.
    pub pickups: Vec<PickupSnapshot>,
    /// Live projectiles.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Playfield width.
    pub screen_width: f32,
    /// Playfield height.
    pub screen_height: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_screen_only_accepts_start() {
        assert_eq!(
            FlowState::Start.transition(FlowTrigger::Start),
            Ok(FlowState::Playing)
        );
        assert_eq!(
            FlowState::Start.transition(FlowTrigger::Restart),
            Err(TransitionError::NothingToRestart)
        );
        assert_eq!(
            FlowState::Start.transition(FlowTrigger::Terminate),
            Err(TransitionError::NotPlaying)
        );
    }

    #[test]
    fn playing_only_accepts_termination() {
        assert_eq!(
            FlowState::Playing.transition(FlowTrigger::Terminate),
            Ok(FlowState::GameOver)
        );
        assert_eq!(
            FlowState::Playing.transition(FlowTrigger::Start),
            Err(TransitionError::AlreadyPlaying)
        );
        assert_eq!(
            FlowState::Playing.transition(FlowTrigger::Restart),
            Err(TransitionError::AlreadyPlaying)
        );
    }

    #[test]
    fn game_over_only_accepts_restart() {
        assert_eq!(
            FlowState::GameOver.transition(FlowTrigger::Restart),
            Ok(FlowState::Playing)
        );
        assert_eq!(
            FlowState::GameOver.transition(FlowTrigger::Start),
            Err(TransitionError::AwaitingRestart)
        );
    }

    #[test]
    fn identifiers_expose_their_value() {
        assert_eq!(ObstacleId::new(7).get(), 7);
        assert!(PickupId::new(1) < PickupId::new(2));
    }
}

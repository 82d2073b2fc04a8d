#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collision detection and scoring triggers.
//!
//! The system inspects the post-move playfield once per tick and emits the
//! commands that end the session, credit passed obstacles, collect pickups
//! and resolve projectile hits. Checks run in a fixed order and stop at the
//! first terminal condition.

use std::collections::BTreeSet;

use sky_dash_core::{Command, Event, HazardId, PlayfieldView, TerminalCause};

/// Pure system that turns overlaps in the playfield into commands.
#[derive(Debug, Default)]
pub struct Collision;

impl Collision {
    /// Creates a new collision system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits collision commands for every tick reported in `events`.
    pub fn handle(&mut self, events: &[Event], view: &PlayfieldView, out: &mut Vec<Command>) {
        let ticked = events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }));
        if ticked {
            detect(view, out);
        }
    }
}

/// Runs every check against `view` in priority order.
pub fn detect(view: &PlayfieldView, out: &mut Vec<Command>) {
    let Some(player) = view.player else {
        return;
    };

    let y = player.position.y();
    if y < 0.0 || y > view.screen_height {
        out.push(Command::EndSession {
            cause: TerminalCause::OutOfBounds,
        });
        return;
    }

    let bounds = player.bounds();
    if view
        .obstacles
        .iter()
        .any(|snapshot| snapshot.pair.collides_with(&bounds))
    {
        out.push(Command::EndSession {
            cause: TerminalCause::Obstacle,
        });
        return;
    }

    for snapshot in &view.obstacles {
        if !snapshot.pair.passed() && snapshot.pair.right() < player.position.x() {
            out.push(Command::PassObstacle {
                obstacle: snapshot.id,
            });
        }
    }

    if view
        .hazards
        .iter()
        .any(|hazard| hazard.bounds().intersects(&bounds))
    {
        out.push(Command::EndSession {
            cause: TerminalCause::Hazard,
        });
        return;
    }

    for pickup in &view.pickups {
        if !pickup.collected && pickup.bounds().intersects(&bounds) {
            out.push(Command::CollectPickup { pickup: pickup.id });
        }
    }

    let mut claimed: BTreeSet<HazardId> = BTreeSet::new();
    for projectile in &view.projectiles {
        let reach = projectile.bounds();
        let struck = view
            .hazards
            .iter()
            .find(|hazard| !claimed.contains(&hazard.id) && hazard.bounds().intersects(&reach));
        if let Some(hazard) = struck {
            let _ = claimed.insert(hazard.id);
            out.push(Command::DestroyHazard {
                hazard: hazard.id,
                projectile: projectile.id,
            });
        }
    }
}

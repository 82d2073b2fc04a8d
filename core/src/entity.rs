//! Moving actors and the per-tick motion rules that drive them.

use serde::{Deserialize, Serialize};

use crate::geometry::{Position, Rect};

/// Horizontal speed of a fired projectile, in units per tick.
pub const PROJECTILE_SPEED: f32 = 8.0;

/// Phase advance per tick of a hazard's vertical bob.
pub const HAZARD_BOB_STEP: f32 = 0.1;

/// Vertical displacement scale of a hazard's bob.
pub const HAZARD_BOB_AMPLITUDE: f32 = 0.5;

/// Phase advance per tick of a pickup's vertical bob.
pub const PICKUP_BOB_STEP: f32 = 0.15;

/// Vertical displacement scale of a pickup's bob.
pub const PICKUP_BOB_AMPLITUDE: f32 = 1.5;

/// Share of the level's boost strength applied when the player shoots.
pub const SHOOT_BOOST_FACTOR: f32 = 0.6;

/// Share of the shoot boost added when the player is already moving downward.
pub const SHOOT_BOOST_DAMPING: f32 = 0.3;

/// Sinusoidal vertical oscillation applied on top of horizontal motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bob {
    phase: f32,
    phase_step: f32,
    amplitude: f32,
}

impl Bob {
    /// Creates a bob starting at phase zero.
    #[must_use]
    pub const fn new(phase_step: f32, amplitude: f32) -> Self {
        Self {
            phase: 0.0,
            phase_step,
            amplitude,
        }
    }

    fn step(&mut self) -> f32 {
        self.phase += self.phase_step;
        self.phase.sin() * self.amplitude
    }
}

/// Scripted per-tick motion of a non-player entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    velocity_x: f32,
    bob: Option<Bob>,
}

impl Motion {
    /// Constant horizontal motion.
    #[must_use]
    pub const fn linear(velocity_x: f32) -> Self {
        Self {
            velocity_x,
            bob: None,
        }
    }

    /// Constant horizontal motion with a vertical bob.
    #[must_use]
    pub const fn bobbing(velocity_x: f32, bob: Bob) -> Self {
        Self {
            velocity_x,
            bob: Some(bob),
        }
    }

    /// Motion of a hazard drifting left at `speed`.
    #[must_use]
    pub fn hazard(speed: f32) -> Self {
        Self::bobbing(-speed, Bob::new(HAZARD_BOB_STEP, HAZARD_BOB_AMPLITUDE))
    }

    /// Motion of a pickup scrolling left at `speed`.
    #[must_use]
    pub fn pickup(speed: f32) -> Self {
        Self::bobbing(-speed, Bob::new(PICKUP_BOB_STEP, PICKUP_BOB_AMPLITUDE))
    }

    /// Motion of a projectile travelling right.
    #[must_use]
    pub const fn projectile() -> Self {
        Self::linear(PROJECTILE_SPEED)
    }

    /// Advances `position` by one tick.
    #[must_use]
    pub fn step(&mut self, position: Position) -> Position {
        let dy = self.bob.as_mut().map_or(0.0, Bob::step);
        position.translated(self.velocity_x, dy)
    }
}

/// The player-controlled actor.
///
/// Gravity stays inert until the first boost so a fresh session does not
/// drop the player before any input arrives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    position: Position,
    size: f32,
    velocity_y: f32,
    motion_enabled: bool,
}

impl Player {
    /// Creates a stationary player with motion disabled.
    #[must_use]
    pub const fn new(position: Position, size: f32) -> Self {
        Self {
            position,
            size,
            velocity_y: 0.0,
            motion_enabled: false,
        }
    }

    /// Centre of the player.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Edge length of the player's square hitbox.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Current vertical velocity; negative values move upward.
    #[must_use]
    pub const fn velocity_y(&self) -> f32 {
        self.velocity_y
    }

    /// Reports whether gravity has been switched on by a boost.
    #[must_use]
    pub const fn motion_enabled(&self) -> bool {
        self.motion_enabled
    }

    /// Hitbox centred on the player.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, self.size, self.size)
    }

    /// Replaces the vertical velocity with `strength` and enables gravity.
    pub fn boost(&mut self, strength: f32) {
        self.motion_enabled = true;
        self.velocity_y = strength;
    }

    /// Applies the lift granted by firing a projectile.
    ///
    /// `boost_strength` is the level's boost strength (negative, upward).
    pub fn shoot_recoil(&mut self, boost_strength: f32) {
        let lift = boost_strength * SHOOT_BOOST_FACTOR;
        if self.velocity_y < 0.0 {
            self.velocity_y = lift;
        } else {
            self.velocity_y += lift * SHOOT_BOOST_DAMPING;
        }
        self.motion_enabled = true;
    }

    /// Integrates one tick of vertical motion.
    pub fn step(&mut self, gravity: f32) {
        if self.motion_enabled {
            self.velocity_y += gravity;
        }
        self.position = self.position.translated(0.0, self.velocity_y);
    }
}

/// Vertical traversable interval between an obstacle pair's segments.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GapInterval {
    top: f32,
    bottom: f32,
}

impl GapInterval {
    /// Creates a gap spanning `top..bottom`.
    #[must_use]
    pub const fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    /// Upper edge of the gap (bottom of the top segment).
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.top
    }

    /// Lower edge of the gap (top of the bottom segment).
    #[must_use]
    pub const fn bottom(&self) -> f32 {
        self.bottom
    }

    /// Vertical size of the gap.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Reports whether `y` lies strictly inside the gap.
    #[must_use]
    pub fn contains(&self, y: f32) -> bool {
        self.top < y && y < self.bottom
    }
}

/// Pair of barriers sharing an x position and separated by a gap.
///
/// Only `x` changes after creation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePair {
    x: f32,
    width: f32,
    top_height: f32,
    bottom_y: f32,
    bottom_height: f32,
    passed: bool,
}

impl ObstaclePair {
    /// Creates a pair from explicit geometry.
    #[must_use]
    pub fn new(x: f32, width: f32, top_height: f32, bottom_y: f32, screen_height: f32) -> Self {
        Self {
            x,
            width,
            top_height,
            bottom_y,
            bottom_height: screen_height - bottom_y,
            passed: false,
        }
    }

    /// Left edge shared by both segments.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Horizontal extent of both segments.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Trailing (right) edge of the pair.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Height of the top segment, measured from the top of the screen.
    #[must_use]
    pub const fn top_height(&self) -> f32 {
        self.top_height
    }

    /// Vertical start of the bottom segment.
    #[must_use]
    pub const fn bottom_y(&self) -> f32 {
        self.bottom_y
    }

    /// Height of the bottom segment.
    #[must_use]
    pub const fn bottom_height(&self) -> f32 {
        self.bottom_height
    }

    /// Traversable gap between the segments.
    #[must_use]
    pub const fn gap(&self) -> GapInterval {
        GapInterval::new(self.top_height, self.bottom_y)
    }

    /// Whether the player has already been credited for passing this pair.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.passed
    }

    /// Collision rectangles of the top and bottom segments.
    #[must_use]
    pub fn segments(&self) -> [Rect; 2] {
        [
            Rect::new(self.x, 0.0, self.width, self.top_height),
            Rect::new(self.x, self.bottom_y, self.width, self.bottom_height),
        ]
    }

    /// Reports whether `rect` overlaps either segment.
    #[must_use]
    pub fn collides_with(&self, rect: &Rect) -> bool {
        self.segments().iter().any(|segment| segment.intersects(rect))
    }

    /// Moves the pair left by `speed` units.
    pub fn advance(&mut self, speed: f32) {
        self.x -= speed;
    }

    /// Reports whether the pair's right edge has left the screen.
    #[must_use]
    pub fn is_offscreen(&self) -> bool {
        self.right() < 0.0
    }

    /// Marks the pair as passed. Returns `false` when it already was.
    pub fn mark_passed(&mut self) -> bool {
        let newly_passed = !self.passed;
        self.passed = true;
        newly_passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_ignores_gravity_until_first_boost() {
        let mut player = Player::new(Position::new(100.0, 300.0), 40.0);
        for _ in 0..30 {
            player.step(0.5);
        }
        assert_eq!(player.position().y(), 300.0);

        player.boost(-8.0);
        player.step(0.5);
        assert!(player.motion_enabled());
        assert_eq!(player.position().y(), 292.5);
    }

    #[test]
    fn shoot_recoil_replaces_upward_velocity() {
        let mut player = Player::new(Position::new(0.0, 0.0), 40.0);
        player.boost(-8.0);
        player.shoot_recoil(-10.0);
        assert!((player.velocity_y() + 6.0).abs() < f32::EPSILON);
    }

    #[test]
    fn shoot_recoil_dampens_when_falling() {
        let mut player = Player::new(Position::new(0.0, 0.0), 40.0);
        player.shoot_recoil(-10.0);
        assert!(player.motion_enabled());
        assert!((player.velocity_y() + 1.8).abs() < 1e-5);
    }

    #[test]
    fn obstacle_segments_frame_the_gap() {
        let pair = ObstaclePair::new(500.0, 80.0, 200.0, 450.0, 700.0);
        let [top, bottom] = pair.segments();
        assert_eq!(top.bottom(), pair.gap().top());
        assert_eq!(bottom.top(), pair.gap().bottom());
        assert_eq!(bottom.bottom(), 700.0);
        assert_eq!(pair.gap().height(), 250.0);
    }

    #[test]
    fn obstacle_leaves_screen_once_right_edge_passes_zero() {
        let mut pair = ObstaclePair::new(0.0, 80.0, 100.0, 300.0, 600.0);
        pair.advance(80.0);
        assert!(!pair.is_offscreen());
        pair.advance(1.0);
        assert!(pair.is_offscreen());
    }

    #[test]
    fn obstacle_is_marked_passed_once() {
        let mut pair = ObstaclePair::new(0.0, 80.0, 100.0, 300.0, 600.0);
        assert!(pair.mark_passed());
        assert!(!pair.mark_passed());
    }

    #[test]
    fn pickup_motion_scrolls_and_bobs() {
        let mut motion = Motion::pickup(3.0);
        let next = motion.step(Position::new(800.0, 300.0));
        assert_eq!(next.x(), 797.0);
        assert!((next.y() - (300.0 + 0.15_f32.sin() * 1.5)).abs() < 1e-4);
    }
}

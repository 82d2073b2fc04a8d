//! Search for a pickup position that stays collectable and clear of danger.
//!
//! A request describes a vertical block of items (one coin, a coin cluster or
//! a power-up). The planner first tries the centres of gaps in obstacles
//! approaching the spawn edge, then falls back to random heights. Every
//! candidate runs through the same acceptance predicate.

use rand::Rng;
use sky_dash_core::{GapInterval, HazardSnapshot, ObstaclePair, ObstacleSnapshot, Position, Rect};

/// Inflation applied to every side of a hazard's bounds when testing proximity.
pub const HAZARD_SAFETY_MARGIN: f32 = 40.0;

/// Horizontal distance between sampled positions along a pickup's path.
pub const SWEEP_STRIDE: usize = 20;

/// Obstacles further than this from the spawn edge are not used as gap candidates.
pub const GAP_SEEK_WINDOW: f32 = 300.0;

/// Path sweep used for gap-seeking candidates.
pub const GAP_SWEEP: Sweep = Sweep::new(400.0, 300.0);

/// Path sweep used for randomly drawn candidates.
pub const FALLBACK_SWEEP: Sweep = Sweep::new(500.0, 400.0);

/// Returns the inset kept from each gap edge, shrinking with the gap height.
#[must_use]
pub fn clearance_padding(gap_height: f32) -> f32 {
    if gap_height >= 250.0 {
        25.0
    } else if gap_height >= 230.0 {
        20.0
    } else {
        15.0
    }
}

/// Parameters of the future-path check performed on every candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
    window: f32,
    distance: f32,
}

impl Sweep {
    /// Creates a sweep over obstacles within `window` of the spawn edge,
    /// sampling offsets up to `distance`.
    #[must_use]
    pub const fn new(window: f32, distance: f32) -> Self {
        Self { window, distance }
    }

    /// Only obstacles with `x > spawn_x - window` are tested.
    #[must_use]
    pub const fn window(&self) -> f32 {
        self.window
    }

    /// Offsets strictly below this distance are sampled.
    #[must_use]
    pub const fn distance(&self) -> f32 {
        self.distance
    }
}

/// Shape and search budget of a single placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementRequest {
    item_size: f32,
    count: u32,
    spacing: f32,
    attempts: u32,
    edge_margin: u32,
}

impl PlacementRequest {
    /// Requests a single item.
    #[must_use]
    pub const fn single(item_size: f32, attempts: u32, edge_margin: u32) -> Self {
        Self {
            item_size,
            count: 1,
            spacing: 0.0,
            attempts,
            edge_margin,
        }
    }

    /// Requests `count` items stacked vertically `spacing` units apart.
    #[must_use]
    pub const fn cluster(
        item_size: f32,
        count: u32,
        spacing: f32,
        attempts: u32,
        edge_margin: u32,
    ) -> Self {
        Self {
            item_size,
            count,
            spacing,
            attempts,
            edge_margin,
        }
    }

    /// Number of items placed.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Vertical extent of the whole block.
    #[must_use]
    pub fn block_height(&self) -> f32 {
        self.count.saturating_sub(1) as f32 * self.spacing + self.item_size
    }

    fn block_at(&self, x: f32, y: f32) -> Rect {
        Rect::centered(Position::new(x, y), self.item_size, self.block_height())
    }

    fn members(&self, x: f32, y: f32) -> Vec<Position> {
        let span = self.count.saturating_sub(1) as f32 * self.spacing;
        let start = y - (span / 2.0).floor();
        (0..self.count)
            .map(|index| Position::new(x, start + index as f32 * self.spacing))
            .collect()
    }
}

/// Snapshot of the playfield a placement is planned against.
#[derive(Clone, Copy, Debug)]
pub struct PlacementContext<'a> {
    /// Playfield height.
    pub screen_height: f32,
    /// Horizontal centre new pickups appear at.
    pub spawn_x: f32,
    /// Edge length of the player's hitbox.
    pub player_size: f32,
    /// Live obstacle pairs.
    pub obstacles: &'a [ObstacleSnapshot],
    /// Live hazards.
    pub hazards: &'a [HazardSnapshot],
}

/// Search phase that produced a placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementPhase {
    /// Centred in the gap of an approaching obstacle.
    Gap,
    /// Drawn at random within the edge margins.
    Fallback,
}

/// Accepted placement.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// Centre of the whole block.
    pub centre: Position,
    /// Centre of each item, top to bottom.
    pub members: Vec<Position>,
    /// Phase that found the position.
    pub phase: PlacementPhase,
}

/// Searches for an accepted position for `request`.
///
/// Returns `None` when neither phase finds a candidate; the caller skips the
/// spawn rather than place an item somewhere unsafe.
pub fn plan<R: Rng + ?Sized>(
    request: &PlacementRequest,
    context: &PlacementContext<'_>,
    rng: &mut R,
) -> Option<Placement> {
    let accept = |y: f32, sweep: Sweep| {
        let block = request.block_at(context.spawn_x, y);
        accepts(context, block, y, sweep).then(|| y)
    };

    let from_gap = gap_candidates(request, context)
        .into_iter()
        .find_map(|y| accept(y, GAP_SWEEP));
    if let Some(y) = from_gap {
        return Some(placement(request, context, y, PlacementPhase::Gap));
    }

    let lower = request.edge_margin;
    let upper = (context.screen_height as u32).saturating_sub(request.edge_margin);
    for _ in 0..request.attempts {
        let y = if lower <= upper {
            rng.gen_range(lower..=upper) as f32
        } else {
            (context.screen_height / 2.0).floor()
        };
        if let Some(y) = accept(y, FALLBACK_SWEEP) {
            return Some(placement(request, context, y, PlacementPhase::Fallback));
        }
    }

    None
}

/// Centres of padded gaps large enough for the player and the block,
/// nearest the spawn edge first.
#[must_use]
pub fn gap_candidates(request: &PlacementRequest, context: &PlacementContext<'_>) -> Vec<f32> {
    let mut approaching: Vec<&ObstaclePair> = context
        .obstacles
        .iter()
        .map(|snapshot| &snapshot.pair)
        .filter(|pair| pair.x() > context.spawn_x - GAP_SEEK_WINDOW)
        .collect();
    approaching.sort_by(|a, b| b.x().total_cmp(&a.x()));

    approaching
        .into_iter()
        .filter_map(|pair| {
            let gap = pair.gap();
            let padding = clearance_padding(gap.height());
            let usable = gap.height() - 2.0 * padding;
            (usable >= context.player_size + request.block_height())
                .then(|| ((gap.top() + padding + gap.bottom() - padding) / 2.0).floor())
        })
        .collect()
}

fn placement(
    request: &PlacementRequest,
    context: &PlacementContext<'_>,
    y: f32,
    phase: PlacementPhase,
) -> Placement {
    Placement {
        centre: Position::new(context.spawn_x, y),
        members: request.members(context.spawn_x, y),
        phase,
    }
}

/// Acceptance predicate shared by both search phases.
#[must_use]
pub fn accepts(context: &PlacementContext<'_>, block: Rect, centre_y: f32, sweep: Sweep) -> bool {
    let clear_of_obstacles = context
        .obstacles
        .iter()
        .all(|snapshot| clear_of(&snapshot.pair, block, centre_y, context));
    if !clear_of_obstacles {
        return false;
    }

    let near_hazard = context.hazards.iter().any(|hazard| {
        block.intersects(
            &hazard
                .bounds()
                .inflate(HAZARD_SAFETY_MARGIN, HAZARD_SAFETY_MARGIN),
        )
    });
    if near_hazard {
        return false;
    }

    path_is_clear(context, block, centre_y, sweep)
}

fn path_is_clear(context: &PlacementContext<'_>, block: Rect, centre_y: f32, sweep: Sweep) -> bool {
    let upcoming: Vec<&ObstaclePair> = context
        .obstacles
        .iter()
        .map(|snapshot| &snapshot.pair)
        .filter(|pair| pair.x() > context.spawn_x - sweep.window())
        .collect();

    for offset in (0..sweep.distance().max(0.0) as usize).step_by(SWEEP_STRIDE) {
        let shifted = block.translated(-(offset as f32), 0.0);
        if shifted.right() <= 0.0 {
            break;
        }
        if !upcoming
            .iter()
            .all(|pair| clear_of(pair, shifted, centre_y, context))
        {
            return false;
        }
    }

    true
}

fn clear_of(pair: &ObstaclePair, block: Rect, centre_y: f32, context: &PlacementContext<'_>) -> bool {
    if pair.collides_with(&block) {
        return false;
    }

    let span = Rect::new(pair.x(), 0.0, pair.width(), context.screen_height);
    let gap = pair.gap();
    if !block.overlaps_horizontally(&span) || !gap.contains(centre_y) {
        return true;
    }

    keeps_clearance(gap, block, context.player_size)
}

fn keeps_clearance(gap: GapInterval, block: Rect, player_size: f32) -> bool {
    let padding = clearance_padding(gap.height());
    block.top() >= gap.top() + padding
        && block.bottom() <= gap.bottom() - padding
        && block.top() - gap.top() >= player_size
        && gap.bottom() - block.bottom() >= player_size
}

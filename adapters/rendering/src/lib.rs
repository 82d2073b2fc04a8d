#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Sky Dash adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use sky_dash_core::{FlowState, PickupKind, PlayfieldView, Rect, SessionSnapshot};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Primary action: start, boost or restart.
    pub boost: bool,
    /// Fire a projectile.
    pub shoot: bool,
    /// Start from the title screen or restart after a game over.
    pub confirm: bool,
    /// Zero-based level chosen with a number key on this frame.
    pub select_level: Option<u32>,
    /// Flip the mute state.
    pub toggle_mute: bool,
    /// Signed number of volume steps requested on this frame.
    pub volume_steps: i32,
}

/// Axis-aligned box in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneRect {
    /// Upper-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl SceneRect {
    /// Creates a box from its upper-left corner and dimensions.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }
}

impl From<Rect> for SceneRect {
    fn from(rect: Rect) -> Self {
        Self::new(
            Vec2::new(rect.left(), rect.top()),
            Vec2::new(rect.width(), rect.height()),
        )
    }
}

/// Obstacle pair as drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstaclePresentation {
    /// Segment hanging from the top edge.
    pub top: SceneRect,
    /// Segment rising from the bottom edge.
    pub bottom: SceneRect,
}

/// Pickup as drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupPresentation {
    /// Kind of pickup.
    pub kind: PickupKind,
    /// On-screen bounds.
    pub bounds: SceneRect,
}

/// Head-up display values.
#[derive(Clone, Debug, PartialEq)]
pub struct HudPresentation {
    /// Session score.
    pub score: u32,
    /// Coins collected this session.
    pub coins: u32,
    /// Projectile ammo.
    pub ammo: u32,
    /// Best score recorded.
    pub high_score: u32,
    /// Name of the active level.
    pub level_name: String,
    /// Master volume in `0.0..=1.0`.
    pub volume: f32,
    /// Whether audio is muted.
    pub muted: bool,
}

/// Scene description combining the playfield inhabitants and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Playfield dimensions.
    pub playfield: Vec2,
    /// Active flow state, selecting which overlay is drawn.
    pub flow: FlowState,
    /// Banner shown on the title screen.
    pub banner: String,
    /// Selectable level names in index order.
    pub levels: Vec<String>,
    /// Index of the selected level.
    pub selected_level: u32,
    /// Player bounds, absent before the first session.
    pub player: Option<SceneRect>,
    /// Visible obstacle pairs.
    pub obstacles: Vec<ObstaclePresentation>,
    /// Visible hazards.
    pub hazards: Vec<SceneRect>,
    /// Visible pickups.
    pub pickups: Vec<PickupPresentation>,
    /// Visible projectiles.
    pub projectiles: Vec<SceneRect>,
    /// Head-up display values.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates an empty scene for a playfield of the provided dimensions.
    pub fn new(width: f32, height: f32, banner: impl Into<String>) -> Result<Self, RenderingError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(RenderingError::InvalidPlayfield { width, height });
        }

        Ok(Self {
            playfield: Vec2::new(width, height),
            flow: FlowState::Start,
            banner: banner.into(),
            levels: Vec::new(),
            selected_level: 0,
            player: None,
            obstacles: Vec::new(),
            hazards: Vec::new(),
            pickups: Vec::new(),
            projectiles: Vec::new(),
            hud: HudPresentation {
                score: 0,
                coins: 0,
                ammo: 0,
                high_score: 0,
                level_name: String::new(),
                volume: 0.0,
                muted: false,
            },
        })
    }

    /// Replaces the entity channels with the contents of `view`.
    pub fn sync_playfield(&mut self, view: &PlayfieldView) {
        self.player = view.player.map(|player| player.bounds().into());
        self.obstacles = view
            .obstacles
            .iter()
            .map(|snapshot| {
                let [top, bottom] = snapshot.pair.segments();
                ObstaclePresentation {
                    top: top.into(),
                    bottom: bottom.into(),
                }
            })
            .collect();
        self.hazards = view
            .hazards
            .iter()
            .map(|hazard| hazard.bounds().into())
            .collect();
        self.pickups = view
            .pickups
            .iter()
            .filter(|pickup| !pickup.collected)
            .map(|pickup| PickupPresentation {
                kind: pickup.kind,
                bounds: pickup.bounds().into(),
            })
            .collect();
        self.projectiles = view
            .projectiles
            .iter()
            .map(|projectile| projectile.bounds().into())
            .collect();
    }

    /// Copies the session counters into the flow state and HUD.
    pub fn sync_session(&mut self, session: &SessionSnapshot) {
        self.flow = session.flow;
        self.selected_level = session.level.get();
        self.hud.score = session.score;
        self.hud.coins = session.coins;
        self.hud.ammo = session.ammo;
        self.hud.high_score = session.high_score;
        self.hud.level_name = self
            .levels
            .get(session.level.get() as usize)
            .cloned()
            .unwrap_or_default();
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Timing spent by the update closure, reported back for frame metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameSimulationBreakdown {
    /// Time spent running fixed simulation ticks.
    pub simulation: Duration,
    /// Time spent rebuilding the scene from world snapshots.
    pub scene_population: Duration,
}

impl FrameSimulationBreakdown {
    /// Creates a breakdown from its components.
    #[must_use]
    pub const fn new(simulation: Duration, scene_population: Duration) -> Self {
        Self {
            simulation,
            scene_population,
        }
    }
}

/// Identifies a sprite that backends may draw in place of a primitive shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// The player craft.
    Player,
    /// A single obstacle segment.
    Obstacle,
    /// An incoming hazard.
    Hazard,
    /// A coin pickup.
    Coin,
    /// A power-up pickup.
    PowerUp,
    /// A fired projectile.
    Projectile,
}

impl SpriteKey {
    /// Every sprite a complete manifest provides, in load order.
    pub const ALL: [SpriteKey; 6] = [
        SpriteKey::Player,
        SpriteKey::Obstacle,
        SpriteKey::Hazard,
        SpriteKey::Coin,
        SpriteKey::PowerUp,
        SpriteKey::Projectile,
    ];
}

impl From<PickupKind> for SpriteKey {
    fn from(kind: PickupKind) -> Self {
        match kind {
            PickupKind::Coin => SpriteKey::Coin,
            PickupKind::PowerUp => SpriteKey::PowerUp,
        }
    }
}

/// Rendering backend capable of presenting Sky Dash scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered. The returned breakdown feeds the optional FPS report.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The playfield must have a positive area.
    InvalidPlayfield {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPlayfield { width, height } => {
                write!(
                    f,
                    "playfield dimensions must be positive (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

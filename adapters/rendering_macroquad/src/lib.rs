#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Sky Dash.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Volume and mute settings are persisted by the
//! storage adapter and surfaced on the HUD only.
//!
//! Sprites are optional: entities without a loaded texture are drawn as
//! primitive shapes.

mod sprites;

use anyhow::Result;
use glam::Vec2;
use macroquad::{
    color::{Color as MacroquadColor, WHITE},
    input::{
        is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
    },
    shapes::{draw_circle, draw_rectangle, draw_rectangle_lines},
    text::{draw_text, measure_text},
};
use sky_dash_core::{FlowState, PickupKind};
use sky_dash_rendering::{
    Color, FrameInput, FrameSimulationBreakdown, HudPresentation, Presentation,
    RenderingBackend, Scene, SceneRect, SpriteKey,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use self::sprites::SpriteAtlas;

const NUMBER_KEYS: [KeyCode; 9] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
    KeyCode::Key7,
    KeyCode::Key8,
    KeyCode::Key9,
];

const HUD_FONT_SIZE: f32 = 28.0;
const TITLE_FONT_SIZE: f32 = 56.0;

/// Latches pointer interactions observed while drawing so they are merged
/// with keyboard input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerInputState {
    click_latched: bool,
    level_latched: Option<u32>,
}

impl PointerInputState {
    /// Returns whether a playfield click was latched and clears the latch so
    /// the action fires only once.
    pub fn take_click(&mut self) -> bool {
        let latched = self.click_latched;
        self.click_latched = false;
        latched
    }

    /// Records a playfield click.
    pub fn register_click(&mut self) {
        self.click_latched = true;
    }

    /// Returns the latched level chosen from the title screen list.
    pub fn take_level(&mut self) -> Option<u32> {
        self.level_latched.take()
    }

    /// Records a click on a title screen level entry.
    pub fn register_level(&mut self, level: u32) {
        self.level_latched = Some(level);
    }
}

/// Snapshot of edge-triggered keyboard input observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` quits the game loop.
    quit_requested: bool,
    /// `Space` without shift.
    boost: bool,
    /// `F` or `Shift+Space`.
    shoot: bool,
    /// `Enter`.
    confirm: bool,
    /// `1`..`9`.
    select_level: Option<u32>,
    /// `M`.
    toggle_mute: bool,
    /// `+` raises and `-` lowers the volume.
    volume_steps: i32,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);
        let space = is_key_pressed(KeyCode::Space);
        let select_level = NUMBER_KEYS
            .iter()
            .position(|key| is_key_pressed(*key))
            .map(|index| index as u32);
        let raise = is_key_pressed(KeyCode::Equal) || is_key_pressed(KeyCode::KpAdd);
        let lower = is_key_pressed(KeyCode::Minus) || is_key_pressed(KeyCode::KpSubtract);

        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            boost: space && !shift,
            shoot: is_key_pressed(KeyCode::F) || (space && shift),
            confirm: is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter),
            select_level,
            toggle_mute: is_key_pressed(KeyCode::M),
            volume_steps: i32::from(raise) - i32::from(lower),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    load_sprites: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            load_sprites: true,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the backend should attempt to load sprite assets.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    scene_population: Duration,
    render: Duration,
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    scene_population_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_scene_population: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.scene_population_accum += breakdown.scene_population;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            match self.frame_times.pop_front() {
                Some(removed) => {
                    self.window_duration = self.window_duration.saturating_sub(removed);
                }
                None => break,
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames.max(1);
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames,
            avg_scene_population: self.scene_population_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.scene_population_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            load_sprites,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.playfield.x.round() as i32,
            window_height: scene.playfield.y.round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let sprite_atlas = if load_sprites {
                load_sprite_atlas()
            } else {
                None
            };

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut pointer_input = PointerInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let frame_input = gather_frame_input(keyboard, &mut pointer_input);
                let simulation_breakdown = update_scene(frame_dt, frame_input, &mut scene);

                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                let render_start = Instant::now();
                draw_playfield(&scene, &metrics, sprite_atlas.as_ref());
                draw_hud(&scene.hud, &metrics);
                match scene.flow {
                    FlowState::Start => draw_title_overlay(&scene, &metrics),
                    FlowState::GameOver => draw_game_over_overlay(&scene, &metrics),
                    FlowState::Playing => {}
                }
                observe_pointer(&scene, &metrics, &mut pointer_input);
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation: simulation_breakdown.simulation,
                    scene_population: simulation_breakdown.scene_population,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(metrics) = fps_metrics {
                        tracing::info!(
                            fps = format_args!("{:.2}", metrics.per_second),
                            trailing = format_args!("{:.2}", metrics.trailing_ten_seconds),
                            sim_ms = metrics.avg_simulation.as_secs_f64() * 1_000.0,
                            scene_ms = metrics.avg_scene_population.as_secs_f64() * 1_000.0,
                            render_ms = metrics.avg_render.as_secs_f64() * 1_000.0,
                            "frame timing"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn load_sprite_atlas() -> Option<SpriteAtlas> {
    match SpriteAtlas::from_default_manifest() {
        Ok(atlas) => {
            tracing::info!(textures = atlas.texture_count(), "loaded sprite atlas");
            Some(atlas)
        }
        Err(error) => {
            tracing::warn!(
                error = format_args!("{error:#}"),
                manifest = %SpriteAtlas::default_manifest_path().display(),
                "sprites unavailable, drawing primitives"
            );
            None
        }
    }
}

/// Maps playfield coordinates onto the window, letterboxing to keep the
/// aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SceneMetrics {
    scale: f32,
    offset: Vec2,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let playfield = scene.playfield;
        let scale = if playfield.x <= f32::EPSILON || playfield.y <= f32::EPSILON {
            1.0
        } else {
            (screen_width / playfield.x).min(screen_height / playfield.y)
        };
        let offset = Vec2::new(
            ((screen_width - playfield.x * scale) * 0.5).max(0.0),
            ((screen_height - playfield.y * scale) * 0.5).max(0.0),
        );
        Self { scale, offset }
    }

    fn to_screen(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }

    fn to_playfield(&self, point: Vec2) -> Vec2 {
        (point - self.offset) / self.scale
    }
}

fn gather_frame_input(
    keyboard: KeyboardShortcuts,
    pointer_input: &mut PointerInputState,
) -> FrameInput {
    let click = pointer_input.take_click();
    let level = pointer_input.take_level();
    gather_frame_input_from_observations(keyboard, click, level)
}

fn gather_frame_input_from_observations(
    keyboard: KeyboardShortcuts,
    click: bool,
    clicked_level: Option<u32>,
) -> FrameInput {
    FrameInput {
        boost: keyboard.boost || click,
        shoot: keyboard.shoot,
        confirm: keyboard.confirm,
        select_level: clicked_level.or(keyboard.select_level),
        toggle_mute: keyboard.toggle_mute,
        volume_steps: keyboard.volume_steps,
    }
}

fn observe_pointer(scene: &Scene, metrics: &SceneMetrics, pointer_input: &mut PointerInputState) {
    if !is_mouse_button_pressed(MouseButton::Left) {
        return;
    }
    let (x, y) = mouse_position();
    let cursor = metrics.to_playfield(Vec2::new(x, y));
    match level_entry_at(scene, cursor) {
        Some(level) => pointer_input.register_level(level),
        None => pointer_input.register_click(),
    }
}

fn level_entry_bounds(scene: &Scene, index: usize) -> SceneRect {
    let width = scene.playfield.x * 0.4;
    let height = 36.0;
    let top = scene.playfield.y * 0.45 + index as f32 * (height + 8.0);
    SceneRect::new(
        Vec2::new((scene.playfield.x - width) * 0.5, top),
        Vec2::new(width, height),
    )
}

fn level_entry_at(scene: &Scene, cursor: Vec2) -> Option<u32> {
    if scene.flow != FlowState::Start {
        return None;
    }
    (0..scene.levels.len())
        .find(|&index| {
            let bounds = level_entry_bounds(scene, index);
            let max = bounds.origin + bounds.size;
            cursor.x >= bounds.origin.x
                && cursor.x < max.x
                && cursor.y >= bounds.origin.y
                && cursor.y < max.y
        })
        .map(|index| index as u32)
}

struct Palette;

impl Palette {
    const PLAYER: Color = Color::new(1.0, 0.84, 0.0, 1.0);
    const OBSTACLE: Color = Color::new(0.13, 0.55, 0.13, 1.0);
    const HAZARD: Color = Color::new(0.86, 0.08, 0.24, 1.0);
    const COIN: Color = Color::new(1.0, 0.75, 0.0, 1.0);
    const POWER_UP: Color = Color::new(0.25, 0.41, 0.88, 1.0);
    const PROJECTILE: Color = Color::new(1.0, 0.55, 0.0, 1.0);
    const OVERLAY: Color = Color::new(0.0, 0.0, 0.0, 0.55);
}

fn draw_playfield(scene: &Scene, metrics: &SceneMetrics, atlas: Option<&SpriteAtlas>) {
    for obstacle in &scene.obstacles {
        for segment in [obstacle.top, obstacle.bottom] {
            if !draw_sprite(atlas, SpriteKey::Obstacle, segment, metrics) {
                fill_rect(segment, Palette::OBSTACLE, metrics);
                let outline = Palette::OBSTACLE.lighten(0.3);
                let origin = metrics.to_screen(segment.origin);
                let size = segment.size * metrics.scale;
                draw_rectangle_lines(
                    origin.x,
                    origin.y,
                    size.x,
                    size.y,
                    2.0,
                    to_macroquad_color(outline),
                );
            }
        }
    }

    for pickup in &scene.pickups {
        if !draw_sprite(atlas, pickup.kind.into(), pickup.bounds, metrics) {
            match pickup.kind {
                PickupKind::Coin => fill_circle(pickup.bounds, Palette::COIN, metrics),
                PickupKind::PowerUp => fill_rect(pickup.bounds, Palette::POWER_UP, metrics),
            }
        }
    }

    for hazard in &scene.hazards {
        if !draw_sprite(atlas, SpriteKey::Hazard, *hazard, metrics) {
            fill_rect(*hazard, Palette::HAZARD, metrics);
        }
    }

    for projectile in &scene.projectiles {
        if !draw_sprite(atlas, SpriteKey::Projectile, *projectile, metrics) {
            fill_circle(*projectile, Palette::PROJECTILE, metrics);
        }
    }

    if let Some(player) = scene.player {
        if !draw_sprite(atlas, SpriteKey::Player, player, metrics) {
            fill_rect(player, Palette::PLAYER, metrics);
        }
    }
}

fn draw_sprite(
    atlas: Option<&SpriteAtlas>,
    key: SpriteKey,
    bounds: SceneRect,
    metrics: &SceneMetrics,
) -> bool {
    atlas.map_or(false, |atlas| atlas.draw(key, bounds, metrics))
}

fn fill_rect(bounds: SceneRect, color: Color, metrics: &SceneMetrics) {
    let origin = metrics.to_screen(bounds.origin);
    let size = bounds.size * metrics.scale;
    draw_rectangle(origin.x, origin.y, size.x, size.y, to_macroquad_color(color));
}

fn fill_circle(bounds: SceneRect, color: Color, metrics: &SceneMetrics) {
    let center = metrics.to_screen(bounds.center());
    let radius = bounds.size.x.min(bounds.size.y) * 0.5 * metrics.scale;
    draw_circle(center.x, center.y, radius, to_macroquad_color(color));
}

fn hud_lines(hud: &HudPresentation) -> [String; 3] {
    let volume = if hud.muted {
        "muted".to_string()
    } else {
        format!("{:.0}%", hud.volume * 100.0)
    };
    [
        format!("Score: {}  High: {}", hud.score, hud.high_score),
        format!("Coins: {}  Ammo: {}", hud.coins, hud.ammo),
        format!("{}  Volume: {volume}", hud.level_name),
    ]
}

fn draw_hud(hud: &HudPresentation, metrics: &SceneMetrics) {
    let font_size = HUD_FONT_SIZE * metrics.scale;
    for (row, line) in hud_lines(hud).iter().enumerate() {
        let position = metrics.to_screen(Vec2::new(10.0, 30.0 + row as f32 * HUD_FONT_SIZE));
        draw_text(line, position.x, position.y, font_size, WHITE);
    }
}

fn draw_centered_text(text: &str, y: f32, font_size: f32, scene_width: f32, metrics: &SceneMetrics) {
    let scaled = (font_size * metrics.scale).max(1.0);
    let dimensions = measure_text(text, None, scaled.round() as u16, 1.0);
    let position = metrics.to_screen(Vec2::new(scene_width * 0.5, y));
    draw_text(
        text,
        position.x - dimensions.width * 0.5,
        position.y,
        scaled,
        WHITE,
    );
}

fn draw_dim_overlay(scene: &Scene, metrics: &SceneMetrics) {
    fill_rect(
        SceneRect::new(Vec2::ZERO, scene.playfield),
        Palette::OVERLAY,
        metrics,
    );
}

fn draw_title_overlay(scene: &Scene, metrics: &SceneMetrics) {
    draw_dim_overlay(scene, metrics);
    let width = scene.playfield.x;
    draw_centered_text(
        &scene.banner,
        scene.playfield.y * 0.25,
        TITLE_FONT_SIZE,
        width,
        metrics,
    );
    draw_centered_text(
        "Press SPACE or click to start",
        scene.playfield.y * 0.35,
        HUD_FONT_SIZE,
        width,
        metrics,
    );

    for (index, name) in scene.levels.iter().enumerate() {
        let bounds = level_entry_bounds(scene, index);
        let selected = index as u32 == scene.selected_level;
        let fill = if selected {
            Palette::OBSTACLE
        } else {
            Palette::OBSTACLE.lighten(0.5)
        };
        fill_rect(bounds, fill, metrics);
        let label = format!("{}. {name}", index + 1);
        draw_centered_text(
            &label,
            bounds.origin.y + bounds.size.y * 0.7,
            HUD_FONT_SIZE,
            width,
            metrics,
        );
    }
}

fn draw_game_over_overlay(scene: &Scene, metrics: &SceneMetrics) {
    draw_dim_overlay(scene, metrics);
    let width = scene.playfield.x;
    let middle = scene.playfield.y * 0.5;
    draw_centered_text("Game Over", middle - 60.0, TITLE_FONT_SIZE, width, metrics);
    draw_centered_text(
        &format!("Score: {}  Best: {}", scene.hud.score, scene.hud.high_score),
        middle,
        HUD_FONT_SIZE,
        width,
        metrics,
    );
    draw_centered_text(
        "Press SPACE or click to play again",
        middle + 40.0,
        HUD_FONT_SIZE,
        width,
        metrics,
    );
}

fn to_macroquad_color(color: Color) -> MacroquadColor {
    MacroquadColor::new(color.red, color.green, color.blue, color.alpha)
}

//! Coreguard - a top-down arena defense game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, combat, collisions, game state)
//! - `atlas`: Data-driven per-type attributes and spawn schedule
//! - `map`: Tile-grid map loader producing static collision walls
//! - `render`: Read-only sprite contract for a host renderer

pub mod atlas;
pub mod map;
pub mod render;
pub mod sim;

pub use atlas::Atlas;
pub use map::{Wall, load_walls};
pub use sim::{GameState, Screen, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Map dimensions in pixels (40x30 tiles of 16px)
    pub const MAP_WIDTH: f32 = 640.0;
    pub const MAP_HEIGHT: f32 = 480.0;
    pub const TILE_SIZE: f32 = 16.0;

    /// Camera/viewport size in map pixels
    pub const CAMERA_WIDTH: f32 = 240.0;
    pub const CAMERA_HEIGHT: f32 = 180.0;
    /// Camera-window margins: the hero can roam inside this inner rectangle
    /// without the camera scrolling
    pub const CAMERA_WINDOW_X: f32 = 96.0;
    pub const CAMERA_WINDOW_Y: f32 = 64.0;
    pub const CAMERA_WINDOW_WIDTH: f32 = CAMERA_WIDTH - 2.0 * CAMERA_WINDOW_X;
    pub const CAMERA_WINDOW_HEIGHT: f32 = CAMERA_HEIGHT - 2.0 * CAMERA_WINDOW_Y;

    /// Duration until a held movement key reaches full speed, in seconds
    pub const TIME_TO_FULL_SPEED: f64 = 0.15;
    /// Post-hit immunity window, in seconds
    pub const INVINCIBLE_DURATION: f64 = 0.15;
    /// Global action pause after the hero takes a hit, in seconds
    pub const STOP_TIME_HERO_HIT: f64 = 0.075;
    /// Global action pause after the hero dies, before game over
    pub const STOP_TIME_HERO_DEAD: f64 = 1.0;
    /// Floating text lifetime, in seconds
    pub const TEXT_TTL: f64 = 5.0;
    /// Glyph cell size of the HUD charset, in pixels
    pub const CHARSET_SIZE: f32 = 8.0;
    /// Duration of one animation frame, in seconds
    pub const FRAME_DURATION: f32 = 0.1;
    /// Largest elapsed-time delta fed to one tick; host stalls (tab resume,
    /// debugger) are clamped so fast movers don't tunnel through walls
    pub const MAX_ELAPSED: f64 = 0.1;
}

use glam::Vec2;

/// Factor by which to scale both velocity components when moving diagonally,
/// so diagonal travel is not faster than axial travel (cos 45°)
#[inline]
pub fn diagonal_scale(dir: Vec2) -> f32 {
    if dir.x != 0.0 && dir.y != 0.0 {
        std::f32::consts::FRAC_1_SQRT_2
    } else {
        1.0
    }
}

/// Linear interpolation of `t` in [0,1] between `a` and `b`, clamped
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

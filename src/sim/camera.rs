//! Camera-window tracking
//!
//! The camera only scrolls when the hero leaves an inner window of the
//! viewport; it then snaps the window edge to the hero and clamps to the
//! map bounds, so the view never shows past the outer walls.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{
    CAMERA_HEIGHT, CAMERA_WIDTH, CAMERA_WINDOW_HEIGHT, CAMERA_WINDOW_WIDTH, CAMERA_WINDOW_X,
    CAMERA_WINDOW_Y, MAP_HEIGHT, MAP_WIDTH,
};

/// Viewport position in map coordinates (top-left)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
}

impl Camera {
    pub fn new(pos: Vec2) -> Self {
        Self { pos }
    }

    /// Edge-snap toward the hero's bounding box
    pub fn follow(&mut self, hero_min: Vec2, hero_size: Vec2) {
        let window_min = self.pos + Vec2::new(CAMERA_WINDOW_X, CAMERA_WINDOW_Y);
        let window_max = window_min + Vec2::new(CAMERA_WINDOW_WIDTH, CAMERA_WINDOW_HEIGHT);
        let hero_max = hero_min + hero_size;

        if 0.0 < self.pos.x && hero_min.x < window_min.x {
            self.pos.x = (hero_min.x - CAMERA_WINDOW_X).max(0.0);
        } else if window_max.x < MAP_WIDTH && hero_max.x > window_max.x {
            self.pos.x =
                (hero_max.x - (CAMERA_WINDOW_X + CAMERA_WINDOW_WIDTH)).min(MAP_WIDTH - CAMERA_WIDTH);
        }
        if 0.0 < self.pos.y && hero_min.y < window_min.y {
            self.pos.y = (hero_min.y - CAMERA_WINDOW_Y).max(0.0);
        } else if window_max.y < MAP_HEIGHT && hero_max.y > window_max.y {
            self.pos.y = (hero_max.y - (CAMERA_WINDOW_Y + CAMERA_WINDOW_HEIGHT))
                .min(MAP_HEIGHT - CAMERA_HEIGHT);
        }
    }
}

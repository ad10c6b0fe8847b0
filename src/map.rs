//! Map loader: hex tile grid -> static collision walls
//!
//! The level is a 40x30 grid of hex digits, one per 16px tile. The loader
//! only cares about collision: wall tiles and the central core become
//! `Wall` rectangles, everything else (floor, ingress markers) is left to
//! the renderer. The outer boundary is covered by four thick border walls
//! so fast movers cannot escape the map even between tiles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAP_HEIGHT, MAP_WIDTH, TILE_SIZE};

/// A static rectangle the collision engine never moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub min: Vec2,
    pub size: Vec2,
}

pub const GRID_WIDTH: usize = 40;
pub const GRID_HEIGHT: usize = 30;

/// The shipped level. Tiles: 0 floor, 1-9/b-e wall shapes, a central core,
/// f ingress marker (no collision).
pub const LEVEL: &str = "\
5555555555555555555555555555555555555555
B8888888888888888888888888888CB88888888C
6000000000000000000000000000046000000004
60F00000000000000000000F00000460000F0004
6000000000000130000000000000079000000004
6000000000000460000000000000000000000004
D222230000000790000000000000000000000004
B888890000000000000000000000000012223004
6000000000000000000000000000000078889004
6000000000012222300000012222300000000004
600000000004555560000004555560000000F004
600000000004B88890000007888C600000000004
6000000000079000000000000004600000000004
6000000000000000000000000007900000000004
6000000000000000000A00000000000000000004
6000013000000000000000000000000000000004
60F0079000013000000000000000000000000004
6000000000046000000000000001300000000004
600000000004D22230000001222E600000000004
6000000000078888900000078888900000000004
6000000000000000000000000000000000000004
6000000000000000000000000000000000000004
600000000000000000000013000000001222222E
600122222300000000000046000000007888888C
6007888889000000000000790000000000000004
6000000000000000000000000000000000000004
6000000000000130000000000000000000000004
600F0000000004600F0000000000000000000F04
6000000000000460000000000000000000000004
D222222222222ED222222222222222222222222E";

/// Errors from parsing a level string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Character at `index` is not a hex digit
    BadTile { index: usize, ch: char },
    /// Grid is not exactly 40x30 tiles
    WrongSize { tiles: usize },
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::BadTile { index, ch } => {
                write!(f, "bad tile {ch:?} at index {index}")
            }
            MapError::WrongSize { tiles } => {
                write!(f, "expected {} tiles, got {tiles}", GRID_WIDTH * GRID_HEIGHT)
            }
        }
    }
}

impl std::error::Error for MapError {}

fn is_wall_tile(tile: u32) -> bool {
    matches!(tile, 1..=9 | 0xb..=0xe)
}

/// Parse a level string into collision walls.
///
/// Boundary tiles are skipped (the four border walls already cover them);
/// the central core tile (0xa) contributes one 32x27 rectangle.
pub fn load_walls(level: &str) -> Result<Vec<Wall>, MapError> {
    // Surround the level with a thick wall
    let mut walls = vec![
        Wall { min: Vec2::new(-32.0, -32.0), size: Vec2::new(MAP_WIDTH + 64.0, 64.0) },
        Wall { min: Vec2::new(-32.0, MAP_HEIGHT - 16.0), size: Vec2::new(MAP_WIDTH + 64.0, 48.0) },
        Wall { min: Vec2::new(-32.0, -32.0), size: Vec2::new(48.0, MAP_HEIGHT + 64.0) },
        Wall { min: Vec2::new(MAP_WIDTH - 16.0, -32.0), size: Vec2::new(48.0, MAP_HEIGHT + 64.0) },
    ];

    let mut tiles = 0usize;
    for (index, ch) in level.chars().filter(|c| !c.is_whitespace()).enumerate() {
        let tile = ch.to_digit(16).ok_or(MapError::BadTile { index, ch })?;
        let u = index % GRID_WIDTH;
        let v = index / GRID_WIDTH;
        tiles += 1;

        if is_wall_tile(tile) {
            // Interior walls only; the boundary is covered by the border walls
            let interior_x = u != 0 && u != GRID_WIDTH - 1;
            let interior_y = v != 0 && v != GRID_HEIGHT - 1;
            if interior_x && interior_y {
                walls.push(Wall {
                    min: Vec2::new(u as f32 * TILE_SIZE, v as f32 * TILE_SIZE),
                    size: Vec2::new(TILE_SIZE, TILE_SIZE),
                });
            }
        } else if tile == 0xa {
            // Central core is a single 2x1.7-tile obstacle
            walls.push(Wall {
                min: Vec2::new(u as f32 * TILE_SIZE, v as f32 * TILE_SIZE),
                size: Vec2::new(32.0, 27.0),
            });
        }
    }

    if tiles != GRID_WIDTH * GRID_HEIGHT {
        return Err(MapError::WrongSize { tiles });
    }

    Ok(walls)
}

/// Ingress marker tiles (0xf) in the level, for renderers that draw the
/// closed-portal sprite
pub fn ingress_tiles(level: &str) -> Vec<Vec2> {
    level
        .chars()
        .filter(|c| !c.is_whitespace())
        .enumerate()
        .filter(|(_, ch)| ch.to_digit(16) == Some(0xf))
        .map(|(index, _)| {
            Vec2::new(
                (index % GRID_WIDTH) as f32 * TILE_SIZE,
                (index / GRID_WIDTH) as f32 * TILE_SIZE,
            )
        })
        .collect()
}

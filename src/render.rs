//! Render contract
//!
//! The simulation never draws; a host renderer consumes a read-only list of
//! sprite descriptors built from the current state. Everything cosmetic the
//! host needs (facing, animation frames, hit reactions, aim angle) is
//! derived here so renderers stay free of game rules.

use glam::Vec2;
use serde::Serialize;
use std::f32::consts::FRAC_PI_2;

use crate::sim::entity::{EntityKind, FoeBreed};
use crate::sim::state::GameState;

/// Variant-specific drawing hints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SpriteKind {
    Hero {
        aim_angle: f32,
        attacking: bool,
        moving: bool,
        facing_right: bool,
        /// Walking in the direction the gun points (legs animate forward)
        moving_forward: bool,
        legs_frame: u32,
        muzzle_frame: u32,
        invincible: bool,
    },
    Companion,
    Foe {
        breed: FoeBreed,
        /// Flash the hit sprite while immune or defeated-but-not-removed
        hit_reaction: bool,
        attacking: bool,
        facing_right: bool,
        bite_frame: u32,
        walk_frame: u32,
    },
    Projectile { angle: f32 },
    Blast { radius: f32, width: f32 },
    /// HUD text; `pos` is in viewport coordinates, not map coordinates
    Text { line: String },
    Ingress { open: bool },
}

/// One drawable thing. `pos` is the top-left in map coordinates (ring
/// center for blasts, viewport-anchored for text); the host subtracts the
/// camera for everything except HUD text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: SpriteKind,
}

/// Build the draw list for the current frame, in entity order
pub fn sprites(state: &GameState) -> Vec<Sprite> {
    let now = state.now;
    state
        .entities
        .iter()
        .map(|e| {
            let kind = match &e.kind {
                EntityKind::Hero { aim_angle, attacking, legs, muzzle, .. } => {
                    let facing_right = (-FRAC_PI_2..FRAC_PI_2).contains(aim_angle);
                    let moving_right = e.dir.x >= 0.0;
                    SpriteKind::Hero {
                        aim_angle: *aim_angle,
                        attacking: *attacking,
                        moving: e.dir != Vec2::ZERO,
                        facing_right,
                        moving_forward: facing_right == moving_right,
                        legs_frame: legs.frame,
                        muzzle_frame: muzzle.frame,
                        invincible: e.invincible,
                    }
                }
                EntityKind::Companion { .. } => SpriteKind::Companion,
                EntityKind::Foe { breed, hit_points, attacking, bite, walk, .. } => {
                    SpriteKind::Foe {
                        breed: *breed,
                        hit_reaction: e.invincible || *hit_points <= 0,
                        attacking: *attacking,
                        facing_right: e.dir.x >= 0.0,
                        bite_frame: bite.frame,
                        walk_frame: walk.frame,
                    }
                }
                EntityKind::Projectile { angle, .. } => SpriteKind::Projectile { angle: *angle },
                EntityKind::Blast { radius, .. } => SpriteKind::Blast {
                    radius: *radius,
                    width: state.atlas.blast.width,
                },
                EntityKind::Text { line, .. } => SpriteKind::Text { line: line.clone() },
                EntityKind::Ingress { opens_at, closes_at, .. } => SpriteKind::Ingress {
                    open: *opens_at <= now && now <= *closes_at,
                },
            };
            Sprite { pos: e.pos, size: e.size, kind }
        })
        .collect()
}

/// Host-side drawing seam. The simulation calls nothing on it; the host
/// pulls a frame whenever it wants one.
pub trait Renderer {
    /// Draw one frame: camera-translated sprites over the map
    fn render_frame(&mut self, state: &GameState, sprites: &[Sprite]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::Atlas;
    use crate::sim::entity::Entity;

    #[test]
    fn test_fresh_game_draw_list() {
        let mut state = GameState::new(3, Atlas::default()).unwrap();
        state.start_game();
        let list = sprites(&state);

        assert_eq!(list.len(), state.entities.len());
        assert_eq!(
            list.iter()
                .filter(|s| matches!(s.kind, SpriteKind::Hero { .. }))
                .count(),
            1
        );
        // Both portals start closed
        assert!(list.iter().all(|s| !matches!(s.kind, SpriteKind::Ingress { open: true })));
    }

    #[test]
    fn test_portal_opens_with_window() {
        let mut state = GameState::new(3, Atlas::default()).unwrap();
        state.start_game();
        state.now = 6.0;
        let list = sprites(&state);
        assert_eq!(
            list.iter()
                .filter(|s| matches!(s.kind, SpriteKind::Ingress { open: true }))
                .count(),
            1
        );
    }

    #[test]
    fn test_foe_hit_reaction() {
        let mut state = GameState::new(3, Atlas::default()).unwrap();
        state.start_game();
        let id = state.next_entity_id();
        let mut foe = Entity::foe(id, &state.atlas, FoeBreed::Tank, glam::Vec2::new(50.0, 50.0));
        foe.grant_invincibility(state.now + 1.0);
        state.entities.push(foe);

        let list = sprites(&state);
        assert!(list.iter().any(|s| matches!(
            s.kind,
            SpriteKind::Foe { hit_reaction: true, .. }
        )));
    }
}

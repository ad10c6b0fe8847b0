//! Entity model: one tagged-variant record per simulated thing
//!
//! Every entity shares position/size/direction/speed plus the two lifecycle
//! deadlines (immunity window, time-to-live); everything else lives in the
//! variant so behavior code gets compile-time exhaustiveness instead of
//! runtime tag checks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::atlas::{Atlas, IngressConfig};
use crate::consts::TEXT_TTL;

/// Foe breeds; a closed set, not an extensible registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoeBreed {
    Scout,
    Tank,
}

impl FoeBreed {
    pub fn name(&self) -> &'static str {
        match self {
            FoeBreed::Scout => "scout",
            FoeBreed::Tank => "tank",
        }
    }
}

/// Looping sprite animation counter. Cosmetic only, never authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub frame: u32,
    pub timer: f32,
}

impl Animation {
    /// Advance by `dt`, stepping `step` frames (can be negative for
    /// backwards walk cycles) modulo `len` when the frame timer rolls over
    pub fn advance(&mut self, dt: f32, step: i32, len: u32) {
        self.timer += dt;
        if self.timer > crate::consts::FRAME_DURATION {
            self.timer -= crate::consts::FRAME_DURATION;
            let next = self.frame as i32 + step + len as i32;
            self.frame = (next as u32) % len;
        }
    }
}

/// Variant-specific entity attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Hero {
        hit_points: i32,
        /// Accumulator toward the next shot; fires when it exceeds attack_rate
        attack_timer: f32,
        attacking: bool,
        /// Aim angle toward the crosshair (atan2, 0 = east)
        aim_angle: f32,
        dead: bool,
        legs: Animation,
        muzzle: Animation,
    },
    /// Orbiting ally; `angle` is its position on the orbit around the hero
    Companion { hit_points: i32, angle: f32 },
    Foe {
        breed: FoeBreed,
        hit_points: i32,
        damage: i32,
        attacking: bool,
        bite: Animation,
        walk: Animation,
    },
    Projectile { damage: i32, angle: f32 },
    /// Expanding ring of area damage; at most one exists at a time
    Blast { radius: f32, max_radius: f32 },
    /// Floating HUD text (companion chatter, breach announcements)
    Text { line: String, shown_since: f64 },
    /// Time-gated spawn portal
    Ingress {
        name: String,
        odds: Vec<(FoeBreed, f32)>,
        /// Spawn cooldown in seconds
        rate: f64,
        opens_at: f64,
        closes_at: f64,
        next_spawn_at: f64,
        announced: bool,
    },
}

/// A simulated entity. `pos` is the top-left of the bounding box except for
/// blasts, whose `pos` is the ring center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Bounding box, both components > 0
    pub size: Vec2,
    /// Unit direction of travel (or zero); displacement is
    /// speed * dt * dir, scaled by cos 45° when both axes are non-zero
    pub dir: Vec2,
    /// px/s, except rad/s for the companion orbit
    pub speed: f32,
    pub invincible: bool,
    pub invincible_until: f64,
    /// Absolute sim timestamp; pruned once `now` passes it
    pub expires_at: f64,
}

impl Entity {
    fn base(id: u32, kind: EntityKind, pos: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            size,
            dir: Vec2::ZERO,
            speed,
            invincible: false,
            invincible_until: 0.0,
            expires_at: f64::INFINITY,
        }
    }

    pub fn hero(id: u32, atlas: &Atlas, pos: Vec2) -> Self {
        Self::base(
            id,
            EntityKind::Hero {
                hit_points: atlas.hero.hit_points,
                attack_timer: 0.0,
                attacking: false,
                aim_angle: 0.0,
                dead: false,
                legs: Animation::default(),
                muzzle: Animation::default(),
            },
            pos,
            atlas.hero.size,
            atlas.hero.speed,
        )
    }

    pub fn companion(id: u32, atlas: &Atlas, hero_center: Vec2) -> Self {
        let stats = &atlas.companion;
        let pos = hero_center + Vec2::new(stats.orbit_factor * stats.size.x, 0.0)
            - stats.size / 2.0;
        Self::base(
            id,
            EntityKind::Companion { hit_points: stats.hit_points, angle: 0.0 },
            pos,
            stats.size,
            stats.speed,
        )
    }

    pub fn foe(id: u32, atlas: &Atlas, breed: FoeBreed, pos: Vec2) -> Self {
        let stats = atlas.foe(breed);
        Self::base(
            id,
            EntityKind::Foe {
                breed,
                hit_points: stats.hit_points,
                damage: stats.damage,
                attacking: false,
                bite: Animation::default(),
                walk: Animation::default(),
            },
            pos,
            stats.size,
            stats.speed,
        )
    }

    pub fn projectile(id: u32, atlas: &Atlas, pos: Vec2, dir: Vec2, angle: f32) -> Self {
        let mut e = Self::base(
            id,
            EntityKind::Projectile { damage: atlas.projectile.damage, angle },
            pos,
            atlas.projectile.size,
            atlas.projectile.speed,
        );
        e.dir = dir;
        e
    }

    pub fn blast(id: u32, atlas: &Atlas, center: Vec2, initial_radius: f32) -> Self {
        Self::base(
            id,
            EntityKind::Blast { radius: initial_radius, max_radius: atlas.blast.max_radius },
            center,
            Vec2::splat(atlas.blast.width),
            atlas.blast.speed,
        )
    }

    pub fn text(id: u32, line: String, pos: Vec2, now: f64) -> Self {
        let mut e = Self::base(
            id,
            EntityKind::Text { line, shown_since: now },
            pos,
            Vec2::splat(1.0),
            0.0,
        );
        e.expires_at = now + TEXT_TTL;
        e
    }

    /// Ingress windows are configured as offsets from game start and
    /// resolved to absolute timestamps here
    pub fn ingress(id: u32, config: &IngressConfig, now: f64) -> Self {
        Self::base(
            id,
            EntityKind::Ingress {
                name: config.name.clone(),
                odds: config.odds.clone(),
                rate: config.rate,
                opens_at: now + config.open_after,
                closes_at: now + config.close_after,
                next_spawn_at: 0.0,
                announced: false,
            },
            config.pos,
            Vec2::splat(crate::consts::TILE_SIZE),
            0.0,
        )
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Remaining hit points, for damageable variants
    pub fn hit_points(&self) -> Option<i32> {
        match &self.kind {
            EntityKind::Hero { hit_points, .. }
            | EntityKind::Companion { hit_points, .. }
            | EntityKind::Foe { hit_points, .. } => Some(*hit_points),
            _ => None,
        }
    }

    pub fn hit_points_mut(&mut self) -> Option<&mut i32> {
        match &mut self.kind {
            EntityKind::Hero { hit_points, .. }
            | EntityKind::Companion { hit_points, .. }
            | EntityKind::Foe { hit_points, .. } => Some(hit_points),
            _ => None,
        }
    }

    #[inline]
    pub fn is_foe(&self) -> bool {
        matches!(self.kind, EntityKind::Foe { .. })
    }

    #[inline]
    pub fn is_projectile(&self) -> bool {
        matches!(self.kind, EntityKind::Projectile { .. })
    }

    #[inline]
    pub fn is_live(&self, now: f64) -> bool {
        self.expires_at > now
    }

    /// Grant an immunity window ending at `until`, never shortening one
    /// already in flight
    pub fn grant_invincibility(&mut self, until: f64) {
        if !self.invincible {
            self.invincible = true;
            self.invincible_until = until;
        }
    }

    /// Mark for removal on the next prune pass
    pub fn expire(&mut self, now: f64) {
        self.expires_at = self.expires_at.min(now);
    }
}

//! Data-driven game balance
//!
//! The atlas is the single static table every entity factory reads from:
//! speeds, sizes, hit points, damage values and the ingress spawn schedule.
//! Defaults are the shipped balance; the whole table can be overridden from
//! JSON for playtesting without a rebuild.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::entity::FoeBreed;

/// Hero attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroStats {
    /// Seconds between shots while the attack button is held
    pub attack_rate: f32,
    pub hit_points: i32,
    /// px/s
    pub speed: f32,
    pub size: Vec2,
}

/// Companion attributes (orbits the hero)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionStats {
    pub hit_points: i32,
    /// rad/s orbit speed
    pub speed: f32,
    pub size: Vec2,
    /// Orbit radius as a multiple of the companion's own width
    pub orbit_factor: f32,
}

/// Projectile attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileStats {
    pub damage: i32,
    /// px/s
    pub speed: f32,
    pub size: Vec2,
}

/// Blast wave attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlastStats {
    /// Radial expansion, px/s
    pub speed: f32,
    pub max_radius: f32,
    /// Ring thickness, cosmetic
    pub width: f32,
}

/// Per-breed foe attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoeStats {
    pub damage: i32,
    pub hit_points: i32,
    /// px/s
    pub speed: f32,
    pub size: Vec2,
}

/// One spawn portal: position, open window (offsets from game start) and
/// weighted foe-type odds.
///
/// Odds are an ordered list, not a map: the cumulative-threshold selection
/// depends on a fixed iteration order, and the last entry catches whatever
/// probability mass the table leaves unassigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressConfig {
    pub name: String,
    pub pos: Vec2,
    pub odds: Vec<(FoeBreed, f32)>,
    /// Spawn cooldown in seconds
    pub rate: f64,
    /// Seconds after game start when the portal opens
    pub open_after: f64,
    /// Seconds after game start when it closes
    pub close_after: f64,
}

/// Static per-type attribute table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Atlas {
    pub hero: HeroStats,
    pub companion: CompanionStats,
    pub projectile: ProjectileStats,
    pub blast: BlastStats,
    pub scout: FoeStats,
    pub tank: FoeStats,
    pub ingresses: Vec<IngressConfig>,
    /// Hero starting position (top-left, map coords)
    pub hero_spawn: Vec2,
    /// Camera starting position (top-left, map coords)
    pub camera_start: Vec2,
}

impl Default for Atlas {
    fn default() -> Self {
        Self {
            hero: HeroStats {
                attack_rate: 0.1,
                hit_points: 100,
                speed: 75.0,
                size: Vec2::new(16.0, 16.0),
            },
            companion: CompanionStats {
                hit_points: 10,
                speed: std::f32::consts::PI,
                size: Vec2::new(8.0, 8.0),
                orbit_factor: 2.5,
            },
            projectile: ProjectileStats {
                damage: 1,
                speed: 400.0,
                size: Vec2::new(1.0, 10.0),
            },
            blast: BlastStats {
                speed: 400.0,
                max_radius: 200.0,
                width: 20.0,
            },
            scout: FoeStats {
                damage: 2,
                hit_points: 1,
                speed: 110.0,
                size: Vec2::new(16.0, 10.0),
            },
            tank: FoeStats {
                damage: 10,
                hit_points: 10,
                speed: 45.0,
                size: Vec2::new(32.0, 32.0),
            },
            ingresses: vec![
                IngressConfig {
                    name: "nw".into(),
                    pos: Vec2::new(32.0, 48.0),
                    odds: vec![(FoeBreed::Tank, 0.0), (FoeBreed::Scout, 1.0)],
                    rate: 1.0,
                    open_after: 5.0,
                    close_after: 35.0,
                },
                IngressConfig {
                    name: "s".into(),
                    pos: Vec2::new(272.0, 432.0),
                    odds: vec![(FoeBreed::Tank, 0.0), (FoeBreed::Scout, 1.0)],
                    rate: 0.75,
                    open_after: 35.0,
                    close_after: 65.0,
                },
            ],
            hero_spawn: Vec2::new(256.0, 208.0),
            camera_start: Vec2::new(160.0, 116.0),
        }
    }
}

/// Companion one-liners, indexed by remaining hit points after a hit
const COMPANION_CHAT: [&str; 10] = [
    "[segfault] access violation",
    "please, don't leave me!",
    "am i going to die?",
    "i don't feel so good...",
    "i'm scared!",
    "what's... what's happening to me?",
    "outch, that really hurt!",
    "did you feel that too?",
    "hey, that was weird...",
    "s.h.e.i.l.d. protocol activated!",
];

impl Atlas {
    /// Parse an atlas override from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn foe(&self, breed: FoeBreed) -> &FoeStats {
        match breed {
            FoeBreed::Scout => &self.scout,
            FoeBreed::Tank => &self.tank,
        }
    }

    /// Companion chatter line for its remaining hit points
    pub fn chatter(&self, hit_points: i32) -> &'static str {
        COMPANION_CHAT[hit_points.clamp(0, COMPANION_CHAT.len() as i32 - 1) as usize]
    }
}

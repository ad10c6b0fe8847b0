//! Spawn controller: time-gated ingress portals
//!
//! Each ingress is itself an entity carrying its open window, cooldown and
//! weighted foe-type odds. While open and off cooldown it emits exactly one
//! foe per tick, picked by a single RNG draw against cumulative odds.

use rand::Rng;

use super::entity::{Entity, EntityKind, FoeBreed};
use super::state::GameState;

/// Weighted selection: one uniform sample in [0,1) scanned against the
/// cumulative odds. The last entry catches whatever probability mass the
/// table leaves unassigned, so a foe is always produced from a non-empty
/// table even if the odds don't sum to 1.
pub fn weighted_pick(odds: &[(FoeBreed, f32)], sample: f32) -> Option<FoeBreed> {
    let mut cumulative = 0.0;
    for (breed, odd) in odds {
        cumulative += odd;
        if sample < cumulative {
            return Some(*breed);
        }
    }
    odds.last().map(|(breed, _)| *breed)
}

/// Run every ingress for this tick: announce newly opened breaches, then
/// spawn from each open, off-cooldown portal. New foes go to the pending
/// buffer and join the world at the end of the tick.
pub fn run_spawns(state: &mut GameState) {
    let now = state.now;
    let mut announcements: Vec<String> = Vec::new();
    let mut spawns: Vec<(FoeBreed, glam::Vec2)> = Vec::new();

    for e in state.entities.iter_mut() {
        let pos = e.pos;
        if let EntityKind::Ingress {
            name,
            odds,
            rate,
            opens_at,
            closes_at,
            next_spawn_at,
            announced,
        } = &mut e.kind
        {
            if now < *opens_at || now > *closes_at {
                continue;
            }
            if !*announced {
                *announced = true;
                announcements.push(format!("breach in sector {name}"));
                log::info!("ingress {name} open until t={closes_at:.0}s");
            }
            if *next_spawn_at < now {
                *next_spawn_at = now + *rate;
                let sample: f32 = state.rng.random();
                if let Some(breed) = weighted_pick(odds, sample) {
                    spawns.push((breed, pos));
                }
            }
        }
    }

    for line in announcements {
        state.queue_text(line);
    }
    for (breed, pos) in spawns {
        let id = state.next_entity_id();
        log::debug!("spawning {} at {pos}", breed.name());
        let foe = Entity::foe(id, &state.atlas, breed, pos);
        state.pending.push(foe);
    }
}

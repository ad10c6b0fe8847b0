//! Damage resolution: projectiles, melee contact, blast waves
//!
//! All three passes mutate entities in place over indices collected up
//! front, so nothing is inserted or removed mid-scan. Removal itself is
//! deferred: a defeated entity keeps its hit-reaction sprite on screen for
//! the rest of its immunity window and is only expired when that window
//! lapses.

use super::entity::{Entity, EntityKind};
use super::geometry::overlap;
use crate::consts::INVINCIBLE_DURATION;

/// Projectile-vs-foe pass. Each live projectile damages at most the first
/// non-invincible foe it overlaps (collection order), grants that foe an
/// immunity window, and is itself spent.
pub fn projectile_attacks(entities: &mut [Entity], now: f64) {
    let projectile_idxs: Vec<usize> = entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_projectile() && e.is_live(now))
        .map(|(i, _)| i)
        .collect();
    let foe_idxs: Vec<usize> = entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_foe())
        .map(|(i, _)| i)
        .collect();

    for &pi in &projectile_idxs {
        let (p_pos, p_size, p_damage) = {
            let p = &entities[pi];
            let EntityKind::Projectile { damage, .. } = p.kind else { continue };
            (p.pos, p.size, damage)
        };

        for &fi in &foe_idxs {
            let foe = &entities[fi];
            if foe.invincible || !overlap(p_pos, p_size, foe.pos, foe.size).collides {
                continue;
            }
            let foe = &mut entities[fi];
            if let EntityKind::Foe { hit_points, .. } = &mut foe.kind {
                *hit_points -= p_damage;
            }
            foe.grant_invincibility(now + INVINCIBLE_DURATION);
            // Projectile spent; no further foes checked for it
            entities[pi].expire(now);
            break;
        }
    }
}

/// Blast-vs-foe pass. Every foe whose center is inside the blast's current
/// radius is defeated outright. Immunity windows already in flight are left
/// untouched; a missing one is granted so the hit reaction shows.
pub fn blast_attacks(entities: &mut [Entity], now: f64) {
    let Some((center, radius)) = entities.iter().find_map(|e| match e.kind {
        EntityKind::Blast { radius, .. } if e.is_live(now) => Some((e.pos, radius)),
        _ => None,
    }) else {
        return;
    };

    for foe in entities.iter_mut().filter(|e| e.is_foe()) {
        if foe.center().distance(center) < radius {
            if let EntityKind::Foe { hit_points, .. } = &mut foe.kind {
                *hit_points = 0;
            }
            foe.grant_invincibility(now + INVINCIBLE_DURATION);
        }
    }
}

/// What a melee pass did, so the orchestrator can follow up (action pause,
/// blast trigger, companion chatter)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeleeOutcome {
    None,
    /// The companion shielded the hero and lost one hit point
    CompanionAbsorbed { remaining: i32 },
    /// The hero took the foe's full contact damage
    HeroWounded { remaining: i32 },
}

/// Melee contact pass. The first live foe overlapping a vulnerable hero
/// lands a hit; with `companion_shield` on and the companion still alive,
/// the companion absorbs it (one hit point per hit) instead of the hero.
/// Either way the hero gets an immunity window, so at most one foe connects
/// per pass.
pub fn melee_attacks(entities: &mut [Entity], companion_shield: bool, now: f64) -> MeleeOutcome {
    let Some(hero_idx) = entities
        .iter()
        .position(|e| matches!(e.kind, EntityKind::Hero { .. }))
    else {
        return MeleeOutcome::None;
    };
    if entities[hero_idx].invincible {
        return MeleeOutcome::None;
    }
    let (hero_pos, hero_size) = (entities[hero_idx].pos, entities[hero_idx].size);

    let companion_idx = entities
        .iter()
        .position(|e| matches!(e.kind, EntityKind::Companion { .. }));
    let companion_hp = companion_idx
        .and_then(|i| entities[i].hit_points())
        .unwrap_or(0);

    let foe_idxs: Vec<usize> = entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_foe())
        .map(|(i, _)| i)
        .collect();

    for &fi in &foe_idxs {
        let foe = &entities[fi];
        let alive = foe.hit_points().unwrap_or(0) > 0;
        if !alive || !overlap(foe.pos, foe.size, hero_pos, hero_size).collides {
            continue;
        }

        let foe_damage = match &mut entities[fi].kind {
            EntityKind::Foe { damage, attacking, .. } => {
                *attacking = true;
                *damage
            }
            _ => continue,
        };

        // Who really takes the damage?
        let outcome = if companion_shield && companion_hp > 0 {
            let ci = companion_idx.expect("companion_hp > 0 implies companion exists");
            let EntityKind::Companion { hit_points, .. } = &mut entities[ci].kind else {
                unreachable!()
            };
            *hit_points -= 1;
            MeleeOutcome::CompanionAbsorbed { remaining: *hit_points }
        } else {
            let EntityKind::Hero { hit_points, .. } = &mut entities[hero_idx].kind else {
                unreachable!()
            };
            *hit_points -= foe_damage;
            MeleeOutcome::HeroWounded { remaining: *hit_points }
        };

        entities[hero_idx].grant_invincibility(now + INVINCIBLE_DURATION);
        // Hero can't be hurt again this window; no further foes checked
        return outcome;
    }

    MeleeOutcome::None
}

/// Immunity expiry pass. Clears lapsed windows; an entity that ran out of
/// hit points while shielded is only now scheduled for removal. Returns
/// true if the hero's window lapsed with zero hit points (the death the
/// orchestrator turns into a game-over pause).
pub fn expire_invincibility(entities: &mut [Entity], now: f64) -> bool {
    let mut hero_died = false;

    for e in entities.iter_mut() {
        if !e.invincible || e.invincible_until >= now {
            continue;
        }
        e.invincible = false;
        if e.hit_points().is_some_and(|hp| hp <= 0) {
            e.expire(now);
            if let EntityKind::Hero { dead, .. } = &mut e.kind {
                *dead = true;
                hero_died = true;
            }
        }
    }

    hero_died
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::Atlas;
    use crate::sim::entity::FoeBreed;
    use glam::Vec2;

    fn atlas() -> Atlas {
        Atlas::default()
    }

    #[test]
    fn test_projectile_hits_at_most_one_foe() {
        let a = atlas();
        let mut entities = vec![
            Entity::projectile(1, &a, Vec2::new(10.0, 10.0), Vec2::X, 0.0),
            Entity::foe(2, &a, FoeBreed::Tank, Vec2::new(5.0, 5.0)),
            Entity::foe(3, &a, FoeBreed::Tank, Vec2::new(6.0, 6.0)),
        ];

        projectile_attacks(&mut entities, 1.0);

        // First foe in collection order takes the hit and becomes immune
        assert_eq!(entities[1].hit_points(), Some(9));
        assert!(entities[1].invincible);
        // Second overlapping foe is untouched
        assert_eq!(entities[2].hit_points(), Some(10));
        assert!(!entities[2].invincible);
        // Projectile is spent
        assert!(!entities[0].is_live(1.0));
    }

    #[test]
    fn test_projectile_skips_invincible_foe() {
        let a = atlas();
        let mut shielded = Entity::foe(2, &a, FoeBreed::Tank, Vec2::new(5.0, 5.0));
        shielded.grant_invincibility(10.0);
        let mut entities = vec![
            Entity::projectile(1, &a, Vec2::new(10.0, 10.0), Vec2::X, 0.0),
            shielded,
            Entity::foe(3, &a, FoeBreed::Tank, Vec2::new(6.0, 6.0)),
        ];

        projectile_attacks(&mut entities, 1.0);

        assert_eq!(entities[1].hit_points(), Some(10));
        // The next vulnerable foe takes the hit instead
        assert_eq!(entities[2].hit_points(), Some(9));
        assert!(!entities[0].is_live(1.0));
    }

    #[test]
    fn test_spent_projectile_is_inert() {
        let a = atlas();
        let mut spent = Entity::projectile(1, &a, Vec2::new(10.0, 10.0), Vec2::X, 0.0);
        spent.expire(0.5);
        let mut entities = vec![spent, Entity::foe(2, &a, FoeBreed::Tank, Vec2::new(5.0, 5.0))];

        projectile_attacks(&mut entities, 1.0);
        assert_eq!(entities[1].hit_points(), Some(10));
    }

    #[test]
    fn test_melee_redirects_to_companion() {
        let a = atlas();
        let hero = Entity::hero(1, &a, Vec2::new(100.0, 100.0));
        let companion = Entity::companion(2, &a, hero.center());
        let foe = Entity::foe(3, &a, FoeBreed::Scout, Vec2::new(104.0, 104.0));
        let mut entities = vec![hero, companion, foe];

        let outcome = melee_attacks(&mut entities, true, 1.0);

        assert_eq!(outcome, MeleeOutcome::CompanionAbsorbed { remaining: 9 });
        assert_eq!(entities[0].hit_points(), Some(100));
        assert_eq!(entities[1].hit_points(), Some(9));
        assert!(entities[0].invincible);
        // Attacker shows its bite animation
        assert!(matches!(entities[2].kind, EntityKind::Foe { attacking: true, .. }));
    }

    #[test]
    fn test_melee_falls_through_to_hero_when_companion_down() {
        let a = atlas();
        let hero = Entity::hero(1, &a, Vec2::new(100.0, 100.0));
        let mut companion = Entity::companion(2, &a, hero.center());
        if let EntityKind::Companion { hit_points, .. } = &mut companion.kind {
            *hit_points = 0;
        }
        let foe = Entity::foe(3, &a, FoeBreed::Scout, Vec2::new(104.0, 104.0));
        let mut entities = vec![hero, companion, foe];

        let outcome = melee_attacks(&mut entities, true, 1.0);

        // Scout damage is 2
        assert_eq!(outcome, MeleeOutcome::HeroWounded { remaining: 98 });
        assert_eq!(entities[0].hit_points(), Some(98));
    }

    #[test]
    fn test_melee_shield_flag_off_hits_hero_directly() {
        let a = atlas();
        let hero = Entity::hero(1, &a, Vec2::new(100.0, 100.0));
        let companion = Entity::companion(2, &a, hero.center());
        let foe = Entity::foe(3, &a, FoeBreed::Tank, Vec2::new(104.0, 104.0));
        let mut entities = vec![hero, companion, foe];

        let outcome = melee_attacks(&mut entities, false, 1.0);

        assert_eq!(outcome, MeleeOutcome::HeroWounded { remaining: 90 });
        assert_eq!(entities[1].hit_points(), Some(10));
    }

    #[test]
    fn test_melee_respects_hero_invincibility() {
        let a = atlas();
        let mut hero = Entity::hero(1, &a, Vec2::new(100.0, 100.0));
        hero.grant_invincibility(5.0);
        let foe = Entity::foe(2, &a, FoeBreed::Scout, Vec2::new(104.0, 104.0));
        let mut entities = vec![hero, foe];

        assert_eq!(melee_attacks(&mut entities, true, 1.0), MeleeOutcome::None);
        assert_eq!(entities[0].hit_points(), Some(100));
    }

    #[test]
    fn test_dead_foe_cannot_melee() {
        let a = atlas();
        let hero = Entity::hero(1, &a, Vec2::new(100.0, 100.0));
        let mut foe = Entity::foe(2, &a, FoeBreed::Scout, Vec2::new(104.0, 104.0));
        if let EntityKind::Foe { hit_points, .. } = &mut foe.kind {
            *hit_points = 0;
        }
        let mut entities = vec![hero, foe];

        assert_eq!(melee_attacks(&mut entities, true, 1.0), MeleeOutcome::None);
    }

    #[test]
    fn test_blast_defeats_foes_in_radius_unconditionally() {
        let a = atlas();
        let mut blast = Entity::blast(1, &a, Vec2::new(100.0, 100.0), 50.0);
        if let EntityKind::Blast { radius, .. } = &mut blast.kind {
            *radius = 50.0;
        }
        // One foe inside with an existing immunity window, one outside
        let mut shielded = Entity::foe(2, &a, FoeBreed::Tank, Vec2::new(110.0, 100.0));
        shielded.grant_invincibility(7.5);
        let far = Entity::foe(3, &a, FoeBreed::Tank, Vec2::new(300.0, 300.0));
        let mut entities = vec![blast, shielded, far];

        blast_attacks(&mut entities, 1.0);

        // Existing windows are immune to nothing: hit points still zeroed
        assert_eq!(entities[1].hit_points(), Some(0));
        // ...but the window itself is not extended or shortened
        assert_eq!(entities[1].invincible_until, 7.5);
        assert_eq!(entities[2].hit_points(), Some(10));
    }

    #[test]
    fn test_expiry_schedules_removal_only_after_window() {
        let a = atlas();
        let mut foe = Entity::foe(1, &a, FoeBreed::Scout, Vec2::ZERO);
        if let EntityKind::Foe { hit_points, .. } = &mut foe.kind {
            *hit_points = 0;
        }
        foe.grant_invincibility(2.0);
        let mut entities = vec![foe];

        // Window still open: nothing happens
        expire_invincibility(&mut entities, 1.5);
        assert!(entities[0].invincible);
        assert!(entities[0].is_live(1.5));

        // Window lapsed: cleared and scheduled for removal this pass
        expire_invincibility(&mut entities, 2.1);
        assert!(!entities[0].invincible);
        assert!(!entities[0].is_live(2.1));
    }

    #[test]
    fn test_hero_death_reported_on_expiry() {
        let a = atlas();
        let mut hero = Entity::hero(1, &a, Vec2::ZERO);
        if let EntityKind::Hero { hit_points, .. } = &mut hero.kind {
            *hit_points = 0;
        }
        hero.grant_invincibility(2.0);
        let mut entities = vec![hero];

        assert!(!expire_invincibility(&mut entities, 1.0));
        assert!(expire_invincibility(&mut entities, 3.0));
        assert!(matches!(entities[0].kind, EntityKind::Hero { dead: true, .. }));
    }
}

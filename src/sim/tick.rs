//! Simulation orchestrator
//!
//! One `tick` advances the whole game by one frame: screen state machine
//! first, then (while playing) the fixed update pipeline. The stage order
//! is load-bearing — damage is detected before positions are corrected, so
//! a foe that touched the hero this frame deals damage even if the
//! collision pass then pushes it back out.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, TAU};

use super::combat::{MeleeOutcome, blast_attacks, expire_invincibility, melee_attacks, projectile_attacks};
use super::entity::{Entity, EntityKind};
use super::geometry::{direction_and_angle, overlap, point_on_circle};
use super::spawn::run_spawns;
use super::state::{GameState, Screen};
use crate::consts::{MAX_ELAPSED, STOP_TIME_HERO_DEAD, STOP_TIME_HERO_HIT, TIME_TO_FULL_SPEED};
use crate::{diagonal_scale, lerp};

/// Per-frame input snapshot, already digested by the host: movement keys
/// carry the absolute sim time they were pressed at (for the ramp-up
/// curve), the pointer is in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub left_since: Option<f64>,
    pub right_since: Option<f64>,
    pub up_since: Option<f64>,
    pub down_since: Option<f64>,
    /// Fire button held
    pub attack: bool,
    /// Pointer position relative to the viewport top-left
    pub pointer: Vec2,
    /// Any-key/click confirmation on menu screens
    pub confirm: bool,
}

/// Advance the simulation by `elapsed` seconds of host time.
///
/// The clock always advances, even on menu screens and during the global
/// action pause, so absolute deadlines stay meaningful across screens.
pub fn tick(state: &mut GameState, input: &TickInput, elapsed: f64) {
    let elapsed = elapsed.clamp(0.0, MAX_ELAPSED);
    state.now += elapsed;

    match state.screen {
        Screen::Title => {
            if input.confirm {
                state.screen = Screen::Intro;
                log::info!("entering intro");
            }
        }
        Screen::Intro => {
            if input.confirm {
                state.start_game();
            }
        }
        Screen::GameOver => {
            if input.confirm {
                state.screen = Screen::Title;
                log::info!("back to title");
            }
        }
        Screen::Playing => playing_update(state, input, elapsed),
    }
}

fn playing_update(state: &mut GameState, input: &TickInput, elapsed: f64) {
    // Global action pause: hit-stop and the post-death beat. Rendering
    // keeps going on the host side; the world stands still.
    if state.now < state.stop_until {
        return;
    }
    let hero_down = match state.hero() {
        None => true,
        Some(h) => matches!(h.kind, EntityKind::Hero { dead: true, .. }),
    };
    if hero_down {
        state.screen = Screen::GameOver;
        log::info!("game over at t={:.1}s", state.now);
        return;
    }

    let dt = elapsed as f32;
    state.crosshair = input.pointer + state.camera.pos;

    update_hero(state, input, elapsed);
    run_spawns(state);
    integrate(state, dt);
    steer_foes(state);

    let now = state.now;
    projectile_attacks(&mut state.entities, now);
    blast_attacks(&mut state.entities, now);
    handle_melee(state);

    entity_collisions(state);
    wall_collisions(state);
    update_timers(state, dt);

    if let Some(hero) = state.hero() {
        let (pos, size) = (hero.pos, hero.size);
        state.camera.follow(pos, size);
    }
    state.merge_and_prune();
}

/// Ramp factor for a key held since `since`: zero at the instant of the
/// press, full speed `TIME_TO_FULL_SPEED` later
fn ramp(now: f64, since: f64) -> f32 {
    lerp(0.0, 1.0, ((now - since) / TIME_TO_FULL_SPEED) as f32)
}

/// One movement axis from its two opposing keys. With both held, the
/// later-pressed key wins the sign and the ramp restarts from its press.
fn axis(now: f64, negative: Option<f64>, positive: Option<f64>) -> f32 {
    match (negative, positive) {
        (None, None) => 0.0,
        (Some(n), None) => -ramp(now, n),
        (None, Some(p)) => ramp(now, p),
        (Some(n), Some(p)) => {
            let sign = if n > p { -1.0 } else { 1.0 };
            sign * ramp(now, n.max(p))
        }
    }
}

fn update_hero(state: &mut GameState, input: &TickInput, elapsed: f64) {
    let now = state.now;
    let crosshair = state.crosshair;
    let attack_rate = state.atlas.hero.attack_rate;

    let dir = Vec2::new(
        axis(now, input.left_since, input.right_since),
        axis(now, input.up_since, input.down_since),
    );

    let mut shot: Option<(Vec2, Vec2, f32)> = None;
    let Some(hero) = state.hero_mut() else { return };
    hero.dir = dir;
    let hero_center = hero.center();
    let muzzle_radius = hero.size.x;

    if let EntityKind::Hero { attack_timer, attacking, aim_angle, .. } = &mut hero.kind {
        match direction_and_angle(hero_center, crosshair) {
            Some((aim_dir, angle)) => {
                *aim_angle = angle;
                *attacking = input.attack;
                if input.attack {
                    // First press fires immediately: the accumulator starts
                    // a full period in
                    if *attack_timer == 0.0 {
                        *attack_timer = attack_rate;
                    }
                    *attack_timer += elapsed as f32;
                    if *attack_timer > attack_rate {
                        *attack_timer %= attack_rate;
                        let pos = point_on_circle(hero_center, muzzle_radius, angle);
                        shot = Some((pos, aim_dir, angle));
                    }
                } else {
                    *attack_timer = 0.0;
                }
            }
            // Crosshair dead on the hero: keep the previous aim, hold fire
            None => *attacking = false,
        }
    }

    if let Some((pos, aim_dir, angle)) = shot {
        let id = state.next_entity_id();
        state
            .pending
            .push(Entity::projectile(id, &state.atlas, pos, aim_dir, angle));
    }
}

/// Move everything by its velocity: linear for box entities, radial for the
/// blast, angular for the companion orbit
fn integrate(state: &mut GameState, dt: f32) {
    let hero_center = state.hero().map(|h| h.center());
    let orbit_factor = state.atlas.companion.orbit_factor;

    for e in state.entities.iter_mut() {
        match &mut e.kind {
            EntityKind::Companion { angle, .. } => {
                if let Some(center) = hero_center {
                    *angle = (*angle + e.speed * dt) % TAU;
                    let orbit = orbit_factor * e.size.x;
                    e.pos = point_on_circle(center, orbit, *angle) - e.size / 2.0;
                }
            }
            EntityKind::Blast { radius, .. } => {
                *radius += e.speed * dt;
            }
            _ => {
                if e.dir != Vec2::ZERO {
                    e.pos += e.dir * (e.speed * dt * diagonal_scale(e.dir));
                }
            }
        }
    }
}

/// Point every foe at the hero; applied next integration pass. Defeated
/// foes stand still on their hit sprite for the rest of their immunity
/// window, and a missing or dead hero leaves the rest standing too.
fn steer_foes(state: &mut GameState) {
    let target = state.hero().and_then(|h| match h.kind {
        EntityKind::Hero { dead: false, .. } => Some(h.center()),
        _ => None,
    });

    for e in state.entities.iter_mut() {
        if !e.is_foe() {
            continue;
        }
        if e.hit_points().is_some_and(|hp| hp <= 0) {
            e.dir = Vec2::ZERO;
            continue;
        }
        let center = e.center();
        e.dir = match target.and_then(|t| direction_and_angle(center, t)) {
            Some((dir, _)) => dir,
            None => Vec2::ZERO,
        };
    }
}

fn handle_melee(state: &mut GameState) {
    let now = state.now;
    let outcome = melee_attacks(&mut state.entities, state.companion_shield, now);
    if outcome == MeleeOutcome::None {
        return;
    }

    // Any landed hit suspends the action for a beat
    state.stop_until = now + STOP_TIME_HERO_HIT;

    if let MeleeOutcome::CompanionAbsorbed { remaining } = outcome {
        let line = state.atlas.chatter(remaining).to_string();
        state.queue_chatter(line);
    }

    // A hit with the companion still standing answers with a blast wave
    let companion_alive = state
        .companion()
        .and_then(|c| c.hit_points())
        .is_some_and(|hp| hp > 0);
    if companion_alive {
        state.spawn_blast();
    }
}

/// Pairwise push-apart between the hero and still-live foes. Foes come
/// first in the pair ordering so the foe's velocity drives the axis
/// tie-break; an idle hero would otherwise contribute a zero displacement
/// and the pair would never separate.
fn entity_collisions(state: &mut GameState) {
    let now = state.now;
    let mut idxs: Vec<usize> = state
        .entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_live(now) && e.is_foe())
        .map(|(i, _)| i)
        .collect();
    if let Some(hi) = state
        .entities
        .iter()
        .position(|e| matches!(e.kind, EntityKind::Hero { .. }))
    {
        if state.entities[hi].is_live(now) {
            idxs.push(hi);
        }
    }

    for i in 0..idxs.len() {
        for j in (i + 1)..idxs.len() {
            let (ai, bi) = (idxs[i], idxs[j]);
            let ov = overlap(
                state.entities[ai].pos,
                state.entities[ai].size,
                state.entities[bi].pos,
                state.entities[bi].size,
            );
            if !ov.collides {
                continue;
            }
            let vel = state.entities[ai].dir;
            let mut a_pos = state.entities[ai].pos;
            let mut b_pos = state.entities[bi].pos;
            super::collision::resolve_symmetric(&mut a_pos, vel, &mut b_pos, &ov);
            state.entities[ai].pos = a_pos;
            state.entities[bi].pos = b_pos;
        }
    }
}

/// One-sided resolution of every mover against the static walls.
/// Projectiles don't get displaced, they just die on impact.
fn wall_collisions(state: &mut GameState) {
    let now = state.now;
    for e in state.entities.iter_mut() {
        let movable = matches!(
            e.kind,
            EntityKind::Hero { .. } | EntityKind::Foe { .. } | EntityKind::Projectile { .. }
        );
        if !movable || !e.is_live(now) {
            continue;
        }
        let vel = e.dir;
        for wall in &state.walls {
            let ov = overlap(e.pos, e.size, wall.min, wall.size);
            if !ov.collides {
                continue;
            }
            if e.is_projectile() {
                e.expire(now);
                break;
            }
            super::collision::resolve_against_wall(&mut e.pos, vel, &ov);
        }
    }
}

fn update_timers(state: &mut GameState, dt: f32) {
    let now = state.now;

    if expire_invincibility(&mut state.entities, now) {
        state.stop_until = now + STOP_TIME_HERO_DEAD;
        log::info!("hero is down");
    }

    let mut companion_lost = false;
    for e in state.entities.iter_mut() {
        // Lifecycle checks that read variant state
        let done = match &e.kind {
            EntityKind::Blast { radius, max_radius } => *radius >= *max_radius,
            EntityKind::Companion { hit_points, .. } => *hit_points <= 0,
            _ => false,
        };
        if done {
            companion_lost |= matches!(e.kind, EntityKind::Companion { .. });
            e.expire(now);
        }

        // Animation counters
        let dir = e.dir;
        match &mut e.kind {
            EntityKind::Hero { aim_angle, attacking, legs, muzzle, .. } => {
                if dir != Vec2::ZERO {
                    let aiming_right = (-FRAC_PI_2..FRAC_PI_2).contains(aim_angle);
                    let moving_right = dir.x >= 0.0;
                    // Walk the cycle backwards when strafing against the aim
                    let step = if aiming_right == moving_right { 1 } else { -1 };
                    legs.advance(dt, step, 4);
                }
                if *attacking {
                    muzzle.advance(dt, 1, 3);
                }
            }
            EntityKind::Foe { bite, walk, .. } => {
                bite.advance(dt, 1, 2);
                walk.advance(dt, 1, 3);
            }
            _ => {}
        }
    }

    if companion_lost {
        log::info!("companion destroyed");
    }
}

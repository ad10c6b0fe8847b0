//! Game state: the single simulation context every pipeline stage receives
//!
//! All mutable simulation state lives here: the entity collection, the
//! seeded RNG, the camera, the screen state machine and the global action
//! pause. The orchestrator owns it exclusively for the duration of a tick;
//! collaborators (renderer, input) only see it between ticks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::camera::Camera;
use super::entity::{Entity, EntityKind};
use crate::atlas::Atlas;
use crate::consts::CHARSET_SIZE;
use crate::map::{LEVEL, MapError, Wall, load_walls};

/// Screen-level state machine: Title -> Intro -> Playing -> GameOver -> Title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Title,
    Intro,
    Playing,
    GameOver,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed, reapplied on every restart for reproducibility
    pub seed: u64,
    pub screen: Screen,
    /// Simulation clock in seconds, accumulated from tick deltas
    pub now: f64,
    /// Global action pause: the update pipeline is skipped while
    /// `now < stop_until` (rendering continues, producing a freeze frame)
    pub stop_until: f64,
    pub camera: Camera,
    /// Aim target in map coordinates
    pub crosshair: Vec2,
    /// When on, a live companion absorbs melee damage in the hero's place
    pub companion_shield: bool,
    pub atlas: Atlas,
    /// Static collision geometry, built once from the tile map
    pub walls: Vec<Wall>,
    /// The one ordered entity collection; mutated in place during a tick
    pub entities: Vec<Entity>,
    /// Entities spawned mid-tick, merged after the last pipeline stage so
    /// no pass ever mutates the collection it is iterating
    pub pending: Vec<Entity>,
    pub hero_id: u32,
    pub companion_id: u32,
    /// At most one blast wave exists at a time
    pub blast_id: Option<u32>,
    pub rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Build a fresh context on the title screen. Walls are parsed once;
    /// a bad level string is a build-time defect surfaced here.
    pub fn new(seed: u64, atlas: Atlas) -> Result<Self, MapError> {
        let walls = load_walls(LEVEL)?;
        Ok(Self {
            seed,
            screen: Screen::Title,
            now: 0.0,
            stop_until: 0.0,
            camera: Camera::new(atlas.camera_start),
            crosshair: Vec2::ZERO,
            companion_shield: true,
            atlas,
            walls,
            entities: Vec::new(),
            pending: Vec::new(),
            hero_id: 0,
            companion_id: 0,
            blast_id: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// (Re)populate the world and enter Playing. Called from the intro
    /// screen and again on every restart; the RNG is re-seeded so a given
    /// seed always produces the same run.
    pub fn start_game(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.camera = Camera::new(self.atlas.camera_start);
        self.crosshair = Vec2::ZERO;
        self.stop_until = 0.0;
        self.blast_id = None;
        self.entities.clear();
        self.pending.clear();

        let configs = self.atlas.ingresses.clone();
        for config in &configs {
            let id = self.next_entity_id();
            self.entities.push(Entity::ingress(id, config, self.now));
        }

        let hero_id = self.next_entity_id();
        let hero = Entity::hero(hero_id, &self.atlas, self.atlas.hero_spawn);
        let hero_center = hero.center();
        self.hero_id = hero_id;
        self.entities.push(hero);

        let companion_id = self.next_entity_id();
        self.entities
            .push(Entity::companion(companion_id, &self.atlas, hero_center));
        self.companion_id = companion_id;

        self.screen = Screen::Playing;
        log::info!("game started (seed {})", self.seed);
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn hero(&self) -> Option<&Entity> {
        self.entity(self.hero_id)
    }

    pub fn hero_mut(&mut self) -> Option<&mut Entity> {
        let id = self.hero_id;
        self.entity_mut(id)
    }

    pub fn companion(&self) -> Option<&Entity> {
        self.entity(self.companion_id)
    }

    pub fn foe_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_foe()).count()
    }

    /// Queue a floating HUD text line (shown top-left, next to the
    /// companion health gauge)
    pub fn queue_text(&mut self, line: String) {
        let pos = Vec2::new(
            4.0 * self.atlas.companion.size.x + CHARSET_SIZE,
            2.0 * CHARSET_SIZE,
        );
        let id = self.next_entity_id();
        let now = self.now;
        self.pending.push(Entity::text(id, line, pos, now));
    }

    /// Companion chatter replaces whatever text is currently showing
    pub fn queue_chatter(&mut self, line: String) {
        let now = self.now;
        for e in &mut self.entities {
            if matches!(e.kind, EntityKind::Text { .. }) {
                e.expire(now);
            }
        }
        self.queue_text(line);
    }

    /// Spawn the singleton blast wave on the hero, if none is in flight
    pub fn spawn_blast(&mut self) {
        if self.blast_id.is_some() {
            return;
        }
        let Some(hero) = self.hero() else { return };
        let center = hero.center();
        let initial_radius = hero.size.x;
        let id = self.next_entity_id();
        self.blast_id = Some(id);
        self.pending
            .push(Entity::blast(id, &self.atlas, center, initial_radius));
        log::debug!("blast wave triggered at {center}");
    }

    /// Merge mid-tick spawns, then drop everything whose time-to-live has
    /// passed (the second phase of mark-then-compact removal)
    pub fn merge_and_prune(&mut self) {
        self.entities.append(&mut self.pending);
        let now = self.now;
        self.entities.retain(|e| e.is_live(now));
        if let Some(id) = self.blast_id {
            if self.entity(id).is_none() {
                self.blast_id = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_game_matches_configuration() {
        let mut state = GameState::new(7, Atlas::default()).unwrap();
        assert_eq!(state.screen, Screen::Title);
        assert!(state.entities.is_empty());

        state.start_game();
        assert_eq!(state.screen, Screen::Playing);
        let hero = state.hero().unwrap();
        assert_eq!(hero.pos, state.atlas.hero_spawn);
        assert_eq!(hero.hit_points(), Some(state.atlas.hero.hit_points));
        // No foes until the first portal opens
        assert_eq!(state.foe_count(), 0);
        assert_eq!(state.camera.pos, state.atlas.camera_start);
    }

    #[test]
    fn test_restart_rebuilds_world() {
        let mut state = GameState::new(7, Atlas::default()).unwrap();
        state.start_game();
        let first_hero_id = state.hero_id;
        if let Some(hp) = state.hero_mut().unwrap().hit_points_mut() {
            *hp = 1;
        }

        state.start_game();
        assert_ne!(state.hero_id, first_hero_id);
        assert_eq!(state.hero().unwrap().hit_points(), Some(100));
        assert!(state.blast_id.is_none());
    }

    #[test]
    fn test_blast_is_singleton() {
        let mut state = GameState::new(7, Atlas::default()).unwrap();
        state.start_game();
        state.spawn_blast();
        let first = state.blast_id;
        assert!(first.is_some());
        state.spawn_blast();
        assert_eq!(state.blast_id, first);
        assert_eq!(state.pending.len(), 1);
    }

    #[test]
    fn test_chatter_flushes_previous_text() {
        let mut state = GameState::new(7, Atlas::default()).unwrap();
        state.start_game();
        state.queue_text("breach in sector nw".into());
        state.merge_and_prune();

        state.queue_chatter("hey, that was weird...".into());
        state.merge_and_prune();

        let texts: Vec<&Entity> = state
            .entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Text { .. }))
            .collect();
        assert_eq!(texts.len(), 1);
        assert!(matches!(
            &texts[0].kind,
            EntityKind::Text { line, .. } if line == "hey, that was weird..."
        ));
    }

    #[test]
    fn test_prune_drops_expired() {
        let mut state = GameState::new(7, Atlas::default()).unwrap();
        state.start_game();
        let before = state.entities.len();
        state.now = 100.0;
        let id = state.hero_id;
        state.entity_mut(id).unwrap().expire(100.0);
        state.merge_and_prune();
        assert_eq!(state.entities.len(), before - 1);
        assert!(state.hero().is_none());
    }
}

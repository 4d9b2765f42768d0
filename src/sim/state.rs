//! Game state and world entity types
//!
//! Everything the per-tick update mutates lives here. The state owns a
//! seeded RNG so platform chains and enemy spawns are reproducible from
//! the run seed.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::sim::motion::Character;
use crate::sim::platforms::{Platform, generate_platform, starting_platform};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Start menu; the first loud sample begins a run
    Attract,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
}

/// Events emitted by a tick for the outer loop to log and persist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    RunStarted,
    RunEnded { score: u32 },
    ShotFired,
    EnemyKilled,
}

/// An enemy walking on a platform
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    /// Left edge of the sprite
    pub x: f32,
    /// Top of the sprite
    pub y: f32,
}

impl Enemy {
    /// Spawn on `platform` at a random position within its span
    pub fn on_platform(rng: &mut Pcg32, platform: &Platform) -> Self {
        let lo = platform.x + TILE_SIZE / 2.0;
        let hi = platform.x + (platform.width as f32 - 0.5) * TILE_SIZE;
        let x = if lo < hi { rng.random_range(lo..=hi) } else { lo };
        Self {
            x,
            y: platform.y - ENEMY_SIZE,
        }
    }

    /// Footprint center used for circular collision checks
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + ENEMY_SIZE / 2.0, self.y + ENEMY_SIZE / 2.0)
    }

    /// Enemies drift with the platforms
    pub fn advance(&mut self, speed: f32) {
        self.x -= DRIFT_FACTOR * speed;
    }

    pub fn off_screen(&self) -> bool {
        self.x < -ENEMY_SIZE * 2.0
    }
}

/// A projectile fired by the character
///
/// Flies right at the speed captured at spawn; once it touches an enemy it
/// stops and scrolls left with the world until off screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    /// Forward speed captured at spawn time
    speed: f32,
    pub touched: bool,
}

impl Projectile {
    /// Spawn offset from the character sprite's top-left corner
    pub fn new(character_x: f32, character_y: f32, speed: f32) -> Self {
        Self {
            x: character_x + PROJECTILE_SIZE,
            y: character_y + PROJECTILE_SIZE,
            speed,
            touched: false,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x + PROJECTILE_SIZE / 2.0,
            self.y + PROJECTILE_SIZE / 2.0,
        )
    }

    /// Mark as collided: stops flying and scrolls out with the world
    pub fn touch(&mut self) {
        self.touched = true;
        self.speed = 0.0;
    }

    pub fn advance(&mut self, scroll: f32) {
        if self.touched {
            self.x -= scroll;
        } else {
            self.x += self.speed;
        }
    }

    /// Still on screen (with margins on both sides)
    pub fn active(&self) -> bool {
        self.x <= 1.25 * SCREEN_WIDTH && self.x + PROJECTILE_SIZE >= -100.0
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    /// Phase to resume into when unpausing
    pub paused_from: GamePhase,
    /// World scroll speed (pixels/tick at the drift factor)
    pub speed: f32,
    pub kills: u32,
    /// Shot charge accumulated from the frequency channel
    pub charge: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Character,
    /// Platform generation chain, oldest first
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub rng: Pcg32,
}

impl GameState {
    /// Number of platforms generated ahead at run start
    const LOOKAHEAD: usize = 6;

    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            phase: GamePhase::Attract,
            paused_from: GamePhase::Attract,
            speed: BASE_SCROLL_SPEED,
            kills: 0,
            charge: 0.0,
            time_ticks: 0,
            player: Character::new(),
            platforms: vec![starting_platform()],
            enemies: Vec::new(),
            projectiles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        state.construct_platforms(Self::LOOKAHEAD);
        state
    }

    /// Extend the platform chain by `n`, spawning enemies on some of the
    /// new platforms (wider than one tile, capped concurrent count).
    pub fn construct_platforms(&mut self, n: usize) {
        for _ in 0..n {
            let previous = self
                .platforms
                .last()
                .cloned()
                .unwrap_or_else(starting_platform);
            let platform = generate_platform(&mut self.rng, &previous, self.speed);
            if platform.width > 1
                && self.enemies.len() < MAX_ENEMIES
                && self.rng.random_bool(ENEMY_SPAWN_CHANCE)
            {
                self.enemies.push(Enemy::on_platform(&mut self.rng, &platform));
            }
            self.platforms.push(platform);
        }
    }

    /// Current score: scroll progress past the ramp cap plus kill bonus
    pub fn score(&self) -> u32 {
        (self.speed - MAX_SCROLL_SPEED + self.kills as f32 * KILL_SCORE).max(0.0) as u32
    }

    /// Reset everything for a fresh run (after death); keeps the RNG
    /// stream so consecutive runs differ.
    pub fn reset_run(&mut self) {
        self.phase = GamePhase::Attract;
        self.paused_from = GamePhase::Attract;
        self.speed = BASE_SCROLL_SPEED;
        self.kills = 0;
        self.charge = 0.0;
        self.player.reset();
        self.enemies.clear();
        self.projectiles.clear();
        self.platforms.clear();
        self.platforms.push(starting_platform());
        self.construct_platforms(Self::LOOKAHEAD);
    }
}

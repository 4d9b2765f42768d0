//! Shout 2 Play - a voice-controlled side-scrolling arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (jump controller, platform generation, collisions)
//! - `signal`: Vocal sensor sample decoding and cross-thread hand-off
//! - `highscores`: Single best-score record persistence
//! - `settings`: Serial/calibration configuration

pub mod highscores;
pub mod settings;
pub mod signal;
pub mod sim;

pub use highscores::BestScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (30 Hz, matching the sensor frame rate)
    pub const SIM_DT: f32 = 1.0 / 30.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Logical screen dimensions (the renderer scales from these)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Platform tile edge length in pixels
    pub const TILE_SIZE: f32 = 128.0;

    /// World scroll speed at the start of a run
    pub const BASE_SCROLL_SPEED: f32 = 8.0;
    /// Scroll speed cap for the multiplicative ramp
    pub const MAX_SCROLL_SPEED: f32 = BASE_SCROLL_SPEED * 3.0;
    /// Multiplicative speed ramp per tick until the cap
    pub const SPEED_RAMP: f32 = 1.05;
    /// Linear speed creep per tick after the ramp cap
    pub const SPEED_CREEP: f32 = 0.015;
    /// Platforms and enemies drift at half the world scroll speed
    pub const DRIFT_FACTOR: f32 = 0.5;

    /// Character footprint
    pub const CHARACTER_WIDTH: f32 = 50.0;
    pub const CHARACTER_HEIGHT: f32 = 50.0;
    /// Fixed horizontal position of the character (scrolling world)
    pub const CHARACTER_X: f32 = SCREEN_WIDTH / 4.0;
    /// Falling below this ends the run
    pub const KILL_PLANE: f32 = SCREEN_HEIGHT * 1.4;

    /// Base descent speed applied the first frame off a platform (pixels/tick)
    pub const GRAVITY: f32 = 7.0;
    /// Descent speed cap
    pub const CAP_GRAVITY: f32 = GRAVITY * 5.0;
    /// Geometric growth of descent speed per tick
    pub const FALL_GROWTH: f32 = 1.1;

    /// Minimum jump power for a sample to register as a shout
    pub const JUMP_THRESHOLD: f32 = 2.0;
    /// Minimum delta above the running max gain for a pulse to extend a jump
    pub const PULSE_DEADBAND: f32 = 0.1;
    /// Pixels of setpoint offset per unit of jump power
    pub const JUMP_SCALE: f32 = 40.0;
    /// Shrink ratio applied to the jump factor on each in-air pulse
    pub const JUMP_DECAY: f32 = 0.8;
    /// Tolerance for the ascent -> falling transition
    pub const SETPOINT_EPSILON: f32 = 1.0;

    /// Corrective trajectory gains (error = setpoint - y, output added to y)
    pub const PID_KP: f32 = 0.25;
    pub const PID_KI: f32 = 0.02;
    pub const PID_KD: f32 = 0.08;

    /// Enemy sprite footprint and hit radius
    pub const ENEMY_SIZE: f32 = 192.0;
    pub const ENEMY_HIT_RADIUS: f32 = 64.0;
    /// Maximum concurrent enemies
    pub const MAX_ENEMIES: usize = 6;
    /// Chance of spawning an enemy on a freshly generated platform
    pub const ENEMY_SPAWN_CHANCE: f64 = 0.6;

    /// Projectile sprite width
    pub const PROJECTILE_SIZE: f32 = 64.0;
    /// Charge required (and spent) per shot
    pub const SHOT_COST: f32 = 100.0;
    /// Charge accumulation cap
    pub const CHARGE_CAP: f32 = 200.0;

    /// Score weight per enemy kill
    pub const KILL_SCORE: f32 = 10.0;
}

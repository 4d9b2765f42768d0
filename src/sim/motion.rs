//! The jump controller
//!
//! Converts per-tick jump-power samples (thresholded vocal gain) into a
//! continuous vertical trajectory. Screen coordinates grow downward, so
//! ascending means `y` decreases.
//!
//! Three states:
//! - **Grounded**: integrates descent until a platform top is under the
//!   footprint; resting on a platform re-lands every tick (idempotent).
//! - **Ascending**: a shout above the threshold moves a setpoint above the
//!   character; `y` is steered toward it by a PID corrective step rather
//!   than direct assignment, giving smoothed, slightly overshoot-prone
//!   arcs. Each in-air pulse shrinks `jump_factor`, so rapid repeated
//!   shouts cannot stack unbounded height.
//! - **Falling**: descent speed grows geometrically up to `CAP_GRAVITY`.
//!
//! Landing sweeps the feet interval `[feet, feet + step]` against platform
//! tops; with no platform beneath, the character just keeps falling (the
//! outer loop detects the kill plane).

use crate::consts::*;
use crate::sim::collision::{crosses_downward, spans_overlap};
use crate::sim::platforms::Platform;

/// The player character and its motion state
#[derive(Debug, Clone)]
pub struct Character {
    /// Fixed horizontal position (the world scrolls, the character doesn't)
    pub x: f32,
    /// Vertical position (top of sprite, screen-down positive)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// True from the first shout pulse until the next landing
    pub is_jumping: bool,
    /// True once the ascent reached its setpoint
    pub falling: bool,
    /// Target vertical position the corrective step steers toward
    setpoint: f32,
    /// Loudest gain seen within the current jump; weaker pulses are inert
    max_gain: f32,
    /// Decaying multiplier on successive in-air pulses
    jump_factor: f32,
    /// Current descent speed (pixels/tick), capped at `CAP_GRAVITY`
    falling_speed: f32,
    /// PID accumulator and previous error for the corrective step
    integral: f32,
    prev_error: f32,
}

impl Default for Character {
    fn default() -> Self {
        Self::new()
    }
}

impl Character {
    /// Character standing on the starting platform
    pub fn new() -> Self {
        Self {
            x: CHARACTER_X,
            y: SCREEN_HEIGHT - 100.0 - CHARACTER_HEIGHT,
            width: CHARACTER_WIDTH,
            height: CHARACTER_HEIGHT,
            is_jumping: false,
            falling: false,
            setpoint: 0.0,
            max_gain: 0.0,
            jump_factor: 1.0,
            falling_speed: GRAVITY,
            integral: 0.0,
            prev_error: 0.0,
        }
    }

    /// Bottom of the footprint
    #[inline]
    pub fn feet(&self) -> f32 {
        self.y + self.height
    }

    pub fn setpoint(&self) -> f32 {
        self.setpoint
    }

    pub fn max_gain(&self) -> f32 {
        self.max_gain
    }

    pub fn jump_factor(&self) -> f32 {
        self.jump_factor
    }

    pub fn falling_speed(&self) -> f32 {
        self.falling_speed
    }

    /// Advance the controller by one fixed tick.
    ///
    /// `jump_power` is the normalized gain sample for this tick (0 when no
    /// vocal trigger exceeded the serial-side threshold).
    pub fn update(&mut self, jump_power: f32, platforms: &[Platform]) {
        self.absorb_pulse(jump_power);

        if self.is_jumping && !self.falling {
            // Corrective step toward the setpoint
            let error = self.setpoint - self.y;
            self.integral += error;
            let derivative = error - self.prev_error;
            self.prev_error = error;
            let step = PID_KP * error + PID_KI * self.integral + PID_KD * derivative;

            if self.try_land(platforms, step) {
                return;
            }
            self.y += step;
            if self.y <= self.setpoint + SETPOINT_EPSILON {
                self.falling = true;
            }
        } else {
            // Grounded and Falling share the descent integration; resting
            // on a platform re-lands immediately every tick.
            let step = self.falling_speed;
            if self.try_land(platforms, step) {
                return;
            }
            self.y += step;
            self.falling_speed = (self.falling_speed * FALL_GROWTH).min(CAP_GRAVITY);
        }
    }

    /// Register a shout pulse: only samples above the threshold whose delta
    /// over `max_gain` exceeds the deadband extend the jump.
    fn absorb_pulse(&mut self, jump_power: f32) {
        let pulse = jump_power - self.max_gain;
        if jump_power <= JUMP_THRESHOLD || pulse <= PULSE_DEADBAND {
            return;
        }
        if self.is_jumping {
            // Vocal fatigue: successive pulses within one jump lose effect
            self.jump_factor *= JUMP_DECAY;
        }
        self.setpoint = self.y - pulse * JUMP_SCALE * self.jump_factor;
        self.max_gain = jump_power;
        self.is_jumping = true;
        self.falling = false;
        self.integral = 0.0;
        self.prev_error = self.setpoint - self.y;
    }

    /// Sweep the feet over `step` pixels against every platform top whose
    /// span overlaps the footprint; land on the first top crossed (the
    /// smallest candidate `y`).
    fn try_land(&mut self, platforms: &[Platform], step: f32) -> bool {
        let feet = self.feet();
        let candidate = platforms
            .iter()
            .filter(|p| spans_overlap(self.x, self.width, p.x, p.size()))
            .filter(|p| crosses_downward(feet, step, p.y))
            .min_by(|a, b| a.y.total_cmp(&b.y));

        if let Some(platform) = candidate {
            self.land(platform.y);
            true
        } else {
            false
        }
    }

    /// Snap onto a platform top and reset all jump state
    fn land(&mut self, platform_y: f32) {
        self.y = platform_y - self.height;
        self.is_jumping = false;
        self.falling = false;
        self.max_gain = 0.0;
        self.jump_factor = 1.0;
        self.falling_speed = GRAVITY;
        self.integral = 0.0;
        self.prev_error = 0.0;
    }

    /// Reset to the spawn position (on death)
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

//! Procedural platform generation
//!
//! Platforms form a singly-linked generation chain: each new platform is
//! placed relative to the previous one so the level stays traversable at
//! the current scroll speed. Faster scrolling widens both the platform
//! pool and the guaranteed horizontal gap; the vertical delta between
//! consecutive platforms is bounded to the character's jump envelope.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::*;

/// A scrolling platform (position in pixels, width in tile units)
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    /// Horizontal start (left edge)
    pub x: f32,
    /// Vertical position of the walkable top
    pub y: f32,
    /// Width in tiles
    pub width: u32,
    /// Generation ordering token, monotonically increasing along the chain
    pub id: u64,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: u32, id: u64) -> Self {
        Self { x, y, width, id }
    }

    /// Horizontal extent in pixels
    #[inline]
    pub fn size(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    /// Scroll left; platforms drift at half the world speed
    pub fn advance(&mut self, speed: f32) {
        self.x -= DRIFT_FACTOR * speed;
    }

    /// Fully past the left edge (with a screen-width margin so the chain
    /// tail never pops while still partially relevant)
    pub fn off_screen(&self) -> bool {
        self.x + self.size() < -SCREEN_WIDTH
    }
}

/// The wide ground platform every run starts on
pub fn starting_platform() -> Platform {
    let width = (SCREEN_WIDTH / TILE_SIZE) as u32 + 2;
    Platform::new(-TILE_SIZE, SCREEN_HEIGHT - 100.0, width, 0)
}

/// Generate the next platform downstream of `previous` at the given
/// scroll speed.
///
/// The gap and width formulas are tuned so the worst-case gap/height
/// combination stays reachable with a single full-power shout; the
/// vertical delta is clipped to +/- 3 tiles and to the playable band of
/// the screen. Degenerate clipped bounds (screen smaller than the band)
/// are resolved by swapping rather than erroring.
pub fn generate_platform(rng: &mut Pcg32, previous: &Platform, speed: f32) -> Platform {
    let max_width = (2.0 + speed / BASE_SCROLL_SPEED) as u32;
    let width = rng.random_range(1..=max_width.max(1));

    let min_x =
        previous.x + previous.size() + (0.5 + speed / (2.0 * BASE_SCROLL_SPEED)) * TILE_SIZE;

    let mut y_lo = (previous.y - 3.0 * TILE_SIZE).max(2.0 * TILE_SIZE);
    let mut y_hi = (previous.y + 3.0 * TILE_SIZE).min(SCREEN_HEIGHT - 0.5 * TILE_SIZE);
    if y_lo > y_hi {
        std::mem::swap(&mut y_lo, &mut y_hi);
    }
    let y = if y_lo < y_hi {
        rng.random_range(y_lo..=y_hi)
    } else {
        y_lo
    };

    // Steeper vertical deltas shrink the allowed horizontal spread
    let reach = max_width as f32 + width as f32 - (y - previous.y).abs() / TILE_SIZE;
    let x_hi = (min_x + TILE_SIZE * reach).max(min_x);
    let x = if min_x < x_hi {
        rng.random_range(min_x..=x_hi)
    } else {
        min_x
    };

    Platform::new(x, y, width, previous.id + 1)
}

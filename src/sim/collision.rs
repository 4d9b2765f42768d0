//! Collision predicates for the scrolling world
//!
//! Everything here is a small pure function: circular-distance checks for
//! enemy/projectile hits, plus the span-overlap and swept-crossing tests
//! the jump controller uses for landing detection. Entity counts are tiny
//! (~6 enemies, a handful of projectiles) so no spatial index is needed.

use glam::Vec2;

/// Slack on the swept-crossing test so a character resting exactly on a
/// platform top keeps landing despite float rounding of the snap position.
const LANDING_SLACK: f32 = 0.01;

/// Circle/circle proximity check between two entity centers
#[inline]
pub fn circles_touch(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Do two horizontal spans `[a_start, a_start + a_len)` and
/// `[b_start, b_start + b_len)` overlap?
#[inline]
pub fn spans_overlap(a_start: f32, a_len: f32, b_start: f32, b_len: f32) -> bool {
    a_start < b_start + b_len && b_start < a_start + a_len
}

/// Does the downward sweep `[feet, feet + step]` cross a horizontal surface?
///
/// Only downward motion can land (`step > 0` in screen coordinates).
#[inline]
pub fn crosses_downward(feet: f32, step: f32, surface: f32) -> bool {
    step > 0.0 && feet <= surface + LANDING_SLACK && feet + step >= surface
}

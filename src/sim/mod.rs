//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! The outer loop feeds one normalized sensor sample per tick; the sim
//! exposes read-only positions and state for an external renderer.

pub mod collision;
pub mod motion;
pub mod platforms;
pub mod state;
pub mod tick;

pub use collision::{circles_touch, crosses_downward, spans_overlap};
pub use motion::Character;
pub use platforms::{Platform, generate_platform, starting_platform};
pub use state::{Enemy, GameEvent, GamePhase, GameState, Projectile};
pub use tick::{TickInput, tick};

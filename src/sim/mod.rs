//! Shared simulation helpers for the neon games.
//!
//! Games own their entities and run their own update code; this module only
//! carries the pieces every game repeats: rectangle maths, the round state
//! machine and frame-counted power-up effects.

pub mod effects;
pub mod geom;
pub mod round;

pub use effects::Effects;
pub use geom::{clamp_axis, distance, nearest_within, normalize, Aabb};
pub use round::Round;

/// Logical canvas every game simulates on.
pub const CANVAS_WIDTH: f32 = 800.0;
pub const CANVAS_HEIGHT: f32 = 600.0;

/// Nominal frame rate used to express timers in frames.
pub const FPS: u32 = 60;

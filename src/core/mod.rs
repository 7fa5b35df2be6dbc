//! Core deterministic primitives.
//!
//! Everything the simulation computes after level load goes through these
//! integer types, so identical inputs always give identical bits.

pub mod fixed;
pub mod vec2;
pub mod hash;

// Re-export core types
pub use fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE, TICK_DURATION};
pub use vec2::FixedVec2;
pub use hash::{compute_state_hash, StateHash, StateHasher};

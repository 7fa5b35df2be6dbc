//! Q48.16 Fixed-Point Arithmetic
//!
//! This module provides deterministic fixed-point math for the platformer
//! simulation. All operations after level load use integer arithmetic only.
//!
//! ## Format: Q48.16
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Bit Layout: Q48.16 (64-bit signed integer)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  [S][IIII ... 47 bits ... IIII][FFFFFFFFFFFFFFFF]           │
//! │   │                            └──── 16 bits ────┘          │
//! │   └─ Sign bit                                               │
//! │                                                             │
//! │  Precision: 1/65536 ≈ 0.000015 units                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why 64-bit storage?
//!
//! Jump impulses are expressed in viewport pixels per second squared and
//! routinely exceed 32768 (`32 * 1500 = 48000` at scale 1.0), which would
//! overflow a 32-bit Q16.16. The fractional precision is unchanged.

/// Q48.16 fixed-point number stored as i64.
pub type Fixed = i64;

/// Number of fractional bits (16)
pub const FIXED_SCALE: u32 = 16;

/// 1.0 in fixed-point (65536)
pub const FIXED_ONE: Fixed = 1 << FIXED_SCALE;

/// 0.5 in fixed-point (32768)
pub const FIXED_HALF: Fixed = FIXED_ONE >> 1;

/// Tick duration: 1/60 second = floor(65536/60) = 1092
pub const TICK_DURATION: Fixed = FIXED_ONE / 60;

/// Convert a float to fixed-point.
///
/// # Warning
/// Only use at compile-time or during level load. NEVER in the step loop.
///
/// # Example
/// ```
/// use tile_platformer::core::fixed::{to_fixed, FIXED_ONE};
/// const MY_VALUE: i64 = to_fixed(2.5);
/// assert_eq!(MY_VALUE, FIXED_ONE * 2 + FIXED_ONE / 2);
/// ```
#[inline]
pub const fn to_fixed(f: f64) -> Fixed {
    (f * (FIXED_ONE as f64)) as Fixed
}

/// Convert an integer to fixed-point.
#[inline]
pub const fn from_int(i: i64) -> Fixed {
    i << FIXED_SCALE
}

/// Convert fixed-point to float for display/rendering.
///
/// # Warning
/// Only use for visual output. NEVER use result in game logic.
#[inline]
pub fn to_float(f: Fixed) -> f32 {
    f as f32 / FIXED_ONE as f32
}

/// Multiply two fixed-point numbers.
///
/// Uses an i128 intermediate to prevent overflow, then shifts back.
/// The shift floors toward negative infinity.
#[inline]
pub fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    let wide = (a as i128) * (b as i128);
    (wide >> FIXED_SCALE) as Fixed
}

/// Minimum of two fixed-point numbers.
#[inline]
pub fn fixed_min(a: Fixed, b: Fixed) -> Fixed {
    if a < b { a } else { b }
}

/// Maximum of two fixed-point numbers.
#[inline]
pub fn fixed_max(a: Fixed, b: Fixed) -> Fixed {
    if a > b { a } else { b }
}

/// Clamp a fixed-point number to a range.
#[inline]
pub fn fixed_clamp(value: Fixed, min: Fixed, max: Fixed) -> Fixed {
    fixed_max(min, fixed_min(max, value))
}

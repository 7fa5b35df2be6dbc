//! Movement tuning for simulated bodies.
//!
//! Defaults are expressed in level units (tiles of `METER` pixels) and are
//! scaled into viewport units when a level is loaded.

use serde::{Serialize, Deserialize};

use crate::core::fixed::{Fixed, to_fixed};
use crate::game::level::EntityProperties;

/// Simulation rate (steps per second)
pub const FPS: u32 = 60;

/// Pixels per level meter before viewport scaling
pub const METER: f64 = 32.0;

/// Default (exaggerated) gravity, meters per second squared
pub const GRAVITY: f64 = 9.8 * 5.0;

/// Default max horizontal speed, meters per second
pub const MAXDX: f64 = 15.0;

/// Default max vertical speed, meters per second
pub const MAXDY: f64 = 60.0;

/// Default seconds to reach `MAXDX` from rest
pub const ACCEL: f64 = 1.0 / 2.0;

/// Default seconds to stop from `MAXDX`
pub const FRICTION: f64 = 1.0 / 6.0;

/// Default player jump impulse, meters per second squared
pub const IMPULSE: f64 = 1500.0;

/// Per-body movement parameters in viewport units (fixed-point).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuning {
    /// Downward acceleration, units/s²
    pub gravity: Fixed,
    /// Horizontal speed cap, units/s
    pub maxdx: Fixed,
    /// Vertical speed cap, units/s
    pub maxdy: Fixed,
    /// One-shot upward force applied on jump, units/s²
    pub impulse: Fixed,
    /// Horizontal acceleration while steering, units/s²
    pub accel: Fixed,
    /// Horizontal deceleration while coasting, units/s²
    pub friction: Fixed,
}

impl Tuning {
    /// Derive tuning from optional per-entity overrides and the level scale.
    ///
    /// `accel` and `friction` are seconds-to-max-speed, so they become
    /// `maxdx / seconds`. Callers validate that those seconds are positive.
    pub fn from_properties(props: &EntityProperties, scale_x: f64, scale_y: f64) -> Self {
        let maxdx = METER * scale_x * props.maxdx.unwrap_or(MAXDX);
        let maxdy = METER * scale_y * props.maxdy.unwrap_or(MAXDY);
        let gravity = METER * scale_y * props.gravity.unwrap_or(GRAVITY);
        let impulse = METER * scale_y * props.impulse.unwrap_or(IMPULSE);
        let accel = maxdx / props.accel.unwrap_or(ACCEL);
        let friction = maxdx / props.friction.unwrap_or(FRICTION);

        Self {
            gravity: to_fixed(gravity),
            maxdx: to_fixed(maxdx),
            maxdy: to_fixed(maxdy),
            impulse: to_fixed(impulse),
            accel: to_fixed(accel),
            friction: to_fixed(friction),
        }
    }

    /// Default tuning at a given scale.
    pub fn scaled(scale_x: f64, scale_y: f64) -> Self {
        Self::from_properties(&EntityProperties::default(), scale_x, scale_y)
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::scaled(1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::from_int;

    #[test]
    fn test_default_tuning_at_unit_scale() {
        let t = Tuning::default();
        assert_eq!(t.maxdx, from_int(480));
        assert_eq!(t.maxdy, from_int(1920));
        assert_eq!(t.impulse, from_int(48000));
        assert_eq!(t.accel, from_int(960));
        assert_eq!(t.friction, from_int(2880));
        assert!((t.gravity - from_int(1568)).abs() <= 1);
    }

    #[test]
    fn test_accel_and_friction_are_inverse_time() {
        let props = EntityProperties {
            maxdx: Some(10.0),
            accel: Some(2.0),
            friction: Some(0.25),
            ..EntityProperties::default()
        };
        let t = Tuning::from_properties(&props, 0.5, 1.0);
        // maxdx = 32 * 0.5 * 10 = 160
        assert_eq!(t.maxdx, from_int(160));
        assert_eq!(t.accel, from_int(80));
        assert_eq!(t.friction, from_int(640));
    }

    #[test]
    fn test_vertical_parameters_use_vertical_scale() {
        let t = Tuning::scaled(2.0, 0.5);
        assert_eq!(t.maxdx, from_int(960));
        assert_eq!(t.maxdy, from_int(960));
        assert_eq!(t.impulse, from_int(24000));
    }
}

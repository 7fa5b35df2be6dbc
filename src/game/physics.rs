//! Kinematic Integrator
//!
//! Advances one body by one fixed step: steering/friction forces, gravity,
//! the player's one-shot jump impulse, then explicit Euler integration with
//! velocity caps. Produces a provisional position that the tile resolver
//! corrects in the same step.

use crate::core::fixed::{Fixed, FIXED_HALF, fixed_mul, fixed_clamp};
use crate::game::state::{Body, Direction};

/// Accel and friction multiplier while airborne.
pub const AIR_CONTROL: Fixed = FIXED_HALF;

/// Integrate one body over `dt`.
///
/// `wants_jump` is true only for a player holding jump who is not already
/// mid-jump; the impulse fires only if the body is also grounded.
/// Returns whether the jump impulse was applied.
pub fn integrate(body: &mut Body, wants_jump: bool, dt: Fixed) -> bool {
    let was_left = body.velocity.x < 0;
    let was_right = body.velocity.x > 0;
    let falling = body.falling;

    let (accel, friction) = if falling {
        (
            fixed_mul(body.tuning.accel, AIR_CONTROL),
            fixed_mul(body.tuning.friction, AIR_CONTROL),
        )
    } else {
        (body.tuning.accel, body.tuning.friction)
    };

    let mut ddx: Fixed = 0;
    let mut ddy: Fixed = body.tuning.gravity;

    if body.dir == Direction::Left {
        ddx -= accel;
    } else if was_left {
        ddx += friction;
    }

    if body.dir == Direction::Right {
        ddx += accel;
    } else if was_right {
        ddx -= friction;
    }

    let jumped = wants_jump && !falling;
    if jumped {
        ddy -= body.tuning.impulse;
    }

    body.acceleration.x = ddx;
    body.acceleration.y = ddy;

    body.position.x += fixed_mul(dt, body.velocity.x);
    body.position.y += fixed_mul(dt, body.velocity.y);

    let maxdx = body.tuning.maxdx;
    let maxdy = body.tuning.maxdy;
    body.velocity.x = fixed_clamp(body.velocity.x + fixed_mul(dt, ddx), -maxdx, maxdx);
    body.velocity.y = fixed_clamp(body.velocity.y + fixed_mul(dt, ddy), -maxdy, maxdy);

    // Friction must stop the body, not push it back the other way.
    if (was_left && body.velocity.x > 0) || (was_right && body.velocity.x < 0) {
        body.velocity.x = 0;
    }

    jumped
}

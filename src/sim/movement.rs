//! Horizontal rolling control

use super::body::ArcadeBody;
use super::surface::SurfaceContact;
use crate::damping_factor;
use crate::tuning::Tuning;

/// Horizontal input for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveIntent {
    /// -1 left, 0 none, 1 right
    pub dir: f32,
    /// Direction key went down this tick
    pub pressed: bool,
}

/// Check if the marble is close enough to standstill for a kick or pre-empt
#[inline]
pub fn nearly_stationary(body: &ArcadeBody, tuning: &Tuning) -> bool {
    body.vel.x.abs() < tuning.stationary_speed
}

/// Turn input into acceleration for this tick.
///
/// While `planted` (a charge is active) the marble gets no acceleration at
/// all and input is ignored. Without input, or while planted, a grounded
/// marble free-rolls: speed decays by a share of the surface drag rather than
/// braking to a stop.
pub fn apply_movement(
    body: &mut ArcadeBody,
    intent: MoveIntent,
    grounded: bool,
    contact: Option<SurfaceContact>,
    planted: bool,
    tuning: &Tuning,
    dt: f32,
) {
    body.accel.x = 0.0;
    let surface = contact.filter(|_| grounded);

    if intent.dir != 0.0 && !planted {
        let dir = intent.dir.signum();
        if intent.pressed && grounded && nearly_stationary(body, tuning) {
            body.vel.x = dir * tuning.kick_speed;
        }

        let (fraction, multiplier, ceiling) = match surface {
            Some(contact) => (
                1.0,
                contact.material().accel_multiplier,
                contact.speed_ceiling(tuning),
            ),
            None if grounded => (1.0, 1.0, tuning.max_speed),
            None => (tuning.air_accel_fraction, 1.0, tuning.max_speed),
        };

        // Input never pushes past the surface ceiling; faster motion coasts
        if body.vel.x * dir < ceiling {
            body.accel.x = dir * tuning.base_accel * fraction * multiplier;
        }
    } else if let Some(contact) = surface {
        if body.vel.x != 0.0 {
            let drag = contact.material().drag;
            let per_frame = 1.0 - (1.0 - drag) * tuning.free_roll_fraction;
            body.vel.x *= damping_factor(per_frame, dt);
        }
    }
}

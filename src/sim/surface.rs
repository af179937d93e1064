//! Surface materials and the physics they apply to a grounded marble

use serde::{Deserialize, Serialize};

use super::body::ArcadeBody;
use crate::consts::HORIZONTAL_BOUNCE;
use crate::tuning::Tuning;

/// Kind of terrain a platform is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurfaceKind {
    #[default]
    Concrete,
    Grass,
    Sand,
    Mud,
    Ice,
    Snow,
    WetMetal,
    BouncePad,
    Conveyor,
}

/// Physical coefficients of a surface (all in [0, 1])
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMaterial {
    /// Velocity kept per reference frame; near 1 is near-frictionless
    pub drag: f32,
    pub accel_multiplier: f32,
    pub max_speed_multiplier: f32,
    pub vertical_bounce: f32,
    pub jump_multiplier: f32,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 9] = [
        SurfaceKind::Concrete,
        SurfaceKind::Grass,
        SurfaceKind::Sand,
        SurfaceKind::Mud,
        SurfaceKind::Ice,
        SurfaceKind::Snow,
        SurfaceKind::WetMetal,
        SurfaceKind::BouncePad,
        SurfaceKind::Conveyor,
    ];

    /// Synthetic surface used while riding a seesaw plank
    pub const FIRM_GROUND: SurfaceKind = SurfaceKind::Concrete;

    /// Coefficient tuple for this surface
    pub const fn material(self) -> SurfaceMaterial {
        let (drag, accel, max_speed, bounce, jump) = match self {
            SurfaceKind::Concrete => (0.97, 1.0, 1.0, 0.1, 1.0),
            SurfaceKind::Grass => (0.95, 0.9, 0.9, 0.15, 0.95),
            SurfaceKind::Sand => (0.88, 0.6, 0.6, 0.0, 0.75),
            SurfaceKind::Mud => (0.82, 0.45, 0.4, 0.0, 0.6),
            SurfaceKind::Ice => (0.995, 0.35, 1.0, 0.05, 0.9),
            SurfaceKind::Snow => (0.92, 0.7, 0.75, 0.05, 0.85),
            SurfaceKind::WetMetal => (0.985, 0.6, 1.0, 0.2, 0.9),
            SurfaceKind::BouncePad => (0.97, 1.0, 1.0, 0.9, 1.0),
            SurfaceKind::Conveyor => (0.97, 1.0, 1.0, 0.1, 1.0),
        };
        SurfaceMaterial {
            drag,
            accel_multiplier: accel,
            max_speed_multiplier: max_speed,
            vertical_bounce: bounce,
            jump_multiplier: jump,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceKind::Concrete => "Concrete",
            SurfaceKind::Grass => "Grass",
            SurfaceKind::Sand => "Sand",
            SurfaceKind::Mud => "Mud",
            SurfaceKind::Ice => "Ice",
            SurfaceKind::Snow => "Snow",
            SurfaceKind::WetMetal => "Wet Metal",
            SurfaceKind::BouncePad => "Bounce Pad",
            SurfaceKind::Conveyor => "Conveyor",
        }
    }
}

/// What the marble is standing on this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceContact {
    Platform {
        kind: SurfaceKind,
        conveyor_speed: Option<f32>,
    },
    /// Riding a seesaw plank
    Seesaw,
}

impl SurfaceContact {
    /// Surface used for friction purposes
    pub fn kind(&self) -> SurfaceKind {
        match *self {
            SurfaceContact::Platform { kind, .. } => kind,
            SurfaceContact::Seesaw => SurfaceKind::FIRM_GROUND,
        }
    }

    pub fn material(&self) -> SurfaceMaterial {
        self.kind().material()
    }

    /// Horizontal speed input may drive the marble to on this surface
    pub fn speed_ceiling(&self, tuning: &Tuning) -> f32 {
        match self.kind() {
            SurfaceKind::Conveyor => tuning.max_speed * tuning.conveyor_ceiling_factor,
            SurfaceKind::Mud => tuning.mud_speed_cap,
            kind => tuning.max_speed * kind.material().max_speed_multiplier,
        }
    }
}

/// Apply surface-dependent forces to a grounded marble.
///
/// `landing_armed` is re-armed whenever the marble is off a bounce pad, so a
/// pad fires exactly once per landing. Returns true if a pad fired.
pub fn apply_surface_physics(
    body: &mut ArcadeBody,
    contact: Option<SurfaceContact>,
    grounded: bool,
    landing_armed: &mut bool,
    tuning: &Tuning,
    dt: f32,
) -> bool {
    let contact = match contact {
        Some(contact) if grounded => contact,
        _ => {
            *landing_armed = true;
            return false;
        }
    };

    let material = contact.material();
    body.bounce.x = HORIZONTAL_BOUNCE;
    body.bounce.y = material.vertical_bounce;

    let mut pad_fired = false;
    match contact {
        SurfaceContact::Platform {
            kind: SurfaceKind::BouncePad,
            ..
        } => {
            // Restitution lags a tick behind the landing, so push directly
            if *landing_armed {
                body.vel.y = -tuning.bounce_pad_velocity;
                *landing_armed = false;
                pad_fired = true;
            }
        }
        SurfaceContact::Platform {
            kind: SurfaceKind::Conveyor,
            conveyor_speed,
        } => {
            *landing_armed = true;
            if let Some(belt) = conveyor_speed.filter(|s| s.is_finite() && *s != 0.0) {
                body.vel.x = conveyor_push(body.vel.x, belt, tuning.conveyor_accel * dt);
                let ceiling = contact.speed_ceiling(tuning);
                body.vel.x = body.vel.x.clamp(-ceiling, ceiling);
            }
        }
        SurfaceContact::Platform {
            kind: SurfaceKind::Mud,
            ..
        } => {
            *landing_armed = true;
            let cap = tuning.mud_speed_cap;
            body.vel.x = body.vel.x.clamp(-cap, cap);
        }
        _ => *landing_armed = true,
    }

    pad_fired
}

/// Move `vx` toward the belt speed by at most `step`, never slowing motion
/// that already outruns the belt in its own direction.
fn conveyor_push(vx: f32, belt: f32, step: f32) -> f32 {
    if belt > 0.0 && vx < belt {
        (vx + step).min(belt)
    } else if belt < 0.0 && vx > belt {
        (vx - step).max(belt)
    } else {
        vx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use glam::Vec2;

    fn body_with_vel(vx: f32, vy: f32) -> ArcadeBody {
        let mut body = ArcadeBody::new(Vec2::new(100.0, 100.0), 14.0);
        body.vel = Vec2::new(vx, vy);
        body
    }

    #[test]
    fn test_material_coefficients_in_unit_range() {
        for kind in SurfaceKind::ALL {
            let m = kind.material();
            for c in [
                m.drag,
                m.accel_multiplier,
                m.max_speed_multiplier,
                m.vertical_bounce,
                m.jump_multiplier,
            ] {
                assert!((0.0..=1.0).contains(&c), "{:?} out of range", kind);
            }
        }
        assert!(SurfaceKind::Ice.material().drag > SurfaceKind::Concrete.material().drag);
    }

    #[test]
    fn test_seesaw_contact_uses_firm_ground() {
        assert_eq!(SurfaceContact::Seesaw.kind(), SurfaceKind::Concrete);
    }

    #[test]
    fn test_vertical_bounce_follows_surface() {
        let tuning = Tuning::default();
        let mut body = body_with_vel(0.0, 0.0);
        let mut armed = true;
        let contact = SurfaceContact::Platform {
            kind: SurfaceKind::WetMetal,
            conveyor_speed: None,
        };
        apply_surface_physics(&mut body, Some(contact), true, &mut armed, &tuning, SIM_DT);
        assert_eq!(body.bounce.y, SurfaceKind::WetMetal.material().vertical_bounce);
        assert_eq!(body.bounce.x, HORIZONTAL_BOUNCE);
    }

    #[test]
    fn test_bounce_pad_fires_once_per_landing() {
        let tuning = Tuning::default();
        let pad = Some(SurfaceContact::Platform {
            kind: SurfaceKind::BouncePad,
            conveyor_speed: None,
        });
        let mut body = body_with_vel(0.0, 0.0);
        let mut armed = true;

        assert!(apply_surface_physics(&mut body, pad, true, &mut armed, &tuning, SIM_DT));
        assert_eq!(body.vel.y, -tuning.bounce_pad_velocity);

        // Still on the pad next tick: no second impulse
        body.vel.y = 0.0;
        assert!(!apply_surface_physics(&mut body, pad, true, &mut armed, &tuning, SIM_DT));
        assert_eq!(body.vel.y, 0.0);

        // Airborne re-arms
        apply_surface_physics(&mut body, None, false, &mut armed, &tuning, SIM_DT);
        assert!(apply_surface_physics(&mut body, pad, true, &mut armed, &tuning, SIM_DT));
    }

    #[test]
    fn test_conveyor_pushes_toward_belt_speed() {
        let tuning = Tuning::default();
        let belt = Some(SurfaceContact::Platform {
            kind: SurfaceKind::Conveyor,
            conveyor_speed: Some(150.0),
        });
        let mut body = body_with_vel(0.0, 0.0);
        let mut armed = true;
        for _ in 0..600 {
            apply_surface_physics(&mut body, belt, true, &mut armed, &tuning, SIM_DT);
        }
        assert!((body.vel.x - 150.0).abs() < 0.01);

        // Faster than the belt in its direction: untouched
        let mut body = body_with_vel(300.0, 0.0);
        apply_surface_physics(&mut body, belt, true, &mut armed, &tuning, SIM_DT);
        assert_eq!(body.vel.x, 300.0);

        // Beyond the extended ceiling: clamped
        let mut body = body_with_vel(2000.0, 0.0);
        apply_surface_physics(&mut body, belt, true, &mut armed, &tuning, SIM_DT);
        assert_eq!(body.vel.x, tuning.max_speed * tuning.conveyor_ceiling_factor);
    }

    #[test]
    fn test_conveyor_without_speed_is_inert() {
        let tuning = Tuning::default();
        let belt = Some(SurfaceContact::Platform {
            kind: SurfaceKind::Conveyor,
            conveyor_speed: None,
        });
        let mut body = body_with_vel(2000.0, 0.0);
        let mut armed = true;
        apply_surface_physics(&mut body, belt, true, &mut armed, &tuning, SIM_DT);
        assert_eq!(body.vel.x, 2000.0);
    }

    #[test]
    fn test_mud_hard_caps_speed() {
        let tuning = Tuning::default();
        let mud = Some(SurfaceContact::Platform {
            kind: SurfaceKind::Mud,
            conveyor_speed: None,
        });
        let mut body = body_with_vel(-400.0, 0.0);
        let mut armed = true;
        apply_surface_physics(&mut body, mud, true, &mut armed, &tuning, SIM_DT);
        assert_eq!(body.vel.x, -tuning.mud_speed_cap);
    }

    #[test]
    fn test_airborne_leaves_velocity_alone() {
        let tuning = Tuning::default();
        let mud = Some(SurfaceContact::Platform {
            kind: SurfaceKind::Mud,
            conveyor_speed: None,
        });
        let mut body = body_with_vel(-400.0, 0.0);
        let mut armed = false;
        apply_surface_physics(&mut body, mud, false, &mut armed, &tuning, SIM_DT);
        assert_eq!(body.vel.x, -400.0);
        assert!(armed);
    }
}

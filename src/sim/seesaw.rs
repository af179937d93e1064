//! Pivoting plank platforms
//!
//! The host engine has no rotating colliders, so each plank integrates its
//! own torque and the marble is glued to it by a post-step correction
//! ([`Seesaw::correct`]) instead of regular collision.
//!
//! Angles are in screen space (+Y down): a positive angle lowers the right
//! arm, `plank_y(x) = pivot_y + tan(angle) * (x - pivot_x)`.

use glam::Vec2;

use super::body::ArcadeBody;
use super::level::{Counterweight, SeesawDef};
use crate::consts::*;
use crate::damping_factor;

#[derive(Debug, Clone)]
pub struct Seesaw {
    pub pivot: Vec2,
    pub half_length: f32,
    pub max_angle: f32,
    pub inertia: f32,
    pub damping: f32,
    pub counterweights: Vec<Counterweight>,
    /// Current tilt (persists across respawns)
    pub angle: f32,
    pub angular_vel: f32,
    /// Marble touched the plank this tick
    pub contact: bool,
}

impl Seesaw {
    pub fn from_def(def: &SeesawDef) -> Self {
        Self {
            pivot: Vec2::new(def.pivot_x, def.pivot_y),
            half_length: def.half_length,
            max_angle: def.max_angle,
            inertia: def.inertia,
            damping: def.damping,
            counterweights: def.counterweights.clone(),
            angle: 0.0,
            angular_vel: 0.0,
            contact: false,
        }
    }

    /// Horizontal half-extent of the tilted plank
    #[inline]
    pub fn horizontal_extent(&self) -> f32 {
        self.angle.cos() * self.half_length
    }

    /// Check if `x` lies over the plank
    #[inline]
    pub fn spans_x(&self, x: f32) -> bool {
        (x - self.pivot.x).abs() <= self.horizontal_extent()
    }

    /// Y of the plank's top surface at `x`
    #[inline]
    pub fn plank_y(&self, x: f32) -> f32 {
        self.pivot.y + self.angle.tan() * (x - self.pivot.x)
    }

    /// Vertical velocity of the plank surface at `x` (d/dt of `plank_y`)
    #[inline]
    pub fn surface_velocity(&self, x: f32) -> f32 {
        let c = self.angle.cos();
        self.angular_vel / (c * c) * (x - self.pivot.x)
    }

    /// Horizontal acceleration pulling a touching marble toward the lower arm
    #[inline]
    pub fn slide_accel(&self) -> f32 {
        GRAVITY * self.angle.sin()
    }

    /// Check if the marble rests on the plank
    pub fn touches(&self, body: &ArcadeBody) -> bool {
        let x = body.pos.x;
        if !self.spans_x(x) {
            return false;
        }
        let gap = body.bottom() - self.plank_y(x);
        gap.abs() <= SEESAW_SNAP && body.vel.y >= self.surface_velocity(x) - SEESAW_RELEASE_SPEED
    }

    /// Net torque from the counterweights and, if touching, the marble at `marble_x`
    pub fn torque(&self, marble_x: Option<f32>) -> f32 {
        let along = self.angle.cos();
        let weights: f32 = self
            .counterweights
            .iter()
            .map(|w| w.mass * GRAVITY * w.offset * along)
            .sum();
        let marble = marble_x.map_or(0.0, |x| MARBLE_MASS * GRAVITY * (x - self.pivot.x));
        weights + marble
    }

    /// Integrate torque over `dt`, clamping to the tilt limits
    pub fn integrate(&mut self, torque: f32, dt: f32) {
        self.angular_vel += torque / self.inertia * dt;
        self.angular_vel *= damping_factor(self.damping, dt);
        self.angle += self.angular_vel * dt;

        // Near-inelastic stop at the limits
        if self.angle > self.max_angle {
            self.angle = self.max_angle;
            self.angular_vel *= SEESAW_LIMIT_RETAIN;
        } else if self.angle < -self.max_angle {
            self.angle = -self.max_angle;
            self.angular_vel *= SEESAW_LIMIT_RETAIN;
        }
    }

    /// Contact query + torque integration for one tick. Returns contact.
    pub fn update(&mut self, body: &ArcadeBody, dt: f32) -> bool {
        self.contact = self.touches(body);
        let torque = self.torque(self.contact.then_some(body.pos.x));
        self.integrate(torque, dt);
        self.contact
    }

    /// Snap a marble that sank into the plank back onto its surface.
    /// Returns true if a correction was applied.
    pub fn correct(&self, body: &mut ArcadeBody) -> bool {
        let x = body.pos.x;
        if !self.spans_x(x) {
            return false;
        }
        let surface = self.plank_y(x);
        let sunk = body.bottom() - surface;
        if sunk <= 0.0 || sunk > SEESAW_SNAP {
            return false;
        }
        body.pos.y = surface - body.radius;
        body.vel.y = body.vel.y.min(self.surface_velocity(x));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn plank(counterweights: Vec<Counterweight>) -> Seesaw {
        Seesaw::from_def(&SeesawDef {
            pivot_x: 500.0,
            pivot_y: 400.0,
            half_length: 150.0,
            max_angle: 0.35,
            inertia: 60_000.0,
            damping: 0.96,
            counterweights,
        })
    }

    fn marble_at(x: f32, seesaw: &Seesaw) -> ArcadeBody {
        ArcadeBody::new(Vec2::new(x, seesaw.plank_y(x) - MARBLE_RADIUS), MARBLE_RADIUS)
    }

    #[test]
    fn test_counterweight_settles_positive_within_limit() {
        let mut seesaw = plank(vec![Counterweight {
            offset: 80.0,
            mass: 0.5,
        }]);
        let nobody = ArcadeBody::new(Vec2::new(-1000.0, 0.0), MARBLE_RADIUS);
        for _ in 0..(120 * 10) {
            seesaw.update(&nobody, SIM_DT);
            assert!(seesaw.angle.abs() <= seesaw.max_angle);
        }
        assert!(seesaw.angle > 0.0);
        assert!(!seesaw.contact);
    }

    #[test]
    fn test_marble_tips_its_side_down() {
        let mut seesaw = plank(Vec::new());
        let body = marble_at(400.0, &seesaw);
        assert!(seesaw.update(&body, SIM_DT));
        assert!(seesaw.angular_vel < 0.0, "left arm should drop");
    }

    #[test]
    fn test_limit_kills_most_angular_velocity() {
        let mut seesaw = plank(Vec::new());
        seesaw.angle = 0.34;
        seesaw.angular_vel = 5.0;
        seesaw.integrate(0.0, SIM_DT);
        assert_eq!(seesaw.angle, seesaw.max_angle);
        let pre_impact = 5.0 * damping_factor(0.96, SIM_DT);
        assert!(seesaw.angular_vel <= pre_impact * 0.05 + 1e-6);
    }

    #[test]
    fn test_surface_velocity_matches_plank_motion() {
        let mut seesaw = plank(Vec::new());
        seesaw.angle = 0.1;
        seesaw.angular_vel = 0.5;
        let x = 600.0;
        let before = seesaw.plank_y(x);
        let v = seesaw.surface_velocity(x);
        let dt = 1e-3;
        seesaw.angle += seesaw.angular_vel * dt;
        let numeric = (seesaw.plank_y(x) - before) / dt;
        assert!((numeric - v).abs() < 0.5, "{} vs {}", numeric, v);
    }

    #[test]
    fn test_slide_toward_lower_arm() {
        let mut seesaw = plank(Vec::new());
        seesaw.angle = 0.2;
        assert!(seesaw.slide_accel() > 0.0);
        seesaw.angle = -0.2;
        assert!(seesaw.slide_accel() < 0.0);
    }

    #[test]
    fn test_correction_lifts_sunk_marble_and_caps_fall() {
        let mut seesaw = plank(Vec::new());
        seesaw.angle = 0.1;
        seesaw.angular_vel = -0.4; // right arm rising
        let mut body = marble_at(600.0, &seesaw);
        body.pos.y += 5.0;
        body.vel.y = 120.0;

        assert!(seesaw.correct(&mut body));
        assert!((body.bottom() - seesaw.plank_y(600.0)).abs() < 1e-3);
        assert_eq!(body.vel.y, seesaw.surface_velocity(600.0));
        assert!(body.vel.y < 0.0);

        // Off the plank: untouched
        let mut far = marble_at(600.0, &seesaw);
        far.pos.x = 900.0;
        assert!(!seesaw.correct(&mut far));
    }

    #[test]
    fn test_jumping_marble_does_not_touch() {
        let seesaw = plank(Vec::new());
        let mut body = marble_at(450.0, &seesaw);
        body.vel.y = -500.0;
        assert!(!seesaw.touches(&body));
    }

    proptest! {
        #[test]
        fn prop_angle_stays_within_limits(
            torques in prop::collection::vec(-5.0e6f32..5.0e6, 1..400)
        ) {
            let mut seesaw = plank(Vec::new());
            for torque in torques {
                seesaw.integrate(torque, SIM_DT);
                prop_assert!(seesaw.angle.abs() <= seesaw.max_angle);
            }
        }
    }
}

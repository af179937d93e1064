//! Airborne/grounded classification with coyote time

use super::body::ArcadeBody;
use super::level::Platform;
use super::surface::SurfaceContact;
use crate::consts::GROUND_TOLERANCE;

/// Tracks whether the marble counts as grounded this tick
#[derive(Debug, Clone, Default)]
pub struct GroundingDetector {
    /// Last time (sim ms) the marble had real contact with something solid
    last_contact_ms: Option<f64>,
    /// Real contact this tick (no coyote grace)
    pub in_contact: bool,
    /// Contact or within the coyote window
    pub grounded: bool,
}

impl GroundingDetector {
    /// Classify this tick. `seesaw_contact` is the most recent plank contact.
    pub fn detect(
        &mut self,
        body: &ArcadeBody,
        platforms: &[Platform],
        seesaw_contact: bool,
        now_ms: f64,
        coyote_ms: f32,
    ) -> bool {
        self.in_contact =
            body.blocked_down || platform_under(body, platforms).is_some() || seesaw_contact;
        if self.in_contact {
            self.last_contact_ms = Some(now_ms);
        }
        self.grounded = self
            .last_contact_ms
            .is_some_and(|t| now_ms - t <= coyote_ms as f64);
        self.grounded
    }

    /// Record contact discovered later in the tick (seesaw planks)
    pub fn refresh(&mut self, now_ms: f64) {
        self.in_contact = true;
        self.grounded = true;
        self.last_contact_ms = Some(now_ms);
    }

    /// Leaving the ground on purpose (jump, spring) forfeits the coyote window
    pub fn consume(&mut self) {
        self.last_contact_ms = None;
        self.in_contact = false;
        self.grounded = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Platform whose top face the marble is resting on, if any
pub fn platform_under<'a>(body: &ArcadeBody, platforms: &'a [Platform]) -> Option<&'a Platform> {
    if body.vel.y < 0.0 {
        return None;
    }
    let bottom = body.bottom();
    platforms.iter().find(|p| {
        p.rect().spans_x(body.pos.x)
            && bottom >= p.top() - GROUND_TOLERANCE
            && bottom <= p.top() + 1.0
    })
}

/// What the marble is standing on; planks take precedence over platforms.
///
/// A platform landed on this step counts even if restitution already sent the
/// marble back up. Colliders are indexed in platform order.
pub fn classify_surface(
    body: &ArcadeBody,
    platforms: &[Platform],
    seesaw_contact: bool,
) -> Option<SurfaceContact> {
    if seesaw_contact {
        return Some(SurfaceContact::Seesaw);
    }
    let landed = body.landed_on.and_then(|index| platforms.get(index));
    landed.or_else(|| platform_under(body, platforms)).map(|p| SurfaceContact::Platform {
        kind: p.surface,
        conveyor_speed: p.conveyor_speed,
    })
}

//! Springs, portals and speed pads

use glam::Vec2;

use super::body::ArcadeBody;
use super::level::{PortalPair, SpeedPad, Spring};
use crate::consts::{PORTAL_PALETTE, SPRING_HALF_WIDTH, SPRING_WINDOW};
use crate::tuning::Tuning;

/// Launch off the first spring the marble sits on.
///
/// Sets (never adds) the upward velocity. Returns the spring index.
pub fn check_springs(
    body: &mut ArcadeBody,
    springs: &[Spring],
    grounded: bool,
    charging: bool,
    tuning: &Tuning,
) -> Option<usize> {
    if !grounded || charging {
        return None;
    }
    let bottom = body.bottom();
    let index = springs.iter().position(|s| {
        (body.pos.x - s.x).abs() <= SPRING_HALF_WIDTH && (bottom - s.y).abs() <= SPRING_WINDOW
    })?;
    let power = springs[index]
        .power
        .filter(|p| p.is_finite() && *p > 0.0)
        .unwrap_or(tuning.spring_power);
    body.vel.y = -power;
    Some(index)
}

/// A teleport that happened this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Teleport {
    pub pair: usize,
    pub from: Vec2,
    pub to: Vec2,
    /// Flash color shared by both ends of the pair
    pub color: u32,
}

/// Portal bookkeeping: a single exit lock on the last destination
#[derive(Debug, Clone, Default)]
pub struct PortalTracker {
    exit_lock: Option<Vec2>,
}

impl PortalTracker {
    /// Destination still blocking re-entry, if any
    pub fn exit_lock(&self) -> Option<Vec2> {
        self.exit_lock
    }

    pub fn clear(&mut self) {
        self.exit_lock = None;
    }

    /// Teleport the marble if it entered a portal. Velocity is untouched.
    pub fn update(
        &mut self,
        body: &mut ArcadeBody,
        portals: &[PortalPair],
        tuning: &Tuning,
    ) -> Option<Teleport> {
        if let Some(dest) = self.exit_lock {
            if body.pos.distance(dest) > tuning.portal_exit_dist {
                self.exit_lock = None;
            } else {
                return None;
            }
        }

        for (pair, portal) in portals.iter().enumerate() {
            let (a, b) = (portal.a(), portal.b());
            let to = if body.pos.distance(a) <= tuning.portal_radius {
                b
            } else if body.pos.distance(b) <= tuning.portal_radius {
                a
            } else {
                continue;
            };

            let from = body.pos;
            body.pos = to;
            self.exit_lock = Some(to);
            return Some(Teleport {
                pair,
                from,
                to,
                color: portal_color(pair),
            });
        }
        None
    }
}

/// Flash color for a portal pair
pub fn portal_color(pair: usize) -> u32 {
    PORTAL_PALETTE[pair % PORTAL_PALETTE.len()]
}

/// Per-pad debounce state
#[derive(Debug, Clone, Default)]
pub struct SpeedPadState {
    /// Where the pad last fired; re-arms once the marble is far enough away
    pub last_trigger: Option<Vec2>,
}

/// Raise `current` toward `target` in the target's direction, never slowing it
#[inline]
pub fn boost_toward(current: f32, target: f32) -> f32 {
    if target > 0.0 {
        current.max(target)
    } else if target < 0.0 {
        current.min(target)
    } else {
        current
    }
}

/// Fire any armed pad the marble is over. Returns the indices that fired.
pub fn apply_speed_pads(
    body: &mut ArcadeBody,
    pads: &[SpeedPad],
    states: &mut [SpeedPadState],
    tuning: &Tuning,
) -> Vec<usize> {
    let mut fired = Vec::new();
    for (index, (pad, state)) in pads.iter().zip(states.iter_mut()).enumerate() {
        if let Some(last) = state.last_trigger {
            if body.pos.distance(last) > tuning.speed_pad_rearm_dist {
                state.last_trigger = None;
            } else {
                continue;
            }
        }

        if !pad.rect().contains(body.pos) {
            continue;
        }

        if let Some(vx) = pad.vx.filter(|v| v.is_finite()) {
            body.vel.x = boost_toward(body.vel.x, vx);
        }
        if let Some(vy) = pad.vy.filter(|v| v.is_finite()) {
            body.vel.y = boost_toward(body.vel.y, vy);
        }
        state.last_trigger = Some(body.pos);
        fired.push(index);
    }
    fired
}

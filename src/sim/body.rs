//! Arcade rigid body for the marble
//!
//! Stands in for the host engine: integrates gravity and acceleration, clamps
//! to a max velocity, and separates the body from static axis-aligned
//! colliders one axis at a time. The circle is treated as its bounding square
//! against rectangles, which is all the level geometry needs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Overlap smaller than this is treated as resting contact, not penetration
const CONTACT_EPS: f32 = 0.01;

/// Axis-aligned rectangle (top-left origin, +Y down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Check if an x coordinate lies within the horizontal span
    #[inline]
    pub fn spans_x(&self, x: f32) -> bool {
        x >= self.x && x <= self.right()
    }

    /// Check if a point lies inside the rectangle
    pub fn contains(&self, p: Vec2) -> bool {
        self.spans_x(p.x) && p.y >= self.y && p.y <= self.bottom()
    }

    /// Check if a square of half-size `half` centred at `center` penetrates this rect
    fn penetrated_by(&self, center: Vec2, half: f32) -> bool {
        center.x + half > self.x + CONTACT_EPS
            && center.x - half < self.right() - CONTACT_EPS
            && center.y + half > self.y + CONTACT_EPS
            && center.y - half < self.bottom() - CONTACT_EPS
    }
}

/// The marble's physics body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcadeBody {
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    /// Continuous acceleration applied each step (input-driven)
    pub accel: Vec2,
    pub radius: f32,
    /// Restitution per axis
    pub bounce: Vec2,
    /// Absolute velocity clamp per axis
    pub max_velocity: Vec2,
    pub allow_gravity: bool,
    /// Set when the last step landed on a collider's top face
    pub blocked_down: bool,
    /// Index of the collider that landing hit
    pub landed_on: Option<usize>,
}

impl ArcadeBody {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            radius,
            bounce: Vec2::new(HORIZONTAL_BOUNCE, 0.0),
            max_velocity: Vec2::new(MAX_HORIZONTAL_SPEED, MAX_FALL_SPEED),
            allow_gravity: true,
            blocked_down: false,
            landed_on: None,
        }
    }

    /// Lower boundary of the marble
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }

    /// Move to `pos` and come to a dead stop (same body, no new entity)
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.accel = Vec2::ZERO;
        self.blocked_down = false;
        self.landed_on = None;
    }

    /// Advance one step against static colliders
    pub fn step(&mut self, dt: f32, gravity: f32, colliders: &[Rect], world_width: f32) {
        self.blocked_down = false;
        self.landed_on = None;

        let g = if self.allow_gravity { gravity } else { 0.0 };
        self.vel += (self.accel + Vec2::new(0.0, g)) * dt;
        self.vel = self.vel.clamp(-self.max_velocity, self.max_velocity);

        // X
        let dx = self.vel.x * dt;
        self.pos.x += dx;
        for rect in colliders {
            if rect.penetrated_by(self.pos, self.radius) {
                if dx > 0.0 {
                    self.pos.x = rect.x - self.radius;
                } else if dx < 0.0 {
                    self.pos.x = rect.right() + self.radius;
                }
                self.vel.x = -self.vel.x * self.bounce.x;
            }
        }

        // World side bounds
        if world_width > self.radius * 2.0 {
            if self.pos.x < self.radius {
                self.pos.x = self.radius;
                self.vel.x = -self.vel.x * self.bounce.x;
            } else if self.pos.x > world_width - self.radius {
                self.pos.x = world_width - self.radius;
                self.vel.x = -self.vel.x * self.bounce.x;
            }
        }

        // Y
        let dy = self.vel.y * dt;
        self.pos.y += dy;
        for (index, rect) in colliders.iter().enumerate() {
            if rect.penetrated_by(self.pos, self.radius) {
                if dy > 0.0 {
                    self.pos.y = rect.y - self.radius;
                    self.blocked_down = true;
                    self.landed_on = Some(index);
                    self.vel.y = -self.vel.y * self.bounce.y;
                    if self.vel.y.abs() < REST_SPEED {
                        self.vel.y = 0.0;
                    }
                } else if dy < 0.0 {
                    self.pos.y = rect.bottom() + self.radius;
                    self.vel.y = -self.vel.y * self.bounce.y;
                }
            }
        }
    }
}

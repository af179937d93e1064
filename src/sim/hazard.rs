//! Enemy motion and marble-enemy contact resolution

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::ArcadeBody;
use super::level::{EnemyBehavior, EnemyDef};
use crate::consts::ENEMY_RADIUS;
use crate::tuning::Tuning;

/// Behavior-specific enemy state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Patrols between two x bounds
    Roller {
        patrol_min: f32,
        patrol_max: f32,
        dir: f32,
    },
    /// Pursues the marble while it is inside the detection radius
    Chaser { detection_radius: f32, chasing: bool },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn from_def(id: u32, def: &EnemyDef) -> Self {
        let kind = match def.behavior {
            EnemyBehavior::Roller {
                patrol_min,
                patrol_max,
            } => EnemyKind::Roller {
                patrol_min,
                patrol_max,
                dir: 1.0,
            },
            EnemyBehavior::Chaser { detection_radius } => EnemyKind::Chaser {
                detection_radius,
                chasing: false,
            },
        };
        Self {
            id,
            pos: Vec2::new(def.x, def.y),
            vel: Vec2::ZERO,
            radius: def.radius.filter(|r| *r > 0.0).unwrap_or(ENEMY_RADIUS),
            alive: true,
            kind,
        }
    }

    /// Advance patrol/chase motion along the enemy's ground line
    pub fn update_motion(&mut self, marble_pos: Vec2, tuning: &Tuning, dt: f32) {
        if !self.alive {
            self.vel = Vec2::ZERO;
            return;
        }

        match &mut self.kind {
            EnemyKind::Roller {
                patrol_min,
                patrol_max,
                dir,
            } => {
                self.vel.x = *dir * tuning.roller_speed;
                self.pos.x += self.vel.x * dt;
                if self.pos.x <= *patrol_min {
                    self.pos.x = *patrol_min;
                    *dir = 1.0;
                } else if self.pos.x >= *patrol_max {
                    self.pos.x = *patrol_max;
                    *dir = -1.0;
                }
            }
            EnemyKind::Chaser {
                detection_radius,
                chasing,
            } => {
                *chasing = self.pos.distance(marble_pos) <= *detection_radius;
                let dx = marble_pos.x - self.pos.x;
                self.vel.x = if *chasing && dx.abs() > 1.0 {
                    dx.signum() * tuning.chaser_speed
                } else {
                    0.0
                };
                self.pos.x += self.vel.x * dt;
            }
        }
    }

    /// Circle-circle overlap with the marble
    pub fn overlaps(&self, body: &ArcadeBody) -> bool {
        self.pos.distance(body.pos) < self.radius + body.radius
    }
}

/// Result of a marble-enemy contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HazardOutcome {
    /// Marble was fast enough; the enemy is dead and the marble unaffected
    Kill { enemy: u32 },
    /// Marble was too slow and got pushed away
    Knockback { enemy: u32 },
}

/// Resolve the first live enemy touching the marble.
///
/// Only horizontal speed decides the outcome. While `invincible` no contact
/// applies at all.
pub fn resolve_contacts(
    body: &mut ArcadeBody,
    enemies: &mut [Enemy],
    invincible: bool,
    tuning: &Tuning,
) -> Option<HazardOutcome> {
    if invincible {
        return None;
    }
    let enemy = enemies.iter_mut().find(|e| e.alive && e.overlaps(body))?;

    if body.vel.x.abs() >= tuning.kill_speed {
        enemy.alive = false;
        enemy.vel = Vec2::ZERO;
        return Some(HazardOutcome::Kill { enemy: enemy.id });
    }

    let away = body.pos.x - enemy.pos.x;
    let dir = if away != 0.0 {
        away.signum()
    } else if body.vel.x != 0.0 {
        -body.vel.x.signum()
    } else {
        -1.0
    };
    body.vel = Vec2::new(dir * tuning.knockback_speed, -tuning.knockback_up);
    Some(HazardOutcome::Knockback { enemy: enemy.id })
}

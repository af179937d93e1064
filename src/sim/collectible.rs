//! Gems, checkpoints and scattered gems

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::level::{Level, Platform};
use crate::consts::*;
use crate::damping_factor;
use crate::tuning::Tuning;

/// A placed gem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gem {
    pub pos: Vec2,
    pub collected: bool,
}

/// A checkpoint flag; `pos` is its base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub pos: Vec2,
    pub activated: bool,
}

/// A gem knocked loose by a hazard hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatteredGem {
    pub pos: Vec2,
    pub vel: Vec2,
    pub age_ms: f32,
}

/// What the marble picked up this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pickups {
    /// Indices of placed gems collected
    pub gems: Vec<usize>,
    /// Number of scattered gems recovered
    pub recovered: u32,
    /// Newly activated checkpoint and the respawn anchor it provides
    pub checkpoint: Option<(usize, Vec2)>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collectibles {
    pub gems: Vec<Gem>,
    pub checkpoints: Vec<Checkpoint>,
    pub scattered: Vec<ScatteredGem>,
    /// Gems currently carried
    pub held: u32,
}

impl Collectibles {
    pub fn from_level(level: &Level) -> Self {
        Self {
            gems: level
                .gems
                .iter()
                .map(|&pos| Gem {
                    pos,
                    collected: false,
                })
                .collect(),
            checkpoints: level
                .checkpoints
                .iter()
                .map(|&pos| Checkpoint {
                    pos,
                    activated: false,
                })
                .collect(),
            scattered: Vec::new(),
            held: 0,
        }
    }

    /// Collect anything within reach of the marble
    pub fn collect(&mut self, marble_pos: Vec2, marble_radius: f32, tuning: &Tuning) -> Pickups {
        let mut pickups = Pickups::default();
        let reach = marble_radius + GEM_RADIUS;

        for (index, gem) in self.gems.iter_mut().enumerate() {
            if !gem.collected && gem.pos.distance(marble_pos) <= reach {
                gem.collected = true;
                self.held += 1;
                pickups.gems.push(index);
            }
        }

        let before = self.scattered.len();
        self.scattered.retain(|g| {
            g.age_ms < tuning.scatter_grace_ms || g.pos.distance(marble_pos) > reach
        });
        let recovered = (before - self.scattered.len()) as u32;
        self.held += recovered;
        pickups.recovered = recovered;

        for (index, cp) in self.checkpoints.iter_mut().enumerate() {
            if cp.activated {
                continue;
            }
            let dx = (marble_pos.x - cp.pos.x).abs();
            let above = cp.pos.y - marble_pos.y;
            if dx <= CHECKPOINT_HALF_WIDTH && (0.0..=CHECKPOINT_HEIGHT).contains(&above) {
                cp.activated = true;
                let anchor = Vec2::new(cp.pos.x, cp.pos.y - marble_radius);
                pickups.checkpoint = Some((index, anchor));
            }
        }

        pickups
    }

    /// Throw every carried gem out as a ballistic entity. Returns how many.
    pub fn scatter<R: Rng>(&mut self, origin: Vec2, rng: &mut R, tuning: &Tuning) -> u32 {
        let count = self.held;
        for _ in 0..count {
            // Upward fan, screen space (-90° is straight up)
            let angle = rng.random_range(-150.0f32..-30.0).to_radians();
            let speed = tuning.scatter_speed * rng.random_range(0.6f32..1.0);
            self.scattered.push(ScatteredGem {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                age_ms: 0.0,
            });
        }
        self.held = 0;
        count
    }

    /// Fly scattered gems, bounce them off platform tops and the world floor,
    /// and expire old ones
    pub fn update_scattered(
        &mut self,
        platforms: &[Platform],
        floor_y: f32,
        tuning: &Tuning,
        dt: f32,
    ) {
        let air = damping_factor(SCATTER_AIR_DECAY, dt);
        for gem in &mut self.scattered {
            gem.age_ms += dt * 1000.0;
            gem.vel.y += GRAVITY * dt;
            gem.vel.x *= air;

            let prev_bottom = gem.pos.y + GEM_RADIUS;
            gem.pos += gem.vel * dt;
            let bottom = gem.pos.y + GEM_RADIUS;
            if gem.vel.y <= 0.0 {
                continue;
            }

            let landing = platforms
                .iter()
                .filter(|p| p.rect().spans_x(gem.pos.x))
                .map(Platform::top)
                .chain(std::iter::once(floor_y))
                .filter(|&top| prev_bottom <= top && bottom >= top)
                .reduce(f32::min);
            if let Some(top) = landing {
                gem.pos.y = top - GEM_RADIUS;
                gem.vel.y = -gem.vel.y * SCATTER_BOUNCE;
                gem.vel.x *= 0.8;
            }
        }
        self.scattered.retain(|g| g.age_ms < tuning.scatter_lifetime_ms);
    }

    /// Respawn: placed gems come back, carried and flying gems are gone
    pub fn reset_for_respawn(&mut self) {
        for gem in &mut self.gems {
            gem.collected = false;
        }
        self.scattered.clear();
        self.held = 0;
    }

    pub fn remaining(&self) -> usize {
        self.gems.iter().filter(|g| !g.collected).count()
    }
}

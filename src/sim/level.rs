//! Declarative level description
//!
//! Consumed once at level load and never mutated by the simulation. Levels
//! come from JSON; semantic problems in the data are repaired or made inert
//! by [`Level::sanitize`] rather than rejected.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Rect;
use super::surface::SurfaceKind;
use crate::consts::*;

/// A static platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    #[serde(default)]
    pub surface: SurfaceKind,
    /// Signed belt speed for conveyors (px/s, + is rightward)
    #[serde(default)]
    pub conveyor_speed: Option<f32>,
}

impl Platform {
    pub fn new(x: f32, y: f32, w: f32, h: f32, surface: SurfaceKind) -> Self {
        Self {
            x,
            y,
            w,
            h,
            surface,
            conveyor_speed: None,
        }
    }

    pub fn conveyor(x: f32, y: f32, w: f32, h: f32, speed: f32) -> Self {
        Self {
            conveyor_speed: Some(speed),
            ..Self::new(x, y, w, h, SurfaceKind::Conveyor)
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Y of the walkable top face
    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }
}

/// Two linked portal anchors; entering either exits at the other
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortalPair {
    pub ax: f32,
    pub ay: f32,
    pub bx: f32,
    pub by: f32,
}

impl PortalPair {
    pub fn a(&self) -> Vec2 {
        Vec2::new(self.ax, self.ay)
    }

    pub fn b(&self) -> Vec2 {
        Vec2::new(self.bx, self.by)
    }
}

/// A spring; `y` is the top of the spring where the marble rests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub x: f32,
    pub y: f32,
    /// Launch speed override (px/s, upward)
    #[serde(default)]
    pub power: Option<f32>,
}

/// Fixed weight riding a seesaw plank
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Counterweight {
    /// Signed distance along the plank from the pivot (+ is right)
    pub offset: f32,
    pub mass: f32,
}

/// A pivoting plank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeesawDef {
    /// Pivot on the plank's top surface
    pub pivot_x: f32,
    pub pivot_y: f32,
    pub half_length: f32,
    /// Tilt limit in radians (symmetric)
    pub max_angle: f32,
    pub inertia: f32,
    /// Angular velocity kept per 60 Hz frame
    pub damping: f32,
    #[serde(default)]
    pub counterweights: Vec<Counterweight>,
}

/// Rectangular pad that raises the marble's velocity toward a target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedPad {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Desired horizontal velocity (sign is direction)
    #[serde(default)]
    pub vx: Option<f32>,
    /// Desired vertical velocity (negative is upward)
    #[serde(default)]
    pub vy: Option<f32>,
}

impl SpeedPad {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Enemy behavior as described by the level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnemyBehavior {
    Roller { patrol_min: f32, patrol_max: f32 },
    Chaser { detection_radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyDef {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub radius: Option<f32>,
    pub behavior: EnemyBehavior,
}

/// Complete level description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Key for best-time records
    pub id: String,
    pub world_width: f32,
    /// Y of the world bottom; falling past it respawns the marble
    pub world_height: f32,
    pub spawn: Vec2,
    pub goal: Vec2,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub portals: Vec<PortalPair>,
    #[serde(default)]
    pub springs: Vec<Spring>,
    #[serde(default)]
    pub seesaws: Vec<SeesawDef>,
    #[serde(default)]
    pub speed_pads: Vec<SpeedPad>,
    #[serde(default)]
    pub enemies: Vec<EnemyDef>,
    #[serde(default)]
    pub gems: Vec<Vec2>,
    /// Checkpoint bases (bottom-center of the flag)
    #[serde(default)]
    pub checkpoints: Vec<Vec2>,
}

impl Level {
    /// Empty level with only bounds, spawn and goal
    pub fn new(id: &str, world_width: f32, world_height: f32, spawn: Vec2, goal: Vec2) -> Self {
        Self {
            id: id.to_string(),
            world_width,
            world_height,
            spawn,
            goal,
            platforms: Vec::new(),
            portals: Vec::new(),
            springs: Vec::new(),
            seesaws: Vec::new(),
            speed_pads: Vec::new(),
            enemies: Vec::new(),
            gems: Vec::new(),
            checkpoints: Vec::new(),
        }
    }

    /// Parse and sanitize a level document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let level: Level = serde_json::from_str(json)?;
        Ok(level.sanitize())
    }

    /// Repair or disable malformed elements so they become inert
    pub fn sanitize(mut self) -> Self {
        let id = self.id.clone();

        self.platforms.retain(|p| {
            let ok = p.w > 0.0 && p.h > 0.0 && p.x.is_finite() && p.y.is_finite();
            if !ok {
                log::warn!("{}: dropping degenerate platform at ({}, {})", id, p.x, p.y);
            }
            ok
        });
        for p in &self.platforms {
            if p.surface == SurfaceKind::Conveyor && p.conveyor_speed.is_none() {
                log::warn!("{}: conveyor at ({}, {}) has no speed", id, p.x, p.y);
            }
        }

        self.portals.retain(|p| {
            let ok = p.a().is_finite() && p.b().is_finite() && p.a() != p.b();
            if !ok {
                log::warn!("{}: dropping portal pair with coincident anchors", id);
            }
            ok
        });

        self.seesaws.retain(|s| {
            let finite = [s.pivot_x, s.pivot_y, s.half_length, s.max_angle, s.damping, s.inertia]
                .iter()
                .all(|v| v.is_finite());
            let ok = finite && s.inertia > 0.0 && s.half_length > 0.0;
            if !ok {
                log::warn!("{}: dropping seesaw at ({}, {})", id, s.pivot_x, s.pivot_y);
            }
            ok
        });
        for s in &mut self.seesaws {
            s.max_angle = s.max_angle.abs().min(std::f32::consts::FRAC_PI_3);
            s.damping = s.damping.clamp(0.0, 1.0);
            s.counterweights.retain(|w| {
                let ok = w.offset.is_finite() && w.mass.is_finite();
                if !ok {
                    log::warn!("{}: dropping counterweight on seesaw at {}", id, s.pivot_x);
                }
                ok
            });
        }

        for e in &mut self.enemies {
            if let EnemyBehavior::Roller {
                patrol_min,
                patrol_max,
            } = &mut e.behavior
            {
                if *patrol_min > *patrol_max {
                    log::warn!("{}: roller patrol bounds swapped", id);
                    std::mem::swap(patrol_min, patrol_max);
                }
            }
        }

        self
    }

    /// Static colliders the body is separated against
    pub fn colliders(&self) -> Vec<Rect> {
        self.platforms.iter().map(Platform::rect).collect()
    }

    /// Built-in level exercising every element type
    pub fn demo() -> Self {
        let ground = 600.0;
        let ledge = 560.0;
        Self {
            id: "demo".to_string(),
            world_width: 3400.0,
            world_height: 720.0,
            spawn: Vec2::new(80.0, ground - MARBLE_RADIUS),
            goal: Vec2::new(3300.0, ground - 40.0),
            platforms: vec![
                Platform::new(0.0, ground, 620.0, 120.0, SurfaceKind::Concrete),
                Platform::new(320.0, 420.0, 180.0, 20.0, SurfaceKind::Snow),
                Platform::new(620.0, ground, 420.0, 120.0, SurfaceKind::Grass),
                Platform::new(1120.0, ledge, 380.0, 160.0, SurfaceKind::Ice),
                Platform::conveyor(1500.0, ledge, 300.0, 160.0, 180.0),
                Platform::new(1800.0, ledge, 200.0, 160.0, SurfaceKind::Mud),
                Platform::new(2000.0, ledge, 80.0, 160.0, SurfaceKind::BouncePad),
                Platform::new(2080.0, ground, 320.0, 120.0, SurfaceKind::Sand),
                Platform::new(2760.0, ground, 640.0, 120.0, SurfaceKind::WetMetal),
            ],
            portals: vec![PortalPair {
                ax: 1000.0,
                ay: ground - 30.0,
                bx: 410.0,
                by: 380.0,
            }],
            springs: vec![Spring {
                x: 560.0,
                y: ground,
                power: None,
            }],
            seesaws: vec![SeesawDef {
                pivot_x: 2580.0,
                pivot_y: ground,
                half_length: 150.0,
                max_angle: 0.35,
                inertia: 60_000.0,
                damping: 0.96,
                counterweights: vec![Counterweight {
                    offset: -80.0,
                    mass: 0.5,
                }],
            }],
            speed_pads: vec![SpeedPad {
                x: 1160.0,
                y: ledge - 30.0,
                w: 100.0,
                h: 30.0,
                vx: Some(450.0),
                vy: None,
            }],
            enemies: vec![
                EnemyDef {
                    x: 800.0,
                    y: ground - ENEMY_RADIUS,
                    radius: None,
                    behavior: EnemyBehavior::Roller {
                        patrol_min: 680.0,
                        patrol_max: 980.0,
                    },
                },
                EnemyDef {
                    x: 2300.0,
                    y: ground - ENEMY_RADIUS,
                    radius: None,
                    behavior: EnemyBehavior::Chaser {
                        detection_radius: 220.0,
                    },
                },
            ],
            gems: vec![
                Vec2::new(200.0, ground - 20.0),
                Vec2::new(400.0, 390.0),
                Vec2::new(760.0, ground - 20.0),
                Vec2::new(1300.0, ledge - 20.0),
                Vec2::new(1650.0, ledge - 20.0),
                Vec2::new(2200.0, ground - 20.0),
                Vec2::new(2900.0, ground - 20.0),
            ],
            checkpoints: vec![Vec2::new(1180.0, ledge), Vec2::new(2820.0, ground)],
        }
    }
}

//! Simulation context and presentation-facing types
//!
//! `SimState` is the single context struct the tick threads through every
//! component. Each component owns its own field; the presentation layer only
//! reads [`Snapshot`]s and the per-tick event list.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{ArcadeBody, Rect};
use super::charge::{ChargeState, ChargeVisual};
use super::collectible::Collectibles;
use super::gadgets::{PortalTracker, SpeedPadState};
use super::grounding::GroundingDetector;
use super::hazard::Enemy;
use super::level::Level;
use super::seesaw::Seesaw;
use super::surface::{SurfaceContact, SurfaceKind};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    Playing,
    /// Goal reached; the clock is frozen
    Finished,
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    Jumped {
        t: f32,
        speed: f32,
        surface: SurfaceKind,
    },
    SpringLaunched {
        spring: usize,
    },
    /// Both ends of the pair flash `color`
    Teleported {
        pair: usize,
        to: Vec2,
        color: u32,
    },
    SpeedPad {
        pad: usize,
    },
    BouncePad,
    EnemyKilled {
        enemy: u32,
    },
    KnockedBack {
        enemy: u32,
        scattered: u32,
    },
    GemCollected {
        gem: usize,
    },
    GemsRecovered {
        count: u32,
    },
    CheckpointActivated {
        checkpoint: usize,
    },
    Respawned {
        at: Vec2,
    },
    GoalReached {
        elapsed_ms: f64,
        gems: u32,
    },
}

impl SimEvent {
    /// Stable name, matching the serialized `type` tag
    pub fn name(&self) -> &'static str {
        match self {
            SimEvent::Jumped { .. } => "jumped",
            SimEvent::SpringLaunched { .. } => "spring_launched",
            SimEvent::Teleported { .. } => "teleported",
            SimEvent::SpeedPad { .. } => "speed_pad",
            SimEvent::BouncePad => "bounce_pad",
            SimEvent::EnemyKilled { .. } => "enemy_killed",
            SimEvent::KnockedBack { .. } => "knocked_back",
            SimEvent::GemCollected { .. } => "gem_collected",
            SimEvent::GemsRecovered { .. } => "gems_recovered",
            SimEvent::CheckpointActivated { .. } => "checkpoint_activated",
            SimEvent::Respawned { .. } => "respawned",
            SimEvent::GoalReached { .. } => "goal_reached",
        }
    }
}

/// Enemy as the presentation layer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnemyView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub alive: bool,
}

/// Read-only view of everything drawable
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Surface under the marble, if touching one
    pub surface: Option<SurfaceKind>,
    pub grounded: bool,
    pub charge: ChargeVisual,
    pub seesaw_angles: Vec<f32>,
    pub enemies: Vec<EnemyView>,
    pub gems_held: u32,
    pub gems_remaining: usize,
    pub scattered: Vec<Vec2>,
    pub invincible: bool,
    pub elapsed_ms: f64,
    pub phase: SimPhase,
}

/// Complete simulation state for one level run
#[derive(Debug, Clone)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub level: Level,
    pub tuning: Tuning,
    /// Platform rectangles handed to the body each step
    pub(crate) colliders: Vec<Rect>,

    pub marble: ArcadeBody,
    pub grounding: GroundingDetector,
    /// Contact classified this tick
    pub surface: Option<SurfaceContact>,
    /// Last surface actually touched (charges started during coyote time use it)
    pub last_surface: SurfaceKind,
    pub charge: ChargeState,
    /// Landing flag for bounce pads
    pub landing_armed: bool,

    /// Angles persist across respawns; only a level reload resets them
    pub seesaws: Vec<Seesaw>,
    pub seesaw_contact: bool,
    pub portals: PortalTracker,
    pub speed_pads: Vec<SpeedPadState>,
    pub enemies: Vec<Enemy>,
    pub collectibles: Collectibles,

    pub respawn_anchor: Vec2,
    pub invincible_until_ms: f64,

    /// Simulation clock (ms since level start)
    pub clock_ms: f64,
    pub time_ticks: u64,
    pub phase: SimPhase,
    /// Events raised by the most recent tick
    pub events: Vec<SimEvent>,

    /// Held buttons last tick, for edge detection
    pub(crate) prev_left: bool,
    pub(crate) prev_right: bool,
    pub(crate) prev_jump: bool,

    pub(crate) rng: Pcg32,
}

impl SimState {
    /// Start a run of `level`
    pub fn new(level: Level, tuning: Tuning, seed: u64) -> Self {
        let level = level.sanitize();
        let tuning = tuning.validated();
        log::info!(
            "Level '{}' loaded: {} platforms, {} seesaws, {} portals, {} enemies, {} gems",
            level.id,
            level.platforms.len(),
            level.seesaws.len(),
            level.portals.len(),
            level.enemies.len(),
            level.gems.len()
        );

        let enemies = level
            .enemies
            .iter()
            .enumerate()
            .map(|(i, def)| Enemy::from_def(i as u32 + 1, def))
            .collect();

        Self {
            seed,
            colliders: level.colliders(),
            marble: ArcadeBody::new(level.spawn, MARBLE_RADIUS),
            grounding: GroundingDetector::default(),
            surface: None,
            last_surface: SurfaceKind::FIRM_GROUND,
            charge: ChargeState::Idle,
            landing_armed: true,
            seesaws: level.seesaws.iter().map(Seesaw::from_def).collect(),
            seesaw_contact: false,
            portals: PortalTracker::default(),
            speed_pads: vec![SpeedPadState::default(); level.speed_pads.len()],
            enemies,
            collectibles: Collectibles::from_level(&level),
            respawn_anchor: level.spawn,
            invincible_until_ms: 0.0,
            clock_ms: 0.0,
            time_ticks: 0,
            phase: SimPhase::Playing,
            events: Vec::new(),
            prev_left: false,
            prev_right: false,
            prev_jump: false,
            rng: Pcg32::seed_from_u64(seed),
            level,
            tuning,
        }
    }

    /// Check if hazard contact is currently suppressed
    pub fn is_invincible(&self) -> bool {
        self.clock_ms < self.invincible_until_ms
    }

    /// Put the marble back at the respawn anchor.
    ///
    /// Discards transient actor state (charge, timers, locks, carried gems).
    /// Seesaws and enemies keep their state.
    pub fn respawn(&mut self) {
        let at = self.respawn_anchor;
        self.marble.reset(at);
        self.grounding.reset();
        self.surface = None;
        self.charge = ChargeState::Idle;
        self.landing_armed = true;
        self.seesaw_contact = false;
        self.portals.clear();
        self.speed_pads.fill(SpeedPadState::default());
        self.invincible_until_ms = 0.0;
        self.collectibles.reset_for_respawn();
        self.events.push(SimEvent::Respawned { at });
        log::info!("Respawned at ({:.0}, {:.0})", at.x, at.y);
    }

    /// Elapsed run time and gems held, once the goal has been reached
    pub fn goal_report(&self) -> Option<(f64, u32)> {
        (self.phase == SimPhase::Finished).then_some((self.clock_ms, self.collectibles.held))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.marble.pos,
            vel: self.marble.vel,
            radius: self.marble.radius,
            surface: self.surface.map(|c| c.kind()),
            grounded: self.grounding.grounded,
            charge: self.charge.visual(self.clock_ms, &self.tuning),
            seesaw_angles: self.seesaws.iter().map(|s| s.angle).collect(),
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    pos: e.pos,
                    radius: e.radius,
                    alive: e.alive,
                })
                .collect(),
            gems_held: self.collectibles.held,
            gems_remaining: self.collectibles.remaining(),
            scattered: self.collectibles.scattered.iter().map(|g| g.pos).collect(),
            invincible: self.is_invincible(),
            elapsed_ms: self.clock_ms,
            phase: self.phase,
        }
    }
}

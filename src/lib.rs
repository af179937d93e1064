//! Marble Rush - A rolling-marble platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (surfaces, charge jumps, seesaws, portals, hazards)
//! - `game`: Frame-driven fixed-step runner
//! - `tuning`: Data-driven feel constants
//! - `besttimes`: Per-level best time records
//! - `web`: Browser binding for the presentation layer (wasm32 only)

pub mod besttimes;
pub mod game;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use besttimes::{BestTimes, KeyValueStore, MemoryStore, format_time};
pub use game::Game;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Frame length the per-frame damping factors were tuned at (60 Hz)
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;

    /// World gravity (pixels/s², +Y is down)
    pub const GRAVITY: f32 = 900.0;
    /// Terminal fall speed enforced by the body's max velocity
    pub const MAX_FALL_SPEED: f32 = 1200.0;
    /// Hard horizontal cap enforced by the body (input speed is capped per surface)
    pub const MAX_HORIZONTAL_SPEED: f32 = 900.0;
    /// Landing rebounds slower than this come to rest instead of jittering
    pub const REST_SPEED: f32 = 20.0;
    /// Falling this far below the world bottom respawns the marble
    pub const FALL_MARGIN: f32 = 200.0;

    /// Marble defaults
    pub const MARBLE_RADIUS: f32 = 14.0;
    pub const MARBLE_MASS: f32 = 1.0;
    /// Horizontal restitution is fixed; vertical comes from the surface
    pub const HORIZONTAL_BOUNCE: f32 = 0.3;

    /// Grounding
    pub const GROUND_TOLERANCE: f32 = 4.0;
    pub const COYOTE_MS: f32 = 80.0;

    /// Charge jump
    pub const QUICK_TAP_MS: f32 = 150.0;
    pub const ARMED_WINDOW_MS: f32 = 250.0;
    pub const MAX_CHARGE_MS: f32 = 1000.0;
    pub const JUMP_MIN: f32 = 260.0;
    pub const JUMP_MAX: f32 = 640.0;

    /// Movement
    pub const BASE_ACCEL: f32 = 600.0;
    pub const AIR_ACCEL_FRACTION: f32 = 0.3;
    pub const MAX_SPEED: f32 = 320.0;
    pub const KICK_SPEED: f32 = 40.0;
    /// Below this horizontal speed the marble counts as stationary
    pub const STATIONARY_SPEED: f32 = 10.0;
    /// Share of the surface drag applied per reference frame while free-rolling
    pub const FREE_ROLL_FRACTION: f32 = 0.5;

    /// Surface effects
    pub const BOUNCE_PAD_VELOCITY: f32 = 650.0;
    pub const CONVEYOR_ACCEL: f32 = 400.0;
    /// Conveyors may push past the normal max speed by this factor
    pub const CONVEYOR_CEILING_FACTOR: f32 = 1.5;
    pub const MUD_SPEED_CAP: f32 = 120.0;

    /// Springs
    pub const SPRING_POWER: f32 = 700.0;
    pub const SPRING_HALF_WIDTH: f32 = 22.0;
    /// Vertical window around the spring top in which the marble's bottom must sit
    pub const SPRING_WINDOW: f32 = 10.0;

    /// Portals
    pub const PORTAL_RADIUS: f32 = 24.0;
    pub const PORTAL_EXIT_DIST: f32 = 56.0;
    /// Flash colors shared by both ends of a portal pair (0xRRGGBB, by pair index)
    pub const PORTAL_PALETTE: [u32; 6] =
        [0x00e5ff, 0xff4fd8, 0xffd23f, 0x7cff4f, 0xff7a1a, 0x9b6bff];

    /// Speed pads re-arm once the marble moves this far from the last trigger
    pub const SPEED_PAD_REARM_DIST: f32 = 64.0;

    /// Seesaws
    pub const SEESAW_SNAP: f32 = 12.0;
    /// Marble may not separate from a plank faster than this and still count as touching
    pub const SEESAW_RELEASE_SPEED: f32 = 30.0;
    /// Fraction of angular velocity kept when a plank hits its tilt limit
    pub const SEESAW_LIMIT_RETAIN: f32 = 0.05;

    /// Hazards
    pub const ROLLER_SPEED: f32 = 60.0;
    pub const CHASER_SPEED: f32 = 90.0;
    pub const ENEMY_RADIUS: f32 = 16.0;
    pub const KILL_SPEED: f32 = 250.0;
    pub const KNOCKBACK_SPEED: f32 = 220.0;
    pub const KNOCKBACK_UP: f32 = 280.0;
    pub const INVINCIBLE_MS: f32 = 1200.0;

    /// Collectibles
    pub const GEM_RADIUS: f32 = 10.0;
    pub const CHECKPOINT_HALF_WIDTH: f32 = 20.0;
    pub const CHECKPOINT_HEIGHT: f32 = 64.0;
    pub const GOAL_RADIUS: f32 = 32.0;
    pub const SCATTER_SPEED: f32 = 260.0;
    pub const SCATTER_LIFETIME_MS: f32 = 5000.0;
    pub const SCATTER_GRACE_MS: f32 = 250.0;
    pub const SCATTER_BOUNCE: f32 = 0.5;
    /// Horizontal velocity kept per reference frame while a scattered gem flies
    pub const SCATTER_AIR_DECAY: f32 = 0.995;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Per-frame damping factor rescaled to an arbitrary timestep.
///
/// `per_frame` was tuned at 60 Hz; applying the result every `dt` seconds
/// gives the same decay per wall-clock second at any tick rate.
#[inline]
pub fn damping_factor(per_frame: f32, dt: f32) -> f32 {
    per_frame.powf(dt * 1000.0 / consts::REFERENCE_FRAME_MS)
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (level order for every element list)
//! - No rendering or platform dependencies

pub mod body;
pub mod charge;
pub mod collectible;
pub mod gadgets;
pub mod grounding;
pub mod hazard;
pub mod level;
pub mod movement;
pub mod seesaw;
pub mod state;
pub mod surface;
pub mod tick;

pub use body::{ArcadeBody, Rect};
pub use charge::{ChargeState, ChargeVisual, Fire, InputEdge, launch_speed};
pub use collectible::{Checkpoint, Collectibles, Gem, Pickups, ScatteredGem};
pub use gadgets::{PortalTracker, SpeedPadState, Teleport, portal_color};
pub use grounding::{GroundingDetector, classify_surface, platform_under};
pub use hazard::{Enemy, EnemyKind, HazardOutcome, resolve_contacts};
pub use level::{
    Counterweight, EnemyBehavior, EnemyDef, Level, Platform, PortalPair, SeesawDef, SpeedPad,
    Spring,
};
pub use movement::MoveIntent;
pub use seesaw::Seesaw;
pub use state::{EnemyView, SimEvent, SimPhase, SimState, Snapshot};
pub use surface::{SurfaceContact, SurfaceKind, SurfaceMaterial, apply_surface_physics};
pub use tick::{TickInput, tick};

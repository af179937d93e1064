//! Data-driven feel constants
//!
//! Every threshold the simulation reacts to lives here so levels and
//! playtests can override them without touching code. Persisted separately
//! from best times in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::besttimes::KeyValueStore;
use crate::consts::*;

/// Gameplay tuning knobs (times in milliseconds, speeds in px/s)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Charge jump ===
    /// Releases shorter than this fire immediately at zero charge
    pub quick_tap_ms: f32,
    /// Window after a long release in which a re-press locks the charge
    pub armed_window_ms: f32,
    /// Hold time that reaches full charge
    pub max_charge_ms: f32,
    pub jump_min: f32,
    pub jump_max: f32,

    // === Grounding ===
    pub coyote_ms: f32,

    // === Movement ===
    pub base_accel: f32,
    pub air_accel_fraction: f32,
    pub max_speed: f32,
    pub kick_speed: f32,
    pub stationary_speed: f32,
    pub free_roll_fraction: f32,

    // === Surfaces ===
    pub bounce_pad_velocity: f32,
    pub conveyor_accel: f32,
    pub conveyor_ceiling_factor: f32,
    pub mud_speed_cap: f32,

    // === Gadgets ===
    pub spring_power: f32,
    pub portal_radius: f32,
    pub portal_exit_dist: f32,
    pub speed_pad_rearm_dist: f32,

    // === Hazards ===
    pub roller_speed: f32,
    pub chaser_speed: f32,
    pub kill_speed: f32,
    pub knockback_speed: f32,
    pub knockback_up: f32,
    pub invincible_ms: f32,

    // === Scattered gems ===
    pub scatter_speed: f32,
    pub scatter_lifetime_ms: f32,
    pub scatter_grace_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            quick_tap_ms: QUICK_TAP_MS,
            armed_window_ms: ARMED_WINDOW_MS,
            max_charge_ms: MAX_CHARGE_MS,
            jump_min: JUMP_MIN,
            jump_max: JUMP_MAX,

            coyote_ms: COYOTE_MS,

            base_accel: BASE_ACCEL,
            air_accel_fraction: AIR_ACCEL_FRACTION,
            max_speed: MAX_SPEED,
            kick_speed: KICK_SPEED,
            stationary_speed: STATIONARY_SPEED,
            free_roll_fraction: FREE_ROLL_FRACTION,

            bounce_pad_velocity: BOUNCE_PAD_VELOCITY,
            conveyor_accel: CONVEYOR_ACCEL,
            conveyor_ceiling_factor: CONVEYOR_CEILING_FACTOR,
            mud_speed_cap: MUD_SPEED_CAP,

            spring_power: SPRING_POWER,
            portal_radius: PORTAL_RADIUS,
            portal_exit_dist: PORTAL_EXIT_DIST,
            speed_pad_rearm_dist: SPEED_PAD_REARM_DIST,

            roller_speed: ROLLER_SPEED,
            chaser_speed: CHASER_SPEED,
            kill_speed: KILL_SPEED,
            knockback_speed: KNOCKBACK_SPEED,
            knockback_up: KNOCKBACK_UP,
            invincible_ms: INVINCIBLE_MS,

            scatter_speed: SCATTER_SPEED,
            scatter_lifetime_ms: SCATTER_LIFETIME_MS,
            scatter_grace_ms: SCATTER_GRACE_MS,
        }
    }
}

impl Tuning {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "marble_rush_tuning";

    /// Parse a (possibly partial) tuning document; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::validated)
    }

    /// Clamp values that would break the simulation's invariants
    pub fn validated(mut self) -> Self {
        let fallback = Self::default();
        for (value, default) in [
            (&mut self.quick_tap_ms, fallback.quick_tap_ms),
            (&mut self.armed_window_ms, fallback.armed_window_ms),
            (&mut self.max_charge_ms, fallback.max_charge_ms),
            (&mut self.portal_radius, fallback.portal_radius),
        ] {
            if !value.is_finite() || *value <= 0.0 {
                log::warn!("Tuning value {} rejected, using {}", value, default);
                *value = default;
            }
        }

        if self.jump_max < self.jump_min {
            std::mem::swap(&mut self.jump_max, &mut self.jump_min);
        }
        self.air_accel_fraction = self.air_accel_fraction.clamp(0.0, 1.0);
        self.free_roll_fraction = self.free_roll_fraction.clamp(0.0, 1.0);
        self.conveyor_ceiling_factor = self.conveyor_ceiling_factor.max(1.0);

        // The marble must fully leave the destination ring before it can re-enter
        if self.portal_exit_dist <= self.portal_radius {
            self.portal_exit_dist = self.portal_radius * 2.0 + 8.0;
        }
        self
    }

    /// Charge level reached after holding for `held_ms`
    pub fn charge_level(&self, held_ms: f32) -> f32 {
        (held_ms / self.max_charge_ms).clamp(0.0, 1.0)
    }

    /// Load tuning from a store, falling back to defaults on any failure
    pub fn load_from(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides");
                    tuning
                }
                Err(err) => {
                    log::warn!("Ignoring malformed tuning: {}", err);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default tuning");
                Self::default()
            }
        }
    }

    /// Save tuning to a store (failures are logged and dropped)
    pub fn save_to(&self, store: &mut dyn KeyValueStore) {
        if let Ok(json) = serde_json::to_string(self) {
            if store.set(Self::STORAGE_KEY, &json) {
                log::info!("Tuning saved");
            } else {
                log::warn!("Tuning could not be saved");
            }
        }
    }

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::load_from(&crate::besttimes::LocalStore)
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

//! Charge-jump input state machine
//!
//! Press while grounded to start charging. A release under the quick-tap
//! threshold fires a minimum jump at once; a longer release freezes the
//! charge and arms a short window. Re-pressing inside the window locks the
//! frozen charge until the next release, otherwise it fires when the window
//! closes. Power scales with the surface the press started on.

use serde::{Deserialize, Serialize};

use super::surface::SurfaceKind;
use crate::lerp;
use crate::tuning::Tuning;

/// Jump button edge seen this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEdge {
    Press,
    Release,
}

/// Exactly one charge phase is active at a time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ChargeState {
    #[default]
    Idle,
    /// Button held; level grows with time since `pressed_at`
    Charging { pressed_at: f64, surface: SurfaceKind },
    /// Released after the quick-tap threshold; fires at `deadline` unless re-pressed
    Armed {
        locked_t: f32,
        deadline: f64,
        surface: SurfaceKind,
    },
    /// Re-pressed inside the armed window; fires on the next release
    Locked { locked_t: f32, surface: SurfaceKind },
}

/// A jump that should launch now
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fire {
    /// Charge level in [0, 1]
    pub t: f32,
    /// Surface the charge started on
    pub surface: SurfaceKind,
}

impl Fire {
    pub fn launch_speed(&self, tuning: &Tuning) -> f32 {
        launch_speed(self.t, self.surface, tuning)
    }
}

/// Charge meter as the HUD should show it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChargeVisual {
    None,
    Level(f32),
    Locked(f32),
}

/// Upward launch speed for a charge level on a surface
pub fn launch_speed(t: f32, surface: SurfaceKind, tuning: &Tuning) -> f32 {
    lerp(tuning.jump_min, tuning.jump_max, t.clamp(0.0, 1.0)) * surface.material().jump_multiplier
}

impl ChargeState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ChargeState::Idle)
    }

    /// Advance the machine by one input edge (or none) at `now` (ms).
    ///
    /// `surface` is only consulted when a charge starts.
    pub fn transition(
        self,
        edge: Option<InputEdge>,
        now: f64,
        grounded: bool,
        surface: SurfaceKind,
        tuning: &Tuning,
    ) -> (ChargeState, Option<Fire>) {
        match self {
            ChargeState::Idle => match edge {
                Some(InputEdge::Press) if grounded => (
                    ChargeState::Charging {
                        pressed_at: now,
                        surface,
                    },
                    None,
                ),
                _ => (self, None),
            },

            ChargeState::Charging {
                pressed_at,
                surface,
            } => match edge {
                Some(InputEdge::Release) => {
                    let held = (now - pressed_at) as f32;
                    if held < tuning.quick_tap_ms {
                        (ChargeState::Idle, Some(Fire { t: 0.0, surface }))
                    } else {
                        (
                            ChargeState::Armed {
                                locked_t: tuning.charge_level(held),
                                deadline: now + tuning.armed_window_ms as f64,
                                surface,
                            },
                            None,
                        )
                    }
                }
                _ => (self, None),
            },

            ChargeState::Armed {
                locked_t,
                deadline,
                surface,
            } => {
                // Still armed means the previous tick was inside the window, so a
                // press arriving on the closing tick still locks
                if edge == Some(InputEdge::Press) {
                    (ChargeState::Locked { locked_t, surface }, None)
                } else if now >= deadline {
                    (
                        ChargeState::Idle,
                        Some(Fire {
                            t: locked_t,
                            surface,
                        }),
                    )
                } else {
                    (self, None)
                }
            }

            ChargeState::Locked { locked_t, surface } => match edge {
                Some(InputEdge::Release) => (
                    ChargeState::Idle,
                    Some(Fire {
                        t: locked_t,
                        surface,
                    }),
                ),
                _ => (self, None),
            },
        }
    }

    /// Charge level the machine would fire at right now
    pub fn current_level(&self, now: f64, tuning: &Tuning) -> f32 {
        match *self {
            ChargeState::Idle => 0.0,
            ChargeState::Charging { pressed_at, .. } => {
                tuning.charge_level((now - pressed_at) as f32)
            }
            ChargeState::Armed { locked_t, .. } | ChargeState::Locked { locked_t, .. } => locked_t,
        }
    }

    /// Fire immediately at the current level (movement pre-empting a charge)
    pub fn preempt(&self, now: f64, tuning: &Tuning) -> Option<Fire> {
        let surface = match *self {
            ChargeState::Idle => return None,
            ChargeState::Charging { surface, .. }
            | ChargeState::Armed { surface, .. }
            | ChargeState::Locked { surface, .. } => surface,
        };
        Some(Fire {
            t: self.current_level(now, tuning),
            surface,
        })
    }

    pub fn visual(&self, now: f64, tuning: &Tuning) -> ChargeVisual {
        match *self {
            ChargeState::Idle => ChargeVisual::None,
            ChargeState::Locked { locked_t, .. } => ChargeVisual::Locked(locked_t),
            _ => ChargeVisual::Level(self.current_level(now, tuning)),
        }
    }
}

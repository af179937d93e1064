//! Fixed timestep simulation tick
//!
//! Advances one level run deterministically. Phase order matters: plank
//! contact found during seesaw integration feeds surface classification, and
//! the plank correction runs last so it overrides everything else that moved
//! the marble this tick.

use super::charge::{Fire, InputEdge};
use super::gadgets::{apply_speed_pads, check_springs};
use super::grounding::classify_surface;
use super::hazard::{HazardOutcome, resolve_contacts};
use super::movement::{MoveIntent, apply_movement, nearly_stationary};
use super::state::{SimEvent, SimPhase, SimState};
use super::surface::apply_surface_physics;
use crate::consts::*;

/// Buttons held during this tick (edges are derived inside the tick)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl TickInput {
    /// Horizontal direction: -1, 0 or 1 (opposing keys cancel)
    pub fn dir(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Advance the simulation by one fixed timestep
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32) {
    state.events.clear();

    if state.phase == SimPhase::Finished {
        return;
    }
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }
    let dt = dt.min(SIM_DT * MAX_SUBSTEPS as f32);

    state.clock_ms += dt as f64 * 1000.0;
    state.time_ticks += 1;
    let now = state.clock_ms;

    // Input edges
    let jump_edge = match (state.prev_jump, input.jump) {
        (false, true) => Some(InputEdge::Press),
        (true, false) => Some(InputEdge::Release),
        _ => None,
    };
    let dir = input.dir();
    let dir_pressed = (input.left && !state.prev_left) || (input.right && !state.prev_right);
    state.prev_left = input.left;
    state.prev_right = input.right;
    state.prev_jump = input.jump;

    // Generic physics against static colliders
    state
        .marble
        .step(dt, GRAVITY, &state.colliders, state.level.world_width);

    // 1. Grounding
    state.grounding.detect(
        &state.marble,
        &state.level.platforms,
        state.seesaw_contact,
        now,
        state.tuning.coyote_ms,
    );

    // 2. Seesaw integration (this-tick contact)
    state.seesaw_contact = false;
    for seesaw in &mut state.seesaws {
        if seesaw.update(&state.marble, dt) {
            state.seesaw_contact = true;
        }
    }
    if state.seesaw_contact {
        state.grounding.refresh(now);
    }

    // 3. Surface classification
    let contact = classify_surface(&state.marble, &state.level.platforms, state.seesaw_contact);
    state.surface = contact;
    if let Some(contact) = contact {
        state.last_surface = contact.kind();
    }

    // 4. Surface physics
    if apply_surface_physics(
        &mut state.marble,
        contact,
        state.grounding.grounded,
        &mut state.landing_armed,
        &state.tuning,
        dt,
    ) {
        state.grounding.consume();
        state.events.push(SimEvent::BouncePad);
    }

    // 5. Movement; rolling away pre-empts a charge at its current level
    if dir != 0.0 && !state.charge.is_idle() && nearly_stationary(&state.marble, &state.tuning) {
        if let Some(fire) = state.charge.preempt(now, &state.tuning) {
            state.charge = Default::default();
            launch(state, fire);
        }
    }
    apply_movement(
        &mut state.marble,
        MoveIntent {
            dir,
            pressed: dir_pressed,
        },
        state.grounding.grounded,
        contact,
        !state.charge.is_idle(),
        &state.tuning,
        dt,
    );

    // 6. Slope sliding
    for seesaw in &state.seesaws {
        if seesaw.contact {
            state.marble.vel.x += seesaw.slide_accel() * dt;
        }
    }

    // 7. Charge jump
    let (charge, fire) = state.charge.transition(
        jump_edge,
        now,
        state.grounding.grounded,
        state.last_surface,
        &state.tuning,
    );
    state.charge = charge;
    if let Some(fire) = fire {
        launch(state, fire);
    }

    // 8. Springs, portals, speed pads
    if let Some(spring) = check_springs(
        &mut state.marble,
        &state.level.springs,
        state.grounding.grounded,
        !state.charge.is_idle(),
        &state.tuning,
    ) {
        state.grounding.consume();
        state.events.push(SimEvent::SpringLaunched { spring });
        log::debug!("Spring {} launched marble", spring);
    }

    if let Some(teleport) = state
        .portals
        .update(&mut state.marble, &state.level.portals, &state.tuning)
    {
        log::debug!(
            "Teleported through pair {} to ({:.0}, {:.0})",
            teleport.pair,
            teleport.to.x,
            teleport.to.y
        );
        state.events.push(SimEvent::Teleported {
            pair: teleport.pair,
            to: teleport.to,
            color: teleport.color,
        });
    }

    for pad in apply_speed_pads(
        &mut state.marble,
        &state.level.speed_pads,
        &mut state.speed_pads,
        &state.tuning,
    ) {
        state.events.push(SimEvent::SpeedPad { pad });
    }

    // 9. Hazards
    let marble_pos = state.marble.pos;
    for enemy in &mut state.enemies {
        enemy.update_motion(marble_pos, &state.tuning, dt);
    }
    let invincible = state.is_invincible();
    match resolve_contacts(
        &mut state.marble,
        &mut state.enemies,
        invincible,
        &state.tuning,
    ) {
        Some(HazardOutcome::Kill { enemy }) => {
            log::debug!("Enemy {} destroyed", enemy);
            state.events.push(SimEvent::EnemyKilled { enemy });
        }
        Some(HazardOutcome::Knockback { enemy }) => {
            state.invincible_until_ms = now + state.tuning.invincible_ms as f64;
            state.charge = Default::default();
            state.grounding.consume();
            let scattered =
                state
                    .collectibles
                    .scatter(state.marble.pos, &mut state.rng, &state.tuning);
            log::debug!("Knocked back by enemy {}, {} gems scattered", enemy, scattered);
            state.events.push(SimEvent::KnockedBack { enemy, scattered });
        }
        None => {}
    }

    // 10. Collectibles
    state.collectibles.update_scattered(
        &state.level.platforms,
        state.level.world_height,
        &state.tuning,
        dt,
    );
    let pickups = state
        .collectibles
        .collect(state.marble.pos, state.marble.radius, &state.tuning);
    for gem in pickups.gems {
        state.events.push(SimEvent::GemCollected { gem });
    }
    if pickups.recovered > 0 {
        state.events.push(SimEvent::GemsRecovered {
            count: pickups.recovered,
        });
    }
    if let Some((checkpoint, anchor)) = pickups.checkpoint {
        state.respawn_anchor = anchor;
        log::info!("Checkpoint {} activated", checkpoint);
        state.events.push(SimEvent::CheckpointActivated { checkpoint });
    }

    // 11. Plank correction
    for seesaw in &state.seesaws {
        seesaw.correct(&mut state.marble);
    }

    // 12. Fall-out and goal
    if state.marble.pos.y > state.level.world_height + FALL_MARGIN {
        state.respawn();
    } else if state.marble.pos.distance(state.level.goal) <= GOAL_RADIUS {
        state.phase = SimPhase::Finished;
        let gems = state.collectibles.held;
        log::info!(
            "Goal reached on '{}' in {} with {} gems",
            state.level.id,
            crate::format_time(now),
            gems
        );
        state.events.push(SimEvent::GoalReached {
            elapsed_ms: now,
            gems,
        });
    }
}

/// Apply a fired charge: set (not add) the upward launch velocity
fn launch(state: &mut SimState, fire: Fire) {
    let speed = fire.launch_speed(&state.tuning);
    state.marble.vel.y = -speed;
    state.grounding.consume();
    log::debug!(
        "Jump t={:.2} speed={:.0} on {}",
        fire.t,
        speed,
        fire.surface.as_str()
    );
    state.events.push(SimEvent::Jumped {
        t: fire.t,
        speed,
        surface: fire.surface,
    });
}

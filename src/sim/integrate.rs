//! Per-tick physics integration
//!
//! Passive state changes only. Input effects live in the input gate,
//! spawns in the scheduler, collisions and terminal checks in the evaluator.

use crate::config::{DivingConfig, ReelConfig, SessionConfig, TimingConfig};
use crate::consts::*;

use super::rng::RandomSource;
use super::state::{DivingState, PhysicsState, ReelState, Steer, TimingState};

/// Advance the physics state by one tick
///
/// `scale` multiplies every continuous per-tick rate (1.0 in per-tick mode).
pub fn integrate(
    state: &mut PhysicsState,
    config: &SessionConfig,
    rng: &mut dyn RandomSource,
    scale: f64,
) {
    match (state, config) {
        (PhysicsState::Timing(s), SessionConfig::Timing(c)) => integrate_timing(s, c, scale),
        (PhysicsState::TensionReel(s), SessionConfig::TensionReel(c)) => {
            integrate_reel(s, c, rng, scale)
        }
        (PhysicsState::Diving(s), SessionConfig::Diving(c)) => integrate_diving(s, c, scale),
        _ => log::error!("Physics state does not match session config variant"),
    }
}

/// Ping-pong the cursor between the bar ends
pub fn integrate_timing(state: &mut TimingState, config: &TimingConfig, scale: f64) {
    state.cursor += config.cursor_speed * state.direction * scale;

    if state.cursor >= GAUGE_MAX {
        state.cursor = GAUGE_MAX;
        state.direction = -1.0;
    } else if state.cursor <= 0.0 {
        state.cursor = 0.0;
        state.direction = 1.0;
    }
}

/// Reel or slack the line, then maybe flip the fish's mood
pub fn integrate_reel(
    state: &mut ReelState,
    config: &ReelConfig,
    rng: &mut dyn RandomSource,
    scale: f64,
) {
    let anger = state.mood.anger_multiplier();

    if state.reeling {
        state.set_distance(state.distance - config.reel_speed * scale);
        state.set_tension(state.tension + config.tension_rate * anger * scale);
    } else {
        state.set_tension(state.tension - config.decay_rate * scale);
        state.set_distance(state.distance + SLACK_DRIFT * anger * scale);
    }

    if rng.next_f64() < MOOD_TOGGLE_CHANCE {
        state.mood = state.mood.toggled();
        log::debug!("Fish mood changed to {:?}", state.mood);
    }
}

/// Burn oxygen, steer the diver and float entities upward
pub fn integrate_diving(state: &mut DivingState, config: &DivingConfig, scale: f64) {
    state.drain_oxygen(config.oxygen_decay * scale);
    state.depth += DEPTH_RATE * scale;

    let step = config.diver_speed * scale;
    match state.steer {
        Steer::Left => state.diver_x = (state.diver_x - step).max(DIVER_MIN_X),
        Steer::Right => state.diver_x = (state.diver_x + step).min(DIVER_MAX_X),
        Steer::None => {}
    }

    let rise = config.entity_speed * scale as f32;
    for entity in &mut state.entities {
        entity.pos.y -= rise;
    }
    state.entities.retain(|e| e.pos.y >= ENTITY_EXIT_Y);
}

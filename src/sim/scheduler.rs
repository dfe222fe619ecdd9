//! Random event scheduler
//!
//! Injects quick-time prompts (reel) and drifting entities (diving) on top of
//! the physics state. Lifetimes and spawn intervals are measured on the
//! session clock, not in ticks.

use std::time::Duration;

use glam::Vec2;

use crate::config::{DivingConfig, SessionConfig};
use crate::consts::*;

use super::rng::RandomSource;
use super::state::{DivingState, EntityKind, Mood, PhysicsState, ReelState, TimedSubEvent};

/// What the scheduler did this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scheduled {
    Nothing,
    QteSpawned(Vec2),
    QteExpired,
    EntitySpawned { id: u32, kind: EntityKind },
}

/// Maybe inject a sub-event
///
/// `now` is the session clock after this tick's `dt` has been added.
pub fn maybe_spawn(
    state: &mut PhysicsState,
    config: &SessionConfig,
    rng: &mut dyn RandomSource,
    now: Duration,
    dt: Duration,
    max_entities: usize,
) -> Scheduled {
    match (state, config) {
        (PhysicsState::TensionReel(s), SessionConfig::TensionReel(_)) => schedule_qte(s, rng, dt),
        (PhysicsState::Diving(s), SessionConfig::Diving(c)) => {
            schedule_entity(s, c, rng, now, max_entities)
        }
        _ => Scheduled::Nothing,
    }
}

/// True when a new prompt may appear
pub fn qte_eligible(state: &ReelState) -> bool {
    state.qte.is_none()
        && state.mood == Mood::Calm
        && state.distance > QTE_MIN_DISTANCE
        && state.distance < state.max_distance - QTE_ESCAPE_BUFFER
}

/// Age the active prompt or roll for a new one
pub fn schedule_qte(state: &mut ReelState, rng: &mut dyn RandomSource, dt: Duration) -> Scheduled {
    if let Some(qte) = state.qte.as_mut() {
        if qte.age(dt) {
            // Timeout is silent: no tension or distance change
            state.qte = None;
            log::debug!("QTE expired");
            return Scheduled::QteExpired;
        }
        return Scheduled::Nothing;
    }

    if !qte_eligible(state) || rng.next_f64() >= QTE_SPAWN_CHANCE {
        return Scheduled::Nothing;
    }

    let span = QTE_AREA_MAX - QTE_AREA_MIN;
    let x = QTE_AREA_MIN + rng.next_f64() * span;
    let y = QTE_AREA_MIN + rng.next_f64() * span;
    let position = Vec2::new(x as f32, y as f32);
    state.qte = Some(TimedSubEvent::new(position, QTE_LIFETIME));
    log::debug!("QTE spawned at ({:.1}, {:.1})", x, y);
    Scheduled::QteSpawned(position)
}

/// Spawn at most one entity per elapsed interval
pub fn schedule_entity(
    state: &mut DivingState,
    config: &DivingConfig,
    rng: &mut dyn RandomSource,
    now: Duration,
    max_entities: usize,
) -> Scheduled {
    if now.saturating_sub(state.last_spawn) < config.spawn_interval {
        return Scheduled::Nothing;
    }
    // Reset from now, not last + interval, so a lagging tick cannot burst
    state.last_spawn = now;

    if state.entities.len() >= max_entities {
        return Scheduled::Nothing;
    }

    let kind = EntityKind::from_roll(rng.next_f64());
    let x = ENTITY_MIN_X + rng.next_f64() * ENTITY_SPAN_X;
    let id = state.spawn(kind, Vec2::new(x as f32, ENTITY_SPAWN_Y));
    log::debug!("Spawned {:?} #{} at x={:.1}", kind, id, x);
    Scheduled::EntitySpawned { id, kind }
}

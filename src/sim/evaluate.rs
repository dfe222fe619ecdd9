//! Outcome evaluator
//!
//! Terminal checks run in a fixed priority order; the first match wins.
//! Diving collisions are state-driven and resolved here too.

use crate::audio::SoundCue;
use crate::consts::*;

use super::state::{DivingState, EntityKind, Outcome, PhysicsState, ReelState, TimingState};

/// Classify the state; `None` while the session should keep running
pub fn evaluate(state: &PhysicsState) -> Option<Outcome> {
    match state {
        PhysicsState::Timing(s) => evaluate_timing(s),
        PhysicsState::TensionReel(s) => evaluate_reel(s),
        PhysicsState::Diving(s) => evaluate_diving(s),
    }
}

pub fn evaluate_timing(state: &TimingState) -> Option<Outcome> {
    if state.tension >= GAUGE_MAX {
        return Some(Outcome::snapped());
    }
    if state.progress >= GAUGE_MAX {
        // Success needs 100, so this is always perfect; kept as the game grades it
        return Some(Outcome::success(state.progress > TIMING_PERFECT_PROGRESS));
    }
    None
}

pub fn evaluate_reel(state: &ReelState) -> Option<Outcome> {
    if state.tension >= GAUGE_MAX {
        return Some(Outcome::snapped());
    }
    if state.distance <= 0.0 {
        return Some(Outcome::success(state.max_tension_observed < REEL_PERFECT_TENSION));
    }
    if state.distance >= state.max_distance {
        return Some(Outcome::escaped());
    }
    None
}

pub fn evaluate_diving(state: &DivingState) -> Option<Outcome> {
    if state.oxygen <= 0.0 {
        return Some(Outcome::out_of_resource(state.score));
    }
    None
}

/// Resolve diver/entity overlaps; returns the cues to play in entity order
pub fn resolve_collisions(state: &mut DivingState) -> Vec<SoundCue> {
    let diver = state.diver_pos();
    let mut cues = Vec::new();
    let mut oxygen_lost = 0.0;
    let mut points = 0;

    state.entities.retain(|e| {
        let delta = (e.pos - diver).abs();
        if delta.x >= COLLISION_RADIUS || delta.y >= COLLISION_RADIUS {
            return true;
        }
        match e.kind {
            EntityKind::Hazard => {
                oxygen_lost += HAZARD_OXYGEN_COST;
                cues.push(SoundCue::Fail);
            }
            EntityKind::CollectibleSmall | EntityKind::CollectibleLarge => {
                points += e.kind.points();
                cues.push(SoundCue::Success);
            }
        }
        false
    });

    if oxygen_lost > 0.0 {
        state.drain_oxygen(oxygen_lost);
    }
    state.score = state.score.saturating_add(points);
    cues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReelConfig;
    use crate::sim::state::OutcomeKind;
    use glam::Vec2;

    fn reel_state() -> ReelState {
        ReelState::new(&ReelConfig {
            strength: 0.5,
            start_distance: 30.0,
            max_distance: 50.0,
            reel_speed: 0.3,
            tension_rate: 0.2,
            decay_rate: 1.5,
        })
    }

    #[test]
    fn test_timing_snap_beats_success() {
        let state = TimingState {
            progress: 100.0,
            tension: 100.0,
            cursor: 0.0,
            direction: 1.0,
            target_start: 40.0,
        };
        assert_eq!(evaluate_timing(&state), Some(Outcome::snapped()));

        let state = TimingState { tension: 99.0, ..state };
        let outcome = evaluate_timing(&state).expect("terminal");
        assert_eq!(outcome.kind, OutcomeKind::Success);
        assert!(outcome.perfect);
    }

    #[test]
    fn test_reel_priority_and_escape() {
        let mut state = reel_state();
        assert_eq!(evaluate_reel(&state), None);

        state.set_distance(50.0);
        assert_eq!(evaluate_reel(&state), Some(Outcome::escaped()));

        state.set_tension(100.0);
        assert_eq!(evaluate_reel(&state), Some(Outcome::snapped()));
    }

    #[test]
    fn test_perfect_uses_high_water_mark() {
        let mut state = reel_state();
        state.set_tension(60.0);
        state.set_tension(10.0);
        state.set_distance(0.0);
        let outcome = evaluate_reel(&state).expect("terminal");
        assert!(outcome.success);
        assert!(!outcome.perfect);

        let mut clean = reel_state();
        clean.set_tension(49.9);
        clean.set_distance(0.0);
        assert!(evaluate_reel(&clean).expect("terminal").perfect);
    }

    #[test]
    fn test_collisions_apply_effects() {
        let mut state = DivingState::default();
        state.spawn(EntityKind::Hazard, Vec2::new(50.0, 20.0));
        state.spawn(EntityKind::CollectibleSmall, Vec2::new(55.0, 25.0));
        state.spawn(EntityKind::CollectibleLarge, Vec2::new(44.0, 14.0));
        // Just outside on x
        state.spawn(EntityKind::Hazard, Vec2::new(58.0, 20.0));

        let cues = resolve_collisions(&mut state);
        assert_eq!(cues, vec![SoundCue::Fail, SoundCue::Success, SoundCue::Success]);
        assert_eq!(state.oxygen, 80.0);
        assert_eq!(state.score, 125);
        assert_eq!(state.entities.len(), 1);
        assert_eq!(state.entities[0].pos.x, 58.0);
    }

    #[test]
    fn test_hazard_can_empty_the_tank() {
        let mut state = DivingState::default();
        state.oxygen = 15.0;
        state.score = 75;
        state.spawn(EntityKind::Hazard, Vec2::new(50.0, 20.0));
        resolve_collisions(&mut state);
        assert_eq!(state.oxygen, 0.0);
        assert_eq!(evaluate_diving(&state), Some(Outcome::out_of_resource(75)));
    }
}

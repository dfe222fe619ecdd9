//! Input gate
//!
//! Host input is queued and only applied at the start of the next tick, so
//! physics never sees a half-applied action.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::SoundCue;
use crate::config::{SessionConfig, TimingConfig};
use crate::consts::*;

use super::rng::RandomSource;
use super::state::{DivingState, PhysicsState, ReelState, Steer, TimingState};

/// Discrete player actions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Timing bar: strike now
    Tap,
    /// Reel: start reeling
    HoldStart,
    /// Reel: stop reeling
    HoldEnd,
    /// Reel: tap at a position (percent of the play area)
    QteTap(Vec2),
    /// Diving: hold left
    PressLeft,
    /// Diving: hold right
    PressRight,
    /// Diving: let go
    Release,
}

/// Single-consumer FIFO of pending actions
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    pending: VecDeque<Action>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.pending.push_back(action);
    }

    pub fn pop(&mut self) -> Option<Action> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Apply one action; returns the cue to play, if any
///
/// Actions that do not fit the variant or the current state are ignored.
pub fn apply_action(
    state: &mut PhysicsState,
    config: &SessionConfig,
    rng: &mut dyn RandomSource,
    action: Action,
) -> Option<SoundCue> {
    match (state, config) {
        (PhysicsState::Timing(s), SessionConfig::Timing(c)) => match action {
            Action::Tap => Some(strike(s, c, rng)),
            _ => None,
        },
        (PhysicsState::TensionReel(s), SessionConfig::TensionReel(_)) => match action {
            Action::HoldStart => {
                s.reeling = true;
                None
            }
            Action::HoldEnd => {
                s.reeling = false;
                None
            }
            Action::QteTap(pos) => tap_qte(s, pos),
            _ => None,
        },
        (PhysicsState::Diving(s), SessionConfig::Diving(_)) => {
            steer(s, action);
            None
        }
        _ => None,
    }
}

/// True when the cursor sits inside the current zone (edges count)
pub fn cursor_in_zone(state: &TimingState, config: &TimingConfig) -> bool {
    state.cursor >= state.target_start && state.cursor <= state.target_start + config.target_width
}

fn strike(state: &mut TimingState, config: &TimingConfig, rng: &mut dyn RandomSource) -> SoundCue {
    if cursor_in_zone(state, config) {
        state.add_progress(config.progress_gain);
        state.target_start = TimingConfig::random_zone_start(config.target_width, rng);
        SoundCue::Success
    } else {
        state.add_tension(config.fail_penalty);
        SoundCue::Fail
    }
}

fn tap_qte(state: &mut ReelState, pos: Vec2) -> Option<SoundCue> {
    let qte = state.qte?;
    if qte.position.distance(pos) > QTE_HIT_RADIUS {
        // Misses cost nothing
        return None;
    }
    state.qte = None;
    state.set_distance(state.distance - QTE_DISTANCE_BONUS);
    state.set_tension(state.tension - QTE_TENSION_RELIEF);
    log::debug!("QTE hit, distance now {:.1}", state.distance);
    Some(SoundCue::Success)
}

fn steer(state: &mut DivingState, action: Action) {
    state.steer = match action {
        Action::PressLeft => Steer::Left,
        Action::PressRight => Steer::Right,
        Action::Release => Steer::None,
        _ => return,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DivingConfig, ReelConfig};
    use crate::sim::rng::ScriptedSource;
    use crate::sim::state::TimedSubEvent;

    fn timing() -> (PhysicsState, SessionConfig) {
        let cfg = TimingConfig {
            cursor_speed: 2.0,
            target_start: 40.0,
            target_width: 20.0,
            progress_gain: 25.0,
            fail_penalty: 12.0,
        };
        (PhysicsState::Timing(TimingState::new(&cfg)), SessionConfig::Timing(cfg))
    }

    fn reel() -> (PhysicsState, SessionConfig) {
        let cfg = ReelConfig {
            strength: 0.5,
            start_distance: 30.0,
            max_distance: 50.0,
            reel_speed: 0.3,
            tension_rate: 0.2,
            decay_rate: 1.5,
        };
        (PhysicsState::TensionReel(ReelState::new(&cfg)), SessionConfig::TensionReel(cfg))
    }

    fn set_cursor(state: &mut PhysicsState, cursor: f64) {
        if let PhysicsState::Timing(s) = state {
            s.cursor = cursor;
        }
    }

    fn timing_state(state: &PhysicsState) -> &TimingState {
        match state {
            PhysicsState::Timing(s) => s,
            _ => panic!("expected timing state"),
        }
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = InputQueue::new();
        queue.push(Action::HoldStart);
        queue.push(Action::HoldEnd);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(Action::HoldStart));
        assert_eq!(queue.pop(), Some(Action::HoldEnd));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_tap_inside_zone_adds_progress_only() {
        let (mut state, cfg) = timing();
        let mut rng = ScriptedSource::constant(0.0);
        for cursor in [40.0, 50.0, 60.0] {
            set_cursor(&mut state, cursor);
            if let PhysicsState::Timing(s) = &mut state {
                s.target_start = 40.0;
            }
            let before = timing_state(&state).clone();
            let cue = apply_action(&mut state, &cfg, &mut rng, Action::Tap);
            let after = timing_state(&state);
            assert_eq!(cue, Some(SoundCue::Success));
            assert_eq!(after.progress, before.progress + 25.0);
            assert_eq!(after.tension, before.tension);
            // Zone re-drawn from the rng (0.0 -> left edge)
            assert_eq!(after.target_start, 10.0);
        }
    }

    #[test]
    fn test_tap_outside_zone_adds_tension_only() {
        let (mut state, cfg) = timing();
        let mut rng = ScriptedSource::constant(0.0);
        for cursor in [0.0, 39.9, 60.1, 100.0] {
            set_cursor(&mut state, cursor);
            let before = timing_state(&state).clone();
            let cue = apply_action(&mut state, &cfg, &mut rng, Action::Tap);
            let after = timing_state(&state);
            assert_eq!(cue, Some(SoundCue::Fail));
            assert_eq!(after.tension, before.tension + 12.0);
            assert_eq!(after.progress, before.progress);
            assert_eq!(after.target_start, 40.0);
        }
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_hold_toggles_reeling() {
        let (mut state, cfg) = reel();
        let mut rng = ScriptedSource::constant(0.5);
        apply_action(&mut state, &cfg, &mut rng, Action::HoldStart);
        assert!(matches!(&state, PhysicsState::TensionReel(s) if s.reeling));
        apply_action(&mut state, &cfg, &mut rng, Action::HoldEnd);
        assert!(matches!(&state, PhysicsState::TensionReel(s) if !s.reeling));
    }

    #[test]
    fn test_qte_tap_hit_and_miss() {
        let (mut state, cfg) = reel();
        let mut rng = ScriptedSource::constant(0.5);

        // No active QTE: no-op
        let cue = apply_action(&mut state, &cfg, &mut rng, Action::QteTap(Vec2::new(50.0, 50.0)));
        assert_eq!(cue, None);

        if let PhysicsState::TensionReel(s) = &mut state {
            s.set_tension(12.0);
            s.qte = Some(TimedSubEvent::new(Vec2::new(50.0, 50.0), QTE_LIFETIME));
        }

        let miss = apply_action(&mut state, &cfg, &mut rng, Action::QteTap(Vec2::new(80.0, 20.0)));
        assert_eq!(miss, None);
        let PhysicsState::TensionReel(s) = &state else { panic!() };
        assert!(s.qte.is_some());
        assert_eq!(s.tension, 12.0);
        assert_eq!(s.distance, 30.0);

        let hit = apply_action(&mut state, &cfg, &mut rng, Action::QteTap(Vec2::new(53.0, 48.0)));
        assert_eq!(hit, Some(SoundCue::Success));
        let PhysicsState::TensionReel(s) = &state else { panic!() };
        assert!(s.qte.is_none());
        assert_eq!(s.distance, 15.0);
        // Floored at zero
        assert_eq!(s.tension, 0.0);
    }

    #[test]
    fn test_steering_and_foreign_actions() {
        let cfg = SessionConfig::Diving(DivingConfig::default());
        let mut state = PhysicsState::Diving(DivingState::default());
        let mut rng = ScriptedSource::constant(0.5);

        apply_action(&mut state, &cfg, &mut rng, Action::PressLeft);
        assert!(matches!(&state, PhysicsState::Diving(s) if s.steer == Steer::Left));
        // Timing actions mean nothing to a diver
        apply_action(&mut state, &cfg, &mut rng, Action::Tap);
        assert!(matches!(&state, PhysicsState::Diving(s) if s.steer == Steer::Left));
        apply_action(&mut state, &cfg, &mut rng, Action::PressRight);
        assert!(matches!(&state, PhysicsState::Diving(s) if s.steer == Steer::Right));
        apply_action(&mut state, &cfg, &mut rng, Action::Release);
        assert!(matches!(&state, PhysicsState::Diving(s) if s.steer == Steer::None));
    }
}

//! Session state and core simulation types
//!
//! One authoritative state per session. Every continuous field is clamped at
//! the point it is mutated, so the invariants hold between any two ticks.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{ReelConfig, SessionConfig, TimingConfig};
use crate::consts::*;
use crate::clamp_gauge;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Created, not yet ticked
    Idle,
    /// Ticking
    Active,
    /// Caught
    Success,
    /// Line snapped (tension maxed)
    FailSnapped,
    /// Fish pulled the line out
    FailEscaped,
    /// Ran out of oxygen
    FailOutOfResource,
    /// Aborted by the host, no outcome
    Cancelled,
}

impl SessionPhase {
    /// Idle and Active are the only phases that still accept ticks
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionPhase::Idle | SessionPhase::Active)
    }
}

/// Result classification of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    Success,
    FailSnapped,
    FailEscaped,
    FailOutOfResource,
}

impl OutcomeKind {
    pub fn phase(&self) -> SessionPhase {
        match self {
            OutcomeKind::Success => SessionPhase::Success,
            OutcomeKind::FailSnapped => SessionPhase::FailSnapped,
            OutcomeKind::FailEscaped => SessionPhase::FailEscaped,
            OutcomeKind::FailOutOfResource => SessionPhase::FailOutOfResource,
        }
    }
}

/// The single result handed to the reward layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub success: bool,
    pub snapped: bool,
    pub perfect: bool,
    /// Only reported by diving sessions
    pub score: Option<u64>,
}

impl Outcome {
    pub fn success(perfect: bool) -> Self {
        Self {
            kind: OutcomeKind::Success,
            success: true,
            snapped: false,
            perfect,
            score: None,
        }
    }

    pub fn snapped() -> Self {
        Self {
            kind: OutcomeKind::FailSnapped,
            success: false,
            snapped: true,
            perfect: false,
            score: None,
        }
    }

    pub fn escaped() -> Self {
        Self {
            kind: OutcomeKind::FailEscaped,
            success: false,
            snapped: false,
            perfect: false,
            score: None,
        }
    }

    pub fn out_of_resource(score: u64) -> Self {
        Self {
            kind: OutcomeKind::FailOutOfResource,
            success: false,
            snapped: false,
            perfect: false,
            score: Some(score),
        }
    }
}

/// Timing bar state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingState {
    pub progress: f64,
    pub tension: f64,
    pub cursor: f64,
    /// +1 moving right, -1 moving left
    pub direction: f64,
    /// Current zone start (moves after each hit)
    pub target_start: f64,
}

impl TimingState {
    pub fn new(config: &TimingConfig) -> Self {
        Self {
            progress: 0.0,
            tension: 0.0,
            cursor: 0.0,
            direction: 1.0,
            target_start: config.target_start,
        }
    }

    pub fn add_progress(&mut self, amount: f64) {
        self.progress = clamp_gauge(self.progress + amount);
    }

    pub fn add_tension(&mut self, amount: f64) {
        self.tension = clamp_gauge(self.tension + amount);
    }
}

/// Fish temperament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mood {
    #[default]
    Calm,
    Angry,
}

impl Mood {
    pub fn toggled(self) -> Self {
        match self {
            Mood::Calm => Mood::Angry,
            Mood::Angry => Mood::Calm,
        }
    }

    /// Tension/drift multiplier
    pub fn anger_multiplier(self) -> f64 {
        match self {
            Mood::Calm => 1.0,
            Mood::Angry => ANGER_MULTIPLIER,
        }
    }
}

/// A quick-time prompt with a countdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedSubEvent {
    pub position: Vec2,
    pub remaining: Duration,
    pub max: Duration,
}

impl TimedSubEvent {
    pub fn new(position: Vec2, lifetime: Duration) -> Self {
        Self {
            position,
            remaining: lifetime,
            max: lifetime,
        }
    }

    /// Count down; returns true once expired
    pub fn age(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        self.remaining.is_zero()
    }

    /// Fraction of lifetime left (for a progress ring)
    pub fn fraction_left(&self) -> f32 {
        if self.max.is_zero() {
            0.0
        } else {
            (self.remaining.as_secs_f64() / self.max.as_secs_f64()) as f32
        }
    }
}

/// Reel-in state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelState {
    pub tension: f64,
    pub distance: f64,
    pub max_distance: f64,
    pub mood: Mood,
    pub reeling: bool,
    /// High-water mark of tension, used for the perfect grade
    pub max_tension_observed: f64,
    pub qte: Option<TimedSubEvent>,
}

impl ReelState {
    pub fn new(config: &ReelConfig) -> Self {
        Self {
            tension: 0.0,
            distance: config.start_distance.clamp(0.0, config.max_distance),
            max_distance: config.max_distance,
            mood: Mood::Calm,
            reeling: false,
            max_tension_observed: 0.0,
            qte: None,
        }
    }

    pub fn set_tension(&mut self, value: f64) {
        self.tension = clamp_gauge(value);
        self.max_tension_observed = self.max_tension_observed.max(self.tension);
    }

    pub fn set_distance(&mut self, value: f64) {
        self.distance = value.clamp(0.0, self.max_distance);
    }
}

/// Diving entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Jellyfish: costs oxygen
    Hazard,
    /// Pearl
    CollectibleSmall,
    /// Gold coin
    CollectibleLarge,
}

impl EntityKind {
    /// Pick a type from a uniform draw using the weighted distribution
    pub fn from_roll(roll: f64) -> Self {
        if roll < HAZARD_WEIGHT {
            EntityKind::Hazard
        } else if roll < SMALL_COLLECTIBLE_WEIGHT {
            EntityKind::CollectibleSmall
        } else {
            EntityKind::CollectibleLarge
        }
    }

    pub fn points(&self) -> u64 {
        match self {
            EntityKind::Hazard => 0,
            EntityKind::CollectibleSmall => SMALL_COLLECTIBLE_POINTS,
            EntityKind::CollectibleLarge => LARGE_COLLECTIBLE_POINTS,
        }
    }
}

/// Something drifting up toward the diver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnedEntity {
    pub id: u32,
    pub pos: Vec2,
    pub kind: EntityKind,
}

/// Diver steering intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Steer {
    #[default]
    None,
    Left,
    Right,
}

/// Diving state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivingState {
    pub oxygen: f64,
    pub diver_x: f64,
    pub depth: f64,
    pub score: u64,
    pub steer: Steer,
    /// Active entities (sorted by id for determinism)
    pub entities: Vec<SpawnedEntity>,
    /// Session clock reading at the last spawn
    pub last_spawn: Duration,
    next_id: u32,
}

impl Default for DivingState {
    fn default() -> Self {
        Self {
            oxygen: GAUGE_MAX,
            diver_x: DIVER_START_X,
            depth: 0.0,
            score: 0,
            steer: Steer::None,
            entities: Vec::new(),
            last_spawn: Duration::ZERO,
            next_id: 1,
        }
    }
}

impl DivingState {
    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.entities.push(SpawnedEntity { id, pos, kind });
        id
    }

    pub fn drain_oxygen(&mut self, amount: f64) {
        self.oxygen = clamp_gauge(self.oxygen - amount);
    }

    pub fn diver_pos(&self) -> Vec2 {
        Vec2::new(self.diver_x as f32, DIVER_Y)
    }
}

/// Variant-specific physics state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhysicsState {
    Timing(TimingState),
    TensionReel(ReelState),
    Diving(DivingState),
}

impl PhysicsState {
    /// Fresh state for a configuration
    pub fn new(config: &SessionConfig) -> Self {
        match config {
            SessionConfig::Timing(cfg) => PhysicsState::Timing(TimingState::new(cfg)),
            SessionConfig::TensionReel(cfg) => PhysicsState::TensionReel(ReelState::new(cfg)),
            SessionConfig::Diving(_) => PhysicsState::Diving(DivingState::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_distribution_edges() {
        assert_eq!(EntityKind::from_roll(0.0), EntityKind::Hazard);
        assert_eq!(EntityKind::from_roll(0.59), EntityKind::Hazard);
        assert_eq!(EntityKind::from_roll(0.6), EntityKind::CollectibleSmall);
        assert_eq!(EntityKind::from_roll(0.89), EntityKind::CollectibleSmall);
        assert_eq!(EntityKind::from_roll(0.9), EntityKind::CollectibleLarge);
    }

    #[test]
    fn test_reel_setters_clamp_and_track_high_water() {
        let mut state = ReelState::new(&ReelConfig {
            strength: 0.5,
            start_distance: 30.0,
            max_distance: 50.0,
            reel_speed: 0.3,
            tension_rate: 0.2,
            decay_rate: 1.5,
        });
        state.set_tension(140.0);
        assert_eq!(state.tension, 100.0);
        state.set_tension(-5.0);
        assert_eq!(state.tension, 0.0);
        assert_eq!(state.max_tension_observed, 100.0);
        state.set_distance(80.0);
        assert_eq!(state.distance, 50.0);
    }

    #[test]
    fn test_sub_event_ages_out() {
        let mut qte = TimedSubEvent::new(Vec2::new(50.0, 50.0), Duration::from_millis(30));
        assert!(!qte.age(Duration::from_millis(20)));
        assert!(qte.fraction_left() > 0.0);
        assert!(qte.age(Duration::from_millis(20)));
        assert_eq!(qte.fraction_left(), 0.0);
    }

    #[test]
    fn test_phase_terminality() {
        assert!(!SessionPhase::Idle.is_terminal());
        assert!(!SessionPhase::Active.is_terminal());
        assert!(SessionPhase::Cancelled.is_terminal());
        assert!(SessionPhase::FailEscaped.is_terminal());
    }
}

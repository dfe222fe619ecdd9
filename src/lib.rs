//! Catch Challenge - skill-challenge engine for a casual fishing game
//!
//! Core modules:
//! - `config`: Session difficulty derived from equipment, rarity and skills
//! - `sim`: Deterministic simulation (physics, scheduler, input gate, outcomes)
//! - `session`: Host that owns sessions and talks to the surrounding game
//! - `settings`: Engine-level tuning loaded from JSON
//! - `audio`: Sound cues handed to the game's audio layer
//! - `autopilot`: Scripted player used by the demo binary

pub mod audio;
pub mod autopilot;
pub mod config;
pub mod session;
pub mod settings;
pub mod sim;

pub use audio::SoundCue;
pub use config::{SessionConfig, SkillModifiers, Variant, configure};
pub use session::{
    CatchContext, EngineEvents, GameContext, SessionError, SessionHandle, SessionHost,
};
pub use settings::{DecayMode, EngineSettings};
pub use sim::{Action, Outcome, OutcomeKind, SessionPhase, Simulation, Snapshot};

use std::time::Duration;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Reference tick (60 Hz, the display refresh the balance was tuned against)
    pub const REFERENCE_TICK: Duration = Duration::from_nanos(16_666_667);
    /// Reference tick rate in Hz
    pub const REFERENCE_HZ: f64 = 60.0;

    /// Upper bound of every percentage gauge (progress, tension, oxygen, cursor)
    pub const GAUGE_MAX: f64 = 100.0;

    /// Timing bar: target zone lower edge and span for random placement
    pub const TARGET_ZONE_MIN: f64 = 10.0;
    pub const TARGET_ZONE_SPAN: f64 = 80.0;
    /// Timing bar: perfect threshold on progress at the moment of success
    pub const TIMING_PERFECT_PROGRESS: f64 = 95.0;

    /// Reel: tension/drift multiplier while the fish is angry
    pub const ANGER_MULTIPLIER: f64 = 2.5;
    /// Reel: line slack drift per tick when not reeling
    pub const SLACK_DRIFT: f64 = 0.05;
    /// Reel: per-tick probability of the fish changing mood
    pub const MOOD_TOGGLE_CHANCE: f64 = 0.01;
    /// Reel: perfect catch requires the tension high-water mark below this
    pub const REEL_PERFECT_TENSION: f64 = 50.0;
    /// Reel: extra line before the fish escapes
    pub const ESCAPE_MARGIN: f64 = 20.0;

    /// QTE: per-tick spawn probability when eligible
    pub const QTE_SPAWN_CHANCE: f64 = 0.008;
    /// QTE: lifetime (90 reference ticks)
    pub const QTE_LIFETIME: Duration = Duration::from_nanos(16_666_667 * 90);
    /// QTE: eligible only while distance is above this
    pub const QTE_MIN_DISTANCE: f64 = 15.0;
    /// QTE: eligible only while distance is below max_distance minus this
    pub const QTE_ESCAPE_BUFFER: f64 = 10.0;
    /// QTE: spawn area bounds (percent of the play area, both axes)
    pub const QTE_AREA_MIN: f64 = 15.0;
    pub const QTE_AREA_MAX: f64 = 85.0;
    /// QTE: tap must land within this radius of the prompt
    pub const QTE_HIT_RADIUS: f32 = 10.0;
    /// QTE: distance pulled in on a hit
    pub const QTE_DISTANCE_BONUS: f64 = 15.0;
    /// QTE: tension released on a hit
    pub const QTE_TENSION_RELIEF: f64 = 20.0;

    /// Diving: oxygen lost per tick
    pub const OXYGEN_DECAY: f64 = 0.1;
    /// Diving: cosmetic depth gained per tick
    pub const DEPTH_RATE: f64 = 0.1;
    /// Diving: diver lateral speed per tick
    pub const DIVER_SPEED: f64 = 1.5;
    /// Diving: diver lateral bounds
    pub const DIVER_MIN_X: f64 = 5.0;
    pub const DIVER_MAX_X: f64 = 95.0;
    /// Diving: diver starts centered
    pub const DIVER_START_X: f64 = 50.0;
    /// Diving: diver's fixed vertical band
    pub const DIVER_Y: f32 = 20.0;
    /// Diving: minimum time between spawns
    pub const SPAWN_INTERVAL: Duration = Duration::from_millis(500);
    /// Diving: entity upward speed per tick
    pub const ENTITY_SPEED: f32 = 0.8;
    /// Diving: entities spawn below the visible playfield
    pub const ENTITY_SPAWN_Y: f32 = 120.0;
    /// Diving: entities above this are off-screen and removed
    pub const ENTITY_EXIT_Y: f32 = -10.0;
    /// Diving: spawn x range
    pub const ENTITY_MIN_X: f64 = 5.0;
    pub const ENTITY_SPAN_X: f64 = 90.0;
    /// Diving: per-axis collision threshold
    pub const COLLISION_RADIUS: f32 = 8.0;
    /// Diving: oxygen lost on a hazard hit
    pub const HAZARD_OXYGEN_COST: f64 = 20.0;
    /// Diving: points for collectibles
    pub const SMALL_COLLECTIBLE_POINTS: u64 = 25;
    pub const LARGE_COLLECTIBLE_POINTS: u64 = 100;
    /// Diving: cumulative type weights (hazard below the first, small below the second)
    pub const HAZARD_WEIGHT: f64 = 0.6;
    pub const SMALL_COLLECTIBLE_WEIGHT: f64 = 0.9;
    /// Diving: hard cap on live entities
    pub const MAX_ENTITIES: usize = 32;
}

/// Clamp a gauge value to [0, 100]
#[inline]
pub fn clamp_gauge(value: f64) -> f64 {
    value.clamp(0.0, consts::GAUGE_MAX)
}

/// Ratio of an elapsed duration to the reference tick
#[inline]
pub fn reference_ticks(dt: Duration) -> f64 {
    dt.as_secs_f64() / consts::REFERENCE_TICK.as_secs_f64()
}

//! Deterministic simulation module
//!
//! All challenge logic lives here. Given the same configuration, random
//! source and input sequence, a session always plays out the same way:
//! - Randomness only through `RandomSource`
//! - Time only through the `dt` passed to each tick
//! - Stable iteration order (entities by ID)
//! - No rendering or audio dependencies

pub mod evaluate;
pub mod input;
pub mod integrate;
pub mod rng;
pub mod scheduler;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use evaluate::{evaluate, resolve_collisions};
pub use input::{Action, InputQueue, apply_action};
pub use integrate::integrate;
pub use rng::{PcgSource, RandomSource, ScriptedSource};
pub use scheduler::{Scheduled, maybe_spawn};
pub use snapshot::{EntityView, QteView, Snapshot, SnapshotView};
pub use state::{
    DivingState, EntityKind, Mood, Outcome, OutcomeKind, PhysicsState, ReelState, SessionPhase,
    SpawnedEntity, Steer, TimedSubEvent, TimingState,
};
pub use tick::{Simulation, TickReport};

//! Session host
//!
//! Owns every running challenge, pulls difficulty inputs from the game,
//! forwards sound cues and delivers each session's single outcome.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::SoundCue;
use crate::config::{SkillModifiers, Variant, configure};
use crate::settings::EngineSettings;
use crate::sim::{Action, Outcome, PcgSource, RandomSource, SessionPhase, Simulation, Snapshot};

/// Opaque session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionHandle(pub u64);

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no session {0}")]
    UnknownSession(SessionHandle),
    #[error("session is not active (phase {phase:?})")]
    NotActive { phase: SessionPhase },
}

/// What the player is fishing with and for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchContext {
    pub rod_id: u32,
    /// Name of the hooked fish (ignored by diving)
    pub target: String,
}

/// Difficulty inputs supplied by the surrounding game
pub trait GameContext {
    fn equipment_power(&self, rod_id: u32) -> f64;
    fn rarity_of(&self, target: &str) -> f64;
    fn active_skill_modifiers(&self) -> SkillModifiers;
}

/// Notifications sent back to the surrounding game
pub trait EngineEvents {
    /// Fire-and-forget
    fn play_sound(&mut self, cue: SoundCue);
    /// Called exactly once per completed session
    fn on_outcome(&mut self, handle: SessionHandle, outcome: &Outcome);
    /// Called when the host cancels a running session
    fn on_aborted(&mut self, _handle: SessionHandle) {}
}

/// Runs any number of independent sessions
pub struct SessionHost<G: GameContext, E: EngineEvents> {
    game: G,
    events: E,
    settings: EngineSettings,
    base_seed: u64,
    next_handle: u64,
    sessions: BTreeMap<SessionHandle, Simulation>,
}

impl<G: GameContext, E: EngineEvents> SessionHost<G, E> {
    pub fn new(game: G, events: E, settings: EngineSettings) -> Self {
        let base_seed = settings.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        });
        log::info!("Session host ready (seed {}, {})", base_seed, settings.decay_mode.as_str());
        Self {
            game,
            events,
            settings,
            base_seed,
            next_handle: 1,
            sessions: BTreeMap::new(),
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Sessions still accepting ticks
    pub fn active_count(&self) -> usize {
        self.sessions
            .values()
            .filter(|s| s.phase() == SessionPhase::Active)
            .count()
    }

    /// Per-session seed derived from the host seed
    fn session_seed(&self, handle: SessionHandle) -> u64 {
        self.base_seed.wrapping_add(handle.0.wrapping_mul(2654435761))
    }

    /// Start a session with a seeded random source
    pub fn start_session(&mut self, variant: Variant, context: &CatchContext) -> SessionHandle {
        let handle = SessionHandle(self.next_handle);
        let rng = PcgSource::new(self.session_seed(handle));
        self.start_session_with_rng(variant, context, Box::new(rng))
    }

    /// Start a session drawing from the given random source
    pub fn start_session_with_rng(
        &mut self,
        variant: Variant,
        context: &CatchContext,
        mut rng: Box<dyn RandomSource + Send>,
    ) -> SessionHandle {
        let handle = SessionHandle(self.next_handle);
        self.next_handle += 1;

        let power = self.game.equipment_power(context.rod_id);
        let rarity = self.game.rarity_of(&context.target);
        let modifiers = self.game.active_skill_modifiers();
        let config = configure(variant, power, rarity, &modifiers, rng.as_mut());

        log::info!(
            "Session {} started: {} (rod {} power {:.1}, '{}' rarity {:.1})",
            handle,
            variant.as_str(),
            context.rod_id,
            power,
            context.target,
            rarity
        );
        let sim = Simulation::started(config, rng, self.settings.clone());
        self.sessions.insert(handle, sim);
        handle
    }

    fn session(&self, handle: SessionHandle) -> Result<&Simulation, SessionError> {
        self.sessions
            .get(&handle)
            .ok_or(SessionError::UnknownSession(handle))
    }

    fn session_mut(&mut self, handle: SessionHandle) -> Result<&mut Simulation, SessionError> {
        self.sessions
            .get_mut(&handle)
            .ok_or(SessionError::UnknownSession(handle))
    }

    pub fn phase(&self, handle: SessionHandle) -> Result<SessionPhase, SessionError> {
        Ok(self.session(handle)?.phase())
    }

    /// Queue an action; applied at the next tick
    pub fn submit_action(
        &mut self,
        handle: SessionHandle,
        action: Action,
    ) -> Result<(), SessionError> {
        self.session_mut(handle)?.submit(action)
    }

    /// Advance one session; returns its outcome on the finishing tick
    pub fn tick(
        &mut self,
        handle: SessionHandle,
        dt: Duration,
    ) -> Result<Option<Outcome>, SessionError> {
        let report = self.session_mut(handle)?.tick(dt)?;
        for cue in &report.cues {
            self.events.play_sound(*cue);
        }
        if let Some(outcome) = &report.outcome {
            self.events.on_outcome(handle, outcome);
        }
        Ok(report.outcome)
    }

    /// Advance every active session, in handle order
    pub fn tick_all(&mut self, dt: Duration) -> Vec<(SessionHandle, Outcome)> {
        let active: Vec<SessionHandle> = self
            .sessions
            .iter()
            .filter(|(_, s)| s.phase() == SessionPhase::Active)
            .map(|(h, _)| *h)
            .collect();

        let mut finished = Vec::new();
        for handle in active {
            match self.tick(handle, dt) {
                Ok(Some(outcome)) => finished.push((handle, outcome)),
                Ok(None) => {}
                Err(e) => log::warn!("Session {} skipped: {}", handle, e),
            }
        }
        finished
    }

    /// Presentation view of a session
    pub fn snapshot(&self, handle: SessionHandle) -> Result<Snapshot, SessionError> {
        Ok(self.session(handle)?.snapshot())
    }

    /// Abort a running session; reported through `on_aborted`, never as an outcome
    pub fn cancel(&mut self, handle: SessionHandle) -> Result<(), SessionError> {
        self.session_mut(handle)?.cancel()?;
        self.events.on_aborted(handle);
        Ok(())
    }

    /// Drop a session, returning its outcome if it completed
    pub fn finish(&mut self, handle: SessionHandle) -> Result<Option<Outcome>, SessionError> {
        let sim = self
            .sessions
            .remove(&handle)
            .ok_or(SessionError::UnknownSession(handle))?;
        if sim.phase() == SessionPhase::Active {
            log::warn!("Session {} dropped while still active", handle);
        }
        Ok(sim.outcome())
    }
}

//! Session tick loop
//!
//! One `Simulation` per session. Each tick drains queued input, integrates
//! physics, runs the scheduler and evaluates terminal conditions, in that
//! order. The first terminal condition produces the session's only outcome.

use std::time::Duration;

use crate::audio::SoundCue;
use crate::config::{SessionConfig, Variant};
use crate::session::SessionError;
use crate::settings::EngineSettings;

use super::evaluate::{evaluate, resolve_collisions};
use super::input::{Action, InputQueue, apply_action};
use super::integrate::integrate;
use super::rng::RandomSource;
use super::scheduler::{Scheduled, maybe_spawn};
use super::snapshot::Snapshot;
use super::state::{Outcome, PhysicsState, SessionPhase};

/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Cues in the order they were triggered
    pub cues: Vec<SoundCue>,
    pub scheduled: Scheduled,
    /// Set on the tick the session finished
    pub outcome: Option<Outcome>,
}

impl Default for TickReport {
    fn default() -> Self {
        Self {
            cues: Vec::new(),
            scheduled: Scheduled::Nothing,
            outcome: None,
        }
    }
}

/// A single skill-challenge session
pub struct Simulation {
    config: SessionConfig,
    state: PhysicsState,
    phase: SessionPhase,
    queue: InputQueue,
    rng: Box<dyn RandomSource + Send>,
    settings: EngineSettings,
    elapsed: Duration,
    ticks: u64,
    outcome: Option<Outcome>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("ticks", &self.ticks)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Create an idle session
    pub fn new(
        config: SessionConfig,
        rng: Box<dyn RandomSource + Send>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            state: PhysicsState::new(&config),
            config,
            phase: SessionPhase::Idle,
            queue: InputQueue::new(),
            rng,
            settings,
            elapsed: Duration::ZERO,
            ticks: 0,
            outcome: None,
        }
    }

    /// Create and immediately activate a session
    pub fn started(
        config: SessionConfig,
        rng: Box<dyn RandomSource + Send>,
        settings: EngineSettings,
    ) -> Self {
        let mut sim = Self::new(config, rng, settings);
        sim.phase = SessionPhase::Active;
        sim
    }

    /// Idle -> Active
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Idle => {
                self.phase = SessionPhase::Active;
                Ok(())
            }
            SessionPhase::Active => Ok(()),
            phase => Err(SessionError::NotActive { phase }),
        }
    }

    pub fn variant(&self) -> Variant {
        self.config.variant()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &PhysicsState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pending_actions(&self) -> usize {
        self.queue.len()
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut PhysicsState {
        &mut self.state
    }

    /// Queue an action for the next tick
    pub fn submit(&mut self, action: Action) -> Result<(), SessionError> {
        if self.phase.is_terminal() {
            log::warn!("Refusing {:?}: session is {:?}", action, self.phase);
            return Err(SessionError::NotActive { phase: self.phase });
        }
        self.queue.push(action);
        Ok(())
    }

    /// Stop the session without an outcome
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        if self.phase.is_terminal() {
            return Err(SessionError::NotActive { phase: self.phase });
        }
        self.phase = SessionPhase::Cancelled;
        self.queue.clear();
        log::info!("Session cancelled after {} ticks", self.ticks);
        Ok(())
    }

    /// Read-only view for presentation
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.config, &self.state, self.phase, self.ticks, self.elapsed)
    }

    /// Advance the session by `dt`
    pub fn tick(&mut self, dt: Duration) -> Result<TickReport, SessionError> {
        if self.phase != SessionPhase::Active {
            log::warn!("Refusing tick: session is {:?}", self.phase);
            return Err(SessionError::NotActive { phase: self.phase });
        }

        self.ticks += 1;
        self.elapsed += dt;
        let mut report = TickReport::default();

        while let Some(action) = self.queue.pop() {
            let cue = apply_action(&mut self.state, &self.config, self.rng.as_mut(), action);
            if let Some(cue) = cue {
                report.cues.push(cue);
            }
            // A decisive action ends the session on the spot
            if let Some(outcome) = evaluate(&self.state) {
                self.finish(outcome, &mut report);
                return Ok(report);
            }
        }

        let scale = self.settings.decay_mode.step_scale(dt);
        if matches!(self.state, PhysicsState::Diving(_)) {
            // New entities drift with the field on the tick they appear
            report.scheduled = self.schedule(dt);
            integrate(&mut self.state, &self.config, self.rng.as_mut(), scale);
        } else {
            integrate(&mut self.state, &self.config, self.rng.as_mut(), scale);
            report.scheduled = self.schedule(dt);
        }
        if matches!(report.scheduled, Scheduled::QteSpawned(_)) {
            report.cues.push(SoundCue::Alert);
        }

        if let PhysicsState::Diving(diving) = &mut self.state {
            report.cues.extend(resolve_collisions(diving));
        }

        if let Some(outcome) = evaluate(&self.state) {
            self.finish(outcome, &mut report);
        }

        Ok(report)
    }

    fn schedule(&mut self, dt: Duration) -> Scheduled {
        maybe_spawn(
            &mut self.state,
            &self.config,
            self.rng.as_mut(),
            self.elapsed,
            dt,
            self.settings.max_entities,
        )
    }

    fn finish(&mut self, outcome: Outcome, report: &mut TickReport) {
        self.phase = outcome.kind.phase();
        self.outcome = Some(outcome);
        self.queue.clear();
        report.outcome = Some(outcome);
        log::info!(
            "{} session finished after {} ticks: {:?}",
            self.config.variant().as_str(),
            self.ticks,
            outcome
        );
    }
}

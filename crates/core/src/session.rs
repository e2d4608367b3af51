use crate::{
    Catalog, Event, EventBus, GameConfig, Hand, Outcome, ProblemReference, ProfileStore,
    RoundEngine, RoundError, RoundSignal, RoundState, UserProfile,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Round(#[from] RoundError),
    #[error("not available during {0:?}")]
    WrongPhase(SessionPhase),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Playing,
    /// Set finished; waiting for continue or quit.
    Summary,
    /// A round could not be dealt. Only continue (retry) or quit are accepted.
    Halted,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetSummary {
    pub previous_best: u64,
    pub score: u64,
    pub new_record: bool,
}

/// Owns the round engine, the player profile and its store. The UI drives it
/// through the named control methods and drains presentation events.
pub struct Session<S: ProfileStore> {
    engine: RoundEngine,
    profile: UserProfile,
    store: S,
    events: EventBus,
    phase: SessionPhase,
    last_summary: Option<SetSummary>,
}

impl<S: ProfileStore> Session<S> {
    pub fn new(
        config: GameConfig,
        catalog: Arc<Catalog>,
        profile: UserProfile,
        store: S,
        seed: u64,
    ) -> Self {
        Self {
            engine: RoundEngine::new(config, catalog, seed),
            profile,
            store,
            events: EventBus::default(),
            phase: SessionPhase::Halted,
            last_summary: None,
        }
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.engine.start_round(&mut self.events) {
            Ok(()) => {
                self.phase = SessionPhase::Playing;
                Ok(())
            }
            Err(err) => {
                self.phase = SessionPhase::Halted;
                Err(err.into())
            }
        }
    }

    pub fn tick(&mut self, elapsed: Duration) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        let Some(signal) = self.engine.tick(elapsed.as_secs_f32(), &mut self.events) else {
            return;
        };
        match signal {
            RoundSignal::Evaluated(outcome) => self.apply_outcome(&outcome),
            RoundSignal::NextRound => {}
            RoundSignal::SetComplete { score } => {
                self.on_set_complete(score);
            }
            RoundSignal::Aborted(_) => self.phase = SessionPhase::Halted,
        }
    }

    pub fn select(&mut self, index: usize) -> Result<Outcome, SessionError> {
        if self.phase != SessionPhase::Playing {
            return Err(SessionError::WrongPhase(self.phase));
        }
        let outcome = self.engine.select(index, &mut self.events)?;
        self.apply_outcome(&outcome);
        Ok(outcome)
    }

    fn apply_outcome(&mut self, outcome: &Outcome) {
        if let Outcome::Correct { variant_id, .. } = outcome {
            if self.profile.record_solved(variant_id) {
                self.persist();
            }
        }
    }

    /// Compares the set's score to the stored best and shows the summary.
    pub fn on_set_complete(&mut self, final_score: u64) -> SetSummary {
        let previous_best = self.profile.best_score;
        let new_record = self.profile.offer_score(final_score);
        if new_record {
            info!(previous_best, final_score, "new high score");
            self.persist();
        }
        let summary = SetSummary {
            previous_best,
            score: final_score,
            new_record,
        };
        self.events.push(Event::SummaryShown {
            best_score: previous_best,
            score: final_score,
            new_record,
        });
        self.engine.finish_set();
        self.phase = SessionPhase::Summary;
        self.last_summary = Some(summary.clone());
        summary
    }

    /// Starts a new set from the summary, or retries after a halted deal.
    pub fn continue_set(&mut self) -> Result<(), SessionError> {
        if !matches!(self.phase, SessionPhase::Summary | SessionPhase::Halted) {
            return Err(SessionError::WrongPhase(self.phase));
        }
        self.engine.reset_for_new_set();
        if self.engine.is_paused() {
            self.resume();
        }
        self.start()
    }

    pub fn quit(&mut self) {
        info!("session finished");
        self.phase = SessionPhase::Finished;
    }

    pub fn pause(&mut self) {
        if self.phase == SessionPhase::Finished || self.engine.is_paused() {
            return;
        }
        self.engine.pause();
        self.events.push(Event::PauseOverlay { visible: true });
    }

    pub fn resume(&mut self) {
        if !self.engine.is_paused() {
            return;
        }
        self.engine.resume();
        self.events.push(Event::PauseOverlay { visible: false });
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.profile) {
            error!(%err, "failed to persist profile");
        }
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain().collect()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    pub fn is_paused(&self) -> bool {
        self.engine.is_paused()
    }

    pub fn round(&self) -> &RoundState {
        self.engine.state()
    }

    pub fn hand(&self) -> &Hand {
        self.engine.hand()
    }

    pub fn problem(&self) -> Option<&ProblemReference> {
        self.engine.problem()
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.engine.correct_index()
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn last_summary(&self) -> Option<&SetSummary> {
        self.last_summary.as_ref()
    }
}

use crate::{points_for_correct, Catalog, Event, EventBus, GameConfig, Hand, ProblemReference, RngState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("catalog is empty")]
    EmptyCatalog,
    #[error("hand must have at least one slot")]
    NoHandSlots,
    #[error("hand needs {required} distinct groups, catalog provided {available}")]
    InsufficientHandSize { required: usize, available: usize },
    #[error("selection {index} is outside a hand of {hand_size}")]
    InvalidSelectionIndex { index: usize, hand_size: usize },
    #[error("not accepting input during {0:?}")]
    NotAcceptingInput(RoundPhase),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoundPhase {
    Setup,
    CountingDown,
    AwaitingInput,
    Evaluated,
    RoundEnding,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundState {
    pub phase: RoundPhase,
    pub remaining_time: f32,
    pub running: bool,
    pub combo_count: u32,
    pub score: u64,
    pub rounds_played: u8,
    /// Time left on the feedback display while `Evaluated`.
    pub feedback_remaining: f32,
}

impl RoundState {
    pub fn new() -> Self {
        Self {
            phase: RoundPhase::Setup,
            remaining_time: 0.0,
            running: false,
            combo_count: 0,
            score: 0,
            rounds_played: 0,
            feedback_remaining: 0.0,
        }
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Correct { variant_id: String, points: u64 },
    Incorrect { timed_out: bool },
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct { .. })
    }
}

/// What a tick produced, if anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundSignal {
    Evaluated(Outcome),
    NextRound,
    SetComplete { score: u64 },
    Aborted(RoundError),
}

#[derive(Debug)]
pub struct RoundEngine {
    config: GameConfig,
    catalog: Arc<Catalog>,
    rng: RngState,
    state: RoundState,
    hand: Hand,
    problem: Option<ProblemReference>,
    last_outcome: Option<Outcome>,
    paused: bool,
    shown_seconds: Option<u32>,
}

impl RoundEngine {
    pub fn new(config: GameConfig, catalog: Arc<Catalog>, seed: u64) -> Self {
        Self {
            config,
            catalog,
            rng: RngState::from_seed(seed),
            state: RoundState::new(),
            hand: Hand::default(),
            problem: None,
            last_outcome: None,
            paused: false,
            shown_seconds: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn problem(&self) -> Option<&ProblemReference> {
        self.problem.as_ref()
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.problem.as_ref().map(|problem| problem.slot)
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// `Setup`: deals a hand, picks the answer, then starts the countdown.
    pub fn start_round(&mut self, events: &mut EventBus) -> Result<(), RoundError> {
        self.state.phase = RoundPhase::Setup;
        self.state.running = false;
        self.last_outcome = None;
        self.problem = None;

        let hand = match Hand::deal(&self.catalog, self.config.hand_slots, &mut self.rng) {
            Ok(hand) => hand,
            Err(err) => return Err(self.abort(err, events)),
        };
        let Some(problem) = ProblemReference::choose(&hand, &self.catalog, &mut self.rng) else {
            return Err(self.abort(RoundError::EmptyCatalog, events));
        };
        debug!(
            slot = problem.slot,
            variant_id = %problem.answer.variant_id,
            "answer chosen"
        );

        events.push(Event::HandDisplayed {
            visuals: hand.visuals(),
        });
        events.push(Event::ProblemDisplayed {
            visual: problem.visual().clone(),
            same_art: problem.same_art(),
        });
        self.hand = hand;
        self.problem = Some(problem);

        self.state.phase = RoundPhase::CountingDown;
        self.state.remaining_time = self.config.time_limit_secs;
        self.state.running = !self.paused;
        self.shown_seconds = None;
        self.announce_countdown(events);
        Ok(())
    }

    fn abort(&mut self, err: RoundError, events: &mut EventBus) -> RoundError {
        error!(%err, "round aborted");
        self.hand = Hand::default();
        events.push(Event::RoundAborted {
            reason: err.to_string(),
        });
        err
    }

    /// Advances timers by `dt` seconds.
    pub fn tick(&mut self, dt: f32, events: &mut EventBus) -> Option<RoundSignal> {
        match self.state.phase {
            RoundPhase::CountingDown if self.state.running => {
                self.state.remaining_time -= dt;
                if self.state.remaining_time <= 0.0 {
                    self.state.remaining_time = 0.0;
                    self.state.running = false;
                    info!("time up");
                    self.announce_countdown(events);
                    events.push(Event::TimeUp);
                    let outcome = self.evaluate(None, events);
                    return Some(RoundSignal::Evaluated(outcome));
                }
                self.announce_countdown(events);
                None
            }
            RoundPhase::Evaluated if !self.paused => {
                self.state.feedback_remaining -= dt;
                if self.state.feedback_remaining > 0.0 {
                    return None;
                }
                self.state.feedback_remaining = 0.0;
                Some(self.end_round(events))
            }
            _ => None,
        }
    }

    /// Player picked `index`. Rejected without any state change unless the countdown is live
    /// and the index names a hand slot.
    pub fn select(&mut self, index: usize, events: &mut EventBus) -> Result<Outcome, RoundError> {
        if self.state.phase != RoundPhase::CountingDown || !self.state.running {
            warn!(index, phase = ?self.state.phase, "selection ignored");
            return Err(RoundError::NotAcceptingInput(self.state.phase));
        }
        if index >= self.hand.len() {
            let err = RoundError::InvalidSelectionIndex {
                index,
                hand_size: self.hand.len(),
            };
            warn!(%err, "selection rejected");
            return Err(err);
        }
        self.state.running = false;
        self.state.phase = RoundPhase::AwaitingInput;
        Ok(self.evaluate(Some(index), events))
    }

    fn evaluate(&mut self, choice: Option<usize>, events: &mut EventBus) -> Outcome {
        let correct_slot = self.correct_index();
        let outcome = match choice {
            Some(index) if Some(index) == correct_slot => {
                self.state.combo_count += 1;
                let points = points_for_correct(&self.config, self.state.combo_count);
                self.state.score += points;
                let variant_id = self
                    .hand
                    .get(index)
                    .map(|card| card.variant_id.clone())
                    .unwrap_or_default();
                Outcome::Correct { variant_id, points }
            }
            _ => {
                self.state.combo_count = 0;
                Outcome::Incorrect {
                    timed_out: choice.is_none(),
                }
            }
        };
        info!(
            ?choice,
            correct = outcome.is_correct(),
            score = self.state.score,
            combo = self.state.combo_count,
            "round evaluated"
        );
        events.push(Event::FeedbackShown {
            correct: outcome.is_correct(),
        });
        events.push(Event::ScoreChanged {
            score: self.state.score,
            combo: self.state.combo_count,
        });
        self.state.phase = RoundPhase::Evaluated;
        self.state.feedback_remaining = self.config.feedback_delay_secs;
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    fn end_round(&mut self, events: &mut EventBus) -> RoundSignal {
        self.state.phase = RoundPhase::RoundEnding;
        self.state.rounds_played = self.state.rounds_played.saturating_add(1);
        if self.state.rounds_played >= self.config.rounds_per_set {
            return RoundSignal::SetComplete {
                score: self.state.score,
            };
        }
        match self.start_round(events) {
            Ok(()) => RoundSignal::NextRound,
            Err(err) => RoundSignal::Aborted(err),
        }
    }

    /// Clears the round counter once a set has been handed to the session.
    pub fn finish_set(&mut self) {
        self.state.rounds_played = 0;
    }

    /// Fresh set: score and combo start over.
    pub fn reset_for_new_set(&mut self) {
        self.state.score = 0;
        self.state.combo_count = 0;
        self.state.rounds_played = 0;
    }

    /// Freezes the countdown and the feedback delay. `remaining_time` is untouched.
    pub fn pause(&mut self) {
        self.paused = true;
        self.state.running = false;
    }

    pub fn resume(&mut self) {
        self.paused = false;
        if self.state.phase == RoundPhase::CountingDown && self.state.remaining_time > 0.0 {
            self.state.running = true;
        }
    }

    fn announce_countdown(&mut self, events: &mut EventBus) {
        let seconds = self.state.remaining_time.max(0.0).ceil() as u32;
        if self.shown_seconds != Some(seconds) {
            self.shown_seconds = Some(seconds);
            events.push(Event::CountdownChanged { seconds });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CardRecord, VisualRef};

    fn engine() -> RoundEngine {
        let catalog = Catalog::new((1..=6).flat_map(|group| {
            ["a", "b"].into_iter().map(move |suffix| {
                let variant = format!("{group}{suffix}");
                CardRecord::new(group, variant.clone(), VisualRef::new(variant.clone(), variant))
            })
        }));
        RoundEngine::new(GameConfig::default(), Arc::new(catalog), 5)
    }

    fn wrong_index(engine: &RoundEngine) -> usize {
        let correct = engine.correct_index().expect("answer");
        (correct + 1) % engine.hand().len()
    }

    #[test]
    fn start_round_enters_countdown() {
        let mut engine = engine();
        let mut events = EventBus::default();
        engine.start_round(&mut events).expect("start");
        assert_eq!(engine.state().phase, RoundPhase::CountingDown);
        assert!(engine.state().running);
        assert_eq!(engine.state().remaining_time, 30.0);
        assert_eq!(engine.hand().len(), 4);
        let drained: Vec<Event> = events.drain().collect();
        assert!(matches!(drained[0], Event::HandDisplayed { ref visuals } if visuals.len() == 4));
        assert!(matches!(drained[1], Event::ProblemDisplayed { same_art: false, .. }));
        assert_eq!(drained[2], Event::CountdownChanged { seconds: 30 });
    }

    #[test]
    fn countdown_emits_whole_seconds_only() {
        let mut engine = engine();
        let mut events = EventBus::default();
        engine.start_round(&mut events).expect("start");
        events.drain().for_each(drop);
        engine.tick(0.25, &mut events);
        engine.tick(0.25, &mut events);
        assert!(events.is_empty());
        engine.tick(0.6, &mut events);
        let drained: Vec<Event> = events.drain().collect();
        assert_eq!(drained, vec![Event::CountdownChanged { seconds: 29 }]);
    }

    #[test]
    fn wrong_pick_resets_combo() {
        let mut engine = engine();
        let mut events = EventBus::default();
        engine.start_round(&mut events).expect("start");
        let correct = engine.correct_index().expect("answer");
        engine.select(correct, &mut events).expect("pick");
        assert_eq!(engine.state().combo_count, 1);
        engine.tick(2.0, &mut events);
        let wrong = wrong_index(&engine);
        let outcome = engine.select(wrong, &mut events).expect("pick");
        assert_eq!(outcome, Outcome::Incorrect { timed_out: false });
        assert_eq!(engine.state().combo_count, 0);
        assert_eq!(engine.state().score, 1000);
    }

    #[test]
    fn second_pick_in_same_round_is_refused() {
        let mut engine = engine();
        let mut events = EventBus::default();
        engine.start_round(&mut events).expect("start");
        let correct = engine.correct_index().expect("answer");
        engine.select(correct, &mut events).expect("pick");
        let err = engine.select(correct, &mut events).expect_err("refused");
        assert_eq!(err, RoundError::NotAcceptingInput(RoundPhase::Evaluated));
        assert_eq!(engine.state().score, 1000);
    }

    #[test]
    fn feedback_delay_then_next_round() {
        let mut engine = engine();
        let mut events = EventBus::default();
        engine.start_round(&mut events).expect("start");
        let wrong = wrong_index(&engine);
        engine.select(wrong, &mut events).expect("pick");
        assert_eq!(engine.tick(1.5, &mut events), None);
        assert_eq!(engine.state().phase, RoundPhase::Evaluated);
        assert_eq!(engine.tick(0.5, &mut events), Some(RoundSignal::NextRound));
        assert_eq!(engine.state().rounds_played, 1);
        assert_eq!(engine.state().phase, RoundPhase::CountingDown);
    }

    #[test]
    fn pause_freezes_feedback_delay() {
        let mut engine = engine();
        let mut events = EventBus::default();
        engine.start_round(&mut events).expect("start");
        let wrong = wrong_index(&engine);
        engine.select(wrong, &mut events).expect("pick");
        engine.pause();
        assert_eq!(engine.tick(5.0, &mut events), None);
        engine.resume();
        assert!(!engine.state().running);
        assert_eq!(engine.tick(2.0, &mut events), Some(RoundSignal::NextRound));
    }
}

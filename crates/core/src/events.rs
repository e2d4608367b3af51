use crate::VisualRef;
use serde::{Deserialize, Serialize};

/// Presentation requests. The core never waits on the UI for any of these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    HandDisplayed {
        visuals: Vec<VisualRef>,
    },
    ProblemDisplayed {
        visual: VisualRef,
        /// True when no other variant of the group exists and the hand's own art is reused.
        same_art: bool,
    },
    CountdownChanged {
        seconds: u32,
    },
    TimeUp,
    FeedbackShown {
        correct: bool,
    },
    ScoreChanged {
        score: u64,
        combo: u32,
    },
    SummaryShown {
        best_score: u64,
        score: u64,
        new_record: bool,
    },
    PauseOverlay {
        visible: bool,
    },
    RoundAborted {
        reason: String,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

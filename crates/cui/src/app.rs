use crate::persistence::load_sprite_art;
use anyhow::{Context, Result};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::time::Instant;
use twinmatch_core::{Event, Outcome, Session, SessionPhase, VisualRef};
use twinmatch_data::{
    load_catalog, load_game_config, DirAssetResolver, JsonProfileStore, CATALOG_FILE_NAME,
};

const MAX_EVENT_LOG: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryView {
    pub best_score: u64,
    pub score: u64,
    pub new_record: bool,
}

/// Presentation state. Everything here is fed from session events.
pub struct App {
    pub session: Session<JsonProfileStore>,
    pub sprites: HashMap<String, Vec<String>>,
    pub hand: Vec<VisualRef>,
    pub problem: Option<VisualRef>,
    pub problem_same_art: bool,
    pub countdown: Option<u32>,
    pub feedback: Option<bool>,
    pub summary: Option<SummaryView>,
    pub pause_overlay: bool,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub show_help: bool,
    pub should_quit: bool,
    last_tick: Instant,
}

impl App {
    pub fn bootstrap(assets_dir: &Path, data_dir: &Path, seed: u64) -> Result<Self> {
        let config = load_game_config(assets_dir).context("load config")?;
        let resolver = DirAssetResolver::new(assets_dir);
        let report = load_catalog(&assets_dir.join(CATALOG_FILE_NAME), &resolver)
            .context("load catalog")?;
        let store = JsonProfileStore::in_dir(data_dir);
        let profile = store.load().context("load profile")?;
        let sprites = load_sprite_art(&report.catalog);
        let skipped = report.rejected.len();
        let session = Session::new(config, report.catalog, profile, store, seed);

        let mut app = Self {
            session,
            sprites,
            hand: Vec::new(),
            problem: None,
            problem_same_art: false,
            countdown: None,
            feedback: None,
            summary: None,
            pause_overlay: false,
            event_log: VecDeque::new(),
            status_line: String::new(),
            show_help: false,
            should_quit: false,
            last_tick: Instant::now(),
        };
        if skipped > 0 {
            app.push_log(format!("catalog: {skipped} rows skipped"));
        }
        match app.session.start() {
            Ok(()) => app.status_line = "Find the card that matches the problem.".to_string(),
            Err(err) => app.status_line = format!("cannot start: {err}"),
        }
        app.pump_events();
        Ok(app)
    }

    pub fn on_tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.session.tick(elapsed);
        self.pump_events();
    }

    pub fn select(&mut self, slot: usize) {
        match self.session.select(slot) {
            Ok(Outcome::Correct { points, .. }) => {
                self.status_line = format!("Correct! +{points}");
            }
            Ok(Outcome::Incorrect { .. }) => self.status_line = "Wrong card.".to_string(),
            Err(err) => self.status_line = err.to_string(),
        }
        self.pump_events();
    }

    pub fn pause(&mut self) {
        self.session.pause();
        self.pump_events();
    }

    pub fn resume(&mut self) {
        self.session.resume();
        self.pump_events();
    }

    pub fn continue_set(&mut self) {
        match self.session.continue_set() {
            Ok(()) => self.status_line = "New set.".to_string(),
            Err(err) => self.status_line = err.to_string(),
        }
        self.pump_events();
    }

    pub fn quit(&mut self) {
        self.session.quit();
        self.should_quit = self.session.is_finished();
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    pub fn art_for(&self, visual: &VisualRef) -> Option<&[String]> {
        self.sprites.get(&visual.key).map(Vec::as_slice)
    }

    pub fn next_hint(&self) -> &'static str {
        if self.pause_overlay {
            return "r resume | q quit";
        }
        match self.phase() {
            SessionPhase::Playing => "1-9 pick a card | p pause | ? help",
            SessionPhase::Summary => "c continue | q quit",
            SessionPhase::Halted => "c retry | q quit",
            SessionPhase::Finished => "bye",
        }
    }

    fn pump_events(&mut self) {
        for event in self.session.drain_events() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: Event) {
        match event {
            Event::HandDisplayed { visuals } => {
                self.push_log(format!("hand: {} cards", visuals.len()));
                self.hand = visuals;
                self.feedback = None;
                self.summary = None;
            }
            Event::ProblemDisplayed { visual, same_art } => {
                self.problem = Some(visual);
                self.problem_same_art = same_art;
            }
            Event::CountdownChanged { seconds } => self.countdown = Some(seconds),
            Event::TimeUp => {
                self.countdown = None;
                self.status_line = "Time's up!".to_string();
                self.push_log("time up".to_string());
            }
            Event::FeedbackShown { correct } => {
                self.countdown = None;
                self.feedback = Some(correct);
            }
            Event::ScoreChanged { score, combo } => {
                self.push_log(format!("score {score} (combo {combo})"));
            }
            Event::SummaryShown {
                best_score,
                score,
                new_record,
            } => {
                self.feedback = None;
                self.summary = Some(SummaryView {
                    best_score,
                    score,
                    new_record,
                });
                self.push_log(format!("set finished: {score}"));
            }
            Event::PauseOverlay { visible } => self.pause_overlay = visible,
            Event::RoundAborted { reason } => {
                self.hand.clear();
                self.problem = None;
                self.countdown = None;
                self.push_log(format!("round aborted: {reason}"));
            }
        }
    }

    fn push_log(&mut self, line: String) {
        self.event_log.push_back(line);
        while self.event_log.len() > MAX_EVENT_LOG {
            self.event_log.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn assets_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("assets")
    }

    #[test]
    fn bootstrap_deals_first_round() {
        let data = tempfile::tempdir().expect("tempdir");
        let app = App::bootstrap(&assets_root(), data.path(), 42).expect("bootstrap");
        assert_eq!(app.phase(), SessionPhase::Playing);
        assert_eq!(app.hand.len(), app.session.config().hand_slots);
        assert!(app.problem.is_some());
        assert_eq!(app.countdown, Some(30));
        assert!(data.path().join("user_data.json").is_file());
        assert!(!app.sprites.is_empty());
    }

    #[test]
    fn picking_shows_feedback_and_pause_toggles_overlay() {
        let data = tempfile::tempdir().expect("tempdir");
        let mut app = App::bootstrap(&assets_root(), data.path(), 7).expect("bootstrap");
        app.pause();
        assert!(app.pause_overlay);
        app.select(0);
        assert_eq!(app.feedback, None);
        app.resume();
        assert!(!app.pause_overlay);
        let answer = app.session.correct_index().expect("answer");
        app.select(answer);
        assert_eq!(app.feedback, Some(true));
        assert!(app.status_line.starts_with("Correct"));
    }

    #[test]
    fn missing_catalog_fails_bootstrap() {
        let assets = tempfile::tempdir().expect("assets");
        let data = tempfile::tempdir().expect("data");
        assert!(App::bootstrap(assets.path(), data.path(), 1).is_err());
    }
}

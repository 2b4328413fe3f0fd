use crate::challenge::ChallengeProgression;
use crate::config::Config;
use crate::history::{HistoryLog, SessionRecord};
use crate::levels::{Level, Verdict};
use crate::quotes::QuoteSource;
use crate::runtime::AppEvent;
use crate::session::{Mode, Session};
use crate::streak::{calculate_streaks, Streaks};
use crate::word_generator::WordGenerator;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Words generated up front for a timed session.
const TIMED_WORDS: usize = 200;

/// Where the texts for successive sessions come from.
pub enum Plan {
    Quote {
        source: Box<dyn QuoteSource>,
        count: usize,
    },
    Words {
        generator: WordGenerator,
        count: usize,
    },
    Timed {
        generator: WordGenerator,
        limit: Duration,
    },
    Challenge {
        progression: ChallengeProgression,
        generator: WordGenerator,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// What happened when a session completed.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub record: SessionRecord,
    pub verdict: Option<Verdict>,
    pub advanced: bool,
    pub streaks: Option<Streaks>,
    /// persistence failures, shown to the user instead of a silent success
    pub errors: Vec<String>,
}

pub struct App {
    pub config: Config,
    history: HistoryLog,
    plan: Plan,
    pub session: Session,
    pub level: Option<Level>,
    pub state: AppState,
    pub outcome: Option<SessionOutcome>,
}

impl App {
    pub fn new(config: Config, history: HistoryLog, mut plan: Plan) -> Self {
        let (session, level) = next_session(&mut plan);
        Self {
            config,
            history,
            plan,
            session,
            level,
            state: AppState::Typing,
            outcome: None,
        }
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn progression(&self) -> Option<&ChallengeProgression> {
        match &self.plan {
            Plan::Challenge { progression, .. } => Some(progression),
            _ => None,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        match self.state {
            AppState::Typing => match key.code {
                KeyCode::Esc => return Action::Quit,
                KeyCode::Backspace => {
                    self.session.backspace(now);
                }
                KeyCode::Char(c) => {
                    self.session.type_char(c, now);
                }
                _ => {}
            },
            AppState::Results => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Action::Quit,
                KeyCode::Char('r') | KeyCode::Left => self.retry(),
                KeyCode::Char('n') | KeyCode::Enter | KeyCode::Right => self.next(),
                _ => {}
            },
        }

        self.check_finished(now);
        Action::Continue
    }

    /// Timed sessions can end without a keystroke.
    pub fn on_refresh(&mut self, now: Instant) {
        self.check_finished(now);
    }

    /// Apply one event from the interactive loop, at the instant it carries.
    pub fn handle(&mut self, event: AppEvent) -> Action {
        match event {
            AppEvent::Key { key, at } => self.on_key(key, at),
            AppEvent::Refresh { at } => {
                self.on_refresh(at);
                Action::Continue
            }
            AppEvent::Resize => Action::Continue,
        }
    }

    fn check_finished(&mut self, now: Instant) {
        if self.state == AppState::Typing
            && self.session.has_started()
            && self.session.is_finished(now)
        {
            self.finish(now);
        }
    }

    fn finish(&mut self, now: Instant) {
        let record = self.session.to_record(now, Local::now());
        let mut errors = Vec::new();

        if let Err(e) = self.history.append(&record) {
            warn!("failed to record session: {}", e);
            errors.push(format!("history not saved: {}", e));
        }

        let mut verdict = None;
        let mut advanced = false;
        if let (Some(level), Plan::Challenge { progression, .. }) = (self.level, &mut self.plan) {
            let judged = level.judge(&record.metrics);
            info!("challenge level {} judged {:?}", level.number, judged);
            match progression.record(level.number, &judged) {
                Ok(moved) => advanced = moved,
                Err(e) => {
                    warn!("failed to save challenge progress: {}", e);
                    errors.push(format!("progress not saved: {}", e));
                }
            }
            verdict = Some(judged);
        }

        let streaks = if self.history.is_enabled() {
            match self.history.load() {
                Ok(records) => Some(calculate_streaks(&records)),
                Err(e) => {
                    warn!("failed to read history: {}", e);
                    None
                }
            }
        } else {
            None
        };

        self.outcome = Some(SessionOutcome {
            record,
            verdict,
            advanced,
            streaks,
            errors,
        });
        self.state = AppState::Results;
    }

    /// Same text (or the same challenge level) again.
    pub fn retry(&mut self) {
        let mut session = Session::new(self.session.mode, self.session.text());
        if let Some(limit) = self.session.time_limit() {
            session = session.with_time_limit(limit);
        }
        if let Some(author) = self.session.quote_author() {
            session = session.with_quote_author(author);
        }
        if let Some(level) = self.level {
            session = session.with_tier(level.tier().to_string());
        }
        self.start(session, self.level);
    }

    /// A fresh text; for challenges, the next unplayed level.
    pub fn next(&mut self) {
        let (session, level) = next_session(&mut self.plan);
        self.start(session, level);
    }

    fn start(&mut self, session: Session, level: Option<Level>) {
        self.session = session;
        self.level = level;
        self.outcome = None;
        self.state = AppState::Typing;
    }
}

fn next_session(plan: &mut Plan) -> (Session, Option<Level>) {
    match plan {
        Plan::Quote { source, count } => {
            let quotes = source.fetch_many(*count);
            let text = quotes
                .iter()
                .map(|q| q.text.trim())
                .collect::<Vec<_>>()
                .join(" ");
            let authors = quotes
                .iter()
                .map(|q| q.author.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            (
                Session::new(Mode::Quote, text).with_quote_author(authors),
                None,
            )
        }
        Plan::Words { generator, count } => (
            Session::new(Mode::Word, generator.generate_words((*count).max(1))),
            None,
        ),
        Plan::Timed { generator, limit } => (
            Session::new(Mode::Timed, generator.generate_words(TIMED_WORDS))
                .with_time_limit(*limit),
            None,
        ),
        Plan::Challenge {
            progression,
            generator,
        } => {
            let level = Level::new(progression.starting_level());
            let session = Session::new(Mode::Challenge, generator.generate_words(level.word_count))
                .with_tier(level.tier().to_string());
            (session, Some(level))
        }
    }
}

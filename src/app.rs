use std::time::Instant;

use tracing::{debug, warn};

use crate::config::Config;
use crate::session::input;
use crate::session::quiz::{Phase, QuizSession, Transition};
use crate::ui::theme::Theme;

pub struct App {
    pub session: QuizSession,
    pub theme: Theme,
    pub config: Config,
    pub show_info: bool,
    pub should_quit: bool,
    /// Write preference changes such as the sound toggle back to the config file.
    persist_config: bool,
}

impl App {
    pub fn new(session: QuizSession, theme: Theme, config: Config, persist_config: bool) -> Self {
        Self {
            session,
            theme,
            config,
            show_info: false,
            should_quit: false,
            persist_config,
        }
    }

    pub fn type_char(&mut self, ch: char) {
        let transition = input::push_char(&mut self.session, ch);
        self.log_transition(transition);
    }

    pub fn backspace(&mut self) {
        input::pop_char(&mut self.session);
    }

    pub fn paste(&mut self, text: &str) {
        let transition = input::push_text(&mut self.session, text);
        self.log_transition(transition);
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.session.poll_timers(now) {
            debug!(question = self.session.question_number(), "Correct modal shown");
        }
    }

    /// Move on, but only once the answer is right or has been revealed.
    pub fn next_question(&mut self) {
        if self.session.can_advance() {
            self.session.advance();
        }
    }

    pub fn skip(&mut self) {
        self.session.skip();
    }

    pub fn reveal(&mut self) {
        self.session.reveal();
    }

    pub fn reset(&mut self) {
        self.show_info = false;
        self.session.reset();
    }

    pub fn toggle_sound(&mut self) {
        let enabled = self.session.toggle_sound();
        self.config.sound_enabled = enabled;
        if !self.persist_config {
            return;
        }
        // Update the file on disk rather than saving `self.config`, which
        // carries command-line overrides.
        match Config::load() {
            Ok(mut stored) => {
                stored.sound_enabled = enabled;
                if let Err(err) = stored.save() {
                    warn!(?err, "Saving config failed");
                }
            }
            Err(err) => warn!(?err, "Config file unreadable, sound preference not saved"),
        }
    }

    pub fn toggle_info(&mut self) {
        self.show_info = !self.show_info;
    }

    /// One-line hint under the answer field for the current question.
    pub fn status_line(&self) -> String {
        if self.session.phase() != Phase::Playing {
            return String::new();
        }
        let next_hint = if self.session.has_next() {
            "press Enter for the next question"
        } else {
            "press Enter for your results"
        };
        if self.session.is_revealed() {
            format!("Answer revealed, {next_hint}")
        } else if self.session.is_answered_correctly() {
            format!("Correct! {next_hint}")
        } else {
            let typed = self.session.input().chars().count();
            format!("{typed}/{} letters", self.session.slot_count())
        }
    }

    fn log_transition(&self, transition: Transition) {
        match transition {
            Transition::None => {}
            Transition::Scored => debug!(score = self.session.score(), "Scored"),
            Transition::Completed => debug!(score = self.session.score(), "Win target reached"),
        }
    }
}

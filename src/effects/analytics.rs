use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackedEvent {
    QuizStart,
    QuizComplete { score: u32, attempts: u32 },
    QuestionAnswered { number: usize, correct: bool, attempts: u32 },
    QuestionSkipped { number: usize },
    QuestionRevealed { number: usize },
    SoundToggled { enabled: bool },
    QuizReset,
}

/// One tracked record in `action / category / label / value` form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub action: &'static str,
    pub category: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
}

impl EventRecord {
    fn new(action: &'static str, category: &'static str) -> Self {
        Self {
            action,
            category,
            label: None,
            value: None,
        }
    }

    fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn value(mut self, value: u64) -> Self {
        self.value = Some(value);
        self
    }
}

impl TrackedEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TrackedEvent::QuizStart => "quiz_start",
            TrackedEvent::QuizComplete { .. } => "quiz_complete",
            TrackedEvent::QuestionAnswered { .. } => "question_answer",
            TrackedEvent::QuestionSkipped { .. } => "question_skip",
            TrackedEvent::QuestionRevealed { .. } => "question_reveal",
            TrackedEvent::SoundToggled { .. } => "sound_toggle",
            TrackedEvent::QuizReset => "quiz_reset",
        }
    }

    /// Records emitted for this event. Completion and answers emit a second
    /// record carrying the attempt count.
    pub fn records(&self) -> Vec<EventRecord> {
        match *self {
            TrackedEvent::QuizStart => vec![EventRecord::new("quiz_start", "game")],
            TrackedEvent::QuizComplete { score, attempts } => vec![
                EventRecord::new("quiz_complete", "game")
                    .label("completion")
                    .value(score.into()),
                EventRecord::new("quiz_attempts", "game")
                    .label("total_attempts")
                    .value(attempts.into()),
            ],
            TrackedEvent::QuestionAnswered {
                number,
                correct,
                attempts,
            } => vec![
                EventRecord::new("question_answer", "game")
                    .label(format!("question_{number}"))
                    .value(u64::from(correct)),
                EventRecord::new("question_attempts", "game")
                    .label(format!("question_{number}"))
                    .value(attempts.into()),
            ],
            TrackedEvent::QuestionSkipped { number } => {
                vec![EventRecord::new("question_skip", "game").label(format!("question_{number}"))]
            }
            TrackedEvent::QuestionRevealed { number } => vec![
                EventRecord::new("question_reveal", "game").label(format!("question_{number}")),
            ],
            TrackedEvent::SoundToggled { enabled } => vec![
                EventRecord::new("sound_toggle", "settings")
                    .label(if enabled { "enabled" } else { "disabled" }),
            ],
            TrackedEvent::QuizReset => vec![EventRecord::new("quiz_reset", "game")],
        }
    }
}

/// Fire-and-forget event tracking.
pub trait AnalyticsPort {
    fn track(&mut self, event: &TrackedEvent) -> Result<()>;
}

pub struct NullAnalytics;

impl AnalyticsPort for NullAnalytics {
    fn track(&mut self, _event: &TrackedEvent) -> Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct LoggedRecord<'a> {
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    record: &'a EventRecord,
}

/// Appends each record as one JSON line to a local file.
pub struct JsonlAnalytics {
    path: PathBuf,
}

impl JsonlAnalytics {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl AnalyticsPort for JsonlAnalytics {
    fn track(&mut self, event: &TrackedEvent) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let timestamp = Utc::now();
        for record in event.records() {
            let line = serde_json::to_string(&LoggedRecord {
                timestamp,
                record: &record,
            })?;
            writeln!(file, "{line}")?;
        }
        Ok(())
    }
}

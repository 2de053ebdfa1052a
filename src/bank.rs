use std::fmt;
use std::fs;
use std::path::Path;

use rust_embed::Embed;
use serde::Deserialize;

use crate::engine::merge::fold;

#[derive(Embed)]
#[folder = "assets/questions/"]
struct QuestionAssets;

const EMBEDDED_BANK: &str = "default.json";

/// Episode reference, stored as a number in most banks and as a label in a few.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Episode {
    Number(u32),
    Label(String),
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Episode::Number(n) => write!(f, "{n}"),
            Episode::Label(label) => f.write_str(label),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Question {
    /// The cryptic clue.
    pub question: String,
    /// One letter per answer word, prefilled into each word's first slot.
    #[serde(default)]
    pub initials: String,
    pub answer: String,
    /// Phonetic hint shown once the answer is known.
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default, rename = "rockbusters", alias = "episodeNumber")]
    pub episode: Option<Episode>,
    #[serde(default)]
    pub date: Option<String>,
}

impl Question {
    pub fn word_count(&self) -> usize {
        self.answer.split(' ').count()
    }

    /// Describe how the initials disagree with the answer, if they do.
    /// The merge engine relies on them agreeing but never repairs them.
    pub fn integrity_issue(&self) -> Option<String> {
        let initials: Vec<char> = self.initials.chars().collect();
        let words: Vec<&str> = self.answer.split(' ').collect();

        if initials.len() > words.len() {
            return Some(format!(
                "{} initials for {} answer words",
                initials.len(),
                words.len()
            ));
        }

        initials
            .iter()
            .zip(&words)
            .enumerate()
            .find_map(|(idx, (&initial, word))| match word.chars().next() {
                Some(first) if fold(first) == fold(initial) => None,
                Some(first) => Some(format!(
                    "initial '{initial}' does not match word {} starting with '{first}'",
                    idx + 1
                )),
                None => Some(format!("initial '{initial}' points at an empty word")),
            })
    }

    /// Provenance line shown under the clue, e.g. "Series 2 • Rockbusters #14 • 2002-01-19".
    pub fn provenance(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(series) = &self.series {
            parts.push(series.clone());
        }
        if let Some(episode) = &self.episode {
            parts.push(format!("Rockbusters #{episode}"));
        }
        if let Some(date) = &self.date {
            parts.push(date.clone());
        }
        (!parts.is_empty()).then(|| parts.join(" \u{2022} "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("failed to read question bank at {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("bundled question bank is missing")]
    MissingEmbedded,
    #[error("question bank is empty")]
    Empty,
    #[error("question {index} has an empty answer")]
    EmptyAnswer { index: usize },
}

/// Ordered, read-only list of questions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }
        if let Some(index) = questions
            .iter()
            .position(|q| q.answer.trim().is_empty())
        {
            return Err(BankError::EmptyAnswer { index });
        }
        Ok(Self { questions })
    }

    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    pub fn from_path(path: &Path) -> Result<Self, BankError> {
        let content = fs::read_to_string(path).map_err(|source| BankError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// The sample bank compiled into the binary.
    pub fn embedded() -> Result<Self, BankError> {
        let file = QuestionAssets::get(EMBEDDED_BANK).ok_or(BankError::MissingEmbedded)?;
        let questions: Vec<Question> = serde_json::from_slice(file.data.as_ref())?;
        Self::new(questions)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// `(bank index, issue)` for every record whose initials disagree with its answer.
    pub fn integrity_report(&self) -> Vec<(usize, String)> {
        self.questions
            .iter()
            .enumerate()
            .filter_map(|(idx, q)| q.integrity_issue().map(|issue| (idx, issue)))
            .collect()
    }
}

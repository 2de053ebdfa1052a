use crate::engine::scoring;

/// End-of-quiz figures shown on the results screen.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizSummary {
    pub score: u32,
    pub win_target: usize,
    pub total_attempts: u32,
    /// Questions passed over without a correct answer, skipped or revealed.
    pub skipped_or_revealed: usize,
    pub won: bool,
    pub rating: &'static str,
}

impl QuizSummary {
    pub fn new(
        score: u32,
        win_target: usize,
        total_attempts: u32,
        skipped_or_revealed: usize,
    ) -> Self {
        Self {
            score,
            win_target,
            total_attempts,
            skipped_or_revealed,
            won: score as usize >= win_target,
            rating: scoring::rating(total_attempts),
        }
    }

    pub fn headline(&self) -> &'static str {
        if self.won {
            "Quiz Complete!"
        } else {
            "Out of Questions"
        }
    }

    pub fn score_line(&self) -> String {
        format!("{}/{}", self.score, self.win_target)
    }
}

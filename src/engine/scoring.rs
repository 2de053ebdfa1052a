/// Attempt thresholds for the results message, checked in order.
const RATINGS: &[(u32, &str)] = &[
    (25, "Outstanding! You're a true Rockbusters legend!"),
    (35, "Excellent work! Karl would be proud!"),
    (50, "Good job! You know your music!"),
];

const FALLBACK_RATING: &str = "Not bad! The clues don't work, right?";

pub fn rating(total_attempts: u32) -> &'static str {
    RATINGS
        .iter()
        .find(|(limit, _)| total_attempts <= *limit)
        .map(|(_, message)| *message)
        .unwrap_or(FALLBACK_RATING)
}

pub fn progress_ratio(score: u32, win_target: usize) -> f64 {
    if win_target == 0 {
        return 0.0;
    }
    (score as f64 / win_target as f64).clamp(0.0, 1.0)
}

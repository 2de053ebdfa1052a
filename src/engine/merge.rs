/// How a single answer slot is shown in the answer field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    /// Supplied by the initials; never edited by the player.
    Prefilled,
    /// No typed character has reached this slot yet.
    Empty,
    Correct,
    Incorrect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharCell {
    pub kind: CellKind,
    /// Character shown in the slot. `None` while the slot is unfilled.
    pub shown: Option<char>,
    /// Canonical letter at this position, lowercased.
    pub expected: char,
    /// Set on the slot the next keystroke will fill.
    pub cursor: bool,
}

/// Result of merging initials and typed input against the canonical answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeView {
    /// Lowercased candidate answer. Unfilled slots contribute nothing.
    pub candidate: String,
    /// Cells grouped per answer word.
    pub words: Vec<Vec<CharCell>>,
    pub is_match: bool,
}

impl MergeView {
    pub fn cells(&self) -> impl Iterator<Item = &CharCell> {
        self.words.iter().flatten()
    }

    /// Word and letter index of the cursor slot, if any slot carries it.
    pub fn cursor_slot(&self) -> Option<(usize, usize)> {
        self.words.iter().enumerate().find_map(|(w, cells)| {
            cells.iter().position(|cell| cell.cursor).map(|l| (w, l))
        })
    }

    pub fn typeable_count(&self) -> usize {
        self.cells()
            .filter(|cell| cell.kind != CellKind::Prefilled)
            .count()
    }

    pub fn correct_count(&self) -> usize {
        self.cells()
            .filter(|cell| cell.kind == CellKind::Correct)
            .count()
    }
}

/// Simple lowercasing of one character. Characters whose lowercase form
/// expands to several code points keep the first one so slots stay 1:1.
pub fn fold(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

fn fold_str(text: &str) -> String {
    text.chars().map(fold).collect()
}

fn is_prefilled(word_idx: usize, letter_idx: usize, initial_count: usize) -> bool {
    letter_idx == 0 && word_idx < initial_count
}

/// Merge `initials` and typed `input` into a candidate for `answer` and
/// classify every slot for rendering.
///
/// The first letter of word `w` is prefilled from `initials[w]` when that
/// initial exists. Every other letter consumes the next typed character, and
/// the input cursor advances even when nothing was typed there, so later
/// slots stay aligned with their position in the answer.
pub fn merge(initials: &str, answer: &str, input: &str) -> MergeView {
    let initials: Vec<char> = initials.chars().collect();
    let typed: Vec<char> = input.chars().map(fold).collect();

    let mut candidate = String::with_capacity(answer.len());
    let mut words = Vec::new();
    let mut all_filled = true;
    let mut u = 0usize;

    for (w, word) in answer.split(' ').enumerate() {
        if w > 0 {
            candidate.push(' ');
        }

        let mut cells = Vec::with_capacity(word.len());
        for (l, expected) in word.chars().map(fold).enumerate() {
            if is_prefilled(w, l, initials.len()) {
                let given = initials[w];
                candidate.push(fold(given));
                cells.push(CharCell {
                    kind: CellKind::Prefilled,
                    shown: Some(given),
                    expected,
                    cursor: false,
                });
                continue;
            }

            let cell = match typed.get(u) {
                Some(&ch) => {
                    candidate.push(ch);
                    CharCell {
                        kind: if ch == expected {
                            CellKind::Correct
                        } else {
                            CellKind::Incorrect
                        },
                        shown: Some(ch),
                        expected,
                        cursor: false,
                    }
                }
                None => {
                    all_filled = false;
                    CharCell {
                        kind: CellKind::Empty,
                        shown: None,
                        expected,
                        cursor: u == typed.len(),
                    }
                }
            };
            cells.push(cell);
            u += 1;
        }
        words.push(cells);
    }

    let is_match = all_filled && !answer.is_empty() && candidate == fold_str(answer);

    MergeView {
        candidate,
        words,
        is_match,
    }
}

/// The answer's own letters for every typeable slot, in order. Feeding this
/// back through [`merge`] reaches a match whenever the initials are consistent
/// with the answer.
pub fn fill_tail(initials: &str, answer: &str) -> String {
    let initial_count = initials.chars().count();
    answer
        .split(' ')
        .enumerate()
        .flat_map(|(w, word)| {
            word.chars()
                .map(fold)
                .enumerate()
                .filter(move |(l, _)| !is_prefilled(w, *l, initial_count))
                .map(|(_, ch)| ch)
        })
        .collect()
}

/// Number of slots the player has to type.
pub fn slot_count(initials: &str, answer: &str) -> usize {
    let initial_count = initials.chars().count();
    answer
        .split(' ')
        .enumerate()
        .map(|(w, word)| {
            let len = word.chars().count();
            if len > 0 && w < initial_count {
                len - 1
            } else {
                len
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(view: &MergeView) -> Vec<CellKind> {
        view.cells().map(|cell| cell.kind).collect()
    }

    #[test]
    fn test_two_word_answer_matches() {
        let view = merge("WY", "will young", "illoung");
        assert_eq!(view.candidate, "will young");
        assert!(view.is_match);
        assert_eq!(view.cursor_slot(), None);
        assert_eq!(view.correct_count(), 7);
    }

    #[test]
    fn test_single_word_uses_only_first_initial() {
        let view = merge("NS", "nsync", "");
        assert_eq!(view.words.len(), 1);
        assert_eq!(view.words[0][0].kind, CellKind::Prefilled);
        assert_eq!(view.typeable_count(), 4);
        assert!(!view.is_match);
        assert_eq!(fill_tail("NS", "nsync"), "sync");

        let typed = merge("NS", "nsync", "sync");
        assert!(typed.is_match);
        assert_eq!(typed.candidate, "nsync");
    }

    #[test]
    fn test_empty_input_prefilled_and_empty_only() {
        let view = merge("WY", "will young", "");
        assert!(!view.is_match);
        assert!(
            view.cells()
                .all(|c| matches!(c.kind, CellKind::Prefilled | CellKind::Empty))
        );
        assert_eq!(view.cursor_slot(), Some((0, 1)));
        assert_eq!(view.candidate, "w y");
    }

    #[test]
    fn test_prefilled_displayed_as_given() {
        let view = merge("WY", "will young", "");
        assert_eq!(view.words[0][0].shown, Some('W'));
        assert_eq!(view.words[1][0].shown, Some('Y'));
    }

    #[test]
    fn test_incorrect_and_cursor_classification() {
        let view = merge("WY", "will young", "ix");
        assert_eq!(
            kinds(&view)[..4],
            [
                CellKind::Prefilled,
                CellKind::Correct,
                CellKind::Incorrect,
                CellKind::Empty
            ]
        );
        assert_eq!(view.cursor_slot(), Some((0, 3)));
        assert_eq!(view.cells().filter(|c| c.cursor).count(), 1);
        assert!(!view.is_match);
    }

    #[test]
    fn test_cursor_skips_prefilled_slot_into_next_word() {
        let view = merge("WY", "will young", "ill");
        assert_eq!(view.cursor_slot(), Some((1, 1)));
    }

    #[test]
    fn test_comparison_is_case_insensitive() {
        let view = merge("wy", "Will Young", "ILLOUNG");
        assert!(view.is_match);
        assert_eq!(view.candidate, "will young");
    }

    #[test]
    fn test_missing_initials_means_free_typing() {
        let view = merge("", "blur", "");
        assert_eq!(view.typeable_count(), 4);
        assert_eq!(view.cursor_slot(), Some((0, 0)));
        assert!(merge("", "blur", "blur").is_match);
        assert_eq!(fill_tail("", "blur"), "blur");
    }

    #[test]
    fn test_surplus_input_is_ignored() {
        let view = merge("WY", "will young", "illoungzzz");
        assert!(view.is_match);
        assert_eq!(view.cursor_slot(), None);
    }

    #[test]
    fn test_fully_prefilled_answer_has_no_cursor() {
        let view = merge("X", "x", "");
        assert_eq!(view.typeable_count(), 0);
        assert_eq!(view.cursor_slot(), None);
        assert!(view.is_match);
    }

    #[test]
    fn test_empty_answer_never_matches() {
        let view = merge("", "", "");
        assert!(!view.is_match);
        assert_eq!(slot_count("", ""), 0);
    }

    #[test]
    fn test_fill_tail_always_matches_consistent_initials() {
        let cases = [
            ("WY", "will young"),
            ("TRHCP", "the red hot chili peppers"),
            ("M", "madness"),
            ("DM", "depeche mode"),
            ("SRP", "simply red people"),
        ];
        for (initials, answer) in cases {
            let tail = fill_tail(initials, answer);
            assert_eq!(tail.chars().count(), slot_count(initials, answer));
            assert!(merge(initials, answer, &tail).is_match, "{answer}");
            assert!(!merge(initials, answer, "").is_match, "{answer}");
        }
    }

    #[test]
    fn test_inconsistent_initial_cannot_match() {
        // Prefill shows 'K' where the answer needs 'w'.
        let tail = fill_tail("KY", "will young");
        assert!(!merge("KY", "will young", &tail).is_match);
    }

    #[test]
    fn test_slot_count_with_more_words_than_initials() {
        assert_eq!(slot_count("T", "the the"), 5);
        assert_eq!(fill_tail("T", "the the"), "hethe");
    }
}

use crate::session::quiz::{Phase, QuizSession, Transition};

/// Whether a keystroke can land in an answer slot. Spaces between words are
/// implied by the answer layout, so whitespace is never typed.
pub fn is_typeable(ch: char) -> bool {
    !ch.is_whitespace() && !ch.is_control()
}

/// Append one typed character, capped at the number of open slots.
pub fn push_char(session: &mut QuizSession, ch: char) -> Transition {
    if session.phase() != Phase::Playing || session.is_revealed() || !is_typeable(ch) {
        return Transition::None;
    }
    if session.input().chars().count() >= session.slot_count() {
        return Transition::None;
    }
    let mut next = session.input().to_string();
    next.push(ch);
    session.submit_input(&next)
}

pub fn pop_char(session: &mut QuizSession) -> Transition {
    if session.phase() != Phase::Playing || session.is_revealed() {
        return Transition::None;
    }
    let mut next = session.input().to_string();
    if next.pop().is_none() {
        return Transition::None;
    }
    session.submit_input(&next)
}

/// Feed pasted text through the same filter as single keystrokes. Stops at
/// the first character that scores.
pub fn push_text(session: &mut QuizSession, text: &str) -> Transition {
    for ch in text.chars() {
        let transition = push_char(session, ch);
        if transition != Transition::None {
            return transition;
        }
    }
    Transition::None
}

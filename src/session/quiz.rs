use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use rand::RngCore;
use tracing::{debug, info, warn};

use crate::bank::{Question, QuestionBank};
use crate::effects::Effects;
use crate::effects::analytics::TrackedEvent;
use crate::effects::audio::SoundCue;
use crate::engine::merge::{self, MergeView};
use crate::engine::order::QuestionOrder;
use crate::session::result::QuizSummary;
use crate::store::schema::ProgressSnapshot;

pub const DEFAULT_MODAL_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Intro screen; input is blocked until dismissed.
    Welcome,
    Playing,
    /// The correct-answer modal is up for the current question.
    Correct,
    Results,
}

/// What a submitted input did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    None,
    /// The current question was answered; the correct modal is scheduled.
    Scored,
    /// The answer reached the win target and the quiz is over.
    Completed,
}

#[derive(Clone, Copy, Debug)]
pub struct SessionSettings {
    pub win_target: usize,
    pub modal_delay: Duration,
    pub sound_enabled: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            win_target: 10,
            modal_delay: DEFAULT_MODAL_DELAY,
            sound_enabled: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Answered,
    Skipped,
    Revealed,
}

#[derive(Clone, Copy, Debug)]
struct PendingModal {
    due: Instant,
    position: usize,
}

/// One player's run through a shuffled question bank.
///
/// Positions recorded in the answered/skipped/revealed sets are positions in
/// the question order, not bank indices. A position is in at most one set.
pub struct QuizSession {
    bank: QuestionBank,
    order: QuestionOrder,
    position: usize,
    input: String,
    score: u32,
    total_attempts: u32,
    answered: BTreeSet<usize>,
    skipped: BTreeSet<usize>,
    revealed: BTreeSet<usize>,
    revealed_flag: bool,
    phase: Phase,
    win_target: usize,
    modal_delay: Duration,
    sound_enabled: bool,
    pending_modal: Option<PendingModal>,
    rng: Box<dyn RngCore>,
    effects: Effects,
}

impl QuizSession {
    /// Start a session, resuming saved progress when it still fits `bank`.
    pub fn new(
        bank: QuestionBank,
        settings: SessionSettings,
        effects: Effects,
        mut rng: Box<dyn RngCore>,
    ) -> Self {
        let order = QuestionOrder::shuffled(bank.len(), rng.as_mut());
        let win_target = settings.win_target.clamp(1, bank.len().max(1));

        let mut session = Self {
            bank,
            order,
            position: 0,
            input: String::new(),
            score: 0,
            total_attempts: 0,
            answered: BTreeSet::new(),
            skipped: BTreeSet::new(),
            revealed: BTreeSet::new(),
            revealed_flag: false,
            phase: Phase::Welcome,
            win_target,
            modal_delay: settings.modal_delay,
            sound_enabled: settings.sound_enabled,
            pending_modal: None,
            rng,
            effects,
        };

        if let Some(snapshot) = session.effects.progress().load() {
            if session.hydrate(snapshot) {
                info!(
                    position = session.position,
                    score = session.score,
                    "Resumed saved progress"
                );
            } else {
                warn!("Saved progress does not fit the question bank, starting fresh");
            }
        }

        session
    }

    /// Apply a saved snapshot. Leaves the session untouched and returns false
    /// when the snapshot is inconsistent with the bank or already finished.
    fn hydrate(&mut self, snapshot: ProgressSnapshot) -> bool {
        let len = self.bank.len();
        let Some(order) = QuestionOrder::from_saved(snapshot.question_order, len) else {
            return false;
        };
        if snapshot.current_position >= len || snapshot.score as usize >= self.win_target {
            return false;
        }

        let answered: BTreeSet<usize> = snapshot
            .answered_questions
            .into_iter()
            .filter(|&p| p < len)
            .collect();
        let skipped: BTreeSet<usize> = snapshot
            .skipped_questions
            .into_iter()
            .filter(|&p| p < len && !answered.contains(&p))
            .collect();
        let revealed: BTreeSet<usize> = snapshot
            .revealed_questions
            .into_iter()
            .filter(|&p| p < len && !answered.contains(&p) && !skipped.contains(&p))
            .collect();

        self.order = order;
        self.position = snapshot.current_position;
        self.score = snapshot.score;
        self.total_attempts = snapshot.total_attempts;
        self.answered = answered;
        self.skipped = skipped;
        self.revealed = revealed;
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// 1-based question number shown to the player and sent to analytics.
    pub fn question_number(&self) -> usize {
        self.position + 1
    }

    pub fn total_questions(&self) -> usize {
        self.order.len()
    }

    pub fn order(&self) -> &QuestionOrder {
        &self.order
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.order
            .bank_index(self.position)
            .and_then(|idx| self.bank.get(idx))
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    pub fn answered(&self) -> &BTreeSet<usize> {
        &self.answered
    }

    pub fn skipped(&self) -> &BTreeSet<usize> {
        &self.skipped
    }

    pub fn revealed(&self) -> &BTreeSet<usize> {
        &self.revealed
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed_flag
    }

    pub fn win_target(&self) -> usize {
        self.win_target
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn has_pending_modal(&self) -> bool {
        self.pending_modal.is_some()
    }

    pub fn has_next(&self) -> bool {
        !self.order.is_last(self.position)
    }

    pub fn view(&self) -> Option<MergeView> {
        self.current_question()
            .map(|q| merge::merge(&q.initials, &q.answer, &self.input))
    }

    pub fn slot_count(&self) -> usize {
        self.current_question()
            .map(|q| merge::slot_count(&q.initials, &q.answer))
            .unwrap_or(0)
    }

    pub fn is_answered_correctly(&self) -> bool {
        self.view().is_some_and(|v| v.is_match)
    }

    /// Whether "next" makes sense: the answer matches or was revealed.
    pub fn can_advance(&self) -> bool {
        matches!(self.phase, Phase::Playing | Phase::Correct)
            && (self.revealed_flag || self.is_answered_correctly())
    }

    fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Playing | Phase::Correct)
    }

    pub fn dismiss_welcome(&mut self) {
        if self.phase != Phase::Welcome {
            return;
        }
        self.phase = Phase::Playing;
        self.play(SoundCue::Welcome);
        self.effects.track(TrackedEvent::QuizStart);
        info!(question = self.question_number(), "Quiz started");
        self.check_match();
    }

    /// Replace the input buffer and score the question if it now matches.
    pub fn submit_input(&mut self, text: &str) -> Transition {
        if self.phase != Phase::Playing {
            return Transition::None;
        }
        self.input = text.to_string();
        self.check_match()
    }

    /// Score the current question if its merged answer matches. Runs on every
    /// input change and whenever a question becomes current, so an answer with
    /// every slot prefilled scores without a keystroke.
    fn check_match(&mut self) -> Transition {
        if self.phase != Phase::Playing
            || self.revealed_flag
            || self.answered.contains(&self.position)
            || !self.is_answered_correctly()
        {
            return Transition::None;
        }

        self.score += 1;
        self.total_attempts += 1;
        self.mark(Mark::Answered);
        info!(
            question = self.question_number(),
            score = self.score,
            "Answer correct"
        );

        if self.score as usize >= self.win_target {
            self.play(SoundCue::CorrectFinal);
            self.effects.track(TrackedEvent::QuizComplete {
                score: self.score,
                attempts: self.total_attempts,
            });
            self.finish();
            return Transition::Completed;
        }

        self.play(SoundCue::CorrectIndividual);
        self.effects.track(TrackedEvent::QuestionAnswered {
            number: self.question_number(),
            correct: true,
            attempts: 1,
        });
        self.pending_modal = Some(PendingModal {
            due: Instant::now() + self.modal_delay,
            position: self.position,
        });
        self.save();
        Transition::Scored
    }

    /// Fire the delayed correct modal once its deadline passes. Returns true
    /// when the modal opened. A timer left over from an earlier question or a
    /// finished quiz is dropped without effect.
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        let Some(pending) = self.pending_modal else {
            return false;
        };
        if now < pending.due {
            return false;
        }
        self.pending_modal = None;

        let current = pending.position == self.position;
        if self.phase == Phase::Playing && current && !self.revealed_flag {
            self.phase = Phase::Correct;
            return true;
        }
        false
    }

    /// Move past the current question, or to the results when none remain.
    pub fn advance(&mut self) {
        if !self.is_active() {
            return;
        }
        self.leave_question();
        self.move_next();
    }

    pub fn skip(&mut self) {
        if !self.is_active() || self.revealed_flag {
            return;
        }
        if self.answered.contains(&self.position) {
            // Nothing left to skip; treat it as moving on.
            self.advance();
            return;
        }

        self.play(SoundCue::Skip);
        self.effects.track(TrackedEvent::QuestionSkipped {
            number: self.question_number(),
        });
        self.total_attempts += 1;
        self.mark(Mark::Skipped);
        debug!(question = self.question_number(), "Question skipped");

        self.leave_question();
        self.move_next();
    }

    /// Show the answer by filling the input with exactly the letters the
    /// player would have had to type. Revealed questions never score.
    pub fn reveal(&mut self) {
        if !self.is_active() || self.revealed_flag || self.answered.contains(&self.position) {
            return;
        }

        self.play(SoundCue::Reveal);
        self.effects.track(TrackedEvent::QuestionRevealed {
            number: self.question_number(),
        });
        self.mark(Mark::Revealed);
        self.revealed_flag = true;
        self.phase = Phase::Playing;
        self.pending_modal = None;
        self.total_attempts += 1;

        self.input = self
            .current_question()
            .map(|q| merge::fill_tail(&q.initials, &q.answer))
            .unwrap_or_default();
        debug!(question = self.question_number(), "Answer revealed");
        self.save();
    }

    /// Start over on a freshly shuffled order.
    pub fn reset(&mut self) {
        self.effects.track(TrackedEvent::QuizReset);

        self.score = 0;
        self.total_attempts = 0;
        self.answered.clear();
        self.skipped.clear();
        self.revealed.clear();
        self.input.clear();
        self.revealed_flag = false;
        self.pending_modal = None;
        self.order = QuestionOrder::shuffled(self.bank.len(), self.rng.as_mut());
        self.position = 0;
        self.effects.progress_mut().clear();
        self.phase = Phase::Playing;
        info!("Quiz reset");
        self.check_match();
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.effects.track(TrackedEvent::SoundToggled {
            enabled: self.sound_enabled,
        });
        self.sound_enabled
    }

    pub fn summary(&self) -> QuizSummary {
        QuizSummary::new(
            self.score,
            self.win_target,
            self.total_attempts,
            self.skipped.len() + self.revealed.len(),
        )
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            current_position: self.position,
            score: self.score,
            answered_questions: self.answered.iter().copied().collect(),
            skipped_questions: self.skipped.iter().copied().collect(),
            revealed_questions: self.revealed.iter().copied().collect(),
            question_order: self.order.as_slice().to_vec(),
            total_attempts: self.total_attempts,
        }
    }

    fn mark(&mut self, mark: Mark) {
        let pos = self.position;
        self.answered.remove(&pos);
        self.skipped.remove(&pos);
        self.revealed.remove(&pos);
        match mark {
            Mark::Answered => self.answered.insert(pos),
            Mark::Skipped => self.skipped.insert(pos),
            Mark::Revealed => self.revealed.insert(pos),
        };
    }

    fn leave_question(&mut self) {
        self.input.clear();
        self.revealed_flag = false;
        self.pending_modal = None;
        self.phase = Phase::Playing;
    }

    fn move_next(&mut self) {
        if self.has_next() {
            self.position += 1;
            debug!(question = self.question_number(), "Next question");
            self.save();
            self.check_match();
        } else {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.phase = Phase::Results;
        self.pending_modal = None;
        self.effects.progress_mut().clear();
        info!(
            score = self.score,
            attempts = self.total_attempts,
            "Quiz finished"
        );
    }

    fn save(&mut self) {
        let snapshot = self.snapshot();
        self.effects.progress_mut().save(&snapshot);
    }

    fn play(&mut self, cue: SoundCue) {
        if self.sound_enabled {
            self.effects.play(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{Result, bail};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::effects::analytics::AnalyticsPort;
    use crate::effects::audio::AudioPort;
    use crate::store::KeyValueStore;
    use crate::store::memory::MemoryStore;
    use crate::store::progress::ProgressKeeper;
    use crate::store::schema::PROGRESS_KEY;

    #[derive(Clone, Default)]
    struct Recorder {
        cues: Rc<RefCell<Vec<SoundCue>>>,
        events: Rc<RefCell<Vec<TrackedEvent>>>,
    }

    struct RecordingAudio(Recorder);
    struct RecordingAnalytics(Recorder);

    impl AudioPort for RecordingAudio {
        fn play(&mut self, cue: SoundCue) -> Result<()> {
            self.0.cues.borrow_mut().push(cue);
            Ok(())
        }
    }

    impl AnalyticsPort for RecordingAnalytics {
        fn track(&mut self, event: &TrackedEvent) -> Result<()> {
            self.0.events.borrow_mut().push(event.clone());
            Ok(())
        }
    }

    struct FailingAudio;

    impl AudioPort for FailingAudio {
        fn play(&mut self, _cue: SoundCue) -> Result<()> {
            bail!("no speakers")
        }
    }

    fn question(initials: &str, answer: &str) -> Question {
        Question {
            question: format!("clue for {answer}"),
            initials: initials.to_string(),
            answer: answer.to_string(),
            sound: None,
            series: None,
            episode: None,
            date: None,
        }
    }

    fn bank() -> QuestionBank {
        QuestionBank::new(vec![
            question("WY", "will young"),
            question("DD", "duran duran"),
            question("M", "madness"),
        ])
        .unwrap()
    }

    fn settings(win_target: usize) -> SessionSettings {
        SessionSettings {
            win_target,
            modal_delay: Duration::from_millis(500),
            sound_enabled: true,
        }
    }

    fn session_with(store: MemoryStore, win_target: usize) -> (QuizSession, Recorder) {
        session_for(bank(), store, win_target)
    }

    fn session_for(
        bank: QuestionBank,
        store: MemoryStore,
        win_target: usize,
    ) -> (QuizSession, Recorder) {
        let recorder = Recorder::default();
        let effects = Effects::new(
            Box::new(RecordingAudio(recorder.clone())),
            Box::new(RecordingAnalytics(recorder.clone())),
            ProgressKeeper::new(Box::new(store)),
        );
        let session = QuizSession::new(
            bank,
            settings(win_target),
            effects,
            Box::new(StdRng::seed_from_u64(11)),
        );
        (session, recorder)
    }

    fn playing(win_target: usize) -> (QuizSession, Recorder, MemoryStore) {
        let store = MemoryStore::new();
        let (mut session, recorder) = session_with(store.clone(), win_target);
        session.dismiss_welcome();
        (session, recorder, store)
    }

    fn answer_current(session: &mut QuizSession) -> Transition {
        let q = session.current_question().unwrap().clone();
        session.submit_input(&merge::fill_tail(&q.initials, &q.answer))
    }

    #[test]
    fn test_starts_in_welcome_and_blocks_input() {
        let (mut session, recorder) = session_with(MemoryStore::new(), 3);
        assert_eq!(session.phase(), Phase::Welcome);
        assert_eq!(answer_current(&mut session), Transition::None);
        assert_eq!(session.score(), 0);

        session.dismiss_welcome();
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(*recorder.cues.borrow(), [SoundCue::Welcome]);
        assert_eq!(*recorder.events.borrow(), [TrackedEvent::QuizStart]);
    }

    #[test]
    fn test_scoring_event_updates_state_and_persists() {
        let (mut session, recorder, store) = playing(3);
        assert_eq!(answer_current(&mut session), Transition::Scored);
        assert_eq!(session.score(), 1);
        assert_eq!(session.total_attempts(), 1);
        assert!(session.answered().contains(&0));
        assert!(session.has_pending_modal());
        assert!(store.contains(PROGRESS_KEY));
        assert_eq!(
            recorder.cues.borrow().last(),
            Some(&SoundCue::CorrectIndividual)
        );
        assert_eq!(
            recorder.events.borrow().last(),
            Some(&TrackedEvent::QuestionAnswered {
                number: 1,
                correct: true,
                attempts: 1
            })
        );
    }

    #[test]
    fn test_repeated_submit_scores_once() {
        let (mut session, _recorder, _store) = playing(3);
        let input = {
            let q = session.current_question().unwrap();
            merge::fill_tail(&q.initials, &q.answer)
        };
        assert_eq!(session.submit_input(&input), Transition::Scored);
        assert_eq!(session.submit_input(&input), Transition::None);
        session.submit_input("");
        assert_eq!(session.submit_input(&input), Transition::None);
        assert_eq!(session.score(), 1);
        assert_eq!(session.total_attempts(), 1);
    }

    #[test]
    fn test_wrong_input_does_not_score() {
        let (mut session, recorder, _store) = playing(3);
        assert_eq!(session.submit_input("zzzzzzzzzzzz"), Transition::None);
        assert_eq!(session.score(), 0);
        assert_eq!(recorder.cues.borrow().len(), 1);
    }

    #[test]
    fn test_correct_modal_opens_after_delay() {
        let (mut session, _recorder, _store) = playing(3);
        let before = Instant::now();
        answer_current(&mut session);

        assert!(!session.poll_timers(before));
        assert_eq!(session.phase(), Phase::Playing);
        assert!(session.poll_timers(Instant::now() + Duration::from_secs(1)));
        assert_eq!(session.phase(), Phase::Correct);
        assert!(!session.has_pending_modal());
    }

    #[test]
    fn test_advance_cancels_pending_modal() {
        let (mut session, _recorder, _store) = playing(3);
        answer_current(&mut session);
        session.advance();
        assert_eq!(session.position(), 1);
        assert!(!session.poll_timers(Instant::now() + Duration::from_secs(1)));
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn test_win_target_completes_and_clears_progress() {
        let (mut session, recorder, store) = playing(1);
        assert_eq!(answer_current(&mut session), Transition::Completed);
        assert_eq!(session.phase(), Phase::Results);
        assert!(!store.contains(PROGRESS_KEY));
        assert!(!session.has_pending_modal());
        assert_eq!(recorder.cues.borrow().last(), Some(&SoundCue::CorrectFinal));
        assert_eq!(
            recorder.events.borrow().last(),
            Some(&TrackedEvent::QuizComplete {
                score: 1,
                attempts: 1
            })
        );
    }

    #[test]
    fn test_win_target_clamped_to_bank_size() {
        let (session, _recorder) = session_with(MemoryStore::new(), 99);
        assert_eq!(session.win_target(), 3);
        let (session, _recorder) = session_with(MemoryStore::new(), 0);
        assert_eq!(session.win_target(), 1);
    }

    #[test]
    fn test_reveal_fills_input_without_scoring() {
        let (mut session, recorder, _store) = playing(3);
        session.reveal();
        assert!(session.is_revealed());
        assert!(session.is_answered_correctly());
        assert_eq!(session.score(), 0);
        assert_eq!(session.total_attempts(), 1);
        assert!(session.revealed().contains(&0));
        assert!(session.can_advance());
        assert_eq!(recorder.cues.borrow().last(), Some(&SoundCue::Reveal));

        let input = session.input().to_string();
        assert_eq!(session.submit_input(&input), Transition::None);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_skip_and_reveal_are_noops_after_reveal() {
        let (mut session, _recorder, _store) = playing(3);
        session.reveal();
        let snapshot = session.snapshot();
        session.reveal();
        session.skip();
        assert_eq!(session.snapshot(), snapshot);
        assert_eq!(session.position(), 0);
        assert_eq!(session.total_attempts(), 1);
    }

    #[test]
    fn test_skip_moves_on_and_counts_attempt() {
        let (mut session, recorder, store) = playing(3);
        session.submit_input("abc");
        session.skip();
        assert_eq!(session.position(), 1);
        assert_eq!(session.input(), "");
        assert_eq!(session.total_attempts(), 1);
        assert!(session.skipped().contains(&0));
        assert!(store.contains(PROGRESS_KEY));
        assert_eq!(
            recorder.events.borrow().last(),
            Some(&TrackedEvent::QuestionSkipped { number: 1 })
        );
    }

    #[test]
    fn test_skip_after_answer_only_advances() {
        let (mut session, _recorder, _store) = playing(3);
        answer_current(&mut session);
        session.skip();
        assert_eq!(session.position(), 1);
        assert_eq!(session.total_attempts(), 1);
        assert!(session.skipped().is_empty());
        assert!(session.answered().contains(&0));
    }

    #[test]
    fn test_reveal_after_answer_is_noop() {
        let (mut session, _recorder, _store) = playing(3);
        answer_current(&mut session);
        session.reveal();
        assert!(!session.is_revealed());
        assert!(session.revealed().is_empty());
    }

    #[test]
    fn test_exhausting_questions_reaches_results() {
        let (mut session, _recorder, store) = playing(3);
        session.skip();
        session.reveal();
        session.advance();
        assert_eq!(session.position(), 2);
        session.skip();
        assert_eq!(session.phase(), Phase::Results);
        assert!(!store.contains(PROGRESS_KEY));

        let summary = session.summary();
        assert_eq!(summary.score, 0);
        assert_eq!(summary.skipped_or_revealed, 3);
        assert!(!summary.won);
    }

    #[test]
    fn test_advance_on_last_question_ends_short_of_target() {
        let (mut session, _recorder, store) = playing(3);
        session.skip();
        session.skip();
        assert_eq!(session.position(), 2);
        assert_eq!(answer_current(&mut session), Transition::Scored);
        assert!(store.contains(PROGRESS_KEY));

        session.advance();
        assert_eq!(session.phase(), Phase::Results);
        assert!(!store.contains(PROGRESS_KEY));
        assert!(!session.has_pending_modal());
        let summary = session.summary();
        assert_eq!(summary.score, 1);
        assert!(!summary.won);
    }

    #[test]
    fn test_fully_prefilled_answers_score_when_shown() {
        let bank = QuestionBank::new(vec![question("X", "x"), question("Y", "y")]).unwrap();
        let store = MemoryStore::new();
        let (mut session, recorder) = session_for(bank, store.clone(), 2);

        session.dismiss_welcome();
        assert_eq!(session.score(), 1);
        assert!(session.answered().contains(&0));
        assert!(session.has_pending_modal());

        // Typing has nowhere to go and must not score a second time.
        assert_eq!(session.submit_input("x"), Transition::None);
        assert_eq!(session.score(), 1);

        session.advance();
        assert_eq!(session.score(), 2);
        assert_eq!(session.phase(), Phase::Results);
        assert!(session.summary().won);
        assert!(!store.contains(PROGRESS_KEY));
        assert_eq!(recorder.cues.borrow().last(), Some(&SoundCue::CorrectFinal));
    }

    #[test]
    fn test_reset_scores_prefilled_first_question() {
        let bank = QuestionBank::new(vec![question("X", "x"), question("Y", "y")]).unwrap();
        let (mut session, _recorder) = session_for(bank, MemoryStore::new(), 2);
        session.dismiss_welcome();
        session.reset();
        assert_eq!(session.score(), 1);
        assert_eq!(session.total_attempts(), 1);
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn test_operations_ignored_in_results() {
        let (mut session, _recorder, _store) = playing(1);
        answer_current(&mut session);
        let snapshot = session.snapshot();
        session.skip();
        session.reveal();
        session.advance();
        assert_eq!(session.submit_input("x"), Transition::None);
        assert_eq!(session.snapshot(), snapshot);
        assert_eq!(session.phase(), Phase::Results);
    }

    #[test]
    fn test_reset_starts_fresh() {
        let (mut session, recorder, store) = playing(3);
        answer_current(&mut session);
        session.advance();
        session.skip();

        session.reset();
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.position(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.total_attempts(), 0);
        assert!(session.answered().is_empty());
        assert!(session.skipped().is_empty());
        assert!(session.revealed().is_empty());
        assert_eq!(session.input(), "");
        assert!(!store.contains(PROGRESS_KEY));
        assert_eq!(
            recorder.events.borrow().last(),
            Some(&TrackedEvent::QuizReset)
        );
    }

    #[test]
    fn test_resumes_saved_progress() {
        let store = MemoryStore::new();
        {
            let (mut session, _recorder) = session_with(store.clone(), 3);
            session.dismiss_welcome();
            answer_current(&mut session);
            session.advance();
        }

        let (session, _recorder) = session_with(store, 3);
        assert_eq!(session.phase(), Phase::Welcome);
        assert_eq!(session.position(), 1);
        assert_eq!(session.score(), 1);
        assert_eq!(session.input(), "");
        assert!(session.answered().contains(&0));
    }

    #[test]
    fn test_inconsistent_snapshot_ignored() {
        let mut store = MemoryStore::new();
        let stale = ProgressSnapshot {
            current_position: 1,
            score: 1,
            question_order: vec![0, 1, 2, 3],
            ..ProgressSnapshot::default()
        };
        store
            .set(PROGRESS_KEY, &serde_json::to_string(&stale).unwrap())
            .unwrap();

        let (session, _recorder) = session_with(store, 3);
        assert_eq!(session.position(), 0);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_hydrate_enforces_exclusive_sets() {
        let mut store = MemoryStore::new();
        let snapshot = ProgressSnapshot {
            current_position: 2,
            score: 1,
            answered_questions: vec![0],
            skipped_questions: vec![0, 1],
            revealed_questions: vec![1, 7],
            question_order: vec![2, 0, 1],
            total_attempts: 3,
        };
        store
            .set(PROGRESS_KEY, &serde_json::to_string(&snapshot).unwrap())
            .unwrap();

        let (session, _recorder) = session_with(store, 3);
        assert_eq!(session.order().as_slice(), &[2, 0, 1]);
        assert_eq!(session.answered().iter().copied().collect::<Vec<_>>(), [0]);
        assert_eq!(session.skipped().iter().copied().collect::<Vec<_>>(), [1]);
        assert!(session.revealed().is_empty());
    }

    #[test]
    fn test_muted_session_requests_no_audio() {
        let (mut session, recorder, _store) = playing(3);
        assert!(!session.toggle_sound());
        session.skip();
        assert_eq!(*recorder.cues.borrow(), [SoundCue::Welcome]);
        assert!(
            recorder
                .events
                .borrow()
                .contains(&TrackedEvent::SoundToggled { enabled: false })
        );
    }

    #[test]
    fn test_audio_failure_does_not_change_outcome() {
        let effects = Effects::new(
            Box::new(FailingAudio),
            Box::new(crate::effects::analytics::NullAnalytics),
            ProgressKeeper::new(Box::new(MemoryStore::new())),
        );
        let mut session = QuizSession::new(
            bank(),
            settings(3),
            effects,
            Box::new(StdRng::seed_from_u64(5)),
        );
        session.dismiss_welcome();
        assert_eq!(answer_current(&mut session), Transition::Scored);
        assert_eq!(session.score(), 1);
    }
}

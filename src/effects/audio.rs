use std::io::Write;

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Named sound groups the quiz asks for. Playback is resolved elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    CorrectIndividual,
    CorrectFinal,
    Skip,
    Reveal,
    Welcome,
}

impl SoundCue {
    pub const ALL: [SoundCue; 5] = [
        SoundCue::CorrectIndividual,
        SoundCue::CorrectFinal,
        SoundCue::Skip,
        SoundCue::Reveal,
        SoundCue::Welcome,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SoundCue::CorrectIndividual => "correct-individual",
            SoundCue::CorrectFinal => "correct-final",
            SoundCue::Skip => "skip",
            SoundCue::Reveal => "reveal",
            SoundCue::Welcome => "welcome",
        }
    }

    fn group(self) -> (&'static str, &'static [&'static str]) {
        match self {
            SoundCue::CorrectIndividual => ("correct", &["correct.mp3"]),
            SoundCue::CorrectFinal => ("correct", &["karl-hehey.mp3"]),
            SoundCue::Skip => (
                "skip",
                &[
                    "karl-what.mp3",
                    "karl-lot-words.mp3",
                    "karl-dont-wanna-know.mp3",
                    "karl-ildas-dead.mp3",
                ],
            ),
            SoundCue::Reveal => (
                "reveal",
                &[
                    "karl-whats-that.mp3",
                    "karl-err.mp3",
                    "karl-look-at-it.mp3",
                    "karl-its-awkward.mp3",
                    "karl-who-are-you.mp3",
                ],
            ),
            SoundCue::Welcome => ("welcome", &["karl-alright.mp3"]),
        }
    }
}

/// Fire-and-forget audio. Errors are reported but never acted on by the quiz.
pub trait AudioPort {
    fn play(&mut self, cue: SoundCue) -> Result<()>;
}

/// Maps cues to asset paths, picking at random inside multi-clip groups.
pub struct SoundBoard {
    rng: SmallRng,
}

impl SoundBoard {
    pub fn new(rng: SmallRng) -> Self {
        Self { rng }
    }

    pub fn resolve(&mut self, cue: SoundCue) -> String {
        let (dir, clips) = cue.group();
        let clip = clips.choose(&mut self.rng).copied().unwrap_or(clips[0]);
        format!("sounds/{dir}/{clip}")
    }
}

/// Terminal stand-in for a speaker: resolves the clip, logs it and rings the bell.
pub struct TerminalBell<W: Write> {
    board: SoundBoard,
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(board: SoundBoard, out: W) -> Self {
        Self { board, out }
    }
}

impl<W: Write> AudioPort for TerminalBell<W> {
    fn play(&mut self, cue: SoundCue) -> Result<()> {
        let asset = self.board.resolve(cue);
        debug!(cue = cue.key(), %asset, "Sound cue");
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_cue_keys() {
        let keys: Vec<&str> = SoundCue::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(
            keys,
            ["correct-individual", "correct-final", "skip", "reveal", "welcome"]
        );
    }

    #[test]
    fn test_resolve_stays_inside_group() {
        let mut board = SoundBoard::new(SmallRng::seed_from_u64(3));
        for _ in 0..50 {
            let asset = board.resolve(SoundCue::Skip);
            assert!(asset.starts_with("sounds/skip/karl-"), "{asset}");
            let asset = board.resolve(SoundCue::Reveal);
            assert!(asset.starts_with("sounds/reveal/karl-"), "{asset}");
        }
        assert_eq!(
            board.resolve(SoundCue::Welcome),
            "sounds/welcome/karl-alright.mp3"
        );
    }

    #[test]
    fn test_terminal_bell_rings() {
        let board = SoundBoard::new(SmallRng::seed_from_u64(1));
        let mut bell = TerminalBell::new(board, Vec::new());
        bell.play(SoundCue::CorrectIndividual).unwrap();
        bell.play(SoundCue::Skip).unwrap();
        assert_eq!(bell.out, b"\x07\x07");
    }
}

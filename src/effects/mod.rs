pub mod analytics;
pub mod audio;

use tracing::warn;

use crate::effects::analytics::{AnalyticsPort, TrackedEvent};
use crate::effects::audio::{AudioPort, SoundCue};
use crate::store::progress::ProgressKeeper;

/// The side effects a quiz session drives. Every call is fire-and-forget:
/// failures are logged here and never reach session state.
pub struct Effects {
    audio: Box<dyn AudioPort>,
    analytics: Box<dyn AnalyticsPort>,
    progress: ProgressKeeper,
}

impl Effects {
    pub fn new(
        audio: Box<dyn AudioPort>,
        analytics: Box<dyn AnalyticsPort>,
        progress: ProgressKeeper,
    ) -> Self {
        Self {
            audio,
            analytics,
            progress,
        }
    }

    pub fn play(&mut self, cue: SoundCue) {
        if let Err(err) = self.audio.play(cue) {
            warn!(?err, cue = cue.key(), "Audio cue failed");
        }
    }

    pub fn track(&mut self, event: TrackedEvent) {
        if let Err(err) = self.analytics.track(&event) {
            warn!(?err, event = event.name(), "Event tracking failed");
        }
    }

    pub fn progress(&self) -> &ProgressKeeper {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressKeeper {
        &mut self.progress
    }
}

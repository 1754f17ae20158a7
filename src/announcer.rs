// src/announcer.rs
//
// Announcement gate: serializes spoken output so only one announcement
// is ever in flight. A two-state machine, Idle ⇄ Speaking, transitioned
// by exactly two events: a successful announce, and the completion (or
// cancellation) signal from the speech collaborator. There is no
// buffering state — a candidate arriving while Speaking is dropped, not
// retried.

use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::selector::Candidate;
use crate::types::HapticPattern;

/// If the speech collaborator has not signalled completion after this
/// long, something below us is stuck. The gate cannot recover on its
/// own (it must not invent completion events), so it logs the liveness
/// violation loudly.
const SPEECH_STALL_THRESHOLD: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpeechState {
    Idle,
    Speaking { since: Instant },
}

/// The side effect produced by a successful announce: text for the
/// speech collaborator and a pattern for the haptic collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementAction {
    pub label: String,
    pub text: String,
    pub haptic: HapticPattern,
}

pub struct AnnouncementGate {
    state: SpeechState,
}

impl AnnouncementGate {
    pub fn new() -> Self {
        Self {
            state: SpeechState::Idle,
        }
    }

    pub fn is_speaking(&self) -> bool {
        matches!(self.state, SpeechState::Speaking { .. })
    }

    /// Try to announce `candidate`. Returns `None` while a previous
    /// announcement is still playing; the candidate is lost (no queue,
    /// no backlog). On success the gate transitions to Speaking and the
    /// caller must stamp the tracker's announcement time for the
    /// returned label.
    pub fn try_announce(&mut self, candidate: &Candidate, now: Instant) -> Option<AnnouncementAction> {
        if let SpeechState::Speaking { since } = self.state {
            if now.saturating_duration_since(since) > SPEECH_STALL_THRESHOLD {
                error!(
                    label = %candidate.label,
                    stalled_secs = now.saturating_duration_since(since).as_secs(),
                    "speech collaborator never signalled completion; announcements are stuck"
                );
            } else {
                debug!(label = %candidate.label, "dropping candidate, still speaking");
            }
            return None;
        }

        let text = format!("Detected {} {}.", candidate.label, candidate.distance.text());
        let haptic = haptic_pattern_for(&candidate.label);

        info!(announcement = %text, ?haptic, "announcing");
        self.state = SpeechState::Speaking { since: now };

        Some(AnnouncementAction {
            label: candidate.label.clone(),
            text,
            haptic,
        })
    }

    /// Speech collaborator finished playing the utterance.
    pub fn speech_finished(&mut self) {
        debug!("speech finished, gate idle");
        self.state = SpeechState::Idle;
    }

    /// Speech collaborator cancelled the utterance. Same transition as
    /// completion — the gate only cares that the channel is free again.
    pub fn speech_cancelled(&mut self) {
        debug!("speech cancelled, gate idle");
        self.state = SpeechState::Idle;
    }
}

impl Default for AnnouncementGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Double pulse for labels a user most urgently wants flagged (people
/// and cats, substring match, case-insensitive), single pulse for
/// everything else.
pub fn haptic_pattern_for(label: &str) -> HapticPattern {
    let lower = label.to_lowercase();
    if lower.contains("person") || lower.contains("cat") {
        HapticPattern::DoublePulse
    } else {
        HapticPattern::SinglePulse
    }
}

//! Speech-capture state machine.
//!
//! The recognizer reports interim and final transcripts as events. Only final
//! transcripts are forwarded to the parser; cancelling a capture drops any
//! interim text on the floor.
//!
//! ```text
//! Idle --Start--> Listening --Stop--> Finalizing --Final/End--> Idle
//!                     |                    |
//!                     +------Cancel--------+-----> Idle
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    #[default]
    Idle,
    Listening,
    /// Stop requested; waiting for the recognizer's last final result.
    Finalizing,
}

/// Events delivered by the speech recognizer or the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum CaptureEvent {
    Start,
    Interim(String),
    Final(String),
    Stop,
    /// The recognizer closed the stream.
    End,
    Cancel,
}

/// Tracks capture state and decides which transcripts reach the parser.
#[derive(Debug, Clone, Default)]
pub struct CaptureMachine {
    state: CaptureState,
    interim: String,
}

impl CaptureMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Latest interim text, for display only.
    pub fn interim(&self) -> &str {
        &self.interim
    }

    /// Applies one event. Returns a transcript when one is finalized.
    pub fn handle(&mut self, event: CaptureEvent) -> Option<String> {
        use CaptureEvent::*;
        use CaptureState::*;

        match (self.state, event) {
            (_, Cancel) => {
                self.state = Idle;
                self.interim.clear();
                None
            }
            (Idle, Start) => {
                self.state = Listening;
                self.interim.clear();
                None
            }
            (Listening, Interim(text)) => {
                self.interim = text;
                None
            }
            (Listening, Final(text)) => {
                self.interim.clear();
                non_empty(text)
            }
            (Listening, Stop) => {
                self.state = Finalizing;
                None
            }
            (Finalizing, Final(text)) => {
                self.state = Idle;
                self.interim.clear();
                non_empty(text)
            }
            (Listening | Finalizing, End) => {
                self.state = Idle;
                self.interim.clear();
                None
            }
            _ => None,
        }
    }

    /// Feeds a sequence of events and returns every forwarded transcript in
    /// order.
    pub fn drain(&mut self, events: impl IntoIterator<Item = CaptureEvent>) -> Vec<String> {
        events
            .into_iter()
            .filter_map(|event| self.handle(event))
            .collect()
    }
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

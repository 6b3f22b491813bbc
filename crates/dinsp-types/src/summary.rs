use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::header::{FileHeader, KramersPairTable};

/// States of the integral block loop.
///
/// ```text
///                 non-sentinel block
///   AwaitingBlock ──────────────────▶ Accumulating
///     │    ▲                               │
///     │    └───────────────────────────────┘
///     │  sentinel            ┌──────────┐
///     ├────────────────────▶ │Terminated│ (success)
///     │  decode error/short  ├──────────┤
///     └────────────────────▶ │  Failed  │
///                            └──────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamState {
    #[default]
    AwaitingBlock,
    Accumulating,
    Terminated,
    Failed,
}

/// Inputs that drive [`StreamState`] transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    /// A non-sentinel block was decoded.
    Block,
    /// The end-of-stream record was decoded.
    Sentinel,
    /// The record could not be decoded.
    Failure,
    /// The block's contribution has been added to the totals.
    Accumulated,
}

impl StreamState {
    #[must_use]
    pub fn advance(self, event: StreamEvent) -> Self {
        match (self, event) {
            (Self::Terminated | Self::Failed, _) => self,
            (Self::Accumulating, _) => Self::AwaitingBlock,
            (Self::AwaitingBlock, StreamEvent::Block) => Self::Accumulating,
            (Self::AwaitingBlock, StreamEvent::Sentinel) => Self::Terminated,
            (Self::AwaitingBlock, StreamEvent::Failure) => Self::Failed,
            (Self::AwaitingBlock, StreamEvent::Accumulated) => Self::AwaitingBlock,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated | Self::Failed)
    }

    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Terminated
    }
}

/// What one parse session produced, complete or partial.
///
/// `total_non_zero_count` only ever includes fully decoded blocks: a
/// block whose record failed to decode contributes nothing.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParseSummary {
    pub header: Option<FileHeader>,
    pub kramers_pairs: KramersPairTable,
    pub total_non_zero_count: i64,
    /// Non-sentinel blocks consumed.
    pub blocks_read: u64,
    pub state: StreamState,
    #[serde(rename = "elapsed_seconds", serialize_with = "as_seconds")]
    pub elapsed: Duration,
}

impl ParseSummary {
    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Whether the block stream reached its sentinel.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.is_success()
    }
}

fn as_seconds<S: Serializer>(elapsed: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_transitions() {
        let s = StreamState::AwaitingBlock;
        let s = s.advance(StreamEvent::Block);
        assert_eq!(s, StreamState::Accumulating);
        let s = s.advance(StreamEvent::Accumulated);
        assert_eq!(s, StreamState::AwaitingBlock);
        assert_eq!(s.advance(StreamEvent::Sentinel), StreamState::Terminated);
        assert_eq!(s.advance(StreamEvent::Failure), StreamState::Failed);
    }

    #[test]
    fn terminal_states_absorb() {
        for terminal in [StreamState::Terminated, StreamState::Failed] {
            assert_eq!(terminal.advance(StreamEvent::Block), terminal);
            assert!(terminal.is_terminal());
        }
        assert!(StreamState::Terminated.is_success());
        assert!(!StreamState::Failed.is_success());
    }

    #[test]
    fn summary_serializes_seconds() {
        let summary = ParseSummary {
            total_non_zero_count: 5,
            elapsed: Duration::from_millis(1500),
            ..ParseSummary::default()
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["elapsed_seconds"], 1.5);
        assert_eq!(json["total_non_zero_count"], 5);
        assert_eq!(json["state"], "awaiting_block");
    }
}

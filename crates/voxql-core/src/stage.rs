//! Per-request pipeline state machine.
//!
//! ```text
//! received → transcribed → prompted → generated → extracted → executed → completed
//! ```
//!
//! Any stage may exit early with a failure; the failing stage is reported by
//! the pipeline error, not by a separate state. Nothing persists beyond one
//! request.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Audio accepted, nothing processed yet.
    Received,
    /// Transcript produced.
    Transcribed,
    /// Prompt composed from instructions, schema, and transcript.
    Prompted,
    /// LLM returned raw text.
    Generated,
    /// One SQL statement isolated from the LLM text.
    Extracted,
    /// Statement executed against a fresh table snapshot.
    Executed,
    /// Response assembled.
    Completed,
}

impl Stage {
    /// Valid next state from the current one.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::Transcribed),
            Self::Transcribed => Some(Self::Prompted),
            Self::Prompted => Some(Self::Generated),
            Self::Generated => Some(Self::Extracted),
            Self::Extracted => Some(Self::Executed),
            Self::Executed => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Whether moving from `self` to `to` is a legal transition.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        self.next() == Some(to)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Transcribed => "transcribed",
            Self::Prompted => "prompted",
            Self::Generated => "generated",
            Self::Extracted => "extracted",
            Self::Executed => "executed",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

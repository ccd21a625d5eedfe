//! Marker-based classification of captured device output.
//!
//! IOS gives no status codes. Whether a `copy` worked or an `enable` was
//! refused is decided by looking for literal substrings anywhere in what the
//! terminal printed. Classification here is a pure function of the text and
//! a [`MarkerSet`].

use memchr::memmem;
use serde::{Deserialize, Serialize};

/// Result of classifying a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    AuthenticationFailed,
    ConnectionFailed,
    EnableDenied,
    CommandError,
    /// Neither a success nor a failure marker was present.
    Unknown,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

/// Which list a matched marker came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Success,
    Failure,
}

/// The marker that decided a classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch {
    pub kind: MarkerKind,
    pub marker: String,
    /// Byte offset of the marker in the classified text.
    pub offset: usize,
}

/// Success and failure markers for one command idiom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSet {
    pub success: Vec<String>,
    pub failure: Vec<String>,

    /// Outcome reported when a failure marker matches.
    pub failure_outcome: Outcome,
}

impl MarkerSet {
    /// Create an empty marker set whose failures classify as [`Outcome::CommandError`].
    pub fn new() -> Self {
        Self {
            success: Vec::new(),
            failure: Vec::new(),
            failure_outcome: Outcome::CommandError,
        }
    }

    /// Add a success marker.
    pub fn with_success(mut self, marker: impl Into<String>) -> Self {
        self.success.push(marker.into());
        self
    }

    /// Add a failure marker.
    pub fn with_failure(mut self, marker: impl Into<String>) -> Self {
        self.failure.push(marker.into());
        self
    }

    /// Set the outcome reported for failure markers.
    pub fn with_failure_outcome(mut self, outcome: Outcome) -> Self {
        self.failure_outcome = outcome;
        self
    }

    /// Find the deciding marker in `text`.
    ///
    /// The earliest occurrence wins. At equal offsets failure markers take
    /// precedence, then list order.
    pub fn find(&self, text: &str) -> Option<MarkerMatch> {
        let haystack = text.as_bytes();
        let failures = self.failure.iter().map(|m| (MarkerKind::Failure, m));
        let successes = self.success.iter().map(|m| (MarkerKind::Success, m));

        let mut best: Option<MarkerMatch> = None;
        for (kind, marker) in failures.chain(successes) {
            if marker.is_empty() {
                continue;
            }
            if let Some(offset) = memmem::find(haystack, marker.as_bytes()) {
                if best.as_ref().is_none_or(|b| offset < b.offset) {
                    best = Some(MarkerMatch {
                        kind,
                        marker: marker.clone(),
                        offset,
                    });
                }
            }
        }
        best
    }

    /// Classify `text` against this set.
    pub fn classify(&self, text: &str) -> Outcome {
        match self.find(text) {
            Some(MarkerMatch {
                kind: MarkerKind::Failure,
                ..
            }) => self.failure_outcome,
            Some(MarkerMatch {
                kind: MarkerKind::Success,
                ..
            }) => Outcome::Success,
            None => Outcome::Unknown,
        }
    }
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify `text` against ad-hoc marker lists.
///
/// Failure markers classify as [`Outcome::CommandError`].
pub fn classify(text: &str, success: &[&str], failure: &[&str]) -> Outcome {
    let set = MarkerSet {
        success: success.iter().map(|s| s.to_string()).collect(),
        failure: failure.iter().map(|s| s.to_string()).collect(),
        failure_outcome: Outcome::CommandError,
    };
    set.classify(text)
}

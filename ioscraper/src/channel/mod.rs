//! Channel layer: pacing, output cleanup and marker classification.
//!
//! This module sits between the raw shell transport and the session state
//! machine. Nothing here knows about privilege levels or IOS commands.

pub mod markers;
mod normalize;
mod pacer;

pub use markers::{MarkerKind, MarkerMatch, MarkerSet, Outcome, classify};
pub use normalize::{normalize_output, strip_control};
pub use pacer::{Pacer, PacingConfig, PacingMode, REDACTED, WIRE_TARGET};

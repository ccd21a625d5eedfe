//! Cisco IOS platform definition.
//!
//! IOS exec shells expose two prompts the session cares about:
//!
//! ```text
//! isr-2911-a>                        # user EXEC, privilege 1
//! isr-2911-a#                        # privileged EXEC, privilege 15
//! ```
//!
//! Outcomes of `enable` and `copy` are judged by literal markers in what the
//! device prints back.

use crate::channel::{MarkerSet, Outcome};
use crate::platform::PlatformDefinition;

/// Name of the IOS platform definition.
pub const PLATFORM_NAME: &str = "cisco_ios";

/// Default destination for `copy running-config`.
pub const STARTUP_CONFIG: &str = "startup-config";

/// Printed by a successful `copy running-config ...`.
pub const COPY_SUCCESS_MARKERS: &[&str] = &["[OK]", "bytes copied"];

/// Printed when `copy <source> running-config` fails.
pub const COPY_ERROR_MARKERS: &[&str] = &["Error opening", "Invalid input"];

/// Printed by `enable` when it wants the secret, again after a wrong one.
pub const SECRET_PROMPT: &str = "Password:";

/// Times IOS asks for the enable secret before giving up with `% Bad secrets`.
pub const SECRET_ATTEMPTS: usize = 3;

/// Printed when the enable secret is refused.
pub const ENABLE_DENIED_MARKERS: &[&str] = &["Access denied", "Bad secrets"];

/// Generic IOS command errors.
pub const COMMAND_ERROR_MARKERS: &[&str] = &[
    "% Invalid input",
    "% Incomplete command",
    "% Ambiguous command",
    "% Unknown command",
    "Error opening",
];

fn failures(markers: &[&str], outcome: Outcome) -> MarkerSet {
    markers
        .iter()
        .fold(MarkerSet::new(), |set, m| set.with_failure(*m))
        .with_failure_outcome(outcome)
}

/// Create the Cisco IOS platform definition.
pub fn platform() -> PlatformDefinition {
    let save = COPY_SUCCESS_MARKERS
        .iter()
        .fold(MarkerSet::new(), |set, m| set.with_success(*m));

    PlatformDefinition::new(PLATFORM_NAME)
        .with_terminal(512, 0)
        .with_enable_command("enable")
        .with_secret_prompt(SECRET_PROMPT)
        .with_enable_markers(failures(ENABLE_DENIED_MARKERS, Outcome::EnableDenied))
        .with_save_markers(save)
        .with_update_markers(failures(COPY_ERROR_MARKERS, Outcome::CommandError))
        .with_command_markers(failures(COMMAND_ERROR_MARKERS, Outcome::CommandError))
}

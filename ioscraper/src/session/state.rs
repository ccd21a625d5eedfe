//! Session lifecycle states.

use std::fmt;

use serde::Serialize;

/// Where a session is in its login → command → logoff lifecycle.
///
/// ```text
/// Disconnected → Connecting → BannersCleared → TerminalConfigured
///     → PrivilegeKnown → Ready ⇄ Escalating
///                        Ready ⇄ CommandLoop
///     → Disconnected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SessionState {
    Disconnected,
    Connecting,
    BannersCleared,
    TerminalConfigured,
    PrivilegeKnown,
    Escalating,
    Ready,
    CommandLoop,
}

impl SessionState {
    /// Whether a shell channel is held in this state.
    pub fn has_channel(self) -> bool {
        !matches!(self, SessionState::Disconnected | SessionState::Connecting)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting => "connecting",
            SessionState::BannersCleared => "banners-cleared",
            SessionState::TerminalConfigured => "terminal-configured",
            SessionState::PrivilegeKnown => "privilege-known",
            SessionState::Escalating => "escalating",
            SessionState::Ready => "ready",
            SessionState::CommandLoop => "command-loop",
        };
        f.write_str(name)
    }
}

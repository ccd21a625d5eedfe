//! # ioscraper
//!
//! Async SSH session manager for Cisco IOS exec shells.
//!
//! IOS offers no framed command protocol over SSH, only an interactive
//! terminal. ioscraper paces every command, drains whatever the device
//! printed, and classifies the output against known success and error
//! markers.
//!
//! ## Features
//!
//! - Async SSH connections via russh
//! - Fixed or adaptive command pacing
//! - Prompt-based privilege detection and `enable` escalation
//! - Marker-classified `copy` operations for saving and updating configuration
//! - Secret redaction in wire logs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ioscraper::SessionBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ioscraper::Error> {
//!     let mut session = SessionBuilder::new("192.168.1.1")
//!         .username("admin")
//!         .password("secret")
//!         .enable_secret("enable-secret")
//!         .build()?;
//!
//!     session.login().await?;
//!     session.escalate().await?;
//!
//!     for transcript in session.run_commands(&["show version", "show clock"]).await? {
//!         println!("{}", transcript);
//!     }
//!
//!     session.logoff().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
pub mod platform;
pub mod session;
pub mod transport;

// Re-export main types for convenience
pub use channel::{Outcome, PacingConfig, PacingMode};
pub use error::{Error, ErrorKind, Result};
pub use platform::{PlatformDefinition, PrivilegeLevel};
pub use session::{
    InstallReport, InstallStep, Session, SessionBuilder, SessionConfig, SessionState, Transcript,
};
pub use transport::{AuthMethod, Connector, HostKeyVerification, ShellChannel, SshConfig};

/// Log in to `host` over SSH with a password and default settings.
///
/// Shorthand for [`SessionBuilder`] followed by [`Session::login`].
pub async fn login(host: &str, username: &str, password: &str) -> Result<Session> {
    let mut session = SessionBuilder::new(host)
        .username(username)
        .password(password)
        .build()?;
    session.login().await?;
    Ok(session)
}

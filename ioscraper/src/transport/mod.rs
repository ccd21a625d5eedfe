//! SSH transport layer.
//!
//! The session only needs an interactive shell it can write bytes to and
//! drain bytes from. [`Connector`] and [`ShellChannel`] describe that seam;
//! [`SshConnector`] provides it over russh.

pub mod config;
mod ssh;

use std::future::Future;

pub use config::{AuthMethod, DEFAULT_CONNECT_TIMEOUT, HostKeyVerification, SshConfig};
pub use ssh::{SshConnector, SshShell};

use crate::error::Result;

/// Opens authenticated interactive shells.
pub trait Connector: Send + Sync {
    /// The shell channel produced on success.
    type Channel: ShellChannel;

    /// Connect, authenticate and open a PTY shell.
    ///
    /// Failures must keep authentication, network and protocol causes apart.
    /// The caller bounds the whole call with [`SshConfig::timeout`].
    fn connect(&self, config: &SshConfig) -> impl Future<Output = Result<Self::Channel>> + Send;
}

/// A live interactive shell with no framing beyond raw bytes.
pub trait ShellChannel: Send {
    /// Write bytes to the remote terminal.
    fn send(&mut self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Return every byte currently buffered without waiting for more.
    ///
    /// Returns an empty vector when nothing is pending. A remote close with no
    /// pending data is an error.
    fn drain(&mut self) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Close the shell and the connection behind it.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Whether the shell is known to be closed.
    fn is_closed(&self) -> bool;
}

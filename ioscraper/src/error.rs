//! Error types for ioscraper.

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::session::InstallStep;

/// Main error type for ioscraper operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Shell channel errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Session-level errors (privilege, command classification)
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to reach the host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host is not in known_hosts and verification is strict
    #[error("Unknown host key for {host}:{port}")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Connection was closed unexpectedly
    #[error("Connection disconnected")]
    Disconnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Shell channel errors.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Failed to open PTY channel
    #[error("Failed to open PTY channel")]
    PtyOpenFailed,

    /// Failed to request shell
    #[error("Failed to request shell")]
    ShellRequestFailed,

    /// Channel closed by the remote end
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),
}

/// Session errors: usage mistakes and classified device output.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Session not logged in
    #[error("Session not connected - call login() first")]
    NotConnected,

    /// Session already logged in
    #[error("Session already connected")]
    AlreadyConnected,

    /// The device refused the enable secret
    #[error("Enable mode denied on '{hostname}' ({marker})")]
    EnableDenied { hostname: String, marker: String },

    /// The device answered with a known error marker
    #[error("Command '{command}' failed: {marker}")]
    CommandFailed {
        command: String,
        marker: String,
        output: String,
    },

    /// Neither a success nor a failure marker was found where success
    /// must be confirmed explicitly
    #[error("Command '{command}' produced no recognized result")]
    Unclassified { command: String, output: String },

    /// A step of the backup/update/save workflow failed
    #[error("{step}")]
    InstallFailed {
        step: InstallStep,
        backup_file: Option<String>,
        #[source]
        source: Box<Error>,
    },

    /// Invalid configuration in the session builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Coarse error taxonomy callers switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad credentials or a rejected host key.
    Authentication,
    /// Unreachable host, timeout, SSH protocol failure, or a dropped session.
    Connection,
    /// The enable secret was refused.
    EnableDenied,
    /// The device reported an error marker.
    Command,
    /// Output matched no marker where a success marker was required.
    Unclassified,
    /// The API was used out of order or misconfigured.
    Usage,
}

impl Error {
    /// Classify this error into the coarse [`ErrorKind`] taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(TransportError::AuthenticationFailed { .. })
            | Error::Transport(TransportError::Key(_))
            | Error::Transport(TransportError::HostKeyUnknown { .. })
            | Error::Transport(TransportError::HostKeyChanged { .. }) => ErrorKind::Authentication,
            Error::Transport(_) | Error::Channel(_) => ErrorKind::Connection,
            Error::Session(SessionError::EnableDenied { .. }) => ErrorKind::EnableDenied,
            Error::Session(SessionError::CommandFailed { .. }) => ErrorKind::Command,
            Error::Session(SessionError::Unclassified { .. }) => ErrorKind::Unclassified,
            Error::Session(SessionError::InstallFailed { source, .. }) => source.kind(),
            Error::Session(_) => ErrorKind::Usage,
        }
    }

    /// Raw device output attached to a classified failure, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Error::Session(SessionError::CommandFailed { output, .. })
            | Error::Session(SessionError::Unclassified { output, .. }) => Some(output),
            Error::Session(SessionError::InstallFailed { source, .. }) => source.output(),
            _ => None,
        }
    }
}

/// Result type alias using ioscraper's Error.
pub type Result<T> = std::result::Result<T, Error>;

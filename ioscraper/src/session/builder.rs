//! Builder for creating sessions.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::Session;
use crate::channel::PacingConfig;
use crate::error::{Result, SessionError};
use crate::platform::{PlatformDefinition, cisco_ios};
use crate::transport::{
    AuthMethod, Connector, DEFAULT_CONNECT_TIMEOUT, HostKeyVerification, SshConfig, SshConnector,
};

/// Everything a session needs to log in and pace commands.
#[derive(Debug)]
pub struct SessionConfig {
    pub ssh: SshConfig,

    /// Secret sent after `enable`. `None` means escalation is skipped.
    pub enable_secret: Option<SecretString>,

    pub pacing: PacingConfig,

    pub platform: PlatformDefinition,

    /// Log every sent and received chunk at `info` under `ioscraper::wire`.
    pub debug: bool,

    /// Leave secrets unmasked in wire logs.
    pub log_secrets: bool,
}

/// Builder for constructing sessions.
///
/// # Example
///
/// ```rust,no_run
/// use ioscraper::SessionBuilder;
///
/// # async fn example() -> Result<(), ioscraper::Error> {
/// let mut session = SessionBuilder::new("isr-2911-a.example.net")
///     .username("admin")
///     .password("secret")
///     .enable_secret("enable-secret")
///     .build()?;
///
/// session.login().await?;
/// session.escalate().await?;
/// session.save_config("startup-config").await?;
/// session.logoff().await?;
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    auth: AuthMethod,
    enable_secret: Option<SecretString>,
    timeout: Duration,
    terminal_width: u32,
    terminal_height: u32,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    pacing: PacingConfig,
    platform: Option<PlatformDefinition>,
    debug: bool,
    log_secrets: bool,
}

impl SessionBuilder {
    /// Create a new session builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: None,
            auth: AuthMethod::None,
            enable_secret: None,
            timeout: DEFAULT_CONNECT_TIMEOUT,
            terminal_width: 512,
            terminal_height: 24,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            pacing: PacingConfig::default(),
            platform: None,
            debug: false,
            log_secrets: false,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Password(SecretString::from(password.into()));
        self
    }

    /// Set private key authentication.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        };
        self
    }

    /// Set private key authentication with passphrase.
    pub fn private_key_with_passphrase(
        mut self,
        key_path: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: Some(SecretString::from(passphrase.into())),
        };
        self
    }

    /// Set the enable secret used by [`Session::escalate`].
    pub fn enable_secret(mut self, secret: impl Into<String>) -> Self {
        self.enable_secret = Some(SecretString::from(secret.into()));
        self
    }

    /// Set the connect timeout (default: 4 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set PTY dimensions.
    pub fn terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Set command pacing.
    pub fn pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    /// Replace the IOS platform definition.
    pub fn platform(mut self, platform: PlatformDefinition) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Enable verbatim wire logging. Secrets stay masked unless
    /// [`log_secrets`](Self::log_secrets) is also set.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn log_secrets(mut self, enabled: bool) -> Self {
        self.log_secrets = enabled;
        self
    }

    /// Validate and assemble the session configuration.
    pub fn into_config(self) -> Result<SessionConfig> {
        if self.host.trim().is_empty() {
            return Err(SessionError::InvalidConfig {
                message: "Host is required".to_string(),
            }
            .into());
        }

        let username = self.username.ok_or_else(|| SessionError::InvalidConfig {
            message: "Username is required".to_string(),
        })?;

        let ssh = SshConfig {
            host: self.host,
            port: self.port,
            username,
            auth: self.auth,
            timeout: self.timeout,
            terminal_width: self.terminal_width,
            terminal_height: self.terminal_height,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };

        Ok(SessionConfig {
            ssh,
            enable_secret: self.enable_secret,
            pacing: self.pacing,
            platform: self.platform.unwrap_or_else(cisco_ios::platform),
            debug: self.debug,
            log_secrets: self.log_secrets,
        })
    }

    /// Build a session over SSH.
    ///
    /// This creates the session but does not connect. Call
    /// [`Session::login`] to establish the connection.
    pub fn build(self) -> Result<Session<SshConnector>> {
        self.build_with(SshConnector)
    }

    /// Build a session that connects through `connector`.
    pub fn build_with<C: Connector>(self, connector: C) -> Result<Session<C>> {
        Ok(Session::new(self.into_config()?, connector))
    }
}

//! Command pacing over an unframed terminal stream.
//!
//! An IOS exec shell has no message boundaries. The only way to know a
//! command's output has arrived is to give the device time and then drain
//! whatever is buffered. [`Pacer`] owns the shell channel and applies that
//! discipline to every write.

use std::borrow::Cow;
use std::time::Duration;

use bytes::BytesMut;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use tokio::time::{Instant, sleep};

use crate::error::Result;
use crate::transport::ShellChannel;

/// Log target for verbatim wire capture.
pub const WIRE_TARGET: &str = "ioscraper::wire";

/// Replacement text for redacted secrets.
pub const REDACTED: &str = "********";

/// How long to wait around each write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PacingMode {
    /// Sleep half the dwell before writing and the full dwell after.
    Fixed,

    /// After writing, poll every `poll_interval` and stop once output has
    /// been quiet for `quiet`, or once the dwell has elapsed.
    Adaptive {
        poll_interval: Duration,
        quiet: Duration,
    },
}

/// Pacing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Per-write dwell time (default 3 s). Upper bound in adaptive mode.
    pub dwell: Duration,

    pub mode: PacingMode,
}

impl PacingConfig {
    /// Fixed pacing with the given dwell.
    pub fn fixed(dwell: Duration) -> Self {
        Self {
            dwell,
            mode: PacingMode::Fixed,
        }
    }

    /// Adaptive pacing bounded by `max_wait`.
    pub fn adaptive(max_wait: Duration, poll_interval: Duration, quiet: Duration) -> Self {
        Self {
            dwell: max_wait,
            mode: PacingMode::Adaptive {
                poll_interval,
                quiet,
            },
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self::fixed(Duration::from_secs(3))
    }
}

/// Secrets that must not appear in wire logs.
#[derive(Debug, Default)]
struct Redactor {
    needles: Vec<String>,
}

impl Redactor {
    fn add(&mut self, secret: &str) {
        if !secret.is_empty() && !self.needles.iter().any(|n| n == secret) {
            self.needles.push(secret.to_string());
        }
    }

    fn scrub<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut out = Cow::Borrowed(text);
        for needle in &self.needles {
            if out.contains(needle.as_str()) {
                out = Cow::Owned(out.replace(needle.as_str(), REDACTED));
            }
        }
        out
    }
}

/// Serializes writes and reads on one shell channel.
pub struct Pacer<C> {
    channel: C,
    config: PacingConfig,

    /// Output collected while settling in adaptive mode.
    pending: BytesMut,

    redactor: Redactor,
    debug: bool,
    log_secrets: bool,

    /// Prefix for wire log lines (the device hostname once known).
    label: String,
}

impl<C: ShellChannel> Pacer<C> {
    pub fn new(channel: C, config: PacingConfig) -> Self {
        Self {
            channel,
            config,
            pending: BytesMut::with_capacity(4096),
            redactor: Redactor::default(),
            debug: false,
            log_secrets: false,
            label: String::new(),
        }
    }

    /// Enable verbatim wire capture at `info` level.
    pub fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
    }

    /// Log registered secrets in clear text too.
    pub fn set_log_secrets(&mut self, enabled: bool) {
        self.log_secrets = enabled;
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn config(&self) -> &PacingConfig {
        &self.config
    }

    /// Register a secret to be masked in every later wire log line.
    pub fn redact(&mut self, secret: &str) {
        self.redactor.add(secret);
    }

    /// Send `text` with the configured dwell.
    pub async fn send(&mut self, text: &str) -> Result<()> {
        self.send_paced(text, self.config.dwell).await
    }

    /// Send text that contains `secret`, masking it in wire logs.
    pub async fn send_secret(&mut self, text: &str, secret: &str) -> Result<()> {
        self.redact(secret);
        self.send(text).await
    }

    /// Send `text`, waiting `wait` around the write.
    pub async fn send_paced(&mut self, text: &str, wait: Duration) -> Result<()> {
        match self.config.mode {
            PacingMode::Fixed => {
                sleep(wait / 2).await;
                self.write(text).await?;
                sleep(wait).await;
            }
            PacingMode::Adaptive {
                poll_interval,
                quiet,
            } => {
                self.write(text).await?;
                self.settle(wait, poll_interval, quiet).await?;
            }
        }
        Ok(())
    }

    async fn write(&mut self, text: &str) -> Result<()> {
        if self.debug {
            info!(target: WIRE_TARGET, "{} SENT: {:?}", self.label, self.scrub(text));
        }
        self.channel.send(text.as_bytes()).await
    }

    /// Poll until output goes quiet or `max_wait` elapses.
    async fn settle(&mut self, max_wait: Duration, poll: Duration, quiet: Duration) -> Result<()> {
        let start = Instant::now();
        let mut last_data: Option<Instant> = None;

        loop {
            sleep(poll).await;
            let chunk = self.channel.drain().await?;
            let now = Instant::now();

            if !chunk.is_empty() {
                self.pending.extend_from_slice(&chunk);
                last_data = Some(now);
            } else if last_data.is_some_and(|t| now - t >= quiet) {
                trace!("output quiet after {:?}", now - start);
                break;
            }

            if now - start >= max_wait {
                break;
            }
        }
        Ok(())
    }

    /// Drain everything buffered and return it as one string.
    ///
    /// Returns an empty string when nothing arrived.
    pub async fn receive(&mut self) -> Result<String> {
        match self.channel.drain().await {
            Ok(chunk) => self.pending.extend_from_slice(&chunk),
            // Hand back what already arrived; the next call reports the drop.
            Err(e) if !self.pending.is_empty() => debug!("drain failed after partial output: {}", e),
            Err(e) => return Err(e),
        }

        let data = self.pending.split();
        let output = String::from_utf8_lossy(&data).into_owned();

        if self.debug {
            info!(target: WIRE_TARGET, "{} RECV: {:?}", self.label, self.scrub(&output));
        }
        Ok(output)
    }

    /// Close the underlying channel.
    pub async fn close(&mut self) -> Result<()> {
        self.channel.close().await
    }

    pub fn is_closed(&self) -> bool {
        self.channel.is_closed()
    }

    fn scrub<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.log_secrets {
            Cow::Borrowed(text)
        } else {
            self.redactor.scrub(text)
        }
    }
}

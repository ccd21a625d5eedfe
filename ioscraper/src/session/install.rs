//! Backup, update and save: replacing configuration from a remote file.
//!
//! The workflow saves the running configuration to a uniquely named backup
//! on the device, merges the remote file into running-config with the
//! device's own `copy`, then writes the result to startup-config.

use std::fmt;

use log::info;
use serde::Serialize;

use super::Session;
use super::transcript::Transcript;
use crate::error::{Error, Result, SessionError};
use crate::platform::cisco_ios::STARTUP_CONFIG;
use crate::transport::Connector;

/// A step of [`Session::install_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InstallStep {
    Backup,
    Update,
    Save,
}

impl InstallStep {
    /// Whether the device configuration may have changed when this step fails.
    pub fn changed(self) -> bool {
        self == InstallStep::Save
    }
}

impl fmt::Display for InstallStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            InstallStep::Backup => "Save config failure.",
            InstallStep::Update => "Failed to update configuration.",
            InstallStep::Save => "Configuration updated, failure on save to NVRAM.",
        };
        f.write_str(message)
    }
}

/// Transcripts of a completed install.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    /// Device-side name the previous running-config was saved to.
    pub backup_file: String,
    pub backup: Transcript,
    pub update: Transcript,
    pub save: Transcript,
}

impl<C: Connector> Session<C> {
    /// Save, update from `source_uri`, then save to startup-config.
    ///
    /// Stops at the first failing step. The session stays logged in either way.
    pub async fn install_config(&mut self, source_uri: &str) -> Result<InstallReport> {
        let backup_file = self.backup_filename();

        let backup = self
            .save_config(&backup_file)
            .await
            .map_err(|e| install_failed(InstallStep::Backup, None, e))?;

        let update = self
            .update_config(source_uri)
            .await
            .map_err(|e| install_failed(InstallStep::Update, Some(&backup_file), e))?;

        let save = self
            .save_config(STARTUP_CONFIG)
            .await
            .map_err(|e| install_failed(InstallStep::Save, Some(&backup_file), e))?;

        info!(
            "{}: configuration installed, previous config in {}",
            self.hostname(),
            backup_file
        );

        Ok(InstallReport {
            backup_file,
            backup,
            update,
            save,
        })
    }
}

fn install_failed(step: InstallStep, backup_file: Option<&str>, source: Error) -> Error {
    SessionError::InstallFailed {
        step,
        backup_file: backup_file.map(str::to_string),
        source: Box::new(source),
    }
    .into()
}

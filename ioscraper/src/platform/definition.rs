//! Platform definition for device-specific literals.

use serde::{Deserialize, Serialize};

use crate::channel::MarkerSet;

/// Everything device-specific the session needs: terminal setup, the
/// escalation command, and the marker sets each command idiom is judged by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformDefinition {
    /// Platform name (e.g., "cisco_ios").
    pub name: String,

    /// Value for `terminal width` after login.
    pub terminal_width: u32,

    /// Value for `terminal length` after login (0 disables paging).
    pub terminal_length: u32,

    /// Command that requests privileged mode.
    pub enable_command: String,

    /// Prompt the device prints when it wants the enable secret.
    pub secret_prompt: String,

    /// Markers for the escalation response.
    pub enable_markers: MarkerSet,

    /// Markers for `copy running-config <target>`. Success must be seen.
    pub save_markers: MarkerSet,

    /// Markers for `copy <source> running-config`. Absence of failure is success.
    pub update_markers: MarkerSet,

    /// Markers for ad-hoc commands.
    pub command_markers: MarkerSet,
}

impl PlatformDefinition {
    /// Create a new platform definition with empty marker sets.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            terminal_width: 512,
            terminal_length: 0,
            enable_command: "enable".to_string(),
            secret_prompt: "Password:".to_string(),
            enable_markers: MarkerSet::new(),
            save_markers: MarkerSet::new(),
            update_markers: MarkerSet::new(),
            command_markers: MarkerSet::new(),
        }
    }

    /// Set the terminal width and length applied after login.
    pub fn with_terminal(mut self, width: u32, length: u32) -> Self {
        self.terminal_width = width;
        self.terminal_length = length;
        self
    }

    pub fn with_enable_command(mut self, command: impl Into<String>) -> Self {
        self.enable_command = command.into();
        self
    }

    pub fn with_secret_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.secret_prompt = prompt.into();
        self
    }

    pub fn with_enable_markers(mut self, markers: MarkerSet) -> Self {
        self.enable_markers = markers;
        self
    }

    pub fn with_save_markers(mut self, markers: MarkerSet) -> Self {
        self.save_markers = markers;
        self
    }

    pub fn with_update_markers(mut self, markers: MarkerSet) -> Self {
        self.update_markers = markers;
        self
    }

    pub fn with_command_markers(mut self, markers: MarkerSet) -> Self {
        self.command_markers = markers;
        self
    }

    /// Commands sent after login, in order.
    pub fn terminal_commands(&self) -> [String; 2] {
        [
            format!("terminal width {}", self.terminal_width),
            format!("terminal length {}", self.terminal_length),
        ]
    }

    /// Whether `output` ends waiting for the enable secret.
    pub fn awaits_secret(&self, output: &str) -> bool {
        !self.secret_prompt.is_empty() && output.trim_end().ends_with(self.secret_prompt.as_str())
    }

    /// Command that saves the running configuration to `target`.
    pub fn save_command(&self, target: &str) -> String {
        format!("copy running-config {}", target)
    }

    /// Command that merges the configuration at `source` into running-config.
    pub fn update_command(&self, source: &str) -> String {
        format!("copy {} running-config", source)
    }
}

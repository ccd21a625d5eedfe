//! Platform definitions.
//!
//! This module holds the device-specific literals: terminal setup commands,
//! prompt parsing, and the marker sets used to judge command output.

pub mod cisco_ios;
mod definition;
mod privilege_level;

pub use definition::PlatformDefinition;
pub use privilege_level::{PrivilegeLevel, PromptInfo, is_prompt_line, parse_prompt};

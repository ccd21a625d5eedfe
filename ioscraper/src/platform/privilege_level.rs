//! Privilege levels and prompt parsing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// IOS privilege level, 1 (user EXEC) through 15 (privileged EXEC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrivilegeLevel(u8);

impl PrivilegeLevel {
    /// User EXEC mode, `>` prompt.
    pub const USER: Self = Self(1);

    /// Privileged EXEC ("enable") mode, `#` prompt.
    pub const ENABLE: Self = Self(15);

    /// Create a level, rejecting values outside 1..=15.
    pub fn new(level: u8) -> Option<Self> {
        (1..=15).contains(&level).then_some(Self(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Whether this is full enable mode.
    pub fn is_enabled(self) -> bool {
        self == Self::ENABLE
    }
}

impl Default for PrivilegeLevel {
    fn default() -> Self {
        Self::USER
    }
}

impl fmt::Display for PrivilegeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a trailing prompt tells us about the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptInfo {
    /// Device hostname, empty if the prompt was a bare terminator.
    pub hostname: String,

    /// Sub-mode in parentheses, e.g. `config-if` for `router(config-if)#`.
    pub mode: Option<String>,

    pub privilege: PrivilegeLevel,
}

/// Parse the prompt at the end of `output`.
///
/// Trailing whitespace is ignored. The last character must be `#`
/// (privileged) or `>` (user); anything else, including empty output,
/// yields `None`. The hostname is the last line without its terminator.
pub fn parse_prompt(output: &str) -> Option<PromptInfo> {
    let trimmed = output.trim_end();
    let privilege = match trimmed.chars().last()? {
        '#' => PrivilegeLevel::ENABLE,
        '>' => PrivilegeLevel::USER,
        _ => return None,
    };

    let line = trimmed.rsplit(['\r', '\n']).next().unwrap_or(trimmed);
    let body = line[..line.len() - 1].trim_start_matches(|c: char| c.is_control() || c == ' ');

    let (hostname, mode) = match body.strip_suffix(')').and_then(|b| b.split_once('(')) {
        Some((host, mode)) => (host, Some(mode.to_string())),
        None => (body, None),
    };

    Some(PromptInfo {
        hostname: hostname.to_string(),
        mode,
        privilege,
    })
}

/// Whether `line` reads as a device prompt rather than output that happens
/// to end in `#` or `>`.
pub fn is_prompt_line(line: &str) -> bool {
    parse_prompt(line).is_some_and(|p| {
        !p.hostname.is_empty()
            && p
                .hostname
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_privileged_prompt() {
        let info = parse_prompt("\r\nisr-2911-a#").unwrap();
        assert_eq!(info.hostname, "isr-2911-a");
        assert_eq!(info.privilege, PrivilegeLevel::ENABLE);
        assert!(info.mode.is_none());
    }

    #[test]
    fn test_user_prompt() {
        let info = parse_prompt("\r\nisr-2911-a>").unwrap();
        assert_eq!(info.hostname, "isr-2911-a");
        assert_eq!(info.privilege, PrivilegeLevel::USER);
    }

    #[test]
    fn test_prompt_after_banner() {
        let output = "\r\n*** Authorized access only ***\r\n\r\nsw-core-01>";
        assert_eq!(parse_prompt(output).unwrap().hostname, "sw-core-01");
    }

    #[test]
    fn test_config_mode_prompt() {
        let info = parse_prompt("\r\nrouter(config-if)#").unwrap();
        assert_eq!(info.hostname, "router");
        assert_eq!(info.mode.as_deref(), Some("config-if"));
        assert_eq!(info.privilege, PrivilegeLevel::ENABLE);
    }

    #[test]
    fn test_trailing_space_ignored() {
        assert_eq!(
            parse_prompt("router# ").unwrap().privilege,
            PrivilegeLevel::ENABLE
        );
    }

    #[test]
    fn test_undetermined() {
        assert!(parse_prompt("").is_none());
        assert!(parse_prompt("\r\n").is_none());
        assert!(parse_prompt("Password: ").is_none());
        assert!(parse_prompt(" --More-- ").is_none());
    }

    #[test]
    fn test_bare_terminator() {
        let info = parse_prompt("#").unwrap();
        assert_eq!(info.hostname, "");
        assert_eq!(info.privilege, PrivilegeLevel::ENABLE);
    }

    #[test]
    fn test_prompt_line() {
        assert!(is_prompt_line("router#"));
        assert!(!is_prompt_line("  <cr>"));
        assert!(!is_prompt_line("#"));
    }

    #[test]
    fn test_level_bounds() {
        assert!(PrivilegeLevel::new(0).is_none());
        assert!(PrivilegeLevel::new(16).is_none());
        assert_eq!(PrivilegeLevel::new(15), Some(PrivilegeLevel::ENABLE));
        assert!(!PrivilegeLevel::default().is_enabled());
    }

    proptest! {
        #[test]
        fn prop_hash_is_enable(body in "[^\r\n]{0,40}") {
            let info = parse_prompt(&format!("\r\n{body}#"));
            prop_assert_eq!(info.map(|i| i.privilege), Some(PrivilegeLevel::ENABLE));
        }

        #[test]
        fn prop_angle_is_user(body in "[^\r\n]{0,40}") {
            let info = parse_prompt(&format!("\r\n{body}>"));
            prop_assert_eq!(info.map(|i| i.privilege), Some(PrivilegeLevel::USER));
        }
    }
}

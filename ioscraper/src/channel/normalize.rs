//! Cleanup of raw terminal output into readable command results.

use vte::{Parser, Perform};

use crate::platform::is_prompt_line;

/// Collects printable text and line controls, dropping escape sequences.
#[derive(Default)]
struct PlainText {
    text: String,
}

impl Perform for PlainText {
    fn print(&mut self, c: char) {
        self.text.push(c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            b'\n' => self.text.push('\n'),
            b'\t' => self.text.push('\t'),
            // backspace erases, IOS uses it to wipe "--More--" and typeahead
            0x08 => {
                self.text.pop();
            }
            _ => {}
        }
    }
}

/// Strip ANSI/VT100 control sequences, carriage returns and backspaces.
pub fn strip_control(raw: &[u8]) -> String {
    let mut parser = Parser::new();
    let mut plain = PlainText::default();
    parser.advance(&mut plain, raw);
    plain.text
}

/// Remove the echoed command line and the trailing prompt line.
///
/// `raw` is what was drained after sending `command`.
pub fn normalize_output(raw: &str, command: &str) -> String {
    let cleaned = strip_control(raw.as_bytes());
    let mut lines: Vec<&str> = cleaned.lines().collect();

    let command = command.trim();
    if !command.is_empty()
        && lines
            .first()
            .is_some_and(|first| first.trim_end().ends_with(command))
    {
        lines.remove(0);
    }

    if lines.last().is_some_and(|last| is_prompt_line(last)) {
        lines.pop();
    }

    lines.join("\n").trim_matches('\n').to_string()
}

//! Human-readable key/value console rendering.

use console::Style;

use super::Renderer;
use crate::event::{EventDict, EVENT_KEY, EXCEPTION_KEY, EXC_INFO_KEY, LEVEL_KEY, LOGGER_KEY, TIMESTAMP_KEY};

/// Message column width when more fields follow.
pub const PAD_EVENT: usize = 30;
/// Width of the longest level label (`exception`).
pub const LEVEL_WIDTH: usize = 9;

const STACK_KEY: &str = "stack";

/// Render `<timestamp> [<level>] <message> [<logger>] key=value ...`.
///
/// Remaining keys are sorted. A formatted exception follows on its own lines.
#[derive(Debug, Clone)]
pub struct ConsoleRenderer {
    colors: bool,
    pad_event: usize,
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConsoleRenderer {
    pub fn new(colors: bool) -> Self {
        Self {
            colors,
            pad_event: PAD_EVENT,
        }
    }

    pub fn with_pad_event(mut self, pad_event: usize) -> Self {
        self.pad_event = pad_event;
        self
    }

    fn style(&self, style: Style) -> Style {
        style.force_styling(self.colors)
    }

    fn level_style(&self, level: &str) -> Style {
        let style = match level {
            "critical" => Style::new().red().bold(),
            "exception" | "error" => Style::new().red(),
            "warn" | "warning" => Style::new().yellow(),
            "info" | "debug" => Style::new().green(),
            _ => Style::new(),
        };
        self.style(style)
    }
}

impl Renderer for ConsoleRenderer {
    fn render(&self, mut event: EventDict) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(ts) = event.remove(TIMESTAMP_KEY) {
            parts.push(self.style(Style::new().dim()).apply_to(ts.repr()).to_string());
        }

        if let Some(level) = event.remove(LEVEL_KEY) {
            let name = level.repr();
            let padded = format!("{:<width$}", name, width = LEVEL_WIDTH);
            parts.push(format!("[{}]", self.level_style(&name).apply_to(padded)));
        }

        let message = event.remove(EVENT_KEY).map(|v| v.repr()).unwrap_or_default();
        let message = if event.is_empty() {
            message
        } else {
            format!("{:<width$}", message, width = self.pad_event)
        };
        parts.push(self.style(Style::new().bold()).apply_to(message).to_string());

        if let Some(logger) = event.remove(LOGGER_KEY) {
            let name = self.style(Style::new().blue().bold()).apply_to(logger.repr());
            parts.push(format!("[{}]", name));
        }

        let stack = event.remove(STACK_KEY);
        let exception = event.remove(EXCEPTION_KEY);
        event.remove(EXC_INFO_KEY);

        let key_style = self.style(Style::new().cyan());
        let value_style = self.style(Style::new().magenta());
        for (key, value) in &event {
            parts.push(format!(
                "{}={}",
                key_style.apply_to(key),
                value_style.apply_to(value.repr())
            ));
        }

        let mut line = parts.join(" ").trim_end().to_string();
        if let Some(stack) = stack {
            line.push('\n');
            line.push_str(&stack.repr());
        }
        if let Some(exception) = exception {
            line.push('\n');
            line.push_str(&exception.repr());
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::FieldValue;

    fn base_event() -> EventDict {
        let mut event = EventDict::with_message("A log test.");
        event.insert(TIMESTAMP_KEY, "2024-04-05T15:02:51+0000");
        event.insert(LEVEL_KEY, "debug");
        event.insert(LOGGER_KEY, "testing");
        event
    }

    #[test]
    fn test_plain_layout() {
        let line = ConsoleRenderer::new(false).render(base_event());
        assert_eq!(
            line,
            "2024-04-05T15:02:51+0000 [debug    ] A log test.                    [testing]"
        );
    }

    #[test]
    fn test_sorted_key_values() {
        let mut event = base_event();
        event.insert("zeta", 1);
        event.insert("alpha", FieldValue::from("x"));
        let line = ConsoleRenderer::new(false).render(event);
        assert!(line.ends_with("[testing] alpha=x zeta=1"), "{}", line);
    }

    #[test]
    fn test_message_unpadded_when_alone() {
        let line = ConsoleRenderer::new(false).render(EventDict::with_message("ready"));
        assert_eq!(line, "ready");
    }

    #[test]
    fn test_exception_on_following_line() {
        let mut event = base_event();
        event.insert(EXCEPTION_KEY, "Error: boom");
        let line = ConsoleRenderer::new(false).render(event);
        assert!(line.ends_with("[testing]\nError: boom"), "{}", line);
    }

    #[test]
    fn test_colors_emit_ansi() {
        let line = ConsoleRenderer::new(true).render(base_event());
        assert!(line.contains("\u{1b}["));
        let plain = ConsoleRenderer::new(false).render(base_event());
        assert!(!plain.contains("\u{1b}["));
    }
}

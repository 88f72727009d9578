//! Terminal output: status lines, key/value rows and the progress reporter.

pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use reporter::TerminalReporter;
pub use styles::Styles;

use crate::application::ports::EnvSource;

/// Environment variable that turns colours off when set to a non-empty value.
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// Leading glyph of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Step,
    Success,
    Warning,
    Error,
    Info,
}

impl Mark {
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Step => "→",
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Error => "✗",
            Self::Info => "ℹ",
        }
    }
}

/// Colours are used only on a TTY, without `--no-color`, and when `NO_COLOR`
/// is unset or empty.
#[must_use]
pub fn colors_enabled(no_color_flag: bool, is_tty: bool, no_color_env: Option<&str>) -> bool {
    is_tty && !no_color_flag && no_color_env.is_none_or(str::is_empty)
}

/// Styling and terminal state shared by commands and the reporter.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Suppress everything except errors.
    pub quiet: bool,
}

impl OutputContext {
    #[must_use]
    pub fn new(no_color: bool, quiet: bool, env: &impl EnvSource) -> Self {
        let is_tty = Term::stdout().is_term();
        let mut styles = Styles::default();
        if colors_enabled(no_color, is_tty, env.var(NO_COLOR_ENV).as_deref()) {
            styles.colorize();
        }
        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Spinners only make sense on an interactive, non-quiet terminal.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    fn style_for(&self, mark: Mark) -> Style {
        match mark {
            Mark::Step => self.styles.step,
            Mark::Success => self.styles.success,
            Mark::Warning => self.styles.warning,
            Mark::Error => self.styles.error,
            Mark::Info => self.styles.info,
        }
    }

    /// Render `"  <glyph> <msg>"` with the glyph styled for `mark`.
    #[must_use]
    pub fn line(&self, mark: Mark, msg: &str) -> String {
        format!("  {} {msg}", mark.glyph().style(self.style_for(mark)))
    }

    /// Render a report row with the key dimmed.
    #[must_use]
    pub fn kv_line(&self, key: &str, value: &str) -> String {
        format!("  {}  {value}", key.style(self.styles.dim))
    }

    fn print(&self, line: &str) {
        if !self.quiet {
            println!("{line}");
        }
    }

    pub fn success(&self, msg: &str) {
        self.print(&self.line(Mark::Success, msg));
    }

    pub fn warn(&self, msg: &str) {
        self.print(&self.line(Mark::Warning, msg));
    }

    pub fn info(&self, msg: &str) {
        self.print(&self.line(Mark::Info, msg));
    }

    pub fn header(&self, msg: &str) {
        self.print(&format!("  {}", msg.style(self.styles.header)));
    }

    pub fn kv(&self, key: &str, value: &str) {
        self.print(&self.kv_line(key, value));
    }

    /// Errors go to stderr and ignore `quiet`.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.line(Mark::Error, msg));
    }
}

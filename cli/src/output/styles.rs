//! owo-colors stylesheet for status glyphs, report keys and headers.

use owo_colors::Style;

/// One `Style` per `Mark` plus the report key and header styles.
///
/// `Default` is the uncoloured sheet used when colours are disabled.
#[derive(Default, Clone)]
pub struct Styles {
    pub step: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    /// Report keys.
    pub dim: Style,
    pub header: Style,
}

impl Styles {
    pub fn colorize(&mut self) {
        *self = Self {
            step: Style::new().cyan(),
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red(),
            info: Style::new().blue(),
            dim: Style::new().dimmed(),
            header: Style::new().bold().cyan(),
        };
    }
}

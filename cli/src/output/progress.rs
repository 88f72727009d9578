//! indicatif spinners for long-running terraform steps.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK: Duration = Duration::from_millis(80);
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"];
const RUNNING_TEMPLATE: &str = "  {spinner:.cyan} {msg} {elapsed:.dim}";
const DONE_TEMPLATE: &str = "  {prefix:.green} {msg} {elapsed:.dim}";

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Start a ticking spinner showing `msg` and the elapsed time.
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner()
        .with_style(style(RUNNING_TEMPLATE).tick_strings(FRAMES))
        .with_message(msg.to_string());
    pb.enable_steady_tick(TICK);
    pb
}

/// Freeze the spinner as a `✓` line carrying `msg` and the time taken.
pub fn finish_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(style(DONE_TEMPLATE));
    pb.set_prefix("✓");
    pb.finish_with_message(msg.to_string());
}

//! Progress indicators
//!
//! Spinners for operations that can take a noticeable moment, such as
//! reading a large OCR dump or scoring a big catalog.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate progress
///
/// Draws to stderr and stays hidden when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Hidden spinner, for machine-readable output
pub fn hidden() -> ProgressBar {
    ProgressBar::hidden()
}

/// Clear a spinner once its work is done
pub fn finish(pb: &ProgressBar) {
    pb.finish_and_clear();
}

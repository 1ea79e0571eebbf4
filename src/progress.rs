use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str = "{msg} [{bar:40}] {pos}/{len} ({elapsed})";
const SPINNER_TEMPLATE: &str = "{spinner} {msg} {pos} items ({elapsed})";

/// Hands out progress bars, or hidden ones when output is quiet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Progress {
    hidden: bool,
}

impl Progress {
    pub fn new(hidden: bool) -> Self {
        Self { hidden }
    }

    pub fn hidden() -> Self {
        Self::new(true)
    }

    pub fn bar(&self, len: usize, message: &str) -> ProgressBar {
        if self.hidden {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        ProgressBar::new(len as u64)
            .with_style(style)
            .with_message(message.to_string())
    }

    pub fn spinner(&self, message: &str) -> ProgressBar {
        if self.hidden {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::with_template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let spinner = ProgressBar::new_spinner()
            .with_style(style)
            .with_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }
}

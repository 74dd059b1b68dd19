use std::{
    sync::{Arc, LazyLock},
    time::Duration,
};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use nu_ansi_term::Color::{Cyan, Green};
use pkgview_dl::types::Progress;
use tracing::info;

use crate::utils::{progress_enabled, Colored};

/// Shared MultiProgress instance for suspend/stop from other modules.
static MULTI: LazyLock<Arc<MultiProgress>> = LazyLock::new(|| Arc::new(MultiProgress::new()));

/// Pause progress display, run the closure, then resume.
pub fn suspend<F: FnOnce()>(f: F) {
    MULTI.suspend(f);
}

/// Stop and clear all progress bars.
pub fn stop() {
    MULTI.clear().ok();
}

fn download_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.cyan} {prefix}  {wide_bar:.cyan/dim}  {bytes}/{total_bytes}  {bytes_per_sec}  {eta}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("━━─")
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn add_bar(len: u64) -> ProgressBar {
    if progress_enabled() {
        MULTI.add(ProgressBar::new(len))
    } else {
        MULTI.add(ProgressBar::hidden())
    }
}

/// Create a byte-counting progress bar for a file download.
pub fn create_download_job(prefix: &str) -> ProgressBar {
    let pb = add_bar(0);
    pb.set_style(download_style());
    pb.set_prefix(Cyan.paint(prefix).to_string());
    pb
}

pub fn handle_download_progress(state: Progress, pb: &ProgressBar) {
    match state {
        Progress::Starting { total } => {
            pb.set_length(total);
            pb.reset();
        }
        Progress::Chunk { current, total } => {
            if total == 0 {
                pb.set_length(current);
            }
            pb.set_position(current);
        }
        Progress::Complete { .. } => {
            pb.finish_and_clear();
        }
    }
}

/// A "Doing X..." status line shown as a spinner while the work runs.
///
/// [`Step::done`] replaces the spinner with `X... Done!`; dropping the step
/// without calling it just clears the spinner.
pub struct Step {
    label: String,
    spinner: ProgressBar,
}

impl Step {
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        let spinner = add_bar(0);
        spinner.set_style(spinner_style());
        spinner.set_message(format!("{label}..."));
        spinner.enable_steady_tick(Duration::from_millis(100));

        Self {
            label,
            spinner,
        }
    }

    pub fn done(self) {
        self.spinner.finish_and_clear();
        info!("{}... {}", self.label, Colored(Green, "Done!"));
    }
}

impl Drop for Step {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_download_progress() {
        let pb = ProgressBar::hidden();

        handle_download_progress(Progress::Starting { total: 100 }, &pb);
        assert_eq!(pb.length(), Some(100));

        handle_download_progress(Progress::Chunk { current: 40, total: 100 }, &pb);
        assert_eq!(pb.position(), 40);

        handle_download_progress(Progress::Complete { total: 100 }, &pb);
        assert!(pb.is_finished());
    }

    #[test]
    fn test_unknown_length_tracks_position() {
        let pb = ProgressBar::hidden();

        handle_download_progress(Progress::Starting { total: 0 }, &pb);
        handle_download_progress(Progress::Chunk { current: 512, total: 0 }, &pb);
        assert_eq!(pb.length(), Some(512));
        assert_eq!(pb.position(), 512);
    }
}

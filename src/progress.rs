//! Progress reporting for long running calculations.
//!
//! Calculations report through the `ProgressSink` trait so they can run with a styled
//! `indicatif` progress bar, or silently when progress is disabled or under test.

use std::sync::RwLock;

use indicatif::{ProgressBar, ProgressStyle};

/// Receives progress updates from a calculation.
///
/// Implementations must tolerate `advance` being called concurrently from
/// multiple threads.
pub trait ProgressSink: Sync {
    /// Start a new task consisting of `total` units of work.
    fn begin_task(&self, description: &str, total: u64);

    /// Record completion of `units` units of work on the current task.
    fn advance(&self, units: u64);

    /// Mark the current task as complete.
    fn finish_task(&self) {}
}

/// Sink that discards all updates.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn begin_task(&self, _description: &str, _total: u64) {}

    fn advance(&self, _units: u64) {}
}

/// Sink that draws a progress bar to the terminal, one bar per task.
pub struct BarProgress {
    bar: RwLock<ProgressBar>,
}

impl BarProgress {
    pub fn new() -> Self {
        BarProgress {
            bar: RwLock::new(ProgressBar::hidden()),
        }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BarProgress {
    fn begin_task(&self, description: &str, total: u64) {
        let bar = progress_bar_msg(total);
        bar.set_message(description.to_string());

        let mut current = self.bar.write().expect("Progress bar lock poisoned.");
        *current = bar;
    }

    fn advance(&self, units: u64) {
        self.bar.read().expect("Progress bar lock poisoned.").inc(units);
    }

    fn finish_task(&self) {
        self.bar.read().expect("Progress bar lock poisoned.").finish();
    }
}

/// Create a progress bar of a specified length and styling, with a terminal message.
pub fn progress_bar_msg(len: u64) -> ProgressBar {
    let progress_bar = ProgressBar::new(len);
    progress_bar.set_style(ProgressStyle::default_bar().template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {percent}% [{human_pos}/{human_len}] [Remaining: {eta}] [{msg}]",
    ).expect("Invalid progress style."));

    progress_bar
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingProgress;
    use super::*;

    #[test]
    fn test_bar_progress() {
        let progress = BarProgress::new();
        progress.begin_task("Generating sketches", 3);
        progress.advance(2);
        {
            let bar = progress.bar.read().unwrap();
            assert_eq!(bar.position(), 2);
            assert_eq!(bar.length(), Some(3));
        }
        progress.finish_task();

        progress.begin_task("Computing pairwise distances", 10);
        let bar = progress.bar.read().unwrap();
        assert_eq!(bar.position(), 0);
        assert_eq!(bar.length(), Some(10));
    }

    #[test]
    fn test_recording_progress() {
        let progress = RecordingProgress::default();
        progress.begin_task("a", 2);
        progress.advance(1);
        progress.advance(1);
        progress.begin_task("b", 1);

        assert_eq!(
            progress.tasks(),
            vec![("a".to_string(), 2, 2), ("b".to_string(), 1, 0)]
        );
    }
}

//! Terminal progress for extraction and analysis.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Progress bar mirroring a session's extraction progress channel.
pub struct ExtractionProgress {
    bar: ProgressBar,
    task: JoinHandle<()>,
}

impl ExtractionProgress {
    pub fn start(mut progress: watch::Receiver<u8>, name: &str) -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}%")
                .unwrap()
                .progress_chars("█▓░"),
        );
        bar.set_message(format!("Extracting {}", name));

        let handle = bar.clone();
        let task = tokio::spawn(async move {
            while progress.changed().await.is_ok() {
                let value = *progress.borrow_and_update();
                handle.set_position(u64::from(value));
            }
        });

        Self { bar, task }
    }

    pub fn finish(self) {
        self.task.abort();
        self.bar.finish_and_clear();
    }
}

/// Spinner shown while an analysis is in flight.
pub fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

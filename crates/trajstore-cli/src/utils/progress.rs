use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;
use trajstore::workflows::progress::{Progress, ProgressCallback};

const SPINNER_TICK_MS: u64 = 80;

/// Renders workflow progress as a single spinner line on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(target);
        pb.disable_steady_tick();
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb_guard.reset();
                    pb_guard.set_length(0);
                    pb_guard.set_style(Self::spinner_style());
                    pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb_guard.set_prefix(name);
                    pb_guard.set_message("");
                }
                Progress::SnapshotWritten { index, atoms } => {
                    pb_guard.inc(1);
                    pb_guard.set_message(format!("snapshot {} ({} atoms)", index, atoms));
                }
                Progress::PhaseFinish => {
                    pb_guard.disable_steady_tick();
                    let done = pb_guard.position();
                    if done > 0 {
                        pb_guard.finish_with_message(format!("✓ {} snapshot(s) converted", done));
                    } else {
                        pb_guard.finish_with_message("✓ Done");
                    }
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.println(format!("  {}", msg));
                    } else {
                        pb_guard.set_message(msg);
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix:<10} [{pos}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn hidden_handler() -> CliProgressHandler {
        CliProgressHandler::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = hidden_handler();
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.length(), Some(0));
        assert!(pb.is_finished());
    }

    #[test]
    fn callback_counts_written_snapshots() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Snapshots" });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.prefix(), "Snapshots");
            assert!(!pb.is_finished());
            assert_eq!(pb.position(), 0);
        }

        callback(Progress::SnapshotWritten { index: 1, atoms: 12 });
        callback(Progress::SnapshotWritten { index: 2, atoms: 12 });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.position(), 2);
            assert_eq!(pb.message(), "snapshot 2 (12 atoms)");
        }

        callback(Progress::PhaseFinish);
        {
            let pb = handler.pb.lock().unwrap();
            assert!(pb.is_finished());
            assert_eq!(pb.message(), "✓ 2 snapshot(s) converted");
        }
    }

    #[test]
    fn empty_phase_finishes_with_done() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Parameters" });
        callback(Progress::PhaseFinish);

        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.message(), "✓ Done");
    }

    #[test]
    fn message_after_finish_replaces_status() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(Progress::Message("Converted 3 snapshot(s).".to_string()));

        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.message(), "Converted 3 snapshot(s).");
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: "Snapshots" });
            callback(Progress::SnapshotWritten { index: 1, atoms: 3 });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.position(), 1);
    }
}

//! Progress reporting for split execution
//!
//! The media engine cannot always report segment-by-segment progress,
//! so the reporter is a minimal state machine: at minimum it emits
//! `Running(0, "starting")` before dispatch and `Done`/`Failed` on
//! completion. When per-segment progress is available the percentage
//! is derived from completed/total and never decreases.

use std::sync::{Arc, Mutex};

use tracing::{debug, info};

/// Execution lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressState {
    Idle,
    Running { percentage: u8, message: String },
    Done,
    Failed,
}

/// Sink for progress transitions. The session pushes updates as the
/// engine reports them; implementations render them.
pub trait ProgressSink: Send + Sync {
    fn on_update(&self, state: &ProgressState);
}

/// Bounded 0-100 progress reporter with thread-safe updates. Cloning
/// shares the underlying state, so a clone can be handed to the
/// engine's progress callback.
#[derive(Clone)]
pub struct ProgressReporter {
    state: Arc<Mutex<ProgressState>>,
    sinks: Arc<Mutex<Vec<Box<dyn ProgressSink>>>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ProgressState::Idle)),
            sinks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_sink(&self, sink: Box<dyn ProgressSink>) {
        if let Ok(mut sinks) = self.sinks.lock() {
            sinks.push(sink);
        }
    }

    pub fn state(&self) -> ProgressState {
        self.state
            .lock()
            .map(|state| state.clone())
            .unwrap_or(ProgressState::Idle)
    }

    /// Transition to `Running(0, "starting")`. Called immediately
    /// before dispatching the request to the engine.
    pub fn start(&self) {
        self.transition(ProgressState::Running {
            percentage: 0,
            message: "starting".to_string(),
        });
    }

    /// Report completion of segment `completed` of `total`. Updates
    /// that would move the percentage backwards are clamped to the
    /// current value.
    pub fn segment_done(&self, completed: usize, total: usize) {
        if total == 0 {
            return;
        }
        let raw = ((completed as f64 / total as f64) * 100.0).round() as u8;
        let percentage = match self.state() {
            ProgressState::Running { percentage, .. } => raw.max(percentage),
            _ => raw,
        };
        self.transition(ProgressState::Running {
            percentage: percentage.min(100),
            message: format!("segment {} of {}", completed, total),
        });
    }

    pub fn done(&self) {
        self.transition(ProgressState::Done);
    }

    pub fn failed(&self) {
        self.transition(ProgressState::Failed);
    }

    fn transition(&self, state: ProgressState) {
        debug!(?state, "progress transition");
        if let Ok(mut current) = self.state.lock() {
            *current = state.clone();
        }
        if let Ok(sinks) = self.sinks.lock() {
            for sink in sinks.iter() {
                sink.on_update(&state);
            }
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Sink that logs transitions through tracing, used by the CLI.
pub struct LogSink;

impl ProgressSink for LogSink {
    fn on_update(&self, state: &ProgressState) {
        match state {
            ProgressState::Idle => {}
            ProgressState::Running {
                percentage,
                message,
            } => info!(percentage, "{}", message),
            ProgressState::Done => info!("split complete"),
            ProgressState::Failed => info!("split failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder(Arc<Mutex<Vec<ProgressState>>>);

    impl ProgressSink for Recorder {
        fn on_update(&self, state: &ProgressState) {
            self.0.lock().unwrap().push(state.clone());
        }
    }

    fn percentages(states: &[ProgressState]) -> Vec<u8> {
        states
            .iter()
            .filter_map(|state| match state {
                ProgressState::Running { percentage, .. } => Some(*percentage),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_two_transition_minimum() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let reporter = ProgressReporter::new();
        reporter.add_sink(Box::new(Recorder(seen.clone())));

        reporter.start();
        reporter.done();

        let states = seen.lock().unwrap();
        assert_eq!(
            states[0],
            ProgressState::Running {
                percentage: 0,
                message: "starting".to_string()
            }
        );
        assert_eq!(states[1], ProgressState::Done);
    }

    #[test]
    fn test_per_segment_percentages() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let reporter = ProgressReporter::new();
        reporter.add_sink(Box::new(Recorder(seen.clone())));

        reporter.start();
        for i in 1..=3 {
            reporter.segment_done(i, 3);
        }
        reporter.done();

        let states = seen.lock().unwrap();
        assert_eq!(percentages(&states), vec![0, 33, 67, 100]);
    }

    #[test]
    fn test_percentage_never_decreases() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let reporter = ProgressReporter::new();
        reporter.add_sink(Box::new(Recorder(seen.clone())));

        reporter.start();
        reporter.segment_done(2, 3);
        // Out-of-order report must not move the bar backwards.
        reporter.segment_done(1, 3);

        let states = seen.lock().unwrap();
        assert_eq!(percentages(&states), vec![0, 67, 67]);
    }

    #[test]
    fn test_clones_share_state() {
        let reporter = ProgressReporter::new();
        let handle = reporter.clone();
        handle.start();
        handle.segment_done(1, 2);
        assert_eq!(
            reporter.state(),
            ProgressState::Running {
                percentage: 50,
                message: "segment 1 of 2".to_string()
            }
        );
    }

    #[test]
    fn test_failure_state() {
        let reporter = ProgressReporter::new();
        reporter.start();
        reporter.failed();
        assert_eq!(reporter.state(), ProgressState::Failed);
    }

    #[test]
    fn test_zero_total_is_ignored() {
        let reporter = ProgressReporter::new();
        reporter.start();
        reporter.segment_done(1, 0);
        assert_eq!(
            reporter.state(),
            ProgressState::Running {
                percentage: 0,
                message: "starting".to_string()
            }
        );
    }
}

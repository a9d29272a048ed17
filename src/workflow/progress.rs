// src/workflow/progress.rs
//! Progress events for long-running generation calls, fanned out to any number
//! of WebSocket subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
    Update {
        run_id: u64,
        percent: u8,
        label: String,
        timestamp: DateTime<Utc>,
    },
    Cleared {
        run_id: u64,
        timestamp: DateTime<Utc>,
    },
}

/// Which remote call a run belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Images,
    Videos,
}

/// Coarse steps of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStep {
    Starting,
    Sending,
    Processing,
    Done,
}

impl ProgressStep {
    pub fn percent(&self) -> u8 {
        match self {
            ProgressStep::Starting => 5,
            ProgressStep::Sending => 15,
            ProgressStep::Processing => 70,
            ProgressStep::Done => 100,
        }
    }

    pub fn label(&self, kind: RunKind) -> &'static str {
        match (kind, self) {
            (RunKind::Images, ProgressStep::Starting) => "Starting campaign generation...",
            (RunKind::Images, ProgressStep::Sending) => "Generating campaign & images...",
            (RunKind::Images, ProgressStep::Processing) => "Images generated, processing results...",
            (RunKind::Images, ProgressStep::Done) => "Done! Images ready below.",
            (RunKind::Videos, ProgressStep::Starting) => "Starting video generation...",
            (RunKind::Videos, ProgressStep::Sending) => "Sending request to backend...",
            (RunKind::Videos, ProgressStep::Processing) => "Videos generated, processing results...",
            (RunKind::Videos, ProgressStep::Done) => "Done! Videos ready below.",
        }
    }
}

/// Emits non-decreasing percentages within a run
pub struct ProgressReporter {
    sender: broadcast::Sender<ProgressEvent>,
    run_id: AtomicU64,
    floor: AtomicU8,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            run_id: AtomicU64::new(0),
            floor: AtomicU8::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }

    /// Starts a new run and returns its id
    pub fn begin_run(&self) -> u64 {
        self.floor.store(0, Ordering::SeqCst);
        self.run_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current_run(&self) -> u64 {
        self.run_id.load(Ordering::SeqCst)
    }

    /// Returns the percent actually emitted after clamping
    pub fn emit(&self, percent: u8, label: &str) -> u8 {
        let requested = percent.min(100);
        let previous = self.floor.fetch_max(requested, Ordering::SeqCst);
        if requested < previous {
            tracing::warn!(
                "Progress went backwards ({} < {}), holding at {}",
                requested,
                previous,
                previous
            );
        }
        let percent = requested.max(previous);

        tracing::debug!("Progress {}%: {}", percent, label);
        // No subscribers is fine; the page may not be connected.
        let _ = self.sender.send(ProgressEvent::Update {
            run_id: self.current_run(),
            percent,
            label: label.to_string(),
            timestamp: Utc::now(),
        });
        percent
    }

    pub fn emit_step(&self, kind: RunKind, step: ProgressStep) -> u8 {
        self.emit(step.percent(), step.label(kind))
    }

    pub fn clear(&self) {
        let _ = self.sender.send(ProgressEvent::Cleared {
            run_id: self.current_run(),
            timestamp: Utc::now(),
        });
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_never_decreases_within_a_run() {
        let reporter = ProgressReporter::new();
        let mut rx = reporter.subscribe();
        reporter.begin_run();

        assert_eq!(reporter.emit(15, "a"), 15);
        assert_eq!(reporter.emit(5, "b"), 15);
        assert_eq!(reporter.emit(250, "c"), 100);

        let percents: Vec<u8> = std::iter::from_fn(|| rx.try_recv().ok())
            .filter_map(|event| match event {
                ProgressEvent::Update { percent, .. } => Some(percent),
                ProgressEvent::Cleared { .. } => None,
            })
            .collect();
        assert_eq!(percents, vec![15, 15, 100]);
    }

    #[test]
    fn test_new_run_resets_floor() {
        let reporter = ProgressReporter::new();
        let first = reporter.begin_run();
        reporter.emit(100, "done");
        let second = reporter.begin_run();
        assert_eq!(second, first + 1);
        assert_eq!(reporter.emit_step(RunKind::Videos, ProgressStep::Starting), 5);
    }

    #[test]
    fn test_emit_without_subscribers_does_not_fail() {
        let reporter = ProgressReporter::new();
        reporter.begin_run();
        reporter.emit_step(RunKind::Images, ProgressStep::Done);
        reporter.clear();
    }

    #[test]
    fn test_events_serialize_with_type_tag() {
        let event = ProgressEvent::Cleared { run_id: 3, timestamp: Utc::now() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "cleared");
        assert_eq!(json["run_id"], 3);
    }
}

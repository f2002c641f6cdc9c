//! Status reporting for generation runs: a small trait so the UI layer (or
//! tests) can observe stage transitions and per-product ticks without the
//! orchestrator holding any global notification state.

use crate::orchestrator::GenerationStage;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

/// Consumer of run progress. Implementations route updates to a UI,
/// notification service, or test capture.
pub trait StatusSink: Send + Sync {
    /// A stage finished; `percent` is the coarse overall progress checkpoint.
    fn stage_changed(&self, stage: GenerationStage, percent: u8);
    /// One unit of work finished (successfully or not) for a product.
    fn unit_finished(&self, stage: GenerationStage, product_index: usize, ok: bool);
    /// The run failed as a whole and produced no result.
    fn run_failed(&self, message: &str);
}

/// Default sink: structured log lines.
pub struct TracingStatusSink;

impl StatusSink for TracingStatusSink {
    fn stage_changed(&self, stage: GenerationStage, percent: u8) {
        info!(stage = ?stage, percent, "generation stage complete");
    }

    fn unit_finished(&self, stage: GenerationStage, product_index: usize, ok: bool) {
        info!(stage = ?stage, product_index, ok, "generation unit finished");
    }

    fn run_failed(&self, message: &str) {
        error!(message, "generation run failed");
    }
}

/// No-op sink for callers that poll run state instead.
pub struct NoOpStatusSink;

impl StatusSink for NoOpStatusSink {
    fn stage_changed(&self, _stage: GenerationStage, _percent: u8) {}
    fn unit_finished(&self, _stage: GenerationStage, _product_index: usize, _ok: bool) {}
    fn run_failed(&self, _message: &str) {}
}

/// Event record captured by [`CaptureStatusSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    StageChanged { stage: GenerationStage, percent: u8 },
    UnitFinished {
        stage: GenerationStage,
        product_index: usize,
        ok: bool,
    },
    RunFailed { message: String },
}

/// In-memory sink that captures events for testing.
#[derive(Default)]
pub struct CaptureStatusSink {
    events: Mutex<Vec<StatusEvent>>,
}

impl CaptureStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StatusEvent> {
        self.events.lock().expect("status sink mutex poisoned").clone()
    }

    pub fn stage_percents(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                StatusEvent::StageChanged { percent, .. } => Some(percent),
                _ => None,
            })
            .collect()
    }
}

impl StatusSink for CaptureStatusSink {
    fn stage_changed(&self, stage: GenerationStage, percent: u8) {
        self.events
            .lock()
            .expect("status sink mutex poisoned")
            .push(StatusEvent::StageChanged { stage, percent });
    }

    fn unit_finished(&self, stage: GenerationStage, product_index: usize, ok: bool) {
        self.events
            .lock()
            .expect("status sink mutex poisoned")
            .push(StatusEvent::UnitFinished {
                stage,
                product_index,
                ok,
            });
    }

    fn run_failed(&self, message: &str) {
        self.events
            .lock()
            .expect("status sink mutex poisoned")
            .push(StatusEvent::RunFailed {
                message: message.to_string(),
            });
    }
}

/// Convenience: the default logging sink.
pub fn tracing_sink() -> Arc<dyn StatusSink> {
    Arc::new(TracingStatusSink)
}

/// Convenience: a capture sink for tests.
pub fn capture_sink() -> Arc<CaptureStatusSink> {
    Arc::new(CaptureStatusSink::new())
}

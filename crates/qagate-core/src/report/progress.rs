//! Per-record progress events. The runner emits one event per record as it
//! completes; the console layer consumes them through a sink.

use crate::gate::QualityTier;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Records finished so far, this one included.
    pub done: usize,
    pub total: usize,
    /// 0-based position of the record in the input.
    pub index: usize,
    pub question_preview: String,
    pub accuracy: u8,
    pub style: u8,
    /// `None` when the grader could not evaluate the record.
    pub tier: Option<QualityTier>,
    pub attempts: u32,
    pub reason: Option<String>,
}

pub type ProgressSink = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

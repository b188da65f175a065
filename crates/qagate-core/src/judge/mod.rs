mod judge_internal;

use crate::config::GraderConfig;
use crate::model::{Evaluation, GradeStatus, QaRecord, QualityVerdict};
use crate::providers::llm::LlmClient;
use std::sync::Arc;

pub use judge_internal::extract::extract;

/// Explanation carried by the fallback verdict when no attempt produced a
/// parseable verdict.
pub const PARSE_FAILURE_EXPLANATION: &str = "structured response could not be parsed";

/// Final outcome of grading one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub verdict: QualityVerdict,
    pub evaluation: Evaluation,
}

impl Grade {
    pub fn is_evaluated(&self) -> bool {
        self.evaluation.status == GradeStatus::Graded
    }
}

/// Grades records with an LLM, retrying bounded times.
///
/// [`Grader::grade`] never fails: when every attempt is exhausted it returns
/// the lowest verdict on both axes and marks the record unevaluated.
#[derive(Clone)]
pub struct Grader {
    config: GraderConfig,
    client: Arc<dyn LlmClient>,
}

impl Grader {
    pub fn new(config: GraderConfig, client: Arc<dyn LlmClient>) -> Self {
        Self { config, client }
    }

    pub async fn grade(&self, record: &QaRecord) -> Grade {
        judge_internal::run::grade_impl(self, record).await
    }
}

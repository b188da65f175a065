use super::client::{call_grader_impl, AttemptOutcome};
use crate::errors::error_kind;
use crate::judge::{Grade, Grader, PARSE_FAILURE_EXPLANATION};
use crate::model::{Evaluation, QaRecord, QualityVerdict};
use tracing::{debug, warn};

pub(crate) async fn grade_impl(grader: &Grader, record: &QaRecord) -> Grade {
    let prompt = super::prompt::build_prompt_impl(record);
    let max_attempts = grader.config.max_attempts.max(1);
    let backoff = grader.config.backoff();

    let mut attempt = 0;
    loop {
        attempt += 1;
        debug!(attempt, max_attempts, "grading attempt");

        match call_grader_impl(grader, &prompt).await {
            AttemptOutcome::Verdict(verdict) => {
                return Grade {
                    verdict,
                    evaluation: Evaluation::graded(attempt),
                };
            }
            AttemptOutcome::Unparseable { response_chars } => {
                warn!(
                    attempt,
                    max_attempts, response_chars, "no structured verdict in model output"
                );
                if attempt >= max_attempts {
                    return fallback(attempt, PARSE_FAILURE_EXPLANATION.to_string());
                }
                // Parse failures retry immediately; only call failures back off.
            }
            AttemptOutcome::Failed(e) => {
                warn!(
                    attempt,
                    max_attempts,
                    error.kind = error_kind(&e),
                    error = %e,
                    backoff_ms = backoff.as_millis() as u64,
                    "grading call failed"
                );
                if attempt >= max_attempts {
                    return fallback(attempt, format!("Error: {e}"));
                }
                tokio::time::sleep(backoff).await;
            }
        }
    }
}

fn fallback(attempts: u32, explanation: String) -> Grade {
    Grade {
        verdict: QualityVerdict::fallback(explanation.clone()),
        evaluation: Evaluation::unevaluated(attempts, explanation),
    }
}

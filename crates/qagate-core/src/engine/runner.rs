use crate::config::RunSettings;
use crate::gate::{QualityGate, QualityTier};
use crate::judge::{Grade, Grader};
use crate::model::{Evaluation, GradedRecord, QaRecord, QualityVerdict};
use crate::report::console::PREVIEW_CHARS;
use crate::report::progress::{ProgressEvent, ProgressSink};
use crate::report::TierCounts;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Result of one batch. Every vector follows input order.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Original records that reached the premium tier.
    pub premium: Vec<QaRecord>,
    /// Every input record with its final verdict.
    pub all_graded: Vec<GradedRecord>,
    /// Original records the grader could not evaluate.
    pub unevaluated: Vec<QaRecord>,
    pub counts: TierCounts,
}

pub struct BatchRunner {
    pub grader: Grader,
    pub gate: QualityGate,
    pub settings: RunSettings,
}

impl BatchRunner {
    pub fn new(grader: Grader, gate: QualityGate, settings: RunSettings) -> Self {
        Self {
            grader,
            gate,
            settings,
        }
    }

    /// Grades and partitions `records`.
    ///
    /// With `concurrency == 1` records are graded one after another. Larger
    /// values grade up to that many records at once; results are put back
    /// into input order before partitioning, so outputs are identical either
    /// way. `progress` is called once per record in completion order.
    pub async fn run(&self, records: &[QaRecord], progress: Option<ProgressSink>) -> BatchOutcome {
        let total = records.len();
        let parallel = self.settings.concurrency.max(1);
        info!(total, parallel, "grading batch");

        let grades = if parallel == 1 {
            self.grade_sequential(records, progress.as_ref()).await
        } else {
            self.grade_parallel(records, parallel, progress.as_ref())
                .await
        };

        let outcome = self.partition(records, grades);
        info!(
            total,
            premium = outcome.counts.premium,
            unevaluated = outcome.counts.unevaluated,
            "batch complete"
        );
        outcome
    }

    async fn grade_sequential(
        &self,
        records: &[QaRecord],
        progress: Option<&ProgressSink>,
    ) -> Vec<Grade> {
        let mut grades = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let grade = self.grader.grade(record).await;
            self.emit(progress, grades.len() + 1, records.len(), index, record, &grade);
            grades.push(grade);
        }
        grades
    }

    async fn grade_parallel(
        &self,
        records: &[QaRecord],
        parallel: usize,
        progress: Option<&ProgressSink>,
    ) -> Vec<Grade> {
        let total = records.len();
        let sem = Arc::new(Semaphore::new(parallel));
        let mut join_set = JoinSet::new();

        for (index, record) in records.iter().enumerate() {
            let sem = sem.clone();
            let grader = self.grader.clone();
            let record = record.clone();
            join_set.spawn(async move {
                // Never closed; acquire cannot fail.
                let _permit = sem.acquire_owned().await.ok();
                let grade = grader.grade(&record).await;
                (index, grade)
            });
        }

        let mut slots: Vec<Option<Grade>> = vec![None; total];
        let mut done = 0;
        while let Some(res) = join_set.join_next().await {
            match res {
                Ok((index, grade)) => {
                    done += 1;
                    self.emit(progress, done, total, index, &records[index], &grade);
                    slots[index] = Some(grade);
                }
                Err(e) => warn!(error = %e, "grading task aborted"),
            }
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    let reason = "grading task aborted";
                    warn!(index, "{}", reason);
                    Grade {
                        verdict: QualityVerdict::fallback(reason),
                        evaluation: Evaluation::unevaluated(0, reason),
                    }
                })
            })
            .collect()
    }

    /// Tier of a finished grade. Unevaluated records have none, whatever
    /// their fallback verdict would classify as.
    fn tier_of(&self, grade: &Grade) -> Option<QualityTier> {
        grade
            .is_evaluated()
            .then(|| self.gate.classify(&grade.verdict))
    }

    fn partition(&self, records: &[QaRecord], grades: Vec<Grade>) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for (record, grade) in records.iter().zip(grades) {
            let tier = self.tier_of(&grade);
            outcome.counts.record(tier);
            match tier {
                Some(QualityTier::Premium) => outcome.premium.push(record.clone()),
                None => outcome.unevaluated.push(record.clone()),
                Some(_) => {}
            }
            outcome
                .all_graded
                .push(GradedRecord::new(record, grade.verdict, grade.evaluation));
        }
        outcome
    }

    fn emit(
        &self,
        progress: Option<&ProgressSink>,
        done: usize,
        total: usize,
        index: usize,
        record: &QaRecord,
        grade: &Grade,
    ) {
        if let Some(sink) = progress {
            sink(ProgressEvent {
                done,
                total,
                index,
                question_preview: record.question_preview(PREVIEW_CHARS),
                accuracy: grade.verdict.accuracy.score,
                style: grade.verdict.style.score,
                tier: self.tier_of(grade),
                attempts: grade.evaluation.attempts,
                reason: grade.evaluation.reason.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraderConfig;
    use crate::model::LlmResponse;
    use crate::providers::llm::LlmClient;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers by question text so results do not depend on call order.
    struct ByQuestionClient {
        replies: HashMap<String, String>,
    }

    fn verdict_json(accuracy: u8, style: u8) -> String {
        format!(
            r#"{{"accuracy": {{"score": {accuracy}, "explanation": "a"}}, "style": {{"score": {style}, "explanation": "s"}}}}"#
        )
    }

    #[async_trait]
    impl LlmClient for ByQuestionClient {
        async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse> {
            let text = self
                .replies
                .iter()
                .find(|(q, _)| prompt.contains(&format!("Question: {q}\n")))
                .map(|(_, reply)| reply.clone())
                .ok_or_else(|| anyhow::anyhow!("unscripted question"))?;
            Ok(LlmResponse {
                text,
                provider: "mock".into(),
                model: "mock".into(),
                meta: serde_json::Value::Null,
            })
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }

        fn model_name(&self) -> &str {
            "mock"
        }
    }

    fn runner(replies: &[(&str, String)], concurrency: usize) -> BatchRunner {
        let client = Arc::new(ByQuestionClient {
            replies: replies
                .iter()
                .map(|(q, r)| (q.to_string(), r.clone()))
                .collect(),
        });
        let config = GraderConfig {
            backoff_ms: 0,
            ..Default::default()
        };
        BatchRunner::new(
            Grader::new(config, client),
            QualityGate::default(),
            RunSettings { concurrency },
        )
    }

    fn three_tiers() -> (Vec<QaRecord>, BatchRunner) {
        let records = vec![
            QaRecord::new("q1", "a1").with_field("id", serde_json::json!(1)),
            QaRecord::new("q2", "a2"),
            QaRecord::new("q3", "a3"),
        ];
        let replies = [
            ("q1", verdict_json(9, 8)),
            ("q2", verdict_json(7, 7)),
            ("q3", verdict_json(8, 6)),
        ];
        (records, runner(&replies, 1))
    }

    #[tokio::test]
    async fn partitions_premium_acceptable_rejected() {
        let (records, runner) = three_tiers();
        let outcome = runner.run(&records, None).await;

        assert_eq!(outcome.premium, vec![records[0].clone()]);
        assert_eq!(outcome.all_graded.len(), 3);
        for (graded, original) in outcome.all_graded.iter().zip(&records) {
            assert_eq!(&graded.record, original);
        }
        assert_eq!(outcome.all_graded[1].final_quality.accuracy.score, 7);
        assert_eq!(outcome.all_graded[2].final_quality.style.score, 6);
        assert!(outcome.unevaluated.is_empty());
        assert_eq!(outcome.counts.premium, 1);
        assert_eq!(outcome.counts.acceptable, 1);
        assert_eq!(outcome.counts.rejected, 1);
    }

    #[tokio::test]
    async fn progress_reports_each_record_in_order() {
        let (records, runner) = three_tiers();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        let sink: ProgressSink = Arc::new(move |ev: ProgressEvent| {
            sink_seen.lock().unwrap().push((ev.index, ev.done, ev.tier));
        });

        runner.run(&records, Some(sink)).await;

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (0, 1, Some(QualityTier::Premium)),
                (1, 2, Some(QualityTier::Acceptable)),
                (2, 3, Some(QualityTier::Rejected)),
            ]
        );
    }

    #[tokio::test]
    async fn unevaluated_records_are_kept_apart() {
        let records = vec![QaRecord::new("q1", "a1"), QaRecord::new("q2", "a2")];
        let replies = [("q1", "not json".to_string()), ("q2", verdict_json(10, 10))];
        let outcome = runner(&replies, 1).run(&records, None).await;

        assert_eq!(outcome.unevaluated, vec![records[0].clone()]);
        assert_eq!(outcome.premium, vec![records[1].clone()]);
        assert_eq!(outcome.all_graded[0].final_quality.accuracy.score, 1);
        assert_eq!(outcome.counts.unevaluated, 1);
        assert_eq!(outcome.counts.rejected, 0);
    }

    #[tokio::test]
    async fn parallel_run_matches_sequential_order() {
        let records: Vec<QaRecord> = (0..20)
            .map(|i| QaRecord::new(format!("q{i}"), format!("a{i}")))
            .collect();
        let replies: Vec<(String, String)> = (0..20)
            .map(|i| (format!("q{i}"), verdict_json(1 + (i % 10) as u8, 8)))
            .collect();
        let replies: Vec<(&str, String)> =
            replies.iter().map(|(q, r)| (q.as_str(), r.clone())).collect();

        let sequential = runner(&replies, 1).run(&records, None).await;
        let parallel = runner(&replies, 4).run(&records, None).await;

        assert_eq!(parallel.all_graded, sequential.all_graded);
        assert_eq!(parallel.premium, sequential.premium);
        assert_eq!(parallel.counts, sequential.counts);
        assert_eq!(parallel.premium.len(), 6);
    }

    #[tokio::test]
    async fn empty_input_yields_empty_outcome() {
        let outcome = runner(&[], 3).run(&[], None).await;
        assert!(outcome.all_graded.is_empty());
        assert_eq!(outcome.counts.premium_yield_pct(), 0.0);
    }
}

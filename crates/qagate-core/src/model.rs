use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys the pipeline writes onto a graded record. Stale copies carried in
/// from a previous run are dropped so the output never holds two verdicts.
const RESERVED_KEYS: [&str; 2] = ["final_quality", "evaluation"];

/// One candidate question/answer pair.
///
/// Any field other than `question` and `answer` is kept in `extra`, in the
/// order it appeared in the input, and written back out untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QaRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// First `max_chars` characters of the question, for progress lines.
    pub fn question_preview(&self, max_chars: usize) -> String {
        let mut chars = self.question.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

/// Judgment on a single axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u8,
    #[serde(default)]
    pub explanation: String,
}

impl ScoreEntry {
    pub const MIN_SCORE: u8 = 1;
    pub const MAX_SCORE: u8 = 10;

    pub fn new(score: u8, explanation: impl Into<String>) -> Self {
        Self {
            score,
            explanation: explanation.into(),
        }
    }

    pub fn in_range(&self) -> bool {
        (Self::MIN_SCORE..=Self::MAX_SCORE).contains(&self.score)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityVerdict {
    pub accuracy: ScoreEntry,
    pub style: ScoreEntry,
}

impl QualityVerdict {
    pub fn new(accuracy: ScoreEntry, style: ScoreEntry) -> Self {
        Self { accuracy, style }
    }

    /// Lowest possible verdict on both axes, carrying the same explanation.
    pub fn fallback(explanation: impl Into<String>) -> Self {
        let explanation = explanation.into();
        Self {
            accuracy: ScoreEntry::new(ScoreEntry::MIN_SCORE, explanation.clone()),
            style: ScoreEntry::new(ScoreEntry::MIN_SCORE, explanation),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.accuracy.in_range() && self.style.in_range()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeStatus {
    /// The model returned a structured verdict.
    Graded,
    /// Every attempt failed; the verdict is the fallback.
    Unevaluated,
}

/// How a verdict was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub status: GradeStatus,
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Evaluation {
    pub fn graded(attempts: u32) -> Self {
        Self {
            status: GradeStatus::Graded,
            attempts,
            reason: None,
        }
    }

    pub fn unevaluated(attempts: u32, reason: impl Into<String>) -> Self {
        Self {
            status: GradeStatus::Unevaluated,
            attempts,
            reason: Some(reason.into()),
        }
    }
}

/// An input record together with its final verdict, as written to the full
/// results file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedRecord {
    #[serde(flatten)]
    pub record: QaRecord,
    pub final_quality: QualityVerdict,
    pub evaluation: Evaluation,
}

impl GradedRecord {
    pub fn new(record: &QaRecord, final_quality: QualityVerdict, evaluation: Evaluation) -> Self {
        let mut record = record.clone();
        for key in RESERVED_KEYS {
            record.extra.shift_remove(key);
        }
        Self {
            record,
            final_quality,
            evaluation,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub meta: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn passthrough_fields_keep_their_order() {
        let raw = r#"{"id": 7, "question": "q", "source": "doc.md", "answer": "a", "lang": "tr"}"#;
        let record: QaRecord = serde_json::from_str(raw).unwrap();
        let keys: Vec<&str> = record.extra.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "source", "lang"]);
    }

    #[test]
    fn graded_record_flattens_input_fields() {
        let record = QaRecord::new("What is Rust?", "A language.").with_field("id", json!(1));
        let graded = GradedRecord::new(
            &record,
            QualityVerdict::new(ScoreEntry::new(9, "ok"), ScoreEntry::new(8, "ok")),
            Evaluation::graded(1),
        );
        let value = serde_json::to_value(&graded).unwrap();
        assert_eq!(value["question"], "What is Rust?");
        assert_eq!(value["id"], 1);
        assert_eq!(value["final_quality"]["accuracy"]["score"], 9);
        assert_eq!(value["evaluation"]["status"], "graded");
        assert!(value["evaluation"].get("reason").is_none());
    }

    #[test]
    fn stale_verdict_from_previous_run_is_replaced() {
        let record = QaRecord::new("q", "a").with_field(
            "final_quality",
            json!({"accuracy": {"score": 2, "explanation": "old"}}),
        );
        let graded = GradedRecord::new(
            &record,
            QualityVerdict::fallback("new"),
            Evaluation::unevaluated(3, "timeout"),
        );
        let text = serde_json::to_string(&graded).unwrap();
        assert_eq!(text.matches("final_quality").count(), 1);
        assert!(text.contains("\"new\""));
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let record = QaRecord::new("çğıöşü".repeat(20), "a");
        let preview = record.question_preview(5);
        assert_eq!(preview, "çğıöş...");
        assert_eq!(QaRecord::new("short", "a").question_preview(80), "short");
    }

    #[test]
    fn fallback_is_lowest_on_both_axes() {
        let v = QualityVerdict::fallback("no verdict");
        assert_eq!(v.accuracy.score, 1);
        assert_eq!(v.style.score, 1);
        assert!(v.is_well_formed());
        assert!(!QualityVerdict::new(ScoreEntry::new(0, ""), ScoreEntry::new(5, "")).is_well_formed());
    }
}

//! End-to-end grading against a mock Ollama endpoint: records are loaded
//! from disk, graded over streamed NDJSON, partitioned, and written back.

use qagate_core::config::{CurateConfig, GraderConfig, ProviderKind};
use qagate_core::engine::runner::BatchRunner;
use qagate_core::gate::QualityGate;
use qagate_core::judge::Grader;
use qagate_core::model::{GradeStatus, GradedRecord, QaRecord};
use qagate_core::providers::llm::build_client;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Splits `text` into NDJSON fragments the way Ollama streams them.
fn ndjson_stream(text: &str, pieces: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let step = chars.len().div_ceil(pieces).max(1);
    let mut out = String::new();
    for chunk in chars.chunks(step) {
        let fragment: String = chunk.iter().collect();
        out.push_str(&json!({ "model": "gemma2:2b", "response": fragment, "done": false }).to_string());
        out.push('\n');
    }
    out.push_str(&json!({ "model": "gemma2:2b", "response": "", "done": true }).to_string());
    out.push('\n');
    out
}

fn verdict_text(accuracy: u8, style: u8) -> String {
    format!(
        "```json\n{{\n  \"accuracy\": {{\"score\": {accuracy}, \"explanation\": \"checked\"}},\n  \"style\": {{\"score\": {style}, \"explanation\": \"read\"}}\n}}\n```"
    )
}

async fn mount_reply(server: &MockServer, question: &str, body: String) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains(format!("Question: {question}\\n")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn config_for(server: &MockServer) -> CurateConfig {
    CurateConfig {
        grader: GraderConfig {
            provider: ProviderKind::Ollama,
            endpoint: Some(server.uri()),
            backoff_ms: 10,
            timeout_secs: 5,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn runner_for(cfg: &CurateConfig) -> BatchRunner {
    let client = build_client(&cfg.grader, None).unwrap();
    BatchRunner::new(
        Grader::new(cfg.grader.clone(), client),
        QualityGate::new(cfg.gate),
        cfg.run.clone(),
    )
}

#[tokio::test]
async fn graded_corpus_is_partitioned_and_written() {
    let server = MockServer::start().await;
    mount_reply(&server, "Premium?", ndjson_stream(&verdict_text(9, 9), 7)).await;
    mount_reply(&server, "Acceptable?", ndjson_stream(&verdict_text(7, 8), 3)).await;
    mount_reply(&server, "Rejected?", ndjson_stream(&verdict_text(8, 6), 1)).await;

    let tmp = tempdir().unwrap();
    let input = tmp.path().join("generated_qa.json");
    std::fs::write(
        &input,
        serde_json::to_string(&json!([
            { "question": "Premium?", "answer": "yes", "source": "a.md" },
            { "question": "Acceptable?", "answer": "mostly" },
            { "question": "Rejected?", "answer": "no" }
        ]))
        .unwrap(),
    )
    .unwrap();

    let records = qagate_core::io::load_records(&input).unwrap();
    let cfg = config_for(&server);
    let outcome = runner_for(&cfg).run(&records, None).await;

    assert_eq!(outcome.premium.len(), 1);
    assert_eq!(outcome.premium[0].question, "Premium?");
    assert_eq!(outcome.premium[0].extra["source"], "a.md");
    let tiers: Vec<(u8, u8)> = outcome
        .all_graded
        .iter()
        .map(|g| (g.final_quality.accuracy.score, g.final_quality.style.score))
        .collect();
    assert_eq!(tiers, vec![(9, 9), (7, 8), (8, 6)]);

    let premium_out = tmp.path().join("final_premium_qa.json");
    let results_out = tmp.path().join("final_quality_results.json");
    qagate_core::io::write_json(&premium_out, &outcome.premium).unwrap();
    qagate_core::io::write_json(&results_out, &outcome.all_graded).unwrap();

    let premium: Vec<QaRecord> =
        serde_json::from_str(&std::fs::read_to_string(&premium_out).unwrap()).unwrap();
    assert_eq!(premium, outcome.premium);
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&results_out).unwrap()).unwrap();
    assert_eq!(raw[0]["source"], "a.md");
    assert_eq!(raw[1]["final_quality"]["style"]["explanation"], "read");
    let graded: Vec<GradedRecord> = serde_json::from_value(raw).unwrap();
    assert!(graded
        .iter()
        .all(|g| g.evaluation.status == GradeStatus::Graded));
}

#[tokio::test]
async fn request_carries_generation_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "gemma2:2b",
            "stream": true,
            "options": { "num_predict": 800 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(ndjson_stream(&verdict_text(8, 8), 4)))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = config_for(&server);
    let outcome = runner_for(&cfg)
        .run(&[QaRecord::new("q", "a")], None)
        .await;
    assert_eq!(outcome.premium.len(), 1);
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("llama runner crashed"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ndjson_stream(&verdict_text(10, 9), 5)))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = config_for(&server);
    let client = build_client(&cfg.grader, None).unwrap();
    let grade = Grader::new(cfg.grader.clone(), client)
        .grade(&QaRecord::new("q", "a"))
        .await;

    assert!(grade.is_evaluated());
    assert_eq!(grade.evaluation.attempts, 3);
    assert_eq!(grade.verdict.accuracy.score, 10);
}

#[tokio::test]
async fn persistent_failure_marks_record_unevaluated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{\"error\":\"model 'gemma2:2b' not found, try pulling it first\"}\n"),
        )
        .expect(3)
        .mount(&server)
        .await;

    let cfg = config_for(&server);
    let outcome = runner_for(&cfg)
        .run(&[QaRecord::new("q", "a")], None)
        .await;

    assert!(outcome.premium.is_empty());
    assert_eq!(outcome.unevaluated.len(), 1);
    let graded = &outcome.all_graded[0];
    assert_eq!(graded.final_quality.accuracy.score, 1);
    assert_eq!(graded.final_quality.style.score, 1);
    assert_eq!(graded.evaluation.status, GradeStatus::Unevaluated);
    assert!(graded
        .final_quality
        .accuracy
        .explanation
        .contains("not found, try pulling it first"));
}

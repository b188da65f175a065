use qagate_core::engine::runner::{BatchOutcome, BatchRunner};
use qagate_core::errors::CurateResult;
use qagate_core::gate::QualityGate;
use qagate_core::io::StagedOutputs;
use qagate_core::judge::Grader;
use qagate_core::providers::llm::build_client;
use qagate_core::report::console::{default_progress_sink, print_summary};
use qagate_core::report::summary::RunSummary;
use tracing::info;

use super::{report_error, resolve_config};
use crate::cli::args::{GradeArgs, OutputFormat};
use crate::exit_codes;

pub async fn run(args: GradeArgs) -> anyhow::Result<i32> {
    let cfg = match resolve_config(&args.grader) {
        Ok(c) => c,
        Err(e) => return Ok(report_error(&e)),
    };

    // Input problems stop the run before any model call.
    let records = match qagate_core::io::load_records(&args.input) {
        Ok(r) => r,
        Err(e) => return Ok(report_error(&e)),
    };
    info!(
        input = %args.input.display(),
        records = records.len(),
        provider = %cfg.grader.provider,
        model = %cfg.grader.model,
        "loaded corpus"
    );

    let client = match build_client(&cfg.grader, args.grader.api_key.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e:#}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let runner = BatchRunner::new(
        Grader::new(cfg.grader.clone(), client),
        QualityGate::new(cfg.gate),
        cfg.run.clone(),
    );
    let progress = (!args.quiet).then(default_progress_sink);
    let outcome = runner.run(&records, progress).await;

    let summary = RunSummary::new(&cfg, outcome.counts);
    if let Err(e) = write_outputs(&args, &outcome, &summary) {
        return Ok(report_error(&e));
    }

    print_summary(&outcome.counts);
    eprintln!("Premium records written to {}", args.premium_out.display());
    eprintln!("All results written to {}", args.results_out.display());

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(exit_codes::SUCCESS)
}

/// Stages every requested artifact, then lands them together. A run that
/// fails here leaves none of this run's files behind.
fn write_outputs(args: &GradeArgs, outcome: &BatchOutcome, summary: &RunSummary) -> CurateResult<()> {
    let mut outputs = StagedOutputs::new();
    outputs.stage(&args.premium_out, &outcome.premium)?;
    outputs.stage(&args.results_out, &outcome.all_graded)?;
    if let Some(path) = &args.unevaluated_out {
        outputs.stage(path, &outcome.unevaluated)?;
    }
    if let Some(path) = &args.summary_out {
        outputs.stage(path, summary)?;
    }
    outputs.commit()?;
    info!(
        premium = %args.premium_out.display(),
        results = %args.results_out.display(),
        "wrote artifacts"
    );
    Ok(())
}

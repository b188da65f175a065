use qagate_core::io::{inspect_records, load_records};
use serde_json::json;

use super::report_error;
use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::exit_codes;

/// Loads the corpus and reports records that will not grade well.
///
/// Blank fields are warnings: the run would still grade them. Only an
/// unreadable or malformed corpus fails the command.
pub fn run(args: ValidateArgs) -> anyhow::Result<i32> {
    let records = match load_records(&args.input) {
        Ok(r) => r,
        Err(e) => return Ok(report_error(&e)),
    };
    let issues = inspect_records(&records);

    match args.format {
        OutputFormat::Text => {
            for issue in &issues {
                eprintln!("warning: record {}: {}", issue.index, issue.message);
            }
            println!(
                "{}: {} records, {} warnings",
                args.input.display(),
                records.len(),
                issues.len()
            );
        }
        OutputFormat::Json => {
            let warnings: Vec<_> = issues
                .iter()
                .map(|i| json!({ "record": i.index, "message": i.message }))
                .collect();
            let report = json!({
                "input": args.input.display().to_string(),
                "records": records.len(),
                "warnings": warnings,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(exit_codes::SUCCESS)
}

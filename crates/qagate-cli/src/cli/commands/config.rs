use super::{report_error, resolve_config};
use crate::cli::args::ConfigArgs;
use crate::exit_codes;

/// Prints the configuration a `grade` run with the same flags would use.
pub fn run(args: ConfigArgs) -> anyhow::Result<i32> {
    let cfg = match resolve_config(&args.grader) {
        Ok(c) => c,
        Err(e) => return Ok(report_error(&e)),
    };
    match cfg.to_yaml() {
        Ok(yaml) => {
            print!("{yaml}");
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => Ok(report_error(&e)),
    }
}

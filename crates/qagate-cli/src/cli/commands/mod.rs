use super::args::*;

pub mod config;
pub mod grade;
pub mod validate;

use crate::exit_codes;
use qagate_core::config::{CurateConfig, ProviderKind};
use qagate_core::errors::{CurateError, CurateResult};

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Grade(args) => grade::run(args).await,
        Command::Validate(args) => validate::run(args),
        Command::Config(args) => config::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::SUCCESS)
        }
    }
}

/// Loads the config file (defaults when absent), applies flag and
/// environment overrides, and validates the result.
pub(crate) fn resolve_config(args: &GraderArgs) -> CurateResult<CurateConfig> {
    let mut cfg = CurateConfig::load_or_default(&args.config)?;

    if let Some(p) = &args.provider {
        let kind: ProviderKind = p.parse().map_err(CurateError::config)?;
        if kind != cfg.grader.provider {
            // An endpoint configured for another provider is meaningless here.
            cfg.grader.endpoint = None;
        }
        cfg.grader.provider = kind;
    }
    if let Some(m) = &args.model {
        cfg.grader.model = m.clone();
    }
    if let Some(e) = &args.endpoint {
        cfg.grader.endpoint = Some(e.clone());
    }
    if let Some(n) = args.max_attempts {
        cfg.grader.max_attempts = n;
    }
    if let Some(t) = args.timeout_secs {
        cfg.grader.timeout_secs = t;
    }
    if let Some(c) = args.concurrency {
        cfg.run.concurrency = c;
    }

    cfg.validate()?;
    Ok(cfg)
}

pub(crate) fn report_error(err: &CurateError) -> i32 {
    eprintln!("error: {err}");
    exit_codes::for_error(err)
}

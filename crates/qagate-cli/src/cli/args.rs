use clap::{Parser, Subcommand, ValueEnum};
use qagate_core::config::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "qagate",
    version,
    about = "Grade instruction-tuning QA pairs with an LLM and keep the premium ones"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,

    /// Log output format (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Grade every record of a corpus and write the premium and full result sets
    Grade(GradeArgs),
    /// Check that a corpus loads, without grading it
    Validate(ValidateArgs),
    /// Print the effective configuration as YAML
    Config(ConfigArgs),
    Version,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GradeArgs {
    /// JSON array of {question, answer, ...} records
    #[arg(long, short)]
    pub input: PathBuf,

    /// Where to write the premium records (original form)
    #[arg(long, default_value = "final_premium_qa.json")]
    pub premium_out: PathBuf,

    /// Where to write every record with its final verdict
    #[arg(long, default_value = "final_quality_results.json")]
    pub results_out: PathBuf,

    /// Where to write records the grader could not evaluate
    #[arg(long)]
    pub unevaluated_out: Option<PathBuf>,

    /// Where to write the machine-readable run summary
    #[arg(long)]
    pub summary_out: Option<PathBuf>,

    /// Suppress per-record progress lines
    #[arg(long)]
    pub quiet: bool,

    /// Also print the run summary to stdout in this format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub grader: GraderArgs,
}

/// Overrides layered on top of the config file.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct GraderArgs {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, env = "QAGATE_CONFIG")]
    pub config: PathBuf,

    /// Grading provider: ollama, openai or fake
    #[arg(long, env = "QAGATE_PROVIDER")]
    pub provider: Option<String>,

    /// Grading model identifier (provider-specific), e.g. gemma2:2b
    #[arg(long, env = "QAGATE_MODEL")]
    pub model: Option<String>,

    /// Base URL of the grading endpoint
    #[arg(long, env = "QAGATE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Attempts per record before falling back to the lowest verdict
    #[arg(long, env = "QAGATE_MAX_ATTEMPTS")]
    pub max_attempts: Option<u32>,

    /// Per-attempt timeout in seconds
    #[arg(long, env = "QAGATE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Records graded at once (1 = sequential)
    #[arg(long, env = "QAGATE_CONCURRENCY")]
    pub concurrency: Option<usize>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, hide = true)]
    pub api_key: Option<String>,
}

#[derive(clap::Args, Clone, Debug)]
pub struct ValidateArgs {
    #[arg(long, short)]
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub grader: GraderArgs,
}

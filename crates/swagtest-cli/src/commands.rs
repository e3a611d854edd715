//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// swagtest: page-object end-to-end suites for the Swag Labs storefront
#[derive(Parser, Debug)]
#[command(name = "swagtest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (only failures and the summary)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output
    #[arg(long, value_enum, default_value_t = ColorArg::Auto, global = true)]
    pub color: ColorArg,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Run configuration file (YAML)
    #[arg(short, long, env = "SWAGTEST_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run tests
    Test(TestArgs),

    /// List registered tests without running them
    List(ListArgs),

    /// Show the resolved configuration
    Config(ConfigArgs),
}

/// Settings that override the configuration file and environment
#[derive(Args, Debug, Default, Clone)]
pub struct OverrideArgs {
    /// Storefront address
    #[arg(long)]
    pub base_url: Option<String>,

    /// Number of parallel workers
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Retries per failing test
    #[arg(long)]
    pub retries: Option<u32>,

    /// Run every test on this backend only (simulated, chromium)
    #[arg(long)]
    pub backend: Option<String>,

    /// Per-test timeout in milliseconds
    #[arg(long)]
    pub test_timeout_ms: Option<u64>,

    /// Output directory for reports and artifacts
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Apply the CI profile (2 retries, 1 worker unless set)
    #[arg(long)]
    pub ci: bool,
}

/// Arguments for the test command
#[derive(Parser, Debug)]
pub struct TestArgs {
    /// Only run tests whose `suite::test` id contains this
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Configuration overrides
    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only list tests whose `suite::test` id contains this
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Print JSON instead of one id per line
    #[arg(long)]
    pub json: bool,

    /// Configuration overrides
    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Configuration overrides
    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Color output argument
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Auto-detect
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

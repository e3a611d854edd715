//! swagtest CLI: runs the Swag Labs suites
//!
//! ## Usage
//!
//! ```bash
//! swagtest test                         # Run every suite on the simulator
//! swagtest test --filter "checkout::"   # Filter tests
//! swagtest test --backend chromium      # Real browser (feature `browser`)
//! swagtest list                         # Show registered tests
//! swagtest config                       # Show the resolved configuration
//! ```

use clap::Parser;
use std::process::ExitCode;
use swagtest::logging::{self, LogOptions};
use swagtest_cli::{execute, Cli, ColorChoice};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let options = LogOptions::for_verbosity(cli.verbose, cli.quiet)
        .with_json(cli.json_logs)
        .with_ansi(ColorChoice::from(cli.color).should_color());
    logging::init(&options);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

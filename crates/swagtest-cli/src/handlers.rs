//! Subcommand handlers

use crate::commands::{Cli, Commands, ConfigArgs, ListArgs, TestArgs};
use crate::config::{resolve, ColorChoice};
use crate::error::{CliError, CliResult};
use crate::output::Printer;
use serde::Serialize;
use std::path::Path;
use swagtest::reporter::JSON_REPORT;
use swagtest::{RunConfig, Runner};

/// One row of `swagtest list --json`
#[derive(Debug, Serialize)]
struct ListedTest {
    id: String,
    target: String,
    suite: &'static str,
    name: &'static str,
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Dispatch a parsed command line
pub fn execute(cli: Cli) -> CliResult<()> {
    let printer = Printer::new(ColorChoice::from(cli.color).should_color(), cli.quiet);
    let config_path = cli.config.as_deref();
    match &cli.command {
        Commands::Test(args) => run_tests(&printer, config_path, args),
        Commands::List(args) => list_tests(config_path, args),
        Commands::Config(args) => show_config(config_path, args),
    }
}

fn runner_for(config: RunConfig, filter: Option<&str>) -> CliResult<Runner> {
    let runner = Runner::new(config)?.with_filter(filter);
    if runner.plan().is_empty() {
        return Err(CliError::NoMatchingTests {
            filter: filter.unwrap_or_default().to_string(),
        });
    }
    Ok(runner)
}

fn run_tests(printer: &Printer, config_path: Option<&Path>, args: &TestArgs) -> CliResult<()> {
    let config = resolve(config_path, &args.overrides, env_var)?;
    let output_dir = config.output_dir.clone();
    let runner = runner_for(config, args.filter.as_deref())?;

    let planned = runner.plan().len();
    tracing::info!(
        tests = planned,
        workers = runner.config().workers(),
        retries = runner.config().retries(),
        base_url = %runner.config().base_url,
        "starting run"
    );
    printer.header(&format!(
        "Running {planned} tests against {}",
        runner.config().base_url
    ));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let report = runtime.block_on(runner.run_and_report())?;

    let report_path = output_dir.join(JSON_REPORT);
    printer.report(&report);
    printer.info(&format!("Report: {}", report_path.display()));

    if report.all_passed() {
        Ok(())
    } else {
        Err(CliError::TestsFailed {
            failed: report.failed_count(),
            total: report.total_count(),
            report: report_path,
        })
    }
}

fn list_tests(config_path: Option<&Path>, args: &ListArgs) -> CliResult<()> {
    let config = resolve(config_path, &args.overrides, env_var)?;
    let runner = runner_for(config, args.filter.as_deref())?;
    let plan = runner.plan();

    if args.json {
        let rows: Vec<ListedTest> = plan
            .into_iter()
            .map(|p| ListedTest {
                id: format!("{}::{}", p.suite, p.name),
                target: p.target,
                suite: p.suite,
                name: p.name,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for planned in &plan {
            println!("{} {}::{}", planned.target, planned.suite, planned.name);
        }
    }
    Ok(())
}

fn show_config(config_path: Option<&Path>, args: &ConfigArgs) -> CliResult<()> {
    let config = resolve(config_path, &args.overrides, env_var)?;
    print!("{}", config.to_yaml()?);
    println!(
        "# effective: retries={} workers={}",
        config.retries(),
        config.workers()
    );
    Ok(())
}

//! Registered suites against the real storefront in Chromium.
//!
//! Needs `--features browser`, a local Chromium and network access:
//!
//! ```bash
//! SWAGTEST_LIVE=1 cargo test -p swagtest --features browser -- --ignored
//! ```

#![cfg(feature = "browser")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use swagtest::{RunConfig, Runner, Target};

fn live() -> bool {
    std::env::var("SWAGTEST_LIVE").is_ok_and(|v| v == "1")
}

#[tokio::test]
#[ignore = "drives www.saucedemo.com in Chromium"]
async fn login_suite_passes_live() {
    if !live() {
        return;
    }
    let output = tempfile::tempdir().unwrap();
    let config = RunConfig::default()
        .with_targets(vec![Target::chromium()])
        .with_workers(2)
        .with_retries(1)
        .with_output_dir(output.path());
    let runner = Runner::new(config).unwrap().with_filter(Some("login::"));
    let report = runner.run_and_report().await.unwrap();
    assert!(report.all_passed(), "{:#?}", report.failures());
}

#[tokio::test]
#[ignore = "drives www.saucedemo.com in Chromium"]
async fn every_suite_passes_live() {
    if !live() {
        return;
    }
    let output = tempfile::tempdir().unwrap();
    let config = RunConfig::default()
        .with_targets(vec![Target::chromium()])
        .with_workers(1)
        .with_retries(2)
        .with_output_dir(output.path());
    let report = Runner::new(config).unwrap().run_and_report().await.unwrap();
    assert!(report.all_passed(), "{:#?}", report.failures());
}

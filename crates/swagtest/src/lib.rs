//! swagtest: page-object end-to-end suites for the Swag Labs storefront.
//!
//! Tests are written against page objects, page objects are written against
//! the [`PageDriver`] trait, and the trait has two backends: an in-memory
//! model of the storefront (default, hermetic) and Chromium over CDP
//! (feature `browser`).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ suites       │──►│ pages         │──►│ PageDriver   │──►│ SimDriver    │
//! │ (test specs) │   │ (LoginPage..) │   │ Locator      │   │ CdpDriver    │
//! └──────┬───────┘   └───────────────┘   └──────────────┘   └──────────────┘
//!        │ fixtures (users, products, customers, messages)
//!        ▼
//! ┌──────────────┐   ┌───────────────┐
//! │ runner       │──►│ reporter      │  report.json, junit.xml
//! └──────┬───────┘   └───────────────┘
//!        │ per attempt: screenshot, video.gif, trace.json
//!        ▼
//! ┌──────────────┐
//! │ artifacts    │
//! └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use swagtest::fixtures::USERS;
//! use swagtest::pages::{InventoryPage, LoginPage};
//! use swagtest::{Session, SwagResult};
//!
//! # async fn demo() -> SwagResult<()> {
//! let session = Session::simulated()?;
//! let login = LoginPage::new(session.page());
//! login.open().await?;
//! login.login_as(&USERS.standard).await?;
//!
//! let inventory = InventoryPage::new(session.page());
//! inventory.add_item("Sauce Labs Backpack").await?;
//! inventory.assert_cart_count(1).await?;
//! session.close().await
//! # }
//! ```

#![warn(missing_docs)]

#[cfg(feature = "browser")]
pub mod browser;
pub mod config;
pub mod driver;
mod expect;
pub mod fixtures;
pub mod locator;
pub mod logging;
pub mod pages;
pub mod reporter;
mod result;
pub mod runner;
pub mod session;
pub mod sim;
pub mod suites;
pub mod trace;
pub mod url_pattern;
pub mod video;

pub use config::{Artifacts, BackendKind, CapturePolicy, RunConfig, Target, Viewport};
pub use driver::{Condition, ElementSnapshot, PageDriver};
pub use expect::{expect, expect_url, Expect};
pub use locator::{Locator, LocatorOptions, Selector};
pub use reporter::{AttemptRecord, RunReport, TestOutcome, TestStatus};
pub use result::{SwagError, SwagResult};
pub use runner::Runner;
pub use session::{Page, Recording, Session, Timeouts, DEFAULT_BASE_URL};
pub use sim::SimDriver;
pub use trace::{ActionTrace, TraceEvent, TracedDriver};
pub use url_pattern::UrlPattern;
pub use video::{VideoConfig, VideoRecorder};

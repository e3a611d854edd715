//! Simulated Swag Labs storefront.
//!
//! A hermetic backend: the storefront's screens are rendered as an element
//! tree carrying the live site's markup, and [`SimDriver`] resolves locators
//! against it. Suites run against it in `cargo test` with no browser or
//! network.
//!
//! Not modelled: the deliberate defects of `problem_user`, `error_user` and
//! `visual_user`, and the login delay of `performance_glitch_user`. They sign
//! in and behave like `standard_user`.

mod dom;
mod driver;
mod paint;
mod store;

pub use driver::SimDriver;
pub use store::{dollars, tax_cents, CatalogItem, CATALOG};

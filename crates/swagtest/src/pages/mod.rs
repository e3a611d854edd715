//! Page objects for the Swag Labs screens.
//!
//! Each page holds a [`BasePage`] and computes its locators on every call.
//! Pages never wait, poll or retry on their own; every method is a single
//! request to the engine whose failure is propagated unchanged.

mod base;
mod cart;
mod checkout;
mod header;
mod inventory;
mod login;

pub use base::{BasePage, PageObject};
pub use cart::CartPage;
pub use checkout::{parse_amount, CheckoutPage};
pub use header::Header;
pub use inventory::{InventoryPage, SortOrder};
pub use login::LoginPage;

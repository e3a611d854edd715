//! Login suite: authentication outcomes and the error banner.

use super::{case, check, check_eq, inventory_url, TestSuite};
use crate::fixtures::{messages, paths, USERS};
use crate::pages::{InventoryPage, LoginPage, PageObject};
use crate::result::SwagResult;
use crate::session::Page;

/// The login suite
#[must_use]
pub fn suite() -> TestSuite {
    TestSuite::new("login")
        .with_test(case!(valid_login_reaches_inventory))
        .with_test(case!(invalid_credentials_show_error))
        .with_test(case!(locked_out_user_is_rejected))
        .with_test(case!(missing_username_is_rejected))
        .with_test(case!(missing_password_is_rejected))
        .with_test(case!(accepted_users_can_sign_in))
        .with_test(case!(anonymous_deep_link_redirects_to_login))
        .with_test(case!(error_banner_can_be_dismissed))
        .with_test(case!(logout_returns_to_login))
}

/// Standard user lands on the catalog
pub async fn valid_login_reaches_inventory(page: &Page) -> SwagResult<()> {
    let login = LoginPage::new(page);
    login.open().await?;
    login.login(USERS.standard.username, USERS.standard.password).await?;

    let inventory = InventoryPage::new(page);
    login.base().wait_for_url(&inventory_url()?).await?;
    check_eq("screen title", "Products".to_string(), login.base().title().await?)?;
    check(!login.is_on_login_page().await?, "login form still shown after valid login")?;
    check_eq("catalog rows", 6, inventory.inventory_item_count().await?)
}

/// Unknown credentials keep the form and show the mismatch banner
pub async fn invalid_credentials_show_error(page: &Page) -> SwagResult<()> {
    let login = LoginPage::new(page);
    login.open().await?;
    login.login_as(&USERS.invalid).await?;

    login.assert_login_error().await?;
    login.assert_error_message(messages::INVALID_CREDENTIALS).await?;
    check(login.is_on_login_page().await?, "left the login page on bad credentials")
}

/// `locked_out_user` is turned away with the lockout banner
pub async fn locked_out_user_is_rejected(page: &Page) -> SwagResult<()> {
    let login = LoginPage::new(page);
    login.open().await?;
    login.login_as(&USERS.locked).await?;

    login.assert_error_message(messages::LOCKED_OUT).await?;
    check(login.is_on_login_page().await?, "locked-out user got past login")
}

/// Empty username is reported before the password
pub async fn missing_username_is_rejected(page: &Page) -> SwagResult<()> {
    let login = LoginPage::new(page);
    login.open().await?;
    login.login("", USERS.standard.password).await?;
    login.assert_error_message(messages::USERNAME_REQUIRED).await
}

/// Username without a password
pub async fn missing_password_is_rejected(page: &Page) -> SwagResult<()> {
    let login = LoginPage::new(page);
    login.open().await?;
    login.login(USERS.standard.username, "").await?;
    login.assert_error_message(messages::PASSWORD_REQUIRED).await
}

/// Standard, problem and performance users all reach the catalog
pub async fn accepted_users_can_sign_in(page: &Page) -> SwagResult<()> {
    let login = LoginPage::new(page);
    let inventory = InventoryPage::new(page);
    for user in [USERS.standard, USERS.problem, USERS.performance] {
        login.open().await?;
        login.login_as(&user).await?;
        login.base().wait_for_url(&inventory_url()?).await?;
        inventory.logout().await?;
        check(
            login.is_on_login_page().await?,
            format!("{} was not returned to login", user.username),
        )?;
    }
    Ok(())
}

/// Deep links without a session bounce to the login form
pub async fn anonymous_deep_link_redirects_to_login(page: &Page) -> SwagResult<()> {
    let login = LoginPage::new(page);
    login.base().navigate(paths::INVENTORY).await?;

    check(login.is_on_login_page().await?, "catalog served to an anonymous visitor")?;
    login.assert_error_message(messages::LOGIN_REQUIRED).await?;
    login.assert_error_message("'/inventory.html'").await
}

/// The banner close button removes the error
pub async fn error_banner_can_be_dismissed(page: &Page) -> SwagResult<()> {
    let login = LoginPage::new(page);
    login.open().await?;
    login.login_as(&USERS.invalid).await?;
    login.assert_login_error().await?;

    login.dismiss_error().await?;
    check_eq("banner after dismiss", String::new(), login.error_message().await?)
}

/// Logout from the menu ends the session
pub async fn logout_returns_to_login(page: &Page) -> SwagResult<()> {
    let inventory = super::sign_in(page).await?;
    inventory.logout().await?;

    let login = LoginPage::new(page);
    check(login.is_on_login_page().await?, "logout did not show the login form")?;
    check_eq("banner after logout", String::new(), login.error_message().await?)?;

    // Signed out: the catalog is protected again
    inventory.open().await?;
    login.assert_error_message(messages::LOGIN_REQUIRED).await
}

//! The Swag Labs scenario suites.
//!
//! | Suite          | Cases | Before each                       |
//! |----------------|-------|-----------------------------------|
//! | `login`        | 8     | open the login page               |
//! | `add-items`    | 3     | sign in as the standard user      |
//! | `remove-items` | 2     | sign in as the standard user      |
//! | `api`          | 2     | none (feature `api`)              |

use crate::catalog::TestContext;
use crate::harness::{TestCase, TestSuite};
use crate::pages::{LoginCommands, PageObject, ProductsCommands};
use crate::result::PageResult;
use futures::FutureExt;

/// Login validation suite
pub const LOGIN_SUITE: &str = "login";
/// Cart add suite
pub const ADD_ITEMS_SUITE: &str = "add-items";
/// Cart remove suite
pub const REMOVE_ITEMS_SUITE: &str = "remove-items";
/// Airport Gap API suite
pub const API_SUITE: &str = "api";

/// Every suite name, in run order
pub const SUITE_NAMES: &[&str] = &[LOGIN_SUITE, ADD_ITEMS_SUITE, REMOVE_ITEMS_SUITE, API_SUITE];

async fn open_login(ctx: &TestContext) -> PageResult<()> {
    ctx.login()?.navigate().await?;
    Ok(())
}

async fn sign_in(ctx: &TestContext) -> PageResult<()> {
    let users = &ctx.fixtures().users;
    ctx.login()?
        .navigate()
        .await?
        .login_with_username_and_password(&users.standard, &users.password)
        .await?;
    Ok(())
}

async fn attempt_login(
    ctx: &TestContext,
    username: &str,
    password: &str,
    message: &str,
) -> PageResult<()> {
    ctx.login()?
        .login_with_username_and_password(username, password)
        .await?
        .error_message_should_be(message)
        .await?;
    Ok(())
}

async fn valid_credentials(ctx: &TestContext) -> PageResult<()> {
    let users = &ctx.fixtures().users;
    let inventory = ctx.products()?.page().descriptor().url().to_string();
    ctx.login()?
        .login_with_username_and_password(&users.standard, &users.password)
        .await?
        .url_should_equal(&inventory)
        .await?;
    Ok(())
}

async fn invalid_username(ctx: &TestContext) -> PageResult<()> {
    let fixtures = ctx.fixtures();
    let username = ctx.login()?.random_username_or_password(10);
    attempt_login(
        ctx,
        &username,
        &fixtures.users.password,
        &fixtures.messages.credentials_mismatch,
    )
    .await
}

async fn invalid_password(ctx: &TestContext) -> PageResult<()> {
    let fixtures = ctx.fixtures();
    let password = ctx.login()?.random_username_or_password(20);
    attempt_login(
        ctx,
        &fixtures.users.standard,
        &password,
        &fixtures.messages.credentials_mismatch,
    )
    .await
}

async fn invalid_username_and_password(ctx: &TestContext) -> PageResult<()> {
    let messages = &ctx.fixtures().messages;
    attempt_login(
        ctx,
        "invalid_username",
        "invalid_password",
        &messages.credentials_mismatch,
    )
    .await
}

async fn without_username_and_password(ctx: &TestContext) -> PageResult<()> {
    attempt_login(ctx, "", "", &ctx.fixtures().messages.username_required).await
}

async fn without_username(ctx: &TestContext) -> PageResult<()> {
    let fixtures = ctx.fixtures();
    attempt_login(
        ctx,
        "",
        &fixtures.users.password,
        &fixtures.messages.username_required,
    )
    .await
}

async fn without_password(ctx: &TestContext) -> PageResult<()> {
    let fixtures = ctx.fixtures();
    attempt_login(
        ctx,
        &fixtures.users.standard,
        "",
        &fixtures.messages.password_required,
    )
    .await
}

async fn locked_account(ctx: &TestContext) -> PageResult<()> {
    let fixtures = ctx.fixtures();
    attempt_login(
        ctx,
        &fixtures.users.locked_out,
        &fixtures.users.password,
        &fixtures.messages.locked_out,
    )
    .await
}

async fn add_all_items(ctx: &TestContext) -> PageResult<()> {
    ctx.products()?
        .add_all_items_to_cart()
        .await?
        .items_in_cart_should_be(6)
        .await?;
    Ok(())
}

async fn add_one_item(ctx: &TestContext) -> PageResult<()> {
    let products = ctx.products()?;
    products.add_item_to_cart_by_index(0).await?;
    products.items_in_cart_should_be(1).await?;
    Ok(())
}

async fn add_two_items(ctx: &TestContext) -> PageResult<()> {
    let products = ctx.products()?;
    products.add_item_to_cart_by_index(0).await?;
    products.items_in_cart_should_be(1).await?;
    products.add_item_to_cart_by_index(1).await?;
    products.items_in_cart_should_be(2).await?;
    Ok(())
}

async fn remove_one_item(ctx: &TestContext) -> PageResult<()> {
    let products = ctx.products()?;
    products.add_all_items_to_cart().await?;
    products.items_in_cart_should_be(6).await?;
    products.remove_item_from_cart_by_index(0).await?;
    products.items_in_cart_should_be(5).await?;
    Ok(())
}

async fn remove_multiple_items(ctx: &TestContext) -> PageResult<()> {
    let products = ctx.products()?;
    products.add_all_items_to_cart().await?;
    products.items_in_cart_should_be(6).await?;
    products.remove_item_from_cart_by_index(0).await?;
    products.remove_item_from_cart_by_index(1).await?;
    products.items_in_cart_should_be(4).await?;
    products.remove_item_from_cart_by_index(2).await?;
    products.items_in_cart_should_be(3).await?;
    Ok(())
}

/// Login validation: one valid and seven rejected sign-ins
#[must_use]
pub fn login_suite() -> TestSuite {
    TestSuite::new(LOGIN_SUITE)
        .before_each(|ctx| open_login(ctx).boxed())
        .with_test(TestCase::new("With valid credentials", |ctx| {
            valid_credentials(ctx).boxed()
        }))
        .with_test(TestCase::new("With invalid username", |ctx| {
            invalid_username(ctx).boxed()
        }))
        .with_test(TestCase::new("With invalid password", |ctx| {
            invalid_password(ctx).boxed()
        }))
        .with_test(TestCase::new("With invalid username and password", |ctx| {
            invalid_username_and_password(ctx).boxed()
        }))
        .with_test(TestCase::new("Without username and password", |ctx| {
            without_username_and_password(ctx).boxed()
        }))
        .with_test(TestCase::new("Without username", |ctx| {
            without_username(ctx).boxed()
        }))
        .with_test(TestCase::new("Without password", |ctx| {
            without_password(ctx).boxed()
        }))
        .with_test(TestCase::new("Locked account", |ctx| {
            locked_account(ctx).boxed()
        }))
}

/// Adding products to the cart
#[must_use]
pub fn add_items_suite() -> TestSuite {
    TestSuite::new(ADD_ITEMS_SUITE)
        .before_each(|ctx| sign_in(ctx).boxed())
        .with_test(TestCase::new("Add all item", |ctx| add_all_items(ctx).boxed()))
        .with_test(TestCase::new("Add one item", |ctx| add_one_item(ctx).boxed()))
        .with_test(TestCase::new("Add two item", |ctx| add_two_items(ctx).boxed()))
}

/// Removing products from a full cart
#[must_use]
pub fn remove_items_suite() -> TestSuite {
    TestSuite::new(REMOVE_ITEMS_SUITE)
        .before_each(|ctx| sign_in(ctx).boxed())
        .with_test(TestCase::new("Remove one item", |ctx| {
            remove_one_item(ctx).boxed()
        }))
        .with_test(TestCase::new("Remove multiple item", |ctx| {
            remove_multiple_items(ctx).boxed()
        }))
}

#[cfg(feature = "api")]
mod airports {
    use crate::api::ApiClient;
    use crate::result::PageResult;
    use serde_json::json;

    pub(super) async fn all_airports(base_url: &str) -> PageResult<()> {
        ApiClient::request(base_url)?
            .get("/airports")
            .await?
            .expect_status(200)?
            .expect_header("content-type", "json")?
            .expect_len("/data", 30)?;
        Ok(())
    }

    pub(super) async fn airport_by_id(base_url: &str) -> PageResult<()> {
        ApiClient::request(base_url)?
            .get("/airports/KIX")
            .await?
            .expect_status(200)?
            .expect_header("content-type", "json")?
            .expect_json("/data/id", &json!("KIX"))?;
        Ok(())
    }
}

/// Airport Gap API checks against `base_url`
#[cfg(feature = "api")]
#[must_use]
pub fn api_suite(base_url: &str) -> TestSuite {
    let list_base = base_url.to_string();
    let show_base = base_url.to_string();
    TestSuite::new(API_SUITE)
        .with_test(TestCase::new(
            "Returns all airports in the Airport Gap database",
            move |_ctx| {
                let base = list_base.clone();
                async move { airports::all_airports(&base).await }.boxed()
            },
        ))
        .with_test(TestCase::new(
            "Returns the airport specified by the ID",
            move |_ctx| {
                let base = show_base.clone();
                async move { airports::airport_by_id(&base).await }.boxed()
            },
        ))
}

/// Suite by name; `api` needs the `api` feature
#[must_use]
pub fn suite_by_name(name: &str) -> Option<TestSuite> {
    match name {
        LOGIN_SUITE => Some(login_suite()),
        ADD_ITEMS_SUITE => Some(add_items_suite()),
        REMOVE_ITEMS_SUITE => Some(remove_items_suite()),
        #[cfg(feature = "api")]
        API_SUITE => Some(api_suite(crate::api::AIRPORT_GAP_URL)),
        _ => None,
    }
}

/// Every browser suite, plus the API suite when enabled
#[must_use]
pub fn all_suites() -> Vec<TestSuite> {
    SUITE_NAMES
        .iter()
        .filter_map(|name| suite_by_name(name))
        .collect()
}

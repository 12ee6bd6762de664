//! Runs the shipped scenario suites against the in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use swagcheck::prelude::*;
use swagcheck::scenarios::{add_items_suite, login_suite, remove_items_suite};
use swagcheck::sim::{BASE_URL, INVENTORY_URL, LOGIN_URL};
use swagcheck::{PageDescriptor, SessionState, SuiteResults};

fn fixtures() -> Arc<Fixtures> {
    Arc::new(Fixtures::embedded().unwrap())
}

async fn sim_context() -> PageResult<TestContext> {
    TestContext::new(Session::new(SimDriver::new()), fixtures())
}

async fn run(suite: &TestSuite) -> SuiteResults {
    TestHarness::new().run(suite, sim_context).await
}

fn assert_all_passed(results: &SuiteResults) {
    for failure in results.failures() {
        panic!(
            "{} / {} failed: {}",
            results.suite_name,
            failure.name,
            failure.error.as_deref().unwrap_or_default()
        );
    }
}

mod suite_tests {
    use super::*;

    #[tokio::test]
    async fn test_login_suite_passes() {
        let results = run(&login_suite()).await;
        assert_eq!(results.total(), 8);
        assert_all_passed(&results);
    }

    #[tokio::test]
    async fn test_add_items_suite_passes() {
        let results = run(&add_items_suite()).await;
        assert_eq!(results.total(), 3);
        assert_all_passed(&results);
    }

    #[tokio::test]
    async fn test_remove_items_suite_passes() {
        let results = run(&remove_items_suite()).await;
        assert_eq!(results.total(), 2);
        assert_all_passed(&results);
    }

    #[tokio::test]
    async fn test_wrong_fixture_fails_with_assertion() {
        let mut broken = Fixtures::embedded().unwrap();
        broken.messages.locked_out = "Epic sadface: nope".to_string();
        let broken = Arc::new(broken);

        let results = TestHarness::new()
            .run(&login_suite(), || {
                let fixtures = Arc::clone(&broken);
                async move { TestContext::new(Session::new(SimDriver::new()), fixtures) }
            })
            .await;
        assert_eq!(results.failed_count(), 1);
        let failure = results.failures()[0];
        assert_eq!(failure.name, "Locked account");
        assert!(failure.assertion);
    }
}

mod property_tests {
    use super::*;

    async fn signed_in() -> TestContext {
        let ctx = sim_context().await.unwrap();
        let users = ctx.fixtures().users.clone();
        ctx.login()
            .unwrap()
            .navigate()
            .await
            .unwrap()
            .login_with_username_and_password(&users.standard, &users.password)
            .await
            .unwrap();
        ctx
    }

    #[tokio::test]
    async fn test_valid_login_reaches_inventory() {
        let ctx = signed_in().await;
        ctx.login()
            .unwrap()
            .url_should_equal(INVENTORY_URL)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_credentials_message() {
        let ctx = sim_context().await.unwrap();
        let expected = ctx.fixtures().messages.username_required.clone();
        ctx.login()
            .unwrap()
            .navigate()
            .await
            .unwrap()
            .login_with_username_and_password("", "")
            .await
            .unwrap()
            .error_message_should_be(&expected)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_add_all_then_remove_first() {
        let ctx = signed_in().await;
        let products = ctx.products().unwrap();
        products.add_all_items_to_cart().await.unwrap();
        products.items_in_cart_should_be(6).await.unwrap();
        products.remove_item_from_cart_by_index(0).await.unwrap();
        products.items_in_cart_should_be(5).await.unwrap();
    }

    #[tokio::test]
    async fn test_nth_out_of_range() {
        let ctx = signed_in().await;
        let page = ctx.page("products").unwrap();
        let rows = page.find_all("productsList").unwrap();
        let count = rows.count().await.unwrap();
        let err = rows.nth(count).await.unwrap_err();
        assert!(matches!(err, PageError::IndexOutOfRange { .. }));
    }

    #[tokio::test]
    async fn test_url_assertion_is_idempotent() {
        let ctx = sim_context().await.unwrap();
        let login = ctx.login().unwrap();
        login.navigate().await.unwrap();
        for _ in 0..5 {
            login.url_should_equal(LOGIN_URL).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_unknown_element_name() {
        let ctx = signed_in().await;
        let err = ctx
            .page("products")
            .unwrap()
            .click("checkoutButton")
            .await
            .unwrap_err();
        assert!(matches!(err, PageError::UnknownElement { .. }));
    }

    #[tokio::test]
    async fn test_inventory_without_login_redirects() {
        let ctx = sim_context().await.unwrap();
        ctx.products().unwrap().navigate().await.unwrap();
        ctx.login()
            .unwrap()
            .url_should_equal(LOGIN_URL)
            .await
            .unwrap()
            .error_message_should_be(
                "Epic sadface: You can only access '/inventory.html' when you are logged in.",
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_commands_after_end() {
        let ctx = signed_in().await;
        ctx.end().await.unwrap();
        assert_eq!(ctx.session().state().await, SessionState::Closed);
        let err = ctx.products().unwrap().add_item_to_cart_by_index(0).await.unwrap_err();
        assert!(matches!(err, PageError::SessionClosed { .. }));
    }

    #[tokio::test]
    async fn test_contexts_do_not_share_carts() {
        let first = signed_in().await;
        let second = signed_in().await;
        first
            .products()
            .unwrap()
            .add_item_to_cart_by_index(0)
            .await
            .unwrap();
        second
            .products()
            .unwrap()
            .items_in_cart_should_be(0)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_custom_page_registration() {
        let mut ctx = sim_context().await.unwrap();
        ctx.pages_mut()
            .register("inventory-links", || {
                PageDescriptor::builder("inventory-links", format!("{BASE_URL}/inventory.html"))
                    .element("names", "div.inventory_item_name")
                    .build()
            })
            .unwrap();
        let users = ctx.fixtures().users.clone();
        ctx.login()
            .unwrap()
            .navigate()
            .await
            .unwrap()
            .login_with_username_and_password(&users.standard, &users.password)
            .await
            .unwrap();
        let names = ctx
            .page("inventory-links")
            .unwrap()
            .find_all("names")
            .unwrap()
            .texts()
            .await
            .unwrap();
        assert_eq!(names.len(), 6);
        assert_eq!(names[0], "Sauce Labs Backpack");
    }
}

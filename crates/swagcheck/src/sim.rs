//! In-memory model of the Swag Labs store.
//!
//! `SimDriver` answers the same selectors the live site does for the login
//! and inventory pages, applies the site's login rules, and keeps a cart for
//! the lifetime of the session. It exists so the page objects and scenarios
//! can run without a browser.
//!
//! Selector matching is exact: every simulated node carries the list of
//! selector strings it answers to.

use crate::driver::{Driver, ElementHandle};
use crate::result::{PageError, PageResult};
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Origin served by the simulator
pub const BASE_URL: &str = "https://www.saucedemo.com";
/// Login page URL as reported after navigation
pub const LOGIN_URL: &str = "https://www.saucedemo.com/";
/// Inventory page URL
pub const INVENTORY_URL: &str = "https://www.saucedemo.com/inventory.html";

const VALID_PASSWORD: &str = "secret_sauce";
const ACCEPTED_USERS: &[&str] = &[
    "standard_user",
    "locked_out_user",
    "problem_user",
    "performance_glitch_user",
    "error_user",
    "visual_user",
];
const LOCKED_USERS: &[&str] = &["locked_out_user"];

const MSG_USERNAME_REQUIRED: &str = "Epic sadface: Username is required";
const MSG_PASSWORD_REQUIRED: &str = "Epic sadface: Password is required";
const MSG_NO_MATCH: &str =
    "Epic sadface: Username and password do not match any user in this service";
const MSG_LOCKED: &str = "Epic sadface: Sorry, this user has been locked out.";
const MSG_NOT_LOGGED_IN: &str =
    "Epic sadface: You can only access '/inventory.html' when you are logged in.";

/// Catalogue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    /// Display name
    pub name: &'static str,
    /// Slug used in button ids
    pub slug: &'static str,
    /// Price in cents
    pub price_cents: u32,
}

/// Inventory in default (name A to Z) order
pub const PRODUCTS: [Product; 6] = [
    Product {
        name: "Sauce Labs Backpack",
        slug: "sauce-labs-backpack",
        price_cents: 2999,
    },
    Product {
        name: "Sauce Labs Bike Light",
        slug: "sauce-labs-bike-light",
        price_cents: 999,
    },
    Product {
        name: "Sauce Labs Bolt T-Shirt",
        slug: "sauce-labs-bolt-t-shirt",
        price_cents: 1599,
    },
    Product {
        name: "Sauce Labs Fleece Jacket",
        slug: "sauce-labs-fleece-jacket",
        price_cents: 4999,
    },
    Product {
        name: "Sauce Labs Onesie",
        slug: "sauce-labs-onesie",
        price_cents: 799,
    },
    Product {
        name: "Test.allTheThings() T-Shirt (Red)",
        slug: "test.allthethings()-t-shirt-(red)",
        price_cents: 1599,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SimPage {
    #[default]
    Blank,
    Login,
    Inventory,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    UsernameInput,
    PasswordInput,
    LoginButton,
    ErrorMessage,
    ProductRow,
    ProductName,
    CartButton(usize),
    CartBadge,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<usize>,
    selectors: Vec<String>,
    text: String,
    role: Role,
}

impl Node {
    fn matches(&self, selector: &str) -> bool {
        self.selectors.iter().any(|s| s == selector)
    }
}

/// Simulated Swag Labs browser session
#[derive(Debug, Default)]
pub struct SimDriver {
    url: String,
    page: SimPage,
    user: Option<String>,
    cart: BTreeSet<usize>,
    username: String,
    password: String,
    error: Option<String>,
    nodes: Vec<Node>,
    closed: bool,
    call_history: Vec<String>,
}

impl SimDriver {
    /// Create a fresh session on a blank page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a driver method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_history.iter().any(|c| c.starts_with(method))
    }

    /// Indices of products currently in the cart
    #[must_use]
    pub fn cart(&self) -> Vec<usize> {
        self.cart.iter().copied().collect()
    }

    /// Logged in user, if any
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    fn ensure_open(&self) -> PageResult<()> {
        if self.closed {
            return Err(PageError::driver("simulated browser has been closed"));
        }
        Ok(())
    }

    fn node(&self, handle: &ElementHandle) -> PageResult<(usize, &Node)> {
        let stale = || PageError::ElementNotFound {
            selector: handle.selector.clone(),
        };
        let index: usize = handle.id.parse().map_err(|_| stale())?;
        let node = self.nodes.get(index).ok_or_else(stale)?;
        if !node.matches(&handle.selector) {
            return Err(stale());
        }
        Ok((index, node))
    }

    fn is_descendant(&self, mut index: usize, ancestor: usize) -> bool {
        while let Some(parent) = self.nodes.get(index).and_then(|n| n.parent) {
            if parent == ancestor {
                return true;
            }
            index = parent;
        }
        false
    }

    fn show(&mut self, page: SimPage, url: &str) {
        if page == SimPage::Login && self.page != SimPage::Login {
            self.username.clear();
            self.password.clear();
        }
        self.page = page;
        self.url = url.to_string();
        self.render();
    }

    fn route(&mut self, url: &str) -> PageResult<()> {
        let path = url
            .strip_prefix(BASE_URL)
            .ok_or_else(|| PageError::Navigation {
                url: url.to_string(),
                message: "host is not served by the simulator".to_string(),
            })?;
        let path = path.split(['?', '#']).next().unwrap_or_default();

        match path {
            "" | "/" => {
                self.error = None;
                self.show(SimPage::Login, LOGIN_URL);
            }
            "/inventory.html" => {
                if self.user.is_some() {
                    self.error = None;
                    self.show(SimPage::Inventory, INVENTORY_URL);
                } else {
                    tracing::debug!("inventory requested without login, redirecting");
                    self.error = Some(MSG_NOT_LOGGED_IN.to_string());
                    self.show(SimPage::Login, LOGIN_URL);
                }
            }
            _ => self.show(SimPage::NotFound, url),
        }
        Ok(())
    }

    fn submit_login(&mut self) {
        let outcome = if self.username.is_empty() {
            Err(MSG_USERNAME_REQUIRED)
        } else if self.password.is_empty() {
            Err(MSG_PASSWORD_REQUIRED)
        } else if !ACCEPTED_USERS.contains(&self.username.as_str())
            || self.password != VALID_PASSWORD
        {
            Err(MSG_NO_MATCH)
        } else if LOCKED_USERS.contains(&self.username.as_str()) {
            Err(MSG_LOCKED)
        } else {
            Ok(())
        };

        match outcome {
            Ok(()) => {
                tracing::debug!(user = %self.username, "simulated login accepted");
                self.user = Some(self.username.clone());
                self.error = None;
                self.show(SimPage::Inventory, INVENTORY_URL);
            }
            Err(message) => {
                tracing::debug!(user = %self.username, reason = message, "simulated login rejected");
                self.error = Some(message.to_string());
                self.render();
            }
        }
    }

    fn push(&mut self, parent: Option<usize>, selectors: &[&str], text: &str, role: Role) -> usize {
        self.nodes.push(Node {
            parent,
            selectors: selectors.iter().map(|s| (*s).to_string()).collect(),
            text: text.to_string(),
            role,
        });
        self.nodes.len() - 1
    }

    fn render(&mut self) {
        self.nodes.clear();
        match self.page {
            SimPage::Blank | SimPage::NotFound => {}
            SimPage::Login => self.render_login(),
            SimPage::Inventory => self.render_inventory(),
        }
    }

    fn render_login(&mut self) {
        let _ = self.push(
            None,
            &["#user-name", "input[data-test=username]"],
            "",
            Role::UsernameInput,
        );
        let _ = self.push(
            None,
            &["#password", "input[data-test=password]"],
            "",
            Role::PasswordInput,
        );
        let _ = self.push(
            None,
            &["#login-button", "input[data-test=login-button]"],
            "",
            Role::LoginButton,
        );
        if let Some(error) = self.error.clone() {
            let _ = self.push(
                None,
                &["h3[data-test=error]", "h3[data-test=\"error\"]"],
                &error,
                Role::ErrorMessage,
            );
        }
    }

    fn render_inventory(&mut self) {
        for (index, product) in PRODUCTS.iter().enumerate() {
            let row = self.push(
                None,
                &["div.inventory_list > div", "div.inventory_item"],
                "",
                Role::ProductRow,
            );
            let _ = self.push(
                Some(row),
                &[
                    "div.inventory_list > div > div.inventory_item_description > div > a > div",
                    "div.inventory_item_name",
                ],
                product.name,
                Role::ProductName,
            );

            let in_cart = self.cart.contains(&index);
            let id = if in_cart {
                format!("#remove-{}", product.slug)
            } else {
                format!("#add-to-cart-{}", product.slug)
            };
            let label = if in_cart { "Remove" } else { "Add to cart" };
            let _ = self.push(
                Some(row),
                &[
                    "div.inventory_list > div > div.inventory_item_description > div.pricebar > button",
                    "div.inventory_item_description > div.pricebar > button",
                    "button",
                    id.as_str(),
                ],
                label,
                Role::CartButton(index),
            );
        }

        // Badge is rendered last so product node ids survive cart changes.
        if !self.cart.is_empty() {
            let count = self.cart.len().to_string();
            let _ = self.push(
                None,
                &[
                    "#shopping_cart_container > a > span",
                    "span.shopping_cart_badge",
                ],
                &count,
                Role::CartBadge,
            );
        }
    }
}

#[async_trait]
impl Driver for SimDriver {
    async fn navigate(&mut self, url: &str) -> PageResult<()> {
        self.ensure_open()?;
        self.call_history.push(format!("navigate:{url}"));
        self.route(url)
    }

    async fn current_url(&self) -> PageResult<String> {
        self.ensure_open()?;
        Ok(if self.url.is_empty() {
            "about:blank".to_string()
        } else {
            self.url.clone()
        })
    }

    async fn find_all(&mut self, selector: &str) -> PageResult<Vec<ElementHandle>> {
        self.ensure_open()?;
        self.call_history.push(format!("find_all:{selector}"));
        Ok(self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.matches(selector))
            .map(|(index, _)| ElementHandle::new(index.to_string(), selector))
            .collect())
    }

    async fn find_within(
        &mut self,
        parent: &ElementHandle,
        selector: &str,
    ) -> PageResult<Vec<ElementHandle>> {
        self.ensure_open()?;
        self.call_history
            .push(format!("find_within:{}:{selector}", parent.id));
        let (ancestor, _) = self.node(parent)?;
        Ok(self
            .nodes
            .iter()
            .enumerate()
            .filter(|(index, node)| node.matches(selector) && self.is_descendant(*index, ancestor))
            .map(|(index, _)| ElementHandle::new(index.to_string(), selector))
            .collect())
    }

    async fn click(&mut self, element: &ElementHandle) -> PageResult<()> {
        self.ensure_open()?;
        self.call_history.push(format!("click:{}", element.selector));
        let role = self.node(element)?.1.role;
        match role {
            Role::LoginButton => self.submit_login(),
            Role::CartButton(index) => {
                if !self.cart.remove(&index) {
                    let _ = self.cart.insert(index);
                }
                self.render();
            }
            _ => {}
        }
        Ok(())
    }

    async fn set_value(&mut self, element: &ElementHandle, text: &str) -> PageResult<()> {
        self.ensure_open()?;
        self.call_history
            .push(format!("set_value:{}", element.selector));
        let role = self.node(element)?.1.role;
        match role {
            Role::UsernameInput => self.username = text.to_string(),
            Role::PasswordInput => self.password = text.to_string(),
            _ => {
                return Err(PageError::driver(format!(
                    "element '{}' does not accept input",
                    element.selector
                )))
            }
        }
        Ok(())
    }

    async fn text(&self, element: &ElementHandle) -> PageResult<String> {
        self.ensure_open()?;
        let (_, node) = self.node(element)?;
        Ok(node.text.clone())
    }

    async fn close(&mut self) -> PageResult<()> {
        self.call_history.push("close".to_string());
        self.closed = true;
        self.nodes.clear();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    async fn login(driver: &mut SimDriver, user: &str, password: &str) {
        driver.navigate(BASE_URL).await.unwrap();
        driver.set_value_selector("#user-name", user).await.unwrap();
        driver.set_value_selector("#password", password).await.unwrap();
        driver.click_selector("#login-button").await.unwrap();
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test]
        async fn test_blank_until_navigated() {
            let mut driver = SimDriver::new();
            assert_eq!(driver.current_url().await.unwrap(), "about:blank");
            assert!(driver.find_all("#user-name").await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_base_url_shows_login_page() {
            let mut driver = SimDriver::new();
            driver.navigate(BASE_URL).await.unwrap();
            assert_eq!(driver.current_url().await.unwrap(), LOGIN_URL);
            assert_eq!(driver.find_all("#login-button").await.unwrap().len(), 1);
            assert!(driver.was_called("navigate"));
        }

        #[tokio::test]
        async fn test_foreign_host_rejected() {
            let mut driver = SimDriver::new();
            let err = driver.navigate("https://example.com").await.unwrap_err();
            assert!(matches!(err, PageError::Navigation { .. }));
        }

        #[tokio::test]
        async fn test_inventory_requires_login() {
            let mut driver = SimDriver::new();
            driver.navigate(INVENTORY_URL).await.unwrap();
            assert_eq!(driver.current_url().await.unwrap(), LOGIN_URL);
            let text = driver.text_of_selector("h3[data-test=error]").await.unwrap();
            assert_eq!(text, MSG_NOT_LOGGED_IN);
        }

        #[tokio::test]
        async fn test_unknown_path_is_empty_page() {
            let mut driver = SimDriver::new();
            driver.navigate("https://www.saucedemo.com/nope.html").await.unwrap();
            assert!(driver.find_all("button").await.unwrap().is_empty());
        }
    }

    mod login_tests {
        use super::*;

        #[tokio::test]
        async fn test_standard_user_reaches_inventory() {
            let mut driver = SimDriver::new();
            login(&mut driver, "standard_user", "secret_sauce").await;
            assert_eq!(driver.current_url().await.unwrap(), INVENTORY_URL);
            assert_eq!(driver.user(), Some("standard_user"));
        }

        #[tokio::test]
        async fn test_rejections_show_messages() {
            let cases = [
                ("", "", MSG_USERNAME_REQUIRED),
                ("", "secret_sauce", MSG_USERNAME_REQUIRED),
                ("standard_user", "", MSG_PASSWORD_REQUIRED),
                ("nobody", "secret_sauce", MSG_NO_MATCH),
                ("standard_user", "wrong", MSG_NO_MATCH),
                ("locked_out_user", "secret_sauce", MSG_LOCKED),
                ("locked_out_user", "wrong", MSG_NO_MATCH),
            ];
            for (user, password, expected) in cases {
                let mut driver = SimDriver::new();
                login(&mut driver, user, password).await;
                let text = driver.text_of_selector("h3[data-test=error]").await.unwrap();
                assert_eq!(text, expected, "user={user:?} password={password:?}");
                assert_eq!(driver.current_url().await.unwrap(), LOGIN_URL);
            }
        }

        #[tokio::test]
        async fn test_no_error_heading_before_submit() {
            let mut driver = SimDriver::new();
            driver.navigate(BASE_URL).await.unwrap();
            let err = driver.text_of_selector("h3[data-test=error]").await.unwrap_err();
            assert!(matches!(err, PageError::ElementNotFound { .. }));
        }

        #[tokio::test]
        async fn test_set_value_on_button_rejected() {
            let mut driver = SimDriver::new();
            driver.navigate(BASE_URL).await.unwrap();
            let err = driver.set_value_selector("#login-button", "x").await.unwrap_err();
            assert!(matches!(err, PageError::Driver { .. }));
        }
    }

    mod cart_tests {
        use super::*;

        const BUTTONS: &str =
            "div.inventory_list > div > div.inventory_item_description > div.pricebar > button";

        #[tokio::test]
        async fn test_inventory_lists_six_products() {
            let mut driver = SimDriver::new();
            login(&mut driver, "standard_user", "secret_sauce").await;
            assert_eq!(driver.find_all("div.inventory_list > div").await.unwrap().len(), 6);
            assert_eq!(driver.find_all(BUTTONS).await.unwrap().len(), 6);
            assert!(driver.find_all("#shopping_cart_container > a > span").await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_button_toggles_cart() {
            let mut driver = SimDriver::new();
            login(&mut driver, "standard_user", "secret_sauce").await;

            let buttons = driver.find_all(BUTTONS).await.unwrap();
            driver.click(&buttons[2]).await.unwrap();
            assert_eq!(driver.cart(), vec![2]);
            assert_eq!(
                driver.text_of_selector("#shopping_cart_container > a > span").await.unwrap(),
                "1"
            );
            assert_eq!(
                driver.find_all("#remove-sauce-labs-bolt-t-shirt").await.unwrap().len(),
                1
            );

            let buttons = driver.find_all(BUTTONS).await.unwrap();
            driver.click(&buttons[2]).await.unwrap();
            assert!(driver.cart().is_empty());
        }

        #[tokio::test]
        async fn test_find_within_scopes_to_row() {
            let mut driver = SimDriver::new();
            login(&mut driver, "standard_user", "secret_sauce").await;

            let rows = driver.find_all("div.inventory_list > div").await.unwrap();
            let scoped = driver
                .find_within(&rows[4], "div.inventory_item_description > div.pricebar > button")
                .await
                .unwrap();
            assert_eq!(scoped.len(), 1);
            driver.click(&scoped[0]).await.unwrap();
            assert_eq!(driver.cart(), vec![4]);
        }

        #[tokio::test]
        async fn test_cart_survives_navigation() {
            let mut driver = SimDriver::new();
            login(&mut driver, "standard_user", "secret_sauce").await;
            driver.click_selector("#add-to-cart-sauce-labs-onesie").await.unwrap();
            driver.navigate(INVENTORY_URL).await.unwrap();
            assert_eq!(
                driver.text_of_selector("span.shopping_cart_badge").await.unwrap(),
                "1"
            );
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[tokio::test]
        async fn test_closed_driver_rejects_calls() {
            let mut driver = SimDriver::new();
            driver.close().await.unwrap();
            assert!(driver.navigate(BASE_URL).await.is_err());
            assert!(driver.current_url().await.is_err());
            assert!(driver.was_called("close"));
        }

        #[tokio::test]
        async fn test_stale_handle_after_navigation() {
            let mut driver = SimDriver::new();
            driver.navigate(BASE_URL).await.unwrap();
            let button = driver.find_all("#login-button").await.unwrap();
            driver.navigate("https://www.saucedemo.com/missing").await.unwrap();
            let err = driver.click(&button[0]).await.unwrap_err();
            assert!(matches!(err, PageError::ElementNotFound { .. }));
        }
    }
}

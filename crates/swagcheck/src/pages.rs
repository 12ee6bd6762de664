//! Swag Labs page objects.
//!
//! Each page is a thin struct around a [`Page`] handle. Its domain commands
//! live in a command-set trait with provided methods, so any page object
//! can opt into a set with an empty `impl`.

use crate::catalog::PageRegistry;
use crate::page::{CommandSet, Page, PageDescriptor};
use crate::random::random_string;
use crate::result::{PageError, PageResult};
use async_trait::async_trait;

/// Registry name of the login page
pub const LOGIN_PAGE: &str = "login";
/// Registry name of the products page
pub const PRODUCTS_PAGE: &str = "products";

/// Row-relative selector of a product's cart button
pub const ROW_BUTTON: &str = "div.inventory_item_description > div.pricebar > button";

/// Something backed by a session-bound [`Page`]
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Underlying page handle
    fn page(&self) -> &Page;

    /// Load the page's URL
    async fn navigate(&self) -> PageResult<&Self> {
        self.page().navigate().await?;
        Ok(self)
    }
}

/// Commands of the login page
pub const LOGIN_COMMANDS: CommandSet = CommandSet {
    name: "login",
    commands: &[
        "enter_username",
        "enter_password",
        "click_login_button",
        "random_username_or_password",
        "login_with_username_and_password",
        "url_should_equal",
        "error_message_should_be",
    ],
};

/// Login form commands
#[async_trait]
pub trait LoginCommands: PageObject {
    /// Type into the username field
    async fn enter_username(&self, username: &str) -> PageResult<&Self> {
        self.page().set_value("usernameInput", username).await?;
        Ok(self)
    }

    /// Type into the password field
    async fn enter_password(&self, password: &str) -> PageResult<&Self> {
        self.page().set_value("passwordInput", password).await?;
        Ok(self)
    }

    /// Submit the form
    async fn click_login_button(&self) -> PageResult<&Self> {
        self.page().click("loginButton").await?;
        Ok(self)
    }

    /// Random alphanumeric credential of `length` characters
    fn random_username_or_password(&self, length: usize) -> String {
        random_string(length)
    }

    /// Fill both fields and submit
    async fn login_with_username_and_password(
        &self,
        username: &str,
        password: &str,
    ) -> PageResult<&Self> {
        tracing::debug!(username, "login");
        self.page()
            .set_value("usernameInput", username)
            .await?
            .set_value("passwordInput", password)
            .await?
            .click("loginButton")
            .await?;
        Ok(self)
    }

    /// Assert the live URL
    async fn url_should_equal(&self, url: &str) -> PageResult<&Self> {
        self.page().assert_url_equals(url).await?;
        Ok(self)
    }

    /// Assert the login error heading
    async fn error_message_should_be(&self, message: &str) -> PageResult<&Self> {
        self.page().assert_text_equals("errorMessage", message).await?;
        Ok(self)
    }
}

/// Commands of the products page
pub const PRODUCTS_COMMANDS: CommandSet = CommandSet {
    name: "products",
    commands: &[
        "items_in_cart_should_be",
        "add_item_to_cart_by_index",
        "remove_item_from_cart_by_index",
        "add_all_items_to_cart",
        "add_sauce_labs_bolt_tshirt_to_cart",
        "add_sauce_labs_bike_light_to_cart",
        "product_names",
    ],
};

/// Inventory and cart commands
#[async_trait]
pub trait ProductsCommands: PageObject {
    /// Assert the cart badge; zero means no badge is shown
    async fn items_in_cart_should_be(&self, count: usize) -> PageResult<&Self> {
        if count == 0 {
            let shown = self.page().find_all("cartNumber")?.texts().await?;
            if let Some(actual) = shown.into_iter().next() {
                return Err(PageError::mismatch("cartNumber", "0", actual));
            }
            return Ok(self);
        }
        self.page()
            .assert_text_equals("cartNumber", &count.to_string())
            .await?;
        Ok(self)
    }

    /// Click the cart button of the product at `index`
    async fn add_item_to_cart_by_index(&self, index: usize) -> PageResult<&Self> {
        self.page()
            .find_all("productsList")?
            .nth(index)
            .await?
            .find(ROW_BUTTON)
            .await?
            .click()
            .await?;
        Ok(self)
    }

    /// Click the cart button of the product at `index`.
    /// The button toggles, so this is the same gesture as adding.
    async fn remove_item_from_cart_by_index(&self, index: usize) -> PageResult<&Self> {
        self.add_item_to_cart_by_index(index).await
    }

    /// Click every cart button once
    ///
    /// The list is counted once up front. Each click goes through `nth`,
    /// which locates the buttons again, so it never acts on a stale handle.
    async fn add_all_items_to_cart(&self) -> PageResult<&Self> {
        let buttons = self.page().find_all("buttonList")?;
        let count = buttons.count().await?;
        tracing::debug!(count, "adding every product");
        for index in 0..count {
            buttons.nth(index).await?.click().await?;
        }
        Ok(self)
    }

    /// Add the Bolt T-Shirt
    async fn add_sauce_labs_bolt_tshirt_to_cart(&self) -> PageResult<&Self> {
        self.page().click("addSlbtButton").await?;
        Ok(self)
    }

    /// Add the Bike Light
    async fn add_sauce_labs_bike_light_to_cart(&self) -> PageResult<&Self> {
        self.page().click("addSlblButton").await?;
        Ok(self)
    }

    /// Product names in display order
    async fn product_names(&self) -> PageResult<Vec<String>> {
        self.page().find_all("productsNameList")?.texts().await
    }
}

/// The sign-in page
#[derive(Debug, Clone)]
pub struct LoginPage {
    page: Page,
}

impl LoginPage {
    /// Wrap a page handle built from [`login_descriptor`]
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }
}

impl PageObject for LoginPage {
    fn page(&self) -> &Page {
        &self.page
    }
}

impl LoginCommands for LoginPage {}

/// The inventory page
#[derive(Debug, Clone)]
pub struct ProductsPage {
    page: Page,
}

impl ProductsPage {
    /// Wrap a page handle built from [`products_descriptor`]
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }
}

impl PageObject for ProductsPage {
    fn page(&self) -> &Page {
        &self.page
    }
}

impl ProductsCommands for ProductsPage {}

/// Descriptor of the login page served at `base_url`
pub fn login_descriptor(base_url: &str) -> PageResult<PageDescriptor> {
    PageDescriptor::builder(LOGIN_PAGE, base_url)
        .element("usernameInput", "#user-name")
        .element("passwordInput", "#password")
        .element("loginButton", "#login-button")
        .element("errorMessage", "h3[data-test=error]")
        .command_set(LOGIN_COMMANDS)
        .build()
}

/// Descriptor of the inventory page under `base_url`
pub fn products_descriptor(base_url: &str) -> PageResult<PageDescriptor> {
    let url = format!("{}/inventory.html", base_url.trim_end_matches('/'));
    PageDescriptor::builder(PRODUCTS_PAGE, url)
        .element("addSlbtButton", "#add-to-cart-sauce-labs-bolt-t-shirt")
        .element("addSlblButton", "#add-to-cart-sauce-labs-bike-light")
        .element(
            "productsNameList",
            "div.inventory_list > div > div.inventory_item_description > div > a > div",
        )
        .element(
            "buttonList",
            "div.inventory_list > div > div.inventory_item_description > div.pricebar > button",
        )
        .element("productsList", "div.inventory_list > div")
        .element("cartNumber", "#shopping_cart_container > a > span")
        .command_set(PRODUCTS_COMMANDS)
        .build()
}

/// Register both Swag Labs pages against `base_url`
///
/// # Errors
///
/// `DuplicateName` if either page name is already taken.
pub fn register_swag_labs(registry: &mut PageRegistry, base_url: &str) -> PageResult<()> {
    let login_base = base_url.to_string();
    registry.register(LOGIN_PAGE, move || login_descriptor(&login_base))?;
    let products_base = base_url.to_string();
    registry.register(PRODUCTS_PAGE, move || products_descriptor(&products_base))?;
    Ok(())
}

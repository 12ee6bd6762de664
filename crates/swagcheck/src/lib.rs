//! Swagcheck: page objects and end-to-end scenarios for the Swag Labs store
//!
//! Pages are declared as named selectors plus command sets, bound to one
//! browser session per test context, and driven through an abstract
//! [`Driver`] so the same scenarios run against Chromium or the in-memory
//! store model.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  Scenario    │   │ TestContext  │   │    Page      │   │   Driver     │
//! │  (harness)   │──►│ login() /    │──►│ registry +   │──►│ SimDriver /  │
//! │              │   │ products()   │   │ commands     │   │ Chromium     │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use swagcheck::prelude::*;
//!
//! let ctx = TestContext::new(Session::new(SimDriver::new()), fixtures)?;
//! ctx.login()?
//!     .navigate().await?
//!     .login_with_username_and_password("standard_user", "secret_sauce").await?
//!     .url_should_equal("https://www.saucedemo.com/inventory.html").await?;
//! ctx.end().await?;
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod catalog;
mod driver;
mod element;
mod fixture;
mod page;
mod pages;
mod random;
mod result;
mod session;

/// Suite harness: cases, hooks, results
pub mod harness;

/// Tracing subscriber setup
pub mod logging;

/// The Swag Labs scenario suites
pub mod scenarios;

/// In-memory Swag Labs store
pub mod sim;

/// Chromium driver (requires `browser` feature)
#[cfg(feature = "browser")]
pub mod browser;

/// HTTP API assertions (requires `api` feature)
#[cfg(feature = "api")]
pub mod api;

pub use catalog::{PageRegistry, TestContext};
pub use driver::{Driver, DriverConfig, ElementHandle};
pub use element::{ElementRegistry, SelectorDescriptor};
pub use fixture::{Fixtures, Messages, Users};
pub use harness::{SuiteResults, TestCase, TestHarness, TestResult, TestSuite};
pub use page::{
    CommandSet, ElementCollection, Page, PageBuilder, PageDescriptor, ScopedElement,
    ELEMENT_COMMANDS,
};
pub use pages::{
    login_descriptor, products_descriptor, register_swag_labs, LoginCommands, LoginPage,
    PageObject, ProductsCommands, ProductsPage, LOGIN_COMMANDS, LOGIN_PAGE, PRODUCTS_COMMANDS,
    PRODUCTS_PAGE, ROW_BUTTON,
};
pub use random::{random_string, random_string_with};
pub use result::{PageError, PageResult};
pub use session::{Session, SessionState};
pub use sim::SimDriver;

#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;

#[cfg(feature = "api")]
pub use api::{ApiClient, ApiResponse, AIRPORT_GAP_URL};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        Driver, DriverConfig, Fixtures, LoginCommands, Page, PageError, PageObject, PageResult,
        ProductsCommands, Session, SimDriver, TestContext,
    };
    pub use super::{TestCase, TestHarness, TestSuite};
}

//! Driver - Abstract Browser Automation Trait
//!
//! The page-object layer never talks to a browser directly. Everything goes
//! through [`Driver`], so the in-memory store simulator and the Chromium
//! driver are interchangeable.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  Driver (Abstract Trait)                                  │
//! ├───────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────┐      ┌─────────────────────┐     │
//! │  │  ChromiumDriver     │      │  SimDriver          │     │
//! │  │  (feature=browser)  │      │  (offline, tests)   │     │
//! │  │  CDP via            │      │  in-memory          │     │
//! │  │  chromiumoxide      │      │  Swag Labs model    │     │
//! │  └─────────────────────┘      └─────────────────────┘     │
//! └───────────────────────────────────────────────────────────┘
//! ```

use crate::result::{PageError, PageResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Handle to one located element
///
/// Handles are only meaningful to the driver that produced them and only
/// until the next navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-assigned identifier
    pub id: String,
    /// Selector the element was located with
    pub selector: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            selector: selector.into(),
        }
    }
}

/// Browser configuration for drivers
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// User agent string
    pub user_agent: Option<String>,
    /// Timeout for navigation
    pub navigation_timeout: Duration,
    /// Chromium sandbox (disable for containers)
    pub sandbox: bool,
    /// Executable path override
    pub executable_path: Option<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 800,
            user_agent: None,
            navigation_timeout: Duration::from_secs(30),
            sandbox: true,
            executable_path: None,
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set user agent
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set navigation timeout
    #[must_use]
    pub const fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set the browser executable
    #[must_use]
    pub fn executable_path(mut self, path: impl Into<String>) -> Self {
        self.executable_path = Some(path.into());
        self
    }
}

/// Abstract driver trait for browser automation
///
/// Implementations only need the element-level primitives; the
/// selector-level helpers are derived from [`Driver::find_all`].
#[async_trait]
pub trait Driver: Send + Sync + std::fmt::Debug {
    /// Navigate to URL
    async fn navigate(&mut self, url: &str) -> PageResult<()>;

    /// Get current URL
    async fn current_url(&self) -> PageResult<String>;

    /// Locate every element matching `selector`, in document order
    async fn find_all(&mut self, selector: &str) -> PageResult<Vec<ElementHandle>>;

    /// Locate elements matching `selector` below `parent`
    async fn find_within(
        &mut self,
        parent: &ElementHandle,
        selector: &str,
    ) -> PageResult<Vec<ElementHandle>>;

    /// Click element
    async fn click(&mut self, element: &ElementHandle) -> PageResult<()>;

    /// Replace the element's value with `text`
    async fn set_value(&mut self, element: &ElementHandle, text: &str) -> PageResult<()>;

    /// Visible text of the element
    async fn text(&self, element: &ElementHandle) -> PageResult<String>;

    /// End the browser session
    async fn close(&mut self) -> PageResult<()>;

    /// First element matching `selector`
    async fn find_first(&mut self, selector: &str) -> PageResult<ElementHandle> {
        self.find_all(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| PageError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    /// Click the first element matching `selector`
    async fn click_selector(&mut self, selector: &str) -> PageResult<()> {
        let element = self.find_first(selector).await?;
        self.click(&element).await
    }

    /// Set the value of the first element matching `selector`
    async fn set_value_selector(&mut self, selector: &str, text: &str) -> PageResult<()> {
        let element = self.find_first(selector).await?;
        self.set_value(&element, text).await
    }

    /// Text of the first element matching `selector`
    async fn text_of_selector(&mut self, selector: &str) -> PageResult<String> {
        let element = self.find_first(selector).await?;
        self.text(&element).await
    }
}

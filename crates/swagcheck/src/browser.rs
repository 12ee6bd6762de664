//! Chromium driver over the Chrome DevTools Protocol.
//!
//! Element handles are keys into a per-driver table of chromiumoxide
//! elements. The table is dropped on every navigation and after every
//! click (a click may submit a form or follow a link), so a handle taken
//! before either fails with `ElementNotFound` afterwards.

use crate::driver::{Driver, DriverConfig, ElementHandle};
use crate::result::{PageError, PageResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Real browser behind the [`Driver`] trait
#[derive(Debug)]
pub struct ChromiumDriver {
    config: DriverConfig,
    browser: Mutex<CdpBrowser>,
    page: CdpPage,
    handler: tokio::task::JoinHandle<()>,
    elements: HandleTable<Element>,
    closed: bool,
}

/// Live elements keyed by the ids handed out in [`ElementHandle`]s
#[derive(Debug)]
struct HandleTable<T> {
    entries: HashMap<String, T>,
    next_id: u64,
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T> HandleTable<T> {
    fn remember(&mut self, selector: &str, found: Vec<T>) -> Vec<ElementHandle> {
        found
            .into_iter()
            .map(|element| {
                self.next_id += 1;
                let id = format!("cdp-{}", self.next_id);
                let _ = self.entries.insert(id.clone(), element);
                ElementHandle::new(id, selector)
            })
            .collect()
    }

    fn get(&self, handle: &ElementHandle) -> PageResult<&T> {
        self.entries
            .get(&handle.id)
            .ok_or_else(|| PageError::ElementNotFound {
                selector: handle.selector.clone(),
            })
    }

    fn invalidate(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank tab
    ///
    /// # Errors
    ///
    /// Returns `Driver` if the browser cannot be started.
    pub async fn launch(config: DriverConfig) -> PageResult<Self> {
        let mut builder = CdpConfig::builder()
            .window_size(config.viewport_width, config.viewport_height)
            .request_timeout(config.navigation_timeout);

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.executable_path {
            builder = builder.chrome_executable(path);
        }

        if let Some(ref ua) = config.user_agent {
            builder = builder.arg(format!("--user-agent={ua}"));
        }

        let cdp_config = builder
            .build()
            .map_err(|e| PageError::driver(format!("invalid browser config: {e}")))?;

        let (browser, mut handler) = CdpBrowser::launch(cdp_config)
            .await
            .map_err(|e| PageError::driver(format!("browser launch failed: {e}")))?;

        // Spawn handler task
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| PageError::driver(e.to_string()))?;

        tracing::info!(headless = config.headless, "chromium launched");
        Ok(Self {
            config,
            browser: Mutex::new(browser),
            page,
            handler,
            elements: HandleTable::default(),
            closed: false,
        })
    }

    /// Configuration the browser was launched with
    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    fn ensure_open(&self) -> PageResult<()> {
        if self.closed {
            return Err(PageError::driver("browser has been closed"));
        }
        Ok(())
    }

    fn element(&self, handle: &ElementHandle) -> PageResult<&Element> {
        self.elements.get(handle)
    }
}

fn cdp_error(action: &str, e: impl std::fmt::Display) -> PageError {
    PageError::driver(format!("{action}: {e}"))
}

#[async_trait]
impl Driver for ChromiumDriver {
    async fn navigate(&mut self, url: &str) -> PageResult<()> {
        self.ensure_open()?;
        self.elements.invalidate();
        let goto = self.page.goto(url);
        match tokio::time::timeout(self.config.navigation_timeout, goto).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(PageError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(PageError::Navigation {
                url: url.to_string(),
                message: format!(
                    "timed out after {}ms",
                    self.config.navigation_timeout.as_millis()
                ),
            }),
        }
    }

    async fn current_url(&self) -> PageResult<String> {
        self.ensure_open()?;
        let url = self
            .page
            .url()
            .await
            .map_err(|e| cdp_error("url", e))?;
        Ok(url.unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn find_all(&mut self, selector: &str) -> PageResult<Vec<ElementHandle>> {
        self.ensure_open()?;
        let found = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| cdp_error(selector, e))?;
        Ok(self.elements.remember(selector, found))
    }

    async fn find_within(
        &mut self,
        parent: &ElementHandle,
        selector: &str,
    ) -> PageResult<Vec<ElementHandle>> {
        self.ensure_open()?;
        let found = self
            .element(parent)?
            .find_elements(selector)
            .await
            .map_err(|e| cdp_error(selector, e))?;
        Ok(self.elements.remember(selector, found))
    }

    async fn click(&mut self, element: &ElementHandle) -> PageResult<()> {
        self.ensure_open()?;
        self.element(element)?
            .click()
            .await
            .map_err(|e| cdp_error("click", e))?;
        self.elements.invalidate();
        tracing::debug!(selector = %element.selector, "clicked; element handles released");
        Ok(())
    }

    async fn set_value(&mut self, element: &ElementHandle, text: &str) -> PageResult<()> {
        self.ensure_open()?;
        let input = self.element(element)?;
        input.click().await.map_err(|e| cdp_error("focus", e))?;
        // Select then delete through key events so framework-controlled
        // inputs observe the change.
        input
            .call_js_fn("function() { this.select(); }", false)
            .await
            .map_err(|e| cdp_error("select", e))?;
        input
            .press_key("Backspace")
            .await
            .map_err(|e| cdp_error("clear", e))?;
        if !text.is_empty() {
            input
                .type_str(text)
                .await
                .map_err(|e| cdp_error("type", e))?;
        }
        Ok(())
    }

    async fn text(&self, element: &ElementHandle) -> PageResult<String> {
        self.ensure_open()?;
        let text = self
            .element(element)?
            .inner_text()
            .await
            .map_err(|e| cdp_error("inner_text", e))?;
        Ok(text.unwrap_or_default())
    }

    async fn close(&mut self) -> PageResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.elements.invalidate();
        let mut browser = self.browser.lock().await;
        let closed = browser.close().await.map(|_| ());
        let _ = browser.wait().await;
        drop(browser);
        self.handler.abort();
        tracing::info!("chromium closed");
        closed.map_err(|e| cdp_error("close", e))
    }
}

//! Page descriptors and the session-bound page handle.
//!
//! A [`PageDescriptor`] binds a URL, an element registry and the command
//! sets a page aggregates. A [`Page`] pairs a descriptor with a live
//! [`Session`] and exposes the primitive commands every page object is
//! built from. Primitives return `PageResult<&Self>` so calls chain with
//! `.await?`.
//!
//! # Example
//!
//! ```ignore
//! page.navigate().await?
//!     .set_value("usernameInput", "standard_user").await?
//!     .click("loginButton").await?
//!     .assert_url_equals("https://www.saucedemo.com/inventory.html").await?;
//! ```

use crate::driver::ElementHandle;
use crate::element::{ElementRegistry, SelectorDescriptor};
use crate::result::{PageError, PageResult};
use crate::session::Session;
use std::collections::HashMap;
use std::sync::Arc;

/// Static description of a command-set trait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSet {
    /// Set name
    pub name: &'static str,
    /// Commands the set defines
    pub commands: &'static [&'static str],
}

/// Primitive commands available on every page
pub const ELEMENT_COMMANDS: CommandSet = CommandSet {
    name: "element",
    commands: &[
        "navigate",
        "set_value",
        "click",
        "text",
        "url",
        "assert_text_equals",
        "assert_url_equals",
        "find_all",
    ],
};

/// A logical page: URL, elements and command sets
#[derive(Debug, Clone)]
pub struct PageDescriptor {
    name: String,
    url: String,
    elements: ElementRegistry,
    command_sets: Vec<CommandSet>,
}

impl PageDescriptor {
    /// Start building a descriptor
    #[must_use]
    pub fn builder(name: impl Into<String>, url: impl Into<String>) -> PageBuilder {
        PageBuilder::new(name, url)
    }

    /// Page name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL loaded by `navigate`
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The page's element registry
    #[must_use]
    pub const fn elements(&self) -> &ElementRegistry {
        &self.elements
    }

    /// Command sets, primitives first
    #[must_use]
    pub fn command_sets(&self) -> &[CommandSet] {
        &self.command_sets
    }

    /// Resolve an element name
    ///
    /// # Errors
    ///
    /// `UnknownElement` if the page has no such element.
    pub fn resolve(&self, element: &str) -> PageResult<&SelectorDescriptor> {
        self.elements.resolve(element)
    }

    /// Command set defining `command`, if any
    #[must_use]
    pub fn command_set_for(&self, command: &str) -> Option<&CommandSet> {
        self.command_sets
            .iter()
            .find(|set| set.commands.contains(&command))
    }
}

/// Builder for page descriptors
#[derive(Debug, Clone)]
pub struct PageBuilder {
    name: String,
    url: String,
    elements: Vec<(String, String)>,
    command_sets: Vec<CommandSet>,
}

impl PageBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            elements: Vec::new(),
            command_sets: vec![ELEMENT_COMMANDS],
        }
    }

    /// Add a named element
    #[must_use]
    pub fn element(mut self, name: impl Into<String>, query: impl Into<String>) -> Self {
        self.elements.push((name.into(), query.into()));
        self
    }

    /// Aggregate a command set
    #[must_use]
    pub fn command_set(mut self, set: CommandSet) -> Self {
        self.command_sets.push(set);
        self
    }

    /// Build the descriptor
    ///
    /// # Errors
    ///
    /// The first registration failure: a duplicate or empty element, or a
    /// command name defined by two command sets.
    pub fn build(self) -> PageResult<PageDescriptor> {
        let mut elements = ElementRegistry::new(self.name.clone());
        for (name, query) in self.elements {
            let _ = elements.register(name, query)?;
        }

        let mut owners: HashMap<&str, &str> = HashMap::new();
        for set in &self.command_sets {
            for command in set.commands {
                if let Some(owner) = owners.insert(command, set.name) {
                    tracing::warn!(
                        page = %self.name,
                        command,
                        first = owner,
                        second = set.name,
                        "command defined by two command sets"
                    );
                    return Err(PageError::DuplicateName {
                        kind: "command",
                        name: (*command).to_string(),
                    });
                }
            }
        }

        Ok(PageDescriptor {
            name: self.name,
            url: self.url,
            elements,
            command_sets: self.command_sets,
        })
    }
}

/// A descriptor bound to a live session
#[derive(Debug, Clone)]
pub struct Page {
    session: Session,
    descriptor: Arc<PageDescriptor>,
}

impl Page {
    /// Bind a descriptor to a session
    #[must_use]
    pub fn new(session: Session, descriptor: Arc<PageDescriptor>) -> Self {
        Self {
            session,
            descriptor,
        }
    }

    /// The page's descriptor
    #[must_use]
    pub fn descriptor(&self) -> &PageDescriptor {
        &self.descriptor
    }

    /// The session this page drives
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    fn query(&self, element: &str) -> PageResult<String> {
        Ok(self.descriptor.resolve(element)?.query.clone())
    }

    /// Load the page's URL
    pub async fn navigate(&self) -> PageResult<&Self> {
        self.session.navigate(self.descriptor.url()).await?;
        Ok(self)
    }

    /// Type `text` into the named element, replacing its value
    pub async fn set_value(&self, element: &str, text: &str) -> PageResult<&Self> {
        let query = self.query(element)?;
        let mut session = self.session.acquire().await?;
        tracing::debug!(page = self.descriptor.name(), element, %query, "set_value");
        session.driver.set_value_selector(&query, text).await?;
        Ok(self)
    }

    /// Click the named element
    pub async fn click(&self, element: &str) -> PageResult<&Self> {
        let query = self.query(element)?;
        let mut session = self.session.acquire().await?;
        tracing::debug!(page = self.descriptor.name(), element, %query, "click");
        session.driver.click_selector(&query).await?;
        Ok(self)
    }

    /// Live text of the named element
    pub async fn text(&self, element: &str) -> PageResult<String> {
        let query = self.query(element)?;
        let mut session = self.session.acquire().await?;
        session.driver.text_of_selector(&query).await
    }

    /// Live URL
    pub async fn url(&self) -> PageResult<String> {
        self.session.current_url().await
    }

    /// Compare the named element's text with `expected`
    pub async fn assert_text_equals(&self, element: &str, expected: &str) -> PageResult<&Self> {
        let actual = self.text(element).await?;
        if actual != expected {
            return Err(PageError::mismatch(element, expected, actual));
        }
        Ok(self)
    }

    /// Compare the live URL with `expected`
    pub async fn assert_url_equals(&self, expected: &str) -> PageResult<&Self> {
        let actual = self.url().await?;
        if actual != expected {
            return Err(PageError::mismatch("url", expected, actual));
        }
        Ok(self)
    }

    /// Every element matching the named selector, located lazily
    ///
    /// # Errors
    ///
    /// `UnknownElement` if the name is not registered. The driver is not
    /// consulted until the collection is read.
    pub fn find_all(&self, element: &str) -> PageResult<ElementCollection> {
        Ok(ElementCollection {
            session: self.session.clone(),
            selector: self.query(element)?,
            scope: None,
        })
    }
}

/// Lazily located sequence of elements
#[derive(Debug, Clone)]
pub struct ElementCollection {
    session: Session,
    selector: String,
    scope: Option<ElementHandle>,
}

impl ElementCollection {
    /// Selector the collection matches
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Locate the matching elements now
    pub async fn handles(&self) -> PageResult<Vec<ElementHandle>> {
        let mut session = self.session.acquire().await?;
        match &self.scope {
            Some(parent) => session.driver.find_within(parent, &self.selector).await,
            None => session.driver.find_all(&self.selector).await,
        }
    }

    /// Number of matching elements
    pub async fn count(&self) -> PageResult<usize> {
        Ok(self.handles().await?.len())
    }

    /// The element at `index`
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` when `index >= count`.
    pub async fn nth(&self, index: usize) -> PageResult<ScopedElement> {
        let handles = self.handles().await?;
        let count = handles.len();
        let handle =
            handles
                .into_iter()
                .nth(index)
                .ok_or_else(|| PageError::IndexOutOfRange {
                    selector: self.selector.clone(),
                    index,
                    count,
                })?;
        Ok(ScopedElement {
            session: self.session.clone(),
            handle,
        })
    }

    /// Text of every matching element, in order
    pub async fn texts(&self) -> PageResult<Vec<String>> {
        let handles = self.handles().await?;
        let session = self.session.acquire().await?;
        let mut texts = Vec::with_capacity(handles.len());
        for handle in &handles {
            texts.push(session.driver.text(handle).await?);
        }
        Ok(texts)
    }
}

/// One located element and the session it lives in
#[derive(Debug, Clone)]
pub struct ScopedElement {
    session: Session,
    handle: ElementHandle,
}

impl ScopedElement {
    /// Underlying driver handle
    #[must_use]
    pub const fn handle(&self) -> &ElementHandle {
        &self.handle
    }

    /// First descendant matching `selector`
    ///
    /// # Errors
    ///
    /// `ElementNotFound` if nothing below this element matches.
    pub async fn find(&self, selector: &str) -> PageResult<ScopedElement> {
        let mut session = self.session.acquire().await?;
        let handle = session
            .driver
            .find_within(&self.handle, selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| PageError::ElementNotFound {
                selector: format!("{} {selector}", self.handle.selector),
            })?;
        Ok(ScopedElement {
            session: self.session.clone(),
            handle,
        })
    }

    /// Every descendant matching `selector`
    #[must_use]
    pub fn find_all(&self, selector: impl Into<String>) -> ElementCollection {
        ElementCollection {
            session: self.session.clone(),
            selector: selector.into(),
            scope: Some(self.handle.clone()),
        }
    }

    /// Click this element
    pub async fn click(&self) -> PageResult<&Self> {
        let mut session = self.session.acquire().await?;
        tracing::debug!(selector = %self.handle.selector, id = %self.handle.id, "click");
        session.driver.click(&self.handle).await?;
        Ok(self)
    }

    /// Replace this element's value
    pub async fn set_value(&self, text: &str) -> PageResult<&Self> {
        let mut session = self.session.acquire().await?;
        session.driver.set_value(&self.handle, text).await?;
        Ok(self)
    }

    /// Text of this element
    pub async fn text(&self) -> PageResult<String> {
        let session = self.session.acquire().await?;
        session.driver.text(&self.handle).await
    }
}

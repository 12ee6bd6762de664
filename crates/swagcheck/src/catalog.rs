//! Page registry and per-run test context.
//!
//! Pages are registered by name as descriptor factories. A descriptor is
//! built the first time it is requested and shared afterwards, so every
//! page object handed out by one context sees the same descriptor and the
//! same session.

use crate::fixture::Fixtures;
use crate::page::{Page, PageDescriptor};
use crate::pages::{register_swag_labs, LoginPage, ProductsPage, LOGIN_PAGE, PRODUCTS_PAGE};
use crate::result::{PageError, PageResult};
use crate::session::Session;
use crate::sim::BASE_URL;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

type DescriptorFactory = Box<dyn Fn() -> PageResult<PageDescriptor> + Send + Sync>;

/// Name to page-descriptor factory mapping
#[derive(Default)]
pub struct PageRegistry {
    factories: HashMap<String, DescriptorFactory>,
    built: Mutex<HashMap<String, Arc<PageDescriptor>>>,
}

impl std::fmt::Debug for PageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRegistry")
            .field("pages", &self.names())
            .finish()
    }
}

impl PageRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor factory under `name`
    ///
    /// # Errors
    ///
    /// `DuplicateName` if the name is taken.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> PageResult<()>
    where
        F: Fn() -> PageResult<PageDescriptor> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(PageError::DuplicateName { kind: "page", name });
        }
        let _ = self.factories.insert(name, Box::new(factory));
        Ok(())
    }

    /// Descriptor for `name`, built on first request
    ///
    /// # Errors
    ///
    /// `UnknownPage` for an unregistered name, or the factory's error.
    /// A failed build is not cached.
    pub fn get(&self, name: &str) -> PageResult<Arc<PageDescriptor>> {
        let mut built = self.built.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(descriptor) = built.get(name) {
            return Ok(Arc::clone(descriptor));
        }

        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| PageError::UnknownPage {
                name: name.to_string(),
            })?;
        let descriptor = Arc::new(factory()?);
        tracing::debug!(page = name, url = descriptor.url(), "page descriptor built");
        let _ = built.insert(name.to_string(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Whether `name` is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered page names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Everything one test case runs against
#[derive(Debug)]
pub struct TestContext {
    session: Session,
    fixtures: Arc<Fixtures>,
    pages: PageRegistry,
}

impl TestContext {
    /// Context for the public Swag Labs site
    ///
    /// # Errors
    ///
    /// Propagates page registration failures.
    pub fn new(session: Session, fixtures: Arc<Fixtures>) -> PageResult<Self> {
        Self::with_base_url(session, fixtures, BASE_URL)
    }

    /// Context whose pages point at `base_url`
    pub fn with_base_url(
        session: Session,
        fixtures: Arc<Fixtures>,
        base_url: &str,
    ) -> PageResult<Self> {
        let mut pages = PageRegistry::new();
        register_swag_labs(&mut pages, base_url)?;
        Ok(Self {
            session,
            fixtures,
            pages,
        })
    }

    /// Generic page handle for any registered page
    pub fn page(&self, name: &str) -> PageResult<Page> {
        Ok(Page::new(self.session.clone(), self.pages.get(name)?))
    }

    /// The login page object
    pub fn login(&self) -> PageResult<LoginPage> {
        Ok(LoginPage::new(self.page(LOGIN_PAGE)?))
    }

    /// The products page object
    pub fn products(&self) -> PageResult<ProductsPage> {
        Ok(ProductsPage::new(self.page(PRODUCTS_PAGE)?))
    }

    /// Fixture data
    #[must_use]
    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    /// The context's session
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Page registry, for lookups
    #[must_use]
    pub const fn pages(&self) -> &PageRegistry {
        &self.pages
    }

    /// Page registry, for registering extra pages
    pub fn pages_mut(&mut self) -> &mut PageRegistry {
        &mut self.pages
    }

    /// End the session
    pub async fn end(&self) -> PageResult<()> {
        self.session.end().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::pages::{LoginCommands, PageObject, ProductsCommands};
    use crate::session::SessionState;
    use crate::sim::{SimDriver, INVENTORY_URL};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn context() -> TestContext {
        let fixtures = Arc::new(Fixtures::embedded().unwrap());
        TestContext::new(Session::new(SimDriver::new()), fixtures).unwrap()
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn test_factory_runs_once() {
            let calls = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&calls);
            let mut registry = PageRegistry::new();
            registry
                .register("checkout", move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    PageDescriptor::builder("checkout", BASE_URL).build()
                })
                .unwrap();

            // Nothing is built at registration
            assert_eq!(calls.load(Ordering::SeqCst), 0);

            let first = registry.get("checkout").unwrap();
            let second = registry.get("checkout").unwrap();
            assert!(Arc::ptr_eq(&first, &second));
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }

        #[test]
        fn test_unknown_page() {
            let registry = PageRegistry::new();
            let err = registry.get("cart").unwrap_err();
            assert!(matches!(err, PageError::UnknownPage { ref name } if name == "cart"));
        }

        #[test]
        fn test_failed_factory_not_cached() {
            let calls = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&calls);
            let mut registry = PageRegistry::new();
            registry
                .register("broken", move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    PageDescriptor::builder("broken", BASE_URL)
                        .element("x", "")
                        .build()
                })
                .unwrap();

            assert!(registry.get("broken").is_err());
            assert!(registry.get("broken").is_err());
            assert_eq!(calls.load(Ordering::SeqCst), 2);
        }

        #[test]
        fn test_names_sorted() {
            let mut registry = PageRegistry::new();
            register_swag_labs(&mut registry, BASE_URL).unwrap();
            assert_eq!(registry.names(), vec![LOGIN_PAGE, PRODUCTS_PAGE]);
            assert!(registry.contains(LOGIN_PAGE));
            assert!(!registry.contains("cart"));
        }
    }

    mod context_tests {
        use super::*;

        #[test]
        fn test_pages_share_descriptor() {
            let ctx = context();
            let a = ctx.login().unwrap();
            let b = ctx.login().unwrap();
            assert!(std::ptr::eq(a.page().descriptor(), b.page().descriptor()));
        }

        #[tokio::test]
        async fn test_pages_share_session() {
            let ctx = context();
            let fixtures = ctx.fixtures().clone();
            ctx.login()
                .unwrap()
                .navigate()
                .await
                .unwrap()
                .login_with_username_and_password(
                    &fixtures.users.standard,
                    &fixtures.users.password,
                )
                .await
                .unwrap();

            ctx.products()
                .unwrap()
                .add_item_to_cart_by_index(3)
                .await
                .unwrap()
                .items_in_cart_should_be(1)
                .await
                .unwrap();
            assert_eq!(ctx.page(PRODUCTS_PAGE).unwrap().url().await.unwrap(), INVENTORY_URL);
        }

        #[tokio::test]
        async fn test_end_closes_session() {
            let ctx = context();
            ctx.end().await.unwrap();
            assert_eq!(ctx.session().state().await, SessionState::Closed);
        }

        #[test]
        fn test_extra_pages_can_be_registered() {
            let mut ctx = context();
            ctx.pages_mut()
                .register("about", || {
                    PageDescriptor::builder("about", "https://saucelabs.com/").build()
                })
                .unwrap();
            assert_eq!(ctx.page("about").unwrap().descriptor().name(), "about");
            assert!(ctx.page("cart").is_err());
        }
    }
}

//! Element registry: symbolic names mapped to selector descriptors.
//!
//! Each page owns one registry. Commands refer to elements by name only;
//! a name that was never registered fails when the command runs, not when
//! the command is written, since registries and command sets are composed
//! independently.

use crate::result::{PageError, PageResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named, driver-specific locator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorDescriptor {
    /// Symbolic name, unique within a page
    pub name: String,
    /// Locator string handed to the driver
    pub query: String,
}

impl SelectorDescriptor {
    /// Create a new descriptor
    #[must_use]
    pub fn new(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: query.into(),
        }
    }
}

/// Name to selector mapping owned by a single page
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    page: String,
    entries: HashMap<String, SelectorDescriptor>,
    order: Vec<String>,
}

impl ElementRegistry {
    /// Create an empty registry for the named page
    #[must_use]
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a selector under `name`
    ///
    /// # Errors
    ///
    /// `DuplicateName` if `name` is already registered, `EmptySelector`
    /// if `query` is empty.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        query: impl Into<String>,
    ) -> PageResult<&SelectorDescriptor> {
        let name = name.into();
        let query = query.into();

        if query.trim().is_empty() {
            return Err(PageError::EmptySelector { name });
        }
        if self.entries.contains_key(&name) {
            return Err(PageError::DuplicateName {
                kind: "element",
                name,
            });
        }

        self.order.push(name.clone());
        let descriptor = self
            .entries
            .entry(name.clone())
            .or_insert_with(|| SelectorDescriptor::new(name, query));
        Ok(descriptor)
    }

    /// Resolve a name to its descriptor
    ///
    /// # Errors
    ///
    /// `UnknownElement` if `name` was never registered.
    pub fn resolve(&self, name: &str) -> PageResult<&SelectorDescriptor> {
        self.entries
            .get(name)
            .ok_or_else(|| PageError::UnknownElement {
                page: self.page.clone(),
                name: name.to_string(),
            })
    }

    /// Check whether a name is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in registration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Number of registered elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Page this registry belongs to
    #[must_use]
    pub fn page(&self) -> &str {
        &self.page
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod register_tests {
        use super::*;

        #[test]
        fn test_register_and_resolve() {
            let mut registry = ElementRegistry::new("login");
            registry.register("usernameInput", "#user-name").unwrap();

            let descriptor = registry.resolve("usernameInput").unwrap();
            assert_eq!(descriptor.name, "usernameInput");
            assert_eq!(descriptor.query, "#user-name");
        }

        #[test]
        fn test_duplicate_name_rejected() {
            let mut registry = ElementRegistry::new("login");
            registry.register("loginButton", "#login-button").unwrap();

            let err = registry.register("loginButton", "#other").unwrap_err();
            assert!(matches!(
                err,
                PageError::DuplicateName { kind: "element", ref name } if name == "loginButton"
            ));
            // First registration wins
            assert_eq!(registry.resolve("loginButton").unwrap().query, "#login-button");
            assert_eq!(registry.len(), 1);
        }

        #[test]
        fn test_empty_selector_rejected() {
            let mut registry = ElementRegistry::new("login");
            let err = registry.register("blank", "  ").unwrap_err();
            assert!(matches!(err, PageError::EmptySelector { .. }));
            assert!(registry.is_empty());
        }

        #[test]
        fn test_names_keep_registration_order() {
            let mut registry = ElementRegistry::new("products");
            registry.register("b", "#b").unwrap();
            registry.register("a", "#a").unwrap();
            registry.register("c", "#c").unwrap();
            assert_eq!(registry.names(), vec!["b", "a", "c"]);
        }
    }

    mod resolve_tests {
        use super::*;

        #[test]
        fn test_unknown_element_names_page() {
            let registry = ElementRegistry::new("products");
            let err = registry.resolve("cartNumber").unwrap_err();
            match err {
                PageError::UnknownElement { page, name } => {
                    assert_eq!(page, "products");
                    assert_eq!(name, "cartNumber");
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_contains() {
            let mut registry = ElementRegistry::new("p");
            registry.register("x", "#x").unwrap();
            assert!(registry.contains("x"));
            assert!(!registry.contains("y"));
            assert_eq!(registry.page(), "p");
        }
    }

    proptest! {
        #[test]
        fn prop_resolve_returns_registered_descriptor(
            entries in proptest::collection::hash_map("[a-zA-Z]{1,12}", "[#.a-z-]{1,20}", 1..16)
        ) {
            let mut registry = ElementRegistry::new("prop");
            for (name, query) in &entries {
                registry.register(name.clone(), query.clone()).unwrap();
            }
            for (name, query) in &entries {
                let descriptor = registry.resolve(name).unwrap();
                prop_assert_eq!(&descriptor.name, name);
                prop_assert_eq!(&descriptor.query, query);
            }
        }

        #[test]
        fn prop_unregistered_name_always_fails(name in "[a-z]{1,10}") {
            let mut registry = ElementRegistry::new("prop");
            registry.register("REGISTERED", "#r").unwrap();
            let is_unknown = matches!(
                registry.resolve(&name),
                Err(PageError::UnknownElement { .. })
            );
            prop_assert!(is_unknown);
        }
    }
}

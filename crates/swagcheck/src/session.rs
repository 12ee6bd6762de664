//! Browser session shared by the page objects of one test context.
//!
//! A session wraps exactly one driver and walks a small state machine:
//!
//! ```text
//! Unopened ──navigate──► Navigated ──end──► Closed
//!                          │   ▲
//!                          └───┘ navigate
//! ```
//!
//! Element commands are rejected outside `Navigated`. Every driver call
//! holds the session lock, so commands never interleave on one browser.

use crate::driver::Driver;
use crate::result::{PageError, PageResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No page loaded yet
    Unopened,
    /// A page has been loaded
    Navigated,
    /// Session ended, driver closed
    Closed,
}

pub(crate) struct SessionInner {
    pub(crate) driver: Box<dyn Driver>,
    state: SessionState,
}

/// Shared handle to one browser session
#[derive(Clone)]
pub struct Session {
    id: Uuid,
    inner: Arc<Mutex<SessionInner>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("id", &self.id).finish()
    }
}

impl Session {
    /// Start a session over `driver`
    #[must_use]
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self::from_boxed(Box::new(driver))
    }

    /// Start a session over an already boxed driver
    #[must_use]
    pub fn from_boxed(driver: Box<dyn Driver>) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, ?driver, "session created");
        Self {
            id,
            inner: Arc::new(Mutex::new(SessionInner {
                driver,
                state: SessionState::Unopened,
            })),
        }
    }

    /// Session identifier
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Current lifecycle state
    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    fn closed(&self) -> PageError {
        PageError::SessionClosed {
            id: self.id.to_string(),
        }
    }

    /// Load `url` and move to `Navigated`
    ///
    /// # Errors
    ///
    /// `SessionClosed` after [`Session::end`], or the driver's navigation error.
    pub async fn navigate(&self, url: &str) -> PageResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.state == SessionState::Closed {
            return Err(self.closed());
        }
        tracing::info!(session = %self.id, url, "navigate");
        inner.driver.navigate(url).await?;
        inner.state = SessionState::Navigated;
        Ok(())
    }

    /// Live URL of the browser
    ///
    /// # Errors
    ///
    /// `NotNavigated` before the first navigation, `SessionClosed` after end.
    pub async fn current_url(&self) -> PageResult<String> {
        let inner = self.acquire().await?;
        inner.driver.current_url().await
    }

    /// Lock the driver for a command, enforcing the `Navigated` precondition
    pub(crate) async fn acquire(&self) -> PageResult<MutexGuard<'_, SessionInner>> {
        let inner = self.inner.lock().await;
        match inner.state {
            SessionState::Navigated => Ok(inner),
            SessionState::Unopened => Err(PageError::NotNavigated),
            SessionState::Closed => Err(self.closed()),
        }
    }

    /// Close the browser. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if closing fails; the session is marked
    /// closed either way.
    pub async fn end(&self) -> PageResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.state == SessionState::Closed {
            return Ok(());
        }
        inner.state = SessionState::Closed;
        tracing::debug!(session = %self.id, "session ended");
        inner.driver.close().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::sim::{SimDriver, BASE_URL, LOGIN_URL};

    #[tokio::test]
    async fn test_starts_unopened() {
        let session = Session::new(SimDriver::new());
        assert_eq!(session.state().await, SessionState::Unopened);
        let err = session.current_url().await.unwrap_err();
        assert!(matches!(err, PageError::NotNavigated));
    }

    #[tokio::test]
    async fn test_navigate_then_read_url() {
        let session = Session::new(SimDriver::new());
        session.navigate(BASE_URL).await.unwrap();
        assert_eq!(session.state().await, SessionState::Navigated);
        assert_eq!(session.current_url().await.unwrap(), LOGIN_URL);
    }

    #[tokio::test]
    async fn test_failed_navigation_keeps_state() {
        let session = Session::new(SimDriver::new());
        assert!(session.navigate("https://example.com").await.is_err());
        assert_eq!(session.state().await, SessionState::Unopened);
    }

    #[tokio::test]
    async fn test_end_is_idempotent_and_final() {
        let session = Session::new(SimDriver::new());
        session.navigate(BASE_URL).await.unwrap();
        session.end().await.unwrap();
        session.end().await.unwrap();
        assert_eq!(session.state().await, SessionState::Closed);

        let err = session.navigate(BASE_URL).await.unwrap_err();
        assert!(matches!(err, PageError::SessionClosed { .. }));
        let err = session.current_url().await.unwrap_err();
        assert!(matches!(err, PageError::SessionClosed { .. }));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let session = Session::new(SimDriver::new());
        let other = session.clone();
        session.navigate(BASE_URL).await.unwrap();
        assert_eq!(other.state().await, SessionState::Navigated);
        assert_eq!(other.id(), session.id());
    }
}

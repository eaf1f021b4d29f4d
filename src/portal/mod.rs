//! Portal session management and application launching.
//!
//! The portal is the single-sign-on web application that fronts every
//! downstream educational platform. One [`PortalSession`] owns one
//! headless browser; everything built on top of it (the
//! [`ApplicationLauncher`], the platform scrapers) composes over the
//! [`Authenticatable`] and [`Navigable`] capability traits rather than
//! inheriting session internals.
//!
//! ```text
//! PortalSession → ApplicationLauncher → PlatformScraper → records
//! ```

mod config;
mod launcher;
mod session;

pub use config::{Credentials, PortalConfig};
pub use launcher::ApplicationLauncher;
pub use session::{AuthState, PortalSession};

use std::time::Duration;

use async_trait::async_trait;

/// Capability to authenticate against the identity portal.
///
/// Failures are reported as `false`, never as errors; the session
/// captures the detail in its logs and its [`AuthState`].
#[async_trait]
pub trait Authenticatable: Send {
    /// Log in. Re-entrant: calling while already authenticated is a
    /// no-op success.
    async fn login(&mut self) -> bool;

    fn is_authenticated(&self) -> bool;

    /// Release all browser resources. Idempotent.
    async fn close(&mut self);
}

/// Capability to drive the session's page.
#[async_trait]
pub trait Navigable: Send {
    /// Navigate the current page. Returns false when no page is open or
    /// navigation fails.
    async fn goto(&mut self, url: &str) -> bool;

    async fn current_url(&mut self) -> Option<String>;

    /// Raw markup of the current page, `None` when no page is open.
    async fn page_content(&mut self) -> Option<String>;

    /// Wait out a settle interval for asynchronous rendering.
    async fn settle(&mut self, wait: Duration) {
        tokio::time::sleep(wait).await;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;

    /// In-memory session for exercising launcher and scraper flows
    /// without a browser.
    #[derive(Default)]
    pub struct MockSession {
        pub authenticated: bool,
        pub login_ok: bool,
        pub refuse_navigation: bool,
        pub pages: HashMap<String, String>,
        pub current: Option<String>,
        pub visited: Vec<String>,
    }

    impl MockSession {
        pub fn logged_in() -> Self {
            Self {
                authenticated: true,
                login_ok: true,
                ..Self::default()
            }
        }

        pub fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }
    }

    #[async_trait]
    impl Authenticatable for MockSession {
        async fn login(&mut self) -> bool {
            if self.login_ok {
                self.authenticated = true;
            }
            self.login_ok
        }

        fn is_authenticated(&self) -> bool {
            self.authenticated
        }

        async fn close(&mut self) {
            self.authenticated = false;
        }
    }

    #[test]
    fn test_mock_session_tracks_navigation() {
        tokio_test::block_on(async {
            let mut session = MockSession::logged_in().with_page("https://a", "<p>hi</p>");
            assert!(session.goto("https://a").await);
            assert_eq!(session.current_url().await.as_deref(), Some("https://a"));
            assert_eq!(session.page_content().await.as_deref(), Some("<p>hi</p>"));
            session.close().await;
            assert!(!session.is_authenticated());
        });
    }

    #[async_trait]
    impl Navigable for MockSession {
        async fn goto(&mut self, url: &str) -> bool {
            if self.refuse_navigation {
                return false;
            }
            self.visited.push(url.to_string());
            self.current = Some(url.to_string());
            true
        }

        async fn current_url(&mut self) -> Option<String> {
            self.current.clone()
        }

        async fn page_content(&mut self) -> Option<String> {
            self.current.as_ref().and_then(|u| self.pages.get(u).cloned())
        }

        async fn settle(&mut self, _wait: Duration) {}
    }
}

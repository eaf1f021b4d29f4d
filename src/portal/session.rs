use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use tokio::time::{sleep, Instant};

use crate::app::{Result, StudyPilotError};
use crate::portal::{Authenticatable, Credentials, Navigable, PortalConfig};

/// Authentication state of a portal session.
///
/// `Authenticated` only returns to `Unauthenticated` through an
/// explicit [`PortalSession::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Failed,
}

/// One authenticated browser automation context bound to one portal
/// login.
///
/// Owns the Chrome process, its event handler task, and a single page.
/// Sessions are single-caller and single-threaded: operations execute
/// strictly in call order, suspending at browser round-trips. Callers
/// wanting parallelism run one session per scraper.
///
/// Failure policy (matching the rest of the scraping core): every
/// automation fault is captured here and reported as `false` or an
/// empty value, never as an error to the caller.
pub struct PortalSession {
    config: PortalConfig,
    credentials: Credentials,
    browser: Option<Browser>,
    handler_task: Option<tokio::task::JoinHandle<()>>,
    page: Option<Page>,
    state: AuthState,
}

impl PortalSession {
    pub fn new(config: PortalConfig, credentials: Credentials) -> Self {
        Self {
            config,
            credentials,
            browser: None,
            handler_task: None,
            page: None,
            state: AuthState::Unauthenticated,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Log in to the identity portal.
    ///
    /// Re-entrant: a no-op success while already authenticated. Missing
    /// login form fields are a hard failure with no retry. When neither
    /// a success marker nor an error element can be found after
    /// submission, the ambiguous outcome is treated as success — an
    /// availability-over-precision policy carried over deliberately; do
    /// not strengthen it without revisiting the callers.
    pub async fn login(&mut self) -> bool {
        if self.state == AuthState::Authenticated {
            return true;
        }

        self.state = AuthState::Authenticating;
        match self.login_flow().await {
            Ok(true) => {
                self.state = AuthState::Authenticated;
                true
            }
            Ok(false) => {
                self.state = AuthState::Failed;
                false
            }
            Err(e) => {
                tracing::error!("portal login failed: {e}");
                self.state = AuthState::Failed;
                false
            }
        }
    }

    async fn login_flow(&mut self) -> Result<bool> {
        self.launch_browser().await?;
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| StudyPilotError::Session("no page after browser launch".into()))?;

        page.goto(self.config.login_url.as_str()).await?;
        sleep(self.config.settle()).await;

        let interval = self.config.poll_interval();
        let field_timeout = self.config.field_timeout();

        let username_field =
            poll_first(page, &self.config.username_selectors, field_timeout, interval).await;
        let password_field =
            poll_first(page, &self.config.password_selectors, field_timeout, interval).await;

        let (Some(username_field), Some(password_field)) = (username_field, password_field) else {
            tracing::error!("could not locate login form fields");
            return Ok(false);
        };

        username_field.click().await?;
        username_field.type_str(&self.credentials.username).await?;
        password_field.click().await?;
        password_field.type_str(&self.credentials.password).await?;

        // Some districts submit on autofill; a missing control is
        // skipped rather than treated as fatal.
        match find_first(page, &self.config.submit_selectors).await {
            Some(submit) => {
                submit.click().await?;
            }
            None => {
                tracing::warn!("no submit control matched, skipping submission");
            }
        }

        // Poll the URL for a positive success marker up to the outcome
        // deadline.
        let deadline = Instant::now() + self.config.outcome_timeout();
        loop {
            if let Ok(Some(url)) = page.url().await {
                if self.config.success_markers.iter().any(|m| url.contains(m.as_str())) {
                    tracing::info!(%url, "logged into portal");
                    return Ok(true);
                }
            }
            if Instant::now() >= deadline {
                break;
            }
            sleep(interval).await;
        }

        // No success marker. Probe for an error element before falling
        // back to the optimistic default.
        if let Some(error_element) = find_first(page, &self.config.error_selectors).await {
            let detail = error_element
                .inner_text()
                .await
                .ok()
                .flatten()
                .unwrap_or_default();
            tracing::error!(detail = %detail.trim(), "portal rejected login");
            return Ok(false);
        }

        tracing::warn!("login status uncertain, continuing anyway");
        Ok(true)
    }

    async fn launch_browser(&mut self) -> Result<()> {
        if self.browser.is_some() {
            return Ok(());
        }

        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .request_timeout(self.config.action_timeout());

        if !self.config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder.build().map_err(StudyPilotError::Session)?;

        let (browser, mut handler) = Browser::launch(browser_config).await?;

        let handler_task = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {
                // Drain browser events
            }
        });

        let page = browser.new_page("about:blank").await?;

        self.browser = Some(browser);
        self.handler_task = Some(handler_task);
        self.page = Some(page);
        Ok(())
    }

    /// Raw markup of the current page, for diagnostics only.
    pub async fn page_content(&self) -> Option<String> {
        match &self.page {
            Some(page) => page.content().await.ok(),
            None => None,
        }
    }

    /// Release the browser and reset to `Unauthenticated`. Safe to call
    /// on a closed or never-opened session.
    pub async fn close(&mut self) {
        self.page = None;
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                tracing::warn!("error closing browser: {e}");
            }
            if let Some(Err(e)) = browser.kill().await {
                tracing::warn!("error killing browser process: {e}");
            }
        }
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
        if self.state != AuthState::Unauthenticated {
            tracing::info!("portal session closed");
        }
        self.state = AuthState::Unauthenticated;
    }
}

// A caller abandoning a session mid-flight must not leak the Chrome
// process; kill it from here when close() was never reached.
impl Drop for PortalSession {
    fn drop(&mut self) {
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
        if let Some(mut browser) = self.browser.take() {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    let _ = browser.close().await;
                    let _ = browser.kill().await;
                });
            }
        }
    }
}

#[async_trait]
impl Authenticatable for PortalSession {
    async fn login(&mut self) -> bool {
        PortalSession::login(self).await
    }

    fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    async fn close(&mut self) {
        PortalSession::close(self).await;
    }
}

#[async_trait]
impl Navigable for PortalSession {
    async fn goto(&mut self, url: &str) -> bool {
        let Some(page) = &self.page else {
            return false;
        };
        match page.goto(url).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(%url, "navigation failed: {e}");
                false
            }
        }
    }

    async fn current_url(&mut self) -> Option<String> {
        match &self.page {
            Some(page) => page.url().await.ok().flatten(),
            None => None,
        }
    }

    async fn page_content(&mut self) -> Option<String> {
        PortalSession::page_content(self).await
    }
}

/// First element matching any of the candidate selectors, in candidate
/// priority order, queried once.
async fn find_first(page: &Page, selectors: &[String]) -> Option<Element> {
    for selector in selectors {
        if let Ok(element) = page.find_element(selector.as_str()).await {
            return Some(element);
        }
    }
    None
}

/// Bounded-retry variant of [`find_first`]: polls until an element
/// appears or the deadline passes.
async fn poll_first(
    page: &Page,
    selectors: &[String],
    timeout: Duration,
    interval: Duration,
) -> Option<Element> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(element) = find_first(page, selectors).await {
            return Some(element);
        }
        if Instant::now() >= deadline {
            return None;
        }
        sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> PortalSession {
        PortalSession::new(PortalConfig::default(), Credentials::default())
    }

    #[tokio::test]
    async fn test_new_session_unauthenticated() {
        let s = session();
        assert_eq!(s.state(), AuthState::Unauthenticated);
        assert!(!s.is_authenticated());
    }

    #[tokio::test]
    async fn test_close_never_opened_is_noop() {
        let mut s = session();
        s.close().await;
        assert_eq!(s.state(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_double_close_is_noop() {
        let mut s = session();
        s.close().await;
        s.close().await;
        assert_eq!(s.state(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_page_content_without_page() {
        let s = session();
        assert!(s.page_content().await.is_none());
    }

    #[tokio::test]
    async fn test_goto_without_page_fails_closed() {
        let mut s = session();
        assert!(!Navigable::goto(&mut s, "https://example.com").await);
        assert!(Navigable::current_url(&mut s).await.is_none());
    }
}

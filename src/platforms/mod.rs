//! Per-platform scrapers built on an authenticated portal session.
//!
//! Every platform variant is the same machine with different knobs: a
//! [`PlatformProfile`] names the application to launch, the markers that
//! confirm arrival, and the extraction strategy chain to mine records
//! with. The engine composes a session (any `Authenticatable +
//! Navigable` value) with an [`ApplicationLauncher`] instead of
//! inheriting session internals.

pub mod edpuzzle;
pub mod mcgraw_hill;

pub use edpuzzle::EdpuzzleScraper;
pub use mcgraw_hill::McGrawHillScraper;

use crate::domain::{AssignmentRecord, Platform};
use crate::extract::{run_chain, ExtractionStrategy};
use crate::portal::{ApplicationLauncher, Authenticatable, Navigable, PortalConfig};

/// Everything that distinguishes one platform from another.
#[derive(Debug, Clone)]
pub struct PlatformProfile {
    pub platform: Platform,
    /// Substring passed to the launcher to find the app in the portal
    /// directory.
    pub launch_query: String,
    /// URL substrings confirming arrival on the platform.
    pub url_markers: Vec<String>,
    /// Page-content keywords used when the URL check fails.
    pub content_keywords: Vec<String>,
    /// Extraction tiers, highest priority first.
    pub strategies: Vec<ExtractionStrategy>,
    /// Whether records are de-duplicated by title regardless of tier.
    pub dedupe_titles: bool,
}

/// Shared scraping engine over one session and one platform profile.
pub struct PlatformScraper<S> {
    session: S,
    launcher: ApplicationLauncher,
    config: PortalConfig,
    profile: PlatformProfile,
    loaded: bool,
}

impl<S> PlatformScraper<S>
where
    S: Authenticatable + Navigable,
{
    pub fn new(session: S, config: PortalConfig, profile: PlatformProfile) -> Self {
        let launcher = ApplicationLauncher::new(config.clone());
        Self {
            session,
            launcher,
            config,
            profile,
            loaded: false,
        }
    }

    pub fn platform(&self) -> Platform {
        self.profile.platform
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Navigate to the platform through the portal and confirm arrival.
    ///
    /// Arrival is confirmed by a URL marker substring or, failing that,
    /// by platform keywords in the page content (case-insensitive).
    /// Returns false and leaves the scraper unloaded when the launch
    /// fails or neither signal matches; dependent calls then fail
    /// closed.
    pub async fn ensure_loaded(&mut self) -> bool {
        if self.loaded {
            return true;
        }

        if !self
            .launcher
            .launch(&mut self.session, &self.profile.launch_query)
            .await
        {
            return false;
        }
        self.session.settle(self.config.app_settle()).await;

        if let Some(url) = self.session.current_url().await {
            if self
                .profile
                .url_markers
                .iter()
                .any(|marker| url.contains(marker.as_str()))
            {
                tracing::info!(platform = %self.profile.platform, %url, "platform loaded");
                self.loaded = true;
                return true;
            }
        }

        if let Some(content) = self.session.page_content().await {
            let content = content.to_lowercase();
            if self
                .profile
                .content_keywords
                .iter()
                .any(|kw| content.contains(kw.as_str()))
            {
                tracing::info!(platform = %self.profile.platform, "platform detected by page content");
                self.loaded = true;
                return true;
            }
        }

        tracing::warn!(platform = %self.profile.platform, "could not confirm platform loaded");
        false
    }

    /// Mine assignment records from the platform's current page.
    ///
    /// Absence of data is the contract, not failure: a failed load or an
    /// exhausted strategy chain both yield an empty vec.
    pub async fn fetch_records(&mut self) -> Vec<AssignmentRecord> {
        if !self.ensure_loaded().await {
            return Vec::new();
        }

        self.session.settle(self.config.records_settle()).await;

        let Some(html) = self.session.page_content().await else {
            return Vec::new();
        };

        let records = run_chain(
            &html,
            &self.profile.strategies,
            self.profile.platform,
            self.profile.dedupe_titles,
        );
        tracing::info!(
            platform = %self.profile.platform,
            count = records.len(),
            "extracted records"
        );
        records
    }

    /// Navigate to a record's link, matched by case-insensitive title
    /// substring.
    ///
    /// Unverified: success means navigation completed, nothing more. The
    /// downstream side effect (starting the assignment, opening the
    /// player) is not confirmed.
    pub async fn open_record_unverified(&mut self, title: &str) -> bool {
        let records = self.fetch_records().await;
        let query = title.to_lowercase();
        let target = records
            .iter()
            .find(|r| r.title.to_lowercase().contains(&query));

        match target.and_then(|r| r.link.clone()) {
            Some(link) => {
                if !self.session.goto(&link).await {
                    return false;
                }
                self.session.settle(self.config.records_settle()).await;
                tracing::info!(platform = %self.profile.platform, title, "opened record");
                true
            }
            None => {
                tracing::warn!(platform = %self.profile.platform, title, "record not found");
                false
            }
        }
    }

    /// Current page markup for platform-specific follow-up extraction.
    pub async fn page_html(&mut self) -> Option<String> {
        self.session.page_content().await
    }

    pub async fn close(&mut self) {
        self.session.close().await;
        self.loaded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::testing::MockSession;

    const DIRECTORY_URL: &str = "https://clever.com/applications";

    fn profile() -> PlatformProfile {
        PlatformProfile {
            platform: Platform::McGrawHill,
            launch_query: "mcgraw hill".into(),
            url_markers: vec!["mheducation.com".into()],
            content_keywords: vec!["mcgraw".into()],
            strategies: vec![ExtractionStrategy::FallbackTableRows {
                status_placeholder: Some("Assigned".into()),
            }],
            dedupe_titles: true,
        }
    }

    fn directory() -> String {
        r#"<div class="app-card"><h3>McGraw Hill</h3><a href="https://x/mh"></a></div>"#.into()
    }

    #[tokio::test]
    async fn test_fetch_records_empty_when_load_fails() {
        // Directory lacks the platform: launch fails, loaded stays
        // false, fetch yields nothing.
        let session = MockSession::logged_in().with_page(DIRECTORY_URL, "<p>no apps</p>");
        let mut scraper = PlatformScraper::new(session, PortalConfig::default(), profile());

        assert!(!scraper.ensure_loaded().await);
        assert!(scraper.fetch_records().await.is_empty());
        assert!(!scraper.is_loaded());
    }

    #[tokio::test]
    async fn test_load_confirmed_by_url_marker() {
        let html = r#"<div class="app-card"><h3>McGraw Hill</h3><a href="https://connected.mheducation.com/home"></a></div>"#;
        let session = MockSession::logged_in().with_page(DIRECTORY_URL, html);
        let mut scraper = PlatformScraper::new(session, PortalConfig::default(), profile());

        assert!(scraper.ensure_loaded().await);
        assert!(scraper.is_loaded());
    }

    #[tokio::test]
    async fn test_load_confirmed_by_content_keyword() {
        // URL has no marker; page content carries the platform name.
        let session = MockSession::logged_in()
            .with_page(DIRECTORY_URL, &directory())
            .with_page("https://x/mh", "<title>McGraw Hill Connected</title>");
        let mut scraper = PlatformScraper::new(session, PortalConfig::default(), profile());

        assert!(scraper.ensure_loaded().await);
    }

    #[tokio::test]
    async fn test_load_unconfirmed_fails_closed() {
        // Launch lands somewhere unrecognizable.
        let session = MockSession::logged_in()
            .with_page(DIRECTORY_URL, &directory())
            .with_page("https://x/mh", "<p>generic landing</p>");
        let mut scraper = PlatformScraper::new(session, PortalConfig::default(), profile());

        assert!(!scraper.ensure_loaded().await);
        assert!(scraper.fetch_records().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_records_runs_chain_on_platform_page() {
        let page = r#"
            <title>mcgraw hill</title>
            <table>
              <tr><td>Title</td><td>Due</td></tr>
              <tr><td>Quiz 1</td><td>Mon</td></tr>
              <tr><td>Quiz 1</td><td>Mon</td></tr>
            </table>"#;
        let session = MockSession::logged_in()
            .with_page(DIRECTORY_URL, &directory())
            .with_page("https://x/mh", page);
        let mut scraper = PlatformScraper::new(session, PortalConfig::default(), profile());

        let records = scraper.fetch_records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Quiz 1");
        assert_eq!(records[0].platform, Platform::McGrawHill);
    }

    #[tokio::test]
    async fn test_open_record_unverified_navigates() {
        let page = r#"
            <title>mcgraw hill</title>
            <table><tr><td><a href="https://x/mh/quiz1">Quiz 1</a></td><td>Mon</td></tr></table>"#;
        let session = MockSession::logged_in()
            .with_page(DIRECTORY_URL, &directory())
            .with_page("https://x/mh", page);
        let mut scraper = PlatformScraper::new(session, PortalConfig::default(), profile());

        assert!(scraper.open_record_unverified("quiz").await);
        assert_eq!(
            scraper.session().current.as_deref(),
            Some("https://x/mh/quiz1")
        );
        assert!(!scraper.open_record_unverified("missing").await);
    }

    #[tokio::test]
    async fn test_close_resets_loaded() {
        let session = MockSession::logged_in()
            .with_page(DIRECTORY_URL, &directory())
            .with_page("https://x/mh", "<title>mcgraw</title>");
        let mut scraper = PlatformScraper::new(session, PortalConfig::default(), profile());

        assert!(scraper.ensure_loaded().await);
        scraper.close().await;
        assert!(!scraper.is_loaded());
        assert!(!scraper.session().authenticated);
    }
}

//! Edpuzzle: video assignments reached through the portal.

use scraper::{ElementRef, Html, Selector};

use crate::domain::{AssignmentRecord, Platform, ProgressEntry};
use crate::extract::{parse_selector, ExtractionStrategy, SelectorSet};
use crate::platforms::{PlatformProfile, PlatformScraper};
use crate::portal::{Authenticatable, Navigable, PortalConfig, PortalSession};

pub fn profile() -> PlatformProfile {
    PlatformProfile {
        platform: Platform::Edpuzzle,
        launch_query: "edpuzzle".into(),
        url_markers: vec!["edpuzzle.com".into()],
        content_keywords: vec!["edpuzzle".into()],
        strategies: vec![
            ExtractionStrategy::PrimarySelectors(SelectorSet {
                containers: vec![
                    ".assignment-item".into(),
                    ".video-assignment".into(),
                    "[class*=\"assignment\"]".into(),
                    ".media-assignment".into(),
                    ".task-item".into(),
                ],
                title: ".video-title, .title, h3, h4, [class*=\"title\"]".into(),
                teacher: Some(".teacher-name, .instructor, [class*=\"teacher\"]".into()),
                due_date: Some(".due-date, .date, [class*=\"due\"]".into()),
                status: Some(".progress, .completion, [class*=\"progress\"]".into()),
                questions: Some(".questions, .questions-count, [class*=\"question\"]".into()),
                status_placeholder: Some("Not Started".into()),
            }),
            ExtractionStrategy::FallbackMediaTiles {
                containers: ".video-thumbnail, [class*=\"video\"], .media-item".into(),
                title: ".title, h3, h4, [class*=\"title\"]".into(),
                status_placeholder: Some("Unknown".into()),
            },
        ],
        dedupe_titles: false,
    }
}

/// Scraper for Edpuzzle video assignments.
pub struct EdpuzzleScraper<S = PortalSession> {
    inner: PlatformScraper<S>,
}

impl<S> EdpuzzleScraper<S>
where
    S: Authenticatable + Navigable,
{
    pub fn new(session: S, config: PortalConfig) -> Self {
        Self {
            inner: PlatformScraper::new(session, config, profile()),
        }
    }

    pub async fn video_assignments(&mut self) -> Vec<AssignmentRecord> {
        self.inner.fetch_records().await
    }

    /// Progress readings from whatever progress widgets the current
    /// page exposes.
    pub async fn video_progress(&mut self) -> Vec<ProgressEntry> {
        if !self.inner.ensure_loaded().await {
            return Vec::new();
        }
        match self.inner.page_html().await {
            Some(html) => extract_progress(&html),
            None => Vec::new(),
        }
    }

    /// Open a video assignment's player. Unverified: reports success
    /// once navigation completes, without confirming playback started.
    pub async fn watch_unverified(&mut self, title: &str) -> bool {
        self.inner.open_record_unverified(title).await
    }

    /// Placeholder for answering embedded questions. Navigates to the
    /// assignment and reports success; actually detecting and filling
    /// the question interface is not implemented.
    pub async fn answer_questions_unverified(
        &mut self,
        title: &str,
        answers: &serde_json::Value,
    ) -> bool {
        if !self.watch_unverified(title).await {
            return false;
        }
        tracing::info!(
            title,
            answer_count = answers.as_object().map(|m| m.len()).unwrap_or(0),
            "answer submission requested (unverified)"
        );
        true
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.is_loaded()
    }

    pub fn session(&self) -> &S {
        self.inner.session()
    }

    pub async fn close(&mut self) {
        self.inner.close().await;
    }
}

const PROGRESS_SELECTORS: &str =
    ".progress-bar, .completion-status, [class*=\"progress\"], [class*=\"completion\"]";
const PROGRESS_CONTEXT: &str = ".assignment, .video-item";
const PROGRESS_TITLE: &str = ".title, h3, h4";

/// Pair each progress widget with the title of its enclosing
/// assignment. Widgets without a titled context are skipped.
pub(crate) fn extract_progress(html: &str) -> Vec<ProgressEntry> {
    let doc = Html::parse_document(html);
    let (Some(widgets), Some(context), Some(title_sel)) = (
        parse_selector(PROGRESS_SELECTORS),
        parse_selector(PROGRESS_CONTEXT),
        parse_selector(PROGRESS_TITLE),
    ) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for widget in doc.select(&widgets) {
        let Some(container) = enclosing_context(widget, &context) else {
            continue;
        };
        let Some(title) = container
            .select(&title_sel)
            .next()
            .map(crate::extract::text_content)
            .filter(|t| !t.is_empty())
        else {
            continue;
        };

        let progress = {
            let text = crate::extract::text_content(widget);
            if !text.is_empty() {
                text
            } else {
                widget
                    .value()
                    .attr("aria-valuenow")
                    .unwrap_or("0")
                    .to_string()
            }
        };

        entries.push(ProgressEntry { title, progress });
    }
    entries
}

/// Nearest ancestor matching the context selector, falling back to the
/// direct parent element.
fn enclosing_context<'a>(el: ElementRef<'a>, context: &Selector) -> Option<ElementRef<'a>> {
    let mut parent = None;
    for node in el.ancestors() {
        if let Some(ancestor) = ElementRef::wrap(node) {
            if parent.is_none() {
                parent = Some(ancestor);
            }
            if context.matches(&ancestor) {
                return Some(ancestor);
            }
        }
    }
    parent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::testing::MockSession;

    const DIRECTORY_URL: &str = "https://clever.com/applications";

    fn session_on_edpuzzle(page: &str) -> MockSession {
        MockSession::logged_in()
            .with_page(
                DIRECTORY_URL,
                r#"<div class="app-card"><h3>Edpuzzle</h3><a href="https://edpuzzle.com/home"></a></div>"#,
            )
            .with_page("https://edpuzzle.com/home", page)
    }

    #[tokio::test]
    async fn test_video_assignments_primary_tier() {
        let page = r#"
            <div class="assignment-item">
              <h3 class="video-title">Mitosis</h3>
              <span class="teacher-name">Mr. Okafor</span>
              <span class="questions-count">8 questions</span>
              <a href="https://edpuzzle.com/v/1">open</a>
            </div>"#;
        let mut scraper =
            EdpuzzleScraper::new(session_on_edpuzzle(page), PortalConfig::default());

        let records = scraper.video_assignments().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Mitosis");
        assert_eq!(records[0].teacher.as_deref(), Some("Mr. Okafor"));
        assert_eq!(records[0].questions.as_deref(), Some("8 questions"));
        assert_eq!(records[0].status.as_deref(), Some("Not Started"));
        assert_eq!(records[0].platform, Platform::Edpuzzle);
    }

    #[tokio::test]
    async fn test_video_assignments_fallback_tiles() {
        let page = r#"
            <div class="media-item"><h4>Weather Systems</h4><a href="/v/2">w</a></div>"#;
        let mut scraper =
            EdpuzzleScraper::new(session_on_edpuzzle(page), PortalConfig::default());

        let records = scraper.video_assignments().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Weather Systems");
        assert_eq!(records[0].status.as_deref(), Some("Unknown"));
    }

    #[tokio::test]
    async fn test_failed_load_yields_empty_everywhere() {
        let mut session = MockSession::logged_in();
        session
            .pages
            .insert(DIRECTORY_URL.into(), "<p>empty directory</p>".into());
        let mut scraper = EdpuzzleScraper::new(session, PortalConfig::default());

        assert!(scraper.video_assignments().await.is_empty());
        assert!(scraper.video_progress().await.is_empty());
        assert!(!scraper.watch_unverified("anything").await);
    }

    #[tokio::test]
    async fn test_answer_questions_unverified_requires_record() {
        let page = r#"
            <div class="assignment-item">
              <h3>Mitosis</h3>
              <a href="https://edpuzzle.com/v/1">open</a>
            </div>"#;
        let mut scraper =
            EdpuzzleScraper::new(session_on_edpuzzle(page), PortalConfig::default());

        let answers = serde_json::json!({"q1": "b"});
        assert!(scraper.answer_questions_unverified("mitosis", &answers).await);
    }

    #[test]
    fn test_extract_progress_pairs_widget_with_title() {
        let html = r#"
            <div class="assignment">
              <h3>Mitosis</h3>
              <div class="progress-bar">45%</div>
            </div>
            <div class="assignment">
              <h3>Meiosis</h3>
              <div class="progress-bar" aria-valuenow="10"></div>
            </div>"#;
        let entries = extract_progress(html);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Mitosis");
        assert_eq!(entries[0].progress, "45%");
        assert_eq!(entries[1].progress, "10");
    }

    #[test]
    fn test_extract_progress_skips_untitled_context() {
        let html = r#"<div><div class="progress-bar">45%</div></div>"#;
        assert!(extract_progress(html).is_empty());
    }
}

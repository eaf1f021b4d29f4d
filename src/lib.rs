//! # studypilot
//!
//! Aggregates coursework from educational platforms reached through a
//! single-sign-on portal and offers AI study guidance derived from it.
//!
//! ## Architecture
//!
//! ```text
//! PortalSession → ApplicationLauncher → PlatformScraper → records → Advisor
//! ```
//!
//! The hard part is the scraping core: one authenticated headless
//! browser session is reused to reach multiple applications embedded
//! behind the portal, each with an unstable DOM that is mined
//! heuristically through layered extraction strategies. Extraction is
//! best-effort by design: a page that matches no heuristic yields an
//! empty result, never a fault.

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires together configuration,
/// credentials and the guidance oracle.
pub mod app;

/// Study guidance oracle.
///
/// - [`Advisor`](advisor::Advisor): chat-completions client with static
///   fallbacks tagged `AI_UNAVAILABLE`
pub mod advisor;

/// Command-line interface using clap.
///
/// - `apps` - list portal applications
/// - `assignments <platform>` - scrape assignments
/// - `materials` / `progress` - platform extras
/// - `guide` / `question` / `notes` - study guidance
/// - `check` - credential and service availability
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/studypilot/config.toml`; credentials come from
/// the environment only.
pub mod config;

/// Core domain models.
///
/// - [`AssignmentRecord`](domain::AssignmentRecord): normalized scrape output
/// - [`ApplicationDescriptor`](domain::ApplicationDescriptor): portal directory entry
/// - [`Platform`](domain::Platform): record provenance tag
pub mod domain;

/// Layered DOM extraction strategies.
///
/// - [`ExtractionStrategy`](extract::ExtractionStrategy): one heuristic tier
/// - [`run_chain`](extract::run_chain): first-non-empty-tier-wins evaluation
pub mod extract;

/// Per-platform scrapers composed over a portal session.
///
/// - [`EdpuzzleScraper`](platforms::EdpuzzleScraper): video assignments
/// - [`McGrawHillScraper`](platforms::McGrawHillScraper): coursework and materials
pub mod platforms;

/// Portal session and application launching.
///
/// - [`PortalSession`](portal::PortalSession): one browser, one login
/// - [`ApplicationLauncher`](portal::ApplicationLauncher): directory scrape + launch
/// - [`Authenticatable`](portal::Authenticatable) / [`Navigable`](portal::Navigable):
///   capability seams the scrapers compose over
pub mod portal;

/// Display helpers for scraped data (due dates, time remaining).
pub mod util;

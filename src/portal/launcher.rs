use scraper::Html;

use crate::domain::ApplicationDescriptor;
use crate::extract::{parse_selector, select_text, text_content};
use crate::portal::{Authenticatable, Navigable, PortalConfig};

/// Resolves named downstream applications through the portal's
/// application directory and navigates the session to them.
///
/// Stateless apart from its configuration; the directory is re-scraped
/// on every call because the portal recomputes it per login.
pub struct ApplicationLauncher {
    config: PortalConfig,
}

/// Tier 1: card-shaped containers with name, description, link, icon.
const CARD_CONTAINERS: &str = "[data-testid=\"app-card\"], .app-card, [class*=\"app\"], .application";
const CARD_NAME: &str = "h3, h4, .app-name, [class*=\"name\"], .title";
const CARD_DESCRIPTION: &str = "p, .app-description, [class*=\"description\"]";

/// Tier 2: generic tile/grid items, name and link only.
const TILE_CONTAINERS: &str = ".grid-item, .tile, .app-tile";

impl ApplicationLauncher {
    pub fn new(config: PortalConfig) -> Self {
        Self { config }
    }

    /// Scrape the portal directory for available applications.
    ///
    /// Logs in transparently when the session is not yet authenticated.
    /// Returns the applications in DOM document order; an empty list on
    /// any failure.
    pub async fn list_applications<S>(&self, session: &mut S) -> Vec<ApplicationDescriptor>
    where
        S: Authenticatable + Navigable,
    {
        if !session.is_authenticated() && !session.login().await {
            return Vec::new();
        }

        if !session.goto(&self.config.directory_url).await {
            return Vec::new();
        }
        session.settle(self.config.directory_settle()).await;

        let Some(html) = session.page_content().await else {
            return Vec::new();
        };

        let apps = extract_applications(&html);
        tracing::info!(count = apps.len(), "found portal applications");
        apps
    }

    /// Launch the first application whose name contains `name`
    /// (case-insensitive). First match in document order wins; there is
    /// no ranking among multiple matches.
    pub async fn launch<S>(&self, session: &mut S, name: &str) -> bool
    where
        S: Authenticatable + Navigable,
    {
        let apps = self.list_applications(session).await;
        let target = select_application(&apps, name);

        match target.and_then(|app| app.link.clone()) {
            Some(link) => {
                if !session.goto(&link).await {
                    tracing::warn!(app = name, "navigation to application failed");
                    return false;
                }
                session.settle(self.config.launch_settle()).await;
                tracing::info!(app = name, "launched application");
                true
            }
            None => {
                tracing::warn!(app = name, "application not found in portal directory");
                false
            }
        }
    }
}

/// Case-insensitive substring match over application names; first match
/// in document order.
pub(crate) fn select_application<'a>(
    apps: &'a [ApplicationDescriptor],
    query: &str,
) -> Option<&'a ApplicationDescriptor> {
    let query = query.to_lowercase();
    apps.iter().find(|app| app.name.to_lowercase().contains(&query))
}

/// Two-tier heuristic scan of the directory markup.
pub(crate) fn extract_applications(html: &str) -> Vec<ApplicationDescriptor> {
    let doc = Html::parse_document(html);
    let mut apps = Vec::new();

    if let Some(selector) = parse_selector(CARD_CONTAINERS) {
        for card in doc.select(&selector) {
            let Some(name) = select_text(card, CARD_NAME) else {
                continue;
            };
            let link_el = parse_selector("a").and_then(|s| card.select(&s).next());
            apps.push(ApplicationDescriptor {
                name,
                description: select_text(card, CARD_DESCRIPTION),
                link: link_el
                    .and_then(|a| a.value().attr("href"))
                    .map(String::from),
                icon: link_el
                    .and_then(|a| parse_selector("img").and_then(|s| a.select(&s).next()))
                    .and_then(|img| img.value().attr("src"))
                    .map(String::from),
            });
        }
    }

    // Tier 2 only when the card scan found nothing at all.
    if apps.is_empty() {
        if let (Some(tiles), Some(anchor)) = (parse_selector(TILE_CONTAINERS), parse_selector("a"))
        {
            for tile in doc.select(&tiles) {
                let Some(link) = tile.select(&anchor).next() else {
                    continue;
                };
                let mut name = text_content(link);
                if name.is_empty() {
                    name = link.value().attr("title").unwrap_or("").trim().to_string();
                }
                if name.is_empty() {
                    continue;
                }
                apps.push(ApplicationDescriptor {
                    name,
                    description: None,
                    link: link.value().attr("href").map(String::from),
                    icon: parse_selector("img")
                        .and_then(|s| link.select(&s).next())
                        .and_then(|img| img.value().attr("src"))
                        .map(String::from),
                });
            }
        }
    }

    apps
}

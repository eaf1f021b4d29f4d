//! Layered DOM extraction for unstable platform markup.
//!
//! Downstream platforms ship unversioned DOMs, so records are mined
//! heuristically: each scraper carries an ordered chain of
//! [`ExtractionStrategy`] tiers and the first tier yielding at least one
//! record wins. An empty result from every tier is not an error — it is
//! "no data available".

use scraper::{ElementRef, Html, Selector};

use crate::domain::{AssignmentRecord, Platform};

/// Selector candidates for the primary, platform-specific tier.
///
/// `containers` is a priority list: each entry is tried in order and the
/// first one producing any records stops the scan. The per-field
/// selectors are CSS selector lists resolved to the first match in
/// document order within a container.
#[derive(Debug, Clone)]
pub struct SelectorSet {
    pub containers: Vec<String>,
    pub title: String,
    pub teacher: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub questions: Option<String>,
    /// Status text used when no status element matches, e.g.
    /// "Not Started".
    pub status_placeholder: Option<String>,
}

/// One heuristic attempt at locating structured records in a page.
#[derive(Debug, Clone)]
pub enum ExtractionStrategy {
    /// Platform-specific container markup.
    PrimarySelectors(SelectorSet),
    /// Loose structural fallback: media/thumbnail tiles with little
    /// beyond a title.
    FallbackMediaTiles {
        containers: String,
        title: String,
        status_placeholder: Option<String>,
    },
    /// Loosest fallback: raw table rows with at least two cells, the
    /// first cell being the title unless it is a header label.
    FallbackTableRows { status_placeholder: Option<String> },
}

impl ExtractionStrategy {
    /// Tiers that can match the same DOM node more than once need their
    /// output de-duplicated by title.
    pub fn duplicate_prone(&self) -> bool {
        matches!(self, ExtractionStrategy::FallbackTableRows { .. })
    }

    pub fn run(&self, doc: &Html, platform: Platform) -> Vec<AssignmentRecord> {
        match self {
            ExtractionStrategy::PrimarySelectors(set) => run_primary(doc, set, platform),
            ExtractionStrategy::FallbackMediaTiles {
                containers,
                title,
                status_placeholder,
            } => run_media_tiles(doc, containers, title, status_placeholder.as_deref(), platform),
            ExtractionStrategy::FallbackTableRows { status_placeholder } => {
                run_table_rows(doc, status_placeholder.as_deref(), platform)
            }
        }
    }
}

/// Run a strategy chain against page markup.
///
/// Tiers are tried in order; the first non-empty result wins. Records
/// without a title never survive any tier. `dedupe_titles` forces title
/// de-duplication regardless of which tier fired (used by platforms
/// whose markup repeats entries); duplicate-prone tiers de-dupe
/// unconditionally. First occurrence wins, DOM document order is
/// preserved.
pub fn run_chain(
    html: &str,
    strategies: &[ExtractionStrategy],
    platform: Platform,
    dedupe_titles: bool,
) -> Vec<AssignmentRecord> {
    let doc = Html::parse_document(html);
    for strategy in strategies {
        let records = strategy.run(&doc, platform);
        if !records.is_empty() {
            if dedupe_titles || strategy.duplicate_prone() {
                return dedupe_by_title(records);
            }
            return records;
        }
    }
    Vec::new()
}

fn run_primary(doc: &Html, set: &SelectorSet, platform: Platform) -> Vec<AssignmentRecord> {
    let mut records = Vec::new();

    for container_selector in &set.containers {
        let Some(selector) = parse_selector(container_selector) else {
            continue;
        };

        for container in doc.select(&selector) {
            let Some(title) = select_text(container, &set.title) else {
                continue;
            };

            let status = set
                .status
                .as_deref()
                .and_then(|s| select_text(container, s))
                .or_else(|| set.status_placeholder.clone());

            records.push(AssignmentRecord {
                title,
                teacher: set.teacher.as_deref().and_then(|s| select_text(container, s)),
                due_date: set.due_date.as_deref().and_then(|s| select_text(container, s)),
                status,
                questions: set
                    .questions
                    .as_deref()
                    .and_then(|s| select_text(container, s)),
                link: select_link(container),
                platform,
            });
        }

        if !records.is_empty() {
            break;
        }
    }

    records
}

fn run_media_tiles(
    doc: &Html,
    containers: &str,
    title: &str,
    status_placeholder: Option<&str>,
    platform: Platform,
) -> Vec<AssignmentRecord> {
    let Some(selector) = parse_selector(containers) else {
        return Vec::new();
    };

    let mut records = Vec::new();
    for tile in doc.select(&selector) {
        let Some(title) = select_text(tile, title) else {
            continue;
        };
        let mut record = AssignmentRecord::new(title, platform);
        record.status = status_placeholder.map(String::from);
        record.link = select_link(tile);
        records.push(record);
    }
    records
}

/// Header labels excluded from the table-row tier when they appear as a
/// row's first cell.
const HEADER_LABELS: &[&str] = &["title", "name", "assignment"];

fn run_table_rows(
    doc: &Html,
    status_placeholder: Option<&str>,
    platform: Platform,
) -> Vec<AssignmentRecord> {
    let row_selector = Selector::parse("tr").expect("static selector");
    let cell_selector = Selector::parse("td").expect("static selector");

    let mut records = Vec::new();
    for row in doc.select(&row_selector) {
        let cells: Vec<ElementRef<'_>> = row.select(&cell_selector).collect();
        if cells.len() < 2 {
            continue;
        }

        let title = text_content(cells[0]);
        if title.is_empty() || is_header_label(&title) {
            continue;
        }

        let due = text_content(cells[1]);
        let mut record = AssignmentRecord::new(title, platform);
        record.due_date = (!due.is_empty()).then_some(due);
        record.status = status_placeholder.map(String::from);
        record.link = select_link(cells[0]);
        records.push(record);
    }
    records
}

fn is_header_label(text: &str) -> bool {
    HEADER_LABELS.iter().any(|label| text.eq_ignore_ascii_case(label))
}

fn dedupe_by_title(records: Vec<AssignmentRecord>) -> Vec<AssignmentRecord> {
    let mut seen = std::collections::HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.title.clone()))
        .collect()
}

pub(crate) fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!(%selector, "skipping unparseable selector: {e}");
            None
        }
    }
}

/// Whitespace-normalized text content of an element.
pub(crate) fn text_content(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Non-empty text of the first descendant matching `selector`, in
/// document order.
pub(crate) fn select_text(el: ElementRef<'_>, selector: &str) -> Option<String> {
    let sel = parse_selector(selector)?;
    let text = text_content(el.select(&sel).next()?);
    (!text.is_empty()).then_some(text)
}

/// First anchor href within an element.
pub(crate) fn select_link(el: ElementRef<'_>) -> Option<String> {
    let sel = Selector::parse("a[href]").expect("static selector");
    el.select(&sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(String::from)
}

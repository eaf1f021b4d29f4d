//! Core domain models shared by the portal scrapers and the CLI.

use serde::Serialize;

/// Which downstream platform produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Platform {
    Edpuzzle,
    McGrawHill,
}

impl Platform {
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Edpuzzle => "Edpuzzle",
            Platform::McGrawHill => "McGraw Hill",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A normalized assignment or material entry mined from a platform page.
///
/// The title is the only required field; every extraction tier drops
/// candidates without one. The remaining fields are raw page text,
/// unparsed, because the source markup carries no stable structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRecord {
    pub title: String,
    pub teacher: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub questions: Option<String>,
    pub link: Option<String>,
    pub platform: Platform,
}

impl AssignmentRecord {
    pub fn new(title: impl Into<String>, platform: Platform) -> Self {
        Self {
            title: title.into(),
            teacher: None,
            due_date: None,
            status: None,
            questions: None,
            link: None,
            platform,
        }
    }
}

/// An application discovered in the portal's directory page.
///
/// Ephemeral: recomputed on every directory scrape, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub icon: Option<String>,
}

impl ApplicationDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            link: None,
            icon: None,
        }
    }
}

/// A course material entry (chapters, lessons, resources).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialRecord {
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
}

/// A progress reading scraped from a platform's progress widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEntry {
    pub title: String,
    pub progress: String,
}

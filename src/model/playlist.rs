use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Destination playlist, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistHandle {
    /// Remote playlist identifier (uuid)
    pub id: String,

    /// Playlist title
    pub name: String,
}

impl PlaylistHandle {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Build the dated playlist title: "<prefix> DD.MM.YYYY"
    pub fn dated_name(prefix: &str, date: NaiveDate) -> String {
        format!("{} {}", prefix.trim(), date.format("%d.%m.%Y"))
    }
}

use serde::{Deserialize, Serialize};

/// A catalog track selected as the match for a stream title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRef {
    /// Catalog identifier, as expected by the playlist endpoints
    pub id: String,

    /// Track title as reported by the catalog
    pub title: String,

    /// Main artist name
    pub artist: String,
}

impl TrackRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// "Artist – Title", used for console and activity log messages
    pub fn display_name(&self) -> String {
        format!("{} – {}", self.artist, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let track = TrackRef::new("77640617", "Blinding Lights", "The Weeknd");
        assert_eq!(track.display_name(), "The Weeknd – Blinding Lights");
    }
}

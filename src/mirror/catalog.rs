use crate::error::ServiceError;
use crate::model::{PlaylistHandle, TrackRef};

/// Remote music catalog with playlist write access
pub trait Catalog {
    /// Free-text track search; returns the catalog's top hit, if any
    fn top_track(&mut self, query: &str) -> Result<Option<TrackRef>, ServiceError>;

    /// Append one track to the playlist
    fn add_track(&mut self, playlist: &PlaylistHandle, track: &TrackRef)
        -> Result<(), ServiceError>;
}

//! Data model shared by the stream, catalog and mirror layers
//!
//! These types are independent of the TIDAL wire format.

mod playlist;
mod track;

pub use playlist::PlaylistHandle;
pub use track::TrackRef;

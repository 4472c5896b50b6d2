//! Stream title to catalog track matching

use super::catalog::Catalog;
use crate::error::ServiceError;
use crate::model::TrackRef;

/// Look up the best catalog match for a raw stream title.
///
/// The catalog's own top hit is trusted as-is. Errors are not retried here.
pub fn find_track<C: Catalog + ?Sized>(
    catalog: &mut C,
    title: &str,
) -> Result<Option<TrackRef>, ServiceError> {
    let found = catalog.top_track(title)?;
    match &found {
        Some(track) => log::debug!("Matched '{}' to {} ({})", title, track.display_name(), track.id),
        None => log::debug!("No top hit for '{}'", title),
    }
    Ok(found)
}

//! Radio to TIDAL - mirror a radio stream's now-playing titles into a playlist
//!
//! The stream's `StreamTitle` tag is polled with ffprobe; every title not
//! seen before in the run is searched in the TIDAL catalog and the top hit
//! is appended to a dated playlist. Successful additions are written to a
//! plain text activity log.

pub mod activity;
pub mod config;
pub mod error;
pub mod mirror;
pub mod model;
pub mod stream;
pub mod tidal;

pub use activity::ActivityLog;
pub use config::Config;
pub use error::ServiceError;
pub use mirror::{Catalog, RadioWatcher, TickOutcome};
pub use stream::{FfprobeTitleReader, TitleSource};
pub use tidal::TidalClient;

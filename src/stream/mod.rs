//! Stream metadata layer
//!
//! The watcher only sees the `TitleSource` trait; `FfprobeTitleReader`
//! extracts the in-band `StreamTitle` tag by shelling out to ffprobe.

mod ffprobe;
mod traits;

pub use ffprobe::FfprobeTitleReader;
pub use traits::TitleSource;

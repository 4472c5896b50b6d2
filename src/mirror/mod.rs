//! Radio-to-playlist mirroring
//!
//! `RadioWatcher` polls a `TitleSource`, filters and deduplicates titles,
//! and mirrors each new one into a playlist through a `Catalog`.

mod catalog;
mod filter;
pub mod matcher;
pub mod mutator;
mod state;
mod watcher;

pub use catalog::Catalog;
pub use filter::TitleFilter;
pub use mutator::RetryPolicy;
pub use state::{DedupState, SeenTitles};
pub use watcher::{MirrorOutcome, PollTiming, RadioWatcher, TickOutcome};

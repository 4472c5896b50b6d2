//! The polling loop

use super::catalog::Catalog;
use super::filter::TitleFilter;
use super::matcher::find_track;
use super::mutator::{add_track, RetryPolicy};
use super::state::DedupState;
use crate::activity::ActivityLog;
use crate::model::{PlaylistHandle, TrackRef};
use crate::stream::TitleSource;
use anyhow::{Context, Result};
use std::thread;
use std::time::Duration;

/// Sleep intervals between polls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTiming {
    /// After a usable title, new or not
    pub interval: Duration,

    /// After a missing, blank or blocked title, to recover quickly from
    /// short metadata gaps
    pub idle_interval: Duration,
}

impl Default for PollTiming {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            idle_interval: Duration::from_secs(1),
        }
    }
}

impl PollTiming {
    pub fn delay_after(&self, outcome: &TickOutcome) -> Duration {
        match outcome {
            TickOutcome::NoTitle => self.idle_interval,
            TickOutcome::NewSong { .. } | TickOutcome::StillPlaying(_) => self.interval,
        }
    }
}

/// What happened to a newly detected title
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorOutcome {
    Added(TrackRef),
    NotFound,
}

/// Result of one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No usable title (timeout, blank or blocked)
    NoTitle,

    /// A title not processed before in this run
    NewSong { title: String, outcome: MirrorOutcome },

    /// Same song as before, or one already processed earlier in the run
    StillPlaying(String),
}

/// Watches a radio stream and mirrors new songs into a playlist
pub struct RadioWatcher<S: TitleSource, C: Catalog> {
    source: S,
    catalog: C,
    playlist: PlaylistHandle,
    activity: ActivityLog,
    filter: TitleFilter,
    state: DedupState,
    retry: RetryPolicy,
    timing: PollTiming,
}

impl<S: TitleSource, C: Catalog> RadioWatcher<S, C> {
    pub fn new(source: S, catalog: C, playlist: PlaylistHandle, activity: ActivityLog) -> Self {
        Self {
            source,
            catalog,
            playlist,
            activity,
            filter: TitleFilter::default(),
            state: DedupState::default(),
            retry: RetryPolicy::default(),
            timing: PollTiming::default(),
        }
    }

    pub fn with_filter(mut self, filter: TitleFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_state(mut self, state: DedupState) -> Self {
        self.state = state;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timing(mut self, timing: PollTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn state(&self) -> &DedupState {
        &self.state
    }

    /// Poll forever. Only returns when a poll fails.
    pub fn run(&mut self) -> Result<()> {
        log::info!("🎙 Watching the stream for playlist '{}'...", self.playlist.name);
        loop {
            let outcome = self.tick()?;
            thread::sleep(self.timing.delay_after(&outcome));
        }
    }

    /// One poll, without the trailing sleep.
    ///
    /// A new title is marked as processed even when mirroring it fails, so a
    /// failing title is never attempted twice in one run.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        let title = self.source.read_title()?;
        let Some(title) = self.filter.usable(title) else {
            log::debug!("No usable stream title");
            return Ok(TickOutcome::NoTitle);
        };

        if !self.state.is_new(&title) {
            log::info!("🔁 Still playing: {}", title);
            return Ok(TickOutcome::StillPlaying(title));
        }

        log::info!("🎶 New song detected: {}", title);
        let mirrored = self.mirror(&title);
        self.state.mark_processed(&title);

        Ok(TickOutcome::NewSong {
            outcome: mirrored?,
            title,
        })
    }

    fn mirror(&mut self, title: &str) -> Result<MirrorOutcome> {
        let track = find_track(&mut self.catalog, title)
            .with_context(|| format!("Catalog search failed for '{}'", title))?;
        let Some(track) = track else {
            log::info!("{} not found in the catalog", title);
            return Ok(MirrorOutcome::NotFound);
        };

        add_track(&mut self.catalog, &self.playlist, &track, &self.retry).with_context(|| {
            format!("Failed to add {} to '{}'", track.display_name(), self.playlist.name)
        })?;
        log::info!("✅ Added: {}", track.display_name());

        self.activity
            .record(&format!("Added: {}", track.display_name()))?;
        Ok(MirrorOutcome::Added(track))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_after() {
        let timing = PollTiming::default();
        assert_eq!(timing.delay_after(&TickOutcome::NoTitle), Duration::from_secs(1));
        assert_eq!(
            timing.delay_after(&TickOutcome::StillPlaying("x".into())),
            Duration::from_secs(30)
        );
        assert_eq!(
            timing.delay_after(&TickOutcome::NewSong {
                title: "x".into(),
                outcome: MirrorOutcome::NotFound
            }),
            Duration::from_secs(30)
        );
    }
}

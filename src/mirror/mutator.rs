//! Playlist append with a bounded retry

use super::catalog::Catalog;
use crate::error::ServiceError;
use crate::model::{PlaylistHandle, TrackRef};
use std::thread;
use std::time::Duration;

/// How often, and how patiently, a failed playlist append is repeated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one (at least 1)
    pub max_attempts: u32,

    /// Pause between attempts
    pub cooldown: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, cooldown: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            cooldown,
        }
    }

    /// Single attempt, no retry
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    /// One retry after three seconds
    fn default() -> Self {
        Self::new(2, Duration::from_secs(3))
    }
}

/// Append `track` to `playlist`, retrying any failure per `policy`.
///
/// The error kind is not inspected. The error of the last attempt is
/// returned when every attempt fails.
pub fn add_track<C: Catalog + ?Sized>(
    catalog: &mut C,
    playlist: &PlaylistHandle,
    track: &TrackRef,
    policy: &RetryPolicy,
) -> Result<(), ServiceError> {
    let mut attempt = 1;
    loop {
        match catalog.add_track(playlist, track) {
            Ok(()) => return Ok(()),
            Err(e) => {
                log::error!(
                    "🛑 ERROR: adding {} to '{}' failed (attempt {}/{}): {}",
                    track.display_name(),
                    playlist.name,
                    attempt,
                    policy.max_attempts,
                    e
                );
                if attempt >= policy.max_attempts {
                    return Err(e);
                }
            }
        }
        thread::sleep(policy.cooldown);
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Catalog whose add calls fail with the queued errors, then succeed
    struct FlakyCatalog {
        failures: VecDeque<ServiceError>,
        calls: usize,
    }

    impl FlakyCatalog {
        fn failing_with(failures: Vec<ServiceError>) -> Self {
            Self {
                failures: failures.into(),
                calls: 0,
            }
        }
    }

    impl Catalog for FlakyCatalog {
        fn top_track(&mut self, _query: &str) -> Result<Option<TrackRef>, ServiceError> {
            Ok(None)
        }

        fn add_track(&mut self, _: &PlaylistHandle, _: &TrackRef) -> Result<(), ServiceError> {
            self.calls += 1;
            match self.failures.pop_front() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
    }

    fn fixtures() -> (PlaylistHandle, TrackRef) {
        (
            PlaylistHandle::new("pl-1", "Radio 01.01.2024"),
            TrackRef::new("1", "Song", "Artist"),
        )
    }

    fn quick(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }

    fn server_error() -> ServiceError {
        ServiceError::Http {
            status: 503,
            body: "unavailable".into(),
        }
    }

    #[test]
    fn test_default_policy_retries_once() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.cooldown, Duration::from_secs(3));
    }

    #[test]
    fn test_max_attempts_is_at_least_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }

    #[test]
    fn test_success_first_try() {
        let (playlist, track) = fixtures();
        let mut catalog = FlakyCatalog::failing_with(vec![]);

        add_track(&mut catalog, &playlist, &track, &quick(2)).unwrap();
        assert_eq!(catalog.calls, 1);
    }

    #[test]
    fn test_retry_then_success() {
        let (playlist, track) = fixtures();
        let mut catalog = FlakyCatalog::failing_with(vec![server_error()]);

        add_track(&mut catalog, &playlist, &track, &quick(2)).unwrap();
        assert_eq!(catalog.calls, 2);
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let (playlist, track) = fixtures();
        let mut catalog =
            FlakyCatalog::failing_with(vec![server_error(), server_error(), server_error()]);

        let err = add_track(&mut catalog, &playlist, &track, &quick(2)).unwrap_err();
        assert!(matches!(err, ServiceError::Http { status: 503, .. }));
        assert_eq!(catalog.calls, 2);
    }

    #[test]
    fn test_any_error_kind_is_retried() {
        let (playlist, track) = fixtures();
        for first in [
            ServiceError::Transport("read timed out".into()),
            ServiceError::Decode("playlist response carried no ETag".into()),
            ServiceError::Unauthorized(401),
            ServiceError::Http {
                status: 404,
                body: String::new(),
            },
        ] {
            let mut catalog = FlakyCatalog::failing_with(vec![first]);

            add_track(&mut catalog, &playlist, &track, &quick(2)).unwrap();
            assert_eq!(catalog.calls, 2);
        }
    }

    #[test]
    fn test_last_error_is_returned() {
        let (playlist, track) = fixtures();
        let mut catalog = FlakyCatalog::failing_with(vec![
            server_error(),
            ServiceError::Unauthorized(403),
        ]);

        let err = add_track(&mut catalog, &playlist, &track, &quick(2)).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(403)));
        assert_eq!(catalog.calls, 2);
    }

    #[test]
    fn test_no_retry_policy() {
        let (playlist, track) = fixtures();
        let mut catalog = FlakyCatalog::failing_with(vec![server_error()]);

        assert!(add_track(&mut catalog, &playlist, &track, &RetryPolicy::none()).is_err());
        assert_eq!(catalog.calls, 1);
    }
}

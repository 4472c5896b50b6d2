//! Runtime configuration, loaded once from a YAML file

use crate::mirror::{PollTiming, RetryPolicy, SeenTitles, TitleFilter};
use crate::model::PlaylistHandle;
use crate::tidal::TidalSettings;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Radio stream probed for the current title
    pub stream_url: String,

    /// Stream titles that never denote a song (station name, ads, ...)
    #[serde(default)]
    pub invalid_titles: Vec<String>,

    /// Playlist name prefix; the start date is appended
    pub playlist_prefix: String,

    /// Description given to a newly created playlist
    #[serde(default = "default_playlist_description")]
    pub playlist_description: String,

    /// Activity log of added tracks; `~` is expanded
    pub log_path: String,

    /// ffprobe executable, looked up on PATH unless absolute
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    /// Where the login session is stored between runs; `~` is expanded
    #[serde(default = "default_session_path")]
    pub session_path: String,

    pub tidal: TidalSettings,

    #[serde(default)]
    pub poll: PollSettings,

    #[serde(default)]
    pub retry: RetrySettings,

    /// Forget the oldest seen titles beyond this many (unbounded if unset)
    #[serde(default)]
    pub max_seen_titles: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollSettings {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_idle_interval_secs")]
    pub idle_interval_secs: u64,
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            idle_interval_secs: default_idle_interval_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

fn default_playlist_description() -> String {
    "Auto-added from radio stream".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_session_path() -> String {
    "./tidal_session.json".to_string()
}

fn default_interval_secs() -> u64 {
    30
}

fn default_idle_interval_secs() -> u64 {
    1
}

fn default_probe_timeout_secs() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    2
}

fn default_cooldown_secs() -> u64 {
    3
}

impl Config {
    /// Read, parse and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config file: {:?}", path))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("stream_url", &self.stream_url),
            ("playlist_prefix", &self.playlist_prefix),
            ("log_path", &self.log_path),
            ("tidal.client_id", &self.tidal.client_id),
            ("tidal.client_secret", &self.tidal.client_secret),
        ] {
            if value.trim().is_empty() {
                bail!("'{}' must not be empty", key);
            }
        }
        if self.retry.max_attempts == 0 {
            bail!("'retry.max_attempts' must be at least 1");
        }
        if self.max_seen_titles == Some(0) {
            bail!("'max_seen_titles' must be at least 1 when set");
        }
        Ok(())
    }

    /// Title of the playlist for a run started on `date`
    pub fn playlist_name(&self, date: NaiveDate) -> String {
        PlaylistHandle::dated_name(&self.playlist_prefix, date)
    }

    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.log_path).as_ref())
    }

    pub fn session_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.session_path).as_ref())
    }

    pub fn ffprobe_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.ffprobe_path).as_ref())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.poll.probe_timeout_secs)
    }

    pub fn timing(&self) -> PollTiming {
        PollTiming {
            interval: Duration::from_secs(self.poll.interval_secs),
            idle_interval: Duration::from_secs(self.poll.idle_interval_secs),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_secs(self.retry.cooldown_secs),
        )
    }

    pub fn title_filter(&self) -> TitleFilter {
        TitleFilter::new(self.invalid_titles.iter().cloned())
    }

    pub fn seen_titles(&self) -> SeenTitles {
        match self.max_seen_titles {
            Some(capacity) => SeenTitles::with_capacity(capacity),
            None => SeenTitles::unbounded(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
stream_url: "https://stream.example/live.mp3"
invalid_titles:
  - "Radio Arabella"
  - "Werbung"
playlist_prefix: "Arabella"
log_path: "~/radio_added.log"
tidal:
  client_id: "id"
  client_secret: "secret"
"#;

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml(MINIMAL).unwrap();

        assert_eq!(config.ffprobe_path, "ffprobe");
        assert_eq!(config.session_path, "./tidal_session.json");
        assert_eq!(config.timing(), PollTiming::default());
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.probe_timeout(), Duration::from_secs(10));
        assert_eq!(config.max_seen_titles, None);
        assert_eq!(config.tidal.country_code, None);
    }

    #[test]
    fn test_blocked_titles() {
        let filter = Config::from_yaml(MINIMAL).unwrap().title_filter();
        assert_eq!(filter.usable(Some("Werbung".into())), None);
        assert!(filter.usable(Some("Song".into())).is_some());
    }

    #[test]
    fn test_playlist_name() {
        let config = Config::from_yaml(MINIMAL).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 11, 2).unwrap();
        assert_eq!(config.playlist_name(date), "Arabella 02.11.2024");
    }

    #[test]
    fn test_log_path_expands_home() {
        let config = Config::from_yaml(MINIMAL).unwrap();
        let path = config.log_path();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("radio_added.log"));
    }

    #[test]
    fn test_overrides() {
        let yaml = format!(
            "{}\nffprobe_path: /opt/ffmpeg/bin/ffprobe\npoll:\n  interval_secs: 20\nretry:\n  max_attempts: 4\n  cooldown_secs: 1\nmax_seen_titles: 500\n",
            MINIMAL
        );
        let config = Config::from_yaml(&yaml).unwrap();

        assert_eq!(config.ffprobe_path(), PathBuf::from("/opt/ffmpeg/bin/ffprobe"));
        assert_eq!(config.timing().interval, Duration::from_secs(20));
        assert_eq!(config.timing().idle_interval, Duration::from_secs(1));
        assert_eq!(config.retry_policy(), RetryPolicy::new(4, Duration::from_secs(1)));
        assert_eq!(config.max_seen_titles, Some(500));
    }

    #[test]
    fn test_missing_required_key() {
        let yaml = MINIMAL.replace("stream_url: \"https://stream.example/live.mp3\"\n", "");
        assert!(Config::from_yaml(&yaml).is_err());
    }

    #[test]
    fn test_blank_value_rejected() {
        let yaml = MINIMAL.replace("\"Arabella\"", "\"  \"");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains("playlist_prefix"));
    }

    #[test]
    fn test_blank_client_secret_rejected() {
        let yaml = MINIMAL.replace("client_secret: \"secret\"", "client_secret: \"\"");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains("tidal.client_secret"));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let yaml = format!("{}retry:\n  max_attempts: 0\n", MINIMAL);
        assert!(Config::from_yaml(&yaml).is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let err = Config::load(Path::new("/nonexistent/config.yaml")).unwrap_err();
        assert!(format!("{:#}", err).contains("config.yaml"));
    }
}

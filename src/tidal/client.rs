//! Blocking TIDAL API client

use super::auth;
use super::models::{ApiPlaylist, PlaylistPage, SearchResponse, SessionInfo, TokenResponse};
use super::session::StoredSession;
use super::TidalSettings;
use crate::error::ServiceError;
use crate::mirror::Catalog;
use crate::model::{PlaylistHandle, TrackRef};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://api.tidal.com/v1";
const DEFAULT_AUTH_BASE: &str = "https://auth.tidal.com/v1";
const PLAYLIST_PAGE_SIZE: usize = 50;
const SEARCH_LIMIT: &str = "10";

/// Logged-in TIDAL client.
///
/// Methods take `&mut self` because any call may refresh and persist an
/// expired access token first.
pub struct TidalClient {
    agent: ureq::Agent,
    api_base: String,
    auth_base: String,
    settings: TidalSettings,
    session: StoredSession,
    session_path: PathBuf,
}

impl TidalClient {
    /// Restore the session saved at `session_path`, or log in interactively
    /// when there is none or it is no longer valid.
    pub fn connect(settings: TidalSettings, session_path: PathBuf) -> Result<Self> {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(15))
            .timeout_write(Duration::from_secs(15))
            .build();
        let api_base = std::env::var("TIDAL_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into());
        let auth_base =
            std::env::var("TIDAL_AUTH_BASE").unwrap_or_else(|_| DEFAULT_AUTH_BASE.into());

        let restored = StoredSession::load(&session_path).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable session: {:#}", e);
            None
        });

        if let Some(session) = restored {
            let mut client = Self {
                agent: agent.clone(),
                api_base: api_base.clone(),
                auth_base: auth_base.clone(),
                settings: settings.clone(),
                session,
                session_path: session_path.clone(),
            };
            match client.verify() {
                Ok(()) => {
                    log::info!("✅ Restored previous session.");
                    client.persist();
                    return Ok(client);
                }
                Err(e) => {
                    log::debug!("Stored session rejected: {}", e);
                    log::info!("❌ Session expired. Logging in again...");
                }
            }
        }

        let token = auth::device_login(&agent, &auth_base, &settings)
            .context("TIDAL login failed")?;
        let mut client = Self {
            agent,
            api_base,
            auth_base,
            settings,
            session: session_from_token(token),
            session_path,
        };
        client
            .verify()
            .context("TIDAL rejected the freshly issued session")?;
        client
            .session
            .save(&client.session_path)
            .context("Failed to save TIDAL session")?;
        Ok(client)
    }

    pub fn user_id(&self) -> u64 {
        self.session.user_id
    }

    fn country_code(&self) -> &str {
        self.settings
            .country_code
            .as_deref()
            .unwrap_or(&self.session.country_code)
    }

    fn persist(&self) {
        if let Err(e) = self.session.save(&self.session_path) {
            log::warn!("{:#}", e);
        }
    }

    /// Check the token against `/sessions` and pick up user id and country
    fn verify(&mut self) -> Result<(), ServiceError> {
        let info: SessionInfo = self.request("GET", "/sessions")?.call()?.into_json()?;
        self.session.user_id = info.user_id;
        self.session.country_code = info.country_code;
        Ok(())
    }

    fn ensure_fresh_token(&mut self) -> Result<(), ServiceError> {
        if !self.session.is_expired() {
            return Ok(());
        }
        let Some(refresh_token) = self.session.refresh_token.clone() else {
            return Err(ServiceError::Login(
                "access token expired and no refresh token is stored".to_string(),
            ));
        };

        log::info!("Refreshing TIDAL access token");
        let token = auth::refresh(&self.agent, &self.auth_base, &self.settings, &refresh_token)?;
        self.session.access_token = token.access_token;
        self.session.expires_at = Utc::now().timestamp() + token.expires_in;
        if let Some(rotated) = token.refresh_token {
            self.session.refresh_token = Some(rotated);
        }
        self.persist();
        Ok(())
    }

    /// Authorized request against the API base, with the country code set
    fn request(&mut self, method: &str, path: &str) -> Result<ureq::Request, ServiceError> {
        self.ensure_fresh_token()?;
        Ok(self
            .agent
            .request(method, &format!("{}{}", self.api_base, path))
            .set("Authorization", &format!("Bearer {}", self.session.access_token))
            .query("countryCode", self.country_code()))
    }

    /// Search tracks and return the catalog's top hit if it is a track
    pub fn search_top_track(&mut self, query: &str) -> Result<Option<TrackRef>, ServiceError> {
        let response: SearchResponse = self
            .request("GET", "/search")?
            .query("query", query)
            .query("types", "TRACKS")
            .query("limit", SEARCH_LIMIT)
            .call()?
            .into_json()?;

        let track = response
            .top_track()
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        Ok(track.map(|t| t.to_track_ref()))
    }

    /// All playlists owned by the logged-in user
    pub fn user_playlists(&mut self) -> Result<Vec<ApiPlaylist>, ServiceError> {
        let path = format!("/users/{}/playlists", self.session.user_id);
        let mut playlists = Vec::new();

        loop {
            let page: PlaylistPage = self
                .request("GET", &path)?
                .query("limit", &PLAYLIST_PAGE_SIZE.to_string())
                .query("offset", &playlists.len().to_string())
                .call()?
                .into_json()?;

            let received = page.items.len();
            playlists.extend(page.items);
            if received == 0 || playlists.len() >= page.total_number_of_items as usize {
                break;
            }
        }

        Ok(playlists)
    }

    pub fn find_playlist(&mut self, name: &str) -> Result<Option<PlaylistHandle>, ServiceError> {
        Ok(self
            .user_playlists()?
            .iter()
            .find(|p| p.title == name)
            .map(ApiPlaylist::to_handle))
    }

    pub fn create_playlist(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<PlaylistHandle, ServiceError> {
        let path = format!("/users/{}/playlists", self.session.user_id);
        let created: ApiPlaylist = self
            .request("POST", &path)?
            .send_form(&[("title", name), ("description", description)])?
            .into_json()?;
        Ok(created.to_handle())
    }

    /// Reuse the first playlist titled `name`, or create it
    pub fn find_or_create_playlist(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<PlaylistHandle, ServiceError> {
        if let Some(existing) = self.find_playlist(name)? {
            log::info!("🎧 Using existing playlist: {}", existing.name);
            return Ok(existing);
        }
        let created = self.create_playlist(name, description)?;
        log::info!("📀 Created new playlist: {}", created.name);
        Ok(created)
    }

    /// Current ETag and metadata of a playlist; mutations must echo the ETag
    fn playlist_state(
        &mut self,
        playlist: &PlaylistHandle,
    ) -> Result<(String, ApiPlaylist), ServiceError> {
        let response = self.request("GET", &playlist_path(&playlist.id))?.call()?;
        let etag = response
            .header("ETag")
            .map(str::to_string)
            .ok_or_else(|| ServiceError::Decode("playlist response carried no ETag".into()))?;
        let info: ApiPlaylist = response.into_json()?;
        Ok((etag, info))
    }

    pub fn add_tracks(
        &mut self,
        playlist: &PlaylistHandle,
        track_ids: &[String],
    ) -> Result<(), ServiceError> {
        let (etag, _) = self.playlist_state(playlist)?;
        let ids = track_ids.join(",");
        self.request("POST", &format!("{}/items", playlist_path(&playlist.id)))?
            .set("If-None-Match", &etag)
            .send_form(&[
                ("trackIds", ids.as_str()),
                ("onArtifactNotFound", "SKIP"),
                ("onDupes", "SKIP"),
            ])?;
        Ok(())
    }

    /// Remove every track from a playlist, returning how many were removed
    pub fn clear_playlist(&mut self, playlist: &PlaylistHandle) -> Result<usize, ServiceError> {
        let (etag, info) = self.playlist_state(playlist)?;
        let count = info.number_of_tracks as usize;
        if count == 0 {
            return Ok(0);
        }

        let indices = (0..count)
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.request(
            "DELETE",
            &format!("{}/items/{}", playlist_path(&playlist.id), indices),
        )?
        .set("If-None-Match", &etag)
        .call()?;
        Ok(count)
    }
}

impl Catalog for TidalClient {
    fn top_track(&mut self, query: &str) -> Result<Option<TrackRef>, ServiceError> {
        self.search_top_track(query)
    }

    fn add_track(
        &mut self,
        playlist: &PlaylistHandle,
        track: &TrackRef,
    ) -> Result<(), ServiceError> {
        self.add_tracks(playlist, std::slice::from_ref(&track.id))
    }
}

fn playlist_path(id: &str) -> String {
    format!("/playlists/{}", urlencoding::encode(id))
}

/// Session for a freshly issued token; user and country are confirmed by
/// `verify` right after.
fn session_from_token(token: TokenResponse) -> StoredSession {
    let (user_id, country_code) = match token.user {
        Some(user) => (user.user_id, user.country_code.unwrap_or_else(|| "US".into())),
        None => (0, "US".to_string()),
    };
    StoredSession {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        expires_at: Utc::now().timestamp() + token.expires_in,
        user_id,
        country_code,
    }
}

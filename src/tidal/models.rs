//! TIDAL v1 response payloads

use crate::model::{PlaylistHandle, TrackRef};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTrack {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub artist: Option<ApiArtist>,
    #[serde(default)]
    pub artists: Vec<ApiArtist>,
}

impl ApiTrack {
    pub fn to_track_ref(&self) -> TrackRef {
        let artist = self
            .artist
            .as_ref()
            .or_else(|| self.artists.first())
            .map(|a| a.name.clone())
            .unwrap_or_else(|| "Unknown Artist".to_string());
        TrackRef::new(self.id.to_string(), self.title.clone(), artist)
    }
}

/// Relevance-ranked best match across all searched entity types
#[derive(Debug, Clone, Deserialize)]
pub struct TopHit {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub top_hit: Option<TopHit>,
}

impl SearchResponse {
    /// The top hit, if it is a track
    pub fn top_track(&self) -> serde_json::Result<Option<ApiTrack>> {
        match &self.top_hit {
            Some(hit) if hit.kind == "TRACKS" => {
                serde_json::from_value(hit.value.clone()).map(Some)
            }
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlaylist {
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub number_of_tracks: u32,
}

impl ApiPlaylist {
    pub fn to_handle(&self) -> PlaylistHandle {
        PlaylistHandle::new(self.uuid.clone(), self.title.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistPage {
    #[serde(default)]
    pub items: Vec<ApiPlaylist>,
    #[serde(default)]
    pub total_number_of_items: u32,
}

/// `GET /sessions`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user_id: u64,
    pub country_code: String,
}

/// OAuth device authorization grant, step one
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAuthorization {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    #[serde(default)]
    pub verification_uri_complete: Option<String>,
    pub expires_in: u64,
    #[serde(default = "default_poll_interval")]
    pub interval: u64,
}

fn default_poll_interval() -> u64 {
    2
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUser {
    pub user_id: u64,
    #[serde(default)]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub user: Option<TokenUser>,
}

/// Body of a 400 from the token endpoint while the user has not yet approved
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

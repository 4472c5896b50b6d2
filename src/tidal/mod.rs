//! TIDAL streaming service client
//!
//! Covers the handful of v1 endpoints the mirror needs: session restore and
//! device login, track search, and playlist lookup, creation, append and
//! clear.

mod auth;
mod client;
pub mod models;
mod session;

pub use client::TidalClient;
pub use session::StoredSession;

use serde::Deserialize;

/// OAuth application credentials and catalog options
#[derive(Debug, Clone, Deserialize)]
pub struct TidalSettings {
    pub client_id: String,
    pub client_secret: String,

    /// Override the country code reported by the session
    #[serde(default)]
    pub country_code: Option<String>,
}

//! OAuth device authorization and token refresh

use super::models::{DeviceAuthorization, OAuthError, TokenResponse};
use super::TidalSettings;
use crate::error::ServiceError;
use std::thread;
use std::time::{Duration, Instant};

const SCOPE: &str = "r_usr w_usr w_sub";
const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Added to the polling interval on every `slow_down` answer (RFC 8628)
const SLOW_DOWN_STEP: Duration = Duration::from_secs(5);

/// Run the device login flow: print a link for the user and wait until the
/// login is approved or the device code expires.
pub(super) fn device_login(
    agent: &ureq::Agent,
    auth_base: &str,
    settings: &TidalSettings,
) -> Result<TokenResponse, ServiceError> {
    let authorization: DeviceAuthorization = agent
        .post(&format!("{}/oauth2/device_authorization", auth_base))
        .send_form(&[("client_id", settings.client_id.as_str()), ("scope", SCOPE)])?
        .into_json()?;

    let link = authorization
        .verification_uri_complete
        .as_deref()
        .unwrap_or(&authorization.verification_uri);
    log::info!(
        "🔑 Visit {} to log in (code {}). The link expires in {} seconds.",
        with_scheme(link),
        authorization.user_code,
        authorization.expires_in
    );

    let token_url = format!("{}/oauth2/token", auth_base);
    let mut interval = Duration::from_secs(authorization.interval.max(1));
    let deadline = Instant::now() + Duration::from_secs(authorization.expires_in);

    while Instant::now() < deadline {
        thread::sleep(interval);

        let response = agent.post(&token_url).send_form(&[
            ("client_id", settings.client_id.as_str()),
            ("client_secret", settings.client_secret.as_str()),
            ("device_code", authorization.device_code.as_str()),
            ("grant_type", DEVICE_CODE_GRANT),
            ("scope", SCOPE),
        ]);

        match response {
            Ok(response) => return Ok(response.into_json()?),
            Err(ureq::Error::Status(400, response)) => {
                let body: OAuthError = response.into_json()?;
                match next_poll_interval(interval, &body.error) {
                    Some(next) => {
                        log::debug!("Waiting for login approval...");
                        interval = next;
                    }
                    None => {
                        return Err(ServiceError::Login(
                            body.error_description.unwrap_or(body.error),
                        ))
                    }
                }
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(ServiceError::Login(
        "device code expired before the login was approved".to_string(),
    ))
}

/// Exchange a refresh token for a new access token
pub(super) fn refresh(
    agent: &ureq::Agent,
    auth_base: &str,
    settings: &TidalSettings,
    refresh_token: &str,
) -> Result<TokenResponse, ServiceError> {
    let token = agent
        .post(&format!("{}/oauth2/token", auth_base))
        .send_form(&[
            ("client_id", settings.client_id.as_str()),
            ("client_secret", settings.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
            ("scope", SCOPE),
        ])?
        .into_json()?;
    Ok(token)
}

/// Interval for the next token poll, or `None` when the error ends the login
fn next_poll_interval(interval: Duration, error: &str) -> Option<Duration> {
    match error {
        "authorization_pending" => Some(interval),
        "slow_down" => Some(interval + SLOW_DOWN_STEP),
        _ => None,
    }
}

/// TIDAL hands out links like "link.tidal.com/ABCDE"
fn with_scheme(link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else {
        format!("https://{}", link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_poll_interval() {
        let two = Duration::from_secs(2);
        assert_eq!(next_poll_interval(two, "authorization_pending"), Some(two));
        assert_eq!(
            next_poll_interval(two, "slow_down"),
            Some(Duration::from_secs(7))
        );
        assert_eq!(
            next_poll_interval(Duration::from_secs(7), "slow_down"),
            Some(Duration::from_secs(12))
        );
        assert_eq!(next_poll_interval(two, "access_denied"), None);
        assert_eq!(next_poll_interval(two, "expired_token"), None);
    }

    #[test]
    fn test_with_scheme() {
        assert_eq!(with_scheme("link.tidal.com/ABCDE"), "https://link.tidal.com/ABCDE");
        assert_eq!(with_scheme("https://link.tidal.com/X"), "https://link.tidal.com/X");
    }
}

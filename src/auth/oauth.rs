use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::config::AppConfig;

/// Any failure talking to the provider. No retries; the current request
/// is terminal either way.
#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("{endpoint} returned status {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

/// Profile fields fetched from the userinfo endpoint.
#[derive(Debug, Deserialize)]
pub struct GoogleProfile {
    pub sub: String,
    pub email: String,
    pub name: String,
}

/// Drives the authorization-code flow against Google.
#[derive(Clone)]
pub struct GoogleOAuth {
    http: reqwest::Client,
    config: Arc<AppConfig>,
}

impl GoogleOAuth {
    pub fn new(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self { http, config })
    }

    /// Deterministic authorization URL for the configured client.
    pub fn authorization_url(&self) -> String {
        let g = &self.config.google;
        let params = [
            ("client_id", g.client_id.as_str()),
            ("redirect_uri", g.redirect_uri.as_str()),
            ("scope", "openid email profile"),
            ("response_type", "code"),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ];

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", g.auth_uri, query)
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let g = &self.config.google;
        let form = [
            ("code", code),
            ("client_id", g.client_id.as_str()),
            ("client_secret", g.client_secret.as_str()),
            ("redirect_uri", g.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let res = self.http.post(&g.token_uri).form(&form).send().await?;
        if !res.status().is_success() {
            warn!(status = %res.status(), "token exchange rejected");
            return Err(OAuthError::Status {
                endpoint: "token endpoint",
                status: res.status(),
            });
        }

        let token: GoogleTokenResponse = res.json().await?;
        Ok(token.access_token)
    }

    /// Fetch the profile behind an access token.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, OAuthError> {
        let g = &self.config.google;
        let res = self
            .http
            .get(&g.userinfo_uri)
            .bearer_auth(access_token)
            .send()
            .await?;
        if !res.status().is_success() {
            warn!(status = %res.status(), "userinfo fetch rejected");
            return Err(OAuthError::Status {
                endpoint: "userinfo endpoint",
                status: res.status(),
            });
        }

        Ok(res.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::state::AppState;

    #[tokio::test]
    async fn authorization_url_carries_fixed_parameters() {
        let state = AppState::fake();
        let url = state.oauth.authorization_url();

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=test-client"));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fapi%2Fauth%2Fgoogle-callback"
        ));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
    }

    #[tokio::test]
    async fn authorization_url_is_deterministic() {
        let state = AppState::fake();
        assert_eq!(
            state.oauth.authorization_url(),
            state.oauth.authorization_url()
        );
    }
}

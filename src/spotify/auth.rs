use chrono::Utc;
use reqwest::{StatusCode, Url};

use crate::{
    error::{Result, SpotlightError},
    management::Session,
    success,
    types::{Token, TokenResponse},
    warning,
};

use super::Spotify;

/// Permissions requested from the user.
pub const SCOPES: [&str; 4] = [
    "user-read-recently-played",
    "user-follow-read",
    "user-library-read",
    "user-follow-modify",
];

impl Spotify {
    /// Builds the URL the user is sent to in order to grant access.
    ///
    /// The URL carries `response_type=code`, the configured client id and
    /// redirect URI, and the fixed [`SCOPES`]. Building it has no side effects;
    /// the same settings always produce the same URL.
    ///
    /// # Example
    ///
    /// ```
    /// let url = spotify.build_authorization_url()?;
    /// // https://accounts.spotify.com/authorize?response_type=code&client_id=...
    /// ```
    pub fn build_authorization_url(&self) -> Result<Url> {
        let settings = self.settings();
        Url::parse_with_params(
            &settings.auth_url,
            &[
                ("response_type", "code"),
                ("client_id", settings.client_id.as_str()),
                ("redirect_uri", settings.redirect_uri.as_str()),
                ("scope", SCOPES.join(" ").as_str()),
            ],
        )
        .map_err(|e| SpotlightError::Config(format!("invalid authorization URL: {e}")))
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// Posts the code to the token endpoint together with the client
    /// credentials. On HTTP 200 the token is stored in `session`, which becomes
    /// active. Any other status leaves `session` untouched and fails with
    /// [`SpotlightError::Auth`] carrying the raw response body.
    ///
    /// # Arguments
    ///
    /// * `code` - Authorization code received on the OAuth callback
    /// * `session` - Session that receives the token
    ///
    /// # Security Note
    ///
    /// The authorization code is single-use and expires quickly. The exchange
    /// should happen immediately after receiving the code.
    pub async fn exchange_code_for_token(&self, code: &str, session: &mut Session) -> Result<Token> {
        let settings = self.settings();
        let res = self
            .http()
            .post(&settings.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", settings.redirect_uri.as_str()),
                ("client_id", settings.client_id.as_str()),
                ("client_secret", settings.client_secret.as_str()),
            ])
            .send()
            .await?;

        if res.status() != StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            warning!("Error getting token: {}", body);
            return Err(SpotlightError::Auth(body));
        }

        let json = res.json::<TokenResponse>().await?;
        let token = token_from_response(json, None);
        session.login(token.clone());
        success!("Token retrieved successfully.");

        Ok(token)
    }

    /// Refreshes the session's access token with its refresh token.
    ///
    /// Spotify may omit the refresh token from the answer, in which case the
    /// previous one is kept. On failure the session keeps its old token and
    /// the error is returned.
    pub async fn refresh_access_token(&self, session: &mut Session) -> Result<Token> {
        let refresh_token = session
            .token()
            .ok_or(SpotlightError::NotAuthenticated)?
            .refresh_token
            .clone()
            .ok_or_else(|| SpotlightError::Auth("no refresh token available".to_string()))?;

        let settings = self.settings();
        let res = self
            .http()
            .post(&settings.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
                ("client_id", settings.client_id.as_str()),
                ("client_secret", settings.client_secret.as_str()),
            ])
            .send()
            .await?;

        if res.status() != StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            return Err(SpotlightError::Auth(body));
        }

        let json = res.json::<TokenResponse>().await?;
        let token = token_from_response(json, Some(refresh_token));
        session.login(token.clone());

        Ok(token)
    }
}

fn token_from_response(json: TokenResponse, previous_refresh: Option<String>) -> Token {
    Token {
        access_token: json.access_token,
        token_type: json.token_type,
        scope: json.scope,
        expires_in: json.expires_in,
        refresh_token: json.refresh_token.or(previous_refresh),
        obtained_at: Utc::now().timestamp() as u64,
    }
}

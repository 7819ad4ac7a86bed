//! # Spotify Integration Module
//!
//! Typed wrappers around the Spotify Web API used by the dashboard. The
//! [`Spotify`] client owns one shared `reqwest` client (with a request timeout)
//! and the configured endpoint URLs; its operations are split by area:
//!
//! - [`auth`] - authorization URL, code exchange and token refresh
//! - [`artists`] - search, lookup, top tracks, following
//! - [`player`] - recently played window and the aggregations built on it
//! - [`library`] - saved albums
//!
//! ## Error Handling
//!
//! Every call is issued exactly once. A non-2xx answer becomes
//! [`SpotlightError::Api`] with the status and raw body, a transport failure
//! becomes [`SpotlightError::Http`]. Nothing is retried or cached; callers
//! decide whether a failure empties a page section.
//!
//! ## API Coverage
//!
//! - `GET /search` - artist search
//! - `GET /artists/{id}` and `GET /artists/{id}/top-tracks`
//! - `GET /me/player/recently-played`
//! - `GET /me/following`, `PUT|DELETE /me/following`, `GET /me/following/contains`
//! - `GET /me/albums`
//! - `POST /api/token` on the accounts host

use std::sync::Arc;

use reqwest::{Client, Response, header::AUTHORIZATION};
use serde::de::DeserializeOwned;

use crate::{
    config::Settings,
    error::{Result, SpotlightError},
    management::Session,
    types::{ApiArtist, ApiTrack, Artist, Track, first_image},
    utils,
};

pub mod artists;
pub mod auth;
pub mod library;
pub mod player;

/// Client for the Spotify Web API and accounts service.
#[derive(Debug, Clone)]
pub struct Spotify {
    client: Client,
    settings: Arc<Settings>,
}

impl Spotify {
    /// Builds a client whose requests time out after `settings.request_timeout`.
    pub fn new(settings: Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self::with_client(client, settings))
    }

    pub fn with_client(client: Client, settings: Settings) -> Self {
        Self {
            client,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The underlying HTTP client, shared with the scraper.
    pub fn http(&self) -> &Client {
        &self.client
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.settings.api_url.trim_end_matches('/'), path)
    }

    /// Authenticated GET returning the decoded JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let header = session.authorization_header()?;
        let response = self
            .client
            .get(self.api_url(path))
            .header(AUTHORIZATION, header)
            .query(query)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Turns a non-2xx response into [`SpotlightError::Api`].
pub(crate) async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SpotlightError::Api { status, body })
}

impl From<ApiArtist> for Artist {
    fn from(a: ApiArtist) -> Artist {
        Artist {
            image: first_image(&a.images),
            followers: a.followers.map(|f| utils::format_thousands(f.total)),
            id: a.id,
            name: a.name,
            genres: a.genres,
            popularity: a.popularity,
            external_url: a.external_urls.spotify,
        }
    }
}

impl From<ApiTrack> for Track {
    fn from(t: ApiTrack) -> Track {
        Track {
            image: t.album.as_ref().and_then(|a| first_image(&a.images)),
            duration: utils::format_duration_hms(t.duration_ms),
            duration_ms: t.duration_ms,
            id: t.id,
            name: t.name,
        }
    }
}

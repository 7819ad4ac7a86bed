use reqwest::{Method, StatusCode, header::AUTHORIZATION};

use crate::{
    error::Result,
    info,
    management::Session,
    types::{ApiArtist, Artist, FollowedArtistsResponse, SearchResponse, TopTracksResponse, Track},
    warning,
};

use super::Spotify;

/// Number of tracks kept from an artist's top tracks.
pub const ARTIST_TOP_TRACKS_LIMIT: usize = 7;
/// Page size used for the followed artists section.
pub const FOLLOWED_ARTISTS_LIMIT: u32 = 5;

impl Spotify {
    /// Looks up the best matching artist for a free-text name.
    ///
    /// Queries the search endpoint with `type=artist&limit=1`. An empty or
    /// whitespace-only name returns `Ok(None)` without touching the network,
    /// and so does a search without results. The follower count of the match
    /// is formatted with thousands separators.
    ///
    /// # Example
    ///
    /// ```
    /// if let Some(artist) = spotify.search_artist(&session, "Tove Lo").await? {
    ///     println!("{} has {:?} followers", artist.name, artist.followers);
    /// }
    /// ```
    pub async fn search_artist(&self, session: &Session, name: &str) -> Result<Option<Artist>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let res: SearchResponse = self
            .get_json(
                session,
                "/search",
                &[
                    ("q", name.to_string()),
                    ("type", "artist".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        let artist = res
            .artists
            .and_then(|page| page.items.into_iter().next())
            .map(Artist::from);

        if artist.is_none() {
            info!("No artist found for '{}'", name);
        }

        Ok(artist)
    }

    /// Fetches a single artist by Spotify id.
    pub async fn get_artist(&self, session: &Session, artist_id: &str) -> Result<Artist> {
        let artist: ApiArtist = self
            .get_json(session, &format!("/artists/{artist_id}"), &[])
            .await?;
        Ok(artist.into())
    }

    /// Returns up to seven of an artist's top tracks in the configured market.
    ///
    /// The order given by the API is kept as is; durations are rendered as
    /// `"Hh Mm Ss"`.
    pub async fn top_tracks_by_artist(&self, session: &Session, artist_id: &str) -> Result<Vec<Track>> {
        let res: TopTracksResponse = self
            .get_json(
                session,
                &format!("/artists/{artist_id}/top-tracks"),
                &[("market", self.settings().market.clone())],
            )
            .await?;

        Ok(res
            .tracks
            .into_iter()
            .take(ARTIST_TOP_TRACKS_LIMIT)
            .map(Track::from)
            .collect())
    }

    /// Returns the first page of artists the user follows (five at most).
    pub async fn followed_artists(&self, session: &Session) -> Result<Vec<Artist>> {
        let res: FollowedArtistsResponse = self
            .get_json(
                session,
                "/me/following",
                &[
                    ("type", "artist".to_string()),
                    ("limit", FOLLOWED_ARTISTS_LIMIT.to_string()),
                ],
            )
            .await?;

        Ok(res.artists.items.into_iter().map(Artist::from).collect())
    }

    /// Follows an artist. Succeeds if and only if Spotify answers 204.
    pub async fn follow_artist(&self, session: &Session, artist_id: &str) -> bool {
        self.change_follow(session, Method::PUT, artist_id).await
    }

    /// Unfollows an artist. Succeeds if and only if Spotify answers 204.
    pub async fn unfollow_artist(&self, session: &Session, artist_id: &str) -> bool {
        self.change_follow(session, Method::DELETE, artist_id).await
    }

    async fn change_follow(&self, session: &Session, method: Method, artist_id: &str) -> bool {
        let action = if method == Method::PUT { "follow" } else { "unfollow" };

        let header = match session.authorization_header() {
            Ok(h) => h,
            Err(e) => {
                warning!("Cannot {} artist {}: {}", action, artist_id, e);
                return false;
            }
        };

        let response = self
            .http()
            .request(method, self.api_url("/me/following"))
            .header(AUTHORIZATION, header)
            .query(&[("type", "artist"), ("ids", artist_id)])
            .body("")
            .send()
            .await;

        match response {
            Ok(res) if res.status() == StatusCode::NO_CONTENT => {
                info!("Artist {} {}ed", artist_id, action);
                true
            }
            Ok(res) => {
                let status = res.status();
                let body = res.text().await.unwrap_or_default();
                warning!("Failed to {} artist {}: {} {}", action, artist_id, status, body);
                false
            }
            Err(e) => {
                warning!("Failed to {} artist {}: {}", action, artist_id, e);
                false
            }
        }
    }

    /// Checks whether the user follows an artist.
    ///
    /// Returns the first value of the `contains` answer, or `false` for an
    /// empty answer. A failed call is returned as an error rather than being
    /// read as "not following".
    pub async fn is_following_artist(&self, session: &Session, artist_id: &str) -> Result<bool> {
        let res: Vec<bool> = self
            .get_json(
                session,
                "/me/following/contains",
                &[("type", "artist".to_string()), ("ids", artist_id.to_string())],
            )
            .await?;

        Ok(res.first().copied().unwrap_or(false))
    }
}

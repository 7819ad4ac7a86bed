//! # View Module
//!
//! Builds the view models of the dashboard pages from the API and scrape
//! gateways. Independent sections are fetched concurrently; each failed
//! section is logged and left empty so the rest of the page still renders.

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    management::Session,
    scrape::Scraper,
    spotify::{Spotify, player},
    types::{AlbumSummary, Artist, Hit, Track, TrackPlayAggregate, TrackPlayStat},
    utils, warning,
};

/// Number of artists on the wrapped page.
pub const WRAPPED_ARTISTS_LIMIT: usize = 5;

/// Request parameters of the dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HomeParams {
    /// Name typed into the search form.
    #[serde(skip)]
    pub form_artist_name: Option<String>,
    /// Artist name carried in the query string.
    pub artist_name: Option<String>,
    /// Artist id carried in the query string.
    pub artist_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub popular_hits: Vec<Hit>,
    pub followed_artists: Vec<Artist>,
    pub top_recently_played: Vec<TrackPlayAggregate>,
    pub recently_played: Vec<Track>,
    pub albums: Vec<AlbumSummary>,
    pub current_artist: Option<CurrentArtist>,
}

/// The artist selected through the search form or a link.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentArtist {
    pub artist: Artist,
    pub about: Option<String>,
    pub monthly_listeners: Option<String>,
    /// `None` when the follow state could not be read.
    pub following: Option<bool>,
    pub songs: Vec<Track>,
    pub track_stats: Vec<TrackPlayStat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WrappedView {
    pub top_artists: Vec<TopArtistCard>,
    pub top_recently_played: Vec<TrackPlayAggregate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopArtistCard {
    pub artist: String,
    pub image: Option<String>,
    pub count: String,
}

/// Composes gateway results into page view models.
#[derive(Debug, Clone)]
pub struct Assembler {
    spotify: Spotify,
    scraper: Scraper,
}

impl Assembler {
    pub fn new(spotify: Spotify, scraper: Scraper) -> Self {
        Self { spotify, scraper }
    }

    pub fn spotify(&self) -> &Spotify {
        &self.spotify
    }

    /// Builds the dashboard.
    ///
    /// The current artist is taken from the search form when that search finds
    /// someone. Otherwise the `artist_id` from the query is looked up, falling
    /// back to a search for the query's `artist_name` if the lookup fails.
    /// Without either, the artist section is omitted.
    pub async fn home(&self, session: &Session, params: &HomeParams) -> HomeView {
        let spotify = &self.spotify;
        let form_name = params.form_artist_name.as_deref().unwrap_or_default();

        let (hits, followed, top_played, recent, albums, searched) = tokio::join!(
            self.scraper.todays_top_hits(),
            spotify.followed_artists(session),
            spotify.top5_tracks_by_play_count(session),
            spotify.recent_unique_tracks(session),
            spotify.saved_albums(session),
            spotify.search_artist(session, form_name),
        );

        let artist = match section("artist search", searched).flatten() {
            Some(artist) => Some(artist),
            None => self.artist_from_query(session, params).await,
        };

        let current_artist = match artist {
            Some(artist) => Some(self.current_artist(session, artist).await),
            None => None,
        };

        HomeView {
            popular_hits: section("today's top hits", hits).unwrap_or_default(),
            followed_artists: section("followed artists", followed).unwrap_or_default(),
            top_recently_played: section("top played tracks", top_played).unwrap_or_default(),
            recently_played: section("recently played tracks", recent).unwrap_or_default(),
            albums: section("saved albums", albums).unwrap_or_default(),
            current_artist,
        }
    }

    async fn artist_from_query(&self, session: &Session, params: &HomeParams) -> Option<Artist> {
        let id = params.artist_id.as_deref().map(str::trim).unwrap_or_default();
        if id.is_empty() {
            return None;
        }

        if let Some(artist) = section("artist", self.spotify.get_artist(session, id).await) {
            return Some(artist);
        }

        let name = params.artist_name.as_deref().unwrap_or_default();
        section("artist search", self.spotify.search_artist(session, name).await).flatten()
    }

    async fn current_artist(&self, session: &Session, artist: Artist) -> CurrentArtist {
        let id = artist.id.clone();

        let (songs, following, about, listeners) = tokio::join!(
            self.spotify.top_tracks_by_artist(session, &id),
            self.spotify.is_following_artist(session, &id),
            self.scraper.artist_bio(&id),
            self.scraper.monthly_listeners(&id),
        );

        let songs = section("artist top tracks", songs).unwrap_or_default();
        let track_stats = if songs.is_empty() {
            Vec::new()
        } else {
            section(
                "track play stats",
                self.scraper.track_play_stats(&id, &songs).await,
            )
            .unwrap_or_default()
        };

        CurrentArtist {
            artist,
            about: section("artist bio", about),
            monthly_listeners: section("monthly listeners", listeners),
            following: section("follow state", following),
            songs,
            track_stats,
        }
    }

    /// Builds the wrapped page: most played tracks and most played artists of
    /// the recently played window, the artists enriched with a picture.
    pub async fn wrapped(&self, session: &Session) -> WrappedView {
        let (top_played, counts) = tokio::join!(
            self.spotify.top5_tracks_by_play_count(session),
            self.spotify.top_played_artists(session),
        );

        let counts = section("top played artists", counts).unwrap_or_default();
        let mut top_artists = Vec::new();
        for (name, count) in player::rank_artists(counts, WRAPPED_ARTISTS_LIMIT) {
            let image = section(
                "artist search",
                self.spotify.search_artist(session, &name).await,
            )
            .flatten()
            .and_then(|a| a.image);

            top_artists.push(TopArtistCard {
                artist: name,
                image,
                count: utils::format_thousands(u64::from(count)),
            });
        }

        WrappedView {
            top_artists,
            top_recently_played: section("top played tracks", top_played).unwrap_or_default(),
        }
    }
}

/// Keeps a section's value, or logs why it is missing.
fn section<T>(label: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warning!("Failed to load {}: {}", label, e);
            None
        }
    }
}

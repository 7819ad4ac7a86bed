use serde::{Deserialize, Serialize};

// ---- OAuth ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
    pub expires_in: u64,
    pub refresh_token: Option<String>,
    pub obtained_at: u64,
}

/// Body of the token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub expires_in: u64,
    pub refresh_token: Option<String>,
}

// ---- Web API payloads ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Followers {
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    pub followers: Option<Followers>,
    pub genres: Option<Vec<String>>,
    pub popularity: Option<u32>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTrack {
    /// `None` for local files played through the client.
    pub id: Option<String>,
    pub name: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub album: Option<ApiAlbum>,
}

impl ApiTrack {
    /// Identity used when counting plays: the Spotify id, or the name for
    /// local files.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Paging<T> {
    #[serde(default)]
    pub items: Vec<T>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub artists: Option<Paging<ApiArtist>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTracksResponse {
    pub tracks: Vec<ApiTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayHistory {
    pub track: ApiTrack,
    pub played_at: Option<String>,
}

/// One page of the recently-played endpoint.
pub type RecentlyPlayed = Paging<PlayHistory>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowedArtistsResponse {
    pub artists: Paging<ApiArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAlbum {
    pub album: ApiAlbum,
}

// ---- Domain values handed to the views ----

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub followers: Option<String>,
    pub genres: Option<Vec<String>>,
    pub popularity: Option<u32>,
    pub external_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    pub image: Option<String>,
    pub duration: String,
    #[serde(skip)]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackPlayAggregate {
    pub id: Option<String>,
    pub name: String,
    pub image: Option<String>,
    pub count: u32,
}

/// Play counts per artist name, in the order the names were first seen.
pub type ArtistPlayCounts = Vec<(String, u32)>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumSummary {
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    pub image_src: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackPlayStat {
    pub title: String,
    pub plays: String,
    pub duration: String,
}

/// A `(title, plays)` row scraped from an artist page.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedTrackRow {
    pub title: String,
    pub plays: String,
}

pub(crate) fn first_image(images: &[Image]) -> Option<String> {
    images.first().map(|i| i.url.clone())
}

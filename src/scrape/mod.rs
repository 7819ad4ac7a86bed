//! # Scrape Module
//!
//! Reads the few values the Web API does not expose (artist biography, monthly
//! listeners, today's biggest hits, per-track play counts) from Spotify's
//! public web player pages. Pages are fetched without authentication.
//!
//! Extraction depends on [`ScrapeMarkers`], which hold every page-specific
//! selector. A missing marker surfaces as [`crate::SpotlightError::ScrapeMiss`];
//! the view assembler shows the field as absent instead of failing the page.

use reqwest::Client;

use crate::{
    error::Result,
    spotify::ensure_success,
    types::{Hit, Track, TrackPlayStat},
};

mod markers;
pub mod parse;

pub use markers::ScrapeMarkers;

/// Number of entries in the "Today's biggest hits" section.
pub const TOP_HITS_LIMIT: usize = 5;

/// Fetches and extracts values from the public web player.
#[derive(Debug, Clone)]
pub struct Scraper {
    client: Client,
    web_url: String,
    markers: ScrapeMarkers,
}

impl Scraper {
    pub fn new(client: Client, web_url: &str, markers: ScrapeMarkers) -> Self {
        Self {
            client,
            web_url: web_url.trim_end_matches('/').to_string(),
            markers,
        }
    }

    /// Raw body of a public page. Parsing happens after the await so no
    /// `scraper::Html` document is held across it.
    async fn fetch_page(&self, path: &str) -> Result<String> {
        let response = self
            .client
            .get(format!("{}{}", self.web_url, path))
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(response.text().await?)
    }

    async fn artist_page(&self, artist_id: &str) -> Result<String> {
        self.fetch_page(&format!("/artist/{artist_id}")).await
    }

    pub async fn artist_bio(&self, artist_id: &str) -> Result<String> {
        let body = self.artist_page(artist_id).await?;
        parse::artist_bio(&body, &self.markers)
    }

    pub async fn monthly_listeners(&self, artist_id: &str) -> Result<String> {
        let body = self.artist_page(artist_id).await?;
        parse::monthly_listeners(&body, &self.markers)
    }

    /// Up to five hits from the home page, each with its cover image.
    pub async fn todays_top_hits(&self) -> Result<Vec<Hit>> {
        let body = self.fetch_page("/").await?;
        parse::top_hits(&body, &self.markers, TOP_HITS_LIMIT)
    }

    /// Play counts of an artist's popular tracks, matched to `tracks` by title.
    pub async fn track_play_stats(&self, artist_id: &str, tracks: &[Track]) -> Result<Vec<TrackPlayStat>> {
        let body = self.artist_page(artist_id).await?;
        let rows = parse::track_rows(&body, &self.markers)?;
        parse::pair_track_stats(&rows, tracks)
    }
}

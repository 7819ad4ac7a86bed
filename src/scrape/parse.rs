//! HTML extraction for the public web player pages.
//!
//! Pure functions from a page body to the values the dashboard needs. Each
//! returns [`SpotlightError::ScrapeMiss`] naming the marker when the page does
//! not contain it.

use std::collections::HashMap;

use scraper::{ElementRef, Html};

use crate::{
    error::{Result, SpotlightError},
    types::{Hit, ScrapedTrackRow, Track, TrackPlayStat},
    utils,
};

use super::markers::{ScrapeMarkers, selector};

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of the artist biography.
pub fn artist_bio(html: &str, markers: &ScrapeMarkers) -> Result<String> {
    let document = Html::parse_document(html);
    let container = selector(&markers.artist_bio)?;
    let text = selector(&markers.artist_bio_text)?;

    let div = document
        .select(&container)
        .next()
        .ok_or_else(|| SpotlightError::ScrapeMiss(markers.artist_bio.clone()))?;

    div.select(&text)
        .next()
        .map(element_text)
        .ok_or_else(|| SpotlightError::ScrapeMiss(markers.artist_bio_text.clone()))
}

/// Monthly listener count as displayed, e.g. `"1,234,567"`.
///
/// The marker text reads like `"1,234,567 monthly listeners"`; only the first
/// word is kept.
pub fn monthly_listeners(html: &str, markers: &ScrapeMarkers) -> Result<String> {
    let document = Html::parse_document(html);
    let marker = selector(&markers.monthly_listeners)?;

    document
        .select(&marker)
        .next()
        .map(element_text)
        .and_then(|text| text.split_whitespace().next().map(str::to_string))
        .ok_or_else(|| SpotlightError::ScrapeMiss(markers.monthly_listeners.clone()))
}

/// Pairs the first `limit` hit titles with the closest image before each.
///
/// Titles and images are walked together in document order, so "closest"
/// means the last image element seen before the title anywhere in the page.
/// A title with no preceding image (or one without `src`) is skipped but still
/// counts towards `limit`.
pub fn top_hits(html: &str, markers: &ScrapeMarkers, limit: usize) -> Result<Vec<Hit>> {
    let document = Html::parse_document(html);
    let title = selector(&markers.hit_title)?;
    let both = selector(&format!("{}, {}", markers.hit_image, markers.hit_title))?;

    let mut hits = Vec::new();
    let mut last_image: Option<String> = None;
    let mut titles_seen = 0;

    for element in document.select(&both) {
        if !title.matches(&element) {
            last_image = element.value().attr("src").map(str::to_string);
            continue;
        }

        if titles_seen >= limit {
            break;
        }
        titles_seen += 1;

        if let Some(src) = &last_image {
            hits.push(Hit {
                image_src: src.clone(),
                title: element_text(element),
            });
        }
    }

    if titles_seen == 0 {
        return Err(SpotlightError::ScrapeMiss(markers.hit_title.clone()));
    }

    Ok(hits)
}

/// Title and play count rows of an artist's popular tracks, in page order.
///
/// Titles and counts are separate element lists on the page. When their
/// lengths differ there is no safe way to pair them, and the page is reported
/// as [`SpotlightError::Misaligned`] (`scraped` titles against `api` counts).
pub fn track_rows(html: &str, markers: &ScrapeMarkers) -> Result<Vec<ScrapedTrackRow>> {
    let document = Html::parse_document(html);
    let title = selector(&markers.track_title)?;
    let plays = selector(&markers.track_plays)?;

    let titles: Vec<String> = document.select(&title).map(element_text).collect();
    if titles.is_empty() {
        return Err(SpotlightError::ScrapeMiss(markers.track_title.clone()));
    }

    let counts: Vec<String> = document.select(&plays).map(element_text).collect();
    if counts.is_empty() {
        return Err(SpotlightError::ScrapeMiss(markers.track_plays.clone()));
    }
    if counts.len() != titles.len() {
        return Err(SpotlightError::Misaligned {
            scraped: titles.len(),
            api: counts.len(),
        });
    }

    Ok(titles
        .into_iter()
        .zip(counts)
        .map(|(title, plays)| ScrapedTrackRow { title, plays })
        .collect())
}

/// Joins scraped rows with API tracks on their title.
///
/// The page may list more popular tracks than the API returned, so only the
/// first `tracks.len()` rows are used. Each of those must find an API track
/// with the same title (compared case- and whitespace-insensitively);
/// otherwise the lists describe different things and the join fails with
/// [`SpotlightError::Misaligned`]. Output follows the scraped order.
pub fn pair_track_stats(rows: &[ScrapedTrackRow], tracks: &[Track]) -> Result<Vec<TrackPlayStat>> {
    let by_title: HashMap<String, &Track> = tracks
        .iter()
        .map(|t| (utils::normalize_title(&t.name), t))
        .collect();

    let rows = &rows[..rows.len().min(tracks.len())];

    rows.iter()
        .map(|row| {
            by_title
                .get(&utils::normalize_title(&row.title))
                .map(|track| TrackPlayStat {
                    title: row.title.clone(),
                    plays: row.plays.clone(),
                    duration: utils::format_duration_clock(track.duration_ms),
                })
                .ok_or(SpotlightError::Misaligned {
                    scraped: rows.len(),
                    api: tracks.len(),
                })
        })
        .collect()
}

use scraper::Selector;

use crate::error::{Result, SpotlightError};

/// CSS selectors locating values on the public web player pages.
///
/// These follow generated class names and break whenever the pages are
/// redeployed. Keep every page-specific selector here so a redesign only
/// touches this value.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeMarkers {
    /// Container of the artist biography on an artist page.
    pub artist_bio: String,
    /// Element inside [`Self::artist_bio`] holding the text.
    pub artist_bio_text: String,
    /// Element whose text starts with the monthly listener count.
    pub monthly_listeners: String,
    /// Title of a row in the "Today's biggest hits" shelf of the home page.
    pub hit_title: String,
    /// Cover image preceding each hit title.
    pub hit_image: String,
    /// Title of a popular track row on an artist page.
    pub track_title: String,
    /// Play count of a popular track row on an artist page.
    pub track_plays: String,
}

impl Default for ScrapeMarkers {
    fn default() -> Self {
        Self {
            artist_bio: "div.Zbad_ytC5aqG3ZISd4Gw".to_string(),
            artist_bio_text: "span".to_string(),
            monthly_listeners: "div.fjP8GyQyM5IWQvTxWk6W".to_string(),
            hit_title: "span.ListRowTitle__LineClamp-sc-1xe2if1-0".to_string(),
            hit_image: "img.Image-sc-1u215sg-3".to_string(),
            track_title: "span.Hj3ST6Lg66UEtynHfOT8".to_string(),
            track_plays: "p.ListRowDetails__ListRowDetailText-sc-sozu4l-0".to_string(),
        }
    }
}

pub(crate) fn selector(marker: &str) -> Result<Selector> {
    Selector::parse(marker).map_err(|_| SpotlightError::Selector(marker.to_string()))
}

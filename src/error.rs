use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to Spotify or reading its public pages.
///
/// Most of these never reach the user: the view assembler turns a failed
/// section into an absent value and logs the error. Only configuration errors
/// are fatal, and only at startup.
#[derive(Error, Debug)]
pub enum SpotlightError {
    /// The token endpoint refused the authorization code. Carries the raw body.
    #[error("Token exchange failed: {0}")]
    Auth(String),

    /// A Web API call answered with a non-success status.
    #[error("Spotify API returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    /// An expected marker was not found in a scraped page.
    #[error("Marker `{0}` not found in page")]
    ScrapeMiss(String),

    /// A marker could not be parsed as a CSS selector.
    #[error("Invalid selector `{0}`")]
    Selector(String),

    /// Scraped rows could not be paired: titles against play counts on the
    /// page, or titles against the API track list.
    #[error("Scraped rows do not line up ({scraped} scraped, {api} to pair with)")]
    Misaligned { scraped: usize, api: usize },

    /// An operation needed a bearer token but nobody is signed in.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Transport failure, timeout, or an undecodable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SpotlightError>;

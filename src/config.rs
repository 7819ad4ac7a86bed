//! Configuration management for Spotlight.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Everything the server needs is collected once at
//! startup into a [`Settings`] value that is then shared with the handlers.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::error::{Result, SpotlightError};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_WEB_URL: &str = "https://open.spotify.com";
pub const DEFAULT_MARKET: &str = "PH";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Loads environment variables from `.env` files.
///
/// A `.env` in the working directory is read first. Afterwards the function
/// looks for a `.env` file in the platform-specific local data directory under
/// `spotlight/.env`, creating the directory if it doesn't exist yet. Values
/// already present in the environment are never overwritten, and a missing
/// file is not an error.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotlight/.env`
/// - macOS: `~/Library/Application Support/spotlight/.env`
/// - Windows: `%LOCALAPPDATA%/spotlight/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<()> {
    if let Err(e) = dotenv::dotenv() {
        if !e.not_found() {
            return Err(SpotlightError::Config(e.to_string()));
        }
    }

    let path = data_env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| SpotlightError::Config(e.to_string()))?;
    }

    match dotenv::from_path(&path) {
        Err(e) if !e.not_found() => Err(SpotlightError::Config(e.to_string())),
        _ => Ok(()),
    }
}

fn data_env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotlight/.env");
    path
}

/// Runtime configuration of the dashboard.
///
/// Credentials come from the Spotify developer dashboard and are required. The
/// endpoint URLs default to Spotify's public hosts and only need overriding
/// when pointing the app at a stand-in service.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub bind_address: String,
    pub port: u16,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub web_url: String,
    pub market: String,
    pub request_timeout: Duration,
}

impl Settings {
    /// Reads the settings from the process environment.
    ///
    /// | Variable | Default |
    /// | --- | --- |
    /// | `CLIENT_ID` | required |
    /// | `CLIENT_SECRET` | required |
    /// | `REDIRECT_URI` | required |
    /// | `BIND_ADDRESS` | `127.0.0.1` |
    /// | `PORT` | `5000` |
    /// | `SPOTIFY_API_URL` | `https://api.spotify.com/v1` |
    /// | `SPOTIFY_AUTH_URL` | `https://accounts.spotify.com/authorize` |
    /// | `SPOTIFY_TOKEN_URL` | `https://accounts.spotify.com/api/token` |
    /// | `SPOTIFY_WEB_URL` | `https://open.spotify.com` |
    /// | `SPOTIFY_MARKET` | `PH` |
    /// | `REQUEST_TIMEOUT_SECS` | `10` |
    ///
    /// # Errors
    ///
    /// Fails with [`SpotlightError::Config`] when a required variable is unset
    /// or a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: required("CLIENT_ID")?,
            client_secret: required("CLIENT_SECRET")?,
            redirect_uri: required("REDIRECT_URI")?,
            bind_address: optional("BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            port: parsed("PORT", DEFAULT_PORT)?,
            api_url: optional("SPOTIFY_API_URL", DEFAULT_API_URL),
            auth_url: optional("SPOTIFY_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: optional("SPOTIFY_TOKEN_URL", DEFAULT_TOKEN_URL),
            web_url: optional("SPOTIFY_WEB_URL", DEFAULT_WEB_URL),
            market: optional("SPOTIFY_MARKET", DEFAULT_MARKET),
            request_timeout: Duration::from_secs(parsed(
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
        })
    }

    /// Settings with Spotify's default endpoints and the given credentials.
    pub fn new(client_id: &str, client_secret: &str, redirect_uri: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            web_url: DEFAULT_WEB_URL.to_string(),
            market: DEFAULT_MARKET.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// The `host:port` the dashboard listens on.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| SpotlightError::Config(format!("{name} must be set")))
}

fn optional(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SpotlightError::Config(format!("{name} has an invalid value: {raw}"))),
        Err(_) => Ok(default),
    }
}

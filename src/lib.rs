//! Spotlight Library
//!
//! This library backs a small web dashboard for a Spotify account. It signs the
//! user in through the OAuth authorization-code flow, then combines Spotify Web
//! API calls with a few values scraped from the public web player pages to build
//! the view models served by the dashboard routes.
//!
//! # Modules
//!
//! - `api` - HTTP route handlers for the dashboard server
//! - `config` - Configuration management and environment variables
//! - `error` - The crate error type
//! - `management` - Session lifecycle for the signed-in user
//! - `scrape` - Extraction of values only the public web pages expose
//! - `server` - Router setup and server startup
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Formatting helpers
//! - `view` - Assembly of page view models
//!
//! # Example
//!
//! ```
//! use spotlight::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> spotlight::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     server::start_server(settings).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod management;
pub mod scrape;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod view;

pub use error::{Result, SpotlightError};

/// A convenient Result type alias for top-level operations that may fail.
///
/// Used by the binary and startup code where any error is simply reported.
/// Library operations return [`Result`] with a [`SpotlightError`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for failures during startup, where there is nothing left to
/// serve. Request handling never calls this.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Degraded page sections (a failed API call, a missing scrape marker) are
/// reported through this macro.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{
    api,
    config::Settings,
    error::{Result, SpotlightError},
    info,
    management::Session,
    scrape::{ScrapeMarkers, Scraper},
    spotify::Spotify,
    view::Assembler,
};

/// State shared by all route handlers.
pub struct AppState {
    pub assembler: Assembler,
    pub session: Mutex<Session>,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self> {
        let spotify = Spotify::new(settings)?;
        let scraper = Scraper::new(
            spotify.http().clone(),
            &spotify.settings().web_url,
            ScrapeMarkers::default(),
        );

        Ok(Self {
            assembler: Assembler::new(spotify, scraper),
            session: Mutex::new(Session::new()),
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/logout", get(api::logout))
        .route("/callback", get(api::callback))
        .route("/home", get(api::home).post(api::home_search))
        .route("/wrapped", get(api::wrapped))
        .route("/followArtist", post(api::follow_artist))
        .route("/unfollowArtist", post(api::unfollow_artist))
        .route("/health", get(api::health))
        .layer(Extension(state))
}

pub async fn start_server(settings: Settings) -> Result<()> {
    let addr = SocketAddr::from_str(&settings.server_addr())
        .map_err(|e| SpotlightError::Config(format!("Failed to parse server address: {e}")))?;

    let state = Arc::new(AppState::new(settings)?);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SpotlightError::Config(format!("Failed to bind {addr}: {e}")))?;

    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state))
        .await
        .map_err(|e| SpotlightError::Config(format!("Server stopped: {e}")))
}

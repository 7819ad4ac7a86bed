#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::Router;
use spotlight::{
    config::Settings,
    management::Session,
    types::{ApiAlbum, ApiTrack, ArtistRef, Image, PlayHistory, Token},
};

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Settings pointing every Spotify endpoint at a stub server.
pub fn settings(base: &str) -> Settings {
    let mut settings = Settings::new("client-id", "client-secret", "http://localhost:5000/callback");
    settings.api_url = format!("{base}/v1");
    settings.auth_url = format!("{base}/authorize");
    settings.token_url = format!("{base}/api/token");
    settings.web_url = base.to_string();
    settings
}

pub fn token(access_token: &str) -> Token {
    Token {
        access_token: access_token.to_string(),
        token_type: "Bearer".to_string(),
        scope: String::new(),
        expires_in: 3600,
        refresh_token: None,
        obtained_at: chrono::Utc::now().timestamp() as u64,
    }
}

pub fn active_session() -> Session {
    let mut session = Session::new();
    session.login(token("test-token"));
    session
}

#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn play(track_id: &str, track_name: &str, artists: &[&str]) -> PlayHistory {
    PlayHistory {
        track: ApiTrack {
            id: Some(track_id.to_string()),
            name: track_name.to_string(),
            duration_ms: 200_000,
            artists: artists
                .iter()
                .map(|name| ArtistRef {
                    id: None,
                    name: name.to_string(),
                })
                .collect(),
            album: Some(ApiAlbum {
                name: format!("{track_name} (album)"),
                images: vec![Image {
                    url: format!("https://img/{track_id}"),
                    height: None,
                    width: None,
                }],
            }),
        },
        played_at: None,
    }
}

pub fn recently_played_json(plays: &[PlayHistory]) -> serde_json::Value {
    serde_json::json!({ "items": plays, "next": null })
}

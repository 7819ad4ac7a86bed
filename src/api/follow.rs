use std::sync::Arc;

use axum::{Extension, Form, response::Redirect};
use reqwest::Url;
use serde::Deserialize;

use crate::{server::AppState, warning};

use super::signed_in;

#[derive(Debug, Deserialize)]
pub struct FollowForm {
    pub artist_id: Option<String>,
    pub artist_name: Option<String>,
}

pub async fn follow_artist(
    Extension(state): Extension<Arc<AppState>>,
    Form(form): Form<FollowForm>,
) -> Redirect {
    change_follow(&state, form, true).await
}

pub async fn unfollow_artist(
    Extension(state): Extension<Arc<AppState>>,
    Form(form): Form<FollowForm>,
) -> Redirect {
    change_follow(&state, form, false).await
}

async fn change_follow(state: &Arc<AppState>, form: FollowForm, follow: bool) -> Redirect {
    let Some(session) = signed_in(state).await else {
        warning!("Missing token for follow change");
        return Redirect::to("/");
    };

    if let Some(id) = form.artist_id.as_deref().filter(|id| !id.trim().is_empty()) {
        let spotify = state.assembler.spotify();
        if follow {
            spotify.follow_artist(&session, id).await;
        } else {
            spotify.unfollow_artist(&session, id).await;
        }
    }

    Redirect::to(&home_location(
        form.artist_id.as_deref(),
        form.artist_name.as_deref(),
    ))
}

/// `/home` with the artist carried over in the query string.
pub fn home_location(artist_id: Option<&str>, artist_name: Option<&str>) -> String {
    let params: Vec<(&str, &str)> = [("artist_id", artist_id), ("artist_name", artist_name)]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect();

    match Url::parse_with_params("http://localhost/home", &params) {
        Ok(url) => match url.query() {
            Some(query) if !query.is_empty() => format!("{}?{}", url.path(), query),
            _ => url.path().to_string(),
        },
        Err(_) => "/home".to_string(),
    }
}

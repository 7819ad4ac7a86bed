use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension,
    extract::Query,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{management::Session, server::AppState, warning};

pub async fn index(Extension(state): Extension<Arc<AppState>>) -> Response {
    match state.assembler.spotify().build_authorization_url() {
        Ok(url) => Html(format!(
            "<h2>Spotlight</h2><p><a href=\"{}\">Log in with Spotify</a></p>",
            url.as_str().replace('&', "&amp;")
        ))
        .into_response(),
        Err(e) => {
            warning!("Cannot build authorization URL: {}", e);
            Html("<h4>Login is not configured.</h4>".to_string()).into_response()
        }
    }
}

pub async fn logout(Extension(state): Extension<Arc<AppState>>) -> Redirect {
    state.session.lock().await.logout();
    Redirect::to("/")
}

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<AppState>>,
) -> Redirect {
    let Some(code) = params.get("code") else {
        if let Some(error) = params.get("error") {
            warning!("Authorization was denied: {}", error);
        }
        return Redirect::to("/");
    };

    let mut fresh = Session::new();
    match state
        .assembler
        .spotify()
        .exchange_code_for_token(code, &mut fresh)
        .await
    {
        Ok(_) => {
            *state.session.lock().await = fresh;
            Redirect::to("/home")
        }
        Err(e) => {
            warning!("Failed to retrieve token: {}", e);
            Redirect::to("/")
        }
    }
}

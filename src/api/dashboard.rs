use std::sync::Arc;

use axum::{
    Extension, Form, Json,
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{server::AppState, view::HomeParams};

use super::signed_in;

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    pub artist_name: Option<String>,
}

pub async fn home(
    Query(params): Query<HomeParams>,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    render_home(&state, params).await
}

pub async fn home_search(
    Query(mut params): Query<HomeParams>,
    Extension(state): Extension<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Response {
    params.form_artist_name = form.artist_name;
    render_home(&state, params).await
}

async fn render_home(state: &Arc<AppState>, params: HomeParams) -> Response {
    let Some(session) = signed_in(state).await else {
        return Redirect::to("/").into_response();
    };

    Json(state.assembler.home(&session, &params).await).into_response()
}

pub async fn wrapped(Extension(state): Extension<Arc<AppState>>) -> Response {
    let Some(session) = signed_in(&state).await else {
        return Redirect::to("/").into_response();
    };

    Json(state.assembler.wrapped(&session).await).into_response()
}

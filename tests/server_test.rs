mod common;

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    Form, Json, Router,
    extract::{Path, Query},
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
    routing::{get, post, put},
};
use reqwest::{Client, redirect::Policy};
use serde_json::{Value, json};

use common::{Counter, play, recently_played_json, settings, spawn};
use spotlight::{
    api::home_location,
    server::{AppState, router},
};

/// Stub Spotify: accepts the code `good-code` and serves one saved album.
/// Every other endpoint answers 404.
fn spotify_stub(follows: Counter) -> Router {
    Router::new()
        .route(
            "/api/token",
            post(|Form(form): Form<HashMap<String, String>>| async move {
                if form.get("code").map(String::as_str) != Some("good-code") {
                    return (StatusCode::BAD_REQUEST, "invalid_grant").into_response();
                }
                Json(json!({
                    "access_token": "test-token",
                    "token_type": "Bearer",
                    "scope": "",
                    "expires_in": 3600
                }))
                .into_response()
            }),
        )
        .route(
            "/v1/me/albums",
            get(|| async {
                Json(json!({ "items": [
                    { "album": { "name": "Sunshine Kitty", "images": [] } }
                ] }))
            }),
        )
        .route(
            "/v1/me/following",
            put(move || {
                let follows = follows.clone();
                async move {
                    follows.hit();
                    StatusCode::NO_CONTENT
                }
            }),
        )
}

struct App {
    base: String,
    client: Client,
    follows: Counter,
}

impl App {
    async fn start() -> App {
        let follows = Counter::default();
        App::with_stub(spotify_stub(follows.clone()), follows).await
    }

    async fn with_stub(stub: Router, follows: Counter) -> App {
        let stub = spawn(stub).await;
        let state = Arc::new(AppState::new(settings(&stub)).unwrap());
        let base = spawn(router(state)).await;
        let client = Client::builder().redirect(Policy::none()).build().unwrap();
        App {
            base,
            client,
            follows,
        }
    }

    async fn sign_in(&self) {
        assert_eq!(
            redirect_target(&self.get("/callback?code=good-code").await),
            "/home"
        );
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base, path))
            .send()
            .await
            .unwrap()
    }

    async fn post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base, path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    async fn authenticated(&self) -> bool {
        let health: Value = self.get("/health").await.json().await.unwrap();
        health["authenticated"].as_bool().unwrap()
    }
}

fn redirect_target(response: &reqwest::Response) -> &str {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response.headers()[LOCATION].to_str().unwrap()
}

#[tokio::test]
async fn test_index_links_to_authorization() {
    let app = App::start().await;
    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.unwrap();
    assert!(body.contains("/authorize?response_type=code"));
    assert!(body.contains("&amp;client_id=client-id"));
}

#[tokio::test]
async fn test_pages_require_sign_in() {
    let app = App::start().await;

    assert_eq!(redirect_target(&app.get("/home").await), "/");
    assert_eq!(redirect_target(&app.get("/wrapped").await), "/");
    assert_eq!(
        redirect_target(&app.post("/followArtist", &[("artist_id", "abc")]).await),
        "/"
    );
    assert_eq!(app.follows.count(), 0);
}

#[tokio::test]
async fn test_callback_without_code_goes_home() {
    let app = App::start().await;

    assert_eq!(redirect_target(&app.get("/callback").await), "/");
    assert_eq!(
        redirect_target(&app.get("/callback?error=access_denied").await),
        "/"
    );
    assert!(!app.authenticated().await);
}

#[tokio::test]
async fn test_rejected_code_stays_signed_out() {
    let app = App::start().await;

    assert_eq!(redirect_target(&app.get("/callback?code=bad").await), "/");
    assert!(!app.authenticated().await);
}

#[tokio::test]
async fn test_sign_in_dashboard_and_logout() {
    let app = App::start().await;

    assert_eq!(
        redirect_target(&app.get("/callback?code=good-code").await),
        "/home"
    );
    assert!(app.authenticated().await);

    // Sections whose endpoints fail are left empty
    let response = app.get("/home").await;
    assert_eq!(response.status(), StatusCode::OK);
    let view: Value = response.json().await.unwrap();
    assert_eq!(view["albums"][0]["name"], "Sunshine Kitty");
    assert_eq!(view["popular_hits"], json!([]));
    assert_eq!(view["followed_artists"], json!([]));
    assert_eq!(view["recently_played"], json!([]));
    assert!(view["current_artist"].is_null());

    let response = app.post("/home", &[("artist_name", "")]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let wrapped: Value = app.get("/wrapped").await.json().await.unwrap();
    assert_eq!(wrapped["top_artists"], json!([]));

    assert_eq!(redirect_target(&app.get("/logout").await), "/");
    assert!(!app.authenticated().await);
}

#[tokio::test]
async fn test_follow_redirects_back_to_artist() {
    let app = App::start().await;
    app.get("/callback?code=good-code").await;

    let response = app
        .post(
            "/followArtist",
            &[("artist_id", "4NHQ"), ("artist_name", "Tove Lo")],
        )
        .await;
    assert_eq!(
        redirect_target(&response),
        "/home?artist_id=4NHQ&artist_name=Tove+Lo"
    );
    assert_eq!(app.follows.count(), 1);
}

#[test]
fn test_home_location() {
    assert_eq!(home_location(None, None), "/home");
    assert_eq!(home_location(Some("abc"), None), "/home?artist_id=abc");
    assert_eq!(
        home_location(Some("abc"), Some("Lykke Li")),
        "/home?artist_id=abc&artist_name=Lykke+Li"
    );
    assert_eq!(home_location(None, Some("a&b")), "/home?artist_name=a%26b");
}

const ARTIST_PAGE: &str = r#"
<html><body>
  <div class="fjP8GyQyM5IWQvTxWk6W">1,234,567 monthly listeners</div>
  <div class="Zbad_ytC5aqG3ZISd4Gw"><span>Swedish singer and songwriter.</span></div>
  <span class="Hj3ST6Lg66UEtynHfOT8">Habits (Stay High)</span>
  <p class="ListRowDetails__ListRowDetailText-sc-sozu4l-0">812,345,678</p>
  <span class="Hj3ST6Lg66UEtynHfOT8">Talking Body</span>
  <p class="ListRowDetails__ListRowDetailText-sc-sozu4l-0">401,000,000</p>
</body></html>
"#;

#[derive(Clone, Default)]
struct Catalog {
    searches: Counter,
    lookups: Counter,
}

fn artist_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "images": [{ "url": format!("https://img/{id}") }],
        "followers": { "total": 1_234_567 }
    })
}

/// Stub Spotify with an artist catalogue: "Tove Lo" (`tove`) can be found by
/// search or id, "Robyn" only by search.
fn catalog_stub(catalog: Catalog) -> Router {
    let searches = catalog.searches.clone();
    let lookups = catalog.lookups.clone();
    let history = recently_played_json(&[
        play("a", "Dancing On My Own", &["Robyn"]),
        play("b", "Little Bit", &["Lykke Li"]),
        play("a", "Dancing On My Own", &["Robyn"]),
    ]);

    Router::new()
        .route(
            "/api/token",
            post(|| async {
                Json(json!({ "access_token": "test-token", "token_type": "Bearer", "expires_in": 3600 }))
            }),
        )
        .route(
            "/v1/search",
            get(move |Query(q): Query<HashMap<String, String>>| {
                let searches = searches.clone();
                async move {
                    searches.hit();
                    let items = match q["q"].as_str() {
                        "Tove Lo" => vec![artist_json("tove", "Tove Lo")],
                        "Robyn" => vec![artist_json("robyn", "Robyn")],
                        _ => vec![],
                    };
                    Json(json!({ "artists": { "items": items, "next": null } }))
                }
            }),
        )
        .route(
            "/v1/artists/{id}",
            get(move |Path(id): Path<String>| {
                let lookups = lookups.clone();
                async move {
                    lookups.hit();
                    if id == "tove" {
                        Json(artist_json("tove", "Tove Lo")).into_response()
                    } else {
                        StatusCode::NOT_FOUND.into_response()
                    }
                }
            }),
        )
        .route(
            "/v1/artists/{id}/top-tracks",
            get(|| async {
                Json(json!({ "tracks": [
                    { "id": "t1", "name": "Talking Body", "duration_ms": 238_000 },
                    { "id": "t2", "name": "Habits (Stay High)", "duration_ms": 209_000 }
                ] }))
            }),
        )
        .route(
            "/v1/me/following/contains",
            get(|| async { Json(json!([true])) }),
        )
        .route(
            "/v1/me/player/recently-played",
            get(move || {
                let history = history.clone();
                async move { Json(history) }
            }),
        )
        .route("/artist/{id}", get(|| async { ARTIST_PAGE }))
}

async fn catalog_app() -> (App, Catalog) {
    let catalog = Catalog::default();
    let app = App::with_stub(catalog_stub(catalog.clone()), Counter::default()).await;
    app.sign_in().await;
    (app, catalog)
}

#[tokio::test]
async fn test_form_search_selects_current_artist() {
    let (app, catalog) = catalog_app().await;

    let view: Value = app
        .post("/home", &[("artist_name", "Tove Lo")])
        .await
        .json()
        .await
        .unwrap();

    let current = &view["current_artist"];
    assert_eq!(current["artist"]["id"], "tove");
    assert_eq!(current["artist"]["followers"], "1,234,567");
    assert_eq!(current["following"], true);
    assert_eq!(current["about"], "Swedish singer and songwriter.");
    assert_eq!(current["monthly_listeners"], "1,234,567");
    assert_eq!(current["songs"][0]["name"], "Talking Body");
    assert_eq!(current["songs"][0]["duration"], "0h 3m 58s");
    assert_eq!(
        current["track_stats"],
        json!([
            { "title": "Habits (Stay High)", "plays": "812,345,678", "duration": "3:29" },
            { "title": "Talking Body", "plays": "401,000,000", "duration": "3:58" }
        ])
    );
    assert_eq!(catalog.searches.count(), 1);
    assert_eq!(catalog.lookups.count(), 0);
}

#[tokio::test]
async fn test_query_artist_id_is_looked_up() {
    let (app, catalog) = catalog_app().await;

    let view: Value = app.get("/home?artist_id=tove").await.json().await.unwrap();

    assert_eq!(view["current_artist"]["artist"]["name"], "Tove Lo");
    assert_eq!(catalog.lookups.count(), 1);
    assert_eq!(catalog.searches.count(), 0);
}

#[tokio::test]
async fn test_failed_lookup_falls_back_to_artist_name() {
    let (app, catalog) = catalog_app().await;

    let view: Value = app
        .get("/home?artist_id=gone&artist_name=Tove%20Lo")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(view["current_artist"]["artist"]["id"], "tove");
    assert_eq!(catalog.lookups.count(), 1);
    assert_eq!(catalog.searches.count(), 1);
}

#[tokio::test]
async fn test_form_search_without_match_keeps_query_artist() {
    let (app, _) = catalog_app().await;

    let view: Value = app
        .post("/home?artist_id=tove", &[("artist_name", "Nobody")])
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(view["current_artist"]["artist"]["id"], "tove");
}

#[tokio::test]
async fn test_wrapped_ranks_and_enriches_artists() {
    let (app, _) = catalog_app().await;

    let view: Value = app.get("/wrapped").await.json().await.unwrap();

    assert_eq!(
        view["top_artists"],
        json!([
            { "artist": "Robyn", "image": "https://img/robyn", "count": "2" },
            { "artist": "Lykke Li", "image": null, "count": "1" }
        ])
    );
    assert_eq!(view["top_recently_played"][0]["name"], "Dancing On My Own");
    assert_eq!(view["top_recently_played"][0]["count"], 2);
}

/// Issues a short-lived token on sign-in; refreshing it takes half a second.
fn short_lived_stub(refreshes: Counter) -> Router {
    Router::new().route(
        "/api/token",
        post(move |Form(form): Form<HashMap<String, String>>| {
            let refreshes = refreshes.clone();
            async move {
                if form.get("grant_type").map(String::as_str) == Some("refresh_token") {
                    refreshes.hit();
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    return Json(json!({ "access_token": "renewed", "expires_in": 3600 }));
                }
                Json(json!({
                    "access_token": "short",
                    "expires_in": 60,
                    "refresh_token": "refresh-me"
                }))
            }
        }),
    )
}

fn spawn_home(app: &App) -> tokio::task::JoinHandle<StatusCode> {
    let client = app.client.clone();
    let url = format!("{}/home", app.base);
    tokio::spawn(async move { client.get(url).send().await.unwrap().status() })
}

#[tokio::test]
async fn test_refresh_does_not_block_other_requests() {
    let refreshes = Counter::default();
    let app = App::with_stub(short_lived_stub(refreshes.clone()), Counter::default()).await;
    app.sign_in().await;

    let home = spawn_home(&app);
    tokio::time::sleep(Duration::from_millis(100)).await;

    let health = tokio::time::timeout(Duration::from_millis(300), app.authenticated()).await;
    assert_eq!(health, Ok(true));

    assert_eq!(home.await.unwrap(), StatusCode::OK);
    assert_eq!(refreshes.count(), 1);

    // The renewed token was stored, so no second refresh
    assert_eq!(app.get("/home").await.status(), StatusCode::OK);
    assert_eq!(refreshes.count(), 1);
}

#[tokio::test]
async fn test_logout_during_refresh_wins() {
    let refreshes = Counter::default();
    let app = App::with_stub(short_lived_stub(refreshes.clone()), Counter::default()).await;
    app.sign_in().await;

    let home = spawn_home(&app);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(redirect_target(&app.get("/logout").await), "/");

    home.await.unwrap();
    assert_eq!(refreshes.count(), 1);
    assert!(!app.authenticated().await);
}

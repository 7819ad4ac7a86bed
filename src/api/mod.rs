//! # API Module
//!
//! HTTP route handlers of the dashboard server.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`index`] - login page linking to Spotify's authorization screen
//! - [`callback`] - OAuth redirect target; exchanges the code for a token
//! - [`logout`] - forgets the token
//!
//! ### Pages
//!
//! - [`home`] / [`home_search`] - dashboard view model
//! - [`wrapped`] - play count summary view model
//! - [`follow_artist`] / [`unfollow_artist`] - follow actions, redirecting back
//!   to the dashboard
//!
//! ### Monitoring
//!
//! - [`health`] - application status and version
//!
//! Page routes redirect to `/` when nobody is signed in. View models are served
//! as JSON; rendering them is left to the front end.

use std::sync::Arc;

use crate::{management::Session, server::AppState, warning};

mod auth;
mod dashboard;
mod follow;
mod health;

pub use auth::{callback, index, logout};
pub use dashboard::{home, home_search, wrapped};
pub use follow::{follow_artist, home_location, unfollow_artist};
pub use health::health;

/// Snapshot of the active session, refreshed first if it is about to expire.
///
/// Returns `None` when nobody is signed in. The lock is only held to copy the
/// session and to store a refreshed token; the refresh call itself runs
/// unlocked. A refreshed token is stored only if the session still holds the
/// token that was refreshed, so a logout or a new sign-in meanwhile wins.
pub(crate) async fn signed_in(state: &Arc<AppState>) -> Option<Session> {
    let mut session = state.session.lock().await.clone();
    let stale = session.token()?.access_token.clone();

    if session.needs_refresh() {
        match state
            .assembler
            .spotify()
            .refresh_access_token(&mut session)
            .await
        {
            Ok(_) => {
                let mut stored = state.session.lock().await;
                if stored.token().is_some_and(|t| t.access_token == stale) {
                    *stored = session.clone();
                }
            }
            Err(e) => warning!("Token refresh failed: {}", e),
        }
    }

    Some(session)
}

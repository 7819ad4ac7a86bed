use chrono::Utc;

use crate::{
    error::{Result, SpotlightError},
    types::Token,
};

/// Seconds before expiry at which a token counts as stale.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// The signed-in state of the dashboard user.
///
/// Starts out [`Session::Absent`], becomes [`Session::Active`] after a
/// successful code exchange, and goes back to absent on logout. Nothing is
/// written to disk.
#[derive(Debug, Clone, Default)]
pub enum Session {
    #[default]
    Absent,
    Active(Token),
}

impl Session {
    pub fn new() -> Self {
        Session::Absent
    }

    pub fn login(&mut self, token: Token) {
        *self = Session::Active(token);
    }

    pub fn logout(&mut self) {
        *self = Session::Absent;
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Session::Active(_))
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            Session::Active(token) => Some(token),
            Session::Absent => None,
        }
    }

    /// Value for the `Authorization` header, `Bearer <token>`.
    pub fn authorization_header(&self) -> Result<String> {
        self.token()
            .map(|t| format!("Bearer {}", t.access_token))
            .ok_or(SpotlightError::NotAuthenticated)
    }

    /// Whether the active token expires within the refresh margin.
    ///
    /// Tokens without a known lifetime never count as expired.
    pub fn needs_refresh(&self) -> bool {
        match self.token() {
            Some(t) if t.expires_in > 0 => {
                let now = Utc::now().timestamp() as u64;
                now + EXPIRY_MARGIN_SECS >= t.obtained_at + t.expires_in
            }
            _ => false,
        }
    }
}

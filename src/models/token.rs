// Token model as read from the Passport access-token table.
// Rows are issued elsewhere; this crate only reads them and flips `revoked`.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Token {
    pub id: String,
    /// Issuing client, read as text so integer and UUID keys compare alike.
    pub client_id: String,
    pub user_id: Option<String>,
    pub revoked: bool,
    /// NULL never satisfies `expires_at >= now`, so such a token is not active.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Token {
    /// A token is active iff it is not revoked and has not expired at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at.is_some_and(|at| at >= now)
    }
}

/// Optional equality constraints narrowing the batch path.
/// Present fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenFilter {
    pub user: Option<String>,
    pub client: Option<String>,
}

impl TokenFilter {
    /// Empty strings count as absent, same as an omitted option.
    pub fn new(user: Option<String>, client: Option<String>) -> Self {
        Self {
            user: user.filter(|u| !u.is_empty()),
            client: client.filter(|c| !c.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.client.is_none()
    }

    pub fn matches(&self, token: &Token) -> bool {
        let user_ok = match &self.user {
            Some(user) => token.user_id.as_deref() == Some(user.as_str()),
            None => true,
        };
        let client_ok = match &self.client {
            Some(client) => token.client_id == *client,
            None => true,
        };
        user_ok && client_ok
    }

    /// Operator-facing scope line printed before a batch revocation.
    pub fn describe(&self) -> String {
        match (&self.user, &self.client) {
            (Some(user), Some(client)) => {
                format!("Revoking all tokens for user {} and client {}...", user, client)
            }
            (Some(user), None) => format!("Revoking all tokens for user {}...", user),
            (None, Some(client)) => format!("Revoking all tokens for client {}...", client),
            (None, None) => "Revoking all active tokens...".to_string(),
        }
    }
}

//! The revocation flow: one token by id, or every active token matching a filter.

use chrono::{DateTime, Utc};

use crate::errors::RevokeError;
use crate::models::TokenFilter;
use crate::progress::Reporter;
use crate::prompt::Prompt;
use crate::store::TokenStore;

pub const REVOKE_ALL_QUESTION: &str =
    "You did not provide any user, client or token. All Passport tokens will be revoked. Continue?";

/// What the operator asked for, already parsed from the command line.
#[derive(Debug, Clone, Default)]
pub struct RevokeRequest {
    /// Takes precedence over the filter when present.
    pub token: Option<String>,
    pub filter: TokenFilter,
    /// Skip the revoke-everything confirmation.
    pub force: bool,
    pub dry_run: bool,
}

impl RevokeRequest {
    pub fn new(token: Option<String>, user: Option<String>, client: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            filter: TokenFilter::new(user, client),
            ..Self::default()
        }
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The named token is now revoked (it may already have been).
    TokenRevoked { id: String },
    /// Batch path finished; `total` rows were revoked.
    BatchRevoked { total: u64 },
    /// The operator declined the revoke-everything prompt. Nothing changed.
    Declined,
    /// `--dry-run`: number of tokens that would have been revoked.
    WouldRevoke { total: u64 },
}

pub struct RevokeCommand<'a, S, P, R> {
    store: &'a S,
    prompt: P,
    reporter: R,
}

impl<'a, S, P, R> RevokeCommand<'a, S, P, R>
where
    S: TokenStore,
    P: Prompt,
    R: Reporter,
{
    pub fn new(store: &'a S, prompt: P, reporter: R) -> Self {
        Self {
            store,
            prompt,
            reporter,
        }
    }

    pub fn into_parts(self) -> (P, R) {
        (self.prompt, self.reporter)
    }

    pub async fn run(&mut self, req: &RevokeRequest) -> Result<Outcome, RevokeError> {
        self.run_at(req, Utc::now()).await
    }

    /// `now` bounds the active-token filter once; rows expiring mid-run are still revoked.
    pub async fn run_at(
        &mut self,
        req: &RevokeRequest,
        now: DateTime<Utc>,
    ) -> Result<Outcome, RevokeError> {
        if let Some(id) = &req.token {
            return self.revoke_one(id, req.dry_run).await;
        }

        if req.dry_run {
            let total = self.store.count_active(&req.filter, now).await?;
            tracing::info!(filter = ?req.filter, total, "dry run");
            self.reporter
                .message(&format!("{} tokens would be revoked", total))?;
            return Ok(Outcome::WouldRevoke { total });
        }

        if req.filter.is_empty() && !req.force && !self.prompt.confirm(REVOKE_ALL_QUESTION)? {
            tracing::info!("revocation of all tokens declined");
            self.reporter.message("Aborted.")?;
            return Ok(Outcome::Declined);
        }

        self.revoke_batch(&req.filter, now).await
    }

    async fn revoke_one(&mut self, id: &str, dry_run: bool) -> Result<Outcome, RevokeError> {
        let token = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| RevokeError::TokenNotFound(id.to_string()))?;

        if dry_run {
            self.reporter
                .message(&format!("Token {} would be revoked", token.id))?;
            return Ok(Outcome::WouldRevoke { total: 1 });
        }

        self.reporter.message(&format!("Revoking token {}...", id))?;
        if token.revoked {
            tracing::debug!(token_id = %id, "token already revoked");
        }

        // Already-revoked rows are rewritten with the same value.
        let found = self
            .store
            .revoke(id)
            .await
            .map_err(|source| RevokeError::Persistence {
                id: id.to_string(),
                source,
            })?;
        if !found {
            return Err(RevokeError::TokenNotFound(id.to_string()));
        }

        tracing::info!(token_id = %id, "token revoked");
        self.reporter.message("✓ Token successfully revoked")?;

        Ok(Outcome::TokenRevoked { id: id.to_string() })
    }

    async fn revoke_batch(
        &mut self,
        filter: &TokenFilter,
        now: DateTime<Utc>,
    ) -> Result<Outcome, RevokeError> {
        self.reporter.message(&filter.describe())?;

        let tokens = self.store.list_active(filter, now).await?;
        let total = tokens.len() as u64;
        tracing::info!(?filter, total, "revoking active tokens");

        self.reporter.on_start(total)?;
        for token in &tokens {
            if let Err(source) = self.store.revoke(&token.id).await {
                tracing::error!(token_id = %token.id, error = %source, "revocation failed");
                return Err(RevokeError::Persistence {
                    id: token.id.clone(),
                    source,
                });
            }
            self.reporter.on_step()?;
        }
        self.reporter.on_finish()?;

        tracing::info!(total, "tokens revoked");
        self.reporter.message(&format!("✓ {} tokens revoked", total))?;

        Ok(Outcome::BatchRevoked { total })
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::models::{Token, TokenFilter};
use crate::store::TokenStore;

/// In-process token table keyed by id.
/// Applies the same active-token predicate as the SQL store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tokens: Arc<DashMap<String, Token>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: impl IntoIterator<Item = Token>) -> Self {
        let store = Self::new();
        for token in tokens {
            store.insert(token);
        }
        store
    }

    pub fn insert(&self, token: Token) {
        self.tokens.insert(token.id.clone(), token);
    }

    pub fn get(&self, id: &str) -> Option<Token> {
        self.tokens.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Ids of every revoked token, sorted.
    pub fn revoked_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .tokens
            .iter()
            .filter(|entry| entry.revoked)
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        ids
    }

    fn matching(&self, filter: &TokenFilter, now: DateTime<Utc>) -> Vec<Token> {
        let mut rows: Vec<Token> = self
            .tokens
            .iter()
            .filter(|entry| entry.is_active(now) && filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        rows
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Token>> {
        Ok(self.get(id))
    }

    async fn count_active(&self, filter: &TokenFilter, now: DateTime<Utc>) -> anyhow::Result<u64> {
        Ok(self.matching(filter, now).len() as u64)
    }

    async fn list_active(
        &self,
        filter: &TokenFilter,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Token>> {
        Ok(self.matching(filter, now))
    }

    async fn revoke(&self, id: &str) -> anyhow::Result<bool> {
        match self.tokens.get_mut(id) {
            Some(mut entry) => {
                entry.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Mutex;

use super::{IdentityError, IdentityProvider};
use crate::models::{AuthorId, AuthorSummary};

/// Process-local identity provider that records every batch request.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    users: DashMap<AuthorId, AuthorSummary>,
    /// One entry per `batch_get_users` call, for N+1 checks
    batch_calls: Mutex<Vec<Vec<AuthorId>>>,
}

impl InMemoryIdentityProvider {
    pub fn new(users: impl IntoIterator<Item = AuthorSummary>) -> Self {
        let provider = Self::default();
        for user in users {
            provider.upsert(user);
        }
        provider
    }

    pub fn upsert(&self, user: AuthorSummary) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn remove(&self, id: &AuthorId) -> Option<AuthorSummary> {
        self.users.remove(id).map(|(_, user)| user)
    }

    /// Ids requested by each batch call so far.
    pub fn batch_calls(&self) -> Vec<Vec<AuthorId>> {
        self.batch_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn batch_call_count(&self) -> usize {
        self.batch_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn batch_get_users(
        &self,
        ids: &[AuthorId],
        limit: u32,
    ) -> Result<Vec<AuthorSummary>, IdentityError> {
        self.batch_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ids.to_vec());

        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|user| user.value().clone()))
            .take(limit as usize)
            .collect())
    }
}

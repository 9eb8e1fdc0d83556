use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::esg::domain::{EsgResponse, FiscalYear, ResponseDraft, UserId};
use crate::esg::repository::{ResponseStore, StoreError};

type UserResponses = BTreeMap<FiscalYear, EsgResponse>;

/// Process-lifetime store used when no database is configured.
///
/// Responses are grouped per user in a `BTreeMap` keyed by fiscal year, so listing is already in
/// ascending order. The whole upsert runs under one lock, which makes concurrent writes to the
/// same key last-write-wins.
#[derive(Debug, Default)]
pub struct InMemoryResponseStore {
    records: Mutex<HashMap<UserId, UserResponses>>,
}

impl InMemoryResponseStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, UserResponses>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ResponseStore for InMemoryResponseStore {
    async fn upsert(&self, draft: ResponseDraft) -> Result<EsgResponse, StoreError> {
        let now = Utc::now();
        let mut guard = self.lock()?;
        let responses = guard.entry(draft.user_id.clone()).or_default();

        let stored = match responses.get_mut(&draft.fiscal_year) {
            Some(existing) => {
                existing.replace_figures(draft.figures, now);
                existing.clone()
            }
            None => {
                let created = EsgResponse::create(draft, now);
                responses.insert(created.fiscal_year.clone(), created.clone());
                created
            }
        };

        Ok(stored)
    }

    async fn get(
        &self,
        user_id: &UserId,
        fiscal_year: &FiscalYear,
    ) -> Result<Option<EsgResponse>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .get(user_id)
            .and_then(|responses| responses.get(fiscal_year))
            .cloned())
    }

    async fn list(&self, user_id: &UserId) -> Result<Vec<EsgResponse>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .get(user_id)
            .map(|responses| responses.values().cloned().collect())
            .unwrap_or_default())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

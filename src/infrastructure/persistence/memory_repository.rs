//! Process-local repositories used when no database is configured and in tests.
//!
//! Data lives behind [`parking_lot::RwLock`]s and is lost on restart. Short
//! code uniqueness and click counter increments are enforced under the write
//! lock, matching the guarantees of the PostgreSQL implementations.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::entities::{ClickEvent, NewShortLink, ShortLink};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

#[derive(Debug, Default)]
struct LinkTable {
    by_id: HashMap<String, ShortLink>,
    /// short_code -> id
    codes: HashMap<String, String>,
}

/// In-memory [`LinkRepository`] keyed by link id with a short code index.
#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    table: RwLock<LinkTable>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the stored link with the given id.
    pub fn get(&self, id: &str) -> Option<ShortLink> {
        self.table.read().by_id.get(id).cloned()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut table = self.table.write();

        if table.codes.contains_key(&new_link.short_code) {
            return Err(AppError::ShortCodeExists(new_link.short_code));
        }

        let link = new_link.into_link(Uuid::new_v4().to_string());
        table.codes.insert(link.short_code.clone(), link.id.clone());
        table.by_id.insert(link.id.clone(), link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let table = self.table.read();
        Ok(table
            .codes
            .get(code)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<ShortLink>, AppError> {
        let mut links: Vec<ShortLink> = self.table.read().by_id.values().cloned().collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

        Ok(links
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.table.read().by_id.len() as u64)
    }

    async fn increment_clicks(&self, id: &str) -> Result<(), AppError> {
        let mut table = self.table.write();
        let link = table
            .by_id
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound("Short link".to_string()))?;

        link.clicks += 1;
        link.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut table = self.table.write();
        match table.by_id.remove(id) {
            Some(link) => {
                table.codes.remove(&link.short_code);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// In-memory append-only [`ClickRepository`].
#[derive(Debug, Default)]
pub struct InMemoryClickRepository {
    events: RwLock<Vec<(String, ClickEvent)>>,
}

impl InMemoryClickRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded event in insertion order.
    pub fn events(&self) -> Vec<ClickEvent> {
        self.events.read().iter().map(|(_, e)| e.clone()).collect()
    }
}

#[async_trait]
impl ClickRepository for InMemoryClickRepository {
    async fn record(&self, event: ClickEvent) -> Result<String, AppError> {
        let id = Uuid::new_v4().to_string();
        self.events.write().push((id.clone(), event));
        Ok(id)
    }

    async fn list_for_link(
        &self,
        url_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<ClickEvent>, AppError> {
        let mut events: Vec<ClickEvent> = self
            .events
            .read()
            .iter()
            .filter(|(_, e)| e.url_id == url_id)
            .map(|(_, e)| e.clone())
            .collect();
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(events
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

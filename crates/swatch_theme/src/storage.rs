//! Pluggable theme persistence

use async_trait::async_trait;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use swatch_core::CallContext;

use crate::error::StorageError;
use crate::tenant::{Scope, TenantId};
use crate::theme::Theme;

/// Durable theme store consulted when a theme is not in memory.
///
/// `tenant` is `None` for the global pool. Implementations that need
/// physical tenant isolation partition on it. `load_theme` must report a
/// missing theme as [`StorageError::NotFound`]; `delete_theme` is idempotent.
#[async_trait]
pub trait ThemeStorage: Send + Sync {
    async fn save_theme(
        &self,
        ctx: &CallContext,
        tenant: Option<&TenantId>,
        theme: &Theme,
    ) -> Result<(), StorageError>;

    async fn load_theme(
        &self,
        ctx: &CallContext,
        tenant: Option<&TenantId>,
        theme_id: &str,
    ) -> Result<Theme, StorageError>;

    async fn delete_theme(
        &self,
        ctx: &CallContext,
        tenant: Option<&TenantId>,
        theme_id: &str,
    ) -> Result<(), StorageError>;

    async fn list_themes(
        &self,
        ctx: &CallContext,
        tenant: Option<&TenantId>,
    ) -> Result<Vec<String>, StorageError>;
}

/// In-memory backend partitioned by tenant
#[derive(Default)]
pub struct MemoryThemeStorage {
    themes: RwLock<FxHashMap<Scope, FxHashMap<String, Theme>>>,
}

impl MemoryThemeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored themes across all partitions
    pub fn len(&self) -> usize {
        self.themes.read().values().map(FxHashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ThemeStorage for MemoryThemeStorage {
    async fn save_theme(
        &self,
        ctx: &CallContext,
        tenant: Option<&TenantId>,
        theme: &Theme,
    ) -> Result<(), StorageError> {
        ctx.check()?;
        self.themes
            .write()
            .entry(Scope::of(tenant))
            .or_default()
            .insert(theme.id.clone(), theme.clone());
        Ok(())
    }

    async fn load_theme(
        &self,
        ctx: &CallContext,
        tenant: Option<&TenantId>,
        theme_id: &str,
    ) -> Result<Theme, StorageError> {
        ctx.check()?;
        self.themes
            .read()
            .get(&Scope::of(tenant))
            .and_then(|pool| pool.get(theme_id))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(theme_id.to_owned()))
    }

    async fn delete_theme(
        &self,
        ctx: &CallContext,
        tenant: Option<&TenantId>,
        theme_id: &str,
    ) -> Result<(), StorageError> {
        ctx.check()?;
        if let Some(pool) = self.themes.write().get_mut(&Scope::of(tenant)) {
            pool.remove(theme_id);
        }
        Ok(())
    }

    async fn list_themes(
        &self,
        ctx: &CallContext,
        tenant: Option<&TenantId>,
    ) -> Result<Vec<String>, StorageError> {
        ctx.check()?;
        let mut ids: Vec<String> = self
            .themes
            .read()
            .get(&Scope::of(tenant))
            .map(|pool| pool.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort_unstable();
        Ok(ids)
    }
}

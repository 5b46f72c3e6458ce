//! Multi-tenant theme registry
//!
//! Themes live in a global pool or in per-tenant pools. Reads consult the
//! caller's tenant pool, then the global pool, then the storage backend.
//! Every read hands out a fresh clone, with matching conditional overrides
//! applied in ascending priority order.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde_json::Value;
use swatch_condition::ConditionEvaluator;
use swatch_core::{BoundedCache, CacheCost, CacheStats, CallContext, Interrupted};
use tracing::{debug, info, warn};

use crate::config::ThemeManagerConfig;
use crate::error::{StorageError, ThemeError};
use crate::storage::ThemeStorage;
use crate::tenant::{Scope, TenantId};
use crate::theme::Theme;

type Pool = FxHashMap<String, Arc<Theme>>;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    scope: Scope,
    theme_id: String,
    /// Canonical JSON of the evaluation data; empty when there is none
    fingerprint: String,
}

#[derive(Clone)]
struct CachedTheme {
    theme: Arc<Theme>,
    cost: usize,
}

impl CachedTheme {
    fn new(theme: Theme) -> Self {
        let tokens: usize = theme
            .tokens
            .iter()
            .flat_map(|tokens| tokens.iter())
            .map(|(path, value)| path.len() + value.len())
            .sum();
        let cost = tokens + theme.custom_css.len() + theme.custom_js.len();
        Self {
            theme: Arc::new(theme),
            cost,
        }
    }
}

impl CacheCost for CachedTheme {
    fn cache_cost(&self) -> usize {
        self.cost
    }
}

pub struct ThemeManager {
    config: ThemeManagerConfig,
    global: RwLock<Pool>,
    tenants: RwLock<FxHashMap<TenantId, Arc<RwLock<Pool>>>>,
    cache: BoundedCache<CacheKey, CachedTheme>,
    evaluator: ConditionEvaluator,
    storage: Option<Arc<dyn ThemeStorage>>,
    /// Bumped under the pool lock by every register and unregister. A lookup
    /// that saw an older value must not publish what it computed.
    generation: AtomicU64,
    closed: AtomicBool,
}

impl ThemeManager {
    pub fn new(config: ThemeManagerConfig) -> Self {
        let cache = BoundedCache::new(config.cache_capacity, config.cache_max_cost);
        let evaluator = ConditionEvaluator::new(config.condition.clone());
        Self {
            config,
            global: RwLock::new(Pool::default()),
            tenants: RwLock::new(FxHashMap::default()),
            cache,
            evaluator,
            storage: None,
            generation: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Attach a persistence backend
    pub fn with_storage(mut self, storage: Arc<dyn ThemeStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn config(&self) -> &ThemeManagerConfig {
        &self.config
    }

    /// Validate and store `theme` in the caller's pool, replacing any theme
    /// with the same id. Persistence is best effort.
    pub async fn register_theme(
        &self,
        ctx: &CallContext,
        tenant: Option<&TenantId>,
        mut theme: Theme,
    ) -> Result<(), ThemeError> {
        self.ensure_open()?;
        ctx.check()?;

        if self.config.validate_on_register {
            theme.validate()?;
        } else if theme.id.trim().is_empty() {
            return Err(ThemeError::EmptyId);
        }

        let scope = Scope::of(tenant);
        if let Some(created) = self
            .find_in_scope(&scope, &theme.id)
            .and_then(|existing| existing.created_at())
        {
            theme.touch(created);
        }
        theme.touch(Utc::now());

        let theme = Arc::new(theme);
        self.insert_into_scope(&scope, Arc::clone(&theme));
        self.invalidate(&scope, &theme.id);
        info!(theme_id = %theme.id, scope = %scope, "theme registered");

        if let Some(storage) = &self.storage {
            match guarded(ctx, storage.save_theme(ctx, tenant, &theme)).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    warn!(theme_id = %theme.id, scope = %scope, error = %err, "theme not persisted")
                }
                Err(err) => {
                    warn!(theme_id = %theme.id, scope = %scope, error = %err, "theme persistence interrupted")
                }
            }
        }
        Ok(())
    }

    /// Fetch a theme with conditional overrides applied for `eval_data`.
    ///
    /// Falls back to the configured default theme when `theme_id` is
    /// unknown. The returned theme is a private copy.
    pub async fn get_theme(
        &self,
        ctx: &CallContext,
        tenant: Option<&TenantId>,
        theme_id: &str,
        eval_data: Option<&Value>,
    ) -> Result<Theme, ThemeError> {
        self.ensure_open()?;
        ctx.check()?;

        if let Some(theme) = self.resolve_theme(ctx, tenant, theme_id, eval_data).await? {
            return Ok(theme);
        }

        match self.config.default_theme_id.as_deref() {
            Some(default_id) if default_id != theme_id => {
                debug!(theme_id, default_id, "falling back to default theme");
                self.resolve_theme(ctx, tenant, default_id, eval_data)
                    .await?
                    .ok_or_else(|| ThemeError::NotFound(theme_id.to_owned()))
            }
            _ => Err(ThemeError::NotFound(theme_id.to_owned())),
        }
    }

    /// Ids visible to the caller: its tenant pool, the global pool and the
    /// storage backend, sorted and deduplicated
    pub async fn list_themes(
        &self,
        ctx: &CallContext,
        tenant: Option<&TenantId>,
    ) -> Result<Vec<String>, ThemeError> {
        self.ensure_open()?;
        ctx.check()?;

        let mut ids: BTreeSet<String> = self.global.read().keys().cloned().collect();
        if let Some(pool) = tenant.and_then(|t| self.tenant_pool(t)) {
            ids.extend(pool.read().keys().cloned());
        }

        if let Some(storage) = &self.storage {
            let mut scopes = vec![None];
            if tenant.is_some() {
                scopes.push(tenant);
            }
            for scope in scopes {
                match guarded(ctx, storage.list_themes(ctx, scope)).await? {
                    Ok(stored) => ids.extend(stored),
                    Err(err) => warn!(error = %err, "storage listing failed; returning in-memory themes"),
                }
            }
        }

        Ok(ids.into_iter().collect())
    }

    /// Remove a theme from the caller's pool. Backend deletion is best effort.
    pub async fn unregister_theme(
        &self,
        ctx: &CallContext,
        tenant: Option<&TenantId>,
        theme_id: &str,
    ) -> Result<(), ThemeError> {
        self.ensure_open()?;
        ctx.check()?;

        let scope = Scope::of(tenant);
        if !self.remove_from_scope(&scope, theme_id) {
            return Err(ThemeError::NotFound(theme_id.to_owned()));
        }
        self.invalidate(&scope, theme_id);
        info!(theme_id, scope = %scope, "theme unregistered");

        if let Some(storage) = &self.storage {
            match guarded(ctx, storage.delete_theme(ctx, tenant, theme_id)).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(theme_id, scope = %scope, error = %err, "theme not deleted from storage"),
                Err(err) => warn!(theme_id, scope = %scope, error = %err, "storage deletion interrupted"),
            }
        }
        Ok(())
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached resolution without touching the pools
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Release caches; later calls fail with [`ThemeError::Closed`]
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.cache.clear();
            self.evaluator.close();
            debug!("theme manager closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<(), ThemeError> {
        if self.is_closed() {
            return Err(ThemeError::Closed);
        }
        Ok(())
    }

    /// Cached or freshly built view of one theme id, `None` if it exists nowhere
    async fn resolve_theme(
        &self,
        ctx: &CallContext,
        tenant: Option<&TenantId>,
        theme_id: &str,
        eval_data: Option<&Value>,
    ) -> Result<Option<Theme>, ThemeError> {
        let eval_data = eval_data.filter(|data| !data.is_null());
        let key = CacheKey {
            scope: Scope::of(tenant),
            theme_id: theme_id.to_owned(),
            fingerprint: eval_data.map(Value::to_string).unwrap_or_default(),
        };

        if self.config.enable_caching {
            if let Some(cached) = self.cache.get(&key) {
                debug!(theme_id, scope = %key.scope, "theme cache hit");
                return Ok(Some((*cached.theme).clone()));
            }
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let Some(base) = self.lookup_base(ctx, tenant, theme_id, generation).await? else {
            return Ok(None);
        };

        let mut theme = (*base).clone();
        if let Some(data) = eval_data {
            self.apply_conditions(ctx, &mut theme, data)?;
        }

        if self.config.enable_caching {
            self.cache.insert(key.clone(), CachedTheme::new(theme.clone()));
            // a write landed while this view was built; its invalidation may
            // already have run, so take the entry back out
            if self.generation.load(Ordering::SeqCst) != generation {
                self.cache.remove(&key);
                debug!(theme_id, scope = %key.scope, "pools changed during lookup; view not cached");
            }
        }
        Ok(Some(theme))
    }

    /// Tenant pool, then global pool, then storage
    async fn lookup_base(
        &self,
        ctx: &CallContext,
        tenant: Option<&TenantId>,
        theme_id: &str,
        generation: u64,
    ) -> Result<Option<Arc<Theme>>, ThemeError> {
        if let Some(tenant) = tenant {
            if let Some(theme) = self.find_in_scope(&Scope::Tenant(tenant.clone()), theme_id) {
                return Ok(Some(theme));
            }
        }
        if let Some(theme) = self.find_in_scope(&Scope::Global, theme_id) {
            return Ok(Some(theme));
        }

        let Some(storage) = &self.storage else {
            return Ok(None);
        };

        let mut scopes = Vec::with_capacity(2);
        if tenant.is_some() {
            scopes.push(tenant);
        }
        scopes.push(None);

        for scope_tenant in scopes {
            match guarded(ctx, storage.load_theme(ctx, scope_tenant, theme_id)).await? {
                Ok(theme) => {
                    theme.validate()?;
                    let scope = Scope::of(scope_tenant);
                    let theme = self.adopt_loaded(&scope, Arc::new(theme), generation);
                    return Ok(Some(theme));
                }
                Err(StorageError::NotFound(_)) => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(None)
    }

    /// Apply every matching condition, lowest priority first so the highest
    /// priority wins conflicting keys. A condition that fails to evaluate is
    /// skipped, as is an individual override that cannot be applied.
    fn apply_conditions(&self, ctx: &CallContext, theme: &mut Theme, data: &Value) -> Result<(), ThemeError> {
        if theme.conditions.is_empty() {
            return Ok(());
        }

        let ordered: Vec<_> = theme.conditions_by_priority().into_iter().cloned().collect();
        for condition in ordered {
            ctx.check()?;
            match self.evaluator.evaluate(ctx, &condition.expression, data) {
                Ok(true) => {
                    for (path, value) in &condition.token_overrides {
                        if let Err(err) = theme.apply_override(path, value) {
                            warn!(
                                theme_id = %theme.id,
                                condition = %condition.id,
                                path = %path,
                                error = %err,
                                "override skipped"
                            );
                        }
                    }
                    debug!(theme_id = %theme.id, condition = %condition.id, priority = condition.priority, "condition applied");
                }
                Ok(false) => {}
                Err(err) => warn!(
                    theme_id = %theme.id,
                    condition = %condition.id,
                    error = %err,
                    "condition skipped"
                ),
            }
        }
        Ok(())
    }

    /// Remove cached views of `theme_id`. A global write affects every scope
    /// because tenants may have cached the global theme as a fallback.
    fn invalidate(&self, scope: &Scope, theme_id: &str) {
        let removed = match scope {
            Scope::Global => self.cache.remove_matching(|key| key.theme_id == theme_id),
            Scope::Tenant(_) => self
                .cache
                .remove_matching(|key| key.theme_id == theme_id && &key.scope == scope),
        };
        if removed > 0 {
            debug!(theme_id, scope = %scope, removed, "theme cache invalidated");
        }
    }

    fn tenant_pool(&self, tenant: &TenantId) -> Option<Arc<RwLock<Pool>>> {
        self.tenants.read().get(tenant).cloned()
    }

    fn find_in_scope(&self, scope: &Scope, theme_id: &str) -> Option<Arc<Theme>> {
        match scope {
            Scope::Global => self.global.read().get(theme_id).cloned(),
            Scope::Tenant(tenant) => {
                let pool = self.tenant_pool(tenant)?;
                let theme = pool.read().get(theme_id).cloned();
                theme
            }
        }
    }

    /// Run `f` on the pool for `scope` under its write lock, creating a
    /// tenant pool on first use
    fn with_pool_mut<R>(&self, scope: &Scope, f: impl FnOnce(&mut Pool) -> R) -> R {
        match scope {
            Scope::Global => f(&mut self.global.write()),
            Scope::Tenant(tenant) => {
                let pool = match self.tenant_pool(tenant) {
                    Some(pool) => pool,
                    None => Arc::clone(self.tenants.write().entry(tenant.clone()).or_default()),
                };
                let mut pool = pool.write();
                f(&mut pool)
            }
        }
    }

    fn insert_into_scope(&self, scope: &Scope, theme: Arc<Theme>) {
        self.with_pool_mut(scope, |pool| {
            pool.insert(theme.id.clone(), theme);
            self.generation.fetch_add(1, Ordering::SeqCst);
        });
    }

    /// Pool a theme read from storage unless the pools changed since the
    /// lookup began. Returns whatever the pool holds for that id afterwards,
    /// or the loaded theme unpooled when a newer write makes it suspect.
    fn adopt_loaded(&self, scope: &Scope, loaded: Arc<Theme>, generation: u64) -> Arc<Theme> {
        self.with_pool_mut(scope, |pool| {
            if let Some(current) = pool.get(&loaded.id) {
                debug!(theme_id = %loaded.id, scope = %scope, "registered while loading; keeping pooled theme");
                return Arc::clone(current);
            }
            if self.generation.load(Ordering::SeqCst) != generation {
                debug!(theme_id = %loaded.id, scope = %scope, "pools changed while loading; not pooling stored theme");
                return loaded;
            }
            pool.insert(loaded.id.clone(), Arc::clone(&loaded));
            info!(theme_id = %loaded.id, scope = %scope, "theme loaded from storage");
            loaded
        })
    }

    fn remove_from_scope(&self, scope: &Scope, theme_id: &str) -> bool {
        let pool = match scope {
            Scope::Global => return self.remove_from_pool(&mut self.global.write(), theme_id),
            Scope::Tenant(tenant) => self.tenant_pool(tenant),
        };
        match pool {
            Some(pool) => {
                let mut pool = pool.write();
                self.remove_from_pool(&mut pool, theme_id)
            }
            None => false,
        }
    }

    fn remove_from_pool(&self, pool: &mut Pool, theme_id: &str) -> bool {
        let removed = pool.remove(theme_id).is_some();
        if removed {
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
        removed
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(ThemeManagerConfig::default())
    }
}

/// Run a storage call, giving up when the context is cancelled or its
/// deadline passes
async fn guarded<T, F>(ctx: &CallContext, call: F) -> Result<Result<T, StorageError>, Interrupted>
where
    F: Future<Output = Result<T, StorageError>>,
{
    ctx.check()?;
    let deadline = ctx.deadline().map(tokio::time::Instant::from_std);
    tokio::select! {
        biased;
        _ = ctx.token().cancelled() => Err(Interrupted::Cancelled),
        _ = sleep_until(deadline) => Err(Interrupted::DeadlineExceeded),
        result = call => Ok(result),
    }
}

async fn sleep_until(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

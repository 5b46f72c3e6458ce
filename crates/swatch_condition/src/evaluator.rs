//! Cached, bounded condition evaluation

use std::sync::Arc;

use serde_json::Value;
use swatch_core::{BoundedCache, CacheStats, CallContext};
use tracing::{debug, trace};

use crate::ast::Expr;
use crate::config::ConditionConfig;
use crate::error::ConditionError;
use crate::{eval, parser};

/// Compiles expressions once and evaluates them against JSON data under a
/// per-call time limit and complexity bounds.
pub struct ConditionEvaluator {
    config: ConditionConfig,
    cache: BoundedCache<String, Arc<Expr>>,
}

impl ConditionEvaluator {
    pub fn new(config: ConditionConfig) -> Self {
        let capacity = config.cache_capacity;
        Self {
            config,
            // every compiled tree costs 1, so the cost budget equals the entry cap
            cache: BoundedCache::new(capacity, capacity),
        }
    }

    pub fn config(&self) -> &ConditionConfig {
        &self.config
    }

    /// Parse and complexity-check `expression`, reusing a cached tree when
    /// the same string was compiled before
    pub fn compile(&self, expression: &str) -> Result<Arc<Expr>, ConditionError> {
        let key = expression.trim();
        if let Some(expr) = self.cache.get(key) {
            return Ok(expr);
        }

        let nesting = parser::nesting_depth(key);
        if nesting > self.config.max_depth {
            return Err(ConditionError::TooComplex(format!(
                "nesting depth {nesting} exceeds {}",
                self.config.max_depth
            )));
        }

        let expr = parser::parse(key)?;
        let depth = expr.depth();
        if depth > self.config.max_depth {
            return Err(ConditionError::TooComplex(format!(
                "nesting depth {depth} exceeds {}",
                self.config.max_depth
            )));
        }
        let count = expr.condition_count();
        if count > self.config.max_conditions {
            return Err(ConditionError::TooComplex(format!(
                "{count} conditions exceed {}",
                self.config.max_conditions
            )));
        }

        debug!(expression = key, depth, conditions = count, "compiled condition");
        let expr = Arc::new(expr);
        self.cache.insert(key.to_owned(), Arc::clone(&expr));
        Ok(expr)
    }

    /// Evaluate `expression` against `data`
    ///
    /// The caller's context is narrowed by the configured timeout, so a
    /// deadline already set on `ctx` still applies if it is sooner.
    pub fn evaluate(&self, ctx: &CallContext, expression: &str, data: &Value) -> Result<bool, ConditionError> {
        ctx.check()?;
        let expr = self.compile(expression)?;
        let scoped = ctx.child_with_timeout(self.config.timeout());
        let matched = eval::evaluate(&scoped, &expr, data)?;
        trace!(expression, matched, "evaluated condition");
        Ok(matched)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn close(&self) {
        self.cache.clear();
    }
}

impl Default for ConditionEvaluator {
    fn default() -> Self {
        Self::new(ConditionConfig::default())
    }
}

//! Tenant identity and pool scope

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque tenant identifier passed explicitly alongside each call
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(Arc<str>);

impl TenantId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TenantId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

/// Which pool a theme lives in
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Tenant(TenantId),
}

impl Scope {
    pub fn of(tenant: Option<&TenantId>) -> Self {
        match tenant {
            Some(id) => Scope::Tenant(id.clone()),
            None => Scope::Global,
        }
    }

    pub fn tenant(&self) -> Option<&TenantId> {
        match self {
            Scope::Global => None,
            Scope::Tenant(id) => Some(id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => f.write_str("global"),
            Scope::Tenant(id) => write!(f, "tenant:{id}"),
        }
    }
}

//! Record-kind resolution.
//!
//! A relation target can be expressed as a direct `Arc<RecordKind>`
//! reference or as a string identifier. Direct references pass through
//! untouched; strings are resolved via an injected [`KindLoader`] — the
//! module-loading collaborator. Path-like identifiers (`./`, `../`, `/`)
//! load from that exact location, bare names load from the loader's
//! conventional record-kinds directory.
//!
//! Resolution failures surface at relation-declaration time as
//! `RelationError::UnresolvedKind` — fail fast, never deferred to query
//! time.

use crate::config::RelmapConfig;
use crate::error::RelationError;
use crate::kind::RecordKind;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// A relation target: either an already-loaded descriptor or a string
/// identifier still to be resolved.
#[derive(Debug, Clone)]
pub enum KindRef {
    /// Direct reference to a descriptor; resolution is a no-op.
    Kind(Arc<RecordKind>),
    /// Bare record-kind name or path-like identifier.
    Name(String),
}

impl From<Arc<RecordKind>> for KindRef {
    fn from(kind: Arc<RecordKind>) -> Self {
        KindRef::Kind(kind)
    }
}

impl From<&Arc<RecordKind>> for KindRef {
    fn from(kind: &Arc<RecordKind>) -> Self {
        KindRef::Kind(Arc::clone(kind))
    }
}

impl From<&str> for KindRef {
    fn from(name: &str) -> Self {
        KindRef::Name(name.to_string())
    }
}

impl From<String> for KindRef {
    fn from(name: String) -> Self {
        KindRef::Name(name)
    }
}

/// Module-loading collaborator: locates a record-kind descriptor by path.
///
/// Implementations own the actual lookup mechanism; the resolver only
/// decides which path to ask for.
pub trait KindLoader: Send + Sync {
    /// Load the descriptor registered at `path`.
    ///
    /// # Errors
    ///
    /// Returns `RelationError::UnresolvedKind` if nothing is registered at
    /// that path.
    fn load(&self, path: &str) -> Result<Arc<RecordKind>, RelationError>;

    /// The conventional directory bare record-kind names resolve under.
    fn kinds_dir(&self) -> &str {
        "record_kinds"
    }
}

/// Resolve a relation target into a concrete descriptor.
///
/// Direct references are returned unchanged. Strings starting with a path
/// marker (`./`, `../` or `/`) are loaded from that location; anything else
/// is treated as a bare record-kind name under the loader's conventional
/// directory.
pub fn resolve_kind(
    target: KindRef,
    loader: &dyn KindLoader,
) -> Result<Arc<RecordKind>, RelationError> {
    match target {
        KindRef::Kind(kind) => Ok(kind),
        KindRef::Name(name) => {
            if name.trim().is_empty() {
                return Err(RelationError::InvalidName { name });
            }
            let path = if is_path_like(&name) {
                name.clone()
            } else {
                format!("{}/{}", loader.kinds_dir(), name)
            };
            debug!("resolving record-kind {:?} at {:?}", name, path);
            loader.load(&path)
        }
    }
}

fn is_path_like(name: &str) -> bool {
    name.starts_with("./") || name.starts_with("../") || name.starts_with('/')
}

/// In-process [`KindLoader`] backed by a path-keyed registry.
///
/// Descriptors registered with [`KindRegistry::insert`] land under the
/// conventional kinds directory by name; [`KindRegistry::register`] places
/// a descriptor at an explicit path for path-like lookups.
pub struct KindRegistry {
    kinds_dir: String,
    kinds: RwLock<HashMap<String, Arc<RecordKind>>>,
}

impl KindRegistry {
    /// Create a registry with the default conventional directory.
    pub fn new() -> Self {
        Self::with_kinds_dir("record_kinds")
    }

    /// Create a registry with an explicit conventional directory.
    pub fn with_kinds_dir(dir: impl Into<String>) -> Self {
        KindRegistry {
            kinds_dir: dir.into(),
            kinds: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry from loaded configuration.
    pub fn from_config(config: &RelmapConfig) -> Self {
        Self::with_kinds_dir(config.kinds_dir.clone())
    }

    /// Register a descriptor under the conventional directory by its name.
    pub fn insert(&self, kind: Arc<RecordKind>) {
        let path = format!("{}/{}", self.kinds_dir, kind.name());
        self.register(path, kind);
    }

    /// Register a descriptor at an explicit path.
    pub fn register(&self, path: impl Into<String>, kind: Arc<RecordKind>) {
        let mut map = self.kinds.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(path.into(), kind);
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl KindLoader for KindRegistry {
    fn load(&self, path: &str) -> Result<Arc<RecordKind>, RelationError> {
        let map = self.kinds.read().unwrap_or_else(PoisonError::into_inner);
        map.get(path)
            .cloned()
            .ok_or_else(|| RelationError::UnresolvedKind {
                target: path.to_string(),
                reason: "no record-kind registered at this path".to_string(),
            })
    }

    fn kinds_dir(&self) -> &str {
        &self.kinds_dir
    }
}

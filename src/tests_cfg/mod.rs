//! Shared test fixtures: the pet-store record-kinds.
//!
//! Person owns many Pets and acts in many Movies through `Person_Movie`;
//! a Pet references its Person. Used by unit tests across modules.

use crate::kind::RecordKind;
use crate::relation::declare::{RelationOptions, ThroughOptions};
use crate::resolver::KindRegistry;
use std::sync::Arc;

/// A bare kind with convention defaults and no relations.
pub fn plain_kind(name: &str) -> Arc<RecordKind> {
    RecordKind::builder(name).build().unwrap()
}

/// `Person` with the full pet-store relation graph declared.
pub fn person() -> Arc<RecordKind> {
    RecordKind::builder("Person")
        .declare_relations(|rel| {
            rel.owns_many("Pet", RelationOptions::default())?;
            rel.owns_many_through("Movie", RelationOptions::default(), ThroughOptions::default())
        })
        .build()
        .unwrap()
}

/// `Pet` referencing its `Person`.
pub fn pet() -> Arc<RecordKind> {
    RecordKind::builder("Pet")
        .declare_relations(|rel| rel.reference_to_one("Person", RelationOptions::default()))
        .build()
        .unwrap()
}

/// A registry with plain Person/Pet/Movie kinds registered under the
/// conventional directory, for tests that drive declarations directly.
pub fn registry() -> KindRegistry {
    let registry = KindRegistry::new();
    registry.insert(plain_kind("Person"));
    registry.insert(plain_kind("Pet"));
    registry.insert(plain_kind("Movie"));
    registry
}

//! Relation module for record-kind relationships.
//!
//! This module provides support for declaring and resolving relationships
//! between record-kinds:
//! - reference_to_one: many-to-one relation (the owner references a target)
//! - owns_one: one-to-one relation
//! - owns_many: one-to-many relation
//! - owns_many_through: many-to-many relation (via a join table)
//!
//! # Architecture
//!
//! - **Def**: resolved relation metadata (`RelationMapping`, `RelationKind`,
//!   `JoinSpec`, `ThroughSpec`, `ColumnRef`)
//! - **Declare**: the declaration resolver merging caller overrides with
//!   naming-convention defaults (`RelationDeclarations`)
//! - **Store**: lazy, memoized per-descriptor graph resolution

// Relation definitions
pub mod def;
#[doc(inline)]
pub use def::{
    ColumnRef, JoinSpec, RelationFilter, RelationKind, RelationMapping, RelationMappings,
    ThroughSpec,
};

// Declaration resolver
pub mod declare;
#[doc(inline)]
pub use declare::{RelationDeclarations, RelationOptions, ThroughOptions};

// Mapping store (lazy memoized graph resolution on `RecordKind`)
pub mod store;

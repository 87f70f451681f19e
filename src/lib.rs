//! # Relmap
//!
//! Convention-driven relation mapping and lifecycle hooks sitting above a
//! relational persistence engine.
//!
//! Record-kinds declare their relations in terse, convention-driven form
//! ("this kind references that kind", "this kind owns many of that kind,
//! through a join table"); relmap infers the physical join keys, resolves
//! each kind's relation graph lazily and exactly once, and stamps audit
//! timestamps on the engine's write path. Query execution, SQL generation
//! and connection handling belong to the persistence engine, which consumes
//! the resolved [`RelationMapping`] graph to plan joins.
//!
//! ```
//! use relmap::{KindRegistry, RecordKind, RelationOptions};
//!
//! let registry = KindRegistry::new();
//! registry.insert(RecordKind::builder("Pet").build().unwrap());
//!
//! let person = RecordKind::builder("Person")
//!     .declare_relations(|rel| rel.owns_many("Pet", RelationOptions::default()))
//!     .build()
//!     .unwrap();
//!
//! let graph = person.relation_mappings(&registry).unwrap();
//! assert_eq!(graph["pets"].join.from.to_string(), "Pet.personId");
//! ```

pub mod config;
pub mod error;
pub mod hooks;
pub mod kind;
pub mod naming;
pub mod relation;
pub mod resolver;

#[cfg(test)]
mod tests_cfg;

pub use config::RelmapConfig;
pub use error::RelationError;
pub use hooks::{HookPipeline, Stamped, TouchHook, WriteContext, WriteHook};
pub use kind::{RecordKind, RecordKindBuilder};
pub use relation::{
    ColumnRef, JoinSpec, RelationDeclarations, RelationFilter, RelationKind, RelationMapping,
    RelationMappings, RelationOptions, ThroughOptions, ThroughSpec,
};
pub use resolver::{KindLoader, KindRef, KindRegistry};

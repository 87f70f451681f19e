//! Relation definition types.
//!
//! This module provides the [`RelationMapping`] struct and its parts —
//! fully-resolved metadata describing how two record-kinds join. Mappings
//! are read-only snapshots: the persistence engine consumes them to plan
//! joins and eager-loads, and can convert them to SeaQuery [`Condition`]s
//! for use in JOINs and WHERE clauses.

use crate::error::RelationError;
use crate::kind::RecordKind;
use sea_query::{Condition, Expr};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Kind of relation between two record-kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// Many-to-one: the owner references one target ("belongs to")
    ReferenceToOne,
    /// One-to-one: the owner has one target
    OwnsOne,
    /// One-to-many: the owner has many targets
    OwnsMany,
    /// Many-to-many via a join table
    OwnsManyThroughJoin,
}

/// A `(table, column)` pair.
///
/// Explicit join overrides are supplied as `"Table.column"` strings, the
/// form [`ColumnRef::parse`] accepts; `Display` renders the same form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    table: String,
    column: String,
}

impl ColumnRef {
    /// Create a column reference from already-validated parts.
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        ColumnRef {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Parse an explicit `"Table.column"` override string.
    ///
    /// # Errors
    ///
    /// Returns `RelationError::InvalidJoinSpec` when the string does not
    /// contain exactly one `.` separating two non-empty parts.
    pub fn parse(spec: &str) -> Result<Self, RelationError> {
        let mut parts = spec.split('.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(table), Some(column), None) if !table.is_empty() && !column.is_empty() => {
                Ok(ColumnRef::new(table, column))
            }
            _ => Err(RelationError::InvalidJoinSpec {
                spec: spec.to_string(),
                reason: "expected \"Table.column\"".to_string(),
            }),
        }
    }

    /// The table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The column name.
    pub fn column(&self) -> &str {
        &self.column
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Optional scope predicate applied to a relation's query scope.
///
/// The closure builds a SeaQuery condition lazily, so a mapping stays a
/// cheap immutable snapshot until the engine actually plans a query.
pub type RelationFilter = Arc<dyn Fn() -> Condition + Send + Sync>;

/// Fully-resolved join columns for a relation.
///
/// `from`/`to` carry no unresolved placeholders: a `JoinSpec` is only ever
/// built once both endpoints are known.
#[derive(Debug, Clone)]
pub struct JoinSpec {
    /// Join start column
    pub from: ColumnRef,
    /// Join end column
    pub to: ColumnRef,
    /// Join-table hop for `OwnsManyThroughJoin`; `None` otherwise
    pub through: Option<ThroughSpec>,
}

/// The join-table hop of an `OwnsManyThroughJoin` relation.
#[derive(Clone)]
pub struct ThroughSpec {
    /// Join table name: explicit override, the through-kind's table, or
    /// `"{owner}_{target}"` derived from the record-kind names
    pub join_table: String,
    /// Join-table column referencing the owner
    pub from: ColumnRef,
    /// Join-table column referencing the target
    pub to: ColumnRef,
    /// Extra join-table columns the engine should carry along
    pub extra_columns: Vec<String>,
    /// Optional predicate applied to the join-table scope
    pub filter: Option<RelationFilter>,
    /// Descriptor for the join table itself, when modelled as a kind
    pub through_kind: Option<Arc<RecordKind>>,
}

impl fmt::Debug for ThroughSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThroughSpec")
            .field("join_table", &self.join_table)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("extra_columns", &self.extra_columns)
            .field(
                "filter",
                &if self.filter.is_some() { "Some" } else { "None" },
            )
            .field(
                "through_kind",
                &self.through_kind.as_ref().map(|k| k.name().to_string()),
            )
            .finish()
    }
}

/// One resolved relation of a record-kind's graph.
#[derive(Clone)]
pub struct RelationMapping {
    /// Relation kind
    pub kind: RelationKind,
    /// Relation name, unique within the owning descriptor's graph
    pub name: String,
    /// The related record-kind, resolved eagerly at declaration time
    pub target: Arc<RecordKind>,
    /// Optional predicate applied to the relation's query scope
    pub filter: Option<RelationFilter>,
    /// Fully-resolved join columns
    pub join: JoinSpec,
}

impl fmt::Debug for RelationMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationMapping")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("target", &self.target.name())
            .field(
                "filter",
                &if self.filter.is_some() { "Some" } else { "None" },
            )
            .field("join", &self.join)
            .finish()
    }
}

/// A record-kind's resolved relation graph, keyed by relation name.
pub type RelationMappings = HashMap<String, RelationMapping>;

impl RelationMapping {
    /// Build the SeaQuery join condition for this relation.
    ///
    /// For plain relations this is `from = to` on the two qualified
    /// columns; through relations produce both hops across the join table.
    /// Relation and through filters are ANDed in when present.
    pub fn join_condition(&self) -> Condition {
        let mut condition = Condition::all();
        match &self.join.through {
            Some(through) => {
                condition = condition.add(column_eq_expr(&self.join.from, &through.from));
                condition = condition.add(column_eq_expr(&through.to, &self.join.to));
                if let Some(filter) = &through.filter {
                    condition = condition.add(filter());
                }
            }
            None => {
                condition = condition.add(column_eq_expr(&self.join.from, &self.join.to));
            }
        }
        if let Some(filter) = &self.filter {
            condition = condition.add(filter());
        }
        condition
    }
}

/// Column-to-column equality expression: `from.table.column = to.table.column`
///
/// SeaQuery has no column-to-column `.equals()` on these string-shaped
/// refs, so this uses a custom expression. Table and column names come from
/// resolved descriptors and validated override strings, never raw user
/// input.
fn column_eq_expr(from: &ColumnRef, to: &ColumnRef) -> Expr {
    Expr::cust(format!("{} = {}", from, to))
}

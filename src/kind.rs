//! Record-kind descriptors.
//!
//! A [`RecordKind`] is the process-lifetime metadata for one kind of
//! persisted record: its table name, primary key column, timestamp policy
//! and relation declarations. Descriptors are created once at startup,
//! shared as `Arc<RecordKind>`, and never mutated afterwards — the lazily
//! resolved pieces (table name, relation mappings) are memoized in
//! `OnceCell` slots.
//!
//! Each descriptor owns its mapping slot independently. A record-kind that
//! specializes another must re-declare (or explicitly copy) its relations:
//! convention defaults are computed from the kind's own name, so sharing a
//! parent's slot would silently produce wrong join keys.

use crate::error::RelationError;
use crate::relation::declare::RelationDeclarations;
use crate::relation::def::RelationMappings;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// Relation declaration hook, run at most once per descriptor by the
/// mapping store.
pub type DeclareFn =
    Box<dyn Fn(&mut RelationDeclarations<'_>) -> Result<(), RelationError> + Send + Sync>;

/// Metadata descriptor for one record-kind.
///
/// Built via [`RecordKind::builder`]; every field has a convention default.
///
/// # Example
///
/// ```
/// use relmap::RecordKind;
///
/// let person = RecordKind::builder("Person").build().unwrap();
/// assert_eq!(person.table_name(), "Person");
/// assert_eq!(person.id_column(), "id");
/// assert!(person.timestamps_enabled());
/// ```
pub struct RecordKind {
    name: String,
    id_column: String,
    timestamps_enabled: bool,
    table_override: Option<String>,
    table_name: OnceCell<String>,
    declare: Option<DeclareFn>,
    mappings: OnceCell<RelationMappings>,
}

impl RecordKind {
    /// Start building a descriptor for the given record-kind name.
    pub fn builder(name: impl Into<String>) -> RecordKindBuilder {
        RecordKindBuilder {
            name: name.into(),
            id_column: "id".to_string(),
            timestamps_enabled: true,
            table_override: None,
            declare: None,
        }
    }

    /// The record-kind name conventions are derived from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved table name.
    ///
    /// Resolved once on first access — the explicit override if one was
    /// given, otherwise the kind's own name — and stable for the process
    /// lifetime afterwards.
    pub fn table_name(&self) -> &str {
        self.table_name.get_or_init(|| {
            self.table_override
                .clone()
                .unwrap_or_else(|| self.name.clone())
        })
    }

    /// The primary key column. Assumed pre-existing; defaults to `"id"`.
    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Whether lifecycle hooks stamp audit timestamps for this kind.
    pub fn timestamps_enabled(&self) -> bool {
        self.timestamps_enabled
    }

    pub(crate) fn declare_hook(&self) -> Option<&DeclareFn> {
        self.declare.as_ref()
    }

    pub(crate) fn mappings_slot(&self) -> &OnceCell<RelationMappings> {
        &self.mappings
    }
}

impl fmt::Debug for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordKind")
            .field("name", &self.name)
            .field("id_column", &self.id_column)
            .field("timestamps_enabled", &self.timestamps_enabled)
            .field("table_override", &self.table_override)
            .field(
                "declare",
                &if self.declare.is_some() { "Some" } else { "None" },
            )
            .field("mappings_resolved", &self.mappings.get().is_some())
            .finish()
    }
}

/// Builder for [`RecordKind`] descriptors.
pub struct RecordKindBuilder {
    name: String,
    id_column: String,
    timestamps_enabled: bool,
    table_override: Option<String>,
    declare: Option<DeclareFn>,
}

impl RecordKindBuilder {
    /// Override the table name (the convention default is the kind name).
    pub fn table_name(mut self, table: impl Into<String>) -> Self {
        self.table_override = Some(table.into());
        self
    }

    /// Override the primary key column (default `"id"`).
    pub fn id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = column.into();
        self
    }

    /// Enable or disable audit-timestamp stamping (default enabled).
    pub fn timestamps(mut self, enabled: bool) -> Self {
        self.timestamps_enabled = enabled;
        self
    }

    /// Install the relation declaration hook.
    ///
    /// The hook is invoked at most once, on first access to the kind's
    /// relation mappings, and receives the in-progress declaration set.
    ///
    /// # Example
    ///
    /// ```
    /// use relmap::{RecordKind, RelationOptions};
    ///
    /// let person = RecordKind::builder("Person")
    ///     .declare_relations(|rel| {
    ///         rel.owns_many("Pet", RelationOptions::default())
    ///     })
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn declare_relations<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut RelationDeclarations<'_>) -> Result<(), RelationError> + Send + Sync + 'static,
    {
        self.declare = Some(Box::new(hook));
        self
    }

    /// Validate and build the descriptor.
    ///
    /// # Errors
    ///
    /// Returns `RelationError::InvalidName` if the kind name, the id column
    /// or an explicit table override is empty.
    pub fn build(self) -> Result<Arc<RecordKind>, RelationError> {
        ensure_non_empty(&self.name)?;
        ensure_non_empty(&self.id_column)?;
        if let Some(table) = &self.table_override {
            ensure_non_empty(table)?;
        }
        Ok(Arc::new(RecordKind {
            name: self.name,
            id_column: self.id_column,
            timestamps_enabled: self.timestamps_enabled,
            table_override: self.table_override,
            table_name: OnceCell::new(),
            declare: self.declare,
            mappings: OnceCell::new(),
        }))
    }
}

fn ensure_non_empty(name: &str) -> Result<(), RelationError> {
    if name.trim().is_empty() {
        return Err(RelationError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let kind = RecordKind::builder("Person").build().unwrap();
        assert_eq!(kind.name(), "Person");
        assert_eq!(kind.table_name(), "Person");
        assert_eq!(kind.id_column(), "id");
        assert!(kind.timestamps_enabled());
    }

    #[test]
    fn test_table_name_override() {
        let kind = RecordKind::builder("Person")
            .table_name("persons")
            .build()
            .unwrap();
        assert_eq!(kind.name(), "Person");
        assert_eq!(kind.table_name(), "persons");
    }

    #[test]
    fn test_table_name_stable_after_resolution() {
        let kind = RecordKind::builder("Person").build().unwrap();
        let first = kind.table_name().to_string();
        let second = kind.table_name().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_id_column_and_timestamps() {
        let kind = RecordKind::builder("Session")
            .id_column("token")
            .timestamps(false)
            .build()
            .unwrap();
        assert_eq!(kind.id_column(), "token");
        assert!(!kind.timestamps_enabled());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            RecordKind::builder("").build(),
            Err(RelationError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_empty_overrides_rejected() {
        // EDGE CASE: empty explicit overrides are invalid names, not silent defaults.
        assert!(RecordKind::builder("Person").id_column("").build().is_err());
        assert!(RecordKind::builder("Person")
            .table_name(" ")
            .build()
            .is_err());
    }

    #[test]
    fn test_debug_elides_hook() {
        let kind = RecordKind::builder("Person")
            .declare_relations(|_| Ok(()))
            .build()
            .unwrap();
        let dbg = format!("{:?}", kind);
        assert!(dbg.contains("\"Some\""));
    }
}

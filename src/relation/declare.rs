//! Relation declaration resolver.
//!
//! [`RelationDeclarations`] is the in-progress mapping set handed to a
//! record-kind's `declare_relations` hook. Each of the four declaration
//! operations resolves its target, merges caller-supplied overrides with
//! naming-convention defaults, and appends one fully-specified
//! [`RelationMapping`] to the set.
//!
//! The direction of the conventional foreign key differs per relation
//! kind:
//!
//! | operation            | FK lives on | `from` default            | `to` default          |
//! |----------------------|-------------|---------------------------|-----------------------|
//! | `reference_to_one`   | owner       | target table, fk(owner)   | owner table, owner id |
//! | `owns_one`           | owner       | owner table, fk(target)   | target table, target id |
//! | `owns_many`          | target      | target table, fk(owner)   | owner table, owner id |
//! | `owns_many_through`  | join table  | owner table, owner id     | target table, target id |
//!
//! Declaring two relations under the same name silently overwrites the
//! earlier entry; this is documented behavior, not defended against.

use crate::error::RelationError;
use crate::kind::RecordKind;
use crate::naming;
use crate::relation::def::{
    ColumnRef, JoinSpec, RelationFilter, RelationKind, RelationMapping, RelationMappings,
    ThroughSpec,
};
use crate::resolver::{resolve_kind, KindLoader, KindRef};
use log::trace;

/// Caller-supplied overrides for a relation declaration.
///
/// Every field defaults to "use the convention". Join overrides are
/// `"Table.column"` strings.
///
/// # Example
///
/// ```
/// use relmap::RelationOptions;
///
/// let opts = RelationOptions::new()
///     .name("owner")
///     .from("Person.petId")
///     .to("Pet.id");
/// ```
#[derive(Default, Clone)]
pub struct RelationOptions {
    pub name: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub filter: Option<RelationFilter>,
}

impl RelationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the relation name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the `from` join column (`"Table.column"`).
    pub fn from(mut self, spec: impl Into<String>) -> Self {
        self.from = Some(spec.into());
        self
    }

    /// Override the `to` join column (`"Table.column"`).
    pub fn to(mut self, spec: impl Into<String>) -> Self {
        self.to = Some(spec.into());
        self
    }

    /// Attach a scope predicate to the relation.
    pub fn filter(mut self, filter: RelationFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Caller-supplied overrides for the join-table hop of
/// [`RelationDeclarations::owns_many_through`].
#[derive(Default, Clone)]
pub struct ThroughOptions {
    pub join_table: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub extra_columns: Vec<String>,
    pub filter: Option<RelationFilter>,
    pub kind: Option<KindRef>,
}

impl ThroughOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the join table name.
    pub fn join_table(mut self, table: impl Into<String>) -> Self {
        self.join_table = Some(table.into());
        self
    }

    /// Override the join-table column referencing the owner.
    pub fn from(mut self, spec: impl Into<String>) -> Self {
        self.from = Some(spec.into());
        self
    }

    /// Override the join-table column referencing the target.
    pub fn to(mut self, spec: impl Into<String>) -> Self {
        self.to = Some(spec.into());
        self
    }

    /// Carry extra join-table columns along with the relation.
    pub fn extra_columns(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a scope predicate to the join-table hop.
    pub fn filter(mut self, filter: RelationFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Model the join table as a record-kind of its own; its table name
    /// becomes the join table default.
    pub fn kind(mut self, kind: impl Into<KindRef>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// The in-progress mapping set handed to a `declare_relations` hook.
///
/// Holds the owning descriptor (whose name feeds convention defaults), the
/// module-loading collaborator for target resolution, and the mappings
/// built so far. All declaration errors propagate synchronously; a
/// partially-built set is never installed.
pub struct RelationDeclarations<'a> {
    owner: &'a RecordKind,
    loader: &'a dyn KindLoader,
    mappings: RelationMappings,
}

impl<'a> RelationDeclarations<'a> {
    pub(crate) fn new(owner: &'a RecordKind, loader: &'a dyn KindLoader) -> Self {
        RelationDeclarations {
            owner,
            loader,
            mappings: RelationMappings::new(),
        }
    }

    /// The record-kind whose relations are being declared.
    pub fn owner(&self) -> &RecordKind {
        self.owner
    }

    /// Declare a many-to-one relation: the owner references one target.
    ///
    /// The foreign key lives on the owner's table. With no overrides,
    /// owner `Pet` referencing target `Person` yields `from =
    /// "Person.petId"`, `to = "Pet.id"` and relation name `"person"`.
    pub fn reference_to_one(
        &mut self,
        target: impl Into<KindRef>,
        opts: RelationOptions,
    ) -> Result<(), RelationError> {
        let target = resolve_kind(target.into(), self.loader)?;
        let name = self.relation_name(opts.name, target.name(), false)?;
        let from = match opts.from {
            Some(spec) => ColumnRef::parse(&spec)?,
            None => ColumnRef::new(
                target.table_name(),
                naming::foreign_key_column_of(self.owner.name(), self.owner.id_column())?,
            ),
        };
        let to = match opts.to {
            Some(spec) => ColumnRef::parse(&spec)?,
            None => ColumnRef::new(self.owner.table_name(), self.owner.id_column()),
        };
        self.insert(RelationMapping {
            kind: RelationKind::ReferenceToOne,
            name,
            target,
            filter: opts.filter,
            join: JoinSpec {
                from,
                to,
                through: None,
            },
        });
        Ok(())
    }

    /// Declare a one-to-one relation: the owner has one target.
    ///
    /// The foreign key lives on the owner's table, named after the target.
    pub fn owns_one(
        &mut self,
        target: impl Into<KindRef>,
        opts: RelationOptions,
    ) -> Result<(), RelationError> {
        let target = resolve_kind(target.into(), self.loader)?;
        let name = self.relation_name(opts.name, target.name(), false)?;
        let from = match opts.from {
            Some(spec) => ColumnRef::parse(&spec)?,
            None => ColumnRef::new(
                self.owner.table_name(),
                naming::foreign_key_column_of(target.name(), target.id_column())?,
            ),
        };
        let to = match opts.to {
            Some(spec) => ColumnRef::parse(&spec)?,
            None => ColumnRef::new(target.table_name(), target.id_column()),
        };
        self.insert(RelationMapping {
            kind: RelationKind::OwnsOne,
            name,
            target,
            filter: opts.filter,
            join: JoinSpec {
                from,
                to,
                through: None,
            },
        });
        Ok(())
    }

    /// Declare a one-to-many relation: the owner has many targets.
    ///
    /// The foreign key lives on the target's table, named after the owner.
    /// With no overrides, owner `Person` owning many `Pet` yields relation
    /// name `"pets"`, `from = "Pet.personId"`, `to = "Person.id"`.
    pub fn owns_many(
        &mut self,
        target: impl Into<KindRef>,
        opts: RelationOptions,
    ) -> Result<(), RelationError> {
        let target = resolve_kind(target.into(), self.loader)?;
        let name = self.relation_name(opts.name, target.name(), true)?;
        let from = match opts.from {
            Some(spec) => ColumnRef::parse(&spec)?,
            None => ColumnRef::new(
                target.table_name(),
                naming::foreign_key_column_of(self.owner.name(), self.owner.id_column())?,
            ),
        };
        let to = match opts.to {
            Some(spec) => ColumnRef::parse(&spec)?,
            None => ColumnRef::new(self.owner.table_name(), self.owner.id_column()),
        };
        self.insert(RelationMapping {
            kind: RelationKind::OwnsMany,
            name,
            target,
            filter: opts.filter,
            join: JoinSpec {
                from,
                to,
                through: None,
            },
        });
        Ok(())
    }

    /// Declare a many-to-many relation through a join table.
    ///
    /// The join table name is the explicit override, else the through
    /// kind's table, else `"{owner}_{target}"` from the record-kind names
    /// in declaration order (owner first). Both join-table foreign keys
    /// default to the camel-case convention applied to owner and target
    /// respectively: `Person`/`Pet` yields join table `"Person_Pet"`,
    /// `through.from = "Person_Pet.personId"`, `through.to =
    /// "Person_Pet.petId"`.
    pub fn owns_many_through(
        &mut self,
        target: impl Into<KindRef>,
        opts: RelationOptions,
        through: ThroughOptions,
    ) -> Result<(), RelationError> {
        let target = resolve_kind(target.into(), self.loader)?;
        let name = self.relation_name(opts.name, target.name(), true)?;

        let through_kind = match through.kind {
            Some(kind) => Some(resolve_kind(kind, self.loader)?),
            None => None,
        };
        let join_table = match through.join_table {
            Some(table) => {
                if table.trim().is_empty() {
                    return Err(RelationError::InvalidJoinSpec {
                        spec: table,
                        reason: "join table override is empty".to_string(),
                    });
                }
                table
            }
            None => match &through_kind {
                Some(kind) => kind.table_name().to_string(),
                None => format!("{}_{}", self.owner.name(), target.name()),
            },
        };
        let through_from = match through.from {
            Some(spec) => ColumnRef::parse(&spec)?,
            None => ColumnRef::new(
                join_table.clone(),
                naming::foreign_key_column_of(self.owner.name(), self.owner.id_column())?,
            ),
        };
        let through_to = match through.to {
            Some(spec) => ColumnRef::parse(&spec)?,
            None => ColumnRef::new(
                join_table.clone(),
                naming::foreign_key_column_of(target.name(), target.id_column())?,
            ),
        };

        let from = match opts.from {
            Some(spec) => ColumnRef::parse(&spec)?,
            None => ColumnRef::new(self.owner.table_name(), self.owner.id_column()),
        };
        let to = match opts.to {
            Some(spec) => ColumnRef::parse(&spec)?,
            None => ColumnRef::new(target.table_name(), target.id_column()),
        };

        self.insert(RelationMapping {
            kind: RelationKind::OwnsManyThroughJoin,
            name,
            target,
            filter: opts.filter,
            join: JoinSpec {
                from,
                to,
                through: Some(ThroughSpec {
                    join_table,
                    from: through_from,
                    to: through_to,
                    extra_columns: through.extra_columns,
                    filter: through.filter,
                    through_kind,
                }),
            },
        });
        Ok(())
    }

    pub(crate) fn into_mappings(self) -> RelationMappings {
        self.mappings
    }

    fn relation_name(
        &self,
        explicit: Option<String>,
        target_name: &str,
        plural: bool,
    ) -> Result<String, RelationError> {
        match explicit {
            Some(name) => {
                if name.trim().is_empty() {
                    return Err(RelationError::InvalidName { name });
                }
                Ok(name)
            }
            None if plural => naming::relation_name_plural(target_name),
            None => naming::relation_name_singular(target_name),
        }
    }

    /// Keyed by name; a collision silently overwrites the earlier entry.
    fn insert(&mut self, mapping: RelationMapping) {
        trace!(
            "declared relation {:?} ({:?}) on record-kind {:?}",
            mapping.name,
            mapping.kind,
            self.owner.name()
        );
        self.mappings.insert(mapping.name.clone(), mapping);
    }
}

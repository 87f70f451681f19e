//! Relation mapping store.
//!
//! Lazy, memoized resolution of a record-kind's relation graph. The graph
//! is computed by running the kind's `declare_relations` hook exactly once;
//! the result is installed in the descriptor's own `OnceCell` slot and
//! returned on every later access without re-invoking the hook.
//!
//! Concurrency: a racing first access serializes on the descriptor's cell
//! only — there is no lock shared across unrelated descriptors. A failed
//! declaration installs nothing, so the next access retries the hook (e.g.
//! after the missing target kind becomes loadable).
//!
//! Slots are never shared between descriptors: convention defaults embed
//! the owner's own name, so a specialized record-kind re-declares from
//! scratch rather than inheriting its parent's graph.

use crate::error::RelationError;
use crate::kind::RecordKind;
use crate::relation::declare::RelationDeclarations;
use crate::relation::def::RelationMappings;
use crate::resolver::KindLoader;
use log::debug;

impl RecordKind {
    /// Get this kind's resolved relation graph, computing it on first
    /// access.
    ///
    /// The first call runs the `declare_relations` hook with the given
    /// loader; every relation declared during that single invocation is
    /// captured into the slot. Kinds without a hook resolve to an empty
    /// graph. Later calls return the cached graph untouched.
    ///
    /// # Errors
    ///
    /// Propagates any declaration-time error from the hook; the slot stays
    /// empty so a later access can retry once the underlying issue (for
    /// example an unregistered target kind) is fixed.
    pub fn relation_mappings(
        &self,
        loader: &dyn KindLoader,
    ) -> Result<&RelationMappings, RelationError> {
        self.mappings_slot().get_or_try_init(|| {
            debug!("resolving relation mappings for record-kind {:?}", self.name());
            let mut declarations = RelationDeclarations::new(self, loader);
            if let Some(hook) = self.declare_hook() {
                hook(&mut declarations)?;
            }
            let mappings = declarations.into_mappings();
            debug!(
                "record-kind {:?} resolved {} relation(s)",
                self.name(),
                mappings.len()
            );
            Ok(mappings)
        })
    }

    /// Install an explicit relation graph, bypassing the hook entirely.
    ///
    /// First write wins: returns `true` if the graph was installed, `false`
    /// if the slot was already populated (by a previous set or by lazy
    /// resolution), in which case the existing graph is kept and the hook
    /// is never invoked afterwards either way.
    pub fn set_relation_mappings(&self, mappings: RelationMappings) -> bool {
        self.mappings_slot().set(mappings).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::declare::RelationOptions;
    use crate::relation::def::{ColumnRef, JoinSpec, RelationKind, RelationMapping};
    use crate::resolver::KindRegistry;
    use crate::tests_cfg;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_person(counter: Arc<AtomicUsize>) -> Arc<RecordKind> {
        RecordKind::builder("Person")
            .declare_relations(move |rel| {
                counter.fetch_add(1, Ordering::SeqCst);
                rel.owns_many("Pet", RelationOptions::default())
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_hook_runs_exactly_once() {
        let registry = tests_cfg::registry();
        let counter = Arc::new(AtomicUsize::new(0));
        let person = counting_person(counter.clone());

        let first = person.relation_mappings(&registry).unwrap();
        assert_eq!(first.len(), 1);
        let second = person.relation_mappings(&registry).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        // Same cached graph, not a recomputation.
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_kind_without_hook_resolves_empty_graph() {
        let registry = tests_cfg::registry();
        let movie = tests_cfg::plain_kind("Movie");
        let mappings = movie.relation_mappings(&registry).unwrap();
        assert!(mappings.is_empty());
    }

    #[test]
    fn test_failed_declaration_leaves_slot_empty_for_retry() {
        // EDGE CASE: the first access fails because the target is not yet
        // loadable; once it is, the next access retries and succeeds.
        let registry = KindRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let person = counting_person(counter.clone());

        let err = person.relation_mappings(&registry).unwrap_err();
        assert!(matches!(err, RelationError::UnresolvedKind { .. }));

        registry.insert(tests_cfg::plain_kind("Pet"));
        let mappings = person.relation_mappings(&registry).unwrap();
        assert_eq!(mappings.len(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_set_relation_mappings_bypasses_hook() {
        let registry = tests_cfg::registry();
        let counter = Arc::new(AtomicUsize::new(0));
        let person = counting_person(counter.clone());
        let pet = tests_cfg::plain_kind("Pet");

        let mut explicit = RelationMappings::new();
        explicit.insert(
            "companions".to_string(),
            RelationMapping {
                kind: RelationKind::OwnsMany,
                name: "companions".to_string(),
                target: pet,
                filter: None,
                join: JoinSpec {
                    from: ColumnRef::new("Pet", "personId"),
                    to: ColumnRef::new("Person", "id"),
                    through: None,
                },
            },
        );
        assert!(person.set_relation_mappings(explicit));

        let mappings = person.relation_mappings(&registry).unwrap();
        assert!(mappings.contains_key("companions"));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_set_after_population_is_rejected() {
        let registry = tests_cfg::registry();
        let person = counting_person(Arc::new(AtomicUsize::new(0)));
        person.relation_mappings(&registry).unwrap();
        assert!(!person.set_relation_mappings(RelationMappings::new()));
        // The lazily resolved graph survives.
        assert_eq!(person.relation_mappings(&registry).unwrap().len(), 1);
    }

    #[test]
    fn test_slots_are_independent_across_kinds() {
        // Two kinds declaring the same relation name get non-interfering
        // graphs with join keys derived from their own names.
        let registry = tests_cfg::registry();
        registry.insert(tests_cfg::plain_kind("Toy"));
        let person = RecordKind::builder("Person")
            .declare_relations(|rel| rel.owns_many("Toy", RelationOptions::new().name("things")))
            .build()
            .unwrap();
        let pet = RecordKind::builder("Pet")
            .declare_relations(|rel| rel.owns_many("Toy", RelationOptions::new().name("things")))
            .build()
            .unwrap();

        let person_things = &person.relation_mappings(&registry).unwrap()["things"];
        let pet_things = &pet.relation_mappings(&registry).unwrap()["things"];
        assert_eq!(person_things.join.from.to_string(), "Toy.personId");
        assert_eq!(pet_things.join.from.to_string(), "Toy.petId");
    }

    #[test]
    fn test_pet_store_graph_round_trip() {
        let registry = tests_cfg::registry();

        let person = tests_cfg::person();
        let graph = person.relation_mappings(&registry).unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph["pets"].join.from.to_string(), "Pet.personId");
        assert_eq!(graph["pets"].join.to.to_string(), "Person.id");
        let through = graph["movies"].join.through.as_ref().unwrap();
        assert_eq!(through.join_table, "Person_Movie");
        assert_eq!(through.from.to_string(), "Person_Movie.personId");
        assert_eq!(through.to.to_string(), "Person_Movie.movieId");

        let pet = tests_cfg::pet();
        let graph = pet.relation_mappings(&registry).unwrap();
        assert_eq!(graph["person"].join.from.to_string(), "Person.petId");
        assert_eq!(graph["person"].join.to.to_string(), "Pet.id");
    }

    #[test]
    fn test_concurrent_first_access_installs_one_graph() {
        let registry = tests_cfg::registry();
        let counter = Arc::new(AtomicUsize::new(0));
        let person = counting_person(counter.clone());

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    person.relation_mappings(&registry).unwrap();
                });
            }
        });
        // The cell serializes first access per descriptor; the hook ran once.
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(person.relation_mappings(&registry).unwrap().len(), 1);
    }
}

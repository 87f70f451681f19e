//! Naming convention engine.
//!
//! Pure functions converting record-kind names into table names, camel-cased
//! foreign-key column names, and pluralized relation names. No I/O and no
//! state; the only failure mode is a malformed (empty) input name.
//!
//! # Conventions
//!
//! - Table name: identity — the table is named after the record-kind unless
//!   explicitly overridden on the descriptor.
//! - Foreign key column: lowerCamelCase of the owner name, followed by
//!   UpperCamelCase of the id column. `("Person", "id")` → `"personId"`.
//! - Relation names: lowerCamelCase of the target name, pluralized for
//!   to-many relations.

use crate::error::RelationError;
use convert_case::{Case, Casing};

/// Derive the default table name for a record-kind.
///
/// The convention is identity: the table is named after the record-kind.
/// An explicit override on the descriptor takes precedence over this.
///
/// # Errors
///
/// Returns `RelationError::InvalidName` if the name is empty or whitespace.
pub fn table_name_of(kind_name: &str) -> Result<String, RelationError> {
    ensure_name(kind_name)?;
    Ok(kind_name.to_string())
}

/// Derive the conventional foreign-key column pointing at `owner_name`.
///
/// The result is lowerCamelCase of the owner name concatenated with
/// UpperCamelCase of the id column.
///
/// # Example
///
/// ```
/// use relmap::naming::foreign_key_column_of;
///
/// assert_eq!(foreign_key_column_of("Person", "id").unwrap(), "personId");
/// ```
pub fn foreign_key_column_of(owner_name: &str, id_column: &str) -> Result<String, RelationError> {
    ensure_name(owner_name)?;
    ensure_name(id_column)?;
    Ok(format!(
        "{}{}",
        owner_name.to_case(Case::Camel),
        id_column.to_case(Case::Pascal)
    ))
}

/// Derive the default relation name for a to-one relation.
pub fn relation_name_singular(target_name: &str) -> Result<String, RelationError> {
    ensure_name(target_name)?;
    Ok(target_name.to_case(Case::Camel))
}

/// Derive the default relation name for a to-many relation.
///
/// This is the singular relation name run through a best-effort English
/// pluralization heuristic. Irregular plurals are not guaranteed correct
/// (`"Person"` → `"persons"`); this is a documented limitation of the
/// convention, not something the engine tries to fix.
pub fn relation_name_plural(target_name: &str) -> Result<String, RelationError> {
    let singular = relation_name_singular(target_name)?;
    Ok(pluralize(&singular))
}

/// Best-effort English pluralization.
///
/// Rules, in order: sibilant endings (`s`, `x`, `z`, `ch`, `sh`) take `es`;
/// consonant + `y` becomes `ies`; everything else takes `s`.
fn pluralize(word: &str) -> String {
    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{}es", word);
    }
    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last();
        let vowel = matches!(before, Some('a' | 'e' | 'i' | 'o' | 'u'));
        if !vowel && before.is_some() {
            return format!("{}ies", stem);
        }
    }
    format!("{}s", word)
}

fn ensure_name(name: &str) -> Result<(), RelationError> {
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
    fn test_table_name_is_identity() {
        assert_eq!(table_name_of("Person").unwrap(), "Person");
        assert_eq!(table_name_of("Pet").unwrap(), "Pet");
    }

    #[test]
    fn test_foreign_key_column_convention() {
        assert_eq!(foreign_key_column_of("Person", "id").unwrap(), "personId");
        assert_eq!(foreign_key_column_of("Pet", "id").unwrap(), "petId");
    }

    #[test]
    fn test_foreign_key_column_custom_id() {
        assert_eq!(
            foreign_key_column_of("Person", "uuid").unwrap(),
            "personUuid"
        );
    }

    #[test]
    fn test_foreign_key_column_deterministic() {
        // Calling twice with the same inputs yields the same string.
        let first = foreign_key_column_of("Person", "id").unwrap();
        let second = foreign_key_column_of("Person", "id").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_relation_name_singular() {
        assert_eq!(relation_name_singular("Person").unwrap(), "person");
        assert_eq!(
            relation_name_singular("MovieReview").unwrap(),
            "movieReview"
        );
    }

    #[test]
    fn test_relation_name_plural() {
        assert_eq!(relation_name_plural("Pet").unwrap(), "pets");
        assert_eq!(relation_name_plural("Movie").unwrap(), "movies");
    }

    #[test]
    fn test_pluralize_sibilant_endings() {
        assert_eq!(pluralize("bus"), "buses");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("match"), "matches");
        assert_eq!(pluralize("wish"), "wishes");
    }

    #[test]
    fn test_pluralize_consonant_y() {
        assert_eq!(pluralize("category"), "categories");
    }

    #[test]
    fn test_pluralize_vowel_y() {
        assert_eq!(pluralize("day"), "days");
    }

    #[test]
    fn test_pluralize_is_best_effort() {
        // EDGE CASE: irregular plurals stay regular; documented limitation.
        assert_eq!(pluralize("person"), "persons");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            table_name_of(""),
            Err(RelationError::InvalidName { .. })
        ));
        assert!(matches!(
            foreign_key_column_of("", "id"),
            Err(RelationError::InvalidName { .. })
        ));
        assert!(matches!(
            foreign_key_column_of("Person", "  "),
            Err(RelationError::InvalidName { .. })
        ));
        assert!(matches!(
            relation_name_plural(""),
            Err(RelationError::InvalidName { .. })
        ));
    }
}

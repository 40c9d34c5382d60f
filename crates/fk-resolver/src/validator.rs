// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::ops::Deref;

use schema_model::Entity;

use crate::{
    error::ReferenceError,
    reference::{Reference, ReferenceKind},
};

/// A reference whose target is known to be unique. Only validated references are emitted.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedReference<'a>(Reference<'a>);

impl<'a> Deref for ValidatedReference<'a> {
    type Target = Reference<'a>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Check that the target of `reference` is unique.
///
/// Implicit references target the identity field, which is unique by construction. Explicit
/// references must target a `@unique` field (or the identity field itself).
pub fn validate(reference: Reference<'_>) -> Result<ValidatedReference<'_>, ReferenceError> {
    match reference.kind() {
        ReferenceKind::Implicit => Ok(ValidatedReference(reference)),
        ReferenceKind::Explicit => {
            let target_entity = reference.target_entity();
            let target_field = reference.target_field();

            if target_entity.is_unique(target_field) {
                Ok(ValidatedReference(reference))
            } else {
                Err(ReferenceError::NonUniqueTarget {
                    entity: reference.source_entity().name.clone(),
                    field: reference.source_field().name.clone(),
                    target_entity: target_entity.name.clone(),
                    target_field: target_field.name.clone(),
                })
            }
        }
    }
}

/// Each list reference needs its own join table; cap how many an entity may have.
pub fn validate_list_references(
    entity: &Entity,
    list_references: usize,
    max: usize,
) -> Result<(), ReferenceError> {
    if list_references > max {
        Err(ReferenceError::TooManyListReferences {
            entity: entity.name.clone(),
            count: list_references,
            max,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{reference::ReferenceResolver, test_util::schema_from_src};
    use multiplatform_test::multiplatform_test;

    const SCHEMA: &str = r#"
        type Book @entity {
            id: ID!
            name: Charfield!
            isbn: Charfield! @unique
        }

        type Library @entity {
            id: ID!
            by_default: Book!
            by_name: Book! @join(on: name)
            by_isbn: Book! @join(on: isbn)
            by_id: Book! @join(on: id)
        }
    "#;

    fn validate_field(field: &str) -> Result<String, ReferenceError> {
        let schema = schema_from_src(SCHEMA);
        let library = schema.get_by_name("Library").unwrap();
        let reference =
            ReferenceResolver::new(&schema).resolve(library, library.field(field).unwrap())?;

        validate(reference).map(|validated| validated.target_id())
    }

    #[multiplatform_test]
    fn implicit_is_always_valid() {
        assert_eq!(validate_field("by_default").unwrap(), "Book.id");
    }

    #[multiplatform_test]
    fn explicit_requires_unique_target() {
        assert_eq!(validate_field("by_isbn").unwrap(), "Book.isbn");
        assert_eq!(
            validate_field("by_name").unwrap_err(),
            ReferenceError::NonUniqueTarget {
                entity: "Library".to_string(),
                field: "by_name".to_string(),
                target_entity: "Book".to_string(),
                target_field: "name".to_string(),
            }
        );
    }

    #[multiplatform_test]
    fn explicit_join_on_identity_is_valid() {
        assert_eq!(validate_field("by_id").unwrap(), "Book.id");
    }

    #[multiplatform_test]
    fn list_reference_limit() {
        let schema = schema_from_src(SCHEMA);
        let library = schema.get_by_name("Library").unwrap();

        assert!(validate_list_references(library, 10, 10).is_ok());
        assert_eq!(
            validate_list_references(library, 11, 10),
            Err(ReferenceError::TooManyListReferences {
                entity: "Library".to_string(),
                count: 11,
                max: 10,
            })
        );
    }
}

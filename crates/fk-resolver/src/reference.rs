// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Classify entity-typed fields and find the field they bind to.
//!
//! For `Library.book: Book` (no directive), the reference is implicit and binds to `Book.id`.
//! For `Library.book: Book @join(on: name)`, the reference is explicit and binds to `Book.name`.

use serde::{Deserialize, Serialize};
use tracing::trace;

use schema_model::{Entity, EntitySchema, Field, naming};

use crate::error::ReferenceError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Bound to the target's identity field.
    Implicit,
    /// Bound to the field named by `@join(on: ...)`.
    Explicit,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// A column in the source table (`book: Book`).
    One,
    /// A join table between source and target (`books: [Book!]!`).
    Many,
}

/// How a field selects its target column, as declared by its directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSpec<'a> {
    Implicit,
    Explicit { on: &'a str },
}

impl<'a> JoinSpec<'a> {
    pub fn of(field: &'a Field) -> Self {
        match field.join_on() {
            Some(on) => JoinSpec::Explicit { on },
            None => JoinSpec::Implicit,
        }
    }

    pub fn kind(&self) -> ReferenceKind {
        match self {
            JoinSpec::Implicit => ReferenceKind::Implicit,
            JoinSpec::Explicit { .. } => ReferenceKind::Explicit,
        }
    }
}

/// A resolved (but not yet validated) reference from a source field to a target field.
///
/// Borrowed from the schema; references are recomputed on every resolution and never stored.
#[derive(Debug, Clone, Copy)]
pub struct Reference<'a> {
    pub(crate) source_entity: &'a Entity,
    pub(crate) source_field: &'a Field,
    pub(crate) target_entity: &'a Entity,
    pub(crate) target_field: &'a Field,
    pub(crate) kind: ReferenceKind,
    pub(crate) cardinality: Cardinality,
}

impl<'a> Reference<'a> {
    pub fn source_entity(&self) -> &'a Entity {
        self.source_entity
    }

    pub fn source_field(&self) -> &'a Field {
        self.source_field
    }

    pub fn target_entity(&self) -> &'a Entity {
        self.target_entity
    }

    pub fn target_field(&self) -> &'a Field {
        self.target_field
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn source_id(&self) -> String {
        naming::field_id(&self.source_entity.name, &self.source_field.name)
    }

    pub fn target_id(&self) -> String {
        naming::field_id(&self.target_entity.name, &self.target_field.name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    schema: &'a EntitySchema,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(schema: &'a EntitySchema) -> Self {
        Self { schema }
    }

    /// Whether the field should become a foreign key: its innermost type is an entity that is not
    /// virtual. Fields typed by an entity missing from the schema count, so that resolving them
    /// reports the problem.
    pub fn is_reference(&self, field: &Field) -> bool {
        field.typ.is_entity()
            && self
                .schema
                .get_by_name(field.type_name())
                .is_none_or(|target| !target.is_virtual)
    }

    /// Resolve `field` (declared on `entity`) to the field it binds to.
    pub fn resolve(
        &self,
        entity: &'a Entity,
        field: &'a Field,
    ) -> Result<Reference<'a>, ReferenceError> {
        if !field.typ.is_entity() {
            return Err(not_a_reference(entity, field));
        }

        let target_entity = self.schema.get_by_name(field.type_name()).ok_or_else(|| {
            ReferenceError::UnknownEntity {
                entity: entity.name.clone(),
                field: field.name.clone(),
                target_entity: field.type_name().to_string(),
            }
        })?;

        if target_entity.is_virtual {
            return Err(not_a_reference(entity, field));
        }

        let join = JoinSpec::of(field);

        let target_field = match join {
            JoinSpec::Implicit => target_entity.identity_field().ok_or_else(|| {
                ReferenceError::MissingIdentity {
                    entity: entity.name.clone(),
                    field: field.name.clone(),
                    target_entity: target_entity.name.clone(),
                }
            })?,
            JoinSpec::Explicit { on } => {
                let target_field = target_entity.field(on).ok_or_else(|| {
                    ReferenceError::UnresolvedTarget {
                        entity: entity.name.clone(),
                        field: field.name.clone(),
                        target_entity: target_entity.name.clone(),
                        target_field: on.to_string(),
                    }
                })?;

                // List and entity-typed fields have no column of their own to reference
                if target_field.typ.is_list() || target_field.typ.is_entity() {
                    return Err(ReferenceError::NonScalarTarget {
                        entity: entity.name.clone(),
                        field: field.name.clone(),
                        target_entity: target_entity.name.clone(),
                        target_field: target_field.name.clone(),
                    });
                }
                target_field
            }
        };

        let cardinality = if field.typ.is_list() {
            // The join table's parent column is the source's identity
            if entity.identity_field().is_none() {
                return Err(ReferenceError::MissingParentIdentity {
                    entity: entity.name.clone(),
                    field: field.name.clone(),
                });
            }
            Cardinality::Many
        } else {
            Cardinality::One
        };

        let reference = Reference {
            source_entity: entity,
            source_field: field,
            target_entity,
            target_field,
            kind: join.kind(),
            cardinality,
        };

        trace!(
            source = %reference.source_id(),
            target = %reference.target_id(),
            kind = ?reference.kind,
            "Resolved reference"
        );

        Ok(reference)
    }

    /// Resolve every reference field of `entity`, in field order. Fields that are not references
    /// (scalars, enums, virtual entities) are skipped.
    ///
    /// List references of a union member are realised by the union's join table, so they are
    /// skipped on the member.
    pub fn references(
        &self,
        entity: &'a Entity,
    ) -> impl Iterator<Item = Result<Reference<'a>, ReferenceError>> + use<'a> {
        let resolver = *self;
        let union_member = self.schema.is_union_member(&entity.name);

        entity
            .fields
            .iter()
            .filter(move |field| resolver.is_reference(field))
            .filter(move |field| {
                let skip = union_member && field.typ.is_list();
                if skip {
                    trace!(
                        field = %naming::field_id(&entity.name, &field.name),
                        "Skipping list reference of union member"
                    );
                }
                !skip
            })
            .map(move |field| resolver.resolve(entity, field))
    }
}

fn not_a_reference(entity: &Entity, field: &Field) -> ReferenceError {
    ReferenceError::NotAReference {
        entity: entity.name.clone(),
        field: field.name.clone(),
    }
}

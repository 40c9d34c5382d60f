// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use fk_resolver::{ConstraintSet, ResolutionError, ResolverConfig, resolve_constraints};
use schema_model::EntitySchema;

pub fn build_schema(src: &str) -> EntitySchema {
    schema_builder::build_from_src("fuel", "explorer", src).unwrap()
}

pub fn resolve(src: &str) -> Result<ConstraintSet, ResolutionError> {
    resolve_constraints(&build_schema(src), &ResolverConfig::default())
}

/// A `Library` entity referencing a `Book` entity through a single `book` field.
pub fn library_schema(book_fields: &str, book_annotation: &str) -> String {
    format!(
        r#"
        type Book @entity {{
            {book_fields}
        }}

        type Library @entity {{
            id: ID!
            book: Book! {book_annotation}
        }}
        "#
    )
}

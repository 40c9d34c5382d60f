// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Build an [`EntitySchema`](schema_model::EntitySchema) from a GraphQL service document.
//!
//! Text is turned into a syntax tree by `async-graphql-parser`; this crate interprets that tree:
//! `@entity` object types become entities, unions become entities derived from their members,
//! enums and scalars are registered by name, and field directives (`@unique`, `@join`) are
//! carried over to the model.

mod builder;
pub mod error;
pub mod scalars;

pub use builder::{build_from_document, build_from_src, schema_version};
pub use error::SchemaBuildingError;

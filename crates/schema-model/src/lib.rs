// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! In-memory model of an indexer schema.
//!
//! An [`EntitySchema`] holds the `@entity` types of a GraphQL schema together with their fields
//! and directives. It is built once (see the `schema-builder` crate) and only read afterwards.

pub mod directive;
pub mod entity;
pub mod naming;
pub mod schema;
pub mod types;

pub use directive::FieldDirective;
pub use entity::{Entity, Field};
pub use schema::{EntityId, EntitySchema};
pub use types::{FieldType, NamedType, TypeKind};

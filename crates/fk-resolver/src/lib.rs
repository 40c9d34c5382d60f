// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Resolve entity references of an indexer schema into foreign-key constraints.
//!
//! A field typed by another entity is a foreign key. Without a directive it binds to the target's
//! identity field (`id`); with `@join(on: field)` it binds to the named field, which must be
//! `@unique`. The pipeline is:
//!
//! - [`reference`]: classify each entity-typed field and find its target field
//! - [`validator`]: check that the target is unique
//! - [`emitter`]: produce storage-facing constraint descriptors (and their DDL)
//! - [`system`]: run the above over a whole schema, collecting every error

pub mod config;
pub mod emitter;
pub mod error;
pub mod reference;
pub mod system;
pub mod validator;

pub use config::{
    Environment, MapEnvironment, ReferentialAction, ResolverConfig, SystemEnvironment,
};
pub use emitter::{ForeignKeyConstraint, JoinTable, emit};
pub use error::{ConfigError, ReferenceError, ResolutionError};
pub use reference::{Cardinality, JoinSpec, Reference, ReferenceKind, ReferenceResolver};
pub use system::{ConstraintSet, resolve_constraints};
pub use validator::{ValidatedReference, validate, validate_list_references};

#[cfg(test)]
mod test_util;

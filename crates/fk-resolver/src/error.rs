// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

/// A reference that cannot become a foreign-key constraint. The schema must be fixed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error(
        "Field '{entity}.{field}' joins on '{target_entity}.{target_field}', which does not exist"
    )]
    UnresolvedTarget {
        entity: String,
        field: String,
        target_entity: String,
        target_field: String,
    },

    #[error("Field '{entity}.{field}' references '{target_entity}', which has no identity field")]
    MissingIdentity {
        entity: String,
        field: String,
        target_entity: String,
    },

    #[error(
        "Field '{entity}.{field}' joins on '{target_entity}.{target_field}', which is not marked @unique"
    )]
    NonUniqueTarget {
        entity: String,
        field: String,
        target_entity: String,
        target_field: String,
    },

    #[error(
        "Field '{entity}.{field}' joins on '{target_entity}.{target_field}', which is not a scalar column"
    )]
    NonScalarTarget {
        entity: String,
        field: String,
        target_entity: String,
        target_field: String,
    },

    #[error("Field '{entity}.{field}' does not reference an entity with a table")]
    NotAReference { entity: String, field: String },

    #[error("Field '{entity}.{field}' references unknown entity '{target_entity}'")]
    UnknownEntity {
        entity: String,
        field: String,
        target_entity: String,
    },

    #[error("Field '{entity}.{field}' is a list reference, but '{entity}' has no identity field")]
    MissingParentIdentity { entity: String, field: String },

    #[error("Entity '{entity}' has {count} list references, but at most {max} are allowed")]
    TooManyListReferences {
        entity: String,
        count: usize,
        max: usize,
    },
}

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Found {} invalid reference(s)", .0.len())]
    Invalid(Vec<ReferenceError>),
}

impl ResolutionError {
    pub fn errors(&self) -> &[ReferenceError] {
        match self {
            ResolutionError::Invalid(errors) => errors,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Invalid value for {key}: {value}. Expected one of 'no action', 'cascade', 'set null', 'restrict'"
    )]
    InvalidReferentialAction { key: &'static str, value: String },

    #[error("Invalid value for {key}: {value}. Expected a positive integer")]
    InvalidNumber { key: &'static str, value: String },
}

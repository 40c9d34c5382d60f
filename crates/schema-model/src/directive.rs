// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

pub const ENTITY_DIRECTIVE: &str = "entity";
pub const VIRTUAL_ARGUMENT: &str = "virtual";

pub const JOIN_DIRECTIVE: &str = "join";
pub const JOIN_ON_ARGUMENT: &str = "on";

pub const UNIQUE_DIRECTIVE: &str = "unique";

/// A directive attached to an entity field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum FieldDirective {
    /// `@unique`: the column carries a uniqueness constraint.
    Unique,
    /// `@join(on: name)`: the field is an explicit foreign key bound to `on` in the referenced entity.
    Join { on: String },
    /// Any other directive. Kept by name so that the model reflects the source schema.
    Other(String),
}

impl FieldDirective {
    pub fn name(&self) -> &str {
        match self {
            FieldDirective::Unique => UNIQUE_DIRECTIVE,
            FieldDirective::Join { .. } => JOIN_DIRECTIVE,
            FieldDirective::Other(name) => name,
        }
    }
}

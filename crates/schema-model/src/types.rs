// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// What a named type in the schema refers to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Enum,
    Entity,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    pub name: String,
    pub kind: TypeKind,
}

impl NamedType {
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Scalar,
        }
    }

    pub fn entity(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Entity,
        }
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Enum,
        }
    }
}

/// Declared type of a field.
///
/// Mirrors GraphQL type syntax with nullability made explicit: `Book!` is `Plain(Book)`, `Book`
/// is `Optional(Plain(Book))` and `[Book!]!` is `List(Plain(Book))`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Plain(NamedType),
    Optional(Box<FieldType>),
    List(Box<FieldType>),
}

impl FieldType {
    pub fn innermost(&self) -> &NamedType {
        match self {
            FieldType::Plain(named) => named,
            FieldType::Optional(underlying) | FieldType::List(underlying) => underlying.innermost(),
        }
    }

    /// Whether the field itself may be null (the outermost wrapper is `Optional`).
    pub fn is_nullable(&self) -> bool {
        matches!(self, FieldType::Optional(_))
    }

    /// Whether the field holds a list, possibly behind an `Optional`.
    pub fn is_list(&self) -> bool {
        match self {
            FieldType::List(_) => true,
            FieldType::Optional(underlying) => underlying.is_list(),
            FieldType::Plain(_) => false,
        }
    }

    pub fn is_entity(&self) -> bool {
        self.innermost().kind == TypeKind::Entity
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn fmt_base(typ: &FieldType, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match typ {
                FieldType::Plain(named) => write!(f, "{}", named.name),
                FieldType::List(inner) => write!(f, "[{inner}]"),
                FieldType::Optional(inner) => fmt_base(inner, f),
            }
        }

        match self {
            FieldType::Optional(underlying) => fmt_base(underlying, f),
            _ => {
                fmt_base(self, f)?;
                write!(f, "!")
            }
        }
    }
}

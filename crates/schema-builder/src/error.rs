// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::Pos;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaBuildingError {
    #[error("Could not parse schema: {0}")]
    Parse(#[from] async_graphql_parser::Error),

    #[error("Type '{name}' at {pos} is a {kind}, which is not supported in an indexer schema")]
    UnsupportedTypeKind {
        name: String,
        kind: &'static str,
        pos: Pos,
    },

    #[error("Type '{name}' at {pos} is already defined")]
    DuplicateType { name: String, pos: Pos },

    #[error("Field '{field_id}' at {pos} is already defined")]
    DuplicateField { field_id: String, pos: Pos },

    #[error("Field '{field_id}' at {pos} has type '{type_name}', which is not a scalar, enum or entity")]
    UnknownType {
        field_id: String,
        type_name: String,
        pos: Pos,
    },

    #[error("Union '{union_name}' at {pos} has member '{member}', which is not an @entity object type")]
    InvalidUnionMember {
        union_name: String,
        member: String,
        pos: Pos,
    },

    #[error("Union '{name}' at {pos} mixes virtual and non-virtual members")]
    InconsistentVirtualUnion { name: String, pos: Pos },

    #[error("Field '{field_id}' at {pos} is declared with different types by the union's members")]
    ConflictingUnionField { field_id: String, pos: Pos },

    #[error("Invalid @join on field '{field_id}' at {pos}: {message}")]
    InvalidJoinDirective {
        field_id: String,
        message: String,
        pos: Pos,
    },
}

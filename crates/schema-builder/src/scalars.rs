// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

/// Scalars every indexer schema may use without declaring them.
pub const BASE_SCALARS: &[&str] = &[
    "ID",
    "Address",
    "AssetId",
    "Blob",
    "Boolean",
    "Bytes",
    "Bytes4",
    "Bytes8",
    "Bytes32",
    "Bytes64",
    "Charfield",
    "ContractId",
    "Float",
    "HexString",
    "Identity",
    "Int",
    "Int1",
    "Int4",
    "Int8",
    "Int16",
    "Json",
    "Nonce",
    "Signature",
    "String",
    "Tai64Timestamp",
    "Timestamp",
    "UInt1",
    "UInt4",
    "UInt8",
    "UInt16",
    "Virtual",
];

pub fn is_base_scalar(name: &str) -> bool {
    BASE_SCALARS.contains(&name)
}

// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use schema_model::EntitySchema;

pub(crate) fn schema_from_src(src: &str) -> EntitySchema {
    schema_builder::build_from_src("fuel", "explorer", src).unwrap()
}

// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Naming conventions shared by the builder and the constraint emitter.

/// Table backing an entity: the entity name, lowercased.
pub fn table_name(entity_name: &str) -> String {
    entity_name.to_lowercase()
}

/// Fully qualified name of a field (`Library.book`).
pub fn field_id(entity_name: &str, field_name: &str) -> String {
    format!("{entity_name}.{field_name}")
}

/// Database schema holding an indexer's tables.
pub fn fully_qualified_namespace(namespace: &str, identifier: &str) -> String {
    format!("{namespace}_{identifier}")
}

/// Join table realising a list reference from `parent_table` to `child_table`.
pub fn join_table_name(parent_table: &str, child_table: &str) -> String {
    format!("{parent_table}s_{child_table}s")
}

/// Column of a join table pointing at `column` of `table`.
pub fn join_column_name(table: &str, column: &str) -> String {
    format!("{table}_{column}")
}

/// Child column of a join table. When a list references its own entity, the child column is
/// prefixed so that it does not collide with the parent column.
pub fn child_join_column_name(
    parent_table: &str,
    child_table: &str,
    child_column: &str,
) -> String {
    let column = join_column_name(child_table, child_column);
    if parent_table == child_table {
        format!("child_{column}")
    } else {
        column
    }
}

pub fn foreign_key_constraint_name(
    table: &str,
    column: &str,
    ref_table: &str,
    ref_column: &str,
) -> String {
    format!("fk_{table}_{column}__{ref_table}_{ref_column}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiplatform_test::multiplatform_test;

    #[multiplatform_test]
    fn names() {
        assert_eq!(table_name("LibraryBook"), "librarybook");
        assert_eq!(field_id("Library", "book"), "Library.book");
        assert_eq!(fully_qualified_namespace("fuel", "explorer"), "fuel_explorer");
        assert_eq!(join_table_name("wallet", "account"), "wallets_accounts");
        assert_eq!(join_column_name("account", "id"), "account_id");
        assert_eq!(child_join_column_name("wallet", "account", "id"), "account_id");
        assert_eq!(child_join_column_name("node", "node", "id"), "child_node_id");
        assert_eq!(
            foreign_key_constraint_name("library", "book", "book", "id"),
            "fk_library_book__book_id"
        );
    }
}

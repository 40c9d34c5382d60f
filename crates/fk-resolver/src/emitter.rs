// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Turn validated references into constraint descriptors for the storage layer.

use serde::{Deserialize, Serialize};

use schema_model::naming;

use crate::{
    config::ResolverConfig,
    reference::{Cardinality, ReferenceKind},
    validator::ValidatedReference,
};

/// Identity fields are declared `ID` but stored as `UInt8`.
const IDENTITY_TYPE: &str = "ID";
const IDENTITY_COLUMN_TYPE: &str = "UInt8";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyConstraint {
    pub source_entity: String,
    pub source_field: String,
    pub target_entity: String,
    pub target_field: String,

    pub kind: ReferenceKind,
    pub cardinality: Cardinality,

    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    /// Scalar type of the referencing column (same as the referenced column).
    pub column_type: String,
    pub nullable: bool,

    /// Set for `Cardinality::Many`; the constraints then live on this table.
    pub join_table: Option<JoinTable>,
}

/// Join table realising a list reference.
///
/// For `Wallet.accounts: [Account!]!` this is `wallets_accounts(wallet_id, account_id)` with
/// `wallet_id -> wallet(id)` and `account_id -> account(id)`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JoinTable {
    pub name: String,
    pub parent_table: String,
    pub parent_column: String,
    pub parent_join_column: String,
    pub child_table: String,
    pub child_column: String,
    pub child_join_column: String,
    /// Position of the list field within the parent entity.
    pub child_position: usize,
}

/// Produce the constraint descriptor of a validated reference.
pub fn emit(reference: &ValidatedReference<'_>) -> ForeignKeyConstraint {
    let source_entity = reference.source_entity();
    let source_field = reference.source_field();
    let target_entity = reference.target_entity();
    let target_field = reference.target_field();

    let source_table = source_entity.table_name();
    let target_table = target_entity.table_name();

    let column_type = match target_field.type_name() {
        IDENTITY_TYPE => IDENTITY_COLUMN_TYPE.to_string(),
        other => other.to_string(),
    };

    let join_table = match reference.cardinality() {
        Cardinality::One => None,
        // The resolver rejects list references from entities without an identity
        Cardinality::Many => source_entity.identity_field().map(|parent_identity| JoinTable {
            name: naming::join_table_name(&source_table, &target_table),
            parent_join_column: naming::join_column_name(&source_table, &parent_identity.name),
            parent_table: source_table.clone(),
            parent_column: parent_identity.name.clone(),
            child_join_column: naming::child_join_column_name(
                &source_table,
                &target_table,
                &target_field.name,
            ),
            child_table: target_table.clone(),
            child_column: target_field.name.clone(),
            child_position: source_field.position,
        }),
    };

    ForeignKeyConstraint {
        source_entity: source_entity.name.clone(),
        source_field: source_field.name.clone(),
        target_entity: target_entity.name.clone(),
        target_field: target_field.name.clone(),
        kind: reference.kind(),
        cardinality: reference.cardinality(),
        source_table,
        source_column: source_field.name.clone(),
        target_table,
        target_column: target_field.name.clone(),
        column_type,
        nullable: source_field.typ.is_nullable(),
        join_table,
    }
}

impl ForeignKeyConstraint {
    pub fn constraint_name(&self) -> String {
        naming::foreign_key_constraint_name(
            &self.source_table,
            &self.source_column,
            &self.target_table,
            &self.target_column,
        )
    }

    /// DDL statements creating this constraint in the database schema `namespace`.
    ///
    /// One statement for a column reference; two (one per join column) for a list reference.
    pub fn sql_statements(&self, namespace: &str, config: &ResolverConfig) -> Vec<String> {
        let statement = |table: &str, column: &str, ref_table: &str, ref_column: &str| {
            let name = naming::foreign_key_constraint_name(table, column, ref_table, ref_column);
            format!(
                "ALTER TABLE {namespace}.{table} ADD CONSTRAINT {name} FOREIGN KEY ({column}) REFERENCES {namespace}.{ref_table}({ref_column}) ON DELETE {} ON UPDATE {} INITIALLY DEFERRED;",
                config.on_delete, config.on_update
            )
        };

        match &self.join_table {
            None => vec![statement(
                &self.source_table,
                &self.source_column,
                &self.target_table,
                &self.target_column,
            )],
            Some(join_table) => vec![
                statement(
                    &join_table.name,
                    &join_table.parent_join_column,
                    &join_table.parent_table,
                    &join_table.parent_column,
                ),
                statement(
                    &join_table.name,
                    &join_table.child_join_column,
                    &join_table.child_table,
                    &join_table.child_column,
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ReferentialAction, reference::ReferenceResolver, test_util::schema_from_src,
        validator::validate,
    };
    use multiplatform_test::multiplatform_test;

    const SCHEMA: &str = r#"
        type Account @entity {
            id: ID!
            address: Address! @unique
        }

        type Wallet @entity {
            id: ID!
            label: Charfield
            owner: Account @join(on: address)
            primary: Account!
            accounts: [Account!]!
        }
    "#;

    fn emit_field(field: &str) -> ForeignKeyConstraint {
        let schema = schema_from_src(SCHEMA);
        let wallet = schema.get_by_name("Wallet").unwrap();
        let reference = ReferenceResolver::new(&schema)
            .resolve(wallet, wallet.field(field).unwrap())
            .unwrap();

        emit(&validate(reference).unwrap())
    }

    #[multiplatform_test]
    fn implicit_column_constraint() {
        let constraint = emit_field("primary");

        assert_eq!(
            constraint,
            ForeignKeyConstraint {
                source_entity: "Wallet".to_string(),
                source_field: "primary".to_string(),
                target_entity: "Account".to_string(),
                target_field: "id".to_string(),
                kind: ReferenceKind::Implicit,
                cardinality: Cardinality::One,
                source_table: "wallet".to_string(),
                source_column: "primary".to_string(),
                target_table: "account".to_string(),
                target_column: "id".to_string(),
                column_type: "UInt8".to_string(),
                nullable: false,
                join_table: None,
            }
        );
        assert_eq!(constraint.constraint_name(), "fk_wallet_primary__account_id");
    }

    #[multiplatform_test]
    fn explicit_column_constraint_uses_target_type() {
        let constraint = emit_field("owner");

        assert_eq!(constraint.kind, ReferenceKind::Explicit);
        assert_eq!(constraint.target_column, "address");
        assert_eq!(constraint.column_type, "Address");
        assert!(constraint.nullable);
    }

    #[multiplatform_test]
    fn list_reference_has_join_table() {
        let constraint = emit_field("accounts");

        assert_eq!(constraint.cardinality, Cardinality::Many);
        assert_eq!(
            constraint.join_table,
            Some(JoinTable {
                name: "wallets_accounts".to_string(),
                parent_table: "wallet".to_string(),
                parent_column: "id".to_string(),
                parent_join_column: "wallet_id".to_string(),
                child_table: "account".to_string(),
                child_column: "id".to_string(),
                child_join_column: "account_id".to_string(),
                child_position: 4,
            })
        );
    }

    #[multiplatform_test]
    fn self_referencing_list_has_distinct_join_columns() {
        let schema = schema_from_src(
            r#"
            type Node @entity {
                id: ID!
                children: [Node!]
            }
            "#,
        );
        let node = schema.get_by_name("Node").unwrap();
        let reference = ReferenceResolver::new(&schema)
            .resolve(node, node.field("children").unwrap())
            .unwrap();
        let constraint = emit(&validate(reference).unwrap());

        let join_table = constraint.join_table.as_ref().unwrap();
        assert_eq!(join_table.name, "nodes_nodes");
        assert_eq!(join_table.parent_join_column, "node_id");
        assert_eq!(join_table.child_join_column, "child_node_id");

        let statements = constraint.sql_statements("fuel_explorer", &ResolverConfig::default());
        assert_ne!(statements[0], statements[1]);
        insta::assert_snapshot!(
            statements[1],
            @"ALTER TABLE fuel_explorer.nodes_nodes ADD CONSTRAINT fk_nodes_nodes_child_node_id__node_id FOREIGN KEY (child_node_id) REFERENCES fuel_explorer.node(id) ON DELETE NO ACTION ON UPDATE NO ACTION INITIALLY DEFERRED;"
        );
    }

    #[multiplatform_test]
    fn column_statement() {
        let statements =
            emit_field("owner").sql_statements("fuel_explorer", &ResolverConfig::default());

        assert_eq!(statements.len(), 1);
        insta::assert_snapshot!(
            statements[0],
            @"ALTER TABLE fuel_explorer.wallet ADD CONSTRAINT fk_wallet_owner__account_address FOREIGN KEY (owner) REFERENCES fuel_explorer.account(address) ON DELETE NO ACTION ON UPDATE NO ACTION INITIALLY DEFERRED;"
        );
    }

    #[multiplatform_test]
    fn join_table_statements_use_configured_actions() {
        let config = ResolverConfig {
            on_delete: ReferentialAction::Cascade,
            on_update: ReferentialAction::Restrict,
            ..ResolverConfig::default()
        };
        let statements = emit_field("accounts").sql_statements("fuel_explorer", &config);

        assert_eq!(
            statements,
            vec![
                "ALTER TABLE fuel_explorer.wallets_accounts ADD CONSTRAINT fk_wallets_accounts_wallet_id__wallet_id FOREIGN KEY (wallet_id) REFERENCES fuel_explorer.wallet(id) ON DELETE CASCADE ON UPDATE RESTRICT INITIALLY DEFERRED;",
                "ALTER TABLE fuel_explorer.wallets_accounts ADD CONSTRAINT fk_wallets_accounts_account_id__account_id FOREIGN KEY (account_id) REFERENCES fuel_explorer.account(id) ON DELETE CASCADE ON UPDATE RESTRICT INITIALLY DEFERRED;",
            ]
        );
    }
}

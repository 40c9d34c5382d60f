// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use schema_model::EntitySchema;

use crate::{
    config::ResolverConfig,
    emitter::{ForeignKeyConstraint, JoinTable, emit},
    error::{ReferenceError, ResolutionError},
    reference::{Cardinality, ReferenceResolver},
    validator::{validate, validate_list_references},
};

/// All foreign-key constraints of a schema, in entity declaration then field order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSet {
    /// Fully qualified namespace (`{namespace}_{identifier}`) the tables live in.
    pub namespace: String,
    pub schema_version: String,
    pub constraints: Vec<ForeignKeyConstraint>,
}

impl ConstraintSet {
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn for_entity<'a, 'e>(
        &'a self,
        entity: &'e str,
    ) -> impl Iterator<Item = &'a ForeignKeyConstraint> + use<'a, 'e> {
        self.constraints
            .iter()
            .filter(move |constraint| constraint.source_entity == entity)
    }

    pub fn get(&self, entity: &str, field: &str) -> Option<&ForeignKeyConstraint> {
        self.for_entity(entity)
            .find(|constraint| constraint.source_field == field)
    }

    pub fn join_tables(&self) -> impl Iterator<Item = &JoinTable> {
        self.constraints
            .iter()
            .filter_map(|constraint| constraint.join_table.as_ref())
    }

    /// `table -> column -> (referenced table, referenced column)` for column references.
    ///
    /// List references are not included; their columns live on join tables.
    pub fn foreign_key_mappings(&self) -> BTreeMap<String, BTreeMap<String, (String, String)>> {
        let mut mappings: BTreeMap<String, BTreeMap<String, (String, String)>> = BTreeMap::new();

        for constraint in &self.constraints {
            if constraint.cardinality == Cardinality::One {
                mappings
                    .entry(constraint.source_table.clone())
                    .or_default()
                    .insert(
                        constraint.source_column.clone(),
                        (
                            constraint.target_table.clone(),
                            constraint.target_column.clone(),
                        ),
                    );
            }
        }

        mappings
    }

    /// DDL for the whole set, in constraint order.
    ///
    /// List fields from one parent to the same child share a join table (their rows are told
    /// apart by child position), so their join-table constraints are emitted once.
    pub fn sql_statements(&self, config: &ResolverConfig) -> Vec<String> {
        let mut seen = HashSet::new();

        self.constraints
            .iter()
            .flat_map(|constraint| constraint.sql_statements(&self.namespace, config))
            .filter(|statement| seen.insert(statement.clone()))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Resolve, validate and emit every reference of every non-virtual entity.
///
/// Every failure is collected; the schema is rejected as a whole if any reference is invalid.
#[instrument(
    skip_all,
    fields(namespace = %schema.fully_qualified_namespace(), entities = schema.len())
)]
pub fn resolve_constraints(
    schema: &EntitySchema,
    config: &ResolverConfig,
) -> Result<ConstraintSet, ResolutionError> {
    let resolver = ReferenceResolver::new(schema);

    let mut constraints = vec![];
    let mut errors: Vec<ReferenceError> = vec![];

    for entity in schema.entities().filter(|entity| !entity.is_virtual) {
        let mut list_references = 0;

        for reference in resolver.references(entity) {
            let constraint = reference.and_then(|reference| {
                if reference.cardinality() == Cardinality::Many {
                    list_references += 1;
                }
                validate(reference).map(|validated| emit(&validated))
            });

            match constraint {
                Ok(constraint) => {
                    debug!(
                        constraint = %constraint.constraint_name(),
                        kind = ?constraint.kind,
                        "Emitted foreign key"
                    );
                    constraints.push(constraint);
                }
                Err(error) => errors.push(error),
            }
        }

        if let Err(error) =
            validate_list_references(entity, list_references, config.max_list_references)
        {
            errors.push(error);
        }
    }

    if errors.is_empty() {
        Ok(ConstraintSet {
            namespace: schema.fully_qualified_namespace(),
            schema_version: schema.version.clone(),
            constraints,
        })
    } else {
        Err(ResolutionError::Invalid(errors))
    }
}

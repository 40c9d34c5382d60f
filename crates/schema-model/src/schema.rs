// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The schema of one indexer: its entities plus the enum and scalar names they may refer to.
//!
//! Entities live in an arena so that they can be referred to by a stable [`EntityId`], with a
//! name map on the side for lookups by type name (which is how fields refer to entities).

use std::collections::{BTreeSet, HashMap};
use std::ops;

use serde::{Deserialize, Serialize};
use typed_generational_arena::{Arena, IgnoreGeneration, Index};

use crate::{entity::Entity, naming};

pub type EntitySlab = Arena<Entity, usize, IgnoreGeneration>;
pub type EntityId = Index<Entity, usize, IgnoreGeneration>;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EntitySchema {
    pub namespace: String,
    pub identifier: String,
    /// Content version of the schema source (hex SHA-256 digest).
    pub version: String,
    entities: EntitySlab,
    entity_ids: HashMap<String, EntityId>,
    /// Entity ids in declaration order.
    order: Vec<EntityId>,
    enum_names: BTreeSet<String>,
    scalar_names: BTreeSet<String>,
}

impl EntitySchema {
    pub fn new(
        namespace: impl Into<String>,
        identifier: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            identifier: identifier.into(),
            version: version.into(),
            entities: EntitySlab::new(),
            entity_ids: HashMap::new(),
            order: vec![],
            enum_names: BTreeSet::new(),
            scalar_names: BTreeSet::new(),
        }
    }

    /// Add an entity. If an entity with the same name exists, the existing id is returned and
    /// the new entity is dropped.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        if let Some(existing) = self.get_id(&entity.name) {
            return existing;
        }

        let name = entity.name.clone();
        let id = self.entities.insert(entity);
        self.entity_ids.insert(name, id);
        self.order.push(id);
        id
    }

    pub fn add_enum(&mut self, name: impl Into<String>) {
        self.enum_names.insert(name.into());
    }

    pub fn add_scalar(&mut self, name: impl Into<String>) {
        self.scalar_names.insert(name.into());
    }

    pub fn get_id(&self, name: &str) -> Option<EntityId> {
        self.entity_ids.get(name).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Entity> {
        self.get_id(name).map(|id| &self[id])
    }

    /// Entities in declaration order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().map(|id| &self.entities[*id])
    }

    /// Whether `name` is a member of a union declared in this schema.
    pub fn is_union_member(&self, name: &str) -> bool {
        self.entities()
            .any(|entity| entity.members.iter().any(|member| member == name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.enum_names.contains(name)
    }

    pub fn is_scalar(&self, name: &str) -> bool {
        self.scalar_names.contains(name)
    }

    /// Whether `name` is any type known to this schema.
    pub fn has_type(&self, name: &str) -> bool {
        self.entity_ids.contains_key(name) || self.is_enum(name) || self.is_scalar(name)
    }

    pub fn fully_qualified_namespace(&self) -> String {
        naming::fully_qualified_namespace(&self.namespace, &self.identifier)
    }
}

impl ops::Index<EntityId> for EntitySchema {
    type Output = Entity;

    #[inline]
    fn index(&self, id: EntityId) -> &Entity {
        &self.entities[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Field;
    use crate::types::{FieldType, NamedType};
    use multiplatform_test::multiplatform_test;

    fn entity(name: &str) -> Entity {
        Entity::new(
            name,
            vec![Field::new("id", FieldType::Plain(NamedType::scalar("ID")), 0)],
            false,
        )
    }

    #[multiplatform_test]
    fn keeps_declaration_order() {
        let mut schema = EntitySchema::new("fuel", "explorer", "v1");
        for name in ["Zebra", "Apple", "Mango"] {
            schema.add_entity(entity(name));
        }

        let names: Vec<_> = schema.entities().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Zebra", "Apple", "Mango"]);
        assert_eq!(schema.fully_qualified_namespace(), "fuel_explorer");
    }

    #[multiplatform_test]
    fn duplicate_add_returns_existing() {
        let mut schema = EntitySchema::new("fuel", "explorer", "v1");
        let first = schema.add_entity(entity("Book"));
        let second = schema.add_entity(Entity::new("Book", vec![], true));

        assert_eq!(first, second);
        assert_eq!(schema.len(), 1);
        assert!(!schema[first].is_virtual);
    }

    #[multiplatform_test]
    fn type_lookups() {
        let mut schema = EntitySchema::new("fuel", "explorer", "v1");
        schema.add_entity(entity("Book"));
        schema.add_enum("Genre");
        schema.add_scalar("ID");

        assert!(schema.has_type("Book"));
        assert!(schema.has_type("Genre"));
        assert!(schema.has_type("ID"));
        assert!(!schema.has_type("Library"));
        assert!(schema.is_enum("Genre"));
        assert!(schema.get_by_name("Genre").is_none());
    }

    #[multiplatform_test]
    fn union_membership() {
        let mut schema = EntitySchema::new("fuel", "explorer", "v1");
        schema.add_entity(entity("Safe"));
        schema.add_entity(entity("Vault"));
        schema.add_entity(Entity::union(
            "Storage",
            vec!["Safe".to_string(), "Vault".to_string()],
            entity("Storage").fields,
            false,
        ));

        assert!(schema.is_union_member("Safe"));
        assert!(schema.is_union_member("Vault"));
        assert!(!schema.is_union_member("Storage"));
    }

    #[multiplatform_test]
    fn serializes_to_json() {
        let mut schema = EntitySchema::new("fuel", "explorer", "v1");
        schema.add_entity(entity("Book"));

        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["namespace"], "fuel");
        assert_eq!(value["enum_names"], serde_json::json!([]));
    }
}

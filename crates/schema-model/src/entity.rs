// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

use crate::{directive::FieldDirective, naming, types::FieldType};

/// Name of the field that identifies a row of an entity's table.
pub const IDENTITY_FIELD_NAME: &str = "id";

/// A record type of the schema. Each non-virtual entity maps to one storage table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
    /// Position (in `fields`) of the identity field, if the entity declares one.
    pub identity: Option<usize>,
    /// Virtual entities (`@entity(virtual: true)`) have no table and are stored inline.
    pub is_virtual: bool,
    /// Member entities, for an entity derived from a union (`union Storage = Safe | Vault`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub typ: FieldType,
    pub directives: Vec<FieldDirective>,
    /// Zero-based position of the field within its entity.
    pub position: usize,
}

impl Entity {
    /// Create an entity, designating the field named `id` (if any) as the identity field.
    ///
    /// Field positions are renumbered to follow the order of `fields`.
    pub fn new(name: impl Into<String>, fields: Vec<Field>, is_virtual: bool) -> Self {
        let fields: Vec<Field> = fields
            .into_iter()
            .enumerate()
            .map(|(position, field)| Field { position, ..field })
            .collect();

        let identity = fields
            .iter()
            .position(|field| field.name == IDENTITY_FIELD_NAME);

        Self {
            name: name.into(),
            fields,
            identity,
            is_virtual,
            members: vec![],
        }
    }

    /// Create an entity derived from a union. `fields` are the distinct fields of the members.
    pub fn union(
        name: impl Into<String>,
        members: Vec<String>,
        fields: Vec<Field>,
        is_virtual: bool,
    ) -> Self {
        Self {
            members,
            ..Self::new(name, fields, is_virtual)
        }
    }

    pub fn is_union(&self) -> bool {
        !self.members.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn identity_field(&self) -> Option<&Field> {
        self.identity.and_then(|position| self.fields.get(position))
    }

    pub fn is_identity(&self, field: &Field) -> bool {
        self.identity == Some(field.position) && field.name == IDENTITY_FIELD_NAME
    }

    /// A field's values are unique if it is the identity or is annotated with `@unique`.
    pub fn is_unique(&self, field: &Field) -> bool {
        self.is_identity(field) || field.is_unique()
    }

    pub fn table_name(&self) -> String {
        naming::table_name(&self.name)
    }
}

impl Field {
    pub fn new(name: impl Into<String>, typ: FieldType, position: usize) -> Self {
        Self {
            name: name.into(),
            typ,
            directives: vec![],
            position,
        }
    }

    pub fn with_directive(mut self, directive: FieldDirective) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn is_unique(&self) -> bool {
        self.directives
            .iter()
            .any(|directive| matches!(directive, FieldDirective::Unique))
    }

    /// The field named by `@join(on: ...)`, if present.
    pub fn join_on(&self) -> Option<&str> {
        self.directives.iter().find_map(|directive| match directive {
            FieldDirective::Join { on } => Some(on.as_str()),
            _ => None,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.typ.innermost().name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NamedType;
    use multiplatform_test::multiplatform_test;

    fn book() -> Entity {
        Entity::new(
            "Book",
            vec![
                Field::new("name", FieldType::Plain(NamedType::scalar("Charfield")), 0),
                Field::new("id", FieldType::Plain(NamedType::scalar("ID")), 1),
                Field::new("isbn", FieldType::Plain(NamedType::scalar("Charfield")), 2)
                    .with_directive(FieldDirective::Unique),
            ],
            false,
        )
    }

    #[multiplatform_test]
    fn identity_is_the_id_field_wherever_declared() {
        let book = book();

        assert_eq!(book.identity, Some(1));
        assert_eq!(book.identity_field().map(|f| f.name.as_str()), Some("id"));
    }

    #[multiplatform_test]
    fn uniqueness() {
        let book = book();

        let unique = |name: &str| book.is_unique(book.field(name).unwrap());

        assert!(unique("id"));
        assert!(unique("isbn"));
        assert!(!unique("name"));
    }

    #[multiplatform_test]
    fn no_identity_without_id_field() {
        let log = Entity::new(
            "Log",
            vec![Field::new(
                "message",
                FieldType::Plain(NamedType::scalar("Charfield")),
                0,
            )],
            false,
        );

        assert!(log.identity_field().is_none());
        assert_eq!(log.table_name(), "log");
    }

    #[multiplatform_test]
    fn out_of_range_identity_is_absent() {
        let mut book = book();
        book.identity = Some(7);

        assert!(book.identity_field().is_none());
    }

    #[multiplatform_test]
    fn union_entities() {
        let storage = Entity::union(
            "Storage",
            vec!["Safe".to_string(), "Vault".to_string()],
            book().fields,
            false,
        );

        assert!(storage.is_union());
        assert!(!book().is_union());
        assert_eq!(storage.identity, Some(1));
        assert_eq!(storage.table_name(), "storage");
    }

    #[multiplatform_test]
    fn join_on_reads_the_directive() {
        let field = Field::new("book", FieldType::Plain(NamedType::entity("Book")), 1)
            .with_directive(FieldDirective::Other("indexed".to_string()))
            .with_directive(FieldDirective::Join {
                on: "isbn".to_string(),
            });

        assert_eq!(field.join_on(), Some("isbn"));
        assert_eq!(field.type_name(), "Book");
        assert!(!field.is_unique());
    }
}

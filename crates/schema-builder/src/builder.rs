// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::{HashMap, HashSet};

use async_graphql_parser::{
    Pos, Positioned, parse_schema,
    types::{
        BaseType, ConstDirective, FieldDefinition, ObjectType, ServiceDocument, Type,
        TypeDefinition, TypeKind as GqlTypeKind, TypeSystemDefinition, UnionType,
    },
};
use async_graphql_value::ConstValue;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, trace};

use schema_model::{
    Entity, EntitySchema, Field, FieldDirective, FieldType, NamedType, TypeKind,
    directive::{
        ENTITY_DIRECTIVE, JOIN_DIRECTIVE, JOIN_ON_ARGUMENT, UNIQUE_DIRECTIVE, VIRTUAL_ARGUMENT,
    },
    naming::field_id,
};

use crate::{
    error::SchemaBuildingError,
    scalars::{BASE_SCALARS, is_base_scalar},
};

/// Content version of a schema source.
pub fn schema_version(src: &str) -> String {
    format!("{:x}", Sha256::digest(src.as_bytes()))
}

/// Parse GraphQL SDL and build the entity schema of the indexer `namespace`/`identifier`.
pub fn build_from_src(
    namespace: &str,
    identifier: &str,
    src: &str,
) -> Result<EntitySchema, SchemaBuildingError> {
    let document = parse_schema(src)?;
    build_from_document(namespace, identifier, &schema_version(src), &document)
}

/// Build the entity schema from an already parsed service document.
#[instrument(skip(document))]
pub fn build_from_document(
    namespace: &str,
    identifier: &str,
    version: &str,
    document: &ServiceDocument,
) -> Result<EntitySchema, SchemaBuildingError> {
    let type_kinds = collect_type_kinds(document)?;

    let mut schema = EntitySchema::new(namespace, identifier, version);

    for (name, kind) in type_kinds.iter() {
        match kind {
            TypeKind::Scalar => schema.add_scalar(name.clone()),
            TypeKind::Enum => schema.add_enum(name.clone()),
            TypeKind::Entity => {}
        }
    }

    for typ in type_definitions(document) {
        if let GqlTypeKind::Object(object) = &typ.node.kind
            && let Some(is_virtual) = entity_annotation(&typ.node)
        {
            let entity = build_entity(&typ.node, object, is_virtual, &type_kinds)?;
            debug!(
                entity = %entity.name,
                fields = entity.fields.len(),
                is_virtual,
                "Built entity"
            );
            schema.add_entity(entity);
        }
    }

    // Unions are derived from their members, so they follow every object type
    for typ in type_definitions(document) {
        if let GqlTypeKind::Union(union_type) = &typ.node.kind {
            let entity = build_union(typ, union_type, &schema)?;
            debug!(
                union = %entity.name,
                members = ?entity.members,
                fields = entity.fields.len(),
                "Built union"
            );
            schema.add_entity(entity);
        }
    }

    Ok(schema)
}

fn type_definitions(
    document: &ServiceDocument,
) -> impl Iterator<Item = &Positioned<TypeDefinition>> {
    document.definitions.iter().filter_map(|definition| match definition {
        TypeSystemDefinition::Type(typ) => Some(typ),
        _ => None,
    })
}

/// `Some(is_virtual)` if the type carries `@entity`, `None` otherwise.
fn entity_annotation(typ: &TypeDefinition) -> Option<bool> {
    typ.directives
        .iter()
        .find(|directive| directive.node.name.node.as_str() == ENTITY_DIRECTIVE)
        .map(|directive| {
            matches!(
                directive
                    .node
                    .get_argument(VIRTUAL_ARGUMENT)
                    .map(|value| &value.node),
                Some(ConstValue::Boolean(true))
            )
        })
}

/// First pass: the kind of every type name a field may refer to.
fn collect_type_kinds(
    document: &ServiceDocument,
) -> Result<HashMap<String, TypeKind>, SchemaBuildingError> {
    let mut kinds: HashMap<String, TypeKind> = BASE_SCALARS
        .iter()
        .map(|name| (name.to_string(), TypeKind::Scalar))
        .collect();
    let mut declared = HashSet::new();

    for typ in type_definitions(document) {
        let name = typ.node.name.node.to_string();

        if !declared.insert(name.clone()) {
            return Err(SchemaBuildingError::DuplicateType {
                name,
                pos: typ.pos,
            });
        }

        let kind = match &typ.node.kind {
            GqlTypeKind::Scalar => {
                if is_base_scalar(&name) {
                    trace!(name = %name, "Base scalar redeclared");
                }
                TypeKind::Scalar
            }
            GqlTypeKind::Enum(_) => TypeKind::Enum,
            GqlTypeKind::Object(_) if entity_annotation(&typ.node).is_some() => TypeKind::Entity,
            GqlTypeKind::Object(_) => {
                trace!(name = %name, "Skipping object type without @entity");
                continue;
            }
            GqlTypeKind::Interface(_) => return Err(unsupported(name, "interface", typ.pos)),
            GqlTypeKind::Union(_) => TypeKind::Entity,
            GqlTypeKind::InputObject(_) => {
                return Err(unsupported(name, "input object", typ.pos));
            }
        };

        kinds.insert(name, kind);
    }

    Ok(kinds)
}

fn unsupported(name: String, kind: &'static str, pos: Pos) -> SchemaBuildingError {
    SchemaBuildingError::UnsupportedTypeKind { name, kind, pos }
}

fn build_entity(
    typ: &TypeDefinition,
    object: &ObjectType,
    is_virtual: bool,
    type_kinds: &HashMap<String, TypeKind>,
) -> Result<Entity, SchemaBuildingError> {
    let entity_name = typ.name.node.as_str();
    let mut seen = HashSet::new();

    let fields = object
        .fields
        .iter()
        .enumerate()
        .map(|(position, field)| {
            let fid = field_id(entity_name, field.node.name.node.as_str());
            if !seen.insert(field.node.name.node.to_string()) {
                return Err(SchemaBuildingError::DuplicateField {
                    field_id: fid,
                    pos: field.pos,
                });
            }
            build_field(&fid, field, position, type_kinds)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Entity::new(entity_name, fields, is_virtual))
}

/// Merge the distinct fields of a union's members into one entity, in member order.
///
/// The union is virtual when all its members are; mixing virtual and table-backed members is an
/// error.
fn build_union(
    typ: &Positioned<TypeDefinition>,
    union_type: &UnionType,
    schema: &EntitySchema,
) -> Result<Entity, SchemaBuildingError> {
    let union_name = typ.node.name.node.as_str();

    let members = union_type
        .members
        .iter()
        .map(|member| {
            schema
                .get_by_name(member.node.as_str())
                .filter(|entity| !entity.is_union())
                .ok_or_else(|| SchemaBuildingError::InvalidUnionMember {
                    union_name: union_name.to_string(),
                    member: member.node.to_string(),
                    pos: member.pos,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let is_virtual = members.iter().all(|member| member.is_virtual);
    if !is_virtual && members.iter().any(|member| member.is_virtual) {
        return Err(SchemaBuildingError::InconsistentVirtualUnion {
            name: union_name.to_string(),
            pos: typ.pos,
        });
    }

    let mut fields: Vec<Field> = vec![];
    for field in members.iter().flat_map(|member| member.fields.iter()) {
        match fields.iter().find(|existing| existing.name == field.name) {
            Some(existing) if existing.typ != field.typ => {
                return Err(SchemaBuildingError::ConflictingUnionField {
                    field_id: field_id(union_name, &field.name),
                    pos: typ.pos,
                });
            }
            Some(_) => {}
            None => fields.push(field.clone()),
        }
    }

    Ok(Entity::union(
        union_name,
        members.iter().map(|member| member.name.clone()).collect(),
        fields,
        is_virtual,
    ))
}

fn build_field(
    fid: &str,
    field: &Positioned<FieldDefinition>,
    position: usize,
    type_kinds: &HashMap<String, TypeKind>,
) -> Result<Field, SchemaBuildingError> {
    let typ = resolve_field_type(&field.node.ty.node, type_kinds).map_err(|type_name| {
        SchemaBuildingError::UnknownType {
            field_id: fid.to_string(),
            type_name,
            pos: field.node.ty.pos,
        }
    })?;

    let directives = field
        .node
        .directives
        .iter()
        .map(|directive| build_directive(fid, directive, &typ))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Field {
        name: field.node.name.node.to_string(),
        typ,
        directives,
        position,
    })
}

/// Convert a GraphQL type, returning the offending name if it is not a known type.
fn resolve_field_type(
    typ: &Type,
    type_kinds: &HashMap<String, TypeKind>,
) -> Result<FieldType, String> {
    let base = match &typ.base {
        BaseType::Named(name) => {
            let kind = type_kinds
                .get(name.as_str())
                .ok_or_else(|| name.to_string())?;
            FieldType::Plain(NamedType {
                name: name.to_string(),
                kind: *kind,
            })
        }
        BaseType::List(underlying) => {
            FieldType::List(Box::new(resolve_field_type(underlying, type_kinds)?))
        }
    };

    Ok(if typ.nullable {
        FieldType::Optional(Box::new(base))
    } else {
        base
    })
}

fn build_directive(
    fid: &str,
    directive: &Positioned<ConstDirective>,
    typ: &FieldType,
) -> Result<FieldDirective, SchemaBuildingError> {
    let name = directive.node.name.node.as_str();

    match name {
        UNIQUE_DIRECTIVE => Ok(FieldDirective::Unique),
        JOIN_DIRECTIVE => {
            let invalid = |message: &str| SchemaBuildingError::InvalidJoinDirective {
                field_id: fid.to_string(),
                message: message.to_string(),
                pos: directive.pos,
            };

            if !typ.is_entity() {
                return Err(invalid("only fields referencing an entity can be joined"));
            }

            let on = match directive.node.get_argument(JOIN_ON_ARGUMENT).map(|v| &v.node) {
                Some(ConstValue::Enum(field_name)) => field_name.to_string(),
                Some(ConstValue::String(field_name)) => field_name.clone(),
                Some(_) => return Err(invalid("the `on` argument must name a field")),
                None => return Err(invalid("missing `on` argument")),
            };

            Ok(FieldDirective::Join { on })
        }
        _ => {
            trace!(field = fid, directive = name, "Keeping unrecognized directive");
            Ok(FieldDirective::Other(name.to_string()))
        }
    }
}

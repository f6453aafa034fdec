use std::collections::HashMap;

use async_graphql_parser::{
    types::{BaseType, FieldDefinition, Type, TypeDefinition, TypeKind, TypeSystemDefinition},
    Positioned,
};

use crate::*;

const BUILTIN_SCALARS: [&str; 5] = ["String", "ID", "Int", "Float", "Boolean"];

enum PendingKind {
    Scalar,
    Object {
        implements: Vec<String>,
        fields: Vec<(String, Type)>,
    },
    Interface {
        implements: Vec<String>,
        fields: Vec<(String, Type)>,
    },
    Union {
        members: Vec<String>,
    },
    Enum {
        values: Vec<String>,
    },
    InputObject,
}

impl PendingKind {
    fn name(&self) -> &'static str {
        match self {
            PendingKind::Scalar => "scalar",
            PendingKind::Object { .. } => "object",
            PendingKind::Interface { .. } => "interface",
            PendingKind::Union { .. } => "union",
            PendingKind::Enum { .. } => "enum",
            PendingKind::InputObject => "input object",
        }
    }

    fn merge(&mut self, other: PendingKind) -> bool {
        match (self, other) {
            (PendingKind::Scalar, PendingKind::Scalar) | (PendingKind::InputObject, PendingKind::InputObject) => {}
            (
                PendingKind::Object { implements, fields },
                PendingKind::Object {
                    implements: more_implements,
                    fields: more_fields,
                },
            )
            | (
                PendingKind::Interface { implements, fields },
                PendingKind::Interface {
                    implements: more_implements,
                    fields: more_fields,
                },
            ) => {
                implements.extend(more_implements);
                fields.extend(more_fields);
            }
            (PendingKind::Union { members }, PendingKind::Union { members: more }) => members.extend(more),
            (PendingKind::Enum { values }, PendingKind::Enum { values: more }) => values.extend(more),
            _ => return false,
        }
        true
    }
}

struct PendingType {
    name: String,
    kind: PendingKind,
    // false while only extensions have been seen
    defined: bool,
}

#[derive(Default)]
struct RootNames {
    query: Option<String>,
    mutation: Option<String>,
    subscription: Option<String>,
}

pub(crate) fn build(sdl: &str) -> Result<Schema, SchemaError> {
    let document = async_graphql_parser::parse_schema(sdl)?;

    let mut pending = Vec::<PendingType>::new();
    let mut positions = HashMap::<String, usize>::new();
    let mut roots = RootNames::default();

    for definition in document.definitions {
        match definition {
            TypeSystemDefinition::Schema(Positioned { node: schema, .. }) => {
                roots.query = schema.query.map(to_name).or(roots.query);
                roots.mutation = schema.mutation.map(to_name).or(roots.mutation);
                roots.subscription = schema.subscription.map(to_name).or(roots.subscription);
            }
            TypeSystemDefinition::Type(Positioned { node: definition, .. }) => {
                let TypeDefinition { extend, name, kind, .. } = definition;
                let name = name.node.to_string();
                let kind = convert_kind(kind);
                match positions.get(&name) {
                    Some(&index) => {
                        if !extend {
                            if pending[index].defined {
                                return Err(SchemaError::DuplicateType(name));
                            }
                            pending[index].defined = true;
                        }
                        let kind_name = kind.name();
                        if !pending[index].kind.merge(kind) {
                            return Err(SchemaError::InvalidExtension { name, kind: kind_name });
                        }
                    }
                    None => {
                        positions.insert(name.clone(), pending.len());
                        pending.push(PendingType {
                            name,
                            kind,
                            defined: !extend,
                        });
                    }
                }
            }
            TypeSystemDefinition::Directive(_) => {}
        }
    }

    for scalar in BUILTIN_SCALARS {
        if !positions.contains_key(scalar) {
            positions.insert(scalar.to_string(), pending.len());
            pending.push(PendingType {
                name: scalar.to_string(),
                kind: PendingKind::Scalar,
                defined: true,
            });
        }
    }

    Builder::default().build(pending, roots)
}

fn to_name<T: std::fmt::Display>(name: Positioned<T>) -> String {
    name.node.to_string()
}

fn to_names<T: std::fmt::Display>(names: Vec<Positioned<T>>) -> Vec<String> {
    names.into_iter().map(to_name).collect()
}

fn convert_kind(kind: TypeKind) -> PendingKind {
    let fields = |fields: Vec<Positioned<FieldDefinition>>| {
        fields
            .into_iter()
            .map(|Positioned { node: field, .. }| (field.name.node.to_string(), field.ty.node))
            .collect::<Vec<_>>()
    };
    match kind {
        TypeKind::Scalar => PendingKind::Scalar,
        TypeKind::Object(object) => PendingKind::Object {
            implements: to_names(object.implements),
            fields: fields(object.fields),
        },
        TypeKind::Interface(interface) => PendingKind::Interface {
            implements: to_names(interface.implements),
            fields: fields(interface.fields),
        },
        TypeKind::Union(union) => PendingKind::Union {
            members: to_names(union.members),
        },
        TypeKind::Enum(enum_type) => PendingKind::Enum {
            values: enum_type
                .values
                .into_iter()
                .map(|value| value.node.value.node.to_string())
                .collect(),
        },
        TypeKind::InputObject(_) => PendingKind::InputObject,
    }
}

#[derive(Default)]
struct Builder {
    names: HashMap<String, DefinitionId>,
    object_definitions: Vec<ObjectDefinitionRecord>,
    interface_definitions: Vec<InterfaceDefinitionRecord>,
    union_definitions: Vec<UnionDefinitionRecord>,
    scalar_definitions: Vec<ScalarDefinitionRecord>,
    enum_definitions: Vec<EnumDefinitionRecord>,
    input_object_definitions: Vec<InputObjectDefinitionRecord>,
    field_definitions: Vec<FieldDefinitionRecord>,
}

impl Builder {
    fn build(mut self, pending: Vec<PendingType>, roots: RootNames) -> Result<Schema, SchemaError> {
        // First pass: assign ids so that types can reference each other regardless of order.
        for PendingType { name, kind, .. } in &pending {
            let id = match kind {
                PendingKind::Scalar => {
                    self.scalar_definitions.push(ScalarDefinitionRecord {
                        name: name.clone(),
                        ty: ScalarType::from_scalar_name(name),
                    });
                    DefinitionId::Scalar((self.scalar_definitions.len() - 1).into())
                }
                PendingKind::Object { .. } => {
                    self.object_definitions.push(ObjectDefinitionRecord {
                        name: name.clone(),
                        interface_ids: Vec::new(),
                        field_ids: IdRange::empty(),
                    });
                    DefinitionId::Object((self.object_definitions.len() - 1).into())
                }
                PendingKind::Interface { .. } => {
                    self.interface_definitions.push(InterfaceDefinitionRecord {
                        name: name.clone(),
                        interface_ids: Vec::new(),
                        possible_type_ids: Vec::new(),
                        field_ids: IdRange::empty(),
                    });
                    DefinitionId::Interface((self.interface_definitions.len() - 1).into())
                }
                PendingKind::Union { .. } => {
                    self.union_definitions.push(UnionDefinitionRecord {
                        name: name.clone(),
                        possible_type_ids: Vec::new(),
                    });
                    DefinitionId::Union((self.union_definitions.len() - 1).into())
                }
                PendingKind::Enum { values } => {
                    let mut values = values.clone();
                    values.sort_unstable();
                    self.enum_definitions.push(EnumDefinitionRecord {
                        name: name.clone(),
                        values,
                    });
                    DefinitionId::Enum((self.enum_definitions.len() - 1).into())
                }
                PendingKind::InputObject => {
                    self.input_object_definitions
                        .push(InputObjectDefinitionRecord { name: name.clone() });
                    DefinitionId::InputObject((self.input_object_definitions.len() - 1).into())
                }
            };
            self.names.insert(name.clone(), id);
        }

        // Second pass: fields, interfaces and union members.
        for PendingType { name, kind, .. } in pending {
            match (self.names[&name], kind) {
                (DefinitionId::Object(id), PendingKind::Object { implements, fields }) => {
                    let interface_ids = self.interface_ids(&name, &implements)?;
                    for interface_id in &interface_ids {
                        self.interface_definitions[usize::from(*interface_id)]
                            .possible_type_ids
                            .push(id);
                    }
                    let field_ids = self.push_fields(&name, EntityDefinitionId::Object(id), fields)?;
                    let object = &mut self.object_definitions[usize::from(id)];
                    object.interface_ids = interface_ids;
                    object.field_ids = field_ids;
                }
                (DefinitionId::Interface(id), PendingKind::Interface { implements, fields }) => {
                    let interface_ids = self.interface_ids(&name, &implements)?;
                    let field_ids = self.push_fields(&name, EntityDefinitionId::Interface(id), fields)?;
                    let interface = &mut self.interface_definitions[usize::from(id)];
                    interface.interface_ids = interface_ids;
                    interface.field_ids = field_ids;
                }
                (DefinitionId::Union(id), PendingKind::Union { members }) => {
                    let mut possible_type_ids = members
                        .iter()
                        .map(|member| match self.names.get(member) {
                            Some(DefinitionId::Object(object_id)) => Ok(*object_id),
                            _ => Err(SchemaError::InvalidTypeReference {
                                parent: name.clone(),
                                name: member.clone(),
                                expected: "an object type",
                            }),
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    possible_type_ids.sort_unstable();
                    possible_type_ids.dedup();
                    self.union_definitions[usize::from(id)].possible_type_ids = possible_type_ids;
                }
                _ => {}
            }
        }

        for interface in &mut self.interface_definitions {
            interface.possible_type_ids.sort_unstable();
            interface.possible_type_ids.dedup();
        }

        let root = |name: Option<String>, default: &str| -> Result<Option<ObjectDefinitionId>, SchemaError> {
            let name = name.unwrap_or_else(|| default.to_string());
            match self.names.get(&name) {
                Some(DefinitionId::Object(id)) => Ok(Some(*id)),
                Some(_) => Err(SchemaError::InvalidRootType(name)),
                None => Ok(None),
            }
        };
        let root_operation_types = RootOperationTypes {
            query_id: root(roots.query, "Query")?.ok_or(SchemaError::MissingQueryType)?,
            mutation_id: root(roots.mutation, "Mutation")?,
            subscription_id: root(roots.subscription, "Subscription")?,
        };

        let typename_type = TypeRecord {
            definition_id: self.names["String"],
            wrapping: Wrapping::new(true),
        };

        let mut definitions = self.names.values().copied().collect::<Vec<_>>();
        let names = self
            .names
            .iter()
            .map(|(name, id)| (*id, name.clone()))
            .collect::<HashMap<_, _>>();
        definitions.sort_unstable_by(|a, b| names[a].cmp(&names[b]));

        tracing::debug!(
            "Built schema with {} definitions and {} fields",
            definitions.len(),
            self.field_definitions.len()
        );

        Ok(Schema {
            definitions,
            object_definitions: self.object_definitions,
            interface_definitions: self.interface_definitions,
            union_definitions: self.union_definitions,
            scalar_definitions: self.scalar_definitions,
            enum_definitions: self.enum_definitions,
            input_object_definitions: self.input_object_definitions,
            field_definitions: self.field_definitions,
            root_operation_types,
            typename_type,
        })
    }

    fn interface_ids(&self, parent: &str, implements: &[String]) -> Result<Vec<InterfaceDefinitionId>, SchemaError> {
        implements
            .iter()
            .map(|name| match self.names.get(name) {
                Some(DefinitionId::Interface(id)) => Ok(*id),
                _ => Err(SchemaError::InvalidTypeReference {
                    parent: parent.to_string(),
                    name: name.clone(),
                    expected: "an interface",
                }),
            })
            .collect()
    }

    fn push_fields(
        &mut self,
        parent: &str,
        parent_entity_id: EntityDefinitionId,
        fields: Vec<(String, Type)>,
    ) -> Result<IdRange<FieldDefinitionId>, SchemaError> {
        let start = self.field_definitions.len();
        for (name, ty) in fields {
            let ty = self.type_record(parent, &name, &ty)?;
            self.field_definitions.push(FieldDefinitionRecord {
                name,
                parent_entity_id,
                ty,
            });
        }
        Ok(IdRange::from(start..self.field_definitions.len()))
    }

    fn type_record(&self, parent: &str, field: &str, ty: &Type) -> Result<TypeRecord, SchemaError> {
        match &ty.base {
            BaseType::Named(name) => {
                let definition_id =
                    self.names
                        .get(name.as_str())
                        .copied()
                        .ok_or_else(|| SchemaError::UnknownFieldType {
                            parent: parent.to_string(),
                            field: field.to_string(),
                            ty: name.to_string(),
                        })?;
                Ok(TypeRecord {
                    definition_id,
                    wrapping: Wrapping::new(!ty.nullable),
                })
            }
            BaseType::List(item) => {
                let item = self.type_record(parent, field, item)?;
                if item.wrapping.list_wrappings().len() as u32 >= MAX_LIST_DEPTH {
                    return Err(SchemaError::TooManyListWrappers {
                        parent: parent.to_string(),
                        field: field.to_string(),
                        max: MAX_LIST_DEPTH,
                    });
                }
                let wrapping = if ty.nullable {
                    item.wrapping.list()
                } else {
                    item.wrapping.list_non_null()
                };
                Ok(TypeRecord {
                    definition_id: item.definition_id,
                    wrapping,
                })
            }
        }
    }
}

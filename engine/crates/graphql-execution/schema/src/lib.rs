use std::{borrow::Cow, str::FromStr};

mod builder;
mod error;
mod ids;
mod wrapping;

pub use error::SchemaError;
use id_newtypes::IdRange;
pub use ids::*;
pub use wrapping::*;

/// Read-only type system the execution core resolves selections against.
///
/// Definitions are stored per kind in arenas indexed by their id newtypes. The schema is immutable
/// once built and can be shared across threads.
pub struct Schema {
    // All definitions sorted by their name (actual string)
    definitions: Vec<DefinitionId>,

    object_definitions: Vec<ObjectDefinitionRecord>,
    interface_definitions: Vec<InterfaceDefinitionRecord>,
    union_definitions: Vec<UnionDefinitionRecord>,
    scalar_definitions: Vec<ScalarDefinitionRecord>,
    enum_definitions: Vec<EnumDefinitionRecord>,
    input_object_definitions: Vec<InputObjectDefinitionRecord>,
    field_definitions: Vec<FieldDefinitionRecord>,

    pub root_operation_types: RootOperationTypes,
    typename_type: TypeRecord,
}

#[derive(Debug, Clone, Copy)]
pub struct RootOperationTypes {
    pub query_id: ObjectDefinitionId,
    pub mutation_id: Option<ObjectDefinitionId>,
    pub subscription_id: Option<ObjectDefinitionId>,
}

#[derive(Debug)]
pub struct ObjectDefinitionRecord {
    pub name: String,
    pub interface_ids: Vec<InterfaceDefinitionId>,
    pub field_ids: IdRange<FieldDefinitionId>,
}

#[derive(Debug)]
pub struct InterfaceDefinitionRecord {
    pub name: String,
    pub interface_ids: Vec<InterfaceDefinitionId>,
    /// sorted by ObjectDefinitionId
    pub possible_type_ids: Vec<ObjectDefinitionId>,
    pub field_ids: IdRange<FieldDefinitionId>,
}

#[derive(Debug)]
pub struct UnionDefinitionRecord {
    pub name: String,
    /// sorted by ObjectDefinitionId
    pub possible_type_ids: Vec<ObjectDefinitionId>,
}

#[derive(Debug)]
pub struct ScalarDefinitionRecord {
    pub name: String,
    pub ty: ScalarType,
}

#[derive(Debug)]
pub struct EnumDefinitionRecord {
    pub name: String,
    /// sorted
    pub values: Vec<String>,
}

#[derive(Debug)]
pub struct InputObjectDefinitionRecord {
    pub name: String,
}

#[derive(Debug)]
pub struct FieldDefinitionRecord {
    pub name: String,
    pub parent_entity_id: EntityDefinitionId,
    pub ty: TypeRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeRecord {
    pub definition_id: DefinitionId,
    pub wrapping: Wrapping,
}

impl TypeRecord {
    /// The type of the items if this is a list type.
    pub fn list_item(self) -> Option<TypeRecord> {
        self.wrapping.list_item().map(|wrapping| TypeRecord {
            definition_id: self.definition_id,
            wrapping,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DefinitionId {
    Scalar(ScalarDefinitionId),
    Object(ObjectDefinitionId),
    Interface(InterfaceDefinitionId),
    Union(UnionDefinitionId),
    Enum(EnumDefinitionId),
    InputObject(InputObjectDefinitionId),
}

impl DefinitionId {
    pub fn as_composite_type(&self) -> Option<CompositeTypeId> {
        match self {
            DefinitionId::Object(id) => Some(CompositeTypeId::Object(*id)),
            DefinitionId::Interface(id) => Some(CompositeTypeId::Interface(*id)),
            DefinitionId::Union(id) => Some(CompositeTypeId::Union(*id)),
            _ => None,
        }
    }
}

/// Types which can hold a selection set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompositeTypeId {
    Object(ObjectDefinitionId),
    Interface(InterfaceDefinitionId),
    Union(UnionDefinitionId),
}

impl CompositeTypeId {
    pub fn as_object_id(&self) -> Option<ObjectDefinitionId> {
        match self {
            CompositeTypeId::Object(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_abstract(&self) -> bool {
        !matches!(self, CompositeTypeId::Object(_))
    }
}

impl From<CompositeTypeId> for DefinitionId {
    fn from(value: CompositeTypeId) -> Self {
        match value {
            CompositeTypeId::Object(id) => DefinitionId::Object(id),
            CompositeTypeId::Interface(id) => DefinitionId::Interface(id),
            CompositeTypeId::Union(id) => DefinitionId::Union(id),
        }
    }
}

impl From<ObjectDefinitionId> for CompositeTypeId {
    fn from(id: ObjectDefinitionId) -> Self {
        CompositeTypeId::Object(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityDefinitionId {
    Object(ObjectDefinitionId),
    Interface(InterfaceDefinitionId),
}

/// Defines how a scalar should be represented and validated by the engine. Custom scalars
/// have no own data format and are treated as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumString)]
pub enum ScalarType {
    String,
    ID,
    Float,
    Int,
    Boolean,
    JSON,
}

impl ScalarType {
    pub fn from_scalar_name(name: &str) -> ScalarType {
        ScalarType::from_str(name).ok().unwrap_or(ScalarType::JSON)
    }
}

impl Schema {
    pub fn from_sdl(sdl: &str) -> Result<Schema, SchemaError> {
        builder::build(sdl)
    }

    pub fn query(&self) -> ObjectDefinitionId {
        self.root_operation_types.query_id
    }

    pub fn mutation(&self) -> Option<ObjectDefinitionId> {
        self.root_operation_types.mutation_id
    }

    pub fn subscription(&self) -> Option<ObjectDefinitionId> {
        self.root_operation_types.subscription_id
    }

    /// `String!`, the type of `__typename`.
    pub fn typename_type(&self) -> TypeRecord {
        self.typename_type
    }

    pub fn definition_by_name(&self, name: &str) -> Option<DefinitionId> {
        self.definitions
            .binary_search_by_key(&name, |definition| self.definition_name(*definition))
            .map(|index| self.definitions[index])
            .ok()
    }

    pub fn object_by_name(&self, name: &str) -> Option<ObjectDefinitionId> {
        match self.definition_by_name(name)? {
            DefinitionId::Object(id) => Some(id),
            _ => None,
        }
    }

    pub fn definition_name(&self, definition: DefinitionId) -> &str {
        match definition {
            DefinitionId::Scalar(id) => &self[id].name,
            DefinitionId::Object(id) => &self[id].name,
            DefinitionId::Interface(id) => &self[id].name,
            DefinitionId::Union(id) => &self[id].name,
            DefinitionId::Enum(id) => &self[id].name,
            DefinitionId::InputObject(id) => &self[id].name,
        }
    }

    pub fn composite_type_name(&self, ty: CompositeTypeId) -> &str {
        self.definition_name(ty.into())
    }

    pub fn type_display(&self, ty: TypeRecord) -> String {
        ty.wrapping.type_display(self.definition_name(ty.definition_id))
    }

    pub fn object_field_by_name(&self, object_id: ObjectDefinitionId, name: &str) -> Option<FieldDefinitionId> {
        self.find_field(self[object_id].field_ids, name)
    }

    pub fn interface_field_by_name(&self, interface_id: InterfaceDefinitionId, name: &str) -> Option<FieldDefinitionId> {
        self.find_field(self[interface_id].field_ids, name)
    }

    /// Unions have no fields.
    pub fn field_by_name(&self, ty: CompositeTypeId, name: &str) -> Option<FieldDefinitionId> {
        match ty {
            CompositeTypeId::Object(id) => self.object_field_by_name(id, name),
            CompositeTypeId::Interface(id) => self.interface_field_by_name(id, name),
            CompositeTypeId::Union(_) => None,
        }
    }

    /// Object types a value of `ty` may have at runtime, sorted by id.
    pub fn possible_types(&self, ty: CompositeTypeId) -> Cow<'_, [ObjectDefinitionId]> {
        match ty {
            CompositeTypeId::Object(id) => Cow::Owned(vec![id]),
            CompositeTypeId::Interface(id) => Cow::Borrowed(&self[id].possible_type_ids),
            CompositeTypeId::Union(id) => Cow::Borrowed(&self[id].possible_type_ids),
        }
    }

    pub fn is_possible_type(&self, ty: CompositeTypeId, object_id: ObjectDefinitionId) -> bool {
        match ty {
            CompositeTypeId::Object(id) => id == object_id,
            CompositeTypeId::Interface(id) => self[id].possible_type_ids.binary_search(&object_id).is_ok(),
            CompositeTypeId::Union(id) => self[id].possible_type_ids.binary_search(&object_id).is_ok(),
        }
    }

    fn find_field(&self, field_ids: IdRange<FieldDefinitionId>, name: &str) -> Option<FieldDefinitionId> {
        self[field_ids]
            .iter()
            .position(|field| field.name == name)
            .and_then(|pos| field_ids.get(pos))
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema").finish_non_exhaustive()
    }
}

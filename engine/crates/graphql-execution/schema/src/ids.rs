//! Isolating ids from the rest to prevent misuse of the NonZeroU32.
//! They can only be created by From<usize>
use crate::{
    EnumDefinitionRecord, FieldDefinitionRecord, InputObjectDefinitionRecord, InterfaceDefinitionRecord,
    ObjectDefinitionRecord, ScalarDefinitionRecord, Schema, UnionDefinitionRecord,
};

/// Reserving the 4 upper bits for some fun with bit packing. It still leaves 268 million possible values.
const MAX_ID: usize = (1 << 29) - 1;

id_newtypes::NonZeroU32! {
    Schema.object_definitions[ObjectDefinitionId] => ObjectDefinitionRecord | max(MAX_ID),
    Schema.interface_definitions[InterfaceDefinitionId] => InterfaceDefinitionRecord | max(MAX_ID),
    Schema.union_definitions[UnionDefinitionId] => UnionDefinitionRecord | max(MAX_ID),
    Schema.scalar_definitions[ScalarDefinitionId] => ScalarDefinitionRecord | max(MAX_ID),
    Schema.enum_definitions[EnumDefinitionId] => EnumDefinitionRecord | max(MAX_ID),
    Schema.input_object_definitions[InputObjectDefinitionId] => InputObjectDefinitionRecord | max(MAX_ID),
    Schema.field_definitions[FieldDefinitionId] => FieldDefinitionRecord | max(MAX_ID),
}

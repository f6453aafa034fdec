use std::collections::HashMap;

use async_graphql_parser::types::SelectionSet as ParsedSelectionSet;
use schema::ObjectDefinitionId;

use super::{collect::CollectedField, CompileError, CompileResult, Compiler};
use crate::operation::{
    collapse_include_flags, FieldSelectionNode, Location, Selection, SelectionId, SelectionKind, SelectionSet,
    SelectionSetId,
};

// Ids are NonZeroU16 shifted by one.
const MAX_IDS: usize = u16::MAX as usize;

impl<'schema, 'p> Compiler<'schema, 'p> {
    /// Builds the selection set of `object_id` out of all the parsed selection sets merged at this
    /// position, each with the include flags of the path leading to it.
    pub(super) fn build_selection_set(
        &mut self,
        object_id: ObjectDefinitionId,
        merged_selection_sets: &[(&'p ParsedSelectionSet, u64)],
    ) -> CompileResult<SelectionSetId> {
        let fields = self.collect_fields(object_id, merged_selection_sets)?;

        if self.selection_sets.len() >= MAX_IDS {
            return Err(CompileError::QueryTooBig("Too many selection sets".into()));
        }
        let id = SelectionSetId::from(self.selection_sets.len());
        self.selection_sets.push(SelectionSet {
            id,
            object_id,
            selection_ids: Vec::new(),
            positions: HashMap::new(),
            is_conditional: false,
        });

        let mut selection_ids = Vec::with_capacity(fields.len());
        for field in fields {
            selection_ids.push(self.build_selection(id, object_id, field)?);
        }

        let is_conditional = selection_ids.iter().any(|id| self[*id].is_conditional());
        let positions = selection_ids
            .iter()
            .enumerate()
            .map(|(position, id)| (self[*id].response_name.clone(), position))
            .collect();
        let selection_set = &mut self[id];
        selection_set.selection_ids = selection_ids;
        selection_set.positions = positions;
        selection_set.is_conditional = is_conditional;

        Ok(id)
    }

    fn build_selection(
        &mut self,
        selection_set_id: SelectionSetId,
        object_id: ObjectDefinitionId,
        field: CollectedField<'p>,
    ) -> CompileResult<SelectionId> {
        let (first, _) = field.nodes[0];
        let name = first.node.name.node.as_str();
        let location = Location::from(first.pos);

        if let Some((other, _)) = field.nodes.iter().find(|(node, _)| node.node.name.node.as_str() != name) {
            return Err(CompileError::FieldMergeConflict {
                response_name: field.response_name.to_string(),
                first: name.to_string(),
                second: other.node.name.node.to_string(),
                location: other.pos.into(),
            });
        }

        let schema = self.schema;
        let (definition_id, ty) = if name == "__typename" {
            (None, schema.typename_type())
        } else {
            let definition_id =
                schema
                    .object_field_by_name(object_id, name)
                    .ok_or_else(|| CompileError::UnknownField {
                        ty: schema[object_id].name.clone(),
                        name: name.to_string(),
                        location,
                    })?;
            (Some(definition_id), schema[definition_id].ty)
        };

        let composite_type = ty.definition_id.as_composite_type();
        for (node, _) in &field.nodes {
            let has_selection_set = !node.node.selection_set.node.items.is_empty();
            if composite_type.is_some() && !has_selection_set {
                return Err(CompileError::MissingSelectionSet {
                    name: name.to_string(),
                    ty: schema.type_display(ty),
                    location: node.pos.into(),
                });
            }
            if composite_type.is_none() && has_selection_set {
                return Err(CompileError::LeafWithSelectionSet {
                    name: name.to_string(),
                    ty: schema.type_display(ty),
                    location: node.pos.into(),
                });
            }
        }

        let kind = if ty.wrapping.is_list() {
            SelectionKind::List
        } else if composite_type.is_some() {
            SelectionKind::Object
        } else {
            SelectionKind::Leaf
        };

        let mut include_flags = field.nodes.iter().map(|(_, flags)| *flags).collect::<Vec<_>>();
        collapse_include_flags(&mut include_flags);
        if include_flags == [0] {
            include_flags.clear();
        }

        let nodes = field
            .nodes
            .iter()
            .map(|(node, include_flags)| FieldSelectionNode {
                location: node.pos.into(),
                include_flags: *include_flags,
            })
            .collect();

        if self.selections.len() >= MAX_IDS {
            return Err(CompileError::QueryTooBig("Too many selections".into()));
        }
        let id = SelectionId::from(self.selections.len());
        self.selections.push(Selection {
            id,
            response_name: field.response_name.to_string(),
            definition_id,
            ty,
            kind,
            nodes,
            include_flags,
            selection_sets: Vec::new(),
            declaring_selection_set_id: selection_set_id,
        });

        if let Some(composite_type) = composite_type {
            let merged_selection_sets = field
                .nodes
                .iter()
                .map(|(node, include_flags)| (&node.node.selection_set.node, *include_flags))
                .collect::<Vec<_>>();

            // Sorted by object id as possible types are.
            let mut selection_sets = Vec::new();
            for possible_type in schema.possible_types(composite_type).iter() {
                let selection_set_id = self.build_selection_set(*possible_type, &merged_selection_sets)?;
                selection_sets.push((*possible_type, selection_set_id));
            }
            self[id].selection_sets = selection_sets;
        }

        Ok(id)
    }
}

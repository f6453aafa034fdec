use super::{Operation, Selection, SelectionSet};

id_newtypes::NonZeroU16! {
    Operation.selection_sets[SelectionSetId] => SelectionSet,
    Operation.selections[SelectionId] => Selection,
}

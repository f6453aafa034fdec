// Bit 0 holds the inner non-null flag. Bits 1 to 4 hold the number of list wrappers. Starting at
// bit 5, each bit holds the non-null flag of one list wrapper, innermost first.
const INNER_IS_REQUIRED: u32 = 0b1;
const LIST_COUNT_SHIFT: u32 = 1;
const LIST_COUNT_MASK: u32 = 0b1111 << LIST_COUNT_SHIFT;
const LIST_FLAGS_SHIFT: u32 = 5;
pub const MAX_LIST_DEPTH: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListWrapping {
    NullableList,
    RequiredList,
}

/// The list and non-null modifiers around a named type, packed in a single `u32`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Wrapping(u32);

impl Wrapping {
    pub fn new(inner_is_required: bool) -> Self {
        if inner_is_required {
            Self(INNER_IS_REQUIRED)
        } else {
            Self(0)
        }
    }

    /// Marks the inner named type as non-null. Only meaningful before any list is added.
    pub fn non_null(self) -> Self {
        debug_assert!(!self.is_list(), "non_null must be applied before list wrappers");
        Self(self.0 | INNER_IS_REQUIRED)
    }

    pub fn list(self) -> Self {
        self.wrapped_by(ListWrapping::NullableList)
    }

    pub fn list_non_null(self) -> Self {
        self.wrapped_by(ListWrapping::RequiredList)
    }

    pub fn wrapped_by(self, list_wrapping: ListWrapping) -> Self {
        let count = self.list_count();
        assert!(count < MAX_LIST_DEPTH, "Too many list wrappers");
        let mut bits = (self.0 & !LIST_COUNT_MASK) | ((count + 1) << LIST_COUNT_SHIFT);
        if list_wrapping == ListWrapping::RequiredList {
            bits |= 1 << (LIST_FLAGS_SHIFT + count);
        }
        Self(bits)
    }

    pub fn inner_is_required(self) -> bool {
        self.0 & INNER_IS_REQUIRED != 0
    }

    pub fn is_list(self) -> bool {
        self.list_count() > 0
    }

    /// Whether the outermost type is non-null.
    pub fn is_required(self) -> bool {
        match self.list_count() {
            0 => self.inner_is_required(),
            n => self.list_is_required(n - 1),
        }
    }

    pub fn is_nullable(self) -> bool {
        !self.is_required()
    }

    /// Innermost first.
    pub fn list_wrappings(self) -> impl ExactSizeIterator<Item = ListWrapping> + DoubleEndedIterator {
        (0..self.list_count()).map(move |i| {
            if self.list_is_required(i) {
                ListWrapping::RequiredList
            } else {
                ListWrapping::NullableList
            }
        })
    }

    /// Removes the outermost list, giving the wrapping of the list items.
    pub fn list_item(self) -> Option<Self> {
        let count = self.list_count();
        if count == 0 {
            return None;
        }
        let outermost_flag = 1 << (LIST_FLAGS_SHIFT + count - 1);
        let bits = (self.0 & !LIST_COUNT_MASK & !outermost_flag) | ((count - 1) << LIST_COUNT_SHIFT);
        Some(Self(bits))
    }

    pub fn type_display(self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 4);
        for _ in 0..self.list_count() {
            out.push('[');
        }
        out.push_str(name);
        if self.inner_is_required() {
            out.push('!');
        }
        for wrapping in self.list_wrappings() {
            out.push(']');
            if wrapping == ListWrapping::RequiredList {
                out.push('!');
            }
        }
        out
    }

    fn list_count(self) -> u32 {
        (self.0 & LIST_COUNT_MASK) >> LIST_COUNT_SHIFT
    }

    fn list_is_required(self, i: u32) -> bool {
        self.0 & (1 << (LIST_FLAGS_SHIFT + i)) != 0
    }
}

impl std::fmt::Debug for Wrapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wrapping")
            .field("inner_is_required", &self.inner_is_required())
            .field("list_wrappings", &self.list_wrappings().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_lists() {
        // [[Int!]]!
        let wrapping = Wrapping::new(true).list().list_non_null();
        assert!(wrapping.is_required());
        assert!(wrapping.is_list());
        assert_eq!(wrapping.type_display("Int"), "[[Int!]]!");

        let item = wrapping.list_item().unwrap();
        assert!(item.is_nullable());
        assert_eq!(item.type_display("Int"), "[Int!]");

        let inner = item.list_item().unwrap();
        assert!(!inner.is_list());
        assert!(inner.is_required());
        assert_eq!(inner.list_item(), None);
    }

    #[test]
    fn named_types() {
        assert!(Wrapping::default().is_nullable());
        assert!(Wrapping::default().non_null().is_required());
        assert_eq!(Wrapping::new(false).type_display("String"), "String");
    }
}

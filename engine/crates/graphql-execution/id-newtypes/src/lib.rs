mod range;
pub use range::IdRange;

#[macro_export]
macro_rules! debug_display {
    ($name:ident) => {
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let name = stringify!($name);
                write!(
                    f,
                    "{}#{}",
                    name.strip_suffix("Id").unwrap_or(name),
                    usize::from(*self)
                )
            }
        }
        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let name = stringify!($name);
                write!(
                    f,
                    "{}#{}",
                    name.strip_suffix("Id").unwrap_or(name),
                    usize::from(*self)
                )
            }
        }
    };
}

#[macro_export]
macro_rules! index {
    ($($ty:ident$(<$( $lt:lifetime ),+>)?$(.$field:ident)+[$name:ident] => $output:ty,)*) => {
        $(
            impl$(<$($lt),+>)? std::ops::Index<$name> for $ty$(<$($lt),+>)? {
                type Output = $output;

                fn index(&self, index: $name) -> &Self::Output {
                    &self$(.$field)+[usize::from(index)]
                }
            }

            impl$(<$($lt),+>)? std::ops::IndexMut<$name> for $ty$(<$($lt),+>)? {
                fn index_mut(&mut self, index: $name) -> &mut Self::Output {
                    &mut self$(.$field)+[usize::from(index)]
                }
            }

            impl$(<$($lt),+>)? std::ops::Index<$crate::IdRange<$name>> for $ty$(<$($lt),+>)? {
                type Output = [$output];

                fn index(&self, range: $crate::IdRange<$name>) -> &Self::Output {
                    let $crate::IdRange { start, end } = range;
                    let start = usize::from(start);
                    let end = usize::from(end);
                    &self$(.$field)+[start..end]
                }
            }
        )*
    };
}

#[macro_export]
macro_rules! NonZeroU32 {
    ($($ty:ident$(<$( $lt:lifetime ),+>)?.$field:ident[$name:ident] => $output:ty $(|max($max:expr))?,)*) => {
        $(
            $crate::NonZeroU32! { $name $(|max($max))?, }
            $crate::index!{ $ty$(<$($lt),+>)?.$field[$name] => $output, }
        )*
    };
    ($($name:ident $(|max($max:expr))?,)*) => {
        $(
            #[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
            pub struct $name(std::num::NonZeroU32);

            impl From<usize> for $name {
                fn from(value: usize) -> Self {
                    $(assert!(value <= $max, "{} id {} exceeds maximum {}", stringify!($name), value, stringify!($max));)?
                    Self(
                        u32::try_from(value)
                            .ok()
                            .and_then(|value| std::num::NonZeroU32::new(value + 1))
                            .expect(concat!("Too many ", stringify!($name)))
                    )
                }
            }

            impl From<$name> for u32 {
                fn from(id: $name) -> Self {
                    (id.0.get() - 1) as u32
                }
            }

            impl From<$name> for usize {
                fn from(id: $name) -> Self {
                    (id.0.get() - 1) as usize
                }
            }

            $crate::debug_display! { $name }
        )*
    }
}

#[macro_export]
macro_rules! NonZeroU16 {
    ($($ty:ident$(<$( $lt:lifetime ),+>)?.$field:ident[$name:ident] => $output:ty $(|max($max:expr))?,)*) => {
        $(
            $crate::NonZeroU16! { $name $(|max($max))?, }
            $crate::index!{ $ty$(<$($lt),+>)?.$field[$name] => $output, }
        )*
    };
    ($($name:ident $(|max($max:expr))?,)*) => {
        $(
            #[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
            pub struct $name(std::num::NonZeroU16);

            impl From<usize> for $name {
                fn from(value: usize) -> Self {
                    $(assert!(value <= $max, "{} id {} exceeds maximum {}", stringify!($name), value, stringify!($max));)?
                    Self(
                        u16::try_from(value)
                            .ok()
                            .and_then(|value| std::num::NonZeroU16::new(value + 1))
                            .expect(concat!("Too many ", stringify!($name)))
                    )
                }
            }

            impl From<$name> for u16 {
                fn from(id: $name) -> Self {
                    (id.0.get() - 1) as u16
                }
            }

            impl From<$name> for usize {
                fn from(id: $name) -> Self {
                    (id.0.get() - 1) as usize
                }
            }

            $crate::debug_display! { $name }
        )*
    }
}

#[cfg(test)]
mod tests {
    struct Arena {
        items: Vec<&'static str>,
    }

    crate::NonZeroU16! {
        Arena.items[ItemId] => &'static str,
    }

    #[test]
    fn ids_index_their_arena() {
        let arena = Arena {
            items: vec!["a", "b", "c"],
        };
        let id = ItemId::from(1);
        assert_eq!(arena[id], "b");
        assert_eq!(usize::from(id), 1);
        assert_eq!(id.to_string(), "Item#1");
        assert_eq!(&arena[crate::IdRange::<ItemId>::from(1..3)], &["b", "c"]);
    }
}

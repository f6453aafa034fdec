/// A contiguous range of ids, `start` included and `end` excluded.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdRange<Id> {
    pub start: Id,
    pub end: Id,
}

impl<Id> IdRange<Id>
where
    Id: From<usize> + Copy,
    usize: From<Id>,
{
    pub fn empty() -> Self {
        Self {
            start: Id::from(0),
            end: Id::from(0),
        }
    }

    pub fn len(&self) -> usize {
        usize::from(self.end) - usize::from(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, i: usize) -> Option<Id> {
        let id = usize::from(self.start) + i;
        if id < usize::from(self.end) {
            Some(Id::from(id))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Id> + DoubleEndedIterator + 'static
    where
        Id: 'static,
    {
        (usize::from(self.start)..usize::from(self.end)).map(Id::from)
    }
}

impl<Id> From<std::ops::Range<usize>> for IdRange<Id>
where
    Id: From<usize>,
{
    fn from(range: std::ops::Range<usize>) -> Self {
        Self {
            start: Id::from(range.start),
            end: Id::from(range.end),
        }
    }
}

impl<Id> std::fmt::Debug for IdRange<Id>
where
    Id: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Id(usize);

    impl From<usize> for Id {
        fn from(value: usize) -> Self {
            Id(value)
        }
    }

    impl From<Id> for usize {
        fn from(id: Id) -> Self {
            id.0
        }
    }

    #[test]
    fn range_iteration() {
        let range = IdRange::<Id>::from(3..6);
        assert_eq!(range.len(), 3);
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![Id(3), Id(4), Id(5)]);
        assert_eq!(range.get(2), Some(Id(5)));
        assert_eq!(range.get(3), None);
        assert!(IdRange::<Id>::empty().is_empty());
    }
}

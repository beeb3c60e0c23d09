use crate::types::Value;
use std::fmt;
use std::rc::Rc;

/// An immutable, structurally shared singly-linked list of values.
///
/// Prepending allocates one new cell pointing at the unchanged tail, so
/// every holder of a list keeps observing the same elements.
#[derive(Clone, Default)]
pub struct List {
    head: Option<Rc<Cell>>,
}

struct Cell {
    value: Value,
    next: List,
}

impl List {
    /// The empty list.
    pub fn new() -> Self {
        List { head: None }
    }

    /// Returns a new list with `value` in front of `self`.
    pub fn cons(&self, value: Value) -> List {
        List {
            head: Some(Rc::new(Cell {
                value,
                next: self.clone(),
            })),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn first(&self) -> Option<&Value> {
        self.head.as_ref().map(|cell| &cell.value)
    }

    /// Everything after the first element, sharing structure with `self`.
    pub fn rest(&self) -> Option<List> {
        self.head.as_ref().map(|cell| cell.next.clone())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            current: self.head.as_deref(),
        }
    }

    /// True when both lists are backed by the very same cells.
    pub fn ptr_eq(&self, other: &List) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let items: Vec<Value> = iter.into_iter().collect();
        items
            .into_iter()
            .rev()
            .fold(List::new(), |tail, value| tail.cons(value))
    }
}

pub struct Iter<'a> {
    current: Option<&'a Cell>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.current?;
        self.current = cell.next.head.as_deref();
        Some(&cell.value)
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Element-wise structural equality.
impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.iter().eq(other.iter())
    }
}

impl Drop for List {
    // Unlink iteratively so dropping a long list does not recurse once per cell.
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(cell) = next {
            match Rc::try_unwrap(cell) {
                Ok(mut cell) => next = cell.next.head.take(),
                Err(_) => break,
            }
        }
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let mut first = true;
        for value in self {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
            first = false;
        }
        write!(f, "]")
    }
}

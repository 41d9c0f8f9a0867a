//! Typed library containers.

use super::Asset;

/// Common accessors of library items.
pub trait Item {
    /// Element name of the item.
    const ELEMENT: &'static str;

    /// Item id, if any.
    fn id(&self) -> Option<&str>;

    /// Item name, if any.
    fn name(&self) -> Option<&str>;
}

/// A named collection of items of one kind.
///
/// Items live in an arena in pre-order (a parent precedes its nested
/// children); `roots` lists the items that are direct children of the
/// library element. Nested items are reached through the child index
/// vectors of their parents, so the tree cannot contain cycles.
#[derive(Clone, Debug)]
pub struct Library<T> {
    /// Library id.
    pub id: Option<String>,
    /// Library name.
    pub name: Option<String>,
    /// Library-level asset information.
    pub asset: Option<Asset>,
    items: Vec<T>,
    roots: Vec<usize>,
}

impl<T> Default for Library<T> {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            asset: None,
            items: Vec::new(),
            roots: Vec::new(),
        }
    }
}

impl<T: Item> Library<T> {
    /// Create an empty library.
    pub fn new(id: Option<String>, name: Option<String>) -> Self {
        Self {
            id,
            name,
            ..Self::default()
        }
    }

    /// Append an item to the arena, returning its index.
    pub(crate) fn push(&mut self, item: T) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    /// Mark an arena index as a direct child of the library.
    pub(crate) fn push_root(&mut self, index: usize) {
        self.roots.push(index);
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Total number of items, nested ones included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item by arena index.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// All items in arena (pre-)order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Iterate over all items.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Arena indices of the direct children of the library element.
    pub fn root_indices(&self) -> &[usize] {
        &self.roots
    }

    /// Direct children of the library element, in document order.
    pub fn roots(&self) -> impl Iterator<Item = &T> {
        self.roots.iter().filter_map(|&i| self.items.get(i))
    }

    /// Find an item by id (linear scan).
    pub fn by_id(&self, id: &str) -> Option<(usize, &T)> {
        self.items.iter().enumerate().find(|(_, item)| item.id() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Thing(Option<String>);

    impl Item for Thing {
        const ELEMENT: &'static str = "thing";
        fn id(&self) -> Option<&str> {
            self.0.as_deref()
        }
        fn name(&self) -> Option<&str> {
            None
        }
    }

    #[test]
    fn test_library_arena() {
        let mut lib = Library::new(Some("L1".into()), None);
        let a = lib.push(Thing(Some("A".into())));
        let nested = lib.push(Thing(Some("A.1".into())));
        let b = lib.push(Thing(None));
        lib.push_root(a);
        lib.push_root(b);

        assert_eq!(lib.len(), 3);
        assert_eq!(lib.root_indices(), &[0, 2]);
        assert_eq!(lib.roots().count(), 2);
        assert_eq!(lib.by_id("A.1").map(|(i, _)| i), Some(nested));
        assert!(lib.by_id("B").is_none());
    }
}

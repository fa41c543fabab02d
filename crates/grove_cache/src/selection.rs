//! Row selection.
//!
//! Selection is keyed by identifier, not position, so it is untouched when a
//! sort change reorders rows or a refetch refills the cache. Only an explicit
//! [`SelectionTracker::clear`] forgets it.

use im::OrdSet;

/// How much of a set of rows is selected (for a header checkbox).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Coverage {
    /// None of the rows are selected (or there are no rows).
    None,
    /// Some but not all rows are selected.
    Partial,
    /// Every row is selected.
    All,
}

/// Set of selected identifiers.
///
/// Clone is O(1); `selected_ids` hands out a shared snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionTracker<Id: Ord + Clone> {
    selected: OrdSet<Id>,
}

impl<Id: Ord + Clone> Default for SelectionTracker<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Ord + Clone> SelectionTracker<Id> {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            selected: OrdSet::new(),
        }
    }

    /// Selects `id`. Returns true if it was not already selected.
    pub fn select(&mut self, id: Id) -> bool {
        self.selected.insert(id).is_none()
    }

    /// Deselects `id`. Returns true if it was selected.
    pub fn deselect(&mut self, id: &Id) -> bool {
        self.selected.remove(id).is_some()
    }

    /// Flips the selection of `id`. Returns the new state.
    pub fn toggle(&mut self, id: Id) -> bool {
        if self.deselect(&id) {
            false
        } else {
            self.select(id);
            true
        }
    }

    /// Returns true if `id` is selected.
    #[must_use]
    pub fn is_selected(&self, id: &Id) -> bool {
        self.selected.contains(id)
    }

    /// Returns a snapshot of the selected identifiers, in order.
    #[must_use]
    pub fn selected_ids(&self) -> OrdSet<Id> {
        self.selected.clone()
    }

    /// Selects every identifier in `ids`.
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = Id>) {
        for id in ids {
            self.selected.insert(id);
        }
    }

    /// Deselects every identifier in `ids`.
    pub fn deselect_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a Id>)
    where
        Id: 'a,
    {
        for id in ids {
            self.selected.remove(id);
        }
    }

    /// Reports how many of `ids` are selected.
    pub fn coverage<'a>(&self, ids: impl IntoIterator<Item = &'a Id>) -> Coverage
    where
        Id: 'a,
    {
        let (mut seen, mut hit) = (0usize, 0usize);
        for id in ids {
            seen += 1;
            if self.selected.contains(id) {
                hit += 1;
            }
        }
        match hit {
            0 => Coverage::None,
            n if n == seen => Coverage::All,
            _ => Coverage::Partial,
        }
    }

    /// Number of selected identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns true if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Forgets the whole selection.
    pub fn clear(&mut self) {
        self.selected = OrdSet::new();
    }
}

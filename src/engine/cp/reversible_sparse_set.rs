use super::TrailedInteger;
use super::TrailedValues;
use crate::smart_table_assert_moderate;
use crate::smart_table_assert_simple;

/// A backtrackable set over the dense id space `0..capacity`.
///
/// The values are kept in a permutation of which the first `size` entries are the members, in
/// the style of the sparse-set domain representation of de Saint-Marcq et al. (TRICS 2013):
/// removal swaps the value behind the member prefix and decrements `size`. The size itself
/// lives in a [`TrailedInteger`], so backtracking restores earlier memberships without touching
/// the permutation — every value removed in a branch sits right behind the prefix boundary the
/// branch started with.
///
/// Membership tests are O(1) and iteration over the members is O(size).
#[derive(Debug, Clone)]
pub(crate) struct ReversibleSparseSet {
    values: Vec<usize>,
    positions: Vec<usize>,
    size: TrailedInteger,
}

impl ReversibleSparseSet {
    /// Create the set `{0..capacity}` with its size registered as a reversible integer.
    pub(crate) fn new(capacity: usize, trailed_values: &mut TrailedValues) -> Self {
        ReversibleSparseSet {
            values: (0..capacity).collect(),
            positions: (0..capacity).collect(),
            size: trailed_values.grow(capacity as i64),
        }
    }

    pub(crate) fn len(&self, trailed_values: &TrailedValues) -> usize {
        trailed_values.read(self.size) as usize
    }

    pub(crate) fn is_empty(&self, trailed_values: &TrailedValues) -> bool {
        self.len(trailed_values) == 0
    }

    /// The member at position `index` in the member prefix.
    pub(crate) fn get(&self, index: usize, trailed_values: &TrailedValues) -> usize {
        smart_table_assert_simple!(index < self.len(trailed_values));
        self.values[index]
    }

    pub(crate) fn contains(&self, value: usize, trailed_values: &TrailedValues) -> bool {
        self.positions[value] < self.len(trailed_values)
    }

    /// Remove a member by swapping it behind the member prefix. The removal is undone when the
    /// search backtracks past this point.
    pub(crate) fn remove(&mut self, value: usize, trailed_values: &mut TrailedValues) {
        smart_table_assert_moderate!(self.contains(value, trailed_values));

        let size = self.len(trailed_values);
        let position = self.positions[value];
        let last = self.values[size - 1];

        self.values.swap(position, size - 1);
        self.positions[value] = size - 1;
        self.positions[last] = position;

        trailed_values.add_assign(self.size, -1);
    }
}

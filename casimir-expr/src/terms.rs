//! A sparse, index-stable, insertion-ordered container for terms.
//!
//! [`TermCollection`] stores values in logical slots `0..bound()`. A slot is either occupied or a
//! hole; removing a value leaves a hole, so the indices of all other values are stable. Holes at
//! the end of the collection are trimmed away, which keeps `bound()` a high-water mark of the
//! occupied slots.
//!
//! The simplifier uses this container for flattened operand lists, where removal during pairwise
//! scans must not disturb the indices still to be visited. The polynomial code reuses it as a
//! coefficient store, with the slot index as the power and holes as zero coefficients.

use crate::expr::Expr;

/// A sparse, index-stable collection of terms. See the [module-level documentation](self).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermCollection<T> {
    /// Invariant: the last slot, if any, is occupied.
    slots: Vec<Option<T>>,
}

impl<T> TermCollection<T> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Returns the number of occupied slots.
    pub fn size(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns the index one past the highest occupied slot, or 0 if the collection is empty.
    ///
    /// Trailing holes never count towards the bound.
    pub fn bound(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns a reference to the value at the given slot, or `None` if the slot is a hole or
    /// out of bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    /// Returns a mutable reference to the value at the given slot, or `None` if the slot is a
    /// hole or out of bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(|slot| slot.as_mut())
    }

    /// Returns a reference to the value in the highest occupied slot.
    pub fn last(&self) -> Option<&T> {
        // the invariant makes this the last slot itself
        self.slots.last().and_then(|slot| slot.as_ref())
    }

    /// Appends a value in the slot at `bound()`.
    pub fn add(&mut self, value: T) {
        self.slots.push(Some(value));
    }

    /// Stores a value in the given slot, growing the collection with holes as needed.
    ///
    /// Returns the value previously occupying the slot, if any.
    pub fn put(&mut self, index: usize, value: T) -> Option<T> {
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index].replace(value)
    }

    /// Inserts a value at the given slot. If the slot is a hole, it is filled in place; if it is
    /// occupied, the value at the slot and everything after it shift up by one; if it is past
    /// the bound, the collection grows with holes as for [`put`](Self::put).
    pub fn insert(&mut self, index: usize, value: T) {
        if index >= self.slots.len() {
            self.put(index, value);
        } else if self.slots[index].is_none() {
            self.slots[index] = Some(value);
        } else {
            self.slots.insert(index, Some(value));
        }
    }

    /// Removes and returns the value at the given slot, leaving a hole.
    ///
    /// Returns `None` (and changes nothing) if the slot is already a hole or out of bounds.
    /// Trailing holes are trimmed, so the bound shrinks when the last value is removed.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let value = self.slots.get_mut(index)?.take()?;
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        Some(value)
    }

    /// Removes every value from the collection.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Deep-copies the slots in the given range into a new collection, re-based to slot 0.
    ///
    /// Holes inside the range are preserved; trailing holes are trimmed as everywhere else.
    /// The range is clamped to the bound, so an out-of-bounds range copies what exists.
    pub fn copy_range(&self, range: std::ops::Range<usize>) -> TermCollection<T>
    where
        T: Clone,
    {
        let start = range.start.min(self.slots.len());
        let end = range.end.clamp(start, self.slots.len());
        let mut slots = self.slots[start..end].to_vec();
        while matches!(slots.last(), Some(None)) {
            slots.pop();
        }
        TermCollection { slots }
    }

    /// Returns an iterator over `(slot, value)` pairs of the occupied slots, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|value| (i, value)))
    }

    /// Returns an iterator over the values of occupied slots, in slot order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }

    /// Consumes the collection, returning an iterator over the values of occupied slots in slot
    /// order.
    pub fn into_values(self) -> impl Iterator<Item = T> {
        self.slots.into_iter().flatten()
    }

    /// Applies `f` to every occupied slot, preserving holes.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> TermCollection<U> {
        TermCollection {
            slots: self
                .slots
                .iter()
                .map(|slot| slot.as_ref().map(&mut f))
                .collect(),
        }
    }

    /// Applies a fallible `f` to every occupied slot, preserving holes and propagating the first
    /// failure. The collection itself is left untouched.
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(&T) -> Result<U, E>,
    ) -> Result<TermCollection<U>, E> {
        let slots = self
            .slots
            .iter()
            .map(|slot| slot.as_ref().map(&mut f).transpose())
            .collect::<Result<Vec<_>, E>>()?;
        Ok(TermCollection { slots })
    }

    /// Checks whether `self` and `other` hold equivalent values as multisets, under the given
    /// equivalence predicate.
    ///
    /// Each value of `self` is paired off against a distinct, still-unpaired equivalent value of
    /// `other`; the collections are equivalent in terms when every value on both sides is
    /// paired. Slot positions and holes play no role here, unlike [`PartialEq`].
    pub fn equivalent_in_terms(
        &self,
        other: &TermCollection<T>,
        eq: impl Fn(&T, &T) -> bool,
    ) -> bool {
        if self.size() != other.size() {
            return false;
        }

        let mut paired = vec![false; other.slots.len()];
        for value in self.values() {
            let matched = other.iter().find(|&(j, candidate)| {
                !paired[j] && eq(value, candidate)
            });
            match matched {
                Some((j, _)) => paired[j] = true,
                None => return false,
            }
        }
        true
    }

    /// Removes all values that are equivalent to an earlier value, keeping the first of each
    /// equivalence class.
    pub fn remove_multiple_equivalent_terms(&mut self, eq: impl Fn(&T, &T) -> bool) {
        let mut kept: Vec<usize> = Vec::new();
        let mut doomed: Vec<usize> = Vec::new();
        for i in 0..self.slots.len() {
            let Some(value) = self.get(i) else { continue };
            if kept.iter().any(|&k| {
                self.get(k).map_or(false, |earlier| eq(earlier, value))
            }) {
                doomed.push(i);
            } else {
                kept.push(i);
            }
        }

        for i in doomed {
            self.remove(i);
        }
    }
}

impl<T> Default for TermCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for TermCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().map(Some).collect(),
        }
    }
}

/// Elementwise arithmetic between every term of a collection and a single scalar expression.
///
/// These build plain binary nodes; no simplification is done. Callers that want the results
/// folded map the collection through the simplifier afterwards.
impl TermCollection<Expr> {
    /// Adds `scalar` to every term.
    pub fn scalar_sum(&self, scalar: &Expr) -> TermCollection<Expr> {
        self.map(|term| Expr::sum(term.clone(), scalar.clone()))
    }

    /// Subtracts `scalar` from every term.
    pub fn scalar_difference(&self, scalar: &Expr) -> TermCollection<Expr> {
        self.map(|term| Expr::difference(term.clone(), scalar.clone()))
    }

    /// Multiplies every term by `scalar`.
    pub fn scalar_product(&self, scalar: &Expr) -> TermCollection<Expr> {
        self.map(|term| Expr::product(term.clone(), scalar.clone()))
    }

    /// Divides every term by `scalar`.
    pub fn scalar_quotient(&self, scalar: &Expr) -> TermCollection<Expr> {
        self.map(|term| Expr::quotient(term.clone(), scalar.clone()))
    }

    /// Raises every term to the power `scalar`.
    pub fn scalar_power(&self, scalar: &Expr) -> TermCollection<Expr> {
        self.map(|term| Expr::power(term.clone(), scalar.clone()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn collected(values: &[i32]) -> TermCollection<i32> {
        values.iter().copied().collect()
    }

    #[test]
    fn removal_keeps_indices_stable() {
        let mut terms = collected(&[10, 20, 30, 40]);
        assert_eq!(terms.remove(1), Some(20));
        assert_eq!(terms.get(0), Some(&10));
        assert_eq!(terms.get(1), None);
        assert_eq!(terms.get(2), Some(&30));
        assert_eq!(terms.size(), 3);
        assert_eq!(terms.bound(), 4);
    }

    #[test]
    fn trailing_holes_are_trimmed() {
        let mut terms = collected(&[10, 20, 30]);
        terms.remove(2);
        assert_eq!(terms.bound(), 2);

        // removing the middle first leaves a hole, so the bound only shrinks once the tail goes
        let mut terms = collected(&[10, 20, 30]);
        terms.remove(1);
        assert_eq!(terms.bound(), 3);
        terms.remove(2);
        assert_eq!(terms.bound(), 1);

        terms.remove(0);
        assert!(terms.is_empty());
        assert_eq!(terms, TermCollection::new());
    }

    #[test]
    fn put_grows_with_holes() {
        let mut terms = TermCollection::new();
        assert_eq!(terms.put(3, 40), None);
        assert_eq!(terms.bound(), 4);
        assert_eq!(terms.size(), 1);
        assert_eq!(terms.get(0), None);
        assert_eq!(terms.get(3), Some(&40));
        assert_eq!(terms.put(3, 41), Some(40));
    }

    #[test]
    fn insert_fills_holes_or_shifts() {
        let mut terms = collected(&[10, 20, 30]);
        terms.remove(1);
        terms.insert(1, 21);
        assert_eq!(terms.get(1), Some(&21));
        assert_eq!(terms.bound(), 3);

        terms.insert(1, 22);
        assert_eq!(terms.get(1), Some(&22));
        assert_eq!(terms.get(2), Some(&21));
        assert_eq!(terms.get(3), Some(&30));
        assert_eq!(terms.bound(), 4);
    }

    #[test]
    fn removing_a_hole_changes_nothing() {
        let mut terms = collected(&[10, 20]);
        terms.remove(1);
        let before = terms.clone();
        assert_eq!(terms.remove(1), None);
        assert_eq!(terms.remove(17), None);
        assert_eq!(terms, before);
    }

    #[test]
    fn range_copies_are_rebased_and_independent() {
        let mut terms = collected(&[10, 20, 30, 40, 50]);
        terms.remove(3);

        let mut copy = terms.copy_range(1..5);
        assert_eq!(copy.get(0), Some(&20));
        assert_eq!(copy.get(1), Some(&30));
        assert_eq!(copy.get(2), None);
        assert_eq!(copy.get(3), Some(&50));
        assert_eq!(copy.bound(), 4);

        // mutating the copy leaves the original alone
        copy.remove(0);
        assert_eq!(terms.get(1), Some(&20));

        // a range ending in holes trims them, and out-of-bounds ranges clamp
        assert_eq!(terms.copy_range(2..4).bound(), 1);
        assert_eq!(terms.copy_range(4..9), collected(&[50]));
        assert!(terms.copy_range(7..9).is_empty());
    }

    #[test]
    fn multiset_equivalence_ignores_positions() {
        let a = collected(&[1, 2, 2, 3]);
        let mut b = collected(&[3, 2, 1, 2]);
        assert!(a.equivalent_in_terms(&b, |x, y| x == y));

        // multiplicity matters
        b.remove(1);
        b.add(4);
        assert!(!a.equivalent_in_terms(&b, |x, y| x == y));
    }

    #[test]
    fn dedup_keeps_first_of_each_class() {
        let mut terms = collected(&[1, -1, 2, 1, -2]);
        terms.remove_multiple_equivalent_terms(|a, b| a.abs() == b.abs());
        assert_eq!(terms.iter().collect::<Vec<_>>(), vec![(0, &1), (2, &2)]);
    }

    #[test]
    fn try_map_propagates_first_failure() {
        let terms = collected(&[1, 2, 3]);
        let doubled = terms.try_map(|&n| Ok::<_, ()>(n * 2)).unwrap();
        assert_eq!(doubled, collected(&[2, 4, 6]));

        let failed: Result<TermCollection<i32>, &str> =
            terms.try_map(|&n| if n == 2 { Err("two") } else { Ok(n) });
        assert_eq!(failed, Err("two"));
        // the source is untouched
        assert_eq!(terms, collected(&[1, 2, 3]));
    }

    #[test]
    fn try_map_preserves_holes() {
        let mut terms = collected(&[1, 2, 3]);
        terms.remove(1);
        let mapped = terms.try_map(|&n| Ok::<_, ()>(n + 1)).unwrap();
        assert_eq!(mapped.get(0), Some(&2));
        assert_eq!(mapped.get(1), None);
        assert_eq!(mapped.get(2), Some(&4));
    }

    #[test]
    fn scalar_ops_build_nodes() {
        let terms: TermCollection<Expr> = [Expr::symbol("x"), Expr::int(3)].into_iter().collect();
        let summed = terms.scalar_sum(&Expr::int(1));
        assert_eq!(summed.get(0), Some(&Expr::sum(Expr::symbol("x"), Expr::int(1))));
        assert_eq!(summed.get(1), Some(&Expr::sum(Expr::int(3), Expr::int(1))));
    }
}

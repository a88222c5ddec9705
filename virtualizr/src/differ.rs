use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::error::EditKind;
use crate::fenwick::Fenwick;
use crate::key::{IdentityKey, KeyIndexMap};
use crate::{Anomaly, IdentityFn};

/// One step of the transition between two snapshots.
///
/// Indices are interpreted sequentially: each op applies to the list produced by the ops before
/// it (see [`EditScript::apply_to`]).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EditOp<T> {
    /// Insert `item` before position `at`.
    Insert { at: usize, item: T },
    /// Remove the element at `at`.
    Remove { at: usize },
    /// Remove the element at `from`, then insert it at `to`.
    Move { from: usize, to: usize, item: T },
    /// Same identity, new value: rebind in place.
    IdentityUpdate { at: usize, item: T },
}

impl<T> EditOp<T> {
    pub fn kind(&self) -> EditKind {
        match self {
            Self::Insert { .. } => EditKind::Insert,
            Self::Remove { .. } => EditKind::Remove,
            Self::Move { .. } => EditKind::Move,
            Self::IdentityUpdate { .. } => EditKind::IdentityUpdate,
        }
    }
}

/// An ordered sequence of [`EditOp`]s.
///
/// Scripts produced by [`CollectionDiffer`] list every `Remove` first (highest previous index
/// first), followed by the walk over the current snapshot in ascending index order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditScript<T> {
    ops: Vec<EditOp<T>>,
}

impl<T> Default for EditScript<T> {
    fn default() -> Self {
        Self { ops: Vec::new() }
    }
}

impl<T> EditScript<T> {
    pub fn from_ops(ops: Vec<EditOp<T>>) -> Self {
        Self { ops }
    }

    pub fn ops(&self) -> &[EditOp<T>] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<EditOp<T>> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, EditOp<T>> {
        self.ops.iter()
    }

    /// Net change in collection length.
    pub fn len_delta(&self) -> isize {
        self.ops.iter().fold(0isize, |acc, op| match op {
            EditOp::Insert { .. } => acc + 1,
            EditOp::Remove { .. } => acc - 1,
            _ => acc,
        })
    }

    pub fn count(&self, kind: EditKind) -> usize {
        self.ops.iter().filter(|op| op.kind() == kind).count()
    }

    /// Follows the element that sat at `index` before the script through every op.
    ///
    /// Returns `None` when that element is removed.
    pub fn remap_index(&self, index: usize) -> Option<usize> {
        let mut cur = index;
        for op in &self.ops {
            match op {
                EditOp::Insert { at, .. } => {
                    if *at <= cur {
                        cur += 1;
                    }
                }
                EditOp::Remove { at } => {
                    if *at == cur {
                        return None;
                    }
                    if *at < cur {
                        cur -= 1;
                    }
                }
                EditOp::Move { from, to, .. } => {
                    if *from == cur {
                        cur = *to;
                    } else {
                        if *from < cur {
                            cur -= 1;
                        }
                        if *to <= cur {
                            cur += 1;
                        }
                    }
                }
                EditOp::IdentityUpdate { .. } => {}
            }
        }
        Some(cur)
    }

    /// Replays the script against `items`.
    ///
    /// This is `O(n * ops)` and meant for mirrored models and tests, not for the hot path.
    pub fn apply_to(&self, items: &mut Vec<T>) -> Result<(), Anomaly>
    where
        T: Clone,
    {
        for op in &self.ops {
            let len = items.len();
            let oob = |index: usize| Anomaly::OutOfBounds {
                op: op.kind(),
                index,
                len,
            };
            match op {
                EditOp::Insert { at, item } => {
                    if *at > len {
                        return Err(oob(*at));
                    }
                    items.insert(*at, item.clone());
                }
                EditOp::Remove { at } => {
                    if *at >= len {
                        return Err(oob(*at));
                    }
                    items.remove(*at);
                }
                EditOp::Move { from, to, item } => {
                    if *from >= len {
                        return Err(oob(*from));
                    }
                    if *to >= len {
                        return Err(oob(*to));
                    }
                    items.remove(*from);
                    items.insert(*to, item.clone());
                }
                EditOp::IdentityUpdate { at, item } => {
                    let Some(slot) = items.get_mut(*at) else {
                        return Err(oob(*at));
                    };
                    *slot = item.clone();
                }
            }
        }
        Ok(())
    }
}

impl<T> IntoIterator for EditScript<T> {
    type Item = EditOp<T>;
    type IntoIter = alloc::vec::IntoIter<EditOp<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a EditScript<T> {
    type Item = &'a EditOp<T>;
    type IntoIter = core::slice::Iter<'a, EditOp<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

/// Computes edit scripts between two snapshots by item identity.
///
/// The walk is `O(n)` in the snapshot lengths plus `O(log n)` per reported move. Scripts are not
/// guaranteed minimal, but their length is bounded by the number of inserted, removed, moved and
/// updated items, and identical inputs always yield identical scripts.
pub struct CollectionDiffer<T, K> {
    identity: IdentityFn<T, K>,
}

impl<T, K> Clone for CollectionDiffer<T, K> {
    fn clone(&self) -> Self {
        Self {
            identity: Arc::clone(&self.identity),
        }
    }
}

impl<T, K> fmt::Debug for CollectionDiffer<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionDiffer").finish_non_exhaustive()
    }
}

impl<T: Clone + IdentityKey + 'static> CollectionDiffer<T, T> {
    /// Items are their own identity (value equality).
    pub fn by_value() -> Self {
        Self {
            identity: Arc::new(|item: &T| Some(item.clone())),
        }
    }
}

impl<T: 'static, K: IdentityKey + 'static> CollectionDiffer<T, K> {
    /// Uses a fallible identity function. Items mapped to `None` are never matched.
    pub fn new(identity: impl Fn(&T) -> Option<K> + Send + Sync + 'static) -> Self {
        Self {
            identity: Arc::new(identity),
        }
    }

    /// Uses an infallible key-extraction function.
    pub fn keyed(key: impl Fn(&T) -> K + Send + Sync + 'static) -> Self {
        Self::new(move |item| Some(key(item)))
    }
}

impl<T, K: IdentityKey> CollectionDiffer<T, K> {
    pub fn identify(&self, item: &T) -> Option<K> {
        (self.identity)(item)
    }

    /// Diffs two snapshots, discarding anomalies.
    pub fn diff(&self, previous: &[T], current: &[T]) -> EditScript<T>
    where
        T: Clone + PartialEq,
    {
        self.diff_with(previous, current, &mut |_| {})
    }

    /// Diffs two snapshots, reporting unidentifiable current items to `report`.
    pub fn diff_with(
        &self,
        previous: &[T],
        current: &[T],
        report: &mut dyn FnMut(Anomaly),
    ) -> EditScript<T>
    where
        T: Clone + PartialEq,
    {
        // `heads[key]` is the earliest unclaimed previous position of `key`; `next_same[p]` links
        // `p` to the next previous occurrence of the same key.
        let mut heads = KeyIndexMap::<K>::new();
        let mut next_same: Vec<Option<usize>> = alloc::vec![None; previous.len()];
        for (i, item) in previous.iter().enumerate().rev() {
            if let Some(key) = (self.identity)(item) {
                next_same[i] = heads.insert(key, i);
            }
        }

        // `sources[j]`: the previous position matched by current item `j`.
        let mut claimed = alloc::vec![false; previous.len()];
        let mut sources: Vec<Option<usize>> = Vec::with_capacity(current.len());
        for (j, item) in current.iter().enumerate() {
            let source = match (self.identity)(item) {
                Some(key) => {
                    let head = heads.remove(&key);
                    if let Some(next) = head.and_then(|p| next_same[p]) {
                        heads.insert(key, next);
                    }
                    head
                }
                None => {
                    vwarn!(index = j, "unidentifiable item, replacing");
                    report(Anomaly::Unidentifiable { index: j });
                    None
                }
            };
            if let Some(p) = source {
                claimed[p] = true;
            }
            sources.push(source);
        }

        // Survivors keep their relative order; `ranks[p]` is p's position among them.
        let mut ranks = alloc::vec![0usize; previous.len()];
        let mut survivors = 0usize;
        for (p, &kept) in claimed.iter().enumerate() {
            if kept {
                ranks[p] = survivors;
                survivors += 1;
            }
        }

        let mut ops = Vec::new();
        for p in (0..previous.len()).rev() {
            if !claimed[p] {
                ops.push(EditOp::Remove { at: p });
            }
        }

        // Working list during the walk: current[..j] followed by the unplaced survivors in rank
        // order. Every rank below `cursor` is placed; ranks above it placed early are marked in
        // `out_of_order`.
        let mut placed = alloc::vec![false; survivors];
        let mut out_of_order = Fenwick::new(survivors);
        let mut cursor = 0usize;
        for (j, item) in current.iter().enumerate() {
            while cursor < survivors && placed[cursor] {
                cursor += 1;
            }
            let Some(p) = sources[j] else {
                ops.push(EditOp::Insert {
                    at: j,
                    item: item.clone(),
                });
                continue;
            };

            let rank = ranks[p];
            placed[rank] = true;
            if rank == cursor {
                cursor += 1;
                if previous[p] != *item {
                    ops.push(EditOp::IdentityUpdate {
                        at: j,
                        item: item.clone(),
                    });
                }
            } else {
                debug_assert!(rank > cursor, "placed survivor matched twice (rank={rank})");
                let from = j + (rank - cursor) - out_of_order.range_count(cursor, rank);
                out_of_order.mark(rank);
                ops.push(EditOp::Move {
                    from,
                    to: j,
                    item: item.clone(),
                });
            }
        }

        vtrace!(
            previous = previous.len(),
            current = current.len(),
            ops = ops.len(),
            "diff"
        );
        EditScript { ops }
    }
}

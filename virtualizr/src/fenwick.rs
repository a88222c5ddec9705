use alloc::vec::Vec;
use core::cmp;

/// Fenwick tree over per-rank marks.
///
/// The differ uses it to count how many survivors inside a rank span were already placed out of
/// order, which turns "where is this item in the working list right now" into an `O(log n)`
/// query. The tree is allocated lazily on the first mark, so scripts without moves never pay for
/// it.
#[derive(Clone, Debug, Default)]
pub(crate) struct Fenwick {
    tree: Vec<u32>, // 1-indexed
    len: usize,
}

impl Fenwick {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            tree: Vec::new(),
            len,
        }
    }

    pub(crate) fn mark(&mut self, index: usize) {
        let n = self.len;
        if index >= n {
            debug_assert!(index < n, "Fenwick: mark out of bounds (idx={index}, len={n})");
            return;
        }
        if self.tree.is_empty() {
            self.tree = alloc::vec![0; n + 1];
        }
        let mut i = index + 1;
        while i <= n {
            self.tree[i] = self.tree[i].saturating_add(1);
            i += lsb(i);
        }
    }

    /// Number of marks in `[0, count)`.
    pub(crate) fn prefix_count(&self, count: usize) -> usize {
        if self.tree.is_empty() {
            return 0;
        }
        let mut i = cmp::min(count, self.len);
        let mut sum = 0usize;
        while i > 0 {
            sum = sum.saturating_add(self.tree[i] as usize);
            i &= i - 1;
        }
        sum
    }

    /// Number of marks in `[start, end)`.
    pub(crate) fn range_count(&self, start: usize, end: usize) -> usize {
        if end <= start {
            return 0;
        }
        self.prefix_count(end) - self.prefix_count(start)
    }
}

fn lsb(i: usize) -> usize {
    i & i.wrapping_neg()
}

#[cfg(test)]
mod tests {
    use super::Fenwick;

    #[test]
    fn counts_marks_in_spans() {
        let mut f = Fenwick::new(10);
        assert_eq!(f.range_count(0, 10), 0);
        f.mark(2);
        f.mark(7);
        f.mark(9);
        assert_eq!(f.prefix_count(3), 1);
        assert_eq!(f.range_count(3, 9), 1);
        assert_eq!(f.range_count(0, 10), 3);
        assert_eq!(f.range_count(8, 8), 0);
        assert_eq!(f.prefix_count(100), 3);
    }
}

/// Inclusive span of data indices currently materialized as views.
///
/// A range is never empty: "nothing to show" is modelled as `Option<VisibleRange>::None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub first_index: usize,
    pub last_index: usize, // inclusive
}

impl VisibleRange {
    pub fn new(first_index: usize, last_index: usize) -> Self {
        debug_assert!(
            first_index <= last_index,
            "VisibleRange: first_index must not exceed last_index (first={first_index}, last={last_index})"
        );
        Self {
            first_index,
            last_index,
        }
    }

    /// Number of indices covered by the range.
    pub fn len(&self) -> usize {
        self.last_index - self.first_index + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.first_index && index <= self.last_index
    }

    /// Returns `true` when the two ranges share no index.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        other.first_index > self.last_index || other.last_index < self.first_index
    }
}

/// Where the buffer rows go relative to the strictly visible rows.
///
/// The total buffer budget is always `2 * buffer`, so the pool capacity does not depend on the
/// policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BufferPolicy {
    /// `buffer` rows before and `buffer` rows after the visible rows.
    #[default]
    Symmetric,
    /// All buffer rows before the visible rows.
    Leading,
    /// All buffer rows after the visible rows.
    Trailing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// Per-view metadata handed to the rendering host.
///
/// These are plain values recomputed on every reconciliation pass; hosts should not cache them
/// across passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewMeta {
    /// Bound data index.
    pub index: usize,
    /// Position of the view inside the pool.
    pub position: usize,
    /// Pool length at the end of the pass.
    pub count: usize,
}

impl ViewMeta {
    pub fn is_first(&self) -> bool {
        self.position == 0
    }

    pub fn is_last(&self) -> bool {
        self.position + 1 == self.count
    }

    pub fn is_even(&self) -> bool {
        self.index % 2 == 0
    }

    pub fn is_odd(&self) -> bool {
        !self.is_even()
    }
}

/// Scroll-extent geometry the host needs to size its spacer and window wrapper.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutExtent {
    /// `nb_of_elements * element_size`.
    pub total_size: u64,
    /// `nb_of_elements_displayed * element_size`.
    pub window_size: u64,
}

/// Handle returned by `on_range_change`; pass it back to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription(pub(crate) u64);

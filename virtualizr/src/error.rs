use core::fmt;

/// A fatal setup error. Reported immediately and never retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The element size must be at least one unit.
    NonPositiveElementSize,
    /// `count * element_size` does not fit the scroll axis.
    ElementSizeOverflow { element_size: u32, count: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveElementSize => f.write_str("element size must be positive"),
            Self::ElementSizeOverflow {
                element_size,
                count,
            } => write!(
                f,
                "total extent overflows (element_size={element_size}, count={count})"
            ),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Which edit operation an [`Anomaly::OutOfBounds`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EditKind {
    Insert,
    Remove,
    Move,
    IdentityUpdate,
}

/// A recoverable problem hit during a reconciliation pass.
///
/// The offending operation is skipped; the pass still completes and the pool invariants hold
/// (stale views are excluded from consumer-visible reads until the next pass rebuilds them).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Anomaly {
    /// The identity function could not identify the item at `index`; it is always replaced.
    Unidentifiable { index: usize },
    /// The data source could not supply `index` although the engine accounts for `len` items.
    MissingItem { index: usize, len: usize },
    /// The data source shrank while a snapshot was being captured.
    SnapshotTruncated { expected: usize, captured: usize },
    /// An edit operation referred to an index outside the working length.
    OutOfBounds {
        op: EditKind,
        index: usize,
        len: usize,
    },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unidentifiable { index } => {
                write!(f, "item at index {index} has no identity")
            }
            Self::MissingItem { index, len } => {
                write!(f, "data source cannot supply index {index} (len={len})")
            }
            Self::SnapshotTruncated { expected, captured } => write!(
                f,
                "snapshot truncated while capturing (expected={expected}, captured={captured})"
            ),
            Self::OutOfBounds { op, index, len } => {
                write!(f, "{op:?} at index {index} is out of bounds (len={len})")
            }
        }
    }
}

impl core::error::Error for Anomaly {}

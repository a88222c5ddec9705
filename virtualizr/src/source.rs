use alloc::rc::Rc;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::Anomaly;

/// An ordered backing collection, owned by the host.
///
/// `get` may fail for an index below `len` when the owner truncates the collection between two
/// calls; the engine treats that as a recoverable [`Anomaly::MissingItem`].
pub trait DataSource {
    type Item;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<Self::Item>;
}

impl<T: Clone> DataSource for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<T> {
        self.as_slice().get(index).cloned()
    }
}

impl<T: Clone> DataSource for Arc<[T]> {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, index: usize) -> Option<T> {
        <[T]>::get(self, index).cloned()
    }
}

/// A collection the host keeps mutating in place and shares with the engine.
impl<T: Clone> DataSource for Rc<RefCell<Vec<T>>> {
    type Item = T;

    fn len(&self) -> usize {
        self.borrow().len()
    }

    fn get(&self, index: usize) -> Option<T> {
        self.borrow().as_slice().get(index).cloned()
    }
}

/// Copies `source` into an owned snapshot.
///
/// The length is read once up front; if the source stops supplying items before that length,
/// the snapshot ends there and the truncation is reported.
pub(crate) fn capture<S: DataSource>(
    source: &S,
    report: &mut dyn FnMut(Anomaly),
) -> Vec<S::Item> {
    let expected = source.len();
    let mut items = Vec::with_capacity(expected);
    for index in 0..expected {
        match source.get(index) {
            Some(item) => items.push(item),
            None => {
                vwarn!(expected, captured = index, "snapshot truncated");
                report(Anomaly::SnapshotTruncated {
                    expected,
                    captured: index,
                });
                break;
            }
        }
    }
    items
}

use alloc::collections::VecDeque;

use crate::{RenderHost, ViewMeta};

/// One live rendering unit and the data it is bound to.
#[derive(Clone, Debug)]
pub struct ViewHandle<V, T> {
    view: V,
    item: Option<T>,
    index: usize,
    position: usize,
    count: usize,
}

impl<V, T> ViewHandle<V, T> {
    pub fn view(&self) -> &V {
        &self.view
    }

    /// The bound item, or `None` while the view is stale.
    pub fn item(&self) -> Option<&T> {
        self.item.as_ref()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn meta(&self) -> ViewMeta {
        ViewMeta {
            index: self.index,
            position: self.position,
            count: self.count,
        }
    }

    /// A stale view could not be bound during its last pass and is rebuilt on the next one.
    pub fn is_stale(&self) -> bool {
        self.item.is_none()
    }
}

/// Ordered pool of live views, contiguous in data-index space.
///
/// The pool owns every [`ViewHandle`]; views are only created and destroyed through these
/// methods, which forward to the [`RenderHost`]. Positions out of range are rejected (and
/// debug-asserted) rather than panicking.
#[derive(Clone, Debug)]
pub struct ViewPool<V, T> {
    entries: VecDeque<ViewHandle<V, T>>,
}

impl<V, T> Default for ViewPool<V, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, T> ViewPool<V, T> {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&ViewHandle<V, T>> {
        self.entries.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewHandle<V, T>> {
        self.entries.iter()
    }

    /// Bound data indices in pool order.
    pub fn bound_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|h| h.index)
    }

    pub fn has_stale(&self) -> bool {
        self.entries.iter().any(ViewHandle::is_stale)
    }

    /// Creates a view at `position`, bound to `item` (or stale if `item` is `None`).
    pub fn create<H>(&mut self, host: &mut H, position: usize, item: Option<T>, index: usize) -> bool
    where
        H: RenderHost<T, View = V>,
    {
        let len = self.entries.len();
        if position > len {
            debug_assert!(position <= len, "ViewPool::create out of bounds (pos={position}, len={len})");
            return false;
        }
        let mut view = host.create_view(index);
        let meta = ViewMeta {
            index,
            position,
            count: len + 1,
        };
        if let Some(item) = &item {
            host.bind_view(&mut view, item, meta);
        }
        self.entries.insert(
            position,
            ViewHandle {
                view,
                item,
                index,
                position,
                count: len + 1,
            },
        );
        true
    }

    pub fn remove<H>(&mut self, host: &mut H, position: usize) -> bool
    where
        H: RenderHost<T, View = V>,
    {
        let Some(handle) = self.entries.remove(position) else {
            debug_assert!(false, "ViewPool::remove out of bounds (pos={position})");
            return false;
        };
        host.destroy_view(handle.view);
        true
    }

    /// Relocates the view at `from` so it ends up at `to`.
    pub fn move_view<H>(&mut self, host: &mut H, from: usize, to: usize) -> bool
    where
        H: RenderHost<T, View = V>,
    {
        let len = self.entries.len();
        if from >= len || to >= len {
            debug_assert!(
                from < len && to < len,
                "ViewPool::move_view out of bounds (from={from}, to={to}, len={len})"
            );
            return false;
        }
        if from == to {
            return true;
        }
        let Some(mut handle) = self.entries.remove(from) else {
            return false;
        };
        host.move_view(&mut handle.view, to);
        handle.position = to;
        self.entries.insert(to, handle);
        true
    }

    /// Rebinds the view at `position` in place.
    pub fn rebind<H>(&mut self, host: &mut H, position: usize, item: T, index: usize) -> bool
    where
        H: RenderHost<T, View = V>,
    {
        let count = self.entries.len();
        let Some(handle) = self.entries.get_mut(position) else {
            debug_assert!(false, "ViewPool::rebind out of bounds (pos={position}, len={count})");
            return false;
        };
        let meta = ViewMeta {
            index,
            position,
            count,
        };
        host.bind_view(&mut handle.view, &item, meta);
        handle.item = Some(item);
        handle.index = index;
        true
    }

    /// Destroys every view. Returns how many were destroyed.
    pub fn clear<H>(&mut self, host: &mut H) -> usize
    where
        H: RenderHost<T, View = V>,
    {
        let n = self.entries.len();
        for handle in self.entries.drain(..) {
            host.destroy_view(handle.view);
        }
        n
    }

    /// Recomputes every handle's index/position/count for a window starting at `first_index`
    /// and pushes the result to the host.
    pub fn relayout<H>(&mut self, host: &mut H, first_index: usize)
    where
        H: RenderHost<T, View = V>,
    {
        let count = self.entries.len();
        for (position, handle) in self.entries.iter_mut().enumerate() {
            handle.index = first_index + position;
            handle.position = position;
            handle.count = count;
            let meta = handle.meta();
            host.update_view_meta(&mut handle.view, meta);
        }
    }
}

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::key::IdentityKey;
use crate::pool::{ViewHandle, ViewPool};
use crate::source::{self, DataSource};
use crate::{
    Anomaly, AnomalyCallback, CollectionDiffer, ConfigError, EditOp, RenderHost, Subscription,
    ViewportController, VisibleRange,
};

/// Pending input for one reconciliation pass.
///
/// Several notifications arriving before a pass runs are coalesced with [`Update::merge`]: only
/// the most recent geometry, snapshot and scroll offset survive.
#[derive(Clone, Debug)]
pub struct Update<S> {
    /// `(container_size, element_size)`.
    pub geometry: Option<(u32, u32)>,
    pub source: Option<S>,
    pub scroll_offset: Option<u64>,
}

impl<S> Default for Update<S> {
    fn default() -> Self {
        Self {
            geometry: None,
            source: None,
            scroll_offset: None,
        }
    }
}

impl<S> Update<S> {
    pub fn geometry(container_size: u32, element_size: u32) -> Self {
        Self::default().with_geometry(container_size, element_size)
    }

    pub fn snapshot(source: S) -> Self {
        Self::default().with_source(source)
    }

    pub fn scroll(offset: u64) -> Self {
        Self::default().with_scroll_offset(offset)
    }

    pub fn with_geometry(mut self, container_size: u32, element_size: u32) -> Self {
        self.geometry = Some((container_size, element_size));
        self
    }

    pub fn with_source(mut self, source: S) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_scroll_offset(mut self, offset: u64) -> Self {
        self.scroll_offset = Some(offset);
        self
    }

    /// Folds a newer update into this one; the newer value wins field by field.
    pub fn merge(self, newer: Self) -> Self {
        Self {
            geometry: newer.geometry.or(self.geometry),
            source: newer.source.or(self.source),
            scroll_offset: newer.scroll_offset.or(self.scroll_offset),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_none() && self.source.is_none() && self.scroll_offset.is_none()
    }
}

/// What one reconciliation pass did to the view pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassStats {
    pub created: usize,
    pub removed: usize,
    pub moved: usize,
    pub rebound: usize,
    /// Length of the edit script applied in this pass.
    pub edits: usize,
    /// The pool was rebuilt from scratch.
    pub full_rebuild: bool,
    pub anomalies: Vec<Anomaly>,
}

impl PassStats {
    /// Creates + removes + moves.
    pub fn structural_ops(&self) -> usize {
        self.created + self.removed + self.moved
    }
}

/// The windowing engine: keeps a bounded pool of views in sync with the scroll position and the
/// backing collection.
///
/// Every public mutation runs one synchronous reconciliation pass whose cost is bounded by the
/// window size plus the edit-script length. After each pass:
///
/// 1. the pool holds at most `nb_of_elements_displayed` views,
/// 2. the pool's bound indices are contiguous, ascending, and equal to the range computed by the
///    [`ViewportController`],
/// 3. no two views share a data index.
///
/// The engine retains only the last captured snapshot (for diffing) and the live source (for
/// scroll-driven reads).
pub struct WindowReconciler<S, K, H>
where
    S: DataSource,
    H: RenderHost<S::Item>,
{
    viewport: ViewportController,
    differ: CollectionDiffer<S::Item, K>,
    host: H,
    pool: ViewPool<H::View, S::Item>,

    source: Option<S>,
    snapshot: Vec<S::Item>,
    window_first: usize,
    needs_rebuild: bool,
    translation: Option<u64>,
    on_anomaly: Option<AnomalyCallback>,
}

impl<S, K, H> WindowReconciler<S, K, H>
where
    S: DataSource,
    S::Item: Clone + PartialEq,
    K: IdentityKey,
    H: RenderHost<S::Item>,
{
    /// Pairs a viewport controller with a rendering host.
    ///
    /// The collection starts empty; feed it with [`Self::notify_collection_changed`].
    pub fn new(
        mut viewport: ViewportController,
        differ: CollectionDiffer<S::Item, K>,
        host: H,
    ) -> Self {
        viewport.set_nb_of_elements(0);
        vdebug!(
            displayed = viewport.nb_of_elements_displayed(),
            "WindowReconciler::new"
        );
        Self {
            viewport,
            differ,
            host,
            pool: ViewPool::new(),
            source: None,
            snapshot: Vec::new(),
            window_first: 0,
            needs_rebuild: false,
            translation: None,
            on_anomaly: None,
        }
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn differ(&self) -> &CollectionDiffer<S::Item, K> {
        &self.differ
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn pool(&self) -> &ViewPool<H::View, S::Item> {
        &self.pool
    }

    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    /// The items as of the last collection change.
    pub fn snapshot(&self) -> &[S::Item] {
        &self.snapshot
    }

    pub fn nb_of_elements(&self) -> usize {
        self.viewport.nb_of_elements()
    }

    pub fn nb_of_elements_displayed(&self) -> usize {
        self.viewport.nb_of_elements_displayed()
    }

    /// The range currently materialized in the pool.
    pub fn query_current_range(&self) -> Option<VisibleRange> {
        let len = self.pool.len();
        if len == 0 {
            return None;
        }
        Some(VisibleRange::new(
            self.window_first,
            self.window_first + len - 1,
        ))
    }

    pub fn top_index(&self) -> Option<usize> {
        self.viewport.top_index()
    }

    /// Consumer-visible views: every pooled view except stale ones.
    pub fn views(&self) -> impl Iterator<Item = &ViewHandle<H::View, S::Item>> {
        self.pool.iter().filter(|h| !h.is_stale())
    }

    pub fn on_range_change(
        &mut self,
        f: impl Fn(Option<VisibleRange>) + Send + Sync + 'static,
    ) -> Subscription {
        self.viewport.on_range_change(f)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.viewport.unsubscribe(subscription)
    }

    pub fn set_on_anomaly(&mut self, on_anomaly: Option<impl Fn(&Anomaly) + Send + Sync + 'static>) {
        self.on_anomaly = on_anomaly.map(|f| Arc::new(f) as _);
    }

    pub fn set_viewport_geometry(
        &mut self,
        container_size: u32,
        element_size: u32,
    ) -> Result<PassStats, ConfigError> {
        self.apply(Update::geometry(container_size, element_size))
    }

    pub fn notify_scroll(&mut self, scroll_offset: u64) -> PassStats {
        vtrace!(scroll_offset, "notify_scroll");
        self.viewport.set_scroll_offset(scroll_offset);
        self.run_pass(None)
    }

    /// Scrolls so that `index` sits at the top of the container (clamped).
    pub fn scroll_to_index(&mut self, index: usize) -> PassStats {
        let offset = self.viewport.offset_for_index(index);
        self.notify_scroll(offset)
    }

    /// Replaces the backing collection wholesale and reconciles the pool against it.
    pub fn notify_collection_changed(&mut self, source: S) -> PassStats {
        self.run_pass(Some(source))
    }

    /// Applies any combination of geometry, collection and scroll changes in a single pass.
    ///
    /// Geometry is validated first; on error nothing is applied.
    pub fn apply(&mut self, update: Update<S>) -> Result<PassStats, ConfigError> {
        let Update {
            geometry,
            source,
            scroll_offset,
        } = update;
        if let Some((container_size, element_size)) = geometry {
            self.viewport.set_geometry(container_size, element_size)?;
        }
        if let Some(offset) = scroll_offset {
            self.viewport.set_scroll_offset(offset);
        }
        Ok(self.run_pass(source))
    }

    fn run_pass(&mut self, source: Option<S>) -> PassStats {
        let mut stats = PassStats::default();
        let fresh = source.is_some();
        if let Some(source) = source {
            self.apply_source(source, &mut stats);
        }

        let target = self.viewport.current_range();
        self.shift_window(target, fresh, &mut stats);
        if fresh {
            self.refresh_window(&mut stats);
        }
        self.finish_pass();

        debug_assert!(
            self.pool.len() <= self.viewport.nb_of_elements_displayed(),
            "pool exceeds capacity (len={}, cap={})",
            self.pool.len(),
            self.viewport.nb_of_elements_displayed()
        );
        debug_assert_eq!(self.query_current_range(), target, "pool does not match range");
        stats
    }

    fn report(&self, stats: &mut PassStats, anomaly: Anomaly) {
        vwarn!(%anomaly, "reconciliation anomaly");
        if let Some(f) = &self.on_anomaly {
            f(&anomaly);
        }
        stats.anomalies.push(anomaly);
    }

    fn apply_source(&mut self, source: S, stats: &mut PassStats) {
        let mut anomalies = Vec::new();
        let current = source::capture(&source, &mut |a| anomalies.push(a));
        let script = self
            .differ
            .diff_with(&self.snapshot, &current, &mut |a| anomalies.push(a));
        for anomaly in anomalies {
            self.report(stats, anomaly);
        }

        stats.edits = script.len();
        let mut len = self.snapshot.len();
        for op in script {
            self.apply_op(op, &mut len, stats);
        }
        debug_assert_eq!(len, current.len(), "edit script miscounted elements");

        vdebug!(
            previous = self.snapshot.len(),
            current = current.len(),
            edits = stats.edits,
            "collection changed"
        );
        self.snapshot = current;
        self.source = Some(source);
        self.viewport.set_nb_of_elements(self.snapshot.len());
    }

    fn window_contains(&self, index: usize) -> bool {
        let len = self.pool.len();
        len > 0 && index >= self.window_first && index < self.window_first + len
    }

    fn apply_op(&mut self, op: EditOp<S::Item>, len: &mut usize, stats: &mut PassStats) {
        let kind = op.kind();
        let out_of_bounds = |index: usize, len: usize| Anomaly::OutOfBounds {
            op: kind,
            index,
            len,
        };
        match op {
            EditOp::Insert { at, item } => {
                if at > *len {
                    self.report(stats, out_of_bounds(at, *len));
                    return;
                }
                *len += 1;
                self.window_insert(at, item, stats);
            }
            EditOp::Remove { at } => {
                if at >= *len {
                    self.report(stats, out_of_bounds(at, *len));
                    return;
                }
                *len -= 1;
                self.window_remove(at, stats);
            }
            EditOp::Move { from, to, item } => {
                if from >= *len || to >= *len {
                    self.report(stats, out_of_bounds(from.max(to), *len));
                    return;
                }
                if self.window_contains(from) && self.window_contains(to) {
                    let (p, q) = (from - self.window_first, to - self.window_first);
                    self.pool.move_view(&mut self.host, p, q);
                    stats.moved += 1;
                    if self.pool.get(q).and_then(ViewHandle::item) != Some(&item) {
                        self.pool.rebind(&mut self.host, q, item, to);
                        stats.rebound += 1;
                    }
                } else {
                    self.window_remove(from, stats);
                    self.window_insert(to, item, stats);
                }
            }
            EditOp::IdentityUpdate { at, item } => {
                if at >= *len {
                    self.report(stats, out_of_bounds(at, *len));
                    return;
                }
                if self.window_contains(at) {
                    let position = at - self.window_first;
                    self.pool.rebind(&mut self.host, position, item, at);
                    stats.rebound += 1;
                }
            }
        }
    }

    fn window_insert(&mut self, at: usize, item: S::Item, stats: &mut PassStats) {
        let len = self.pool.len();
        if len == 0 {
            return;
        }
        if at < self.window_first {
            self.window_first += 1;
            return;
        }
        if at >= self.window_first + len {
            return;
        }
        if len >= self.viewport.nb_of_elements_displayed() {
            // The tail item is pushed past the window.
            self.pool.remove(&mut self.host, len - 1);
            stats.removed += 1;
        }
        let position = at - self.window_first;
        self.pool.create(&mut self.host, position, Some(item), at);
        stats.created += 1;
    }

    fn window_remove(&mut self, at: usize, stats: &mut PassStats) {
        let len = self.pool.len();
        if len == 0 {
            return;
        }
        if at < self.window_first {
            self.window_first -= 1;
            return;
        }
        if at >= self.window_first + len {
            return;
        }
        self.pool.remove(&mut self.host, at - self.window_first);
        stats.removed += 1;
    }

    fn shift_window(&mut self, target: Option<VisibleRange>, fresh: bool, stats: &mut PassStats) {
        let current = self.query_current_range();
        match (current, target) {
            (_, None) => {
                stats.removed += self.pool.clear(&mut self.host);
                self.window_first = 0;
                self.needs_rebuild = false;
            }
            (Some(cur), Some(next)) if !self.needs_rebuild && !cur.is_disjoint(&next) => {
                self.shift_overlapping(cur, next, fresh, stats);
            }
            (_, Some(next)) => self.rebuild(next, fresh, stats),
        }
    }

    fn rebuild(&mut self, next: VisibleRange, fresh: bool, stats: &mut PassStats) {
        vdebug!(
            first = next.first_index,
            last = next.last_index,
            "full rebuild"
        );
        stats.full_rebuild = true;
        stats.removed += self.pool.clear(&mut self.host);
        self.needs_rebuild = false;
        self.window_first = next.first_index;
        for (position, index) in (next.first_index..=next.last_index).enumerate() {
            let item = self.fetch(index, fresh, stats);
            self.pool.create(&mut self.host, position, item, index);
            stats.created += 1;
        }
    }

    /// Head and tail deltas are handled independently; removals run first so the pool never
    /// grows past its capacity.
    fn shift_overlapping(
        &mut self,
        cur: VisibleRange,
        next: VisibleRange,
        fresh: bool,
        stats: &mut PassStats,
    ) {
        vtrace!(
            old_first = cur.first_index,
            old_last = cur.last_index,
            new_first = next.first_index,
            new_last = next.last_index,
            "shift window"
        );
        for _ in cur.first_index..next.first_index {
            self.pool.remove(&mut self.host, 0);
            stats.removed += 1;
        }
        for _ in next.last_index..cur.last_index {
            let last = self.pool.len() - 1;
            self.pool.remove(&mut self.host, last);
            stats.removed += 1;
        }
        for index in (next.first_index..cur.first_index).rev() {
            let item = self.fetch(index, fresh, stats);
            self.pool.create(&mut self.host, 0, item, index);
            stats.created += 1;
        }
        for index in cur.last_index + 1..=next.last_index {
            let item = self.fetch(index, fresh, stats);
            let end = self.pool.len();
            self.pool.create(&mut self.host, end, item, index);
            stats.created += 1;
        }
        self.window_first = next.first_index;
    }

    /// Reads an item for a view. Passes that captured a snapshot read only from it; other passes
    /// read the live source.
    fn fetch(&mut self, index: usize, fresh: bool, stats: &mut PassStats) -> Option<S::Item> {
        let item = if fresh {
            self.snapshot.as_slice().get(index).cloned()
        } else {
            self.source.as_ref().and_then(|s| s.get(index))
        };
        if item.is_none() {
            self.needs_rebuild = true;
            let len = self.viewport.nb_of_elements();
            self.report(stats, Anomaly::MissingItem { index, len });
        }
        item
    }

    /// Rebinds any view whose item no longer matches the snapshot, e.g. one bound from the live
    /// source while its owner mutated it without notifying.
    fn refresh_window(&mut self, stats: &mut PassStats) {
        for position in 0..self.pool.len() {
            let index = self.window_first + position;
            let Some(expected) = self.snapshot.as_slice().get(index) else {
                continue;
            };
            let bound = self.pool.get(position).and_then(ViewHandle::item);
            if bound != Some(expected) {
                let item = expected.clone();
                self.pool.rebind(&mut self.host, position, item, index);
                stats.rebound += 1;
            }
        }
        if !self.pool.has_stale() {
            self.needs_rebuild = false;
        }
    }

    fn finish_pass(&mut self) {
        self.pool.relayout(&mut self.host, self.window_first);
        let range = self.query_current_range();

        if self.viewport.take_layout_dirty() {
            let extent = self.viewport.layout_extent();
            self.host.resize_spacer(extent);
        }
        let translation = self.viewport.translation_for(range);
        if self.translation != Some(translation) {
            self.translation = Some(translation);
            self.host.set_translation(translation);
        }
        self.viewport.emit_range(range);
    }
}

impl<S, K, H> fmt::Debug for WindowReconciler<S, K, H>
where
    S: DataSource,
    H: RenderHost<S::Item>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowReconciler")
            .field("viewport", &self.viewport)
            .field("pool_len", &self.pool.len())
            .field("window_first", &self.window_first)
            .field("snapshot_len", &self.snapshot.len())
            .field("needs_rebuild", &self.needs_rebuild)
            .finish_non_exhaustive()
    }
}

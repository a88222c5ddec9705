use alloc::sync::Arc;
use core::fmt;

use virtualizr::{
    ConfigError, DataSource, IdentityKey, PassStats, RenderHost, Update, WindowReconciler,
};

use crate::{FrameScheduler, FrameToken, PendingFrame};

/// A callback fired after a frame in which the top index changed.
pub type TopIndexCallback = Arc<dyn Fn(Option<usize>) + Send + Sync>;

/// A framework-neutral controller that wraps a [`WindowReconciler`] and drives it from frames.
///
/// Adapters report UI events as they happen:
/// - `on_scroll` / `on_viewport_size` for scroll-container events
/// - `on_collection_changed` when the backing collection changed
///
/// None of these run a pass. They merge into one pending [`Update`] and (re)request a frame from
/// the [`FrameScheduler`]; when the frame fires, the host calls `on_frame(token)` and exactly one
/// reconciliation pass runs with the latest geometry, snapshot and offset. Intermediate states are
/// discarded, so per-frame work depends on the window size rather than on the event count.
pub struct Controller<S, K, H, F>
where
    S: DataSource,
    H: RenderHost<S::Item>,
{
    engine: WindowReconciler<S, K, H>,
    scheduler: F,
    frame: PendingFrame,
    pending: Update<S>,
    last_top_index: Option<usize>,
    on_top_index_change: Option<TopIndexCallback>,
}

impl<S, K, H, F> Controller<S, K, H, F>
where
    S: DataSource,
    S::Item: Clone + PartialEq,
    K: IdentityKey,
    H: RenderHost<S::Item>,
    F: FrameScheduler,
{
    pub fn new(engine: WindowReconciler<S, K, H>, scheduler: F) -> Self {
        let last_top_index = engine.top_index();
        Self {
            engine,
            scheduler,
            frame: PendingFrame::new(),
            pending: Update::default(),
            last_top_index,
            on_top_index_change: None,
        }
    }

    pub fn engine(&self) -> &WindowReconciler<S, K, H> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut WindowReconciler<S, K, H> {
        &mut self.engine
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    pub fn into_parts(self) -> (WindowReconciler<S, K, H>, F) {
        (self.engine, self.scheduler)
    }

    pub fn is_frame_pending(&self) -> bool {
        self.frame.is_pending()
    }

    pub fn pending(&self) -> &Update<S> {
        &self.pending
    }

    pub fn set_on_top_index_change(
        &mut self,
        on_top_index_change: Option<impl Fn(Option<usize>) + Send + Sync + 'static>,
    ) {
        self.on_top_index_change = on_top_index_change.map(|f| Arc::new(f) as _);
    }

    /// First strictly visible index as of the last pass.
    pub fn top_index(&self) -> Option<usize> {
        self.engine.top_index()
    }

    /// Call this when the UI reports a scroll offset change (e.g. user wheel/drag).
    pub fn on_scroll(&mut self, scroll_offset: u64) {
        self.enqueue(Update::scroll(scroll_offset));
    }

    /// Call this when the container was measured or the element size changed.
    ///
    /// A zero element size is rejected immediately and nothing is scheduled.
    pub fn on_viewport_size(
        &mut self,
        container_size: u32,
        element_size: u32,
    ) -> Result<(), ConfigError> {
        if element_size == 0 {
            return Err(ConfigError::NonPositiveElementSize);
        }
        self.enqueue(Update::geometry(container_size, element_size));
        Ok(())
    }

    pub fn on_collection_changed(&mut self, source: S) {
        self.enqueue(Update::snapshot(source));
    }

    /// Schedules a scroll that puts `index` at the top of the container.
    ///
    /// Returns the (clamped) target offset; the host should move its real scroll container there.
    pub fn scroll_to_index(&mut self, index: usize) -> u64 {
        let offset = self.engine.viewport().offset_for_index(index);
        self.on_scroll(offset);
        offset
    }

    /// Merges an arbitrary update into the pending one and requests a frame.
    pub fn submit(&mut self, update: Update<S>) {
        self.enqueue(update);
    }

    fn enqueue(&mut self, update: Update<S>) {
        let pending = core::mem::take(&mut self.pending);
        self.pending = pending.merge(update);
        self.frame.request(&mut self.scheduler);
        atrace!(token = ?self.frame.token(), "frame requested");
    }

    /// Runs the pending pass if `token` is the outstanding frame.
    ///
    /// Superseded or unknown tokens return `Ok(None)`.
    pub fn on_frame(&mut self, token: FrameToken) -> Result<Option<PassStats>, ConfigError> {
        if !self.frame.fire(token) {
            atrace!(token = token.0, "ignoring superseded frame");
            return Ok(None);
        }
        self.run_pending().map(Some)
    }

    /// Cancels the outstanding frame and runs the pending pass right away.
    pub fn flush(&mut self) -> Result<Option<PassStats>, ConfigError> {
        if !self.frame.cancel(&mut self.scheduler) {
            return Ok(None);
        }
        self.run_pending().map(Some)
    }

    /// A rejected geometry is dropped; the snapshot and offset stay pending for the next frame.
    fn run_pending(&mut self) -> Result<PassStats, ConfigError> {
        let mut update = core::mem::take(&mut self.pending);
        if let Some((_, element_size)) = update.geometry {
            if let Err(err) = self.engine.viewport().check_element_size(element_size) {
                adebug!(element_size, "rejected geometry, keeping the rest of the update");
                update.geometry = None;
                if !update.is_empty() {
                    self.enqueue(update);
                }
                return Err(err);
            }
        }
        let stats = self.engine.apply(update)?;

        let top_index = self.engine.top_index();
        if top_index != self.last_top_index {
            adebug!(?top_index, "top index changed");
            self.last_top_index = top_index;
            if let Some(f) = &self.on_top_index_change {
                f(top_index);
            }
        }
        Ok(stats)
    }
}

impl<S, K, H, F> fmt::Debug for Controller<S, K, H, F>
where
    S: DataSource,
    H: RenderHost<S::Item>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("engine", &self.engine)
            .field("frame", &self.frame)
            .field("last_top_index", &self.last_top_index)
            .finish_non_exhaustive()
    }
}

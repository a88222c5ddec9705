use alloc::sync::Arc;
use alloc::vec::Vec;
use core::{cmp, fmt};

use crate::{
    BufferPolicy, ConfigError, LayoutExtent, RangeCallback, ScrollDirection, Subscription,
    VisibleRange, WindowOptions,
};

/// Computes which index range is materialized for a given scroll offset.
///
/// All items share one fixed `element_size`, so every query is `O(1)`:
///
/// ```text
/// top   = floor(offset / element_size)
/// last  = top + ceil(container_size / element_size) - 1
/// range = [top - before, last + after] ∩ [0, nb_of_elements)
/// ```
///
/// where `before + after == 2 * buffer` as dictated by the [`BufferPolicy`]. Offsets past the
/// end of the content are clamped to [`Self::max_scroll_offset`] first.
///
/// The controller also owns range-change subscriptions and deduplicates notifications: a
/// subscriber only hears about a range that differs from the previously emitted one.
pub struct ViewportController {
    options: WindowOptions,
    scroll_offset: u64,
    scroll_direction: Option<ScrollDirection>,
    nb_of_elements: usize,

    last_emitted: Option<Option<VisibleRange>>,
    subscribers: Vec<(Subscription, RangeCallback)>,
    next_subscription: u64,
    layout_dirty: bool,
}

impl ViewportController {
    /// Creates a controller. Fails when the options describe an unusable geometry.
    pub fn new(options: WindowOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        vdebug!(
            element_size = options.element_size,
            container_size = options.container_size,
            buffer = options.buffer,
            "ViewportController::new"
        );
        Ok(Self {
            scroll_offset: options.initial_offset,
            options,
            scroll_direction: None,
            nb_of_elements: 0,
            last_emitted: None,
            subscribers: Vec::new(),
            next_subscription: 0,
            layout_dirty: true,
        })
    }

    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    pub fn element_size(&self) -> u32 {
        self.options.element_size
    }

    pub fn container_size(&self) -> u32 {
        self.options.container_size
    }

    pub fn buffer(&self) -> usize {
        self.options.buffer
    }

    pub fn buffer_policy(&self) -> BufferPolicy {
        self.options.buffer_policy
    }

    pub fn nb_of_elements(&self) -> usize {
        self.nb_of_elements
    }

    pub fn set_nb_of_elements(&mut self, nb_of_elements: usize) {
        if self.nb_of_elements == nb_of_elements {
            return;
        }
        self.nb_of_elements = nb_of_elements;
        self.layout_dirty = true;
    }

    /// Rows needed to cover the container, without buffer.
    pub fn visible_count(&self) -> usize {
        let element = self.options.element_size as u64;
        if element == 0 {
            return 0;
        }
        (self.options.container_size as u64).div_ceil(element) as usize
    }

    /// Upper bound on live views: `ceil(container / element) + 2 * buffer`.
    pub fn nb_of_elements_displayed(&self) -> usize {
        self.visible_count()
            .saturating_add(self.options.buffer.saturating_mul(2))
    }

    pub fn set_element_size(&mut self, element_size: u32) -> Result<(), ConfigError> {
        self.set_geometry(self.options.container_size, element_size)
    }

    pub fn set_container_size(&mut self, container_size: u32) {
        if self.options.container_size == container_size {
            return;
        }
        self.options.container_size = container_size;
        self.layout_dirty = true;
    }

    /// Checks whether `element_size` would be accepted for the current element count.
    pub fn check_element_size(&self, element_size: u32) -> Result<(), ConfigError> {
        if element_size == 0 {
            return Err(ConfigError::NonPositiveElementSize);
        }
        if (self.nb_of_elements as u64)
            .checked_mul(element_size as u64)
            .is_none()
        {
            return Err(ConfigError::ElementSizeOverflow {
                element_size,
                count: self.nb_of_elements,
            });
        }
        Ok(())
    }

    /// Updates container and element size together.
    ///
    /// On error nothing is changed.
    pub fn set_geometry(&mut self, container_size: u32, element_size: u32) -> Result<(), ConfigError> {
        self.check_element_size(element_size)?;
        if self.options.container_size == container_size
            && self.options.element_size == element_size
        {
            return Ok(());
        }
        vdebug!(container_size, element_size, "ViewportController::set_geometry");
        self.options.container_size = container_size;
        self.options.element_size = element_size;
        self.layout_dirty = true;
        Ok(())
    }

    pub fn set_buffer(&mut self, buffer: usize) {
        if self.options.buffer == buffer {
            return;
        }
        self.options.buffer = buffer;
        self.layout_dirty = true;
    }

    pub fn set_buffer_policy(&mut self, buffer_policy: BufferPolicy) {
        self.options.buffer_policy = buffer_policy;
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll_direction
    }

    pub fn set_scroll_offset(&mut self, offset: u64) {
        if self.scroll_offset == offset {
            return;
        }
        let prev = self.scroll_offset;
        self.scroll_offset = offset;
        self.scroll_direction = match offset.cmp(&prev) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.scroll_direction,
        };
    }

    pub fn total_size(&self) -> u64 {
        (self.nb_of_elements as u64).saturating_mul(self.options.element_size as u64)
    }

    /// Extent of the window wrapper when the pool is full.
    pub fn window_size(&self) -> u64 {
        (self.nb_of_elements_displayed() as u64).saturating_mul(self.options.element_size as u64)
    }

    pub fn layout_extent(&self) -> LayoutExtent {
        LayoutExtent {
            total_size: self.total_size(),
            window_size: self.window_size(),
        }
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.total_size()
            .saturating_sub(self.options.container_size as u64)
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    /// First strictly visible index (no buffer) for the current offset.
    pub fn top_index(&self) -> Option<usize> {
        self.top_index_for(self.scroll_offset)
    }

    pub fn top_index_for(&self, scroll_offset: u64) -> Option<usize> {
        let element = self.options.element_size as u64;
        if self.nb_of_elements == 0 || element == 0 {
            return None;
        }
        let offset = self.clamp_scroll_offset(scroll_offset);
        let top = (offset / element).min(self.nb_of_elements as u64 - 1);
        Some(top as usize)
    }

    /// Scroll offset that puts `index` at the top of the container (clamped).
    pub fn offset_for_index(&self, index: usize) -> u64 {
        let offset = (index as u64).saturating_mul(self.options.element_size as u64);
        self.clamp_scroll_offset(offset)
    }

    /// Distance the window wrapper must be translated so its first view lines up with
    /// `range.first_index`.
    pub fn translation_for(&self, range: Option<VisibleRange>) -> u64 {
        range.map_or(0, |r| {
            (r.first_index as u64).saturating_mul(self.options.element_size as u64)
        })
    }

    /// The range for the current scroll offset.
    pub fn current_range(&self) -> Option<VisibleRange> {
        self.compute_range(self.scroll_offset)
    }

    /// Computes the materialized range for `scroll_offset` without changing any state.
    pub fn compute_range(&self, scroll_offset: u64) -> Option<VisibleRange> {
        let count = self.nb_of_elements;
        let visible = self.visible_count();
        if count == 0 || visible == 0 {
            return None;
        }
        let top = self.top_index_for(scroll_offset)?;
        let last_visible = top.saturating_add(visible - 1);

        let buffer = self.options.buffer;
        let (before, after) = match self.options.buffer_policy {
            BufferPolicy::Symmetric => (buffer, buffer),
            BufferPolicy::Leading => (buffer.saturating_mul(2), 0),
            BufferPolicy::Trailing => (0, buffer.saturating_mul(2)),
        };

        let last = cmp::min(last_visible.saturating_add(after), count - 1);
        let first = cmp::min(top.saturating_sub(before), last);
        Some(VisibleRange::new(first, last))
    }

    /// Registers a range-change listener.
    pub fn on_range_change(
        &mut self,
        f: impl Fn(Option<VisibleRange>) + Send + Sync + 'static,
    ) -> Subscription {
        let id = Subscription(self.next_subscription);
        self.next_subscription = self.next_subscription.wrapping_add(1);
        self.subscribers.push((id, Arc::new(f)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(id, _)| *id != subscription);
        self.subscribers.len() != before
    }

    /// The range most recently pushed to subscribers, if any was emitted yet.
    pub fn last_emitted(&self) -> Option<Option<VisibleRange>> {
        self.last_emitted
    }

    /// Notifies subscribers if `range` differs from the last emitted range.
    ///
    /// Returns `true` when a notification was sent.
    pub fn emit_range(&mut self, range: Option<VisibleRange>) -> bool {
        if self.last_emitted == Some(range) {
            return false;
        }
        vtrace!(?range, "range change");
        self.last_emitted = Some(range);
        for (_, f) in &self.subscribers {
            f(range);
        }
        true
    }

    /// Returns and clears the "spacer needs resizing" flag.
    pub(crate) fn take_layout_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.layout_dirty, false)
    }
}

impl fmt::Debug for ViewportController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportController")
            .field("options", &self.options)
            .field("scroll_offset", &self.scroll_offset)
            .field("scroll_direction", &self.scroll_direction)
            .field("nb_of_elements", &self.nb_of_elements)
            .field("last_emitted", &self.last_emitted)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

use alloc::sync::Arc;

use crate::{Anomaly, BufferPolicy, ConfigError, VisibleRange};

/// A callback fired when the materialized range changes (`None` = nothing to show).
pub type RangeCallback = Arc<dyn Fn(Option<VisibleRange>) + Send + Sync>;

/// A callback receiving every recoverable [`Anomaly`] hit during a pass.
pub type AnomalyCallback = Arc<dyn Fn(&Anomaly) + Send + Sync>;

/// Maps an item to its stable identity. Returning `None` marks the item as unidentifiable.
///
/// Must be pure and deterministic.
pub type IdentityFn<T, K> = Arc<dyn Fn(&T) -> Option<K> + Send + Sync>;

/// Geometry and buffering configuration for [`crate::ViewportController`].
///
/// Sizes are in the host's scroll-axis units (e.g. pixels). Every item has the same
/// `element_size`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowOptions {
    pub element_size: u32,
    /// The container's extent in the scroll axis. Zero means "not measured yet".
    pub container_size: u32,
    /// Extra rows rendered per side (see [`BufferPolicy`]) to mask scroll latency.
    pub buffer: usize,
    pub buffer_policy: BufferPolicy,
    pub initial_offset: u64,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            element_size: 1,
            container_size: 0,
            buffer: 2,
            buffer_policy: BufferPolicy::Symmetric,
            initial_offset: 0,
        }
    }
}

impl WindowOptions {
    pub fn new(container_size: u32, element_size: u32) -> Self {
        Self {
            container_size,
            element_size,
            ..Self::default()
        }
    }

    pub fn with_element_size(mut self, element_size: u32) -> Self {
        self.element_size = element_size;
        self
    }

    pub fn with_container_size(mut self, container_size: u32) -> Self {
        self.container_size = container_size;
        self
    }

    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_buffer_policy(mut self, buffer_policy: BufferPolicy) -> Self {
        self.buffer_policy = buffer_policy;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: u64) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.element_size == 0 {
            return Err(ConfigError::NonPositiveElementSize);
        }
        Ok(())
    }
}

//! A headless list-windowing engine.
//!
//! Given a fixed element size, a container size and an ordered collection, the engine keeps only
//! a small window of views alive: enough to fill the container plus a buffer on either side. As
//! the user scrolls or the collection changes, it reconciles that window against the new state
//! with the fewest view creations, removals and moves it can.
//!
//! The pieces:
//! - [`ViewportController`]: scroll geometry → [`VisibleRange`], plus range-change notification.
//! - [`CollectionDiffer`]: identity-aware diff of two snapshots into an [`EditScript`].
//! - [`WindowReconciler`]: applies scroll shifts and edit scripts to a bounded [`ViewPool`]
//!   through a [`RenderHost`].
//!
//! For frame-coalesced scheduling and top-index binding, see the `virtualizr-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod differ;
mod error;
mod fenwick;
mod host;
mod key;
mod options;
mod pool;
mod reconciler;
mod source;
mod types;
mod viewport;


pub use differ::{CollectionDiffer, EditOp, EditScript};
pub use error::{Anomaly, ConfigError, EditKind};
pub use host::RenderHost;
pub use key::IdentityKey;
pub use options::{AnomalyCallback, IdentityFn, RangeCallback, WindowOptions};
pub use pool::{ViewHandle, ViewPool};
pub use reconciler::{PassStats, Update, WindowReconciler};
pub use source::DataSource;
pub use types::{
    BufferPolicy, LayoutExtent, ScrollDirection, Subscription, ViewMeta, VisibleRange,
};
pub use viewport::ViewportController;

//! Adapter utilities for the `virtualizr` crate.
//!
//! The `virtualizr` crate reconciles synchronously on every call. This crate provides the
//! framework-neutral glue most hosts need on top of it:
//!
//! - Frame scheduling with cancel-and-replace semantics ([`FrameScheduler`], [`PendingFrame`])
//! - A [`Controller`] that coalesces scroll/data/geometry events into one pass per frame and
//!   tracks the top-index binding
//!
//! This crate is intentionally framework-agnostic (no DOM/egui/ratatui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod scheduler;

#[cfg(test)]
mod tests;

pub use controller::{Controller, TopIndexCallback};
pub use scheduler::{FrameScheduler, FrameToken, ManualFrames, PendingFrame};

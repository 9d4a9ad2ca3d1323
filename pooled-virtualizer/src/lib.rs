//! A headless windowing engine that recycles a bounded pool of element handles.
//!
//! Lists with millions of rows only ever materialize the handful of elements that intersect the
//! viewport (plus a runout buffer). This crate provides the bookkeeping behind that:
//!
//! - a height model with running-average estimates for rows that were never rendered,
//! - an element pool that rebinds long-lived handles to indexes as the window moves,
//! - a window calculator that walks from the previous anchor instead of from index 0,
//! - an anchor-based reconciler that corrects the scroll offset so measured rows never make
//!   the content jump.
//!
//! It is UI-agnostic. A host provides an [`ElementFactory`] (create, update, measure handles)
//! and a [`ScrollSurface`] (scroll offset, viewport extent, placeholder extent). For
//! frame-coalesced scheduling of recomputes, see the `pooled-virtualizer-driver` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod error;
mod fenwick;
mod height;
mod host;
mod options;
mod pool;
mod state;
mod types;
mod virtualizer;
mod window;

#[cfg(test)]
mod tests;

pub use anchor::Anchor;
pub use error::{VirtualizerError, checked_size};
pub use height::{HeightModel, MIN_EXTENT};
pub use host::{ElementFactory, ScrollSurface};
pub use options::VirtualizerOptions;
pub use pool::{ElementPool, Slot};
pub use state::WindowState;
pub use types::{Align, RecomputeOutcome, ScrollDirection, ScrollMetrics, WindowRange};
pub use virtualizer::Virtualizer;

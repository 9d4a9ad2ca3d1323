//! Frame-coalescing driver for the `pooled-virtualizer` crate.
//!
//! The core engine recomputes only when asked. This crate supplies the scheduling a host needs
//! around it: scroll, resize and size-change events become flags on a shared
//! [`FrameRequests`] handle, and the host's frame callback runs [`Driver::frame`], which turns
//! whatever accumulated into at most one recompute.
//!
//! It holds no UI objects and starts no timers; the host owns the frame loop.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod driver;
mod requests;


pub use driver::{Driver, FrameOutcome};
pub use requests::FrameRequests;

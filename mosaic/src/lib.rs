//! A headless, incremental masonry layout engine for infinitely scrolling galleries.
//!
//! For a queue-driven controller with upstream cursor handling, see the `mosaic-adapter` crate.
//!
//! This crate focuses on two coupled problems:
//! - packing streamed items into balanced columns (shortest-column placement, or strict
//!   round-robin order) without ever moving items that were already placed, and
//! - deciding, from visibility signals, when to grow the rendered window or ask upstream for the
//!   next batch, with at most one request in flight.
//!
//! It is UI-agnostic. A host layer is expected to provide:
//! - the container width and each item's rendered height (via [`Measure`])
//! - "item entered the viewport" and "item finished rendering" signals
//! - container resize signals and a clock (`now_ms`)
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod columns;
mod coordinator;
mod error;
mod gallery;
mod layout;
mod measure;
mod options;
mod pending;
mod resize;
mod state;
mod types;
mod visibility;

#[cfg(test)]
mod tests;

pub use columns::ColumnHeights;
pub use coordinator::{BatchPhase, BatchSnapshot, Decision, decide};
pub use error::{ConfigError, GalleryError};
pub use gallery::Gallery;
pub use layout::{Layout, LayoutRequest, layout};
pub use measure::{Measure, MeasurementCache};
pub use options::{GalleryOptions, OnLayoutCallback};
pub use resize::ContainerSize;
pub use state::GalleryState;
pub use types::{
    BatchOutcome, Effects, ElementStyle, Geometry, LayoutUpdate, Recompute, Stream, Visibility,
};

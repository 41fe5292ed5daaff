//! Adapter utilities for the `mosaic` crate.
//!
//! The `mosaic` crate is UI-agnostic and reacts to one signal at a time. This crate provides the
//! plumbing most hosts end up writing around it:
//!
//! - an event queue drained once per frame, with the resulting host work collected in a [`Frame`]
//! - upstream pagination through a [`BatchSource`], with one request in flight and stale
//!   results dropped
//!
//! This crate is intentionally framework-agnostic (no DOM/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod event;
mod source;


pub use controller::{Controller, Frame};
pub use event::GalleryEvent;
pub use source::{Batch, BatchError, BatchSource, BatchTicket, NoSource};

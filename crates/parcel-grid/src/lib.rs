//! Grid addressing for the Parcel land engine.
//!
//! Two small pieces every other crate builds on:
//!
//! - [`walk`]: the deterministic outward ring walk over plot ids — the
//!   successor function [`walk::next`] plus the closed-form
//!   [`walk::rank`]/[`walk::unrank`] pair that lets scans resume and wrap
//!   without replaying the walk.
//! - [`rect`]: inclusive axis-aligned [`PlotRect`] rectangles with
//!   containment, intersection, and cell iteration.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod rect;
pub mod walk;

pub use rect::{PlotRect, RectCells};

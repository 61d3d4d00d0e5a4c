//! Per-area claim state for the Parcel land engine.
//!
//! An [`Area`] holds everything one grid world knows: which cells are
//! claimed and by whom ([`Plot`]), which named rectangles group them
//! ([`Cluster`]), and where the free-cell scan stands. The engine wraps
//! each area in its own lock; this crate is the single-threaded state
//! underneath.
//!
//! [`CommitSink`] is the persistence seam: every accepted change is
//! mirrored to it after the in-memory write.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod area;
mod cluster;
mod commit;
mod plot;

pub use area::{Area, AreaKind, Departure};
pub use cluster::Cluster;
pub use commit::{CommitSink, NullSink};
pub use plot::Plot;

//! The operational layer of the Parcel land engine.
//!
//! Wires the per-area stores from `parcel-area` into a concurrent
//! engine: a process-wide [`ReservationLedger`], the strategy-dispatched
//! auto-allocator ([`SingleCellStrategy`], [`BlockStrategy`]), cluster
//! lifecycle operations ([`ClusterOps`]), the channel-backed identity
//! resolver ([`ChannelResolver`]), and the [`ClaimEngine`] facade that
//! serializes everything behind one lock per area.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod auto;
mod cluster;
mod config;
mod engine;
mod reservation;
mod resolver;

pub use auto::{dispatch, AllocationStrategy, AutoQuery, BlockStrategy, SingleCellStrategy};
pub use cluster::ClusterOps;
pub use config::{ConfigError, EngineConfig};
pub use engine::ClaimEngine;
pub use reservation::ReservationLedger;
pub use resolver::{ChannelResolver, ResolveRequest};

//! Parcel: a concurrent land-claim engine over a logically unbounded
//! 2-D grid.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Parcel sub-crates. For most users, adding `parcel` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use parcel::prelude::*;
//! use parcel_test_utils::{RecordingSink, StaticPermissions, TableResolver};
//! use std::sync::Arc;
//!
//! // An engine with canned collaborators and one 8x8 area.
//! let engine = ClaimEngine::new(
//!     EngineConfig::default(),
//!     Arc::new(StaticPermissions::allow_all()),
//!     Arc::new(TableResolver::default()),
//!     Arc::new(RecordingSink::new()),
//! )
//! .unwrap();
//! let bounds = PlotRect::from_corners(PlotId::new(0, 0), PlotId::new(7, 7));
//! engine.insert_area(Area::bounded(AreaId(1), AreaKind::Normal, bounds));
//!
//! // Claim a free cell, then group a rectangle into a cluster.
//! let grant = engine
//!     .allocate(AreaId(1), &AutoQuery::single(PlayerId(1)))
//!     .unwrap();
//! assert_eq!(grant.len(), 1);
//! engine
//!     .create_cluster(AreaId(1), PlayerId(1), "commons", PlotId::new(0, 0), PlotId::new(3, 3))
//!     .unwrap();
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `parcel-core` | IDs, capabilities, errors, collaborator traits |
//! | [`grid`] | `parcel-grid` | The cell walk and rectangle math |
//! | [`area`] | `parcel-area` | Per-area plot/cluster store and the commit sink |
//! | [`engine`] | `parcel-engine` | Reservations, allocation strategies, lifecycle, facade |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// IDs, capabilities, errors, and collaborator traits (`parcel-core`).
///
/// Contains [`types::PlotId`], [`types::Capability`], the error enums,
/// and the [`types::PermissionOracle`] / [`types::IdentityResolver`]
/// traits the engine consumes.
pub use parcel_core as types;

/// Grid addressing (`parcel-grid`).
///
/// The deterministic cell walk ([`grid::walk`]) and rectangle math
/// ([`grid::PlotRect`]).
pub use parcel_grid as grid;

/// Per-area state (`parcel-area`).
///
/// [`area::Area`] stores plots and clusters; [`area::CommitSink`] is the
/// seam to durable storage.
pub use parcel_area as area;

/// The operational layer (`parcel-engine`).
///
/// [`engine::ClaimEngine`] is the main entry point; it owns the
/// reservation ledger and the allocation strategies.
pub use parcel_engine as engine;

/// Common imports for typical Parcel usage.
///
/// ```rust
/// use parcel::prelude::*;
/// ```
pub mod prelude {
    // IDs and collaborator traits
    pub use parcel_core::{
        AreaId, Capability, IdentityResolver, PermissionOracle, PlayerId, PlotId,
    };

    // Errors
    pub use parcel_core::{AllocError, ClusterError, CommitError, ResolveError};

    // Grid
    pub use parcel_grid::PlotRect;

    // Area state
    pub use parcel_area::{Area, AreaKind, Cluster, CommitSink, NullSink, Plot};

    // Engine
    pub use parcel_engine::{AutoQuery, ChannelResolver, ClaimEngine, EngineConfig};
}

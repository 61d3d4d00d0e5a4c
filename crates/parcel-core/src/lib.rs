//! Core types and traits for the Parcel land engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! fundamental abstractions used throughout the Parcel workspace: typed
//! ids, the capability model, error taxonomies, and the collaborator
//! traits (permissions, identity resolution).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod capability;
pub mod error;
pub mod id;
pub mod traits;

pub use capability::Capability;
pub use error::{AllocError, ClusterError, CommitError, ResolveError};
pub use id::{AreaId, PlayerId, PlotId};
pub use traits::{IdentityResolver, PermissionOracle};

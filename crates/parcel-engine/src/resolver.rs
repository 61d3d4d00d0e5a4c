//! Channel-backed adapter for the external identity-resolution pipeline.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parcel_core::{IdentityResolver, PlayerId, ResolveError};
use std::time::Duration;

/// One name lookup in flight to the backend.
#[derive(Debug)]
pub struct ResolveRequest {
    /// The display name to resolve.
    pub name: String,
    /// Where the backend sends its answer; `None` means the name is
    /// unknown. A dropped sender reads as a timeout on the caller side.
    pub reply: Sender<Option<PlayerId>>,
}

/// [`IdentityResolver`] that forwards lookups over a channel to whatever
/// backend drains the paired [`Receiver`].
///
/// The caller blocks for at most the configured timeout per lookup; a
/// slow or vanished backend surfaces as [`ResolveError::Timeout`], never
/// as a parked thread.
#[derive(Clone, Debug)]
pub struct ChannelResolver {
    requests: Sender<ResolveRequest>,
}

impl ChannelResolver {
    /// Create the resolver and the request stream a backend serves.
    pub fn new() -> (Self, Receiver<ResolveRequest>) {
        let (tx, rx) = unbounded();
        (Self { requests: tx }, rx)
    }
}

impl IdentityResolver for ChannelResolver {
    fn resolve(&self, name: &str, timeout: Duration) -> Result<PlayerId, ResolveError> {
        let (reply_tx, reply_rx) = bounded(1);
        let request = ResolveRequest {
            name: name.to_string(),
            reply: reply_tx,
        };
        if self.requests.send(request).is_err() {
            // Backend hung up; indistinguishable from never answering.
            return Err(ResolveError::Timeout);
        }
        match reply_rx.recv_timeout(timeout) {
            Ok(Some(id)) => Ok(id),
            Ok(None) => Err(ResolveError::UnknownName {
                name: name.to_string(),
            }),
            Err(_) => Err(ResolveError::Timeout),
        }
    }
}

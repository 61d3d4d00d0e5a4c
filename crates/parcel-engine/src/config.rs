//! Engine configuration and validation.

use std::error::Error;
use std::fmt;
use std::time::Duration;

// ── EngineConfig ───────────────────────────────────────────────────

/// Tunables for a [`ClaimEngine`](crate::ClaimEngine).
///
/// `validate()` checks structural invariants at construction time; a
/// config that passes never causes the engine to loop indefinitely or to
/// hand out instantly-expiring reservations.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// How long a reservation shields a cell between allocation and
    /// durable commit. Default: 20 seconds.
    pub reservation_ttl: Duration,
    /// Attempt budget for the block allocator in unbounded areas, where
    /// no full-cycle count exists to bound the marker walk. Default: 4096.
    pub max_block_attempts: u64,
    /// Hard ceiling on the per-player cluster-area allowance; the
    /// permission oracle may grant less but never more. Default: 1024.
    pub quota_ceiling: u64,
    /// Bounded wait for identity resolution. Default: 5 seconds.
    pub resolve_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reservation_ttl: Duration::from_secs(20),
            max_block_attempts: 4096,
            quota_ceiling: 1024,
            resolve_timeout: Duration::from_secs(5),
        }
    }
}

impl EngineConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reservation_ttl.is_zero() {
            return Err(ConfigError::ZeroReservationTtl);
        }
        if self.max_block_attempts == 0 {
            return Err(ConfigError::ZeroBlockAttempts);
        }
        if self.resolve_timeout.is_zero() {
            return Err(ConfigError::ZeroResolveTimeout);
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`EngineConfig::validate()`].
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A zero TTL would expire reservations before they shield anything.
    ZeroReservationTtl,
    /// A zero attempt budget makes every unbounded block allocation fail.
    ZeroBlockAttempts,
    /// A zero resolve timeout makes every name lookup fail.
    ZeroResolveTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroReservationTtl => write!(f, "reservation_ttl must be non-zero"),
            Self::ZeroBlockAttempts => write!(f, "max_block_attempts must be at least 1"),
            Self::ZeroResolveTimeout => write!(f, "resolve_timeout must be non-zero"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_ttl_rejected() {
        let cfg = EngineConfig {
            reservation_ttl: Duration::ZERO,
            ..EngineConfig::default()
        };
        match cfg.validate() {
            Err(ConfigError::ZeroReservationTtl) => {}
            other => panic!("expected ZeroReservationTtl, got {other:?}"),
        }
    }

    #[test]
    fn zero_block_attempts_rejected() {
        let cfg = EngineConfig {
            max_block_attempts: 0,
            ..EngineConfig::default()
        };
        match cfg.validate() {
            Err(ConfigError::ZeroBlockAttempts) => {}
            other => panic!("expected ZeroBlockAttempts, got {other:?}"),
        }
    }

    #[test]
    fn zero_resolve_timeout_rejected() {
        let cfg = EngineConfig {
            resolve_timeout: Duration::ZERO,
            ..EngineConfig::default()
        };
        match cfg.validate() {
            Err(ConfigError::ZeroResolveTimeout) => {}
            other => panic!("expected ZeroResolveTimeout, got {other:?}"),
        }
    }
}

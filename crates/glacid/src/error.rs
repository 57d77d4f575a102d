//! Error types for ID generation.
//!
//! This module defines the central [`Error`] enum covering every failure the
//! crate can report: configuration rejected at construction time, clock
//! regression or time-source failure observed at generation time, and
//! deadline expiry during a sequence-exhaustion wait.
//!
//! Generation never retries internally (other than the intentional
//! wait-for-next-tick loop in the blocking helpers): every error propagates
//! to the caller with the observed values attached, and nothing is logged.

use std::time::{SystemTime, SystemTimeError};

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for generator construction and ID generation.
#[derive(Clone, thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The configured epoch is not strictly between the Unix epoch and the
    /// current time. Construction-only.
    #[error("invalid configuration: epoch {epoch:?} is not in the past")]
    InvalidEpoch {
        /// The rejected epoch.
        epoch: SystemTime,
    },

    /// The configured machine id is zero or does not fit the layout's
    /// machine-id field. Construction-only.
    #[error("invalid configuration: machine id {machine_id} out of range [1, {max}]")]
    InvalidMachineId {
        /// The rejected machine id.
        machine_id: u64,
        /// Largest machine id the layout can encode.
        max: u64,
    },

    /// The configured tick length is zero. Construction-only.
    #[error("invalid configuration: tick length must be non-zero")]
    InvalidTickLen,

    /// The time source reported an earlier tick than the last one used to
    /// issue an ID (e.g. an NTP step adjustment). The generator state is left
    /// untouched; callers may retry once the clock catches up.
    #[error("clock moved backward: last tick {last_tick}, observed tick {observed_tick}")]
    ClockRegression {
        /// Tick of the most recently issued ID.
        last_tick: u64,
        /// The smaller tick just reported by the time source.
        observed_tick: u64,
    },

    /// A sequence-exhaustion wait exceeded the caller's deadline.
    #[error("deadline exceeded while waiting for the next tick")]
    Timeout,

    /// The underlying time source could not produce a tick, e.g. the system
    /// clock reports an instant before the configured epoch.
    #[error("time source failed")]
    ClockSourceFailure(#[source] SystemTimeError),

    /// A thread panicked while holding the generator lock. Not produced when
    /// the `parking-lot` feature is enabled.
    #[error("generator lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Whether the caller can reasonably retry the failed call.
    ///
    /// `ClockRegression` clears once the wall clock catches back up to the
    /// last issued tick, and `Timeout` is a function of the caller's own
    /// deadline. Configuration and time-source failures are permanent.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ClockRegression { .. } | Self::Timeout)
    }

    /// Number of ticks the clock moved backward, if this is a
    /// [`Error::ClockRegression`].
    pub fn regression_magnitude(&self) -> Option<u64> {
        match self {
            Self::ClockRegression {
                last_tick,
                observed_tick,
            } => Some(last_tick - observed_tick),
            _ => None,
        }
    }
}

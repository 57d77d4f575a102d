use core::cmp::Ordering;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, IdGenStatus, IdGenerator, PackedId, Result, TickSource, ToU64, generator::mutex::Mutex,
};

/// A lock-based ID generator suitable for multi-threaded environments.
///
/// The generator state is the packed ID itself: the tick field doubles as
/// `last_tick`, the sequence field as the per-tick counter, and the machine
/// id rides along unchanged. Wrapping it in an [`Arc<Mutex<_>>`] serializes
/// every state transition, so two callers can never observe the same
/// `(tick, sequence)` pair.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Works with any [`PackedId`] layout
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access across threads is important
///
/// ## See Also
/// - [`AtomicGenerator`] for a lock-free variant
///
/// [`AtomicGenerator`]: crate::AtomicGenerator
#[derive(Debug)]
pub struct LockGenerator<ID, C>
where
    ID: PackedId,
    C: TickSource<ID::Ty>,
{
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<ID>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<ID>>,
    clock: C,
}

impl<ID, C> LockGenerator<ID, C>
where
    ID: PackedId,
    C: TickSource<ID::Ty>,
{
    /// Creates a new [`LockGenerator`] from a machine id and a tick source.
    ///
    /// The initial tick and sequence are zero; the first successful poll
    /// rolls the state over to the source's current tick. The machine id is
    /// encoded into every generated ID and must already fit the layout's
    /// field width — use [`GeneratorBuilder`] for validated construction.
    ///
    /// # Example
    /// ```
    /// use glacid::{IdGenerator, LockGenerator, SonyflakeId, TickClock};
    ///
    /// let generator = LockGenerator::<SonyflakeId, _>::new(1, TickClock::default());
    /// let id = generator.next_id().unwrap();
    /// assert_eq!(id.machine_id(), 1);
    /// ```
    ///
    /// [`GeneratorBuilder`]: crate::GeneratorBuilder
    pub fn new(machine_id: ID::Ty, clock: C) -> Self {
        Self::from_components(ID::ZERO, machine_id, ID::ZERO, clock)
    }

    /// Creates a generator from explicit component values.
    ///
    /// Useful for restoring state or pinning the starting tick in tests; in
    /// typical use prefer [`Self::new`].
    pub fn from_components(tick: ID::Ty, machine_id: ID::Ty, sequence: ID::Ty, clock: C) -> Self {
        let id = ID::from_components(tick, machine_id, sequence);
        Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(id))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(id)),
            clock,
        }
    }

    /// Attempts to generate the next available ID without blocking.
    ///
    /// Reads the tick source *before* taking the lock; the critical section
    /// covers only the state transition. Returns [`IdGenStatus::Pending`]
    /// when the current tick's sequence space is exhausted, with the time to
    /// wait for the next tick.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the source's tick is behind the last
    ///   issued one; the state is not modified, so retrying after the clock
    ///   catches up resumes cleanly.
    /// - [`Error::ClockSourceFailure`] if the tick source fails.
    /// - [`Error::LockPoisoned`] if another thread panicked while holding
    ///   the lock (std mutex only).
    ///
    /// # Example
    /// ```
    /// use glacid::{IdGenStatus, LockGenerator, SonyflakeId, TickClock};
    ///
    /// let generator = LockGenerator::<SonyflakeId, _>::new(1, TickClock::default());
    ///
    /// let id = loop {
    ///     match generator.try_poll_id().unwrap() {
    ///         IdGenStatus::Ready { id } => break id,
    ///         IdGenStatus::Pending { yield_for } => std::thread::sleep(yield_for),
    ///     }
    /// };
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<IdGenStatus<ID>> {
        let now = self.clock.current_tick()?;

        let mut id = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock().map_err(|_| Error::LockPoisoned)?
            }
        };

        let last = id.tick();
        match now.cmp(&last) {
            Ordering::Equal => {
                if id.has_sequence_room() {
                    *id = id.increment_sequence();
                    Ok(IdGenStatus::Ready { id: *id })
                } else {
                    Ok(IdGenStatus::Pending {
                        yield_for: self.clock.tick_len(),
                    })
                }
            }
            Ordering::Greater => {
                *id = id.rollover_to_tick(now);
                Ok(IdGenStatus::Ready { id: *id })
            }
            Ordering::Less => Err(Self::cold_clock_regression(now, last)),
        }
    }

    /// Generates the next available ID, blocking through sequence
    /// exhaustion. See [`IdGenerator::next_id`].
    pub fn next_id(&self) -> Result<ID> {
        IdGenerator::next_id(self)
    }

    /// Like [`Self::next_id`] but bounded by a deadline. See
    /// [`IdGenerator::next_id_deadline`].
    pub fn next_id_deadline(&self, deadline: std::time::Instant) -> Result<ID> {
        IdGenerator::next_id_deadline(self, deadline)
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_regression(now: ID::Ty, last: ID::Ty) -> Error {
        Error::ClockRegression {
            last_tick: last.to_u64(),
            observed_tick: now.to_u64(),
        }
    }
}

impl<ID, C> IdGenerator<ID, C> for LockGenerator<ID, C>
where
    ID: PackedId,
    C: TickSource<ID::Ty>,
{
    fn from_parts(machine_id: ID::Ty, clock: C) -> Self {
        Self::new(machine_id, clock)
    }

    fn try_poll_id(&self) -> Result<IdGenStatus<ID>> {
        self.try_poll_id()
    }
}

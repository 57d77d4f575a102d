use core::{cmp::Ordering, marker::PhantomData, time::Duration};
use std::sync::atomic::{AtomicU64, Ordering as MemOrdering};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, IdGenStatus, IdGenerator, PackedId, Result, TickSource};

/// A lock-free ID generator suitable for multi-threaded environments.
///
/// This generator stores the packed ID state in an [`AtomicU64`] and
/// advances it with a compare-and-swap: the winning caller owns the new
/// `(tick, sequence)` pair, a losing caller simply retries against the
/// updated word. This is the CAS equivalent of the mutex discipline in
/// [`LockGenerator`].
///
/// ## Features
/// - ✅ Thread-safe
/// - ❌ Works with any [`PackedId`] layout
///
/// ## Caveats
/// The state lives in a single [`AtomicU64`], so only layouts backed by
/// `u64` are supported (`ID::Ty` must be [`u64`]).
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access is sacrificed for higher throughput
///
/// ## See Also
/// - [`LockGenerator`]
///
/// [`LockGenerator`]: crate::LockGenerator
#[derive(Debug)]
pub struct AtomicGenerator<ID, C>
where
    ID: PackedId<Ty = u64>,
    C: TickSource<ID::Ty>,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    clock: C,
    _id: PhantomData<ID>,
}

impl<ID, C> AtomicGenerator<ID, C>
where
    ID: PackedId<Ty = u64>,
    C: TickSource<ID::Ty>,
{
    /// Creates a new [`AtomicGenerator`] from a machine id and a tick
    /// source.
    ///
    /// The initial tick and sequence are zero; the first successful poll
    /// rolls the state over to the source's current tick. The machine id
    /// must already fit the layout's field width — use [`GeneratorBuilder`]
    /// for validated construction.
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
        let initial = ID::from_components(tick, machine_id, sequence);
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(initial.to_raw())),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(initial.to_raw()),
            clock,
            _id: PhantomData,
        }
    }

    /// Attempts to generate the next available ID without blocking.
    ///
    /// Returns [`IdGenStatus::Pending`] when the current tick's sequence
    /// space is exhausted (wait for the next tick) or when the CAS lost to a
    /// concurrent caller (`yield_for` is zero: retry immediately).
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the source's tick is behind the last
    ///   issued one; the state word is not modified.
    /// - [`Error::ClockSourceFailure`] if the tick source fails.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<IdGenStatus<ID>> {
        let now = self.clock.current_tick()?;

        let current_raw = self.state.load(MemOrdering::Relaxed);
        let current_id = ID::from_raw(current_raw);
        let last = current_id.tick();

        let next_id = match now.cmp(&last) {
            Ordering::Equal => {
                if current_id.has_sequence_room() {
                    current_id.increment_sequence()
                } else {
                    return Ok(IdGenStatus::Pending {
                        yield_for: self.clock.tick_len(),
                    });
                }
            }
            Ordering::Greater => current_id.rollover_to_tick(now),
            Ordering::Less => {
                return Err(Self::cold_clock_regression(now, last));
            }
        };

        if self
            .state
            .compare_exchange(
                current_raw,
                next_id.to_raw(),
                MemOrdering::Relaxed,
                MemOrdering::Relaxed,
            )
            .is_ok()
        {
            Ok(IdGenStatus::Ready { id: next_id })
        } else {
            // CAS failed - another caller won the race. Retry immediately.
            Ok(IdGenStatus::Pending {
                yield_for: Duration::ZERO,
            })
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
    fn cold_clock_regression(now: u64, last: u64) -> Error {
        Error::ClockRegression {
            last_tick: last,
            observed_tick: now,
        }
    }
}

impl<ID, C> IdGenerator<ID, C> for AtomicGenerator<ID, C>
where
    ID: PackedId<Ty = u64>,
    C: TickSource<u64>,
{
    fn from_parts(machine_id: ID::Ty, clock: C) -> Self {
        Self::new(machine_id, clock)
    }

    fn try_poll_id(&self) -> Result<IdGenStatus<ID>> {
        self.try_poll_id()
    }
}

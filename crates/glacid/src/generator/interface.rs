use crate::{Error, IdGenStatus, PackedId, Result, TickSource};
use std::time::Instant;

/// A minimal interface for packed-ID generators.
///
/// Implementations serialize access to their `(last_tick, sequence)` state —
/// via a mutex ([`LockGenerator`]) or a compare-and-swap word
/// ([`AtomicGenerator`]) — so concurrent callers never observe the same pair.
///
/// The blocking helpers are provided on top of [`try_poll_id`]: the
/// sequence-exhaustion wait always happens *between* polls, never while
/// holding the generator's critical section.
///
/// [`LockGenerator`]: crate::LockGenerator
/// [`AtomicGenerator`]: crate::AtomicGenerator
/// [`try_poll_id`]: IdGenerator::try_poll_id
pub trait IdGenerator<ID, C>
where
    ID: PackedId,
    C: TickSource<ID::Ty>,
{
    /// Creates a generator from an already-validated machine id and a tick
    /// source.
    ///
    /// Prefer [`GeneratorBuilder`], which validates its inputs and derives
    /// defaults; this constructor trusts the caller to pass a machine id
    /// within the layout's field width.
    ///
    /// [`GeneratorBuilder`]: crate::GeneratorBuilder
    fn from_parts(machine_id: ID::Ty, clock: C) -> Self;

    /// Attempts to generate the next available ID without blocking.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the tick source reports an earlier
    ///   tick than the last ID issued; state is left unchanged.
    /// - [`Error::ClockSourceFailure`] if the tick source fails.
    /// - [`Error::LockPoisoned`] if the implementation locks and the lock is
    ///   poisoned.
    fn try_poll_id(&self) -> Result<IdGenStatus<ID>>;

    /// Generates the next available ID, blocking the calling thread through
    /// sequence exhaustion.
    ///
    /// The wait sleeps outside the generator's critical section, so other
    /// callers are never starved by a sleeping one.
    ///
    /// # Errors
    ///
    /// Propagates every [`try_poll_id`] error immediately; nothing except
    /// the exhaustion wait is retried.
    ///
    /// [`try_poll_id`]: IdGenerator::try_poll_id
    fn next_id(&self) -> Result<ID> {
        loop {
            match self.try_poll_id()? {
                IdGenStatus::Ready { id } => break Ok(id),
                IdGenStatus::Pending { yield_for } => {
                    if yield_for.is_zero() {
                        std::thread::yield_now();
                    } else {
                        std::thread::sleep(yield_for);
                    }
                }
            }
        }
    }

    /// Like [`next_id`], but fails with [`Error::Timeout`] instead of
    /// sleeping past `deadline`.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] once the deadline passes during an exhaustion
    /// wait, plus every error [`try_poll_id`] can return.
    ///
    /// [`next_id`]: IdGenerator::next_id
    /// [`try_poll_id`]: IdGenerator::try_poll_id
    fn next_id_deadline(&self, deadline: Instant) -> Result<ID> {
        loop {
            match self.try_poll_id()? {
                IdGenStatus::Ready { id } => break Ok(id),
                IdGenStatus::Pending { yield_for } => {
                    let now = Instant::now();
                    if now >= deadline {
                        break Err(Error::Timeout);
                    }
                    let wait = yield_for.min(deadline - now);
                    if wait.is_zero() {
                        std::thread::yield_now();
                    } else {
                        std::thread::sleep(wait);
                    }
                }
            }
        }
    }
}

use crate::PackedId;
use core::time::Duration;

/// Represents the result of attempting to generate a new ID.
///
/// This type models the outcome of a single non-blocking poll:
///
/// - [`IdGenStatus::Ready`] indicates a new ID was successfully generated.
/// - [`IdGenStatus::Pending`] means the sequence space for the current tick
///   is exhausted and no ID can be produced until the clock advances.
///
/// This allows non-blocking generation loops and clean backoff strategies:
/// blocking callers sleep `yield_for` and poll again, async callers await it.
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use glacid::{IdGenStatus, IdGenerator, LockGenerator, SonyflakeId, TickSource};
///
/// struct FixedTick;
/// impl TickSource<u64> for FixedTick {
///     fn current_tick(&self) -> glacid::Result<u64> {
///         Ok(1)
///     }
///     fn tick_len(&self) -> Duration {
///         Duration::from_millis(10)
///     }
/// }
///
/// let generator = LockGenerator::<SonyflakeId, _>::from_parts(1, FixedTick);
/// match generator.try_poll_id().unwrap() {
///     IdGenStatus::Ready { id } => println!("ID: {id}"),
///     IdGenStatus::Pending { yield_for } => println!("back off for {yield_for:?}"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus<ID: PackedId> {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: ID,
    },
    /// No ID could be generated because the sequence has been exhausted for
    /// the current tick.
    ///
    /// Wait for `yield_for` before polling again; by then the clock has
    /// reached the next tick (or a competing caller has already rolled the
    /// state over to it).
    Pending {
        /// How long to wait before polling again.
        yield_for: Duration,
    },
}

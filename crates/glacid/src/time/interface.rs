use crate::Result;
use core::time::Duration;

/// Default epoch: Wednesday, January 1, 2020 00:00:00 UTC
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_577_836_800_000);

/// Default tick resolution: 10 ms.
///
/// With the 39-bit tick field of [`SonyflakeId`] this gives roughly 174
/// years of range before the tick field rolls over.
///
/// [`SonyflakeId`]: crate::SonyflakeId
pub const DEFAULT_TICK_LEN: Duration = Duration::from_millis(10);

/// A trait for time sources that report elapsed ticks since a configured
/// epoch.
///
/// A *tick* is the generator's discrete time unit (e.g. 10 ms). The scalar
/// type `T` matches the tick field of the ID layout being generated
/// (typically `u64`).
///
/// Implementations are expected to be wall-clock based: they do not need to
/// be immune to OS-level clock adjustment. Observed regression is handled by
/// the generator, not the source; a source only fails when it cannot produce
/// a tick at all (see [`Error::ClockSourceFailure`]).
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use glacid::TickSource;
///
/// struct FixedTick;
/// impl TickSource<u64> for FixedTick {
///     fn current_tick(&self) -> glacid::Result<u64> {
///         Ok(1234)
///     }
///     fn tick_len(&self) -> Duration {
///         Duration::from_millis(10)
///     }
/// }
///
/// let time = FixedTick;
/// assert_eq!(time.current_tick().unwrap(), 1234);
/// ```
///
/// [`Error::ClockSourceFailure`]: crate::Error::ClockSourceFailure
pub trait TickSource<T> {
    /// Returns the number of ticks elapsed since the configured epoch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockSourceFailure`] when the underlying time source
    /// is unavailable or reports an instant before the epoch.
    ///
    /// [`Error::ClockSourceFailure`]: crate::Error::ClockSourceFailure
    fn current_tick(&self) -> Result<T>;

    /// Returns the duration of one tick.
    ///
    /// Used by blocking and async callers to turn "wait one tick" into a
    /// sleepable duration.
    fn tick_len(&self) -> Duration;
}

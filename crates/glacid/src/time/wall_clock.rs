use crate::{DEFAULT_EPOCH, DEFAULT_TICK_LEN, Error, Result, TickSource};
use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// A wall-clock tick source measuring elapsed ticks since a fixed epoch.
///
/// Each read consults [`SystemTime::now`] and divides the elapsed duration
/// since the epoch by the tick length. The source is intentionally *not*
/// shielded from OS clock adjustments: if NTP steps the clock backward, the
/// reported tick shrinks and the generator surfaces the regression to the
/// caller instead of fabricating a tick.
///
/// # Example
///
/// ```
/// use glacid::{TickClock, TickSource};
///
/// let clock = TickClock::default();
/// let t0: u64 = clock.current_tick().unwrap();
/// let t1: u64 = clock.current_tick().unwrap();
/// assert!(t1 >= t0);
/// ```
#[derive(Clone, Debug)]
pub struct TickClock {
    epoch: SystemTime,
    tick_len: Duration,
}

impl Default for TickClock {
    /// Constructs a clock aligned to [`DEFAULT_EPOCH`] at the default 10 ms
    /// resolution.
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl TickClock {
    /// Constructs a clock from an epoch and a tick length.
    ///
    /// The epoch defines tick zero; the tick length defines the resolution
    /// of every tick reported by [`current_tick`]. Validation of both values
    /// belongs to the generator builder; this constructor only rejects a
    /// zero tick length in debug builds.
    ///
    /// [`current_tick`]: TickSource::current_tick
    pub fn new(epoch: SystemTime, tick_len: Duration) -> Self {
        debug_assert!(!tick_len.is_zero(), "tick length must be non-zero");
        Self { epoch, tick_len }
    }

    /// Constructs a clock using a custom epoch as the origin (t = 0),
    /// specified as a [`Duration`] since 1970-01-01 UTC, at the default
    /// 10 ms resolution.
    pub fn with_epoch(epoch: Duration) -> Self {
        Self::new(UNIX_EPOCH + epoch, DEFAULT_TICK_LEN)
    }

    /// The instant this clock counts ticks from.
    pub fn epoch(&self) -> SystemTime {
        self.epoch
    }
}

impl TickSource<u64> for TickClock {
    fn current_tick(&self) -> Result<u64> {
        let elapsed = SystemTime::now()
            .duration_since(self.epoch)
            .map_err(Error::ClockSourceFailure)?;
        Ok((elapsed.as_nanos() / self.tick_len.as_nanos()) as u64)
    }

    fn tick_len(&self) -> Duration {
        self.tick_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_nondecreasing_ticks() {
        let clock = TickClock::new(UNIX_EPOCH + DEFAULT_EPOCH, Duration::from_millis(1));
        let a = clock.current_tick().unwrap();
        std::thread::sleep(Duration::from_millis(3));
        let b = clock.current_tick().unwrap();
        assert!(b > a);
    }

    #[test]
    fn fails_when_epoch_is_ahead_of_now() {
        let clock = TickClock::new(
            SystemTime::now() + Duration::from_secs(3600),
            DEFAULT_TICK_LEN,
        );
        let err = clock.current_tick().unwrap_err();
        assert!(matches!(err, Error::ClockSourceFailure(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn resolution_divides_elapsed_time() {
        let epoch = SystemTime::now() - Duration::from_millis(100);
        let clock = TickClock::new(epoch, Duration::from_millis(10));
        let tick = clock.current_tick().unwrap();
        // 100 ms elapsed at 10 ms per tick, allow scheduler slop upward.
        assert!((10..=30).contains(&tick), "tick was {tick}");
    }
}

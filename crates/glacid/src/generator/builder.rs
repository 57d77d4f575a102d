use core::marker::PhantomData;
use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    AtomicGenerator, DEFAULT_EPOCH, DEFAULT_TICK_LEN, Error, LockGenerator, PackedId, Result,
    SonyflakeId, TickClock, derive_machine_id,
};

/// Validated construction of generators.
///
/// Unset options fall back to implementation defaults: the epoch defaults to
/// [`DEFAULT_EPOCH`], the tick length to [`DEFAULT_TICK_LEN`], and the
/// machine id is derived from the host's network identity (see
/// [`derive_machine_id`]). Setters are last-write-wins; validation runs at
/// build time in a fixed order (epoch, machine id, tick length) and the
/// first failure aborts construction.
///
/// # Example
///
/// ```
/// use std::time::{Duration, UNIX_EPOCH};
/// use glacid::{GeneratorBuilder, IdGenerator};
///
/// let generator = GeneratorBuilder::new()
///     .start_time(UNIX_EPOCH + Duration::from_secs(1_609_459_200)) // 2021-01-01
///     .machine_id(12345)
///     .build()
///     .unwrap();
///
/// let id = generator.next_id().unwrap();
/// assert_eq!(id.machine_id(), 12345);
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorBuilder<ID = SonyflakeId> {
    start_time: Option<SystemTime>,
    machine_id: Option<u64>,
    tick_len: Option<Duration>,
    _id: PhantomData<ID>,
}

impl<ID> Default for GeneratorBuilder<ID> {
    fn default() -> Self {
        Self {
            start_time: None,
            machine_id: None,
            tick_len: None,
            _id: PhantomData,
        }
    }
}

impl GeneratorBuilder<SonyflakeId> {
    /// Creates a builder for the default [`SonyflakeId`] layout with every
    /// option unset.
    ///
    /// For a custom layout, use `GeneratorBuilder::<MyId>::default()`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<ID> GeneratorBuilder<ID>
where
    ID: PackedId<Ty = u64>,
{
    /// Sets the epoch all ticks are measured from.
    ///
    /// Must be strictly after the Unix epoch and no later than the wall
    /// clock at build time; [`build`] fails with [`Error::InvalidEpoch`]
    /// otherwise.
    ///
    /// [`build`]: Self::build
    pub fn start_time(mut self, epoch: SystemTime) -> Self {
        self.start_time = Some(epoch);
        self
    }

    /// Sets an explicit machine id.
    ///
    /// Must be in `[1, max_machine_id]` for the layout; [`build`] fails with
    /// [`Error::InvalidMachineId`] otherwise. Distinctness across machines is
    /// a deployment invariant the generator cannot verify.
    ///
    /// [`build`]: Self::build
    pub fn machine_id(mut self, machine_id: u64) -> Self {
        self.machine_id = Some(machine_id);
        self
    }

    /// Sets the tick resolution.
    ///
    /// Must be non-zero; [`build`] fails with [`Error::InvalidTickLen`]
    /// otherwise. Coarser ticks extend the tick field's range at the cost of
    /// fewer IDs per wall-clock second.
    ///
    /// [`build`]: Self::build
    pub fn tick_len(mut self, tick_len: Duration) -> Self {
        self.tick_len = Some(tick_len);
        self
    }

    /// Builds a [`LockGenerator`] over a wall-clock tick source.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidEpoch`], [`Error::InvalidMachineId`], or
    /// [`Error::InvalidTickLen`] for the first option that fails
    /// validation. No generator is returned on failure.
    pub fn build(self) -> Result<LockGenerator<ID, TickClock>> {
        let (machine_id, clock) = self.validate()?;
        Ok(LockGenerator::new(machine_id, clock))
    }

    /// Builds an [`AtomicGenerator`] over a wall-clock tick source.
    ///
    /// # Errors
    ///
    /// Same validation as [`Self::build`].
    pub fn build_atomic(self) -> Result<AtomicGenerator<ID, TickClock>> {
        let (machine_id, clock) = self.validate()?;
        Ok(AtomicGenerator::new(machine_id, clock))
    }

    fn validate(self) -> Result<(u64, TickClock)> {
        let now = SystemTime::now();
        let epoch = self.start_time.unwrap_or(UNIX_EPOCH + DEFAULT_EPOCH);
        if epoch <= UNIX_EPOCH || epoch > now {
            return Err(Error::InvalidEpoch { epoch });
        }

        let max = ID::max_machine_id();
        let machine_id = self
            .machine_id
            .unwrap_or_else(|| derive_machine_id(max));
        if machine_id == 0 || machine_id > max {
            return Err(Error::InvalidMachineId { machine_id, max });
        }

        let tick_len = self.tick_len.unwrap_or(DEFAULT_TICK_LEN);
        if tick_len.is_zero() {
            return Err(Error::InvalidTickLen);
        }

        Ok((machine_id, TickClock::new(epoch, tick_len)))
    }
}

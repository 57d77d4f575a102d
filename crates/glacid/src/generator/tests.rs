use crate::{
    AtomicGenerator, Error, GeneratorBuilder, IdGenStatus, IdGenerator, LockGenerator, PackedId,
    Result, SonyflakeId, TickClock, TickSource, ToU64,
};
use core::cell::Cell;
use core::time::Duration;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread::scope;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

struct MockTick {
    tick: u64,
}

impl TickSource<u64> for MockTick {
    fn current_tick(&self) -> Result<u64> {
        Ok(self.tick)
    }

    fn tick_len(&self) -> Duration {
        Duration::from_millis(1)
    }
}

#[derive(Clone)]
struct StepTick {
    inner: Rc<StepTickInner>,
}

struct StepTickInner {
    values: Vec<u64>,
    index: Cell<usize>,
}

impl StepTick {
    fn new(values: Vec<u64>) -> Self {
        Self {
            inner: Rc::new(StepTickInner {
                values,
                index: Cell::new(0),
            }),
        }
    }

    fn advance(&self) {
        self.inner.index.set(self.inner.index.get() + 1);
    }
}

impl TickSource<u64> for StepTick {
    fn current_tick(&self) -> Result<u64> {
        Ok(self.inner.values[self.inner.index.get()])
    }

    fn tick_len(&self) -> Duration {
        Duration::from_millis(1)
    }
}

struct FailTick;

impl TickSource<u64> for FailTick {
    fn current_tick(&self) -> Result<u64> {
        let err = SystemTime::now()
            .duration_since(SystemTime::now() + Duration::from_secs(1))
            .unwrap_err();
        Err(Error::ClockSourceFailure(err))
    }

    fn tick_len(&self) -> Duration {
        Duration::from_millis(1)
    }
}

trait StatusExt<ID>
where
    ID: PackedId,
{
    fn unwrap_ready(self) -> ID;
    fn unwrap_pending(self) -> Duration;
}

impl<ID> StatusExt<ID> for Result<IdGenStatus<ID>>
where
    ID: PackedId,
{
    fn unwrap_ready(self) -> ID {
        match self.unwrap() {
            IdGenStatus::Ready { id } => id,
            IdGenStatus::Pending { yield_for } => {
                panic!("unexpected pending (yield for: {yield_for:?})")
            }
        }
    }

    fn unwrap_pending(self) -> Duration {
        match self.unwrap() {
            IdGenStatus::Ready { id } => panic!("unexpected ready ({id})"),
            IdGenStatus::Pending { yield_for } => yield_for,
        }
    }
}

fn run_sequence_increments_within_same_tick<G, ID, C>(generator: &G)
where
    G: IdGenerator<ID, C>,
    ID: PackedId,
    C: TickSource<ID::Ty>,
{
    let id1 = generator.try_poll_id().unwrap_ready();
    let id2 = generator.try_poll_id().unwrap_ready();
    let id3 = generator.try_poll_id().unwrap_ready();

    assert_eq!(id1.tick().to_u64(), 42);
    assert_eq!(id2.tick().to_u64(), 42);
    assert_eq!(id3.tick().to_u64(), 42);
    assert_eq!(id1.sequence().to_u64(), 0);
    assert_eq!(id2.sequence().to_u64(), 1);
    assert_eq!(id3.sequence().to_u64(), 2);
    assert!(id1 < id2 && id2 < id3);
}

fn run_pending_when_sequence_exhausted<G, ID, C>(generator: &G)
where
    G: IdGenerator<ID, C>,
    ID: PackedId,
    C: TickSource<ID::Ty>,
{
    let yield_for = generator.try_poll_id().unwrap_pending();
    assert_eq!(yield_for, Duration::from_millis(1));
}

fn run_rollover_resets_sequence<G, ID, C>(generator: &G, step: &StepTick)
where
    G: IdGenerator<ID, C>,
    ID: PackedId,
    C: TickSource<ID::Ty>,
{
    // 2^S calls fit in the first tick: one rollover plus max_sequence
    // increments.
    for i in 0..=ID::max_sequence().to_u64() {
        let id = generator.try_poll_id().unwrap_ready();
        assert_eq!(id.sequence().to_u64(), i);
        assert_eq!(id.tick().to_u64(), 42);
    }

    // Call 2^S + 1 must not produce a duplicate pair.
    generator.try_poll_id().unwrap_pending();

    step.advance();

    let id = generator.try_poll_id().unwrap_ready();
    assert_eq!(id.tick().to_u64(), 43);
    assert_eq!(id.sequence().to_u64(), 0);
}

fn run_clock_regression_is_fatal_and_sticky<G, ID, C>(generator: &G, step: &StepTick)
where
    G: IdGenerator<ID, C>,
    ID: PackedId,
    C: TickSource<ID::Ty>,
{
    let id = generator.try_poll_id().unwrap_ready();
    assert_eq!(id.tick().to_u64(), 100);

    step.advance();

    let err = generator.try_poll_id().unwrap_err();
    assert!(matches!(
        err,
        Error::ClockRegression {
            last_tick: 100,
            observed_tick: 99
        }
    ));
    assert_eq!(err.regression_magnitude(), Some(1));
    assert!(err.is_retryable());

    // The failed call must not have touched the state: the same regression
    // is reported again, still against tick 100.
    let err = generator.try_poll_id().unwrap_err();
    assert!(matches!(
        err,
        Error::ClockRegression {
            last_tick: 100,
            observed_tick: 99
        }
    ));
}

fn run_threaded_unique<G, ID, C>(make_generator: impl Fn() -> G)
where
    G: IdGenerator<ID, C> + Send + Sync,
    ID: PackedId + Send,
    C: TickSource<ID::Ty>,
{
    const THREADS: usize = 10;
    const IDS_PER_THREAD: usize = 2_000;

    let generator = Arc::new(make_generator());
    let seen_ids = Arc::new(Mutex::new(HashSet::with_capacity(THREADS * IDS_PER_THREAD)));

    scope(|s| {
        for _ in 0..THREADS {
            let generator = Arc::clone(&generator);
            let seen_ids = Arc::clone(&seen_ids);

            s.spawn(move || {
                for _ in 0..IDS_PER_THREAD {
                    let id = generator.next_id().unwrap();
                    assert!(seen_ids.lock().unwrap().insert(id));
                }
            });
        }
    });

    let final_count = seen_ids.lock().unwrap().len();
    let expected = THREADS * IDS_PER_THREAD;
    assert_eq!(final_count, expected, "expected {expected} unique IDs");
}

fn recent_wall_clock() -> TickClock {
    TickClock::new(
        SystemTime::now() - Duration::from_secs(60),
        Duration::from_millis(1),
    )
}

#[test]
fn lock_generator_sequence_test() {
    let generator: LockGenerator<SonyflakeId, _> =
        LockGenerator::new(1, MockTick { tick: 42 });
    run_sequence_increments_within_same_tick(&generator);
}

#[test]
fn atomic_generator_sequence_test() {
    let generator: AtomicGenerator<SonyflakeId, _> =
        AtomicGenerator::new(1, MockTick { tick: 42 });
    run_sequence_increments_within_same_tick(&generator);
}

#[test]
fn lock_generator_pending_test() {
    let generator: LockGenerator<SonyflakeId, _> = LockGenerator::from_components(
        0,
        1,
        SonyflakeId::max_sequence(),
        MockTick { tick: 0 },
    );
    run_pending_when_sequence_exhausted(&generator);
}

#[test]
fn atomic_generator_pending_test() {
    let generator: AtomicGenerator<SonyflakeId, _> = AtomicGenerator::from_components(
        0,
        1,
        SonyflakeId::max_sequence(),
        MockTick { tick: 0 },
    );
    run_pending_when_sequence_exhausted(&generator);
}

#[test]
fn lock_generator_rollover_test() {
    let step = StepTick::new(vec![42, 43]);
    let generator: LockGenerator<SonyflakeId, _> = LockGenerator::new(1, step.clone());
    run_rollover_resets_sequence(&generator, &step);
}

#[test]
fn atomic_generator_rollover_test() {
    let step = StepTick::new(vec![42, 43]);
    let generator: AtomicGenerator<SonyflakeId, _> = AtomicGenerator::new(1, step.clone());
    run_rollover_resets_sequence(&generator, &step);
}

#[test]
fn lock_generator_clock_regression_test() {
    let step = StepTick::new(vec![100, 99]);
    let generator: LockGenerator<SonyflakeId, _> = LockGenerator::new(1, step.clone());
    run_clock_regression_is_fatal_and_sticky(&generator, &step);
}

#[test]
fn atomic_generator_clock_regression_test() {
    let step = StepTick::new(vec![100, 99]);
    let generator: AtomicGenerator<SonyflakeId, _> = AtomicGenerator::new(1, step.clone());
    run_clock_regression_is_fatal_and_sticky(&generator, &step);
}

#[test]
fn clock_source_failure_propagates() {
    let generator: LockGenerator<SonyflakeId, _> = LockGenerator::new(1, FailTick);
    let err = generator.next_id().unwrap_err();
    assert!(matches!(err, Error::ClockSourceFailure(_)));
    assert!(!err.is_retryable());
}

#[test]
fn deadline_expires_during_exhaustion_wait() {
    let generator: LockGenerator<SonyflakeId, _> = LockGenerator::from_components(
        42,
        1,
        SonyflakeId::max_sequence(),
        MockTick { tick: 42 },
    );
    let err = generator
        .next_id_deadline(Instant::now() + Duration::from_millis(10))
        .unwrap_err();
    assert!(matches!(err, Error::Timeout));
    assert!(err.is_retryable());
}

#[test]
fn deadline_returns_id_when_sequence_has_room() {
    let generator: LockGenerator<SonyflakeId, _> =
        LockGenerator::new(1, MockTick { tick: 42 });
    let id = generator
        .next_id_deadline(Instant::now() + Duration::from_millis(10))
        .unwrap();
    assert_eq!(id.tick(), 42);
}

#[test]
fn lock_generator_threaded_unique() {
    let clock = recent_wall_clock();
    run_threaded_unique(move || LockGenerator::<SonyflakeId, _>::new(1, clock.clone()));
}

#[test]
fn atomic_generator_threaded_unique() {
    let clock = recent_wall_clock();
    run_threaded_unique(move || AtomicGenerator::<SonyflakeId, _>::new(1, clock.clone()));
}

#[test]
fn tick_field_is_monotonic_per_instance() {
    let generator: LockGenerator<SonyflakeId, _> = LockGenerator::new(1, recent_wall_clock());

    let mut last = generator.next_id().unwrap();
    for _ in 0..5_000 {
        let id = generator.next_id().unwrap();
        assert!(id.tick() >= last.tick());
        assert!(id > last);
        last = id;
    }
}

#[test]
fn builder_defaults_succeed() {
    let generator = GeneratorBuilder::<SonyflakeId>::new().build().unwrap();
    let id = generator.next_id().unwrap();
    assert!(id.machine_id() >= 1);
    assert!(id.to_i64() > 0);
}

#[test]
fn builder_rejects_future_epoch() {
    let future = SystemTime::now() + Duration::from_secs(3600);
    let err = GeneratorBuilder::<SonyflakeId>::new()
        .start_time(future)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidEpoch { epoch } if epoch == future));
    assert!(!err.is_retryable());
}

#[test]
fn builder_rejects_unix_epoch_as_start_time() {
    let err = GeneratorBuilder::<SonyflakeId>::new()
        .start_time(UNIX_EPOCH)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidEpoch { epoch } if epoch == UNIX_EPOCH));
}

#[test]
fn builder_rejects_zero_machine_id() {
    let err = GeneratorBuilder::<SonyflakeId>::new()
        .machine_id(0)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidMachineId {
            machine_id: 0,
            max: 0xFFFF
        }
    ));
}

#[test]
fn builder_rejects_oversized_machine_id() {
    let err = GeneratorBuilder::<SonyflakeId>::new()
        .machine_id(1 << 16)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidMachineId {
            machine_id: 0x1_0000,
            max: 0xFFFF
        }
    ));
}

#[test]
fn builder_rejects_zero_tick_len() {
    let err = GeneratorBuilder::<SonyflakeId>::new()
        .tick_len(Duration::ZERO)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTickLen));
}

#[test]
fn scenario_two_ids_unpack_machine_id() {
    let generator = GeneratorBuilder::<SonyflakeId>::new()
        .start_time(UNIX_EPOCH + Duration::from_secs(1_609_459_200)) // 2021-01-01T00:00:00Z
        .machine_id(12345)
        .build()
        .unwrap();

    let id1 = generator.next_id().unwrap();
    let id2 = generator.next_id().unwrap();

    assert_ne!(id1, id2);
    assert!(id1.to_i64() > 0);
    assert!(id2.to_i64() > 0);
    assert_eq!(id1.machine_id(), 12345);
    assert_eq!(id2.machine_id(), 12345);
    assert!(id2 > id1);
}

#[test]
fn builder_build_atomic_matches_lock_validation() {
    let err = GeneratorBuilder::<SonyflakeId>::new()
        .machine_id(0)
        .build_atomic()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidMachineId { machine_id: 0, .. }));

    let generator = GeneratorBuilder::<SonyflakeId>::new()
        .machine_id(7)
        .build_atomic()
        .unwrap();
    assert_eq!(generator.next_id().unwrap().machine_id(), 7);
}

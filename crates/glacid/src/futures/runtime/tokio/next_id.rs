use crate::{
    IdGenerator, IdGeneratorAsyncExt, PackedId, Result, TickSource, futures::TokioSleep,
};

/// Extension trait for asynchronously generating IDs on the
/// [`tokio`](https://docs.rs/tokio) runtime.
///
/// This trait provides a convenience method that uses [`TokioSleep`] as the
/// sleep provider, so callers do not have to name a sleep strategy.
///
/// [`TokioSleep`]: crate::TokioSleep
pub trait IdGeneratorAsyncTokioExt<ID, C>
where
    ID: PackedId,
    C: TickSource<ID::Ty>,
{
    /// Returns a future that resolves to the next available ID using
    /// [`TokioSleep`].
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying generator fails; see
    /// [`IdGenerator::try_poll_id`].
    ///
    /// [`TokioSleep`]: crate::TokioSleep
    fn try_next_id_async(&self) -> impl Future<Output = Result<ID>> + Send;
}

impl<G, ID, C> IdGeneratorAsyncTokioExt<ID, C> for G
where
    G: IdGenerator<ID, C> + Sync,
    ID: PackedId + Send,
    C: TickSource<ID::Ty> + Send,
{
    fn try_next_id_async(&self) -> impl Future<Output = Result<ID>> + Send {
        <Self as IdGeneratorAsyncExt<ID, C>>::try_next_id_async::<TokioSleep>(self)
    }
}

#[cfg(test)]
mod tests {
    use super::IdGeneratorAsyncTokioExt;
    use crate::{
        AtomicGenerator, Error, IdGenerator, LockGenerator, SleepProvider, SonyflakeId, TickClock,
        TickSource, TokioYield,
    };
    use ::futures::future::try_join_all;
    use core::time::Duration;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::SystemTime;

    const NUM_GENERATORS: u64 = 4;
    const IDS_PER_GENERATOR: usize = 2_048;

    fn recent_wall_clock() -> TickClock {
        TickClock::new(
            SystemTime::now() - Duration::from_secs(60),
            Duration::from_millis(1),
        )
    }

    async fn generate_many_unique<G, S>(generator_fn: impl Fn(u64, TickClock) -> G)
    where
        G: IdGenerator<SonyflakeId, TickClock> + Send + Sync + 'static,
        S: SleepProvider,
    {
        let clock = recent_wall_clock();
        let generators: Vec<_> = (1..=NUM_GENERATORS)
            .map(|machine_id| Arc::new(generator_fn(machine_id, clock.clone())))
            .collect();

        let tasks: Vec<tokio::task::JoinHandle<crate::Result<Vec<SonyflakeId>>>> = generators
            .into_iter()
            .map(|g| {
                tokio::spawn(async move {
                    let mut ids = Vec::with_capacity(IDS_PER_GENERATOR);
                    for _ in 0..IDS_PER_GENERATOR {
                        let id = crate::futures::IdGeneratorAsyncExt::try_next_id_async::<S>(
                            g.as_ref(),
                        )
                        .await?;
                        ids.push(id);
                    }
                    Ok(ids)
                })
            })
            .collect();

        let all_ids: Vec<_> = try_join_all(tasks)
            .await
            .unwrap()
            .into_iter()
            .flat_map(|ids| ids.unwrap())
            .collect();

        let expected = NUM_GENERATORS as usize * IDS_PER_GENERATOR;
        assert_eq!(all_ids.len(), expected);

        let mut seen = HashSet::with_capacity(all_ids.len());
        for id in &all_ids {
            assert!(seen.insert(id), "duplicate ID found: {id:?}");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn lock_can_call_try_next_id_async() {
        let generator = LockGenerator::<SonyflakeId, _>::new(1, recent_wall_clock());
        let id = generator.try_next_id_async().await.unwrap();
        assert_eq!(id.machine_id(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn atomic_can_call_try_next_id_async() {
        let generator = AtomicGenerator::<SonyflakeId, _>::new(1, recent_wall_clock());
        let id = generator.try_next_id_async().await.unwrap();
        assert_eq!(id.machine_id(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn generates_many_unique_ids_lock_sleep() {
        generate_many_unique::<_, crate::TokioSleep>(LockGenerator::new).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn generates_many_unique_ids_lock_yield() {
        generate_many_unique::<_, TokioYield>(LockGenerator::new).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn generates_many_unique_ids_atomic_sleep() {
        generate_many_unique::<_, crate::TokioSleep>(AtomicGenerator::new).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn generates_many_unique_ids_atomic_yield() {
        generate_many_unique::<_, TokioYield>(AtomicGenerator::new).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn async_clock_regression_resolves_with_error() {
        struct Backwards {
            first: std::sync::atomic::AtomicBool,
        }

        impl TickSource<u64> for Backwards {
            fn current_tick(&self) -> crate::Result<u64> {
                if self.first.swap(false, std::sync::atomic::Ordering::Relaxed) {
                    Ok(100)
                } else {
                    Ok(99)
                }
            }

            fn tick_len(&self) -> Duration {
                Duration::from_millis(1)
            }
        }

        let generator = LockGenerator::<SonyflakeId, _>::new(
            1,
            Backwards {
                first: std::sync::atomic::AtomicBool::new(true),
            },
        );
        generator.try_next_id_async().await.unwrap();
        let err = generator.try_next_id_async().await.unwrap_err();
        assert!(matches!(
            err,
            Error::ClockRegression {
                last_tick: 100,
                observed_tick: 99
            }
        ));
    }
}

use super::SleepProvider;
use crate::{IdGenStatus, IdGenerator, PackedId, Result, TickSource};

/// Extension trait for asynchronously generating IDs.
///
/// This trait enables [`IdGenerator`] types to yield IDs in a
/// `Future`-based context by awaiting until the generator is ready to
/// produce a new ID, instead of blocking a thread through the
/// sequence-exhaustion wait.
pub trait IdGeneratorAsyncExt<ID, C>
where
    ID: PackedId,
    C: TickSource<ID::Ty>,
{
    /// Returns a future that resolves to the next available ID.
    ///
    /// If the generator cannot issue a new ID immediately, the future sleeps
    /// for the duration indicated by the generator and retries. Clock
    /// regression and time-source failures resolve the future with the error
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Every error of [`IdGenerator::try_poll_id`], propagated without
    /// internal retry.
    fn try_next_id_async<S>(&self) -> impl Future<Output = Result<ID>> + Send
    where
        S: SleepProvider;
}

impl<G, ID, C> IdGeneratorAsyncExt<ID, C> for G
where
    G: IdGenerator<ID, C> + Sync,
    ID: PackedId + Send,
    C: TickSource<ID::Ty> + Send,
{
    fn try_next_id_async<S>(&self) -> impl Future<Output = Result<ID>> + Send
    where
        S: SleepProvider,
    {
        async {
            loop {
                match self.try_poll_id()? {
                    IdGenStatus::Ready { id } => return Ok(id),
                    IdGenStatus::Pending { yield_for } => S::sleep_for(yield_for).await,
                }
            }
        }
    }
}

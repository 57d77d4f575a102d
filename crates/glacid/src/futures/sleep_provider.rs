use core::time::Duration;

/// A trait that abstracts over how to sleep for a given [`Duration`] in async
/// contexts.
///
/// This allows ID generation to be generic over runtimes: the generator
/// decides *how long* to back off, the provider decides *how* the task
/// suspends.
pub trait SleepProvider {
    /// Returns a future that completes after `dur`.
    ///
    /// The future must be `Send` so generation can run on multi-threaded
    /// executors.
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}

mod next_id;
mod runtime;
mod sleep_provider;

pub use next_id::*;
#[cfg(feature = "async-tokio")]
pub use runtime::*;
pub use sleep_provider::*;

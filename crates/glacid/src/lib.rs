mod error;
#[cfg(feature = "futures")]
mod futures;
mod generator;
mod id;
mod machine_id;
#[cfg(feature = "serde")]
mod serde_support;
mod time;

pub use crate::error::*;
#[cfg(feature = "futures")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::machine_id::*;
#[cfg(feature = "serde")]
pub use crate::serde_support::*;
pub use crate::time::*;

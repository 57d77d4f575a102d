mod interface;
mod layout;
mod to_u64;

pub use interface::*;
pub use layout::*;
pub use to_u64::*;

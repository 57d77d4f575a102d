mod next_id;
mod sleep;

pub use next_id::*;
pub use sleep::*;

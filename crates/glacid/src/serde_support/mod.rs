mod packed;

pub use packed::*;

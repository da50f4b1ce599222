pub mod core;
pub mod store;

pub use core::{AmbiguousHandlePolicy, HandleStore};

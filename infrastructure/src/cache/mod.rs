//! Plan cache adapters.

pub mod fs_store;
pub mod memory;

//! Key-value backends implementing [`crate::domain::ports::KvStore`].

mod memory_store;

pub use memory_store::MemoryKvStore;

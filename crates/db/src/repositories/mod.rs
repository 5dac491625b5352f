//! Repository adapters.

#[cfg(feature = "mock_db")]
mod memory;

#[cfg(feature = "mock_db")]
pub use memory::MemoryRepository;

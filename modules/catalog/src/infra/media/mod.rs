//! Media store implementations.
//!
//! `LocalMediaStore` keeps uploads on the server's disk and serves them from
//! a public `/media/{id}` path; external blob hosts would implement the same
//! port. `MemoryMediaStore` backs tests.

mod local;
mod memory;

pub use local::LocalMediaStore;
pub use memory::MemoryMediaStore;

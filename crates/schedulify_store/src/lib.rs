// --- File: crates/schedulify_store/src/lib.rs ---

// Declare modules within this crate
pub mod memory; // In-memory seam implementation

pub use memory::InMemoryScheduleStore;

//! Storage Adapters
//!
//! Implementations of the ProgressStorage port.
//!
//! ## Available Adapters
//!
//! - **FileProgressStorage** - One YAML file per idea on disk
//! - **InMemoryProgressStorage** - Stores progress in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileProgressStorage, InMemoryProgressStorage};
//!
//! // Production: file-based storage
//! let storage = FileProgressStorage::new("./data/journeys");
//!
//! // Testing: in-memory storage
//! let storage = InMemoryProgressStorage::new();
//! ```

mod file_progress_storage;
mod in_memory_progress_storage;

pub use file_progress_storage::FileProgressStorage;
pub use in_memory_progress_storage::InMemoryProgressStorage;

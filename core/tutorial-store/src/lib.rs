//! In-memory storage for Tutorial records.
//!
//! The store owns the collection and the id counter behind a single lock:
//! - `find_*` operations take a shared read lock and return owned copies
//! - `save`, `update` and `delete_*` take the write lock, so id assignment
//!   and append happen atomically
//!
//! Nothing is persisted. A fresh store is empty and its counter starts at 0.

mod error;
mod model;
mod store;

pub use error::{StoreError, StoreResult};
pub use model::{Tutorial, UNSAVED_ID};
pub use store::TutorialStore;

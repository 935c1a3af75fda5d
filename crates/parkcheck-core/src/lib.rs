//! parkcheck-core
//!
//! Pure domain types shared by every parkcheck crate: the clinical voice
//! reading, the classifier feature vector, classification labels and the
//! chat transcript. No IO, no network.

pub mod error;
pub mod models;

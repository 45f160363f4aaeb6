//! Resume processing pipeline: document text extraction, heuristic claim
//! extraction, and simulated claim verification.
//!
//! The pipeline is synchronous and request-scoped. One upload runs
//! extract → claims → verify once, with no shared mutable state; handlers
//! move the work onto the blocking pool.

pub mod claims;
pub mod document;
pub mod reference;
pub mod verification;

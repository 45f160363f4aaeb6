use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::claims::ClaimExtractor;
use crate::pipeline::verification::VerificationEngine;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ResumeStore>,
    /// Compiled claim-extraction patterns, built once at startup.
    pub extractor: Arc<ClaimExtractor>,
    /// Verification engine with its immutable reference tables.
    pub engine: Arc<VerificationEngine>,
    pub config: Config,
}

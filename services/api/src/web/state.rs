//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::adapters::{Argon2Hasher, FixedReflection, TemplateVisionComposer};
use crate::config::Config;
use futureme_core::ports::{CredentialHasher, DocumentStore, ReflectionService, VisionComposer};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<Config>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub vision_composer: Arc<dyn VisionComposer>,
    pub reflection: Arc<dyn ReflectionService>,
}

impl AppState {
    /// Wires the given store to the standard Argon2 hasher and template generators.
    pub fn new(config: Arc<Config>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            config,
            hasher: Arc::new(Argon2Hasher::new()),
            vision_composer: Arc::new(TemplateVisionComposer),
            reflection: Arc::new(FixedReflection),
        }
    }
}

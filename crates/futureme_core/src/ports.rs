//! crates/futureme_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete document store, password hashing scheme and
//! text generators.

use async_trait::async_trait;
use std::fmt;

use crate::document::{Document, Fields, Filter, FindOptions};
use crate::domain::{VisionDraft, VisionPrompt};
use crate::identity::DocumentId;

//=========================================================================================
// Store Error and Result Types
//=========================================================================================

/// Failures raised by a document store adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document store unavailable: {0}")]
    Unavailable(String),
    #[error("Document store query failed: {0}")]
    Query(String),
    #[error("Stored document is malformed: {0}")]
    Corrupt(String),
    #[error("Malformed identity: '{0}'")]
    MalformedId(String),
}

/// A convenience type alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

//=========================================================================================
// Collections
//=========================================================================================

/// The named groupings of records, one per record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    User,
    Vision,
    Goal,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::User, Collection::Vision, Collection::Goal];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::User => "user",
            Collection::Vision => "vision",
            Collection::Goal => "goal",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Generic persistence primitives over a schemaless document store.
///
/// Implementations must be safe to share across concurrent requests. None of
/// the methods validate record contents: callers validate before storing.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores `record` under a freshly assigned identity and returns it.
    async fn insert(&self, collection: Collection, record: &Fields) -> StoreResult<DocumentId>;

    /// Returns every document matching `filter`, ordered and capped per `options`.
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: FindOptions,
    ) -> StoreResult<Vec<Document>>;

    /// Returns the first document matching `filter`, if any.
    async fn find_one(&self, collection: Collection, filter: &Filter)
        -> StoreResult<Option<Document>>;

    /// Merges `fields` into the document with identity `id`.
    ///
    /// Only the given fields change; `updated_at` is always refreshed and
    /// `created_at` is never written. Returns the post-update document, or
    /// `None` when no document has that identity.
    async fn update(
        &self,
        collection: Collection,
        id: DocumentId,
        fields: Fields,
    ) -> StoreResult<Option<Document>>;

    /// Removes the document with identity `id`; `true` if one was removed.
    async fn delete(&self, collection: Collection, id: DocumentId) -> StoreResult<bool>;

    /// Names of the collections that currently hold documents.
    async fn collection_names(&self) -> StoreResult<Vec<String>>;

    /// A short label for diagnostics, e.g. `"postgres"`.
    fn backend(&self) -> &'static str;

    /// Whether records outlive the process.
    fn is_persistent(&self) -> bool {
        true
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Credential hashing failed: {0}")]
pub struct CredentialError(pub String);

/// Turns plaintext passwords into stored credentials and checks them later.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, CredentialError>;

    /// `false` for a wrong password and for a stored value that cannot be parsed.
    fn verify(&self, password: &str, stored: &str) -> bool;
}

/// Produces the derived parts of a life vision from the user's answers.
pub trait VisionComposer: Send + Sync {
    fn compose(&self, prompt: &VisionPrompt) -> VisionDraft;
}

/// Produces the reply for a chat message.
pub trait ReflectionService: Send + Sync {
    fn reply(&self, message: &str) -> String;
}

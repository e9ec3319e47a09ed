//! crates/futureme_core/src/operations/mod.rs
//!
//! Domain operations. Each one validates its input, performs its store calls and
//! returns typed records. Collaborators are passed in explicitly so every
//! operation can run against any `DocumentStore`.

pub mod auth;
pub mod chat;
pub mod diagnostics;
pub mod goals;
pub mod vision;

pub use auth::{google_auth, login, register, AuthSession};
pub use chat::chat;
pub use diagnostics::{diagnose, DiagnosticReport};
pub use goals::{create_goal, delete_goal, list_goals, update_goal};
pub use vision::{create_vision, latest_vision};

use crate::document::{Document, Fields};
use crate::domain::ValidationError;
use crate::identity;
use crate::ports::{Collection, CredentialError, DocumentStore, StoreError};

/// Every way a domain operation can fail.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Conflict(String),
    #[error("Invalid credentials")]
    Auth,
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CredentialError> for ServiceError {
    fn from(e: CredentialError) -> Self {
        ServiceError::Internal(e.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Stamps both timestamps on `fields`, inserts them and returns the stored document.
async fn persist(
    store: &dyn DocumentStore,
    collection: Collection,
    mut fields: Fields,
) -> ServiceResult<Document> {
    identity::stamp_created(&mut fields, identity::now());
    let id = store.insert(collection, &fields).await?;
    Ok(Document::new(id, fields))
}

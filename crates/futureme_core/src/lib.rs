pub mod document;
pub mod domain;
pub mod identity;
pub mod operations;
pub mod ports;

pub use document::{Document, Fields, Filter, FindOptions, Sort, SortOrder, Value};
pub use domain::{
    AuthProvider, Goal, GoalChanges, GoalDraft, GoalPatch, NewGoal, NewUser, Progress,
    Registration, User, UserSummary, ValidationError, Vision, VisionDraft, VisionPrompt,
};
pub use identity::DocumentId;
pub use operations::{AuthSession, DiagnosticReport, ServiceError, ServiceResult};
pub use ports::{
    Collection, CredentialError, CredentialHasher, DocumentStore, ReflectionService, StoreError,
    StoreResult, VisionComposer,
};

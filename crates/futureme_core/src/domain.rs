//! crates/futureme_core/src/domain.rs
//!
//! Defines the record kinds of the application (users, visions, goals), the
//! validated inputs that create or change them, and their mapping onto stored
//! documents. Inputs are parse-or-reject: a value that fails validation never
//! becomes a `New*` record, so it can never reach a store.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::document::{Document, Fields, Value};
use crate::identity::{DocumentId, CREATED_AT, UPDATED_AT};
use crate::ports::StoreError;

/// Domain of the synthetic addresses given to Google sign-ins.
pub const GOOGLE_EMAIL_DOMAIN: &str = "googleuser.dev";

/// Number of token characters used to derive a Google user's address.
pub const GOOGLE_TOKEN_PREFIX_LEN: usize = 6;

pub const GOOGLE_DISPLAY_NAME: &str = "Google User";

//=========================================================================================
// Validation
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("{field} has unrecognized value '{value}'")]
    UnknownVariant { field: &'static str, value: String },
}

impl ValidationError {
    /// The input field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::UnknownVariant { field, .. } => field,
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Missing { field })
    } else {
        Ok(())
    }
}

/// Goal completion percentage, always within 0..=100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Progress(u8);

impl Progress {
    pub const MIN: i64 = 0;
    pub const MAX: i64 = 100;

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::OutOfRange {
                field: "progress",
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// How a user signs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthProvider {
    Password,
    Google,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Password => "password",
            AuthProvider::Google => "google",
        }
    }
}

impl FromStr for AuthProvider {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "password" => Ok(AuthProvider::Password),
            "google" => Ok(AuthProvider::Google),
            other => Err(ValidationError::UnknownVariant {
                field: "auth_provider",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=========================================================================================
// Document decoding helpers
//=========================================================================================

fn corrupt(doc: &Document, field: &str, expected: &str) -> StoreError {
    StoreError::Corrupt(format!(
        "document {} field '{}' is not {}",
        doc.id, field, expected
    ))
}

fn required_str(doc: &Document, field: &str) -> Result<String, StoreError> {
    doc.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| corrupt(doc, field, "a string"))
}

fn optional_str(doc: &Document, field: &str) -> Result<Option<String>, StoreError> {
    match doc.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Str(s)) => Ok(Some(s.clone())),
        Some(_) => Err(corrupt(doc, field, "a string or null")),
    }
}

fn required_timestamp(doc: &Document, field: &str) -> Result<DateTime<Utc>, StoreError> {
    doc.get(field)
        .and_then(Value::as_timestamp)
        .ok_or_else(|| corrupt(doc, field, "a timestamp"))
}

fn string_list(doc: &Document, field: &str) -> Result<Vec<String>, StoreError> {
    match doc.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::List(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| corrupt(doc, field, "a list of strings"))
            })
            .collect(),
        Some(_) => Err(corrupt(doc, field, "a list of strings")),
    }
}

fn timestamps(fields: &mut Fields, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
    fields.insert(CREATED_AT.into(), Value::Timestamp(created_at));
    fields.insert(UPDATED_AT.into(), Value::Timestamp(updated_at));
}

//=========================================================================================
// Users
//=========================================================================================

/// A stored user account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: DocumentId,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub auth_provider: AuthProvider,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The public-safe view of a user returned by every auth operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.to_string(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

impl TryFrom<Document> for User {
    type Error = StoreError;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        // Records written before the provider field existed were password accounts.
        let auth_provider = match optional_str(&doc, "auth_provider")? {
            Some(raw) => raw
                .parse()
                .map_err(|e: ValidationError| StoreError::Corrupt(e.to_string()))?,
            None => AuthProvider::Password,
        };
        Ok(Self {
            email: required_str(&doc, "email")?,
            name: optional_str(&doc, "name")?,
            password_hash: optional_str(&doc, "password_hash")?,
            auth_provider,
            created_at: required_timestamp(&doc, CREATED_AT)?,
            updated_at: required_timestamp(&doc, UPDATED_AT)?,
            id: doc.id,
        })
    }
}

/// Raw input of a password registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

impl Registration {
    pub fn validate(self) -> Result<Self, ValidationError> {
        require("email", &self.email)?;
        require("password", &self.password)?;
        Ok(Self {
            email: self.email.trim().to_string(),
            ..self
        })
    }

    /// The supplied name, or the local part of the email when none was given.
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => email_local_part(&self.email).to_string(),
        }
    }
}

pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// The deterministic address assigned to the holder of a Google id token.
/// The token is used exactly as supplied; only a blank token is rejected.
pub fn google_email(id_token: &str) -> Result<String, ValidationError> {
    require("id_token", id_token)?;
    let prefix: String = id_token.chars().take(GOOGLE_TOKEN_PREFIX_LEN).collect();
    Ok(format!("{}@{}", prefix, GOOGLE_EMAIL_DOMAIN))
}

/// A user about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub auth_provider: AuthProvider,
}

impl NewUser {
    pub fn with_password(registration: &Registration, password_hash: String) -> Self {
        Self {
            email: registration.email.clone(),
            name: registration.display_name(),
            password_hash: Some(password_hash),
            auth_provider: AuthProvider::Password,
        }
    }

    pub fn google(email: String) -> Self {
        Self {
            email,
            name: GOOGLE_DISPLAY_NAME.to_string(),
            password_hash: None,
            auth_provider: AuthProvider::Google,
        }
    }

    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("email".into(), self.email.into());
        fields.insert("name".into(), self.name.into());
        if let Some(hash) = self.password_hash {
            fields.insert("password_hash".into(), hash.into());
        }
        fields.insert("auth_provider".into(), self.auth_provider.as_str().into());
        fields
    }
}

//=========================================================================================
// Visions
//=========================================================================================

/// The user's free-text answers that a vision is generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionPrompt {
    pub user_id: String,
    pub career: String,
    pub lifestyle: String,
    pub timeline: String,
}

impl VisionPrompt {
    pub fn validate(self) -> Result<Self, ValidationError> {
        require("user_id", &self.user_id)?;
        Ok(self)
    }
}

/// The generated parts of a vision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionDraft {
    pub summary: String,
    pub milestones: Vec<String>,
    pub emotional_impact: String,
}

/// A stored life vision.
#[derive(Debug, Clone, PartialEq)]
pub struct Vision {
    pub id: DocumentId,
    pub user_id: String,
    pub career: String,
    pub lifestyle: String,
    pub timeline: String,
    pub summary: String,
    pub milestones: Vec<String>,
    pub emotional_impact: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn new_vision_fields(prompt: VisionPrompt, draft: VisionDraft) -> Fields {
    let mut fields = Fields::new();
    fields.insert("user_id".into(), prompt.user_id.into());
    fields.insert("career".into(), prompt.career.into());
    fields.insert("lifestyle".into(), prompt.lifestyle.into());
    fields.insert("timeline".into(), prompt.timeline.into());
    fields.insert("summary".into(), draft.summary.into());
    fields.insert("milestones".into(), draft.milestones.into());
    fields.insert("emotional_impact".into(), draft.emotional_impact.into());
    fields
}

impl Vision {
    pub fn to_document(&self) -> Document {
        let prompt = VisionPrompt {
            user_id: self.user_id.clone(),
            career: self.career.clone(),
            lifestyle: self.lifestyle.clone(),
            timeline: self.timeline.clone(),
        };
        let draft = VisionDraft {
            summary: self.summary.clone(),
            milestones: self.milestones.clone(),
            emotional_impact: self.emotional_impact.clone(),
        };
        let mut fields = new_vision_fields(prompt, draft);
        timestamps(&mut fields, self.created_at, self.updated_at);
        Document::new(self.id, fields)
    }

    pub fn to_wire(&self) -> serde_json::Value {
        self.to_document().to_wire()
    }
}

impl TryFrom<Document> for Vision {
    type Error = StoreError;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: required_str(&doc, "user_id")?,
            career: required_str(&doc, "career")?,
            lifestyle: required_str(&doc, "lifestyle")?,
            timeline: required_str(&doc, "timeline")?,
            summary: optional_str(&doc, "summary")?.unwrap_or_default(),
            milestones: string_list(&doc, "milestones")?,
            emotional_impact: optional_str(&doc, "emotional_impact")?.unwrap_or_default(),
            created_at: required_timestamp(&doc, CREATED_AT)?,
            updated_at: required_timestamp(&doc, UPDATED_AT)?,
            id: doc.id,
        })
    }
}

//=========================================================================================
// Goals
//=========================================================================================

/// Raw input of a goal creation, before validation.
#[derive(Debug, Clone, Default)]
pub struct GoalDraft {
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_date: Option<String>,
    pub progress: Option<i64>,
    pub category: Option<String>,
}

/// Raw input of a goal update; `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct GoalChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_date: Option<String>,
    pub progress: Option<i64>,
    pub category: Option<String>,
}

/// A validated goal about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_date: Option<String>,
    pub progress: Progress,
    pub category: Option<String>,
}

impl NewGoal {
    pub fn parse(draft: GoalDraft) -> Result<Self, ValidationError> {
        require("user_id", &draft.user_id)?;
        let progress = match draft.progress {
            Some(value) => Progress::new(value)?,
            None => Progress::default(),
        };
        Ok(Self {
            user_id: draft.user_id,
            title: draft.title,
            description: draft.description,
            target_date: draft.target_date,
            progress,
            category: draft.category,
        })
    }

    /// All schema fields; absent optionals are stored as null.
    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("user_id".into(), self.user_id.into());
        fields.insert("title".into(), self.title.into());
        fields.insert("description".into(), self.description.into());
        fields.insert("target_date".into(), self.target_date.into());
        fields.insert("progress".into(), Value::Int(self.progress.value().into()));
        fields.insert("category".into(), self.category.into());
        fields
    }
}

/// A validated partial update of a goal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_date: Option<String>,
    pub progress: Option<Progress>,
    pub category: Option<String>,
}

impl GoalPatch {
    pub fn parse(changes: GoalChanges) -> Result<Self, ValidationError> {
        Ok(Self {
            title: changes.title,
            description: changes.description,
            target_date: changes.target_date,
            progress: changes.progress.map(Progress::new).transpose()?,
            category: changes.category,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Only the fields that were supplied; absent ones are left out entirely so
    /// the store keeps their current values.
    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        let supplied = [
            ("title", self.title),
            ("description", self.description),
            ("target_date", self.target_date),
            ("category", self.category),
        ];
        for (name, value) in supplied {
            if let Some(value) = value {
                fields.insert(name.into(), value.into());
            }
        }
        if let Some(progress) = self.progress {
            fields.insert("progress".into(), Value::Int(progress.value().into()));
        }
        fields
    }
}

/// A stored goal.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub id: DocumentId,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_date: Option<String>,
    pub progress: Progress,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn to_document(&self) -> Document {
        let mut fields = NewGoal {
            user_id: self.user_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            target_date: self.target_date.clone(),
            progress: self.progress,
            category: self.category.clone(),
        }
        .into_fields();
        timestamps(&mut fields, self.created_at, self.updated_at);
        Document::new(self.id, fields)
    }

    pub fn to_wire(&self) -> serde_json::Value {
        self.to_document().to_wire()
    }
}

impl TryFrom<Document> for Goal {
    type Error = StoreError;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        let progress = match doc.get("progress") {
            None | Some(Value::Null) => Progress::default(),
            Some(Value::Int(raw)) => {
                Progress::new(*raw).map_err(|e| StoreError::Corrupt(e.to_string()))?
            }
            Some(_) => return Err(corrupt(&doc, "progress", "an integer")),
        };
        Ok(Self {
            user_id: required_str(&doc, "user_id")?,
            title: required_str(&doc, "title")?,
            description: optional_str(&doc, "description")?,
            target_date: optional_str(&doc, "target_date")?,
            progress,
            category: optional_str(&doc, "category")?,
            created_at: required_timestamp(&doc, CREATED_AT)?,
            updated_at: required_timestamp(&doc, UPDATED_AT)?,
            id: doc.id,
        })
    }
}

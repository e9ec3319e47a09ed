//! Registration, login and the mock Google sign-in.
//!
//! The token handed back to clients is the user's identity string. Nothing in
//! the service verifies it; it is a handle, not a credential.

use tracing::{info, warn};

use super::{persist, ServiceError, ServiceResult};
use crate::document::Filter;
use crate::domain::{google_email, NewUser, Registration, User, UserSummary};
use crate::ports::{Collection, CredentialHasher, DocumentStore};

/// The result of every successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: UserSummary,
}

impl AuthSession {
    fn for_user(user: &User) -> Self {
        Self {
            token: user.id.to_string(),
            user: user.summary(),
        }
    }
}

async fn find_by_email(store: &dyn DocumentStore, email: &str) -> ServiceResult<Option<User>> {
    let doc = store
        .find_one(Collection::User, &Filter::all().eq("email", email))
        .await?;
    Ok(doc.map(User::try_from).transpose()?)
}

/// Creates a password account.
///
/// The email check and the insert are separate store calls, so two concurrent
/// registrations of the same address can both succeed.
pub async fn register(
    store: &dyn DocumentStore,
    hasher: &dyn CredentialHasher,
    registration: Registration,
) -> ServiceResult<AuthSession> {
    let registration = registration.validate()?;

    if find_by_email(store, &registration.email).await?.is_some() {
        warn!("Registration rejected: {} is already registered", registration.email);
        return Err(ServiceError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hasher.hash(&registration.password)?;
    let new_user = NewUser::with_password(&registration, password_hash);
    let doc = persist(store, Collection::User, new_user.into_fields()).await?;
    let user = User::try_from(doc)?;

    info!("Registered user {}", user.id);
    Ok(AuthSession::for_user(&user))
}

/// Signs in a password account. Unknown email, an account without a password
/// and a wrong password are indistinguishable to the caller.
pub async fn login(
    store: &dyn DocumentStore,
    hasher: &dyn CredentialHasher,
    email: &str,
    password: &str,
) -> ServiceResult<AuthSession> {
    let user = find_by_email(store, email.trim())
        .await?
        .ok_or(ServiceError::Auth)?;

    let verified = user
        .password_hash
        .as_deref()
        .is_some_and(|stored| hasher.verify(password, stored));
    if !verified {
        return Err(ServiceError::Auth);
    }

    Ok(AuthSession::for_user(&user))
}

/// Mock Google sign-in: any token is accepted and mapped to a synthetic address
/// built from its first characters. Repeated calls with the same prefix reuse
/// the account created by the first one.
pub async fn google_auth(store: &dyn DocumentStore, id_token: &str) -> ServiceResult<AuthSession> {
    let email = google_email(id_token)?;

    let user = match find_by_email(store, &email).await? {
        Some(user) => user,
        None => {
            let doc = persist(store, Collection::User, NewUser::google(email).into_fields()).await?;
            let user = User::try_from(doc)?;
            info!("Created Google user {}", user.id);
            user
        }
    };

    Ok(AuthSession::for_user(&user))
}

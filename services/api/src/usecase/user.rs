use foodgram_domain::id::UserId;
use foodgram_domain::user::{PERSON_NAME_MAX_LEN, is_valid_email, validate_password, validate_username};

use crate::domain::repository::{PasswordHasher, SubscriptionRepository, UserRepository};
use crate::domain::types::{NewUser, User, UserView};
use crate::error::{ApiError, FieldErrors};
use crate::usecase::fields::{REQUIRED, max_chars, required_text};

// ── RegisterUser ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone)]
pub struct RegisterInput {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

pub struct RegisterUserUseCase<U: UserRepository, P: PasswordHasher> {
    pub users: U,
    pub passwords: P,
}

impl<U: UserRepository, P: PasswordHasher> RegisterUserUseCase<U, P> {
    pub async fn execute(&self, input: RegisterInput) -> Result<User, ApiError> {
        let mut errors = FieldErrors::new();

        let email = required_text(&mut errors, "email", input.email);
        if email.as_deref().is_some_and(|e| !is_valid_email(e)) {
            errors.add("email", "enter a valid email address");
        }
        let username = required_text(&mut errors, "username", input.username);
        if let Some(Err(e)) = username.as_deref().map(validate_username) {
            errors.add("username", e.to_string());
        }
        let first_name = required_text(&mut errors, "first_name", input.first_name);
        max_chars(&mut errors, "first_name", first_name.as_deref(), PERSON_NAME_MAX_LEN);
        let last_name = required_text(&mut errors, "last_name", input.last_name);
        max_chars(&mut errors, "last_name", last_name.as_deref(), PERSON_NAME_MAX_LEN);
        let password = check_new_password(&mut errors, "password", input.password);

        if let Some(email) = &email {
            if self.users.find_by_email(email).await?.is_some() {
                errors.add("email", "a user with this email already exists");
            }
        }
        if let Some(username) = &username {
            if self.users.find_by_username(username).await?.is_some() {
                errors.add("username", "a user with this username already exists");
            }
        }

        let (Some(email), Some(username), Some(first_name), Some(last_name), Some(password)) =
            (email, username, first_name, last_name, password)
        else {
            return Err(ApiError::Validation(errors));
        };
        errors.into_result()?;

        let new_user = NewUser {
            email,
            username,
            first_name,
            last_name,
            password_hash: self.passwords.hash(&password).await?,
        };
        let user = self.users.create(&new_user).await?.ok_or_else(|| {
            ApiError::Validation(FieldErrors::single(
                "username",
                "a user with this email or username already exists",
            ))
        })?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }
}

/// Password rules for a new password field; `None` with an error recorded when refused.
fn check_new_password(
    errors: &mut FieldErrors,
    field: &str,
    password: Option<String>,
) -> Option<String> {
    let Some(password) = password.filter(|p| !p.is_empty()) else {
        errors.add(field, REQUIRED);
        return None;
    };
    match validate_password(&password) {
        Ok(()) => Some(password),
        Err(e) => {
            errors.add(field, e.to_string());
            None
        }
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository, S: SubscriptionRepository> {
    pub users: U,
    pub subscriptions: S,
}

impl<U: UserRepository, S: SubscriptionRepository> GetUserUseCase<U, S> {
    pub async fn execute(&self, viewer: Option<&User>, id: UserId) -> Result<UserView, ApiError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let mut views = decorate(&self.subscriptions, viewer, vec![user]).await?;
        views.pop().ok_or(ApiError::UserNotFound)
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository, S: SubscriptionRepository> {
    pub users: U,
    pub subscriptions: S,
}

impl<U: UserRepository, S: SubscriptionRepository> ListUsersUseCase<U, S> {
    pub async fn execute(&self, viewer: Option<&User>) -> Result<Vec<UserView>, ApiError> {
        let users = self.users.list().await?;
        decorate(&self.subscriptions, viewer, users).await
    }
}

/// Attach `is_subscribed` for `viewer`. Never true for the viewer itself.
pub async fn decorate<S: SubscriptionRepository>(
    subscriptions: &S,
    viewer: Option<&User>,
    users: Vec<User>,
) -> Result<Vec<UserView>, ApiError> {
    let followed = match viewer {
        Some(viewer) => {
            let ids: Vec<UserId> = users
                .iter()
                .map(|u| u.id)
                .filter(|id| *id != viewer.id)
                .collect();
            subscriptions.followed_among(viewer.id, &ids).await?
        }
        None => Default::default(),
    };
    Ok(users
        .into_iter()
        .map(|user| UserView {
            is_subscribed: followed.contains(&user.id),
            user,
        })
        .collect())
}

// ── SetPassword ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone)]
pub struct SetPasswordInput {
    pub new_password: Option<String>,
    pub current_password: Option<String>,
}

pub struct SetPasswordUseCase<U: UserRepository, P: PasswordHasher> {
    pub users: U,
    pub passwords: P,
}

impl<U: UserRepository, P: PasswordHasher> SetPasswordUseCase<U, P> {
    /// Replaces the password and revokes every token, including the one in use.
    pub async fn execute(&self, user: &User, input: SetPasswordInput) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        check_current_password(
            &self.passwords,
            &mut errors,
            user,
            input.current_password.as_deref(),
        )
        .await?;
        let new_password = check_new_password(&mut errors, "new_password", input.new_password);
        let Some(new_password) = new_password else {
            return Err(ApiError::Validation(errors));
        };
        errors.into_result()?;

        let hash = self.passwords.hash(&new_password).await?;
        self.users.set_password(user.id, &hash).await?;
        tracing::info!(user_id = %user.id, "password changed");
        Ok(())
    }
}

// ── DeleteAccount ────────────────────────────────────────────────────────────

pub struct DeleteAccountUseCase<U: UserRepository, P: PasswordHasher> {
    pub users: U,
    pub passwords: P,
}

impl<U: UserRepository, P: PasswordHasher> DeleteAccountUseCase<U, P> {
    pub async fn execute(&self, user: &User, current_password: Option<&str>) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        check_current_password(&self.passwords, &mut errors, user, current_password).await?;
        errors.into_result()?;

        if !self.users.delete(user.id).await? {
            return Err(ApiError::UserNotFound);
        }
        tracing::info!(user_id = %user.id, "account deleted");
        Ok(())
    }
}

async fn check_current_password<P: PasswordHasher>(
    passwords: &P,
    errors: &mut FieldErrors,
    user: &User,
    current_password: Option<&str>,
) -> Result<(), ApiError> {
    match current_password.filter(|p| !p.is_empty()) {
        None => errors.add("current_password", REQUIRED),
        Some(password) => {
            if !passwords.verify(password, &user.password_hash).await? {
                errors.add("current_password", "invalid password");
            }
        }
    }
    Ok(())
}

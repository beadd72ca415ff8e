use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use foodgram_domain::id::UserId;

use crate::domain::types::{User, UserView};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, AuthUser, MaybeUser};
use crate::state::AppState;
use crate::usecase::user::{
    DeleteAccountUseCase, GetUserUseCase, ListUsersUseCase, RegisterInput, RegisterUserUseCase,
    SetPasswordInput, SetPasswordUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub email: String,
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl From<UserView> for UserResponse {
    fn from(view: UserView) -> Self {
        let UserView {
            user,
            is_subscribed,
        } = view;
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

// ── GET /api/users ───────────────────────────────────────────────────────────

pub async fn list_users(
    viewer: MaybeUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
        subscriptions: state.subscription_repo(),
    };
    let users = usecase.execute(viewer.user()).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── POST /api/users ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct CreatedUserResponse {
    pub email: String,
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for CreatedUserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    let usecase = RegisterUserUseCase {
        users: state.user_repo(),
        passwords: state.passwords(),
    };
    let user = usecase
        .execute(RegisterInput {
            email: body.email,
            username: body.username,
            first_name: body.first_name,
            last_name: body.last_name,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /api/users/me ────────────────────────────────────────────────────────

pub async fn get_me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(UserView {
        user,
        is_subscribed: false,
    }))
}

// ── DELETE /api/users/me ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DeleteMeRequest {
    #[serde(default)]
    pub current_password: Option<String>,
}

pub async fn delete_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<DeleteMeRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteAccountUseCase {
        users: state.user_repo(),
        passwords: state.passwords(),
    };
    usecase
        .execute(&user, body.current_password.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /api/users/set_password ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetPasswordRequest {
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub current_password: Option<String>,
}

pub async fn set_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = SetPasswordUseCase {
        users: state.user_repo(),
        passwords: state.passwords(),
    };
    usecase
        .execute(
            &user,
            SetPasswordInput {
                new_password: body.new_password,
                current_password: body.current_password,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /api/users/{id} ──────────────────────────────────────────────────────

pub async fn get_user(
    viewer: MaybeUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
        subscriptions: state.subscription_repo(),
    };
    let user = usecase.execute(viewer.user(), id).await?;
    Ok(Json(user.into()))
}

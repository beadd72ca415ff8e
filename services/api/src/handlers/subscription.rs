use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use foodgram_domain::id::UserId;

use crate::domain::types::{Subscription, UserView};
use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery, AuthUser};
use crate::handlers::recipe::ShortRecipeResponse;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::subscription::{
    ListSubscriptionsUseCase, SubscribeUseCase, UnsubscribeUseCase, parse_recipes_limit,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<ShortRecipeResponse>,
    pub recipes_count: u64,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(sub: Subscription) -> Self {
        Self {
            user: UserView {
                user: sub.author,
                is_subscribed: true,
            }
            .into(),
            recipes: sub
                .recipes
                .into_iter()
                .map(ShortRecipeResponse::from)
                .collect(),
            recipes_count: sub.recipes_count,
        }
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

/// `recipes_limit` is kept raw: anything unparsable means unlimited.
#[derive(Deserialize, Default)]
pub struct RecipesLimitQuery {
    pub recipes_limit: Option<String>,
}

// ── GET /api/users/subscriptions ─────────────────────────────────────────────

pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RecipesLimitQuery>,
) -> Result<Json<Vec<SubscriptionResponse>>, ApiError> {
    let usecase = ListSubscriptionsUseCase {
        subscriptions: state.subscription_repo(),
        recipes: state.recipe_repo(),
    };
    let subs = usecase
        .execute(&user, parse_recipes_limit(query.recipes_limit.as_deref()))
        .await?;
    Ok(Json(
        subs.into_iter().map(SubscriptionResponse::from).collect(),
    ))
}

// ── POST /api/users/{id}/subscribe ───────────────────────────────────────────

pub async fn subscribe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(author_id): ApiPath<UserId>,
    ApiQuery(query): ApiQuery<RecipesLimitQuery>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), ApiError> {
    let usecase = SubscribeUseCase {
        users: state.user_repo(),
        subscriptions: state.subscription_repo(),
        recipes: state.recipe_repo(),
    };
    let sub = usecase
        .execute(
            &user,
            author_id,
            parse_recipes_limit(query.recipes_limit.as_deref()),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(sub.into())))
}

// ── DELETE /api/users/{id}/subscribe ─────────────────────────────────────────

pub async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(author_id): ApiPath<UserId>,
) -> Result<StatusCode, ApiError> {
    let usecase = UnsubscribeUseCase {
        users: state.user_repo(),
        subscriptions: state.subscription_repo(),
    };
    usecase.execute(&user, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use foodgram_domain::id::UserId;

use crate::domain::repository::{RecipeRepository, SubscriptionRepository, UserRepository};
use crate::domain::types::{LinkOutcome, Subscription, User};
use crate::error::ApiError;

/// `recipes_limit` query value. Missing, unparsable or non-positive means unlimited.
pub fn parse_recipes_limit(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|&n| n > 0)
        .and_then(|n| u64::try_from(n).ok())
}

async fn load_subscription<R: RecipeRepository>(
    recipes: &R,
    author: User,
    recipes_limit: Option<u64>,
) -> Result<Subscription, ApiError> {
    let preview = recipes.by_author(author.id, recipes_limit).await?;
    let recipes_count = recipes.count_by_author(author.id).await?;
    Ok(Subscription {
        author,
        recipes: preview,
        recipes_count,
    })
}

// ── Subscribe ────────────────────────────────────────────────────────────────

pub struct SubscribeUseCase<U: UserRepository, S: SubscriptionRepository, R: RecipeRepository> {
    pub users: U,
    pub subscriptions: S,
    pub recipes: R,
}

impl<U: UserRepository, S: SubscriptionRepository, R: RecipeRepository> SubscribeUseCase<U, S, R> {
    pub async fn execute(
        &self,
        user: &User,
        author_id: UserId,
        recipes_limit: Option<u64>,
    ) -> Result<Subscription, ApiError> {
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        if author.id == user.id {
            return Err(ApiError::SelfSubscription);
        }
        match self.subscriptions.add(user.id, author.id).await? {
            LinkOutcome::Created => {}
            LinkOutcome::Exists => return Err(ApiError::AlreadySubscribed),
            LinkOutcome::TargetGone => return Err(ApiError::UserNotFound),
        }
        tracing::info!(user_id = %user.id, author_id = %author.id, "subscribed");
        load_subscription(&self.recipes, author, recipes_limit).await
    }
}

// ── Unsubscribe ──────────────────────────────────────────────────────────────

pub struct UnsubscribeUseCase<U: UserRepository, S: SubscriptionRepository> {
    pub users: U,
    pub subscriptions: S,
}

impl<U: UserRepository, S: SubscriptionRepository> UnsubscribeUseCase<U, S> {
    pub async fn execute(&self, user: &User, author_id: UserId) -> Result<(), ApiError> {
        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(ApiError::UserNotFound);
        }
        if !self.subscriptions.remove(user.id, author_id).await? {
            return Err(ApiError::NotSubscribed);
        }
        tracing::info!(user_id = %user.id, author_id = %author_id, "unsubscribed");
        Ok(())
    }
}

// ── ListSubscriptions ────────────────────────────────────────────────────────

pub struct ListSubscriptionsUseCase<S: SubscriptionRepository, R: RecipeRepository> {
    pub subscriptions: S,
    pub recipes: R,
}

impl<S: SubscriptionRepository, R: RecipeRepository> ListSubscriptionsUseCase<S, R> {
    /// Followed authors ordered by username, each with a recipe preview.
    pub async fn execute(
        &self,
        user: &User,
        recipes_limit: Option<u64>,
    ) -> Result<Vec<Subscription>, ApiError> {
        let authors = self.subscriptions.authors(user.id).await?;
        let mut out = Vec::with_capacity(authors.len());
        for author in authors {
            out.push(load_subscription(&self.recipes, author, recipes_limit).await?);
        }
        Ok(out)
    }
}

#![allow(async_fn_in_trait)]

use std::collections::HashSet;

use foodgram_domain::id::{IngredientId, RecipeId, TagId, UserId};
use foodgram_domain::shopping_list::CartLine;

use crate::domain::types::{
    Ingredient, LinkOutcome, NewIngredient, NewTag, NewUser, Recipe, RecipeFilter, RecipeList,
    RecipeUpdate, RecipeView, RecipeWrite, Tag, User,
};
use crate::error::ApiError;

/// Repository for accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError>;
    /// All users ordered by id.
    async fn list(&self) -> Result<Vec<User>, ApiError>;

    /// Insert a user. Returns `None` if the email or username was taken concurrently.
    async fn create(&self, user: &NewUser) -> Result<Option<User>, ApiError>;

    /// Replace the password hash and revoke every issued token.
    async fn set_password(&self, id: UserId, password_hash: &str) -> Result<(), ApiError>;

    /// Revoke every issued token.
    async fn bump_token_version(&self, id: UserId) -> Result<(), ApiError>;

    /// Delete the account and everything it owns. Returns `true` if a row was deleted.
    async fn delete(&self, id: UserId) -> Result<bool, ApiError>;
}

/// Read access to the tag catalog.
pub trait TagRepository: Send + Sync {
    /// All tags ordered by name.
    async fn list(&self) -> Result<Vec<Tag>, ApiError>;
    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, ApiError>;
    /// The subset of `ids` that exist.
    async fn existing_ids(&self, ids: &[TagId]) -> Result<HashSet<TagId>, ApiError>;
    /// Insert tags, skipping any that collide with existing ones. Returns the inserted count.
    async fn insert_missing(&self, tags: &[NewTag]) -> Result<u64, ApiError>;
}

/// Read access to the ingredient catalog.
pub trait IngredientRepository: Send + Sync {
    /// Ingredients ordered by name, optionally restricted to a case-insensitive name prefix.
    async fn search(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, ApiError>;
    async fn find_by_id(&self, id: IngredientId) -> Result<Option<Ingredient>, ApiError>;
    /// The subset of `ids` that exist.
    async fn existing_ids(&self, ids: &[IngredientId])
    -> Result<HashSet<IngredientId>, ApiError>;
    /// Insert ingredients, skipping `(name, unit)` pairs already present. Returns the inserted count.
    async fn insert_missing(&self, ingredients: &[NewIngredient]) -> Result<u64, ApiError>;
}

/// Repository for recipes and their tag/ingredient rows.
pub trait RecipeRepository: Send + Sync {
    /// Matching recipes, newest first, decorated for `viewer`.
    async fn list(
        &self,
        filter: &RecipeFilter,
        viewer: Option<UserId>,
    ) -> Result<Vec<RecipeView>, ApiError>;

    async fn view(&self, id: RecipeId, viewer: Option<UserId>)
    -> Result<Option<RecipeView>, ApiError>;

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, ApiError>;

    /// Insert the recipe with its tag and ingredient rows in one transaction.
    async fn create(&self, author: UserId, recipe: &RecipeWrite) -> Result<RecipeId, ApiError>;

    /// Apply the scalar changes and replace tag and ingredient rows in one transaction.
    async fn update(&self, id: RecipeId, update: &RecipeUpdate) -> Result<(), ApiError>;

    /// Returns `true` if a row was deleted. Join rows, favorites and cart entries go with it.
    async fn delete(&self, id: RecipeId) -> Result<bool, ApiError>;

    /// Author's recipes, newest first, at most `limit` of them.
    async fn by_author(&self, author: UserId, limit: Option<u64>)
    -> Result<Vec<Recipe>, ApiError>;

    async fn count_by_author(&self, author: UserId) -> Result<u64, ApiError>;

    /// One line per ingredient row of every recipe in the user's cart.
    async fn cart_lines(&self, user: UserId) -> Result<Vec<CartLine>, ApiError>;
}

/// Favorites and shopping cart membership.
pub trait MembershipRepository: Send + Sync {
    async fn add(
        &self,
        list: RecipeList,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<LinkOutcome, ApiError>;

    /// Returns `false` if the recipe was not in the list.
    async fn remove(
        &self,
        list: RecipeList,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, ApiError>;
}

/// Follow relationships between users.
pub trait SubscriptionRepository: Send + Sync {
    async fn add(&self, user: UserId, author: UserId) -> Result<LinkOutcome, ApiError>;

    /// Returns `false` if there was no subscription.
    async fn remove(&self, user: UserId, author: UserId) -> Result<bool, ApiError>;

    /// The subset of `authors` that `user` follows.
    async fn followed_among(
        &self,
        user: UserId,
        authors: &[UserId],
    ) -> Result<HashSet<UserId>, ApiError>;

    /// Authors `user` follows, ordered by username.
    async fn authors(&self, user: UserId) -> Result<Vec<User>, ApiError>;
}

/// Password hashing.
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, ApiError>;

    /// `Ok(false)` only for a mismatch; an unreadable hash is an error.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, ApiError>;
}

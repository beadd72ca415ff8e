use std::fmt;

use chrono::{DateTime, Utc};

use foodgram_domain::id::{IngredientId, RecipeId, TagId, UserId};
use foodgram_domain::user::UserRole;

/// Registered account as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub token_version: i32,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Authors may change their own recipes; admins may change any.
    pub fn can_modify(&self, recipe: &Recipe) -> bool {
        self.role == UserRole::Admin || recipe.author_id == self.id
    }
}

/// Validated registration data with the password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// A user as seen by a viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub user: User,
    /// False for anonymous viewers and when viewing oneself.
    pub is_subscribed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

/// Tag row for catalog seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub color: String,
    pub slug: String,
}

/// Ingredient row for catalog seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

/// Recipe row without its tags and ingredients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub author_id: UserId,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    pub ingredient: Ingredient,
    pub amount: i32,
}

/// Fully assembled recipe as seen by a viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub author: UserView,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Ingredient reference inside a recipe write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub id: IngredientId,
    pub amount: i32,
}

/// Validated recipe contents for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeWrite {
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub tags: Vec<TagId>,
    pub ingredients: Vec<IngredientAmount>,
}

/// Validated partial update. Tags and ingredients are always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeUpdate {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub tags: Vec<TagId>,
    pub ingredients: Vec<IngredientAmount>,
}

/// Recipe list filter. All conditions are conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Tag slugs; a recipe matches if it carries any of them.
    pub tags: Vec<String>,
    pub author: Option<UserId>,
    /// Restrict to the viewer's favorites. Ignored for anonymous viewers.
    pub is_favorited: bool,
    /// Restrict to the viewer's cart. Ignored for anonymous viewers.
    pub is_in_shopping_cart: bool,
}

/// Per-user recipe collections that share add/remove semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeList {
    Favorites,
    ShoppingCart,
}

impl fmt::Display for RecipeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Favorites => f.write_str("favorites"),
            Self::ShoppingCart => f.write_str("shopping cart"),
        }
    }
}

/// Outcome of inserting a unique `(user, target)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Created,
    /// The pair was already stored.
    Exists,
    /// The referenced recipe or author was deleted before the insert landed.
    TargetGone,
}

/// A followed author with a preview of their newest recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub author: User,
    pub recipes: Vec<Recipe>,
    pub recipes_count: u64,
}

use foodgram_domain::id::RecipeId;

use crate::domain::repository::{MembershipRepository, RecipeRepository};
use crate::domain::types::{LinkOutcome, Recipe, RecipeList, User};
use crate::error::ApiError;

// ── AddToList ────────────────────────────────────────────────────────────────

pub struct AddToListUseCase<R: RecipeRepository, M: MembershipRepository> {
    pub recipes: R,
    pub lists: M,
}

impl<R: RecipeRepository, M: MembershipRepository> AddToListUseCase<R, M> {
    /// Returns the recipe so the caller can answer with its short form.
    pub async fn execute(
        &self,
        user: &User,
        list: RecipeList,
        id: RecipeId,
    ) -> Result<Recipe, ApiError> {
        let recipe = self
            .recipes
            .find_by_id(id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        match self.lists.add(list, user.id, id).await? {
            LinkOutcome::Created => {}
            LinkOutcome::Exists => return Err(ApiError::AlreadyListed(list)),
            // Deleted between the lookup above and the insert.
            LinkOutcome::TargetGone => return Err(ApiError::RecipeNotFound),
        }
        tracing::debug!(user_id = %user.id, recipe_id = %id, %list, "recipe listed");
        Ok(recipe)
    }
}

// ── RemoveFromList ───────────────────────────────────────────────────────────

pub struct RemoveFromListUseCase<R: RecipeRepository, M: MembershipRepository> {
    pub recipes: R,
    pub lists: M,
}

impl<R: RecipeRepository, M: MembershipRepository> RemoveFromListUseCase<R, M> {
    pub async fn execute(&self, user: &User, list: RecipeList, id: RecipeId) -> Result<(), ApiError> {
        if self.recipes.find_by_id(id).await?.is_none() {
            return Err(ApiError::RecipeNotFound);
        }
        if !self.lists.remove(list, user.id, id).await? {
            return Err(ApiError::NotListed(list));
        }
        tracing::debug!(user_id = %user.id, recipe_id = %id, %list, "recipe unlisted");
        Ok(())
    }
}

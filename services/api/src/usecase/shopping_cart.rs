use foodgram_domain::shopping_list::{aggregate, render};

use crate::domain::repository::RecipeRepository;
use crate::domain::types::User;
use crate::error::ApiError;

pub struct DownloadShoppingListUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> DownloadShoppingListUseCase<R> {
    /// Plain-text list of ingredient totals over every recipe in the user's cart.
    pub async fn execute(&self, user: &User) -> Result<String, ApiError> {
        let lines = self.recipes.cart_lines(user.id).await?;
        let items = aggregate(lines);
        tracing::debug!(user_id = %user.id, items = items.len(), "shopping list rendered");
        Ok(render(&items))
    }
}

use foodgram_domain::id::{IngredientId, TagId};
use foodgram_domain::tag::{
    INGREDIENT_NAME_MAX_LEN, MEASUREMENT_UNIT_MAX_LEN, TAG_NAME_MAX_LEN, is_hex_color, is_slug,
};

use crate::domain::repository::{IngredientRepository, TagRepository};
use crate::domain::types::{Ingredient, NewIngredient, NewTag, Tag};
use crate::error::{ApiError, FieldErrors};

// ── Tags ─────────────────────────────────────────────────────────────────────

pub struct ListTagsUseCase<T: TagRepository> {
    pub tags: T,
}

impl<T: TagRepository> ListTagsUseCase<T> {
    pub async fn execute(&self) -> Result<Vec<Tag>, ApiError> {
        self.tags.list().await
    }
}

pub struct GetTagUseCase<T: TagRepository> {
    pub tags: T,
}

impl<T: TagRepository> GetTagUseCase<T> {
    pub async fn execute(&self, id: TagId) -> Result<Tag, ApiError> {
        self.tags
            .find_by_id(id)
            .await?
            .ok_or(ApiError::TagNotFound)
    }
}

// ── Ingredients ──────────────────────────────────────────────────────────────

pub struct SearchIngredientsUseCase<I: IngredientRepository> {
    pub ingredients: I,
}

impl<I: IngredientRepository> SearchIngredientsUseCase<I> {
    /// Case-insensitive name prefix match; the whole catalog when `name` is absent or blank.
    pub async fn execute(&self, name: Option<&str>) -> Result<Vec<Ingredient>, ApiError> {
        let prefix = name.map(str::trim).filter(|n| !n.is_empty());
        self.ingredients.search(prefix).await
    }
}

pub struct GetIngredientUseCase<I: IngredientRepository> {
    pub ingredients: I,
}

impl<I: IngredientRepository> GetIngredientUseCase<I> {
    pub async fn execute(&self, id: IngredientId) -> Result<Ingredient, ApiError> {
        self.ingredients
            .find_by_id(id)
            .await?
            .ok_or(ApiError::IngredientNotFound)
    }
}

// ── Seeding ──────────────────────────────────────────────────────────────────

pub struct SeedTagsUseCase<T: TagRepository> {
    pub tags: T,
}

impl<T: TagRepository> SeedTagsUseCase<T> {
    /// Validate every row, then insert those not already present.
    /// Returns the number inserted. Nothing is written if any row is invalid.
    pub async fn execute(&self, tags: Vec<NewTag>) -> Result<u64, ApiError> {
        let mut errors = FieldErrors::new();
        for (i, tag) in tags.iter().enumerate() {
            let field = format!("tags[{i}]");
            if tag.name.trim().is_empty() || tag.name.chars().count() > TAG_NAME_MAX_LEN {
                errors.add(&field, format!("name must be 1 to {TAG_NAME_MAX_LEN} characters"));
            }
            if !is_hex_color(&tag.color) {
                errors.add(&field, format!("color {:?} is not #RRGGBB", tag.color));
            }
            if !is_slug(&tag.slug) {
                errors.add(&field, format!("slug {:?} is invalid", tag.slug));
            }
        }
        errors.into_result()?;
        let inserted = self.tags.insert_missing(&tags).await?;
        tracing::info!(total = tags.len(), inserted, "tags seeded");
        Ok(inserted)
    }
}

pub struct SeedIngredientsUseCase<I: IngredientRepository> {
    pub ingredients: I,
}

impl<I: IngredientRepository> SeedIngredientsUseCase<I> {
    /// Validate every row, then insert the `(name, unit)` pairs not already present.
    pub async fn execute(&self, ingredients: Vec<NewIngredient>) -> Result<u64, ApiError> {
        let mut errors = FieldErrors::new();
        for (i, ingredient) in ingredients.iter().enumerate() {
            let field = format!("ingredients[{i}]");
            let name_len = ingredient.name.chars().count();
            if ingredient.name.trim().is_empty() || name_len > INGREDIENT_NAME_MAX_LEN {
                errors.add(
                    &field,
                    format!("name must be 1 to {INGREDIENT_NAME_MAX_LEN} characters"),
                );
            }
            let unit_len = ingredient.measurement_unit.chars().count();
            if ingredient.measurement_unit.trim().is_empty() || unit_len > MEASUREMENT_UNIT_MAX_LEN
            {
                errors.add(
                    &field,
                    format!("measurement_unit must be 1 to {MEASUREMENT_UNIT_MAX_LEN} characters"),
                );
            }
        }
        errors.into_result()?;
        let inserted = self.ingredients.insert_missing(&ingredients).await?;
        tracing::info!(total = ingredients.len(), inserted, "ingredients seeded");
        Ok(inserted)
    }
}

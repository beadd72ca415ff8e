use std::collections::HashSet;

use foodgram_domain::id::{IngredientId, RecipeId, TagId};
use foodgram_domain::recipe::{
    AMOUNT_MAX, AMOUNT_MIN, COOKING_TIME_MAX, COOKING_TIME_MIN, RECIPE_NAME_MAX_LEN,
    amount_in_range, cooking_time_in_range, duplicates,
};

use crate::domain::repository::{IngredientRepository, RecipeRepository, TagRepository};
use crate::domain::types::{
    IngredientAmount, RecipeFilter, RecipeUpdate, RecipeView, RecipeWrite, User,
};
use crate::error::{ApiError, FieldErrors};
use crate::usecase::fields::{REQUIRED, max_chars, optional_text};

/// Raw recipe payload. Every field is optional so absence can be reported per field.
#[derive(Debug, Default, Clone)]
pub struct RecipeInput {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i64>,
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<IngredientInput>>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IngredientInput {
    pub id: Option<i64>,
    pub amount: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Create,
    Update,
}

#[derive(Debug)]
struct Validated {
    name: Option<String>,
    text: Option<String>,
    image: Option<String>,
    cooking_time: Option<i32>,
    tags: Vec<TagId>,
    ingredients: Vec<IngredientAmount>,
}

/// Check a recipe payload against field rules and the catalog.
///
/// Every problem is collected before returning; nothing is written here.
async fn validate<T: TagRepository, I: IngredientRepository>(
    input: RecipeInput,
    mode: Mode,
    tags: &T,
    ingredients: &I,
) -> Result<Validated, ApiError> {
    let required = mode == Mode::Create;
    let mut errors = FieldErrors::new();

    let name = optional_text(&mut errors, "name", input.name, required);
    max_chars(&mut errors, "name", name.as_deref(), RECIPE_NAME_MAX_LEN);
    let text = optional_text(&mut errors, "text", input.text, required);
    let image = optional_text(&mut errors, "image", input.image, required);

    let cooking_time = match input.cooking_time {
        None => {
            if required {
                errors.add("cooking_time", REQUIRED);
            }
            None
        }
        Some(minutes) if cooking_time_in_range(minutes) => i32::try_from(minutes).ok(),
        Some(_) => {
            errors.add(
                "cooking_time",
                format!("must be between {COOKING_TIME_MIN} and {COOKING_TIME_MAX}"),
            );
            None
        }
    };

    let tag_ids = check_tags(&mut errors, input.tags, tags).await?;
    let amounts = check_ingredients(&mut errors, input.ingredients, ingredients).await?;

    errors.into_result()?;
    Ok(Validated {
        name,
        text,
        image,
        cooking_time,
        tags: tag_ids,
        ingredients: amounts,
    })
}

async fn check_tags<T: TagRepository>(
    errors: &mut FieldErrors,
    input: Option<Vec<i64>>,
    tags: &T,
) -> Result<Vec<TagId>, ApiError> {
    let Some(raw) = input else {
        errors.add("tags", REQUIRED);
        return Ok(Vec::new());
    };
    if raw.is_empty() {
        errors.add("tags", "at least one tag is required");
        return Ok(Vec::new());
    }
    for id in duplicates(raw.iter().copied()) {
        errors.add("tags", format!("duplicate tag: {id}"));
    }

    let mut seen = HashSet::new();
    let candidates: Vec<TagId> = raw
        .iter()
        .filter_map(|&id| i32::try_from(id).ok().map(TagId))
        .filter(|id| seen.insert(*id))
        .collect();
    let existing = tags.existing_ids(&candidates).await?;
    let mut reported = HashSet::new();
    let missing: Vec<String> = raw
        .iter()
        .filter(|&&id| !i32::try_from(id).is_ok_and(|id| existing.contains(&TagId(id))))
        .filter(|&&id| reported.insert(id))
        .map(i64::to_string)
        .collect();
    if !missing.is_empty() {
        errors.add("tags", format!("tags do not exist: {}", missing.join(", ")));
    }
    Ok(candidates)
}

async fn check_ingredients<I: IngredientRepository>(
    errors: &mut FieldErrors,
    input: Option<Vec<IngredientInput>>,
    ingredients: &I,
) -> Result<Vec<IngredientAmount>, ApiError> {
    let Some(raw) = input else {
        errors.add("ingredients", REQUIRED);
        return Ok(Vec::new());
    };
    if raw.is_empty() {
        errors.add("ingredients", "at least one ingredient is required");
        return Ok(Vec::new());
    }

    let mut bad_amount = false;
    let mut items = Vec::with_capacity(raw.len());
    for item in &raw {
        let Some(id) = item.id else {
            errors.add("ingredients", "ingredient id is required");
            continue;
        };
        match item.amount {
            Some(amount) if amount_in_range(amount) => items.push((id, amount)),
            _ => bad_amount = true,
        }
    }
    if bad_amount {
        errors.add(
            "ingredients",
            format!("amount must be between {AMOUNT_MIN} and {AMOUNT_MAX}"),
        );
    }
    for id in duplicates(raw.iter().filter_map(|item| item.id)) {
        errors.add("ingredients", format!("duplicate ingredient: {id}"));
    }

    let mut seen = HashSet::new();
    let candidates: Vec<IngredientId> = raw
        .iter()
        .filter_map(|item| item.id)
        .filter_map(|id| i32::try_from(id).ok().map(IngredientId))
        .filter(|id| seen.insert(*id))
        .collect();
    let existing = ingredients.existing_ids(&candidates).await?;
    let mut reported = HashSet::new();
    let missing: Vec<String> = raw
        .iter()
        .filter_map(|item| item.id)
        .filter(|&id| !i32::try_from(id).is_ok_and(|id| existing.contains(&IngredientId(id))))
        .filter(|id| reported.insert(*id))
        .map(|id| id.to_string())
        .collect();
    if !missing.is_empty() {
        errors.add(
            "ingredients",
            format!("ingredients do not exist: {}", missing.join(", ")),
        );
    }

    Ok(items
        .into_iter()
        .filter_map(|(id, amount)| {
            Some(IngredientAmount {
                id: IngredientId(i32::try_from(id).ok()?),
                amount: i32::try_from(amount).ok()?,
            })
        })
        .collect())
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeUseCase<R: RecipeRepository, T: TagRepository, I: IngredientRepository> {
    pub recipes: R,
    pub tags: T,
    pub ingredients: I,
}

impl<R: RecipeRepository, T: TagRepository, I: IngredientRepository> CreateRecipeUseCase<R, T, I> {
    pub async fn execute(&self, author: &User, input: RecipeInput) -> Result<RecipeView, ApiError> {
        let valid = validate(input, Mode::Create, &self.tags, &self.ingredients).await?;
        let (Some(name), Some(text), Some(image), Some(cooking_time)) =
            (valid.name, valid.text, valid.image, valid.cooking_time)
        else {
            return Err(anyhow::anyhow!("validated recipe is missing a required field").into());
        };
        let write = RecipeWrite {
            name,
            text,
            image,
            cooking_time,
            tags: valid.tags,
            ingredients: valid.ingredients,
        };
        let id = self.recipes.create(author.id, &write).await?;
        tracing::info!(recipe_id = %id, author_id = %author.id, "recipe created");
        self.recipes
            .view(id, Some(author.id))
            .await?
            .ok_or(ApiError::RecipeNotFound)
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

pub struct UpdateRecipeUseCase<R: RecipeRepository, T: TagRepository, I: IngredientRepository> {
    pub recipes: R,
    pub tags: T,
    pub ingredients: I,
}

impl<R: RecipeRepository, T: TagRepository, I: IngredientRepository> UpdateRecipeUseCase<R, T, I> {
    /// Partial update of scalar fields; `tags` and `ingredients` are required and replace the old sets.
    pub async fn execute(
        &self,
        user: &User,
        id: RecipeId,
        input: RecipeInput,
    ) -> Result<RecipeView, ApiError> {
        let recipe = self
            .recipes
            .find_by_id(id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        if !user.can_modify(&recipe) {
            return Err(ApiError::Forbidden);
        }
        let valid = validate(input, Mode::Update, &self.tags, &self.ingredients).await?;
        let update = RecipeUpdate {
            name: valid.name,
            text: valid.text,
            image: valid.image,
            cooking_time: valid.cooking_time,
            tags: valid.tags,
            ingredients: valid.ingredients,
        };
        self.recipes.update(id, &update).await?;
        tracing::info!(recipe_id = %id, user_id = %user.id, "recipe updated");
        self.recipes
            .view(id, Some(user.id))
            .await?
            .ok_or(ApiError::RecipeNotFound)
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> DeleteRecipeUseCase<R> {
    pub async fn execute(&self, user: &User, id: RecipeId) -> Result<(), ApiError> {
        let recipe = self
            .recipes
            .find_by_id(id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        if !user.can_modify(&recipe) {
            return Err(ApiError::Forbidden);
        }
        if !self.recipes.delete(id).await? {
            return Err(ApiError::RecipeNotFound);
        }
        tracing::info!(recipe_id = %id, user_id = %user.id, "recipe deleted");
        Ok(())
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> GetRecipeUseCase<R> {
    pub async fn execute(&self, viewer: Option<&User>, id: RecipeId) -> Result<RecipeView, ApiError> {
        self.recipes
            .view(id, viewer.map(|v| v.id))
            .await?
            .ok_or(ApiError::RecipeNotFound)
    }
}

// ── ListRecipes ──────────────────────────────────────────────────────────────

pub struct ListRecipesUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> ListRecipesUseCase<R> {
    /// Newest first. Favorite and cart filters only apply to an authenticated viewer.
    pub async fn execute(
        &self,
        viewer: Option<&User>,
        mut filter: RecipeFilter,
    ) -> Result<Vec<RecipeView>, ApiError> {
        if viewer.is_none() {
            filter.is_favorited = false;
            filter.is_in_shopping_cart = false;
        }
        self.recipes.list(&filter, viewer.map(|v| v.id)).await
    }
}

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use foodgram_domain::id::{IngredientId, TagId};

use crate::domain::types::{Ingredient, Tag};
use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery};
use crate::state::AppState;
use crate::usecase::catalog::{
    GetIngredientUseCase, GetTagUseCase, ListTagsUseCase, SearchIngredientsUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TagResponse {
    pub id: TagId,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

#[derive(Serialize)]
pub struct IngredientResponse {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

// ── GET /api/tags ────────────────────────────────────────────────────────────

pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let usecase = ListTagsUseCase {
        tags: state.tag_repo(),
    };
    let tags = usecase.execute().await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

// ── GET /api/tags/{id} ───────────────────────────────────────────────────────

pub async fn get_tag(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TagId>,
) -> Result<Json<TagResponse>, ApiError> {
    let usecase = GetTagUseCase {
        tags: state.tag_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── GET /api/ingredients ─────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct IngredientQuery {
    pub name: Option<String>,
}

pub async fn list_ingredients(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IngredientQuery>,
) -> Result<Json<Vec<IngredientResponse>>, ApiError> {
    let usecase = SearchIngredientsUseCase {
        ingredients: state.ingredient_repo(),
    };
    let ingredients = usecase.execute(query.name.as_deref()).await?;
    Ok(Json(
        ingredients
            .into_iter()
            .map(IngredientResponse::from)
            .collect(),
    ))
}

// ── GET /api/ingredients/{id} ────────────────────────────────────────────────

pub async fn get_ingredient(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<IngredientId>,
) -> Result<Json<IngredientResponse>, ApiError> {
    let usecase = GetIngredientUseCase {
        ingredients: state.ingredient_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use foodgram_domain::id::{IngredientId, RecipeId, UserId};
use foodgram_domain::shopping_list::FILE_NAME;

use crate::domain::types::{Recipe, RecipeFilter, RecipeList, RecipeView, User};
use crate::error::{ApiError, FieldErrors};
use crate::extract::{ApiJson, ApiPath, ApiQuery, AuthUser, MaybeUser};
use crate::handlers::catalog::TagResponse;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::membership::{AddToListUseCase, RemoveFromListUseCase};
use crate::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, IngredientInput,
    ListRecipesUseCase, RecipeInput, UpdateRecipeUseCase,
};
use crate::usecase::shopping_cart::DownloadShoppingListUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RecipeIngredientResponse {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Serialize)]
pub struct RecipeResponse {
    pub id: RecipeId,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

impl From<RecipeView> for RecipeResponse {
    fn from(view: RecipeView) -> Self {
        Self {
            id: view.recipe.id,
            tags: view.tags.into_iter().map(TagResponse::from).collect(),
            author: view.author.into(),
            ingredients: view
                .ingredients
                .into_iter()
                .map(|item| RecipeIngredientResponse {
                    id: item.ingredient.id,
                    name: item.ingredient.name,
                    measurement_unit: item.ingredient.measurement_unit,
                    amount: item.amount,
                })
                .collect(),
            is_favorited: view.is_favorited,
            is_in_shopping_cart: view.is_in_shopping_cart,
            name: view.recipe.name,
            image: view.recipe.image,
            text: view.recipe.text,
            cooking_time: view.recipe.cooking_time,
        }
    }
}

/// Compact form used by favorites, the cart and subscription previews.
#[derive(Serialize)]
pub struct ShortRecipeResponse {
    pub id: RecipeId,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<Recipe> for ShortRecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

/// Integer field that also takes its decimal string form, as HTML forms send it.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum IntField {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl IntField {
    fn parse(self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(n),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Other(_) => None,
        }
    }
}

const NOT_AN_INTEGER: &str = "a valid integer is required";

/// Parses `value`, recording at most one error per field.
fn parse_int(errors: &mut FieldErrors, field: &str, value: Option<IntField>) -> Option<i64> {
    let parsed = value?.parse();
    if parsed.is_none() && errors.get(field).is_none() {
        errors.add(field, NOT_AN_INTEGER);
    }
    parsed
}

#[derive(Deserialize)]
pub struct IngredientAmountRequest {
    #[serde(default)]
    pub id: Option<IntField>,
    #[serde(default)]
    pub amount: Option<IntField>,
}

#[derive(Deserialize)]
pub struct RecipeRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub cooking_time: Option<IntField>,
    #[serde(default)]
    pub tags: Option<Vec<IntField>>,
    #[serde(default)]
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
}

impl TryFrom<RecipeRequest> for RecipeInput {
    type Error = ApiError;

    fn try_from(body: RecipeRequest) -> Result<Self, ApiError> {
        let mut errors = FieldErrors::new();
        let cooking_time = parse_int(&mut errors, "cooking_time", body.cooking_time);
        let tags = body.tags.map(|items| {
            items
                .into_iter()
                .filter_map(|tag| parse_int(&mut errors, "tags", Some(tag)))
                .collect()
        });
        let ingredients = body.ingredients.map(|items| {
            items
                .into_iter()
                .map(|item| IngredientInput {
                    id: parse_int(&mut errors, "ingredients", item.id),
                    amount: parse_int(&mut errors, "ingredients", item.amount),
                })
                .collect()
        });
        errors.into_result()?;

        Ok(Self {
            name: body.name,
            text: body.text,
            image: body.image,
            cooking_time,
            tags,
            ingredients,
        })
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct RecipeListQuery {
    /// Tag slugs, repeatable.
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<UserId>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

fn is_truthy(flag: Option<&str>) -> bool {
    matches!(
        flag.map(str::trim),
        Some(v) if v == "1" || v.eq_ignore_ascii_case("true")
    )
}

impl From<RecipeListQuery> for RecipeFilter {
    fn from(query: RecipeListQuery) -> Self {
        Self {
            is_favorited: is_truthy(query.is_favorited.as_deref()),
            is_in_shopping_cart: is_truthy(query.is_in_shopping_cart.as_deref()),
            tags: query.tags,
            author: query.author,
        }
    }
}

// ── GET /api/recipes ─────────────────────────────────────────────────────────

pub async fn list_recipes(
    viewer: MaybeUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RecipeListQuery>,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let usecase = ListRecipesUseCase {
        recipes: state.recipe_repo(),
    };
    let recipes = usecase.execute(viewer.user(), query.into()).await?;
    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}

// ── POST /api/recipes ────────────────────────────────────────────────────────

pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let usecase = CreateRecipeUseCase {
        recipes: state.recipe_repo(),
        tags: state.tag_repo(),
        ingredients: state.ingredient_repo(),
    };
    let recipe = usecase.execute(&user, body.try_into()?).await?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

// ── GET /api/recipes/{id} ────────────────────────────────────────────────────

pub async fn get_recipe(
    viewer: MaybeUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<RecipeId>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let usecase = GetRecipeUseCase {
        recipes: state.recipe_repo(),
    };
    Ok(Json(usecase.execute(viewer.user(), id).await?.into()))
}

// ── PATCH /api/recipes/{id} ──────────────────────────────────────────────────

pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<RecipeId>,
    ApiJson(body): ApiJson<RecipeRequest>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let usecase = UpdateRecipeUseCase {
        recipes: state.recipe_repo(),
        tags: state.tag_repo(),
        ingredients: state.ingredient_repo(),
    };
    Ok(Json(
        usecase
            .execute(&user, id, body.try_into()?)
            .await?
            .into(),
    ))
}

// ── DELETE /api/recipes/{id} ─────────────────────────────────────────────────

pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<RecipeId>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteRecipeUseCase {
        recipes: state.recipe_repo(),
    };
    usecase.execute(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST/DELETE /api/recipes/{id}/favorite, /api/recipes/{id}/shopping_cart ──

async fn add_to_list(
    state: &AppState,
    user: &User,
    list: RecipeList,
    id: RecipeId,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), ApiError> {
    let usecase = AddToListUseCase {
        recipes: state.recipe_repo(),
        lists: state.membership_repo(),
    };
    let recipe = usecase.execute(user, list, id).await?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

async fn remove_from_list(
    state: &AppState,
    user: &User,
    list: RecipeList,
    id: RecipeId,
) -> Result<StatusCode, ApiError> {
    let usecase = RemoveFromListUseCase {
        recipes: state.recipe_repo(),
        lists: state.membership_repo(),
    };
    usecase.execute(user, list, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_favorite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<RecipeId>,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), ApiError> {
    add_to_list(&state, &user, RecipeList::Favorites, id).await
}

pub async fn remove_favorite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<RecipeId>,
) -> Result<StatusCode, ApiError> {
    remove_from_list(&state, &user, RecipeList::Favorites, id).await
}

pub async fn add_to_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<RecipeId>,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), ApiError> {
    add_to_list(&state, &user, RecipeList::ShoppingCart, id).await
}

pub async fn remove_from_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<RecipeId>,
) -> Result<StatusCode, ApiError> {
    remove_from_list(&state, &user, RecipeList::ShoppingCart, id).await
}

// ── GET /api/recipes/download_shopping_cart ──────────────────────────────────

pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = DownloadShoppingListUseCase {
        recipes: state.recipe_repo(),
    };
    let text = usecase.execute(&user).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{FILE_NAME}\""),
            ),
        ],
        text,
    ))
}

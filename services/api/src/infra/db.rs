use std::collections::{HashMap, HashSet};

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, Func, LikeExpr, OnConflict, Query},
};

use foodgram_core::sea_ext::{
    LIKE_ESCAPE, is_foreign_key_violation, is_unique_violation, prefix_pattern,
};
use foodgram_domain::id::{IngredientId, RecipeId, TagId, UserId};
use foodgram_domain::shopping_list::CartLine;
use foodgram_domain::user::UserRole;
use foodgram_schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_carts,
    subscriptions, tags, users,
};

use crate::domain::repository::{
    IngredientRepository, MembershipRepository, RecipeRepository, SubscriptionRepository,
    TagRepository, UserRepository,
};
use crate::domain::types::{
    Ingredient, IngredientAmount, LinkOutcome, NewIngredient, NewTag, NewUser, Recipe,
    RecipeFilter, RecipeIngredient, RecipeList, RecipeUpdate, RecipeView, RecipeWrite, Tag, User, UserView,
};
use crate::error::ApiError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn list(&self) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn create(&self, user: &NewUser) -> Result<Option<User>, ApiError> {
        let result = users::ActiveModel {
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(UserRole::User.as_i16()),
            token_version: Set(0),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(model) => Ok(Some(user_from_model(model))),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn set_password(&self, id: UserId, password_hash: &str) -> Result<(), ApiError> {
        users::Entity::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(
                users::Column::TokenVersion,
                Expr::col(users::Column::TokenVersion).add(1),
            )
            .filter(users::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("set password")?;
        Ok(())
    }

    async fn bump_token_version(&self, id: UserId) -> Result<(), ApiError> {
        users::Entity::update_many()
            .col_expr(
                users::Column::TokenVersion,
                Expr::col(users::Column::TokenVersion).add(1),
            )
            .filter(users::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("bump token version")?;
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<bool, ApiError> {
        let result = users::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: UserId(model.id),
        email: model.email,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        password_hash: model.password_hash,
        role: UserRole::from_i16(model.role).unwrap_or(UserRole::User),
        token_version: model.token_version,
        created_at: model.created_at,
    }
}

// ── Tag repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTagRepository {
    pub db: DatabaseConnection,
}

impl TagRepository for DbTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, ApiError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, ApiError> {
        let model = tags::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find tag by id")?;
        Ok(model.map(tag_from_model))
    }

    async fn existing_ids(&self, ids: &[TagId]) -> Result<HashSet<TagId>, ApiError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<i32> = tags::Entity::find()
            .select_only()
            .column(tags::Column::Id)
            .filter(tags::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .into_tuple()
            .all(&self.db)
            .await
            .context("check tag ids")?;
        Ok(found.into_iter().map(TagId).collect())
    }

    async fn insert_missing(&self, new_tags: &[NewTag]) -> Result<u64, ApiError> {
        if new_tags.is_empty() {
            return Ok(0);
        }
        let rows = new_tags.iter().map(|tag| tags::ActiveModel {
            name: Set(tag.name.clone()),
            color: Set(tag.color.clone()),
            slug: Set(tag.slug.clone()),
            ..Default::default()
        });
        let inserted = tags::Entity::insert_many(rows)
            .on_conflict(OnConflict::new().do_nothing().to_owned())
            .exec_without_returning(&self.db)
            .await
            .context("insert tags")?;
        Ok(inserted)
    }
}

fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: TagId(model.id),
        name: model.name,
        color: model.color,
        slug: model.slug,
    }
}

// ── Ingredient repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIngredientRepository {
    pub db: DatabaseConnection,
}

impl IngredientRepository for DbIngredientRepository {
    async fn search(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, ApiError> {
        let mut query = ingredients::Entity::find();
        if let Some(prefix) = name_prefix.filter(|p| !p.is_empty()) {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(ingredients::Column::Name)))
                    .like(LikeExpr::new(prefix_pattern(prefix)).escape(LIKE_ESCAPE)),
            );
        }
        let models = query
            .order_by_asc(ingredients::Column::Name)
            .order_by_asc(ingredients::Column::Id)
            .all(&self.db)
            .await
            .context("search ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn find_by_id(&self, id: IngredientId) -> Result<Option<Ingredient>, ApiError> {
        let model = ingredients::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find ingredient by id")?;
        Ok(model.map(ingredient_from_model))
    }

    async fn existing_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<HashSet<IngredientId>, ApiError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<i32> = ingredients::Entity::find()
            .select_only()
            .column(ingredients::Column::Id)
            .filter(ingredients::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .into_tuple()
            .all(&self.db)
            .await
            .context("check ingredient ids")?;
        Ok(found.into_iter().map(IngredientId).collect())
    }

    async fn insert_missing(&self, new_ingredients: &[NewIngredient]) -> Result<u64, ApiError> {
        if new_ingredients.is_empty() {
            return Ok(0);
        }
        let rows = new_ingredients
            .iter()
            .map(|ingredient| ingredients::ActiveModel {
                name: Set(ingredient.name.clone()),
                measurement_unit: Set(ingredient.measurement_unit.clone()),
                ..Default::default()
            });
        let inserted = ingredients::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    ingredients::Column::Name,
                    ingredients::Column::MeasurementUnit,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("insert ingredients")?;
        Ok(inserted)
    }
}

fn ingredient_from_model(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: IngredientId(model.id),
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

impl DbRecipeRepository {
    /// Decorate recipe rows with tags, ingredients, author and viewer flags.
    ///
    /// A fixed number of queries regardless of how many recipes are passed.
    async fn assemble(
        &self,
        models: Vec<recipes::Model>,
        viewer: Option<UserId>,
    ) -> Result<Vec<RecipeView>, ApiError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut author_ids: Vec<i32> = models.iter().map(|m| m.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let tag_rows = recipe_tags::Entity::find()
            .filter(recipe_tags::Column::RecipeId.is_in(ids.clone()))
            .find_also_related(tags::Entity)
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await
            .context("load recipe tags")?;
        let mut tags_by_recipe: HashMap<i32, Vec<Tag>> = HashMap::new();
        for (row, tag) in tag_rows {
            if let Some(tag) = tag {
                tags_by_recipe
                    .entry(row.recipe_id)
                    .or_default()
                    .push(tag_from_model(tag));
            }
        }

        let ingredient_rows = recipe_ingredients::Entity::find()
            .filter(recipe_ingredients::Column::RecipeId.is_in(ids.clone()))
            .find_also_related(ingredients::Entity)
            .order_by_asc(ingredients::Column::Name)
            .all(&self.db)
            .await
            .context("load recipe ingredients")?;
        let mut ingredients_by_recipe: HashMap<i32, Vec<RecipeIngredient>> = HashMap::new();
        for (row, ingredient) in ingredient_rows {
            if let Some(ingredient) = ingredient {
                ingredients_by_recipe
                    .entry(row.recipe_id)
                    .or_default()
                    .push(RecipeIngredient {
                        ingredient: ingredient_from_model(ingredient),
                        amount: row.amount,
                    });
            }
        }

        let authors: HashMap<i32, User> = users::Entity::find()
            .filter(users::Column::Id.is_in(author_ids.clone()))
            .all(&self.db)
            .await
            .context("load recipe authors")?
            .into_iter()
            .map(|m| (m.id, user_from_model(m)))
            .collect();

        let (favorited, in_cart, followed) = match viewer {
            Some(viewer) => {
                let favorited: Vec<i32> = favorites::Entity::find()
                    .select_only()
                    .column(favorites::Column::RecipeId)
                    .filter(favorites::Column::UserId.eq(viewer.0))
                    .filter(favorites::Column::RecipeId.is_in(ids.clone()))
                    .into_tuple()
                    .all(&self.db)
                    .await
                    .context("load favorite flags")?;
                let in_cart: Vec<i32> = shopping_carts::Entity::find()
                    .select_only()
                    .column(shopping_carts::Column::RecipeId)
                    .filter(shopping_carts::Column::UserId.eq(viewer.0))
                    .filter(shopping_carts::Column::RecipeId.is_in(ids))
                    .into_tuple()
                    .all(&self.db)
                    .await
                    .context("load shopping cart flags")?;
                let followed: Vec<i32> = subscriptions::Entity::find()
                    .select_only()
                    .column(subscriptions::Column::AuthorId)
                    .filter(subscriptions::Column::UserId.eq(viewer.0))
                    .filter(subscriptions::Column::AuthorId.is_in(author_ids))
                    .into_tuple()
                    .all(&self.db)
                    .await
                    .context("load subscription flags")?;
                (
                    favorited.into_iter().collect::<HashSet<_>>(),
                    in_cart.into_iter().collect::<HashSet<_>>(),
                    followed.into_iter().collect::<HashSet<_>>(),
                )
            }
            None => Default::default(),
        };

        models
            .into_iter()
            .map(|model| -> Result<RecipeView, ApiError> {
                let author = authors
                    .get(&model.author_id)
                    .cloned()
                    .with_context(|| format!("author of recipe {} is missing", model.id))?;
                Ok(RecipeView {
                    author: UserView {
                        is_subscribed: followed.contains(&model.author_id),
                        user: author,
                    },
                    tags: tags_by_recipe.remove(&model.id).unwrap_or_default(),
                    ingredients: ingredients_by_recipe.remove(&model.id).unwrap_or_default(),
                    is_favorited: favorited.contains(&model.id),
                    is_in_shopping_cart: in_cart.contains(&model.id),
                    recipe: recipe_from_model(model),
                })
            })
            .collect()
    }
}

impl RecipeRepository for DbRecipeRepository {
    async fn list(
        &self,
        filter: &RecipeFilter,
        viewer: Option<UserId>,
    ) -> Result<Vec<RecipeView>, ApiError> {
        let mut query = recipes::Entity::find();
        if !filter.tags.is_empty() {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column((recipe_tags::Entity, recipe_tags::Column::RecipeId))
                        .from(recipe_tags::Entity)
                        .inner_join(
                            tags::Entity,
                            Expr::col((tags::Entity, tags::Column::Id))
                                .equals((recipe_tags::Entity, recipe_tags::Column::TagId)),
                        )
                        .and_where(
                            Expr::col((tags::Entity, tags::Column::Slug))
                                .is_in(filter.tags.iter().cloned()),
                        )
                        .to_owned(),
                ),
            );
        }
        if let Some(author) = filter.author {
            query = query.filter(recipes::Column::AuthorId.eq(author.0));
        }
        if let Some(viewer) = viewer {
            if filter.is_favorited {
                query = query.filter(
                    recipes::Column::Id.in_subquery(
                        Query::select()
                            .column(favorites::Column::RecipeId)
                            .from(favorites::Entity)
                            .and_where(favorites::Column::UserId.eq(viewer.0))
                            .to_owned(),
                    ),
                );
            }
            if filter.is_in_shopping_cart {
                query = query.filter(
                    recipes::Column::Id.in_subquery(
                        Query::select()
                            .column(shopping_carts::Column::RecipeId)
                            .from(shopping_carts::Entity)
                            .and_where(shopping_carts::Column::UserId.eq(viewer.0))
                            .to_owned(),
                    ),
                );
            }
        }
        let models = query
            .order_by_desc(recipes::Column::PubDate)
            .order_by_desc(recipes::Column::Id)
            .all(&self.db)
            .await
            .context("list recipes")?;
        self.assemble(models, viewer).await
    }

    async fn view(
        &self,
        id: RecipeId,
        viewer: Option<UserId>,
    ) -> Result<Option<RecipeView>, ApiError> {
        let Some(model) = recipes::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find recipe")?
        else {
            return Ok(None);
        };
        Ok(self.assemble(vec![model], viewer).await?.pop())
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, ApiError> {
        let model = recipes::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find recipe by id")?;
        Ok(model.map(recipe_from_model))
    }

    async fn create(&self, author: UserId, recipe: &RecipeWrite) -> Result<RecipeId, ApiError> {
        let recipe = recipe.clone();
        let id = self
            .db
            .transaction::<_, i32, DbErr>(|txn| {
                Box::pin(async move {
                    let model = recipes::ActiveModel {
                        author_id: Set(author.0),
                        name: Set(recipe.name),
                        image: Set(recipe.image),
                        text: Set(recipe.text),
                        cooking_time: Set(recipe.cooking_time),
                        pub_date: Set(Utc::now()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    insert_recipe_rows(txn, model.id, &recipe.tags, &recipe.ingredients).await?;
                    Ok(model.id)
                })
            })
            .await
            .context("create recipe")?;
        Ok(RecipeId(id))
    }

    async fn update(&self, id: RecipeId, update: &RecipeUpdate) -> Result<(), ApiError> {
        let update = update.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    let mut am = recipes::ActiveModel {
                        id: Set(id.0),
                        ..Default::default()
                    };
                    let mut changed = false;
                    if let Some(name) = update.name {
                        am.name = Set(name);
                        changed = true;
                    }
                    if let Some(text) = update.text {
                        am.text = Set(text);
                        changed = true;
                    }
                    if let Some(image) = update.image {
                        am.image = Set(image);
                        changed = true;
                    }
                    if let Some(cooking_time) = update.cooking_time {
                        am.cooking_time = Set(cooking_time);
                        changed = true;
                    }
                    if changed {
                        am.update(txn).await?;
                    }

                    recipe_tags::Entity::delete_many()
                        .filter(recipe_tags::Column::RecipeId.eq(id.0))
                        .exec(txn)
                        .await?;
                    recipe_ingredients::Entity::delete_many()
                        .filter(recipe_ingredients::Column::RecipeId.eq(id.0))
                        .exec(txn)
                        .await?;
                    insert_recipe_rows(txn, id.0, &update.tags, &update.ingredients).await
                })
            })
            .await
            .context("update recipe")?;
        Ok(())
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, ApiError> {
        let result = recipes::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        Ok(result.rows_affected > 0)
    }

    async fn by_author(
        &self,
        author: UserId,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>, ApiError> {
        let models = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author.0))
            .order_by_desc(recipes::Column::PubDate)
            .order_by_desc(recipes::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list recipes by author")?;
        Ok(models.into_iter().map(recipe_from_model).collect())
    }

    async fn count_by_author(&self, author: UserId) -> Result<u64, ApiError> {
        let count = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author.0))
            .count(&self.db)
            .await
            .context("count recipes by author")?;
        Ok(count)
    }

    async fn cart_lines(&self, user: UserId) -> Result<Vec<CartLine>, ApiError> {
        let rows = recipe_ingredients::Entity::find()
            .filter(
                recipe_ingredients::Column::RecipeId.in_subquery(
                    Query::select()
                        .column(shopping_carts::Column::RecipeId)
                        .from(shopping_carts::Entity)
                        .and_where(shopping_carts::Column::UserId.eq(user.0))
                        .to_owned(),
                ),
            )
            .find_also_related(ingredients::Entity)
            .all(&self.db)
            .await
            .context("load shopping cart lines")?;
        Ok(rows
            .into_iter()
            .filter_map(|(row, ingredient)| {
                ingredient.map(|ingredient| CartLine {
                    name: ingredient.name,
                    measurement_unit: ingredient.measurement_unit,
                    amount: row.amount,
                })
            })
            .collect())
    }
}

async fn insert_recipe_rows<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    tag_ids: &[TagId],
    amounts: &[IngredientAmount],
) -> Result<(), DbErr> {
    if !tag_ids.is_empty() {
        recipe_tags::Entity::insert_many(tag_ids.iter().map(|tag| recipe_tags::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(tag.0),
        }))
        .exec_without_returning(conn)
        .await?;
    }
    if !amounts.is_empty() {
        recipe_ingredients::Entity::insert_many(amounts.iter().map(|item| {
            recipe_ingredients::ActiveModel {
                recipe_id: Set(recipe_id),
                ingredient_id: Set(item.id.0),
                amount: Set(item.amount),
            }
        }))
        .exec_without_returning(conn)
        .await?;
    }
    Ok(())
}

fn recipe_from_model(model: recipes::Model) -> Recipe {
    Recipe {
        id: RecipeId(model.id),
        author_id: UserId(model.author_id),
        name: model.name,
        image: model.image,
        text: model.text,
        cooking_time: model.cooking_time,
        pub_date: model.pub_date,
    }
}

// ── Favorites / shopping cart ────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMembershipRepository {
    pub db: DatabaseConnection,
}

impl MembershipRepository for DbMembershipRepository {
    async fn add(
        &self,
        list: RecipeList,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<LinkOutcome, ApiError> {
        let created_at = Utc::now();
        let result = match list {
            RecipeList::Favorites => favorites::ActiveModel {
                user_id: Set(user.0),
                recipe_id: Set(recipe.0),
                created_at: Set(created_at),
            }
            .insert(&self.db)
            .await
            .map(|_| ()),
            RecipeList::ShoppingCart => shopping_carts::ActiveModel {
                user_id: Set(user.0),
                recipe_id: Set(recipe.0),
                created_at: Set(created_at),
            }
            .insert(&self.db)
            .await
            .map(|_| ()),
        };
        match result {
            Ok(()) => Ok(LinkOutcome::Created),
            Err(e) if is_unique_violation(&e) => Ok(LinkOutcome::Exists),
            Err(e) if is_foreign_key_violation(&e) => Ok(LinkOutcome::TargetGone),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("add recipe to {list}"))
                .into()),
        }
    }

    async fn remove(
        &self,
        list: RecipeList,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, ApiError> {
        let result = match list {
            RecipeList::Favorites => {
                favorites::Entity::delete_by_id((user.0, recipe.0))
                    .exec(&self.db)
                    .await
            }
            RecipeList::ShoppingCart => {
                shopping_carts::Entity::delete_by_id((user.0, recipe.0))
                    .exec(&self.db)
                    .await
            }
        }
        .with_context(|| format!("remove recipe from {list}"))?;
        Ok(result.rows_affected > 0)
    }
}

// ── Subscription repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSubscriptionRepository {
    pub db: DatabaseConnection,
}

impl SubscriptionRepository for DbSubscriptionRepository {
    async fn add(&self, user: UserId, author: UserId) -> Result<LinkOutcome, ApiError> {
        let result = subscriptions::ActiveModel {
            user_id: Set(user.0),
            author_id: Set(author.0),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(LinkOutcome::Created),
            Err(e) if is_unique_violation(&e) => Ok(LinkOutcome::Exists),
            Err(e) if is_foreign_key_violation(&e) => Ok(LinkOutcome::TargetGone),
            Err(e) => Err(anyhow::Error::new(e).context("create subscription").into()),
        }
    }

    async fn remove(&self, user: UserId, author: UserId) -> Result<bool, ApiError> {
        let result = subscriptions::Entity::delete_by_id((user.0, author.0))
            .exec(&self.db)
            .await
            .context("delete subscription")?;
        Ok(result.rows_affected > 0)
    }

    async fn followed_among(
        &self,
        user: UserId,
        authors: &[UserId],
    ) -> Result<HashSet<UserId>, ApiError> {
        if authors.is_empty() {
            return Ok(HashSet::new());
        }
        let followed: Vec<i32> = subscriptions::Entity::find()
            .select_only()
            .column(subscriptions::Column::AuthorId)
            .filter(subscriptions::Column::UserId.eq(user.0))
            .filter(subscriptions::Column::AuthorId.is_in(authors.iter().map(|a| a.0)))
            .into_tuple()
            .all(&self.db)
            .await
            .context("load followed authors")?;
        Ok(followed.into_iter().map(UserId).collect())
    }

    async fn authors(&self, user: UserId) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .filter(
                users::Column::Id.in_subquery(
                    Query::select()
                        .column(subscriptions::Column::AuthorId)
                        .from(subscriptions::Entity)
                        .and_where(subscriptions::Column::UserId.eq(user.0))
                        .to_owned(),
                ),
            )
            .order_by_asc(users::Column::Username)
            .all(&self.db)
            .await
            .context("list subscriptions")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }
}

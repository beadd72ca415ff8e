use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use foodgram_api::domain::repository::{
    IngredientRepository, MembershipRepository, PasswordHasher, RecipeRepository,
    SubscriptionRepository, TagRepository, UserRepository,
};
use foodgram_api::domain::types::{
    Ingredient, LinkOutcome, NewIngredient, NewTag, NewUser, Recipe, RecipeFilter, RecipeIngredient,
    RecipeList, RecipeUpdate, RecipeView, RecipeWrite, Tag, User, UserView,
};
use foodgram_api::error::ApiError;
use foodgram_api::usecase::recipe::{IngredientInput, RecipeInput};
use foodgram_domain::id::{IngredientId, RecipeId, TagId, UserId};
use foodgram_domain::shopping_list::CartLine;
use foodgram_domain::user::UserRole;

pub use foodgram_testing::auth::TEST_JWT_SECRET;

// ── MemoryDb ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tags: Vec<Tag>,
    ingredients: Vec<Ingredient>,
    recipes: Vec<Recipe>,
    recipe_tags: Vec<(RecipeId, TagId)>,
    recipe_ingredients: Vec<(RecipeId, IngredientId, i32)>,
    favorites: HashSet<(UserId, RecipeId)>,
    carts: HashSet<(UserId, RecipeId)>,
    subscriptions: HashSet<(UserId, UserId)>,
    next_id: i32,
    /// Seconds since the epoch base; every insert advances it so pub_date is strictly increasing.
    clock: i64,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn now(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(self.clock)
    }

    fn list(&self, list: RecipeList) -> &HashSet<(UserId, RecipeId)> {
        match list {
            RecipeList::Favorites => &self.favorites,
            RecipeList::ShoppingCart => &self.carts,
        }
    }

    fn list_mut(&mut self, list: RecipeList) -> &mut HashSet<(UserId, RecipeId)> {
        match list {
            RecipeList::Favorites => &mut self.favorites,
            RecipeList::ShoppingCart => &mut self.carts,
        }
    }

    fn remove_recipe(&mut self, id: RecipeId) -> bool {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.id != id);
        self.recipe_tags.retain(|(r, _)| *r != id);
        self.recipe_ingredients.retain(|(r, _, _)| *r != id);
        self.favorites.retain(|(_, r)| *r != id);
        self.carts.retain(|(_, r)| *r != id);
        self.recipes.len() < before
    }

    fn view(&self, recipe: &Recipe, viewer: Option<UserId>) -> RecipeView {
        let author = self
            .users
            .iter()
            .find(|u| u.id == recipe.author_id)
            .cloned()
            .unwrap();
        let mut tags: Vec<Tag> = self
            .recipe_tags
            .iter()
            .filter(|(r, _)| *r == recipe.id)
            .filter_map(|(_, t)| self.tags.iter().find(|tag| tag.id == *t).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        let ingredients = self
            .recipe_ingredients
            .iter()
            .filter(|(r, _, _)| *r == recipe.id)
            .filter_map(|(_, i, amount)| {
                self.ingredients
                    .iter()
                    .find(|ing| ing.id == *i)
                    .cloned()
                    .map(|ingredient| RecipeIngredient {
                        ingredient,
                        amount: *amount,
                    })
            })
            .collect();
        let is_subscribed = viewer.is_some_and(|v| {
            v != author.id && self.subscriptions.contains(&(v, author.id))
        });
        RecipeView {
            recipe: recipe.clone(),
            author: UserView {
                user: author,
                is_subscribed,
            },
            tags,
            ingredients,
            is_favorited: viewer.is_some_and(|v| self.favorites.contains(&(v, recipe.id))),
            is_in_shopping_cart: viewer.is_some_and(|v| self.carts.contains(&(v, recipe.id))),
        }
    }

    fn newest_first(&self) -> Vec<&Recipe> {
        let mut recipes: Vec<&Recipe> = self.recipes.iter().collect();
        recipes.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.0.cmp(&a.id.0)));
        recipes
    }
}

/// In-memory stand-in for the database. Clones share the same tables, so one
/// instance can serve as every repository of a use case.
#[derive(Clone, Default)]
pub struct MemoryDb {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recipe_count(&self) -> usize {
        self.tables.lock().unwrap().recipes.len()
    }

    pub fn is_listed(&self, list: RecipeList, user: UserId, recipe: RecipeId) -> bool {
        self.tables.lock().unwrap().list(list).contains(&(user, recipe))
    }

    pub fn follows(&self, user: UserId, author: UserId) -> bool {
        self.tables
            .lock()
            .unwrap()
            .subscriptions
            .contains(&(user, author))
    }
}

impl UserRepository for MemoryDb {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
        Ok(self.tables.lock().unwrap().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, ApiError> {
        let mut users = self.tables.lock().unwrap().users.clone();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn create(&self, new_user: &NewUser) -> Result<Option<User>, ApiError> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .users
            .iter()
            .any(|u| u.email == new_user.email || u.username == new_user.username)
        {
            return Ok(None);
        }
        let user = User {
            id: UserId(tables.next_id()),
            email: new_user.email.clone(),
            username: new_user.username.clone(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            password_hash: new_user.password_hash.clone(),
            role: UserRole::User,
            token_version: 0,
            created_at: tables.now(),
        };
        tables.users.push(user.clone());
        Ok(Some(user))
    }

    async fn set_password(&self, id: UserId, password_hash: &str) -> Result<(), ApiError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id) {
            user.password_hash = password_hash.to_owned();
            user.token_version += 1;
        }
        Ok(())
    }

    async fn bump_token_version(&self, id: UserId) -> Result<(), ApiError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id) {
            user.token_version += 1;
        }
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<bool, ApiError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }
        let owned: Vec<RecipeId> = tables
            .recipes
            .iter()
            .filter(|r| r.author_id == id)
            .map(|r| r.id)
            .collect();
        for recipe in owned {
            tables.remove_recipe(recipe);
        }
        tables.favorites.retain(|(u, _)| *u != id);
        tables.carts.retain(|(u, _)| *u != id);
        tables.subscriptions.retain(|(u, a)| *u != id && *a != id);
        Ok(true)
    }
}

impl TagRepository for MemoryDb {
    async fn list(&self) -> Result<Vec<Tag>, ApiError> {
        let mut tags = self.tables.lock().unwrap().tags.clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, ApiError> {
        Ok(self.tables.lock().unwrap().tags.iter().find(|t| t.id == id).cloned())
    }

    async fn existing_ids(&self, ids: &[TagId]) -> Result<HashSet<TagId>, ApiError> {
        let tables = self.tables.lock().unwrap();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| tables.tags.iter().any(|t| t.id == *id))
            .collect())
    }

    async fn insert_missing(&self, tags: &[NewTag]) -> Result<u64, ApiError> {
        let mut tables = self.tables.lock().unwrap();
        let mut inserted = 0;
        for tag in tags {
            let clash = tables
                .tags
                .iter()
                .any(|t| t.name == tag.name || t.color == tag.color || t.slug == tag.slug);
            if clash {
                continue;
            }
            let id = TagId(tables.next_id());
            tables.tags.push(Tag {
                id,
                name: tag.name.clone(),
                color: tag.color.clone(),
                slug: tag.slug.clone(),
            });
            inserted += 1;
        }
        Ok(inserted)
    }
}

impl IngredientRepository for MemoryDb {
    async fn search(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, ApiError> {
        let prefix = name_prefix.map(str::to_lowercase);
        let mut found: Vec<Ingredient> = self
            .tables
            .lock()
            .unwrap()
            .ingredients
            .iter()
            .filter(|i| {
                prefix
                    .as_deref()
                    .is_none_or(|p| i.name.to_lowercase().starts_with(p))
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn find_by_id(&self, id: IngredientId) -> Result<Option<Ingredient>, ApiError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .ingredients
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn existing_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<HashSet<IngredientId>, ApiError> {
        let tables = self.tables.lock().unwrap();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| tables.ingredients.iter().any(|i| i.id == *id))
            .collect())
    }

    async fn insert_missing(&self, ingredients: &[NewIngredient]) -> Result<u64, ApiError> {
        let mut tables = self.tables.lock().unwrap();
        let mut inserted = 0;
        for item in ingredients {
            let clash = tables
                .ingredients
                .iter()
                .any(|i| i.name == item.name && i.measurement_unit == item.measurement_unit);
            if clash {
                continue;
            }
            let id = IngredientId(tables.next_id());
            tables.ingredients.push(Ingredient {
                id,
                name: item.name.clone(),
                measurement_unit: item.measurement_unit.clone(),
            });
            inserted += 1;
        }
        Ok(inserted)
    }
}

impl RecipeRepository for MemoryDb {
    async fn list(
        &self,
        filter: &RecipeFilter,
        viewer: Option<UserId>,
    ) -> Result<Vec<RecipeView>, ApiError> {
        let tables = self.tables.lock().unwrap();
        let tag_ids: HashSet<TagId> = tables
            .tags
            .iter()
            .filter(|t| filter.tags.contains(&t.slug))
            .map(|t| t.id)
            .collect();
        Ok(tables
            .newest_first()
            .into_iter()
            .filter(|r| {
                filter.tags.is_empty()
                    || tables
                        .recipe_tags
                        .iter()
                        .any(|(rid, tid)| *rid == r.id && tag_ids.contains(tid))
            })
            .filter(|r| filter.author.is_none_or(|a| r.author_id == a))
            .filter(|r| match viewer {
                Some(v) => {
                    (!filter.is_favorited || tables.favorites.contains(&(v, r.id)))
                        && (!filter.is_in_shopping_cart || tables.carts.contains(&(v, r.id)))
                }
                None => true,
            })
            .map(|r| tables.view(r, viewer))
            .collect())
    }

    async fn view(
        &self,
        id: RecipeId,
        viewer: Option<UserId>,
    ) -> Result<Option<RecipeView>, ApiError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .recipes
            .iter()
            .find(|r| r.id == id)
            .map(|r| tables.view(r, viewer)))
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, ApiError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .recipes
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn create(&self, author: UserId, recipe: &RecipeWrite) -> Result<RecipeId, ApiError> {
        let mut tables = self.tables.lock().unwrap();
        let id = RecipeId(tables.next_id());
        let pub_date = tables.now();
        tables.recipes.push(Recipe {
            id,
            author_id: author,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            text: recipe.text.clone(),
            cooking_time: recipe.cooking_time,
            pub_date,
        });
        tables
            .recipe_tags
            .extend(recipe.tags.iter().map(|t| (id, *t)));
        tables
            .recipe_ingredients
            .extend(recipe.ingredients.iter().map(|i| (id, i.id, i.amount)));
        Ok(id)
    }

    async fn update(&self, id: RecipeId, update: &RecipeUpdate) -> Result<(), ApiError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(recipe) = tables.recipes.iter_mut().find(|r| r.id == id) else {
            return Err(ApiError::RecipeNotFound);
        };
        if let Some(name) = &update.name {
            recipe.name = name.clone();
        }
        if let Some(text) = &update.text {
            recipe.text = text.clone();
        }
        if let Some(image) = &update.image {
            recipe.image = image.clone();
        }
        if let Some(cooking_time) = update.cooking_time {
            recipe.cooking_time = cooking_time;
        }
        tables.recipe_tags.retain(|(r, _)| *r != id);
        tables.recipe_ingredients.retain(|(r, _, _)| *r != id);
        tables
            .recipe_tags
            .extend(update.tags.iter().map(|t| (id, *t)));
        tables
            .recipe_ingredients
            .extend(update.ingredients.iter().map(|i| (id, i.id, i.amount)));
        Ok(())
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, ApiError> {
        Ok(self.tables.lock().unwrap().remove_recipe(id))
    }

    async fn by_author(&self, author: UserId, limit: Option<u64>) -> Result<Vec<Recipe>, ApiError> {
        let tables = self.tables.lock().unwrap();
        let own = tables
            .newest_first()
            .into_iter()
            .filter(|r| r.author_id == author)
            .cloned();
        Ok(match limit {
            Some(n) => own.take(n as usize).collect(),
            None => own.collect(),
        })
    }

    async fn count_by_author(&self, author: UserId) -> Result<u64, ApiError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.recipes.iter().filter(|r| r.author_id == author).count() as u64)
    }

    async fn cart_lines(&self, user: UserId) -> Result<Vec<CartLine>, ApiError> {
        let tables = self.tables.lock().unwrap();
        let ingredients: HashMap<IngredientId, &Ingredient> =
            tables.ingredients.iter().map(|i| (i.id, i)).collect();
        Ok(tables
            .recipe_ingredients
            .iter()
            .filter(|(r, _, _)| tables.carts.contains(&(user, *r)))
            .filter_map(|(_, i, amount)| {
                ingredients.get(i).map(|ing| CartLine {
                    name: ing.name.clone(),
                    measurement_unit: ing.measurement_unit.clone(),
                    amount: *amount,
                })
            })
            .collect())
    }
}

impl MembershipRepository for MemoryDb {
    async fn add(
        &self,
        list: RecipeList,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<LinkOutcome, ApiError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.recipes.iter().any(|r| r.id == recipe) {
            return Ok(LinkOutcome::TargetGone);
        }
        Ok(link(tables.list_mut(list).insert((user, recipe))))
    }

    async fn remove(
        &self,
        list: RecipeList,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, ApiError> {
        Ok(self.tables.lock().unwrap().list_mut(list).remove(&(user, recipe)))
    }
}

impl SubscriptionRepository for MemoryDb {
    async fn add(&self, user: UserId, author: UserId) -> Result<LinkOutcome, ApiError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.users.iter().any(|u| u.id == author) {
            return Ok(LinkOutcome::TargetGone);
        }
        Ok(link(tables.subscriptions.insert((user, author))))
    }

    async fn remove(&self, user: UserId, author: UserId) -> Result<bool, ApiError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .subscriptions
            .remove(&(user, author)))
    }

    async fn followed_among(
        &self,
        user: UserId,
        authors: &[UserId],
    ) -> Result<HashSet<UserId>, ApiError> {
        let tables = self.tables.lock().unwrap();
        Ok(authors
            .iter()
            .copied()
            .filter(|a| tables.subscriptions.contains(&(user, *a)))
            .collect())
    }

    async fn authors(&self, user: UserId) -> Result<Vec<User>, ApiError> {
        let tables = self.tables.lock().unwrap();
        let mut authors: Vec<User> = tables
            .users
            .iter()
            .filter(|a| tables.subscriptions.contains(&(user, a.id)))
            .cloned()
            .collect();
        authors.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(authors)
    }
}

fn link(inserted: bool) -> LinkOutcome {
    if inserted {
        LinkOutcome::Created
    } else {
        LinkOutcome::Exists
    }
}

// ── PlainHasher ──────────────────────────────────────────────────────────────

/// Marks passwords as hashed without the cost of argon2.
#[derive(Clone, Copy)]
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &str) -> Result<String, ApiError> {
        Ok(format!("plain${password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        Ok(hash.strip_prefix("plain$") == Some(password))
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Insert a user whose password is [`TEST_PASSWORD`].
pub async fn add_user(db: &MemoryDb, username: &str) -> User {
    UserRepository::create(
        db,
        &NewUser {
            email: format!("{username}@example.com"),
            username: username.to_owned(),
            first_name: "Test".to_owned(),
            last_name: "Cook".to_owned(),
            password_hash: format!("plain${TEST_PASSWORD}"),
        },
    )
    .await
    .unwrap()
    .unwrap()
}

/// Catalog ids returned by [`seed_catalog`].
pub struct Catalog {
    pub breakfast: TagId,
    pub dinner: TagId,
    pub salt: IngredientId,
    pub sugar: IngredientId,
    pub eggs: IngredientId,
}

pub async fn seed_catalog(db: &MemoryDb) -> Catalog {
    TagRepository::insert_missing(
        db,
        &[
        NewTag {
            name: "Breakfast".into(),
            color: "#E26C2D".into(),
            slug: "breakfast".into(),
        },
        NewTag {
            name: "Dinner".into(),
            color: "#49B64E".into(),
            slug: "dinner".into(),
        },
        ],
    )
    .await
    .unwrap();
    IngredientRepository::insert_missing(
        db,
        &[
            NewIngredient {
                name: "Salt".into(),
                measurement_unit: "g".into(),
            },
            NewIngredient {
                name: "Sugar".into(),
                measurement_unit: "g".into(),
            },
            NewIngredient {
                name: "Eggs".into(),
                measurement_unit: "pcs".into(),
            },
        ],
    )
    .await
    .unwrap();

    let tags = TagRepository::list(db).await.unwrap();
    let tag = |slug: &str| tags.iter().find(|t| t.slug == slug).unwrap().id;
    let ingredients = db.search(None).await.unwrap();
    let ingredient = |name: &str| ingredients.iter().find(|i| i.name == name).unwrap().id;
    Catalog {
        breakfast: tag("breakfast"),
        dinner: tag("dinner"),
        salt: ingredient("Salt"),
        sugar: ingredient("Sugar"),
        eggs: ingredient("Eggs"),
    }
}

/// A complete, valid recipe payload.
pub fn recipe_input(name: &str, tags: &[TagId], ingredients: &[(IngredientId, i64)]) -> RecipeInput {
    RecipeInput {
        name: Some(name.to_owned()),
        text: Some("Mix everything and cook.".to_owned()),
        image: Some("data:image/png;base64,iVBORw0KGgo=".to_owned()),
        cooking_time: Some(25),
        tags: Some(tags.iter().map(|t| i64::from(t.0)).collect()),
        ingredients: Some(
            ingredients
                .iter()
                .map(|(id, amount)| IngredientInput {
                    id: Some(i64::from(id.0)),
                    amount: Some(*amount),
                })
                .collect(),
        ),
    }
}

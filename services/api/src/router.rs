use axum::{
    Router,
    routing::{get, post},
};

use foodgram_core::health::{healthz, readyz};
use foodgram_core::middleware::with_http_layers;

use crate::handlers::{
    auth::{login, logout},
    catalog::{get_ingredient, get_tag, list_ingredients, list_tags},
    recipe::{
        add_favorite, add_to_cart, create_recipe, delete_recipe, download_shopping_cart,
        get_recipe, list_recipes, remove_favorite, remove_from_cart, update_recipe,
    },
    subscription::{list_subscriptions, subscribe, unsubscribe},
    user::{create_user, delete_me, get_me, get_user, list_users, set_password},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // Auth
        .route("/auth/token/login", post(login))
        .route("/auth/token/logout", post(logout))
        // Users
        .route("/users", get(list_users).post(create_user))
        .route("/users/me", get(get_me).delete(delete_me))
        .route("/users/set_password", post(set_password))
        .route("/users/subscriptions", get(list_subscriptions))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/subscribe", post(subscribe).delete(unsubscribe))
        // Catalog
        .route("/tags", get(list_tags))
        .route("/tags/{id}", get(get_tag))
        .route("/ingredients", get(list_ingredients))
        .route("/ingredients/{id}", get(get_ingredient))
        // Recipes
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/download_shopping_cart", get(download_shopping_cart))
        .route(
            "/recipes/{id}",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route("/recipes/{id}/favorite", post(add_favorite).delete(remove_favorite))
        .route(
            "/recipes/{id}/shopping_cart",
            post(add_to_cart).delete(remove_from_cart),
        );

    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest("/api", api)
        .with_state(state);
    with_http_layers(router)
}

use foodgram_api::domain::types::RecipeList;
use foodgram_api::usecase::membership::{AddToListUseCase, RemoveFromListUseCase};
use foodgram_api::usecase::recipe::CreateRecipeUseCase;
use foodgram_api::usecase::shopping_cart::DownloadShoppingListUseCase;

use crate::helpers::{MemoryDb, add_user, recipe_input, seed_catalog};

#[tokio::test]
async fn should_aggregate_same_ingredient_across_cart_recipes() {
    let db = MemoryDb::new();
    let catalog = seed_catalog(&db).await;
    let user = add_user(&db, "shopper").await;
    let create = CreateRecipeUseCase {
        recipes: db.clone(),
        tags: db.clone(),
        ingredients: db.clone(),
    };
    let soup = create
        .execute(
            &user,
            recipe_input(
                "Soup",
                &[catalog.dinner],
                &[(catalog.salt, 5), (catalog.eggs, 1)],
            ),
        )
        .await
        .unwrap();
    let stew = create
        .execute(
            &user,
            recipe_input("Stew", &[catalog.dinner], &[(catalog.salt, 10)]),
        )
        .await
        .unwrap();
    // In the catalog but not in the cart.
    create
        .execute(
            &user,
            recipe_input("Cake", &[catalog.breakfast], &[(catalog.sugar, 200)]),
        )
        .await
        .unwrap();

    let add = AddToListUseCase {
        recipes: db.clone(),
        lists: db.clone(),
    };
    for id in [soup.recipe.id, stew.recipe.id] {
        add.execute(&user, RecipeList::ShoppingCart, id)
            .await
            .unwrap();
    }

    let download = DownloadShoppingListUseCase {
        recipes: db.clone(),
    };
    let text = download.execute(&user).await.unwrap();
    assert_eq!(text, "Shopping list:\nEggs - 1, pcs\nSalt - 15, g\n");

    RemoveFromListUseCase {
        recipes: db.clone(),
        lists: db.clone(),
    }
    .execute(&user, RecipeList::ShoppingCart, soup.recipe.id)
    .await
    .unwrap();
    let text = download.execute(&user).await.unwrap();
    assert_eq!(text, "Shopping list:\nSalt - 10, g\n");
}

#[tokio::test]
async fn should_return_header_only_for_empty_cart() {
    let db = MemoryDb::new();
    let user = add_user(&db, "shopper").await;
    let text = DownloadShoppingListUseCase {
        recipes: db.clone(),
    }
    .execute(&user)
    .await
    .unwrap();
    assert_eq!(text, "Shopping list:\n");
}

use foodgram_api::domain::types::{NewIngredient, NewTag};
use foodgram_api::error::ApiError;
use foodgram_api::usecase::catalog::{
    GetIngredientUseCase, GetTagUseCase, ListTagsUseCase, SearchIngredientsUseCase,
    SeedIngredientsUseCase, SeedTagsUseCase,
};
use foodgram_domain::id::{IngredientId, TagId};

use crate::helpers::{MemoryDb, seed_catalog};

#[tokio::test]
async fn should_search_ingredients_by_case_insensitive_prefix() {
    let db = MemoryDb::new();
    seed_catalog(&db).await;
    let search = SearchIngredientsUseCase {
        ingredients: db.clone(),
    };

    let names = |found: Vec<foodgram_api::domain::types::Ingredient>| {
        found.into_iter().map(|i| i.name).collect::<Vec<_>>()
    };
    assert_eq!(names(search.execute(Some("s")).await.unwrap()), ["Salt", "Sugar"]);
    assert_eq!(names(search.execute(Some("SU")).await.unwrap()), ["Sugar"]);
    // Prefix only, not substring.
    assert!(search.execute(Some("alt")).await.unwrap().is_empty());
    assert_eq!(search.execute(None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn should_skip_existing_rows_when_seeding_twice() {
    let db = MemoryDb::new();
    let rows = vec![
        NewIngredient {
            name: "Flour".into(),
            measurement_unit: "g".into(),
        },
        NewIngredient {
            name: "Flour".into(),
            measurement_unit: "kg".into(),
        },
    ];
    let seed = SeedIngredientsUseCase {
        ingredients: db.clone(),
    };
    assert_eq!(seed.execute(rows.clone()).await.unwrap(), 2);
    assert_eq!(seed.execute(rows).await.unwrap(), 0);

    let tags = SeedTagsUseCase { tags: db.clone() };
    let tag = NewTag {
        name: "Lunch".into(),
        color: "#AABBCC".into(),
        slug: "lunch".into(),
    };
    assert_eq!(tags.execute(vec![tag.clone()]).await.unwrap(), 1);
    assert_eq!(tags.execute(vec![tag]).await.unwrap(), 0);
    assert_eq!(
        ListTagsUseCase { tags: db.clone() }
            .execute()
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn should_return_not_found_for_unknown_catalog_ids() {
    let db = MemoryDb::new();
    let catalog = seed_catalog(&db).await;

    let tags = GetTagUseCase { tags: db.clone() };
    assert_eq!(tags.execute(catalog.dinner).await.unwrap().slug, "dinner");
    assert!(matches!(
        tags.execute(TagId(9999)).await,
        Err(ApiError::TagNotFound)
    ));

    let ingredients = GetIngredientUseCase {
        ingredients: db.clone(),
    };
    assert_eq!(
        ingredients.execute(catalog.eggs).await.unwrap().measurement_unit,
        "pcs"
    );
    assert!(matches!(
        ingredients.execute(IngredientId(9999)).await,
        Err(ApiError::IngredientNotFound)
    ));
}

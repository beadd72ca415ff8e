use foodgram_api::error::ApiError;
use foodgram_api::usecase::recipe::CreateRecipeUseCase;
use foodgram_api::usecase::subscription::{
    ListSubscriptionsUseCase, SubscribeUseCase, UnsubscribeUseCase, parse_recipes_limit,
};
use foodgram_domain::id::UserId;

use crate::helpers::{MemoryDb, add_user, recipe_input, seed_catalog};

fn subscribe_uc(db: &MemoryDb) -> SubscribeUseCase<MemoryDb, MemoryDb, MemoryDb> {
    SubscribeUseCase {
        users: db.clone(),
        subscriptions: db.clone(),
        recipes: db.clone(),
    }
}

#[tokio::test]
async fn should_subscribe_with_limited_preview_and_full_count() {
    let db = MemoryDb::new();
    let catalog = seed_catalog(&db).await;
    let reader = add_user(&db, "reader").await;
    let chef = add_user(&db, "chef").await;
    let create = CreateRecipeUseCase {
        recipes: db.clone(),
        tags: db.clone(),
        ingredients: db.clone(),
    };
    for name in ["First", "Second", "Third"] {
        create
            .execute(
                &chef,
                recipe_input(name, &[catalog.dinner], &[(catalog.salt, 1)]),
            )
            .await
            .unwrap();
    }

    let subscription = subscribe_uc(&db)
        .execute(&reader, chef.id, parse_recipes_limit(Some("2")))
        .await
        .unwrap();
    assert_eq!(subscription.author.id, chef.id);
    assert_eq!(subscription.recipes_count, 3);
    let names: Vec<&str> = subscription
        .recipes
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, ["Third", "Second"]);
    assert!(db.follows(reader.id, chef.id));
}

#[tokio::test]
async fn should_reject_self_and_duplicate_subscription() {
    let db = MemoryDb::new();
    let reader = add_user(&db, "reader").await;
    let chef = add_user(&db, "chef").await;

    assert!(matches!(
        subscribe_uc(&db).execute(&reader, reader.id, None).await,
        Err(ApiError::SelfSubscription)
    ));
    subscribe_uc(&db).execute(&reader, chef.id, None).await.unwrap();
    assert!(matches!(
        subscribe_uc(&db).execute(&reader, chef.id, None).await,
        Err(ApiError::AlreadySubscribed)
    ));
    assert!(matches!(
        subscribe_uc(&db).execute(&reader, UserId(999), None).await,
        Err(ApiError::UserNotFound)
    ));
}

#[tokio::test]
async fn should_list_authors_by_username_until_unsubscribed() {
    let db = MemoryDb::new();
    let reader = add_user(&db, "reader").await;
    let zoe = add_user(&db, "zoe").await;
    let anna = add_user(&db, "anna").await;
    for author in [zoe.id, anna.id] {
        subscribe_uc(&db).execute(&reader, author, None).await.unwrap();
    }

    let list = ListSubscriptionsUseCase {
        subscriptions: db.clone(),
        recipes: db.clone(),
    };
    let usernames: Vec<String> = list
        .execute(&reader, None)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.author.username)
        .collect();
    assert_eq!(usernames, ["anna", "zoe"]);

    let unsubscribe = UnsubscribeUseCase {
        users: db.clone(),
        subscriptions: db.clone(),
    };
    unsubscribe.execute(&reader, zoe.id).await.unwrap();
    assert!(matches!(
        unsubscribe.execute(&reader, zoe.id).await,
        Err(ApiError::NotSubscribed)
    ));
    assert_eq!(list.execute(&reader, None).await.unwrap().len(), 1);
}

use foodgram_api::domain::repository::SubscriptionRepository;
use foodgram_api::domain::types::RecipeList;
use foodgram_api::error::ApiError;
use foodgram_api::usecase::membership::AddToListUseCase;
use foodgram_api::usecase::recipe::CreateRecipeUseCase;
use foodgram_api::usecase::user::{
    DeleteAccountUseCase, GetUserUseCase, ListUsersUseCase, RegisterInput, RegisterUserUseCase,
};

use crate::helpers::{MemoryDb, PlainHasher, TEST_PASSWORD, add_user, recipe_input, seed_catalog};

fn register_input(username: &str) -> RegisterInput {
    RegisterInput {
        email: Some(format!("{username}@example.com")),
        username: Some(username.to_owned()),
        first_name: Some("Anna".to_owned()),
        last_name: Some("Cook".to_owned()),
        password: Some("s3cret-pass".to_owned()),
    }
}

#[tokio::test]
async fn should_register_and_reject_duplicate_email() {
    let db = MemoryDb::new();
    let register = RegisterUserUseCase {
        users: db.clone(),
        passwords: PlainHasher,
    };

    let user = register.execute(register_input("anna")).await.unwrap();
    assert_eq!(user.email, "anna@example.com");
    assert_eq!(user.password_hash, "plain$s3cret-pass");

    let mut again = register_input("anna2");
    again.email = Some("anna@example.com".to_owned());
    let Err(ApiError::Validation(errors)) = register.execute(again).await else {
        panic!("expected validation error");
    };
    assert!(errors.get("email").is_some());
    assert!(errors.get("username").is_none());
}

#[tokio::test]
async fn should_refuse_reserved_username() {
    let db = MemoryDb::new();
    let register = RegisterUserUseCase {
        users: db.clone(),
        passwords: PlainHasher,
    };
    let Err(ApiError::Validation(errors)) = register.execute(register_input("me")).await else {
        panic!("expected validation error");
    };
    assert!(errors.get("username").is_some());
}

#[tokio::test]
async fn should_report_is_subscribed_for_viewer_only() {
    let db = MemoryDb::new();
    let reader = add_user(&db, "reader").await;
    let chef = add_user(&db, "chef").await;
    SubscriptionRepository::add(&db, reader.id, chef.id)
        .await
        .unwrap();

    let get = GetUserUseCase {
        users: db.clone(),
        subscriptions: db.clone(),
    };
    assert!(get.execute(Some(&reader), chef.id).await.unwrap().is_subscribed);
    assert!(!get.execute(None, chef.id).await.unwrap().is_subscribed);
    assert!(!get.execute(Some(&chef), reader.id).await.unwrap().is_subscribed);

    let all = ListUsersUseCase {
        users: db.clone(),
        subscriptions: db.clone(),
    }
    .execute(Some(&reader))
    .await
    .unwrap();
    let flags: Vec<(String, bool)> = all
        .into_iter()
        .map(|v| (v.user.username, v.is_subscribed))
        .collect();
    assert_eq!(
        flags,
        [("reader".to_owned(), false), ("chef".to_owned(), true)]
    );
}

#[tokio::test]
async fn should_cascade_account_deletion() {
    let db = MemoryDb::new();
    let catalog = seed_catalog(&db).await;
    let chef = add_user(&db, "chef").await;
    let reader = add_user(&db, "reader").await;
    let created = CreateRecipeUseCase {
        recipes: db.clone(),
        tags: db.clone(),
        ingredients: db.clone(),
    }
    .execute(
        &chef,
        recipe_input("Soup", &[catalog.dinner], &[(catalog.salt, 3)]),
    )
    .await
    .unwrap();
    AddToListUseCase {
        recipes: db.clone(),
        lists: db.clone(),
    }
    .execute(&reader, RecipeList::Favorites, created.recipe.id)
    .await
    .unwrap();
    SubscriptionRepository::add(&db, reader.id, chef.id)
        .await
        .unwrap();

    DeleteAccountUseCase {
        users: db.clone(),
        passwords: PlainHasher,
    }
    .execute(&chef, Some(TEST_PASSWORD))
    .await
    .unwrap();

    assert_eq!(db.recipe_count(), 0);
    assert!(!db.is_listed(RecipeList::Favorites, reader.id, created.recipe.id));
    assert!(!db.follows(reader.id, chef.id));
    assert!(matches!(
        GetUserUseCase {
            users: db.clone(),
            subscriptions: db.clone(),
        }
        .execute(None, chef.id)
        .await,
        Err(ApiError::UserNotFound)
    ));
}

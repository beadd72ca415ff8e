use foodgram_api::error::ApiError;
use foodgram_api::usecase::token::{LoginInput, LoginUseCase, LogoutUseCase, authenticate};
use foodgram_api::usecase::user::{SetPasswordInput, SetPasswordUseCase};

use crate::helpers::{MemoryDb, PlainHasher, TEST_JWT_SECRET, TEST_PASSWORD, add_user};

fn login_uc(db: &MemoryDb) -> LoginUseCase<MemoryDb, PlainHasher> {
    LoginUseCase {
        users: db.clone(),
        passwords: PlainHasher,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        token_ttl_secs: 3600,
    }
}

fn credentials(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: Some(email.to_owned()),
        password: Some(password.to_owned()),
    }
}

#[tokio::test]
async fn should_issue_token_that_authenticates() {
    let db = MemoryDb::new();
    let user = add_user(&db, "chef").await;

    let out = login_uc(&db)
        .execute(credentials("chef@example.com", TEST_PASSWORD))
        .await
        .unwrap();
    let resolved = authenticate(&db, &out.auth_token, TEST_JWT_SECRET)
        .await
        .unwrap();
    assert_eq!(resolved.id, user.id);

    assert!(matches!(
        authenticate(&db, &out.auth_token, "some-other-secret").await,
        Err(ApiError::Unauthorized)
    ));
}

#[tokio::test]
async fn should_refuse_wrong_password_and_unknown_email_alike() {
    let db = MemoryDb::new();
    add_user(&db, "chef").await;

    assert!(matches!(
        login_uc(&db)
            .execute(credentials("chef@example.com", "not-the-password"))
            .await,
        Err(ApiError::InvalidCredentials)
    ));
    assert!(matches!(
        login_uc(&db)
            .execute(credentials("ghost@example.com", TEST_PASSWORD))
            .await,
        Err(ApiError::InvalidCredentials)
    ));
    let Err(ApiError::Validation(errors)) = login_uc(&db).execute(LoginInput::default()).await
    else {
        panic!("expected validation error");
    };
    assert!(errors.get("email").is_some());
    assert!(errors.get("password").is_some());
}

#[tokio::test]
async fn should_revoke_tokens_on_logout() {
    let db = MemoryDb::new();
    let user = add_user(&db, "chef").await;
    let first = login_uc(&db)
        .execute(credentials("chef@example.com", TEST_PASSWORD))
        .await
        .unwrap();
    let second = login_uc(&db)
        .execute(credentials("chef@example.com", TEST_PASSWORD))
        .await
        .unwrap();

    LogoutUseCase { users: db.clone() }
        .execute(&user)
        .await
        .unwrap();

    for token in [&first.auth_token, &second.auth_token] {
        assert!(matches!(
            authenticate(&db, token, TEST_JWT_SECRET).await,
            Err(ApiError::Unauthorized)
        ));
    }
    let fresh = login_uc(&db)
        .execute(credentials("chef@example.com", TEST_PASSWORD))
        .await
        .unwrap();
    authenticate(&db, &fresh.auth_token, TEST_JWT_SECRET)
        .await
        .unwrap();
}

#[tokio::test]
async fn should_revoke_tokens_on_password_change() {
    let db = MemoryDb::new();
    let user = add_user(&db, "chef").await;
    let old = login_uc(&db)
        .execute(credentials("chef@example.com", TEST_PASSWORD))
        .await
        .unwrap();

    SetPasswordUseCase {
        users: db.clone(),
        passwords: PlainHasher,
    }
    .execute(
        &user,
        SetPasswordInput {
            new_password: Some("a-much-better-one".to_owned()),
            current_password: Some(TEST_PASSWORD.to_owned()),
        },
    )
    .await
    .unwrap();

    assert!(matches!(
        authenticate(&db, &old.auth_token, TEST_JWT_SECRET).await,
        Err(ApiError::Unauthorized)
    ));
    login_uc(&db)
        .execute(credentials("chef@example.com", "a-much-better-one"))
        .await
        .unwrap();
}

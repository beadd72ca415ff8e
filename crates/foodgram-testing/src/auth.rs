//! Mock auth helpers for router tests.
//!
//! `MockAuth` signs a real token with a test secret so requests pass the same
//! header parsing and signature checks as production traffic.

use axum::http::HeaderValue;
use foodgram_auth_types::token::issue_token;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Identity to sign into test requests.
pub struct MockAuth {
    pub user_id: i32,
    pub token_version: i32,
}

impl MockAuth {
    pub fn new(user_id: i32) -> Self {
        Self {
            user_id,
            token_version: 0,
        }
    }

    /// A token signed with [`TEST_JWT_SECRET`], valid for an hour.
    pub fn token(&self) -> String {
        let (token, _) = issue_token(self.user_id, self.token_version, 3600, TEST_JWT_SECRET)
            .expect("sign test token");
        token
    }

    /// `Authorization: Token <token>` header value.
    pub fn header_value(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Token {}", self.token())).expect("valid header value")
    }
}

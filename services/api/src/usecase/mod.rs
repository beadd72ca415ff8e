pub mod catalog;
pub mod fields;
pub mod membership;
pub mod recipe;
pub mod shopping_cart;
pub mod subscription;
pub mod token;
pub mod user;

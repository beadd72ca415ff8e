pub mod auth;
pub mod catalog;
pub mod recipe;
pub mod subscription;
pub mod user;

//! Domain types shared across Foodgram crates.
//!
//! This crate contains only pure types and rules with no framework dependencies.
//! Ids and rules live here; persistence and HTTP shapes stay in the service.

pub mod id;
pub mod recipe;
pub mod shopping_list;
pub mod tag;
pub mod user;

//! Test utilities for Foodgram crates.
//!
//! Provides `MockAuth` and response body helpers.
//! Dev-dependency only.

pub mod auth;
pub mod body;

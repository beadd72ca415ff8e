//! Auth types shared across Foodgram crates.
//!
//! Provides token issuing/validation and the `Authorization` header extractor.

pub mod identity;
pub mod token;

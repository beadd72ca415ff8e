//! HTTP and persistence plumbing shared by Foodgram binaries.

pub mod config;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod tracing;

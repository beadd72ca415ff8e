//! Reference data loader.
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/foodgram foodgram-seed ingredients data/ingredients.json
//! DATABASE_URL=postgres://localhost/foodgram foodgram-seed tags data/tags.json
//! ```
//!
//! Rows already present are skipped, so the loader can be re-run safely.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sea_orm::Database;
use serde::Deserialize;
use tracing::info;

use foodgram_api::config::SeedConfig;
use foodgram_api::domain::types::{NewIngredient, NewTag};
use foodgram_api::error::ApiError;
use foodgram_api::infra::db::{DbIngredientRepository, DbTagRepository};
use foodgram_api::usecase::catalog::{SeedIngredientsUseCase, SeedTagsUseCase};
use foodgram_core::config::Config;
use foodgram_core::tracing::init_tracing;

#[derive(Parser)]
#[command(about = "Load Foodgram reference data from JSON files")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load `[{"name", "measurement_unit"}]`
    Ingredients { file: PathBuf },
    /// Load `[{"name", "color", "slug"}]`
    Tags { file: PathBuf },
}

#[derive(Deserialize)]
struct IngredientRow {
    name: String,
    measurement_unit: String,
}

#[derive(Deserialize)]
struct TagRow {
    name: String,
    color: String,
    slug: String,
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

/// Keep the per-row messages of a rejected batch.
fn describe(error: ApiError) -> anyhow::Error {
    match error {
        ApiError::Validation(errors) => anyhow::anyhow!(
            "invalid rows, nothing inserted: {}",
            serde_json::to_string(&errors).unwrap_or_default()
        ),
        ApiError::Internal(e) => e,
        other => anyhow::Error::new(other),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = SeedConfig::from_env().context("load configuration")?;
    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;

    let inserted = match args.command {
        Command::Ingredients { file } => {
            let rows: Vec<IngredientRow> = read_rows(&file)?;
            let usecase = SeedIngredientsUseCase {
                ingredients: DbIngredientRepository { db },
            };
            usecase
                .execute(
                    rows.into_iter()
                        .map(|row| NewIngredient {
                            name: row.name,
                            measurement_unit: row.measurement_unit,
                        })
                        .collect(),
                )
                .await
                .map_err(describe)?
        }
        Command::Tags { file } => {
            let rows: Vec<TagRow> = read_rows(&file)?;
            let usecase = SeedTagsUseCase {
                tags: DbTagRepository { db },
            };
            usecase
                .execute(
                    rows.into_iter()
                        .map(|row| NewTag {
                            name: row.name,
                            color: row.color,
                            slug: row.slug,
                        })
                        .collect(),
                )
                .await
                .map_err(describe)?
        }
    };

    info!(inserted, "seeding finished");
    Ok(())
}

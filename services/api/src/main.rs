use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use foodgram_api::config::ApiConfig;
use foodgram_api::router::build_router;
use foodgram_api::state::AppState;
use foodgram_core::config::Config;
use foodgram_core::tracing::init_tracing;
use foodgram_migration::Migrator;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = ApiConfig::from_env().expect("invalid configuration");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .expect("failed to apply migrations");
        info!("migrations applied");
    }

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret,
        token_ttl_secs: config.token_ttl_secs,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("foodgram api listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}

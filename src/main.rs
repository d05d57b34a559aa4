use std::sync::Arc;

use films::{AppState, config::Config, db, store::FilmStore, uploads::UploadStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,films=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = db::connect_and_migrate(config.database_url.clone()).await?;
    let store = FilmStore::new(db);
    let uploads = UploadStore::new(config.upload_dir.clone());

    let state = Arc::new(AppState { config: config.clone(), store, uploads });
    let app = films::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, upload_dir = %config.upload_dir.display(), "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

//! setlist-web - Setlist builder web service
//!
//! Serves the song CRUD and reorder API with session-cookie
//! authentication, backed by a SQLite database created on first run.

use anyhow::Result;
use clap::Parser;
use setlist_common::{config, db};
use setlist_web::{build_router, AppState};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "setlist-web", about = "Setlist builder web service")]
struct Args {
    /// Data folder holding the database (overrides SETLIST_ROOT)
    #[arg(long)]
    root_folder: Option<String>,

    /// Listen address, e.g. 127.0.0.1:5740 (overrides SETLIST_BIND)
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Build identification before any database delays
    info!(
        "Starting Setlist web service (setlist-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref());
    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = db::init_database(&db_path).await?;

    let state = AppState::new(pool);
    let app = build_router(state);

    let bind = config::resolve_bind(args.bind.as_deref());
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("setlist-web listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app).await?;

    Ok(())
}

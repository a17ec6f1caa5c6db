pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod store;
pub mod upstream;

// Export API types
pub use api::routes::create_router;
pub use api::{AppState, SessionUser, SharedState};

pub use config::AppConfig;
pub use error::{ApiError, ApiResult, Envelope};

// Export store types
pub use store::{InMemoryUserDirectory, PostgresUserDirectory, UserDirectory};

use axum::{serve, Router};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Router with state attached, ready to be served.
pub fn build_app<D: UserDirectory + 'static>(config: AppConfig, directory: D) -> Router {
    let state = Arc::new(AppState::new(config, directory));
    create_router::<D>().with_state(state)
}

/// Serve the application with the user directory the configuration selects.
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    if config.upstream.base_url.is_none() {
        log::warn!(
            "No upstream base URL configured (set {} or FLOWBFF_UPSTREAM__BASE_URL)",
            crate::config::UPSTREAM_URL_ENV
        );
    }

    match config.directory.connection_string.clone() {
        Some(database_url) => {
            log::info!("Connecting to PostgreSQL user directory...");
            let directory = PostgresUserDirectory::new(&database_url).await?;
            serve_app(config, directory).await
        }
        None => {
            let directory = InMemoryUserDirectory::from_users(&config.directory.users);
            log::info!("Using in-memory user directory ({} users)", directory.len());
            serve_app(config, directory).await
        }
    }
}

async fn serve_app<D: UserDirectory + 'static>(config: AppConfig, directory: D) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let app = build_app(config, directory);

    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Flowgraph BFF running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}

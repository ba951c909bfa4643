use axum::{Router, middleware, routing::get};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use provider_session::{
    AuthFlow, FlowConfig, MemoryUserDirectory, SqliteUserDirectory, UserDirectory,
};
use provider_session_axum::{auth_router, require_session};

mod handlers;
mod server;
mod verifier;

use crate::{
    handlers::{index, list_ideas, me},
    server::spawn_http_server,
    verifier::DevVerifier,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    provider_session::init().await?;

    let directory: Arc<dyn UserDirectory> = match std::env::var("DATABASE_URL") {
        Ok(url) => Arc::new(SqliteUserDirectory::connect(&url).await?),
        Err(_) => Arc::new(MemoryUserDirectory::new()),
    };

    let providers = std::env::var("AUTH_PROVIDERS").unwrap_or_else(|_| "google,github".to_string());
    let flow = Arc::new(AuthFlow::new(
        FlowConfig::new(providers.split(',').map(str::trim).map(String::from)),
        Arc::new(DevVerifier),
        directory,
    ));

    let api = Router::new()
        .route("/me", get(me))
        .route("/v1/ideas", get(list_ideas))
        .layer(middleware::from_fn(require_session));

    let app = Router::new()
        .route("/", get(index))
        .nest("/api", api)
        .merge(auth_router(flow));

    let http_server = spawn_http_server(3001, app);
    http_server.await?;
    Ok(())
}

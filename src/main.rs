use anyhow::Result;
use axum::Router;
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

mod config;
mod error;
mod logging;
mod routes;
mod services;

use services::chat_client::ChatClient;
use services::documents::DocumentStore;
use services::excel::types::ActiveAnalysis;
use services::session::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    logging::init_logging()?;

    // Load configuration
    let config = config::load_config()?;

    // Build our application state
    let state = Arc::new(AppState::new(config));

    // Build our application with a route
    let app = Router::new()
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Run it
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// Application state: one dataset at a time, replaced wholesale per upload
pub struct AppState {
    pub config: config::Config,
    pub session: SessionStore,
    pub documents: DocumentStore,
    pub chat: ChatClient,
    pub analysis: RwLock<Option<ActiveAnalysis>>,
}

impl AppState {
    fn new(config: config::Config) -> Self {
        let chat = ChatClient::new(&config.chat_api_url);
        Self {
            config,
            session: SessionStore::new(),
            documents: DocumentStore::with_demo_documents(),
            chat,
            analysis: RwLock::new(None),
        }
    }
}

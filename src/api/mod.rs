use std::{future::Future, sync::Arc, time::Duration};

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub mod auth;
pub mod routes;
pub mod state;

use crate::config::FoodgramConfig;
use crate::utils::error::Result;
use routes::{
    add_favorite_handler, add_to_cart_handler, download_shopping_cart_handler, health_handler,
    ingredients_handler, recipe_handler, recipes_handler, remove_favorite_handler,
    remove_from_cart_handler,
};
use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(state.config.server.cors_max_age_seconds));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/ingredients/", get(ingredients_handler))
        .route("/api/recipes/", get(recipes_handler))
        .route("/api/recipes/{id}/", get(recipe_handler))
        .route(
            "/api/recipes/download_shopping_cart/",
            get(download_shopping_cart_handler),
        )
        .route(
            "/api/recipes/{id}/shopping_cart/",
            post(add_to_cart_handler).delete(remove_from_cart_handler),
        )
        .route(
            "/api/recipes/{id}/favorite/",
            post(add_favorite_handler).delete(remove_favorite_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

pub async fn start_server(config: FoodgramConfig) -> Result<()> {
    info!("Initializing state...");
    let address = config.address();
    let state = AppState::new(config)?;

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    serve(listener, state, shutdown_signal()).await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

//! # Matjar
//!
//! Small storefront backend: a product catalog, customer orders with manual
//! payment proof uploads, and operator confirmation that opens a WhatsApp
//! deep link for the human follow-up message.
//!
//! Everything is a synchronous request/response cycle over one SQLite file
//! and an uploads directory. No background tasks, no queues.
//!
//! ## Surface
//!
//! | Method | Path | Body |
//! |---|---|---|
//! | POST | `/add-product` | multipart: name, price, description, image |
//! | GET | `/products` | — |
//! | DELETE | `/delete-product/{id}` | — |
//! | POST | `/order` | multipart: product, price, name, phone, payment_method, payment_image? |
//! | GET | `/orders` | — |
//! | PUT | `/confirm-order/{id}` | — |
//! | DELETE | `/delete-order/{id}` | — |
//!
//! Uploaded files are served read-only under `/uploads`. CORS is wide open;
//! this is an internal tool paired with its own admin frontend, not a public
//! service.

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod notify;
pub mod routes;
pub mod state;
pub mod uploads;

use config::Config;
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/add-product", post(routes::add_product))
        .route("/products", get(routes::get_products))
        .route("/delete-product/:id", delete(routes::delete_product))
        .route("/order", post(routes::make_order))
        .route("/orders", get(routes::get_orders))
        .route("/confirm-order/:id", put(routes::confirm_order))
        .route("/delete-order/:id", delete(routes::delete_order))
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new(Config::load());

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    let app = app(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

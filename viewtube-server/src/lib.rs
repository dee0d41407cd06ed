use std::net::{Ipv6Addr, SocketAddr};

use axum::{response::IntoResponse, routing::get, Json};
use log::info;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use utoipa::ToSchema;

mod auth;
mod channels;
mod comments;
mod context;
mod docs;
mod errors;
mod schemas;
mod serialized;
mod videos;

pub use context::ServerContext;

pub type Router = axum::Router<ServerContext>;

#[derive(Debug, Serialize, ToSchema)]
struct Health {
    status: &'static str,
    message: &'static str,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, body = Health)
    )
)]
async fn health() -> impl IntoResponse {
    Json(Health {
        status: "ok",
        message: "viewtube API is running",
    })
}

/// Builds the full application router. Exposed separately from
/// [run_server] so tests can drive it without a listener.
pub fn create_app(context: ServerContext) -> axum::Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_router = Router::new()
        .nest("/auth", auth::router())
        .nest("/channels", channels::router())
        .nest("/videos", videos::router())
        .nest("/comments", comments::router())
        .route("/health", get(health));

    Router::new()
        .nest("/api", api_router)
        .route("/api.json", get(docs::docs))
        .layer(cors)
        .with_state(context)
}

/// Starts the viewtube server
pub async fn run_server(context: ServerContext, port: u16) {
    let addr: SocketAddr = (Ipv6Addr::UNSPECIFIED, port).into();

    let listener = TcpListener::bind(&addr).await.expect("listens on address");

    info!("Listening on port {port}.");

    axum::serve(listener, create_app(context).into_make_service())
        .await
        .expect("server runs");
}

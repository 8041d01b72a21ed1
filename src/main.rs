//! The backend for the dev club's member portal.

mod auth;
mod error;
mod models;
mod routes;
mod util;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;

use axum::Extension;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use crate::util::connect_to_db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new("info")),
        )
        .init();

    let pool = connect_to_db().await?;
    sqlx::migrate!().run(&pool).await?;

    let app = routes::router()
        .layer(Extension(pool))
        .layer(CorsLayer::permissive());

    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

mod doc;
mod dtos;
mod error;
mod routes;
mod utils;

use axum::{
    Router,
    routing::{get, post},
};
use database::db::create_connection;
use log::info;
use migration::{Migrator, MigratorTrait};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{doc::ApiDoc, utils::shutdown::shutdown_signal};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let db = create_connection()
        .await
        .expect("Failed to connect to the database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let app = Router::new()
        .route("/health", get(routes::health::health))
        .route("/auth/login", post(routes::auth::login))
        .route("/spaces", get(routes::space::get_spaces))
        .route("/spaces/{id}", get(routes::space::get_space_by_id))
        .route(
            "/reservations",
            post(routes::reservation::create_reservation)
                .get(routes::reservation::get_reservations),
        )
        .route(
            "/reservations/{id}/workflow",
            post(routes::reservation::apply_workflow_action),
        )
        .route(
            "/reservations/{id}/cancel",
            post(routes::reservation::cancel_reservation),
        )
        .route(
            "/users/{id}/reservations",
            get(routes::reservation::get_reservations_for_requester),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await.unwrap();
    info!("Running axum on http://localhost:3001");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

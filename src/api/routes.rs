//! API Routes
//!
//! Configures the Axum router with all player endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_player_handler, delete_player_handler, export_players_handler, get_player_handler,
    health_handler, import_players_handler, list_players_handler, stats_handler,
    update_player_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /players` - List every player
/// - `POST /players` - Create a player
/// - `GET /players/:id` - Read a player (cached)
/// - `PUT /players/:id` - Update a player
/// - `DELETE /players/:id` - Delete a player
/// - `POST /players/import` - Bulk import from a CSV file
/// - `POST /players/export` - Bulk export to a JSON file
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/players",
            get(list_players_handler).post(create_player_handler),
        )
        .route("/players/import", post(import_players_handler))
        .route("/players/export", post(export_players_handler))
        .route(
            "/players/:id",
            get(get_player_handler)
                .put(update_player_handler)
                .delete(delete_player_handler),
        )
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use axum::{extract::State, routing::post, Json, Router};

use crate::dto::search_dto::{SearchBusesRequest, SearchBusesResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_passenger_router() -> Router<AppState> {
    Router::new().route("/search-buses", post(search_buses))
}

/// ¿Qué autobuses vienen hacia mi destino / mi parada?
async fn search_buses(
    State(state): State<AppState>,
    Json(request): Json<SearchBusesRequest>,
) -> Result<Json<SearchBusesResponse>, AppError> {
    let results = state.search.search_buses(request).await?;
    Ok(Json(results))
}

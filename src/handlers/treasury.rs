// src/handlers/treasury.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentPrincipal,
    models::stats::TreasuryStats,
    services::access::{self, Action},
};

// GET /api/treasury/stats
#[utoipa::path(
    get,
    path = "/api/treasury/stats",
    tag = "Treasury",
    responses(
        (status = 200, description = "Indicadores da tesouraria (recebido vs. a receber)", body = TreasuryStats),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<impl IntoResponse, AppError> {
    access::authorize(&principal, Action::ReadDashboardStats)?;

    let stats = app_state.stats_service.treasury().await?;

    Ok((StatusCode::OK, Json(stats)))
}

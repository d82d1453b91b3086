// src/handlers/registrations.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentPrincipal,
    models::registration::{
        CreateRegistrationPayload, ListRegistrationsParams, Registration, RegistrationPage,
        UpdateRegistrationPayload,
    },
    services::access::{self, Action},
};

// POST /api/registrations
#[utoipa::path(
    post,
    path = "/api/registrations",
    tag = "Registrations",
    request_body = CreateRegistrationPayload,
    responses(
        (status = 201, description = "Inscrição criada", body = Registration),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_registration(
    State(app_state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Json(payload): Json<CreateRegistrationPayload>,
) -> Result<impl IntoResponse, AppError> {
    // Inscrição pública: permitida inclusive para anônimos
    access::authorize(&principal, Action::CreateRegistration)?;

    let registration = app_state.registration_service.create(payload).await?;

    Ok((StatusCode::CREATED, Json(registration)))
}

// GET /api/registrations
#[utoipa::path(
    get,
    path = "/api/registrations",
    tag = "Registrations",
    params(ListRegistrationsParams),
    responses(
        (status = 200, description = "Página de inscrições", body = RegistrationPage),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_registrations(
    State(app_state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Query(params): Query<ListRegistrationsParams>,
) -> Result<impl IntoResponse, AppError> {
    access::authorize(&principal, Action::ListRegistrations)?;

    let page = app_state.registration_service.list(params).await?;

    Ok((StatusCode::OK, Json(page)))
}

// GET /api/registrations/{id}
#[utoipa::path(
    get,
    path = "/api/registrations/{id}",
    tag = "Registrations",
    params(("id" = Uuid, Path, description = "ID da inscrição")),
    responses(
        (status = 200, description = "Inscrição encontrada", body = Registration),
        (status = 404, description = "Inscrição não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_registration(
    State(app_state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    access::authorize(&principal, Action::ReadRegistration)?;

    let registration = app_state.registration_service.get(id).await?;

    Ok((StatusCode::OK, Json(registration)))
}

// PUT /api/registrations/{id}
#[utoipa::path(
    put,
    path = "/api/registrations/{id}",
    tag = "Registrations",
    params(("id" = Uuid, Path, description = "ID da inscrição")),
    request_body = UpdateRegistrationPayload,
    responses(
        (status = 200, description = "Inscrição atualizada", body = Registration),
        (status = 400, description = "Dados inválidos ou pagamento incompleto"),
        (status = 404, description = "Inscrição não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_registration(
    State(app_state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRegistrationPayload>,
) -> Result<impl IntoResponse, AppError> {
    access::authorize(&principal, Action::UpdateRegistration)?;

    let registration = app_state.registration_service.update(id, payload).await?;

    Ok((StatusCode::OK, Json(registration)))
}

// DELETE /api/registrations/{id}
#[utoipa::path(
    delete,
    path = "/api/registrations/{id}",
    tag = "Registrations",
    params(("id" = Uuid, Path, description = "ID da inscrição")),
    responses(
        (status = 200, description = "Inscrição excluída"),
        (status = 404, description = "Inscrição não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_registration(
    State(app_state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    access::authorize(&principal, Action::DeleteRegistration)?;

    app_state.registration_service.delete(id).await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Inscrição excluída com sucesso." })),
    ))
}

// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{common::error::AppError, config::AppState, services::access::Principal};

/// Resolve o ator da requisição a partir do header Authorization e o
/// insere nos "extensions". Sem token, token inválido ou conta
/// desativada, o ator é `Anonymous` — a decisão de acesso acontece
/// depois, no topo de cada handler.
pub async fn principal_middleware(
    State(app_state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = match bearer {
        Some(TypedHeader(authorization)) => {
            app_state
                .auth_service
                .resolve_principal(authorization.token())
                .await?
        }
        None => Principal::Anonymous,
    };

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

// Extrator para obter o principal diretamente nos handlers
pub struct CurrentPrincipal(pub Principal);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .map(CurrentPrincipal)
            .ok_or(AppError::InvalidToken)
    }
}

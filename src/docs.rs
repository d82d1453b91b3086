// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Registrations ---
        handlers::registrations::create_registration,
        handlers::registrations::list_registrations,
        handlers::registrations::get_registration,
        handlers::registrations::update_registration,
        handlers::registrations::delete_registration,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Dashboard / Treasury ---
        handlers::dashboard::get_stats,
        handlers::treasury::get_stats,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::CreateUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::AuthResponse,

            // --- Registrations ---
            models::registration::ApplicantType,
            models::registration::StandType,
            models::registration::ElectricityType,
            models::registration::ProductCategory,
            models::registration::RegistrationStatus,
            models::registration::PaymentMethod,
            models::registration::StatusFilter,
            models::registration::Registration,
            models::registration::CreateRegistrationPayload,
            models::registration::UpdateRegistrationPayload,
            models::registration::Pagination,
            models::registration::RegistrationPage,

            // --- Stats ---
            models::stats::CategoryBreakdown,
            models::stats::ApplicantBreakdown,
            models::stats::DashboardStats,
            models::stats::TreasuryStats,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação dos usuários administrativos"),
        (name = "Registrations", description = "Inscrições de bancas (ficha pública e gestão)"),
        (name = "Users", description = "Gestão de contas (apenas administradores)"),
        (name = "Dashboard", description = "Indicadores do painel"),
        (name = "Treasury", description = "Tesouraria: recebido vs. a receber")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::principal_middleware;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (login é público; /me exige token)
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::get_me));

    // Inscrições: o POST é a ficha pública; o restante exige sessão,
    // verificada pela decisão de acesso no topo de cada handler
    let registration_routes = Router::new()
        .route(
            "/",
            post(handlers::registrations::create_registration)
                .get(handlers::registrations::list_registrations),
        )
        .route(
            "/{id}",
            get(handlers::registrations::get_registration)
                .put(handlers::registrations::update_registration)
                .delete(handlers::registrations::delete_registration),
        );

    // Gestão de usuários (apenas administradores)
    let user_routes = Router::new()
        .route(
            "/",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        );

    let dashboard_routes = Router::new().route("/stats", get(handlers::dashboard::get_stats));
    let treasury_routes = Router::new().route("/stats", get(handlers::treasury::get_stats));

    // Combina tudo no router principal. O middleware de principal roda
    // em todas as rotas e apenas identifica o ator; quem nega é o handler.
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/registrations", registration_routes)
        .nest("/api/users", user_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/treasury", treasury_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            principal_middleware,
        ))
        .with_state(app_state);

    // Inicia o servidor
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}

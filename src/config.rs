// src/config.rs

use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{RegistrationRepository, UserRepository},
    services::{
        auth::AuthService, registration_service::RegistrationService,
        stats_service::StatsService, user_service::UserService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub registration_service: RegistrationService,
    pub user_service: UserService,
    pub stats_service: StatsService,
}

impl AppState {
    // Carrega as configurações do ambiente e monta o grafo de dependências
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let user_repo = UserRepository::new(db_pool.clone());
        let registration_repo = RegistrationRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret.clone());
        let user_service = UserService::new(user_repo);
        let registration_service = RegistrationService::new(registration_repo.clone());
        let stats_service = StatsService::new(registration_repo);

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            registration_service,
            user_service,
            stats_service,
        })
    }
}

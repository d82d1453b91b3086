// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User},
    services::access::Principal,
};

// Executa o hashing em um thread separado para não bloquear o runtime
pub(crate) async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))?
        .map_err(AppError::BcryptError)
}

async fn verify_password(password: String, password_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?
        .map_err(AppError::BcryptError)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    /// Autentica por e-mail e senha. Contas desativadas não entram.
    /// Carimba `last_login` a cada login bem-sucedido.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let is_password_valid =
            verify_password(password.to_owned(), user.password_hash.clone()).await?;
        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let user = self.user_repo.touch_last_login(user.id).await?;
        let token = self.create_token(user.id)?;
        Ok((token, user))
    }

    /// Resolve o ator da requisição a partir do token Bearer.
    /// Token inválido/expirado, usuário desconhecido ou conta desativada
    /// viram `Anonymous`; só erros de infraestrutura são propagados.
    pub async fn resolve_principal(&self, token: &str) -> Result<Principal, AppError> {
        let validation = Validation::default();
        let token_data = match decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        ) {
            Ok(data) => data,
            Err(_) => return Ok(Principal::Anonymous),
        };

        match self.user_repo.find_by_id(token_data.claims.sub).await? {
            Some(user) => Ok(Principal::from_user(&user)),
            None => Ok(Principal::Anonymous),
        }
    }

    /// Carrega o usuário por trás de um principal autenticado.
    pub async fn current_user(&self, principal: &Principal) -> Result<User, AppError> {
        let id = principal.id().ok_or(AppError::InvalidToken)?;
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

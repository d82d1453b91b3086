// src/services/user_service.rs

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{CreateUserPayload, UpdateUserPayload, User},
    services::{
        access::{self, Principal},
        auth::hash_password,
    },
};

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.repo.find_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<User, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::UserNotFound)
    }

    /// Criação de conta por um administrador. E-mail duplicado vira 409.
    pub async fn create(&self, payload: CreateUserPayload) -> Result<User, AppError> {
        payload.validate()?;
        let password_hash = hash_password(payload.password.clone()).await?;
        self.repo.create(&payload, &password_hash).await
    }

    /// Atualização parcial. A autoproteção impede que o próprio
    /// principal desative a sua conta, qualquer que seja o papel.
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        payload: UpdateUserPayload,
    ) -> Result<User, AppError> {
        payload.validate()?;
        access::ensure_not_self_deactivation(principal, id, payload.is_active)?;

        let mut user = self.get(id).await?;

        if let Some(name) = payload.name {
            user.name = name;
        }
        if let Some(email) = payload.email {
            user.email = email;
        }
        if let Some(role) = payload.role {
            user.role = role;
        }
        if let Some(is_active) = payload.is_active {
            user.is_active = is_active;
        }
        // Troca de senha refaz o hash; o restante do registro segue igual
        if let Some(password) = payload.password {
            user.password_hash = hash_password(password).await?;
        }

        self.repo.update(&user).await
    }

    /// Exclusão definitiva. Ninguém exclui a própria conta.
    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), AppError> {
        access::ensure_not_self_deletion(principal, id)?;

        let deleted = self.repo.delete_by_id(id).await?;
        if deleted == 0 {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }
}

// src/services/stats_service.rs

use crate::{
    common::error::AppError,
    db::RegistrationRepository,
    models::stats::{DashboardStats, TreasuryStats},
};

// Reduções puras sobre o conjunto completo de inscrições,
// recalculadas a cada leitura (sem cache).
#[derive(Clone)]
pub struct StatsService {
    repo: RegistrationRepository,
}

impl StatsService {
    pub fn new(repo: RegistrationRepository) -> Self {
        Self { repo }
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, AppError> {
        let registrations = self.repo.find_all().await?;
        Ok(DashboardStats::from_registrations(&registrations))
    }

    pub async fn treasury(&self) -> Result<TreasuryStats, AppError> {
        let registrations = self.repo.find_all().await?;
        Ok(TreasuryStats::from_registrations(&registrations))
    }
}

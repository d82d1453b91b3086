// src/services/registration_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::RegistrationRepository,
    models::registration::{
        CreateRegistrationPayload, ListRegistrationsParams, Pagination, Registration,
        RegistrationPage, RegistrationStatus, UpdateRegistrationPayload, compute_fee,
    },
};

#[derive(Clone)]
pub struct RegistrationService {
    repo: RegistrationRepository,
}

impl RegistrationService {
    pub fn new(repo: RegistrationRepository) -> Self {
        Self { repo }
    }

    /// Inscrição pública: valida a ficha, calcula a taxa no servidor
    /// e insere com status `pending`.
    pub async fn create(&self, payload: CreateRegistrationPayload) -> Result<Registration, AppError> {
        payload.validate_full()?;
        let total_fee = compute_fee(payload.stand_length);
        self.repo.insert(&payload, total_fee).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Registration, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::RegistrationNotFound)
    }

    pub async fn list(&self, params: ListRegistrationsParams) -> Result<RegistrationPage, AppError> {
        let (registrations, total) = self.repo.list(&params).await?;
        Ok(RegistrationPage {
            registrations,
            pagination: Pagination::new(params.page(), params.limit(), total),
        })
    }

    /// Atualização (correção administrativa, edição do requerente ou
    /// registro de pagamento). O registro mesclado é persistido em um
    /// único UPDATE: status e taxa nunca ficam inconsistentes.
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateRegistrationPayload,
    ) -> Result<Registration, AppError> {
        let current = self.get(id).await?;
        let next = apply_patch(&current, patch)?;
        self.repo.update(&next).await
    }

    /// Exclusão definitiva, por ação administrativa explícita.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = self.repo.delete_by_id(id).await?;
        if deleted == 0 {
            return Err(AppError::RegistrationNotFound);
        }
        Ok(())
    }
}

/// Máquina de estados da inscrição: mescla o patch sobre o registro
/// atual, revalida as invariantes no resultado, exige método e data de
/// pagamento na transição para `paid` e recalcula a taxa a partir do
/// comprimento final. Qualquer correção de status é permitida, inclusive
/// para trás.
pub(crate) fn apply_patch(
    current: &Registration,
    patch: UpdateRegistrationPayload,
) -> Result<Registration, AppError> {
    let mut next = current.clone();

    if let Some(v) = patch.applicant_type {
        next.applicant_type = v;
    }
    if let Some(v) = patch.company_name {
        next.company_name = Some(v);
    }
    if let Some(v) = patch.first_name {
        next.first_name = v;
    }
    if let Some(v) = patch.last_name {
        next.last_name = v;
    }
    if let Some(v) = patch.birth_date {
        next.birth_date = v;
    }
    if let Some(v) = patch.birth_place {
        next.birth_place = v;
    }
    if let Some(v) = patch.address {
        next.address = v;
    }
    if let Some(v) = patch.postal_code {
        next.postal_code = v;
    }
    if let Some(v) = patch.city {
        next.city = v;
    }
    if let Some(v) = patch.phone {
        next.phone = v;
    }
    if let Some(v) = patch.email {
        next.email = v;
    }
    if let Some(v) = patch.product_type {
        next.product_type = v;
    }
    if let Some(v) = patch.stand_length {
        next.stand_length = v;
    }
    if let Some(v) = patch.stand_depth {
        next.stand_depth = v;
    }
    if let Some(v) = patch.stand_type {
        next.stand_type = v;
    }
    if let Some(v) = patch.electricity_needed {
        next.electricity_needed = v;
    }
    if let Some(v) = patch.electricity_type {
        next.electricity_type = Some(v);
    }
    if let Some(v) = patch.electricity_watts {
        next.electricity_watts = Some(v);
    }
    if let Some(v) = patch.water {
        next.water = v;
    }
    if let Some(v) = patch.product_category {
        next.product_category = v;
    }
    if let Some(v) = patch.artisanal_type {
        next.artisanal_type = Some(v);
    }
    if let Some(v) = patch.demonstration {
        next.demonstration = v;
    }
    if let Some(v) = patch.remarks {
        next.remarks = Some(v);
    }
    if let Some(v) = patch.insurance_doc {
        next.insurance_doc = Some(v);
    }
    if let Some(v) = patch.stand_photos {
        next.stand_photos = Some(v);
    }
    if let Some(v) = patch.product_list {
        next.product_list = Some(v);
    }
    if let Some(v) = patch.status {
        next.status = v;
    }
    // Número da banca independe do status
    if let Some(v) = patch.stand_number {
        next.stand_number = Some(v);
    }
    if let Some(v) = patch.payment_date {
        next.payment_date = Some(v);
    }
    if let Some(v) = patch.payment_method {
        next.payment_method = Some(v);
    }
    if let Some(v) = patch.payment_reference {
        next.payment_reference = Some(v);
    }

    next.validate_rules()?;

    // `paid` exige método e data de pagamento; a referência é opcional
    if next.status == RegistrationStatus::Paid
        && (next.payment_method.is_none() || next.payment_date.is_none())
    {
        return Err(AppError::MissingPaymentInfo);
    }

    next.total_fee = compute_fee(next.stand_length);

    Ok(next)
}

// src/db/registration_repo.rs

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::registration::{CreateRegistrationPayload, ListRegistrationsParams, Registration},
};

// O repositório de inscrições, responsável por todas as interações
// com a tabela 'registrations'
#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>, AppError> {
        let maybe_registration =
            sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_registration)
    }

    // Conjunto completo, para as reduções de estatísticas
    pub async fn find_all(&self) -> Result<Vec<Registration>, AppError> {
        let registrations = sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(registrations)
    }

    /// Listagem filtrada e paginada. Retorna a página e o total
    /// (para o cálculo de páginas no chamador).
    pub async fn list(
        &self,
        params: &ListRegistrationsParams,
    ) -> Result<(Vec<Registration>, i64), AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM registrations");
        push_filters(&mut count_query, params);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut query = QueryBuilder::new("SELECT * FROM registrations");
        push_filters(&mut query, params);
        // Mais recentes primeiro; desempate determinístico por id
        query.push(" ORDER BY created_at DESC, id DESC");
        query.push(" LIMIT ");
        query.push_bind(params.limit());
        query.push(" OFFSET ");
        query.push_bind(params.offset());

        let registrations = query
            .build_query_as::<Registration>()
            .fetch_all(&self.pool)
            .await?;

        Ok((registrations, total))
    }

    pub async fn insert(
        &self,
        payload: &CreateRegistrationPayload,
        total_fee: Decimal,
    ) -> Result<Registration, AppError> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (
                applicant_type, company_name, first_name, last_name,
                birth_date, birth_place,
                address, postal_code, city, phone, email,
                product_type, stand_length, stand_depth, stand_type,
                electricity_needed, electricity_type, electricity_watts, water,
                product_category, artisanal_type, demonstration, remarks,
                insurance_doc, stand_photos, product_list,
                total_fee
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27
            )
            RETURNING *
            "#,
        )
        .bind(payload.applicant_type)
        .bind(&payload.company_name)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(payload.birth_date)
        .bind(&payload.birth_place)
        .bind(&payload.address)
        .bind(&payload.postal_code)
        .bind(&payload.city)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(&payload.product_type)
        .bind(payload.stand_length)
        .bind(payload.stand_depth)
        .bind(payload.stand_type)
        .bind(payload.electricity_needed)
        .bind(payload.electricity_type)
        .bind(payload.electricity_watts)
        .bind(payload.water)
        .bind(payload.product_category)
        .bind(&payload.artisanal_type)
        .bind(payload.demonstration)
        .bind(&payload.remarks)
        .bind(&payload.insurance_doc)
        .bind(&payload.stand_photos)
        .bind(&payload.product_list)
        .bind(total_fee)
        .fetch_one(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Persiste o registro mesclado em um único UPDATE.
    pub async fn update(&self, registration: &Registration) -> Result<Registration, AppError> {
        let updated = sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations SET
                applicant_type = $2, company_name = $3, first_name = $4,
                last_name = $5, birth_date = $6, birth_place = $7,
                address = $8, postal_code = $9, city = $10, phone = $11,
                email = $12, product_type = $13, stand_length = $14,
                stand_depth = $15, stand_type = $16,
                electricity_needed = $17, electricity_type = $18,
                electricity_watts = $19, water = $20,
                product_category = $21, artisanal_type = $22,
                demonstration = $23, remarks = $24,
                insurance_doc = $25, stand_photos = $26, product_list = $27,
                status = $28, stand_number = $29, total_fee = $30,
                payment_date = $31, payment_method = $32,
                payment_reference = $33,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(registration.id)
        .bind(registration.applicant_type)
        .bind(&registration.company_name)
        .bind(&registration.first_name)
        .bind(&registration.last_name)
        .bind(registration.birth_date)
        .bind(&registration.birth_place)
        .bind(&registration.address)
        .bind(&registration.postal_code)
        .bind(&registration.city)
        .bind(&registration.phone)
        .bind(&registration.email)
        .bind(&registration.product_type)
        .bind(registration.stand_length)
        .bind(registration.stand_depth)
        .bind(registration.stand_type)
        .bind(registration.electricity_needed)
        .bind(registration.electricity_type)
        .bind(registration.electricity_watts)
        .bind(registration.water)
        .bind(registration.product_category)
        .bind(&registration.artisanal_type)
        .bind(registration.demonstration)
        .bind(&registration.remarks)
        .bind(&registration.insurance_doc)
        .bind(&registration.stand_photos)
        .bind(&registration.product_list)
        .bind(registration.status)
        .bind(&registration.stand_number)
        .bind(registration.total_fee)
        .bind(registration.payment_date)
        .bind(registration.payment_method)
        .bind(&registration.payment_reference)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or(AppError::RegistrationNotFound)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

// Traduz os filtros de listagem para a cláusula WHERE.
// Usada tanto na consulta de contagem quanto na de página.
fn push_filters<'args>(
    qb: &mut QueryBuilder<'args, Postgres>,
    params: &'args ListRegistrationsParams,
) {
    let mut has_where = false;

    if let Some(status) = params.status() {
        qb.push(" WHERE status = ");
        qb.push_bind(status);
        has_where = true;
    }

    if let Some(search) = params.search() {
        let pattern = format!("%{}%", search);
        qb.push(if has_where { " AND (" } else { " WHERE (" });
        qb.push("first_name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR last_name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR email ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR company_name ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registration::StatusFilter;

    #[test]
    fn no_filters_yields_bare_query() {
        let params = ListRegistrationsParams::default();
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM registrations");
        push_filters(&mut qb, &params);
        assert_eq!(qb.sql(), "SELECT * FROM registrations");
    }

    #[test]
    fn status_filter_becomes_equality() {
        let params = ListRegistrationsParams {
            status: Some(StatusFilter::Approved),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM registrations");
        push_filters(&mut qb, &params);
        assert_eq!(qb.sql(), "SELECT * FROM registrations WHERE status = $1");
    }

    #[test]
    fn search_spans_the_four_identity_fields() {
        let params = ListRegistrationsParams {
            search: Some("alice".into()),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM registrations");
        push_filters(&mut qb, &params);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM registrations WHERE (first_name ILIKE $1 \
             OR last_name ILIKE $2 OR email ILIKE $3 OR company_name ILIKE $4)"
        );
    }

    #[test]
    fn status_and_search_are_combined_with_and() {
        let params = ListRegistrationsParams {
            status: Some(StatusFilter::Pending),
            search: Some("dupont".into()),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM registrations");
        push_filters(&mut qb, &params);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM registrations WHERE status = $1 AND (first_name ILIKE $2 \
             OR last_name ILIKE $3 OR email ILIKE $4 OR company_name ILIKE $5)"
        );
    }

    #[test]
    fn status_all_adds_no_clause() {
        let params = ListRegistrationsParams {
            status: Some(StatusFilter::All),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM registrations");
        push_filters(&mut qb, &params);
        assert_eq!(qb.sql(), "SELECT * FROM registrations");
    }
}

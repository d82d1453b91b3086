// src/models/stats.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::registration::{
    ApplicantType, ProductCategory, Registration, RegistrationStatus,
};

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub flea_market: i64,
    pub artisanal: i64,
}

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantBreakdown {
    pub company: i64,
    pub association: i64,
    pub private: i64,
}

// Cards do painel administrativo.
// `total_revenue` soma a taxa de TODAS as inscrições (receita potencial);
// a visão da tesouraria soma apenas as pagas. As duas definições são
// intencionalmente distintas.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_registrations: i64,
    pub pending_registrations: i64,
    pub approved_registrations: i64,
    pub rejected_registrations: i64,
    pub paid_registrations: i64,

    #[schema(value_type = f64)]
    pub total_revenue: Decimal,

    // Média de comprimento × profundidade; 0 quando não há inscrições
    #[schema(value_type = f64)]
    pub average_stand_size: Decimal,

    pub registrations_by_category: CategoryBreakdown,
    pub registrations_by_type: ApplicantBreakdown,
}

impl DashboardStats {
    /// Redução pura sobre o conjunto completo de inscrições.
    pub fn from_registrations(registrations: &[Registration]) -> Self {
        let mut pending = 0;
        let mut approved = 0;
        let mut rejected = 0;
        let mut paid = 0;
        let mut total_revenue = Decimal::ZERO;
        let mut area_sum = Decimal::ZERO;
        let mut by_category = CategoryBreakdown::default();
        let mut by_type = ApplicantBreakdown::default();

        for r in registrations {
            match r.status {
                RegistrationStatus::Pending => pending += 1,
                RegistrationStatus::Approved => approved += 1,
                RegistrationStatus::Rejected => rejected += 1,
                RegistrationStatus::Paid => paid += 1,
            }

            total_revenue += r.total_fee;
            area_sum += r.stand_length * r.stand_depth;

            match r.product_category {
                ProductCategory::FleaMarket => by_category.flea_market += 1,
                ProductCategory::Artisanal => by_category.artisanal += 1,
            }
            match r.applicant_type {
                ApplicantType::Company => by_type.company += 1,
                ApplicantType::Association => by_type.association += 1,
                ApplicantType::Private => by_type.private += 1,
            }
        }

        let count = registrations.len() as i64;
        let average_stand_size = if count == 0 {
            Decimal::ZERO
        } else {
            area_sum / Decimal::from(count)
        };

        Self {
            total_registrations: count,
            pending_registrations: pending,
            approved_registrations: approved,
            rejected_registrations: rejected,
            paid_registrations: paid,
            total_revenue,
            average_stand_size,
            registrations_by_category: by_category,
            registrations_by_type: by_type,
        }
    }
}

// Visão da tesouraria: recebido vs. a receber.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryStats {
    pub total_registrations: i64,
    pub paid_registrations: i64,

    // Inscrições aprovadas aguardando pagamento
    pub pending_payments: i64,

    // Soma das taxas já pagas
    #[schema(value_type = f64)]
    pub total_revenue: Decimal,

    // Soma das taxas aprovadas + pagas
    #[schema(value_type = f64)]
    pub expected_revenue: Decimal,

    // Soma das taxas aprovadas ainda não pagas
    #[schema(value_type = f64)]
    pub outstanding_amount: Decimal,
}

impl TreasuryStats {
    pub fn from_registrations(registrations: &[Registration]) -> Self {
        let mut paid = 0;
        let mut pending_payments = 0;
        let mut total_revenue = Decimal::ZERO;
        let mut outstanding = Decimal::ZERO;

        for r in registrations {
            match r.status {
                RegistrationStatus::Paid => {
                    paid += 1;
                    total_revenue += r.total_fee;
                }
                RegistrationStatus::Approved => {
                    pending_payments += 1;
                    outstanding += r.total_fee;
                }
                _ => {}
            }
        }

        Self {
            total_registrations: registrations.len() as i64,
            paid_registrations: paid,
            pending_payments,
            total_revenue,
            expected_revenue: total_revenue + outstanding,
            outstanding_amount: outstanding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registration::{StandType, compute_fee};
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn registration(status: RegistrationStatus, length: i64, depth: i64) -> Registration {
        let stand_length = Decimal::from(length);
        Registration {
            id: Uuid::new_v4(),
            applicant_type: ApplicantType::Private,
            company_name: None,
            first_name: "Alice".into(),
            last_name: "Dupont".into(),
            birth_date: NaiveDate::from_ymd_opt(1985, 4, 12).unwrap(),
            birth_place: "Lille".into(),
            address: "12 rue des Lilas".into(),
            postal_code: "59000".into(),
            city: "Lille".into(),
            phone: "+33612345678".into(),
            email: "alice@example.com".into(),
            product_type: "Livres anciens".into(),
            stand_length,
            stand_depth: Decimal::from(depth),
            stand_type: StandType::Tent,
            electricity_needed: false,
            electricity_type: None,
            electricity_watts: None,
            water: false,
            product_category: ProductCategory::FleaMarket,
            artisanal_type: None,
            demonstration: false,
            remarks: None,
            insurance_doc: None,
            stand_photos: None,
            product_list: None,
            status,
            stand_number: None,
            total_fee: compute_fee(stand_length),
            payment_date: None,
            payment_method: None,
            payment_reference: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_set_yields_zeros_without_division_error() {
        let stats = DashboardStats::from_registrations(&[]);
        assert_eq!(stats.total_registrations, 0);
        assert_eq!(stats.average_stand_size, Decimal::ZERO);
        assert_eq!(stats.total_revenue, Decimal::ZERO);

        let treasury = TreasuryStats::from_registrations(&[]);
        assert_eq!(treasury.total_revenue, Decimal::ZERO);
        assert_eq!(treasury.outstanding_amount, Decimal::ZERO);
    }

    #[test]
    fn dashboard_revenue_sums_all_statuses() {
        // paid: 10m -> 70, approved: 5m -> 35, pending: 2m -> 14
        let regs = vec![
            registration(RegistrationStatus::Paid, 10, 2),
            registration(RegistrationStatus::Approved, 5, 2),
            registration(RegistrationStatus::Pending, 2, 2),
        ];
        let stats = DashboardStats::from_registrations(&regs);
        assert_eq!(stats.total_registrations, 3);
        assert_eq!(stats.paid_registrations, 1);
        assert_eq!(stats.approved_registrations, 1);
        assert_eq!(stats.pending_registrations, 1);
        assert_eq!(stats.total_revenue, Decimal::from(70 + 35 + 14));
    }

    #[test]
    fn treasury_separates_collected_from_outstanding() {
        // paid: 10m -> 70, approved: 5m -> 35, pending ignorada
        let regs = vec![
            registration(RegistrationStatus::Paid, 10, 2),
            registration(RegistrationStatus::Approved, 5, 2),
            registration(RegistrationStatus::Pending, 2, 2),
        ];
        let treasury = TreasuryStats::from_registrations(&regs);
        assert_eq!(treasury.total_revenue, Decimal::from(70));
        assert_eq!(treasury.outstanding_amount, Decimal::from(35));
        assert_eq!(treasury.expected_revenue, Decimal::from(105));
        assert_eq!(treasury.paid_registrations, 1);
        assert_eq!(treasury.pending_payments, 1);
    }

    #[test]
    fn average_stand_size_is_mean_of_areas() {
        // áreas 20 e 10 -> média 15
        let regs = vec![
            registration(RegistrationStatus::Pending, 10, 2),
            registration(RegistrationStatus::Pending, 5, 2),
        ];
        let stats = DashboardStats::from_registrations(&regs);
        assert_eq!(stats.average_stand_size, Decimal::from(15));
    }

    #[test]
    fn breakdowns_count_category_and_applicant_type() {
        let mut artisan = registration(RegistrationStatus::Pending, 3, 2);
        artisan.product_category = ProductCategory::Artisanal;
        artisan.artisanal_type = Some("Poterie".into());

        let mut company = registration(RegistrationStatus::Pending, 3, 2);
        company.applicant_type = ApplicantType::Company;
        company.company_name = Some("Crêperie du Nord".into());

        let regs = vec![registration(RegistrationStatus::Pending, 3, 2), artisan, company];
        let stats = DashboardStats::from_registrations(&regs);
        assert_eq!(stats.registrations_by_category.flea_market, 2);
        assert_eq!(stats.registrations_by_category.artisanal, 1);
        assert_eq!(stats.registrations_by_type.private, 2);
        assert_eq!(stats.registrations_by_type.company, 1);
        assert_eq!(stats.registrations_by_type.association, 0);
    }
}

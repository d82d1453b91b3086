// src/models/registration.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

// Taxa fixa cobrada por metro de frente de banca (em euros).
pub const FEE_PER_METER: u32 = 7;

// Tamanho de página padrão das listagens.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Calcula a taxa devida a partir do comprimento da banca.
/// Sempre recalculada no servidor; nunca aceita do cliente.
pub fn compute_fee(stand_length: Decimal) -> Decimal {
    stand_length * Decimal::from(FEE_PER_METER)
}

// --- Enums (mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "applicant_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicantType {
    Company,
    Association,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "stand_type", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum StandType {
    Tent,
    CarStand,         // exige no mínimo 6 m de frente
    CarTrailerStand,  // exige no mínimo 9 m de frente
    SalesVehicle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "electricity_type")]
pub enum ElectricityType {
    #[sqlx(rename = "240v-lighting")]
    #[serde(rename = "240v-lighting")]
    Lighting240v,

    #[sqlx(rename = "240v-high")]
    #[serde(rename = "240v-high")]
    High240v,

    #[sqlx(rename = "400v")]
    #[serde(rename = "400v")]
    ThreePhase400v,
}

impl ElectricityType {
    // Ligações de potência exigem a carga declarada em watts.
    pub fn requires_watts(self) -> bool {
        matches!(self, ElectricityType::High240v | ElectricityType::ThreePhase400v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_category", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum ProductCategory {
    FleaMarket,
    Artisanal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "registration_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    Cash,
    Check,
    CreditCard,
    Paypal,
}

// --- Model ---

// Representa uma inscrição vinda do banco de dados.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,

    // Requerente
    pub applicant_type: ApplicantType,
    pub company_name: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub birth_place: String,

    // Contato
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub phone: String,
    pub email: String,

    // Banca
    pub product_type: String,
    pub stand_length: Decimal,
    pub stand_depth: Decimal,
    pub stand_type: StandType,

    // Utilidades
    pub electricity_needed: bool,
    pub electricity_type: Option<ElectricityType>,
    pub electricity_watts: Option<i32>,
    pub water: bool,

    // Categorização
    pub product_category: ProductCategory,
    pub artisanal_type: Option<String>,
    pub demonstration: bool,
    pub remarks: Option<String>,

    // Documentos anexados (caminhos/URLs; o upload em si fica fora daqui)
    pub insurance_doc: Option<String>,
    pub stand_photos: Option<Vec<String>>,
    pub product_list: Option<String>,

    // Administrativo
    pub status: RegistrationStatus,
    pub stand_number: Option<String>,
    pub total_fee: Decimal,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_reference: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    /// Revalida as invariantes condicionais sobre o registro completo
    /// (usado após mesclar um patch de atualização).
    pub fn validate_rules(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.first_name.trim().is_empty() {
            errors.add("firstName", rule_error("required", "O nome é obrigatório."));
        }
        if self.last_name.trim().is_empty() {
            errors.add("lastName", rule_error("required", "O sobrenome é obrigatório."));
        }
        if !self.email.validate_email() {
            errors.add("email", rule_error("email", "O e-mail fornecido é inválido."));
        }

        collect_rule_errors(&mut errors, &self.rule_view());

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    fn rule_view(&self) -> RuleView<'_> {
        RuleView {
            applicant_type: self.applicant_type,
            company_name: self.company_name.as_deref(),
            stand_length: self.stand_length,
            stand_depth: self.stand_depth,
            stand_type: self.stand_type,
            electricity_needed: self.electricity_needed,
            electricity_type: self.electricity_type,
            electricity_watts: self.electricity_watts,
            product_category: self.product_category,
            artisanal_type: self.artisanal_type.as_deref(),
        }
    }
}

// --- Payloads ---

// Dados da ficha pública de inscrição.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistrationPayload {
    pub applicant_type: ApplicantType,

    #[schema(example = "Crêperie du Nord")]
    pub company_name: Option<String>,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub first_name: String,

    #[validate(length(min = 1, message = "O sobrenome é obrigatório."))]
    pub last_name: String,

    #[schema(value_type = String, format = Date, example = "1985-04-12")]
    pub birth_date: NaiveDate,

    #[validate(length(min = 1, message = "O local de nascimento é obrigatório."))]
    pub birth_place: String,

    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    pub address: String,

    #[validate(length(min = 1, message = "O código postal é obrigatório."))]
    pub postal_code: String,

    #[validate(length(min = 1, message = "A cidade é obrigatória."))]
    pub city: String,

    #[validate(length(min = 1, message = "O telefone é obrigatório."))]
    pub phone: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 1, message = "O tipo de produto é obrigatório."))]
    pub product_type: String,

    #[schema(value_type = f64, example = 6.0)]
    pub stand_length: Decimal,

    #[schema(value_type = f64, example = 2.5)]
    pub stand_depth: Decimal,

    pub stand_type: StandType,

    #[serde(default)]
    pub electricity_needed: bool,
    pub electricity_type: Option<ElectricityType>,
    pub electricity_watts: Option<i32>,

    #[serde(default)]
    pub water: bool,

    pub product_category: ProductCategory,
    pub artisanal_type: Option<String>,

    #[serde(default)]
    pub demonstration: bool,

    pub remarks: Option<String>,

    pub insurance_doc: Option<String>,
    pub stand_photos: Option<Vec<String>>,
    pub product_list: Option<String>,
}

impl CreateRegistrationPayload {
    /// Validação completa: atributos do derive + regras condicionais.
    pub fn validate_full(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };

        collect_rule_errors(&mut errors, &self.rule_view());

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    fn rule_view(&self) -> RuleView<'_> {
        RuleView {
            applicant_type: self.applicant_type,
            company_name: self.company_name.as_deref(),
            stand_length: self.stand_length,
            stand_depth: self.stand_depth,
            stand_type: self.stand_type,
            electricity_needed: self.electricity_needed,
            electricity_type: self.electricity_type,
            electricity_watts: self.electricity_watts,
            product_category: self.product_category,
            artisanal_type: self.artisanal_type.as_deref(),
        }
    }
}

// Patch de atualização: campos ausentes permanecem inalterados.
// Cobre a correção administrativa, a edição pelo requerente e o
// registro manual de pagamento da tesouraria.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegistrationPayload {
    pub applicant_type: Option<ApplicantType>,
    pub company_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub birth_date: Option<NaiveDate>,
    pub birth_place: Option<String>,

    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,

    pub product_type: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub stand_length: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub stand_depth: Option<Decimal>,
    pub stand_type: Option<StandType>,

    pub electricity_needed: Option<bool>,
    pub electricity_type: Option<ElectricityType>,
    pub electricity_watts: Option<i32>,
    pub water: Option<bool>,

    pub product_category: Option<ProductCategory>,
    pub artisanal_type: Option<String>,
    pub demonstration: Option<bool>,
    pub remarks: Option<String>,

    pub insurance_doc: Option<String>,
    pub stand_photos: Option<Vec<String>>,
    pub product_list: Option<String>,

    pub status: Option<RegistrationStatus>,
    pub stand_number: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_reference: Option<String>,
}

// --- Regras condicionais compartilhadas entre criação e atualização ---

pub(crate) struct RuleView<'a> {
    pub applicant_type: ApplicantType,
    pub company_name: Option<&'a str>,
    pub stand_length: Decimal,
    pub stand_depth: Decimal,
    pub stand_type: StandType,
    pub electricity_needed: bool,
    pub electricity_type: Option<ElectricityType>,
    pub electricity_watts: Option<i32>,
    pub product_category: ProductCategory,
    pub artisanal_type: Option<&'a str>,
}

pub(crate) fn collect_rule_errors(errors: &mut ValidationErrors, view: &RuleView<'_>) {
    // Razão social obrigatória para empresas
    if view.applicant_type == ApplicantType::Company
        && view.company_name.map_or(true, |c| c.trim().is_empty())
    {
        errors.add(
            "companyName",
            rule_error("company_name_required", "A razão social é obrigatória para empresas."),
        );
    }

    // Geometria da banca
    if view.stand_length <= Decimal::ZERO {
        errors.add(
            "standLength",
            rule_error("stand_length_positive", "O comprimento da banca deve ser maior que zero."),
        );
    }
    if view.stand_depth <= Decimal::ZERO {
        errors.add(
            "standDepth",
            rule_error("stand_depth_positive", "A profundidade da banca deve ser maior que zero."),
        );
    }
    match view.stand_type {
        StandType::CarStand if view.stand_length < Decimal::from(6) => {
            errors.add(
                "standLength",
                rule_error("car_stand_min_length", "Banca com carro exige no mínimo 6 metros."),
            );
        }
        StandType::CarTrailerStand if view.stand_length < Decimal::from(9) => {
            errors.add(
                "standLength",
                rule_error(
                    "car_trailer_stand_min_length",
                    "Banca com carro e reboque exige no mínimo 9 metros.",
                ),
            );
        }
        _ => {}
    }

    // Eletricidade: tipo obrigatório quando solicitada; watts para ligações de potência
    if view.electricity_needed {
        match view.electricity_type {
            None => {
                errors.add(
                    "electricityType",
                    rule_error(
                        "electricity_type_required",
                        "Informe o tipo de ligação elétrica solicitada.",
                    ),
                );
            }
            Some(t) if t.requires_watts() => {
                if !matches!(view.electricity_watts, Some(w) if w > 0) {
                    errors.add(
                        "electricityWatts",
                        rule_error(
                            "electricity_watts_required",
                            "Informe a potência (em watts) para esta ligação.",
                        ),
                    );
                }
            }
            Some(_) => {}
        }
    }

    // Artesanato exige o tipo de atividade
    if view.product_category == ProductCategory::Artisanal
        && view.artisanal_type.map_or(true, |a| a.trim().is_empty())
    {
        errors.add(
            "artisanalType",
            rule_error("artisanal_type_required", "Informe o tipo de atividade artesanal."),
        );
    }
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

// --- Listagem / paginação ---

// Filtro de status na query string; "all" é a sentinela sem restrição.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    All,
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl StatusFilter {
    pub fn as_status(self) -> Option<RegistrationStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some(RegistrationStatus::Pending),
            StatusFilter::Approved => Some(RegistrationStatus::Approved),
            StatusFilter::Rejected => Some(RegistrationStatus::Rejected),
            StatusFilter::Paid => Some(RegistrationStatus::Paid),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListRegistrationsParams {
    pub status: Option<StatusFilter>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListRegistrationsParams {
    // page < 1 é normalizada para 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }

    pub fn status(&self) -> Option<RegistrationStatus> {
        self.status.and_then(StatusFilter::as_status)
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
        Self { page, limit, total, pages }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPage {
    pub registrations: Vec<Registration>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_payload() -> CreateRegistrationPayload {
        CreateRegistrationPayload {
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
            stand_length: Decimal::from(4),
            stand_depth: Decimal::from(2),
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
        }
    }

    #[test]
    fn fee_is_seven_per_meter() {
        assert_eq!(compute_fee(Decimal::from(6)), Decimal::from(42));
        assert_eq!(compute_fee(Decimal::from(1)), Decimal::from(7));
        // Exato também para comprimentos fracionários
        assert_eq!(
            compute_fee("2.5".parse().unwrap()),
            "17.5".parse::<Decimal>().unwrap()
        );
    }

    #[test]
    fn valid_payload_passes() {
        assert!(base_payload().validate_full().is_ok());
    }

    #[test]
    fn company_requires_company_name() {
        let mut payload = base_payload();
        payload.applicant_type = ApplicantType::Company;
        let errors = payload.validate_full().unwrap_err();
        assert!(errors.field_errors().contains_key("companyName"));

        payload.company_name = Some("Crêperie du Nord".into());
        assert!(payload.validate_full().is_ok());
    }

    #[test]
    fn car_stand_requires_six_meters() {
        let mut payload = base_payload();
        payload.stand_type = StandType::CarStand;
        payload.stand_length = Decimal::from(5);
        let errors = payload.validate_full().unwrap_err();
        assert!(errors.field_errors().contains_key("standLength"));

        payload.stand_length = Decimal::from(6);
        assert!(payload.validate_full().is_ok());
    }

    #[test]
    fn car_trailer_stand_requires_nine_meters() {
        let mut payload = base_payload();
        payload.stand_type = StandType::CarTrailerStand;
        payload.stand_length = Decimal::from(8);
        assert!(payload.validate_full().is_err());

        payload.stand_length = Decimal::from(9);
        assert!(payload.validate_full().is_ok());
    }

    #[test]
    fn stand_length_must_be_positive() {
        let mut payload = base_payload();
        payload.stand_length = Decimal::ZERO;
        let errors = payload.validate_full().unwrap_err();
        assert!(errors.field_errors().contains_key("standLength"));
    }

    #[test]
    fn electricity_needs_type_and_watts() {
        let mut payload = base_payload();
        payload.electricity_needed = true;
        let errors = payload.validate_full().unwrap_err();
        assert!(errors.field_errors().contains_key("electricityType"));

        // Iluminação simples não exige watts
        payload.electricity_type = Some(ElectricityType::Lighting240v);
        assert!(payload.validate_full().is_ok());

        // Ligações de potência exigem watts
        payload.electricity_type = Some(ElectricityType::High240v);
        let errors = payload.validate_full().unwrap_err();
        assert!(errors.field_errors().contains_key("electricityWatts"));

        payload.electricity_watts = Some(2000);
        assert!(payload.validate_full().is_ok());
    }

    #[test]
    fn artisanal_requires_activity_type() {
        let mut payload = base_payload();
        payload.product_category = ProductCategory::Artisanal;
        let errors = payload.validate_full().unwrap_err();
        assert!(errors.field_errors().contains_key("artisanalType"));

        payload.artisanal_type = Some("Poterie".into());
        assert!(payload.validate_full().is_ok());
    }

    #[test]
    fn page_below_one_is_clamped() {
        let params = ListRegistrationsParams { page: Some(0), ..Default::default() };
        assert_eq!(params.page(), 1);
        assert_eq!(params.offset(), 0);

        let params = ListRegistrationsParams { page: Some(-3), ..Default::default() };
        assert_eq!(params.page(), 1);
    }

    #[test]
    fn offset_follows_page_and_limit() {
        let params = ListRegistrationsParams {
            page: Some(2),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(params.offset(), 10);
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn blank_search_is_ignored() {
        let params = ListRegistrationsParams {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(params.search(), None);
    }

    #[test]
    fn status_all_means_no_filter() {
        let params = ListRegistrationsParams {
            status: Some(StatusFilter::All),
            ..Default::default()
        };
        assert_eq!(params.status(), None);

        let params = ListRegistrationsParams {
            status: Some(StatusFilter::Paid),
            ..Default::default()
        };
        assert_eq!(params.status(), Some(RegistrationStatus::Paid));
    }

    #[test]
    fn pages_is_ceiling_of_total_over_limit() {
        assert_eq!(Pagination::new(2, 10, 25).pages, 3);
        assert_eq!(Pagination::new(1, 10, 30).pages, 3);
        assert_eq!(Pagination::new(1, 10, 0).pages, 0);
        assert_eq!(Pagination::new(1, 10, 1).pages, 1);
    }
}

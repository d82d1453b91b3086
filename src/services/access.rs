// src/services/access.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

// O ator de uma requisição. Sessões desativadas ou desconhecidas
// são rebaixadas para `Anonymous` ANTES de qualquer decisão.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    Moderator(Uuid),
    Admin(Uuid),
}

impl Principal {
    pub fn from_user(user: &User) -> Self {
        if !user.is_active {
            return Principal::Anonymous;
        }
        match user.role {
            Role::Admin => Principal::Admin(user.id),
            Role::Moderator => Principal::Moderator(user.id),
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        match self {
            Principal::Anonymous => None,
            Principal::Moderator(id) | Principal::Admin(id) => Some(*id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Principal::Anonymous)
    }
}

// As operações lógicas expostas pelas rotas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateRegistration,
    ReadRegistration,
    ListRegistrations,
    UpdateRegistration,
    DeleteRegistration,
    ReadDashboardStats,
    ManageUsers,
}

/// Tabela de decisão: negado a menos que explicitamente permitido.
/// Pura e total — nunca toca o banco nem muta estado.
pub fn is_allowed(principal: &Principal, action: Action) -> bool {
    use Action::*;
    match (principal, action) {
        // A inscrição pública é a única escrita anônima permitida
        (_, CreateRegistration) => true,

        // Tudo que expõe dados pessoais ou financeiros exige autenticação
        (Principal::Anonymous, _) => false,

        // Gestão de usuários é exclusiva de administradores
        (Principal::Moderator(_), ManageUsers) => false,
        (Principal::Moderator(_), _) => true,

        (Principal::Admin(_), _) => true,
    }
}

/// Chamada no topo de cada handler, antes de qualquer operação.
/// Negado vira 401 para anônimos e 403 para autenticados.
pub fn authorize(principal: &Principal, action: Action) -> Result<(), AppError> {
    if is_allowed(principal, action) {
        Ok(())
    } else if principal.is_authenticated() {
        Err(AppError::Forbidden)
    } else {
        Err(AppError::InvalidToken)
    }
}

// --- Autoproteção ---
// Aplicada dentro da gestão de usuários, depois da autorização e antes
// da mutação. Vale para todos os papéis, inclusive administradores.

pub fn ensure_not_self_deactivation(
    principal: &Principal,
    target_id: Uuid,
    next_is_active: Option<bool>,
) -> Result<(), AppError> {
    if next_is_active == Some(false) && principal.id() == Some(target_id) {
        return Err(AppError::CannotDeactivateSelf);
    }
    Ok(())
}

pub fn ensure_not_self_deletion(principal: &Principal, target_id: Uuid) -> Result<(), AppError> {
    if principal.id() == Some(target_id) {
        return Err(AppError::CannotDeleteSelf);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: Role, is_active: bool) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Pauline".into(),
            email: "pauline@braderie.org".into(),
            password_hash: "$2b$12$hash".into(),
            role,
            is_active,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn anonymous_can_only_create_registrations() {
        let anon = Principal::Anonymous;
        assert!(is_allowed(&anon, Action::CreateRegistration));
        assert!(!is_allowed(&anon, Action::ReadRegistration));
        assert!(!is_allowed(&anon, Action::ListRegistrations));
        assert!(!is_allowed(&anon, Action::UpdateRegistration));
        assert!(!is_allowed(&anon, Action::DeleteRegistration));
        assert!(!is_allowed(&anon, Action::ReadDashboardStats));
        assert!(!is_allowed(&anon, Action::ManageUsers));
    }

    #[test]
    fn moderator_manages_registrations_but_not_users() {
        let moderator = Principal::Moderator(Uuid::new_v4());
        assert!(is_allowed(&moderator, Action::CreateRegistration));
        assert!(is_allowed(&moderator, Action::ReadRegistration));
        assert!(is_allowed(&moderator, Action::ListRegistrations));
        assert!(is_allowed(&moderator, Action::UpdateRegistration));
        assert!(is_allowed(&moderator, Action::DeleteRegistration));
        assert!(is_allowed(&moderator, Action::ReadDashboardStats));
        assert!(!is_allowed(&moderator, Action::ManageUsers));
    }

    #[test]
    fn admin_is_allowed_everything() {
        let admin = Principal::Admin(Uuid::new_v4());
        assert!(is_allowed(&admin, Action::CreateRegistration));
        assert!(is_allowed(&admin, Action::ReadRegistration));
        assert!(is_allowed(&admin, Action::ListRegistrations));
        assert!(is_allowed(&admin, Action::UpdateRegistration));
        assert!(is_allowed(&admin, Action::DeleteRegistration));
        assert!(is_allowed(&admin, Action::ReadDashboardStats));
        assert!(is_allowed(&admin, Action::ManageUsers));
    }

    #[test]
    fn denial_maps_to_401_for_anonymous_and_403_for_authenticated() {
        let err = authorize(&Principal::Anonymous, Action::ListRegistrations).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));

        let moderator = Principal::Moderator(Uuid::new_v4());
        let err = authorize(&moderator, Action::ManageUsers).unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[test]
    fn deactivated_user_resolves_to_anonymous() {
        let inactive_admin = user(Role::Admin, false);
        assert_eq!(Principal::from_user(&inactive_admin), Principal::Anonymous);

        let active_admin = user(Role::Admin, true);
        assert_eq!(
            Principal::from_user(&active_admin),
            Principal::Admin(active_admin.id)
        );

        let active_moderator = user(Role::Moderator, true);
        assert_eq!(
            Principal::from_user(&active_moderator),
            Principal::Moderator(active_moderator.id)
        );
    }

    #[test]
    fn nobody_deactivates_own_account() {
        let id = Uuid::new_v4();
        let admin = Principal::Admin(id);

        let err = ensure_not_self_deactivation(&admin, id, Some(false)).unwrap_err();
        assert!(matches!(err, AppError::CannotDeactivateSelf));

        // Reativar a si mesmo ou desativar outra conta é permitido
        assert!(ensure_not_self_deactivation(&admin, id, Some(true)).is_ok());
        assert!(ensure_not_self_deactivation(&admin, id, None).is_ok());
        assert!(ensure_not_self_deactivation(&admin, Uuid::new_v4(), Some(false)).is_ok());
    }

    #[test]
    fn nobody_deletes_own_account() {
        let id = Uuid::new_v4();
        let admin = Principal::Admin(id);

        let err = ensure_not_self_deletion(&admin, id).unwrap_err();
        assert!(matches!(err, AppError::CannotDeleteSelf));

        assert!(ensure_not_self_deletion(&admin, Uuid::new_v4()).is_ok());
    }
}

pub mod registration_repo;
pub use registration_repo::RegistrationRepository;
pub mod user_repo;
pub use user_repo::UserRepository;

pub mod access;
pub mod auth;
pub mod registration_service;
pub mod stats_service;
pub mod user_service;

pub mod auth;
pub mod dashboard;
pub mod registrations;
pub mod treasury;
pub mod users;

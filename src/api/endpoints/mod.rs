pub mod admin;
pub mod doctor;
pub mod payment;
pub mod user;

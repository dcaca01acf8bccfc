pub mod api; // REST surface: doctor, user, admin, payments
pub mod auth; // Password records (PBKDF2) + verification
pub mod config;
pub mod core_state; // Shared state between server tasks
pub mod models;
pub mod db;
pub mod payments; // Gateway A (checkout) + Gateway B (hosted page)
pub mod dashboard; // Doctor/admin aggregate cards
pub mod listing; // Appointment filtering + pagination
pub mod records; // Patient search, history, records wizard
pub mod eform; // Visit eForm editor state
pub mod prescription; // Printable prescription rendering
pub mod session; // Client session state (token, profile, cache)

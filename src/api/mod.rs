//! REST surface for the clinic: doctor, user (patient), and admin
//! routers plus the payment gateway endpoints, nested under `/api/`.
//!
//! The router is composable — `api_router()` returns a `Router` that can
//! be mounted on any axum server instance. Auth tokens travel in custom
//! headers (`X-Doctor-Token`, `X-User-Token`, `X-Admin-Token`) and are
//! validated per request against the in-memory session store.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::ApiServer;
pub use types::ApiContext;

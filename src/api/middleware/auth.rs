//! Token authentication middleware — one validator per surface.
//!
//! Each surface reads its custom header, resolves the token against the
//! session store, checks the principal's role, and injects the typed
//! context into request extensions for downstream handlers.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{AdminContext, ApiContext, DoctorContext, Principal, UserContext};

pub const DOCTOR_TOKEN_HEADER: &str = "X-Doctor-Token";
pub const USER_TOKEN_HEADER: &str = "X-User-Token";
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

fn resolve_principal(
    req: &Request<axum::body::Body>,
    header: &str,
) -> Result<Principal, ApiError> {
    let ctx = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let token = req
        .headers()
        .get(header)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let sessions = ctx
        .sessions
        .lock()
        .map_err(|_| ApiError::Internal("session lock".into()))?;
    sessions.resolve(token).ok_or(ApiError::Unauthorized)
}

/// Require a doctor token.
pub async fn require_doctor(mut req: Request<axum::body::Body>, next: Next) -> Response {
    match resolve_principal(&req, DOCTOR_TOKEN_HEADER) {
        Ok(Principal::Doctor(doctor_id)) => {
            req.extensions_mut().insert(DoctorContext { doctor_id });
            next.run(req).await
        }
        Ok(_) => ApiError::Unauthorized.into_response(),
        Err(err) => err.into_response(),
    }
}

/// Require a patient token.
pub async fn require_user(mut req: Request<axum::body::Body>, next: Next) -> Response {
    match resolve_principal(&req, USER_TOKEN_HEADER) {
        Ok(Principal::Patient(patient_id)) => {
            req.extensions_mut().insert(UserContext { patient_id });
            next.run(req).await
        }
        Ok(_) => ApiError::Unauthorized.into_response(),
        Err(err) => err.into_response(),
    }
}

/// Require the admin token.
pub async fn require_admin(mut req: Request<axum::body::Body>, next: Next) -> Response {
    match resolve_principal(&req, ADMIN_TOKEN_HEADER) {
        Ok(Principal::Admin) => {
            req.extensions_mut().insert(AdminContext);
            next.run(req).await
        }
        Ok(_) => ApiError::Unauthorized.into_response(),
        Err(err) => err.into_response(),
    }
}

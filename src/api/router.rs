//! API router — one composable `Router` with all surfaces nested under
//! `/api/`.
//!
//! Middleware uses `Extension<ApiContext>` (injected as the outermost
//! layer). Endpoint handlers use `State<ApiContext>` (provided via
//! `with_state`). Each protected surface carries its own token validator.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the clinic API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);
    build_router(ctx)
}

/// Build router from a pre-constructed `ApiContext`.
///
/// Used by integration tests that need the shared context (e.g. to issue
/// tokens or encrypt vendor blobs directly).
#[cfg(test)]
pub(crate) fn api_router_with_ctx(ctx: ApiContext) -> Router {
    build_router(ctx)
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let doctor_public = Router::new()
        .route("/login", post(endpoints::doctor::login))
        .route("/list", get(endpoints::doctor::list))
        .with_state(ctx.clone());

    let doctor_protected = Router::new()
        .route("/appointments", get(endpoints::doctor::appointments))
        .route(
            "/change-availability",
            post(endpoints::doctor::change_availability),
        )
        .route(
            "/complete-appointment",
            post(endpoints::doctor::complete_appointment),
        )
        .route(
            "/cancel-appointment",
            post(endpoints::doctor::cancel_appointment),
        )
        .route("/dashboard", get(endpoints::doctor::dashboard))
        .route("/profile", get(endpoints::doctor::profile))
        .route("/update-profile", post(endpoints::doctor::update_profile))
        .route("/all-patients", get(endpoints::doctor::all_patients))
        .route(
            "/patient-history/:id",
            get(endpoints::doctor::patient_history),
        )
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_doctor))
        .layer(axum::Extension(ctx.clone()));

    let user_public = Router::new()
        .route("/register", post(endpoints::user::register))
        .route("/login", post(endpoints::user::login))
        .with_state(ctx.clone());

    let user_protected = Router::new()
        .route("/profile", get(endpoints::user::profile))
        .route("/update-profile", post(endpoints::user::update_profile))
        .route("/book-appointment", post(endpoints::user::book_appointment))
        .route("/appointments", get(endpoints::user::appointments))
        .route(
            "/cancel-appointment",
            post(endpoints::user::cancel_appointment),
        )
        .route("/prescription/:id", get(endpoints::user::get_prescription))
        .route(
            "/prescription/:id/pdf",
            get(endpoints::user::get_prescription_pdf),
        )
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_user))
        .layer(axum::Extension(ctx.clone()));

    let admin_public = Router::new()
        .route("/login", post(endpoints::admin::login))
        .with_state(ctx.clone());

    let admin_protected = Router::new()
        .route("/add-doctor", post(endpoints::admin::add_doctor))
        .route("/appointments", get(endpoints::admin::appointments))
        .route(
            "/cancel-appointment",
            post(endpoints::admin::cancel_appointment),
        )
        .route("/dashboard", get(endpoints::admin::dashboard))
        .route("/doctors", get(endpoints::admin::doctors))
        .route(
            "/change-availability",
            post(endpoints::admin::change_availability),
        )
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_admin))
        .layer(axum::Extension(ctx.clone()));

    // Payment routes: order creation and verification run as the patient;
    // the hosted-page response arrives from the vendor redirect, unauthenticated.
    let pay_protected = Router::new()
        .route("/checkout/order", post(endpoints::payment::checkout_order))
        .route(
            "/checkout/verify",
            post(endpoints::payment::checkout_verify),
        )
        .route("/hosted/request", post(endpoints::payment::hosted_request))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_user))
        .layer(axum::Extension(ctx.clone()));

    let pay_public = Router::new()
        .route(
            "/hosted/response",
            post(endpoints::payment::hosted_response),
        )
        .with_state(ctx.clone());

    Router::new()
        .nest("/api/doctor", doctor_public)
        .nest("/api/doctor", doctor_protected)
        .nest("/api/user", user_public)
        .nest("/api/user", user_protected)
        .nest("/api/admin", admin_public)
        .nest("/api/admin", admin_protected)
        .nest("/api/pay", pay_protected)
        .nest("/api/pay", pay_public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

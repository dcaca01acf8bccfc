//! Payment endpoints for both gateways.
//!
//! Gateway A (checkout): create an order at the provider, then verify the
//! signed success callback and mark the appointment paid.
//!
//! Gateway B (hosted): return the encrypted order blob + access code for
//! the client's auto-submitted form, then handle the vendor's posted
//! response — decrypt, branch on order status, redirect the browser.

use axum::extract::State;
use axum::response::Redirect;
use axum::Extension;
use axum::Form;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db::repository;
use crate::models::{Appointment, OrderStatus, PaymentOrder};
use crate::payments::{BillingDetails, CheckoutOrder, HostedOrderRequest};

fn payable_appointment(
    ctx: &ApiContext,
    patient_id: Uuid,
    appointment_id: Uuid,
) -> Result<Appointment, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointment = repository::get_appointment(&conn, &appointment_id)?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".into()))?;
    if appointment.patient_id != patient_id {
        return Err(ApiError::Business("Appointment belongs to another patient".into()));
    }
    if appointment.cancelled {
        return Err(ApiError::Business("Appointment was cancelled".into()));
    }
    if appointment.payment {
        return Err(ApiError::Business("Appointment is already paid".into()));
    }
    Ok(appointment)
}

#[derive(Deserialize)]
pub struct CheckoutOrderRequest {
    pub appointment_id: Uuid,
}

#[derive(Serialize)]
pub struct CheckoutOrderResponse {
    pub success: bool,
    pub order: CheckoutOrder,
}

/// `POST /api/pay/checkout/order`
pub async fn checkout_order(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<CheckoutOrderRequest>,
) -> Result<Json<CheckoutOrderResponse>, ApiError> {
    let appointment = payable_appointment(&ctx, user.patient_id, body.appointment_id)?;

    // Amount travels in minor currency units; receipt carries our id.
    let order = ctx
        .core
        .checkout
        .create_order(
            appointment.amount * 100,
            &ctx.core.config.currency,
            &appointment.id.to_string(),
        )
        .await?;

    let conn = ctx.core.open_db()?;
    repository::insert_payment_order(
        &conn,
        &PaymentOrder {
            id: Uuid::new_v4(),
            appointment_id: appointment.id,
            provider_order_id: order.id.clone(),
            amount: order.amount,
            currency: order.currency.clone(),
            status: OrderStatus::Created,
            created_at: Utc::now().naive_utc(),
        },
    )?;

    tracing::info!(appointment = %appointment.id, order = %order.id, "checkout order created");
    Ok(Json(CheckoutOrderResponse {
        success: true,
        order,
    }))
}

#[derive(Deserialize)]
pub struct CheckoutVerifyRequest {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(Serialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

/// `POST /api/pay/checkout/verify`: the signed success callback.
pub async fn checkout_verify(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<CheckoutVerifyRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    ctx.core
        .checkout
        .verify_payment(&body.order_id, &body.payment_id, &body.signature)?;

    let conn = ctx.core.open_db()?;
    let order = repository::get_payment_order_by_provider_id(&conn, &body.order_id)?
        .ok_or_else(|| ApiError::NotFound("Order not found".into()))?;

    let appointment = repository::get_appointment(&conn, &order.appointment_id)?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".into()))?;
    if appointment.patient_id != user.patient_id {
        return Err(ApiError::Business("Appointment belongs to another patient".into()));
    }

    repository::mark_appointment_paid(&conn, &order.appointment_id)?;
    repository::set_payment_order_status(&conn, &order.id, OrderStatus::Paid)?;

    tracing::info!(appointment = %order.appointment_id, "payment verified");
    Ok(Json(AckResponse {
        success: true,
        message: "Payment verified".into(),
    }))
}

#[derive(Deserialize)]
pub struct HostedPayRequest {
    pub appointment_id: Uuid,
    #[serde(default)]
    pub billing: BillingDetails,
}

#[derive(Serialize)]
pub struct HostedPayResponse {
    pub success: bool,
    pub enc_request: String,
    pub access_code: String,
    pub merchant_id: String,
}

/// `POST /api/pay/hosted/request`
pub async fn hosted_request(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<HostedPayRequest>,
) -> Result<Json<HostedPayResponse>, ApiError> {
    let appointment = payable_appointment(&ctx, user.patient_id, body.appointment_id)?;
    let hosted_cfg = &ctx.core.config.hosted;

    let enc_request = ctx.core.hosted.encrypt_request(&HostedOrderRequest {
        order_id: appointment.id.to_string(),
        amount: appointment.amount,
        currency: ctx.core.config.currency.clone(),
        redirect_url: hosted_cfg.redirect_url.clone(),
        cancel_url: hosted_cfg.cancel_url.clone(),
        billing: body.billing,
    })?;

    Ok(Json(HostedPayResponse {
        success: true,
        enc_request,
        access_code: ctx.core.hosted.access_code().to_string(),
        merchant_id: ctx.core.hosted.merchant_id().to_string(),
    }))
}

#[derive(Deserialize)]
pub struct HostedCallback {
    pub enc_response: String,
}

/// `POST /api/pay/hosted/response`. The vendor redirects the browser
/// here with the encrypted outcome. Public by necessity; authenticity
/// comes from the working-key decryption.
pub async fn hosted_response(
    State(ctx): State<ApiContext>,
    Form(body): Form<HostedCallback>,
) -> Result<Redirect, ApiError> {
    let hosted_cfg = &ctx.core.config.hosted;

    let response = ctx
        .core
        .hosted
        .decrypt_response(&body.enc_response)
        .map_err(|e| ApiError::Internal(format!("hosted response: {e}")))?;

    if !response.is_success() {
        tracing::warn!(order = %response.order_id, status = %response.order_status, "hosted payment failed");
        return Ok(Redirect::to(&hosted_cfg.failure_redirect));
    }

    let appointment_id = Uuid::parse_str(&response.order_id)
        .map_err(|_| ApiError::BadRequest("Malformed order id".into()))?;

    let conn = ctx.core.open_db()?;
    repository::mark_appointment_paid(&conn, &appointment_id)?;

    tracing::info!(appointment = %appointment_id, "hosted payment succeeded");
    Ok(Redirect::to(&hosted_cfg.success_redirect))
}

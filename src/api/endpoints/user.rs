//! Patient-surface endpoints: registration, login, profile, booking,
//! own appointment history, cancellation, and prescription retrieval.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, Principal, UserContext};
use crate::auth::{hash_password, verify_password};
use crate::db::repository;
use crate::models::{
    Appointment, EForm, Patient, PatientProfileUpdate, PatientPublic, SlotDate,
};
use crate::prescription;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

#[derive(Serialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

fn ack(message: &str) -> AckResponse {
    AckResponse {
        success: true,
        message: message.into(),
    }
}

fn issue_token(ctx: &ApiContext, principal: Principal) -> Result<String, ApiError> {
    Ok(ctx
        .sessions
        .lock()
        .map_err(|_| ApiError::Internal("session lock".into()))?
        .issue(principal))
}

/// `POST /api/user/register`
pub async fn register(
    State(ctx): State<ApiContext>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if body.name.is_empty() || body.email.is_empty() {
        return Err(ApiError::BadRequest("Name and email are required".into()));
    }
    if body.password.len() < 8 {
        return Err(ApiError::Business("Password must be at least 8 characters".into()));
    }

    let conn = ctx.core.open_db()?;
    if repository::get_patient_by_email(&conn, &body.email)?.is_some() {
        return Err(ApiError::Business("Email already registered".into()));
    }

    let patient = Patient {
        id: Uuid::new_v4(),
        name: body.name,
        email: body.email,
        password_hash: hash_password(&body.password),
        image: String::new(),
        phone: String::new(),
        address_line1: String::new(),
        address_line2: String::new(),
        gender: "Not Selected".into(),
        dob: None,
        registered_at: Utc::now().naive_utc(),
    };
    repository::insert_patient(&conn, &patient)?;

    let token = issue_token(&ctx, Principal::Patient(patient.id))?;
    tracing::info!(patient = %patient.id, "patient registered");
    Ok(Json(TokenResponse {
        success: true,
        token,
    }))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/user/login`
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let patient = repository::get_patient_by_email(&conn, &body.email)?
        .filter(|p| verify_password(&body.password, &p.password_hash))
        .ok_or_else(|| ApiError::Business("Invalid credentials".into()))?;

    let token = issue_token(&ctx, Principal::Patient(patient.id))?;
    Ok(Json(TokenResponse {
        success: true,
        token,
    }))
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: PatientPublic,
}

/// `GET /api/user/profile`
pub async fn profile(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let patient = repository::get_patient(&conn, &user.patient_id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;
    Ok(Json(ProfileResponse {
        success: true,
        profile: patient.public(),
    }))
}

/// `POST /api/user/update-profile`
pub async fn update_profile(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<PatientProfileUpdate>,
) -> Result<Json<AckResponse>, ApiError> {
    if body.name.is_empty() {
        return Err(ApiError::BadRequest("Name is required".into()));
    }
    let conn = ctx.core.open_db()?;
    repository::update_patient_profile(&conn, &user.patient_id, &body)?;
    Ok(Json(ack("Profile updated")))
}

#[derive(Deserialize)]
pub struct BookRequest {
    pub doctor_id: Uuid,
    pub slot_date: SlotDate,
    pub slot_time: String,
}

#[derive(Serialize)]
pub struct BookResponse {
    pub success: bool,
    pub appointment_id: Uuid,
}

/// `POST /api/user/book-appointment` writes the appointment with
/// denormalized doctor/patient snapshots and amount = doctor fee.
pub async fn book_appointment(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<BookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    if body.slot_time.is_empty() {
        return Err(ApiError::BadRequest("Slot time is required".into()));
    }

    let conn = ctx.core.open_db()?;
    let doctor = repository::get_doctor(&conn, &body.doctor_id)?
        .ok_or_else(|| ApiError::NotFound("Doctor not found".into()))?;
    if !doctor.available {
        return Err(ApiError::Business("Doctor not available".into()));
    }
    if repository::slot_taken(&conn, &doctor.id, &body.slot_date, &body.slot_time)? {
        return Err(ApiError::Business("Slot not available".into()));
    }

    let patient = repository::get_patient(&conn, &user.patient_id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;

    let appointment = Appointment {
        id: Uuid::new_v4(),
        patient_id: patient.id,
        doctor_id: doctor.id,
        slot_date: body.slot_date,
        slot_time: body.slot_time,
        patient_snapshot: patient.snapshot(),
        doctor_snapshot: doctor.snapshot(),
        amount: doctor.fee,
        booked_at: Utc::now().naive_utc(),
        cancelled: false,
        payment: false,
        is_completed: false,
        eform: None,
    };
    repository::insert_appointment(&conn, &appointment)?;

    tracing::info!(appointment = %appointment.id, doctor = %doctor.id, "appointment booked");
    Ok(Json(BookResponse {
        success: true,
        appointment_id: appointment.id,
    }))
}

#[derive(Serialize)]
pub struct AppointmentsResponse {
    pub success: bool,
    pub appointments: Vec<Appointment>,
}

/// `GET /api/user/appointments`: own history.
pub async fn appointments(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointments = repository::list_appointments_for_patient(&conn, &user.patient_id)?;
    Ok(Json(AppointmentsResponse {
        success: true,
        appointments,
    }))
}

#[derive(Deserialize)]
pub struct CancelRequest {
    pub appointment_id: Uuid,
}

/// `POST /api/user/cancel-appointment`
pub async fn cancel_appointment(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<CancelRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointment = repository::get_appointment(&conn, &body.appointment_id)?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".into()))?;
    if appointment.patient_id != user.patient_id {
        return Err(ApiError::Business("Appointment belongs to another patient".into()));
    }

    repository::cancel_appointment(&conn, &body.appointment_id)?;
    Ok(Json(ack("Appointment cancelled")))
}

#[derive(Serialize)]
pub struct PrescriptionResponse {
    pub success: bool,
    pub prescription: EForm,
}

fn own_completed_appointment(
    ctx: &ApiContext,
    patient_id: Uuid,
    appointment_id: Uuid,
) -> Result<(Appointment, EForm), ApiError> {
    let conn = ctx.core.open_db()?;
    let appointment = repository::get_appointment(&conn, &appointment_id)?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".into()))?;
    if appointment.patient_id != patient_id {
        return Err(ApiError::Business("Appointment belongs to another patient".into()));
    }
    if !appointment.is_completed {
        return Err(ApiError::Business("Appointment is not completed yet".into()));
    }
    let eform = appointment
        .eform
        .clone()
        .ok_or_else(|| ApiError::NotFound("No prescription recorded".into()))?;
    Ok((appointment, eform))
}

/// `GET /api/user/prescription/:id`: the eForm of an own completed
/// appointment, for the printable prescription view.
pub async fn get_prescription(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<PrescriptionResponse>, ApiError> {
    let (_, eform) = own_completed_appointment(&ctx, user.patient_id, appointment_id)?;
    Ok(Json(PrescriptionResponse {
        success: true,
        prescription: eform,
    }))
}

/// `GET /api/user/prescription/:id/pdf`: the same record rendered as an
/// A4 PDF.
pub async fn get_prescription_pdf(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(appointment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (appointment, eform) = own_completed_appointment(&ctx, user.patient_id, appointment_id)?;
    let bytes = prescription::render_pdf(&appointment, &eform)?;
    Ok((
        [(header::CONTENT_TYPE, "application/pdf")],
        bytes,
    ))
}

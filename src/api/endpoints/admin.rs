//! Admin-surface endpoints: login against the configured credentials,
//! doctor onboarding, clinic-wide appointment list, cancellation, and the
//! admin dashboard.

use axum::extract::State;
use axum::Extension;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{AdminContext, ApiContext, Principal};
use crate::auth::hash_password;
use crate::dashboard::{self, AdminDashboard};
use crate::db::repository;
use crate::models::{Appointment, Doctor, DoctorPublic};

#[derive(Deserialize)]
pub struct LoginRequest {
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

fn matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// `POST /api/admin/login` against the env-configured credentials.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let config = &ctx.core.config;
    if !matches(&body.email, &config.admin_email)
        || !matches(&body.password, &config.admin_password)
    {
        return Err(ApiError::Business("Invalid credentials".into()));
    }

    let token = ctx
        .sessions
        .lock()
        .map_err(|_| ApiError::Internal("session lock".into()))?
        .issue(Principal::Admin);

    tracing::info!("admin signed in");
    Ok(Json(TokenResponse {
        success: true,
        token,
    }))
}

#[derive(Deserialize)]
pub struct AddDoctorRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub speciality: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub about: String,
    pub fee: i64,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
}

#[derive(Serialize)]
pub struct AddDoctorResponse {
    pub success: bool,
    pub doctor_id: Uuid,
}

/// `POST /api/admin/add-doctor`
pub async fn add_doctor(
    State(ctx): State<ApiContext>,
    Extension(_admin): Extension<AdminContext>,
    Json(body): Json<AddDoctorRequest>,
) -> Result<Json<AddDoctorResponse>, ApiError> {
    if body.name.is_empty() || body.email.is_empty() || body.speciality.is_empty() {
        return Err(ApiError::BadRequest(
            "Name, email, and speciality are required".into(),
        ));
    }
    if body.password.len() < 8 {
        return Err(ApiError::Business("Password must be at least 8 characters".into()));
    }
    if body.fee < 0 {
        return Err(ApiError::BadRequest("Fee must not be negative".into()));
    }

    let conn = ctx.core.open_db()?;
    if repository::get_doctor_by_email(&conn, &body.email)?.is_some() {
        return Err(ApiError::Business("Email already registered".into()));
    }

    let doctor = Doctor {
        id: Uuid::new_v4(),
        name: body.name,
        email: body.email,
        password_hash: hash_password(&body.password),
        image: body.image,
        speciality: body.speciality,
        degree: body.degree,
        experience: body.experience,
        about: body.about,
        fee: body.fee,
        address_line1: body.address_line1,
        address_line2: body.address_line2,
        available: true,
        registered_at: Utc::now().naive_utc(),
    };
    repository::insert_doctor(&conn, &doctor)?;

    tracing::info!(doctor = %doctor.id, "doctor added");
    Ok(Json(AddDoctorResponse {
        success: true,
        doctor_id: doctor.id,
    }))
}

#[derive(Serialize)]
pub struct AppointmentsResponse {
    pub success: bool,
    pub appointments: Vec<Appointment>,
}

/// `GET /api/admin/appointments`: the whole clinic.
pub async fn appointments(
    State(ctx): State<ApiContext>,
    Extension(_admin): Extension<AdminContext>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointments = repository::list_all_appointments(&conn)?;
    Ok(Json(AppointmentsResponse {
        success: true,
        appointments,
    }))
}

#[derive(Deserialize)]
pub struct CancelRequest {
    pub appointment_id: Uuid,
}

/// `POST /api/admin/cancel-appointment`
pub async fn cancel_appointment(
    State(ctx): State<ApiContext>,
    Extension(_admin): Extension<AdminContext>,
    Json(body): Json<CancelRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    repository::get_appointment(&conn, &body.appointment_id)?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".into()))?;
    repository::cancel_appointment(&conn, &body.appointment_id)?;
    Ok(Json(ack("Appointment cancelled")))
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub dashboard: AdminDashboard,
}

/// `GET /api/admin/dashboard`
pub async fn dashboard(
    State(ctx): State<ApiContext>,
    Extension(_admin): Extension<AdminContext>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointments = repository::list_all_appointments(&conn)?;
    let doctors = repository::count_doctors(&conn)? as usize;
    let patients = repository::count_patients(&conn)? as usize;
    Ok(Json(DashboardResponse {
        success: true,
        dashboard: dashboard::admin_dashboard(doctors, patients, &appointments),
    }))
}

#[derive(Serialize)]
pub struct DoctorListResponse {
    pub success: bool,
    pub doctors: Vec<DoctorPublic>,
}

/// `GET /api/admin/doctors`
pub async fn doctors(
    State(ctx): State<ApiContext>,
    Extension(_admin): Extension<AdminContext>,
) -> Result<Json<DoctorListResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let doctors = repository::list_doctors(&conn)?
        .iter()
        .map(|d| d.public())
        .collect();
    Ok(Json(DoctorListResponse {
        success: true,
        doctors,
    }))
}

#[derive(Deserialize)]
pub struct AvailabilityRequest {
    pub doctor_id: Uuid,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub success: bool,
    pub available: bool,
}

/// `POST /api/admin/change-availability` toggles any doctor's flag.
pub async fn change_availability(
    State(ctx): State<ApiContext>,
    Extension(_admin): Extension<AdminContext>,
    Json(body): Json<AvailabilityRequest>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let available = repository::toggle_doctor_availability(&conn, &body.doctor_id)?;
    Ok(Json(AvailabilityResponse {
        success: true,
        available,
    }))
}

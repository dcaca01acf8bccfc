//! Doctor-surface endpoints: login, own appointment list, availability,
//! visit completion with eForm, dashboard, profile, and the patient
//! records sources (all patients + per-patient history).

use axum::extract::{Path, State};
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, DoctorContext, Principal};
use crate::auth::verify_password;
use crate::dashboard::{self, DoctorDashboard};
use crate::db::repository;
use crate::eform::CompleteAppointmentRequest;
use crate::models::{Appointment, DoctorPublic, DoctorProfileUpdate, PatientPublic};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
}

/// `POST /api/doctor/login`
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let doctor = repository::get_doctor_by_email(&conn, &body.email)?
        .filter(|doctor| verify_password(&body.password, &doctor.password_hash))
        .ok_or_else(|| ApiError::Business("Invalid credentials".into()))?;

    let token = ctx
        .sessions
        .lock()
        .map_err(|_| ApiError::Internal("session lock".into()))?
        .issue(Principal::Doctor(doctor.id));

    tracing::info!(doctor = %doctor.id, "doctor signed in");
    Ok(Json(LoginResponse {
        success: true,
        token,
    }))
}

#[derive(Serialize)]
pub struct AppointmentsResponse {
    pub success: bool,
    pub appointments: Vec<Appointment>,
}

/// `GET /api/doctor/appointments` for the authenticated doctor.
pub async fn appointments(
    State(ctx): State<ApiContext>,
    Extension(doctor): Extension<DoctorContext>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointments = repository::list_appointments_for_doctor(&conn, &doctor.doctor_id)?;
    Ok(Json(AppointmentsResponse {
        success: true,
        appointments,
    }))
}

#[derive(Serialize)]
pub struct DoctorListResponse {
    pub success: bool,
    pub doctors: Vec<DoctorPublic>,
}

/// `GET /api/doctor/list`. Public directory, no credentials exposed.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<DoctorListResponse>, ApiError> {
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

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub success: bool,
    pub available: bool,
}

/// `POST /api/doctor/change-availability` toggles the doctor's own flag.
pub async fn change_availability(
    State(ctx): State<ApiContext>,
    Extension(doctor): Extension<DoctorContext>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let available = repository::toggle_doctor_availability(&conn, &doctor.doctor_id)?;
    Ok(Json(AvailabilityResponse {
        success: true,
        available,
    }))
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

/// `POST /api/doctor/complete-appointment`: eForm payload + appointment
/// id; marks the visit completed and persists the eForm.
pub async fn complete_appointment(
    State(ctx): State<ApiContext>,
    Extension(doctor): Extension<DoctorContext>,
    Json(body): Json<CompleteAppointmentRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointment = repository::get_appointment(&conn, &body.appointment_id)?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".into()))?;
    if appointment.doctor_id != doctor.doctor_id {
        return Err(ApiError::Business("Appointment belongs to another doctor".into()));
    }

    repository::complete_appointment(&conn, &body.appointment_id, &body.eform)?;
    tracing::info!(appointment = %body.appointment_id, "appointment completed");
    Ok(Json(ack("Appointment completed")))
}

#[derive(Deserialize)]
pub struct CancelRequest {
    pub appointment_id: Uuid,
}

/// `POST /api/doctor/cancel-appointment`
pub async fn cancel_appointment(
    State(ctx): State<ApiContext>,
    Extension(doctor): Extension<DoctorContext>,
    Json(body): Json<CancelRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointment = repository::get_appointment(&conn, &body.appointment_id)?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".into()))?;
    if appointment.doctor_id != doctor.doctor_id {
        return Err(ApiError::Business("Appointment belongs to another doctor".into()));
    }

    repository::cancel_appointment(&conn, &body.appointment_id)?;
    Ok(Json(ack("Appointment cancelled")))
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub dashboard: DoctorDashboard,
}

/// `GET /api/doctor/dashboard`
pub async fn dashboard(
    State(ctx): State<ApiContext>,
    Extension(doctor): Extension<DoctorContext>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointments = repository::list_appointments_for_doctor(&conn, &doctor.doctor_id)?;
    Ok(Json(DashboardResponse {
        success: true,
        dashboard: dashboard::doctor_dashboard(&appointments),
    }))
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    #[serde(flatten)]
    pub profile: DoctorPublic,
    pub email: String,
}

/// `GET /api/doctor/profile`
pub async fn profile(
    State(ctx): State<ApiContext>,
    Extension(doctor): Extension<DoctorContext>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let record = repository::get_doctor(&conn, &doctor.doctor_id)?
        .ok_or_else(|| ApiError::NotFound("Doctor not found".into()))?;
    Ok(Json(ProfileResponse {
        success: true,
        profile: record.public(),
        email: record.email,
    }))
}

/// `POST /api/doctor/update-profile`
pub async fn update_profile(
    State(ctx): State<ApiContext>,
    Extension(doctor): Extension<DoctorContext>,
    Json(body): Json<DoctorProfileUpdate>,
) -> Result<Json<AckResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    repository::update_doctor_profile(&conn, &doctor.doctor_id, &body)?;
    Ok(Json(ack("Profile updated")))
}

#[derive(Serialize)]
pub struct AllPatientsResponse {
    pub success: bool,
    pub patients: Vec<PatientPublic>,
}

/// `GET /api/doctor/all-patients`, the patient-search source list.
pub async fn all_patients(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
) -> Result<Json<AllPatientsResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let patients = repository::list_patients_with_appointments(&conn)?
        .iter()
        .map(|p| p.public())
        .collect();
    Ok(Json(AllPatientsResponse {
        success: true,
        patients,
    }))
}

/// `GET /api/doctor/patient-history/:id`: every appointment for the
/// patient, across doctors. The "current doctor only" restriction is a
/// client-side toggle.
pub async fn patient_history(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointments = repository::list_appointments_for_patient(&conn, &patient_id)?;
    Ok(Json(AppointmentsResponse {
        success: true,
        appointments,
    }))
}

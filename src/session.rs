//! Client session state — the token, signed-in profile, and cached
//! appointment list a front-end holds for its lifetime. An explicit state
//! object with load/refresh/clear operations, passed by reference to
//! views, instead of ambient global mutable state.

use crate::models::{Appointment, DoctorPublic};

#[derive(Debug, Default)]
pub struct ClientSession {
    token: Option<String>,
    doctor: Option<DoctorPublic>,
    appointments: Vec<Appointment>,
}

impl ClientSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn doctor(&self) -> Option<&DoctorPublic> {
        self.doctor.as_ref()
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Login: a fresh token discards whatever the previous session cached.
    pub fn sign_in(&mut self, token: String) {
        self.clear();
        self.token = Some(token);
    }

    pub fn set_profile(&mut self, doctor: DoctorPublic) {
        self.doctor = Some(doctor);
    }

    /// Replace the cached appointment list with a freshly fetched one.
    pub fn refresh_appointments(&mut self, appointments: Vec<Appointment>) {
        self.appointments = appointments;
    }

    /// Logout: drop token, profile, and every cached record.
    pub fn clear(&mut self) {
        self.token = None;
        self.doctor = None;
        self.appointments.clear();
    }
}

//! Patient records for the doctor view: client-side patient search,
//! appointment history with a "current doctor only" toggle, and the
//! three-panel wizard (search → history → viewer) with one level of back
//! navigation.
//!
//! Search and history filtering run over fully fetched lists — fine at
//! clinic scale, a known limitation beyond it.

use uuid::Uuid;

use crate::models::{Appointment, HistoryScope, PatientPublic};

/// Case-insensitive substring match against name, email, or phone.
/// An empty term returns the full list.
pub fn search_patients<'a>(patients: &'a [PatientPublic], term: &str) -> Vec<&'a PatientPublic> {
    let needle = term.to_lowercase();
    patients
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.email.to_lowercase().contains(&needle)
                || p.phone.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Restrict a patient's history to the current doctor when the visibility
/// toggle is on.
pub fn filter_history<'a>(
    appointments: &'a [Appointment],
    scope: HistoryScope,
) -> Vec<&'a Appointment> {
    appointments
        .iter()
        .filter(|appt| match scope {
            HistoryScope::AllDoctors => true,
            HistoryScope::CurrentDoctor(doctor_id) => appt.doctor_id == doctor_id,
        })
        .collect()
}

/// Which panel of the records view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordsPanel {
    Search,
    History,
    Viewer,
}

/// The patient currently under review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedPatient {
    pub id: Uuid,
    pub name: String,
}

/// Wizard state for the patient-records screen. Panels are mutually
/// exclusive; navigation is explicit with no back-stack beyond one level.
#[derive(Debug, Default)]
pub struct RecordsView {
    selected: Option<SelectedPatient>,
    viewing: Option<Appointment>,
}

impl RecordsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> RecordsPanel {
        match (&self.selected, &self.viewing) {
            (_, Some(_)) => RecordsPanel::Viewer,
            (Some(_), None) => RecordsPanel::History,
            (None, None) => RecordsPanel::Search,
        }
    }

    pub fn selected_patient(&self) -> Option<&SelectedPatient> {
        self.selected.as_ref()
    }

    /// The record open in the read-only viewer.
    pub fn viewing(&self) -> Option<&Appointment> {
        self.viewing.as_ref()
    }

    /// Search → History.
    pub fn select_patient(&mut self, id: Uuid, name: impl Into<String>) {
        self.selected = Some(SelectedPatient {
            id,
            name: name.into(),
        });
        self.viewing = None;
    }

    /// History → Viewer. Ignored unless a patient is selected.
    pub fn open_record(&mut self, appointment: Appointment) {
        if self.selected.is_some() {
            self.viewing = Some(appointment);
        }
    }

    /// One level back: Viewer → History, History → Search.
    pub fn back(&mut self) {
        if self.viewing.take().is_none() {
            self.selected = None;
        }
    }
}

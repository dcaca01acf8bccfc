//! eForm editor state for the doctor's "complete appointment" screen.
//!
//! The form is pre-populated from the appointment's patient snapshot and
//! freely editable; the prescription table grows and shrinks but always
//! keeps at least one row. Reset restores the pre-populated initial state
//! (the host UI asks for confirmation first). Submission produces the
//! complete-appointment payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::patient::age_on;
use crate::models::{Appointment, EForm, EFormPatient, PrescriptionLine};

/// Wire payload that marks an appointment completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteAppointmentRequest {
    pub appointment_id: Uuid,
    pub eform: EForm,
}

/// Editor lifecycle: pristine pre-populated form → edited → saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    Idle,
    Editing,
    Completed,
}

/// Build the initial form from the appointment's patient snapshot.
/// `today` feeds the age calculation — callers pass the clinic-local date.
pub fn prefill(appointment: &Appointment, today: NaiveDate) -> EForm {
    let snapshot = &appointment.patient_snapshot;
    let address = [snapshot.address_line1.as_str(), snapshot.address_line2.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ");

    EForm {
        patient: EFormPatient {
            name: snapshot.name.clone(),
            age: snapshot
                .dob
                .map(|dob| age_on(dob, today).to_string())
                .unwrap_or_default(),
            gender: snapshot.gender.clone(),
            contact: snapshot.phone.clone(),
            address,
        },
        prescriptions: vec![PrescriptionLine::default()],
        ..Default::default()
    }
}

/// Mutable editor over a pre-populated eForm.
#[derive(Debug)]
pub struct EFormEditor {
    appointment_id: Uuid,
    initial: EForm,
    form: EForm,
    phase: EditorPhase,
}

impl EFormEditor {
    pub fn new(appointment: &Appointment, today: NaiveDate) -> Self {
        let initial = prefill(appointment, today);
        Self {
            appointment_id: appointment.id,
            form: initial.clone(),
            initial,
            phase: EditorPhase::Idle,
        }
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn form(&self) -> &EForm {
        &self.form
    }

    /// Mutable access to the form fields; any edit moves the editor into
    /// the editing phase.
    pub fn form_mut(&mut self) -> &mut EForm {
        self.phase = EditorPhase::Editing;
        &mut self.form
    }

    pub fn add_prescription_row(&mut self) {
        self.phase = EditorPhase::Editing;
        self.form.prescriptions.push(PrescriptionLine::default());
    }

    /// Remove a prescription row. The last remaining row is retained;
    /// returns whether a row was removed.
    pub fn remove_prescription_row(&mut self, index: usize) -> bool {
        if self.form.prescriptions.len() <= 1 || index >= self.form.prescriptions.len() {
            return false;
        }
        self.phase = EditorPhase::Editing;
        self.form.prescriptions.remove(index);
        true
    }

    /// Restore the pre-populated initial state.
    pub fn reset(&mut self) {
        self.form = self.initial.clone();
        self.phase = EditorPhase::Idle;
    }

    /// The submission payload: full eForm plus the appointment id.
    pub fn payload(&self) -> CompleteAppointmentRequest {
        CompleteAppointmentRequest {
            appointment_id: self.appointment_id,
            eform: self.form.clone(),
        }
    }

    /// Called after the backend acknowledges the save.
    pub fn mark_saved(&mut self) {
        self.phase = EditorPhase::Completed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;

    fn appointment() -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            slot_date: SlotDate::from_token("10_8_2026").unwrap(),
            slot_time: "10:30 AM".into(),
            patient_snapshot: PatientSnapshot {
                name: "Meena K".into(),
                email: "meena@example.com".into(),
                phone: "+91 9000000001".into(),
                address_line1: "12 Lake Road".into(),
                address_line2: "Chennai".into(),
                gender: "Female".into(),
                dob: NaiveDate::from_ymd_opt(1998, 4, 2),
                image: String::new(),
            },
            doctor_snapshot: DoctorSnapshot {
                name: "Dr. Sabari".into(),
                speciality: "General physician".into(),
                fee: 500,
                address_line1: String::new(),
                address_line2: String::new(),
                image: String::new(),
            },
            amount: 500,
            booked_at: NaiveDate::from_ymd_opt(2026, 8, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            cancelled: false,
            payment: true,
            is_completed: false,
            eform: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    #[test]
    fn prefill_copies_snapshot_and_computes_age() {
        let form = prefill(&appointment(), today());
        assert_eq!(form.patient.name, "Meena K");
        assert_eq!(form.patient.age, "28");
        assert_eq!(form.patient.gender, "Female");
        assert_eq!(form.patient.contact, "+91 9000000001");
        assert_eq!(form.patient.address, "12 Lake Road, Chennai");
        assert_eq!(form.prescriptions.len(), 1);
        assert!(form.chief_complaint.is_empty());
    }

    #[test]
    fn editor_phases_track_edits_and_save() {
        let appt = appointment();
        let mut editor = EFormEditor::new(&appt, today());
        assert_eq!(editor.phase(), EditorPhase::Idle);

        editor.form_mut().chief_complaint = "Fever".into();
        assert_eq!(editor.phase(), EditorPhase::Editing);

        editor.mark_saved();
        assert_eq!(editor.phase(), EditorPhase::Completed);
    }

    #[test]
    fn prescription_rows_keep_minimum_one() {
        let appt = appointment();
        let mut editor = EFormEditor::new(&appt, today());

        assert!(!editor.remove_prescription_row(0), "last row must remain");

        editor.add_prescription_row();
        editor.add_prescription_row();
        assert_eq!(editor.form().prescriptions.len(), 3);

        assert!(editor.remove_prescription_row(1));
        assert!(editor.remove_prescription_row(1));
        assert_eq!(editor.form().prescriptions.len(), 1);
        assert!(!editor.remove_prescription_row(0));
    }

    #[test]
    fn remove_out_of_range_is_refused() {
        let appt = appointment();
        let mut editor = EFormEditor::new(&appt, today());
        editor.add_prescription_row();
        assert!(!editor.remove_prescription_row(5));
        assert_eq!(editor.form().prescriptions.len(), 2);
    }

    #[test]
    fn reset_restores_prefilled_state() {
        let appt = appointment();
        let mut editor = EFormEditor::new(&appt, today());
        let pristine = editor.form().clone();

        editor.form_mut().diagnosis = "Viral fever".into();
        editor.add_prescription_row();
        editor.reset();

        assert_eq!(editor.form(), &pristine);
        assert_eq!(editor.phase(), EditorPhase::Idle);
    }

    #[test]
    fn payload_carries_full_form_and_appointment_id() {
        let appt = appointment();
        let mut editor = EFormEditor::new(&appt, today());
        editor.form_mut().diagnosis = "Viral fever".into();

        let payload = editor.payload();
        assert_eq!(payload.appointment_id, appt.id);
        assert_eq!(payload.eform.diagnosis, "Viral fever");
        assert_eq!(payload.eform.patient.name, "Meena K");
    }
}

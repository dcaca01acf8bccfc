use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AppointmentStatus;
use super::slot::SlotDate;

/// Patient display data captured at booking time. Deliberately
/// denormalized so the historic record stays stable even if the patient
/// edits their profile later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSnapshot {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: String,
    pub gender: String,
    pub dob: Option<NaiveDate>,
    pub image: String,
}

/// Doctor display data captured at booking time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSnapshot {
    pub name: String,
    pub speciality: String,
    pub fee: i64,
    pub address_line1: String,
    pub address_line2: String,
    pub image: String,
}

/// Vitals block of the visit eForm. All free text; doctors write units
/// the way they write them on paper ("120/80 mmHg", "78 bpm").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    #[serde(default)]
    pub blood_pressure: String,
    #[serde(default)]
    pub pulse: String,
    #[serde(default)]
    pub temperature: String,
    #[serde(default)]
    pub weight: String,
}

/// One prescription line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionLine {
    #[serde(default)]
    pub medicine: String,
    /// Form / strength ("325 mg", "syrup").
    #[serde(default)]
    pub form: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub notes: String,
}

/// Patient block inside the eForm — independent of the canonical patient
/// record, editable by the doctor at visit time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EFormPatient {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub address: String,
}

/// The doctor-authored visit record attached to a completed appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EForm {
    #[serde(default)]
    pub patient: EFormPatient,
    #[serde(default)]
    pub chief_complaint: String,
    #[serde(default)]
    pub clinical_notes: String,
    #[serde(default)]
    pub vitals: Vitals,
    #[serde(default)]
    pub prescriptions: Vec<PrescriptionLine>,
    #[serde(default)]
    pub tests: String,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub advice: String,
}

/// A booked appointment slot. The only entity with a lifecycle:
/// booked → paid → completed (with eForm) / cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub slot_date: SlotDate,
    pub slot_time: String,
    pub patient_snapshot: PatientSnapshot,
    pub doctor_snapshot: DoctorSnapshot,
    pub amount: i64,
    pub booked_at: NaiveDateTime,
    pub cancelled: bool,
    pub payment: bool,
    pub is_completed: bool,
    pub eform: Option<EForm>,
}

impl Appointment {
    /// Derived status view. Completed wins over cancelled for historic
    /// documents that carry both flags.
    pub fn status(&self) -> AppointmentStatus {
        if self.is_completed {
            AppointmentStatus::Completed
        } else if self.cancelled {
            AppointmentStatus::Cancelled
        } else if self.payment {
            AppointmentStatus::Paid
        } else {
            AppointmentStatus::Booked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn base_appointment() -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            slot_date: SlotDate::new(NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()),
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
                address_line1: "MediBook Clinic".into(),
                address_line2: "Anna Nagar".into(),
                image: String::new(),
            },
            amount: 500,
            booked_at: NaiveDate::from_ymd_opt(2026, 8, 1)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap(),
            cancelled: false,
            payment: false,
            is_completed: false,
            eform: None,
        }
    }

    #[test]
    fn status_progression() {
        let mut appt = base_appointment();
        assert_eq!(appt.status(), AppointmentStatus::Booked);
        appt.payment = true;
        assert_eq!(appt.status(), AppointmentStatus::Paid);
        appt.is_completed = true;
        assert_eq!(appt.status(), AppointmentStatus::Completed);
    }

    #[test]
    fn cancelled_status() {
        let mut appt = base_appointment();
        appt.cancelled = true;
        assert_eq!(appt.status(), AppointmentStatus::Cancelled);
    }

    #[test]
    fn eform_serde_round_trip_with_defaults() {
        let eform = EForm {
            chief_complaint: "Fever for 3 days".into(),
            diagnosis: "Viral fever".into(),
            prescriptions: vec![PrescriptionLine {
                medicine: "Tab. Paracetamol".into(),
                form: "500 mg".into(),
                dosage: "1 tablet".into(),
                frequency: "Thrice daily".into(),
                duration: "5 days".into(),
                notes: "After food".into(),
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&eform).unwrap();
        let back: EForm = serde_json::from_str(&json).unwrap();
        assert_eq!(back, eform);

        // Sparse documents deserialize with empty defaults
        let sparse: EForm = serde_json::from_str("{\"diagnosis\":\"Migraine\"}").unwrap();
        assert_eq!(sparse.diagnosis, "Migraine");
        assert!(sparse.prescriptions.is_empty());
    }
}

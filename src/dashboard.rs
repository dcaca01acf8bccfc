//! Dashboard aggregates — single-fetch cards for the doctor and admin
//! home screens, derived from the appointment list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::Appointment;

/// How many recent bookings the dashboards show.
pub const LATEST_COUNT: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorDashboard {
    pub earnings: i64,
    pub appointments: usize,
    pub patients: usize,
    pub latest_appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub doctors: usize,
    pub appointments: usize,
    pub patients: usize,
    pub latest_appointments: Vec<Appointment>,
}

fn latest(appointments: &[Appointment]) -> Vec<Appointment> {
    let mut sorted: Vec<Appointment> = appointments.to_vec();
    sorted.sort_by(|a, b| b.booked_at.cmp(&a.booked_at));
    sorted.truncate(LATEST_COUNT);
    sorted
}

fn distinct_patients(appointments: &[Appointment]) -> usize {
    appointments
        .iter()
        .map(|a| a.patient_id)
        .collect::<HashSet<_>>()
        .len()
}

/// Aggregate one doctor's appointment list. Earnings count appointments
/// that were paid or completed (a completed visit is owed even when the
/// gateway callback never arrived).
pub fn doctor_dashboard(appointments: &[Appointment]) -> DoctorDashboard {
    let earnings = appointments
        .iter()
        .filter(|a| a.payment || a.is_completed)
        .map(|a| a.amount)
        .sum();

    DoctorDashboard {
        earnings,
        appointments: appointments.len(),
        patients: distinct_patients(appointments),
        latest_appointments: latest(appointments),
    }
}

/// Aggregate the whole clinic for the admin home screen.
pub fn admin_dashboard(
    doctor_count: usize,
    patient_count: usize,
    appointments: &[Appointment],
) -> AdminDashboard {
    AdminDashboard {
        doctors: doctor_count,
        appointments: appointments.len(),
        patients: patient_count,
        latest_appointments: latest(appointments),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn appt(patient_id: Uuid, amount: i64, hour: u32) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id: Uuid::new_v4(),
            slot_date: SlotDate::from_token("10_8_2026").unwrap(),
            slot_time: "10:00 AM".into(),
            patient_snapshot: PatientSnapshot {
                name: "P".into(),
                email: "p@example.com".into(),
                phone: String::new(),
                address_line1: String::new(),
                address_line2: String::new(),
                gender: String::new(),
                dob: None,
                image: String::new(),
            },
            doctor_snapshot: DoctorSnapshot {
                name: "D".into(),
                speciality: "GP".into(),
                fee: amount,
                address_line1: String::new(),
                address_line2: String::new(),
                image: String::new(),
            },
            amount,
            booked_at: NaiveDate::from_ymd_opt(2026, 8, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            cancelled: false,
            payment: false,
            is_completed: false,
            eform: None,
        }
    }

    #[test]
    fn earnings_count_paid_or_completed_only() {
        let p = Uuid::new_v4();
        let mut unpaid = appt(p, 500, 9);
        unpaid.payment = false;
        let mut paid = appt(p, 600, 10);
        paid.payment = true;
        let mut completed = appt(p, 700, 11);
        completed.is_completed = true;

        let dash = doctor_dashboard(&[unpaid, paid, completed]);
        assert_eq!(dash.earnings, 1300);
        assert_eq!(dash.appointments, 3);
        assert_eq!(dash.patients, 1);
    }

    #[test]
    fn patients_are_counted_distinct() {
        let p1 = Uuid::new_v4();
        let p2 = Uuid::new_v4();
        let dash = doctor_dashboard(&[appt(p1, 500, 9), appt(p1, 500, 10), appt(p2, 500, 11)]);
        assert_eq!(dash.patients, 2);
    }

    #[test]
    fn latest_is_newest_first_capped_at_five() {
        let p = Uuid::new_v4();
        let list: Vec<Appointment> = (8..=15).map(|h| appt(p, 500, h)).collect();
        let dash = doctor_dashboard(&list);
        assert_eq!(dash.latest_appointments.len(), LATEST_COUNT);
        let hours: Vec<u32> = dash
            .latest_appointments
            .iter()
            .map(|a| {
                use chrono::Timelike;
                a.booked_at.hour()
            })
            .collect();
        assert_eq!(hours, vec![15, 14, 13, 12, 11]);
    }

    #[test]
    fn admin_dashboard_carries_counts() {
        let p = Uuid::new_v4();
        let dash = admin_dashboard(3, 12, &[appt(p, 500, 9)]);
        assert_eq!(dash.doctors, 3);
        assert_eq!(dash.patients, 12);
        assert_eq!(dash.appointments, 1);
        assert_eq!(dash.latest_appointments.len(), 1);
    }
}

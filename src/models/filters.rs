use chrono::NaiveDate;
use uuid::Uuid;

/// Date-range + doctor filter over an in-memory appointment list.
///
/// Semantics (admin/doctor dashboards):
/// - `from` and `to` set: inclusive calendar-date range on the slot date.
/// - only `from` set: exact-day match.
/// - neither set: no date predicate.
/// - `doctor_id` intersects with whatever date predicate applies.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AppointmentListFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub doctor_id: Option<Uuid>,
}

/// Visibility scope for a patient's appointment history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryScope {
    /// Every doctor's appointments for the patient.
    AllDoctors,
    /// Only the authenticated doctor's own appointments.
    CurrentDoctor(Uuid),
}

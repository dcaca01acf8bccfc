//! Appointment list filtering + pagination for the admin/doctor dashboards.
//!
//! Pure derivation over an already-fetched in-memory list — no I/O failure
//! path here beyond the initial fetch. An empty filtered set is an empty
//! page, not an error.

use crate::models::{Appointment, AppointmentListFilter};

/// Fixed dashboard page size.
pub const PAGE_SIZE: usize = 10;

/// Apply the date/doctor filter. With both `from` and `to` set the range is
/// inclusive; with only `from` set it degrades to an exact-day match; with
/// neither, no date predicate applies. The doctor predicate intersects.
pub fn filter_appointments<'a>(
    appointments: &'a [Appointment],
    filter: &AppointmentListFilter,
) -> Vec<&'a Appointment> {
    appointments
        .iter()
        .filter(|appt| {
            let day = appt.slot_date.date();
            let date_ok = match (filter.from, filter.to) {
                (Some(from), Some(to)) => from <= day && day <= to,
                (Some(from), None) => day == from,
                (None, _) => true,
            };
            let doctor_ok = filter
                .doctor_id
                .map(|id| appt.doctor_id == id)
                .unwrap_or(true);
            date_ok && doctor_ok
        })
        .collect()
}

/// One page of a filtered list. `page` is 1-based.
pub fn page_slice<'a, 'b>(filtered: &'b [&'a Appointment], page: usize) -> &'b [&'a Appointment] {
    let start = (page.max(1) - 1) * PAGE_SIZE;
    if start >= filtered.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(filtered.len());
    &filtered[start..end]
}

/// Number of pages the filtered list spans (at least 1).
pub fn page_count(filtered_len: usize) -> usize {
    filtered_len.div_ceil(PAGE_SIZE).max(1)
}

/// Dashboard browsing state: the active filter plus the current page.
/// Changing the filter snaps back to page 1; paging past the end is a
/// no-op.
#[derive(Debug, Default)]
pub struct AppointmentBrowser {
    filter: AppointmentListFilter,
    page: usize,
}

impl AppointmentBrowser {
    pub fn new() -> Self {
        Self {
            filter: AppointmentListFilter::default(),
            page: 1,
        }
    }

    pub fn filter(&self) -> &AppointmentListFilter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    pub fn set_filter(&mut self, filter: AppointmentListFilter) {
        if filter != self.filter {
            self.filter = filter;
            self.page = 1;
        }
    }

    pub fn next_page(&mut self, appointments: &[Appointment]) {
        let filtered = filter_appointments(appointments, &self.filter);
        if self.page() < page_count(filtered.len()) {
            self.page = self.page() + 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page() > 1 {
            self.page -= 1;
        }
    }

    /// The filtered appointments visible on the current page.
    pub fn visible<'a>(&self, appointments: &'a [Appointment]) -> Vec<&'a Appointment> {
        let filtered = filter_appointments(appointments, &self.filter);
        page_slice(&filtered, self.page()).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn appt(doctor_id: Uuid, slot_token: &str) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id,
            slot_date: SlotDate::from_token(slot_token).unwrap(),
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
            payment: false,
            is_completed: false,
            eform: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_filter_is_inclusive_and_order_independent() {
        let doc = Uuid::new_v4();
        // Deliberately unsorted
        let list = vec![
            appt(doc, "20_8_2026"),
            appt(doc, "5_8_2026"),
            appt(doc, "10_8_2026"),
            appt(doc, "21_8_2026"),
        ];
        let filter = AppointmentListFilter {
            from: Some(date(2026, 8, 5)),
            to: Some(date(2026, 8, 20)),
            doctor_id: None,
        };
        let filtered = filter_appointments(&list, &filter);
        let tokens: Vec<String> = filtered.iter().map(|a| a.slot_date.token()).collect();
        assert_eq!(tokens, vec!["20_8_2026", "5_8_2026", "10_8_2026"]);
    }

    #[test]
    fn from_only_degrades_to_exact_day() {
        let doc = Uuid::new_v4();
        let list = vec![
            appt(doc, "5_8_2026"),
            appt(doc, "6_8_2026"),
            appt(doc, "5_8_2026"),
        ];
        let filter = AppointmentListFilter {
            from: Some(date(2026, 8, 5)),
            to: None,
            doctor_id: None,
        };
        assert_eq!(filter_appointments(&list, &filter).len(), 2);
    }

    #[test]
    fn no_dates_means_no_date_predicate() {
        let doc = Uuid::new_v4();
        let list = vec![appt(doc, "5_8_2026"), appt(doc, "6_9_2026")];
        let filtered = filter_appointments(&list, &AppointmentListFilter::default());
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn doctor_and_date_filters_intersect() {
        let d1 = Uuid::new_v4();
        let d2 = Uuid::new_v4();
        let list = vec![
            appt(d1, "5_8_2026"),
            appt(d1, "9_8_2026"),
            appt(d2, "5_8_2026"),
        ];
        let both = AppointmentListFilter {
            from: Some(date(2026, 8, 1)),
            to: Some(date(2026, 8, 6)),
            doctor_id: Some(d1),
        };
        let filtered = filter_appointments(&list, &both);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].doctor_id, d1);

        // Intersection equals applying the predicates one at a time,
        // whichever order.
        let date_only = AppointmentListFilter {
            from: both.from,
            to: both.to,
            doctor_id: None,
        };
        let by_date: Vec<Appointment> = filter_appointments(&list, &date_only)
            .into_iter()
            .cloned()
            .collect();
        let doctor_only = AppointmentListFilter {
            doctor_id: Some(d1),
            ..Default::default()
        };
        let then_doctor = filter_appointments(&by_date, &doctor_only);
        assert_eq!(then_doctor.len(), 1);
        assert_eq!(then_doctor[0].id, filtered[0].id);
    }

    #[test]
    fn pagination_slices_fixed_pages() {
        let doc = Uuid::new_v4();
        let list: Vec<Appointment> = (1..=23).map(|d| appt(doc, &format!("{d}_8_2026"))).collect();
        let filtered = filter_appointments(&list, &AppointmentListFilter::default());

        assert_eq!(page_count(filtered.len()), 3);
        assert_eq!(page_slice(&filtered, 1).len(), 10);
        assert_eq!(page_slice(&filtered, 2).len(), 10);
        assert_eq!(page_slice(&filtered, 3).len(), 3);
        assert!(page_slice(&filtered, 4).is_empty());

        // Page 2 holds offsets [10, 20)
        assert_eq!(page_slice(&filtered, 2)[0].id, filtered[10].id);
    }

    #[test]
    fn browser_stops_at_last_page() {
        let doc = Uuid::new_v4();
        let list: Vec<Appointment> = (1..=23).map(|d| appt(doc, &format!("{d}_8_2026"))).collect();

        let mut browser = AppointmentBrowser::new();
        browser.next_page(&list);
        browser.next_page(&list);
        assert_eq!(browser.page(), 3);
        browser.next_page(&list); // beyond the end: no-op
        assert_eq!(browser.page(), 3);
        assert_eq!(browser.visible(&list).len(), 3);
    }

    #[test]
    fn filter_change_resets_to_first_page() {
        let doc = Uuid::new_v4();
        let list: Vec<Appointment> = (1..=23).map(|d| appt(doc, &format!("{d}_8_2026"))).collect();

        let mut browser = AppointmentBrowser::new();
        browser.next_page(&list);
        assert_eq!(browser.page(), 2);

        browser.set_filter(AppointmentListFilter {
            from: Some(date(2026, 8, 1)),
            to: Some(date(2026, 8, 4)),
            doctor_id: None,
        });
        assert_eq!(browser.page(), 1);
        assert_eq!(browser.visible(&list).len(), 4);
    }

    #[test]
    fn empty_result_is_an_empty_page() {
        let doc = Uuid::new_v4();
        let list = vec![appt(doc, "5_8_2026")];
        let mut browser = AppointmentBrowser::new();
        browser.set_filter(AppointmentListFilter {
            from: Some(date(2027, 1, 1)),
            to: None,
            doctor_id: None,
        });
        assert!(browser.visible(&list).is_empty());
    }
}

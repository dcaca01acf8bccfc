use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::appointment::PatientSnapshot;

/// Full patient record as stored.
#[derive(Debug, Clone)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub image: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: String,
    pub gender: String,
    pub dob: Option<NaiveDate>,
    pub registered_at: NaiveDateTime,
}

impl Patient {
    pub fn snapshot(&self) -> PatientSnapshot {
        PatientSnapshot {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address_line1: self.address_line1.clone(),
            address_line2: self.address_line2.clone(),
            gender: self.gender.clone(),
            dob: self.dob,
            image: self.image.clone(),
        }
    }

    pub fn public(&self) -> PatientPublic {
        PatientPublic {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            phone: self.phone.clone(),
            address_line1: self.address_line1.clone(),
            address_line2: self.address_line2.clone(),
            gender: self.gender.clone(),
            dob: self.dob,
        }
    }
}

/// Wire projection without credentials. This is what the patient search
/// list and the profile endpoints carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientPublic {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: String,
    pub gender: String,
    pub dob: Option<NaiveDate>,
}

/// Fields a patient may edit on their own profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientProfileUpdate {
    pub name: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: String,
    pub gender: String,
    pub dob: Option<NaiveDate>,
}

/// Whole years between `dob` and `on`.
pub fn age_on(dob: NaiveDate, on: NaiveDate) -> u32 {
    let mut age = on.year() - dob.year();
    if (on.month(), on.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

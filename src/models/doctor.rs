use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::appointment::DoctorSnapshot;

/// Full doctor record as stored. Credentials never leave the db layer —
/// use [`DoctorPublic`] for anything wire-facing.
#[derive(Debug, Clone)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fee: i64,
    pub address_line1: String,
    pub address_line2: String,
    pub available: bool,
    pub registered_at: NaiveDateTime,
}

impl Doctor {
    pub fn snapshot(&self) -> DoctorSnapshot {
        DoctorSnapshot {
            name: self.name.clone(),
            speciality: self.speciality.clone(),
            fee: self.fee,
            address_line1: self.address_line1.clone(),
            address_line2: self.address_line2.clone(),
            image: self.image.clone(),
        }
    }

    pub fn public(&self) -> DoctorPublic {
        DoctorPublic {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            speciality: self.speciality.clone(),
            degree: self.degree.clone(),
            experience: self.experience.clone(),
            about: self.about.clone(),
            fee: self.fee,
            address_line1: self.address_line1.clone(),
            address_line2: self.address_line2.clone(),
            available: self.available,
        }
    }
}

/// Directory projection: no email, no credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorPublic {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fee: i64,
    pub address_line1: String,
    pub address_line2: String,
    pub available: bool,
}

/// Fields a doctor may edit on their own profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorProfileUpdate {
    pub fee: i64,
    pub address_line1: String,
    pub address_line2: String,
    pub about: String,
    pub available: bool,
}

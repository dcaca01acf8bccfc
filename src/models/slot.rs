//! Slot date: a calendar date with an underscore-joined `day_month_year`
//! wire/storage encoding (`5_8_2026`). The token form is purely an encoding
//! detail; everything in the crate works with the `NaiveDate` inside.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::db::DatabaseError;

/// Calendar date of a bookable slot. No timezone; clinic-local days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotDate(NaiveDate);

impl SlotDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Wire/storage form: `day_month_year`, no zero padding.
    pub fn token(&self) -> String {
        format!("{}_{}_{}", self.0.day(), self.0.month(), self.0.year())
    }

    pub fn from_token(token: &str) -> Result<Self, DatabaseError> {
        let invalid = || DatabaseError::InvalidField {
            field: "slot_date".into(),
            value: token.into(),
        };

        let mut parts = token.split('_');
        let (Some(day), Some(month), Some(year), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let day: u32 = day.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl From<NaiveDate> for SlotDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for SlotDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

impl FromStr for SlotDate {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s)
    }
}

impl Serialize for SlotDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token())
    }
}

impl<'de> Deserialize<'de> for SlotDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::from_token(&token).map_err(|_| D::Error::custom("invalid slot date token"))
    }
}

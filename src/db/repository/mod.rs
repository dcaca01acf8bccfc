//! Repository layer — entity-scoped database operations.
//!
//! Free functions over `&Connection`, one sub-module per collection.
//! Appointment snapshots and the eForm sub-document are JSON text columns;
//! everything else maps to plain columns.

mod appointment;
mod doctor;
mod patient;
mod payment_order;

pub use appointment::*;
pub use doctor::*;
pub use patient::*;
pub use payment_order::*;

use chrono::NaiveDateTime;
use uuid::Uuid;

use super::DatabaseError;

pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn parse_uuid(raw: &str, entity: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(raw).map_err(|_| DatabaseError::InvalidField {
        field: format!("{entity}.id"),
        value: raw.into(),
    })
}

pub(crate) fn parse_datetime(raw: &str, field: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT).map_err(|_| DatabaseError::InvalidField {
        field: field.into(),
        value: raw.into(),
    })
}

pub(crate) fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

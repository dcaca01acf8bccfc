use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{format_datetime, parse_datetime, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{Patient, PatientProfileUpdate};

const COLUMNS: &str = "id, name, email, password_hash, image, phone, \
                       address_line1, address_line2, gender, dob, registered_at";

fn row_to_patient(row: &Row<'_>) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        id: parse_uuid(&row.get::<_, String>(0)?, "patient")?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        image: row.get(4)?,
        phone: row.get(5)?,
        address_line1: row.get(6)?,
        address_line2: row.get(7)?,
        gender: row.get(8)?,
        dob: row
            .get::<_, Option<String>>(9)?
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        registered_at: parse_datetime(&row.get::<_, String>(10)?, "patients.registered_at")?,
    })
}

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, name, email, password_hash, image, phone,
                               address_line1, address_line2, gender, dob, registered_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            patient.id.to_string(),
            patient.name,
            patient.email,
            patient.password_hash,
            patient.image,
            patient.phone,
            patient.address_line1,
            patient.address_line2,
            patient.gender,
            patient.dob.map(|d| d.to_string()),
            format_datetime(&patient.registered_at),
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM patients WHERE id = ?1"))?;
    let mut rows = stmt.query(params![id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_patient(row)?)),
        None => Ok(None),
    }
}

pub fn get_patient_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM patients WHERE email = ?1"))?;
    let mut rows = stmt.query(params![email])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_patient(row)?)),
        None => Ok(None),
    }
}

pub fn update_patient_profile(
    conn: &Connection,
    id: &Uuid,
    update: &PatientProfileUpdate,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE patients SET name = ?1, phone = ?2, address_line1 = ?3,
                             address_line2 = ?4, gender = ?5, dob = ?6
         WHERE id = ?7",
        params![
            update.name,
            update.phone,
            update.address_line1,
            update.address_line2,
            update.gender,
            update.dob.map(|d| d.to_string()),
            id.to_string(),
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Patients that appear in at least one appointment — the source list for
/// the doctor-side patient search. Distinct, ordered by name.
pub fn list_patients_with_appointments(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT p.id, p.name, p.email, p.password_hash, p.image, p.phone,
                         p.address_line1, p.address_line2, p.gender, p.dob, p.registered_at
         FROM patients p
         JOIN appointments a ON a.patient_id = p.id
         ORDER BY p.name ASC",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(row_to_patient(row)?);
    }
    Ok(out)
}

pub fn count_patients(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count)
}

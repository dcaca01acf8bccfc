use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{format_datetime, parse_datetime, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{Doctor, DoctorProfileUpdate};

const COLUMNS: &str = "id, name, email, password_hash, image, speciality, degree, \
                       experience, about, fee, address_line1, address_line2, \
                       available, registered_at";

fn row_to_doctor(row: &Row<'_>) -> Result<Doctor, DatabaseError> {
    Ok(Doctor {
        id: parse_uuid(&row.get::<_, String>(0)?, "doctor")?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        image: row.get(4)?,
        speciality: row.get(5)?,
        degree: row.get(6)?,
        experience: row.get(7)?,
        about: row.get(8)?,
        fee: row.get(9)?,
        address_line1: row.get(10)?,
        address_line2: row.get(11)?,
        available: row.get(12)?,
        registered_at: parse_datetime(&row.get::<_, String>(13)?, "doctors.registered_at")?,
    })
}

pub fn insert_doctor(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (id, name, email, password_hash, image, speciality, degree,
                              experience, about, fee, address_line1, address_line2,
                              available, registered_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            doctor.id.to_string(),
            doctor.name,
            doctor.email,
            doctor.password_hash,
            doctor.image,
            doctor.speciality,
            doctor.degree,
            doctor.experience,
            doctor.about,
            doctor.fee,
            doctor.address_line1,
            doctor.address_line2,
            doctor.available,
            format_datetime(&doctor.registered_at),
        ],
    )?;
    Ok(())
}

pub fn get_doctor(conn: &Connection, id: &Uuid) -> Result<Option<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM doctors WHERE id = ?1"))?;
    let mut rows = stmt.query(params![id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_doctor(row)?)),
        None => Ok(None),
    }
}

pub fn get_doctor_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM doctors WHERE email = ?1"))?;
    let mut rows = stmt.query(params![email])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_doctor(row)?)),
        None => Ok(None),
    }
}

pub fn list_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM doctors ORDER BY name ASC"))?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(row_to_doctor(row)?);
    }
    Ok(out)
}

/// Flip the availability flag, returning the new value.
pub fn toggle_doctor_availability(conn: &Connection, id: &Uuid) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "UPDATE doctors SET available = NOT available WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            id: id.to_string(),
        });
    }
    let available: bool = conn.query_row(
        "SELECT available FROM doctors WHERE id = ?1",
        params![id.to_string()],
        |row| row.get(0),
    )?;
    Ok(available)
}

pub fn update_doctor_profile(
    conn: &Connection,
    id: &Uuid,
    update: &DoctorProfileUpdate,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE doctors SET fee = ?1, address_line1 = ?2, address_line2 = ?3,
                            about = ?4, available = ?5
         WHERE id = ?6",
        params![
            update.fee,
            update.address_line1,
            update.address_line2,
            update.about,
            update.available,
            id.to_string(),
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn count_doctors(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))?;
    Ok(count)
}

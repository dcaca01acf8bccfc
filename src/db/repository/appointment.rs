use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{format_datetime, parse_datetime, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{Appointment, EForm, SlotDate};

const COLUMNS: &str = "id, patient_id, doctor_id, slot_date, slot_time, \
                       patient_snapshot, doctor_snapshot, amount, booked_at, \
                       cancelled, payment, is_completed, eform";

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, DatabaseError> {
    serde_json::to_string(value)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("JSON serialization: {e}")))
}

fn row_to_appointment(row: &Row<'_>) -> Result<Appointment, DatabaseError> {
    let patient_snapshot: String = row.get(5)?;
    let doctor_snapshot: String = row.get(6)?;
    let eform: Option<String> = row.get(12)?;

    Ok(Appointment {
        id: parse_uuid(&row.get::<_, String>(0)?, "appointment")?,
        patient_id: parse_uuid(&row.get::<_, String>(1)?, "patient")?,
        doctor_id: parse_uuid(&row.get::<_, String>(2)?, "doctor")?,
        slot_date: SlotDate::from_token(&row.get::<_, String>(3)?)?,
        slot_time: row.get(4)?,
        patient_snapshot: serde_json::from_str(&patient_snapshot).map_err(|e| {
            DatabaseError::ConstraintViolation(format!("patient snapshot JSON: {e}"))
        })?,
        doctor_snapshot: serde_json::from_str(&doctor_snapshot)
            .map_err(|e| DatabaseError::ConstraintViolation(format!("doctor snapshot JSON: {e}")))?,
        amount: row.get(7)?,
        booked_at: parse_datetime(&row.get::<_, String>(8)?, "appointments.booked_at")?,
        cancelled: row.get(9)?,
        payment: row.get(10)?,
        is_completed: row.get(11)?,
        eform: eform
            .map(|raw| {
                serde_json::from_str(&raw)
                    .map_err(|e| DatabaseError::ConstraintViolation(format!("eForm JSON: {e}")))
            })
            .transpose()?,
    })
}

fn collect_appointments(
    conn: &Connection,
    sql: &str,
    args: &[&dyn rusqlite::ToSql],
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(args)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(row_to_appointment(row)?);
    }
    Ok(out)
}

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, patient_id, doctor_id, slot_date, slot_time,
                                   patient_snapshot, doctor_snapshot, amount, booked_at,
                                   cancelled, payment, is_completed, eform)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            appt.id.to_string(),
            appt.patient_id.to_string(),
            appt.doctor_id.to_string(),
            appt.slot_date.token(),
            appt.slot_time,
            to_json(&appt.patient_snapshot)?,
            to_json(&appt.doctor_snapshot)?,
            appt.amount,
            format_datetime(&appt.booked_at),
            appt.cancelled,
            appt.payment,
            appt.is_completed,
            appt.eform.as_ref().map(to_json).transpose()?,
        ],
    )?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Option<Appointment>, DatabaseError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {COLUMNS} FROM appointments WHERE id = ?1"))?;
    let mut rows = stmt.query(params![id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_appointment(row)?)),
        None => Ok(None),
    }
}

pub fn list_appointments_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    collect_appointments(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM appointments WHERE doctor_id = ?1 ORDER BY booked_at DESC"
        ),
        &[&doctor_id.to_string()],
    )
}

pub fn list_appointments_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    collect_appointments(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM appointments WHERE patient_id = ?1 ORDER BY booked_at DESC"
        ),
        &[&patient_id.to_string()],
    )
}

pub fn list_all_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    collect_appointments(
        conn,
        &format!("SELECT {COLUMNS} FROM appointments ORDER BY booked_at DESC"),
        &[],
    )
}

/// Whether an uncancelled booking already holds this doctor/date/time slot.
pub fn slot_taken(
    conn: &Connection,
    doctor_id: &Uuid,
    slot_date: &SlotDate,
    slot_time: &str,
) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM appointments
         WHERE doctor_id = ?1 AND slot_date = ?2 AND slot_time = ?3 AND cancelled = 0",
        params![doctor_id.to_string(), slot_date.token(), slot_time],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn appointment_flags(conn: &Connection, id: &Uuid) -> Result<(bool, bool), DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT cancelled, is_completed FROM appointments WHERE id = ?1")?;
    let mut rows = stmt.query(params![id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok((row.get(0)?, row.get(1)?)),
        None => Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: id.to_string(),
        }),
    }
}

/// Payment callback: mark the appointment paid. Last write wins — the
/// gateways do not coordinate with cancel/complete.
pub fn mark_appointment_paid(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments SET payment = 1 WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Cancel an appointment. Refused once the visit is completed.
pub fn cancel_appointment(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let (_, is_completed) = appointment_flags(conn, id)?;
    if is_completed {
        return Err(DatabaseError::ConstraintViolation(
            "appointment is already completed".into(),
        ));
    }
    conn.execute(
        "UPDATE appointments SET cancelled = 1 WHERE id = ?1",
        params![id.to_string()],
    )?;
    Ok(())
}

/// Mark the visit completed and persist its eForm in one statement, so the
/// eForm is present exactly when `is_completed` is set. Refused for
/// cancelled appointments. The `cancelled` flag is left untouched.
pub fn complete_appointment(
    conn: &Connection,
    id: &Uuid,
    eform: &EForm,
) -> Result<(), DatabaseError> {
    let (cancelled, _) = appointment_flags(conn, id)?;
    if cancelled {
        return Err(DatabaseError::ConstraintViolation(
            "appointment was cancelled".into(),
        ));
    }
    conn.execute(
        "UPDATE appointments SET is_completed = 1, eform = ?1 WHERE id = ?2",
        params![to_json(eform)?, id.to_string()],
    )?;
    Ok(())
}

pub fn count_appointments(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))?;
    Ok(count)
}

use std::str::FromStr;

use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{format_datetime, parse_datetime, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{OrderStatus, PaymentOrder};

const COLUMNS: &str = "id, appointment_id, provider_order_id, amount, currency, status, created_at";

fn row_to_order(row: &Row<'_>) -> Result<PaymentOrder, DatabaseError> {
    Ok(PaymentOrder {
        id: parse_uuid(&row.get::<_, String>(0)?, "payment_order")?,
        appointment_id: parse_uuid(&row.get::<_, String>(1)?, "appointment")?,
        provider_order_id: row.get(2)?,
        amount: row.get(3)?,
        currency: row.get(4)?,
        status: OrderStatus::from_str(&row.get::<_, String>(5)?)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?, "payment_orders.created_at")?,
    })
}

pub fn insert_payment_order(conn: &Connection, order: &PaymentOrder) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO payment_orders (id, appointment_id, provider_order_id, amount,
                                     currency, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            order.id.to_string(),
            order.appointment_id.to_string(),
            order.provider_order_id,
            order.amount,
            order.currency,
            order.status.as_str(),
            format_datetime(&order.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_payment_order_by_provider_id(
    conn: &Connection,
    provider_order_id: &str,
) -> Result<Option<PaymentOrder>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM payment_orders WHERE provider_order_id = ?1"
    ))?;
    let mut rows = stmt.query(params![provider_order_id])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_order(row)?)),
        None => Ok(None),
    }
}

pub fn set_payment_order_status(
    conn: &Connection,
    id: &Uuid,
    status: OrderStatus,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE payment_orders SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "PaymentOrder".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::OrderStatus;

/// Local record of a gateway A order, written when the order is created at
/// the provider. Lets the verify callback map a provider order id back to
/// its appointment without a second provider round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub provider_order_id: String,
    pub amount: i64,
    pub currency: String,
    pub status: OrderStatus,
    pub created_at: NaiveDateTime,
}

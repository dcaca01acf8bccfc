//! Gateway A: hosted checkout with a server-created order.
//!
//! The backend creates an order against the provider REST API and hands
//! the order reference to the client, which opens the provider's hosted
//! checkout. The success callback carries `{order_id, payment_id,
//! signature}`; the signature is HMAC-SHA256 over `order_id|payment_id`
//! keyed with the secret, hex-encoded — recomputed and compared in
//! constant time here.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::PaymentError;
use crate::config::CheckoutConfig;

type HmacSha256 = Hmac<Sha256>;

/// Order reference returned by the provider, passed to the client to open
/// hosted checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

pub struct CheckoutClient {
    key_id: String,
    key_secret: String,
    base_url: String,
    http: reqwest::Client,
}

impl CheckoutClient {
    pub fn new(config: &CheckoutConfig) -> Self {
        Self {
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Create an order at the provider. `amount` is in minor currency
    /// units; `receipt` carries our appointment id for reconciliation.
    pub async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<CheckoutOrder, PaymentError> {
        let url = format!("{}/orders", self.base_url);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&CreateOrderBody {
                amount,
                currency,
                receipt,
            })
            .send()
            .await
            .map_err(|e| PaymentError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PaymentError::Provider(format!(
                "order creation returned {}",
                response.status()
            )));
        }

        response
            .json::<CheckoutOrder>()
            .await
            .map_err(|e| PaymentError::Provider(format!("order response decode: {e}")))
    }

    /// The signature the provider attaches to a successful payment.
    pub fn payment_signature(&self, order_id: &str, payment_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.key_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        to_hex(&mac.finalize().into_bytes())
    }

    /// Verify a success-callback signature.
    pub fn verify_payment(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), PaymentError> {
        let expected = self.payment_signature(order_id, payment_id);
        let matches: bool = expected
            .as_bytes()
            .ct_eq(signature.as_bytes())
            .into();
        if matches {
            Ok(())
        } else {
            Err(PaymentError::SignatureMismatch)
        }
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

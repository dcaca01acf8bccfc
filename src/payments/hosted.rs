//! Gateway B: vendor hosted-page flow with an encrypted order payload.
//!
//! The backend serializes the order, encrypts it with the merchant
//! working key, and returns the blob plus an access code; the client
//! auto-submits a form that redirects the browser to the vendor's hosted
//! page. The vendor posts an encrypted response back; the backend
//! decrypts it and branches on the order status.
//!
//! Cipher: AES-256-GCM with key = SHA-256(working key), random 12-byte
//! nonce, transport form base64(nonce ‖ ciphertext).

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::PaymentError;
use crate::config::HostedConfig;

const NONCE_LENGTH: usize = 12;

/// Vendor order status token on the success branch.
pub const ORDER_STATUS_SUCCESS: &str = "Success";

/// Order payload sent to the vendor's hosted page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostedOrderRequest {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub redirect_url: String,
    pub cancel_url: String,
    #[serde(default)]
    pub billing: BillingDetails,
}

/// Billing block collected on the payment form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub tel: String,
    #[serde(default)]
    pub email: String,
}

/// Decrypted vendor response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostedOrderResponse {
    pub order_id: String,
    pub order_status: String,
    #[serde(default)]
    pub tracking_id: String,
    #[serde(default)]
    pub failure_message: String,
}

impl HostedOrderResponse {
    pub fn is_success(&self) -> bool {
        self.order_status == ORDER_STATUS_SUCCESS
    }
}

pub struct HostedGateway {
    merchant_id: String,
    access_code: String,
    key: [u8; 32],
}

impl HostedGateway {
    pub fn new(config: &HostedConfig) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(config.working_key.as_bytes());
        Self {
            merchant_id: config.merchant_id.clone(),
            access_code: config.access_code.clone(),
            key: hasher.finalize().into(),
        }
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    /// Access code the client submits alongside the encrypted blob.
    pub fn access_code(&self) -> &str {
        &self.access_code
    }

    fn encrypt_blob(&self, plaintext: &[u8]) -> Result<String, PaymentError> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| PaymentError::Cipher)?;

        let mut bytes = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        bytes.extend_from_slice(&nonce_bytes);
        bytes.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decrypt_blob(&self, encoded: &str) -> Result<Vec<u8>, PaymentError> {
        let bytes = URL_SAFE_NO_PAD.decode(encoded).map_err(|_| PaymentError::Cipher)?;
        if bytes.len() < NONCE_LENGTH + 16 {
            // AES-GCM auth tag is 16 bytes minimum
            return Err(PaymentError::Cipher);
        }
        let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LENGTH);

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| PaymentError::Cipher)
    }

    /// Encrypt an order for the hosted page.
    pub fn encrypt_request(&self, request: &HostedOrderRequest) -> Result<String, PaymentError> {
        let json =
            serde_json::to_vec(request).map_err(|e| PaymentError::Malformed(e.to_string()))?;
        self.encrypt_blob(&json)
    }

    /// Decrypt the vendor's posted response.
    pub fn decrypt_response(&self, encoded: &str) -> Result<HostedOrderResponse, PaymentError> {
        let plaintext = self.decrypt_blob(encoded)?;
        serde_json::from_slice(&plaintext).map_err(|e| PaymentError::Malformed(e.to_string()))
    }

    /// Mirror of `encrypt_request` for the response shape. The vendor does
    /// this on their side; here it backs the test suite and any sandbox
    /// tooling.
    pub fn encrypt_response(&self, response: &HostedOrderResponse) -> Result<String, PaymentError> {
        let json =
            serde_json::to_vec(response).map_err(|e| PaymentError::Malformed(e.to_string()))?;
        self.encrypt_blob(&json)
    }

    /// Decrypt an order request blob — the vendor-side half of the
    /// request round trip, used by tests.
    pub fn decrypt_request(&self, encoded: &str) -> Result<HostedOrderRequest, PaymentError> {
        let plaintext = self.decrypt_blob(encoded)?;
        serde_json::from_slice(&plaintext).map_err(|e| PaymentError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> HostedGateway {
        HostedGateway::new(&HostedConfig {
            merchant_id: "M12345".into(),
            access_code: "ACC999".into(),
            working_key: "0123456789ABCDEF".into(),
            redirect_url: "http://localhost:4000/api/pay/hosted/response".into(),
            cancel_url: "http://localhost:4000/api/pay/hosted/response".into(),
            success_redirect: "/payment-success".into(),
            failure_redirect: "/payment-failure".into(),
        })
    }

    fn order() -> HostedOrderRequest {
        HostedOrderRequest {
            order_id: "7c9a6a2e-0000-0000-0000-000000000001".into(),
            amount: 50_000,
            currency: "INR".into(),
            redirect_url: "http://localhost:4000/api/pay/hosted/response".into(),
            cancel_url: "http://localhost:4000/api/pay/hosted/response".into(),
            billing: BillingDetails {
                name: "Meena K".into(),
                city: "Chennai".into(),
                country: "India".into(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn request_round_trip() {
        let gw = gateway();
        let enc = gw.encrypt_request(&order()).unwrap();
        let back = gw.decrypt_request(&enc).unwrap();
        assert_eq!(back.order_id, order().order_id);
        assert_eq!(back.amount, 50_000);
        assert_eq!(back.billing.city, "Chennai");
    }

    #[test]
    fn response_round_trip_and_status_branch() {
        let gw = gateway();
        let ok = HostedOrderResponse {
            order_id: "appt-1".into(),
            order_status: "Success".into(),
            tracking_id: "T123".into(),
            failure_message: String::new(),
        };
        let enc = gw.encrypt_response(&ok).unwrap();
        let back = gw.decrypt_response(&enc).unwrap();
        assert!(back.is_success());

        let failed = HostedOrderResponse {
            order_status: "Failure".into(),
            ..ok
        };
        let enc = gw.encrypt_response(&failed).unwrap();
        assert!(!gw.decrypt_response(&enc).unwrap().is_success());
    }

    #[test]
    fn nonces_differ_between_encryptions() {
        let gw = gateway();
        let a = gw.encrypt_request(&order()).unwrap();
        let b = gw.encrypt_request(&order()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn tampered_blob_is_rejected() {
        let gw = gateway();
        let enc = gw.encrypt_request(&order()).unwrap();
        let mut bytes = URL_SAFE_NO_PAD.decode(&enc).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = URL_SAFE_NO_PAD.encode(bytes);
        assert!(matches!(
            gw.decrypt_request(&tampered),
            Err(PaymentError::Cipher)
        ));
    }

    #[test]
    fn wrong_working_key_cannot_decrypt() {
        let gw = gateway();
        let other = HostedGateway::new(&HostedConfig {
            working_key: "FFFF0000FFFF0000".into(),
            merchant_id: "M12345".into(),
            access_code: "ACC999".into(),
            redirect_url: String::new(),
            cancel_url: String::new(),
            success_redirect: String::new(),
            failure_redirect: String::new(),
        });
        let enc = gw.encrypt_request(&order()).unwrap();
        assert!(other.decrypt_request(&enc).is_err());
    }

    #[test]
    fn garbage_input_is_rejected() {
        let gw = gateway();
        assert!(gw.decrypt_response("not-base64!!!").is_err());
        assert!(gw.decrypt_response("AAAA").is_err());
    }
}

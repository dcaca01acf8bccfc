//! Payment gateway integrations — thin passthroughs to two external
//! providers. All signature/encryption schemes here are the vendor
//! contracts; the clinic only constructs orders and inspects outcomes.

pub mod checkout;
pub mod hosted;

pub use checkout::{CheckoutClient, CheckoutOrder};
pub use hosted::{BillingDetails, HostedGateway, HostedOrderRequest, HostedOrderResponse};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment provider request failed: {0}")]
    Provider(String),

    #[error("payment signature mismatch")]
    SignatureMismatch,

    #[error("order payload could not be decrypted")]
    Cipher,

    #[error("malformed order payload: {0}")]
    Malformed(String),
}

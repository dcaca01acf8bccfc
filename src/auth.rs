//! Password records: PBKDF2-HMAC-SHA256 with a per-record random salt.
//!
//! Stored form: `pbkdf2-sha256$<iterations>$<salt b64>$<hash b64>`.
//! Verification re-derives with the stored parameters and compares in
//! constant time.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const PBKDF2_ITERATIONS: u32 = 100_000;
pub const HASH_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 16;

const SCHEME: &str = "pbkdf2-sha256";

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut out = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

/// Hash a password into its stored record form.
pub fn hash_password(password: &str) -> String {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);

    let hash = derive(password, &salt, PBKDF2_ITERATIONS);
    format!(
        "{SCHEME}${}${}${}",
        PBKDF2_ITERATIONS,
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(hash),
    )
}

/// Verify a password against a stored record.
///
/// Returns `false` for malformed records rather than erroring; a corrupt
/// credential row must never authenticate.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iters), Some(salt), Some(hash)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if scheme != SCHEME || parts.next().is_some() {
        return false;
    }
    let Ok(iterations) = iters.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (STANDARD_NO_PAD.decode(salt), STANDARD_NO_PAD.decode(hash))
    else {
        return false;
    };

    let candidate = derive(password, &salt, iterations);
    candidate.ct_eq(&expected[..]).into()
}

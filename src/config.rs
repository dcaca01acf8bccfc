use std::env;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "MediBook";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default HTTP port when `MEDIBOOK_PORT` is unset.
pub const DEFAULT_PORT: u16 = 4000;

/// Get the application data directory
/// ~/MediBook/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("MediBook")
}

/// Default database file location.
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("medibook.db")
}

/// Gateway A (hosted checkout) credentials.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    pub key_id: String,
    pub key_secret: String,
    pub base_url: String,
}

/// Gateway B (hosted redirect page) credentials and redirect targets.
#[derive(Debug, Clone)]
pub struct HostedConfig {
    pub merchant_id: String,
    pub access_code: String,
    pub working_key: String,
    /// Where the vendor sends the browser back after payment.
    pub redirect_url: String,
    pub cancel_url: String,
    /// Frontend pages the response handler redirects to.
    pub success_redirect: String,
    pub failure_redirect: String,
}

/// Runtime configuration, read from `MEDIBOOK_*` environment variables
/// with workable defaults for local development.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub currency: String,
    pub admin_email: String,
    pub admin_password: String,
    pub checkout: CheckoutConfig,
    pub hosted: HostedConfig,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("MEDIBOOK_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let db_path = env::var("MEDIBOOK_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_db_path());

        Self {
            port,
            db_path,
            currency: env_or("MEDIBOOK_CURRENCY", "INR"),
            admin_email: env_or("MEDIBOOK_ADMIN_EMAIL", "admin@medibook.local"),
            admin_password: env_or("MEDIBOOK_ADMIN_PASSWORD", "changeme"),
            checkout: CheckoutConfig {
                key_id: env_or("MEDIBOOK_CHECKOUT_KEY_ID", ""),
                key_secret: env_or("MEDIBOOK_CHECKOUT_KEY_SECRET", ""),
                base_url: env_or(
                    "MEDIBOOK_CHECKOUT_BASE_URL",
                    "https://api.checkout-gateway.example/v1",
                ),
            },
            hosted: HostedConfig {
                merchant_id: env_or("MEDIBOOK_HOSTED_MERCHANT_ID", ""),
                access_code: env_or("MEDIBOOK_HOSTED_ACCESS_CODE", ""),
                working_key: env_or("MEDIBOOK_HOSTED_WORKING_KEY", ""),
                redirect_url: env_or(
                    "MEDIBOOK_HOSTED_REDIRECT_URL",
                    "http://localhost:4000/api/pay/hosted/response",
                ),
                cancel_url: env_or(
                    "MEDIBOOK_HOSTED_CANCEL_URL",
                    "http://localhost:4000/api/pay/hosted/response",
                ),
                success_redirect: env_or("MEDIBOOK_PAY_SUCCESS_URL", "/payment-success"),
                failure_redirect: env_or("MEDIBOOK_PAY_FAILURE_URL", "/payment-failure"),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("MediBook"));
    }

    #[test]
    fn default_db_under_app_data() {
        let db = default_db_path();
        assert!(db.starts_with(app_data_dir()));
    }

    #[test]
    fn from_env_has_workable_defaults() {
        let cfg = Config::from_env();
        assert!(cfg.port > 0);
        assert!(!cfg.currency.is_empty());
        assert!(!cfg.admin_email.is_empty());
        assert!(cfg.hosted.success_redirect.contains("success"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}

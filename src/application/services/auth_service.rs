//! Admin bearer token validation.

use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::error::AppError;
use crate::settings::BlogSettings;

type HmacSha256 = Hmac<Sha256>;

/// Number of random bytes in generated tokens and secrets (before base64).
const SECRET_BYTES: usize = 32;

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC.
pub fn hash_token(signing_secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Generates a URL-safe random string suitable as a token or signing secret.
///
/// # Errors
///
/// Returns an error if the OS entropy source is unavailable.
pub fn generate_secret() -> Result<String, getrandom::Error> {
    let mut buffer = [0u8; SECRET_BYTES];
    getrandom::fill(&mut buffer)?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Authenticates admin API requests.
///
/// Only the HMAC of the admin token is kept in the settings file; reading
/// that file is not enough to forge a token without the signing secret.
pub struct AuthService {
    credentials: Option<Credentials>,
}

struct Credentials {
    signing_secret: String,
    token_hash: Vec<u8>,
}

impl AuthService {
    /// Builds the service from settings. Missing or malformed credentials
    /// leave the admin API locked.
    pub fn new(settings: &BlogSettings) -> Self {
        let credentials = match (&settings.token_signing_secret, &settings.admin_token_hash) {
            (Some(secret), Some(hash)) if !secret.is_empty() => match hex::decode(hash) {
                Ok(token_hash) => Some(Credentials {
                    signing_secret: secret.clone(),
                    token_hash,
                }),
                Err(e) => {
                    tracing::warn!(error = %e, "adminTokenHash is not valid hex; admin API disabled");
                    None
                }
            },
            _ => {
                tracing::warn!("Admin credentials not configured; admin API disabled");
                None
            }
        };

        Self { credentials }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Checks a raw bearer token in constant time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token does not match or no
    /// credentials are configured.
    pub fn authenticate(&self, token: &str) -> Result<(), AppError> {
        let Some(credentials) = &self.credentials else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Admin API is not configured" }),
            ));
        };

        let mut mac = HmacSha256::new_from_slice(credentials.signing_secret.as_bytes())
            .map_err(|e| AppError::internal("Invalid signing secret", json!({ "reason": e.to_string() })))?;
        mac.update(token.as_bytes());

        mac.verify_slice(&credentials.token_hash).map_err(|_| {
            AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid token" }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsPatch;

    fn settings_for(token: &str) -> BlogSettings {
        let secret = "test-signing-secret";
        let mut settings = BlogSettings::default();
        settings.apply(SettingsPatch {
            admin_token_hash: Some(hash_token(secret, token)),
            token_signing_secret: Some(secret.to_string()),
            tag_normalization: None,
        });
        settings
    }

    #[test]
    fn test_authenticate_success() {
        let service = AuthService::new(&settings_for("valid-token"));
        assert!(service.is_configured());
        assert!(service.authenticate("valid-token").is_ok());
    }

    #[test]
    fn test_authenticate_invalid_token() {
        let service = AuthService::new(&settings_for("valid-token"));
        let result = service.authenticate("other-token");
        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[test]
    fn test_unconfigured_rejects_everything() {
        let service = AuthService::new(&BlogSettings::default());
        assert!(!service.is_configured());
        assert!(service.authenticate("").is_err());
        assert!(service.authenticate("anything").is_err());
    }

    #[test]
    fn test_malformed_hash_disables_auth() {
        let mut settings = settings_for("t");
        settings.admin_token_hash = Some("zz-not-hex".to_string());
        assert!(!AuthService::new(&settings).is_configured());
    }

    #[test]
    fn test_hash_token_properties() {
        assert_eq!(hash_token("s", "t"), hash_token("s", "t"));
        assert_eq!(hash_token("s", "t").len(), 64);
        assert_ne!(hash_token("s", "t1"), hash_token("s", "t2"));
        assert_ne!(hash_token("secret-a", "t"), hash_token("secret-b", "t"));
    }

    #[test]
    fn test_generate_secret() {
        let a = generate_secret().unwrap();
        let b = generate_secret().unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
    }
}

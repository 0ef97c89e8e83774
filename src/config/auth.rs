use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Minimum accepted length of the HS256 signing secret.
const MIN_SECRET_LEN: usize = 32;

/// Admin API authentication.
///
/// Admin requests carry an HS256 bearer token whose `sub` claim is the
/// account id. Tokens are minted by the `bootstrap-admin` and `token`
/// subcommands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify tokens. Usually `${LABELHUB_JWT_SECRET}`.
    #[serde(default)]
    pub jwt_secret: String,

    /// Value of the `iss` claim; tokens from another issuer are rejected.
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Lifetime of minted tokens in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: default_issuer(),
            token_ttl_secs: default_token_ttl(),
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Validation(format!(
                "auth.jwt_secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }
        if self.issuer.is_empty() {
            return Err(ConfigError::Validation(
                "auth.issuer cannot be empty".into(),
            ));
        }
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "auth.token_ttl_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn default_issuer() -> String {
    "labelhub".to_string()
}

fn default_token_ttl() -> u64 {
    12 * 60 * 60 // 12 hours
}

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, Role};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iss: String,
    iat: i64,
    exp: i64,
    username: String,
    role: Role,
    #[serde(default)]
    province_id: Option<i64>,
}

/// A freshly signed bearer token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: u64,
}

/// Issues and validates HS256 bearer tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
    leeway: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            ttl: config.token_ttl,
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    /// Sign a token carrying the identity, role and province of `user`
    pub fn issue(&self, user: &AuthenticatedUser) -> Result<IssuedToken> {
        let now = chrono::Utc::now().timestamp();
        let ttl_secs = self.ttl.as_secs();

        let claims = Claims {
            sub: user.user_id.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + ttl_secs as i64,
            username: user.username.clone(),
            role: user.role,
            province_id: user.province_id,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            access_token,
            expires_in: ttl_secs,
        })
    }

    /// Verify signature, issuer and expiry, then rebuild the identity
    pub fn validate(&self, token: &str) -> Result<AuthenticatedUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = self.leeway;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

        let claims = token_data.claims;
        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            username: claims.username,
            role: claims.role,
            province_id: claims.province_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str, ttl_secs: u64) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            issuer: "census-registry-test".to_string(),
            token_ttl: Duration::from_secs(ttl_secs),
            jwt_leeway: Duration::from_secs(0),
        }
    }

    fn agent() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: 42,
            username: "agent_07".to_string(),
            role: Role::FieldAgent,
            province_id: Some(3),
        }
    }

    #[test]
    fn test_issue_then_validate_returns_identity() {
        let service = TokenService::new(&config("a-very-long-test-secret-of-32-bytes!", 600));

        let issued = service.issue(&agent()).unwrap();
        assert_eq!(issued.expires_in, 600);

        let user = service.validate(&issued.access_token).unwrap();
        assert_eq!(user.user_id, 42);
        assert_eq!(user.username, "agent_07");
        assert_eq!(user.role, Role::FieldAgent);
        assert_eq!(user.province_id, Some(3));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = TokenService::new(&config("first-secret-first-secret-first-secret", 600));
        let verifier = TokenService::new(&config("second-secret-second-secret-second-secret", 600));

        let issued = issuer.issue(&agent()).unwrap();
        let err = verifier.validate(&issued.access_token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = TokenService::new(&config("a-very-long-test-secret-of-32-bytes!", 0));
        let issued = service.issue(&agent()).unwrap();

        // exp == iat; wait past it with zero leeway
        std::thread::sleep(Duration::from_millis(1100));

        assert!(service.validate(&issued.access_token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = TokenService::new(&config("a-very-long-test-secret-of-32-bytes!", 600));
        assert!(service.validate("not-a-jwt").is_err());
    }
}
